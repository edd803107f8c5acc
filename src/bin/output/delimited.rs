use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::output::Output;
use sojourn::{Increment, Result};

pub struct Delimited {
    writer: BufWriter<File>,
    header: bool,
}

impl Delimited {
    pub fn new<T: AsRef<Path>>(path: T) -> Result<Delimited> {
        Ok(Delimited { writer: BufWriter::new(ok!(File::create(path))), header: false })
    }
}

impl Output for Delimited {
    fn next(&mut self, increment: &Increment) -> Result<()> {
        let report = &increment.report;
        if !self.header {
            let mut line = String::from("time");
            for (metric, _) in report.iter() {
                line.push_str(&format!(",{}", metric));
            }
            ok!(writeln!(self.writer, "{}", line));
            self.header = true;
        }
        let mut line = format!("{}", report.time());
        for (_, value) in report.iter() {
            line.push_str(&format!(",{}", value));
        }
        ok!(writeln!(self.writer, "{}", line));
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        ok!(self.writer.flush());
        Ok(())
    }
}

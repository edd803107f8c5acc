#[macro_use]
extern crate log;

extern crate arguments;
extern crate configuration;
extern crate sojourn;
extern crate term;

use configuration::format::TOML;
use log::LevelFilter;
use std::time::Instant;

use sojourn::{Config, Error, Result, System};

const USAGE: &str = "
Usage: sojourn [options]

Options:
    --config <path>          Configuration file in TOML.
    --input <path>           Parameter file with comma-separated values.
    --output <path>          Output file for the reports of every tick.

    --verbose                Display progress information.
    --help                   Display this message.
";

macro_rules! raise(
    ($kind:ident, $($arg:tt)+) => (
        return Err(::sojourn::Error::new(::sojourn::ErrorKind::$kind, format!($($arg)+)))
    );
);

macro_rules! ok(
    ($result:expr) => (match $result {
        Ok(result) => result,
        Err(error) => raise!(Input, "{}", error),
    });
);

macro_rules! some(
    ($option:expr, $kind:ident, $($arg:tt)+) => (match $option {
        Some(value) => value,
        _ => raise!($kind, $($arg)+),
    });
);

mod logger;
mod output;

fn main() {
    start().unwrap_or_else(|error| fail(error));
}

fn start() -> Result<()> {
    let arguments = ok!(arguments::parse(std::env::args()));

    if arguments.get::<bool>("help").unwrap_or(false) {
        help();
    }

    if arguments.get::<bool>("verbose").unwrap_or(false) {
        logger::setup(LevelFilter::Info);
    } else {
        logger::setup(LevelFilter::Warn);
    }

    let config = read_config(arguments.get::<String>("config"),
                             arguments.get::<String>("input"))?;
    let mut output = output::new(arguments.get::<String>("output"))?;
    let mut system = System::new(config)?;

    info!(target: "Sojourn", "Simulating until the reports are stable...");
    let start = Instant::now();
    let mut last = None;
    while let Some(increment) = system.next()? {
        output.next(&increment)?;
        last = Some(increment);
    }
    output.finish()?;
    info!(target: "Sojourn", "Well done in {:.2} seconds after {} ticks.",
          start.elapsed().as_secs_f64(), system.reports().len());

    let last = some!(last, Invariant, "the simulation has produced no reports");
    print!("{}", last.report);
    println!("accuracy: {}", last.accuracy);

    Ok(())
}

fn read_config(config: Option<String>, input: Option<String>) -> Result<Config> {
    match (config, input) {
        (Some(path), None) => {
            info!(target: "Sojourn", "Reading {:?}...", &path);
            Config::from_tree(&ok!(TOML::open(&path)))
        },
        (None, Some(path)) => {
            info!(target: "Sojourn", "Reading {:?}...", &path);
            Config::from_delimited(&ok!(std::fs::read_to_string(&path)))
        },
        (Some(_), Some(_)) => raise!(Config, "either a configuration or a parameter file is expected"),
        _ => raise!(Config, "a configuration or a parameter file is required"),
    }
}

fn help() -> ! {
    println!("{}", USAGE.trim());
    std::process::exit(0);
}

fn fail(error: Error) -> ! {
    use std::io::{stderr, Write};
    match term::stderr() {
        Some(mut output) => {
            let _ = output.fg(term::color::RED);
            let _ = writeln!(output, "Error: {}.", error);
            let _ = output.reset();
        },
        _ => {
            let _ = writeln!(stderr(), "Error: {}.", error);
        },
    }
    std::process::exit(1);
}

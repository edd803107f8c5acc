use sojourn::{Increment, Result};

mod delimited;
mod null;

use self::delimited::Delimited;
use self::null::Null;

pub trait Output {
    fn next(&mut self, increment: &Increment) -> Result<()>;
    fn finish(&mut self) -> Result<()>;
}

pub fn new(path: Option<String>) -> Result<Box<dyn Output>> {
    let output: Box<dyn Output> = match path {
        Some(path) => Box::new(Delimited::new(path)?),
        _ => Box::new(Null),
    };
    Ok(output)
}

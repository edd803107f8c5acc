//! Simulation parameters.

use configuration::Tree;

use crate::Result;

/// The default number of jobs.
pub const JOB_COUNT: usize = 10000;

/// The default probability of a job being of the first class.
pub const CLASS_ONE_RATIO: f64 = 0.1;

/// The default number of started jobs before convergence is tracked.
pub const WARMUP: usize = 50;

/// The default accuracy at which the simulation stops.
pub const ACCURACY: f64 = 0.95;

/// The default time step.
pub const TIME_STEP: f64 = 1.0;

/// The default seed.
pub const SEED: u64 = 12345;

const DELIMITER: char = ',';

/// Simulation parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// The service rates of the cores of each server.
    pub servers: Vec<Vec<f64>>,
    /// The rate of the Poisson arrival process.
    pub arrival_rate: f64,
    /// The rate of the exponentially distributed relative deadlines.
    pub deadline_rate: f64,
    /// The rate of the exponentially distributed dispatching overhead.
    pub scheduler_rate: f64,
    /// The number of jobs to generate.
    pub job_count: usize,
    /// The probability of a job being of the first class.
    pub class_one_ratio: f64,
    /// The number of started jobs before convergence is tracked.
    pub warmup: usize,
    /// The accuracy at which the simulation stops.
    pub accuracy: f64,
    /// The duration of a tick.
    pub time_step: f64,
    /// The seed of the source of randomness.
    pub seed: u64,
}

impl Config {
    /// Create a configuration with default values for the optional
    /// parameters.
    pub fn new(servers: Vec<Vec<f64>>, arrival_rate: f64, deadline_rate: f64,
               scheduler_rate: f64) -> Config {

        Config {
            servers,
            arrival_rate,
            deadline_rate,
            scheduler_rate,
            job_count: JOB_COUNT,
            class_one_ratio: CLASS_ONE_RATIO,
            warmup: WARMUP,
            accuracy: ACCURACY,
            time_step: TIME_STEP,
            seed: SEED,
        }
    }

    /// Read a configuration from a tree.
    ///
    /// Servers are given as an array of tables, each holding an array of
    /// tables with the service rates of its cores:
    ///
    /// ```toml
    /// arrival_rate = 0.5
    /// deadline_rate = 0.05
    /// scheduler_rate = 2.0
    ///
    /// [[servers]]
    /// [[servers.cores]]
    /// rate = 1.0
    /// ```
    pub fn from_tree(tree: &Tree) -> Result<Config> {
        let mut servers = vec![];
        if let Some(ref trees) = tree.forest("servers") {
            for tree in trees {
                let mut rates = vec![];
                if let Some(ref trees) = tree.forest("cores") {
                    for tree in trees {
                        rates.push(some!(number(tree, "rate"), Config,
                                         "the service rate of a core is missing"));
                    }
                }
                servers.push(rates);
            }
        }

        let mut config = Config::new(
            servers,
            some!(number(tree, "arrival_rate"), Config, "the arrival rate is missing"),
            some!(number(tree, "deadline_rate"), Config, "the deadline rate is missing"),
            some!(number(tree, "scheduler_rate"), Config, "the scheduler rate is missing"),
        );
        if let Some(value) = count(tree, "job_count")? {
            config.job_count = value;
        }
        if let Some(value) = number(tree, "class_one_ratio") {
            config.class_one_ratio = value;
        }
        if let Some(value) = count(tree, "warmup")? {
            config.warmup = value;
        }
        if let Some(value) = number(tree, "accuracy") {
            config.accuracy = value;
        }
        if let Some(value) = number(tree, "time_step") {
            config.time_step = value;
        }
        if let Some(value) = count(tree, "seed")? {
            config.seed = value as u64;
        }

        config.validate()?;
        Ok(config)
    }

    /// Read a configuration from comma-delimited text.
    ///
    /// The first line holds the number of servers, the arrival rate, the
    /// deadline rate, and the scheduler rate. Each of the following lines
    /// describes a server by the number of its cores followed by their
    /// service rates.
    pub fn from_delimited(content: &str) -> Result<Config> {
        let mut lines = content.lines().enumerate()
                                       .map(|(i, line)| (i + 1, line.trim()))
                                       .filter(|&(_, line)| !line.is_empty());

        let (number, line) = some!(lines.next(), Config, "the parameter file is empty");
        let fields = parse_line(number, line)?;
        if fields.len() != 4 {
            raise!(Config, "expected 4 fields on line {} but found {}", number, fields.len());
        }
        let server_count = integer(number, fields[0])?;

        let mut servers = Vec::with_capacity(server_count);
        for i in 0..server_count {
            let (number, line) = some!(lines.next(), Config,
                                       "expected {} servers but found {}", server_count, i);
            let fields = parse_line(number, line)?;
            let core_count = integer(number, fields[0])?;
            if fields.len() != core_count + 1 {
                raise!(Config, "expected {} service rates on line {} but found {}",
                       core_count, number, fields.len() - 1);
            }
            servers.push(fields[1..].to_vec());
        }
        if let Some((number, _)) = lines.next() {
            raise!(Config, "found an unexpected line {}", number);
        }

        let config = Config::new(servers, fields[1], fields[2], fields[3]);
        config.validate()?;
        Ok(config)
    }

    /// Check the parameters for consistency.
    pub fn validate(&self) -> Result<()> {
        if self.servers.is_empty() {
            raise!(Config, "at least one server is required");
        }
        for (i, rates) in self.servers.iter().enumerate() {
            if rates.is_empty() {
                raise!(Config, "server {} should have at least one core", i);
            }
            for &rate in rates {
                if !positive(rate) {
                    raise!(Config, "the service rates of server {} should be positive", i);
                }
            }
        }
        if !positive(self.arrival_rate) {
            raise!(Config, "the arrival rate should be positive");
        }
        if !positive(self.deadline_rate) {
            raise!(Config, "the deadline rate should be positive");
        }
        if !positive(self.scheduler_rate) {
            raise!(Config, "the scheduler rate should be positive");
        }
        if self.job_count == 0 {
            raise!(Config, "at least one job is required");
        }
        if !(0.0..=1.0).contains(&self.class_one_ratio) {
            raise!(Config, "the class-one ratio should be between zero and one");
        }
        if !(self.accuracy > 0.0 && self.accuracy <= 1.0) {
            raise!(Config, "the accuracy should be in (0, 1]");
        }
        if !positive(self.time_step) {
            raise!(Config, "the time step should be positive");
        }
        Ok(())
    }
}

#[inline]
fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn number(tree: &Tree, name: &str) -> Option<f64> {
    tree.get::<f64>(name).cloned().or_else(|| tree.get::<i64>(name).map(|&value| value as f64))
}

fn count(tree: &Tree, name: &str) -> Result<Option<usize>> {
    match tree.get::<i64>(name) {
        Some(&value) if value >= 0 => Ok(Some(value as usize)),
        Some(&value) => raise!(Config, "{} should be nonnegative but is {}", name, value),
        _ => Ok(None),
    }
}

fn parse_line(number: usize, line: &str) -> Result<Vec<f64>> {
    let mut fields = vec![];
    for field in line.split(DELIMITER).map(|field| field.trim()) {
        match field.parse::<f64>() {
            Ok(value) => fields.push(value),
            _ => raise!(Config, "found a non-numeric field ({:?}) on line {}", field, number),
        }
    }
    Ok(fields)
}

fn integer(number: usize, value: f64) -> Result<usize> {
    if value < 0.0 || value.fract() != 0.0 {
        raise!(Config, "expected a nonnegative integer on line {} but found {}", number, value);
    }
    Ok(value as usize)
}

#[macro_use]
extern crate log;

extern crate arguments;
extern crate mapper;
extern crate sql;
extern crate sqlite;
extern crate term;

use log::Level;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use mapper::graph::Generator;
use mapper::system;
use mapper::timing::Timing;

pub use mapper::{Config, Error, Result};

const USAGE: &'static str = "
Usage: mapper [options]

Options:
    --config <path>          Configuration file (required).
    --iterations <count>     Number of graphs to evaluate [default: 1].
    --output <path>          Output database for schedules and allocations.

    --verbose                Display progress information.
    --help                   Display this message.
";

macro_rules! raise(
    ($message:expr) => (return Err(::mapper::Error::new($message)));
    ($($arg:tt)*) => (return Err(::mapper::Error::new(format!($($arg)*))));
);

macro_rules! ok(
    ($result:expr) => (match $result {
        Ok(result) => result,
        Err(error) => raise!(error),
    });
);

macro_rules! some(
    ($option:expr, $($arg:tt)*) => (match $option {
        Some(value) => value,
        _ => raise!($($arg)*),
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
        logger::setup(Level::Info);
    } else {
        logger::setup(Level::Warn);
    }

    let config = Config::new(some!(arguments.get::<String>("config"),
                                   "a configuration file is required"))?;
    let platform = config.platform()?;
    let policies = config.policies()?;

    let mut source = {
        let seed = if config.seed > 0 {
            config.seed
        } else {
            ok!(SystemTime::now().duration_since(UNIX_EPOCH)).as_secs()
        };
        info!(target: "Mapper", "Seeding with {}.", seed);
        mapper::source(seed)
    };

    let mut generator = config.generator(&mut source)?;
    let mut timing = config.timing(&mut source)?;
    let mut output = output::new(arguments.get::<String>("output"))?;
    let iterations = arguments.get::<usize>("iterations").unwrap_or(1);

    let start = Instant::now();
    let mut missed = 0;
    for iteration in 0..iterations {
        let mut graph = generator.next()?;
        timing.assign(&mut graph)?;
        info!(target: "Mapper", "Iteration {}: {} tasks, {} edges, deadline {}.",
              iteration, graph.len(), graph.edges(), graph.deadline);
        for policy in &policies {
            let outcome = system::evaluate(&graph, &platform, policy)?;
            info!(target: "Mapper", "{:>24} | makespan {:>8} | {}", policy, outcome.makespan,
                  if outcome.missed { "missed" } else { "met" });
            if outcome.missed {
                missed += 1;
            }
            output.next(iteration, policy, &graph, &outcome)?;
        }
    }
    let elapsed = start.elapsed();

    info!(target: "Mapper", "Missed {} deadlines out of {}.", missed,
          iterations * policies.len());
    info!(target: "Mapper", "Well done in {:.2} seconds.",
          elapsed.as_secs() as f64 + elapsed.subsec_nanos() as f64 * 1e-9);

    Ok(())
}

fn help() -> ! {
    println!("{}", USAGE.trim());
    std::process::exit(0);
}

#[allow(unused_must_use)]
fn fail(error: Error) -> ! {
    use std::io::Write;
    if let Some(mut output) = term::stderr() {
        output.fg(term::color::RED);
        write!(output, "Error: {}.\n", error);
        output.reset();
    }
    std::process::exit(1);
}

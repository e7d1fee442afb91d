use std::path::Path;

use mapper::graph::Graph;
use mapper::schedule::Policy;
use mapper::system::Outcome;

use Result;

mod database;
mod null;

use self::database::Database;
use self::null::Null;

pub trait Output {
    fn next(&mut self, iteration: usize, policy: &Policy, graph: &Graph,
            outcome: &Outcome) -> Result<()>;
}

pub fn new<T: AsRef<Path>>(output: Option<T>) -> Result<Box<dyn Output>> {
    let output: Box<dyn Output> = match output {
        Some(output) => Box::new(Database::new(output)?),
        _ => Box::new(Null),
    };
    Ok(output)
}

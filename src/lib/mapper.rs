//! Tool for evaluating task-to-accelerator mapping policies.
//!
//! An application is a dependency graph of CPU-only and GPU-using tasks. The
//! graph is executed over a pool of simulated CPU threads and GPU devices, one
//! tick at a time, and the completion time of the whole graph is reported
//! together with whether the graph deadline is met.

#[cfg(test)]
extern crate assert;

#[macro_use]
extern crate log;

#[macro_use]
extern crate serde_derive;

extern crate probability;
extern crate random;
extern crate serde;
extern crate serde_json;
extern crate toml;

#[macro_use]
mod macros;

mod result;

pub mod config;
pub mod graph;
pub mod platform;
pub mod schedule;
pub mod system;
pub mod timing;

pub use config::Config;
pub use result::{Error, Result};

/// A source of randomness.
pub type Source = random::Default;

/// A point in simulated time.
pub type Tick = u64;

/// Create a source of randomness.
#[inline]
pub fn source(seed: u64) -> Source {
    random::default(seed)
}

/// Create a source of randomness seeded by another one.
///
/// Consumers sharing a seed draw from forks so that their streams do not
/// replay each other.
pub fn fork(source: &mut Source) -> Source {
    use random::Source as Read;
    random::default(source.read::<u64>())
}

//! Execution times and deadlines.

use std::str::FromStr;

use graph::{Graph, Kind};
use random::Source as Read;
use {Error, Result, Source, Tick};

mod random;
mod trace;

pub use self::random::Random;
pub use self::trace::Trace;

/// A source of execution times and deadlines.
pub trait Timing {
    /// Assign stage durations, deadlines, and response times to a graph.
    fn assign(&mut self, graph: &mut Graph) -> Result<()>;
}

/// A way of summarizing repeated measurements.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    /// The smallest value.
    Min,
    /// The rounded mean.
    Avg,
    /// The largest value.
    Max,
}

/// Ranges of the factors used for deadlines.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Deadlines {
    /// The range of task deadlines; GPU-using tasks get ten times as much.
    pub task: (Tick, Tick),
    /// The range of multiples of the total execution time for the graph.
    pub graph: (Tick, Tick),
}

impl Statistic {
    /// Summarize values; an empty set summarizes to zero.
    pub fn apply(&self, values: &[Tick]) -> Tick {
        if values.is_empty() {
            return 0;
        }
        match *self {
            Statistic::Min => values.iter().cloned().min().unwrap_or(0),
            Statistic::Max => values.iter().cloned().max().unwrap_or(0),
            Statistic::Avg => {
                let sum = values.iter().sum::<Tick>() as f64;
                (sum / values.len() as f64).round_ties_even() as Tick
            },
        }
    }
}

impl FromStr for Statistic {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match &*name.to_lowercase() {
            "min" => Ok(Statistic::Min),
            "avg" => Ok(Statistic::Avg),
            "max" => Ok(Statistic::Max),
            _ => raise!("found an unknown statistic ({:?})", name),
        }
    }
}

impl Deadlines {
    /// Check that the ranges are not empty.
    pub fn validate(&self) -> Result<()> {
        if self.task.0 > self.task.1 || self.graph.0 > self.graph.1 {
            raise!("the deadline ranges should be ordered");
        }
        Ok(())
    }

    /// Assign task deadlines, the graph deadline, and response times.
    ///
    /// Stage durations should already be in place.
    pub fn assign(&self, graph: &mut Graph, source: &mut Source) {
        for task in &mut graph.tasks {
            let deadline = uniform(source, self.task.0, self.task.1);
            task.deadline = match task.kind() {
                Kind::Cpu => deadline,
                Kind::Gpu => 10 * deadline,
            };
        }
        let total = graph.execution_time();
        graph.deadline = uniform(source, self.graph.0, self.graph.1) * total;
        for task in &mut graph.tasks {
            task.response_time = if total > 0 {
                let share = task.execution_time() as f64 / total as f64;
                (graph.deadline as f64 * share).round_ties_even() as Tick
            } else {
                0
            };
        }
    }
}

/// Draw an integer uniformly from `[a, b]`.
pub fn uniform(source: &mut Source, a: Tick, b: Tick) -> Tick {
    debug_assert!(a <= b);
    let width = (b - a + 1) as f64;
    a + ((source.read::<f64>() * width).floor() as Tick).min(b - a)
}

#[cfg(test)]
mod tests {
    use graph::tests::chain;
    use graph::{Stages, Work};
    use super::{Deadlines, Statistic};

    #[test]
    fn apply() {
        assert_eq!(Statistic::Min.apply(&[3, 1, 2]), 1);
        assert_eq!(Statistic::Max.apply(&[3, 1, 2]), 3);
        assert_eq!(Statistic::Avg.apply(&[3, 1, 2, 4]), 2);
        assert_eq!(Statistic::Avg.apply(&[3, 4]), 4);
        assert_eq!(Statistic::Avg.apply(&[2, 3]), 2);
        assert_eq!(Statistic::Avg.apply(&[]), 0);
        assert_eq!("MAX".parse::<Statistic>().unwrap(), Statistic::Max);
        assert!("median".parse::<Statistic>().is_err());
    }

    #[test]
    fn uniform() {
        let mut source = ::source(42);
        for _ in 0..1000 {
            let value = super::uniform(&mut source, 2, 4);
            assert!(value >= 2 && value <= 4);
        }
        assert_eq!(super::uniform(&mut source, 7, 7), 7);
    }

    #[test]
    fn assign() {
        let mut graph = chain(2, &[]);
        graph.tasks[0].work = Work::Cpu(3);
        graph.tasks[1].work = Work::Gpu(Stages { cpu1: 1, copy1: 1, gpu: 3, copy2: 1, cpu2: 1 });
        let deadlines = Deadlines { task: (2, 2), graph: (3, 3) };
        deadlines.assign(&mut graph, &mut ::source(42));
        assert_eq!(graph.tasks[0].deadline, 2);
        assert_eq!(graph.tasks[1].deadline, 20);
        assert_eq!(graph.deadline, 30);
        assert_eq!(graph.tasks[0].response_time, 9);
        assert_eq!(graph.tasks[1].response_time, 21);
    }
}

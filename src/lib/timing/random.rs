use random::Source as Read;

use graph::{Graph, Stages, Work};
use timing::{Deadlines, Statistic, Timing};
use {Result, Source, Tick};

/// A model drawing execution times at random.
pub struct Random {
    minimum: Tick,
    maximum: Tick,
    iterations: usize,
    statistic: Statistic,
    deadlines: Deadlines,
    source: Source,
}

impl Random {
    /// Create a model.
    ///
    /// Each duration summarizes `iterations` draws over a range as wide as
    /// `[minimum, maximum]`; GPU-using tasks draw over a ten times wider one.
    pub fn new(minimum: Tick, maximum: Tick, iterations: usize, statistic: Statistic,
               deadlines: Deadlines, source: &mut Source) -> Result<Random> {
        if minimum > maximum {
            raise!("the minimum execution time should not exceed the maximum one");
        }
        if iterations == 0 {
            raise!("at least one iteration is required for execution times");
        }
        deadlines.validate()?;
        Ok(Random {
            minimum: minimum,
            maximum: maximum,
            iterations: iterations,
            statistic: statistic,
            deadlines: deadlines,
            source: ::fork(source),
        })
    }

    fn draw(&mut self, scale: f64) -> Tick {
        let width = (self.maximum - self.minimum) as f64 * scale;
        let source = &mut self.source;
        let values = (0..self.iterations).map(|_| {
            (source.read::<f64>() * width).round_ties_even() as Tick
        }).collect::<Vec<_>>();
        self.statistic.apply(&values)
    }
}

impl Timing for Random {
    fn assign(&mut self, graph: &mut Graph) -> Result<()> {
        for i in 0..graph.tasks.len() {
            let work = match graph.tasks[i].work {
                Work::Cpu(_) => Work::Cpu(self.draw(1.0)),
                Work::Gpu(_) => {
                    let total = self.draw(10.0);
                    let copy = (0.05 * total as f64).round_ties_even() as Tick;
                    let gpu = (0.85 * total as f64).round_ties_even() as Tick;
                    Work::Gpu(Stages::split(total, copy, gpu))
                },
            };
            graph.tasks[i].work = work;
        }
        self.deadlines.assign(graph, &mut self.source);
        info!(target: "Timing", "Assigned a total execution time of {} and a deadline of {}.",
              graph.execution_time(), graph.deadline);
        Ok(())
    }
}

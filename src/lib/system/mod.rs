//! Complete system.

use graph::Graph;
use platform::{Accelerator, Locking, Platform, Queueing, Threads};
use schedule::{Discipline, Policy};
use {Result, Tick};

mod context;
mod history;
mod record;

pub use self::context::Context;
pub use self::history::History;
pub use self::record::{Record, Span, Stage, State};

/// A complete system.
pub struct System<'l, A> where A: Accelerator {
    context: Context<'l>,
    threads: Threads,
    accelerator: A,
    pending: Vec<usize>,
}

/// The result of a run.
#[derive(Clone, Debug)]
pub struct Outcome {
    /// The tick on which the last task completed.
    pub makespan: Tick,
    /// The flag of exceeding the graph deadline.
    pub missed: bool,
    /// The stages executed by each thread in order.
    pub schedules: Vec<Vec<(usize, Stage)>>,
    /// The placements of tasks onto device queues in order.
    pub allocations: Vec<(usize, usize)>,
    /// The records indexed by task identifiers.
    pub records: Vec<Record>,
    /// The statistics.
    pub history: History,
}

impl<'l, A> System<'l, A> where A: Accelerator {
    /// Create a system.
    pub fn new(graph: &'l Graph, threads: Threads, accelerator: A) -> Result<System<'l, A>> {
        graph.validate()?;
        if threads.threads().is_empty() {
            raise!("at least one CPU thread is required");
        }
        if accelerator.devices() == 0 {
            raise!("at least one GPU device is required");
        }
        Ok(System {
            context: Context::new(graph),
            threads: threads,
            accelerator: accelerator,
            pending: (0..graph.len()).collect(),
        })
    }

    /// Advance by one tick.
    ///
    /// The threads are advanced in order, then the devices; the clock moves
    /// on unless the last task has just completed.
    pub fn step(&mut self) {
        if self.context.is_done() {
            return;
        }
        for i in 0..self.threads.threads().len() {
            self.threads.step(i, &mut self.pending, &mut self.context, &mut self.accelerator);
        }
        for i in 0..self.accelerator.devices() {
            if let Some(id) = self.accelerator.step(i, &mut self.context) {
                self.threads.wait(id, &self.context);
            }
        }
        if !self.context.is_done() {
            self.context.time += 1;
        }
    }

    /// Run until every task has completed.
    pub fn run(mut self) -> Outcome {
        while !self.context.is_done() {
            self.step();
        }
        let makespan = self.context.time;
        info!(target: "System", "Completed {} tasks at tick {}.",
              self.context.history.completed, makespan);
        Outcome {
            makespan: makespan,
            missed: makespan > self.context.graph.deadline,
            schedules: self.threads.into_histories(),
            allocations: self.context.allocations,
            records: self.context.records,
            history: self.context.history,
        }
    }

    /// Return the current tick.
    #[inline]
    pub fn time(&self) -> Tick {
        self.context.time
    }

    /// Check if every task has completed.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.context.is_done()
    }

    /// Return the records indexed by task identifiers.
    #[inline]
    pub fn records(&self) -> &[Record] {
        &self.context.records
    }

    /// Return the threads.
    #[inline]
    pub fn threads(&self) -> &Threads {
        &self.threads
    }

    /// Return the devices.
    #[inline]
    pub fn accelerator(&self) -> &A {
        &self.accelerator
    }

    /// List every task held by a queue or a slot.
    pub fn occupancy(&self) -> Vec<usize> {
        let mut ids = self.pending.clone();
        self.threads.occupancy(&mut ids);
        self.accelerator.occupancy(&mut ids);
        ids
    }

    /// Return the length of the queue of each device.
    #[inline]
    pub fn capacities(&self) -> Vec<usize> {
        self.accelerator.lengths()
    }
}

/// Execute a graph on a platform under a policy.
pub fn evaluate(graph: &Graph, platform: &Platform, policy: &Policy) -> Result<Outcome> {
    info!(target: "System", "Evaluating {} on {} threads and {} devices...",
          policy, platform.threads, platform.devices);
    let threads = Threads::new(platform.threads, policy.allocation, policy.dispatch);
    Ok(match policy.discipline {
        Discipline::Locking => System::new(graph, threads, Locking::new(platform))?.run(),
        Discipline::Queueing { selection, placement, ordering } => {
            let accelerator = Queueing::new(platform, selection, placement, ordering);
            System::new(graph, threads, accelerator)?.run()
        },
    })
}

use std::collections::VecDeque;

use platform::Accelerator;
use schedule::{Allocation, Dispatch};
use system::{Context, Stage, State};
use Tick;

/// A CPU thread.
#[derive(Clone, Debug, Default)]
pub struct Thread {
    /// The tasks allocated to the thread and not yet started.
    pub allocation: Vec<usize>,
    /// The task occupying the thread.
    pub slot: Option<usize>,
    /// The tasks back from a device waiting for their final segment.
    pub waiting: VecDeque<usize>,
    /// The tick the slot was last vacated; `None` while the slot is occupied.
    pub last_idle: Option<Tick>,
    /// The stages executed so far in order.
    pub history: Vec<(usize, Stage)>,
}

/// A pool of CPU threads.
pub struct Threads {
    threads: Vec<Thread>,
    allocation: Allocation,
    dispatch: Dispatch,
    cursor: Option<usize>,
}

impl Thread {
    /// Create an idle thread.
    pub fn new() -> Thread {
        Thread { last_idle: Some(0), ..Thread::default() }
    }

    #[inline]
    fn is_idle(&self) -> bool {
        self.allocation.is_empty() && self.last_idle.is_some()
    }
}

impl Threads {
    /// Create a pool.
    pub fn new(count: usize, allocation: Allocation, dispatch: Dispatch) -> Threads {
        Threads {
            threads: (0..count).map(|_| Thread::new()).collect(),
            allocation: allocation,
            dispatch: dispatch,
            cursor: None,
        }
    }

    /// Return the threads.
    #[inline]
    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    /// Advance a thread by one tick.
    ///
    /// The first thread also allocates the ready tasks of the pending pool
    /// once it has advanced its own slot.
    pub fn step<A>(&mut self, index: usize, pending: &mut Vec<usize>, context: &mut Context,
                   accelerator: &mut A) where A: Accelerator
    {
        if let Some(id) = self.threads[index].slot {
            match context.poll(id) {
                Some(State::Cpu1Done) => {
                    self.vacate(index, context.time);
                    accelerator.push(id, context);
                },
                Some(State::CpuDone) | Some(State::Cpu2Done) => self.vacate(index, context.time),
                _ => {},
            }
        }
        if index == 0 {
            self.allocate(pending, context);
        }
        if self.threads[index].slot.is_none() {
            self.dispatch(index, context);
        }
    }

    /// Queue a task back from a device on the thread it was allocated to.
    pub fn wait(&mut self, id: usize, context: &Context) {
        if let Some(index) = context.records[id].thread {
            self.threads[index].waiting.push_back(id);
        }
    }

    /// Append every task held by the pool.
    pub fn occupancy(&self, ids: &mut Vec<usize>) {
        for thread in &self.threads {
            ids.extend(&thread.allocation);
            ids.extend(thread.slot);
            ids.extend(&thread.waiting);
        }
    }

    /// Take the execution histories.
    pub fn into_histories(self) -> Vec<Vec<(usize, Stage)>> {
        self.threads.into_iter().map(|thread| thread.history).collect()
    }

    fn allocate(&mut self, pending: &mut Vec<usize>, context: &mut Context) {
        let mut remaining = Vec::with_capacity(pending.len());
        for id in pending.drain(..) {
            if !context.is_ready(id) {
                remaining.push(id);
                continue;
            }
            let index = match self.threads.iter().position(Thread::is_idle) {
                Some(index) => index,
                _ => {
                    let index = self.allocation.select(&self.threads, context.graph, context.time,
                                                       self.cursor);
                    if self.allocation == Allocation::RoundRobin {
                        self.cursor = Some(index);
                    }
                    index
                },
            };
            trace!(target: "System", "{:>6}: task #{} allocated to thread #{}.",
                   context.time, id, index);
            self.threads[index].allocation.push(id);
            context.records[id].thread = Some(index);
        }
        *pending = remaining;
        let queued = self.threads.iter().map(|thread| thread.allocation.len()).sum();
        context.history.count_cpu(queued);
    }

    fn dispatch(&mut self, index: usize, context: &mut Context) {
        let thread = &mut self.threads[index];
        let id = match thread.waiting.pop_front() {
            Some(id) => id,
            _ if !thread.allocation.is_empty() => {
                let position = self.dispatch.select(&thread.allocation, context.graph);
                thread.allocation.remove(position)
            },
            _ => return,
        };
        if let Some(stage) = context.start(id) {
            thread.slot = Some(id);
            thread.last_idle = None;
            thread.history.push((id, stage));
        }
    }

    fn vacate(&mut self, index: usize, time: Tick) {
        let thread = &mut self.threads[index];
        thread.slot = None;
        thread.last_idle = Some(time);
    }
}

use graph::Graph;
use system::{History, Record, Stage, State};
use Tick;

/// The shared state of a run.
///
/// Resource pools hold task identifiers only; everything else known about a
/// task lives here.
pub struct Context<'l> {
    /// The graph being executed.
    pub graph: &'l Graph,
    /// The records indexed by task identifiers.
    pub records: Vec<Record>,
    /// The current tick.
    pub time: Tick,
    /// The placements of tasks onto device queues in order.
    pub allocations: Vec<(usize, usize)>,
    /// The statistics.
    pub history: History,
}

impl<'l> Context<'l> {
    /// Create a context.
    pub fn new(graph: &'l Graph) -> Context<'l> {
        Context {
            graph: graph,
            records: vec![Record::new(); graph.len()],
            time: 0,
            allocations: vec![],
            history: History::default(),
        }
    }

    /// Check if every dependency of a task has completed.
    pub fn is_ready(&self, id: usize) -> bool {
        self.graph.tasks[id].dependencies.iter().all(|&i| self.records[i].state.is_terminal())
    }

    /// Check if every task has completed.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.history.completed == self.graph.len()
    }

    /// Enter the next stage of a task.
    pub fn start(&mut self, id: usize) -> Option<Stage> {
        let stage = self.records[id].start(&self.graph.tasks[id], self.time);
        if let Some(stage) = stage {
            trace!(target: "System", "{:>6}: task #{} entered {}.", self.time, id, stage);
        }
        stage
    }

    /// Advance the state of a task and count its completion.
    pub fn poll(&mut self, id: usize) -> Option<State> {
        let state = self.records[id].poll(&self.graph.tasks[id], self.time);
        if let Some(state) = state {
            trace!(target: "System", "{:>6}: task #{} is {:?}.", self.time, id, state);
            if state.is_terminal() {
                self.history.completed += 1;
            }
        }
        state
    }

    /// Record that a task went to a device queue.
    pub fn assign(&mut self, id: usize, device: usize) {
        trace!(target: "System", "{:>6}: task #{} queued on device #{}.", self.time, id, device);
        self.records[id].device = Some(device);
        self.allocations.push((id, device));
    }
}

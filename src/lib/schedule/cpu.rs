use graph::Graph;
use platform::Thread;
use schedule::{maximum, minimum};
use Tick;

const ALPHA: f64 = 0.5;
const BETA: f64 = 0.0;
const GAMMA: f64 = 0.5;

const THETA: f64 = 0.4;
const PSI: f64 = 0.6;

heuristic! {
    /// A heuristic choosing the thread that receives a ready task.
    pub enum Allocation {
        /// The thread with the fewest allocated tasks.
        MinQueueLength => ("min-queue-length", "MNTP"),
        /// The thread following the one chosen last.
        RoundRobin => ("round-robin", "NT"),
        /// The thread idle for the longest time, busy ones counting as zero.
        MostRecentlyIdle => ("most-recently-idle", "MRIT"),
        /// The thread with the least allocated execution time.
        MinTotalQueuedExecTime => ("min-total-queued-exec-time", "MTET"),
        /// The thread with the most allocated response time.
        MaxTotalQueuedResponseTime => ("max-total-queued-response-time", "MTRT"),
        /// The thread minimizing a weighted sum of normalized load and idleness.
        WeightedCost => ("weighted-cost", "TMCD"),
    }
}

heuristic! {
    /// A heuristic choosing the task a thread starts from its allocation queue.
    pub enum Dispatch {
        /// The task with the least execution time.
        MinExecTime => ("min-exec-time", "MET"),
        /// The task with the most response time.
        MaxResponseTime => ("max-response-time", "MRT"),
        /// The task minimizing a weighted sum of normalized execution time and
        /// inverse response time.
        WeightedCost => ("weighted-cost", "MCD"),
    }
}

impl Allocation {
    /// Choose a thread.
    ///
    /// `cursor` is the thread chosen last by round robin, if any. Ties go to
    /// the lowest index.
    pub fn select(&self, threads: &[Thread], graph: &Graph, time: Tick,
                  cursor: Option<usize>) -> usize {
        debug_assert!(!threads.is_empty());
        match *self {
            Allocation::MinQueueLength => {
                minimum(threads.iter().map(|thread| thread.allocation.len()))
            },
            Allocation::RoundRobin => match cursor {
                Some(i) => (i + 1) % threads.len(),
                _ => 0,
            },
            Allocation::MostRecentlyIdle => {
                maximum(threads.iter().map(|thread| idle_time(thread, time)))
            },
            Allocation::MinTotalQueuedExecTime => {
                minimum(threads.iter().map(|thread| queued_execution_time(thread, graph)))
            },
            Allocation::MaxTotalQueuedResponseTime => {
                maximum(threads.iter().map(|thread| queued_response_time(thread, graph)))
            },
            Allocation::WeightedCost => minimum(thread_costs(threads, graph, time).into_iter()),
        }
    }
}

impl Dispatch {
    /// Choose a position in a nonempty allocation queue.
    pub fn select(&self, queue: &[usize], graph: &Graph) -> usize {
        debug_assert!(!queue.is_empty());
        let tasks = &graph.tasks;
        match *self {
            Dispatch::MinExecTime => minimum(queue.iter().map(|&id| tasks[id].execution_time())),
            Dispatch::MaxResponseTime => maximum(queue.iter().map(|&id| tasks[id].response_time)),
            Dispatch::WeightedCost => minimum(task_costs(queue, graph).into_iter()),
        }
    }
}

fn idle_time(thread: &Thread, time: Tick) -> Tick {
    match thread.last_idle {
        Some(last) => time.saturating_sub(last),
        _ => 0,
    }
}

fn queued_execution_time(thread: &Thread, graph: &Graph) -> Tick {
    thread.allocation.iter().map(|&id| graph.tasks[id].execution_time()).sum()
}

fn queued_response_time(thread: &Thread, graph: &Graph) -> Tick {
    thread.allocation.iter().map(|&id| graph.tasks[id].response_time).sum()
}

fn thread_costs(threads: &[Thread], graph: &Graph, time: Tick) -> Vec<f64> {
    let idle = threads.iter().map(|thread| idle_time(thread, time)).collect::<Vec<_>>();
    let execution = threads.iter().map(|thread| queued_execution_time(thread, graph))
                           .collect::<Vec<_>>();
    let total_length = nonzero(threads.iter().map(|thread| thread.allocation.len() as Tick).sum());
    let total_idle = nonzero(idle.iter().sum());
    let total_execution = nonzero(execution.iter().sum());
    threads.iter().enumerate().map(|(i, thread)| {
        let idleness = if idle[i] > 0 { total_idle / idle[i] as f64 } else { 0.0 };
        ALPHA * thread.allocation.len() as f64 / total_length +
            BETA * idleness + GAMMA * execution[i] as f64 / total_execution
    }).collect()
}

fn task_costs(queue: &[usize], graph: &Graph) -> Vec<f64> {
    let tasks = &graph.tasks;
    let total_execution = nonzero(queue.iter().map(|&id| tasks[id].execution_time()).sum());
    let total_response = nonzero(queue.iter().map(|&id| tasks[id].response_time).sum());
    queue.iter().map(|&id| {
        let task = &tasks[id];
        let urgency = if task.response_time > 0 {
            total_response / task.response_time as f64
        } else {
            ::std::f64::INFINITY
        };
        THETA * task.execution_time() as f64 / total_execution + PSI * urgency
    }).collect()
}

#[inline]
fn nonzero(total: Tick) -> f64 {
    if total == 0 { 1.0 } else { total as f64 }
}

use graph::Graph;
use schedule::{maximum, minimum};

const EXECUTION_WEIGHT: f64 = 0.4;
const DESCENDANT_WEIGHT: f64 = 0.6;

const LENGTH_WEIGHT: f64 = 0.3;
const GPU_WEIGHT: f64 = 0.7;

heuristic! {
    /// A heuristic choosing a task from a GPU-side queue.
    pub enum Selection {
        /// The task with the shortest kernel.
        LeastGpuTime => ("least-gpu-time", "LET"),
        /// The task with the most descendants.
        MaxDescendantCount => ("max-descendant-count", "MNAOT"),
        /// The task minimizing a weighted sum of its kernel duration and the
        /// inverse of its descendant count.
        WeightedSum => ("weighted-sum", "WSM"),
    }
}

heuristic! {
    /// A heuristic choosing the local queue that receives a task.
    pub enum Placement {
        /// The queue holding the fewest tasks.
        MinJobCount => ("min-job-count", "MNJ"),
        /// The queue holding the least kernel time.
        MinTotalGpuTime => ("min-total-gpu-time", "LTET"),
        /// The queue minimizing a weighted sum of its length and kernel time.
        WeightedSum => ("weighted-sum", "WSM"),
    }
}

impl Selection {
    /// Choose a position in a nonempty queue.
    pub fn select(&self, queue: &[usize], graph: &Graph) -> usize {
        debug_assert!(!queue.is_empty());
        let tasks = &graph.tasks;
        match *self {
            Selection::LeastGpuTime => minimum(queue.iter().map(|&id| tasks[id].gpu_time())),
            Selection::MaxDescendantCount => maximum(queue.iter().map(|&id| tasks[id].descendants)),
            Selection::WeightedSum => minimum(queue.iter().map(|&id| task_cost(graph, id))),
        }
    }
}

impl Placement {
    /// Choose a device among nonempty `candidates` given the local queues of
    /// all devices.
    pub fn select(&self, candidates: &[usize], queues: &[Vec<usize>], graph: &Graph) -> usize {
        debug_assert!(!candidates.is_empty());
        let gpu_time = |device: usize| -> u64 {
            queues[device].iter().map(|&id| graph.tasks[id].gpu_time()).sum()
        };
        let position = match *self {
            Placement::MinJobCount => minimum(candidates.iter().map(|&i| queues[i].len())),
            Placement::MinTotalGpuTime => minimum(candidates.iter().map(|&i| gpu_time(i))),
            Placement::WeightedSum => minimum(candidates.iter().map(|&i| {
                LENGTH_WEIGHT * queues[i].len() as f64 + GPU_WEIGHT * gpu_time(i) as f64
            })),
        };
        candidates[position]
    }
}

/// Return the position of the task with the earliest deadline in a nonempty
/// pool; ties go to the lowest identifier.
pub fn earliest_deadline(pool: &[usize], graph: &Graph) -> usize {
    debug_assert!(!pool.is_empty());
    minimum(pool.iter().map(|&id| (graph.tasks[id].deadline, id)))
}

fn task_cost(graph: &Graph, id: usize) -> f64 {
    let task = &graph.tasks[id];
    let inverse = if task.descendants > 0 { 1.0 / task.descendants as f64 } else { 1.0 };
    EXECUTION_WEIGHT * task.gpu_time() as f64 + DESCENDANT_WEIGHT * inverse
}

//! Task graphs.

use std::fmt;

use {Result, Tick};

mod predefined;
mod random;

pub use self::predefined::Predefined;
pub use self::random::Random;

/// A source of task graphs.
pub trait Generator {
    /// Produce the next graph.
    ///
    /// The tasks of the graph have their kinds, dependencies, and descendant
    /// counts set; timing is assigned separately.
    fn next(&mut self) -> Result<Graph>;
}

/// A task graph.
#[derive(Clone, Debug)]
pub struct Graph {
    /// The tasks indexed by their identifiers.
    pub tasks: Vec<Task>,
    /// The deadline of the whole graph.
    pub deadline: Tick,
    /// The GPU-using tasks in the order they were listed.
    pub gpu_tasks: Vec<usize>,
}

/// A task.
#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    /// The identifier, which is also the position in the graph.
    pub id: usize,
    /// The work to be done.
    pub work: Work,
    /// The tasks whose completion gates the readiness of this one.
    pub dependencies: Vec<usize>,
    /// The number of tasks transitively depending on this one.
    pub descendants: usize,
    /// The deadline used by earliest-deadline-first selection.
    pub deadline: Tick,
    /// The target response time used by some heuristics.
    pub response_time: Tick,
}

/// The type of a task.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    /// A task executing only on a CPU thread.
    Cpu,
    /// A task offloading a kernel to a GPU device.
    Gpu,
}

/// The work of a task.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Work {
    /// A single CPU segment.
    Cpu(Tick),
    /// Five consecutive segments.
    Gpu(Stages),
}

/// The segments of a GPU-using task.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Stages {
    /// The initial CPU segment.
    pub cpu1: Tick,
    /// The host-to-device copy.
    pub copy1: Tick,
    /// The kernel.
    pub gpu: Tick,
    /// The device-to-host copy.
    pub copy2: Tick,
    /// The final CPU segment.
    pub cpu2: Tick,
}

impl Graph {
    /// Create a graph listing its GPU-using tasks in identifier order.
    pub fn new(tasks: Vec<Task>, deadline: Tick) -> Result<Graph> {
        let gpu_tasks = tasks.iter().filter(|task| task.kind() == Kind::Gpu)
                                    .map(|task| task.id).collect();
        let graph = Graph { tasks: tasks, deadline: deadline, gpu_tasks: gpu_tasks };
        graph.validate()?;
        Ok(graph)
    }

    /// Set the order in which GPU-using tasks are listed.
    ///
    /// Every GPU-using task should be listed exactly once.
    pub fn list(&mut self, gpu_tasks: Vec<usize>) -> Result<()> {
        let mut listed = vec![false; self.tasks.len()];
        for &id in &gpu_tasks {
            if id >= self.tasks.len() || self.tasks[id].kind() != Kind::Gpu || listed[id] {
                raise!("the GPU-using task #{} is listed wrongly", id);
            }
            listed[id] = true;
        }
        if gpu_tasks.len() != self.gpu_tasks.len() {
            raise!("found {} GPU-using tasks but {} listed", self.gpu_tasks.len(), gpu_tasks.len());
        }
        self.gpu_tasks = gpu_tasks;
        Ok(())
    }

    /// Check that identifiers are positions and that dependencies refer to
    /// tasks of the graph.
    pub fn validate(&self) -> Result<()> {
        let count = self.tasks.len();
        for (i, task) in self.tasks.iter().enumerate() {
            if task.id != i {
                raise!("found task #{} at position {}", task.id, i);
            }
            for &dependency in &task.dependencies {
                if dependency >= count {
                    raise!("task #{} depends on task #{}, which does not exist", i, dependency);
                }
                if dependency == i {
                    raise!("task #{} depends on itself", i);
                }
            }
        }
        Ok(())
    }

    /// Return the number of tasks.
    #[inline]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Check if there are no tasks.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Return the number of dependency edges.
    pub fn edges(&self) -> usize {
        self.tasks.iter().map(|task| task.dependencies.len()).sum()
    }

    /// Return the total execution time of all tasks.
    pub fn execution_time(&self) -> Tick {
        self.tasks.iter().map(|task| task.execution_time()).sum()
    }

    /// Return the outgoing edges of each task.
    pub fn successors(&self) -> Vec<Vec<usize>> {
        let mut successors = vec![vec![]; self.tasks.len()];
        for task in &self.tasks {
            for &dependency in &task.dependencies {
                if !successors[dependency].contains(&task.id) {
                    successors[dependency].push(task.id);
                }
            }
        }
        successors
    }

    /// Count the tasks reachable from a task through outgoing edges.
    pub fn descendants(&self, id: usize) -> usize {
        reach(&self.successors(), id)
    }

    /// Set the descendant count of every task.
    pub fn count_descendants(&mut self) {
        let successors = self.successors();
        for task in &mut self.tasks {
            task.descendants = reach(&successors, task.id);
        }
    }
}

impl Task {
    /// Create a task with no work, dependencies, or deadlines.
    pub fn new(id: usize, kind: Kind) -> Task {
        Task {
            id: id,
            work: match kind {
                Kind::Cpu => Work::Cpu(0),
                Kind::Gpu => Work::Gpu(Stages::default()),
            },
            dependencies: vec![],
            descendants: 0,
            deadline: 0,
            response_time: 0,
        }
    }

    /// Return the type.
    #[inline]
    pub fn kind(&self) -> Kind {
        match self.work {
            Work::Cpu(_) => Kind::Cpu,
            Work::Gpu(_) => Kind::Gpu,
        }
    }

    /// Return the total execution time.
    #[inline]
    pub fn execution_time(&self) -> Tick {
        match self.work {
            Work::Cpu(duration) => duration,
            Work::Gpu(ref stages) => stages.total(),
        }
    }

    /// Return the duration of the kernel, which is zero for CPU-only tasks.
    #[inline]
    pub fn gpu_time(&self) -> Tick {
        match self.work {
            Work::Cpu(_) => 0,
            Work::Gpu(ref stages) => stages.gpu,
        }
    }
}

impl Stages {
    /// Split a total execution time given the copy and kernel durations.
    ///
    /// The remainder, taken in absolute value, is shared equally by the two
    /// CPU segments.
    pub fn split(total: Tick, copy: Tick, gpu: Tick) -> Stages {
        let offloaded = 2 * copy + gpu;
        let remainder = if total > offloaded { total - offloaded } else { offloaded - total };
        let cpu = (remainder as f64 / 2.0).round_ties_even() as Tick;
        Stages { cpu1: cpu, copy1: copy, gpu: gpu, copy2: copy, cpu2: cpu }
    }

    /// Return the sum of all segments.
    #[inline]
    pub fn total(&self) -> Tick {
        self.cpu1 + self.copy1 + self.gpu + self.copy2 + self.cpu2
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Kind::Cpu => write!(formatter, "CPU-only"),
            Kind::Gpu => write!(formatter, "GPU-using"),
        }
    }
}

fn reach(successors: &[Vec<usize>], id: usize) -> usize {
    let mut visited = vec![false; successors.len()];
    let mut stack = successors[id].clone();
    let mut count = 0;
    while let Some(next) = stack.pop() {
        if visited[next] {
            continue;
        }
        visited[next] = true;
        count += 1;
        stack.extend(successors[next].iter().filter(|&&other| !visited[other]));
    }
    count
}

#[cfg(test)]
pub mod tests {
    use super::{Graph, Kind, Stages, Task, Work};

    /// Build a graph of CPU-only tasks from (task, dependency) pairs.
    pub fn chain(count: usize, edges: &[(usize, usize)]) -> Graph {
        let mut tasks = (0..count).map(|i| Task::new(i, Kind::Cpu)).collect::<Vec<_>>();
        for &(task, dependency) in edges {
            tasks[task].dependencies.push(dependency);
        }
        Graph::new(tasks, 0).unwrap()
    }

    #[test]
    fn validate() {
        let mut tasks = vec![Task::new(0, Kind::Cpu), Task::new(1, Kind::Cpu)];
        tasks[1].dependencies.push(2);
        assert!(Graph::new(tasks.clone(), 0).is_err());

        tasks[1].dependencies = vec![1];
        assert!(Graph::new(tasks.clone(), 0).is_err());

        tasks[1].dependencies = vec![0];
        assert!(Graph::new(tasks.clone(), 0).is_ok());

        tasks.swap(0, 1);
        assert!(Graph::new(tasks, 0).is_err());
    }

    #[test]
    fn list() {
        let tasks = vec![Task::new(0, Kind::Gpu), Task::new(1, Kind::Cpu),
                         Task::new(2, Kind::Gpu)];
        let mut graph = Graph::new(tasks, 0).unwrap();
        assert_eq!(graph.gpu_tasks, vec![0, 2]);
        graph.list(vec![2, 0]).unwrap();
        assert_eq!(graph.gpu_tasks, vec![2, 0]);
        assert!(graph.list(vec![2, 1]).is_err());
        assert!(graph.list(vec![2, 2]).is_err());
        assert!(graph.list(vec![2]).is_err());
        assert!(graph.list(vec![2, 0, 3]).is_err());
    }

    #[test]
    fn descendants() {
        // 0 -> 1 -> 3, 0 -> 2 -> 3, 3 -> 4, 5 alone
        let mut graph = chain(6, &[(1, 0), (2, 0), (3, 1), (3, 2), (4, 3)]);
        graph.count_descendants();
        let counts = graph.tasks.iter().map(|task| task.descendants).collect::<Vec<_>>();
        assert_eq!(counts, vec![4, 2, 2, 1, 0, 0]);
        assert_eq!(graph.descendants(1), 2);
        assert_eq!(graph.edges(), 5);
    }

    #[test]
    fn execution_time() {
        let mut task = Task::new(0, Kind::Gpu);
        task.work = Work::Gpu(Stages { cpu1: 1, copy1: 1, gpu: 3, copy2: 1, cpu2: 1 });
        assert_eq!(task.kind(), Kind::Gpu);
        assert_eq!(task.execution_time(), 7);
        assert_eq!(task.gpu_time(), 3);

        let task = Task { work: Work::Cpu(4), ..Task::new(1, Kind::Cpu) };
        assert_eq!(task.execution_time(), 4);
        assert_eq!(task.gpu_time(), 0);
    }

    #[test]
    fn split() {
        assert_eq!(Stages::split(100, 5, 85), Stages { cpu1: 2, copy1: 5, gpu: 85, copy2: 5, cpu2: 2 });
        assert_eq!(Stages::split(10, 5, 5), Stages { cpu1: 2, copy1: 5, gpu: 5, copy2: 5, cpu2: 2 });
        assert_eq!(Stages::split(20, 2, 10), Stages { cpu1: 3, copy1: 2, gpu: 10, copy2: 2, cpu2: 3 });
        assert_eq!(Stages::split(17, 2, 10), Stages { cpu1: 2, copy1: 2, gpu: 10, copy2: 2, cpu2: 2 });
    }
}

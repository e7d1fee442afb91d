use probability::distribution::{Categorical, Sample};
use random::Source as Read;

use graph::{Generator, Graph, Kind, Task};
use {Result, Source};

/// A generator of random acyclic graphs.
pub struct Random {
    tasks: usize,
    gpu_probability: f64,
    dependency_probability: f64,
    source: Source,
}

impl Random {
    /// Create a generator.
    ///
    /// `tasks` bounds the number of tasks, `gpu_probability` drives the share
    /// of GPU-using tasks, and `dependency_probability` is the chance of each
    /// admissible edge.
    pub fn new(tasks: usize, gpu_probability: f64, dependency_probability: f64,
               source: &mut Source) -> Result<Random> {
        if !(0.0..=1.0).contains(&gpu_probability) {
            raise!("the GPU probability should be in [0, 1]");
        }
        if !(0.0..=1.0).contains(&dependency_probability) {
            raise!("the dependency probability should be in [0, 1]");
        }
        Ok(Random {
            tasks: tasks,
            gpu_probability: gpu_probability,
            dependency_probability: dependency_probability,
            source: ::fork(source),
        })
    }

    fn counts(&self) -> (usize, usize) {
        let maximum = self.tasks as f64;
        let gpu = (maximum * self.gpu_probability / 10.0).round_ties_even() as usize;
        let cpu = (maximum - maximum * self.gpu_probability).round_ties_even() as usize;
        (cpu, gpu)
    }
}

impl Generator for Random {
    fn next(&mut self) -> Result<Graph> {
        let (cpu, gpu) = self.counts();
        let count = cpu + gpu;

        let mut gpu_tasks = Vec::with_capacity(gpu);
        if count > 0 {
            let distribution = Categorical::new(&vec![1.0 / count as f64; count]);
            while gpu_tasks.len() < gpu {
                let id = distribution.sample(&mut self.source);
                if !gpu_tasks.contains(&id) {
                    gpu_tasks.push(id);
                }
            }
        }

        let mut pairs = vec![];
        for i in 0..count {
            for j in 0..i {
                if self.source.read::<f64>() < self.dependency_probability {
                    pairs.push((i, j));
                }
            }
        }

        let graph = construct(count, &gpu_tasks, &pairs)?;
        info!(target: "Graph", "Generated {} tasks, {} GPU-using, and {} edges.",
              count, gpu, graph.edges());
        Ok(graph)
    }
}

/// Assemble a graph from `(i, j)` pairs meaning that `j` depends on `i`, and
/// count the descendants of its tasks.
pub fn construct(count: usize, gpu_tasks: &[usize], pairs: &[(usize, usize)]) -> Result<Graph> {
    let mut tasks = (0..count).map(|i| {
        Task::new(i, if gpu_tasks.contains(&i) { Kind::Gpu } else { Kind::Cpu })
    }).collect::<Vec<_>>();
    for &(i, j) in pairs {
        if i >= count || j >= count {
            raise!("the edge from #{} to #{} is outside the graph", i, j);
        }
        tasks[j].dependencies.push(i);
    }
    let mut graph = Graph::new(tasks, 0)?;
    graph.list(gpu_tasks.to_vec())?;
    graph.count_descendants();
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use graph::predefined;
    use graph::{Generator, Kind};
    use super::Random;

    const REFERENCE: &'static [(usize, usize)] = &[
        (7, 5), (7, 6), (6, 4), (5, 4), (4, 3), (4, 2), (3, 1), (2, 1), (1, 0),
    ];

    #[test]
    fn construct() {
        let graph = super::construct(8, &[2, 5, 6], REFERENCE).unwrap();
        let counts = graph.tasks.iter().map(|task| task.descendants).collect::<Vec<_>>();
        assert_eq!(counts, vec![0, 1, 2, 2, 4, 5, 5, 7]);
    }

    #[test]
    fn agree_with_predefined() {
        let lines = predefined::parse_edges(&::std::fs::read_to_string("tests/fixtures/reference.dot")
                                                .unwrap()).unwrap();
        let gpu_tasks = predefined::parse_gpu_tasks(&::std::fs::read_to_string(
                            "tests/fixtures/reference_gpu.dat").unwrap()).unwrap();
        let one = predefined::construct(&lines, &gpu_tasks).unwrap();
        let other = super::construct(8, &gpu_tasks, REFERENCE).unwrap();
        assert_eq!(one.tasks, other.tasks);
    }

    #[test]
    fn next() {
        let mut generator = Random::new(100, 0.5, 0.1, &mut ::source(42)).unwrap();
        let graph = generator.next().unwrap();
        assert_eq!(graph.len(), 50 + 5);
        assert_eq!(graph.tasks.iter().filter(|task| task.kind() == Kind::Gpu).count(), 5);
        assert_eq!(graph.gpu_tasks.len(), 5);
        for task in &graph.tasks {
            assert!(task.dependencies.iter().all(|&dependency| dependency > task.id));
        }

        let mut generator = Random::new(100, 0.5, 0.1, &mut ::source(42)).unwrap();
        let other = generator.next().unwrap();
        assert_eq!(graph.tasks, other.tasks);
    }

    #[test]
    fn counts() {
        let mut source = ::source(42);
        assert_eq!(Random::new(50, 0.5, 0.0, &mut source).unwrap().next().unwrap().len(), 25 + 2);
        assert_eq!(Random::new(70, 0.5, 0.0, &mut source).unwrap().next().unwrap().len(), 35 + 4);
    }

    #[test]
    fn new() {
        let mut source = ::source(42);
        assert!(Random::new(10, 1.5, 0.1, &mut source).is_err());
        assert!(Random::new(10, 0.5, -0.1, &mut source).is_err());
    }
}

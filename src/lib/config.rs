//! Configuration.

use std::fs;
use std::path::{Path, PathBuf};

use graph::{self, Generator};
use platform;
use schedule::{self, Allocation, Discipline, Dispatch};
use timing::{self, Deadlines, Statistic};
use {Result, Source, Tick};

/// A configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// The seed of the random number generator; zero asks for a fresh one.
    #[serde(default)]
    pub seed: u64,
    /// The resource pools.
    pub platform: Platform,
    /// The source of graphs.
    pub graph: Graph,
    /// The source of execution times.
    pub timing: Timing,
    /// The policies to evaluate.
    #[serde(default)]
    pub policies: Vec<Policy>,
    #[serde(skip)]
    root: Option<PathBuf>,
}

/// The configuration of the resource pools.
#[derive(Clone, Debug, Deserialize)]
pub struct Platform {
    pub threads: usize,
    pub devices: usize,
    pub capacity: Option<usize>,
}

/// The configuration of the source of graphs.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Graph {
    /// Random acyclic graphs.
    Random {
        tasks: usize,
        gpu_probability: f64,
        dependency_probability: f64,
    },
    /// A graph read from an edge list and a list of GPU-using tasks.
    Predefined {
        edges: String,
        gpu_tasks: String,
    },
}

/// The configuration of the source of execution times.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Timing {
    /// Random execution times.
    Random {
        minimum: Tick,
        maximum: Tick,
        iterations: usize,
        statistic: Statistic,
        task_deadline: (Tick, Tick),
        graph_deadline: (Tick, Tick),
    },
    /// Execution times taken from traces.
    Trace {
        executions: String,
        kernels: String,
        statistic: Statistic,
        task_deadline: (Tick, Tick),
        graph_deadline: (Tick, Tick),
    },
}

/// The configuration of a policy.
#[derive(Clone, Debug, Deserialize)]
pub struct Policy {
    pub allocation: Allocation,
    pub dispatch: Dispatch,
    pub accelerator: String,
    pub selection: Option<String>,
    pub placement: Option<String>,
    pub ordering: Option<String>,
}

impl Config {
    /// Read a configuration file.
    ///
    /// Relative paths inside the file are resolved against its directory.
    pub fn new<T: AsRef<Path>>(path: T) -> Result<Config> {
        let path = path.as_ref();
        let content = ok!(fs::read_to_string(path));
        Config::parse(&content, path.parent())
    }

    /// Parse a configuration with relative paths resolved against `root`.
    pub fn parse(content: &str, root: Option<&Path>) -> Result<Config> {
        let mut config: Config = ok!(::toml::from_str(content));
        config.root = root.map(Path::to_path_buf);
        config.platform()?;
        if config.policies.is_empty() {
            raise!("at least one policy is required");
        }
        config.policies()?;
        Ok(config)
    }

    /// Create the description of the resource pools.
    pub fn platform(&self) -> Result<platform::Platform> {
        let Platform { threads, devices, capacity } = self.platform;
        platform::Platform::new(threads, devices, capacity)
    }

    /// Create the source of graphs.
    pub fn generator(&self, source: &mut Source) -> Result<Box<dyn Generator>> {
        let root = self.root.as_ref().map(PathBuf::as_path);
        let generator: Box<dyn Generator> = match self.graph {
            Graph::Random { tasks, gpu_probability, dependency_probability } => {
                Box::new(graph::Random::new(tasks, gpu_probability, dependency_probability,
                                            source)?)
            },
            Graph::Predefined { ref edges, ref gpu_tasks } => {
                let edges = path!(root, edges, "edge list");
                let gpu_tasks = path!(root, gpu_tasks, "list of GPU-using tasks");
                Box::new(graph::Predefined::new(edges, gpu_tasks)?)
            },
        };
        Ok(generator)
    }

    /// Create the source of execution times.
    pub fn timing(&self, source: &mut Source) -> Result<Box<dyn timing::Timing>> {
        let root = self.root.as_ref().map(PathBuf::as_path);
        let model: Box<dyn timing::Timing> = match self.timing {
            Timing::Random { minimum, maximum, iterations, statistic, task_deadline,
                             graph_deadline } => {
                let deadlines = Deadlines { task: task_deadline, graph: graph_deadline };
                Box::new(timing::Random::new(minimum, maximum, iterations, statistic, deadlines,
                                             source)?)
            },
            Timing::Trace { ref executions, ref kernels, statistic, task_deadline,
                            graph_deadline } => {
                let executions = path!(root, executions, "execution trace");
                let kernels = path!(root, kernels, "GPU trace");
                let deadlines = Deadlines { task: task_deadline, graph: graph_deadline };
                Box::new(timing::Trace::new(executions, kernels, statistic, deadlines, source)?)
            },
        };
        Ok(model)
    }

    /// Create the policies.
    pub fn policies(&self) -> Result<Vec<schedule::Policy>> {
        self.policies.iter().map(|policy| {
            let discipline = Discipline::new(&policy.accelerator,
                                             policy.selection.as_ref().map(String::as_str),
                                             policy.placement.as_ref().map(String::as_str),
                                             policy.ordering.as_ref().map(String::as_str))?;
            Ok(schedule::Policy {
                allocation: policy.allocation,
                dispatch: policy.dispatch,
                discipline: discipline,
            })
        }).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use schedule::{Allocation, Discipline, Dispatch, Placement, Selection};
    use super::Config;

    const RANDOM: &'static str = r#"
        seed = 42

        [platform]
        threads = 4
        devices = 2

        [graph]
        kind = "random"
        tasks = 50
        gpu_probability = 0.5
        dependency_probability = 0.1

        [timing]
        kind = "random"
        minimum = 1
        maximum = 10
        iterations = 3
        statistic = "avg"
        task_deadline = [1, 5]
        graph_deadline = [1, 2]

        [[policies]]
        allocation = "round-robin"
        dispatch = "MCD"
        accelerator = "locking"
    "#;

    #[test]
    fn parse() {
        let config = Config::parse(RANDOM, None).unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.platform().unwrap().capacity, 2);
        let policies = config.policies().unwrap();
        assert_eq!(policies.len(), 1);
        assert_eq!(policies[0].allocation, Allocation::RoundRobin);
        assert_eq!(policies[0].dispatch, Dispatch::WeightedCost);
        assert_eq!(policies[0].discipline, Discipline::Locking);

        let mut source = ::source(config.seed);
        let mut graph = config.generator(&mut source).unwrap().next().unwrap();
        assert_eq!(graph.len(), 25 + 2);
        config.timing(&mut source).unwrap().assign(&mut graph).unwrap();
        assert!(graph.deadline > 0);
    }

    #[test]
    fn invalid() {
        assert!(Config::parse(&RANDOM.replace("threads = 4", "threads = 0"), None).is_err());
        assert!(Config::parse(&RANDOM.replace("devices = 2", "devices = 0"), None).is_err());
        assert!(Config::parse(&RANDOM.replace("round-robin", "round-about"), None).is_err());
        assert!(Config::parse(&RANDOM.replace("\"locking\"", "\"queueing\""), None).is_err());
        assert!(Config::parse(&RANDOM.replace("kind = \"random\"\n        tasks",
                                              "kind = \"fractal\"\n        tasks"), None).is_err());
        let config = RANDOM.replace("[[policies]]", "[[other]]");
        assert!(Config::parse(&config, None).is_err());
    }

    #[test]
    fn new() {
        let config = Config::new("tests/fixtures/mapper.toml").unwrap();
        let policies = config.policies().unwrap();
        assert_eq!(policies.len(), 2);
        assert_eq!(policies[1].discipline, Discipline::Queueing {
            selection: Selection::WeightedSum,
            placement: Placement::MinJobCount,
            ordering: Selection::MaxDescendantCount,
        });

        let mut source = ::source(config.seed);
        let mut graph = config.generator(&mut source).unwrap().next().unwrap();
        config.timing(&mut source).unwrap().assign(&mut graph).unwrap();
        assert_eq!(graph.len(), 8);
        assert_eq!(graph.execution_time(), 5 + 4 + 20 + 6 + 7 + 18 + 14 + 2);

        let platform = config.platform().unwrap();
        for policy in &policies {
            let outcome = ::system::evaluate(&graph, &platform, policy).unwrap();
            assert_eq!(outcome.history.completed, 8);
            assert_eq!(outcome.allocations.len(), 3);
        }

        let root = Path::new("tests");
        let config = Config::parse(&::std::fs::read_to_string("tests/fixtures/mapper.toml")
                                        .unwrap(), Some(root)).unwrap();
        assert!(config.generator(&mut source).is_err());
    }
}

use std::fs;
use std::path::Path;

use graph::{Generator, Graph, Kind, Task};
use Result;

/// A graph read from a benchmark description.
pub struct Predefined {
    graph: Graph,
}

impl Predefined {
    /// Read a graph from an edge list and a list of GPU-using tasks.
    pub fn new<T: AsRef<Path>, U: AsRef<Path>>(edges: T, gpu_tasks: U) -> Result<Predefined> {
        info!(target: "Graph", "Reading {:?}...", edges.as_ref());
        let edges = parse_edges(&ok!(fs::read_to_string(edges)))?;
        let gpu_tasks = parse_gpu_tasks(&ok!(fs::read_to_string(gpu_tasks)))?;
        let graph = construct(&edges, &gpu_tasks)?;
        info!(target: "Graph", "Found {} tasks, {} GPU-using, and {} edges.",
              graph.len(), gpu_tasks.len(), graph.edges());
        Ok(Predefined { graph: graph })
    }
}

impl Generator for Predefined {
    #[inline]
    fn next(&mut self) -> Result<Graph> {
        Ok(self.graph.clone())
    }
}

/// A line of an edge list.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Line {
    /// A task without edges.
    Task(usize),
    /// An edge from a task to a task depending on it.
    Edge(usize, usize),
}

/// Parse an edge list of `a->b` lines, where `b` depends on `a`.
pub fn parse_edges(content: &str) -> Result<Vec<Line>> {
    let mut lines = vec![];
    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let ids = line.split("->").map(|id| id.trim().parse::<usize>()).collect::<Vec<_>>();
        match &ids[..] {
            &[Ok(id)] => lines.push(Line::Task(id)),
            &[Ok(from), Ok(to)] => lines.push(Line::Edge(from, to)),
            _ => raise!("failed to parse line {} of the edge list ({:?})", number + 1, line),
        }
    }
    Ok(lines)
}

/// Parse a list of GPU-using tasks given as ids or inclusive `a-b` ranges.
pub fn parse_gpu_tasks(content: &str) -> Result<Vec<usize>> {
    let mut ids = vec![];
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let bounds = line.split('-').map(|id| id.trim().parse::<usize>()).collect::<Vec<_>>();
        match &bounds[..] {
            &[Ok(id)] => ids.push(id),
            &[Ok(from), Ok(to)] if from <= to => ids.extend(from..(to + 1)),
            _ => raise!("failed to parse a GPU-using task ({:?})", line),
        }
    }
    Ok(ids)
}

/// Assemble a graph and count the descendants of its tasks.
pub fn construct(lines: &[Line], gpu_tasks: &[usize]) -> Result<Graph> {
    let count = lines.iter().map(|line| match *line {
        Line::Task(id) => id,
        Line::Edge(from, to) => from.max(to),
    }).max().map(|id| id + 1).unwrap_or(0);

    let mut tasks = (0..count).map(|i| {
        Task::new(i, if gpu_tasks.contains(&i) { Kind::Gpu } else { Kind::Cpu })
    }).collect::<Vec<_>>();
    for line in lines {
        if let Line::Edge(from, to) = *line {
            if !tasks[to].dependencies.contains(&from) {
                tasks[to].dependencies.push(from);
            }
        }
    }
    for &id in gpu_tasks {
        if id >= count {
            raise!("the GPU-using task #{} is not a part of the graph", id);
        }
    }

    let mut graph = Graph::new(tasks, 0)?;
    let mut order = Vec::with_capacity(gpu_tasks.len());
    for &id in gpu_tasks {
        if !order.contains(&id) {
            order.push(id);
        }
    }
    graph.list(order)?;
    graph.count_descendants();
    Ok(graph)
}

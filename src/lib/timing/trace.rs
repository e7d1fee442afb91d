use serde_json::Value;
use std::fs;
use std::path::Path;

use graph::{Graph, Kind, Stages, Work};
use timing::{Deadlines, Statistic, Timing};
use {Result, Source, Tick};

/// A model reading execution times from traces of real runs.
pub struct Trace {
    executions: Vec<Vec<Tick>>,
    copies: Vec<Tick>,
    kernels: Vec<Tick>,
    statistic: Statistic,
    deadlines: Deadlines,
    source: Source,
}

impl Trace {
    /// Read an execution trace in JSON and a GPU trace in CSV.
    pub fn new<T: AsRef<Path>, U: AsRef<Path>>(executions: T, gpu: U, statistic: Statistic,
                                               deadlines: Deadlines, source: &mut Source)
                                               -> Result<Trace> {
        deadlines.validate()?;
        info!(target: "Timing", "Reading {:?}...", executions.as_ref());
        let executions = read_executions(&ok!(fs::read_to_string(executions)))?;
        info!(target: "Timing", "Reading {:?}...", gpu.as_ref());
        let (copies, kernels) = read_gpu(&ok!(fs::read_to_string(gpu)))?;
        info!(target: "Timing", "Found {} tasks, {} memory copies, and {} kernels.",
              executions.len(), copies.len(), kernels.len());
        Ok(Trace {
            executions: executions,
            copies: copies,
            kernels: kernels,
            statistic: statistic,
            deadlines: deadlines,
            source: ::fork(source),
        })
    }
}

impl Timing for Trace {
    fn assign(&mut self, graph: &mut Graph) -> Result<()> {
        let copy = self.statistic.apply(&self.copies);
        let mut kernels = vec![0; graph.len()];
        for (k, &id) in graph.gpu_tasks.iter().enumerate() {
            kernels[id] = *some!(self.kernels.get(k), "cannot find the kernel of task #{}", id);
        }
        for task in &mut graph.tasks {
            let samples = some!(self.executions.get(task.id).filter(|samples| !samples.is_empty()),
                                "cannot find the execution time of task #{}", task.id);
            let total = self.statistic.apply(samples);
            task.work = match task.kind() {
                Kind::Cpu => Work::Cpu(total),
                Kind::Gpu => Work::Gpu(Stages::split(total, copy, kernels[task.id])),
            };
        }
        self.deadlines.assign(graph, &mut self.source);
        Ok(())
    }
}

/// Collect execution samples per task.
///
/// The first object having a member named `"0"` maps task identifiers to
/// records; every number under an `execution_total_time` member of a record
/// is a sample.
pub fn read_executions(content: &str) -> Result<Vec<Vec<Tick>>> {
    let document: Value = ok!(::serde_json::from_str(content));
    let tasks = some!(find_tasks(&document), "cannot find any tasks in the execution trace");
    let mut executions = vec![];
    for (key, record) in tasks {
        let id = match key.parse::<usize>() {
            Ok(id) => id,
            _ => continue,
        };
        if executions.len() <= id {
            executions.resize(id + 1, vec![]);
        }
        collect(record, false, &mut executions[id])?;
    }
    Ok(executions)
}

/// Extract memory-copy and kernel durations from lines of the form
/// `<tick>, memcopy:start`, `<tick>, memcopy:terminate`, and `<tick>, kernel...`.
pub fn read_gpu(content: &str) -> Result<(Vec<Tick>, Vec<Tick>)> {
    let (mut copies, mut kernels) = (vec![], vec![]);
    for line in content.lines() {
        let mut parts = line.splitn(2, ',');
        let (tick, event) = match (parts.next(), parts.next()) {
            (Some(tick), Some(event)) => (tick.trim(), event.trim()),
            _ => continue,
        };
        if event.starts_with("memcopy:start") || event.starts_with("memcopy:terminate") {
            copies.push(ok!(tick.parse::<Tick>()));
        } else if event.starts_with("kernel") {
            kernels.push(ok!(tick.parse::<Tick>()));
        }
    }
    Ok((differences(&copies)?, differences(&kernels)?))
}

fn find_tasks(value: &Value) -> Option<&::serde_json::Map<String, Value>> {
    match *value {
        Value::Object(ref map) => {
            if map.contains_key("0") {
                return Some(map);
            }
            map.values().filter_map(find_tasks).next()
        },
        Value::Array(ref array) => array.iter().filter_map(find_tasks).next(),
        _ => None,
    }
}

fn collect(value: &Value, wanted: bool, samples: &mut Vec<Tick>) -> Result<()> {
    match *value {
        Value::Object(ref map) => for (key, value) in map {
            collect(value, wanted || key == "execution_total_time", samples)?;
        },
        Value::Array(ref array) => for value in array {
            collect(value, wanted, samples)?;
        },
        Value::Number(ref number) if wanted => match number.as_u64() {
            Some(sample) => samples.push(sample),
            _ => raise!("found an invalid execution time ({})", number),
        },
        _ => {},
    }
    Ok(())
}

fn differences(ticks: &[Tick]) -> Result<Vec<Tick>> {
    if ticks.len() % 2 != 0 {
        raise!("found an unpaired event in the GPU trace");
    }
    let mut values = Vec::with_capacity(ticks.len() / 2);
    for pair in ticks.chunks(2) {
        if pair[1] < pair[0] {
            raise!("found an event ending before it starts in the GPU trace");
        }
        values.push(pair[1] - pair[0]);
    }
    Ok(values)
}

use std::fmt;

use graph::{Task, Work};
use Tick;

/// A stage of execution.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Stage {
    /// The only segment of a CPU-only task.
    Cpu,
    /// The initial CPU segment.
    Cpu1,
    /// The host-to-device copy.
    Copy1,
    /// The kernel.
    Gpu,
    /// The device-to-host copy.
    Copy2,
    /// The final CPU segment.
    Cpu2,
}

/// The state of a task.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum State {
    Pending,
    CpuRunning,
    CpuDone,
    Cpu1Running,
    Cpu1Done,
    Copy1Running,
    GpuRunning,
    Copy2Running,
    Copy2Done,
    Cpu2Running,
    Cpu2Done,
}

/// The interval of a stage.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Span {
    /// The stage.
    pub stage: Stage,
    /// The tick of entering the stage.
    pub start: Tick,
    /// The tick of leaving the stage.
    pub finish: Tick,
}

/// The execution record of a task.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// The current state.
    pub state: State,
    /// The thread whose allocation queue received the task.
    pub thread: Option<usize>,
    /// The device whose queue received the task.
    pub device: Option<usize>,
    /// The stages entered so far.
    pub spans: Vec<Span>,
}

impl Stage {
    /// Return the duration of the stage for some work.
    pub fn duration(&self, work: &Work) -> Tick {
        match (*self, *work) {
            (Stage::Cpu, Work::Cpu(duration)) => duration,
            (Stage::Cpu1, Work::Gpu(ref stages)) => stages.cpu1,
            (Stage::Copy1, Work::Gpu(ref stages)) => stages.copy1,
            (Stage::Gpu, Work::Gpu(ref stages)) => stages.gpu,
            (Stage::Copy2, Work::Gpu(ref stages)) => stages.copy2,
            (Stage::Cpu2, Work::Gpu(ref stages)) => stages.cpu2,
            _ => 0,
        }
    }

    /// Return the state of a task running the stage.
    pub fn running(&self) -> State {
        match *self {
            Stage::Cpu => State::CpuRunning,
            Stage::Cpu1 => State::Cpu1Running,
            Stage::Copy1 => State::Copy1Running,
            Stage::Gpu => State::GpuRunning,
            Stage::Copy2 => State::Copy2Running,
            Stage::Cpu2 => State::Cpu2Running,
        }
    }
}

impl State {
    /// Check if the task has completed.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        match *self {
            State::CpuDone | State::Cpu2Done => true,
            _ => false,
        }
    }

    /// Check if a stage is in progress.
    pub fn is_running(&self) -> bool {
        match *self {
            State::CpuRunning | State::Cpu1Running | State::Copy1Running | State::GpuRunning |
            State::Copy2Running | State::Cpu2Running => true,
            _ => false,
        }
    }
}

impl Record {
    /// Create a record of a task that has not been allocated.
    pub fn new() -> Record {
        Record { state: State::Pending, thread: None, device: None, spans: vec![] }
    }

    /// Enter the stage that follows the current state.
    ///
    /// The states that admit a next stage are `Pending`, `Cpu1Done`,
    /// `Copy1Running`, `GpuRunning`, and `Copy2Done`.
    pub fn start(&mut self, task: &Task, time: Tick) -> Option<Stage> {
        let stage = match (self.state, task.kind()) {
            (State::Pending, ::graph::Kind::Cpu) => Stage::Cpu,
            (State::Pending, ::graph::Kind::Gpu) => Stage::Cpu1,
            (State::Cpu1Done, _) => Stage::Copy1,
            (State::Copy1Running, _) => Stage::Gpu,
            (State::GpuRunning, _) => Stage::Copy2,
            (State::Copy2Done, _) => Stage::Cpu2,
            _ => return None,
        };
        self.state = stage.running();
        self.spans.push(Span { stage: stage, start: time, finish: time + stage.duration(&task.work) });
        Some(stage)
    }

    /// Check the running stage against the clock and make at most one
    /// transition, returning the new state.
    ///
    /// The completion of the copy to the device and of the kernel starts the
    /// next stage right away.
    pub fn poll(&mut self, task: &Task, time: Tick) -> Option<State> {
        match self.spans.last() {
            Some(span) if self.state.is_running() && span.finish <= time => {},
            _ => return None,
        }
        self.state = match self.state {
            State::CpuRunning => State::CpuDone,
            State::Cpu1Running => State::Cpu1Done,
            State::Copy2Running => State::Copy2Done,
            State::Cpu2Running => State::Cpu2Done,
            State::Copy1Running | State::GpuRunning => {
                self.start(task, time);
                return Some(self.state);
            },
            _ => return None,
        };
        Some(self.state)
    }

    /// Return the span of a stage.
    pub fn span(&self, stage: Stage) -> Option<&Span> {
        self.spans.iter().find(|span| span.stage == stage)
    }
}

impl Default for Record {
    #[inline]
    fn default() -> Record {
        Record::new()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(match *self {
            Stage::Cpu => "cpu",
            Stage::Cpu1 => "cpu1",
            Stage::Copy1 => "copy1",
            Stage::Gpu => "gpu",
            Stage::Copy2 => "copy2",
            Stage::Cpu2 => "cpu2",
        })
    }
}

#[cfg(test)]
mod tests {
    use graph::{Kind, Stages, Task, Work};
    use super::{Record, Span, Stage, State};

    #[test]
    fn cpu() {
        let task = Task { work: Work::Cpu(3), ..Task::new(0, Kind::Cpu) };
        let mut record = Record::new();
        assert_eq!(record.poll(&task, 0), None);
        assert_eq!(record.start(&task, 2), Some(Stage::Cpu));
        assert_eq!(record.state, State::CpuRunning);
        assert_eq!(record.poll(&task, 4), None);
        assert_eq!(record.poll(&task, 5), Some(State::CpuDone));
        assert!(record.state.is_terminal());
        assert_eq!(record.poll(&task, 6), None);
        assert_eq!(record.start(&task, 6), None);
        assert_eq!(record.spans, vec![Span { stage: Stage::Cpu, start: 2, finish: 5 }]);
    }

    #[test]
    fn gpu() {
        let stages = Stages { cpu1: 1, copy1: 1, gpu: 3, copy2: 1, cpu2: 1 };
        let task = Task { work: Work::Gpu(stages), ..Task::new(0, Kind::Gpu) };
        let mut record = Record::new();
        assert_eq!(record.start(&task, 0), Some(Stage::Cpu1));
        assert_eq!(record.poll(&task, 1), Some(State::Cpu1Done));
        assert_eq!(record.poll(&task, 1), None);
        assert_eq!(record.start(&task, 1), Some(Stage::Copy1));
        assert_eq!(record.poll(&task, 2), Some(State::GpuRunning));
        assert_eq!(record.poll(&task, 4), None);
        assert_eq!(record.poll(&task, 5), Some(State::Copy2Running));
        assert_eq!(record.poll(&task, 6), Some(State::Copy2Done));
        assert_eq!(record.start(&task, 7), Some(Stage::Cpu2));
        assert_eq!(record.poll(&task, 8), Some(State::Cpu2Done));

        let stages = record.spans.iter().map(|span| span.stage).collect::<Vec<_>>();
        assert_eq!(stages, vec![Stage::Cpu1, Stage::Copy1, Stage::Gpu, Stage::Copy2, Stage::Cpu2]);
        for (span, duration) in record.spans.iter().zip(&[1, 1, 3, 1, 1]) {
            assert_eq!(span.finish - span.start, *duration);
        }
        assert_eq!(record.span(Stage::Gpu), Some(&Span { stage: Stage::Gpu, start: 2, finish: 5 }));
    }

    #[test]
    fn zero_duration() {
        let task = Task::new(0, Kind::Cpu);
        let mut record = Record::new();
        record.start(&task, 3);
        assert_eq!(record.poll(&task, 3), Some(State::CpuDone));
    }
}

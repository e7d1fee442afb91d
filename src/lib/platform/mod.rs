//! Simulated resources.

use Result;
use system::{Context, State};

mod locking;
mod queueing;
mod threads;

pub use self::locking::Locking;
pub use self::queueing::Queueing;
pub use self::threads::{Thread, Threads};

/// The sizes of the resource pools.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Platform {
    /// The number of CPU threads.
    pub threads: usize,
    /// The number of GPU devices.
    pub devices: usize,
    /// The capacity of the queue of each device.
    pub capacity: usize,
}

/// A pool of GPU devices fed by CPU threads.
pub trait Accelerator {
    /// Return the number of devices.
    fn devices(&self) -> usize;

    /// Accept a task whose initial CPU segment has finished.
    fn push(&mut self, id: usize, context: &mut Context);

    /// Advance a device by one tick.
    ///
    /// The task whose copy back to the host has just finished, if any, is
    /// returned so that it can be passed to its thread.
    fn step(&mut self, device: usize, context: &mut Context) -> Option<usize>;

    /// Return the length of the queue of each device.
    fn lengths(&self) -> Vec<usize>;

    /// Append every task held by the pool.
    fn occupancy(&self, ids: &mut Vec<usize>);
}

impl Platform {
    /// Create a description.
    ///
    /// The capacity defaults to the number of threads per device rounded up.
    pub fn new(threads: usize, devices: usize, capacity: Option<usize>) -> Result<Platform> {
        if threads == 0 {
            raise!("at least one CPU thread is required");
        }
        if devices == 0 {
            raise!("at least one GPU device is required");
        }
        let capacity = capacity.unwrap_or((threads + devices - 1) / devices);
        if capacity == 0 {
            raise!("the capacity of device queues should be positive");
        }
        Ok(Platform { threads: threads, devices: devices, capacity: capacity })
    }
}

/// Advance the task occupying a device and vacate the slot once the copy
/// back to the host has finished.
fn release(slot: &mut Option<usize>, context: &mut Context) -> Option<usize> {
    let id = match *slot {
        Some(id) => id,
        _ => return None,
    };
    match context.poll(id) {
        Some(State::Copy2Done) => {
            *slot = None;
            Some(id)
        },
        _ => None,
    }
}

/// Start the copy to the device of a queued task.
fn occupy(slot: &mut Option<usize>, id: usize, context: &mut Context) {
    debug_assert!(slot.is_none());
    context.start(id);
    *slot = Some(id);
}

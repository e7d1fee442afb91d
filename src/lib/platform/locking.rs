use std::collections::VecDeque;

use platform::{Accelerator, Platform, occupy, release};
use schedule::earliest_deadline;
use system::Context;

/// Devices behind a global earliest-deadline-first pool.
///
/// A ready task goes to the shortest device queue if the pool and the device
/// queues together hold fewer tasks than there are threads and that queue is
/// not full; otherwise it waits in the pool. A device taking a task from its
/// queue refills the queue from the pool.
pub struct Locking {
    pool: Vec<usize>,
    queues: Vec<VecDeque<usize>>,
    slots: Vec<Option<usize>>,
    capacity: usize,
    threads: usize,
}

impl Locking {
    /// Create devices.
    pub fn new(platform: &Platform) -> Locking {
        Locking {
            pool: vec![],
            queues: vec![VecDeque::with_capacity(platform.capacity); platform.devices],
            slots: vec![None; platform.devices],
            capacity: platform.capacity,
            threads: platform.threads,
        }
    }

    /// Return the global pool.
    #[inline]
    pub fn pool(&self) -> &[usize] {
        &self.pool
    }

    fn shortest(&self) -> usize {
        let mut chosen = 0;
        for (i, queue) in self.queues.iter().enumerate().skip(1) {
            if queue.len() < self.queues[chosen].len() {
                chosen = i;
            }
        }
        chosen
    }

    fn promote(&mut self, device: usize, context: &mut Context) {
        let position = earliest_deadline(&self.pool, context.graph);
        let id = self.pool.remove(position);
        self.queues[device].push_back(id);
        context.assign(id, device);
    }
}

impl Accelerator for Locking {
    #[inline]
    fn devices(&self) -> usize {
        self.slots.len()
    }

    fn push(&mut self, id: usize, context: &mut Context) {
        let queued = self.pool.len() + self.queues.iter().map(VecDeque::len).sum::<usize>();
        if queued < self.threads {
            let device = self.shortest();
            if self.queues[device].len() < self.capacity {
                self.queues[device].push_back(id);
                context.assign(id, device);
                context.history.count_gpu(self.pool.len());
                return;
            }
        }
        trace!(target: "System", "{:>6}: task #{} entered the priority pool.", context.time, id);
        self.pool.push(id);
        context.history.count_gpu(self.pool.len());
    }

    fn step(&mut self, device: usize, context: &mut Context) -> Option<usize> {
        let released = release(&mut self.slots[device], context);
        if self.slots[device].is_none() {
            if let Some(id) = self.queues[device].pop_front() {
                occupy(&mut self.slots[device], id, context);
                if self.queues[device].len() < self.capacity && !self.pool.is_empty() {
                    self.promote(device, context);
                }
            }
        }
        released
    }

    fn lengths(&self) -> Vec<usize> {
        self.queues.iter().map(VecDeque::len).collect()
    }

    fn occupancy(&self, ids: &mut Vec<usize>) {
        ids.extend(&self.pool);
        for queue in &self.queues {
            ids.extend(queue);
        }
        ids.extend(self.slots.iter().filter_map(|&slot| slot));
    }
}

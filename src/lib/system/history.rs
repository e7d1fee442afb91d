/// Statistics about a run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct History {
    /// The number of tasks that have reached a terminal state.
    pub completed: usize,
    /// The largest number of tasks present in all allocation queues.
    pub peak_cpu_queued: usize,
    /// The largest size of the GPU-side global pool.
    pub peak_gpu_queued: usize,
}

impl History {
    /// Take into account the occupancy of the allocation queues.
    #[inline]
    pub fn count_cpu(&mut self, queued: usize) {
        if queued > self.peak_cpu_queued {
            self.peak_cpu_queued = queued;
        }
    }

    /// Take into account the occupancy of the GPU-side global pool.
    #[inline]
    pub fn count_gpu(&mut self, queued: usize) {
        if queued > self.peak_gpu_queued {
            self.peak_gpu_queued = queued;
        }
    }
}

use platform::{Accelerator, Platform, occupy, release};
use schedule::{Placement, Selection};
use system::Context;

/// Devices behind a global queue, each with a local queue.
///
/// On every tick the first device moves tasks from the global queue to local
/// queues with spare capacity; an idle device then takes a task from its own
/// local queue.
pub struct Queueing {
    global: Vec<usize>,
    queues: Vec<Vec<usize>>,
    slots: Vec<Option<usize>>,
    capacity: usize,
    selection: Selection,
    placement: Placement,
    ordering: Selection,
}

impl Queueing {
    /// Create devices.
    pub fn new(platform: &Platform, selection: Selection, placement: Placement,
               ordering: Selection) -> Queueing {
        Queueing {
            global: vec![],
            queues: vec![Vec::with_capacity(platform.capacity); platform.devices],
            slots: vec![None; platform.devices],
            capacity: platform.capacity,
            selection: selection,
            placement: placement,
            ordering: ordering,
        }
    }

    /// Return the global queue.
    #[inline]
    pub fn global(&self) -> &[usize] {
        &self.global
    }

    /// Return the local queues.
    #[inline]
    pub fn queues(&self) -> &[Vec<usize>] {
        &self.queues
    }

    fn distribute(&mut self, context: &mut Context) {
        while !self.global.is_empty() {
            let candidates = (0..self.queues.len()).filter(|&i| self.queues[i].len() < self.capacity)
                                                   .collect::<Vec<_>>();
            if candidates.is_empty() {
                break;
            }
            let position = self.selection.select(&self.global, context.graph);
            let device = self.placement.select(&candidates, &self.queues, context.graph);
            let id = self.global.remove(position);
            self.queues[device].push(id);
            context.assign(id, device);
        }
    }
}

impl Accelerator for Queueing {
    #[inline]
    fn devices(&self) -> usize {
        self.slots.len()
    }

    fn push(&mut self, id: usize, context: &mut Context) {
        self.global.push(id);
        context.history.count_gpu(self.global.len());
    }

    fn step(&mut self, device: usize, context: &mut Context) -> Option<usize> {
        let released = release(&mut self.slots[device], context);
        if device == 0 {
            self.distribute(context);
        }
        if self.slots[device].is_none() && !self.queues[device].is_empty() {
            let position = self.ordering.select(&self.queues[device], context.graph);
            let id = self.queues[device].remove(position);
            occupy(&mut self.slots[device], id, context);
        }
        released
    }

    fn lengths(&self) -> Vec<usize> {
        self.queues.iter().map(Vec::len).collect()
    }

    fn occupancy(&self, ids: &mut Vec<usize>) {
        ids.extend(&self.global);
        for queue in &self.queues {
            ids.extend(queue);
        }
        ids.extend(self.slots.iter().filter_map(|&slot| slot));
    }
}

#[cfg(test)]
mod tests {
    use graph::{Graph, Kind, Stages, Task, Work};
    use platform::{Accelerator, Platform};
    use schedule::{Placement, Selection};
    use system::{Context, State};
    use super::Queueing;

    fn build(kernels: &[u64], descendants: &[usize]) -> Graph {
        let tasks = kernels.iter().zip(descendants).enumerate().map(|(i, (&gpu, &descendants))| {
            let mut task = Task::new(i, Kind::Gpu);
            task.work = Work::Gpu(Stages { cpu1: 1, copy1: 1, gpu: gpu, copy2: 1, cpu2: 1 });
            task.descendants = descendants;
            task
        }).collect();
        Graph::new(tasks, 0).unwrap()
    }

    fn ready(context: &mut Context, ids: &[usize]) {
        for &id in ids {
            context.start(id);
        }
        context.time = 1;
        for &id in ids {
            assert_eq!(context.poll(id), Some(State::Cpu1Done));
        }
    }

    #[test]
    fn distribute() {
        let graph = build(&[5, 1, 3, 2, 4], &[0, 0, 0, 0, 0]);
        let mut context = Context::new(&graph);
        ready(&mut context, &[0, 1, 2, 3, 4]);
        let platform = Platform::new(4, 2, None).unwrap();
        let mut queueing = Queueing::new(&platform, Selection::LeastGpuTime,
                                         Placement::MinJobCount, Selection::LeastGpuTime);
        for id in 0..5 {
            queueing.push(id, &mut context);
        }
        assert_eq!(context.history.peak_gpu_queued, 5);

        assert_eq!(queueing.step(0, &mut context), None);
        // 1 -> #0, 3 -> #1, 2 -> #0, 4 -> #1, then #0 starts 1
        assert_eq!(context.allocations, vec![(1, 0), (3, 1), (2, 0), (4, 1)]);
        assert_eq!(queueing.global(), &[0]);
        assert_eq!(queueing.queues()[0], vec![2]);
        assert_eq!(context.records[1].state, State::Copy1Running);

        assert_eq!(queueing.step(1, &mut context), None);
        assert_eq!(queueing.queues()[1], vec![4]);
        assert_eq!(context.records[3].state, State::Copy1Running);
        assert_eq!(queueing.lengths(), vec![1, 1]);

        let mut ids = vec![];
        queueing.occupancy(&mut ids);
        ids.sort();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn ordering() {
        let graph = build(&[5, 1, 3], &[2, 0, 7]);
        let mut context = Context::new(&graph);
        ready(&mut context, &[0, 1, 2]);
        let platform = Platform::new(3, 1, None).unwrap();
        let mut queueing = Queueing::new(&platform, Selection::LeastGpuTime,
                                         Placement::WeightedSum, Selection::MaxDescendantCount);
        for id in 0..3 {
            queueing.push(id, &mut context);
        }
        queueing.step(0, &mut context);
        assert_eq!(context.allocations, vec![(1, 0), (2, 0), (0, 0)]);
        assert_eq!(context.records[2].state, State::Copy1Running);
        assert_eq!(queueing.queues()[0], vec![1, 0]);
        assert!(queueing.global().is_empty());
    }
}

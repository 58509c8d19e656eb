use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::application::frame::{FrameHandle, FrameScheduler, FrameTask};

/// Browser `requestAnimationFrame`. Dropping the handle cancels the frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnimationFrameScheduler;

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&self, task: FrameTask) -> FrameHandle {
        FrameHandle::new(gloo::render::request_animation_frame(move |_timestamp| task()))
    }
}

/// Fallback for hosts without rAF (workers): a zero-or-more millisecond
/// timeout.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutFrameScheduler {
    millis: u32,
}

impl Default for TimeoutFrameScheduler {
    fn default() -> Self {
        Self { millis: 16 }
    }
}

impl TimeoutFrameScheduler {
    pub fn new(millis: u32) -> Self {
        Self { millis }
    }
}

impl FrameScheduler for TimeoutFrameScheduler {
    fn request_frame(&self, task: FrameTask) -> FrameHandle {
        FrameHandle::new(gloo_timers::callback::Timeout::new(self.millis, task))
    }
}

struct CancelOnDrop(Rc<Cell<bool>>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.set(true);
    }
}

/// Host-driven frames: tasks wait until [`ManualFrameScheduler::run_frame`].
#[derive(Default)]
pub struct ManualFrameScheduler {
    queue: RefCell<Vec<(Rc<Cell<bool>>, FrameTask)>>,
}

impl ManualFrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every task queued before this call that is still live. Tasks
    /// requested while the frame runs wait for the next frame. Returns how
    /// many ran.
    pub fn run_frame(&self) -> usize {
        let batch = std::mem::take(&mut *self.queue.borrow_mut());
        let mut ran = 0;
        for (cancelled, task) in batch {
            if !cancelled.get() {
                task();
                ran += 1;
            }
        }
        ran
    }

    /// Live tasks waiting for the next frame
    pub fn pending(&self) -> usize {
        self.queue.borrow().iter().filter(|(cancelled, _)| !cancelled.get()).count()
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&self, task: FrameTask) -> FrameHandle {
        let cancelled = Rc::new(Cell::new(false));
        self.queue.borrow_mut().push((cancelled.clone(), task));
        FrameHandle::new(CancelOnDrop(cancelled))
    }
}

impl std::fmt::Debug for ManualFrameScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualFrameScheduler").field("pending", &self.pending()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_handle_never_runs() {
        let frames = ManualFrameScheduler::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let handle = frames.request_frame(Box::new(move || h.set(h.get() + 1)));
        assert_eq!(frames.pending(), 1);
        drop(handle);
        assert_eq!(frames.pending(), 0);
        assert_eq!(frames.run_frame(), 0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn requests_during_a_frame_wait() {
        let frames = Rc::new(ManualFrameScheduler::new());
        let hits = Rc::new(Cell::new(0));
        let keep = Rc::new(RefCell::new(Vec::new()));
        let (f, h, k) = (frames.clone(), hits.clone(), keep.clone());
        let handle = frames.request_frame(Box::new(move || {
            h.set(h.get() + 1);
            let h2 = h.clone();
            k.borrow_mut().push(f.request_frame(Box::new(move || h2.set(h2.get() + 10))));
        }));
        assert_eq!(frames.run_frame(), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(frames.run_frame(), 1);
        assert_eq!(hits.get(), 11);
        drop(handle);
    }
}

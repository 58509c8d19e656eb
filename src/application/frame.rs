use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub type FrameTask = Box<dyn FnOnce() + 'static>;

/// "Run this once on the next frame" port.
///
/// Implementations must never run the task synchronously inside
/// `request_frame`.
pub trait FrameScheduler {
    fn request_frame(&self, task: FrameTask) -> FrameHandle;
}

/// Pending frame callback. Dropping the handle cancels the callback.
pub struct FrameHandle {
    _guard: Box<dyn Any>,
}

impl FrameHandle {
    /// Wraps whatever cancels the callback when dropped.
    pub fn new(guard: impl Any) -> Self {
        Self { _guard: Box::new(guard) }
    }

    pub fn cancel(self) {}
}

impl std::fmt::Debug for FrameHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FrameHandle")
    }
}

/// Coalesces repeated draw requests into one callback per frame.
pub struct DrawProc {
    frames: Rc<dyn FrameScheduler>,
    pending: Rc<RefCell<Option<FrameHandle>>>,
    callback: Rc<dyn Fn()>,
}

impl DrawProc {
    pub fn new(frames: Rc<dyn FrameScheduler>, callback: impl Fn() + 'static) -> Self {
        Self { frames, pending: Rc::new(RefCell::new(None)), callback: Rc::new(callback) }
    }

    /// Schedules the callback unless a frame is already pending.
    pub fn request(&self) {
        if self.pending.borrow().is_some() {
            return;
        }
        let pending: Weak<RefCell<Option<FrameHandle>>> = Rc::downgrade(&self.pending);
        let callback: Weak<dyn Fn()> = Rc::downgrade(&self.callback);
        let handle = self.frames.request_frame(Box::new(move || {
            let Some(pending) = pending.upgrade() else { return };
            let _fired = pending.borrow_mut().take();
            if let Some(callback) = callback.upgrade() {
                callback();
            }
        }));
        *self.pending.borrow_mut() = Some(handle);
    }

    pub fn cancel(&self) {
        let _ = self.pending.borrow_mut().take();
    }

    pub fn is_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }
}

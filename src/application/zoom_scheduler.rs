use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::application::frame::{FrameHandle, FrameScheduler};
use crate::domain::chart::{constrain_translation, Dimensions, ScaleExtent, ZoomEvent, ZoomTransform};
use crate::domain::errors::ChartResult;
use crate::domain::logging::LogComponent;
use crate::{log_debug, log_trace, log_warn};

/// Chart side of the scheduler.
pub trait ZoomTarget {
    /// Synchronous model update: visible-window state must reflect the
    /// transform as soon as this returns.
    fn on_zoom_pan(&self, transform: ZoomTransform);
    /// Pushes the transform into the gesture controller.
    fn apply_to_gesture(&self, transform: ZoomTransform);
    /// Recomputes reference windows and repaints.
    fn redraw(&self);
}

struct SchedulerState {
    current: ZoomTransform,
    pending: Option<(ZoomTransform, FrameHandle)>,
    destroyed: bool,
    scale_extent: ScaleExtent,
    dimensions: Dimensions,
}

/// Debounces user zoom input to one apply per frame and applies
/// programmatic or forwarded transforms synchronously.
///
/// Model state is updated before `zoom` returns in both paths; only the
/// gesture apply + redraw is deferred. No borrow of the internal state is
/// held while the target or the forward callback runs.
pub struct ZoomScheduler {
    state: Rc<RefCell<SchedulerState>>,
    frames: Rc<dyn FrameScheduler>,
    target: Rc<dyn ZoomTarget>,
}

impl ZoomScheduler {
    pub fn new(
        frames: Rc<dyn FrameScheduler>,
        target: Rc<dyn ZoomTarget>,
        scale_extent: ScaleExtent,
        dimensions: Dimensions,
    ) -> Self {
        let state = SchedulerState {
            current: ZoomTransform::IDENTITY,
            pending: None,
            destroyed: false,
            scale_extent,
            dimensions,
        };
        Self { state: Rc::new(RefCell::new(state)), frames, target }
    }

    /// Handles one zoom event.
    ///
    /// User gestures are coalesced: the last transform before the frame wins.
    /// `forward` receives the event with the gesture marker cleared, once, and
    /// only for user gestures, so a forwarded event is never relayed again.
    pub fn zoom(&self, event: ZoomEvent, forward: Option<&dyn Fn(ZoomEvent)>) {
        if self.state.borrow().destroyed {
            return;
        }
        let transform = event.transform;
        if !transform.is_valid() {
            log_warn!(LogComponent::Application("ZoomScheduler"), "ignoring degenerate transform {}", transform);
            return;
        }
        self.state.borrow_mut().current = transform;
        self.target.on_zoom_pan(transform);

        if event.user_gesture {
            self.schedule_apply(transform);
            if let Some(forward) = forward {
                forward(event.forwarded());
            }
        } else {
            let cancelled = self.state.borrow_mut().pending.take();
            drop(cancelled);
            self.apply(transform);
        }
    }

    fn schedule_apply(&self, transform: ZoomTransform) {
        {
            let mut state = self.state.borrow_mut();
            if let Some((pending, _)) = state.pending.as_mut() {
                log_trace!(LogComponent::Application("ZoomScheduler"), "debounced {}", pending);
                *pending = transform;
                return;
            }
        }

        let state: Weak<RefCell<SchedulerState>> = Rc::downgrade(&self.state);
        let target: Weak<dyn ZoomTarget> = Rc::downgrade(&self.target);
        let handle = self.frames.request_frame(Box::new(move || {
            let Some(state) = state.upgrade() else { return };
            let fired = state.borrow_mut().pending.take();
            let Some((transform, _handle)) = fired else { return };
            if state.borrow().destroyed {
                return;
            }
            if let Some(target) = target.upgrade() {
                target.apply_to_gesture(transform);
                target.redraw();
            }
        }));
        self.state.borrow_mut().pending = Some((transform, handle));
    }

    fn apply(&self, transform: ZoomTransform) {
        self.target.apply_to_gesture(transform);
        self.target.redraw();
    }

    /// Redraws from the current transform without touching the gesture
    /// controller.
    pub fn refresh(&self) {
        let current = {
            let state = self.state.borrow();
            if state.destroyed {
                return;
            }
            state.current
        };
        self.target.on_zoom_pan(current);
        self.target.redraw();
    }

    pub fn reset(&self) {
        self.zoom(ZoomEvent::programmatic(ZoomTransform::IDENTITY), None);
    }

    /// Commits a new scale extent, or returns a config error and leaves
    /// everything as it was. A current scale outside the new extent is
    /// clamped about the viewport center right away.
    pub fn set_scale_extent(&self, extent: &[f64]) -> ChartResult<()> {
        let extent = ScaleExtent::try_from_slice(extent)?;
        let clamped = {
            let mut state = self.state.borrow_mut();
            if state.destroyed {
                return Ok(());
            }
            state.scale_extent = extent;
            let current = state.current;
            let k = extent.clamp(current.k);
            (k != current.k).then(|| current.scale_to(k, state.dimensions.center()))
        };
        if let Some(transform) = clamped {
            log_debug!(
                LogComponent::Application("ZoomScheduler"),
                "scale clamped into [{}, {}]: {}",
                extent.min(),
                extent.max(),
                transform
            );
            self.zoom(ZoomEvent::programmatic(transform), None);
        }
        Ok(())
    }

    /// Records a new viewport size and pulls the translation back inside it.
    pub fn update_extents(&self, dimensions: Dimensions) {
        let constrained = {
            let mut state = self.state.borrow_mut();
            if state.destroyed {
                return;
            }
            state.dimensions = dimensions;
            let current = state.current;
            let constrained = constrain_translation(current, dimensions);
            (constrained != current).then_some(constrained)
        };
        if let Some(transform) = constrained {
            self.zoom(ZoomEvent::programmatic(transform), None);
        }
    }

    /// Wheel-style zoom about a screen anchor, as a user gesture.
    pub fn zoom_by(&self, factor: f64, anchor: (f64, f64), forward: Option<&dyn Fn(ZoomEvent)>) {
        let next = {
            let state = self.state.borrow();
            if state.destroyed || !factor.is_finite() || factor <= 0.0 {
                return;
            }
            let k = state.scale_extent.clamp(state.current.k * factor);
            constrain_translation(state.current.scale_to(k, anchor), state.dimensions)
        };
        self.zoom(ZoomEvent::user(next), forward);
    }

    /// Drag-style pan by a screen delta, as a user gesture.
    pub fn pan_by(&self, dx: f64, dy: f64, forward: Option<&dyn Fn(ZoomEvent)>) {
        let next = {
            let state = self.state.borrow();
            if state.destroyed || !dx.is_finite() || !dy.is_finite() {
                return;
            }
            let current = state.current;
            let moved = ZoomTransform::new(current.k, current.x + dx, current.y + dy);
            constrain_translation(moved, state.dimensions)
        };
        self.zoom(ZoomEvent::user(next), forward);
    }

    /// Cancels the pending apply. Every later call is a no-op.
    pub fn destroy(&self) {
        let cancelled = {
            let mut state = self.state.borrow_mut();
            state.destroyed = true;
            state.pending.take()
        };
        drop(cancelled);
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.borrow().destroyed
    }

    pub fn is_pending(&self) -> bool {
        self.state.borrow().pending.is_some()
    }

    pub fn current_transform(&self) -> ZoomTransform {
        self.state.borrow().current
    }

    pub fn scale_extent(&self) -> ScaleExtent {
        self.state.borrow().scale_extent
    }

    pub fn dimensions(&self) -> Dimensions {
        self.state.borrow().dimensions
    }
}

impl Drop for ZoomScheduler {
    fn drop(&mut self) {
        self.destroy();
    }
}

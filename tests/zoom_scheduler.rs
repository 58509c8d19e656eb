use std::cell::{Cell, RefCell};
use std::rc::Rc;

use quickcheck_macros::quickcheck;
use sliding_chart_wasm::application::{ZoomScheduler, ZoomTarget};
use sliding_chart_wasm::domain::chart::{Dimensions, ScaleExtent, ZoomEvent, ZoomTransform};
use sliding_chart_wasm::domain::errors::ChartError;
use sliding_chart_wasm::infrastructure::ManualFrameScheduler;

#[derive(Default)]
struct RecordingTarget {
    model: RefCell<Vec<ZoomTransform>>,
    gestures: RefCell<Vec<ZoomTransform>>,
    redraws: Cell<usize>,
}

impl ZoomTarget for RecordingTarget {
    fn on_zoom_pan(&self, transform: ZoomTransform) {
        self.model.borrow_mut().push(transform);
    }

    fn apply_to_gesture(&self, transform: ZoomTransform) {
        self.gestures.borrow_mut().push(transform);
    }

    fn redraw(&self) {
        self.redraws.set(self.redraws.get() + 1);
    }
}

fn setup() -> (ZoomScheduler, Rc<ManualFrameScheduler>, Rc<RecordingTarget>) {
    let frames = Rc::new(ManualFrameScheduler::new());
    let target = Rc::new(RecordingTarget::default());
    let scheduler =
        ZoomScheduler::new(frames.clone(), target.clone(), ScaleExtent::default(), Dimensions::new(100.0, 100.0));
    (scheduler, frames, target)
}

fn t(k: f64, x: f64) -> ZoomTransform {
    ZoomTransform::new(k, x, 0.0)
}

#[test]
fn user_gestures_coalesce_into_one_frame() {
    let (scheduler, frames, target) = setup();
    scheduler.zoom(ZoomEvent::user(t(2.0, 0.0)), None);
    scheduler.zoom(ZoomEvent::user(t(3.0, -10.0)), None);
    scheduler.zoom(ZoomEvent::user(t(4.0, -20.0)), None);

    assert_eq!(target.model.borrow().len(), 3);
    assert_eq!(scheduler.current_transform(), t(4.0, -20.0));
    assert!(target.gestures.borrow().is_empty());
    assert_eq!(frames.pending(), 1);

    assert_eq!(frames.run_frame(), 1);
    assert_eq!(*target.gestures.borrow(), vec![t(4.0, -20.0)]);
    assert_eq!(target.redraws.get(), 1);
    assert!(!scheduler.is_pending());
}

#[test]
fn programmatic_zoom_applies_synchronously_and_cancels_pending() {
    let (scheduler, frames, target) = setup();
    scheduler.zoom(ZoomEvent::user(t(2.0, 0.0)), None);
    scheduler.zoom(ZoomEvent::programmatic(t(5.0, -40.0)), None);

    assert_eq!(*target.gestures.borrow(), vec![t(5.0, -40.0)]);
    assert_eq!(target.redraws.get(), 1);
    assert_eq!(frames.pending(), 0);
    assert_eq!(frames.run_frame(), 0);
    assert_eq!(scheduler.current_transform(), t(5.0, -40.0));
}

#[test]
fn only_user_gestures_are_forwarded() {
    let (scheduler, _frames, _target) = setup();
    let seen = RefCell::new(Vec::new());
    let forward = |event: ZoomEvent| seen.borrow_mut().push(event);

    scheduler.zoom(ZoomEvent::user(t(2.0, 0.0)), Some(&forward));
    scheduler.zoom(ZoomEvent::programmatic(t(3.0, 0.0)), Some(&forward));

    assert_eq!(*seen.borrow(), vec![ZoomEvent::programmatic(t(2.0, 0.0))]);
}

#[test]
fn refresh_redraws_without_touching_gesture() {
    let (scheduler, _frames, target) = setup();
    scheduler.zoom(ZoomEvent::programmatic(t(2.0, -5.0)), None);
    scheduler.refresh();
    assert_eq!(target.redraws.get(), 2);
    assert_eq!(target.gestures.borrow().len(), 1);
    assert_eq!(target.model.borrow().last(), Some(&t(2.0, -5.0)));
}

#[test]
fn destroy_cancels_pending_and_ignores_later_calls() {
    let (scheduler, frames, target) = setup();
    scheduler.zoom(ZoomEvent::user(t(2.0, 0.0)), None);
    scheduler.destroy();

    assert_eq!(frames.run_frame(), 0);
    scheduler.zoom(ZoomEvent::programmatic(t(3.0, 0.0)), None);
    scheduler.refresh();
    assert_eq!(target.model.borrow().len(), 1);
    assert!(target.gestures.borrow().is_empty());
    assert_eq!(target.redraws.get(), 0);
    assert!(scheduler.is_destroyed());
}

#[test]
fn dropping_scheduler_cancels_frame() {
    let (scheduler, frames, target) = setup();
    scheduler.zoom(ZoomEvent::user(t(2.0, 0.0)), None);
    drop(scheduler);
    assert_eq!(frames.run_frame(), 0);
    assert_eq!(target.redraws.get(), 0);
}

#[test]
fn narrower_scale_extent_clamps_about_center() {
    let (scheduler, _frames, target) = setup();
    scheduler.zoom(ZoomEvent::programmatic(ZoomTransform::new(10.0, 0.0, 0.0)), None);
    scheduler.set_scale_extent(&[1.0, 5.0]).unwrap();

    let current = scheduler.current_transform();
    assert_eq!(current, ZoomTransform::new(5.0, 25.0, 25.0));
    assert_eq!(target.gestures.borrow().last(), Some(&current));
    assert_eq!(scheduler.scale_extent().to_arr(), [1.0, 5.0]);
}

#[test]
fn invalid_scale_extent_changes_nothing() {
    let (scheduler, _frames, target) = setup();
    scheduler.zoom(ZoomEvent::programmatic(t(3.0, 0.0)), None);
    let redraws = target.redraws.get();

    for bad in [&[5.0, 1.0][..], &[0.0, 2.0], &[1.0], &[1.0, f64::NAN], &[1.0, 2.0, 3.0]] {
        assert!(matches!(scheduler.set_scale_extent(bad), Err(ChartError::Config(_))));
    }
    assert_eq!(scheduler.scale_extent(), ScaleExtent::default());
    assert_eq!(scheduler.current_transform(), t(3.0, 0.0));
    assert_eq!(target.redraws.get(), redraws);
}

#[test]
fn wheel_zoom_respects_extent() {
    let (scheduler, frames, _target) = setup();
    scheduler.zoom_by(1000.0, (50.0, 50.0), None);
    assert_eq!(scheduler.current_transform().k, 40.0);
    scheduler.zoom_by(1e-6, (50.0, 50.0), None);
    assert_eq!(scheduler.current_transform(), ZoomTransform::IDENTITY);
    assert_eq!(frames.run_frame(), 1);
}

#[test]
fn pan_is_constrained_to_viewport() {
    let (scheduler, _frames, _target) = setup();
    scheduler.zoom(ZoomEvent::programmatic(t(2.0, -50.0)), None);
    scheduler.pan_by(500.0, 0.0, None);
    assert_eq!(scheduler.current_transform().x, 0.0);
    scheduler.pan_by(-500.0, 0.0, None);
    assert_eq!(scheduler.current_transform().x, -100.0);
}

#[quickcheck]
fn last_transform_wins(ops: Vec<(u8, u8, i8, bool)>) -> bool {
    let (scheduler, frames, target) = setup();
    let mut last = None;
    for (op, k, x, user) in ops {
        match op % 3 {
            0 => {
                let transform = ZoomTransform::new(f64::from(k % 40 + 1), f64::from(x), 0.0);
                let event = if user { ZoomEvent::user(transform) } else { ZoomEvent::programmatic(transform) };
                scheduler.zoom(event, None);
                last = Some(transform);
                if scheduler.current_transform() != transform {
                    return false;
                }
            }
            1 => scheduler.refresh(),
            _ => {
                frames.run_frame();
            }
        }
    }
    frames.run_frame();

    let expected = last.unwrap_or(ZoomTransform::IDENTITY);
    let model_ok = last.is_none() || target.model.borrow().last() == Some(&expected);
    let gesture_ok = last.is_none() || target.gestures.borrow().last() == Some(&expected);
    scheduler.current_transform() == expected && model_ok && gesture_ok && frames.pending() == 0
}

#[test]
fn degenerate_transform_is_ignored() {
    let (scheduler, frames, target) = setup();
    let seen = Cell::new(0);
    let forward = |_: ZoomEvent| seen.set(seen.get() + 1);

    scheduler.zoom(ZoomEvent::programmatic(t(0.0, 0.0)), None);
    scheduler.zoom(ZoomEvent::user(t(-1.0, 0.0)), Some(&forward));
    scheduler.zoom(ZoomEvent::user(t(2.0, f64::NAN)), Some(&forward));

    assert_eq!(scheduler.current_transform(), ZoomTransform::IDENTITY);
    assert!(target.model.borrow().is_empty());
    assert_eq!(frames.pending(), 0);
    assert_eq!(seen.get(), 0);

    scheduler.set_scale_extent(&[2.0, 5.0]).unwrap();
    let current = scheduler.current_transform();
    assert_eq!(current.k, 2.0);
    assert!(current.is_valid());
}

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::application::chart::TimeSeriesChart;
use crate::domain::errors::ChartResult;

type Members = RefCell<Vec<Rc<TimeSeriesChart>>>;

/// Charts kept in zoom lockstep.
///
/// A user gesture on any member is relayed, gesture marker cleared, to every
/// other member. Receivers apply it synchronously and never relay it again,
/// so the relay cannot cycle.
#[derive(Default)]
pub struct ChartGroup {
    members: Rc<Members>,
}

impl ChartGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins `chart` to the group, replacing its zoom handler.
    pub fn add(&self, chart: Rc<TimeSeriesChart>) {
        let members: Weak<Members> = Rc::downgrade(&self.members);
        let me: Weak<TimeSeriesChart> = Rc::downgrade(&chart);
        chart.set_zoom_handler(move |event| {
            let Some(members) = members.upgrade() else { return };
            let peers: Vec<Rc<TimeSeriesChart>> =
                members.borrow().iter().filter(|c| Rc::as_ptr(*c) != me.as_ptr()).cloned().collect();
            for peer in peers {
                peer.zoom(event);
            }
        });
        self.members.borrow_mut().push(chart);
    }

    pub fn members(&self) -> Vec<Rc<TimeSeriesChart>> {
        self.members.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.members.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.borrow().is_empty()
    }

    pub fn hover_all(&self, x: f64) {
        for chart in self.members() {
            chart.on_hover(x);
        }
    }

    pub fn reset_all(&self) {
        for chart in self.members() {
            chart.reset_zoom();
        }
    }

    /// Appends to every member. Every member is attempted; the first error
    /// is returned.
    pub fn append_all(&self, values: &[f64]) -> ChartResult<()> {
        let mut first_err = None;
        for chart in self.members() {
            if let Err(e) = chart.append(values) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    pub fn dispose_all(&self) {
        let members = std::mem::take(&mut *self.members.borrow_mut());
        for chart in members {
            chart.dispose();
        }
    }
}

//! Choreography vocabulary: timeline steps and the graph mutations applied at
//! completion boundaries.

use crate::animation::timeline::Timeline;
use crate::graph::model::Direction;

/// Graph mutation deferred to the end of a morph or a batch.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Action {
    /// Commit the element's logical dock.
    Dock { element: String, container: String },
    /// Set opacity to 0 without moving.
    Hide { element: String },
    /// After a wrap: the arrived duplicate becomes resident, the departed element becomes staged.
    SwapRoles { incoming: String, departing: String },
    /// Advance a scrolling-list window.
    ShiftWindow { bundle: String, direction: Direction },
    /// Re-seat both staged duplicates and refresh what they display.
    Restage { bundle: String },
    /// Park every resident of the bundle in its top teleport slot, hidden.
    Stow { bundle: String },
    MarkInitialized { bundle: String },
    MarkUninitialized { bundle: String },
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Step {
    Wait(f64),
    SetOpacity {
        element: String,
        opacity: f64,
    },
    Teleport {
        element: String,
        container: String,
    },
    Morph {
        element: String,
        target: String,
        duration: f64,
    },
    /// Dual fade-morph: `departing` fades into `exit` while `incoming` fades
    /// into `target`.
    WrapMorph {
        departing: String,
        exit: String,
        incoming: String,
        target: String,
        duration: f64,
    },
    /// Close-cascade hop: whatever is visible in ring slot `from` climbs to
    /// `from - 1`, hiding what was visible there once it arrives.
    Climb {
        bundle: String,
        from: usize,
        duration: f64,
    },
    FadeOutVisible {
        bundle: String,
        duration: f64,
    },
    Apply(Action),
}

/// One accepted operation: its lanes plus the actions run once everything settled.
#[derive(Debug)]
pub(crate) struct Batch {
    pub(crate) label: &'static str,
    pub(crate) timeline: Timeline<Step>,
    pub(crate) finally: Vec<Action>,
}

impl Batch {
    pub(crate) fn new(label: &'static str) -> Self {
        Self {
            label,
            timeline: Timeline::new(),
            finally: Vec::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.timeline.lane_count() == 0 && self.finally.is_empty()
    }
}

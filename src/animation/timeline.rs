//! Sequenced choreography: parallel lanes of steps, each lane waiting on a
//! timer or a running tween before moving on.

use std::collections::VecDeque;

use crate::animation::tween::Ticket;

/// What a started step is waiting on.
#[derive(Clone, Debug, PartialEq)]
pub enum Pending {
    /// Nothing; the lane moves on at once.
    Done,
    /// Seconds left before the lane moves on.
    Timer(f64),
    /// Waits until every listed task has settled or been superseded.
    Tasks(Vec<Ticket>),
}

impl Pending {
    /// Waits on a single task.
    pub fn task(ticket: Ticket) -> Self {
        Self::Tasks(vec![ticket])
    }
}

/// Executes steps on behalf of a [`Timeline`].
pub trait LaneHost<S> {
    /// Begin `step` and report what the lane should wait on.
    fn start(&mut self, step: S) -> Pending;
    /// Whether the task behind `ticket` is still animating.
    fn is_running(&self, ticket: Ticket) -> bool;
}

/// Steps run strictly one after another.
#[derive(Debug)]
pub struct Lane<S> {
    steps: VecDeque<S>,
    pending: Option<Pending>,
}

impl<S> Default for Lane<S> {
    fn default() -> Self {
        Self {
            steps: VecDeque::new(),
            pending: None,
        }
    }
}

impl<S> Lane<S> {
    /// An empty lane.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `step`, builder style.
    pub fn then(mut self, step: S) -> Self {
        self.steps.push_back(step);
        self
    }

    /// Append `step`.
    pub fn push(&mut self, step: S) {
        self.steps.push_back(step);
    }

    /// No step left and nothing pending.
    pub fn is_finished(&self) -> bool {
        self.pending.is_none() && self.steps.is_empty()
    }

    fn blocked<H: LaneHost<S>>(&self, host: &H) -> bool {
        match &self.pending {
            None | Some(Pending::Done) => false,
            Some(Pending::Timer(left)) => *left > 1e-9,
            Some(Pending::Tasks(tickets)) => tickets.iter().any(|t| host.is_running(*t)),
        }
    }

    fn pump<H: LaneHost<S>>(&mut self, host: &mut H) {
        loop {
            if self.blocked(host) {
                return;
            }
            self.pending = None;
            let Some(step) = self.steps.pop_front() else {
                return;
            };
            self.pending = Some(host.start(step));
        }
    }

    fn elapse(&mut self, dt: f64) {
        if let Some(Pending::Timer(left)) = self.pending.as_mut() {
            *left -= dt;
        }
    }
}

/// Lanes that advance in parallel on one clock.
#[derive(Debug)]
pub struct Timeline<S> {
    lanes: Vec<Lane<S>>,
}

impl<S> Default for Timeline<S> {
    fn default() -> Self {
        Self { lanes: Vec::new() }
    }
}

impl<S> Timeline<S> {
    /// A timeline with no lanes.
    pub fn new() -> Self {
        Self::default()
    }

    /// A timeline holding just `lane`.
    pub fn single(lane: Lane<S>) -> Self {
        Self { lanes: vec![lane] }
    }

    /// Add a lane; it starts on the next pump.
    pub fn add_lane(&mut self, lane: Lane<S>) {
        self.lanes.push(lane);
    }

    /// Number of lanes, finished or not.
    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Every lane has run out of steps.
    pub fn is_finished(&self) -> bool {
        self.lanes.iter().all(Lane::is_finished)
    }

    /// Start every step whose predecessor has completed.
    pub fn pump<H: LaneHost<S>>(&mut self, host: &mut H) {
        for lane in &mut self.lanes {
            lane.pump(host);
        }
    }

    /// Advance every lane's timer by `dt` seconds.
    pub fn elapse(&mut self, dt: f64) {
        for lane in &mut self.lanes {
            lane.elapse(dt);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;

//! Interpolation tasks `{ start, end, duration, easing, on_settle }` and the
//! registry that drives them, keyed by content-element id.
//!
//! Installing a task for an element that already has one cancels the old task
//! outright: its settle actions never run and the element's geometry continues
//! from whatever start value the new task was given.

use std::collections::HashMap;

use crate::animation::ease::Ease;
use crate::foundation::core::Quad;

/// Values a [`Tween`] can interpolate.
pub trait Lerp: Sized {
    /// `a` at `t = 0`, `b` at `t = 1`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Quad {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a.lerp(b, t)
    }
}

/// One value animated from `start` to `end` over `duration` seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween<T> {
    /// Value at progress 0.
    pub start: T,
    /// Value at progress 1, returned exactly once finished.
    pub end: T,
    /// Length in seconds; zero finishes immediately.
    pub duration: f64,
    /// Curve applied to time progress.
    pub ease: Ease,
    elapsed: f64,
}

impl<T: Lerp + Clone> Tween<T> {
    /// A tween at progress 0. Negative durations become 0.
    pub fn new(start: T, end: T, duration: f64, ease: Ease) -> Self {
        Self {
            start,
            end,
            duration: duration.max(0.0),
            ease,
            elapsed: 0.0,
        }
    }

    /// Move the clock forward by `dt` seconds, stopping at `duration`.
    pub fn advance(&mut self, dt: f64) {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
    }

    /// Linear time progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Progress has reached 1.
    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Eased value at the current progress.
    pub fn value(&self) -> T {
        if self.is_finished() {
            return self.end.clone();
        }
        T::lerp(&self.start, &self.end, self.ease.apply(self.progress()))
    }
}

/// Opacity as a linear function of task progress; holds `from` until `delay`
/// (a fraction of the duration) has elapsed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OpacityRamp {
    /// Opacity while the delay runs.
    pub from: f64,
    /// Opacity at the end of the task.
    pub to: f64,
    /// Fraction of the task, in `[0, 1]`, spent holding `from`.
    pub delay: f64,
}

impl OpacityRamp {
    /// 1 to 0 over the whole task.
    pub fn fade_out() -> Self {
        Self {
            from: 1.0,
            to: 0.0,
            delay: 0.0,
        }
    }

    /// 0 to 1, starting once `delay` of the task has passed.
    pub fn fade_in_delayed(delay: f64) -> Self {
        Self {
            from: 0.0,
            to: 1.0,
            delay: delay.clamp(0.0, 1.0),
        }
    }

    /// Opacity at task progress `progress`.
    pub fn at(&self, progress: f64) -> f64 {
        let p = progress.clamp(0.0, 1.0);
        let local = if self.delay >= 1.0 {
            if p >= 1.0 { 1.0 } else { 0.0 }
        } else {
            ((p - self.delay) / (1.0 - self.delay)).clamp(0.0, 1.0)
        };
        f64::lerp(&self.from, &self.to, Ease::Linear.apply(local))
    }
}

/// Everything animating one element: optional geometry, optional opacity,
/// sharing one clock, plus actions to run once it settles.
#[derive(Clone, Debug)]
pub struct ElementTask<A> {
    /// Corner animation, if the element moves.
    pub geometry: Option<Tween<Quad>>,
    /// Opacity animation, if the element fades.
    pub opacity: Option<OpacityRamp>,
    /// Shared length in seconds.
    pub duration: f64,
    elapsed: f64,
    /// Run once, in order, when the task finishes.
    pub on_settle: Vec<A>,
}

impl<A> ElementTask<A> {
    /// Move the element's corners from `from` to `to`.
    pub fn morph(from: Quad, to: Quad, duration: f64, ease: Ease) -> Self {
        Self {
            geometry: Some(Tween::new(from, to, duration, ease)),
            opacity: None,
            duration: duration.max(0.0),
            elapsed: 0.0,
            on_settle: Vec::new(),
        }
    }

    /// Fade only; the geometry is left alone.
    pub fn fade(ramp: OpacityRamp, duration: f64) -> Self {
        Self {
            geometry: None,
            opacity: Some(ramp),
            duration: duration.max(0.0),
            elapsed: 0.0,
            on_settle: Vec::new(),
        }
    }

    /// Add an opacity ramp on the same clock.
    pub fn with_opacity(mut self, ramp: OpacityRamp) -> Self {
        self.opacity = Some(ramp);
        self
    }

    /// Queue an action for when the task finishes.
    pub fn on_settle(mut self, action: A) -> Self {
        self.on_settle.push(action);
        self
    }

    fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    fn advance(&mut self, dt: f64) -> Sample {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        if let Some(g) = self.geometry.as_mut() {
            g.advance(dt);
        }
        let p = self.progress();
        Sample {
            points: self.geometry.as_ref().map(Tween::value),
            opacity: self.opacity.map(|r| r.at(p)),
            finished: p >= 1.0,
        }
    }
}

/// Handle for one installed task; stale once the task settles or is superseded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Values a task produced for its element on one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    /// New corners, when the task has geometry.
    pub points: Option<Quad>,
    /// New opacity, when the task has a ramp.
    pub opacity: Option<f64>,
    /// This was the task's last frame.
    pub finished: bool,
}

/// Output of one registry step, in installation order.
#[derive(Debug)]
pub struct Advance<A> {
    /// Per-element values, keyed by element id.
    pub samples: Vec<(String, Sample)>,
    /// Settle actions of tasks that finished this step.
    pub settled: Vec<A>,
}

/// At most one running task per element.
#[derive(Debug)]
pub struct TweenRegistry<A> {
    tasks: HashMap<String, (Ticket, ElementTask<A>)>,
    next: u64,
}

impl<A> Default for TweenRegistry<A> {
    fn default() -> Self {
        Self {
            tasks: HashMap::new(),
            next: 0,
        }
    }
}

impl<A> TweenRegistry<A> {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `task` for `element_id`, cancelling any task already running for it.
    pub fn install(&mut self, element_id: impl Into<String>, task: ElementTask<A>) -> Ticket {
        let ticket = Ticket(self.next);
        self.next += 1;
        let element_id = element_id.into();
        if self.tasks.insert(element_id.clone(), (ticket, task)).is_some() {
            tracing::trace!(element = %element_id, "superseded running tween");
        }
        ticket
    }

    /// Drop the element's task without running its settle actions.
    pub fn cancel(&mut self, element_id: &str) -> bool {
        self.tasks.remove(element_id).is_some()
    }

    /// Drop every task.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// The ticket's task is installed and not yet settled.
    pub fn is_running(&self, ticket: Ticket) -> bool {
        self.tasks.values().any(|(t, _)| *t == ticket)
    }

    /// Some task is running for `element_id`.
    pub fn is_animating(&self, element_id: &str) -> bool {
        self.tasks.contains_key(element_id)
    }

    /// No task is running.
    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of running tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Same as [`TweenRegistry::is_idle`].
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Step every task by `dt` seconds. Finished tasks are removed and their
    /// settle actions returned.
    pub fn advance(&mut self, dt: f64) -> Advance<A> {
        let mut order: Vec<(Ticket, String)> = self
            .tasks
            .iter()
            .map(|(id, (t, _))| (*t, id.clone()))
            .collect();
        order.sort();

        let mut out = Advance {
            samples: Vec::with_capacity(order.len()),
            settled: Vec::new(),
        };
        for (_, id) in order {
            let Some((_, task)) = self.tasks.get_mut(&id) else {
                continue;
            };
            let sample = task.advance(dt);
            let finished = sample.finished;
            out.samples.push((id.clone(), sample));
            if finished && let Some((_, task)) = self.tasks.remove(&id) {
                out.settled.extend(task.on_settle);
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;

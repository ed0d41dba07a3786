//! Open and close cascades for bundles driven by a button container.

use crate::animation::timeline::{Lane, Pending};
use crate::engine::orchestrator::Engine;
use crate::engine::steps::{Action, Batch, Step};
use crate::graph::model::TeleportRole;

/// Duration of one open-cascade hop.
pub const OPEN_HOP_SECONDS: f64 = 0.6;
/// Pause after each open-cascade hop.
pub const OPEN_HOP_PAUSE: f64 = 0.03;
/// Pause between becoming visible and the first hop.
pub const OPEN_REVEAL_PAUSE: f64 = 0.01;
/// Duration of one close-cascade climb.
pub const CLOSE_HOP_SECONDS: f64 = 0.5;
/// Pause after each close-cascade climb.
pub const CLOSE_HOP_PAUSE: f64 = 0.05;
/// Shared fade-out once every climb has finished.
pub const CLOSE_FADE_SECONDS: f64 = 0.8;

impl Engine {
    /// Release the residents queued in the top slot, bottommost target first,
    /// each hopping container by container to its home.
    #[tracing::instrument(skip(self))]
    pub fn open_cascade(&mut self, bundle_id: &str) {
        if !self.accepts("open_cascade") {
            return;
        }
        let ring: Vec<String> = self
            .graph
            .normal_containers(bundle_id)
            .iter()
            .map(|c| c.id.clone())
            .collect();
        let Some(top) = self
            .graph
            .teleport_container(bundle_id, TeleportRole::Top)
            .map(|c| c.id.clone())
        else {
            tracing::debug!(bundle = bundle_id, reason = "no top teleport", "open cascade skipped");
            return;
        };
        if ring.is_empty() {
            tracing::debug!(bundle = bundle_id, reason = "no normal containers", "open cascade skipped");
            return;
        }

        let mut queued: Vec<(String, usize)> = self
            .graph
            .bundle_elements(bundle_id)
            .filter(|e| !e.is_duplicate() && e.container_id == top && !e.is_visible())
            .map(|e| {
                let home = e
                    .home_container_id
                    .as_deref()
                    .and_then(|h| ring.iter().position(|c| c == h))
                    .unwrap_or(0);
                (e.id.clone(), home)
            })
            .collect();
        if queued.is_empty() {
            tracing::debug!(bundle = bundle_id, reason = "nothing queued", "open cascade skipped");
            return;
        }
        queued.sort_by(|a, b| b.1.cmp(&a.1));

        let mut batch = Batch::new("open_cascade");
        for (i, (element, home)) in queued.into_iter().enumerate() {
            let mut lane = Lane::new()
                .then(Step::Wait(i as f64 * self.cascade_delay))
                .then(Step::SetOpacity {
                    element: element.clone(),
                    opacity: 1.0,
                })
                .then(Step::Wait(OPEN_REVEAL_PAUSE));
            for target in &ring[..=home] {
                lane.push(Step::Morph {
                    element: element.clone(),
                    target: target.clone(),
                    duration: OPEN_HOP_SECONDS,
                });
                lane.push(Step::Wait(OPEN_HOP_PAUSE));
            }
            batch.timeline.add_lane(lane);
        }
        batch.finally.push(Action::MarkInitialized {
            bundle: bundle_id.to_owned(),
        });
        batch.finally.push(Action::Restage {
            bundle: bundle_id.to_owned(),
        });
        self.run_batch(batch);
    }

    /// Stack the residents upward into the topmost container, fade them out
    /// together and park them back in the top slot.
    #[tracing::instrument(skip(self))]
    pub fn close_cascade(&mut self, bundle_id: &str) {
        if !self.accepts("close_cascade") {
            return;
        }
        if !self.is_bundle_initialized(bundle_id) {
            tracing::debug!(bundle = bundle_id, reason = "not initialized", "close cascade skipped");
            return;
        }
        if self
            .graph
            .teleport_container(bundle_id, TeleportRole::Top)
            .is_none()
        {
            tracing::debug!(bundle = bundle_id, reason = "no top teleport", "close cascade skipped");
            return;
        }
        let ring: Vec<String> = self
            .graph
            .normal_containers(bundle_id)
            .iter()
            .map(|c| c.id.clone())
            .collect();
        if ring.is_empty() {
            tracing::debug!(bundle = bundle_id, reason = "no normal containers", "close cascade skipped");
            return;
        }

        // Residents return to the slot they occupy now when the bundle reopens.
        for container in &ring {
            let Some(id) = self.graph.docked_id(container).map(str::to_owned) else {
                continue;
            };
            if let Some(e) = self.graph.element_mut(&id) {
                e.home_container_id = Some(container.clone());
            }
        }

        let mut lane = Lane::new();
        for from in (1..ring.len()).rev() {
            lane.push(Step::Climb {
                bundle: bundle_id.to_owned(),
                from,
                duration: CLOSE_HOP_SECONDS,
            });
            lane.push(Step::Wait(CLOSE_HOP_PAUSE));
        }
        lane.push(Step::FadeOutVisible {
            bundle: bundle_id.to_owned(),
            duration: CLOSE_FADE_SECONDS,
        });
        lane.push(Step::Apply(Action::Stow {
            bundle: bundle_id.to_owned(),
        }));
        lane.push(Step::Apply(Action::MarkUninitialized {
            bundle: bundle_id.to_owned(),
        }));

        let mut batch = Batch::new("close_cascade");
        batch.timeline.add_lane(lane);
        batch.finally.push(Action::Restage {
            bundle: bundle_id.to_owned(),
        });
        self.run_batch(batch);
    }

    /// Resolve a climb when it starts: the climber and the element it will
    /// cover are whatever is visible in the two slots at that moment.
    pub(crate) fn start_climb(&mut self, bundle: &str, from: usize, duration: f64) -> Pending {
        let ring: Vec<String> = self
            .graph
            .normal_containers(bundle)
            .iter()
            .map(|c| c.id.clone())
            .collect();
        let (Some(source), Some(target)) = (ring.get(from), from.checked_sub(1).and_then(|k| ring.get(k)))
        else {
            return Pending::Done;
        };
        let Some(climber) = self.graph.visible_in(source).map(|e| e.id.clone()) else {
            return Pending::Done;
        };
        let covered = self
            .graph
            .bundle_elements(bundle)
            .find(|e| !e.is_duplicate() && e.is_visible() && e.container_id == *target && e.id != climber)
            .map(|e| e.id.clone());

        let Some(ticket) = self.install_climb(&climber, target, duration, covered) else {
            return Pending::Done;
        };
        Pending::task(ticket)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/cascade.rs"]
mod tests;

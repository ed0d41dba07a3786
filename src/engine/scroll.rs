//! Direction scrolling for ring bundles and scrolling lists.

use crate::animation::timeline::Lane;
use crate::engine::orchestrator::Engine;
use crate::engine::steps::{Action, Batch, Step};
use crate::graph::model::{Direction, TeleportRole};

/// Morph duration for a scroll of the given speed.
///
/// Faster input gives shorter morphs: `2 / (1 + min(|speed|, 100) / 50)`,
/// clamped to `[0.2, 2]` seconds. Without a speed the morph takes 1 s.
pub fn scroll_duration(speed: Option<f64>) -> f64 {
    match speed.filter(|s| s.is_finite()) {
        None => 1.0,
        Some(s) => (2.0 / (1.0 + s.abs().min(100.0) / 50.0)).clamp(0.2, 2.0),
    }
}

impl Engine {
    /// Move every bundle one step in `direction`.
    #[tracing::instrument(skip(self))]
    pub fn scroll(&mut self, direction: Direction, speed: Option<f64>) {
        if !self.accepts("scroll") {
            return;
        }
        let duration = scroll_duration(speed);
        let mut batch = Batch::new("scroll");
        let bundles: Vec<String> = self.graph.bundles().iter().map(|b| b.id.clone()).collect();
        for bundle in bundles {
            if self.buffers.contains_key(&bundle) {
                self.plan_list_scroll(&mut batch, &bundle, direction, duration);
            } else {
                self.plan_ring_scroll(&mut batch, &bundle, direction, duration);
            }
        }
        self.run_batch(batch);
    }

    fn plan_ring_scroll(&self, batch: &mut Batch, bundle: &str, dir: Direction, duration: f64) {
        let ring: Vec<String> = self
            .graph
            .normal_containers(bundle)
            .iter()
            .map(|c| c.id.clone())
            .collect();
        if ring.len() < 2 {
            tracing::debug!(bundle, reason = "fewer than two normal containers", "scroll skipped");
            return;
        }

        let mut moved = false;
        for container in &ring {
            let Some(element) = self.graph.docked_id(container).map(str::to_owned) else {
                continue;
            };
            moved = true;

            if let Some(target) = self.graph.explicit_teleport_target(container, dir) {
                batch.timeline.add_lane(Lane::new().then(Step::Teleport {
                    element,
                    container: target.id.clone(),
                }));
                continue;
            }
            let Some(step) = self.graph.ring_neighbor(container, dir) else {
                continue;
            };
            if !step.wrapped {
                batch.timeline.add_lane(Lane::new().then(Step::Morph {
                    element,
                    target: step.target,
                    duration,
                }));
                continue;
            }
            match self.wrap_lane(bundle, dir, element.clone(), step.target.clone(), duration) {
                Some(lane) => batch.timeline.add_lane(lane),
                None => {
                    tracing::debug!(bundle, element = %element, "wrap without staging, teleporting");
                    batch.timeline.add_lane(Lane::new().then(Step::Teleport {
                        element,
                        container: step.target,
                    }));
                }
            }
        }

        if moved {
            batch.finally.push(Action::Restage {
                bundle: bundle.to_owned(),
            });
        }
    }

    /// A scrolling list moves its content against the ring direction: scrolling
    /// down advances the window, so content climbs toward the topmost container.
    fn plan_list_scroll(&self, batch: &mut Batch, bundle: &str, dir: Direction, duration: f64) {
        let ring: Vec<String> = self
            .graph
            .normal_containers(bundle)
            .iter()
            .map(|c| c.id.clone())
            .collect();
        let has_slots = self.graph.teleport_container(bundle, TeleportRole::Top).is_some()
            && self.graph.teleport_container(bundle, TeleportRole::Bottom).is_some();
        if !has_slots {
            tracing::debug!(bundle, reason = "scrolling list needs top and bottom teleports", "scroll skipped");
            return;
        }
        if ring.is_empty() || ring.iter().any(|c| self.graph.docked_id(c).is_none()) {
            tracing::debug!(bundle, reason = "list not fully docked", "scroll skipped");
            return;
        }

        let motion = dir.opposite();
        let mut lanes = Vec::with_capacity(ring.len());
        for container in &ring {
            let Some(element) = self.graph.docked_id(container).map(str::to_owned) else {
                continue;
            };
            let Some(step) = self.graph.ring_neighbor(container, motion) else {
                continue;
            };
            if !step.wrapped {
                lanes.push(Lane::new().then(Step::Morph {
                    element,
                    target: step.target,
                    duration,
                }));
                continue;
            }
            match self.wrap_lane(bundle, motion, element, step.target, duration) {
                Some(lane) => lanes.push(lane),
                None => {
                    tracing::debug!(bundle, reason = "no staged duplicate", "scroll skipped");
                    return;
                }
            }
        }

        for lane in lanes {
            batch.timeline.add_lane(lane);
        }
        batch.finally.push(Action::ShiftWindow {
            bundle: bundle.to_owned(),
            direction: dir,
        });
        batch.finally.push(Action::Restage {
            bundle: bundle.to_owned(),
        });
    }

    /// Dual fade-morph lane, when both staging slots exist and the entry slot
    /// holds a duplicate.
    fn wrap_lane(
        &self,
        bundle: &str,
        dir: Direction,
        departing: String,
        target: String,
        duration: f64,
    ) -> Option<Lane<Step>> {
        let exit = self.graph.teleport_container(bundle, dir.exit_role())?;
        let entry = self.graph.teleport_container(bundle, dir.entry_role())?;
        let incoming = self.graph.docked(&entry.id).filter(|e| e.is_duplicate())?;
        let incoming = incoming.id.clone();
        Some(
            Lane::new()
                .then(Step::WrapMorph {
                    departing: departing.clone(),
                    exit: exit.id.clone(),
                    incoming: incoming.clone(),
                    target,
                    duration,
                })
                .then(Step::Apply(Action::SwapRoles {
                    incoming,
                    departing,
                })),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/scroll.rs"]
mod tests;

//! Global visibility toggle.

use std::collections::HashMap;

use crate::engine::orchestrator::Engine;

/// Remembered opacities of residents hidden by the toggle, keyed by element id.
#[derive(Clone, Debug, Default)]
pub(crate) struct ToggleState {
    hidden: bool,
    remembered: HashMap<String, f64>,
}

impl ToggleState {
    pub(crate) fn is_on(&self) -> bool {
        !self.hidden
    }
}

impl Engine {
    /// Flip every resident element between hidden and its remembered opacity,
    /// across all bundles. Staged duplicates are forced to 0 either way, and
    /// residents queued in a staging slot are never shown.
    #[tracing::instrument(skip(self))]
    pub fn activate_toggle(&mut self) {
        if !self.accepts("activate_toggle") {
            return;
        }
        let turning_off = !self.toggle.hidden;
        let staging: Vec<String> = self
            .graph
            .containers()
            .iter()
            .filter(|c| c.is_staging())
            .map(|c| c.id.clone())
            .collect();

        let ToggleState { remembered, .. } = &mut self.toggle;
        for e in self.graph.elements_mut() {
            if e.is_duplicate() {
                e.opacity = 0.0;
                continue;
            }
            if turning_off {
                if e.opacity > 0.0 {
                    remembered.insert(e.id.clone(), e.opacity);
                }
                e.opacity = 0.0;
            } else if staging.contains(&e.container_id) {
                remembered.remove(&e.id);
                e.opacity = 0.0;
            } else {
                e.opacity = remembered.remove(&e.id).unwrap_or(1.0);
            }
        }
        self.toggle.hidden = turning_off;
        tracing::debug!(visible = !turning_off, "visibility toggled");
    }
}

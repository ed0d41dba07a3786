//! Element pools: building them on entering animate mode and re-seating the
//! staged duplicates after every batch.

use crate::buffer::circular::CircularBuffer;
use crate::engine::orchestrator::Engine;
use crate::graph::model::{ContentElement, ElementContent, ElementRole, Item, TeleportRole};

const STAGING_ROLES: [TeleportRole; 2] = [TeleportRole::Top, TeleportRole::Bottom];

fn resident_id(bundle: &str, slot: usize) -> String {
    format!("{bundle}:element:{slot}")
}

fn staged_id(bundle: &str, role: TeleportRole) -> String {
    match role {
        TeleportRole::Top => format!("{bundle}:staged:top"),
        _ => format!("{bundle}:staged:bottom"),
    }
}

impl Engine {
    pub(crate) fn items(&self, bundle_id: &str) -> &[Item] {
        self.bundle_items
            .get(bundle_id)
            .map(|b| b.items.as_slice())
            .unwrap_or(&[])
    }

    /// Bundles with a button and a top slot start closed, residents queued
    /// in the top slot.
    pub(crate) fn starts_queued(&self, bundle_id: &str) -> bool {
        self.graph
            .teleport_container(bundle_id, TeleportRole::Button)
            .is_some()
            && self
                .graph
                .teleport_container(bundle_id, TeleportRole::Top)
                .is_some()
    }

    pub(crate) fn populate(&mut self) {
        self.buffers.clear();
        self.initialized.clear();
        let mut elements = Vec::new();

        let bundle_ids: Vec<String> = self.graph.bundles().iter().map(|b| b.id.clone()).collect();
        for bundle in bundle_ids {
            let ring: Vec<(String, crate::foundation::core::Quad)> = self
                .graph
                .normal_containers(&bundle)
                .iter()
                .map(|c| (c.id.clone(), c.points))
                .collect();
            if ring.is_empty() {
                self.initialized.insert(bundle);
                continue;
            }

            let items = self.items(&bundle);
            let start = self.visible_start.get(&bundle).copied().unwrap_or(0);
            let buffer = CircularBuffer::new(items.len(), ring.len(), start);
            if let Some(b) = buffer {
                tracing::debug!(bundle = %bundle, items = b.len(), visible = b.num_visible(), "scrolling list");
                self.buffers.insert(bundle.clone(), b);
                self.visible_start.insert(bundle.clone(), b.start());
            }

            let queued = self.starts_queued(&bundle);
            let top = self
                .graph
                .teleport_container(&bundle, TeleportRole::Top)
                .map(|c| (c.id.clone(), c.points));

            let contents: Vec<ElementContent> = (0..ring.len())
                .map(|slot| self.slot_content(&bundle, slot, buffer.as_ref()))
                .collect();

            for (slot, ((container_id, points), content)) in ring.iter().zip(&contents).enumerate() {
                let (dock, dock_points, opacity) = match (&top, queued) {
                    (Some((top_id, top_points)), true) => (top_id.clone(), *top_points, 0.0),
                    _ => (container_id.clone(), *points, 1.0),
                };
                elements.push(ContentElement {
                    id: resident_id(&bundle, slot),
                    bundle_id: bundle.clone(),
                    container_id: dock,
                    role: ElementRole::Primary,
                    home_container_id: Some(container_id.clone()),
                    content: content.clone(),
                    points: dock_points,
                    opacity,
                });
            }

            for role in STAGING_ROLES {
                let Some(slot) = self.graph.teleport_container(&bundle, role) else {
                    continue;
                };
                let content = match (buffer, role) {
                    (Some(b), TeleportRole::Top) => self.item_content(&bundle, b.top_staged()),
                    (Some(b), _) => self.item_content(&bundle, b.bottom_staged()),
                    (None, TeleportRole::Top) => contents.last().cloned(),
                    (None, _) => contents.first().cloned(),
                };
                let Some(content) = content else {
                    continue;
                };
                elements.push(ContentElement {
                    id: staged_id(&bundle, role),
                    bundle_id: bundle.clone(),
                    container_id: slot.id.clone(),
                    role: ElementRole::Duplicate,
                    home_container_id: None,
                    content,
                    points: slot.points,
                    opacity: 0.0,
                });
            }

            if !queued {
                self.initialized.insert(bundle);
            }
        }
        self.graph.set_elements(elements);
    }

    fn item_content(&self, bundle: &str, index: usize) -> Option<ElementContent> {
        self.items(bundle)
            .get(index)
            .map(|item| ElementContent::from_item(index, item))
    }

    /// What ring slot `slot` shows when the pool is built.
    fn slot_content(&self, bundle: &str, slot: usize, buffer: Option<&CircularBuffer>) -> ElementContent {
        let index = buffer.map_or(slot, |b| b.item_at(slot));
        if let Some(content) = self.item_content(bundle, index) {
            return content;
        }
        let ring = self.graph.normal_containers(bundle);
        ElementContent::from_container(slot, ring[slot])
    }

    /// Content a ring slot currently resolves to: its docked resident, or the
    /// queued resident whose home it is.
    fn resident_content(&self, bundle: &str, container_id: &str) -> Option<ElementContent> {
        if let Some(e) = self.graph.docked(container_id) {
            return Some(e.content.clone());
        }
        self.graph
            .bundle_elements(bundle)
            .find(|e| !e.is_duplicate() && e.home_container_id.as_deref() == Some(container_id))
            .map(|e| e.content.clone())
    }

    /// Seat one hidden duplicate in each staging slot and refresh what it shows.
    ///
    /// Ring bundles cross the mirror: the top slot shows the bottommost resident
    /// and the bottom slot the topmost. Scrolling lists show the items just
    /// outside the visible window.
    pub(crate) fn restage(&mut self, bundle: &str) {
        let ring: Vec<String> = self
            .graph
            .normal_containers(bundle)
            .iter()
            .map(|c| c.id.clone())
            .collect();
        let (Some(first), Some(last)) = (ring.first(), ring.last()) else {
            return;
        };
        let buffer = self.buffers.get(bundle).copied();

        let mut slots = Vec::new();
        for role in STAGING_ROLES {
            let Some(c) = self.graph.teleport_container(bundle, role) else {
                continue;
            };
            let content = match (buffer, role) {
                (Some(b), TeleportRole::Top) => self.item_content(bundle, b.top_staged()),
                (Some(b), _) => self.item_content(bundle, b.bottom_staged()),
                (None, TeleportRole::Top) => self.resident_content(bundle, last),
                (None, _) => self.resident_content(bundle, first),
            };
            slots.push((c.id.clone(), content));
        }

        let mut duplicates: Vec<(String, String)> = self
            .graph
            .bundle_elements(bundle)
            .filter(|e| e.is_duplicate())
            .map(|e| (e.id.clone(), e.container_id.clone()))
            .collect();

        let mut seated: Vec<(String, String, Option<ElementContent>)> = Vec::new();
        let mut open = Vec::new();
        for (slot, content) in slots {
            match duplicates.iter().position(|(_, at)| *at == slot) {
                Some(i) => {
                    let (id, _) = duplicates.remove(i);
                    seated.push((id, slot, content));
                }
                None => open.push((slot, content)),
            }
        }
        for (slot, content) in open {
            if duplicates.is_empty() {
                break;
            }
            let (id, _) = duplicates.remove(0);
            seated.push((id, slot, content));
        }

        for (id, slot, content) in seated {
            self.tweens.cancel(&id);
            self.graph.teleport(&id, &slot);
            self.graph.set_opacity(&id, 0.0);
            if let (Some(content), Some(e)) = (content, self.graph.element_mut(&id)) {
                e.content = content;
            }
        }
    }

    /// Park every resident in the top slot, hidden.
    pub(crate) fn stow(&mut self, bundle: &str) {
        let Some(top) = self
            .graph
            .teleport_container(bundle, TeleportRole::Top)
            .map(|c| c.id.clone())
        else {
            return;
        };
        let residents: Vec<String> = self
            .graph
            .bundle_elements(bundle)
            .filter(|e| !e.is_duplicate())
            .map(|e| e.id.clone())
            .collect();
        for id in residents {
            self.tweens.cancel(&id);
            self.graph.teleport(&id, &top);
            self.graph.set_opacity(&id, 0.0);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/population.rs"]
mod tests;

//! Container graph: bundles, ring-ordered containers and the live content
//! elements, plus the dock table recording which element is authoritative for
//! each container.

use std::collections::HashMap;

use crate::foundation::core::{Point, Quad};
use crate::graph::model::{Bundle, Container, ContentElement, Direction, ElementRole, TeleportRole};

/// Result of a ring step: the target container and whether the step wrapped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RingStep {
    /// Container the element moves to.
    pub target: String,
    /// The step crossed from one end of the ring to the other.
    pub wrapped: bool,
}

/// Owner of the scene's bundles, containers and content elements.
#[derive(Clone, Debug, Default)]
pub struct ContainerGraph {
    bundles: Vec<Bundle>,
    containers: Vec<Container>,
    elements: Vec<ContentElement>,
    docks: HashMap<String, String>,
}

impl ContainerGraph {
    /// A graph with no elements; they are built on entering animate mode.
    pub fn new(bundles: Vec<Bundle>, containers: Vec<Container>) -> Self {
        Self {
            bundles,
            containers,
            elements: Vec::new(),
            docks: HashMap::new(),
        }
    }

    /// Bundles in display order.
    pub fn bundles(&self) -> &[Bundle] {
        &self.bundles
    }

    /// Mutable bundle list, for authoring.
    pub fn bundles_mut(&mut self) -> &mut Vec<Bundle> {
        &mut self.bundles
    }

    /// All containers, in ring order within each bundle.
    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    /// Mutable container list, for authoring.
    pub fn containers_mut(&mut self) -> &mut Vec<Container> {
        &mut self.containers
    }

    /// Every content element, duplicates included.
    pub fn elements(&self) -> &[ContentElement] {
        &self.elements
    }

    /// Bundle by id.
    pub fn bundle(&self, id: &str) -> Option<&Bundle> {
        self.bundles.iter().find(|b| b.id == id)
    }

    /// Container by id.
    pub fn container(&self, id: &str) -> Option<&Container> {
        self.containers.iter().find(|c| c.id == id)
    }

    /// Element by id.
    pub fn element(&self, id: &str) -> Option<&ContentElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Mutable element by id.
    pub fn element_mut(&mut self, id: &str) -> Option<&mut ContentElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Every element, mutably.
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut ContentElement> {
        self.elements.iter_mut()
    }

    /// Elements of one bundle.
    pub fn bundle_elements<'a>(
        &'a self,
        bundle_id: &'a str,
    ) -> impl Iterator<Item = &'a ContentElement> + 'a {
        self.elements.iter().filter(move |e| e.bundle_id == bundle_id)
    }

    /// Containers of `bundle_id` with no teleport role, in list (ring) order.
    pub fn normal_containers(&self, bundle_id: &str) -> Vec<&Container> {
        self.containers
            .iter()
            .filter(|c| c.bundle_id == bundle_id && c.is_normal())
            .collect()
    }

    /// Position of a normal container in its bundle's ring.
    pub fn ring_index(&self, container_id: &str) -> Option<usize> {
        let c = self.container(container_id)?;
        self.normal_containers(&c.bundle_id)
            .iter()
            .position(|n| n.id == container_id)
    }

    /// Next normal container in `dir`, wrapping at either end.
    pub fn ring_neighbor(&self, container_id: &str, dir: Direction) -> Option<RingStep> {
        let c = self.container(container_id)?;
        let ring = self.normal_containers(&c.bundle_id);
        let i = ring.iter().position(|n| n.id == container_id)?;
        let last = ring.len() - 1;
        let (target, wrapped) = match dir {
            Direction::Up if i == 0 => (last, true),
            Direction::Up => (i - 1, false),
            Direction::Down if i == last => (0, true),
            Direction::Down => (i + 1, false),
        };
        Some(RingStep {
            target: ring[target].id.clone(),
            wrapped,
        })
    }

    /// First container of `bundle_id` carrying `role`.
    pub fn teleport_container(&self, bundle_id: &str, role: TeleportRole) -> Option<&Container> {
        self.containers
            .iter()
            .find(|c| c.bundle_id == bundle_id && c.teleport_role == Some(role))
    }

    /// Per-container teleport override for `dir`, ignored when it points at a
    /// container that itself has a teleport role.
    pub fn explicit_teleport_target(&self, container_id: &str, dir: Direction) -> Option<&Container> {
        let c = self.container(container_id)?;
        let target_id = match dir {
            Direction::Up => c.above_teleport_container_id.as_deref(),
            Direction::Down => c.below_teleport_container_id.as_deref(),
        }?;
        self.container(target_id).filter(|t| t.is_normal())
    }

    /// Topmost interactive or normal container under `p`, last drawn first.
    pub fn container_at(&self, p: Point) -> Option<&Container> {
        self.containers.iter().rev().find(|c| c.contains(p))
    }

    /// Element currently authoritative for `container_id`.
    pub fn docked(&self, container_id: &str) -> Option<&ContentElement> {
        self.docks
            .get(container_id)
            .and_then(|id| self.element(id))
    }

    /// Id of the element docked in `container_id`.
    pub fn docked_id(&self, container_id: &str) -> Option<&str> {
        self.docks.get(container_id).map(String::as_str)
    }

    /// Replace the element set (entering animate mode) and rebuild the dock table.
    pub fn set_elements(&mut self, elements: Vec<ContentElement>) {
        self.elements = elements;
        self.docks.clear();
        let ids: Vec<(String, String)> = self
            .elements
            .iter()
            .map(|e| (e.id.clone(), e.container_id.clone()))
            .collect();
        for (id, container) in ids {
            self.record_dock(&id, &container);
        }
    }

    /// Drop every element and dock.
    pub fn clear_elements(&mut self) {
        self.elements.clear();
        self.docks.clear();
    }

    /// Commit `element_id` as docked in `container_id` (logical move, geometry untouched).
    pub fn settle(&mut self, element_id: &str, container_id: &str) {
        let Some(e) = self.element_mut(element_id) else {
            return;
        };
        e.container_id = container_id.to_owned();
        self.docks.retain(|_, v| v != element_id);
        self.record_dock(element_id, container_id);
    }

    /// Move an element instantly: geometry snaps to the container and the dock is committed.
    pub fn teleport(&mut self, element_id: &str, container_id: &str) {
        let Some(points) = self.container(container_id).map(|c| c.points) else {
            return;
        };
        if let Some(e) = self.element_mut(element_id) {
            e.points = points;
        }
        self.settle(element_id, container_id);
    }

    /// Change an element's role and re-commit its dock under the new role.
    pub fn set_role(&mut self, element_id: &str, role: ElementRole) {
        let Some(e) = self.element_mut(element_id) else {
            return;
        };
        e.role = role;
        let container = e.container_id.clone();
        self.settle(element_id, &container);
    }

    /// First visible primary whose logical dock is `container_id`.
    pub fn visible_in(&self, container_id: &str) -> Option<&ContentElement> {
        self.elements
            .iter()
            .find(|e| !e.is_duplicate() && e.is_visible() && e.container_id == container_id)
    }

    /// Overwrite an element's corners.
    pub fn set_points(&mut self, element_id: &str, points: Quad) {
        if let Some(e) = self.element_mut(element_id) {
            e.points = points;
        }
    }

    /// Set an element's opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, element_id: &str, opacity: f64) {
        if let Some(e) = self.element_mut(element_id) {
            e.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    /// Primaries dock in normal containers; duplicates dock in staging slots.
    /// Anything else (queued primaries in a staging slot) is not authoritative.
    fn record_dock(&mut self, element_id: &str, container_id: &str) {
        let Some(role) = self.element(element_id).map(|e| e.role) else {
            return;
        };
        let Some(c) = self.container(container_id) else {
            return;
        };
        let authoritative = match role {
            ElementRole::Primary => c.is_normal(),
            ElementRole::Duplicate => c.is_staging(),
        };
        if authoritative {
            self.docks
                .insert(container_id.to_owned(), element_id.to_owned());
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/graph.rs"]
mod tests;

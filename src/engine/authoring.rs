//! Bundle and container editing, available outside animate mode only.

use crate::config::snapshot::BundleItems;
use crate::engine::orchestrator::Engine;
use crate::foundation::core::Point;
use crate::foundation::error::{QuadmorphError, QuadmorphResult};
use crate::graph::model::{Bundle, Container, TeleportRole, generate_items};

/// Which relationship of a container a link setter changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Link {
    /// `aboveContainerId`; stored and validated, ring order still decides scrolling.
    Above,
    /// `belowContainerId`; stored and validated like `Above`.
    Below,
    /// `aboveTeleportContainerId`, the target an up scroll sends this container's element to.
    AboveTeleport,
    /// `belowTeleportContainerId`, the down-scroll counterpart.
    BelowTeleport,
}

impl Engine {
    fn ensure_authoring(&self, op: &str) -> QuadmorphResult<()> {
        if self.animate_mode {
            return Err(QuadmorphError::validation(format!(
                "{op} is not available in animate mode"
            )));
        }
        Ok(())
    }

    fn require_bundle(&self, bundle_id: &str) -> QuadmorphResult<()> {
        if self.graph.bundle(bundle_id).is_none() {
            return Err(QuadmorphError::validation(format!(
                "unknown bundle \"{bundle_id}\""
            )));
        }
        Ok(())
    }

    fn container_mut(&mut self, container_id: &str) -> QuadmorphResult<&mut Container> {
        self.graph
            .containers_mut()
            .iter_mut()
            .find(|c| c.id == container_id)
            .ok_or_else(|| {
                QuadmorphError::validation(format!("unknown container \"{container_id}\""))
            })
    }

    fn fresh_id(&self, prefix: &str, taken: impl Fn(&str) -> bool) -> String {
        (1..)
            .map(|n| format!("{prefix}-{n}"))
            .find(|id| !taken(id))
            .unwrap_or_else(|| prefix.to_owned())
    }

    /// Add an empty bundle, returning its id.
    pub fn add_bundle(&mut self, name: Option<&str>) -> QuadmorphResult<String> {
        self.ensure_authoring("add_bundle")?;
        let id = self.fresh_id("bundle", |id| self.graph.bundle(id).is_some());
        let name = name
            .map(str::to_owned)
            .unwrap_or_else(|| format!("Bundle {}", self.graph.bundles().len() + 1));
        self.graph.bundles_mut().push(Bundle {
            id: id.clone(),
            name,
        });
        Ok(id)
    }

    /// Remove a bundle with its containers and items. The last bundle stays.
    pub fn remove_bundle(&mut self, bundle_id: &str) -> QuadmorphResult<()> {
        self.ensure_authoring("remove_bundle")?;
        self.require_bundle(bundle_id)?;
        if self.graph.bundles().len() <= 1 {
            return Err(QuadmorphError::validation("cannot remove the last bundle"));
        }
        let removed: Vec<String> = self
            .graph
            .containers()
            .iter()
            .filter(|c| c.bundle_id == bundle_id)
            .map(|c| c.id.clone())
            .collect();
        self.graph.bundles_mut().retain(|b| b.id != bundle_id);
        self.graph.containers_mut().retain(|c| c.bundle_id != bundle_id);
        for id in &removed {
            self.unlink(id);
        }
        self.bundle_items.remove(bundle_id);
        self.visible_start.remove(bundle_id);
        Ok(())
    }

    /// Add a normal container with the default rectangle and colors.
    pub fn add_container(&mut self, bundle_id: &str, name: Option<&str>) -> QuadmorphResult<String> {
        self.ensure_authoring("add_container")?;
        self.require_bundle(bundle_id)?;
        let id = self.fresh_id("container", |id| self.graph.container(id).is_some());
        let count = self
            .graph
            .containers()
            .iter()
            .filter(|c| c.bundle_id == bundle_id)
            .count();
        let name = name
            .map(str::to_owned)
            .unwrap_or_else(|| format!("Container {}", count + 1));
        let mut c = Container::new(id.clone(), bundle_id, name);
        c.color = self.default_color.clone();
        c.content_color = self.default_color.clone();
        self.graph.containers_mut().push(c);
        Ok(id)
    }

    /// Remove a container and every link pointing at it.
    pub fn remove_container(&mut self, container_id: &str) -> QuadmorphResult<()> {
        self.ensure_authoring("remove_container")?;
        self.container_mut(container_id)?;
        self.graph.containers_mut().retain(|c| c.id != container_id);
        self.unlink(container_id);
        Ok(())
    }

    fn unlink(&mut self, container_id: &str) {
        let target = Some(container_id.to_owned());
        for c in self.graph.containers_mut().iter_mut() {
            for link in [
                &mut c.above_container_id,
                &mut c.below_container_id,
                &mut c.above_teleport_container_id,
                &mut c.below_teleport_container_id,
            ] {
                if *link == target {
                    *link = None;
                }
            }
        }
    }

    /// Move one corner (0 = TL, 1 = TR, 2 = BR, 3 = BL).
    pub fn move_vertex(&mut self, container_id: &str, index: usize, to: Point) -> QuadmorphResult<()> {
        self.ensure_authoring("move_vertex")?;
        if index >= 4 {
            return Err(QuadmorphError::validation(format!(
                "vertex index {index} out of range 0..4"
            )));
        }
        if !(to.x.is_finite() && to.y.is_finite()) {
            return Err(QuadmorphError::validation("vertex must be finite"));
        }
        self.container_mut(container_id)?.points.0[index] = to;
        Ok(())
    }

    /// Move a container to position `new_index` among its bundle's containers,
    /// changing ring order.
    pub fn reorder_container(&mut self, container_id: &str, new_index: usize) -> QuadmorphResult<()> {
        self.ensure_authoring("reorder_container")?;
        let bundle = self.container_mut(container_id)?.bundle_id.clone();
        let containers = self.graph.containers_mut();
        let Some(from) = containers.iter().position(|c| c.id == container_id) else {
            return Ok(());
        };
        let moved = containers.remove(from);
        let positions: Vec<usize> = containers
            .iter()
            .enumerate()
            .filter(|(_, c)| c.bundle_id == bundle)
            .map(|(i, _)| i)
            .collect();
        let at = match positions.get(new_index) {
            Some(&i) => i,
            None => positions.last().map_or(containers.len(), |&i| i + 1),
        };
        containers.insert(at, moved);
        Ok(())
    }

    /// Set or clear a teleport role. A bundle keeps at most one top and one bottom slot.
    pub fn set_teleport_role(
        &mut self,
        container_id: &str,
        role: Option<TeleportRole>,
    ) -> QuadmorphResult<()> {
        self.ensure_authoring("set_teleport_role")?;
        let bundle = self.container_mut(container_id)?.bundle_id.clone();
        if let Some(r) = role.filter(|r| r.is_staging())
            && let Some(other) = self.graph.teleport_container(&bundle, r)
            && other.id != container_id
        {
            return Err(QuadmorphError::validation(format!(
                "bundle \"{bundle}\" already has a {r:?} teleport container (\"{}\")",
                other.id
            )));
        }
        self.container_mut(container_id)?.teleport_role = role;
        Ok(())
    }

    /// Point one of the container's links at `target`, or clear it with `None`.
    pub fn set_link(
        &mut self,
        container_id: &str,
        link: Link,
        target: Option<&str>,
    ) -> QuadmorphResult<()> {
        self.ensure_authoring("set_link")?;
        if let Some(t) = target
            && self.graph.container(t).is_none()
        {
            return Err(QuadmorphError::validation(format!(
                "unknown container \"{t}\""
            )));
        }
        let c = self.container_mut(container_id)?;
        let slot = match link {
            Link::Above => &mut c.above_container_id,
            Link::Below => &mut c.below_container_id,
            Link::AboveTeleport => &mut c.above_teleport_container_id,
            Link::BelowTeleport => &mut c.below_teleport_container_id,
        };
        *slot = target.map(str::to_owned);
        Ok(())
    }

    /// Replace a bundle's items with `count` generated ones.
    pub fn set_bundle_items(&mut self, bundle_id: &str, count: usize) -> QuadmorphResult<()> {
        self.ensure_authoring("set_bundle_items")?;
        self.require_bundle(bundle_id)?;
        if count == 0 {
            self.bundle_items.remove(bundle_id);
        } else {
            self.bundle_items.insert(
                bundle_id.to_owned(),
                BundleItems {
                    number_of_items: count,
                    items: generate_items(count, &self.default_color),
                },
            );
        }
        self.visible_start.remove(bundle_id);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/authoring.rs"]
mod tests;

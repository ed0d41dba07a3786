use std::collections::{BTreeMap, HashSet};

use crate::foundation::core::{BoxRegion, Rgba8};
use crate::foundation::error::{QuadmorphError, QuadmorphResult};
use crate::graph::model::{Bundle, Container, DEFAULT_COLOR, Item, TeleportRole, generate_items};

/// Stagger between releases in an open cascade, in seconds.
pub const DEFAULT_CASCADE_DELAY: f64 = 0.4;
/// Largest accepted `cascadeDelay`.
pub const MAX_CASCADE_DELAY: f64 = 2.0;

const LEGACY_ITEM_COUNT_KEY: &str = "numberOfItems";
const LEGACY_ITEMS_KEY: &str = "items";
const QUAD_ARITY_MESSAGE: &str = "a quad needs exactly 4 points";

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Scrolling-list items of one bundle.
pub struct BundleItems {
    /// Declared count; items are generated when the list is shorter.
    #[serde(default)]
    pub number_of_items: usize,
    /// The items, in list order.
    #[serde(default)]
    pub items: Vec<Item>,
}

/// Flat import/export snapshot of everything the engine is built from.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Bundles in display order.
    #[serde(default)]
    pub bundles: Vec<Bundle>,
    /// Containers of every bundle, in ring order within a bundle.
    #[serde(default)]
    pub containers: Vec<Container>,
    /// Elements are clipped to this region in animate mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport_box: Option<BoxRegion>,
    /// Wheel input outside this region is ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hitbox: Option<BoxRegion>,
    /// Color given to new containers.
    #[serde(default = "default_color")]
    pub default_color: String,
    /// Font color of the element under the pointer.
    #[serde(default)]
    pub hover_color: Option<String>,
    /// Stagger of the open cascade, in seconds. [`EngineConfig::validate`]
    /// rejects values outside `[0, MAX_CASCADE_DELAY]`.
    #[serde(default = "default_cascade_delay")]
    pub cascade_delay: f64,
    /// Scrolling-list items per bundle id.
    #[serde(default)]
    pub bundle_items: BTreeMap<String, BundleItems>,
    /// Index of the topmost visible item per list bundle.
    #[serde(default)]
    pub visible_start_index: BTreeMap<String, usize>,
    /// Export stamp; informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<String>,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_owned()
}

fn default_cascade_delay() -> f64 {
    DEFAULT_CASCADE_DELAY
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bundles: vec![default_bundle()],
            containers: Vec::new(),
            viewport_box: None,
            hitbox: None,
            default_color: default_color(),
            hover_color: None,
            cascade_delay: DEFAULT_CASCADE_DELAY,
            bundle_items: BTreeMap::new(),
            visible_start_index: BTreeMap::new(),
            exported_at: None,
        }
    }
}

fn default_bundle() -> Bundle {
    Bundle {
        id: "bundle-1".to_owned(),
        name: "Bundle 1".to_owned(),
    }
}

impl EngineConfig {
    /// Parse and validate a snapshot, upgrading the legacy single-list item keys.
    #[tracing::instrument(skip(json), fields(len = json.len()))]
    pub fn from_json_str(json: &str) -> QuadmorphResult<Self> {
        let mut value: serde_json::Value = serde_json::from_str(json)?;
        let legacy = value.as_object_mut().and_then(take_legacy_items);

        let mut cfg: Self = serde_json::from_value(value).map_err(|e| {
            let msg = e.to_string();
            if msg.contains(QUAD_ARITY_MESSAGE) {
                QuadmorphError::validation(msg)
            } else {
                QuadmorphError::serde(msg)
            }
        })?;
        if cfg.bundles.is_empty() {
            cfg.bundles.push(default_bundle());
        }
        if let Some(count) = legacy
            && cfg.bundle_items.is_empty()
            && let Some(first) = cfg.bundles.first()
        {
            tracing::debug!(bundle = %first.id, count, "upgrading legacy item list");
            cfg.bundle_items.insert(
                first.id.clone(),
                BundleItems {
                    number_of_items: count,
                    items: generate_items(count, &cfg.default_color),
                },
            );
        }
        cfg.exported_at = None;
        cfg.validate()?;
        tracing::debug!(
            bundles = cfg.bundles.len(),
            containers = cfg.containers.len(),
            "config loaded"
        );
        Ok(cfg)
    }

    /// Serialize for export, stamping `exportedAt`.
    pub fn to_json(&self, exported_at: Option<&str>) -> QuadmorphResult<String> {
        let mut out = self.clone();
        out.exported_at = exported_at.map(str::to_owned);
        Ok(serde_json::to_string_pretty(&out)?)
    }

    /// Items of `bundle_id`; empty when it is not a list.
    pub fn items(&self, bundle_id: &str) -> &[Item] {
        self.bundle_items
            .get(bundle_id)
            .map(|b| b.items.as_slice())
            .unwrap_or(&[])
    }

    /// Check ids, references and geometry.
    pub fn validate(&self) -> QuadmorphResult<()> {
        let mut bundle_ids = HashSet::new();
        for b in &self.bundles {
            if !bundle_ids.insert(b.id.as_str()) {
                return Err(QuadmorphError::validation(format!(
                    "duplicate bundle id \"{}\"",
                    b.id
                )));
            }
        }

        let mut container_ids = HashSet::new();
        for c in &self.containers {
            if !container_ids.insert(c.id.as_str()) {
                return Err(QuadmorphError::validation(format!(
                    "duplicate container id \"{}\"",
                    c.id
                )));
            }
        }

        let mut staging: HashSet<(&str, TeleportRole)> = HashSet::new();
        for c in &self.containers {
            if !bundle_ids.contains(c.bundle_id.as_str()) {
                return Err(QuadmorphError::validation(format!(
                    "container \"{}\" references unknown bundle \"{}\"",
                    c.id, c.bundle_id
                )));
            }
            if !c.points.is_finite() {
                return Err(QuadmorphError::validation(format!(
                    "container \"{}\" has non-finite coordinates",
                    c.id
                )));
            }
            for link in [
                &c.above_container_id,
                &c.below_container_id,
                &c.above_teleport_container_id,
                &c.below_teleport_container_id,
            ]
            .into_iter()
            .flatten()
            {
                if !container_ids.contains(link.as_str()) {
                    return Err(QuadmorphError::validation(format!(
                        "container \"{}\" links to unknown container \"{link}\"",
                        c.id
                    )));
                }
            }
            for color in [&c.color, &c.content_color, &c.font_color] {
                check_color(color, &c.id)?;
            }
            if let Some(role) = c.teleport_role.filter(|r| r.is_staging())
                && !staging.insert((c.bundle_id.as_str(), role))
            {
                return Err(QuadmorphError::validation(format!(
                    "bundle \"{}\" has more than one {role:?} teleport container",
                    c.bundle_id
                )));
            }
        }

        if !(0.0..=MAX_CASCADE_DELAY).contains(&self.cascade_delay) {
            return Err(QuadmorphError::validation(format!(
                "cascadeDelay must be within [0, {MAX_CASCADE_DELAY}], got {}",
                self.cascade_delay
            )));
        }
        check_color(&self.default_color, "defaultColor")?;
        if let Some(h) = &self.hover_color {
            check_color(h, "hoverColor")?;
        }
        if let Some(v) = &self.viewport_box {
            v.validate("viewportBox")?;
        }
        if let Some(h) = &self.hitbox {
            h.validate("hitbox")?;
        }
        for (bundle, items) in &self.bundle_items {
            if !bundle_ids.contains(bundle.as_str()) {
                return Err(QuadmorphError::validation(format!(
                    "bundleItems references unknown bundle \"{bundle}\""
                )));
            }
            for item in &items.items {
                check_color(&item.color, &item.id)?;
                check_color(&item.font_color, &item.id)?;
            }
        }
        Ok(())
    }
}

fn check_color(color: &str, owner: &str) -> QuadmorphResult<()> {
    Rgba8::parse_hex(color)
        .map(|_| ())
        .map_err(|e| QuadmorphError::validation(format!("{owner}: {e}")))
}

/// Pull the pre-bundle item keys out of the raw object, returning the item count.
fn take_legacy_items(obj: &mut serde_json::Map<String, serde_json::Value>) -> Option<usize> {
    let count = obj
        .remove(LEGACY_ITEM_COUNT_KEY)
        .and_then(|v| v.as_u64())
        .map(|n| n as usize);
    let listed = obj
        .remove(LEGACY_ITEMS_KEY)
        .and_then(|v| v.as_array().map(Vec::len));
    count.or(listed)
}

#[cfg(test)]
#[path = "../../tests/unit/config/snapshot.rs"]
mod tests;

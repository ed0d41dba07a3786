use crate::foundation::core::{Point, Quad, Rect};

/// Container and item fill used when none is given.
pub const DEFAULT_COLOR: &str = "#1a1a1a";
/// Glyph color used when none is given.
pub const DEFAULT_FONT_COLOR: &str = "#ffffff";

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Independent animation group.
pub struct Bundle {
    /// Unique id.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Special behaviour of a container. Containers without a role are "normal"
/// and take part in ring navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeleportRole {
    /// Invisible staging slot above the ring.
    Top,
    /// Invisible staging slot below the ring.
    Bottom,
    /// Opens or closes its bundle when clicked.
    Button,
    /// Toggles every bundle's visibility when clicked.
    Toggle,
}

impl TeleportRole {
    /// `Top` or `Bottom`.
    pub fn is_staging(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Scroll direction through a bundle's ring.
pub enum Direction {
    /// Toward the topmost container.
    Up,
    /// Toward the bottommost container.
    Down,
}

impl Direction {
    /// The other direction.
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Staging slot an element leaves through when wrapping in this direction.
    pub fn exit_role(self) -> TeleportRole {
        match self {
            Self::Up => TeleportRole::Top,
            Self::Down => TeleportRole::Bottom,
        }
    }

    /// Staging slot the replacement enters from.
    pub fn entry_role(self) -> TeleportRole {
        match self {
            Self::Up => TeleportRole::Bottom,
            Self::Down => TeleportRole::Top,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Quadrilateral slot content elements dock into.
pub struct Container {
    /// Unique id.
    pub id: String,
    /// Owning bundle.
    pub bundle_id: String,
    /// Display name; ring residents derive their text from it.
    pub name: String,
    /// Corners, clockwise from top-left.
    pub points: Quad,
    /// Outline and trigger fill color.
    #[serde(default = "default_color")]
    pub color: String,
    /// Fill of the element shown in this container in ring mode.
    #[serde(default = "default_color")]
    pub content_color: String,
    /// Glyph color of that element.
    #[serde(default = "default_font_color")]
    pub font_color: String,
    /// Image drawn instead of the element's text.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Neighbour link, kept for export.
    #[serde(default)]
    pub above_container_id: Option<String>,
    /// Neighbour link, kept for export.
    #[serde(default)]
    pub below_container_id: Option<String>,
    /// Explicit target of an up scroll from this container.
    #[serde(default)]
    pub above_teleport_container_id: Option<String>,
    /// Explicit target of a down scroll from this container.
    #[serde(default)]
    pub below_teleport_container_id: Option<String>,
    /// Special behaviour; `None` for ring containers.
    #[serde(default, rename = "teleportType")]
    pub teleport_role: Option<TeleportRole>,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_owned()
}

fn default_font_color() -> String {
    DEFAULT_FONT_COLOR.to_owned()
}

impl Container {
    /// A normal container with the authoring defaults: a 400x200 rectangle at (300, 300).
    pub fn new(id: impl Into<String>, bundle_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            bundle_id: bundle_id.into(),
            name: name.into(),
            points: Quad::from_rect(Rect::new(300.0, 300.0, 700.0, 500.0)),
            color: default_color(),
            content_color: default_color(),
            font_color: default_font_color(),
            image_url: None,
            above_container_id: None,
            below_container_id: None,
            above_teleport_container_id: None,
            below_teleport_container_id: None,
            teleport_role: None,
        }
    }

    /// Replace the corners, builder style.
    pub fn with_points(mut self, points: Quad) -> Self {
        self.points = points;
        self
    }

    /// Give the container a role, builder style.
    pub fn with_role(mut self, role: TeleportRole) -> Self {
        self.teleport_role = Some(role);
        self
    }

    /// No role: part of the ring.
    pub fn is_normal(&self) -> bool {
        self.teleport_role.is_none()
    }

    /// A top or bottom staging slot.
    pub fn is_staging(&self) -> bool {
        self.teleport_role.is_some_and(TeleportRole::is_staging)
    }

    /// Whether `p` lies inside the quad.
    pub fn contains(&self, p: Point) -> bool {
        self.points.contains(p)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Entry of a scrolling list.
pub struct Item {
    /// Unique within the list.
    pub id: String,
    /// Label rendered with the glyph dictionary.
    pub text: String,
    /// Element fill.
    #[serde(default = "default_color")]
    pub color: String,
    /// Glyph color.
    #[serde(default = "default_font_color")]
    pub font_color: String,
    /// Image drawn instead of the text.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Items `item-1..item-n` labelled `ITEM 1..ITEM n`, filled with `color` and white text.
pub fn generate_items(count: usize, color: &str) -> Vec<Item> {
    (1..=count)
        .map(|n| Item {
            id: format!("item-{n}"),
            text: format!("ITEM {n}"),
            color: color.to_owned(),
            font_color: default_font_color(),
            image_url: None,
        })
        .collect()
}

/// Whether an element is a ring resident or one of a bundle's two staged duplicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementRole {
    /// Resident that docks in a ring container.
    Primary,
    /// Invisible copy parked in a staging slot.
    Duplicate,
}

/// What an element displays; copied between elements when duplicates are re-staged.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementContent {
    /// Position in the item list, or in the ring for ring bundles.
    pub item_index: Option<usize>,
    /// Label to render.
    pub text: String,
    /// Element fill.
    pub color: String,
    /// Glyph color.
    pub font_color: String,
    /// Image drawn instead of the text.
    pub image_url: Option<String>,
}

impl ElementContent {
    /// Content of list item `index`.
    pub fn from_item(index: usize, item: &Item) -> Self {
        Self {
            item_index: Some(index),
            text: item.text.clone(),
            color: item.color.clone(),
            font_color: item.font_color.clone(),
            image_url: item.image_url.clone(),
        }
    }

    /// Content derived from a container in ring mode ("Container 3" reads "Item 3").
    pub fn from_container(index: usize, c: &Container) -> Self {
        Self {
            item_index: Some(index),
            text: c.name.replace("Container", "Item"),
            color: c.content_color.clone(),
            font_color: c.font_color.clone(),
            image_url: c.image_url.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Moving, renderable instance docked to a container.
pub struct ContentElement {
    /// Stable id for the lifetime of animate mode.
    pub id: String,
    /// Owning bundle.
    pub bundle_id: String,
    /// Logical dock; authoritative once a transition settles.
    pub container_id: String,
    /// Resident or staged duplicate.
    pub role: ElementRole,
    /// Where an open cascade delivers this element.
    pub home_container_id: Option<String>,
    /// What the element shows.
    pub content: ElementContent,
    /// Live geometry, possibly mid-animation.
    pub points: Quad,
    /// In `[0, 1]`; zero hides the element.
    pub opacity: f64,
}

impl ContentElement {
    /// Whether this is a staged duplicate.
    pub fn is_duplicate(&self) -> bool {
        self.role == ElementRole::Duplicate
    }

    /// Opacity above zero.
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

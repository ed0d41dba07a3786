use crate::foundation::error::{QuadmorphError, QuadmorphResult};
use crate::foundation::math::lerp;

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Four ordered corners (TL, TR, BR, BL) of a simple quadrilateral.
///
/// Serialized as a plain array of `{x, y}` points; any other length is rejected
/// at deserialization time.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Quad(pub [Point; 4]);

impl TryFrom<Vec<Point>> for Quad {
    type Error = QuadmorphError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        let n = points.len();
        let corners: [Point; 4] = points.try_into().map_err(|_| {
            QuadmorphError::validation(format!("a quad needs exactly 4 points, got {n}"))
        })?;
        Ok(Self(corners))
    }
}

impl From<Quad> for Vec<Point> {
    fn from(q: Quad) -> Self {
        q.0.to_vec()
    }
}

impl Quad {
    /// Build a quad from its corners in TL, TR, BR, BL order.
    pub fn new(tl: Point, tr: Point, br: Point, bl: Point) -> Self {
        Self([tl, tr, br, bl])
    }

    /// Axis-aligned rectangle as a quad.
    pub fn from_rect(r: Rect) -> Self {
        Self::new(
            Point::new(r.x0, r.y0),
            Point::new(r.x1, r.y0),
            Point::new(r.x1, r.y1),
            Point::new(r.x0, r.y1),
        )
    }

    /// Corners in TL, TR, BR, BL order.
    pub fn corners(&self) -> &[Point; 4] {
        &self.0
    }

    /// Top-left corner.
    pub fn tl(&self) -> Point {
        self.0[0]
    }

    /// Top-right corner.
    pub fn tr(&self) -> Point {
        self.0[1]
    }

    /// Bottom-right corner.
    pub fn br(&self) -> Point {
        self.0[2]
    }

    /// Bottom-left corner.
    pub fn bl(&self) -> Point {
        self.0[3]
    }

    /// True when every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|p| p.x.is_finite() && p.y.is_finite())
    }

    /// Axis-aligned bounding box of the corners.
    pub fn bounds(&self) -> Rect {
        let mut r = Rect::from_points(self.0[0], self.0[0]);
        for p in &self.0[1..] {
            r = r.union_pt(*p);
        }
        r
    }

    /// Arithmetic mean of the corners.
    pub fn centroid(&self) -> Point {
        let (sx, sy) = self
            .0
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point::new(sx / 4.0, sy / 4.0)
    }

    /// Corner-wise interpolation towards `other`; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(&self, other: &Quad, t: f64) -> Quad {
        let mut out = self.0;
        for (o, (a, b)) in out.iter_mut().zip(self.0.iter().zip(other.0.iter())) {
            *o = Point::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t));
        }
        Quad(out)
    }

    /// Column `i` of `n` equal-width slices, split along the TL-TR and BL-BR edges.
    pub fn column(&self, i: usize, n: usize) -> Quad {
        let n = n.max(1) as f64;
        let f0 = i as f64 / n;
        let f1 = (i as f64 + 1.0) / n;
        let top = |f: f64| self.tl().lerp(self.tr(), f);
        let bottom = |f: f64| self.bl().lerp(self.br(), f);
        Quad::new(top(f0), top(f1), bottom(f1), bottom(f0))
    }

    /// Even-odd ray-casting containment test.
    pub fn contains(&self, p: Point) -> bool {
        let mut inside = false;
        let mut j = 3;
        for i in 0..4 {
            let (a, b) = (self.0[i], self.0[j]);
            if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Closed outline path through the four corners.
    pub fn to_path(&self) -> BezPath {
        let mut p = BezPath::new();
        p.move_to(self.0[0]);
        for c in &self.0[1..] {
            p.line_to(*c);
        }
        p.close_path();
        p
    }
}

/// Axis-aligned box used for the viewport clip and the wheel hitbox.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoxRegion {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width; never negative in a valid region.
    pub width: f64,
    /// Height; never negative in a valid region.
    pub height: f64,
}

impl BoxRegion {
    /// Inclusive containment, matching pointer hit-testing.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// The same box as a kurbo [`Rect`].
    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Reject non-finite coordinates and negative sizes; `what` names the region in the error.
    pub fn validate(&self, what: &str) -> QuadmorphResult<()> {
        let finite = [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.width < 0.0 || self.height < 0.0 {
            return Err(QuadmorphError::validation(format!(
                "{what} must have finite coordinates and non-negative size"
            )));
        }
        Ok(())
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha; 255 is opaque.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white.
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    /// Fully opaque color from three channels.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional, case-insensitive).
    pub fn parse_hex(s: &str) -> QuadmorphResult<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);

        fn hex_byte(pair: &str) -> QuadmorphResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| QuadmorphError::validation(format!("invalid hex byte \"{pair}\"")))
        }

        if !hex.is_ascii() {
            return Err(QuadmorphError::validation(format!("invalid color \"{s}\"")));
        }
        match hex.len() {
            3 => {
                let nib = |i: usize| hex_byte(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Self::opaque(nib(0)?, nib(1)?, nib(2)?))
            }
            6 => Ok(Self::opaque(
                hex_byte(&hex[0..2])?,
                hex_byte(&hex[2..4])?,
                hex_byte(&hex[4..6])?,
            )),
            8 => Ok(Self {
                r: hex_byte(&hex[0..2])?,
                g: hex_byte(&hex[2..4])?,
                b: hex_byte(&hex[4..6])?,
                a: hex_byte(&hex[6..8])?,
            }),
            _ => Err(QuadmorphError::validation(format!(
                "color \"{s}\" must be #RGB, #RRGGBB or #RRGGBBAA"
            ))),
        }
    }

    /// Same color with its alpha scaled by `opacity` in `[0, 1]`.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let a = (f64::from(self.a) * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

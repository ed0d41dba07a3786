//! Glyph outline parsing and perspective warping.
//!
//! Outlines use the SVG path mini-language (`M L H V C Q A Z`, absolute and
//! relative). Elliptical arcs are flattened to polylines at parse time so the
//! projective warp only ever sees points; `BezPath::from_svg` would turn them
//! into cubics, which do not stay on the ellipse once warped.

use kurbo::{Arc, SvgArc};

use crate::foundation::core::{Affine, BezPath, Point, Vec2};
use crate::foundation::error::{QuadmorphError, QuadmorphResult};
use crate::geometry::perspective::PerspectiveTransform;

/// Segments used when flattening one elliptical arc.
pub const ARC_SEGMENTS: usize = 40;

/// Parse an SVG path string into a source-space path with arcs flattened.
pub fn parse_svg_path(d: &str) -> QuadmorphResult<BezPath> {
    let mut out = BezPath::new();
    let mut lexer = Lexer::new(d);
    let mut current = Point::ZERO;
    let mut start = Point::ZERO;
    let mut cmd: Option<char> = None;

    while let Some(tok) = lexer.next_command_or_number()? {
        let c = match tok {
            Token::Command(c) => c,
            // Implicit repetition of the previous command; M repeats as L.
            Token::Number(_) => match cmd {
                Some('M') => 'L',
                Some('m') => 'l',
                Some(c) if !matches!(c, 'Z' | 'z') => c,
                _ => {
                    return Err(QuadmorphError::validation(format!(
                        "path data \"{d}\" has a number without a command"
                    )));
                }
            },
        };
        if matches!(tok, Token::Command(_)) {
            lexer.commit_command();
        }
        let rel = c.is_ascii_lowercase();
        let base = |p: Point, rel: bool| if rel { p } else { Point::ZERO };

        match c.to_ascii_uppercase() {
            'M' => {
                let p = lexer.point()? + base(current, rel).to_vec2();
                out.move_to(p);
                current = p;
                start = p;
            }
            'L' => {
                let p = lexer.point()? + base(current, rel).to_vec2();
                out.line_to(p);
                current = p;
            }
            'H' => {
                let x = lexer.number()?;
                let p = Point::new(if rel { current.x + x } else { x }, current.y);
                out.line_to(p);
                current = p;
            }
            'V' => {
                let y = lexer.number()?;
                let p = Point::new(current.x, if rel { current.y + y } else { y });
                out.line_to(p);
                current = p;
            }
            'C' => {
                let off = base(current, rel).to_vec2();
                let c1 = lexer.point()? + off;
                let c2 = lexer.point()? + off;
                let p = lexer.point()? + off;
                out.curve_to(c1, c2, p);
                current = p;
            }
            'Q' => {
                let off = base(current, rel).to_vec2();
                let c1 = lexer.point()? + off;
                let p = lexer.point()? + off;
                out.quad_to(c1, p);
                current = p;
            }
            'A' => {
                let rx = lexer.number()?;
                let ry = lexer.number()?;
                let rotation = lexer.number()?;
                let large_arc = lexer.flag()?;
                let sweep = lexer.flag()?;
                let p = lexer.point()? + base(current, rel).to_vec2();
                for q in arc_to_polyline(current, rx, ry, rotation, large_arc, sweep, p, ARC_SEGMENTS)
                    .into_iter()
                    .skip(1)
                {
                    out.line_to(q);
                }
                current = p;
            }
            'Z' => {
                out.close_path();
                current = start;
            }
            other => {
                return Err(QuadmorphError::validation(format!(
                    "unsupported path command '{other}' in \"{d}\""
                )));
            }
        }
        cmd = Some(c);
    }

    Ok(out)
}

/// Flatten an SVG endpoint-parameterized elliptical arc into `segments + 1` points.
///
/// The first point is `from` and the last is `to`. Radii too small to span the
/// endpoints are scaled up; a zero radius degenerates to a straight segment.
#[allow(clippy::too_many_arguments)]
pub fn arc_to_polyline(
    from: Point,
    rx: f64,
    ry: f64,
    rotation_deg: f64,
    large_arc: bool,
    sweep: bool,
    to: Point,
    segments: usize,
) -> Vec<Point> {
    let segments = segments.max(1);
    let svg = SvgArc {
        from,
        to,
        radii: Vec2::new(rx, ry),
        x_rotation: rotation_deg.to_radians(),
        large_arc,
        sweep,
    };
    let Some(arc) = Arc::from_svg_arc(&svg) else {
        return vec![from, to];
    };

    let rotate = Affine::rotate(arc.x_rotation);
    let mut pts: Vec<Point> = (0..=segments)
        .map(|i| {
            let a = arc.start_angle + arc.sweep_angle * (i as f64) / (segments as f64);
            let (sin_a, cos_a) = a.sin_cos();
            arc.center + (rotate * Point::new(arc.radii.x * cos_a, arc.radii.y * sin_a)).to_vec2()
        })
        .collect();
    // Pin the endpoints against accumulated rounding.
    pts[0] = from;
    pts[segments] = to;
    pts
}

/// Map every coordinate of `path` (including control points) through `t`,
/// preserving subpath structure.
pub fn warp_path(path: &BezPath, t: &PerspectiveTransform) -> BezPath {
    use kurbo::PathEl;

    let mut out = BezPath::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => out.move_to(t.transform(p)),
            PathEl::LineTo(p) => out.line_to(t.transform(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(t.transform(p1), t.transform(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(t.transform(p1), t.transform(p2), t.transform(p3))
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Token {
    Command(char),
    Number(f64),
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn skip_separators(&mut self) {
        let rest = &self.src[self.pos..];
        let trimmed = rest.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == ',');
        self.pos += rest.len() - trimmed.len();
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_separators();
        self.src[self.pos..].chars().next()
    }

    /// Peek the next token without consuming commands; numbers are left for the
    /// argument readers.
    fn next_command_or_number(&mut self) -> QuadmorphResult<Option<Token>> {
        match self.peek() {
            None => Ok(None),
            Some(c) if c.is_ascii_alphabetic() && c != 'e' && c != 'E' => {
                Ok(Some(Token::Command(c)))
            }
            Some(_) => {
                let save = self.pos;
                let n = self.number()?;
                self.pos = save;
                Ok(Some(Token::Number(n)))
            }
        }
    }

    fn commit_command(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn number(&mut self) -> QuadmorphResult<f64> {
        self.skip_separators();
        let bytes = self.src.as_bytes();
        let start = self.pos;
        let mut i = self.pos;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let mut seen_dot = false;
        let mut seen_digit = false;
        while i < bytes.len() {
            match bytes[i] {
                b'0'..=b'9' => seen_digit = true,
                b'.' if !seen_dot => seen_dot = true,
                _ => break,
            }
            i += 1;
        }
        if seen_digit && i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
            let mut j = i + 1;
            if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
                j += 1;
            }
            if j < bytes.len() && bytes[j].is_ascii_digit() {
                while j < bytes.len() && bytes[j].is_ascii_digit() {
                    j += 1;
                }
                i = j;
            }
        }
        if !seen_digit {
            return Err(QuadmorphError::validation(format!(
                "expected a number at byte {start} of path data \"{}\"",
                self.src
            )));
        }
        let text = &self.src[start..i];
        self.pos = i;
        text.parse::<f64>().map_err(|e| {
            QuadmorphError::validation(format!("invalid number \"{text}\" in path data: {e}"))
        })
    }

    fn point(&mut self) -> QuadmorphResult<Point> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(Point::new(x, y))
    }

    /// Arc flags may be written without separators (`a5 5 0 011 1`).
    fn flag(&mut self) -> QuadmorphResult<bool> {
        match self.peek() {
            Some('0') => {
                self.pos += 1;
                Ok(false)
            }
            Some('1') => {
                self.pos += 1;
                Ok(true)
            }
            _ => Err(QuadmorphError::validation(format!(
                "expected arc flag in path data \"{}\"",
                self.src
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/path.rs"]
mod tests;

//! Quad-to-quad projective mapping.
//!
//! The forward matrix `H` maps source coordinates to destination coordinates in
//! homogeneous form: `[x', y', w'] = H * [x, y, 1]`, with `h33` normalized to 1.
//! Degenerate corner sets (collinear corners, zero area) produce the identity
//! mapping in both directions.

use crate::foundation::core::{Point, Quad};

const EPS: f64 = 1e-12;

/// Row-major 3x3 homography.
pub type Mat3 = [f64; 9];

const IDENTITY: Mat3 = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

#[derive(Clone, Copy, Debug, PartialEq)]
/// Projective transform `T` and its inverse, built from four corner correspondences.
pub struct PerspectiveTransform {
    forward: Mat3,
    inverse: Mat3,
    degenerate: bool,
}

impl Default for PerspectiveTransform {
    fn default() -> Self {
        Self {
            forward: IDENTITY,
            inverse: IDENTITY,
            degenerate: false,
        }
    }
}

impl PerspectiveTransform {
    /// Build `T` with `T(src[k]) == dst[k]` for the four corners.
    pub fn between(src: &Quad, dst: &Quad) -> Self {
        let Some(forward) = solve_homography(src, dst) else {
            tracing::trace!("degenerate quad pair, falling back to identity");
            return Self {
                degenerate: true,
                ..Self::default()
            };
        };
        match invert3(&forward) {
            Some(inverse) => Self {
                forward,
                inverse,
                degenerate: false,
            },
            None => Self {
                degenerate: true,
                ..Self::default()
            },
        }
    }

    /// True when the corner set could not be solved and the identity is used.
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// Forward matrix, row-major.
    pub fn matrix(&self) -> Mat3 {
        self.forward
    }

    /// Map a source point into destination space.
    pub fn transform(&self, p: Point) -> Point {
        apply(&self.forward, p)
    }

    /// Map a destination point back into source space.
    pub fn inverse_transform(&self, p: Point) -> Point {
        apply(&self.inverse, p)
    }
}

fn apply(m: &Mat3, p: Point) -> Point {
    let w = m[6] * p.x + m[7] * p.y + m[8];
    if w.abs() < EPS {
        return p;
    }
    Point::new(
        (m[0] * p.x + m[1] * p.y + m[2]) / w,
        (m[3] * p.x + m[4] * p.y + m[5]) / w,
    )
}

/// Solve the 8 unknowns `a..h` of the homography from four correspondences.
fn solve_homography(src: &Quad, dst: &Quad) -> Option<Mat3> {
    if !src.is_finite() || !dst.is_finite() {
        return None;
    }

    // Augmented 8x9 system, two rows per corner.
    let mut a = [[0.0f64; 9]; 8];
    for (k, (s, d)) in src.corners().iter().zip(dst.corners().iter()).enumerate() {
        let (x, y, u, v) = (s.x, s.y, d.x, d.y);
        a[2 * k] = [x, y, 1.0, 0.0, 0.0, 0.0, -x * u, -y * u, u];
        a[2 * k + 1] = [0.0, 0.0, 0.0, x, y, 1.0, -x * v, -y * v, v];
    }

    let h = gauss_solve(&mut a)?;
    Some([h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0])
}

/// Gaussian elimination with partial pivoting on an augmented `N x (N+1)` matrix.
fn gauss_solve<const N: usize, const M: usize>(a: &mut [[f64; M]; N]) -> Option<[f64; N]> {
    debug_assert_eq!(M, N + 1);
    let scale = a
        .iter()
        .flat_map(|row| row[..N].iter())
        .fold(0.0f64, |acc, v| acc.max(v.abs()))
        .max(1.0);

    for col in 0..N {
        let pivot = (col..N).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < EPS * scale {
            return None;
        }
        a.swap(col, pivot);

        for row in (col + 1)..N {
            let f = a[row][col] / a[col][col];
            if f == 0.0 {
                continue;
            }
            for k in col..M {
                a[row][k] -= f * a[col][k];
            }
        }
    }

    let mut x = [0.0f64; N];
    for row in (0..N).rev() {
        let mut acc = a[row][N];
        for k in (row + 1)..N {
            acc -= a[row][k] * x[k];
        }
        x[row] = acc / a[row][row];
    }
    x.iter().all(|v| v.is_finite()).then_some(x)
}

fn invert3(m: &Mat3) -> Option<Mat3> {
    let [a, b, c, d, e, f, g, h, i] = *m;
    let co00 = e * i - f * h;
    let co01 = f * g - d * i;
    let co02 = d * h - e * g;
    let det = a * co00 + b * co01 + c * co02;
    if det.abs() < EPS || !det.is_finite() {
        return None;
    }
    let inv_det = 1.0 / det;
    Some([
        co00 * inv_det,
        (c * h - b * i) * inv_det,
        (b * f - c * e) * inv_det,
        co01 * inv_det,
        (a * i - c * g) * inv_det,
        (c * d - a * f) * inv_det,
        co02 * inv_det,
        (b * g - a * h) * inv_det,
        (a * e - b * d) * inv_det,
    ])
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/perspective.rs"]
mod tests;

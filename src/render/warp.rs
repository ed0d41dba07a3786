//! Inverse-mapped image warping into an arbitrary quadrilateral.

use crate::assets::store::PreparedImage;
use crate::foundation::core::{Point, Quad, Rect};
use crate::geometry::perspective::PerspectiveTransform;

/// Warped pixels covering the destination quad's integer bounding box.
///
/// Pixels whose pre-image falls outside the source stay transparent; clipping
/// to the exact quad outline happens when the buffer is composited.
#[derive(Clone, Debug, PartialEq)]
pub struct WarpedImage {
    /// Destination x of the buffer's left column.
    pub origin_x: i32,
    /// Destination y of the buffer's top row.
    pub origin_y: i32,
    /// Buffer width in pixels.
    pub width: u32,
    /// Buffer height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major.
    pub rgba8_premul: Vec<u8>,
}

impl WarpedImage {
    /// Premultiplied RGBA at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = &self.rgba8_premul[i..i + 4];
        [px[0], px[1], px[2], px[3]]
    }
}

/// Source-space rectangle of an image, as a quad.
pub fn image_quad(image: &PreparedImage) -> Quad {
    Quad::from_rect(Rect::new(
        0.0,
        0.0,
        f64::from(image.width),
        f64::from(image.height),
    ))
}

/// Warp `image` into `dest`.
///
/// Returns `None` for empty images, empty or non-finite destinations.
pub fn warp_image(image: &PreparedImage, dest: &Quad) -> Option<WarpedImage> {
    if image.width == 0 || image.height == 0 || !dest.is_finite() {
        return None;
    }
    let bb = dest.bounds();
    let origin_x = bb.x0.floor();
    let origin_y = bb.y0.floor();
    let width = (bb.x1.ceil() - origin_x).max(0.0);
    let height = (bb.y1.ceil() - origin_y).max(0.0);
    if width < 1.0 || height < 1.0 || width > f64::from(u16::MAX) || height > f64::from(u16::MAX)
    {
        return None;
    }
    let (width, height) = (width as u32, height as u32);

    let t = PerspectiveTransform::between(&image_quad(image), dest);
    let (sw, sh) = (f64::from(image.width), f64::from(image.height));
    let mut out = vec![0u8; (width as usize) * (height as usize) * 4];

    for y in 0..height {
        for x in 0..width {
            let d = Point::new(origin_x + f64::from(x), origin_y + f64::from(y));
            let s = t.inverse_transform(d);
            if !(s.x >= 0.0 && s.x < sw && s.y >= 0.0 && s.y < sh) {
                continue;
            }
            let px = sample_bilinear(image, s);
            let i = ((y as usize) * (width as usize) + (x as usize)) * 4;
            out[i..i + 4].copy_from_slice(&px);
        }
    }

    Some(WarpedImage {
        origin_x: origin_x as i32,
        origin_y: origin_y as i32,
        width,
        height,
        rgba8_premul: out,
    })
}

/// Bilinear blend of the four neighbours around `s`, per channel on premultiplied values.
pub fn sample_bilinear(image: &PreparedImage, s: Point) -> [u8; 4] {
    let x1 = s.x.floor().max(0.0) as u32;
    let y1 = s.y.floor().max(0.0) as u32;
    let x1 = x1.min(image.width - 1);
    let y1 = y1.min(image.height - 1);
    let x2 = (x1 + 1).min(image.width - 1);
    let y2 = (y1 + 1).min(image.height - 1);
    let fx = s.x - f64::from(x1);
    let fy = s.y - f64::from(y1);

    let p11 = image.pixel(x1, y1);
    let p21 = image.pixel(x2, y1);
    let p12 = image.pixel(x1, y2);
    let p22 = image.pixel(x2, y2);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let v = f64::from(p11[c]) * (1.0 - fx) * (1.0 - fy)
            + f64::from(p21[c]) * fx * (1.0 - fy)
            + f64::from(p12[c]) * (1.0 - fx) * fy
            + f64::from(p22[c]) * fx * fy;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/warp.rs"]
mod tests;

//! CPU frame renderer: draws a [`FrameSnapshot`] of the container graph into a
//! premultiplied RGBA8 frame.

use std::sync::Arc;

use crate::assets::dictionary::{GlyphDictionary, glyph_source_quad};
use crate::assets::store::ImageStore;
use crate::foundation::core::{Affine, BezPath, BoxRegion, Quad, Rgba8};
use crate::foundation::error::{QuadmorphError, QuadmorphResult};
use crate::geometry::perspective::PerspectiveTransform;
use crate::graph::graph::ContainerGraph;
use crate::graph::model::{Container, ContentElement, TeleportRole};
use crate::render::path::warp_path;
use crate::render::text::layout_columns;
use crate::render::warp::{WarpedImage, warp_image};

const ELEMENT_OUTLINE_WIDTH: f64 = 3.0;
const GLYPH_STROKE_WIDTH: f64 = 2.0;
const TRIGGER_FILL_OPACITY: f64 = 0.6;
const EDIT_FILL_OPACITY: f64 = 0.18;

#[derive(Clone, Debug)]
/// Output raster size and background.
pub struct RenderSettings {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Straight RGBA background; transparent when `None`.
    pub clear_rgba: Option<[u8; 4]>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
            clear_rgba: Some([255, 255, 255, 255]),
        }
    }
}

#[derive(Clone, Debug)]
/// One rendered frame.
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8, row-major, tightly packed.
    pub data: Vec<u8>,
    /// Whether `data` carries premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }
}

/// Everything a frame needs to be drawn, borrowed from the engine.
#[derive(Clone, Copy, Debug)]
pub struct FrameSnapshot<'a> {
    /// Containers and elements to draw.
    pub graph: &'a ContainerGraph,
    /// Element under the pointer.
    pub hovered: Option<&'a str>,
    /// Font color for the hovered element.
    pub hover_color: Option<&'a str>,
    /// Element clip region.
    pub viewport: Option<BoxRegion>,
    /// Animate mode draws elements; edit mode draws containers only.
    pub animate_mode: bool,
}

/// Draws frame snapshots with a glyph dictionary and decoded images.
pub struct FrameRenderer {
    settings: RenderSettings,
    dictionary: GlyphDictionary,
    images: ImageStore,
}

impl FrameRenderer {
    /// A renderer with an empty dictionary and no images.
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            dictionary: GlyphDictionary::new(),
            images: ImageStore::new(),
        }
    }

    /// Size and background in use.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Replace the glyph dictionary; takes effect on the next frame.
    pub fn set_dictionary(&mut self, dictionary: GlyphDictionary) {
        self.dictionary = dictionary;
    }

    /// The current glyph dictionary.
    pub fn dictionary(&self) -> &GlyphDictionary {
        &self.dictionary
    }

    /// Registered images.
    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    /// Registered images, for adding more.
    pub fn images_mut(&mut self) -> &mut ImageStore {
        &mut self.images
    }

    /// Draw one frame.
    #[tracing::instrument(skip(self, snapshot), fields(
        width = self.settings.width,
        height = self.settings.height,
        elements = snapshot.graph.elements().len(),
    ))]
    pub fn render(&self, snapshot: &FrameSnapshot<'_>) -> QuadmorphResult<FrameRGBA> {
        let width: u16 = self
            .settings
            .width
            .try_into()
            .map_err(|_| QuadmorphError::render("frame width exceeds u16"))?;
        let height: u16 = self
            .settings
            .height
            .try_into()
            .map_err(|_| QuadmorphError::render("frame height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(QuadmorphError::render("frame size must be non-zero"));
        }

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        let mut ctx = vello_cpu::RenderContext::new(width, height);
        let mut painter = Painter {
            ctx: &mut ctx,
            dictionary: &self.dictionary,
            images: &self.images,
        };

        // `render_to_pixmap` overwrites the target, so the background is the first fill.
        if let Some([r, g, b, a]) = self.settings.clear_rgba {
            painter.fill_background(Rgba8 { r, g, b, a }, f64::from(width), f64::from(height));
        }

        let graph = snapshot.graph;
        let clip = match (snapshot.animate_mode, snapshot.viewport) {
            (true, Some(v)) => Some(v),
            _ => None,
        };
        if let Some(v) = clip {
            painter.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            painter
                .ctx
                .push_clip_layer(&bezpath_to_cpu(&Quad::from_rect(v.to_rect()).to_path()));
        }

        for container in graph.containers() {
            painter.draw_container(container, snapshot.animate_mode)?;
        }
        if snapshot.animate_mode {
            for element in graph.elements() {
                if !element.is_visible() {
                    continue;
                }
                let font = effective_font_color(snapshot, element);
                painter.draw_element(element, &font)?;
            }
        }

        if clip.is_some() {
            painter.ctx.pop_layer();
        }
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: self.settings.width,
            height: self.settings.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

/// Hover color applies to the hovered element and to whatever is docked in
/// its bundle's topmost normal container.
pub fn effective_font_color(snapshot: &FrameSnapshot<'_>, element: &ContentElement) -> String {
    let Some(hover) = snapshot.hover_color else {
        return element.content.font_color.clone();
    };
    let hovered = snapshot.hovered == Some(element.id.as_str());
    let topmost = snapshot
        .graph
        .normal_containers(&element.bundle_id)
        .first()
        .is_some_and(|c| c.id == element.container_id);
    if hovered || topmost {
        hover.to_owned()
    } else {
        element.content.font_color.clone()
    }
}

struct Painter<'a> {
    ctx: &'a mut vello_cpu::RenderContext,
    dictionary: &'a GlyphDictionary,
    images: &'a ImageStore,
}

impl Painter<'_> {
    fn draw_container(&mut self, c: &Container, animate_mode: bool) -> QuadmorphResult<()> {
        let color = color_or(&c.color, Rgba8::opaque(0x1a, 0x1a, 0x1a));
        match c.teleport_role {
            Some(TeleportRole::Top | TeleportRole::Bottom) => Ok(()),
            Some(TeleportRole::Button | TeleportRole::Toggle) => {
                if !animate_mode {
                    return Ok(());
                }
                self.fill_quad(&c.points, color.with_opacity(TRIGGER_FILL_OPACITY));
                self.stroke_quad(&c.points, color, ELEMENT_OUTLINE_WIDTH);
                let font = color_or(&c.font_color, Rgba8::WHITE);
                self.draw_text(&c.points, &c.name, font);
                Ok(())
            }
            None if animate_mode => {
                self.stroke_quad(&c.points, Rgba8::opaque(100, 100, 100).with_opacity(0.1), 1.0);
                Ok(())
            }
            None => {
                self.fill_quad(&c.points, color.with_opacity(EDIT_FILL_OPACITY));
                self.stroke_quad(&c.points, Rgba8::opaque(100, 100, 100).with_opacity(0.6), 1.0);
                if let Some(url) = c.image_url.as_deref() {
                    self.draw_image(&c.points, url)?;
                } else {
                    let font = color_or(&c.font_color, Rgba8::WHITE);
                    self.draw_text(&c.points, &c.name, font);
                }
                Ok(())
            }
        }
    }

    fn draw_element(&mut self, e: &ContentElement, font_color: &str) -> QuadmorphResult<()> {
        let opacity = e.opacity.clamp(0.0, 1.0);
        let fill = color_or(&e.content.color, Rgba8::opaque(0x1a, 0x1a, 0x1a));
        let font = color_or(font_color, Rgba8::WHITE);

        self.fill_quad(&e.points, fill.with_opacity(opacity));
        self.stroke_quad(&e.points, font, ELEMENT_OUTLINE_WIDTH);

        let layered = opacity < 1.0;
        if layered {
            self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            self.ctx.push_opacity_layer(opacity as f32);
        }
        let drawn = match e.content.image_url.as_deref() {
            Some(url) => self.draw_image(&e.points, url),
            None => {
                self.draw_text(&e.points, &e.content.text, font);
                Ok(())
            }
        };
        if layered {
            self.ctx.pop_layer();
        }
        drawn
    }

    fn fill_background(&mut self, color: Rgba8, width: f64, height: f64) {
        if color.a == 0 {
            return;
        }
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(paint_color(color));
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, width, height));
    }

    fn fill_quad(&mut self, q: &Quad, color: Rgba8) {
        if color.a == 0 {
            return;
        }
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_fill_rule(vello_cpu::peniko::Fill::NonZero);
        self.ctx.set_paint(paint_color(color));
        self.ctx.fill_path(&bezpath_to_cpu(&q.to_path()));
    }

    fn stroke_quad(&mut self, q: &Quad, color: Rgba8, width: f64) {
        if color.a == 0 {
            return;
        }
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.set_paint(paint_color(color));
        self.ctx.stroke_path(&bezpath_to_cpu(&q.to_path()));
    }

    /// Glyphs are filled even-odd so counters stay open, then outlined.
    fn draw_text(&mut self, q: &Quad, text: &str, color: Rgba8) {
        let source = glyph_source_quad();
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(paint_color(color));
        for (ch, column) in layout_columns(q, text) {
            let Some(outline) = self.dictionary.outline(ch) else {
                tracing::trace!(glyph = %ch, reason = "no outline", "glyph skipped");
                continue;
            };
            let t = PerspectiveTransform::between(&source, &column);
            let warped = bezpath_to_cpu(&warp_path(outline, &t));
            self.ctx.set_fill_rule(vello_cpu::peniko::Fill::EvenOdd);
            self.ctx.fill_path(&warped);
            self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(GLYPH_STROKE_WIDTH));
            self.ctx.stroke_path(&warped);
        }
        self.ctx.set_fill_rule(vello_cpu::peniko::Fill::NonZero);
    }

    /// Composite the warped image clipped to the exact quad outline.
    fn draw_image(&mut self, q: &Quad, url: &str) -> QuadmorphResult<()> {
        let Some(image) = self.images.get(url) else {
            tracing::debug!(url, reason = "image not loaded", "image skipped");
            return Ok(());
        };
        let Some(warped) = warp_image(image, q) else {
            return Ok(());
        };
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(warped_to_pixmap(&warped)?)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        let (ox, oy) = (f64::from(warped.origin_x), f64::from(warped.origin_y));
        let (w, h) = (f64::from(warped.width), f64::from(warped.height));

        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.push_clip_layer(&bezpath_to_cpu(&q.to_path()));
        self.ctx
            .set_transform(affine_to_cpu(Affine::translate((ox, oy))));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(paint);
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.pop_layer();
        Ok(())
    }
}

fn color_or(s: &str, fallback: Rgba8) -> Rgba8 {
    Rgba8::parse_hex(s).unwrap_or_else(|e| {
        tracing::debug!(color = s, error = %e, "unparseable color, using fallback");
        fallback
    })
}

fn paint_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: crate::foundation::core::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn warped_to_pixmap(warped: &WarpedImage) -> QuadmorphResult<vello_cpu::Pixmap> {
    let w: u16 = warped
        .width
        .try_into()
        .map_err(|_| QuadmorphError::render("warped image width exceeds u16"))?;
    let h: u16 = warped
        .height
        .try_into()
        .map_err(|_| QuadmorphError::render("warped image height exceeds u16"))?;

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(warped.rgba8_premul.len() / 4);
    for px in warped.rgba8_premul.chunks_exact(4) {
        may_have_opacities |= px[3] != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        });
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/scene.rs"]
mod tests;

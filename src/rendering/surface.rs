//! Poster render surface
//!
//! A fixed-size 2D drawing target with a canvas-style API (fill styles,
//! paths, clipping, text) that records an SVG scene. The scene is rasterized
//! by [`SvgRenderer`](crate::rendering::SvgRenderer).
//!
//! Drawing state lives on an explicit stack. [`RenderSurface::save`] returns a
//! [`StateGuard`] that restores the previous state when dropped, on every exit
//! path, and closes any clip groups opened while it was alive.
//!
//! ```
//! use adcraft::models::CanvasSpec;
//! use adcraft::rendering::{RenderSurface, UniformAdvance};
//! use std::sync::Arc;
//!
//! let mut surface = RenderSurface::new(
//!     CanvasSpec::POSTER,
//!     Arc::new(UniformAdvance::default()),
//!     vec!["sans-serif".to_string()],
//! );
//! {
//!     let mut scoped = surface.save();
//!     scoped.set_fill_color("#ff0000").unwrap();
//!     scoped.fill_rect(0.0, 0.0, 10.0, 10.0);
//! }
//! assert_eq!(surface.save_depth(), 0);
//! assert!(surface.to_svg().contains(r##"fill="#ff0000""##));
//! ```

use crate::models::CanvasSpec;
use crate::rendering::fonts::{FontSpec, TextMetrics};
use poster_palette::{parse_css_color, Color, ColorError};
use std::fmt::Write as _;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    fn anchor(self) -> &'static str {
        match self {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    #[default]
    Alphabetic,
    Top,
    Middle,
}

impl TextBaseline {
    fn dominant_baseline(self) -> Option<&'static str> {
        match self {
            TextBaseline::Alphabetic => None,
            TextBaseline::Top => Some("text-before-edge"),
            TextBaseline::Middle => Some("central"),
        }
    }
}

/// A color with opacity, parsed from `#rrggbb` or `rgba(...)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub color: Color,
    pub alpha: f64,
}

impl Rgba {
    pub fn parse(css: &str) -> Result<Self, ColorError> {
        let (color, alpha) = parse_css_color(css)?;
        Ok(Self { color, alpha })
    }

    fn opacity(&self) -> f64 {
        self.alpha.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GradientKind {
    Linear { x0: f32, y0: f32, x1: f32, y1: f32 },
    Radial { cx: f32, cy: f32, r: f32 },
}

/// Linear or radial gradient in canvas coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    kind: GradientKind,
    stops: Vec<(f32, Rgba)>,
}

impl Gradient {
    pub fn linear(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            kind: GradientKind::Linear { x0, y0, x1, y1 },
            stops: Vec::new(),
        }
    }

    /// Radial gradient from the center point out to radius `r`
    pub fn radial(cx: f32, cy: f32, r: f32) -> Self {
        Self {
            kind: GradientKind::Radial { cx, cy, r },
            stops: Vec::new(),
        }
    }

    pub fn add_color_stop(&mut self, offset: f32, css: &str) -> Result<(), ColorError> {
        self.stops.push((offset.clamp(0.0, 1.0), Rgba::parse(css)?));
        Ok(())
    }
}

/// Drop shadow applied to subsequent fills, images and text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Rgba,
    pub blur: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

#[derive(Debug, Clone, PartialEq)]
enum Paint {
    Solid(Rgba),
    /// id of a gradient in `<defs>`
    Reference(String),
}

#[derive(Debug, Clone)]
struct DrawState {
    fill: Paint,
    font: FontSpec,
    align: TextAlign,
    baseline: TextBaseline,
    shadow: Option<Shadow>,
    /// clip groups open in the body at this level
    clip_groups: usize,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            fill: Paint::Solid(Rgba {
                color: Color::new(0, 0, 0),
                alpha: 1.0,
            }),
            font: FontSpec::default(),
            align: TextAlign::default(),
            baseline: TextBaseline::default(),
            shadow: None,
            clip_groups: 0,
        }
    }
}

/// Fixed-size drawing target recording an SVG scene
pub struct RenderSurface {
    canvas: CanvasSpec,
    metrics: Arc<dyn TextMetrics>,
    families: Vec<String>,
    defs: String,
    body: String,
    path: String,
    state: DrawState,
    stack: Vec<DrawState>,
    next_id: usize,
}

impl RenderSurface {
    pub fn new(canvas: CanvasSpec, metrics: Arc<dyn TextMetrics>, families: Vec<String>) -> Self {
        Self {
            canvas,
            metrics,
            families,
            defs: String::new(),
            body: String::new(),
            path: String::new(),
            state: DrawState::default(),
            stack: Vec::new(),
            next_id: 0,
        }
    }

    pub fn canvas(&self) -> CanvasSpec {
        self.canvas
    }

    pub fn width(&self) -> f32 {
        self.canvas.width_f()
    }

    pub fn height(&self) -> f32 {
        self.canvas.height_f()
    }

    /// Drop all recorded content and drawing state
    pub fn reset(&mut self) {
        self.defs.clear();
        self.body.clear();
        self.path.clear();
        self.state = DrawState::default();
        self.stack.clear();
        self.next_id = 0;
    }

    /// Push the drawing state; it is restored when the guard drops
    pub fn save(&mut self) -> StateGuard<'_> {
        self.stack.push(self.state.clone());
        StateGuard { surface: self }
    }

    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    fn restore(&mut self) {
        let Some(saved) = self.stack.pop() else {
            return;
        };
        for _ in saved.clip_groups..self.state.clip_groups {
            self.body.push_str("</g>");
        }
        self.state = saved;
    }

    // -- state --------------------------------------------------------------

    pub fn set_fill_color(&mut self, css: &str) -> Result<(), ColorError> {
        self.state.fill = Paint::Solid(Rgba::parse(css)?);
        Ok(())
    }

    /// Use `gradient` as fill. Later changes to `gradient` do not affect it.
    pub fn set_fill_gradient(&mut self, gradient: &Gradient) {
        let id = self.next_id("grad");
        let stops = gradient
            .stops
            .iter()
            .fold(String::new(), |mut out, (offset, rgba)| {
                let _ = write!(
                    out,
                    r#"<stop offset="{}" stop-color="{}" stop-opacity="{}"/>"#,
                    num(*offset),
                    rgba.color,
                    rgba.opacity()
                );
                out
            });

        let _ = match gradient.kind {
            GradientKind::Linear { x0, y0, x1, y1 } => write!(
                self.defs,
                r#"<linearGradient id="{id}" gradientUnits="userSpaceOnUse" x1="{}" y1="{}" x2="{}" y2="{}">{stops}</linearGradient>"#,
                num(x0),
                num(y0),
                num(x1),
                num(y1)
            ),
            GradientKind::Radial { cx, cy, r } => write!(
                self.defs,
                r#"<radialGradient id="{id}" gradientUnits="userSpaceOnUse" cx="{}" cy="{}" r="{}">{stops}</radialGradient>"#,
                num(cx),
                num(cy),
                num(r)
            ),
        };

        self.state.fill = Paint::Reference(id);
    }

    pub fn set_font(&mut self, font: FontSpec) {
        self.state.font = font;
    }

    pub fn font(&self) -> FontSpec {
        self.state.font
    }

    pub fn set_text_align(&mut self, align: TextAlign) {
        self.state.align = align;
    }

    pub fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state.baseline = baseline;
    }

    pub fn set_shadow(
        &mut self,
        css: &str,
        blur: f32,
        offset_x: f32,
        offset_y: f32,
    ) -> Result<(), ColorError> {
        self.state.shadow = Some(Shadow {
            color: Rgba::parse(css)?,
            blur,
            offset_x,
            offset_y,
        });
        Ok(())
    }

    // -- paths --------------------------------------------------------------

    pub fn begin_path(&mut self) {
        self.path.clear();
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        let _ = write!(self.path, "M{} {} ", num(x), num(y));
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        let _ = write!(self.path, "L{} {} ", num(x), num(y));
    }

    pub fn quadratic_curve_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        let _ = write!(
            self.path,
            "Q{} {} {} {} ",
            num(cx),
            num(cy),
            num(x),
            num(y)
        );
    }

    pub fn close_path(&mut self) {
        self.path.push('Z');
    }

    /// Replace the current path with a rounded rectangle.
    ///
    /// The radius is clamped to half the width and half the height.
    pub fn rounded_rect(&mut self, x: f32, y: f32, width: f32, height: f32, radius: f32) {
        let r = radius.min(width / 2.0).min(height / 2.0);
        self.begin_path();
        self.move_to(x + r, y);
        self.line_to(x + width - r, y);
        self.quadratic_curve_to(x + width, y, x + width, y + r);
        self.line_to(x + width, y + height - r);
        self.quadratic_curve_to(x + width, y + height, x + width - r, y + height);
        self.line_to(x + r, y + height);
        self.quadratic_curve_to(x, y + height, x, y + height - r);
        self.line_to(x, y + r);
        self.quadratic_curve_to(x, y, x + r, y);
        self.close_path();
    }

    // -- drawing ------------------------------------------------------------

    /// Fill the current path
    pub fn fill(&mut self) {
        if self.path.is_empty() {
            return;
        }
        let d = self.path.trim_end().to_string();
        let paint = self.paint_attrs();
        let filter = self.shadow_attr();
        let _ = write!(self.body, r#"<path d="{d}"{paint}{filter}/>"#);
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let paint = self.paint_attrs();
        let filter = self.shadow_attr();
        let _ = write!(
            self.body,
            r#"<rect x="{}" y="{}" width="{}" height="{}"{paint}{filter}/>"#,
            num(x),
            num(y),
            num(width),
            num(height)
        );
    }

    /// Intersect the clip region with the current path until the enclosing
    /// save scope ends.
    pub fn clip(&mut self) {
        let id = self.next_id("clip");
        let d = self.path.trim_end().to_string();
        let _ = write!(
            self.defs,
            r#"<clipPath id="{id}" clipPathUnits="userSpaceOnUse"><path d="{d}"/></clipPath>"#
        );
        let _ = write!(self.body, r#"<g clip-path="url(#{id})">"#);
        self.state.clip_groups += 1;
    }

    /// Draw an image (any `href` resvg can load, typically a data URI),
    /// stretched to the destination rectangle.
    pub fn draw_image(&mut self, href: &str, x: f32, y: f32, width: f32, height: f32) {
        let filter = self.shadow_attr();
        let _ = write!(
            self.body,
            r#"<image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none" xlink:href="{}"{filter}/>"#,
            num(x),
            num(y),
            num(width),
            num(height),
            escape_xml(href)
        );
    }

    pub fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        if text.is_empty() {
            return;
        }
        let paint = self.paint_attrs();
        let filter = self.shadow_attr();
        let font = self.state.font;
        let baseline = self
            .state
            .baseline
            .dominant_baseline()
            .map(|b| format!(r#" dominant-baseline="{b}""#))
            .unwrap_or_default();
        let family = escape_xml(&self.font_family());
        let anchor = self.state.align.anchor();
        let _ = write!(
            self.body,
            r#"<text x="{}" y="{}" font-family="{}" font-weight="{}" font-size="{}" text-anchor="{}"{baseline} xml:space="preserve"{paint}{filter}>{}</text>"#,
            num(x),
            num(y),
            family,
            font.weight,
            num(font.size),
            anchor,
            escape_xml(text)
        );
    }

    /// Width of `text` in the current font
    pub fn measure_text(&self, text: &str) -> f32 {
        self.metrics.measure(text, &self.state.font)
    }

    /// Serialize the recorded scene
    pub fn to_svg(&self) -> String {
        let mut svg = String::with_capacity(self.defs.len() + self.body.len() + 256);
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.canvas.width,
            h = self.canvas.height
        );
        let _ = write!(svg, "<defs>{}</defs>", self.defs);
        svg.push_str(&self.body);
        for _ in 0..self.state.clip_groups {
            svg.push_str("</g>");
        }
        svg.push_str("</svg>");
        svg
    }

    // -- helpers ------------------------------------------------------------

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }

    fn paint_attrs(&self) -> String {
        match &self.state.fill {
            Paint::Solid(rgba) if rgba.opacity() < 1.0 => {
                format!(r#" fill="{}" fill-opacity="{}""#, rgba.color, rgba.opacity())
            }
            Paint::Solid(rgba) => format!(r#" fill="{}""#, rgba.color),
            Paint::Reference(id) => format!(r#" fill="url(#{id})""#),
        }
    }

    /// Registers a drop-shadow filter for the current shadow, if any
    fn shadow_attr(&mut self) -> String {
        let Some(shadow) = self.state.shadow else {
            return String::new();
        };
        if shadow.color.opacity() <= 0.0 {
            return String::new();
        }
        let id = self.next_id("shadow");
        let _ = write!(
            self.defs,
            r#"<filter id="{id}" filterUnits="userSpaceOnUse" x="0" y="0" width="{}" height="{}"><feDropShadow dx="{}" dy="{}" stdDeviation="{}" flood-color="{}" flood-opacity="{}"/></filter>"#,
            self.canvas.width,
            self.canvas.height,
            num(shadow.offset_x),
            num(shadow.offset_y),
            num(shadow.blur / 2.0),
            shadow.color.color,
            shadow.color.opacity()
        );
        format!(r#" filter="url(#{id})""#)
    }

    fn font_family(&self) -> String {
        self.families
            .iter()
            .map(|family| match family.as_str() {
                "sans-serif" | "serif" | "monospace" => family.clone(),
                name if name.contains(' ') => format!("'{name}'"),
                name => name.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Scoped drawing state; restores the surface when dropped
pub struct StateGuard<'a> {
    surface: &'a mut RenderSurface,
}

impl Deref for StateGuard<'_> {
    type Target = RenderSurface;

    fn deref(&self) -> &RenderSurface {
        self.surface
    }
}

impl DerefMut for StateGuard<'_> {
    fn deref_mut(&mut self) -> &mut RenderSurface {
        self.surface
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}

/// Coordinates rounded to 1/1000 px
fn num(v: f32) -> f32 {
    (v * 1000.0).round() / 1000.0
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

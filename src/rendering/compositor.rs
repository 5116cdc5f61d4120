//! Poster layout
//!
//! The poster is a fixed sequence of absolutely positioned passes, each
//! expressed as fractions of the canvas size, drawn back to front:
//!
//! 1. background diagonal gradient
//! 2. ambient radial glow
//! 3. glass content panel
//! 4. ribbon badge
//! 5. hero image with halo, clipped to a rounded frame
//! 6. headline (product name)
//! 7. tagline
//! 8. feature highlight caption
//! 9. call-to-action button

use crate::error::RenderError;
use crate::models::PosterSpec;
use crate::rendering::fonts::FontSpec;
use crate::rendering::surface::{Gradient, RenderSurface, TextAlign, TextBaseline};
use crate::rendering::wrap::wrap_lines;
use poster_palette::Color;

pub const DEFAULT_RIBBON_LABEL: &str = "Autonomous Poster Agent";

const RIBBON_HEIGHT: f32 = 72.0;
const CTA_HEIGHT: f32 = 92.0;
const HALO_PADDING: f32 = 22.0;

/// A block of wrapped text
#[derive(Debug, Clone)]
pub struct Paragraph<'a> {
    pub text: &'a str,
    pub x: f32,
    pub y: f32,
    pub max_width: f32,
    pub line_height: f32,
    pub font: FontSpec,
    pub color: String,
    pub align: TextAlign,
}

/// Wrap and draw a paragraph with a top baseline; returns the lines drawn.
pub fn draw_paragraph(
    surface: &mut RenderSurface,
    paragraph: &Paragraph<'_>,
) -> Result<Vec<String>, RenderError> {
    let mut s = surface.save();
    s.set_font(paragraph.font);
    s.set_fill_color(&paragraph.color)?;
    s.set_text_baseline(TextBaseline::Top);
    s.set_text_align(paragraph.align);

    let lines = wrap_lines(paragraph.text, paragraph.max_width, |line| s.measure_text(line));
    for (i, line) in lines.iter().enumerate() {
        s.fill_text(line, paragraph.x, paragraph.y + i as f32 * paragraph.line_height);
    }
    Ok(lines)
}

/// Largest `(width, height)` with the image's aspect ratio inside `max_width x max_height`
pub fn fit_within(aspect_ratio: f32, max_width: f32, max_height: f32) -> (f32, f32) {
    let mut width = max_width;
    let mut height = width / aspect_ratio;
    if height > max_height {
        height = max_height;
        width = height * aspect_ratio;
    }
    (width, height)
}

/// Readable text color for `base` tinted by `amount`, as a hex string
fn readable_on(base: Color, amount: f64) -> String {
    base.mix(amount).readable_text_color().to_hex()
}

/// Draws the nine poster passes onto a surface
#[derive(Debug, Clone)]
pub struct PosterCompositor {
    ribbon_label: String,
}

impl Default for PosterCompositor {
    fn default() -> Self {
        Self::new(DEFAULT_RIBBON_LABEL)
    }
}

impl PosterCompositor {
    pub fn new(ribbon_label: impl Into<String>) -> Self {
        Self {
            ribbon_label: ribbon_label.into(),
        }
    }

    pub fn ribbon_label(&self) -> &str {
        &self.ribbon_label
    }

    /// Render `spec` onto `surface`. The surface is reset first, so nothing
    /// from a previous render leaks into this one.
    pub fn compose(&self, surface: &mut RenderSurface, spec: &PosterSpec) -> Result<(), RenderError> {
        surface.reset();

        self.draw_background(surface, spec)?;
        self.draw_glow(surface, spec)?;
        self.draw_panel(surface, spec)?;
        self.draw_ribbon(surface, spec)?;
        self.draw_hero(surface, spec)?;
        self.draw_headline(surface, spec)?;
        self.draw_tagline(surface, spec)?;
        self.draw_feature_highlight(surface, spec)?;
        self.draw_call_to_action(surface, spec)?;

        tracing::debug!(
            width = surface.width(),
            height = surface.height(),
            product = %spec.product_name,
            "Composed poster"
        );
        Ok(())
    }

    fn draw_background(&self, s: &mut RenderSurface, spec: &PosterSpec) -> Result<(), RenderError> {
        let (w, h) = (s.width(), s.height());
        let mut gradient = Gradient::linear(0.0, 0.0, w, h);
        gradient.add_color_stop(0.0, &spec.palette.primary().mix(0.25).to_hex())?;
        gradient.add_color_stop(1.0, &spec.palette.secondary().mix(-0.2).to_hex())?;
        s.set_fill_gradient(&gradient);
        s.fill_rect(0.0, 0.0, w, h);
        Ok(())
    }

    fn draw_glow(&self, s: &mut RenderSurface, spec: &PosterSpec) -> Result<(), RenderError> {
        let (w, h) = (s.width(), s.height());
        let mut glow = Gradient::radial(w * 0.85, h * 0.1, w * 0.9);
        glow.add_color_stop(0.0, &spec.palette.pop().to_rgba(0.3))?;
        glow.add_color_stop(1.0, &spec.palette.primary().to_rgba(0.0))?;
        s.set_fill_gradient(&glow);
        s.fill_rect(0.0, 0.0, w, h);
        Ok(())
    }

    fn draw_panel(&self, s: &mut RenderSurface, spec: &PosterSpec) -> Result<(), RenderError> {
        let (w, h) = (s.width(), s.height());
        let mut s = s.save();
        s.rounded_rect(w * 0.08, h * 0.18, w * 0.84, h * 0.6, 48.0);
        let mut gradient = Gradient::linear(w * 0.08, h * 0.18, w * 0.92, h * 0.78);
        gradient.add_color_stop(0.0, &spec.palette.secondary().to_rgba(0.18))?;
        gradient.add_color_stop(1.0, &spec.palette.primary().to_rgba(0.38))?;
        s.set_fill_gradient(&gradient);
        s.fill();
        Ok(())
    }

    fn draw_ribbon(&self, s: &mut RenderSurface, spec: &PosterSpec) -> Result<(), RenderError> {
        let (w, h) = (s.width(), s.height());
        let pop = spec.palette.pop();
        let mut s = s.save();
        s.rounded_rect(w * 0.58, h * 0.16, w * 0.34, RIBBON_HEIGHT, 28.0);
        let mut gradient = Gradient::linear(w * 0.58, h * 0.16, w * 0.92, h * 0.16 + RIBBON_HEIGHT);
        gradient.add_color_stop(0.0, &pop.mix(-0.1).to_hex())?;
        gradient.add_color_stop(1.0, &pop.mix(0.25).to_hex())?;
        s.set_fill_gradient(&gradient);
        s.fill();

        s.set_font(FontSpec::new(600, 28.0));
        s.set_fill_color(&readable_on(pop, 0.12))?;
        s.set_text_baseline(TextBaseline::Middle);
        s.set_text_align(TextAlign::Center);
        s.fill_text(&self.ribbon_label, w * 0.75, h * 0.16 + RIBBON_HEIGHT / 2.0);
        Ok(())
    }

    fn draw_hero(&self, s: &mut RenderSurface, spec: &PosterSpec) -> Result<(), RenderError> {
        let (w, h) = (s.width(), s.height());
        let max_width = w * 0.58;
        let max_height = h * 0.52;
        let (draw_width, draw_height) = fit_within(spec.hero.aspect_ratio(), max_width, max_height);
        let draw_x = w * 0.11 + (max_width - draw_width) / 2.0;
        let draw_y = h * 0.24 + (max_height - draw_height) / 2.0;

        {
            let mut halo = s.save();
            halo.rounded_rect(
                draw_x - HALO_PADDING,
                draw_y - HALO_PADDING,
                draw_width + HALO_PADDING * 2.0,
                draw_height + HALO_PADDING * 2.0,
                40.0,
            );
            halo.set_fill_color(&spec.palette.highlight().to_rgba(0.16))?;
            halo.set_shadow(&spec.palette.primary().to_rgba(0.45), 48.0, 0.0, 32.0)?;
            halo.fill();
        }

        let mut frame = s.save();
        frame.rounded_rect(draw_x, draw_y, draw_width, draw_height, 32.0);
        frame.clip();
        frame.draw_image(&spec.hero.href, draw_x, draw_y, draw_width, draw_height);

        tracing::debug!(draw_x, draw_y, draw_width, draw_height, "Placed hero image");
        Ok(())
    }

    fn draw_headline(&self, s: &mut RenderSurface, spec: &PosterSpec) -> Result<(), RenderError> {
        let (w, h) = (s.width(), s.height());
        let size = (w * 0.055).round();
        draw_paragraph(
            s,
            &Paragraph {
                text: &spec.product_name,
                x: w * 0.12,
                y: h * 0.12,
                max_width: w * 0.74,
                line_height: size,
                font: FontSpec::new(800, size),
                color: readable_on(spec.palette.primary(), 0.16),
                align: TextAlign::Left,
            },
        )?;
        Ok(())
    }

    fn draw_tagline(&self, s: &mut RenderSurface, spec: &PosterSpec) -> Result<(), RenderError> {
        let (w, h) = (s.width(), s.height());
        draw_paragraph(
            s,
            &Paragraph {
                text: &spec.tagline,
                x: w * 0.12,
                y: h * 0.76,
                max_width: w * 0.76,
                line_height: 48.0,
                font: FontSpec::new(600, 40.0),
                color: readable_on(spec.palette.secondary(), 0.1),
                align: TextAlign::Left,
            },
        )?;
        Ok(())
    }

    fn draw_feature_highlight(
        &self,
        s: &mut RenderSurface,
        spec: &PosterSpec,
    ) -> Result<(), RenderError> {
        let (w, h) = (s.width(), s.height());
        draw_paragraph(
            s,
            &Paragraph {
                text: &spec.feature_highlight,
                x: w * 0.12,
                y: h * 0.88,
                max_width: w * 0.76,
                line_height: 38.0,
                font: FontSpec::new(500, 30.0),
                color: spec.palette.highlight().to_rgba(0.9),
                align: TextAlign::Left,
            },
        )?;
        Ok(())
    }

    fn draw_call_to_action(&self, s: &mut RenderSurface, spec: &PosterSpec) -> Result<(), RenderError> {
        let (w, h) = (s.width(), s.height());
        let accent = spec.palette.accent();
        let width = w * 0.42;
        let x = w * 0.12;
        let y = h * 0.9;

        {
            let mut button = s.save();
            button.rounded_rect(x, y, width, CTA_HEIGHT, 46.0);
            let mut gradient = Gradient::linear(x, y, x + width, y + CTA_HEIGHT);
            gradient.add_color_stop(0.0, &accent.mix(0.25).to_hex())?;
            gradient.add_color_stop(1.0, &spec.palette.pop().mix(0.1).to_hex())?;
            button.set_fill_gradient(&gradient);
            button.set_shadow(&accent.to_rgba(0.45), 32.0, 0.0, 16.0)?;
            button.fill();
        }

        let mut label = s.save();
        label.set_font(FontSpec::new(700, 34.0));
        label.set_fill_color(&readable_on(accent, 0.25))?;
        label.set_text_baseline(TextBaseline::Middle);
        label.set_text_align(TextAlign::Center);
        label.fill_text(&spec.call_to_action, x + width / 2.0, y + CTA_HEIGHT / 2.0);
        Ok(())
    }
}

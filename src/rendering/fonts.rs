//! Text measurement for layout
//!
//! Widths are computed from the same font database the rasterizer uses, so
//! word wrapping agrees with what resvg draws.

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use std::sync::Arc;

/// Average advance used when no face resolves, in em
pub const FALLBACK_ADVANCE_EM: f32 = 0.55;

/// Weight and pixel size of a run of text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub weight: u16,
    pub size: f32,
}

impl FontSpec {
    pub const fn new(weight: u16, size: f32) -> Self {
        Self { weight, size }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new(400, 10.0)
    }
}

/// Measures the rendered width of a single line of text
pub trait TextMetrics: Send + Sync {
    fn measure(&self, text: &str, font: &FontSpec) -> f32;
}

/// Every character advances by the same fraction of the font size
#[derive(Debug, Clone, Copy)]
pub struct UniformAdvance {
    pub advance_em: f32,
}

impl Default for UniformAdvance {
    fn default() -> Self {
        Self {
            advance_em: FALLBACK_ADVANCE_EM,
        }
    }
}

impl TextMetrics for UniformAdvance {
    fn measure(&self, text: &str, font: &FontSpec) -> f32 {
        text.chars().count() as f32 * font.size * self.advance_em
    }
}

/// Glyph-advance metrics backed by fontdb faces
pub struct FontMetrics {
    fontdb: Arc<Database>,
    families: Vec<String>,
    fallback: UniformAdvance,
}

impl FontMetrics {
    pub fn new(fontdb: Arc<Database>, families: Vec<String>) -> Self {
        Self {
            fontdb,
            families,
            fallback: UniformAdvance::default(),
        }
    }

    /// Whether any configured family resolves to a loaded face
    pub fn resolves_any_family(&self) -> bool {
        self.resolve(400).is_some()
    }

    fn resolve(&self, weight: u16) -> Option<fontdb::ID> {
        let families: Vec<Family<'_>> = self
            .families
            .iter()
            .map(|name| match name.as_str() {
                "sans-serif" => Family::SansSerif,
                "serif" => Family::Serif,
                "monospace" => Family::Monospace,
                name => Family::Name(name),
            })
            .collect();

        self.fontdb.query(&Query {
            families: &families,
            weight: Weight(weight),
            stretch: Stretch::Normal,
            style: Style::Normal,
        })
    }
}

impl TextMetrics for FontMetrics {
    fn measure(&self, text: &str, font: &FontSpec) -> f32 {
        let measured = self.resolve(font.weight).and_then(|id| {
            self.fontdb
                .with_face_data(id, |data, index| {
                    let face = ttf_parser::Face::parse(data, index).ok()?;
                    let units = face.units_per_em() as f32;
                    if units <= 0.0 {
                        return None;
                    }
                    let scale = font.size / units;
                    let missing = units * self.fallback.advance_em;
                    let width: f32 = text
                        .chars()
                        .map(|ch| {
                            face.glyph_index(ch)
                                .and_then(|glyph| face.glyph_hor_advance(glyph))
                                .map(f32::from)
                                .unwrap_or(missing)
                        })
                        .sum();
                    Some(width * scale)
                })
                .flatten()
        });

        measured.unwrap_or_else(|| self.fallback.measure(text, font))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_advance() {
        let metrics = UniformAdvance { advance_em: 0.5 };
        assert_eq!(metrics.measure("abcd", &FontSpec::new(400, 10.0)), 20.0);
        assert_eq!(metrics.measure("", &FontSpec::new(400, 10.0)), 0.0);
    }

    #[test]
    fn test_font_metrics_without_faces_falls_back() {
        let metrics = FontMetrics::new(Arc::new(Database::new()), vec!["Manrope".to_string()]);
        let font = FontSpec::new(800, 40.0);
        assert_eq!(metrics.measure("Lamp", &font), 4.0 * 40.0 * FALLBACK_ADVANCE_EM);
    }

    #[test]
    fn test_unresolved_families_are_reported() {
        let metrics = FontMetrics::new(Arc::new(Database::new()), vec!["Manrope".to_string()]);
        assert!(!metrics.resolves_any_family());
    }

    #[test]
    fn test_embedded_face_resolves_and_measures() {
        let mut db = Database::new();
        for (_, data) in crate::assets::AssetLoader::new(None, None).get_fonts() {
            db.load_font_data(data.into_owned());
        }
        let families = vec![
            "Manrope".to_string(),
            "DejaVu Sans".to_string(),
            "sans-serif".to_string(),
        ];
        let metrics = FontMetrics::new(Arc::new(db), families);
        assert!(metrics.resolves_any_family());

        // real advances differ per glyph, the estimate does not
        let font = FontSpec::new(800, 40.0);
        assert_ne!(metrics.measure("iiii", &font), metrics.measure("WWWW", &font));
    }

    #[test]
    fn test_font_metrics_grows_with_text() {
        let mut db = Database::new();
        db.load_system_fonts();
        let metrics = FontMetrics::new(Arc::new(db), vec!["sans-serif".to_string()]);
        let font = FontSpec::new(600, 40.0);

        let short = metrics.measure("Lamp", &font);
        let long = metrics.measure("Lamp Lamp Lamp", &font);
        assert!(short > 0.0);
        assert!(long > short);
    }
}

pub mod compositor;
pub mod fonts;
pub mod surface;
pub mod svg_to_png;
pub mod wrap;

pub use compositor::{draw_paragraph, fit_within, Paragraph, PosterCompositor};
pub use fonts::{FontMetrics, FontSpec, TextMetrics, UniformAdvance};
pub use surface::{Gradient, RenderSurface, Rgba, Shadow, StateGuard, TextAlign, TextBaseline};
pub use svg_to_png::{encode_png, SvgRenderer};
pub use wrap::wrap_lines;

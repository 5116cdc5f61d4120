pub mod canvas_spec;
pub mod config;
pub mod poster;

pub use canvas_spec::CanvasSpec;
pub use config::{
    AppConfig, BrandingConfig, CanvasConfig, CopyConfig, ExportConfig, PaletteConfig,
    TypographyConfig,
};
pub use poster::{poster_file_name, HeroImage, PosterSpec, RenderedPoster};

pub mod copywriter;
pub mod media;
pub mod renderer;
pub mod studio;

pub use copywriter::{pick_voice, AgentInsight, Copywriter, InsightRequest, Voice};
pub use media::{decode_image, sniff_image, ACCEPTED_FORMATS};
pub use renderer::{render_off_runtime, PosterRenderer, RenderService};
pub use studio::{
    CopyEdit, GenerationOutcome, PaletteSource, PosterDownload, SessionSnapshot, Studio,
    DONE_MESSAGE, IDLE_MESSAGE, RUNNING_MESSAGE,
};

//! AdCraft - autonomous poster composition
//!
//! Turns a product photo, a name and a short description into a finished
//! 1080x1350 promotional poster. Color utilities and palette extraction live
//! in the `poster-palette` crate; this library holds the layout compositor,
//! the copywriter, the generation pipeline and the HTTP surface.
//! This library exposes modules for integration testing.

pub mod api;
pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;

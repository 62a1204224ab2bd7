//! Filter modules used by the background removal pipeline.
//!
//! ## Supported Formats
//!
//! | Buffer | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | RGB8 | (H, W, 3) | u8 | Red, green, blue, 0-255 |
//! | RGBA8 | (H, W, 4) | u8 | RGB + alpha, 0-255 |
//! | Mask | (H, W) | u8 | Binary 0 / 255, or soft alpha after feathering |
//! | Unit mask | (H, W) | f32 | 0.0-1.0, used while feathering |
//!
//! ## Architecture
//!
//! - **Pure** - every filter reads a view and returns a new array
//! - **Replicated edges** - neighborhood filters never treat outside pixels as zero
//! - **Thread-safe** - rayon parallelism inside a filter, deterministic output

pub mod blur;
pub mod color_science;
pub mod core;
pub mod grayscale;
pub mod morphology;

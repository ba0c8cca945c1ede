#![deny(clippy::dbg_macro)]
//! Translate 2D drawing primitives into Encapsulated PostScript.
//!
//! [`EpsGraphics`] is the drawing context. It keeps a private graphics state
//! (color, stroke, font, transform, clip) and writes operator lines into an
//! [`Output`] shared by every context created from it. [`EpsDocument`] is the
//! default output: it buffers the body and wraps it with the EPS header and
//! trailer once the final bounding box is known.
mod clip;
mod context;
pub mod document;
mod error;
pub mod graphics;
pub mod path;
mod raster;
pub mod text;
mod tools;

pub use clip::ClipRegion;
pub use context::{EpsGraphics, GraphicsOption, GraphicsOptionBuilder};
pub use document::{ContextId, DocumentOption, DocumentOptionBuilder, EpsDocument, Output};
pub use error::{EpsError, Result, Unsupported};
pub use graphics::{
    color::ColorMode, BasicStroke, Composite, CompositeRule, Font, LineCapStyle, LineJoinStyle,
    Paint, Stroke,
};
pub use tools::{create_from_drawable, Drawable};

/// Re-exported so callers can build outlines and pixel buffers without naming
/// the crates directly.
pub use ::image::RgbaImage;
pub use tiny_skia::{Color, Path, PathBuilder, Rect};

//! One call export of a drawable thing into an EPS document.

use crate::{
    graphics::color::ColorMode, DocumentOptionBuilder, EpsDocument, EpsGraphics,
    GraphicsOptionBuilder, Output,
};
use anyhow::anyhow;
use log::info;
use std::io::Write;
use tiny_skia::Rect;

/// Something that paints itself into a drawing context.
pub trait Drawable {
    /// Paint into `g`, `area` is the user space rectangle being exported.
    fn draw<O: Output>(&self, g: &mut EpsGraphics<O>, area: Rect) -> anyhow::Result<()>;
}

/// Export `drawable` as a complete EPS document covering `area`, written to
/// `writer`, which is returned once the document is finished.
pub fn create_from_drawable<W: Write>(
    drawable: &impl Drawable,
    writer: W,
    title: &str,
    area: Rect,
    color_mode: ColorMode,
) -> anyhow::Result<W> {
    let document = DocumentOptionBuilder::new()
        .title(title)
        .bounds(area)
        .build();
    let option = GraphicsOptionBuilder::new().color_mode(color_mode).build();
    let mut g = EpsGraphics::new(writer, document, option)?;
    drawable.draw(&mut g, area)?;
    g.finish()?;
    info!("exported {:?} as {}", title, color_mode);

    g.into_output()
        .and_then(EpsDocument::into_inner)
        .ok_or_else(|| anyhow!("document output still in use"))
}

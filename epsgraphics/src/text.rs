//! Text support: glyph outlines for accurate text mode, string escaping for
//! native text operators.

use crate::{graphics::Font, Result};
use log::debug;
use tiny_skia::{Path, PathBuilder};
use ttf_parser::{Face, OutlineBuilder};

/// Lays out text and returns its outline. Supplied by the platform text
/// stack; [`TtfOutliner`] works from TrueType/OpenType font data.
pub trait TextOutliner {
    /// Outline of `text` set in `font`, the baseline starting at `(x, y)` in
    /// user space (Y down). `None` if nothing visible is produced.
    fn outline(&self, font: &Font, text: &str, x: f32, y: f32) -> Option<Path>;
}

/// Writes glyph outlines, font units Y up, into a user space path builder.
struct GlyphSink<'a> {
    builder: &'a mut PathBuilder,
    scale: f32,
    x: f32,
    y: f32,
}

impl GlyphSink<'_> {
    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (x.mul_add(self.scale, self.x), (-y).mul_add(self.scale, self.y))
    }
}

impl OutlineBuilder for GlyphSink<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

/// Outlines text with a single TrueType/OpenType face, advancing by the
/// horizontal advance of each glyph. No kerning or shaping.
pub struct TtfOutliner {
    data: Vec<u8>,
    index: u32,
}

impl TtfOutliner {
    /// Fails if `data` is not a font with a face at `index`.
    pub fn new(data: Vec<u8>, index: u32) -> Result<Self> {
        Face::parse(&data, index)?;
        Ok(Self { data, index })
    }
}

impl TextOutliner for TtfOutliner {
    fn outline(&self, font: &Font, text: &str, x: f32, y: f32) -> Option<Path> {
        let face = Face::parse(&self.data, self.index).ok()?;
        let scale = font.size() / f32::from(face.units_per_em());
        let mut builder = PathBuilder::new();
        let mut pen = x;
        for ch in text.chars() {
            let Some(gid) = face.glyph_index(ch) else {
                debug!("no glyph for {:?} in {}", ch, font.family());
                continue;
            };
            let mut sink = GlyphSink {
                builder: &mut builder,
                scale,
                x: pen,
                y,
            };
            face.outline_glyph(gid, &mut sink);
            pen += f32::from(face.glyph_hor_advance(gid).unwrap_or(0)) * scale;
        }
        builder.finish()
    }
}

/// `text` as a string literal operand: parentheses and backslashes escaped.
pub(crate) fn ps_string(text: &str) -> String {
    let mut r = String::with_capacity(text.len() + 2);
    r.push('(');
    for ch in text.chars() {
        if matches!(ch, '(' | ')' | '\\') {
            r.push('\\');
        }
        r.push(ch);
    }
    r.push(')');
    r
}

#[cfg(test)]
mod tests;

//! The output side of the translation: a port every drawing context writes
//! operator lines into, and the EPS document adapter behind it.

use crate::graphics::{
    trans::{DevicePoint, DeviceSpace},
    PsNum,
};
use educe::Educe;
use euclid::Box2D;
use log::debug;
use std::{
    io::{self, Write},
    sync::atomic::{AtomicU32, Ordering},
};
use tiny_skia::Rect;

/// Identifies the drawing context an operator line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u32);

impl ContextId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Document record shared by every context drawing into it.
///
/// `flush`, `finish` and `close` must be idempotent.
pub trait Output {
    /// Append one operator line written by `ctx`.
    fn append(&mut self, ctx: ContextId, line: &str) -> io::Result<()>;

    /// Context that appended the last line, `None` before the first line.
    fn last_context(&self) -> Option<ContextId>;

    /// Grow the bounding box to include the device space point `(x, y)`.
    fn update_bounds(&mut self, x: f32, y: f32);

    fn is_clip_set(&self) -> bool;

    fn set_clip_set(&mut self, set: bool);

    fn flush(&mut self) -> io::Result<()>;

    /// Write the complete document. Later calls do nothing.
    fn finish(&mut self) -> io::Result<()>;

    /// Finish, then release the underlying writer.
    fn close(&mut self) -> io::Result<()> {
        self.finish()
    }
}

/// Smallest device space box enclosing every point seen, never shrinks.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox(Option<Box2D<f32, DeviceSpace>>);

impl BoundingBox {
    pub fn include(&mut self, p: DevicePoint) {
        self.0 = Some(match self.0 {
            None => Box2D::new(p, p),
            Some(b) => Box2D::new(b.min.min(p), b.max.max(p)),
        });
    }

    pub fn get(&self) -> Option<Box2D<f32, DeviceSpace>> {
        self.0
    }
}

const CREATOR: &str = concat!("epsgraphics ", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Educe)]
#[educe(Default)]
pub struct DocumentOption {
    #[educe(Default(expression = "String::from(\"Untitled\")"))]
    title: String,
    #[educe(Default(expression = "String::from(CREATOR)"))]
    creator: String,
    /// Written as is; the local time at finish when `None`.
    creation_date: Option<String>,
    /// Area in user space the document covers before anything is drawn.
    bounds: Option<Rect>,
}

#[derive(Educe)]
#[educe(Default(new))]
pub struct DocumentOptionBuilder(DocumentOption);

impl DocumentOptionBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = title.into();
        self
    }

    pub fn creator(mut self, creator: impl Into<String>) -> Self {
        self.0.creator = creator.into();
        self
    }

    pub fn creation_date(mut self, date: impl Into<String>) -> Self {
        self.0.creation_date = Some(date.into());
        self
    }

    pub fn bounds(mut self, area: Rect) -> Self {
        self.0.bounds = Some(area);
        self
    }

    pub fn build(self) -> DocumentOption {
        self.0
    }
}

/// Buffers the body and writes header, body and trailer to `W` on finish,
/// when the bounding box is final.
#[derive(Debug)]
pub struct EpsDocument<W: Write> {
    option: DocumentOption,
    writer: Option<W>,
    body: String,
    bounds: BoundingBox,
    clip_set: bool,
    last_context: Option<ContextId>,
    finished: bool,
}

fn finished_error() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "document already finished")
}

impl<W: Write> EpsDocument<W> {
    pub fn new(writer: W, option: DocumentOption) -> Self {
        let mut bounds = BoundingBox::default();
        if let Some(area) = option.bounds {
            bounds.include(DevicePoint::new(area.left(), -area.top()));
            bounds.include(DevicePoint::new(area.right(), -area.bottom()));
        }
        Self {
            option,
            writer: Some(writer),
            body: String::new(),
            bounds,
            clip_set: false,
            last_context: None,
            finished: false,
        }
    }

    /// Operator lines appended so far, one per line.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn bounding_box(&self) -> Option<Box2D<f32, DeviceSpace>> {
        self.bounds.get()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The writer, `None` once the document is closed.
    pub fn get_ref(&self) -> Option<&W> {
        self.writer.as_ref()
    }

    pub fn into_inner(self) -> Option<W> {
        self.writer
    }

    fn header(&self) -> String {
        let b = self.bounds.get().unwrap_or_else(Box2D::zero);
        let (w, h) = (b.width(), b.height());
        let date = self
            .option
            .creation_date
            .clone()
            .unwrap_or_else(|| chrono::Local::now().format("%a %b %d %H:%M:%S %Y").to_string());

        let mut r = String::new();
        r.push_str("%!PS-Adobe-3.0 EPSF-3.0\n");
        r.push_str(&format!("%%Creator: {}\n", self.option.creator));
        r.push_str(&format!("%%Title: {}\n", self.option.title));
        r.push_str(&format!("%%CreationDate: {date}\n"));
        r.push_str(&format!(
            "%%BoundingBox: 0 0 {} {}\n",
            w.ceil() as i64,
            h.ceil() as i64
        ));
        r.push_str(&format!(
            "%%HiResBoundingBox: 0 0 {} {}\n",
            PsNum(w),
            PsNum(h)
        ));
        r.push_str("%%DocumentData: Clean7Bit\n");
        r.push_str("%%DocumentProcessColors: Black\n");
        r.push_str("%%ColorUsage: Color\n");
        r.push_str("%%Origin: 0 0\n");
        r.push_str("%%Pages: 1\n");
        r.push_str("%%Page: 1 1\n");
        r.push_str("%%EndComments\n\n");
        r.push_str("gsave\n");
        r.push_str(&format!("{} {} translate\n", PsNum(-b.min.x), PsNum(-b.min.y)));
        r
    }

    fn footer(&self) -> String {
        let mut r = String::new();
        if self.clip_set {
            r.push_str("grestore\n");
        }
        r.push_str("grestore\nshowpage\n\n%%EOF");
        r
    }
}

impl<W: Write> Output for EpsDocument<W> {
    fn append(&mut self, ctx: ContextId, line: &str) -> io::Result<()> {
        if self.finished {
            return Err(finished_error());
        }
        self.last_context = Some(ctx);
        self.body.push_str(line);
        self.body.push('\n');
        Ok(())
    }

    fn last_context(&self) -> Option<ContextId> {
        self.last_context
    }

    fn update_bounds(&mut self, x: f32, y: f32) {
        self.bounds.include(DevicePoint::new(x, y));
    }

    fn is_clip_set(&self) -> bool {
        self.clip_set
    }

    fn set_clip_set(&mut self, set: bool) {
        self.clip_set = set;
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }

    fn finish(&mut self) -> io::Result<()> {
        if self.finished {
            return Ok(());
        }
        let header = self.header();
        let footer = self.footer();
        let w = self.writer.as_mut().ok_or_else(finished_error)?;
        w.write_all(header.as_bytes())?;
        w.write_all(self.body.as_bytes())?;
        w.write_all(footer.as_bytes())?;
        w.flush()?;
        self.finished = true;
        debug!(
            "document finished, bounding box: {:?}, {} bytes of body",
            self.bounds.get(),
            self.body.len()
        );
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.finish()?;
        self.writer = None;
        Ok(())
    }
}

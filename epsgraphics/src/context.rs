use crate::{
    clip::ClipRegion,
    document::{ContextId, DocumentOption, EpsDocument, Output},
    error::{EpsError, Result, Unsupported},
    graphics::{
        color::{brighter, darker, ColorMode},
        trans::{
            invert, matrix_operand, path_bounds, transform_path, ImageSpace, PageBox,
            UserSpace, UserToPageSpace, UserToUserSpace,
        },
        BasicStroke, Composite, Font, Paint, PsNum, Stroke,
    },
    path::{path_operators, PathAction},
    raster::encode_image,
    text::{ps_string, TextOutliner},
};
use educe::Educe;
use euclid::{Angle, Box2D, Point2D};
use image::RgbaImage;
use log::{debug, info};
use std::{
    cell::{Ref, RefCell},
    io::Write,
    rc::Rc,
};
use tiny_skia::{Color, Path, PathBuilder, Rect};

/// Option for EpsGraphics
#[derive(Debug, Clone, Educe)]
#[educe(Default)]
pub struct GraphicsOption {
    color_mode: ColorMode,
    /// Text as filled outlines when true, as font operators otherwise.
    #[educe(Default = true)]
    accurate_text: bool,
    #[educe(Default(expression = "Color::WHITE"))]
    background: Color,
}

#[derive(Educe)]
#[educe(Default(new))]
pub struct GraphicsOptionBuilder(GraphicsOption);

impl GraphicsOptionBuilder {
    pub fn color_mode(mut self, mode: ColorMode) -> Self {
        self.0.color_mode = mode;
        self
    }

    pub fn accurate_text(mut self, accurate: bool) -> Self {
        self.0.accurate_text = accurate;
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.0.background = color;
        self
    }

    pub fn build(self) -> GraphicsOption {
        self.0
    }
}

/// Active clip of a context: the region in the user space it was set in,
/// and the transform current at that time.
#[derive(Debug, Clone)]
struct ClipState {
    region: ClipRegion,
    transform: UserToPageSpace,
    /// `region` in page space, `None` if the transform overflowed.
    page: Option<ClipRegion>,
}

impl ClipState {
    fn new(region: ClipRegion, transform: UserToPageSpace) -> Self {
        let page = region.transform(&transform);
        if page.is_none() {
            debug!("clip region not finite in page space, not written");
        }
        Self {
            region,
            transform,
            page,
        }
    }

    fn page_bounds(&self) -> Option<PageBox> {
        let r = self.page.as_ref()?.bounds()?;
        Some(PageBox::new(
            Point2D::new(r.left(), r.top()),
            Point2D::new(r.right(), r.bottom()),
        ))
    }
}

#[derive(Debug, Clone, Educe)]
#[educe(Default)]
struct State {
    #[educe(Default(expression = "Color::BLACK"))]
    color: Color,
    #[educe(Default(expression = "Color::WHITE"))]
    background: Color,
    #[educe(Default(expression = "Paint::Color(Color::BLACK)"))]
    paint: Paint,
    composite: Composite,
    stroke: BasicStroke,
    font: Font,
    #[educe(Default(expression = "UserToPageSpace::identity()"))]
    transform: UserToPageSpace,
    clip: Option<ClipState>,
    #[educe(Default = true)]
    accurate_text: bool,
    color_mode: ColorMode,
}

fn rect(x: f32, y: f32, w: f32, h: f32) -> Option<Rect> {
    Rect::from_xywh(x, y, w.max(0.0), h.max(0.0))
}

fn image_size(img: &RgbaImage) -> Result<[i32; 2]> {
    let (w, h) = img.dimensions();
    match (i32::try_from(w), i32::try_from(h)) {
        (Ok(w), Ok(h)) => Ok([w, h]),
        _ => Err(EpsError::InvalidArgument(format!("image of {w}x{h} too large"))),
    }
}

fn polyline(points: &[(f32, f32)], close: bool) -> Option<Path> {
    let ((x, y), rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(*x, *y);
    for (x, y) in rest {
        pb.line_to(*x, *y);
    }
    if close {
        pb.close();
    }
    pb.finish()
}

/// Drawing context writing EPS operators into a shared [`Output`].
///
/// Each context owns its graphics state. Contexts made by [`Self::create`]
/// write into the same output; whenever a context writes after another one,
/// it first re-asserts its clip, color and font so the output state matches
/// its own.
#[derive(Educe)]
#[educe(Debug)]
pub struct EpsGraphics<O: Output> {
    id: ContextId,
    #[educe(Debug(ignore))]
    output: Rc<RefCell<O>>,
    state: State,
    #[educe(Debug(ignore))]
    outliner: Option<Rc<dyn TextOutliner>>,
}

impl<W: Write> EpsGraphics<EpsDocument<W>> {
    /// Start a new EPS document written to `writer` on finish.
    pub fn new(writer: W, document: DocumentOption, option: GraphicsOption) -> Result<Self> {
        Self::with_output(Rc::new(RefCell::new(EpsDocument::new(writer, document))), option)
    }
}

impl<O: Output> EpsGraphics<O> {
    pub fn with_output(output: Rc<RefCell<O>>, option: GraphicsOption) -> Result<Self> {
        let state = State {
            color_mode: option.color_mode,
            accurate_text: option.accurate_text,
            background: option.background,
            ..Default::default()
        };
        let r = Self {
            id: ContextId::next(),
            output,
            state,
            outliner: None,
        };
        r.lines(r.state_lines())?;
        Ok(r)
    }

    /// New context with a copy of this state, drawing into the same output.
    pub fn create(&self) -> Result<Self> {
        let r = Self {
            id: ContextId::next(),
            output: Rc::clone(&self.output),
            state: self.state.clone(),
            outliner: self.outliner.clone(),
        };
        if self.output.borrow().last_context() == Some(self.id) {
            // same state as the parent that wrote last, no clip to re-install
            r.emit_all(r.state_lines())?;
        } else {
            r.lines(r.state_lines())?;
        }
        Ok(r)
    }

    /// New context translated to `(x, y)` and clipped to `w` x `h`.
    pub fn create_clipped(&self, x: f32, y: f32, w: f32, h: f32) -> Result<Self> {
        let mut r = self.create()?;
        r.translate(x, y)?;
        r.clip_rect(0.0, 0.0, w, h)?;
        Ok(r)
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn document(&self) -> Ref<'_, O> {
        self.output.borrow()
    }

    /// Give back the output if no other context shares it.
    pub fn into_output(self) -> Option<O> {
        Rc::try_unwrap(self.output).ok().map(RefCell::into_inner)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.output.borrow_mut().flush()?;
        Ok(())
    }

    /// Write the complete document, the output stays open.
    pub fn finish(&mut self) -> Result<()> {
        let mut output = self.output.borrow_mut();
        output.flush()?;
        output.finish()?;
        Ok(())
    }

    pub fn close(&mut self) -> Result<()> {
        let mut output = self.output.borrow_mut();
        output.flush()?;
        output.close()?;
        Ok(())
    }

    fn emit_all(&self, lines: impl IntoIterator<Item = String>) -> Result<()> {
        let mut output = self.output.borrow_mut();
        for line in lines {
            output.append(self.id, &line)?;
        }
        Ok(())
    }

    /// Re-assert this context's state if another context wrote last.
    fn begin(&self) -> Result<()> {
        let last = self.output.borrow().last_context();
        if last.is_none() || last == Some(self.id) {
            return Ok(());
        }

        debug!("{:?} takes over the output from {:?}", self.id, last);
        let mut lines = match &self.state.clip {
            Some(clip) => self.clip_lines(clip).0,
            None => {
                let mut output = self.output.borrow_mut();
                if output.is_clip_set() {
                    output.set_clip_set(false);
                    vec!["grestore".to_owned()]
                } else {
                    vec![]
                }
            }
        };
        lines.extend(self.state_lines());
        self.emit_all(lines)
    }

    fn lines(&self, lines: impl IntoIterator<Item = String>) -> Result<()> {
        self.begin()?;
        self.emit_all(lines)
    }

    fn line(&self, line: impl Into<String>) -> Result<()> {
        self.lines([line.into()])
    }

    /// Color, and font in native text mode: the state `grestore` reverts.
    fn state_lines(&self) -> Vec<String> {
        let mut r = vec![self.state.color_mode.operator(self.state.color)];
        if !self.state.accurate_text {
            r.push(self.state.font.operator());
        }
        r
    }

    /// Lines installing `clip`, and whether an active clip was restored away
    /// first. Marks the output as clipped.
    fn clip_lines(&self, clip: &ClipState) -> (Vec<String>, bool) {
        let mut r = vec![];
        let restored = {
            let mut output = self.output.borrow_mut();
            let restored = output.is_clip_set();
            if restored {
                r.push("grestore".to_owned());
            } else {
                output.set_clip_set(true);
            }
            restored
        };
        r.push("gsave".to_owned());
        if let Some(page) = &clip.page {
            for p in page.paths() {
                r.extend(path_operators(p, PathAction::Clip));
            }
        }
        (r, restored)
    }

    fn update_bounds(&self, path: &Path) {
        let mut b: PageBox = path_bounds(path);
        if let Some(clip) = self.state.clip.as_ref().and_then(ClipState::page_bounds) {
            // inclusive, a zero width mark on the clip edge is still visible
            b = b.intersection_unchecked(&clip);
            if b.min.x > b.max.x || b.min.y > b.max.y {
                debug!("mark is clipped out, bounds unchanged");
                return;
            }
        }

        let r = 0.5 * self.state.stroke.width;
        let mut output = self.output.borrow_mut();
        output.update_bounds(b.min.x - r, -(b.min.y - r));
        output.update_bounds(b.max.x + r, -(b.max.y + r));
    }

    fn draw_path(&mut self, shape: Option<&Path>, action: PathAction) -> Result<()> {
        let Some(shape) = shape else {
            return Ok(());
        };
        let Some(path) = transform_path(shape, &self.state.transform) else {
            debug!("path not finite in page space, skipped");
            return Ok(());
        };

        self.begin()?;
        let mut lines = vec![];
        if action != PathAction::Clip {
            lines.extend(self.state.stroke.operators());
            self.update_bounds(&path);
        }
        lines.extend(path_operators(&path, action));
        self.emit_all(lines)
    }

    /// Stroke the outline of `shape`. `None` draws nothing.
    pub fn draw<'a>(&mut self, shape: impl Into<Option<&'a Path>>) -> Result<()> {
        self.draw_path(shape.into(), PathAction::Stroke)
    }

    pub fn fill<'a>(&mut self, shape: impl Into<Option<&'a Path>>) -> Result<()> {
        self.draw_path(shape.into(), PathAction::Fill)
    }

    pub fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Result<()> {
        self.draw(polyline(&[(x1, y1), (x2, y2)], false).as_ref())
    }

    pub fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32) -> Result<()> {
        let path = rect(x, y, w, h).map(PathBuilder::from_rect);
        self.draw(path.as_ref())
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) -> Result<()> {
        let path = rect(x, y, w, h).map(PathBuilder::from_rect);
        self.fill(path.as_ref())
    }

    /// Fill with the background color, the draw color is kept.
    pub fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) -> Result<()> {
        let color = self.state.color;
        self.set_color(self.state.background)?;
        self.fill_rect(x, y, w, h)?;
        self.set_color(color)
    }

    /// Outline with light from the top left when `raised`, drawn with a 1 unit
    /// stroke. Color and stroke are kept.
    pub fn draw_3d_rect(&mut self, x: f32, y: f32, w: f32, h: f32, raised: bool) -> Result<()> {
        let (color, stroke) = (self.state.color, self.state.stroke.clone());
        let (light, shadow) = (brighter(brighter(color)), darker(darker(color)));
        let (top_left, bottom_right) = if raised {
            (light, shadow)
        } else {
            (shadow, light)
        };
        self.state.stroke = BasicStroke::new(1.0);

        self.set_color(top_left)?;
        self.draw_line(x, y, x + w, y)?;
        self.draw_line(x, y, x, y + h)?;
        self.set_color(bottom_right)?;
        self.draw_line(x + w, y + h, x, y + h)?;
        self.draw_line(x + w, y + h, x + w, y)?;

        self.state.stroke = stroke;
        self.set_color(color)
    }

    pub fn fill_3d_rect(&mut self, x: f32, y: f32, w: f32, h: f32, raised: bool) -> Result<()> {
        let color = self.state.color;
        self.set_color(if raised {
            brighter(brighter(color))
        } else {
            darker(darker(color))
        })?;
        self.fill_rect(x, y, w, h)?;
        self.set_color(color)?;
        self.draw_3d_rect(x, y, w, h, raised)
    }

    pub fn draw_oval(&mut self, x: f32, y: f32, w: f32, h: f32) -> Result<()> {
        let path = rect(x, y, w, h).and_then(PathBuilder::from_oval);
        self.draw(path.as_ref())
    }

    pub fn fill_oval(&mut self, x: f32, y: f32, w: f32, h: f32) -> Result<()> {
        let path = rect(x, y, w, h).and_then(PathBuilder::from_oval);
        self.fill(path.as_ref())
    }

    pub fn draw_polyline(&mut self, points: &[(f32, f32)]) -> Result<()> {
        self.draw(polyline(points, false).as_ref())
    }

    pub fn draw_polygon(&mut self, points: &[(f32, f32)]) -> Result<()> {
        self.draw(polyline(points, true).as_ref())
    }

    pub fn fill_polygon(&mut self, points: &[(f32, f32)]) -> Result<()> {
        self.fill(polyline(points, true).as_ref())
    }

    /// Fill glyph outlines produced by a text layout.
    pub fn draw_glyphs(&mut self, outline: &Path) -> Result<()> {
        self.fill(outline)
    }

    pub fn set_text_outliner(&mut self, outliner: Option<Rc<dyn TextOutliner>>) {
        self.outliner = outliner;
    }

    /// Draw `text` with its baseline starting at `(x, y)`.
    ///
    /// In accurate text mode the outline from the text outliner is filled;
    /// otherwise, or without an outliner, the text is shown with the current
    /// font by name.
    pub fn draw_string(&mut self, text: &str, x: f32, y: f32) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        if self.state.accurate_text {
            if let Some(outliner) = &self.outliner {
                let path = outliner.outline(&self.state.font, text, x, y);
                return self.fill(path.as_ref());
            }
            info!("no text outliner, text written with font operators");
        }

        let p = self.state.transform.transform_point(Point2D::new(x, y));
        self.lines([
            "newpath".to_owned(),
            format!("{} {} moveto", PsNum(p.x), PsNum(-p.y)),
            format!("{} show", ps_string(text)),
        ])
    }

    pub fn draw_image(&mut self, img: &RgbaImage, x: i32, y: i32) -> Result<()> {
        let [w, h] = image_size(img)?;
        self.draw_image_scaled(img, x, y, w, h)
    }

    pub fn draw_image_scaled(
        &mut self,
        img: &RgbaImage,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
    ) -> Result<()> {
        let [img_w, img_h] = image_size(img)?;
        let far = |v: i32, len: i32, name: &str| {
            v.checked_add(len).ok_or_else(|| {
                EpsError::InvalidArgument(format!("{name} + {len} overflows: {v}"))
            })
        };
        let dst = Box2D::new(
            Point2D::new(x, y),
            Point2D::new(far(x, w, "x")?, far(y, h, "y")?),
        );
        self.draw_image_region(
            img,
            dst,
            Box2D::new(Point2D::origin(), Point2D::new(img_w, img_h)),
        )
    }

    /// Draw the `src` pixels of `img` into the user space rectangle `dst`.
    ///
    /// Fails without writing anything if a rectangle is empty or the mapping
    /// cannot be inverted.
    pub fn draw_image_region(
        &mut self,
        img: &RgbaImage,
        dst: Box2D<i32, UserSpace>,
        src: Box2D<i32, ImageSpace>,
    ) -> Result<()> {
        let encoded = encode_image(
            img,
            &dst,
            &src,
            &self.state.transform,
            self.state.color_mode,
        )?;

        self.line("gsave")?;
        // background fill puts the image footprint into the bounding box
        let color = self.state.color;
        self.set_color(self.state.background)?;
        let size = dst.size();
        self.fill_rect(
            dst.min.x as f32,
            dst.min.y as f32,
            size.width as f32,
            size.height as f32,
        )?;
        self.set_color(color)?;

        self.line(encoded.header)?;
        self.lines(encoded.operators)?;
        self.lines(encoded.data)?;
        self.line("grestore")
    }

    /// Draw `img` at the origin of `transform` applied on top of the current
    /// transform. The current transform is restored afterwards.
    pub fn draw_image_transformed(
        &mut self,
        img: &RgbaImage,
        transform: &UserToUserSpace,
    ) -> Result<()> {
        let saved = self.state.transform;
        self.transform(transform)?;
        let r = self.draw_image(img, 0, 0);
        self.set_transform(saved)?;
        r
    }

    pub fn color(&self) -> Color {
        self.state.color
    }

    pub fn set_color(&mut self, color: Color) -> Result<()> {
        self.state.color = color;
        self.line(self.state.color_mode.operator(color))
    }

    pub fn paint(&self) -> &Paint {
        &self.state.paint
    }

    /// Flat colors also become the draw color. Other paints are only
    /// recorded, the output has no gradients or patterns.
    pub fn set_paint(&mut self, paint: Paint) -> Result<()> {
        if let Paint::Color(c) = paint {
            self.state.paint = paint;
            return self.set_color(c);
        }
        info!("paint not supported, drawing keeps the current color: {:?}", paint);
        self.state.paint = paint;
        Ok(())
    }

    pub fn background(&self) -> Color {
        self.state.background
    }

    pub fn set_background(&mut self, color: Color) {
        self.state.background = color;
    }

    pub fn composite(&self) -> Composite {
        self.state.composite
    }

    pub fn set_composite(&mut self, composite: Composite) {
        self.state.composite = composite;
    }

    pub fn stroke(&self) -> &BasicStroke {
        &self.state.stroke
    }

    /// Only basic strokes are accepted, the current stroke is kept otherwise.
    pub fn set_stroke(&mut self, stroke: impl Into<Stroke>) -> Result<()> {
        match stroke.into() {
            Stroke::Basic(s) => {
                self.state.stroke = s;
                Ok(())
            }
            Stroke::Shaped(outline) => Err(EpsError::UnsupportedStroke(format!(
                "shaped stroke with bounds {:?}",
                outline.bounds()
            ))),
            Stroke::Custom(name) => Err(EpsError::UnsupportedStroke(name)),
        }
    }

    pub fn font(&self) -> &Font {
        &self.state.font
    }

    pub fn set_font(&mut self, font: Font) -> Result<()> {
        self.state.font = font;
        if self.state.accurate_text {
            Ok(())
        } else {
            self.line(self.state.font.operator())
        }
    }

    pub fn is_accurate_text(&self) -> bool {
        self.state.accurate_text
    }

    pub fn set_accurate_text(&mut self, accurate: bool) -> Result<()> {
        self.state.accurate_text = accurate;
        if accurate {
            Ok(())
        } else {
            self.line(self.state.font.operator())
        }
    }

    pub fn color_mode(&self) -> ColorMode {
        self.state.color_mode
    }

    /// Switch color mode and select the current color under it.
    pub fn set_color_mode(&mut self, mode: ColorMode) -> Result<()> {
        self.state.color_mode = mode;
        self.line(mode.operator(self.state.color))
    }

    pub fn get_transform(&self) -> UserToPageSpace {
        self.state.transform
    }

    /// Replace the current transform. Stroke and font operators carry
    /// absolute sizes, they are written again.
    pub fn set_transform(&mut self, transform: UserToPageSpace) -> Result<()> {
        self.state.transform = transform;
        debug!("transform to {}", matrix_operand(&transform));
        let mut lines = self.state.stroke.operators().to_vec();
        if !self.state.accurate_text {
            lines.push(self.state.font.operator());
        }
        self.lines(lines)
    }

    /// Apply `transform` before the current transform.
    pub fn transform(&mut self, transform: &UserToUserSpace) -> Result<()> {
        self.set_transform(transform.then(&self.state.transform))
    }

    pub fn translate(&mut self, tx: f32, ty: f32) -> Result<()> {
        self.transform(&UserToUserSpace::translation(tx, ty))
    }

    pub fn scale(&mut self, sx: f32, sy: f32) -> Result<()> {
        self.transform(&UserToUserSpace::scale(sx, sy))
    }

    /// Rotate by `theta` radians, from the X axis toward the Y axis.
    pub fn rotate(&mut self, theta: f32) -> Result<()> {
        self.transform(&UserToUserSpace::rotation(Angle::radians(theta)))
    }

    pub fn rotate_around(&mut self, theta: f32, x: f32, y: f32) -> Result<()> {
        self.transform(
            &UserToUserSpace::translation(-x, -y)
                .then_rotate(Angle::radians(theta))
                .then_translate((x, y).into()),
        )
    }

    pub fn shear(&mut self, shx: f32, shy: f32) -> Result<()> {
        self.transform(&UserToUserSpace::new(1.0, shy, shx, 1.0, 0.0, 0.0))
    }

    /// Active clip in the current user space. Fails if the current transform
    /// cannot be inverted.
    pub fn get_clip(&self) -> Result<Option<ClipRegion>> {
        let Some(clip) = &self.state.clip else {
            return Ok(None);
        };
        let to_user = clip.transform.then(&invert(&self.state.transform)?);
        clip.region
            .transform(&to_user)
            .map(Some)
            .ok_or_else(|| EpsError::NonInvertibleTransform(matrix_operand(&to_user)))
    }

    pub fn clip_bounds(&self) -> Result<Option<Rect>> {
        Ok(self.get_clip()?.and_then(|c| c.bounds()))
    }

    /// True if the rectangle may be visible: it overlaps the clip bounds, or
    /// there is no clip.
    pub fn hit_clip(&self, x: f32, y: f32, w: f32, h: f32) -> Result<bool> {
        let Some(clip) = self.get_clip()? else {
            return Ok(true);
        };
        Ok(rect(x, y, w, h).is_some_and(|r| clip.hit(&r)))
    }

    /// Replace the clip; `None` removes it.
    pub fn set_clip<'a>(&mut self, shape: impl Into<Option<&'a Path>>) -> Result<()> {
        self.install_clip(shape.into().map(|p| p.clone().into()))
    }

    pub fn set_clip_rect(&mut self, x: f32, y: f32, w: f32, h: f32) -> Result<()> {
        match rect(x, y, w, h) {
            Some(r) => self.install_clip(Some(r.into())),
            None => Ok(()),
        }
    }

    /// Narrow the clip to its intersection with `shape`.
    pub fn clip(&mut self, shape: &Path) -> Result<()> {
        let region = match self.get_clip()? {
            Some(current) => current.intersect(shape),
            None => shape.clone().into(),
        };
        self.install_clip(Some(region))
    }

    pub fn clip_rect(&mut self, x: f32, y: f32, w: f32, h: f32) -> Result<()> {
        match rect(x, y, w, h) {
            Some(r) => self.clip(&PathBuilder::from_rect(r)),
            None => Ok(()),
        }
    }

    fn install_clip(&mut self, region: Option<ClipRegion>) -> Result<()> {
        self.begin()?;
        let (mut lines, restored) = match region {
            Some(region) => {
                let clip = ClipState::new(region, self.state.transform);
                let r = self.clip_lines(&clip);
                self.state.clip = Some(clip);
                r
            }
            None => {
                self.state.clip = None;
                let mut output = self.output.borrow_mut();
                let restored = output.is_clip_set();
                output.set_clip_set(false);
                let lines = if restored {
                    vec!["grestore".to_owned()]
                } else {
                    vec![]
                };
                (lines, restored)
            }
        };
        if restored {
            lines.extend(self.state_lines());
        }
        self.emit_all(lines)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn copy_area(
        &self,
        _x: i32,
        _y: i32,
        _w: i32,
        _h: i32,
        _dx: i32,
        _dy: i32,
    ) -> Unsupported {
        Unsupported::report("copy area")
    }

    pub fn set_xor_mode(&self, _color: Color) -> Unsupported {
        Unsupported::report("XOR paint mode")
    }

    /// Paint mode is the only mode there is.
    pub fn set_paint_mode(&self) {}
}

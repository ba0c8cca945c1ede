//! Graphics state value types: stroke, paint, composite and font, and the
//! number formatting shared by every operator line.
use educe::Educe;
use image::RgbaImage;
use std::{fmt, rc::Rc};
use tiny_skia::{Color, Path, Point};

pub mod color;
pub mod trans;

/// Number formatted for an operator line: shortest round-trip decimal, never
/// an exponent, never `-0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PsNum(pub f32);

impl fmt::Display for PsNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0.0 {
            f.write_str("0")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCapStyle {
    Butt = 0,
    Round = 1,
    #[default]
    Square = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoinStyle {
    #[default]
    Miter = 0,
    Round = 1,
    Bevel = 2,
}

/// Stroke described by width, miter limit, join, cap and dash, the only
/// kind of stroke the format can express.
#[derive(Debug, Clone, PartialEq, Educe)]
#[educe(Default)]
pub struct BasicStroke {
    #[educe(Default = 1.0f32)]
    pub width: f32,
    #[educe(Default = 10.0f32)]
    pub miter_limit: f32,
    pub join: LineJoinStyle,
    pub cap: LineCapStyle,
    /// Alternating on/off lengths, empty for a solid line.
    pub dash: Vec<f32>,
    pub dash_phase: f32,
}

impl BasicStroke {
    pub fn new(width: f32) -> Self {
        Self {
            width,
            ..Default::default()
        }
    }

    pub fn with_cap(mut self, cap: LineCapStyle) -> Self {
        self.cap = cap;
        self
    }

    pub fn with_join(mut self, join: LineJoinStyle) -> Self {
        self.join = join;
        self
    }

    pub fn with_miter_limit(mut self, limit: f32) -> Self {
        self.miter_limit = limit;
        self
    }

    pub fn with_dash(mut self, dash: impl Into<Vec<f32>>, phase: f32) -> Self {
        self.dash = dash.into();
        self.dash_phase = phase;
        self
    }

    /// Operators asserting this stroke. There is no persistent stroke object
    /// in the output, every mark emits these again.
    pub fn operators(&self) -> [String; 5] {
        let mut dash = String::from("[ ");
        for d in &self.dash {
            dash.push_str(&format!("{} ", PsNum(*d)));
        }
        dash.push(']');

        [
            format!("{} setlinewidth", PsNum(self.width)),
            format!("{} setmiterlimit", PsNum(self.miter_limit.max(1.0))),
            format!("{} setlinejoin", self.join as i32),
            format!("{} setlinecap", self.cap as i32),
            format!("{} {} setdash", dash, PsNum(self.dash_phase)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stroke {
    Basic(BasicStroke),
    /// Stamps `outline` along the stroked path.
    Shaped(Path),
    /// Stroke computed by caller code, identified by name.
    Custom(String),
}

impl From<BasicStroke> for Stroke {
    fn from(s: BasicStroke) -> Self {
        Self::Basic(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Color(Color),
    LinearGradient {
        start: Point,
        end: Point,
        stops: Vec<(f32, Color)>,
    },
    Tile(Rc<RgbaImage>),
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self {
        Self::Color(c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum CompositeRule {
    Clear,
    Src,
    Dst,
    #[default]
    SrcOver,
    DstOver,
    SrcIn,
    DstIn,
    SrcOut,
    DstOut,
    SrcAtop,
    DstAtop,
    Xor,
}

/// Stored for callers that read it back; the output has no compositing.
#[derive(Debug, Clone, Copy, PartialEq, Educe)]
#[educe(Default)]
pub struct Composite {
    pub rule: CompositeRule,
    #[educe(Default = 1.0f32)]
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    family: String,
    ps_name: String,
    size: f32,
}

impl Default for Font {
    fn default() -> Self {
        Self::new("Dialog", 12.0)
    }
}

impl Font {
    /// PostScript name defaults to the family with white space removed.
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        let family = family.into();
        let ps_name = family.split_whitespace().collect();
        Self {
            family,
            ps_name,
            size,
        }
    }

    pub fn with_ps_name(mut self, name: impl Into<String>) -> Self {
        self.ps_name = name.into();
        self
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn ps_name(&self) -> &str {
        &self.ps_name
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub(crate) fn operator(&self) -> String {
        format!(
            "/{} findfont {} scalefont setfont",
            self.ps_name,
            PsNum(self.size)
        )
    }
}

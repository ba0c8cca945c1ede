//! Color rendering modes. Every color reaches the output as RGB and is
//! reinterpreted by the active mode, both for vector marks and image samples.

use super::PsNum;
use tiny_skia::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum ColorMode {
    BlackAndWhite,
    Grayscale,
    #[default]
    Rgb,
    Cmyk,
}

/// Operand values of a color operator, every component in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorComponents {
    Gray(f32),
    Rgb([f32; 3]),
    Cmyk([f32; 4]),
}

fn rgb8(c: Color) -> [u8; 3] {
    let c = c.to_color_u8();
    [c.red(), c.green(), c.blue()]
}

/// Channel sum above this threshold is white in black and white mode.
fn is_white(rgb: [u8; 3]) -> bool {
    let sum: u32 = rgb.iter().map(|&v| u32::from(v)).sum();
    f64::from(sum) > 255.0 * 1.5 - 1.0
}

fn cmyk(rgb: [u8; 3]) -> [f32; 4] {
    if rgb == [0, 0, 0] {
        return [0.0, 0.0, 0.0, 1.0];
    }

    let [c, m, y] = rgb.map(|v| 1.0 - f64::from(v) / 255.0);
    let k = c.min(m).min(y);
    // k < 1 here, every channel of pure black was handled above
    let ink = |v: f64| ((v - k) / (1.0 - k)).clamp(0.0, 1.0) as f32;
    [ink(c), ink(m), ink(y), k as f32]
}

/// Step factor of [`brighter`] and [`darker`].
const SHADE: f64 = 0.7;

/// Channels scaled by `SHADE`, alpha kept.
pub fn darker(color: Color) -> Color {
    let c = color.to_color_u8();
    let shade = |v: u8| (f64::from(v) * SHADE) as u8;
    Color::from_rgba8(shade(c.red()), shade(c.green()), shade(c.blue()), c.alpha())
}

/// Channels divided by `SHADE` up to 255, alpha kept. Channels too dark to
/// grow are lifted first, black becomes a dark gray.
pub fn brighter(color: Color) -> Color {
    let c = color.to_color_u8();
    let floor = (1.0 / (1.0 - SHADE)) as u8;
    let (r, g, b) = (c.red(), c.green(), c.blue());
    if (r, g, b) == (0, 0, 0) {
        return Color::from_rgba8(floor, floor, floor, c.alpha());
    }
    let shade = |v: u8| {
        let v = if v > 0 && v < floor { floor } else { v };
        (f64::from(v) / SHADE).min(255.0) as u8
    };
    Color::from_rgba8(shade(r), shade(g), shade(b), c.alpha())
}

impl ColorMode {
    pub fn components(self, color: Color) -> ColorComponents {
        let rgb = rgb8(color);
        match self {
            Self::BlackAndWhite => ColorComponents::Gray(if is_white(rgb) { 1.0 } else { 0.0 }),
            Self::Grayscale => {
                let sum: u32 = rgb.iter().map(|&v| u32::from(v)).sum();
                ColorComponents::Gray(sum as f32 / (3.0 * 255.0))
            }
            Self::Rgb => ColorComponents::Rgb(rgb.map(|v| f32::from(v) / 255.0)),
            Self::Cmyk => ColorComponents::Cmyk(cmyk(rgb)),
        }
    }

    /// The single operator line selecting `color` under this mode.
    pub fn operator(self, color: Color) -> String {
        match self.components(color) {
            ColorComponents::Gray(g) => format!("{} setgray", PsNum(g)),
            ColorComponents::Rgb([r, g, b]) => {
                format!("{} {} {} setrgbcolor", PsNum(r), PsNum(g), PsNum(b))
            }
            ColorComponents::Cmyk([c, m, y, k]) => format!(
                "{} {} {} {} setcmykcolor",
                PsNum(c),
                PsNum(m),
                PsNum(y),
                PsNum(k)
            ),
        }
    }

    /// Append the image sample bytes of one pixel. Cmyk images are written
    /// as RGB samples, the same as Rgb.
    pub(crate) fn push_sample(self, rgb: [u8; 3], out: &mut Vec<u8>) {
        match self {
            Self::BlackAndWhite => out.push(if is_white(rgb) { 0xff } else { 0 }),
            Self::Grayscale => {
                let sum: u32 = rgb.iter().map(|&v| u32::from(v)).sum();
                out.push((sum / 3) as u8);
            }
            Self::Rgb | Self::Cmyk => out.extend_from_slice(&rgb),
        }
    }

    /// Data procedure and image operator for a row of `width` samples.
    pub(crate) fn image_operators(self, width: u32) -> [String; 2] {
        match self {
            Self::BlackAndWhite | Self::Grayscale => [
                format!("{{currentfile {width} string readhexstring pop}} bind"),
                "image".to_owned(),
            ],
            Self::Rgb | Self::Cmyk => [
                format!("{{currentfile 3 {width} mul string readhexstring pop}} bind"),
                "false 3 colorimage".to_owned(),
            ],
        }
    }
}

#[cfg(test)]
mod tests;

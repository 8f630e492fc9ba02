//! RGB/HSL color model with CSS-style parsing.
//!
//! This module provides:
//! - `Rgb`: an immutable 8-bit RGB triple with `darker`/`brighter` derivation
//! - `Hsl`: hue/saturation/lightness with standard colorimetric conversion
//! - Parsing of `#rgb`, `#rrggbb`, `rgb(r,g,b)`, `rgb(r%,g%,b%)`,
//!   `hsl(h,s%,l%)` and the named CSS colors
//!
//! Parsing is best-effort: unrecognized input yields `None` rather than a
//! panic, so callers can fall through to generic string handling. The
//! `FromStr` impl wraps the same parser in a typed error for `?`-style use.
//!
//! # Usage
//!
//! ```
//! use kinetic_interp::color::Rgb;
//!
//! let c = Rgb::parse("steelblue").unwrap();
//! assert_eq!(c.to_hex_string(), "#4682b4");
//! assert_eq!(Rgb::parse("#f03"), Some(Rgb::new(255, 0, 51)));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Channel scale factor applied once per `darker`/`brighter` step.
const DARKER: f64 = 0.7;

/// Error produced by the `FromStr` color parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// The input matched no supported color syntax.
    #[error("unrecognized color syntax: {0:?}")]
    Unrecognized(String),
}

/// An immutable RGB triple with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from 8-bit channels.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from floating-point channels.
    ///
    /// Each channel is rounded and clamped to [0, 255]; NaN becomes 0.
    pub fn from_channels(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
        }
    }

    /// A darker copy of this color, scaling each channel by `0.7^k`.
    pub fn darker(self, k: f64) -> Self {
        let t = DARKER.powf(k);
        Self::from_channels(
            f64::from(self.r) * t,
            f64::from(self.g) * t,
            f64::from(self.b) * t,
        )
    }

    /// A brighter copy of this color, scaling each channel by `0.7^-k`.
    pub fn brighter(self, k: f64) -> Self {
        let t = DARKER.powf(-k);
        Self::from_channels(
            f64::from(self.r) * t,
            f64::from(self.g) * t,
            f64::from(self.b) * t,
        )
    }

    /// Format as a lowercase 6-digit hex string (`#rrggbb`).
    pub fn to_hex_string(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Convert to HSL.
    ///
    /// Achromatic colors (zero channel range) produce a NaN hue; pure black
    /// and pure white additionally produce NaN saturation.
    pub fn to_hsl(self) -> Hsl {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let d = max - min;
        let l = (max + min) / 2.0;

        let (h, s);
        if d > 0.0 {
            s = if l < 0.5 { d / (max + min) } else { d / (2.0 - max - min) };
            let mut hue = if max == r {
                (g - b) / d + if g < b { 6.0 } else { 0.0 }
            } else if max == g {
                (b - r) / d + 2.0
            } else {
                (r - g) / d + 4.0
            };
            hue *= 60.0;
            h = hue;
        } else {
            h = f64::NAN;
            s = if l > 0.0 && l < 1.0 { 0.0 } else { f64::NAN };
        }

        Hsl { h, s, l }
    }

    /// Parse a CSS-style color string.
    ///
    /// Accepts `#rgb`, `#rrggbb`, `rgb(r,g,b)`, `rgb(r%,g%,b%)`,
    /// `hsl(h,s%,l%)` and named CSS colors, case-insensitive and
    /// whitespace-trimmed. Returns `None` for anything else.
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim().to_ascii_lowercase();

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(args) = strip_function(&s, "rgb") {
            return parse_rgb_args(args);
        }
        if let Some(args) = strip_function(&s, "hsl") {
            return parse_hsl_args(args);
        }
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == s)
            .map(|&(_, packed)| Self::from_packed(packed))
    }

    fn from_packed(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xff) as u8,
            g: ((packed >> 8) & 0xff) as u8,
            b: (packed & 0xff) as u8,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_string())
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ColorParseError::Unrecognized(s.to_string()))
    }
}

/// A color in hue/saturation/lightness space.
///
/// Hue is in degrees and may be negative or exceed 360; it is normalized at
/// conversion time. Saturation and lightness are clamped to [0, 1] by `new`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    /// Hue in degrees. NaN for achromatic colors.
    pub h: f64,
    /// Saturation in [0, 1].
    pub s: f64,
    /// Lightness in [0, 1].
    pub l: f64,
}

impl Hsl {
    /// Create an HSL color, clamping saturation and lightness to [0, 1].
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Self {
            h,
            s: s.clamp(0.0, 1.0),
            l: l.clamp(0.0, 1.0),
        }
    }

    /// Convert to RGB via the standard HSL reconstruction.
    ///
    /// A NaN hue is treated as 0 (achromatic input reconstructs to gray).
    pub fn to_rgb(self) -> Rgb {
        let h = if self.h.is_nan() {
            0.0
        } else {
            self.h.rem_euclid(360.0)
        };
        let s = if self.s.is_nan() { 0.0 } else { self.s.clamp(0.0, 1.0) };
        let l = self.l.clamp(0.0, 1.0);

        let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let m1 = 2.0 * l - m2;

        let channel = |mut hue: f64| -> f64 {
            if hue > 360.0 {
                hue -= 360.0;
            } else if hue < 0.0 {
                hue += 360.0;
            }
            let v = if hue < 60.0 {
                m1 + (m2 - m1) * hue / 60.0
            } else if hue < 180.0 {
                m2
            } else if hue < 240.0 {
                m1 + (m2 - m1) * (240.0 - hue) / 60.0
            } else {
                m1
            };
            v * 255.0
        };

        Rgb::from_channels(channel(h + 120.0), channel(h), channel(h - 120.0))
    }
}

/// Round and clamp a floating-point channel to [0, 255]; NaN becomes 0.
pub(crate) fn clamp_channel(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

/// Channel-wise linear RGB interpolation, re-encoded as `#rrggbb`.
///
/// Each channel is blended independently in floating point, then rounded and
/// clamped by the hex formatter; extrapolation outside [0, 1] saturates at
/// the channel bounds rather than wrapping.
pub fn rgb(a: Rgb, b: Rgb) -> impl Fn(f64) -> String + Send + Sync {
    let (ar, ag, ab) = (f64::from(a.r), f64::from(a.g), f64::from(a.b));
    let (dr, dg, db) = (
        f64::from(b.r) - ar,
        f64::from(b.g) - ag,
        f64::from(b.b) - ab,
    );
    move |t| Rgb::from_channels(ar + dr * t, ag + dg * t, ab + db * t).to_hex_string()
}

fn strip_function<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .trim_end()
        .strip_suffix(')')
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    match hex.len() {
        3 => {
            let packed = u32::from_str_radix(hex, 16).ok()?;
            let r = (packed >> 8) & 0xf;
            let g = (packed >> 4) & 0xf;
            let b = packed & 0xf;
            Some(Rgb::new(
                (r << 4 | r) as u8,
                (g << 4 | g) as u8,
                (b << 4 | b) as u8,
            ))
        }
        6 => u32::from_str_radix(hex, 16).ok().map(Rgb::from_packed),
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<Rgb> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return None;
    }
    let percent = parts.iter().any(|p| p.ends_with('%'));
    if percent && !parts.iter().all(|p| p.ends_with('%')) {
        return None;
    }
    let mut channels = [0.0f64; 3];
    for (slot, part) in channels.iter_mut().zip(&parts) {
        let raw = part.strip_suffix('%').unwrap_or(part);
        let v: f64 = raw.parse().ok()?;
        *slot = if percent { v * 255.0 / 100.0 } else { v };
    }
    Some(Rgb::from_channels(channels[0], channels[1], channels[2]))
}

fn parse_hsl_args(args: &str) -> Option<Rgb> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return None;
    }
    let h: f64 = parts[0].parse().ok()?;
    let s: f64 = parts[1].strip_suffix('%')?.parse().ok()?;
    let l: f64 = parts[2].strip_suffix('%')?.parse().ok()?;
    Some(Hsl::new(h, s / 100.0, l / 100.0).to_rgb())
}

/// The named CSS colors, packed as `0xrrggbb`.
const NAMED_COLORS: &[(&str, u32)] = &[
    ("aliceblue", 0xf0f8ff),
    ("antiquewhite", 0xfaebd7),
    ("aqua", 0x00ffff),
    ("aquamarine", 0x7fffd4),
    ("azure", 0xf0ffff),
    ("beige", 0xf5f5dc),
    ("bisque", 0xffe4c4),
    ("black", 0x000000),
    ("blanchedalmond", 0xffebcd),
    ("blue", 0x0000ff),
    ("blueviolet", 0x8a2be2),
    ("brown", 0xa52a2a),
    ("burlywood", 0xdeb887),
    ("cadetblue", 0x5f9ea0),
    ("chartreuse", 0x7fff00),
    ("chocolate", 0xd2691e),
    ("coral", 0xff7f50),
    ("cornflowerblue", 0x6495ed),
    ("cornsilk", 0xfff8dc),
    ("crimson", 0xdc143c),
    ("cyan", 0x00ffff),
    ("darkblue", 0x00008b),
    ("darkcyan", 0x008b8b),
    ("darkgoldenrod", 0xb8860b),
    ("darkgray", 0xa9a9a9),
    ("darkgreen", 0x006400),
    ("darkgrey", 0xa9a9a9),
    ("darkkhaki", 0xbdb76b),
    ("darkmagenta", 0x8b008b),
    ("darkolivegreen", 0x556b2f),
    ("darkorange", 0xff8c00),
    ("darkorchid", 0x9932cc),
    ("darkred", 0x8b0000),
    ("darksalmon", 0xe9967a),
    ("darkseagreen", 0x8fbc8f),
    ("darkslateblue", 0x483d8b),
    ("darkslategray", 0x2f4f4f),
    ("darkslategrey", 0x2f4f4f),
    ("darkturquoise", 0x00ced1),
    ("darkviolet", 0x9400d3),
    ("deeppink", 0xff1493),
    ("deepskyblue", 0x00bfff),
    ("dimgray", 0x696969),
    ("dimgrey", 0x696969),
    ("dodgerblue", 0x1e90ff),
    ("firebrick", 0xb22222),
    ("floralwhite", 0xfffaf0),
    ("forestgreen", 0x228b22),
    ("fuchsia", 0xff00ff),
    ("gainsboro", 0xdcdcdc),
    ("ghostwhite", 0xf8f8ff),
    ("gold", 0xffd700),
    ("goldenrod", 0xdaa520),
    ("gray", 0x808080),
    ("green", 0x008000),
    ("greenyellow", 0xadff2f),
    ("grey", 0x808080),
    ("honeydew", 0xf0fff0),
    ("hotpink", 0xff69b4),
    ("indianred", 0xcd5c5c),
    ("indigo", 0x4b0082),
    ("ivory", 0xfffff0),
    ("khaki", 0xf0e68c),
    ("lavender", 0xe6e6fa),
    ("lavenderblush", 0xfff0f5),
    ("lawngreen", 0x7cfc00),
    ("lemonchiffon", 0xfffacd),
    ("lightblue", 0xadd8e6),
    ("lightcoral", 0xf08080),
    ("lightcyan", 0xe0ffff),
    ("lightgoldenrodyellow", 0xfafad2),
    ("lightgray", 0xd3d3d3),
    ("lightgreen", 0x90ee90),
    ("lightgrey", 0xd3d3d3),
    ("lightpink", 0xffb6c1),
    ("lightsalmon", 0xffa07a),
    ("lightseagreen", 0x20b2aa),
    ("lightskyblue", 0x87cefa),
    ("lightslategray", 0x778899),
    ("lightslategrey", 0x778899),
    ("lightsteelblue", 0xb0c4de),
    ("lightyellow", 0xffffe0),
    ("lime", 0x00ff00),
    ("limegreen", 0x32cd32),
    ("linen", 0xfaf0e6),
    ("magenta", 0xff00ff),
    ("maroon", 0x800000),
    ("mediumaquamarine", 0x66cdaa),
    ("mediumblue", 0x0000cd),
    ("mediumorchid", 0xba55d3),
    ("mediumpurple", 0x9370db),
    ("mediumseagreen", 0x3cb371),
    ("mediumslateblue", 0x7b68ee),
    ("mediumspringgreen", 0x00fa9a),
    ("mediumturquoise", 0x48d1cc),
    ("mediumvioletred", 0xc71585),
    ("midnightblue", 0x191970),
    ("mintcream", 0xf5fffa),
    ("mistyrose", 0xffe4e1),
    ("moccasin", 0xffe4b5),
    ("navajowhite", 0xffdead),
    ("navy", 0x000080),
    ("oldlace", 0xfdf5e6),
    ("olive", 0x808000),
    ("olivedrab", 0x6b8e23),
    ("orange", 0xffa500),
    ("orangered", 0xff4500),
    ("orchid", 0xda70d6),
    ("palegoldenrod", 0xeee8aa),
    ("palegreen", 0x98fb98),
    ("paleturquoise", 0xafeeee),
    ("palevioletred", 0xdb7093),
    ("papayawhip", 0xffefd5),
    ("peachpuff", 0xffdab9),
    ("peru", 0xcd853f),
    ("pink", 0xffc0cb),
    ("plum", 0xdda0dd),
    ("powderblue", 0xb0e0e6),
    ("purple", 0x800080),
    ("red", 0xff0000),
    ("rosybrown", 0xbc8f8f),
    ("royalblue", 0x4169e1),
    ("saddlebrown", 0x8b4513),
    ("salmon", 0xfa8072),
    ("sandybrown", 0xf4a460),
    ("seagreen", 0x2e8b57),
    ("seashell", 0xfff5ee),
    ("sienna", 0xa0522d),
    ("silver", 0xc0c0c0),
    ("skyblue", 0x87ceeb),
    ("slateblue", 0x6a5acd),
    ("slategray", 0x708090),
    ("slategrey", 0x708090),
    ("snow", 0xfffafa),
    ("springgreen", 0x00ff7f),
    ("steelblue", 0x4682b4),
    ("tan", 0xd2b48c),
    ("teal", 0x008080),
    ("thistle", 0xd8bfd8),
    ("tomato", 0xff6347),
    ("turquoise", 0x40e0d0),
    ("violet", 0xee82ee),
    ("wheat", 0xf5deb3),
    ("white", 0xffffff),
    ("whitesmoke", 0xf5f5f5),
    ("yellow", 0xffff00),
    ("yellowgreen", 0x9acd32),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgb::parse("#ff0000"), Some(Rgb::new(255, 0, 0)));
        assert_eq!(Rgb::parse("#f00"), Some(Rgb::new(255, 0, 0)));
        assert_eq!(Rgb::parse("#4682B4"), Some(Rgb::new(70, 130, 180)));
        assert_eq!(Rgb::parse("  #abc  "), Some(Rgb::new(170, 187, 204)));
    }

    #[test]
    fn test_functional_parsing() {
        assert_eq!(Rgb::parse("rgb(70, 130, 180)"), Some(Rgb::new(70, 130, 180)));
        assert_eq!(Rgb::parse("rgb(100%, 0%, 50%)"), Some(Rgb::new(255, 0, 128)));
        assert_eq!(Rgb::parse("hsl(0, 100%, 50%)"), Some(Rgb::new(255, 0, 0)));
        assert_eq!(Rgb::parse("hsl(120, 100%, 25%)"), Some(Rgb::new(0, 128, 0)));
    }

    #[test]
    fn test_named_parsing() {
        assert_eq!(Rgb::parse("steelblue"), Some(Rgb::new(70, 130, 180)));
        assert_eq!(Rgb::parse("SteelBlue"), Some(Rgb::new(70, 130, 180)));
        assert_eq!(Rgb::parse("rebeccapurple"), None);
    }

    #[test]
    fn test_parse_failures_are_none() {
        assert_eq!(Rgb::parse(""), None);
        assert_eq!(Rgb::parse("#12345"), None);
        assert_eq!(Rgb::parse("rgb(1,2)"), None);
        assert_eq!(Rgb::parse("rgb(1%, 2, 3)"), None);
        assert_eq!(Rgb::parse("hsl(0, 1, 0.5)"), None);
        assert_eq!(Rgb::parse("not a color"), None);
    }

    #[test]
    fn test_from_str_error() {
        let err = "bogus".parse::<Rgb>().unwrap_err();
        assert_eq!(err, ColorParseError::Unrecognized("bogus".to_string()));
    }

    #[test]
    fn test_hex_formatting() {
        assert_eq!(Rgb::new(255, 0, 51).to_hex_string(), "#ff0033");
        assert_eq!(Rgb::new(0, 0, 0).to_hex_string(), "#000000");
        assert_eq!(format!("{}", Rgb::new(70, 130, 180)), "#4682b4");
    }

    #[test]
    fn test_channel_clamping() {
        assert_eq!(Rgb::from_channels(-10.0, 300.0, 127.5), Rgb::new(0, 255, 128));
        assert_eq!(Rgb::from_channels(f64::NAN, 0.0, 0.0), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_darker_brighter() {
        let c = Rgb::new(100, 200, 50);
        assert_eq!(c.darker(1.0), Rgb::new(70, 140, 35));
        // One brighter step is the exact inverse factor of one darker step.
        let b = c.brighter(1.0);
        assert_eq!(b, Rgb::from_channels(100.0 / 0.7, 200.0 / 0.7, 50.0 / 0.7));
        // Brightening saturates at the channel ceiling.
        assert_eq!(Rgb::new(250, 250, 250).brighter(2.0), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_achromatic_hue_is_nan() {
        let hsl = Rgb::new(128, 128, 128).to_hsl();
        assert!(hsl.h.is_nan());
        assert_eq!(hsl.s, 0.0);

        let black = Rgb::new(0, 0, 0).to_hsl();
        assert!(black.h.is_nan());
        assert!(black.s.is_nan());
    }

    #[test]
    fn test_hsl_round_trip() {
        let red = Rgb::new(255, 0, 0).to_hsl();
        assert!((red.h - 0.0).abs() < 1e-9);
        assert!((red.s - 1.0).abs() < 1e-9);
        assert!((red.l - 0.5).abs() < 1e-9);
        assert_eq!(red.to_rgb(), Rgb::new(255, 0, 0));

        let sb = Rgb::new(70, 130, 180).to_hsl().to_rgb();
        // Quantization may move a channel by one.
        assert!((i32::from(sb.r) - 70).abs() <= 1);
        assert!((i32::from(sb.g) - 130).abs() <= 1);
        assert!((i32::from(sb.b) - 180).abs() <= 1);
    }

    #[test]
    fn test_negative_hue_wraps() {
        let a = Hsl::new(-120.0, 1.0, 0.5).to_rgb();
        let b = Hsl::new(240.0, 1.0, 0.5).to_rgb();
        assert_eq!(a, b);
        assert_eq!(a, Rgb::new(0, 0, 255));
    }

    #[test]
    fn test_rgb_interpolator_endpoints() {
        let f = rgb(Rgb::new(255, 0, 0), Rgb::new(0, 0, 255));
        assert_eq!(f(0.0), "#ff0000");
        assert_eq!(f(1.0), "#0000ff");
        assert_eq!(f(0.5), "#800080");
    }

    #[test]
    fn test_rgb_interpolator_saturates_on_extrapolation() {
        let f = rgb(Rgb::new(200, 100, 0), Rgb::new(255, 200, 0));
        assert_eq!(f(2.0), "#ffff00");
        assert_eq!(f(-3.0), "#230000");
    }

    #[test]
    fn test_named_color_count() {
        assert_eq!(NAMED_COLORS.len(), 147);
    }

    #[test]
    fn test_serde_round_trip() {
        let c = Rgb::new(70, 130, 180);
        let json = serde_json::to_string(&c).unwrap();
        let parsed: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(c, parsed);
    }
}

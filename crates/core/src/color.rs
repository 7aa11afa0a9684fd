//! Color types and the perceptual hue mapping used for trail segments.
//!
//! Segment colors are chosen in OKLCh (lightness, chroma, hue) so that
//! sweeping the hue with agent speed gives a perceptually even rainbow, then
//! converted to sRGB and packed as `0xRRGGBB` for the renderers.

use crate::error::TrailError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with components in [0, 1].
///
/// Serializes as a hex string `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Gamma-decoded RGB, only seen between OKLab and sRGB.
#[derive(Debug, Clone, Copy)]
struct LinearRgb {
    r: f64,
    g: f64,
    b: f64,
}

#[derive(Debug, Clone, Copy)]
struct OkLab {
    l: f64,
    a: f64,
    b: f64,
}

/// OKLCh, the cylindrical form of OKLab. Hue is in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OkLch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

impl Srgb {
    pub const BLACK: Srgb = Srgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub const WHITE: Srgb = Srgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Parses `"#rrggbb"` or `"rrggbb"` (case insensitive).
    pub fn from_hex(hex: &str) -> Result<Srgb, TrailError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(TrailError::InvalidColor(format!(
                "expected 6 hex digits, got '{hex}'"
            )));
        }
        let packed = u32::from_str_radix(digits, 16)
            .map_err(|e| TrailError::InvalidColor(format!("'{hex}': {e}")))?;
        Ok(Srgb::from_packed(packed))
    }

    /// Formats the color as `"#rrggbb"`.
    pub fn to_hex(self) -> String {
        format!("#{:06x}", self.to_packed())
    }

    /// Unpacks a `0xRRGGBB` integer. Bits above the low 24 are ignored.
    pub fn from_packed(packed: u32) -> Srgb {
        Srgb {
            r: ((packed >> 16) & 0xff) as f64 / 255.0,
            g: ((packed >> 8) & 0xff) as f64 / 255.0,
            b: (packed & 0xff) as f64 / 255.0,
        }
    }

    /// Packs the color as `0xRRGGBB`, clamping and rounding each channel.
    pub fn to_packed(self) -> u32 {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (q(self.r) << 16) | (q(self.g) << 8) | q(self.b)
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

fn linear_component_to_srgb(c: f64) -> f64 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn linear_to_srgb(c: LinearRgb) -> Srgb {
    Srgb {
        r: linear_component_to_srgb(c.r),
        g: linear_component_to_srgb(c.g),
        b: linear_component_to_srgb(c.b),
    }
}

/// The result may fall outside [0, 1] for colors outside the sRGB gamut.
fn oklab_to_linear(c: OkLab) -> LinearRgb {
    let l = (c.l + 0.3963377774 * c.a + 0.2158037573 * c.b).powi(3);
    let m = (c.l - 0.1055613458 * c.a - 0.0638541728 * c.b).powi(3);
    let s = (c.l - 0.0894841775 * c.a - 1.2914855480 * c.b).powi(3);

    LinearRgb {
        r: 4.0767416621 * l - 3.3077115913 * m + 0.2309699292 * s,
        g: -1.2684380046 * l + 2.6097574011 * m - 0.3413193965 * s,
        b: -0.0041960863 * l - 0.7034186147 * m + 1.7076147010 * s,
    }
}

/// Any hue value is accepted; it wraps.
fn oklch_to_oklab(c: OkLch) -> OkLab {
    let h = c.h.rem_euclid(360.0).to_radians();
    OkLab {
        l: c.l,
        a: c.c * h.cos(),
        b: c.c * h.sin(),
    }
}

/// OKLCh to sRGB, gamut-clipped by clamping linear channels to [0, 1].
pub fn oklch_to_srgb(c: OkLch) -> Srgb {
    let lin = oklab_to_linear(oklch_to_oklab(c));
    linear_to_srgb(LinearRgb {
        r: lin.r.clamp(0.0, 1.0),
        g: lin.g.clamp(0.0, 1.0),
        b: lin.b.clamp(0.0, 1.0),
    })
}

/// Maps a hue in degrees at the given OKLCh lightness and chroma to a packed
/// `0xRRGGBB` color.
pub fn oklch_to_packed(lightness: f64, chroma: f64, hue_deg: f64) -> u32 {
    oklch_to_srgb(OkLch {
        l: lightness,
        c: chroma,
        h: hue_deg,
    })
    .to_packed()
}

/// Multiplies a packed color channel-wise by a tint.
pub fn tint_packed(color: u32, tint: Srgb) -> u32 {
    let c = Srgb::from_packed(color);
    Srgb {
        r: c.r * tint.r,
        g: c.g * tint.g,
        b: c.b * tint.b,
    }
    .to_packed()
}

//! Color handling for Gem scenes
//!
//! GemSheet does not accept arbitrary CSS colors. Every paint property is one
//! of the four fixed [`Shade`] tokens, and each shade maps to a constant
//! [`Color`]. The [`Color`] type wraps the `DynamicColor` type from the color
//! crate so renderers get a real color value instead of a hex string.

use std::{fmt, str::FromStr};

use color::DynamicColor;
use thiserror::Error;

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Create a new `Color` from a CSS color string such as `"#31f582"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use gem_core::color::Color;
    ///
    /// assert!(Color::new("#40bfae").is_ok());
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns the underlying `DynamicColor`.
    pub fn dynamic(self) -> DynamicColor {
        self.color
    }

    /// Returns the alpha (transparency) component of this color.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

/// Error returned when a value is not one of the shade tokens `0`..`3`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown shade token `{0}`, expected one of `0`, `1`, `2`, `3`")]
pub struct UnknownShade(pub String);

/// One of the four fixed palette entries available to GemSheet.
///
/// | token | hex       |
/// |-------|-----------|
/// | `0`   | `#31f582` |
/// | `1`   | `#40bfae` |
/// | `2`   | `#4d4d7f` |
/// | `3`   | `#38154f` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Shade {
    Shade0,
    Shade1,
    Shade2,
    Shade3,
}

impl Shade {
    /// All shades in token order.
    pub const ALL: [Shade; 4] = [Shade::Shade0, Shade::Shade1, Shade::Shade2, Shade::Shade3];

    /// Returns the shade's token as written in GemSheet.
    pub fn token(self) -> u8 {
        match self {
            Shade::Shade0 => 0,
            Shade::Shade1 => 1,
            Shade::Shade2 => 2,
            Shade::Shade3 => 3,
        }
    }

    /// Returns the palette hex string for this shade.
    pub fn hex(self) -> &'static str {
        match self {
            Shade::Shade0 => "#31f582",
            Shade::Shade1 => "#40bfae",
            Shade::Shade2 => "#4d4d7f",
            Shade::Shade3 => "#38154f",
        }
    }

    /// Returns the palette color for this shade.
    pub fn color(self) -> Color {
        Color::new(self.hex()).expect("palette entries are valid hex colors")
    }
}

impl FromStr for Shade {
    type Err = UnknownShade;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(Shade::Shade0),
            "1" => Ok(Shade::Shade1),
            "2" => Ok(Shade::Shade2),
            "3" => Ok(Shade::Shade3),
            other => Err(UnknownShade(other.to_string())),
        }
    }
}

impl fmt::Display for Shade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shade {} ({})", self.token(), self.hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_new() {
        assert!(Color::new("#ff0000").is_ok());
        assert!(Color::new("not-a-color").is_err());
    }

    #[test]
    fn test_shade_tokens_round_trip() {
        for shade in Shade::ALL {
            let parsed: Shade = shade.token().to_string().parse().unwrap();
            assert_eq!(parsed, shade);
        }
    }

    #[test]
    fn test_shade_out_of_range() {
        let err = "4".parse::<Shade>().unwrap_err();
        assert_eq!(err, UnknownShade("4".to_string()));
        assert!("-1".parse::<Shade>().is_err());
        assert!("dark".parse::<Shade>().is_err());
    }

    #[test]
    fn test_palette_colors_are_opaque() {
        for shade in Shade::ALL {
            let color = shade.color();
            assert_eq!(color.alpha(), 1.0);
            assert_eq!(color, Color::new(shade.hex()).unwrap());
        }
    }

    #[test]
    fn test_shade_display() {
        assert_eq!(Shade::Shade2.to_string(), "shade 2 (#4d4d7f)");
    }
}

//! RGB colors and the color strings accepted by
//! [`Controller::set_color`](crate::Controller::set_color).

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::errors::Error;

/// An RGB color with red, green, and blue components (0-255 each).
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub(crate) red: u8,
    pub(crate) green: u8,
    pub(crate) blue: u8,
}

impl Color {
    /// Create a color with the given RGB values.
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Create a color from unchecked components.
    ///
    /// ```
    /// use govee_ble_rs::Color;
    ///
    /// assert_eq!(Color::try_rgb(255, 0, 128).unwrap(), Color::rgb(255, 0, 128));
    /// assert!(Color::try_rgb(256, 0, 0).is_err());
    /// assert!(Color::try_rgb(0, -1, 0).is_err());
    /// ```
    pub fn try_rgb(red: i32, green: i32, blue: i32) -> Result<Self, Error> {
        let component = |what: &'static str, value: i32| {
            u8::try_from(value).map_err(|_| Error::out_of_range(what, value.into(), 0, 255))
        };
        Ok(Self::rgb(
            component("red", red)?,
            component("green", green)?,
            component("blue", blue)?,
        ))
    }

    /// Create a default color (black: 0,0,0).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn red(&self) -> u8 {
        self.red
    }

    pub fn green(&self) -> u8 {
        self.green
    }

    pub fn blue(&self) -> u8 {
        self.blue
    }

    fn from_hex(hex: &str) -> Option<Self> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            6 => Some(Self::rgb(
                u8::from_str_radix(&hex[0..2], 16).ok()?,
                u8::from_str_radix(&hex[2..4], 16).ok()?,
                u8::from_str_radix(&hex[4..6], 16).ok()?,
            )),
            // #rgb shorthand: each digit is doubled
            3 => {
                let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
                Some(Self::rgb(digit(0)?, digit(1)?, digit(2)?))
            }
            _ => None,
        }
    }

    fn from_components(s: &str) -> Option<Self> {
        let parts = s
            .split(',')
            .map(|c| c.trim().parse::<u8>().ok())
            .collect::<Option<Vec<u8>>>()?;
        match parts.as_slice() {
            [r, g, b] => Some(Self::rgb(*r, *g, *b)),
            _ => None,
        }
    }
}

impl FromStr for Color {
    type Err = Error;

    /// Parse `"255,128,0"`, `"#ff8000"`, `"#f80"` or a color name such as `"orange"`.
    fn from_str(s: &str) -> Result<Self, Error> {
        let s = s.trim();
        let parsed = if let Some(hex) = s.strip_prefix('#') {
            Self::from_hex(hex)
        } else if s.contains(',') {
            Self::from_components(s)
        } else {
            NamedColor::from_str(s).ok().map(|named| named.color())
        };
        parsed.ok_or_else(|| Error::InvalidColorString(s.to_string()))
    }
}

/// CSS color names understood by [`Color::from_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NamedColor {
    AliceBlue,
    AntiqueWhite,
    Aqua,
    Aquamarine,
    Azure,
    Beige,
    Bisque,
    Black,
    BlanchedAlmond,
    Blue,
    BlueViolet,
    Brown,
    Burlywood,
    CadetBlue,
    Chartreuse,
    Chocolate,
    Coral,
    CornflowerBlue,
    Cornsilk,
    Crimson,
    Cyan,
    DarkBlue,
    DarkCyan,
    DarkGoldenrod,
    DarkGray,
    DarkGreen,
    DarkGrey,
    DarkKhaki,
    DarkMagenta,
    DarkOliveGreen,
    DarkOrange,
    DarkOrchid,
    DarkRed,
    DarkSalmon,
    DarkSeaGreen,
    DarkSlateBlue,
    DarkSlateGray,
    DarkSlateGrey,
    DarkTurquoise,
    DarkViolet,
    DeepPink,
    DeepSkyBlue,
    DimGray,
    DimGrey,
    DodgerBlue,
    Firebrick,
    FloralWhite,
    ForestGreen,
    Fuchsia,
    Gainsboro,
    GhostWhite,
    Gold,
    Goldenrod,
    Gray,
    Green,
    GreenYellow,
    Grey,
    Honeydew,
    HotPink,
    IndianRed,
    Indigo,
    Ivory,
    Khaki,
    Lavender,
    LavenderBlush,
    LawnGreen,
    LemonChiffon,
    LightBlue,
    LightCoral,
    LightCyan,
    LightGoldenrodYellow,
    LightGray,
    LightGreen,
    LightGrey,
    LightPink,
    LightSalmon,
    LightSeaGreen,
    LightSkyBlue,
    LightSlateGray,
    LightSlateGrey,
    LightSteelBlue,
    LightYellow,
    Lime,
    LimeGreen,
    Linen,
    Magenta,
    Maroon,
    MediumAquamarine,
    MediumBlue,
    MediumOrchid,
    MediumPurple,
    MediumSeaGreen,
    MediumSlateBlue,
    MediumSpringGreen,
    MediumTurquoise,
    MediumVioletRed,
    MidnightBlue,
    MintCream,
    MistyRose,
    Moccasin,
    NavajoWhite,
    Navy,
    OldLace,
    Olive,
    OliveDrab,
    Orange,
    OrangeRed,
    Orchid,
    PaleGoldenrod,
    PaleGreen,
    PaleTurquoise,
    PaleVioletRed,
    PapayaWhip,
    PeachPuff,
    Peru,
    Pink,
    Plum,
    PowderBlue,
    Purple,
    RebeccaPurple,
    Red,
    RosyBrown,
    RoyalBlue,
    SaddleBrown,
    Salmon,
    SandyBrown,
    SeaGreen,
    Seashell,
    Sienna,
    Silver,
    SkyBlue,
    SlateBlue,
    SlateGray,
    SlateGrey,
    Snow,
    SpringGreen,
    SteelBlue,
    Tan,
    Teal,
    Thistle,
    Tomato,
    Turquoise,
    Violet,
    Wheat,
    White,
    WhiteSmoke,
    Yellow,
    YellowGreen,
}

impl NamedColor {
    pub fn color(&self) -> Color {
        let rgb: u32 = match self {
            NamedColor::AliceBlue => 0xF0F8FF,
            NamedColor::AntiqueWhite => 0xFAEBD7,
            NamedColor::Aqua => 0x00FFFF,
            NamedColor::Aquamarine => 0x7FFFD4,
            NamedColor::Azure => 0xF0FFFF,
            NamedColor::Beige => 0xF5F5DC,
            NamedColor::Bisque => 0xFFE4C4,
            NamedColor::Black => 0x000000,
            NamedColor::BlanchedAlmond => 0xFFEBCD,
            NamedColor::Blue => 0x0000FF,
            NamedColor::BlueViolet => 0x8A2BE2,
            NamedColor::Brown => 0xA52A2A,
            NamedColor::Burlywood => 0xDEB887,
            NamedColor::CadetBlue => 0x5F9EA0,
            NamedColor::Chartreuse => 0x7FFF00,
            NamedColor::Chocolate => 0xD2691E,
            NamedColor::Coral => 0xFF7F50,
            NamedColor::CornflowerBlue => 0x6495ED,
            NamedColor::Cornsilk => 0xFFF8DC,
            NamedColor::Crimson => 0xDC143C,
            NamedColor::Cyan => 0x00FFFF,
            NamedColor::DarkBlue => 0x00008B,
            NamedColor::DarkCyan => 0x008B8B,
            NamedColor::DarkGoldenrod => 0xB8860B,
            NamedColor::DarkGray => 0xA9A9A9,
            NamedColor::DarkGreen => 0x006400,
            NamedColor::DarkGrey => 0xA9A9A9,
            NamedColor::DarkKhaki => 0xBDB76B,
            NamedColor::DarkMagenta => 0x8B008B,
            NamedColor::DarkOliveGreen => 0x556B2F,
            NamedColor::DarkOrange => 0xFF8C00,
            NamedColor::DarkOrchid => 0x9932CC,
            NamedColor::DarkRed => 0x8B0000,
            NamedColor::DarkSalmon => 0xE9967A,
            NamedColor::DarkSeaGreen => 0x8FBC8F,
            NamedColor::DarkSlateBlue => 0x483D8B,
            NamedColor::DarkSlateGray => 0x2F4F4F,
            NamedColor::DarkSlateGrey => 0x2F4F4F,
            NamedColor::DarkTurquoise => 0x00CED1,
            NamedColor::DarkViolet => 0x9400D3,
            NamedColor::DeepPink => 0xFF1493,
            NamedColor::DeepSkyBlue => 0x00BFFF,
            NamedColor::DimGray => 0x696969,
            NamedColor::DimGrey => 0x696969,
            NamedColor::DodgerBlue => 0x1E90FF,
            NamedColor::Firebrick => 0xB22222,
            NamedColor::FloralWhite => 0xFFFAF0,
            NamedColor::ForestGreen => 0x228B22,
            NamedColor::Fuchsia => 0xFF00FF,
            NamedColor::Gainsboro => 0xDCDCDC,
            NamedColor::GhostWhite => 0xF8F8FF,
            NamedColor::Gold => 0xFFD700,
            NamedColor::Goldenrod => 0xDAA520,
            NamedColor::Gray => 0x808080,
            NamedColor::Green => 0x008000,
            NamedColor::GreenYellow => 0xADFF2F,
            NamedColor::Grey => 0x808080,
            NamedColor::Honeydew => 0xF0FFF0,
            NamedColor::HotPink => 0xFF69B4,
            NamedColor::IndianRed => 0xCD5C5C,
            NamedColor::Indigo => 0x4B0082,
            NamedColor::Ivory => 0xFFFFF0,
            NamedColor::Khaki => 0xF0E68C,
            NamedColor::Lavender => 0xE6E6FA,
            NamedColor::LavenderBlush => 0xFFF0F5,
            NamedColor::LawnGreen => 0x7CFC00,
            NamedColor::LemonChiffon => 0xFFFACD,
            NamedColor::LightBlue => 0xADD8E6,
            NamedColor::LightCoral => 0xF08080,
            NamedColor::LightCyan => 0xE0FFFF,
            NamedColor::LightGoldenrodYellow => 0xFAFAD2,
            NamedColor::LightGray => 0xD3D3D3,
            NamedColor::LightGreen => 0x90EE90,
            NamedColor::LightGrey => 0xD3D3D3,
            NamedColor::LightPink => 0xFFB6C1,
            NamedColor::LightSalmon => 0xFFA07A,
            NamedColor::LightSeaGreen => 0x20B2AA,
            NamedColor::LightSkyBlue => 0x87CEFA,
            NamedColor::LightSlateGray => 0x778899,
            NamedColor::LightSlateGrey => 0x778899,
            NamedColor::LightSteelBlue => 0xB0C4DE,
            NamedColor::LightYellow => 0xFFFFE0,
            NamedColor::Lime => 0x00FF00,
            NamedColor::LimeGreen => 0x32CD32,
            NamedColor::Linen => 0xFAF0E6,
            NamedColor::Magenta => 0xFF00FF,
            NamedColor::Maroon => 0x800000,
            NamedColor::MediumAquamarine => 0x66CDAA,
            NamedColor::MediumBlue => 0x0000CD,
            NamedColor::MediumOrchid => 0xBA55D3,
            NamedColor::MediumPurple => 0x9370DB,
            NamedColor::MediumSeaGreen => 0x3CB371,
            NamedColor::MediumSlateBlue => 0x7B68EE,
            NamedColor::MediumSpringGreen => 0x00FA9A,
            NamedColor::MediumTurquoise => 0x48D1CC,
            NamedColor::MediumVioletRed => 0xC71585,
            NamedColor::MidnightBlue => 0x191970,
            NamedColor::MintCream => 0xF5FFFA,
            NamedColor::MistyRose => 0xFFE4E1,
            NamedColor::Moccasin => 0xFFE4B5,
            NamedColor::NavajoWhite => 0xFFDEAD,
            NamedColor::Navy => 0x000080,
            NamedColor::OldLace => 0xFDF5E6,
            NamedColor::Olive => 0x808000,
            NamedColor::OliveDrab => 0x6B8E23,
            NamedColor::Orange => 0xFFA500,
            NamedColor::OrangeRed => 0xFF4500,
            NamedColor::Orchid => 0xDA70D6,
            NamedColor::PaleGoldenrod => 0xEEE8AA,
            NamedColor::PaleGreen => 0x98FB98,
            NamedColor::PaleTurquoise => 0xAFEEEE,
            NamedColor::PaleVioletRed => 0xDB7093,
            NamedColor::PapayaWhip => 0xFFEFD5,
            NamedColor::PeachPuff => 0xFFDAB9,
            NamedColor::Peru => 0xCD853F,
            NamedColor::Pink => 0xFFC0CB,
            NamedColor::Plum => 0xDDA0DD,
            NamedColor::PowderBlue => 0xB0E0E6,
            NamedColor::Purple => 0x800080,
            NamedColor::RebeccaPurple => 0x663399,
            NamedColor::Red => 0xFF0000,
            NamedColor::RosyBrown => 0xBC8F8F,
            NamedColor::RoyalBlue => 0x4169E1,
            NamedColor::SaddleBrown => 0x8B4513,
            NamedColor::Salmon => 0xFA8072,
            NamedColor::SandyBrown => 0xF4A460,
            NamedColor::SeaGreen => 0x2E8B57,
            NamedColor::Seashell => 0xFFF5EE,
            NamedColor::Sienna => 0xA0522D,
            NamedColor::Silver => 0xC0C0C0,
            NamedColor::SkyBlue => 0x87CEEB,
            NamedColor::SlateBlue => 0x6A5ACD,
            NamedColor::SlateGray => 0x708090,
            NamedColor::SlateGrey => 0x708090,
            NamedColor::Snow => 0xFFFAFA,
            NamedColor::SpringGreen => 0x00FF7F,
            NamedColor::SteelBlue => 0x4682B4,
            NamedColor::Tan => 0xD2B48C,
            NamedColor::Teal => 0x008080,
            NamedColor::Thistle => 0xD8BFD8,
            NamedColor::Tomato => 0xFF6347,
            NamedColor::Turquoise => 0x40E0D0,
            NamedColor::Violet => 0xEE82EE,
            NamedColor::Wheat => 0xF5DEB3,
            NamedColor::White => 0xFFFFFF,
            NamedColor::WhiteSmoke => 0xF5F5F5,
            NamedColor::Yellow => 0xFFFF00,
            NamedColor::YellowGreen => 0x9ACD32,
        };
        Color::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// All known names, for help texts.
    pub fn names() -> Vec<String> {
        NamedColor::iter().map(|c| c.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        assert_eq!("255,0,128".parse::<Color>().unwrap(), Color::rgb(255, 0, 128));
        assert_eq!(" 1, 2 ,3 ".parse::<Color>().unwrap(), Color::rgb(1, 2, 3));
        assert_eq!("#FF0080".parse::<Color>().unwrap(), Color::rgb(255, 0, 128));
        assert_eq!("#f80".parse::<Color>().unwrap(), Color::rgb(255, 136, 0));
        assert_eq!("Red".parse::<Color>().unwrap(), Color::rgb(255, 0, 0));
        assert_eq!("orange".parse::<Color>().unwrap(), Color::rgb(255, 165, 0));
    }

    #[test]
    fn test_css_names() {
        assert_eq!(NamedColor::iter().count(), 148);
        assert_eq!("aqua".parse::<Color>().unwrap(), Color::rgb(0, 255, 255));
        assert_eq!("Fuchsia".parse::<Color>().unwrap(), Color::rgb(255, 0, 255));
        assert_eq!("coral".parse::<Color>().unwrap(), Color::rgb(255, 127, 80));
        assert_eq!("LightGoldenrodYellow".parse::<Color>().unwrap(), Color::rgb(250, 250, 210));
        assert_eq!("grey".parse::<Color>().unwrap(), "gray".parse::<Color>().unwrap());
        assert_eq!("rebeccapurple".parse::<Color>().unwrap(), Color::rgb(102, 51, 153));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "256,0,0", "1,2", "1,2,3,4", "#12345", "#gg0000", "#+f0", "mauve-ish"] {
            assert_eq!(
                bad.parse::<Color>().unwrap_err(),
                Error::InvalidColorString(bad.trim().to_string()),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_names_round_trip_through_parse() {
        for name in NamedColor::names() {
            assert!(name.parse::<Color>().is_ok(), "{name}");
        }
    }
}

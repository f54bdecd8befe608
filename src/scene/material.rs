use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("unsupported color syntax: {0:?}")]
    Syntax(String),
    #[error("color channel out of range in {0:?}")]
    Channel(String),
}

/// An sRGB color with 8-bit channels, as edited in the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_array(rgb: [u8; 3]) -> Self {
        Self::from_rgb(rgb[0], rgb[1], rgb[2])
    }

    /// Linear-light channels for an sRGB render target.
    pub fn to_linear(self) -> [f32; 3] {
        [
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
        ]
    }
}

fn srgb_to_linear(channel: u8) -> f32 {
    let c = channel as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if let Some(hex) = trimmed.strip_prefix('#') {
            if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ColorParseError::Syntax(s.to_string()));
            }
            let channel = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16)
                    .map_err(|_| ColorParseError::Syntax(s.to_string()))
            };
            return Ok(Color::from_rgb(channel(0)?, channel(2)?, channel(4)?));
        }

        let inner = trimmed
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| ColorParseError::Syntax(s.to_string()))?;

        let channels: Vec<&str> = inner.split(',').map(str::trim).collect();
        if channels.len() != 3 {
            return Err(ColorParseError::Syntax(s.to_string()));
        }

        let mut rgb = [0u8; 3];
        for (slot, text) in rgb.iter_mut().zip(&channels) {
            let value: i64 = text
                .parse()
                .map_err(|_| ColorParseError::Syntax(s.to_string()))?;
            *slot = u8::try_from(value).map_err(|_| ColorParseError::Channel(s.to_string()))?;
        }

        Ok(Color::from_array(rgb))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Unlit flat-colored material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Color,
    pub wireframe: bool,
    pub transparent: bool,
    pub opacity: f32,
}

impl Material {
    pub fn solid(color: Color) -> Self {
        Self {
            color,
            wireframe: false,
            transparent: false,
            opacity: 1.0,
        }
    }

    pub fn wireframe(color: Color) -> Self {
        Self {
            color,
            wireframe: true,
            transparent: true,
            opacity: 1.0,
        }
    }

    pub fn rgba(&self) -> [f32; 4] {
        let [r, g, b] = self.color.to_linear();
        let alpha = if self.transparent { self.opacity } else { 1.0 };
        [r, g, b, alpha]
    }
}

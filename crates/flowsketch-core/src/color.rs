//! Color handling for node style overrides
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. Style overrides keep the CSS text the author wrote,
//! after checking that it parses.

use std::{fmt, str::FromStr};

use color::DynamicColor;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// A validated CSS color.
///
/// The original CSS text is preserved so that a renderer receives exactly
/// what the diagram author wrote (`#f9f`, `red`, `rgb(0, 0, 0)`...).
#[derive(Clone, Debug)]
pub struct Color {
    source: String,
    color: DynamicColor,
}

impl Color {
    /// Create a new `Color` from a CSS color string.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowsketch_core::color::Color;
    ///
    /// let pink = Color::new("#f9f").unwrap();
    /// assert_eq!(pink.as_str(), "#f9f");
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        let trimmed = color_str.trim();
        match DynamicColor::from_str(trimmed) {
            Ok(color) => Ok(Self {
                source: trimmed.to_string(),
                color,
            }),
            Err(err) => Err(format!("invalid color `{trimmed}`: {err}")),
        }
    }

    /// Returns the CSS text this color was created from
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the alpha (transparency) component of this color.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        self.color == other.color
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Color::new(&raw).map_err(de::Error::custom)
    }
}

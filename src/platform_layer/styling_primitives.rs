/*
 * This module provides platform-agnostic styling primitives used by both
 * the info bar core and the platform layer. These definitions are free
 * of any Win32 or OS-specific details so they can be compiled on any
 * target. They describe colors and fonts that the configuration and the
 * theme collaborator hand to the native controls.
 */

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/*
 * Defines the weight (e.g., boldness) of a font.
 */
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/*
 * Describes the properties of a font in a platform-agnostic way. All fields
 * are optional so a configuration file can override only specific aspects
 * of the status font. `size` is in points and is converted to device pixels
 * with the current DPI scale whenever the font is (re)created.
 */
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontDescription {
    pub name: Option<String>,
    pub size: Option<i32>,
    pub weight: Option<FontWeight>,
}

impl FontDescription {
    /// The font used by the info bar when nothing else is configured.
    pub fn status_default() -> Self {
        Self {
            name: Some("Segoe UI".to_string()),
            size: Some(9),
            weight: Some(FontWeight::Normal),
        }
    }
}

/*
 * Colors for a themed tooltip window. Plain tooltips use the system colors
 * and never consult this.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooltipPalette {
    pub background: Color,
    pub text: Color,
}

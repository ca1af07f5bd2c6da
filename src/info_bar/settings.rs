/*
 * Tunable settings of the info bar. Every field has a default matching the
 * stock player look, and `#[serde(default)]` lets a configuration file
 * override any subset of them.
 */

use super::layout::LayoutMetrics;
use crate::platform_layer::dpi::DpiScale;
use crate::platform_layer::styling_primitives::FontDescription;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    /// Maximum tip width at 96 DPI; longer text wraps.
    pub max_width: i32,
    /// How long a tip stays visible.
    pub auto_pop_ms: u32,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            max_width: 500,
            auto_pop_ms: 10_000,
        }
    }
}

impl TooltipConfig {
    pub fn scaled_max_width(&self, dpi: DpiScale) -> i32 {
        dpi.scale_x(self.max_width)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoBarConfig {
    pub metrics: LayoutMetrics,
    pub tooltip: TooltipConfig,
    pub font: FontDescription,
}

impl Default for InfoBarConfig {
    fn default() -> Self {
        Self {
            metrics: LayoutMetrics::default(),
            tooltip: TooltipConfig::default(),
            font: FontDescription::status_default(),
        }
    }
}

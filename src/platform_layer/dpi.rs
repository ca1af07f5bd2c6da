/*
 * Display-scale helper. All fixed pixel constants of the info bar (row
 * height, padding, minimum label column width, tooltip width) are authored
 * at 96 DPI and scaled through `DpiScale` before use. Scaling follows the
 * rounding of Win32 `MulDiv` so layouts match what native code computes for
 * the same DPI.
 */

/// The reference DPI at which all pixel constants are authored.
pub const BASE_DPI: u32 = 96;

const POINTS_PER_INCH: i32 = 72;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DpiScale {
    pub dpi_x: u32,
    pub dpi_y: u32,
}

impl Default for DpiScale {
    fn default() -> Self {
        Self {
            dpi_x: BASE_DPI,
            dpi_y: BASE_DPI,
        }
    }
}

impl DpiScale {
    pub fn new(dpi_x: u32, dpi_y: u32) -> Self {
        Self { dpi_x, dpi_y }
    }

    /// Same DPI on both axes, which is what per-monitor DPI notifications report.
    pub fn uniform(dpi: u32) -> Self {
        Self::new(dpi, dpi)
    }

    pub fn scale_x(&self, value: i32) -> i32 {
        mul_div(value, self.dpi_x as i32, BASE_DPI as i32)
    }

    pub fn scale_y(&self, value: i32) -> i32 {
        mul_div(value, self.dpi_y as i32, BASE_DPI as i32)
    }

    /// Logical font height (negative, i.e. character height) for a point size.
    pub fn font_height_px(&self, points: i32) -> i32 {
        -mul_div(points, self.dpi_y as i32, POINTS_PER_INCH)
    }
}

/*
 * Portable equivalent of Win32 `MulDiv`: computes `number * numerator /
 * denominator` with a 64-bit intermediate and rounds half away from zero.
 * Returns -1 when the denominator is zero or the result does not fit in an
 * `i32`, which is exactly what the native function reports.
 */
pub(crate) fn mul_div(number: i32, numerator: i32, denominator: i32) -> i32 {
    if denominator == 0 {
        return -1;
    }
    let product = number as i64 * numerator as i64;
    let divisor = denominator as i64;
    let magnitude = (product.abs() + divisor.abs() / 2) / divisor.abs();
    let negative = (product < 0) != (divisor < 0);
    let result = if negative { -magnitude } else { magnitude };
    i32::try_from(result).unwrap_or(-1)
}

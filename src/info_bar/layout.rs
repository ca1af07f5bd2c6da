/*
 * Pure layout calculation for the info bar's rows. Returns the rectangle of
 * every label and value control without calling any native APIs, so the
 * arithmetic can be verified directly. `InfoBar::relayout` feeds it the
 * measured label widths and applies the result.
 *
 * All metrics are authored at 96 DPI and scaled with the current `DpiScale`,
 * except the 1 px edge inset which stays a single device pixel.
 */

use crate::platform_layer::dpi::DpiScale;
use crate::platform_layer::types::Rect;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    /// Height of one label/value row.
    pub row_height: i32,
    /// Space above the first row and below the last one.
    pub vertical_padding: i32,
    /// The label column is never narrower than this.
    pub min_label_width: i32,
    /// Gap subtracted from the label and added before the value column.
    pub column_gap: i32,
    /// Unscaled inset of the controls from the bar's left and right edges.
    pub edge_inset: i32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            row_height: 17,
            vertical_padding: 2,
            min_label_width: 100,
            column_gap: 10,
            edge_inset: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowPlacement {
    pub label: Rect,
    pub value: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinesLayout {
    /// Shared width of the label column, before the gap is taken off.
    pub column_width: i32,
    pub row_height: i32,
    pub rows: Vec<RowPlacement>,
}

/*
 * Computes the placement of every row.
 *
 * `label_widths` holds one entry per line in display order; `None` marks a
 * label whose text extent could not be measured, which then does not widen
 * the column. The value column always extends to the right edge of the
 * parent, less the edge inset.
 */
pub fn calculate_lines_layout(
    parent_width: i32,
    label_widths: &[Option<i32>],
    metrics: &LayoutMetrics,
    dpi: DpiScale,
) -> LinesLayout {
    let column_width = label_widths
        .iter()
        .flatten()
        .copied()
        .fold(dpi.scale_x(metrics.min_label_width), i32::max);
    let row_height = dpi.scale_y(metrics.row_height);
    let gap = dpi.scale_x(metrics.column_gap);
    let inset = metrics.edge_inset;

    let mut y = dpi.scale_y(metrics.vertical_padding);
    let mut rows = Vec::with_capacity(label_widths.len());
    for _ in label_widths {
        rows.push(RowPlacement {
            label: Rect::from_origin_size(inset, y, column_width - gap, row_height),
            value: Rect::from_origin_size(
                column_width + gap,
                y,
                parent_width - column_width - gap - inset,
                row_height,
            ),
        });
        y += row_height;
    }

    LinesLayout {
        column_width,
        row_height,
        rows,
    }
}

/// Height that exactly fits `line_count` rows, or zero for an empty bar.
pub fn fixed_bar_height(line_count: usize, metrics: &LayoutMetrics, dpi: DpiScale) -> i32 {
    if line_count == 0 {
        return 0;
    }
    line_count as i32 * dpi.scale_y(metrics.row_height)
        + dpi.scale_y(metrics.vertical_padding) * 2
}

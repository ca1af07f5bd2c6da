/*
 * Background planning for the info bar. On erase the bar must not paint over
 * its child controls (that flickers), and it draws a one pixel border whose
 * extent depends on whether the bar is the bottom-most bar of the frame and
 * whether the frame is full screen. The plan is computed here without any
 * native calls; the platform layer executes it against a device context.
 */

use crate::platform_layer::styling_primitives::Color;
use crate::platform_layer::types::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderFill {
    /// Themed mode: a flat fill with the theme's border color.
    Solid(Color),
    /// Unthemed mode: a 3D bevel, system shadow color on the top and left
    /// edges and system highlight color on the bottom and right edges.
    SystemBevel,
}

// Frame state that changes how far the border extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BarPlacement {
    pub is_last_bar: bool,
    pub fullscreen: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundPlan {
    /// Child control rectangles clipped out of the erase region.
    pub exclusions: Vec<Rect>,
    pub border_rect: Rect,
    pub border: BorderFill,
    /// Area inside the border, filled with `interior_color`.
    pub interior: Rect,
    pub interior_color: Color,
}

/*
 * Builds the erase plan for a bar with client rectangle `client`.
 *
 * A bar that is not the last one, or any bar while full screen, extends its
 * border one pixel below the client area so the bottom edge is hidden.
 * Full screen also pushes the left and right edges out of view.
 */
pub fn plan_background(
    client: Rect,
    children: &[Rect],
    placement: BarPlacement,
    border: BorderFill,
) -> BackgroundPlan {
    let mut border_rect = client;
    if !placement.is_last_bar || placement.fullscreen {
        border_rect = border_rect.inflate(0, 0, 0, 1);
    }
    if placement.fullscreen {
        border_rect = border_rect.inflate(1, 0, 1, 0);
    }

    BackgroundPlan {
        exclusions: children.to_vec(),
        border_rect,
        border,
        interior: border_rect.deflate(1, 1),
        interior_color: Color::BLACK,
    }
}

/*
 * Splits a bevel around `rect` into its one pixel edges: the top and left
 * edges take the shadow color, the right and bottom edges the highlight
 * color. The corners at top-right and bottom-left belong to the highlight
 * edges.
 */
pub fn bevel_edges(rect: Rect) -> ([Rect; 2], [Rect; 2]) {
    let Rect {
        left,
        top,
        right,
        bottom,
    } = rect;
    let shadow = [
        Rect::new(left, top, right - 1, top + 1),
        Rect::new(left, top, left + 1, bottom - 1),
    ];
    let highlight = [
        Rect::new(right - 1, top, right, bottom),
        Rect::new(left, bottom - 1, right, bottom),
    ];
    (shadow, highlight)
}

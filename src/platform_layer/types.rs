/*
 * This module defines the core data types used between the info bar core
 * and the platform layer. It includes geometry primitives, opaque handles
 * for child controls, the portable copy of a raw input message used for
 * tooltip relaying, the notifications published on the display event bus,
 * and the traits through which the info bar reaches its collaborators:
 *
 * - `InfoBarPlatform`: native child controls and the bar window itself.
 * - `TooltipOperations`: the tooltip manager (plain or themed).
 * - `FrameOperations`: the owning player frame.
 * - `ThemeOperations`: the theming subsystem.
 *
 * None of these types carry Win32 details so the core can be compiled and
 * tested on every target.
 */

use super::dpi::DpiScale;
use super::error::Result as PlatformResult;
use super::styling_primitives::{Color, TooltipPalette};

// --- Geometry ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

// A rectangle in the same convention as a Win32 `RECT`: `right` and `bottom`
// are exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Builds a rectangle from an origin and a size, like `MoveWindow` arguments.
    pub const fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Grows each edge outward by the given amounts (`InflateRect` with four values).
    pub const fn inflate(self, left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(
            self.left - left,
            self.top - top,
            self.right + right,
            self.bottom + bottom,
        )
    }

    pub const fn deflate(self, dx: i32, dy: i32) -> Self {
        self.inflate(-dx, -dy, -dx, -dy)
    }

    pub const fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }
}

// --- Controls ---

// An opaque identifier for a child control owned by the info bar.
//
// Issued by the `InfoBarPlatform` when it creates a control. The core never
// interprets the value; the platform maps it to its native handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlHandle(pub u64);

/*
 * The two kinds of child control in a line. Labels are drawn right-aligned
 * without ellipsis; values are left-aligned, end in an ellipsis when
 * truncated, and notify so the tooltip can show their full text.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRole {
    Label,
    Value,
}

// Which tooltip manager implementation to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipStyle {
    Plain,
    Themed,
}

/*
 * Portable copy of a raw input message as delivered by the native message
 * loop. The tooltip manager needs the original message to decide when to
 * show or hide a tip, so every field of the native message is kept.
 * `window` is the raw native window handle the message targets.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayedMessage {
    pub window: isize,
    pub message: u32,
    pub wparam: usize,
    pub lparam: isize,
    pub time: u32,
    pub point: Point,
}

// --- Notifications ---

/*
 * Notifications published on the process-wide display event bus. The frame
 * publishes `DpiChanged` once `FrameOperations::dpi` reports the new scale,
 * and resizes the bar afterwards so it is laid out with the rescaled fonts.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayEvent {
    DpiChanged,
}

// --- Collaborator traits ---

/*
 * Native operations the info bar needs from its host toolkit. One instance
 * belongs to exactly one bar. All calls happen on the UI thread.
 */
pub trait InfoBarPlatform {
    /// Attaches the bar window as a child panel of its parent.
    fn attach_bar(&mut self) -> PlatformResult<()>;

    /// Creates a child control of the bar showing `text`.
    fn create_text_control(&mut self, role: ControlRole, text: &str)
    -> PlatformResult<ControlHandle>;

    /// Destroys a child control. Unknown handles are ignored.
    fn destroy_control(&mut self, control: ControlHandle);

    fn set_control_text(&mut self, control: ControlHandle, text: &str) -> PlatformResult<()>;

    /// Width of `text` rendered with the control's current font, if a
    /// device context could be obtained.
    fn measure_text_width(&self, control: ControlHandle, text: &str) -> Option<i32>;

    fn move_control(&mut self, control: ControlHandle, rect: Rect);

    /// The control's rectangle in bar client coordinates.
    fn control_rect(&self, control: ControlHandle) -> Option<Rect>;

    /// Recreates the control's font for a new display scale.
    fn scale_control_font(&mut self, control: ControlHandle, dpi: DpiScale);

    /// Client rectangle of the window the bar is docked in.
    fn parent_client_rect(&self) -> Option<Rect>;

    fn bar_client_rect(&self) -> Rect;

    fn client_to_screen(&self, point: Point) -> Point;

    /// Requests a repaint through the normal paint queue.
    fn invalidate(&mut self);

    /// Invalidates and repaints immediately, bypassing the message queue.
    fn repaint_now(&mut self);

    fn create_tooltip(
        &mut self,
        style: TooltipStyle,
        settings: TooltipSettings,
    ) -> PlatformResult<Box<dyn TooltipOperations>>;
}

/*
 * Settings handed to a tooltip manager when it is created. Values are
 * already scaled to the current display.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooltipSettings {
    pub max_width_px: i32,
    pub auto_pop_ms: u32,
    pub palette: Option<TooltipPalette>,
}

/*
 * A tooltip manager. Registers the full text of each value control so it
 * can be shown on hover even when the control truncates it on screen.
 */
pub trait TooltipOperations {
    fn style(&self) -> TooltipStyle;

    fn add_tool(&mut self, control: ControlHandle, text: &str) -> PlatformResult<()>;

    fn update_tip_text(&mut self, control: ControlHandle, text: &str);

    fn del_tool(&mut self, control: ControlHandle);

    fn relay_event(&mut self, message: &RelayedMessage);

    fn tip_text(&self, control: ControlHandle) -> Option<&str>;

    fn tool_count(&self) -> usize;
}

// The player frame the bar is docked in. Must outlive the bar.
pub trait FrameOperations {
    fn is_fullscreen(&self) -> bool;

    /// Whether this bar is the bottom-most visible bar of the frame.
    fn is_last_bar(&self) -> bool;

    fn dpi(&self) -> DpiScale;

    /// Starts moving the frame window as if its caption had been grabbed
    /// at `screen_point`.
    fn begin_caption_drag(&self, screen_point: Point);
}

pub trait ThemeOperations {
    fn is_theme_active(&self) -> bool;

    /// Fill color used for the bar border in themed mode.
    fn no_border_color(&self) -> Color;

    fn tooltip_palette(&self) -> TooltipPalette;
}

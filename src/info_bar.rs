/*
 * This module implements `InfoBar`, the dockable panel of the player window
 * that shows label/value lines such as "Resolution: 1920x1080".
 *
 * The bar owns an ordered collection of lines, each rendered as a label
 * control and a value control, plus a tooltip manager that shows the full
 * value text on hover. It reaches native controls through `InfoBarPlatform`,
 * the player frame through `FrameOperations`, and the theme through
 * `ThemeOperations`, so all of its behavior runs and is tested without a
 * native toolkit. Layout and background arithmetic live in the `layout` and
 * `background` submodules as pure functions.
 *
 * Unit tests with mock collaborators are in `info_bar_tests.rs`.
 */
pub mod background;
pub mod layout;
pub mod settings;

#[cfg(test)]
mod info_bar_tests;

pub use background::{BackgroundPlan, BarPlacement, BorderFill, bevel_edges, plan_background};
pub use layout::{LayoutMetrics, LinesLayout, RowPlacement, calculate_lines_layout, fixed_bar_height};
pub use settings::{InfoBarConfig, TooltipConfig};

use crate::platform_layer::{
    error::{PlatformError, Result as PlatformResult},
    event_bus::{EventBus, Subscription},
    types::{
        ControlHandle, ControlRole, DisplayEvent, FrameOperations, InfoBarPlatform, Point,
        RelayedMessage, Size, ThemeOperations, TooltipOperations, TooltipSettings, TooltipStyle,
    },
};

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug)]
struct Line {
    label: String,
    value: String,
    label_control: ControlHandle,
    value_control: ControlHandle,
}

// Duplicate labels are not rejected; every lookup resolves to the first match.
fn find_line(lines: &[Line], label: &str) -> Option<usize> {
    lines.iter().position(|line| line.label == label)
}

fn not_created_error() -> PlatformError {
    PlatformError::InvalidHandle("InfoBar has not been created".to_string())
}

pub struct InfoBar<P: InfoBarPlatform> {
    platform: P,
    frame: Rc<dyn FrameOperations>,
    theme: Rc<dyn ThemeOperations>,
    config: InfoBarConfig,
    lines: Vec<Line>,
    tooltip: Option<Box<dyn TooltipOperations>>,
    layout: LinesLayout,
    dpi_subscription: Option<Subscription<DisplayEvent>>,
}

impl<P: InfoBarPlatform + 'static> InfoBar<P> {
    /*
     * Constructs a bar for `frame` and subscribes it to DPI change
     * notifications on `bus`. The subscription is owned by the bar and is
     * released when the bar is dropped. The bar has no native window until
     * `create` is called.
     */
    pub fn new(
        platform: P,
        frame: Rc<dyn FrameOperations>,
        theme: Rc<dyn ThemeOperations>,
        bus: &EventBus<DisplayEvent>,
        config: InfoBarConfig,
    ) -> Rc<RefCell<Self>> {
        let bar = Rc::new(RefCell::new(Self {
            platform,
            frame,
            theme,
            config,
            lines: Vec::new(),
            tooltip: None,
            layout: LinesLayout::default(),
            dpi_subscription: None,
        }));

        let weak_bar = Rc::downgrade(&bar);
        let subscription = bus.subscribe(&[DisplayEvent::DpiChanged], move |event| {
            let Some(bar) = weak_bar.upgrade() else {
                return;
            };
            let borrowed = bar.try_borrow_mut();
            if let Ok(mut bar) = borrowed {
                bar.on_display_event(event);
            } else {
                log::warn!("InfoBar: Dropped {event:?}; the bar is busy in another call");
            }
        });
        bar.borrow_mut().dpi_subscription = Some(subscription);
        log::debug!("InfoBar: Constructed and subscribed to DPI changes");
        bar
    }
}

impl<P: InfoBarPlatform> InfoBar<P> {
    /*
     * Attaches the bar to its parent and creates the tooltip manager. The
     * themed tooltip is chosen if a theme is active at this moment; the
     * choice does not change for the lifetime of the bar.
     */
    pub fn create(&mut self) -> PlatformResult<()> {
        if self.tooltip.is_some() {
            log::warn!("InfoBar: create called on an already created bar; ignoring");
            return Ok(());
        }
        self.platform.attach_bar()?;

        let style = if self.theme.is_theme_active() {
            TooltipStyle::Themed
        } else {
            TooltipStyle::Plain
        };
        let dpi = self.frame.dpi();
        let settings = TooltipSettings {
            max_width_px: self.config.tooltip.scaled_max_width(dpi),
            auto_pop_ms: self.config.tooltip.auto_pop_ms,
            palette: (style == TooltipStyle::Themed).then(|| self.theme.tooltip_palette()),
        };
        self.tooltip = Some(self.platform.create_tooltip(style, settings)?);
        log::debug!("InfoBar: Created with {style:?} tooltip, {settings:?}");
        Ok(())
    }

    pub fn is_created(&self) -> bool {
        self.tooltip.is_some()
    }

    /*
     * Sets the value shown for `label`.
     *
     * The value is trimmed; an empty value removes the line and the result
     * of that removal is returned. An existing line is updated in place
     * (text and tooltip only when the value actually differs) and `false` is
     * returned because the bar's structure did not change. Otherwise a new
     * line is appended, the layout is recomputed and `true` is returned so
     * the caller can re-dock the bar.
     *
     * If a control cannot be created, everything created by this call is
     * destroyed again and the error is returned.
     */
    pub fn set_line(&mut self, label: &str, value: &str) -> PlatformResult<bool> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(self.remove_line(label));
        }

        let Some(tooltip) = self.tooltip.as_mut() else {
            log::warn!("InfoBar: set_line('{label}') before the bar was created");
            return Err(not_created_error());
        };

        if let Some(index) = find_line(&self.lines, label) {
            let line = &mut self.lines[index];
            if line.value != value {
                self.platform.set_control_text(line.value_control, value)?;
                line.value = value.to_string();
                tooltip.update_tip_text(line.value_control, value);
                log::trace!("InfoBar: Updated line '{label}' to '{value}'");
            }
            return Ok(false);
        }

        let label_control = self
            .platform
            .create_text_control(ControlRole::Label, label)?;
        let value_control = match self.platform.create_text_control(ControlRole::Value, value) {
            Ok(control) => control,
            Err(err) => {
                log::error!("InfoBar: Failed to create value control for '{label}': {err}");
                self.platform.destroy_control(label_control);
                return Err(err);
            }
        };
        if let Err(err) = tooltip.add_tool(value_control, value) {
            log::error!("InfoBar: Failed to register tooltip for '{label}': {err}");
            self.platform.destroy_control(value_control);
            self.platform.destroy_control(label_control);
            return Err(err);
        }

        self.lines.push(Line {
            label: label.to_string(),
            value: value.to_string(),
            label_control,
            value_control,
        });
        log::debug!(
            "InfoBar: Added line '{label}' = '{value}' ({} line(s))",
            self.lines.len()
        );
        self.relayout();
        Ok(true)
    }

    /// The value currently shown for `label`, or an empty string.
    pub fn get_line(&self, label: &str) -> &str {
        find_line(&self.lines, label)
            .map(|index| self.lines[index].value.as_str())
            .unwrap_or("")
    }

    pub fn remove_line(&mut self, label: &str) -> bool {
        let Some(index) = find_line(&self.lines, label) else {
            return false;
        };
        let line = self.lines.remove(index);
        if let Some(tooltip) = self.tooltip.as_mut() {
            tooltip.del_tool(line.value_control);
        }
        self.platform.destroy_control(line.label_control);
        self.platform.destroy_control(line.value_control);
        log::debug!(
            "InfoBar: Removed line '{label}' ({} line(s) left)",
            self.lines.len()
        );
        self.relayout();
        true
    }

    /// Removes every line and repaints immediately, bypassing the paint queue.
    pub fn remove_all_lines(&mut self) {
        let removed = self.lines.len();
        for line in self.lines.drain(..) {
            if let Some(tooltip) = self.tooltip.as_mut() {
                tooltip.del_tool(line.value_control);
            }
            self.platform.destroy_control(line.label_control);
            self.platform.destroy_control(line.value_control);
        }
        self.layout.rows.clear();
        log::debug!("InfoBar: Removed all {removed} line(s)");
        self.platform.repaint_now();
    }

    /*
     * Recomputes the position of every control from the measured label
     * widths and the parent's current width, then moves the controls.
     * Calling it again with unchanged inputs yields identical positions.
     */
    pub fn relayout(&mut self) {
        let Some(parent) = self.platform.parent_client_rect() else {
            log::error!("InfoBar: Relayout skipped; parent window geometry is unavailable");
            return;
        };

        let label_widths: Vec<Option<i32>> = self
            .lines
            .iter()
            .map(|line| {
                self.platform
                    .measure_text_width(line.label_control, &line.label)
            })
            .collect();
        let layout = calculate_lines_layout(
            parent.width(),
            &label_widths,
            &self.config.metrics,
            self.frame.dpi(),
        );

        for (line, row) in self.lines.iter().zip(&layout.rows) {
            self.platform.move_control(line.label_control, row.label);
            self.platform.move_control(line.value_control, row.value);
        }
        log::trace!(
            "InfoBar: Relayout of {} row(s), column width {}",
            layout.rows.len(),
            layout.column_width
        );
        self.layout = layout;
    }

    /// Size the frame's docking logic should reserve: the parent's width and
    /// exactly enough height for the current lines.
    pub fn fixed_layout_size(&self) -> Size {
        let width = self
            .platform
            .parent_client_rect()
            .map(|r| r.width())
            .unwrap_or(0);
        Size {
            width,
            height: fixed_bar_height(self.lines.len(), &self.config.metrics, self.frame.dpi()),
        }
    }

    /*
     * Rescales every label font, then every value font. Positions are not
     * recomputed here; the frame resizes the bar afterwards, which relays
     * it out with the new measurements.
     */
    pub fn on_display_event(&mut self, event: DisplayEvent) {
        match event {
            DisplayEvent::DpiChanged => {
                let dpi = self.frame.dpi();
                log::debug!("InfoBar: Rescaling fonts of {} line(s) to {dpi:?}", self.lines.len());
                for line in &self.lines {
                    self.platform.scale_control_font(line.label_control, dpi);
                }
                for line in &self.lines {
                    self.platform.scale_control_font(line.value_control, dpi);
                }
            }
        }
    }

    pub fn on_size(&mut self) {
        self.relayout();
        self.platform.invalidate();
    }

    /*
     * Plans the erase of the bar background: child controls are excluded,
     * and the border is themed or beveled depending on the active theme.
     */
    pub fn background_plan(&self) -> BackgroundPlan {
        let children: Vec<_> = self
            .lines
            .iter()
            .flat_map(|line| [line.label_control, line.value_control])
            .filter_map(|control| self.platform.control_rect(control))
            .collect();
        let placement = BarPlacement {
            is_last_bar: self.frame.is_last_bar(),
            fullscreen: self.frame.is_fullscreen(),
        };
        let border = if self.theme.is_theme_active() {
            BorderFill::Solid(self.theme.no_border_color())
        } else {
            BorderFill::SystemBevel
        };
        plan_background(self.platform.bar_client_rect(), &children, placement, border)
    }

    /*
     * Primary button pressed on the bar itself. Outside full screen the
     * frame is asked to start a window move, so the bar behaves like a
     * title bar. Returns whether the request was forwarded.
     */
    pub fn on_primary_button_down(&self, client_point: Point) -> bool {
        if self.frame.is_fullscreen() {
            return false;
        }
        let screen_point = self.platform.client_to_screen(client_point);
        log::trace!("InfoBar: Forwarding caption drag at {screen_point:?}");
        self.frame.begin_caption_drag(screen_point);
        true
    }

    /// Hands a raw input message to the tooltip manager before it is dispatched.
    pub fn pre_translate_message(&mut self, message: &RelayedMessage) {
        if let Some(tooltip) = self.tooltip.as_mut() {
            tooltip.relay_event(message);
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Labels in display order.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines.iter().map(|line| line.label.as_str())
    }

    pub fn layout(&self) -> &LinesLayout {
        &self.layout
    }

    pub fn tooltip(&self) -> Option<&dyn TooltipOperations> {
        self.tooltip.as_deref()
    }

    pub fn config(&self) -> &InfoBarConfig {
        &self.config
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    #[cfg(test)]
    pub(crate) fn value_control(&self, label: &str) -> Option<ControlHandle> {
        find_line(&self.lines, label).map(|index| self.lines[index].value_control)
    }
}

impl<P: InfoBarPlatform> Drop for InfoBar<P> {
    fn drop(&mut self) {
        self.dpi_subscription.take();
        for line in self.lines.drain(..) {
            self.platform.destroy_control(line.label_control);
            self.platform.destroy_control(line.value_control);
        }
        log::debug!("InfoBar: Dropped");
    }
}

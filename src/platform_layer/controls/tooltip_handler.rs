/*
 * Native tooltip managers for the info bar, built on the common-controls
 * tooltip window class.
 *
 * `NativeTooltip` owns the tooltip window and a `TooltipRegistry` mirroring
 * the registered tools. Two managers wrap it:
 *
 * - `PlainTooltip` keeps the system look.
 * - `ThemedTooltip` turns off visual styles for the tip window and applies
 *   the theme's background and text colors.
 *
 * Tools are identified by the HWND of a value control (TTF_IDISHWND). The
 * tooltip does not subclass the controls; mouse messages reach it through
 * `relay_event`, which the message loop calls before dispatching.
 */

use crate::platform_layer::{
    controls::styling_handler::color_to_colorref,
    error::{PlatformError, Result as PlatformResult},
    styling_primitives::TooltipPalette,
    tooltip_registry::TooltipRegistry,
    types::{ControlHandle, RelayedMessage, TooltipOperations, TooltipSettings, TooltipStyle},
    window_common::hwnd_from_handle,
};

use windows::{
    Win32::{
        Foundation::{HINSTANCE, HWND, LPARAM, POINT, RECT, WPARAM},
        UI::{
            Controls::{SetWindowTheme, TOOLTIP_FLAGS, TOOLTIPS_CLASSW, TTTOOLINFOW},
            WindowsAndMessaging::{
                CW_USEDEFAULT, CreateWindowExW, DestroyWindow, HWND_TOPMOST, MSG, SWP_NOACTIVATE,
                SWP_NOMOVE, SWP_NOSIZE, SendMessageW, SetWindowPos, WINDOW_STYLE, WM_USER,
                WS_EX_TOPMOST, WS_POPUP,
            },
        },
    },
    core::{PCWSTR, PWSTR, w},
};

// Tooltip styles
const TTS_ALWAYSTIP: u32 = 0x01;
const TTS_NOPREFIX: u32 = 0x02;

// Tool flags
const TTF_IDISHWND: u32 = 0x0001;

// Delay time selectors
const TTDT_AUTOPOP: usize = 2;

// Tooltip messages
const TTM_ACTIVATE: u32 = WM_USER + 1;
const TTM_SETDELAYTIME: u32 = WM_USER + 3;
const TTM_RELAYEVENT: u32 = WM_USER + 7;
const TTM_SETTIPBKCOLOR: u32 = WM_USER + 19;
const TTM_SETTIPTEXTCOLOR: u32 = WM_USER + 20;
const TTM_SETMAXTIPWIDTH: u32 = WM_USER + 24;
const TTM_ADDTOOLW: u32 = WM_USER + 50;
const TTM_DELTOOLW: u32 = WM_USER + 51;
const TTM_UPDATETIPTEXTW: u32 = WM_USER + 57;

pub(crate) struct NativeTooltip {
    hwnd_tip: HWND,
    owner: HWND,
    registry: TooltipRegistry,
}

impl NativeTooltip {
    fn create(
        owner: HWND,
        h_instance: HINSTANCE,
        settings: &TooltipSettings,
    ) -> PlatformResult<Self> {
        let hwnd_tip = unsafe {
            CreateWindowExW(
                WS_EX_TOPMOST,
                TOOLTIPS_CLASSW,
                PCWSTR::null(),
                WS_POPUP | WINDOW_STYLE(TTS_NOPREFIX | TTS_ALWAYSTIP),
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                Some(owner),
                None,
                Some(h_instance),
                None,
            )
        }
        .map_err(|err| {
            log::error!("[Tooltip] Failed to create tooltip window: {err}");
            PlatformError::ControlCreationFailed(format!("tooltip window: {err}"))
        })?;

        unsafe {
            let _ = SetWindowPos(
                hwnd_tip,
                Some(HWND_TOPMOST),
                0,
                0,
                0,
                0,
                SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE,
            );
            SendMessageW(
                hwnd_tip,
                TTM_SETMAXTIPWIDTH,
                Some(WPARAM(0)),
                Some(LPARAM(settings.max_width_px as isize)),
            );
            SendMessageW(
                hwnd_tip,
                TTM_SETDELAYTIME,
                Some(WPARAM(TTDT_AUTOPOP)),
                Some(LPARAM((settings.auto_pop_ms & 0xFFFF) as isize)),
            );
            SendMessageW(hwnd_tip, TTM_ACTIVATE, Some(WPARAM(1)), Some(LPARAM(0)));
        }
        log::debug!("[Tooltip] Created tooltip window {hwnd_tip:?} owned by {owner:?}");
        Ok(Self {
            hwnd_tip,
            owner,
            registry: TooltipRegistry::new(),
        })
    }

    fn apply_palette(&self, palette: TooltipPalette) {
        unsafe {
            // Visual styles ignore the tip colors, so drop them for this window.
            if let Err(err) = SetWindowTheme(self.hwnd_tip, w!(""), w!("")) {
                log::warn!("[Tooltip] SetWindowTheme failed: {err}");
            }
            SendMessageW(
                self.hwnd_tip,
                TTM_SETTIPBKCOLOR,
                Some(WPARAM(color_to_colorref(&palette.background).0 as usize)),
                Some(LPARAM(0)),
            );
            SendMessageW(
                self.hwnd_tip,
                TTM_SETTIPTEXTCOLOR,
                Some(WPARAM(color_to_colorref(&palette.text).0 as usize)),
                Some(LPARAM(0)),
            );
        }
    }

    fn send_tool_message(&self, message: u32, control: ControlHandle, text: Option<&str>) -> bool {
        let mut wide: Vec<u16> = text
            .unwrap_or_default()
            .encode_utf16()
            .chain(std::iter::once(0))
            .collect();
        let tool = TTTOOLINFOW {
            cbSize: std::mem::size_of::<TTTOOLINFOW>() as u32,
            uFlags: TOOLTIP_FLAGS(TTF_IDISHWND),
            hwnd: self.owner,
            uId: hwnd_from_handle(control).0 as usize,
            rect: RECT::default(),
            lpszText: if text.is_some() {
                PWSTR(wide.as_mut_ptr())
            } else {
                PWSTR::null()
            },
            ..Default::default()
        };
        let result = unsafe {
            SendMessageW(
                self.hwnd_tip,
                message,
                Some(WPARAM(0)),
                Some(LPARAM(&tool as *const TTTOOLINFOW as isize)),
            )
        };
        result.0 != 0
    }

    fn add_tool(&mut self, control: ControlHandle, text: &str) -> PlatformResult<()> {
        // TTM_ADDTOOLW returns TRUE on success; the other tool messages return nothing.
        if !self.send_tool_message(TTM_ADDTOOLW, control, Some(text)) {
            log::error!("[Tooltip] TTM_ADDTOOLW failed for {control:?}");
            return Err(PlatformError::OperationFailed(format!(
                "could not register tooltip for {control:?}"
            )));
        }
        if !self.registry.add(control, text) {
            log::warn!("[Tooltip] {control:?} was already registered; text replaced");
        }
        Ok(())
    }

    fn update_tip_text(&mut self, control: ControlHandle, text: &str) {
        if !self.registry.update(control, text) {
            log::warn!("[Tooltip] update_tip_text for unregistered {control:?}");
            return;
        }
        self.send_tool_message(TTM_UPDATETIPTEXTW, control, Some(text));
    }

    fn del_tool(&mut self, control: ControlHandle) {
        if self.registry.remove(control) {
            self.send_tool_message(TTM_DELTOOLW, control, None);
        }
    }

    fn relay_event(&mut self, message: &RelayedMessage) {
        let msg = MSG {
            hwnd: HWND(message.window as *mut _),
            message: message.message,
            wParam: WPARAM(message.wparam),
            lParam: LPARAM(message.lparam),
            time: message.time,
            pt: POINT {
                x: message.point.x,
                y: message.point.y,
            },
        };
        unsafe {
            SendMessageW(
                self.hwnd_tip,
                TTM_RELAYEVENT,
                Some(WPARAM(0)),
                Some(LPARAM(&msg as *const MSG as isize)),
            );
        }
    }
}

impl Drop for NativeTooltip {
    fn drop(&mut self) {
        log::debug!(
            "[Tooltip] Destroying tooltip window {:?} with {} tool(s)",
            self.hwnd_tip,
            self.registry.len()
        );
        if let Err(err) = unsafe { DestroyWindow(self.hwnd_tip) } {
            log::trace!("[Tooltip] DestroyWindow failed: {err}");
        }
    }
}

pub(crate) struct PlainTooltip {
    inner: NativeTooltip,
}

impl PlainTooltip {
    pub(crate) fn create(
        owner: HWND,
        h_instance: HINSTANCE,
        settings: &TooltipSettings,
    ) -> PlatformResult<Self> {
        Ok(Self {
            inner: NativeTooltip::create(owner, h_instance, settings)?,
        })
    }
}

pub(crate) struct ThemedTooltip {
    inner: NativeTooltip,
}

impl ThemedTooltip {
    pub(crate) fn create(
        owner: HWND,
        h_instance: HINSTANCE,
        settings: &TooltipSettings,
        palette: TooltipPalette,
    ) -> PlatformResult<Self> {
        let inner = NativeTooltip::create(owner, h_instance, settings)?;
        inner.apply_palette(palette);
        Ok(Self { inner })
    }
}

impl TooltipOperations for PlainTooltip {
    fn style(&self) -> TooltipStyle {
        TooltipStyle::Plain
    }
    fn add_tool(&mut self, control: ControlHandle, text: &str) -> PlatformResult<()> {
        self.inner.add_tool(control, text)
    }
    fn update_tip_text(&mut self, control: ControlHandle, text: &str) {
        self.inner.update_tip_text(control, text)
    }
    fn del_tool(&mut self, control: ControlHandle) {
        self.inner.del_tool(control)
    }
    fn relay_event(&mut self, message: &RelayedMessage) {
        self.inner.relay_event(message)
    }
    fn tip_text(&self, control: ControlHandle) -> Option<&str> {
        self.inner.registry.text(control)
    }
    fn tool_count(&self) -> usize {
        self.inner.registry.len()
    }
}

impl TooltipOperations for ThemedTooltip {
    fn style(&self) -> TooltipStyle {
        TooltipStyle::Themed
    }
    fn add_tool(&mut self, control: ControlHandle, text: &str) -> PlatformResult<()> {
        self.inner.add_tool(control, text)
    }
    fn update_tip_text(&mut self, control: ControlHandle, text: &str) {
        self.inner.update_tip_text(control, text)
    }
    fn del_tool(&mut self, control: ControlHandle) {
        self.inner.del_tool(control)
    }
    fn relay_event(&mut self, message: &RelayedMessage) {
        self.inner.relay_event(message)
    }
    fn tip_text(&self, control: ControlHandle) -> Option<&str> {
        self.inner.registry.text(control)
    }
    fn tool_count(&self) -> usize {
        self.inner.registry.len()
    }
}

/*
 * Creates the tooltip manager for `style`. A themed manager without a
 * palette falls back to the plain one.
 */
pub(crate) fn create_tooltip_manager(
    owner: HWND,
    h_instance: HINSTANCE,
    style: TooltipStyle,
    settings: TooltipSettings,
) -> PlatformResult<Box<dyn TooltipOperations>> {
    match (style, settings.palette) {
        (TooltipStyle::Themed, Some(palette)) => Ok(Box::new(ThemedTooltip::create(
            owner, h_instance, &settings, palette,
        )?)),
        (TooltipStyle::Themed, None) => {
            log::warn!("[Tooltip] Themed tooltip requested without a palette; using plain");
            Ok(Box::new(PlainTooltip::create(owner, h_instance, &settings)?))
        }
        (TooltipStyle::Plain, _) => Ok(Box::new(PlainTooltip::create(owner, h_instance, &settings)?)),
    }
}

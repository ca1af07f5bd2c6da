/*
 * The Win32 backend of the info bar.
 *
 * `Win32InfoBarPlatform` implements `InfoBarPlatform` on top of a child
 * window of the player frame. Lines are owner-drawn STATIC controls (see
 * `status_label_handler`) and the tooltip is a common-controls tooltip
 * window (see `tooltip_handler`). `create_info_bar` wires a platform, the
 * native window context and an `InfoBar` together, and `run_message_loop`
 * pumps messages while relaying input aimed at the bar to its tooltip.
 */

use super::controls::{status_label_handler, tooltip_handler};
use super::dpi::DpiScale;
use super::error::{PlatformError, Result as PlatformResult};
use super::event_bus::EventBus;
use super::styling_primitives::FontDescription;
use super::types::{
    ControlHandle, ControlRole, DisplayEvent, FrameOperations, InfoBarPlatform, Point, Rect,
    RelayedMessage, ThemeOperations, TooltipOperations, TooltipSettings, TooltipStyle,
};
use super::window_common::{
    self, BAR_CLASS_NAME, BarWindowContext, SharedInfoBar, handle_from_hwnd, hwnd_from_handle,
};
use crate::info_bar::{InfoBar, InfoBarConfig};

use windows::{
    Win32::{
        Foundation::{GetLastError, HINSTANCE, HWND, POINT},
        Graphics::Gdi::{
            ClientToScreen, InvalidateRect, RDW_ALLCHILDREN, RDW_ERASE, RDW_INVALIDATE,
            RDW_UPDATENOW, RedrawWindow,
        },
        System::LibraryLoader::GetModuleHandleW,
        UI::{
            Controls::{ICC_BAR_CLASSES, ICC_WIN95_CLASSES, INITCOMMONCONTROLSEX, InitCommonControlsEx},
            WindowsAndMessaging::{
                CreateWindowExW, DestroyWindow, DispatchMessageW, GetMessageW, IsChild, MSG,
                MoveWindow, TranslateMessage, WINDOW_EX_STYLE, WS_CHILD, WS_VISIBLE,
            },
        },
    },
    core::PCWSTR,
};

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::{Rc, Weak};

// Control IDs start above the range used by the standard dialog buttons.
const FIRST_CONTROL_ID: u16 = 100;

pub struct Win32InfoBarPlatform {
    parent: HWND,
    hwnd: Option<HWND>,
    h_instance: HINSTANCE,
    context: Rc<BarWindowContext>,
    font: FontDescription,
    controls: HashSet<ControlHandle>,
    next_control_id: u16,
}

impl Win32InfoBarPlatform {
    fn new(
        parent: HWND,
        h_instance: HINSTANCE,
        context: Rc<BarWindowContext>,
        font: FontDescription,
    ) -> Self {
        Self {
            parent,
            hwnd: None,
            h_instance,
            context,
            font,
            controls: HashSet::new(),
            next_control_id: FIRST_CONTROL_ID,
        }
    }

    /// The bar window, once attached.
    pub fn hwnd(&self) -> Option<HWND> {
        self.hwnd
    }

    fn bar_hwnd(&self) -> PlatformResult<HWND> {
        self.hwnd.ok_or_else(|| {
            PlatformError::InvalidHandle("Info bar window has not been attached".to_string())
        })
    }

    fn known_hwnd(&self, control: ControlHandle) -> Option<HWND> {
        self.controls
            .contains(&control)
            .then(|| hwnd_from_handle(control))
    }

    fn allocate_control_id(&mut self) -> u16 {
        let id = self.next_control_id;
        self.next_control_id = self.next_control_id.checked_add(1).unwrap_or(FIRST_CONTROL_ID);
        id
    }
}

impl InfoBarPlatform for Win32InfoBarPlatform {
    fn attach_bar(&mut self) -> PlatformResult<()> {
        if self.hwnd.is_some() {
            return Ok(());
        }
        window_common::register_bar_class(self.h_instance)?;
        let hwnd = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE(0),
                BAR_CLASS_NAME,
                PCWSTR::null(),
                WS_CHILD | WS_VISIBLE,
                0,
                0,
                0,
                0,
                Some(self.parent),
                None,
                Some(self.h_instance),
                None,
            )
        }
        .map_err(|err| {
            log::error!("InfoBarWindow: CreateWindowExW failed: {err}");
            PlatformError::ControlCreationFailed(format!("info bar window: {err}"))
        })?;
        window_common::attach_context(hwnd, Rc::clone(&self.context));
        self.hwnd = Some(hwnd);
        log::debug!("InfoBarWindow: Attached bar {hwnd:?} to parent {:?}", self.parent);
        Ok(())
    }

    fn create_text_control(
        &mut self,
        role: ControlRole,
        text: &str,
    ) -> PlatformResult<ControlHandle> {
        let parent = self.bar_hwnd()?;
        let control_id = self.allocate_control_id();
        let hwnd = status_label_handler::create_status_label(
            parent,
            self.h_instance,
            control_id,
            role,
            text,
            &self.font,
            self.context.frame.dpi(),
        )?;
        let handle = handle_from_hwnd(hwnd);
        self.controls.insert(handle);
        Ok(handle)
    }

    fn destroy_control(&mut self, control: ControlHandle) {
        if self.controls.remove(&control) {
            status_label_handler::destroy_status_label(hwnd_from_handle(control));
        } else {
            log::warn!("InfoBarWindow: destroy_control for unknown {control:?}");
        }
    }

    fn set_control_text(&mut self, control: ControlHandle, text: &str) -> PlatformResult<()> {
        let hwnd = self.known_hwnd(control).ok_or_else(|| {
            PlatformError::InvalidHandle(format!("Unknown control {control:?}"))
        })?;
        status_label_handler::set_status_label_text(hwnd, text)
    }

    fn measure_text_width(&self, control: ControlHandle, text: &str) -> Option<i32> {
        self.known_hwnd(control)
            .and_then(|hwnd| status_label_handler::measure_text(hwnd, text))
    }

    fn move_control(&mut self, control: ControlHandle, rect: Rect) {
        let Some(hwnd) = self.known_hwnd(control) else {
            return;
        };
        if let Err(err) =
            unsafe { MoveWindow(hwnd, rect.left, rect.top, rect.width(), rect.height(), true) }
        {
            log::warn!("InfoBarWindow: MoveWindow failed for {control:?}: {err}");
        }
    }

    fn control_rect(&self, control: ControlHandle) -> Option<Rect> {
        let bar = self.hwnd?;
        self.known_hwnd(control)
            .and_then(|hwnd| window_common::child_rect_in_parent(bar, hwnd))
    }

    fn scale_control_font(&mut self, control: ControlHandle, dpi: DpiScale) {
        if let Some(hwnd) = self.known_hwnd(control) {
            status_label_handler::rescale_font(hwnd, &self.font, dpi);
        }
    }

    fn parent_client_rect(&self) -> Option<Rect> {
        window_common::client_rect(self.parent)
    }

    fn bar_client_rect(&self) -> Rect {
        self.hwnd
            .and_then(window_common::client_rect)
            .unwrap_or_default()
    }

    fn client_to_screen(&self, point: Point) -> Point {
        let Some(hwnd) = self.hwnd else {
            return point;
        };
        let mut pt = POINT {
            x: point.x,
            y: point.y,
        };
        if unsafe { ClientToScreen(hwnd, &mut pt) }.as_bool() {
            Point { x: pt.x, y: pt.y }
        } else {
            log::warn!("InfoBarWindow: ClientToScreen failed: {:?}", unsafe {
                GetLastError()
            });
            point
        }
    }

    fn invalidate(&mut self) {
        if let Some(hwnd) = self.hwnd {
            unsafe {
                let _ = InvalidateRect(Some(hwnd), None, true);
            }
        }
    }

    fn repaint_now(&mut self) {
        if let Some(hwnd) = self.hwnd {
            unsafe {
                let _ = RedrawWindow(
                    Some(hwnd),
                    None,
                    None,
                    RDW_INVALIDATE | RDW_ERASE | RDW_ALLCHILDREN | RDW_UPDATENOW,
                );
            }
        }
    }

    fn create_tooltip(
        &mut self,
        style: TooltipStyle,
        settings: TooltipSettings,
    ) -> PlatformResult<Box<dyn TooltipOperations>> {
        let owner = self.bar_hwnd()?;
        tooltip_handler::create_tooltip_manager(owner, self.h_instance, style, settings)
    }
}

impl Drop for Win32InfoBarPlatform {
    fn drop(&mut self) {
        if let Some(hwnd) = self.hwnd.take() {
            log::debug!("InfoBarWindow: Destroying bar window {hwnd:?}");
            if let Err(err) = unsafe { DestroyWindow(hwnd) } {
                // The parent may already have destroyed it.
                log::trace!("InfoBarWindow: DestroyWindow failed: {err}");
            }
        }
    }
}

/*
 * Initializes the common controls used by the bar (tooltips and status
 * bar classes). Failure is logged and not fatal.
 */
pub fn initialize_common_controls() {
    let icex = INITCOMMONCONTROLSEX {
        dwSize: std::mem::size_of::<INITCOMMONCONTROLSEX>() as u32,
        dwICC: ICC_WIN95_CLASSES | ICC_BAR_CLASSES,
    };
    if !unsafe { InitCommonControlsEx(&icex) }.as_bool() {
        log::warn!("InfoBarWindow: InitCommonControlsEx failed: {:?}", unsafe {
            GetLastError()
        });
    }
}

/*
 * Creates an info bar docked in `parent` and attaches its native window.
 * The returned bar is subscribed to `bus` and already has its tooltip
 * manager; lines can be added right away.
 */
pub fn create_info_bar(
    parent: HWND,
    frame: Rc<dyn FrameOperations>,
    theme: Rc<dyn ThemeOperations>,
    bus: &EventBus<DisplayEvent>,
    config: InfoBarConfig,
) -> PlatformResult<SharedInfoBar> {
    let h_instance = HINSTANCE(unsafe { GetModuleHandleW(PCWSTR::null()) }?.0);
    let context = Rc::new(BarWindowContext {
        frame: Rc::clone(&frame),
        theme: Rc::clone(&theme),
        bar: RefCell::new(Weak::new()),
    });
    let platform =
        Win32InfoBarPlatform::new(parent, h_instance, Rc::clone(&context), config.font.clone());
    let bar = InfoBar::new(platform, frame, theme, bus, config);
    *context.bar.borrow_mut() = Rc::downgrade(&bar);
    bar.borrow_mut().create()?;
    Ok(bar)
}

fn relayed_from_msg(msg: &MSG) -> RelayedMessage {
    RelayedMessage {
        window: msg.hwnd.0 as isize,
        message: msg.message,
        wparam: msg.wParam.0,
        lparam: msg.lParam.0,
        time: msg.time,
        point: Point {
            x: msg.pt.x,
            y: msg.pt.y,
        },
    }
}

fn targets_bar(msg: &MSG, bar_hwnd: HWND) -> bool {
    msg.hwnd == bar_hwnd || unsafe { IsChild(bar_hwnd, msg.hwnd) }.as_bool()
}

/*
 * Runs the thread's message loop until WM_QUIT. Messages for the bar or its
 * controls are shown to the bar's tooltip before being dispatched.
 */
pub fn run_message_loop(bar: &SharedInfoBar) -> PlatformResult<()> {
    let bar_hwnd = bar.borrow().platform().hwnd();
    let mut msg = MSG::default();
    loop {
        let result = unsafe { GetMessageW(&mut msg, None, 0, 0) };
        if result.0 > 0 {
            if let Some(bar_hwnd) = bar_hwnd {
                if targets_bar(&msg, bar_hwnd) {
                    match bar.try_borrow_mut() {
                        Ok(mut bar) => bar.pre_translate_message(&relayed_from_msg(&msg)),
                        Err(_) => log::trace!("InfoBarWindow: Bar busy; message not relayed"),
                    }
                }
            }
            unsafe {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        } else if result.0 == 0 {
            log::debug!("InfoBarWindow: GetMessageW returned 0 (WM_QUIT), exiting message loop.");
            return Ok(());
        } else {
            let last_error = unsafe { GetLastError() };
            log::error!("InfoBarWindow: GetMessageW failed. LastError: {last_error:?}");
            return Err(PlatformError::OperationFailed(format!(
                "GetMessageW failed: {}",
                windows::core::Error::from_win32()
            )));
        }
    }
}

/*
 * The native info bar window: class registration, the window procedure and
 * conversions between Win32 values and the portable types.
 *
 * The window procedure reaches the `InfoBar` through a `BarWindowContext`
 * stored in GWLP_USERDATA. The bar may already be mutably borrowed when a
 * message arrives synchronously (for example WM_ERASEBKGND during an
 * immediate repaint), so every access uses `try_borrow`/`try_borrow_mut`.
 * Background erasing falls back to the native child windows and the frame
 * and theme held by the context, and never needs the bar.
 */

use super::app::Win32InfoBarPlatform;
use super::controls::{styling_handler::color_to_colorref, status_label_handler};
use super::error::{PlatformError, Result as PlatformResult};
use super::types::{ControlHandle, FrameOperations, Point, Rect, ThemeOperations};
use crate::info_bar::{
    BackgroundPlan, BarPlacement, BorderFill, InfoBar, bevel_edges, plan_background,
};

use windows::{
    Win32::{
        Foundation::{GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, POINT, RECT, WPARAM},
        Graphics::Gdi::{
            COLOR_3DHILIGHT, COLOR_3DSHADOW, CreateSolidBrush, DeleteObject, ExcludeClipRect,
            FillRect, GetSysColor, HBRUSH, HDC, MapWindowPoints,
        },
        UI::{
            Controls::DRAWITEMSTRUCT,
            WindowsAndMessaging::{
                CS_HREDRAW, CS_VREDRAW, DefWindowProcW, GW_CHILD, GW_HWNDNEXT, GWLP_USERDATA,
                GetClientRect, GetWindow, GetWindowLongPtrW, GetWindowRect, IDC_ARROW,
                LoadCursorW, RegisterClassW, SetWindowLongPtrW, WM_DESTROY, WM_DRAWITEM,
                WM_ERASEBKGND, WM_LBUTTONDOWN, WM_NCDESTROY, WM_SIZE, WNDCLASSW,
            },
        },
    },
    core::{PCWSTR, w},
};

use std::cell::RefCell;
use std::ffi::c_void;
use std::rc::{Rc, Weak};
use std::sync::OnceLock;

pub(crate) const BAR_CLASS_NAME: PCWSTR = w!("PlayerInfoBarWindow");
static BAR_CLASS_REGISTERED: OnceLock<bool> = OnceLock::new();

pub(crate) type SharedInfoBar = Rc<RefCell<InfoBar<Win32InfoBarPlatform>>>;

/*
 * Native-side state of a bar window. The frame and theme are kept here so
 * painting works while the bar is borrowed; `bar` is set once the
 * `InfoBar` has been constructed.
 */
pub(crate) struct BarWindowContext {
    pub(crate) frame: Rc<dyn FrameOperations>,
    pub(crate) theme: Rc<dyn ThemeOperations>,
    pub(crate) bar: RefCell<Weak<RefCell<InfoBar<Win32InfoBarPlatform>>>>,
}

impl BarWindowContext {
    fn bar(&self) -> Option<SharedInfoBar> {
        self.bar.try_borrow().ok().and_then(|weak| weak.upgrade())
    }
}

// --- Conversions ---

pub(crate) fn handle_from_hwnd(hwnd: HWND) -> ControlHandle {
    ControlHandle(hwnd.0 as usize as u64)
}

pub(crate) fn hwnd_from_handle(handle: ControlHandle) -> HWND {
    HWND(handle.0 as usize as *mut c_void)
}

pub(crate) fn rect_from_native(rect: RECT) -> Rect {
    Rect::new(rect.left, rect.top, rect.right, rect.bottom)
}

pub(crate) fn native_from_rect(rect: Rect) -> RECT {
    RECT {
        left: rect.left,
        top: rect.top,
        right: rect.right,
        bottom: rect.bottom,
    }
}

/// Client coordinates packed in a mouse message's LPARAM. Both words are signed.
pub(crate) fn point_from_lparam(lparam: LPARAM) -> Point {
    Point {
        x: (lparam.0 & 0xFFFF) as u16 as i16 as i32,
        y: ((lparam.0 >> 16) & 0xFFFF) as u16 as i16 as i32,
    }
}

pub(crate) fn client_rect(hwnd: HWND) -> Option<Rect> {
    let mut rect = RECT::default();
    unsafe { GetClientRect(hwnd, &mut rect) }
        .ok()
        .map(|_| rect_from_native(rect))
}

/// The window rectangle of `child` in the client coordinates of `parent`.
pub(crate) fn child_rect_in_parent(parent: HWND, child: HWND) -> Option<Rect> {
    let mut rect = RECT::default();
    unsafe { GetWindowRect(child, &mut rect) }.ok()?;
    let mut corners = [
        POINT {
            x: rect.left,
            y: rect.top,
        },
        POINT {
            x: rect.right,
            y: rect.bottom,
        },
    ];
    unsafe { MapWindowPoints(None, Some(parent), &mut corners) };
    Some(Rect::new(
        corners[0].x,
        corners[0].y,
        corners[1].x,
        corners[1].y,
    ))
}

/// Direct children of `hwnd` in z-order.
pub(crate) fn child_windows(hwnd: HWND) -> Vec<HWND> {
    let mut children = Vec::new();
    let mut next = unsafe { GetWindow(hwnd, GW_CHILD) };
    while let Ok(child) = next {
        if child.is_invalid() {
            break;
        }
        children.push(child);
        next = unsafe { GetWindow(child, GW_HWNDNEXT) };
    }
    children
}

// --- Class registration ---

pub(crate) fn register_bar_class(h_instance: HINSTANCE) -> PlatformResult<()> {
    let registered = *BAR_CLASS_REGISTERED.get_or_init(|| unsafe {
        let wc = WNDCLASSW {
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(bar_wnd_proc),
            hInstance: h_instance,
            hCursor: LoadCursorW(None, IDC_ARROW).unwrap_or_default(),
            hbrBackground: HBRUSH(std::ptr::null_mut()),
            lpszClassName: BAR_CLASS_NAME,
            ..Default::default()
        };
        if RegisterClassW(&wc) == 0 {
            log::error!("InfoBarWindow: RegisterClassW failed: {:?}", GetLastError());
            false
        } else {
            log::debug!("InfoBarWindow: Registered window class");
            true
        }
    });
    if registered {
        Ok(())
    } else {
        Err(PlatformError::InitializationFailed(
            "RegisterClassW failed for the info bar window class".to_string(),
        ))
    }
}

/// Stores `context` in the bar window. Ownership of one strong count moves
/// to the window and is released on WM_NCDESTROY.
pub(crate) fn attach_context(hwnd: HWND, context: Rc<BarWindowContext>) {
    unsafe {
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, Rc::into_raw(context) as isize);
    }
}

// --- Painting ---

fn fill_rect(hdc: HDC, rect: Rect, colorref: windows::Win32::Foundation::COLORREF) {
    unsafe {
        let brush = CreateSolidBrush(colorref);
        FillRect(hdc, &native_from_rect(rect), brush);
        let _ = DeleteObject(brush.into());
    }
}

/*
 * Plan used when the bar cannot be borrowed: the same rules, computed from
 * the live child windows and the context's frame and theme.
 */
fn native_background_plan(hwnd: HWND, context: &BarWindowContext) -> BackgroundPlan {
    let children: Vec<Rect> = child_windows(hwnd)
        .into_iter()
        .filter_map(|child| child_rect_in_parent(hwnd, child))
        .collect();
    let placement = BarPlacement {
        is_last_bar: context.frame.is_last_bar(),
        fullscreen: context.frame.is_fullscreen(),
    };
    let border = if context.theme.is_theme_active() {
        BorderFill::Solid(context.theme.no_border_color())
    } else {
        BorderFill::SystemBevel
    };
    plan_background(
        client_rect(hwnd).unwrap_or_default(),
        &children,
        placement,
        border,
    )
}

fn paint_background(hdc: HDC, plan: &BackgroundPlan) {
    for r in &plan.exclusions {
        unsafe { ExcludeClipRect(hdc, r.left, r.top, r.right, r.bottom) };
    }
    match plan.border {
        BorderFill::Solid(color) => fill_rect(hdc, plan.border_rect, color_to_colorref(&color)),
        BorderFill::SystemBevel => {
            let shadow = windows::Win32::Foundation::COLORREF(unsafe { GetSysColor(COLOR_3DSHADOW) });
            let highlight =
                windows::Win32::Foundation::COLORREF(unsafe { GetSysColor(COLOR_3DHILIGHT) });
            let (shadow_edges, highlight_edges) = bevel_edges(plan.border_rect);
            for edge in shadow_edges {
                fill_rect(hdc, edge, shadow);
            }
            for edge in highlight_edges {
                fill_rect(hdc, edge, highlight);
            }
        }
    }
    fill_rect(hdc, plan.interior, color_to_colorref(&plan.interior_color));
}

// --- WndProc ---

unsafe extern "system" fn bar_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let context_ptr = unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) } as *const BarWindowContext;
    if context_ptr.is_null() {
        // Messages sent during CreateWindowExW, before the context is attached.
        return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
    }
    let context = unsafe { &*context_ptr };

    match msg {
        WM_ERASEBKGND => {
            let hdc = HDC(wparam.0 as *mut c_void);
            let plan = context
                .bar()
                .and_then(|bar| bar.try_borrow().ok().map(|bar| bar.background_plan()))
                .unwrap_or_else(|| native_background_plan(hwnd, context));
            paint_background(hdc, &plan);
            LRESULT(1)
        }
        WM_SIZE => {
            if let Some(bar) = context.bar() {
                match bar.try_borrow_mut() {
                    Ok(mut bar) => bar.on_size(),
                    Err(_) => log::debug!("InfoBarWindow: WM_SIZE while the bar is busy"),
                }
            }
            LRESULT(0)
        }
        WM_LBUTTONDOWN => {
            let point = point_from_lparam(lparam);
            if let Some(bar) = context.bar() {
                if let Ok(bar) = bar.try_borrow() {
                    bar.on_primary_button_down(point);
                }
            }
            LRESULT(0)
        }
        WM_DRAWITEM => {
            let dis = unsafe { &*(lparam.0 as *const DRAWITEMSTRUCT) };
            if status_label_handler::draw_item(dis) {
                LRESULT(1)
            } else {
                unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
            }
        }
        WM_DESTROY => {
            for child in child_windows(hwnd) {
                status_label_handler::release_state(child);
            }
            log::debug!("InfoBarWindow: WM_DESTROY for {hwnd:?}");
            unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
        }
        WM_NCDESTROY => {
            unsafe {
                SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
                drop(Rc::from_raw(context_ptr));
                DefWindowProcW(hwnd, msg, wparam, lparam)
            }
        }
        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}

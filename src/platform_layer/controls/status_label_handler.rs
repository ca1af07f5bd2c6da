/*
 * Owner-drawn STATIC controls used for the two columns of the info bar.
 *
 * Labels are drawn right-aligned so they line up against the value column;
 * values are drawn left-aligned and end in an ellipsis when the text does
 * not fit. Value controls also carry SS_NOTIFY so the tooltip manager sees
 * mouse activity over them.
 *
 * Each control owns a `StatusLabelState` (role, text and font) stored in
 * its GWLP_USERDATA. Drawing happens when the bar window receives
 * WM_DRAWITEM and reads that state directly from the control, so painting
 * never needs the info bar itself.
 */

use crate::platform_layer::{
    controls::styling_handler::{color_to_colorref, create_hfont, delete_hfont},
    dpi::DpiScale,
    error::{PlatformError, Result as PlatformResult},
    styling_primitives::{Color, FontDescription},
    types::ControlRole,
};

use windows::{
    Win32::{
        Foundation::{HINSTANCE, HWND, LPARAM, RECT, SIZE, WPARAM},
        Graphics::Gdi::{
            CreateSolidBrush, DRAW_TEXT_FORMAT, DT_END_ELLIPSIS, DT_LEFT, DT_NOPREFIX, DT_RIGHT,
            DT_SINGLELINE, DT_VCENTER, DeleteObject, DrawTextW, FillRect, GetDC,
            GetTextExtentPoint32W, HFONT, InvalidateRect, ReleaseDC, SelectObject, SetBkMode,
            SetTextColor, TRANSPARENT,
        },
        UI::{
            Controls::DRAWITEMSTRUCT,
            WindowsAndMessaging::{
                CreateWindowExW, DestroyWindow, GWLP_USERDATA, GetWindowLongPtrW, HMENU,
                SendMessageW, SetWindowLongPtrW, SetWindowTextW, WINDOW_EX_STYLE, WINDOW_STYLE,
                WM_SETFONT, WS_CHILD, WS_VISIBLE,
            },
        },
    },
    core::{HSTRING, w},
};

// Static control styles not exported as typed constants.
const SS_OWNERDRAW: u32 = 0x0000_000D;
const SS_NOTIFY: u32 = 0x0000_0100;

const LABEL_TEXT_COLOR: Color = Color::rgb(0xE0, 0xE0, 0xE0);
const LABEL_BACKGROUND: Color = Color::BLACK;

struct StatusLabelState {
    role: ControlRole,
    text: String,
    font: HFONT,
}

impl Drop for StatusLabelState {
    fn drop(&mut self) {
        delete_hfont(self.font);
    }
}

fn state_ptr(hwnd: HWND) -> *mut StatusLabelState {
    unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut StatusLabelState }
}

/// Window style bits for a control of `role`.
pub(crate) fn status_label_style(role: ControlRole) -> WINDOW_STYLE {
    let mut style = WS_CHILD | WS_VISIBLE | WINDOW_STYLE(SS_OWNERDRAW);
    if role == ControlRole::Value {
        style |= WINDOW_STYLE(SS_NOTIFY);
    }
    style
}

/// `DrawTextW` flags used when painting a control of `role`.
pub(crate) fn draw_text_format(role: ControlRole) -> DRAW_TEXT_FORMAT {
    let common = DT_SINGLELINE | DT_VCENTER | DT_NOPREFIX;
    match role {
        ControlRole::Label => common | DT_RIGHT,
        ControlRole::Value => common | DT_LEFT | DT_END_ELLIPSIS,
    }
}

/*
 * Creates a status label as a child of `parent`. The control starts with a
 * zero size; the info bar positions it during its next relayout.
 */
pub(crate) fn create_status_label(
    parent: HWND,
    h_instance: HINSTANCE,
    control_id: u16,
    role: ControlRole,
    text: &str,
    font_desc: &FontDescription,
    dpi: DpiScale,
) -> PlatformResult<HWND> {
    let font = create_hfont(font_desc, dpi)?;
    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            w!("STATIC"),
            &HSTRING::from(text),
            status_label_style(role),
            0,
            0,
            0,
            0,
            Some(parent),
            Some(HMENU(control_id as usize as *mut _)),
            Some(h_instance),
            None,
        )
    };
    let hwnd = match hwnd {
        Ok(hwnd) => hwnd,
        Err(err) => {
            delete_hfont(font);
            log::error!("StatusLabel: CreateWindowExW failed for {role:?} '{text}': {err}");
            return Err(PlatformError::ControlCreationFailed(format!(
                "{role:?} control '{text}': {err}"
            )));
        }
    };

    let state = Box::new(StatusLabelState {
        role,
        text: text.to_string(),
        font,
    });
    unsafe {
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, Box::into_raw(state) as isize);
        SendMessageW(
            hwnd,
            WM_SETFONT,
            Some(WPARAM(font.0 as usize)),
            Some(LPARAM(0)),
        );
    }
    log::trace!("StatusLabel: Created {role:?} control {hwnd:?} (ID {control_id}) '{text}'");
    Ok(hwnd)
}

pub(crate) fn set_status_label_text(hwnd: HWND, text: &str) -> PlatformResult<()> {
    let state = state_ptr(hwnd);
    if state.is_null() {
        return Err(PlatformError::InvalidHandle(format!(
            "No status label state for {hwnd:?}"
        )));
    }
    unsafe {
        (*state).text = text.to_string();
        SetWindowTextW(hwnd, &HSTRING::from(text))?;
        let _ = InvalidateRect(Some(hwnd), None, true);
    }
    Ok(())
}

/*
 * Measures `text` with the control's own font. Returns `None` if no device
 * context could be obtained for the control.
 */
pub(crate) fn measure_text(hwnd: HWND, text: &str) -> Option<i32> {
    let state = state_ptr(hwnd);
    let hdc = unsafe { GetDC(Some(hwnd)) };
    if hdc.is_invalid() {
        log::warn!("StatusLabel: GetDC failed for {hwnd:?}; label width unknown");
        return None;
    }
    let wide: Vec<u16> = text.encode_utf16().collect();
    let mut size = SIZE::default();
    let measured = unsafe {
        let old_font = (!state.is_null()).then(|| SelectObject(hdc, (*state).font.into()));
        let ok = GetTextExtentPoint32W(hdc, &wide, &mut size).as_bool();
        if let Some(old_font) = old_font {
            SelectObject(hdc, old_font);
        }
        ReleaseDC(Some(hwnd), hdc);
        ok
    };
    measured.then_some(size.cx)
}

/// Replaces the control's font with one created for `dpi` and repaints it.
pub(crate) fn rescale_font(hwnd: HWND, font_desc: &FontDescription, dpi: DpiScale) {
    let state = state_ptr(hwnd);
    if state.is_null() {
        return;
    }
    match create_hfont(font_desc, dpi) {
        Ok(font) => unsafe {
            let old = std::mem::replace(&mut (*state).font, font);
            SendMessageW(hwnd, WM_SETFONT, Some(WPARAM(font.0 as usize)), Some(LPARAM(1)));
            delete_hfont(old);
            let _ = InvalidateRect(Some(hwnd), None, true);
        },
        Err(err) => log::error!("StatusLabel: Keeping old font for {hwnd:?}: {err}"),
    }
}

/// Frees the control's state. Safe to call more than once.
pub(crate) fn release_state(hwnd: HWND) {
    let state = state_ptr(hwnd);
    if !state.is_null() {
        unsafe {
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
            drop(Box::from_raw(state));
        }
    }
}

pub(crate) fn destroy_status_label(hwnd: HWND) {
    release_state(hwnd);
    if let Err(err) = unsafe { DestroyWindow(hwnd) } {
        // The bar window may already have destroyed its children.
        log::trace!("StatusLabel: DestroyWindow({hwnd:?}) failed: {err}");
    }
}

/*
 * Paints a status label in response to WM_DRAWITEM. Returns false if the
 * item is not one of our controls, in which case the caller passes the
 * message on.
 */
pub(crate) fn draw_item(dis: &DRAWITEMSTRUCT) -> bool {
    let state = state_ptr(dis.hwndItem);
    if state.is_null() {
        return false;
    }
    let state = unsafe { &*state };
    let hdc = dis.hDC;
    let mut rect: RECT = dis.rcItem;

    unsafe {
        let brush = CreateSolidBrush(color_to_colorref(&LABEL_BACKGROUND));
        FillRect(hdc, &rect, brush);
        let _ = DeleteObject(brush.into());

        let old_font = SelectObject(hdc, state.font.into());
        SetBkMode(hdc, TRANSPARENT);
        SetTextColor(hdc, color_to_colorref(&LABEL_TEXT_COLOR));
        let mut wide: Vec<u16> = state.text.encode_utf16().collect();
        DrawTextW(hdc, &mut wide, &mut rect, draw_text_format(state.role));
        SelectObject(hdc, old_font);
    }
    true
}

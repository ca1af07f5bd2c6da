/*
 * Converts the platform-agnostic styling primitives into native GDI values:
 * `Color` into `COLORREF` and `FontDescription` into an `HFONT` sized for a
 * given display scale.
 */

use crate::platform_layer::{
    dpi::DpiScale,
    error::{PlatformError, Result as PlatformResult},
    styling_primitives::{Color, FontDescription, FontWeight},
};
use windows::{
    Win32::{
        Foundation::{COLORREF, GetLastError},
        Graphics::Gdi::{
            CLIP_DEFAULT_PRECIS, CreateFontW, DEFAULT_CHARSET, DEFAULT_QUALITY, DeleteObject,
            FF_DONTCARE, FW_BOLD, FW_NORMAL, HFONT, OUT_DEFAULT_PRECIS,
        },
    },
    core::HSTRING,
};

const FALLBACK_FONT_NAME: &str = "MS Shell Dlg 2";

/*
 * Creates a Win32 COLORREF from the platform-agnostic `Color` struct.
 * Win32 expects colors in BGR format.
 */
pub(crate) fn color_to_colorref(color: &Color) -> COLORREF {
    COLORREF((color.r as u32) | ((color.g as u32) << 8) | ((color.b as u32) << 16))
}

/*
 * Creates an HFONT for `font_desc` at the given display scale. The point
 * size is converted with the scale's vertical DPI rather than the screen DC,
 * so per-monitor DPI changes produce correctly sized fonts. A missing size
 * lets the font mapper choose.
 */
pub(crate) fn create_hfont(font_desc: &FontDescription, dpi: DpiScale) -> PlatformResult<HFONT> {
    let logical_height = font_desc
        .size
        .map(|points| dpi.font_height_px(points))
        .unwrap_or(0);
    let weight = match font_desc.weight {
        Some(FontWeight::Bold) => FW_BOLD.0 as i32,
        _ => FW_NORMAL.0 as i32,
    };
    let name = HSTRING::from(font_desc.name.as_deref().unwrap_or(FALLBACK_FONT_NAME));

    let h_font = unsafe {
        CreateFontW(
            logical_height,
            0,
            0,
            0,
            weight,
            0,
            0,
            0,
            DEFAULT_CHARSET,
            OUT_DEFAULT_PRECIS,
            CLIP_DEFAULT_PRECIS,
            DEFAULT_QUALITY,
            FF_DONTCARE.0 as u32,
            &name,
        )
    };
    if h_font.is_invalid() {
        log::error!("StylingHandler: CreateFontW failed: {:?}", unsafe {
            GetLastError()
        });
        return Err(PlatformError::OperationFailed(
            "CreateFontW failed".to_string(),
        ));
    }
    log::trace!("StylingHandler: Created font {name} height {logical_height} for {dpi:?}");
    Ok(h_font)
}

pub(crate) fn delete_hfont(h_font: HFONT) {
    if !h_font.is_invalid() {
        unsafe {
            let _ = DeleteObject(h_font.into());
        }
    }
}

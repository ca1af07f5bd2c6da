/*
 * A minimal player frame hosting one info bar. The frame docks the bar at
 * its bottom edge with the size the bar asks for, republishes DPI changes
 * on the process bus and simulates a playback position with a timer.
 */

use player_info_bar::info_bar::{InfoBar, InfoBarConfig};
use player_info_bar::platform_layer::{
    DisplayEvent, DpiScale, FrameOperations, PlatformError, PlatformResult, Point,
    ThemeOperations, Win32InfoBarPlatform, create_info_bar, initialize_common_controls,
    process_bus, run_message_loop,
    styling_primitives::{Color, TooltipPalette},
};

use windows::{
    Win32::{
        Foundation::{GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, RECT, WPARAM},
        Graphics::Gdi::{BLACK_BRUSH, GetStockObject, HBRUSH},
        System::LibraryLoader::GetModuleHandleW,
        UI::{
            HiDpi::GetDpiForWindow,
            Input::KeyboardAndMouse::VK_F11,
            WindowsAndMessaging::{
                CS_HREDRAW, CS_VREDRAW, CW_USEDEFAULT, CreateWindowExW, DefWindowProcW,
                GetClientRect, HTCAPTION, IDC_ARROW, KillTimer, LoadCursorW, MoveWindow,
                PostMessageW, PostQuitMessage, RegisterClassW, SWP_NOACTIVATE, SWP_NOZORDER,
                SetTimer, SetWindowPos, WINDOW_EX_STYLE, WM_DESTROY, WM_DPICHANGED, WM_KEYDOWN,
                WM_NCLBUTTONDOWN, WM_SIZE, WM_TIMER, WNDCLASSW, WS_CLIPCHILDREN,
                WS_OVERLAPPEDWINDOW, WS_VISIBLE,
            },
        },
    },
    core::{PCWSTR, w},
};

use std::cell::{Cell, RefCell};
use std::rc::Rc;

type DemoBar = Rc<RefCell<InfoBar<Win32InfoBarPlatform>>>;

const FRAME_CLASS_NAME: PCWSTR = w!("PlayerInfoBarDemoFrame");
const POSITION_TIMER_ID: usize = 1;
const KEY_CLEAR: u16 = b'C' as u16;
const KEY_RESTORE: u16 = b'R' as u16;

const SAMPLE_LINES: &[(&str, &str)] = &[
    ("Title", "Big Buck Bunny"),
    ("Author", "Blender Foundation"),
    ("Video", "H.264 1920x1080 24fps"),
    ("Audio", "AAC 48000Hz stereo 192kbps"),
    (
        "Description",
        "A large and lovable rabbit deals with three tiny bullies, led by a flying squirrel, \
         who are determined to squelch his happiness.",
    ),
    ("Position", "00:00:00"),
];

struct DemoFrame {
    hwnd: Cell<HWND>,
    fullscreen: Cell<bool>,
}

impl FrameOperations for DemoFrame {
    fn is_fullscreen(&self) -> bool {
        self.fullscreen.get()
    }

    fn is_last_bar(&self) -> bool {
        true
    }

    fn dpi(&self) -> DpiScale {
        match unsafe { GetDpiForWindow(self.hwnd.get()) } {
            0 => DpiScale::default(),
            dpi => DpiScale::uniform(dpi),
        }
    }

    fn begin_caption_drag(&self, screen_point: Point) {
        let packed = ((screen_point.y as u16 as u32) << 16) | (screen_point.x as u16 as u32);
        if let Err(err) = unsafe {
            PostMessageW(
                Some(self.hwnd.get()),
                WM_NCLBUTTONDOWN,
                WPARAM(HTCAPTION as usize),
                LPARAM(packed as isize),
            )
        } {
            log::warn!("DemoFrame: Could not start caption drag: {err}");
        }
    }
}

struct DemoTheme {
    active: bool,
}

impl ThemeOperations for DemoTheme {
    fn is_theme_active(&self) -> bool {
        self.active
    }

    fn no_border_color(&self) -> Color {
        Color::rgb(0x20, 0x20, 0x20)
    }

    fn tooltip_palette(&self) -> TooltipPalette {
        TooltipPalette {
            background: Color::rgb(0x2B, 0x2B, 0x2B),
            text: Color::rgb(0xE0, 0xE0, 0xE0),
        }
    }
}

struct DemoState {
    frame: Rc<DemoFrame>,
    bar: DemoBar,
    elapsed_secs: Cell<u32>,
}

thread_local! {
    static DEMO: RefCell<Option<Rc<DemoState>>> = const { RefCell::new(None) };
}

fn demo_state() -> Option<Rc<DemoState>> {
    DEMO.with(|demo| demo.borrow().clone())
}

fn format_position(secs: u32) -> String {
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

// Moves the bar to the bottom of the frame, sized as the bar requests.
fn dock_bar(frame_hwnd: HWND, bar: &DemoBar) {
    let Ok((bar_hwnd, size)) = bar
        .try_borrow()
        .map(|bar| (bar.platform().hwnd(), bar.fixed_layout_size()))
    else {
        log::warn!("DemoFrame: Bar busy; docking skipped");
        return;
    };
    let Some(bar_hwnd) = bar_hwnd else {
        return;
    };
    let mut client = RECT::default();
    if unsafe { GetClientRect(frame_hwnd, &mut client) }.is_err() {
        return;
    }
    let top = client.bottom - size.height;
    if let Err(err) = unsafe { MoveWindow(bar_hwnd, 0, top, size.width, size.height, true) } {
        log::warn!("DemoFrame: MoveWindow for the bar failed: {err}");
    }
}

fn set_sample_lines(frame_hwnd: HWND, state: &DemoState) {
    let mut structure_changed = false;
    {
        let mut bar = state.bar.borrow_mut();
        for (label, value) in SAMPLE_LINES {
            match bar.set_line(label, value) {
                Ok(added) => structure_changed |= added,
                Err(e) => log::error!("DemoFrame: Could not set line '{label}': {e}"),
            }
        }
    }
    if structure_changed {
        dock_bar(frame_hwnd, &state.bar);
    }
}

fn on_key_down(frame_hwnd: HWND, state: &DemoState, key: u16) {
    match key {
        KEY_CLEAR => {
            state.bar.borrow_mut().remove_all_lines();
            dock_bar(frame_hwnd, &state.bar);
        }
        KEY_RESTORE => set_sample_lines(frame_hwnd, state),
        k if k == VK_F11.0 => {
            let fullscreen = !state.frame.fullscreen.get();
            state.frame.fullscreen.set(fullscreen);
            log::info!("DemoFrame: Simulated full screen {fullscreen}");
            if let Ok(mut bar) = state.bar.try_borrow_mut() {
                bar.on_size();
            }
        }
        _ => {}
    }
}

/*
 * Fonts are rescaled before the frame moves, so the WM_SIZE that follows
 * measures labels with the new fonts. The explicit relayout covers a
 * suggested rectangle that leaves the bar's size unchanged.
 */
fn apply_dpi_change(frame_hwnd: HWND, state: &DemoState, suggested: RECT) {
    process_bus().publish(DisplayEvent::DpiChanged);
    if let Err(err) = unsafe {
        SetWindowPos(
            frame_hwnd,
            None,
            suggested.left,
            suggested.top,
            suggested.right - suggested.left,
            suggested.bottom - suggested.top,
            SWP_NOZORDER | SWP_NOACTIVATE,
        )
    } {
        log::warn!("DemoFrame: SetWindowPos for the new DPI failed: {err}");
    }
    dock_bar(frame_hwnd, &state.bar);
    match state.bar.try_borrow_mut() {
        Ok(mut bar) => bar.on_size(),
        Err(_) => log::debug!("DemoFrame: Bar busy; DPI relayout skipped"),
    }
}

fn on_timer(state: &DemoState) {
    let secs = state.elapsed_secs.get() + 1;
    state.elapsed_secs.set(secs);
    if let Ok(mut bar) = state.bar.try_borrow_mut() {
        // Only updates an existing line; a cleared bar stays empty.
        if !bar.get_line("Position").is_empty() {
            if let Err(e) = bar.set_line("Position", &format_position(secs)) {
                log::warn!("DemoFrame: Position update failed: {e}");
            }
        }
    }
}

unsafe extern "system" fn frame_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let Some(state) = demo_state() else {
        return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
    };
    match msg {
        WM_SIZE => {
            dock_bar(hwnd, &state.bar);
            LRESULT(0)
        }
        WM_DPICHANGED => {
            let suggested = unsafe { *(lparam.0 as *const RECT) };
            apply_dpi_change(hwnd, &state, suggested);
            LRESULT(0)
        }
        WM_KEYDOWN => {
            on_key_down(hwnd, &state, wparam.0 as u16);
            LRESULT(0)
        }
        WM_TIMER if wparam.0 == POSITION_TIMER_ID => {
            on_timer(&state);
            LRESULT(0)
        }
        WM_DESTROY => {
            unsafe {
                let _ = KillTimer(Some(hwnd), POSITION_TIMER_ID);
            }
            DEMO.with(|demo| demo.borrow_mut().take());
            unsafe { PostQuitMessage(0) };
            LRESULT(0)
        }
        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}

fn create_frame_window(themed: bool) -> PlatformResult<HWND> {
    let h_instance = unsafe { GetModuleHandleW(PCWSTR::null()) }?;
    let wc = WNDCLASSW {
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(frame_wnd_proc),
        hInstance: HINSTANCE(h_instance.0),
        hCursor: unsafe { LoadCursorW(None, IDC_ARROW) }.unwrap_or_default(),
        hbrBackground: HBRUSH(unsafe { GetStockObject(BLACK_BRUSH) }.0),
        lpszClassName: FRAME_CLASS_NAME,
        ..Default::default()
    };
    if unsafe { RegisterClassW(&wc) } == 0 {
        return Err(PlatformError::InitializationFailed(format!(
            "RegisterClassW failed for the demo frame: {:?}",
            unsafe { GetLastError() }
        )));
    }
    let title = if themed {
        w!("Player Info Bar Demo (themed)")
    } else {
        w!("Player Info Bar Demo")
    };
    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            FRAME_CLASS_NAME,
            title,
            WS_OVERLAPPEDWINDOW | WS_VISIBLE | WS_CLIPCHILDREN,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            800,
            450,
            None,
            None,
            Some(HINSTANCE(h_instance.0)),
            None,
        )
    }?;
    Ok(hwnd)
}

/// Creates the frame and its info bar, then runs until the frame is closed.
pub fn run(config: InfoBarConfig) -> PlatformResult<()> {
    let themed = std::env::args().any(|arg| arg == "--themed");
    initialize_common_controls();

    let frame_hwnd = create_frame_window(themed)?;
    let frame = Rc::new(DemoFrame {
        hwnd: Cell::new(frame_hwnd),
        fullscreen: Cell::new(false),
    });
    let theme = Rc::new(DemoTheme { active: themed });
    let bar = create_info_bar(
        frame_hwnd,
        Rc::clone(&frame) as Rc<dyn FrameOperations>,
        theme,
        &process_bus(),
        config,
    )?;

    let state = Rc::new(DemoState {
        frame,
        bar: Rc::clone(&bar),
        elapsed_secs: Cell::new(0),
    });
    DEMO.with(|demo| *demo.borrow_mut() = Some(Rc::clone(&state)));
    set_sample_lines(frame_hwnd, &state);
    dock_bar(frame_hwnd, &bar);
    unsafe { SetTimer(Some(frame_hwnd), POSITION_TIMER_ID, 1000, None) };
    drop(state);

    run_message_loop(&bar)
}

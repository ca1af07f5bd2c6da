/*
 * The platform layer: portable primitives shared with the info bar core
 * (geometry, handles, errors, DPI scaling, styling, the display event bus
 * and tooltip bookkeeping) and, on Windows, the native backend built on
 * Win32 child windows and the common-controls tooltip class.
 */
pub mod dpi;
pub mod error;
pub mod event_bus;
pub mod styling_primitives;
pub mod tooltip_registry;
pub mod types;

#[cfg(target_os = "windows")]
pub mod app;
#[cfg(target_os = "windows")]
pub(crate) mod controls;
#[cfg(target_os = "windows")]
pub(crate) mod window_common;

#[cfg(target_os = "windows")]
pub use app::{
    Win32InfoBarPlatform, create_info_bar, initialize_common_controls, run_message_loop,
};
pub use dpi::DpiScale;
pub use error::{PlatformError, Result as PlatformResult};
pub use event_bus::{EventBus, Subscription, process_bus};
pub use types::{
    ControlHandle, ControlRole, DisplayEvent, FrameOperations, InfoBarPlatform, Point, Rect,
    RelayedMessage, Size, ThemeOperations, TooltipOperations, TooltipSettings, TooltipStyle,
};

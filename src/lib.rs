/*
 * The player info bar: a dockable panel of label/value lines for a media
 * player window.
 *
 * - `info_bar`: the bar itself, its layout and background rules and its
 *   persisted settings. Runs against the `InfoBarPlatform` trait.
 * - `platform_layer`: portable types and traits shared with the bar and, on
 *   Windows, the Win32 backend.
 * - `core`: configuration storage and application paths.
 * - `logging`: terminal and file logging setup.
 */
pub mod core;
pub mod info_bar;
pub mod logging;
pub mod platform_layer;

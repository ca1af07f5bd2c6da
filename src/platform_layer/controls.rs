// Native child controls of the info bar.
pub(crate) mod status_label_handler;
pub(crate) mod styling_handler;
pub(crate) mod tooltip_handler;

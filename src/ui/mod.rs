//! Terminal user interface: notifications, status line, panel rendering

pub mod notify;
pub mod panel;
pub mod status;

pub use panel::{NGX_PROJECT_WARNING, PanelAction, render};
pub use status::{PanelState, load_state};

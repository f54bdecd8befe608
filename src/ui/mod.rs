pub mod bindings;
pub mod panels;
pub mod theme;

pub use panels::{draw_debug_panel, draw_help_overlay};
pub use theme::apply_theme;

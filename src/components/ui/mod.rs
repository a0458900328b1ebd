pub mod button;
pub mod input;
pub mod notice;
pub mod panel;
pub mod reveal_input;
pub mod spinner;

// Re-export component symbols so callers can `use crate::components::ui::Button` etc.
pub use button::*;
pub use input::*;
pub use notice::*;
pub use panel::*;
pub use reveal_input::*;
pub use spinner::*;

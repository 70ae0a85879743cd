//! Host terminal integration.
//!
//! - **renderer**: `CrosstermDisplay`, the `LineDisplay` on a real terminal
//! - **keymapper**: crossterm key events to controller key presses

pub mod keymapper;
pub mod renderer;

pub use keymapper::KeyMapper;
pub use renderer::CrosstermDisplay;

//! Core session components.
//!
//! This module contains the résumé session logic, independent of any real
//! terminal:
//!
//! - **content**: command and section registries, validated at startup
//! - **display**: the `LineDisplay` capability and an in-memory display
//! - **input**: key presses and modifiers as the controller sees them
//! - **frame**: per-frame callback scheduling with stale-id suppression
//! - **typewriter**: one block of text being revealed character by character
//! - **session**: the controller tying input, dispatch and animation together
//!
//! # Architecture
//!
//! ```text
//! SessionController
//! ├── ContentStore (CommandRegistry + SectionRegistry)
//! ├── LineDisplay (terminal or in-memory buffer)
//! ├── FrameScheduler (pending frame id)
//! └── Typewriter (text, offset, completion)
//! ```

pub mod content;
pub mod display;
pub mod frame;
pub mod input;
pub mod session;
pub mod typewriter;

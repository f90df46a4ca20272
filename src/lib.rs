//! Input-mapping and progress-tracking core for a Dvorak typing trainer.
//!
//! The crate translates raw QWERTY keystrokes into Dvorak characters,
//! tracks per-line typing progress and correctness, scores finished
//! sessions, and persists session history. Rendering, dialogs, and event
//! delivery are host concerns: a frontend feeds key events into
//! [`session::LineSession`] and reads derived state back out.

pub mod config;
pub mod keymap;
pub mod scoring;
pub mod session;
pub mod store;
pub mod templates;

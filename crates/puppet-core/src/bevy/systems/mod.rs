//! Systems for the puppet session.
//!
//! Organized by functionality:
//! - input: Keyboard and touch state copied into the session
//! - session: The per-frame session tick and its messages

pub mod input;
pub mod session;

pub use input::*;
pub use session::*;

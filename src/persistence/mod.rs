//! Session persistence
//!
//! Features:
//! - Flat JSON session record
//! - Legacy key and history-shape tolerance on load
//! - Write to a temp file, then rename over the previous save
//! - Any unreadable save falls back to a fresh session

pub mod session;

pub use session::{SessionError, SessionRecord, default_session_path};

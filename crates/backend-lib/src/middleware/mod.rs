// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the registration app's authentication gate.

pub mod csrf;
pub mod session_gate;

pub use csrf::csrf_guard;
pub use session_gate::session_gate;

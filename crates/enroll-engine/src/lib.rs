//! Account store and verification engine: registration, sign-in gating,
//! code verification, and password reset over the local store. Every
//! operation is asynchronous, wraps its store access in a simulated
//! network delay, and reports back through structured outcomes instead
//! of raised errors.

pub mod codes;
pub mod engine;
pub mod error;
pub mod session;

pub use engine::{Engine, EngineConfig};
pub use error::FlowError;
pub use session::SessionManager;

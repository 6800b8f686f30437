//! Logic-thread side of the controller
//!
//! Owns everything that must be deferred rather than run inside a render pass.

mod service;

pub use service::{LogicHandle, LogicRequest, LogicRuntime};

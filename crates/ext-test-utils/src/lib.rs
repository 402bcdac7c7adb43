//! Shared test utilities for the typed-extensions workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`greeter`]: the `Greeter` test capability and its configurable
//!   implementation
//! - [`registry`]: [`TestRegistry`] builder for healthy and broken
//!   contributions
//! - [`capture`]: records `tracing` events emitted by a closure

pub mod capture;
pub mod greeter;
pub mod registry;

pub use capture::{CapturedEvent, capture_events};
pub use greeter::{Greeter, GreeterSpec, TestGreeter};
pub use registry::{TEST_ELEMENT, TEST_EXTENSION_POINT, TestRegistry};

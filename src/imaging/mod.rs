//! Grain and thumbnail renditions — pure Rust, zero external dependencies.
//!
//! The module is split into:
//! - **Calculations**: pure functions for crop geometry and the radial
//!   falloff mask (unit testable)
//! - **Backend**: [`GrainBackend`] trait + [`RustBackend`]
//!
//! The package assembler only sees the trait; tests use the recording
//! mock from [`backend`]'s test section.

pub mod backend;
mod calculations;
pub mod rust_backend;

pub use backend::{BackendError, GrainBackend};
pub use rust_backend::RustBackend;

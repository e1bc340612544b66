//! Prism engine crate.
//!
//! Owns the platform + GPU runtime pieces and the lit, textured cube renderer
//! driven by them.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod render;

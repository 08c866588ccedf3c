//! Core building blocks: run parameters and report flattening. These are
//! internal primitives consumed by the high-level `api` module.
pub mod flatten;
pub mod params;

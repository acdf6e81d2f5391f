//! Input loading.

pub mod loaders;

pub use loaders::*;

//! Precompute the inputs of a defocus simulation: a zero-padded intensity
//! matrix taken from an image and the complex pupil kernel, both as text.

pub mod cli;
pub mod error;
pub mod intensity;
pub mod kernel;
pub mod matrix;
pub mod params;
pub mod prepare;

pub use error::{Error, Result};

// Cost field and smoothing operators

pub mod cost_field;
pub mod gaussian_blur;

pub use cost_field::*;
pub use gaussian_blur::*;

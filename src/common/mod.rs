//! Common types, traits, and error definitions for gridnav
//!
//! This module provides the foundational building blocks shared by the
//! grid, the cost field and the search engine.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;

//! Pack layout generation
//!
//! Validation, grid placement, neighbour links, labels and pack aggregates.
//! Everything here is a pure function of its inputs.

pub mod aggregate;
pub mod generator;
pub mod label;
pub mod neighbors;
pub mod placement;
pub mod validate;

pub use generator::{generate, LayoutGenerator};

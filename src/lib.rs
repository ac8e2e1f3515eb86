//! Battery pack layout generator.
//!
//! Places cylindrical or prismatic cells on stacked layer grids, links
//! same-layer neighbours, aggregates the pack envelope, volume and weight, and
//! optionally derives the busbar topology and nominal electrical ratings.

pub mod busbar;
pub mod config;
pub mod domain;
pub mod electrical;
pub mod error;
pub mod form;
pub mod layout;
pub mod request;
pub mod telemetry;

pub use domain::*;
pub use error::{LayoutError, Result};
pub use layout::{generate, LayoutGenerator};
pub use request::{PackReport, PackRequest};

pub mod cell;
pub mod layer;
pub mod options;
pub mod pack;
pub mod shape;

pub use cell::*;
pub use layer::*;
pub use options::*;
pub use pack::*;
pub use shape::*;

pub mod builder;
pub mod chains;
pub mod error;
pub mod models;
pub mod registry;

pub use builder::*;
pub use error::*;
pub use models::*;
pub use registry::*;

// Driver Engine Module
// Static lookup of database vendors by JDBC URL or reported product name

pub mod error;
pub mod registry;
pub mod types;

pub use error::{EngineError, EngineResult};
pub use registry::DriverRegistry;
pub use types::*;

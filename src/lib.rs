// dbdriver - database vendor registry
// Core library

pub mod config;
pub mod engine;
pub mod observability;

pub use config::{ConfigError, DataSourceConfig};
pub use engine::{DatabaseDriver, DriverRecord, DriverRegistry, EngineError, EngineResult};

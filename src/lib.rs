pub mod config;
pub mod engine;
pub mod error;
pub mod fixtures;
pub mod inspect;
pub mod provider;
pub mod schema;

pub use config::FixtureConfig;
pub use engine::TestDatabase;
pub use error::{Result, TestbedError};
pub use schema::{ColumnType, FixtureTable, SampleRow};

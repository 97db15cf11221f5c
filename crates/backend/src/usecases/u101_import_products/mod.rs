pub mod csv_rows;
pub mod engine;
pub mod error;
pub mod executor;

pub use engine::BatchUpsertEngine;
pub use error::ImportError;
pub use executor::ImportExecutor;

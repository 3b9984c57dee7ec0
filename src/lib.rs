pub mod api;
pub mod cache;
pub mod config;
pub mod datasource;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod export;
pub mod orchestration;

pub use config::{Config, PnlSource};
pub use datasource::{DataSource, DataSourceError, MockDataSource, SqliteDataSource};
pub use db::{init_db, Repository};
pub use domain::{Asset, DebtSnapshot, Decimal, PnlRecord, Timestamp, Trade, Transfer};
pub use engine::{Aggregator, PnlTable};
pub use error::AppError;
pub use orchestration::{PnlService, RefreshState};

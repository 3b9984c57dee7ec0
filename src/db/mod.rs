//! Database module for SQLite operations.
//!
//! This module provides:
//! - Pool initialization with pragmas and schema migration
//! - Repository layer for the trades, transfers and market_debt tables

pub mod migrations;
pub mod repo;

pub use migrations::init_db;
pub use repo::{RepoError, Repository};

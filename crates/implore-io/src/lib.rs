//! implore-io - Data I/O for tabular scientific data
//!
//! This crate provides:
//!
//! - **DataTable**: a rectangular table with ordered, typed columns
//! - **CSV**: comma/tab-separated values with type inference
//!
//! # Design
//!
//! All readers implement the `DataReader` trait for uniform access.
//! Tables keep their column order, which callers may treat as meaningful.

pub mod reader;
pub mod schema;

#[cfg(feature = "csv")]
pub mod csv_reader;

pub use reader::*;
pub use schema::*;

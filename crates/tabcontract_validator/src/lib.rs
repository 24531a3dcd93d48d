//! # Tabular Data Contracts Validator
//!
//! Engine for tabular data contracts. This crate provides:
//!
//! - Contract inference from a dataset snapshot
//! - Validation (column presence, dtypes, missingness, ranges, categories)
//! - Drift comparison between two contracts
//! - Severity-based summarization of validation results
//!
//! Datasets are read through the [`TabularSource`] trait; [`DataSet`] and
//! [`RecordBatchSource`] implement it.
//!
//! ## Example
//!
//! ```rust
//! use tabcontract_core::SummaryOptions;
//! use tabcontract_validator::{infer, summarize, validate, Column, DataSet};
//!
//! let baseline = DataSet::new(vec![
//!     Column::int("age", [Some(25), Some(40), Some(31)]),
//!     Column::string("city", ["NYC", "SF", "LA"].map(Some)),
//! ])
//! .unwrap();
//! let contract = infer(&baseline).unwrap();
//!
//! let batch = DataSet::new(vec![
//!     Column::int("age", [Some(25), Some(150), Some(30)]),
//!     Column::string("city", ["NYC", "Paris", "LA"].map(Some)),
//! ])
//! .unwrap();
//!
//! let result = validate(&batch, &contract, true).unwrap();
//! let summary = summarize(&result, &SummaryOptions::default()).unwrap();
//!
//! if summary.ok {
//!     println!("Validation passed!");
//! } else {
//!     for issue in &summary.top_issues {
//!         println!("{}", issue);
//!     }
//! }
//! ```

mod arrow;
mod constraints;
mod dataset;
mod drift;
mod engine;
mod inference;
mod quality;
mod schema;
mod summary;

pub use arrow::*;
pub use constraints::*;
pub use dataset::*;
pub use drift::*;
pub use engine::*;
pub use inference::*;
pub use quality::*;
pub use schema::*;
pub use summary::*;

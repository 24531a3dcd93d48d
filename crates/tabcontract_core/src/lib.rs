//! # Tabular Data Contracts Core
//!
//! Core data structures and types for tabular data contracts.
//!
//! A data contract captures the structural and statistical expectations of a
//! tabular dataset so that later snapshots can be checked against it and
//! compared over time.
//!
//! ## Key Concepts
//!
//! - **DType**: the closed set of canonical column types
//! - **ColumnRule**: per-column expectations (type, missingness ceiling,
//!   numeric bounds or categorical domain)
//! - **Contract**: an ordered mapping from column name to `ColumnRule`
//! - **Issue / ValidationResult**: violations found when checking a dataset
//! - **DriftReport**: differences between two contracts
//! - **Summary**: issues ranked by severity
//!
//! ## Example
//!
//! ```rust
//! use tabcontract_core::{ColumnRuleBuilder, ContractBuilder, DType};
//!
//! let contract = ContractBuilder::new("user_events")
//!     .rule(ColumnRuleBuilder::new("age", DType::Integer).bounds(0.0, 120.0))
//!     .rule(
//!         ColumnRuleBuilder::new("country", DType::String)
//!             .max_missing_frac(0.1)
//!             .allowed_values(["FR", "DE", "IT"]),
//!     )
//!     .build()
//!     .expect("valid contract");
//!
//! assert_eq!(contract.column_names(), vec!["age", "country"]);
//! ```

mod bound;
pub mod builder;
pub mod contract;
pub mod dtype;
pub mod error;
pub mod report;
pub mod validator;

pub use builder::*;
pub use contract::*;
pub use dtype::*;
pub use error::*;
pub use report::*;
pub use validator::*;

//! File-based workflows for scripts and CI glue.
//!
//! These helpers combine persistence with the contract operations and return
//! `anyhow` errors carrying the path involved.

use crate::{DriftReport, TabularSource, ValidationResult};
use anyhow::{Context, Result};
use std::path::Path;
use tabcontract_core::Contract;
use tabcontract_parser::{parse_file, write_file};
use tracing::info;

/// Infers a contract from `dataset` and writes it to `path`.
///
/// The format follows the file extension (`.yaml`, `.yml`, `.toml`, `.json`).
pub fn infer_to_file<S: TabularSource + ?Sized>(
    dataset: &S,
    name: &str,
    path: &Path,
) -> Result<Contract> {
    let contract = crate::infer_contract_named(dataset, name)
        .context("Failed to infer contract from dataset")?;
    write_file(&contract, path)
        .with_context(|| format!("Failed to write contract file: {}", path.display()))?;
    info!("Wrote contract '{}' to {}", contract.name(), path.display());
    Ok(contract)
}

/// Loads the contract at `path` and validates `dataset` against it.
pub fn validate_against_file<S: TabularSource + ?Sized>(
    dataset: &S,
    path: &Path,
    strict: bool,
) -> Result<ValidationResult> {
    let contract = parse_file(path)
        .with_context(|| format!("Failed to parse contract file: {}", path.display()))?;
    crate::validate_contract(dataset, &contract, strict)
        .with_context(|| format!("Failed to validate against contract '{}'", contract.name()))
}

/// Compares two contract files, `baseline` first.
pub fn compare_files(baseline: &Path, current: &Path) -> Result<DriftReport> {
    let a = parse_file(baseline)
        .with_context(|| format!("Failed to parse contract file: {}", baseline.display()))?;
    let b = parse_file(current)
        .with_context(|| format!("Failed to parse contract file: {}", current.display()))?;
    crate::compare_contracts(&a, &b).context("Failed to compare contracts")
}

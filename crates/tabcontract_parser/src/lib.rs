//! Persistence for tabular data contracts (YAML/TOML/JSON formats).
//!
//! This module reads and writes [`Contract`]s, [`DriftReport`]s and
//! [`SummaryOptions`]. Contracts are checked for well-formedness while they
//! are parsed, so a successfully parsed contract is always usable.
//!
//! # Example
//!
//! ```rust
//! use tabcontract_parser::parse_yaml;
//!
//! let yaml = r#"
//! name: user_events
//! columns:
//!   age:
//!     dtype: integer
//!     max_missing_frac: 0.05
//!     min_value: 0
//!     max_value: 120
//!   country:
//!     dtype: string
//!     allowed_values: [FR, DE, IT]
//! "#;
//!
//! let contract = parse_yaml(yaml).expect("Failed to parse contract");
//! assert_eq!(contract.name(), "user_events");
//! assert_eq!(contract.column_names(), vec!["age", "country"]);
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use tabcontract_core::{Contract, ContractError, DriftReport, SummaryOptions};
use thiserror::Error;

/// Errors that can occur while reading or writing contracts.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing, serialization or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing, serialization or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// JSON parsing, serialization or deserialization failed
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Parsed content is well-typed but invalid
    #[error("Invalid content: {0}")]
    Invalid(#[from] ContractError),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported contract file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

/// Parse a contract from a YAML string.
pub fn parse_yaml(content: &str) -> Result<Contract> {
    let contract: Contract = serde_yaml_ng::from_str(content)?;
    Ok(contract)
}

/// Parse a contract from a TOML string.
///
/// # Example
///
/// ```rust
/// use tabcontract_parser::parse_toml;
///
/// let toml = r#"
/// name = "orders"
///
/// [columns.amount]
/// dtype = "float"
/// min_value = 0.0
///
/// [columns.status]
/// dtype = "categorical"
/// allowed_values = ["open", "closed"]
/// "#;
///
/// let contract = parse_toml(toml).unwrap();
/// assert_eq!(contract.len(), 2);
/// ```
pub fn parse_toml(content: &str) -> Result<Contract> {
    from_toml(content)
}

/// Parse a contract from a JSON string.
pub fn parse_json(content: &str) -> Result<Contract> {
    let contract: Contract = serde_json::from_str(content)?;
    Ok(contract)
}

/// Parse a contract from a string in the given format.
pub fn parse_str(content: &str, format: ContractFormat) -> Result<Contract> {
    match format {
        ContractFormat::Yaml => parse_yaml(content),
        ContractFormat::Toml => parse_toml(content),
        ContractFormat::Json => parse_json(content),
    }
}

/// Detect the contract format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `ContractFormat::Yaml`
/// * `.toml` → `ContractFormat::Toml`
/// * `.json` → `ContractFormat::Json`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<ContractFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(ContractFormat::Yaml),
        "toml" => Ok(ContractFormat::Toml),
        "json" => Ok(ContractFormat::Json),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a contract from a file with automatic format detection.
///
/// # Example
///
/// ```no_run
/// use tabcontract_parser::parse_file;
/// use std::path::Path;
///
/// let contract = parse_file(Path::new("contracts/user_events.yml")).unwrap();
/// println!("Loaded contract: {}", contract.name());
/// ```
pub fn parse_file(path: &Path) -> Result<Contract> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_str(&content, format)
}

/// Serialize a contract to YAML.
pub fn to_yaml(contract: &Contract) -> Result<String> {
    Ok(serde_yaml_ng::to_string(contract)?)
}

/// Serialize a contract to TOML.
pub fn to_toml(contract: &Contract) -> Result<String> {
    into_toml(contract)
}

/// Serialize a contract to pretty-printed JSON.
pub fn to_json(contract: &Contract) -> Result<String> {
    Ok(serde_json::to_string_pretty(contract)?)
}

/// Serialize a contract in the given format.
pub fn to_string(contract: &Contract, format: ContractFormat) -> Result<String> {
    match format {
        ContractFormat::Yaml => to_yaml(contract),
        ContractFormat::Toml => to_toml(contract),
        ContractFormat::Json => to_json(contract),
    }
}

/// Write a contract to a file, choosing the format from its extension.
///
/// The format is checked before anything is written.
pub fn write_file(contract: &Contract, path: &Path) -> Result<()> {
    let format = detect_format(path)?;
    let content = to_string(contract, format)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Parse a drift report from YAML.
pub fn parse_drift_report_yaml(content: &str) -> Result<DriftReport> {
    Ok(serde_yaml_ng::from_str(content)?)
}

/// Parse a drift report from JSON.
pub fn parse_drift_report_json(content: &str) -> Result<DriftReport> {
    Ok(serde_json::from_str(content)?)
}

/// Serialize a drift report to YAML.
pub fn drift_report_to_yaml(report: &DriftReport) -> Result<String> {
    Ok(serde_yaml_ng::to_string(report)?)
}

/// Serialize a drift report to pretty-printed JSON.
pub fn drift_report_to_json(report: &DriftReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Parse summary options from TOML and check them.
///
/// # Example
///
/// ```rust
/// use tabcontract_core::IssueKind;
/// use tabcontract_parser::parse_summary_options;
///
/// let options = parse_summary_options(
///     r#"
/// top_k = 3
///
/// [weights]
/// range = 100
/// "#,
/// )
/// .unwrap();
///
/// assert_eq!(options.top_k, 3);
/// assert_eq!(options.effective_weights().weight(IssueKind::Range), 100.0);
/// assert_eq!(options.effective_weights().weight(IssueKind::DType), 1.0);
/// ```
///
/// # Errors
///
/// Besides TOML errors, returns `ParserError::Invalid` for a zero `top_k` or
/// a non-positive weight.
pub fn parse_summary_options(content: &str) -> Result<SummaryOptions> {
    let options: SummaryOptions = from_toml(content)?;
    options.check()?;
    Ok(options)
}

fn from_toml<T: DeserializeOwned>(content: &str) -> Result<T> {
    toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))
}

fn into_toml<T: Serialize>(value: &T) -> Result<String> {
    toml::to_string(value).map_err(|e| ParserError::TomlError(e.to_string()))
}

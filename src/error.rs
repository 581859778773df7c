//! Crate-wide error kinds.
//!
//! Per-cell cast failures and per-row rule violations are never raised as
//! errors — they are data, folded into the null bitmap and the report
//! respectively. Only plan construction and reader I/O abort a run.

use snafu::Snafu;

/// Errors raised while building or finalizing a [`crate::plan::Plan`].
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PlanError {
    #[snafu(display("rule {rule} is not legal for column \"{column}\" of type {logical_type}"))]
    IllegalRuleForType {
        column: String,
        rule: &'static str,
        logical_type: &'static str,
    },

    #[snafu(display("duplicate column name \"{name}\""))]
    DuplicateColumnName { name: String },

    #[snafu(display("relation on column \"{column}\" targets unknown column \"{target}\""))]
    UnresolvedRelationTarget { column: String, target: String },

    #[snafu(display("invalid regex pattern for column \"{column}\": {source}"))]
    InvalidRegex {
        column: String,
        source: regex::Error,
    },

    #[snafu(display("invalid date format \"{format}\" for column \"{column}\""))]
    InvalidDateFormat { column: String, format: String },

    #[snafu(display("plan has already been finalized and cannot be modified"))]
    AlreadyFinalized,

    #[snafu(display("plan has no columns"))]
    EmptyPlan,
}

pub type PlanResult<T> = std::result::Result<T, PlanError>;

/// Errors raised by a [`crate::reader::Reader`] while driving an input source.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ReaderError {
    #[snafu(display("I/O error reading \"{path}\": {source}"))]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[snafu(display("row has {actual} columns, expected {expected}"))]
    ColumnCountMismatch { expected: usize, actual: usize },

    #[snafu(display("malformed CSV input: {source}"))]
    Csv { source: csv::Error },
}

pub type ReaderResult<T> = std::result::Result<T, ReaderError>;

/// Errors raised while running a plan against an input source.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum EngineError {
    #[snafu(display("reader error: {source}"))]
    Reader { source: ReaderError },

    #[snafu(display("plan error: {source}"))]
    Plan { source: PlanError },

    #[snafu(display(
        "column {column_index} of batch has {actual} rows, column 0 has {expected}"
    ))]
    RaggedBatch {
        column_index: usize,
        expected: usize,
        actual: usize,
    },
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Errors raised while loading a declarative TOML configuration (A4).
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConfigError {
    #[snafu(display("I/O error reading config \"{path}\": {source}"))]
    ConfigIo {
        path: String,
        source: std::io::Error,
    },

    #[snafu(display("malformed TOML in \"{path}\": {source}"))]
    Toml {
        path: String,
        source: toml::de::Error,
    },

    #[snafu(display("column \"{column}\" declares unknown type \"{logical_type}\""))]
    UnknownColumnType {
        column: String,
        logical_type: String,
    },

    #[snafu(display("column \"{column}\" declares unknown rule \"{rule}\""))]
    UnknownRule { column: String, rule: String },

    #[snafu(display("rule \"{rule}\" on column \"{column}\" is missing parameter \"{param}\""))]
    MissingRuleParameter {
        column: String,
        rule: String,
        param: &'static str,
    },

    #[snafu(display("config produced an invalid plan: {source}"))]
    InvalidPlan { source: PlanError },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

//! Column declarations (C4) and their compiled, finalized form.

use crate::rule::relation::Relation;
use crate::rule::{ColumnBuffer, Kernel, RuleSpec};
use crate::value::LogicalType;

/// A declared column, as assembled by the builder or the config loader,
/// before finalization.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub name: String,
    pub logical_type: LogicalType,
    pub rules: Vec<RuleSpec>,
    /// `strptime`-style format, required for `Date` columns only.
    pub date_format: Option<String>,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, logical_type: LogicalType) -> Self {
        Self {
            name: name.into(),
            logical_type,
            rules: Vec::new(),
            date_format: None,
        }
    }
}

/// A column after finalization: rule kernels instantiated, regexes
/// compiled, relation targets left unresolved by index (resolved by the
/// owning [`crate::plan::Plan`] once every column's position is known).
///
/// Single-pass rules live in `kernels`; the cross-column `Relation` rule is
/// kept out of that list, typed concretely rather than boxed, so the
/// engine can call its first-pass hook without downcasting a trait object.
pub struct CompiledColumn {
    pub name: String,
    pub logical_type: LogicalType,
    pub date_format: Option<String>,
    pub kernels: Vec<Box<dyn Kernel>>,
    pub relations: Vec<Relation>,
    pub buffer: ColumnBuffer,
}

impl CompiledColumn {
    pub fn new(name: String, logical_type: LogicalType, date_format: Option<String>) -> Self {
        Self {
            buffer: ColumnBuffer::new(logical_type),
            name,
            logical_type,
            date_format,
            kernels: Vec::new(),
            relations: Vec::new(),
        }
    }
}

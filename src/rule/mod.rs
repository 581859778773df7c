//! Rule kernels (C3): per-rule evaluators that consume a typed buffer and
//! return a per-row pass mask.
//!
//! Each kernel owns whatever cross-batch state it needs (last value for
//! monotonicity, seen-set for uniqueness, distinct-value set for a
//! relation); `apply_batch` is called once per batch, in declared order,
//! and must see every row — short-circuiting within a row is not
//! performed, so that per-rule counters stay independent.

pub mod date;
pub mod generic;
pub mod numeric;
pub mod relation;
pub mod string;

use crate::buffer::{DateBuffer, FloatBuffer, IntBuffer, RowMask, StringBuffer};
use crate::value::LogicalType;

/// A typed batch buffer, as produced by the codecs (C1) for one column.
pub enum ColumnBuffer {
    String(StringBuffer),
    Integer(IntBuffer),
    Float(FloatBuffer),
    Date(DateBuffer),
}

impl ColumnBuffer {
    pub fn new(logical_type: LogicalType) -> Self {
        match logical_type {
            LogicalType::String => ColumnBuffer::String(StringBuffer::default()),
            LogicalType::Integer => ColumnBuffer::Integer(IntBuffer::default()),
            LogicalType::Float => ColumnBuffer::Float(FloatBuffer::default()),
            LogicalType::Date => ColumnBuffer::Date(DateBuffer::default()),
        }
    }

    pub fn clear(&mut self) {
        match self {
            ColumnBuffer::String(b) => b.clear(),
            ColumnBuffer::Integer(b) => b.clear(),
            ColumnBuffer::Float(b) => b.clear(),
            ColumnBuffer::Date(b) => b.clear(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnBuffer::String(b) => b.len(),
            ColumnBuffer::Integer(b) => b.len(),
            ColumnBuffer::Float(b) => b.len(),
            ColumnBuffer::Date(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_valid(&self, i: usize) -> bool {
        match self {
            ColumnBuffer::String(b) => b.valid.get(i),
            ColumnBuffer::Integer(b) => b.valid.get(i),
            ColumnBuffer::Float(b) => b.valid.get(i),
            ColumnBuffer::Date(b) => b.valid.get(i),
        }
    }

    /// Render row `i`'s value for report sampling, regardless of type.
    pub fn display_value(&self, i: usize) -> String {
        if !self.is_valid(i) {
            return String::new();
        }
        match self {
            ColumnBuffer::String(b) => b.value(i).to_string(),
            ColumnBuffer::Integer(b) => b.values[i].to_string(),
            ColumnBuffer::Float(b) => b.values[i].to_string(),
            ColumnBuffer::Date(b) => b.values[i].to_string(),
        }
    }

    pub fn as_string(&self) -> &StringBuffer {
        match self {
            ColumnBuffer::String(b) => b,
            _ => panic!("column buffer is not a string buffer"),
        }
    }

    pub fn as_integer(&self) -> &IntBuffer {
        match self {
            ColumnBuffer::Integer(b) => b,
            _ => panic!("column buffer is not an integer buffer"),
        }
    }

    pub fn as_float(&self) -> &FloatBuffer {
        match self {
            ColumnBuffer::Float(b) => b,
            _ => panic!("column buffer is not a float buffer"),
        }
    }

    pub fn as_date(&self) -> &DateBuffer {
        match self {
            ColumnBuffer::Date(b) => b,
            _ => panic!("column buffer is not a date buffer"),
        }
    }
}

/// The per-rule evaluator. One instance per `(column, rule)` pair.
pub trait Kernel: std::fmt::Debug {
    /// The rule's name, as it appears in the report (the `rule_name` field).
    fn rule_name(&self) -> &'static str;

    /// A short human-readable rendering of the rule's parameters, for the
    /// report's `parameters` field.
    fn params_display(&self) -> String {
        String::new()
    }

    /// Evaluate every row of `buffer`, returning a pass/fail mask and
    /// updating any cross-batch state this kernel owns.
    fn apply_batch(&mut self, buffer: &ColumnBuffer) -> RowMask;

    /// Called once after all batches have been processed. Most kernels
    /// have nothing left to do; two-pass kernels (`Relation`) resolve their
    /// verdict by re-running `apply_batch` during the engine's second pass
    /// rather than deferring work here (see DESIGN.md).
    fn finalize(&mut self) {}
}

/// A tagged rule specification, as accepted by the fluent builder (C7) and
/// the config interop layer (A4). Carries its own parameters; the set of
/// logical types it accepts is enforced by `legal_for`.
#[derive(Debug, Clone)]
pub enum RuleSpec {
    // Generic
    IsNotNull,
    IsUnique,

    // Numeric
    Min(f64),
    Max(f64),
    Between(f64, f64),
    IsPositive,
    IsNegative,
    IsNonNegative,
    IsNonPositive,
    IsMonotonicallyIncreasing,
    IsMonotonicallyDecreasing,

    // String
    WithMinLength(usize),
    WithMaxLength(usize),
    WithLengthBetween(usize, usize),
    IsExactLength(usize),
    WithRegex {
        pattern: String,
        case_insensitive: bool,
    },
    IsNumeric,
    IsAlpha,
    IsAlphanumeric,
    IsLowercase,
    IsUppercase,
    IsUrl,
    IsEmail,
    IsUuid,
    IsIn(Vec<String>),

    // Date
    IsInPast,
    IsInFuture,
    IsNotInPast,
    IsNotInFuture,

    // Cross-column
    Relation { target_column: String },
}

impl RuleSpec {
    /// The rule's stable name, used in error messages and reports.
    pub fn name(&self) -> &'static str {
        match self {
            RuleSpec::IsNotNull => "is_not_null",
            RuleSpec::IsUnique => "is_unique",
            RuleSpec::Min(_) => "min",
            RuleSpec::Max(_) => "max",
            RuleSpec::Between(_, _) => "between",
            RuleSpec::IsPositive => "is_positive",
            RuleSpec::IsNegative => "is_negative",
            RuleSpec::IsNonNegative => "is_non_negative",
            RuleSpec::IsNonPositive => "is_non_positive",
            RuleSpec::IsMonotonicallyIncreasing => "is_monotonically_increasing",
            RuleSpec::IsMonotonicallyDecreasing => "is_monotonically_decreasing",
            RuleSpec::WithMinLength(_) => "with_min_length",
            RuleSpec::WithMaxLength(_) => "with_max_length",
            RuleSpec::WithLengthBetween(_, _) => "with_length_between",
            RuleSpec::IsExactLength(_) => "is_exact_length",
            RuleSpec::WithRegex { .. } => "with_regex",
            RuleSpec::IsNumeric => "is_numeric",
            RuleSpec::IsAlpha => "is_alpha",
            RuleSpec::IsAlphanumeric => "is_alphanumeric",
            RuleSpec::IsLowercase => "is_lowercase",
            RuleSpec::IsUppercase => "is_uppercase",
            RuleSpec::IsUrl => "is_url",
            RuleSpec::IsEmail => "is_email",
            RuleSpec::IsUuid => "is_uuid",
            RuleSpec::IsIn(_) => "is_in",
            RuleSpec::IsInPast => "is_in_past",
            RuleSpec::IsInFuture => "is_in_future",
            RuleSpec::IsNotInPast => "is_not_in_past",
            RuleSpec::IsNotInFuture => "is_not_in_future",
            RuleSpec::Relation { .. } => "relation",
        }
    }

    /// Whether this rule is legal for the given column type.
    pub fn legal_for(&self, logical_type: LogicalType) -> bool {
        use LogicalType::*;
        match self {
            RuleSpec::IsNotNull | RuleSpec::IsUnique => true,
            RuleSpec::Min(_)
            | RuleSpec::Max(_)
            | RuleSpec::Between(_, _)
            | RuleSpec::IsPositive
            | RuleSpec::IsNegative
            | RuleSpec::IsNonNegative
            | RuleSpec::IsNonPositive
            | RuleSpec::IsMonotonicallyIncreasing
            | RuleSpec::IsMonotonicallyDecreasing => matches!(logical_type, Integer | Float),
            RuleSpec::WithMinLength(_)
            | RuleSpec::WithMaxLength(_)
            | RuleSpec::WithLengthBetween(_, _)
            | RuleSpec::IsExactLength(_)
            | RuleSpec::WithRegex { .. }
            | RuleSpec::IsNumeric
            | RuleSpec::IsAlpha
            | RuleSpec::IsAlphanumeric
            | RuleSpec::IsLowercase
            | RuleSpec::IsUppercase
            | RuleSpec::IsUrl
            | RuleSpec::IsEmail
            | RuleSpec::IsUuid
            | RuleSpec::IsIn(_) => matches!(logical_type, String),
            RuleSpec::IsInPast
            | RuleSpec::IsInFuture
            | RuleSpec::IsNotInPast
            | RuleSpec::IsNotInFuture => matches!(logical_type, Date),
            RuleSpec::Relation { .. } => matches!(logical_type, String | Integer | Float),
        }
    }

    /// Whether this rule requires a second, relation-resolving pass over
    /// the input.
    pub fn is_two_pass(&self) -> bool {
        matches!(self, RuleSpec::Relation { .. })
    }
}

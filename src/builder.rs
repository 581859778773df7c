//! Fluent plan construction surface (C7). Each column kind exposes only
//! the rules legal for it, so illegal combinations are caught by the type
//! system at the call site rather than surfacing as a `PlanError` at
//! `finalize()` time — though `finalize()` still re-checks, since the
//! config loader (A4) builds `RuleSpec`s without going through here.

use crate::column::ColumnSpec;
use crate::error::PlanResult;
use crate::plan::Plan;
use crate::rule::RuleSpec;
use crate::value::LogicalType;

pub struct PlanBuilder {
    plan: Plan,
}

impl PlanBuilder {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            plan: Plan::new(table_name),
        }
    }

    pub fn string_column(self, name: impl Into<String>) -> StringColumnBuilder {
        StringColumnBuilder {
            parent: self,
            spec: ColumnSpec::new(name, LogicalType::String),
        }
    }

    pub fn integer_column(self, name: impl Into<String>) -> IntegerColumnBuilder {
        IntegerColumnBuilder {
            parent: self,
            spec: ColumnSpec::new(name, LogicalType::Integer),
        }
    }

    pub fn float_column(self, name: impl Into<String>) -> FloatColumnBuilder {
        FloatColumnBuilder {
            parent: self,
            spec: ColumnSpec::new(name, LogicalType::Float),
        }
    }

    pub fn date_column(self, name: impl Into<String>, format: impl Into<String>) -> DateColumnBuilder {
        let mut spec = ColumnSpec::new(name, LogicalType::Date);
        spec.date_format = Some(format.into());
        DateColumnBuilder {
            parent: self,
            spec,
        }
    }

    fn push_column(mut self, spec: ColumnSpec) -> PlanResult<Self> {
        self.plan.add_column(spec)?;
        Ok(self)
    }

    pub fn finalize(mut self) -> PlanResult<Plan> {
        self.plan.finalize()?;
        Ok(self.plan)
    }
}

macro_rules! generic_rules {
    () => {
        pub fn is_not_null(mut self) -> Self {
            self.spec.rules.push(RuleSpec::IsNotNull);
            self
        }

        pub fn is_unique(mut self) -> Self {
            self.spec.rules.push(RuleSpec::IsUnique);
            self
        }
    };
}

macro_rules! relation_rule {
    () => {
        pub fn relation(mut self, target_column: impl Into<String>) -> Self {
            self.spec.rules.push(RuleSpec::Relation {
                target_column: target_column.into(),
            });
            self
        }
    };
}

pub struct StringColumnBuilder {
    parent: PlanBuilder,
    spec: ColumnSpec,
}

impl StringColumnBuilder {
    generic_rules!();
    relation_rule!();

    pub fn with_min_length(mut self, n: usize) -> Self {
        self.spec.rules.push(RuleSpec::WithMinLength(n));
        self
    }

    pub fn with_max_length(mut self, n: usize) -> Self {
        self.spec.rules.push(RuleSpec::WithMaxLength(n));
        self
    }

    pub fn with_length_between(mut self, lo: usize, hi: usize) -> Self {
        self.spec.rules.push(RuleSpec::WithLengthBetween(lo, hi));
        self
    }

    pub fn is_exact_length(mut self, n: usize) -> Self {
        self.spec.rules.push(RuleSpec::IsExactLength(n));
        self
    }

    pub fn with_regex(mut self, pattern: impl Into<String>, case_insensitive: bool) -> Self {
        self.spec.rules.push(RuleSpec::WithRegex {
            pattern: pattern.into(),
            case_insensitive,
        });
        self
    }

    pub fn is_numeric(mut self) -> Self {
        self.spec.rules.push(RuleSpec::IsNumeric);
        self
    }

    pub fn is_alpha(mut self) -> Self {
        self.spec.rules.push(RuleSpec::IsAlpha);
        self
    }

    pub fn is_alphanumeric(mut self) -> Self {
        self.spec.rules.push(RuleSpec::IsAlphanumeric);
        self
    }

    pub fn is_lowercase(mut self) -> Self {
        self.spec.rules.push(RuleSpec::IsLowercase);
        self
    }

    pub fn is_uppercase(mut self) -> Self {
        self.spec.rules.push(RuleSpec::IsUppercase);
        self
    }

    pub fn is_url(mut self) -> Self {
        self.spec.rules.push(RuleSpec::IsUrl);
        self
    }

    pub fn is_email(mut self) -> Self {
        self.spec.rules.push(RuleSpec::IsEmail);
        self
    }

    pub fn is_uuid(mut self) -> Self {
        self.spec.rules.push(RuleSpec::IsUuid);
        self
    }

    pub fn is_in(mut self, values: Vec<String>) -> Self {
        self.spec.rules.push(RuleSpec::IsIn(values));
        self
    }

    pub fn end_column(self) -> PlanResult<PlanBuilder> {
        self.parent.push_column(self.spec)
    }
}

macro_rules! numeric_rules {
    () => {
        pub fn min(mut self, min: f64) -> Self {
            self.spec.rules.push(RuleSpec::Min(min));
            self
        }

        pub fn max(mut self, max: f64) -> Self {
            self.spec.rules.push(RuleSpec::Max(max));
            self
        }

        pub fn between(mut self, lo: f64, hi: f64) -> Self {
            self.spec.rules.push(RuleSpec::Between(lo, hi));
            self
        }

        pub fn is_positive(mut self) -> Self {
            self.spec.rules.push(RuleSpec::IsPositive);
            self
        }

        pub fn is_negative(mut self) -> Self {
            self.spec.rules.push(RuleSpec::IsNegative);
            self
        }

        pub fn is_non_negative(mut self) -> Self {
            self.spec.rules.push(RuleSpec::IsNonNegative);
            self
        }

        pub fn is_non_positive(mut self) -> Self {
            self.spec.rules.push(RuleSpec::IsNonPositive);
            self
        }

        pub fn is_monotonically_increasing(mut self) -> Self {
            self.spec.rules.push(RuleSpec::IsMonotonicallyIncreasing);
            self
        }

        pub fn is_monotonically_decreasing(mut self) -> Self {
            self.spec.rules.push(RuleSpec::IsMonotonicallyDecreasing);
            self
        }
    };
}

pub struct IntegerColumnBuilder {
    parent: PlanBuilder,
    spec: ColumnSpec,
}

impl IntegerColumnBuilder {
    generic_rules!();
    numeric_rules!();
    relation_rule!();

    pub fn end_column(self) -> PlanResult<PlanBuilder> {
        self.parent.push_column(self.spec)
    }
}

pub struct FloatColumnBuilder {
    parent: PlanBuilder,
    spec: ColumnSpec,
}

impl FloatColumnBuilder {
    generic_rules!();
    numeric_rules!();
    relation_rule!();

    pub fn end_column(self) -> PlanResult<PlanBuilder> {
        self.parent.push_column(self.spec)
    }
}

pub struct DateColumnBuilder {
    parent: PlanBuilder,
    spec: ColumnSpec,
}

impl DateColumnBuilder {
    generic_rules!();

    pub fn is_in_past(mut self) -> Self {
        self.spec.rules.push(RuleSpec::IsInPast);
        self
    }

    pub fn is_in_future(mut self) -> Self {
        self.spec.rules.push(RuleSpec::IsInFuture);
        self
    }

    pub fn is_not_in_past(mut self) -> Self {
        self.spec.rules.push(RuleSpec::IsNotInPast);
        self
    }

    pub fn is_not_in_future(mut self) -> Self {
        self.spec.rules.push(RuleSpec::IsNotInFuture);
        self
    }

    pub fn end_column(self) -> PlanResult<PlanBuilder> {
        self.parent.push_column(self.spec)
    }
}

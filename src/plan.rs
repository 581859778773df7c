//! Schema and rule plan (C4): the assembled set of columns and rules, and
//! its one-way transition from mutable declaration to finalized, immutable
//! execution plan.

use std::time::{SystemTime, UNIX_EPOCH};

use snafu::ResultExt;

use crate::column::{ColumnSpec, CompiledColumn};
use crate::error::{self, PlanResult};
use crate::rule::relation::Relation;
use crate::rule::{date, generic, numeric, string, Kernel, RuleSpec};
use crate::value::LogicalType;

/// Coordinates for one `Relation` rule: which column it targets, and where
/// its kernel lives within its owning column's `relations` vector.
#[derive(Debug, Clone, Copy)]
pub struct RelationLink {
    pub source_column: usize,
    pub target_column: usize,
    pub relation_index: usize,
}

/// A schema and rule declaration. Mutable until [`Plan::finalize`] is
/// called; every subsequent mutation attempt fails with
/// [`PlanError::AlreadyFinalized`].
pub struct Plan {
    table_name: String,
    columns: Vec<ColumnSpec>,
    compiled: Option<Compiled>,
}

impl std::fmt::Debug for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plan")
            .field("table_name", &self.table_name)
            .field("columns", &self.columns)
            .field("finalized", &self.compiled.is_some())
            .finish()
    }
}

struct Compiled {
    columns: Vec<CompiledColumn>,
    relation_links: Vec<RelationLink>,
    now: i64,
}

impl Plan {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            columns: Vec::new(),
            compiled: None,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn is_finalized(&self) -> bool {
        self.compiled.is_some()
    }

    pub fn add_column(&mut self, spec: ColumnSpec) -> PlanResult<()> {
        if self.is_finalized() {
            return error::AlreadyFinalizedSnafu.fail();
        }
        if self.columns.iter().any(|c| c.name == spec.name) {
            return error::DuplicateColumnNameSnafu { name: spec.name }.fail();
        }
        self.columns.push(spec);
        Ok(())
    }

    /// Validate every rule against its column's type, compile regexes,
    /// resolve relation targets, capture the reference timestamp, and
    /// allocate per-column buffers. Idempotent calls after the first fail.
    pub fn finalize(&mut self) -> PlanResult<()> {
        if self.is_finalized() {
            return error::AlreadyFinalizedSnafu.fail();
        }
        if self.columns.is_empty() {
            return error::EmptyPlanSnafu.fail();
        }

        let now = reference_now();
        let index_of: std::collections::HashMap<&str, usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.as_str(), i))
            .collect();

        let mut compiled_columns = Vec::with_capacity(self.columns.len());
        let mut relation_links = Vec::new();

        for (col_idx, spec) in self.columns.iter().enumerate() {
            if spec.logical_type == LogicalType::Date && spec.date_format.is_none() {
                return error::InvalidDateFormatSnafu {
                    column: spec.name.clone(),
                    format: String::new(),
                }
                .fail();
            }
            if let Some(format) = &spec.date_format {
                if !crate::value::validate_date_format(format) {
                    return error::InvalidDateFormatSnafu {
                        column: spec.name.clone(),
                        format: format.clone(),
                    }
                    .fail();
                }
            }

            let mut compiled = CompiledColumn::new(
                spec.name.clone(),
                spec.logical_type,
                spec.date_format.clone(),
            );

            for rule in &spec.rules {
                if !rule.legal_for(spec.logical_type) {
                    return error::IllegalRuleForTypeSnafu {
                        column: spec.name.clone(),
                        rule: rule.name(),
                        logical_type: spec.logical_type.name(),
                    }
                    .fail();
                }

                if let RuleSpec::Relation { target_column } = rule {
                    let target_idx = *index_of.get(target_column.as_str()).ok_or_else(|| {
                        error::UnresolvedRelationTargetSnafu {
                            column: spec.name.clone(),
                            target: target_column.clone(),
                        }
                        .build()
                    })?;
                    let relation_index = compiled.relations.len();
                    compiled.relations.push(Relation::new(target_column.clone()));
                    relation_links.push(RelationLink {
                        source_column: col_idx,
                        target_column: target_idx,
                        relation_index,
                    });
                    continue;
                }

                let kernel = build_kernel(rule, now, &spec.name)?;
                compiled.kernels.push(kernel);
            }

            compiled_columns.push(compiled);
        }

        self.compiled = Some(Compiled {
            columns: compiled_columns,
            relation_links,
            now,
        });
        Ok(())
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn compiled_columns(&mut self) -> &mut [CompiledColumn] {
        &mut self.compiled.as_mut().expect("plan is not finalized").columns
    }

    pub fn relation_links(&self) -> &[RelationLink] {
        &self.compiled.as_ref().expect("plan is not finalized").relation_links
    }

    pub fn reference_now(&self) -> i64 {
        self.compiled.as_ref().expect("plan is not finalized").now
    }
}

fn reference_now() -> i64 {
    if let Ok(raw) = std::env::var("DATAGUARD_NOW") {
        if let Ok(v) = raw.trim().parse::<i64>() {
            return v;
        }
    }
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn build_kernel(rule: &RuleSpec, now: i64, column: &str) -> PlanResult<Box<dyn Kernel>> {
    Ok(match rule {
        RuleSpec::IsNotNull => Box::new(generic::IsNotNull),
        RuleSpec::IsUnique => Box::<generic::IsUnique>::default(),

        RuleSpec::Min(min) => Box::new(numeric::Min { min: *min }),
        RuleSpec::Max(max) => Box::new(numeric::Max { max: *max }),
        RuleSpec::Between(lo, hi) => Box::new(numeric::Between { lo: *lo, hi: *hi }),
        RuleSpec::IsPositive => Box::<numeric::IsPositive>::default(),
        RuleSpec::IsNegative => Box::<numeric::IsNegative>::default(),
        RuleSpec::IsNonNegative => Box::<numeric::IsNonNegative>::default(),
        RuleSpec::IsNonPositive => Box::<numeric::IsNonPositive>::default(),
        RuleSpec::IsMonotonicallyIncreasing => {
            Box::<numeric::IsMonotonicallyIncreasing>::default()
        }
        RuleSpec::IsMonotonicallyDecreasing => {
            Box::<numeric::IsMonotonicallyDecreasing>::default()
        }

        RuleSpec::WithMinLength(n) => Box::new(string::WithMinLength { n: *n }),
        RuleSpec::WithMaxLength(n) => Box::new(string::WithMaxLength { n: *n }),
        RuleSpec::WithLengthBetween(lo, hi) => {
            Box::new(string::WithLengthBetween { lo: *lo, hi: *hi })
        }
        RuleSpec::IsExactLength(n) => Box::new(string::IsExactLength { n: *n }),
        RuleSpec::WithRegex {
            pattern,
            case_insensitive,
        } => Box::new(
            string::WithRegex::new(pattern, *case_insensitive).context(error::InvalidRegexSnafu {
                column: column.to_string(),
            })?,
        ),
        RuleSpec::IsNumeric => Box::<string::IsNumeric>::default(),
        RuleSpec::IsAlpha => Box::<string::IsAlpha>::default(),
        RuleSpec::IsAlphanumeric => Box::<string::IsAlphanumeric>::default(),
        RuleSpec::IsLowercase => Box::<string::IsLowercase>::default(),
        RuleSpec::IsUppercase => Box::<string::IsUppercase>::default(),
        RuleSpec::IsUrl => Box::<string::IsUrl>::default(),
        RuleSpec::IsEmail => Box::<string::IsEmail>::default(),
        RuleSpec::IsUuid => Box::<string::IsUuid>::default(),
        RuleSpec::IsIn(values) => Box::new(string::IsIn::new(values.clone())),

        RuleSpec::IsInPast => Box::new(date::IsInPast { now }),
        RuleSpec::IsInFuture => Box::new(date::IsInFuture { now }),
        RuleSpec::IsNotInPast => Box::new(date::IsNotInPast { now }),
        RuleSpec::IsNotInFuture => Box::new(date::IsNotInFuture { now }),

        RuleSpec::Relation { .. } => unreachable!("relation rules are compiled separately"),
    })
}

//! Declarative TOML configuration (A4): an interop layer that turns a
//! config file into a [`Plan`], kept outside the validation core's public
//! API surface. Also centralizes the env-var knobs the CLI reads.

use std::path::Path;

use serde::Deserialize;
use snafu::ResultExt;

use crate::column::ColumnSpec;
use crate::engine::EngineOptions;
use crate::error::{self, ConfigResult};
use crate::plan::Plan;
use crate::rule::RuleSpec;
use crate::value::LogicalType;

#[derive(Debug, Deserialize)]
struct RawConfig {
    table: RawTable,
    #[serde(default)]
    columns: Vec<RawColumn>,
}

#[derive(Debug, Deserialize)]
struct RawTable {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawColumn {
    name: String,
    #[serde(rename = "type")]
    logical_type: String,
    format: Option<String>,
    #[serde(default)]
    rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    rule: String,
    min: Option<f64>,
    max: Option<f64>,
    lo: Option<f64>,
    hi: Option<f64>,
    n: Option<usize>,
    pattern: Option<String>,
    #[serde(default)]
    case_insensitive: bool,
    values: Option<Vec<String>>,
    target_column: Option<String>,
}

/// Parse a TOML file into an unfinalized [`Plan`]. Call [`Plan::finalize`]
/// before running it.
pub fn load_plan(path: impl AsRef<Path>) -> ConfigResult<Plan> {
    let path = path.as_ref();
    let path_str = path.display().to_string();
    let raw = std::fs::read_to_string(path).context(error::ConfigIoSnafu {
        path: path_str.clone(),
    })?;
    parse_plan(&raw, &path_str)
}

fn parse_plan(raw: &str, path_str: &str) -> ConfigResult<Plan> {
    let config: RawConfig = toml::from_str(raw).context(error::TomlSnafu {
        path: path_str.to_string(),
    })?;

    let mut plan = Plan::new(config.table.name);
    for column in config.columns {
        let logical_type = parse_logical_type(&column.name, &column.logical_type)?;
        let mut spec = ColumnSpec::new(column.name.clone(), logical_type);
        spec.date_format = column.format;
        for rule in &column.rules {
            spec.rules.push(to_rule_spec(&column.name, rule)?);
        }
        plan.add_column(spec).context(error::InvalidPlanSnafu)?;
    }
    Ok(plan)
}

fn parse_logical_type(column: &str, raw: &str) -> ConfigResult<LogicalType> {
    match raw {
        "string" => Ok(LogicalType::String),
        "integer" => Ok(LogicalType::Integer),
        "float" => Ok(LogicalType::Float),
        "date" => Ok(LogicalType::Date),
        other => error::UnknownColumnTypeSnafu {
            column: column.to_string(),
            logical_type: other.to_string(),
        }
        .fail(),
    }
}

fn to_rule_spec(column: &str, raw: &RawRule) -> ConfigResult<RuleSpec> {
    let require_f64 = |field: Option<f64>, param: &'static str| {
        field.ok_or_else(|| {
            error::MissingRuleParameterSnafu {
                column: column.to_string(),
                rule: raw.rule.clone(),
                param,
            }
            .build()
        })
    };
    let require_usize = |field: Option<usize>, param: &'static str| {
        field.ok_or_else(|| {
            error::MissingRuleParameterSnafu {
                column: column.to_string(),
                rule: raw.rule.clone(),
                param,
            }
            .build()
        })
    };

    Ok(match raw.rule.as_str() {
        "is_not_null" => RuleSpec::IsNotNull,
        "is_unique" => RuleSpec::IsUnique,
        "min" => RuleSpec::Min(require_f64(raw.min, "min")?),
        "max" => RuleSpec::Max(require_f64(raw.max, "max")?),
        "between" => RuleSpec::Between(require_f64(raw.lo, "lo")?, require_f64(raw.hi, "hi")?),
        "is_positive" => RuleSpec::IsPositive,
        "is_negative" => RuleSpec::IsNegative,
        "is_non_negative" => RuleSpec::IsNonNegative,
        "is_non_positive" => RuleSpec::IsNonPositive,
        "is_monotonically_increasing" => RuleSpec::IsMonotonicallyIncreasing,
        "is_monotonically_decreasing" => RuleSpec::IsMonotonicallyDecreasing,
        "with_min_length" => RuleSpec::WithMinLength(require_usize(raw.n, "n")?),
        "with_max_length" => RuleSpec::WithMaxLength(require_usize(raw.n, "n")?),
        "with_length_between" => RuleSpec::WithLengthBetween(
            require_usize(raw.lo.map(|v| v as usize), "lo")?,
            require_usize(raw.hi.map(|v| v as usize), "hi")?,
        ),
        "is_exact_length" => RuleSpec::IsExactLength(require_usize(raw.n, "n")?),
        "with_regex" => RuleSpec::WithRegex {
            pattern: raw
                .pattern
                .clone()
                .ok_or_else(|| {
                    error::MissingRuleParameterSnafu {
                        column: column.to_string(),
                        rule: raw.rule.clone(),
                        param: "pattern",
                    }
                    .build()
                })?,
            case_insensitive: raw.case_insensitive,
        },
        "is_numeric" => RuleSpec::IsNumeric,
        "is_alpha" => RuleSpec::IsAlpha,
        "is_alphanumeric" => RuleSpec::IsAlphanumeric,
        "is_lowercase" => RuleSpec::IsLowercase,
        "is_uppercase" => RuleSpec::IsUppercase,
        "is_url" => RuleSpec::IsUrl,
        "is_email" => RuleSpec::IsEmail,
        "is_uuid" => RuleSpec::IsUuid,
        "is_in" => RuleSpec::IsIn(raw.values.clone().ok_or_else(|| {
            error::MissingRuleParameterSnafu {
                column: column.to_string(),
                rule: raw.rule.clone(),
                param: "values",
            }
            .build()
        })?),
        "is_in_past" => RuleSpec::IsInPast,
        "is_in_future" => RuleSpec::IsInFuture,
        "is_not_in_past" => RuleSpec::IsNotInPast,
        "is_not_in_future" => RuleSpec::IsNotInFuture,
        "relation" => RuleSpec::Relation {
            target_column: raw.target_column.clone().ok_or_else(|| {
                error::MissingRuleParameterSnafu {
                    column: column.to_string(),
                    rule: raw.rule.clone(),
                    param: "target_column",
                }
                .build()
            })?,
        },
        other => {
            return error::UnknownRuleSnafu {
                column: column.to_string(),
                rule: other.to_string(),
            }
            .fail()
        }
    })
}

/// Reads `DATAGUARD_BATCH_SIZE` and `DATAGUARD_SAMPLE_CAP`, falling back to
/// [`EngineOptions::default`] for whichever is unset or unparseable.
pub fn engine_options_from_env() -> EngineOptions {
    let defaults = EngineOptions::default();
    EngineOptions {
        batch_size: env_usize("DATAGUARD_BATCH_SIZE").unwrap_or(defaults.batch_size),
        sample_cap: env_usize("DATAGUARD_SAMPLE_CAP").unwrap_or(defaults.sample_cap),
    }
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok()?.trim().parse().ok()
}

//! Execution engine (C5): drives a reader through a finalized plan,
//! decoding raw cells, running rule kernels batch by batch, and folding
//! the results into a [`Report`].
//!
//! Cross-column `Relation` rules need the target column's complete
//! distinct-value set before they can judge a single row, so a plan with
//! any relation link is driven over the input twice: pass one builds that
//! set, pass two evaluates every rule. A plan with no relations runs in
//! one pass.

use std::sync::atomic::{AtomicBool, Ordering};

use snafu::ResultExt;
use tracing::{debug, info, warn};

use crate::error::{self, EngineResult};
use crate::plan::Plan;
use crate::reader::Reader;
use crate::report::{Report, RuleOutcome};
use crate::rule::{ColumnBuffer, Kernel};
use crate::value;

const TYPE_CHECK_RULE: &str = "type_check";

/// Tuning knobs threaded down from the CLI/config layer (A4/A5).
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    pub batch_size: usize,
    pub sample_cap: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            batch_size: 65536,
            sample_cap: 5,
        }
    }
}

pub fn run<F, R>(
    plan: &mut Plan,
    mut open_reader: F,
    options: EngineOptions,
    cancel: &AtomicBool,
) -> EngineResult<Report>
where
    F: FnMut() -> crate::error::ReaderResult<R>,
    R: Reader,
{
    assert!(plan.is_finalized(), "engine requires a finalized plan");

    let relation_links = plan.relation_links().to_vec();
    if !relation_links.is_empty() {
        info!(count = relation_links.len(), "running relation pre-pass");
        let mut reader = open_reader().context(error::ReaderSnafu)?;
        run_relation_prepass(plan, &mut reader, &relation_links, options.batch_size)?;
    }

    let mut reader = open_reader().context(error::ReaderSnafu)?;
    let column_count = plan.compiled_columns().len();

    let mut accum: Vec<Vec<RuleOutcome>> = plan
        .compiled_columns()
        .iter()
        .map(|c| vec![type_check_outcome(c.name.clone())])
        .collect();
    for (col, compiled) in plan.compiled_columns().iter().enumerate() {
        for kernel in &compiled.kernels {
            accum[col].push(RuleOutcome {
                column: compiled.name.clone(),
                rule_name: kernel.rule_name(),
                parameters: kernel.params_display(),
                passed: 0,
                considered: 0,
                samples: Vec::new(),
            });
        }
        for relation in &compiled.relations {
            accum[col].push(RuleOutcome {
                column: compiled.name.clone(),
                rule_name: relation.rule_name(),
                parameters: relation.params_display(),
                passed: 0,
                considered: 0,
                samples: Vec::new(),
            });
        }
    }

    let mut total_rows = 0usize;
    let mut cancelled = false;

    while let Some(batch) = reader.next_batch(options.batch_size).context(error::ReaderSnafu)? {
        if cancel.load(Ordering::Relaxed) {
            warn!("validation run cancelled");
            cancelled = true;
            break;
        }
        if batch.columns.len() != column_count {
            return error::RaggedBatchSnafu {
                column_index: 0usize,
                expected: column_count,
                actual: batch.columns.len(),
            }
            .fail();
        }
        let row_offset = total_rows;
        total_rows += batch.rows;

        for (col, compiled) in plan.compiled_columns().iter_mut().enumerate() {
            compiled.buffer.clear();
            let valid = decode_column(&mut compiled.buffer, compiled.date_format.as_deref(), &batch.columns[col]);

            let type_check = &mut accum[col][0];
            type_check.considered += compiled.buffer.len();
            type_check.passed += valid;
            for i in 0..compiled.buffer.len() {
                if !compiled.buffer.is_valid(i) && type_check.samples.len() < options.sample_cap {
                    type_check.samples.push((row_offset + i, batch.columns[col][i].clone()));
                }
            }

            let mut outcome_idx = 1;
            for kernel in &mut compiled.kernels {
                let mask = kernel.apply_batch(&compiled.buffer);
                fold_mask(&mut accum[col][outcome_idx], &mask, &compiled.buffer, row_offset, options.sample_cap);
                outcome_idx += 1;
            }
            for relation in &mut compiled.relations {
                let mask = relation.apply_batch(&compiled.buffer);
                fold_mask(&mut accum[col][outcome_idx], &mask, &compiled.buffer, row_offset, options.sample_cap);
                outcome_idx += 1;
            }
        }
    }

    debug!(total_rows, "validation run complete");

    Ok(Report {
        table_name: plan.table_name().to_string(),
        total_rows,
        outcomes: accum.into_iter().flatten().collect(),
        cancelled,
    })
}

fn type_check_outcome(column: String) -> RuleOutcome {
    RuleOutcome {
        column,
        rule_name: TYPE_CHECK_RULE,
        parameters: String::new(),
        passed: 0,
        considered: 0,
        samples: Vec::new(),
    }
}

fn fold_mask(
    outcome: &mut RuleOutcome,
    mask: &crate::buffer::RowMask,
    buffer: &ColumnBuffer,
    row_offset: usize,
    sample_cap: usize,
) {
    outcome.considered += mask.len();
    outcome.passed += mask.count_ones();
    for i in 0..mask.len() {
        if !mask.get(i) && outcome.samples.len() < sample_cap {
            outcome.samples.push((row_offset + i, buffer.display_value(i)));
        }
    }
}

fn decode_column(buffer: &mut ColumnBuffer, date_format: Option<&str>, raw: &[String]) -> usize {
    let mut valid_count = 0;
    match buffer {
        ColumnBuffer::String(b) => {
            for cell in raw {
                let (v, ok) = value::parse_string(cell);
                b.push(v, ok);
                valid_count += ok as usize;
            }
        }
        ColumnBuffer::Integer(b) => {
            for cell in raw {
                let (v, ok) = value::parse_integer(cell);
                b.push(v, ok);
                valid_count += ok as usize;
            }
        }
        ColumnBuffer::Float(b) => {
            for cell in raw {
                let (v, ok) = value::parse_float(cell);
                b.push(v, ok);
                valid_count += ok as usize;
            }
        }
        ColumnBuffer::Date(b) => {
            let format = date_format.expect("date column always carries a format");
            for cell in raw {
                let (v, ok) = value::parse_date(cell, format);
                b.push(v, ok);
                valid_count += ok as usize;
            }
        }
    }
    valid_count
}

fn run_relation_prepass<R: Reader>(
    plan: &mut Plan,
    reader: &mut R,
    relation_links: &[crate::plan::RelationLink],
    batch_size: usize,
) -> EngineResult<()> {
    while let Some(batch) = reader.next_batch(batch_size).context(error::ReaderSnafu)? {
        let mut scratch: Vec<Option<ColumnBuffer>> = (0..plan.compiled_columns().len())
            .map(|_| None)
            .collect();
        for link in relation_links {
            let target = link.target_column;
            if scratch[target].is_none() {
                let compiled = &plan.compiled_columns()[target];
                let mut buffer = ColumnBuffer::new(compiled.logical_type);
                decode_column(&mut buffer, compiled.date_format.as_deref(), &batch.columns[target]);
                scratch[target] = Some(buffer);
            }
        }
        for link in relation_links {
            let buffer = scratch[link.target_column].as_ref().expect("decoded above");
            plan.compiled_columns()[link.source_column].relations[link.relation_index]
                .observe_target_batch(buffer);
        }
    }
    Ok(())
}

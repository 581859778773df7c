//! Cross-column `Relation` kernel: checks that every value in a column
//! appears somewhere in a named target column.
//!
//! Evaluated in two passes. The first pass scans the target column across
//! every batch, accumulating its distinct values via [`Relation::observe_target_batch`].
//! The second pass runs `apply_batch` against the source column, testing
//! membership against the now-complete set. The engine drives both passes;
//! this kernel only ever sees one column's buffer at a time.

use hashbrown::HashSet;

use super::generic::Canon;
use super::{ColumnBuffer, Kernel};
use crate::buffer::RowMask;

#[derive(Debug)]
pub struct Relation {
    target_column: String,
    distinct: HashSet<Canon>,
}

impl Relation {
    pub fn new(target_column: String) -> Self {
        Self {
            target_column,
            distinct: HashSet::new(),
        }
    }

    pub fn target_column(&self) -> &str {
        &self.target_column
    }

    /// First-pass hook: fold a batch of the target column's values into
    /// the distinct-value set. Null rows contribute nothing.
    pub fn observe_target_batch(&mut self, buffer: &ColumnBuffer) {
        for i in 0..buffer.len() {
            if buffer.is_valid(i) {
                self.distinct.insert(Canon::of(buffer, i));
            }
        }
    }
}

impl Kernel for Relation {
    fn rule_name(&self) -> &'static str {
        "relation"
    }

    fn params_display(&self) -> String {
        format!("target_column={}", self.target_column)
    }

    fn apply_batch(&mut self, buffer: &ColumnBuffer) -> RowMask {
        let mut mask = RowMask::with_capacity(buffer.len());
        for i in 0..buffer.len() {
            if !buffer.is_valid(i) {
                mask.push(false);
                continue;
            }
            mask.push(self.distinct.contains(&Canon::of(buffer, i)));
        }
        mask
    }
}

//! Date kernels: legal on `Date` columns.
//!
//! Each kernel is given the reference instant (Unix-epoch seconds) once,
//! at plan finalization, rather than reading the system clock per row —
//! this is what lets a run be pinned deterministically via an env var.

use super::{ColumnBuffer, Kernel};
use crate::buffer::RowMask;

fn mask_by<F: Fn(i64) -> bool>(buffer: &ColumnBuffer, pred: F) -> RowMask {
    let db = buffer.as_date();
    let mut mask = RowMask::with_capacity(db.len());
    for i in 0..db.len() {
        if !db.valid.get(i) {
            mask.push(false);
            continue;
        }
        mask.push(pred(db.values[i]));
    }
    mask
}

#[derive(Debug)]
pub struct IsInPast {
    pub now: i64,
}

impl Kernel for IsInPast {
    fn rule_name(&self) -> &'static str {
        "is_in_past"
    }

    fn apply_batch(&mut self, buffer: &ColumnBuffer) -> RowMask {
        mask_by(buffer, |v| v < self.now)
    }
}

#[derive(Debug)]
pub struct IsInFuture {
    pub now: i64,
}

impl Kernel for IsInFuture {
    fn rule_name(&self) -> &'static str {
        "is_in_future"
    }

    fn apply_batch(&mut self, buffer: &ColumnBuffer) -> RowMask {
        mask_by(buffer, |v| v > self.now)
    }
}

#[derive(Debug)]
pub struct IsNotInPast {
    pub now: i64,
}

impl Kernel for IsNotInPast {
    fn rule_name(&self) -> &'static str {
        "is_not_in_past"
    }

    fn apply_batch(&mut self, buffer: &ColumnBuffer) -> RowMask {
        mask_by(buffer, |v| v >= self.now)
    }
}

#[derive(Debug)]
pub struct IsNotInFuture {
    pub now: i64,
}

impl Kernel for IsNotInFuture {
    fn rule_name(&self) -> &'static str {
        "is_not_in_future"
    }

    fn apply_batch(&mut self, buffer: &ColumnBuffer) -> RowMask {
        mask_by(buffer, |v| v <= self.now)
    }
}

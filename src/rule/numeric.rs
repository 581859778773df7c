//! Numeric kernels: legal on `Integer` and `Float` columns.
//!
//! Bounds are compared as `f64`; `Integer` values are widened losslessly for
//! any value that fits the typical range of validated data (outside
//! ±2^53 the comparison loses precision, a documented limitation — see
//! DESIGN.md).

use super::{ColumnBuffer, Kernel};
use crate::buffer::RowMask;

#[inline]
fn numeric_value(buffer: &ColumnBuffer, i: usize) -> f64 {
    match buffer {
        ColumnBuffer::Integer(b) => b.values[i] as f64,
        ColumnBuffer::Float(b) => b.values[i],
        _ => panic!("numeric kernel applied to a non-numeric buffer"),
    }
}

fn mask_by<F: Fn(f64) -> bool>(buffer: &ColumnBuffer, pred: F) -> RowMask {
    let mut mask = RowMask::with_capacity(buffer.len());
    for i in 0..buffer.len() {
        if !buffer.is_valid(i) {
            mask.push(false);
            continue;
        }
        mask.push(pred(numeric_value(buffer, i)));
    }
    mask
}

macro_rules! simple_numeric_kernel {
    ($name:ident, $rule_name:literal, $pred:expr) => {
        #[derive(Debug, Default)]
        pub struct $name;

        impl Kernel for $name {
            fn rule_name(&self) -> &'static str {
                $rule_name
            }

            fn apply_batch(&mut self, buffer: &ColumnBuffer) -> RowMask {
                mask_by(buffer, $pred)
            }
        }
    };
}

simple_numeric_kernel!(IsPositive, "is_positive", |v: f64| v > 0.0);
simple_numeric_kernel!(IsNegative, "is_negative", |v: f64| v < 0.0);
simple_numeric_kernel!(IsNonNegative, "is_non_negative", |v: f64| v >= 0.0);
simple_numeric_kernel!(IsNonPositive, "is_non_positive", |v: f64| v <= 0.0);

/// Inclusive lower bound.
#[derive(Debug)]
pub struct Min {
    pub min: f64,
}

impl Kernel for Min {
    fn rule_name(&self) -> &'static str {
        "min"
    }

    fn params_display(&self) -> String {
        format!("min={}", self.min)
    }

    fn apply_batch(&mut self, buffer: &ColumnBuffer) -> RowMask {
        mask_by(buffer, |v| v >= self.min)
    }
}

/// Inclusive upper bound.
#[derive(Debug)]
pub struct Max {
    pub max: f64,
}

impl Kernel for Max {
    fn rule_name(&self) -> &'static str {
        "max"
    }

    fn params_display(&self) -> String {
        format!("max={}", self.max)
    }

    fn apply_batch(&mut self, buffer: &ColumnBuffer) -> RowMask {
        mask_by(buffer, |v| v <= self.max)
    }
}

/// Inclusive `[lo, hi]` bound.
#[derive(Debug)]
pub struct Between {
    pub lo: f64,
    pub hi: f64,
}

impl Kernel for Between {
    fn rule_name(&self) -> &'static str {
        "between"
    }

    fn params_display(&self) -> String {
        format!("lo={}, hi={}", self.lo, self.hi)
    }

    fn apply_batch(&mut self, buffer: &ColumnBuffer) -> RowMask {
        mask_by(buffer, |v| v >= self.lo && v <= self.hi)
    }
}

/// Weak monotonicity (equal adjacents allowed). Null rows are skipped: they
/// neither pass nor break the chain, and are reported as failures via this
/// kernel's own mask (see DESIGN.md for the null-accounting rationale). The
/// last observed non-null value is carried as cross-batch state.
#[derive(Debug, Default)]
pub struct IsMonotonicallyIncreasing {
    last: Option<f64>,
}

impl Kernel for IsMonotonicallyIncreasing {
    fn rule_name(&self) -> &'static str {
        "is_monotonically_increasing"
    }

    fn apply_batch(&mut self, buffer: &ColumnBuffer) -> RowMask {
        let mut mask = RowMask::with_capacity(buffer.len());
        for i in 0..buffer.len() {
            if !buffer.is_valid(i) {
                mask.push(false);
                continue;
            }
            let v = numeric_value(buffer, i);
            let ok = match self.last {
                Some(prev) => v >= prev,
                None => true,
            };
            mask.push(ok);
            self.last = Some(v);
        }
        mask
    }
}

/// Weak monotonicity, decreasing. See [`IsMonotonicallyIncreasing`].
#[derive(Debug, Default)]
pub struct IsMonotonicallyDecreasing {
    last: Option<f64>,
}

impl Kernel for IsMonotonicallyDecreasing {
    fn rule_name(&self) -> &'static str {
        "is_monotonically_decreasing"
    }

    fn apply_batch(&mut self, buffer: &ColumnBuffer) -> RowMask {
        let mut mask = RowMask::with_capacity(buffer.len());
        for i in 0..buffer.len() {
            if !buffer.is_valid(i) {
                mask.push(false);
                continue;
            }
            let v = numeric_value(buffer, i);
            let ok = match self.last {
                Some(prev) => v <= prev,
                None => true,
            };
            mask.push(ok);
            self.last = Some(v);
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::IntBuffer;

    fn int_buffer(values: &[Option<i64>]) -> ColumnBuffer {
        let mut b = IntBuffer::default();
        for v in values {
            match v {
                Some(x) => b.push(*x, true),
                None => b.push(0, false),
            }
        }
        ColumnBuffer::Integer(b)
    }

    #[test]
    fn between_scenario() {
        let buf = int_buffer(&[Some(1), Some(2), Some(3), Some(5), Some(6), None]);
        let mut kernel = Between { lo: 2.0, hi: 5.0 };
        let mask = kernel.apply_batch(&buf);
        assert_eq!(mask.count_ones(), 3);
        assert!(!mask.get(0));
        assert!(mask.get(1) && mask.get(2) && mask.get(3));
        assert!(!mask.get(4));
        assert!(!mask.get(5));
    }

    #[test]
    fn monotonic_increasing_scenario() {
        let buf = int_buffer(&[Some(1), Some(2), Some(2), Some(4), Some(3), None, Some(5)]);
        let mut kernel = IsMonotonicallyIncreasing::default();
        let mask = kernel.apply_batch(&buf);
        // row 4 (value 3) is the sole monotonicity violation; row 5 (null)
        // fails this mask too, but is accounted separately by TypeCheck.
        assert!(mask.get(0) && mask.get(1) && mask.get(2) && mask.get(3));
        assert!(!mask.get(4));
        assert!(!mask.get(5));
        assert!(mask.get(6));
    }

    #[test]
    fn monotonic_carries_state_across_batches() {
        let mut kernel = IsMonotonicallyIncreasing::default();
        let batch1 = int_buffer(&[Some(1), Some(3)]);
        let mask1 = kernel.apply_batch(&batch1);
        assert!(mask1.get(0) && mask1.get(1));

        let batch2 = int_buffer(&[Some(2), Some(5), Some(6)]);
        let mask2 = kernel.apply_batch(&batch2);
        assert!(!mask2.get(0)); // 2 < 3 (last from batch1)
        assert!(mask2.get(1) && mask2.get(2));
    }

    #[test]
    fn batch_size_invariance_for_monotonicity() {
        let values = [1i64, 3, 2, 5, 6];
        let run = |batch_size: usize| -> Vec<bool> {
            let mut kernel = IsMonotonicallyIncreasing::default();
            let mut out = Vec::new();
            for chunk in values.chunks(batch_size) {
                let buf = int_buffer(&chunk.iter().map(|v| Some(*v)).collect::<Vec<_>>());
                let mask = kernel.apply_batch(&buf);
                out.extend((0..mask.len()).map(|i| mask.get(i)));
            }
            out
        };
        assert_eq!(run(2), run(1024));
        assert_eq!(run(2).iter().filter(|&&b| !b).count(), 1);
    }
}

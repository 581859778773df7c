//! Generic kernels: legal on any column type.

use hashbrown::HashSet;

use super::{ColumnBuffer, Kernel};
use crate::buffer::RowMask;

/// Fails rows where the column's validity bit is unset.
#[derive(Debug, Default)]
pub struct IsNotNull;

impl Kernel for IsNotNull {
    fn rule_name(&self) -> &'static str {
        "is_not_null"
    }

    fn apply_batch(&mut self, buffer: &ColumnBuffer) -> RowMask {
        let mut mask = RowMask::with_capacity(buffer.len());
        for i in 0..buffer.len() {
            mask.push(buffer.is_valid(i));
        }
        mask
    }
}

/// A hashable canonical representation of a cell's value, used so
/// `IsUnique` can compare across the four logical types uniformly without
/// the ambiguity of formatting floats as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Canon {
    Str(String),
    Int(i64),
    FloatBits(u64),
    Date(i64),
}

impl Canon {
    pub(crate) fn of(buffer: &ColumnBuffer, i: usize) -> Self {
        match buffer {
            ColumnBuffer::String(b) => Canon::Str(b.value(i).to_string()),
            ColumnBuffer::Integer(b) => Canon::Int(b.values[i]),
            ColumnBuffer::Float(b) => Canon::FloatBits(b.values[i].to_bits()),
            ColumnBuffer::Date(b) => Canon::Date(b.values[i]),
        }
    }
}

/// Maintains a hash set of canonical value representations across all
/// batches; fails rows whose value has been seen before. Null rows fail by
/// default (see DESIGN.md).
#[derive(Debug, Default)]
pub struct IsUnique {
    seen: HashSet<Canon>,
}

impl Kernel for IsUnique {
    fn rule_name(&self) -> &'static str {
        "is_unique"
    }

    fn apply_batch(&mut self, buffer: &ColumnBuffer) -> RowMask {
        let mut mask = RowMask::with_capacity(buffer.len());
        for i in 0..buffer.len() {
            if !buffer.is_valid(i) {
                mask.push(false);
                continue;
            }
            let key = Canon::of(buffer, i);
            let first_sighting = self.seen.insert(key);
            mask.push(first_sighting);
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::StringBuffer;

    fn string_buffer(values: &[Option<&str>]) -> ColumnBuffer {
        let mut b = StringBuffer::default();
        b.clear();
        for v in values {
            match v {
                Some(s) => b.push(s, true),
                None => b.push("", false),
            }
        }
        ColumnBuffer::String(b)
    }

    #[test]
    fn is_not_null_basic() {
        let buf = string_buffer(&[Some("a"), None, Some("b")]);
        let mask = IsNotNull.apply_batch(&buf);
        assert_eq!(mask.count_ones(), 2);
        assert!(mask.get(0));
        assert!(!mask.get(1));
    }

    #[test]
    fn is_unique_duplicates_and_nulls_fail() {
        let buf = string_buffer(&[Some("1"), Some("2"), Some("3"), Some("1"), Some("2"), None, None]);
        let mut kernel = IsUnique::default();
        let mask = kernel.apply_batch(&buf);
        assert_eq!(mask.count_ones(), 3);
        assert!(mask.get(0) && mask.get(1) && mask.get(2));
        assert!(!mask.get(3) && !mask.get(4));
        assert!(!mask.get(5) && !mask.get(6));
    }

    #[test]
    fn is_unique_state_persists_across_batches() {
        let mut kernel = IsUnique::default();
        let batch1 = string_buffer(&[Some("a"), Some("b")]);
        let mask1 = kernel.apply_batch(&batch1);
        assert_eq!(mask1.count_ones(), 2);

        let batch2 = string_buffer(&[Some("a"), Some("c")]);
        let mask2 = kernel.apply_batch(&batch2);
        assert!(!mask2.get(0));
        assert!(mask2.get(1));
    }
}

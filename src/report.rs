//! Validation report (C6) and its table rendering (A6).

use comfy_table::{Cell, Table};

/// Outcome of one `(column, rule)` pair over the whole run.
#[derive(Debug, Clone)]
pub struct RuleOutcome {
    pub column: String,
    pub rule_name: &'static str,
    pub parameters: String,
    pub passed: usize,
    pub considered: usize,
    /// `(row index, value)` pairs for a handful of the rows that failed.
    pub samples: Vec<(usize, String)>,
}

impl RuleOutcome {
    pub fn failed(&self) -> usize {
        self.considered - self.passed
    }
}

/// The complete outcome of a validation run.
#[derive(Debug, Clone)]
pub struct Report {
    pub table_name: String,
    pub total_rows: usize,
    pub outcomes: Vec<RuleOutcome>,
    pub cancelled: bool,
}

impl Report {
    /// `(rules fully passed, total rules)`: how many `(column, rule)`
    /// outcomes had zero failing rows, out of how many there were.
    pub fn passed(&self) -> (usize, usize) {
        let passed = self.outcomes.iter().filter(|o| o.failed() == 0).count();
        (passed, self.outcomes.len())
    }

    pub fn is_clean(&self) -> bool {
        let (passed, total) = self.passed();
        !self.cancelled && passed == total
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.set_header(vec![
            "column",
            "rule",
            "parameters",
            "passed",
            "considered",
            "samples",
        ]);
        for outcome in &self.outcomes {
            let status = if outcome.failed() == 0 {
                Cell::new(outcome.passed.to_string())
            } else {
                Cell::new(format!("{} (!)", outcome.passed))
            };
            table.add_row(vec![
                Cell::new(&outcome.column),
                Cell::new(outcome.rule_name),
                Cell::new(&outcome.parameters),
                status,
                Cell::new(outcome.considered.to_string()),
                Cell::new(
                    outcome
                        .samples
                        .iter()
                        .map(|(row, value)| format!("[{row}] {value}"))
                        .collect::<Vec<_>>()
                        .join(", "),
                ),
            ]);
        }
        table
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "table: {} ({} rows)", self.table_name, self.total_rows)?;
        if self.cancelled {
            writeln!(f, "run was cancelled before completion")?;
        }
        write!(f, "{}", self.to_table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passed_counts_fully_passed_outcomes() {
        let report = Report {
            table_name: "t".into(),
            total_rows: 10,
            cancelled: false,
            outcomes: vec![
                RuleOutcome {
                    column: "a".into(),
                    rule_name: "is_not_null",
                    parameters: String::new(),
                    passed: 10,
                    considered: 10,
                    samples: vec![],
                },
                RuleOutcome {
                    column: "b".into(),
                    rule_name: "min",
                    parameters: "min=0".into(),
                    passed: 8,
                    considered: 10,
                    samples: vec![(3, "-1".into()), (7, "-2".into())],
                },
            ],
        };
        assert_eq!(report.passed(), (1, 2));
        assert!(!report.is_clean());
    }

    #[test]
    fn cancelled_report_is_never_clean() {
        let report = Report {
            table_name: "t".into(),
            total_rows: 1,
            cancelled: true,
            outcomes: vec![RuleOutcome {
                column: "a".into(),
                rule_name: "is_not_null",
                parameters: String::new(),
                passed: 1,
                considered: 1,
                samples: vec![],
            }],
        };
        assert!(!report.is_clean());
    }
}

//! End-to-end scenarios driving the public API: a TOML config, a CSV
//! input, and the resulting report.

use std::sync::atomic::AtomicBool;

use dataguard::builder::PlanBuilder;
use dataguard::engine::{self, EngineOptions};
use dataguard::reader::CsvReader;

fn run_csv(plan_builder: PlanBuilder, csv: &str) -> dataguard::report::Report {
    let mut plan = plan_builder.finalize().unwrap();
    let cancel = AtomicBool::new(false);
    engine::run(
        &mut plan,
        || CsvReader::from_text(csv),
        EngineOptions {
            batch_size: 2,
            sample_cap: 10,
        },
        &cancel,
    )
    .unwrap()
}

#[test]
fn between_bounds_scenario() {
    let csv = "quantity\n1\n2\n3\n5\n6\n";
    let report = run_csv(
        PlanBuilder::new("orders")
            .integer_column("quantity")
            .between(2.0, 5.0)
            .end_column()
            .unwrap(),
        csv,
    );
    let outcome = report.outcomes.iter().find(|o| o.rule_name == "between").unwrap();
    assert_eq!(outcome.passed, 3);
    assert_eq!(outcome.considered, 5);
}

#[test]
fn regex_format_scenario() {
    let csv = "code\nABC-123\nXYZ-456\nabc-123\nABC-12\nABC-1234\n";
    let report = run_csv(
        PlanBuilder::new("items")
            .string_column("code")
            .with_regex(r"[A-Z]{3}-\d{3}", false)
            .end_column()
            .unwrap(),
        csv,
    );
    let outcome = report.outcomes.iter().find(|o| o.rule_name == "with_regex").unwrap();
    assert_eq!(outcome.passed, 2);
}

#[test]
fn monotonic_increasing_scenario() {
    let csv = "ts\n1\n2\n2\n4\n3\n5\n";
    let report = run_csv(
        PlanBuilder::new("events")
            .integer_column("ts")
            .is_monotonically_increasing()
            .end_column()
            .unwrap(),
        csv,
    );
    let outcome = report
        .outcomes
        .iter()
        .find(|o| o.rule_name == "is_monotonically_increasing")
        .unwrap();
    assert_eq!(outcome.failed(), 1);
}

#[test]
fn is_in_allowed_values_scenario() {
    let csv = "fruit\napple\nbanana\norange\ngrape\nApple\n";
    let report = run_csv(
        PlanBuilder::new("fruits")
            .string_column("fruit")
            .is_in(vec!["apple".into(), "banana".into(), "orange".into()])
            .end_column()
            .unwrap(),
        csv,
    );
    let outcome = report.outcomes.iter().find(|o| o.rule_name == "is_in").unwrap();
    assert_eq!(outcome.passed, 3);
}

#[test]
fn uniqueness_scenario() {
    let csv = "id\n1\n2\n3\n1\n2\n";
    let report = run_csv(
        PlanBuilder::new("records")
            .integer_column("id")
            .is_unique()
            .end_column()
            .unwrap(),
        csv,
    );
    let outcome = report.outcomes.iter().find(|o| o.rule_name == "is_unique").unwrap();
    assert_eq!(outcome.passed, 3);
    assert_eq!(outcome.considered, 5);
}

#[test]
fn batch_size_does_not_change_violation_count() {
    let csv = "ts\n1\n3\n2\n5\n6\n7\n9\n8\n";
    let counts: Vec<usize> = [1usize, 2, 1024]
        .into_iter()
        .map(|batch_size| {
            let mut plan = PlanBuilder::new("events")
                .integer_column("ts")
                .is_monotonically_increasing()
                .end_column()
                .unwrap()
                .finalize()
                .unwrap();
            let cancel = AtomicBool::new(false);
            let report = engine::run(
                &mut plan,
                || CsvReader::from_text(csv),
                EngineOptions {
                    batch_size,
                    sample_cap: 10,
                },
                &cancel,
            )
            .unwrap();
            report
                .outcomes
                .iter()
                .find(|o| o.rule_name == "is_monotonically_increasing")
                .unwrap()
                .failed()
        })
        .collect();
    assert!(counts.iter().all(|&c| c == counts[0]));
}

#[test]
fn cross_column_relation_scenario() {
    let csv = "customers.id,orders.customer_id\nc1,c1\nc2,c4\nc3,c2\n";
    let report = run_csv(
        PlanBuilder::new("orders")
            .string_column("customers.id")
            .end_column()
            .unwrap()
            .string_column("orders.customer_id")
            .relation("customers.id")
            .end_column()
            .unwrap(),
        csv,
    );
    let outcome = report.outcomes.iter().find(|o| o.rule_name == "relation").unwrap();
    assert_eq!(outcome.passed, 2);
    assert_eq!(outcome.considered, 3);
}

#[test]
fn empty_input_yields_zero_rows_and_no_violations() {
    let csv = "age\n";
    let report = run_csv(
        PlanBuilder::new("people")
            .integer_column("age")
            .is_non_negative()
            .end_column()
            .unwrap(),
        csv,
    );
    assert_eq!(report.total_rows, 0);
    assert!(report.is_clean());
}

#[test]
fn all_null_column_fails_is_not_null_every_row() {
    let csv = "id,name\n1,\n2,\n3,\n";
    let report = run_csv(
        PlanBuilder::new("people")
            .integer_column("id")
            .end_column()
            .unwrap()
            .string_column("name")
            .is_not_null()
            .end_column()
            .unwrap(),
        csv,
    );
    let outcome = report.outcomes.iter().find(|o| o.rule_name == "is_not_null").unwrap();
    assert_eq!(outcome.passed, 0);
    assert_eq!(outcome.considered, 3);
}

#[test]
fn single_row_input() {
    let csv = "age\n42\n";
    let report = run_csv(
        PlanBuilder::new("people")
            .integer_column("age")
            .is_positive()
            .end_column()
            .unwrap(),
        csv,
    );
    assert_eq!(report.total_rows, 1);
    assert!(report.is_clean());
}

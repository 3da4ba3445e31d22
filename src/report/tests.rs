#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::models::{Column, Record};

fn txn(customer: &str, date: &str, amount: Decimal) -> Record {
    Record {
        customer: Some(customer.into()),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
        amount: Some(amount),
        ..Record::default()
    }
}

/// Dataset advertising the full eight-column schema.
fn dataset(records: Vec<Record>) -> Dataset {
    let columns: BTreeSet<Column> = Column::all().iter().copied().collect();
    Dataset::new("test.csv".into(), columns, records)
}

fn dataset_with(cols: &[Column], records: Vec<Record>) -> Dataset {
    Dataset::new("test.csv".into(), cols.iter().copied().collect(), records)
}

/// Small fixture used across the suite: A buys twice, B once.
fn worked_example() -> Dataset {
    dataset(vec![
        txn("A", "2024-01-05", dec!(10)),
        txn("A", "2024-02-10", dec!(20)),
        txn("B", "2024-01-20", dec!(5)),
    ])
}

fn metric_value(output: ReportOutput) -> Scalar {
    match output {
        ReportOutput::Metric { value, .. } => value,
        other => panic!("expected a metric, got {other:?}"),
    }
}

fn bar_rows(output: ReportOutput) -> Vec<(String, Option<Decimal>)> {
    match output {
        ReportOutput::Bars { rows, .. } => rows,
        other => panic!("expected bars, got {other:?}"),
    }
}

// ── ReportKind surface ────────────────────────────────────────

#[test]
fn test_menu_has_thirty_five_reports() {
    assert_eq!(ReportKind::all().len(), 35);
}

#[test]
fn test_names_are_unique_and_parse_back() {
    let mut seen = BTreeSet::new();
    for kind in ReportKind::all() {
        assert!(seen.insert(kind.name()), "duplicate name: {}", kind.name());
        assert_eq!(ReportKind::parse(kind.name()), Some(*kind));
    }
}

#[test]
fn test_parse_is_case_insensitive() {
    assert_eq!(
        ReportKind::parse("total sales amount"),
        Some(ReportKind::TotalSales)
    );
    assert_eq!(ReportKind::parse("no such report"), None);
}

// ── Worked example ────────────────────────────────────────────

#[test]
fn test_total_sales_worked_example() {
    let out = ReportKind::TotalSales.run(&worked_example()).unwrap();
    assert_eq!(metric_value(out), Scalar::Amount(dec!(35)));
}

#[test]
fn test_total_sales_is_order_independent() {
    let mut records = vec![
        txn("A", "2024-01-05", dec!(10)),
        txn("A", "2024-02-10", dec!(20)),
        txn("B", "2024-01-20", dec!(5)),
    ];
    records.reverse();
    let out = ReportKind::TotalSales.run(&dataset(records)).unwrap();
    assert_eq!(metric_value(out), Scalar::Amount(dec!(35)));
}

#[test]
fn test_unique_customers_worked_example() {
    let out = ReportKind::UniqueCustomers.run(&worked_example()).unwrap();
    assert_eq!(metric_value(out), Scalar::Count(2));
}

#[test]
fn test_avg_per_customer_is_two_level() {
    // mean(mean(10, 20), mean(5)) = mean(15, 5) = 10, not the flattened
    // mean 35/3.
    let out = ReportKind::AvgPerCustomer.run(&worked_example()).unwrap();
    assert_eq!(metric_value(out), Scalar::Amount(dec!(10)));
}

#[test]
fn test_repeat_buyers_worked_example() {
    let out = ReportKind::RepeatBuyerShare.run(&worked_example()).unwrap();
    assert_eq!(metric_value(out), Scalar::Percent(dec!(50)));
}

#[test]
fn test_repeat_buyers_zero_when_all_single() {
    let ds = dataset(vec![
        txn("A", "2024-01-05", dec!(10)),
        txn("B", "2024-01-20", dec!(5)),
    ]);
    let out = ReportKind::RepeatBuyerShare.run(&ds).unwrap();
    assert_eq!(metric_value(out), Scalar::Percent(dec!(0)));
}

#[test]
fn test_repeat_buyers_undefined_with_no_customers() {
    let out = ReportKind::RepeatBuyerShare.run(&dataset(vec![])).unwrap();
    assert_eq!(metric_value(out), Scalar::Undefined);
}

// ── Sales metrics ─────────────────────────────────────────────

#[test]
fn test_highest_transaction() {
    let out = ReportKind::HighestTransaction
        .run(&worked_example())
        .unwrap();
    assert_eq!(metric_value(out), Scalar::Amount(dec!(20)));
}

#[test]
fn test_highest_transaction_undefined_with_no_amounts() {
    let rec = Record {
        customer: Some("A".into()),
        ..Record::default()
    };
    let out = ReportKind::HighestTransaction
        .run(&dataset(vec![rec]))
        .unwrap();
    assert_eq!(metric_value(out), Scalar::Undefined);
}

#[test]
fn test_highest_sales_month() {
    // Jan: 15, Feb: 20
    let out = ReportKind::HighestSalesMonth
        .run(&worked_example())
        .unwrap();
    assert_eq!(metric_value(out), Scalar::Text("2024-02".into()));
}

#[test]
fn test_highest_sales_month_tie_picks_earliest() {
    let ds = dataset(vec![
        txn("A", "2024-03-01", dec!(10)),
        txn("B", "2024-01-01", dec!(10)),
    ]);
    let out = ReportKind::HighestSalesMonth.run(&ds).unwrap();
    assert_eq!(metric_value(out), Scalar::Text("2024-01".into()));
}

#[test]
fn test_highest_sales_month_undefined_without_dates() {
    let mut rec = txn("A", "2024-01-05", dec!(10));
    rec.date = None;
    let out = ReportKind::HighestSalesMonth
        .run(&dataset(vec![rec]))
        .unwrap();
    assert_eq!(metric_value(out), Scalar::Undefined);
}

#[test]
fn test_monthly_trend_ascending_and_drops_dateless() {
    let mut dateless = txn("C", "2024-01-01", dec!(99));
    dateless.date = None;
    let ds = dataset(vec![
        txn("A", "2024-02-10", dec!(20)),
        txn("A", "2024-01-05", dec!(10)),
        txn("B", "2024-01-20", dec!(5)),
        dateless,
    ]);
    let out = ReportKind::MonthlySalesTrend.run(&ds).unwrap();
    match out {
        ReportOutput::Series { points, .. } => {
            assert_eq!(
                points,
                vec![
                    ("2024-01".to_string(), dec!(15)),
                    ("2024-02".to_string(), dec!(20)),
                ]
            );
        }
        other => panic!("expected series, got {other:?}"),
    }
}

#[test]
fn test_highest_sales_quarter() {
    let ds = dataset(vec![
        txn("A", "2024-01-05", dec!(10)),
        txn("A", "2024-04-10", dec!(50)),
        txn("B", "2023-05-20", dec!(5)),
    ]);
    let out = ReportKind::HighestSalesQuarter.run(&ds).unwrap();
    assert_eq!(metric_value(out), Scalar::Text("2024Q2".into()));
}

#[test]
fn test_monthly_variation_merges_years() {
    // January of two different years lands in the same bucket.
    let ds = dataset(vec![
        txn("A", "2023-01-05", dec!(10)),
        txn("A", "2024-01-10", dec!(20)),
        txn("B", "2024-03-20", dec!(5)),
    ]);
    let rows = bar_rows(ReportKind::MonthlySalesVariation.run(&ds).unwrap());
    assert_eq!(
        rows,
        vec![
            ("01".to_string(), Some(dec!(30))),
            ("03".to_string(), Some(dec!(5))),
        ]
    );
}

#[test]
fn test_monthly_transaction_counts() {
    let ds = dataset(vec![
        txn("A", "2023-01-05", dec!(10)),
        txn("A", "2024-01-10", dec!(20)),
        txn("B", "2024-03-20", dec!(5)),
    ]);
    let rows = bar_rows(ReportKind::MonthlyTransactionCounts.run(&ds).unwrap());
    assert_eq!(
        rows,
        vec![
            ("01".to_string(), Some(dec!(2))),
            ("03".to_string(), Some(dec!(1))),
        ]
    );
}

// ── Ranking reports ───────────────────────────────────────────

#[test]
fn test_top_customers_caps_at_ten() {
    let records: Vec<Record> = (0..15)
        .map(|i| txn(&format!("C{i:02}"), "2024-01-05", Decimal::from(i)))
        .collect();
    let rows = bar_rows(ReportKind::TopCustomers.run(&dataset(records)).unwrap());
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0], ("C14".to_string(), Some(dec!(14))));
}

#[test]
fn test_top_customers_returns_all_when_fewer_than_n() {
    let rows = bar_rows(ReportKind::TopCustomers.run(&worked_example()).unwrap());
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], ("A".to_string(), Some(dec!(30))));
    assert_eq!(rows[1], ("B".to_string(), Some(dec!(5))));
}

#[test]
fn test_top_service_revenue_caps_at_five() {
    let records: Vec<Record> = (0..8)
        .map(|i| Record {
            service: Some(format!("S{i}")),
            amount: Some(Decimal::from(i)),
            ..Record::default()
        })
        .collect();
    let rows = bar_rows(ReportKind::TopServiceRevenue.run(&dataset(records)).unwrap());
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0].0, "S7");
}

#[test]
fn test_top_state_single_winner() {
    let mut a = txn("A", "2024-01-05", dec!(10));
    a.state = Some("California".into());
    let mut b = txn("B", "2024-01-06", dec!(30));
    b.state = Some("Texas".into());
    let rows = bar_rows(ReportKind::TopState.run(&dataset(vec![a, b])).unwrap());
    assert_eq!(rows, vec![("Texas".to_string(), Some(dec!(30)))]);
}

#[test]
fn test_top_city_by_transaction_count() {
    let city = |name: &str| Record {
        city: Some(name.into()),
        ..Record::default()
    };
    let ds = dataset(vec![city("Austin"), city("Austin"), city("Fresno")]);
    let rows = bar_rows(ReportKind::TopCity.run(&ds).unwrap());
    assert_eq!(rows, vec![("Austin".to_string(), Some(dec!(2)))]);
}

// ── Customer behavior ─────────────────────────────────────────

#[test]
fn test_avg_transactions_per_customer_rounds() {
    // A has 2, B has 1: mean 1.5
    let out = ReportKind::AvgTransactionsPerCustomer
        .run(&worked_example())
        .unwrap();
    assert_eq!(metric_value(out), Scalar::Amount(dec!(1.5)));
}

#[test]
fn test_multi_service_customers() {
    let with_service = |cust: &str, service: &str| Record {
        customer: Some(cust.into()),
        service: Some(service.into()),
        ..Record::default()
    };
    let no_service = Record {
        customer: Some("A".into()),
        ..Record::default()
    };
    let ds = dataset(vec![
        with_service("A", "Repair"),
        with_service("A", "Retail"),
        with_service("B", "Repair"),
        with_service("B", "Repair"),
        no_service,
    ]);
    let out = ReportKind::MultiServiceCustomers.run(&ds).unwrap();
    assert_eq!(metric_value(out), Scalar::Count(1));
}

// ── Text filter reports ───────────────────────────────────────

fn detail_txn(detail: Option<&str>, amount: Decimal) -> Record {
    Record {
        detail: detail.map(String::from),
        amount: Some(amount),
        ..Record::default()
    }
}

#[test]
fn test_credit_count_skips_absent_details() {
    let ds = dataset(vec![
        detail_txn(Some("Credit card"), dec!(10)),
        detail_txn(Some("paid by CREDIT"), dec!(20)),
        detail_txn(Some("debit card"), dec!(5)),
        detail_txn(None, dec!(7)),
    ]);
    let out = ReportKind::CreditCount.run(&ds).unwrap();
    assert_eq!(metric_value(out), Scalar::Count(2));
}

#[test]
fn test_credit_revenue() {
    let ds = dataset(vec![
        detail_txn(Some("credit"), dec!(10)),
        detail_txn(Some("credit"), dec!(20)),
        detail_txn(Some("debit"), dec!(5)),
    ]);
    let out = ReportKind::CreditRevenue.run(&ds).unwrap();
    assert_eq!(metric_value(out), Scalar::Amount(dec!(30)));
}

#[test]
fn test_credit_vs_debit_averages() {
    let ds = dataset(vec![
        detail_txn(Some("credit"), dec!(10)),
        detail_txn(Some("credit"), dec!(30)),
        detail_txn(Some("debit"), dec!(5)),
    ]);
    let rows = bar_rows(ReportKind::CreditVsDebit.run(&ds).unwrap());
    assert_eq!(
        rows,
        vec![
            ("Credit".to_string(), Some(dec!(20))),
            ("Debit".to_string(), Some(dec!(5))),
        ]
    );
}

#[test]
fn test_credit_vs_debit_undefined_side() {
    let ds = dataset(vec![detail_txn(Some("credit"), dec!(10))]);
    let rows = bar_rows(ReportKind::CreditVsDebit.run(&ds).unwrap());
    assert_eq!(rows[1], ("Debit".to_string(), None));
}

#[test]
fn test_california_vs_texas_matches_codes_and_names() {
    let in_state = |state: &str, amount: Decimal| Record {
        state: Some(state.into()),
        amount: Some(amount),
        ..Record::default()
    };
    let ds = dataset(vec![
        in_state("CA", dec!(10)),
        in_state("California", dec!(30)),
        in_state("TX", dec!(8)),
        in_state("Nevada", dec!(100)),
    ]);
    let rows = bar_rows(ReportKind::CaliforniaVsTexas.run(&ds).unwrap());
    assert_eq!(
        rows,
        vec![
            ("California".to_string(), Some(dec!(20))),
            ("Texas".to_string(), Some(dec!(8))),
        ]
    );
}

#[test]
fn test_outdoor_states() {
    let sale = |state: &str, product: &str, amount: Decimal| Record {
        state: Some(state.into()),
        product: Some(product.into()),
        amount: Some(amount),
        ..Record::default()
    };
    let ds = dataset(vec![
        sale("Texas", "Outdoor Recreation", dec!(10)),
        sale("Texas", "Outdoor Recreation", dec!(15)),
        sale("Utah", "outdoor gear", dec!(40)),
        sale("Utah", "Kitchen", dec!(500)),
    ]);
    let rows = bar_rows(ReportKind::OutdoorStates.run(&ds).unwrap());
    assert_eq!(
        rows,
        vec![
            ("Utah".to_string(), Some(dec!(40))),
            ("Texas".to_string(), Some(dec!(25))),
        ]
    );
}

#[test]
fn test_sports_seasonal_trend_buckets_by_month() {
    let sale = |date: &str, product: &str, amount: Decimal| Record {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
        product: Some(product.into()),
        amount: Some(amount),
        ..Record::default()
    };
    let ds = dataset(vec![
        sale("2023-06-01", "Sports Gear", dec!(10)),
        sale("2024-06-15", "Gym Equipment", dec!(20)),
        sale("2024-12-01", "Sports Gear", dec!(5)),
        sale("2024-06-20", "Books", dec!(400)),
    ]);
    let rows = bar_rows(ReportKind::SportsSeasonalTrend.run(&ds).unwrap());
    assert_eq!(
        rows,
        vec![
            ("06".to_string(), Some(dec!(30))),
            ("12".to_string(), Some(dec!(5))),
        ]
    );
}

#[test]
fn test_exercise_fitness_sales() {
    let svc = |service: &str, amount: Decimal| Record {
        service: Some(service.into()),
        amount: Some(amount),
        ..Record::default()
    };
    let ds = dataset(vec![
        svc("Exercise & Fitness", dec!(10)),
        svc("Repair", dec!(99)),
    ]);
    let out = ReportKind::ExerciseFitnessSales.run(&ds).unwrap();
    assert_eq!(metric_value(out), Scalar::Amount(dec!(10)));
}

// ── Tables ────────────────────────────────────────────────────

#[test]
fn test_top_product_per_service_takes_mode() {
    let sale = |service: &str, product: &str| Record {
        service: Some(service.into()),
        product: Some(product.into()),
        ..Record::default()
    };
    let ds = dataset(vec![
        sale("Repair", "Tools"),
        sale("Repair", "Tools"),
        sale("Repair", "Glue"),
        sale("Retail", "Socks"),
    ]);
    match ReportKind::TopProductPerService.run(&ds).unwrap() {
        ReportOutput::Table { rows, .. } => {
            assert_eq!(
                rows,
                vec![
                    vec!["Repair".to_string(), "Tools".to_string()],
                    vec!["Retail".to_string(), "Socks".to_string()],
                ]
            );
        }
        other => panic!("expected table, got {other:?}"),
    }
}

#[test]
fn test_high_spend_services_above_overall_mean() {
    let svc = |service: &str, amount: Decimal| Record {
        service: Some(service.into()),
        amount: Some(amount),
        ..Record::default()
    };
    // Overall mean = 20; only Premium (mean 35) clears it.
    let ds = dataset(vec![
        svc("Premium", dec!(30)),
        svc("Premium", dec!(40)),
        svc("Budget", dec!(5)),
        svc("Budget", dec!(5)),
    ]);
    match ReportKind::HighSpendServices.run(&ds).unwrap() {
        ReportOutput::Table { rows, .. } => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0][0], "Premium");
        }
        other => panic!("expected table, got {other:?}"),
    }
}

#[test]
fn test_services_by_state_top_combinations() {
    let combo = |state: &str, service: &str| Record {
        state: Some(state.into()),
        service: Some(service.into()),
        ..Record::default()
    };
    let ds = dataset(vec![
        combo("Texas", "Repair"),
        combo("Texas", "Repair"),
        combo("Texas", "Retail"),
        combo("Utah", "Repair"),
    ]);
    match ReportKind::ServicesByState.run(&ds).unwrap() {
        ReportOutput::Table { rows, columns, .. } => {
            assert_eq!(columns, vec!["State", "Service", "Transactions"]);
            assert_eq!(
                rows[0],
                vec!["Texas".to_string(), "Repair".to_string(), "2".to_string()]
            );
            assert_eq!(rows.len(), 3);
        }
        other => panic!("expected table, got {other:?}"),
    }
}

// ── Percentile screens ────────────────────────────────────────

#[test]
fn test_high_sales_low_avg() {
    let sale = |product: &str, amount: Decimal| Record {
        product: Some(product.into()),
        amount: Some(amount),
        ..Record::default()
    };
    // P1: sum 100 over ten sales (mean 10); P2-P4 single sales.
    // q75 of sums [20,30,50,100] = 62.5, so only P1 is "high sales";
    // overall mean 200/13 ~ 15.4, so P1's mean 10 is also "low avg".
    let mut records: Vec<Record> = (0..10).map(|_| sale("P1", dec!(10))).collect();
    records.push(sale("P2", dec!(50)));
    records.push(sale("P3", dec!(30)));
    records.push(sale("P4", dec!(20)));
    match ReportKind::HighSalesLowAvg.run(&dataset(records)).unwrap() {
        ReportOutput::Names { items, .. } => assert_eq!(items, vec!["P1".to_string()]),
        other => panic!("expected names, got {other:?}"),
    }
}

#[test]
fn test_underperforming_services() {
    let svc = |service: &str, amount: Decimal| Record {
        service: Some(service.into()),
        amount: Some(amount),
        ..Record::default()
    };
    // S1 is lowest by both sum and count; thresholds are strict.
    let mut records = vec![svc("S1", dec!(1))];
    records.extend((0..10).map(|_| svc("S2", dec!(10))));
    records.extend((0..5).map(|_| svc("S3", dec!(10))));
    records.extend((0..4).map(|_| svc("S4", dec!(10))));
    match ReportKind::UnderperformingServices
        .run(&dataset(records))
        .unwrap()
    {
        ReportOutput::Names { items, .. } => assert_eq!(items, vec!["S1".to_string()]),
        other => panic!("expected names, got {other:?}"),
    }
}

#[test]
fn test_percentile_screens_empty_dataset() {
    let out = ReportKind::HighSalesLowAvg.run(&dataset(vec![])).unwrap();
    match out {
        ReportOutput::Names { items, .. } => assert!(items.is_empty()),
        other => panic!("expected names, got {other:?}"),
    }
}

// ── Failure modes and invariants ──────────────────────────────

#[test]
fn test_missing_column_is_a_lookup_failure() {
    let ds = dataset_with(&[Column::Customer], vec![txn("A", "2024-01-05", dec!(10))]);
    let err = ReportKind::TotalSales.run(&ds).unwrap_err();
    assert!(err.to_string().contains("t_amt"));
}

#[test]
fn test_every_report_checks_its_columns() {
    // A dataset with no columns at all must fail every report with a
    // lookup error rather than compute something from nothing.
    let ds = dataset_with(&[], vec![]);
    for kind in ReportKind::all() {
        assert!(kind.run(&ds).is_err(), "{} did not fail", kind.name());
    }
}

#[test]
fn test_every_report_handles_an_empty_dataset() {
    let ds = dataset(vec![]);
    for kind in ReportKind::all() {
        assert!(kind.run(&ds).is_ok(), "{} failed on empty data", kind.name());
    }
}

#[test]
fn test_reports_are_idempotent() {
    let ds = worked_example();
    for kind in ReportKind::all() {
        let first = kind.run(&ds).unwrap();
        let second = kind.run(&ds).unwrap();
        assert_eq!(first, second, "{} is not idempotent", kind.name());
    }
}

// ── Scalar rendering ──────────────────────────────────────────

#[test]
fn test_scalar_render() {
    assert_eq!(Scalar::Amount(dec!(1234567.89)).render(), "1,234,567.89");
    assert_eq!(Scalar::Count(7).render(), "7");
    assert_eq!(Scalar::Percent(dec!(50)).render(), "50.00%");
    assert_eq!(Scalar::Text("2024Q1".into()).render(), "2024Q1");
    assert_eq!(Scalar::Undefined.render(), "NaN");
}

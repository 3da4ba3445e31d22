//! The aggregation recipes behind the report menu. Each function is a
//! pure projection of the dataset: it checks the columns it reads, folds
//! the records, and hands back a displayable shape. Nothing here mutates
//! the dataset or remembers a prior run.

use std::collections::BTreeSet;

use anyhow::Result;
use rust_decimal::Decimal;

use crate::models::{Column, Dataset, Record};

use super::aggregate::{
    filter_matching, group_by, group_count, group_mean, group_sum, key_of_max, mean, mean_amount,
    quantile, rank_desc, rank_desc_opt, sum_amounts,
};
use super::{ReportOutput, Scalar};

// Fixed filter patterns, matched case-insensitively.
const OUTDOOR: &str = "Outdoor";
const SPORTS: &str = "Sport|Equipment";
const CREDIT: &str = "credit";
const DEBIT: &str = "debit";
const CALIFORNIA: &str = "CA|California";
const TEXAS: &str = "TX|Texas";
const EXERCISE: &str = "Exercise";

fn metric(label: &str, value: Scalar) -> ReportOutput {
    ReportOutput::Metric {
        label: label.into(),
        value,
    }
}

fn bars(title: &str, rows: Vec<(String, Option<Decimal>)>) -> ReportOutput {
    ReportOutput::Bars {
        title: title.into(),
        rows,
    }
}

fn count_bars(title: &str, rows: Vec<(String, u64)>) -> ReportOutput {
    bars(
        title,
        rows.into_iter()
            .map(|(k, n)| (k, Some(Decimal::from(n))))
            .collect(),
    )
}

fn sum_bars(title: &str, rows: Vec<(String, Decimal)>) -> ReportOutput {
    bars(title, rows.into_iter().map(|(k, v)| (k, Some(v))).collect())
}

fn month_label(m: u32) -> String {
    format!("{m:02}")
}

// ── Sales overview ────────────────────────────────────────────

pub(super) fn total_sales(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Amount])?;
    let total = sum_amounts(&data.records);
    Ok(metric("Total Sales", Scalar::Amount(total)))
}

pub(super) fn highest_sales_month(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Date, Column::Amount])?;
    let monthly = group_sum(&data.records, Record::month_key);
    let value = match key_of_max(monthly) {
        Some(month) => Scalar::Text(month),
        None => Scalar::Undefined,
    };
    Ok(metric("Highest Sales Month", value))
}

pub(super) fn highest_transaction(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Amount])?;
    let value = match data.records.iter().filter_map(|r| r.amount).max() {
        Some(max) => Scalar::Amount(max),
        None => Scalar::Undefined,
    };
    Ok(metric("Highest Transaction", value))
}

pub(super) fn monthly_sales_trend(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Date, Column::Amount])?;
    let monthly = group_sum(&data.records, Record::month_key);
    Ok(ReportOutput::Series {
        title: "Total Sales Over Months".into(),
        points: monthly.into_iter().collect(),
    })
}

pub(super) fn highest_sales_quarter(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Date, Column::Amount])?;
    let quarterly = group_sum(&data.records, Record::quarter_key);
    let value = match key_of_max(quarterly) {
        Some(quarter) => Scalar::Text(quarter),
        None => Scalar::Undefined,
    };
    Ok(metric("Highest Sales Quarter", value))
}

pub(super) fn monthly_sales_variation(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Date, Column::Amount])?;
    let by_month = group_sum(&data.records, Record::month_of_year);
    let rows = by_month
        .into_iter()
        .map(|(m, total)| (month_label(m), total))
        .collect();
    Ok(sum_bars("Month-wise Total Sales", rows))
}

pub(super) fn monthly_transaction_counts(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Date])?;
    let by_month = group_count(&data.records, Record::month_of_year);
    let rows = by_month
        .into_iter()
        .map(|(m, n)| (month_label(m), n))
        .collect();
    Ok(count_bars("Transactions per Month", rows))
}

// ── Customers ─────────────────────────────────────────────────

pub(super) fn avg_per_customer(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Customer, Column::Amount])?;
    // Mean of each customer's own mean, not a flattened average: a
    // customer with many transactions weighs the same as one with one.
    let per_customer = group_mean(&data.records, |r| r.customer.clone());
    let means: Vec<Decimal> = per_customer.into_values().flatten().collect();
    let value = match mean(&means) {
        Some(avg) => Scalar::Amount(avg),
        None => Scalar::Undefined,
    };
    Ok(metric("Average Transaction per Customer", value))
}

pub(super) fn unique_customers(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Customer])?;
    let distinct: BTreeSet<&str> = data
        .records
        .iter()
        .filter_map(|r| r.customer.as_deref())
        .collect();
    Ok(metric(
        "Unique Customers",
        Scalar::Count(distinct.len() as u64),
    ))
}

pub(super) fn top_customers(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Customer, Column::Amount])?;
    let totals = group_sum(&data.records, |r| r.customer.clone());
    Ok(sum_bars("Top Spending Customers", rank_desc(totals, 10)))
}

pub(super) fn avg_transactions_per_customer(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Customer])?;
    let counts = group_count(&data.records, |r| r.customer.clone());
    let counts: Vec<Decimal> = counts.into_values().map(Decimal::from).collect();
    let value = match mean(&counts) {
        Some(avg) => Scalar::Amount(avg.round_dp(2)),
        None => Scalar::Undefined,
    };
    Ok(metric("Avg Transactions per Customer", value))
}

pub(super) fn multi_service_customers(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Customer, Column::Service])?;
    let groups = group_by(&data.records, |r| r.customer.clone());
    let multi = groups
        .values()
        .filter(|rows| {
            let services: BTreeSet<&str> =
                rows.iter().filter_map(|r| r.service.as_deref()).collect();
            services.len() > 1
        })
        .count();
    Ok(metric(
        "Customers in Multiple Categories",
        Scalar::Count(multi as u64),
    ))
}

pub(super) fn repeat_buyer_share(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Customer])?;
    let counts = group_count(&data.records, |r| r.customer.clone());
    let total = counts.len() as u64;
    let repeat = counts.values().filter(|&&n| n > 1).count() as u64;
    // Zero customers divides by zero; that is NaN, not an error.
    let value = Decimal::from(repeat * 100)
        .checked_div(Decimal::from(total))
        .map_or(Scalar::Undefined, Scalar::Percent);
    Ok(metric("Repeat Buyers", value))
}

// ── Services and products ─────────────────────────────────────

pub(super) fn top_service_revenue(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Service, Column::Amount])?;
    let totals = group_sum(&data.records, |r| r.service.clone());
    Ok(sum_bars("Top Revenue Services", rank_desc(totals, 5)))
}

pub(super) fn top_product_revenue(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Product, Column::Amount])?;
    let totals = group_sum(&data.records, |r| r.product.clone());
    Ok(sum_bars("Top Revenue Products", rank_desc(totals, 5)))
}

pub(super) fn top_product_category(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Product, Column::Amount])?;
    let totals = group_sum(&data.records, |r| r.product.clone());
    Ok(sum_bars("Top Product Category", rank_desc(totals, 1)))
}

pub(super) fn avg_per_service(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Service, Column::Amount])?;
    let means = group_mean(&data.records, |r| r.service.clone());
    let n = means.len();
    Ok(bars("Average Amount per Service", rank_desc_opt(means, n)))
}

pub(super) fn avg_per_product(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Product, Column::Amount])?;
    let means = group_mean(&data.records, |r| r.product.clone());
    let n = means.len();
    Ok(bars("Average Amount per Product", rank_desc_opt(means, n)))
}

pub(super) fn popular_services(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Service])?;
    let counts = group_count(&data.records, |r| r.service.clone());
    Ok(count_bars("Most Popular Services", rank_desc(counts, 10)))
}

pub(super) fn top_product_per_service(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Service, Column::Product])?;
    let groups = group_by(&data.records, |r| r.service.clone());
    let rows = groups
        .into_iter()
        .filter_map(|(service, recs)| {
            let counts = group_count(recs, |r| r.product.clone());
            // Most frequent product; ties resolve to the first name.
            key_of_max(counts).map(|product| vec![service, product])
        })
        .collect();
    Ok(ReportOutput::Table {
        title: "Most Purchased Product per Service".into(),
        columns: vec!["Service", "Top Product"],
        rows,
    })
}

pub(super) fn high_spend_services(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Service, Column::Amount])?;
    let overall = mean_amount(&data.records);
    let means = group_mean(&data.records, |r| r.service.clone());
    // With no overall average to compare against, nothing qualifies.
    let rows = means
        .into_iter()
        .filter_map(|(service, avg)| match (avg, overall) {
            (Some(avg), Some(overall)) if avg > overall => {
                Some(vec![service, crate::ui::util::format_amount(avg)])
            }
            _ => None,
        })
        .collect();
    Ok(ReportOutput::Table {
        title: "High-Spend Services (Above Avg)".into(),
        columns: vec!["Service", "Average"],
        rows,
    })
}

pub(super) fn exercise_fitness_sales(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Service, Column::Amount])?;
    let matched = filter_matching(&data.records, |r| r.service.as_deref(), EXERCISE)?;
    Ok(metric(
        "Exercise & Fitness Sales",
        Scalar::Amount(sum_amounts(matched)),
    ))
}

// ── Geography ─────────────────────────────────────────────────

pub(super) fn top_state(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::State, Column::Amount])?;
    let totals = group_sum(&data.records, |r| r.state.clone());
    Ok(sum_bars("State with Highest Sales", rank_desc(totals, 1)))
}

pub(super) fn top_city(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::City])?;
    let counts = group_count(&data.records, |r| r.city.clone());
    Ok(count_bars(
        "City with Most Transactions",
        rank_desc(counts, 1),
    ))
}

pub(super) fn avg_per_state(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::State, Column::Amount])?;
    // Unranked: states stay in name order.
    let means = group_mean(&data.records, |r| r.state.clone());
    Ok(bars("Average Spending per State", means.into_iter().collect()))
}

pub(super) fn services_by_state(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::State, Column::Service])?;
    let combos = group_count(&data.records, |r| {
        match (r.state.clone(), r.service.clone()) {
            (Some(state), Some(service)) => Some((state, service)),
            _ => None,
        }
    });
    let rows = rank_desc(combos, 10)
        .into_iter()
        .map(|((state, service), n)| vec![state, service, n.to_string()])
        .collect();
    Ok(ReportOutput::Table {
        title: "Popular Services by State".into(),
        columns: vec!["State", "Service", "Transactions"],
        rows,
    })
}

pub(super) fn outdoor_states(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Product, Column::State, Column::Amount])?;
    let outdoor = filter_matching(&data.records, |r| r.product.as_deref(), OUTDOOR)?;
    let totals = group_sum(outdoor, |r| r.state.clone());
    Ok(sum_bars("Outdoor Recreation by State", rank_desc(totals, 5)))
}

pub(super) fn california_vs_texas(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::State, Column::Amount])?;
    let ca = filter_matching(&data.records, |r| r.state.as_deref(), CALIFORNIA)?;
    let tx = filter_matching(&data.records, |r| r.state.as_deref(), TEXAS)?;
    Ok(bars(
        "Average Spending: California vs Texas",
        vec![
            ("California".into(), mean_amount(ca)),
            ("Texas".into(), mean_amount(tx)),
        ],
    ))
}

pub(super) fn high_value_states(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::State, Column::Amount])?;
    let means = group_mean(&data.records, |r| r.state.clone());
    Ok(bars(
        "Top States by Average Spend",
        rank_desc_opt(means, 5),
    ))
}

// ── Payment details ───────────────────────────────────────────

pub(super) fn credit_count(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Detail])?;
    let credit = filter_matching(&data.records, |r| r.detail.as_deref(), CREDIT)?;
    Ok(metric(
        "Credit Transactions",
        Scalar::Count(credit.len() as u64),
    ))
}

pub(super) fn credit_revenue(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Detail, Column::Amount])?;
    let credit = filter_matching(&data.records, |r| r.detail.as_deref(), CREDIT)?;
    Ok(metric("Credit Revenue", Scalar::Amount(sum_amounts(credit))))
}

pub(super) fn credit_vs_debit(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Detail, Column::Amount])?;
    let credit = filter_matching(&data.records, |r| r.detail.as_deref(), CREDIT)?;
    let debit = filter_matching(&data.records, |r| r.detail.as_deref(), DEBIT)?;
    Ok(bars(
        "Credit vs Debit Average Spending",
        vec![
            ("Credit".into(), mean_amount(credit)),
            ("Debit".into(), mean_amount(debit)),
        ],
    ))
}

pub(super) fn sports_seasonal_trend(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Product, Column::Date, Column::Amount])?;
    let sports = filter_matching(&data.records, |r| r.product.as_deref(), SPORTS)?;
    let by_month = group_sum(sports, Record::month_of_year);
    let rows = by_month
        .into_iter()
        .map(|(m, total)| (month_label(m), total))
        .collect();
    Ok(sum_bars("Sports Equipment by Month", rows))
}

// ── Percentile screens ────────────────────────────────────────

pub(super) fn high_sales_low_avg(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Product, Column::Amount])?;
    let sums = group_sum(&data.records, |r| r.product.clone());
    let means = group_mean(&data.records, |r| r.product.clone());
    let overall = mean_amount(&data.records);

    let sum_values: Vec<Decimal> = sums.values().copied().collect();
    let threshold = quantile(&sum_values, 0.75);

    let high_sales: BTreeSet<String> = sums
        .into_iter()
        .filter(|(_, total)| threshold.is_some_and(|t| *total > t))
        .map(|(product, _)| product)
        .collect();
    let low_avg: BTreeSet<String> = means
        .into_iter()
        .filter(|(_, avg)| matches!((avg, overall), (Some(a), Some(o)) if *a < o))
        .map(|(product, _)| product)
        .collect();

    Ok(ReportOutput::Names {
        title: "High Sales but Low Avg Value".into(),
        items: high_sales.intersection(&low_avg).cloned().collect(),
    })
}

pub(super) fn underperforming_services(data: &Dataset) -> Result<ReportOutput> {
    data.require(&[Column::Service, Column::Amount])?;
    let sums = group_sum(&data.records, |r| r.service.clone());
    let counts = group_count(&data.records, |r| r.service.clone());

    let sum_values: Vec<Decimal> = sums.values().copied().collect();
    let count_values: Vec<Decimal> = counts.values().map(|&n| Decimal::from(n)).collect();
    let sum_threshold = quantile(&sum_values, 0.25);
    let count_threshold = quantile(&count_values, 0.25);

    let low_sales: BTreeSet<String> = sums
        .into_iter()
        .filter(|(_, total)| sum_threshold.is_some_and(|t| *total < t))
        .map(|(service, _)| service)
        .collect();
    let low_counts: BTreeSet<String> = counts
        .into_iter()
        .filter(|(_, n)| count_threshold.is_some_and(|t| Decimal::from(*n) < t))
        .map(|(service, _)| service)
        .collect();

    Ok(ReportOutput::Names {
        title: "Underperforming Service Categories".into(),
        items: low_sales.intersection(&low_counts).cloned().collect(),
    })
}

use std::cmp::Ordering;
use std::collections::BTreeMap;

use anyhow::{Context, Result};
use regex::RegexBuilder;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::models::Record;

/// Partition records by a key, dropping records whose key is absent.
/// The `BTreeMap` keeps groups in ascending key order, which is what the
/// ranking tie-break leans on. Accepts either a whole dataset slice or a
/// filtered borrow of one.
pub(crate) fn group_by<'a, K, F, I>(records: I, key: F) -> BTreeMap<K, Vec<&'a Record>>
where
    K: Ord,
    F: Fn(&Record) -> Option<K>,
    I: IntoIterator<Item = &'a Record>,
{
    let mut groups: BTreeMap<K, Vec<&Record>> = BTreeMap::new();
    for rec in records {
        if let Some(k) = key(rec) {
            groups.entry(k).or_default().push(rec);
        }
    }
    groups
}

/// Sum of the present amounts; a group with no amounts at all sums to zero.
pub(crate) fn sum_amounts<'a, I>(records: I) -> Decimal
where
    I: IntoIterator<Item = &'a Record>,
{
    records.into_iter().filter_map(|r| r.amount).sum()
}

/// Mean of the present amounts; `None` when there are none.
pub(crate) fn mean_amount<'a, I>(records: I) -> Option<Decimal>
where
    I: IntoIterator<Item = &'a Record>,
{
    let amounts: Vec<Decimal> = records.into_iter().filter_map(|r| r.amount).collect();
    mean(&amounts)
}

pub(crate) fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let total: Decimal = values.iter().copied().sum();
    total.checked_div(Decimal::from(values.len()))
}

pub(crate) fn group_sum<'a, K, F, I>(records: I, key: F) -> BTreeMap<K, Decimal>
where
    K: Ord,
    F: Fn(&Record) -> Option<K>,
    I: IntoIterator<Item = &'a Record>,
{
    group_by(records, key)
        .into_iter()
        .map(|(k, rows)| (k, sum_amounts(rows)))
        .collect()
}

pub(crate) fn group_mean<'a, K, F, I>(records: I, key: F) -> BTreeMap<K, Option<Decimal>>
where
    K: Ord,
    F: Fn(&Record) -> Option<K>,
    I: IntoIterator<Item = &'a Record>,
{
    group_by(records, key)
        .into_iter()
        .map(|(k, rows)| (k, mean_amount(rows)))
        .collect()
}

/// Row counts per group; counts every row with a key, present amount or not.
pub(crate) fn group_count<'a, K, F, I>(records: I, key: F) -> BTreeMap<K, u64>
where
    K: Ord,
    F: Fn(&Record) -> Option<K>,
    I: IntoIterator<Item = &'a Record>,
{
    group_by(records, key)
        .into_iter()
        .map(|(k, rows)| (k, rows.len() as u64))
        .collect()
}

/// Order groups by aggregate descending and keep at most `n`. The input
/// map iterates key-ascending and the sort is stable, so equal aggregates
/// resolve to ascending key.
pub(crate) fn rank_desc<K: Ord, V: Ord>(map: BTreeMap<K, V>, n: usize) -> Vec<(K, V)> {
    let mut rows: Vec<(K, V)> = map.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1));
    rows.truncate(n);
    rows
}

/// As `rank_desc`, for aggregates that may be undefined. Undefined values
/// sort last, the way a spreadsheet pushes NaN to the bottom.
pub(crate) fn rank_desc_opt<K: Ord>(
    map: BTreeMap<K, Option<Decimal>>,
    n: usize,
) -> Vec<(K, Option<Decimal>)> {
    let mut rows: Vec<(K, Option<Decimal>)> = map.into_iter().collect();
    rows.sort_by(|a, b| match (a.1, b.1) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    rows.truncate(n);
    rows
}

/// The key of the largest value, earliest key on ties. `None` when the
/// map is empty.
pub(crate) fn key_of_max<K: Ord, V: Ord>(map: BTreeMap<K, V>) -> Option<K> {
    let mut best: Option<(K, V)> = None;
    for (k, v) in map {
        match &best {
            Some((_, bv)) if v <= *bv => {}
            _ => best = Some((k, v)),
        }
    }
    best.map(|(k, _)| k)
}

/// Linear-interpolation quantile of the given values, `q` in `[0, 1]`.
/// `None` on an empty slice.
pub(crate) fn quantile(values: &[Decimal], q: f64) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort();
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let frac = Decimal::from_f64(pos - lo as f64)?;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Records whose `field` matches `pattern`, case-insensitively. Rows with
/// the field absent never match and never error.
pub(crate) fn filter_matching<'a, F>(
    records: &'a [Record],
    field: F,
    pattern: &str,
) -> Result<Vec<&'a Record>>
where
    F: Fn(&Record) -> Option<&str>,
{
    let re = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .with_context(|| format!("Invalid filter pattern '{pattern}'"))?;
    Ok(records
        .iter()
        .filter(|r| field(r).is_some_and(|v| re.is_match(v)))
        .collect())
}

#[cfg(test)]
#[path = "aggregate_tests.rs"]
mod tests;

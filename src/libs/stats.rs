//! Descriptive charts over closed records still in the inventory.
//!
//! Four series: closures per month, exit condition share, mean hours per
//! month and a histogram of hours. They render as text bars in the terminal.

use super::equipment::{Equipment, ExitCondition};
use super::formatter::{format_hours, month_key};
use std::collections::BTreeMap;
use std::fmt::Write;

pub const HISTOGRAM_BINS: usize = 10;

const BAR_WIDTH: usize = 40;
const SPARK_LEVELS: &[char] = &['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub from: f64,
    pub to: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stats {
    pub closures_per_month: Vec<(String, usize)>,
    pub exit_distribution: Vec<(ExitCondition, usize)>,
    pub mean_hours_per_month: Vec<(String, f64)>,
    pub hours_histogram: Vec<HistogramBin>,
}

pub fn closures_per_month(records: &[Equipment]) -> Vec<(String, usize)> {
    let mut months: BTreeMap<String, usize> = BTreeMap::new();
    for month in records.iter().filter_map(|r| r.closed_at.as_deref().and_then(month_key)) {
        *months.entry(month).or_default() += 1;
    }
    months.into_iter().collect()
}

/// Conditions in declaration order; conditions with no records are left out.
pub fn exit_distribution(records: &[Equipment]) -> Vec<(ExitCondition, usize)> {
    ExitCondition::ALL
        .iter()
        .map(|condition| (*condition, records.iter().filter(|r| r.exit_condition == Some(*condition)).count()))
        .filter(|(_, count)| *count > 0)
        .collect()
}

pub fn mean_hours_per_month(records: &[Equipment]) -> Vec<(String, f64)> {
    let mut months: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for record in records {
        let (Some(month), Some(hours)) = (record.closed_at.as_deref().and_then(month_key), record.hours) else {
            continue;
        };
        let entry = months.entry(month).or_default();
        entry.0 += hours;
        entry.1 += 1;
    }
    months.into_iter().map(|(month, (sum, count))| (month, sum / count as f64)).collect()
}

/// Equal-width bins between the smallest and largest value.
pub fn hours_histogram(records: &[Equipment], bins: usize) -> Vec<HistogramBin> {
    let hours: Vec<f64> = records.iter().filter_map(|r| r.hours).collect();
    if hours.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = hours.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = hours.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max == min {
        return vec![HistogramBin { from: min, to: max, count: hours.len() }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for value in hours {
        let index = (((value - min) / width) as usize).min(bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            from: min + width * i as f64,
            to: min + width * (i + 1) as f64,
            count,
        })
        .collect()
}

impl Stats {
    pub fn compute(records: &[Equipment]) -> Self {
        Stats {
            closures_per_month: closures_per_month(records),
            exit_distribution: exit_distribution(records),
            mean_hours_per_month: mean_hours_per_month(records),
            hours_histogram: hours_histogram(records, HISTOGRAM_BINS),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.closures_per_month.is_empty() && self.exit_distribution.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Closures per month");
        let max = self.closures_per_month.iter().map(|(_, c)| *c).max().unwrap_or(0);
        for (month, count) in &self.closures_per_month {
            let _ = writeln!(out, "  {} {} {}", month, bar(*count as f64, max as f64), count);
        }

        let _ = writeln!(out, "\nExit condition distribution");
        let total: usize = self.exit_distribution.iter().map(|(_, c)| c).sum();
        for (condition, count) in &self.exit_distribution {
            let share = *count as f64 * 100.0 / total.max(1) as f64;
            let _ = writeln!(out, "  {:<18} {} {:.1}%", condition.label(), bar(share, 100.0), share);
        }

        let _ = writeln!(out, "\nMean hours per month");
        let values: Vec<f64> = self.mean_hours_per_month.iter().map(|(_, h)| *h).collect();
        let _ = writeln!(out, "  {}", sparkline(&values));
        for (month, hours) in &self.mean_hours_per_month {
            let _ = writeln!(out, "  {} {}", month, format_hours(Some((*hours * 10.0).round() / 10.0)));
        }

        let _ = writeln!(out, "\nWork hours histogram");
        let max = self.hours_histogram.iter().map(|b| b.count).max().unwrap_or(0);
        for bin in &self.hours_histogram {
            let _ = writeln!(out, "  {:>8.1} - {:<8.1} {} {}", bin.from, bin.to, bar(bin.count as f64, max as f64), bin.count);
        }

        out
    }
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.min(BAR_WIDTH))
}

fn sparkline(values: &[f64]) -> String {
    let max = values.iter().cloned().fold(0.0, f64::max);
    values
        .iter()
        .map(|v| {
            if max <= 0.0 {
                SPARK_LEVELS[0]
            } else {
                let level = ((v / max) * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
                SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
            }
        })
        .collect()
}

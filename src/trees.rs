use crate::ticker::Tick;
use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use std::time::Duration;

/// Hectares of tree cover lost per year (global baseline).
pub const ANNUAL_LOSS_HECTARES: f64 = 10_000_000.0;
/// Average trees per hectare.
pub const TREES_PER_HECTARE: f64 = 1000.0;
pub const SECONDS_PER_YEAR: f64 = 365.0 * 24.0 * 60.0 * 60.0;

pub fn trees_per_second() -> f64 {
    (ANNUAL_LOSS_HECTARES * TREES_PER_HECTARE) / SECONDS_PER_YEAR
}

/// Whole seconds of real time elapsed since local midnight on January 1st of
/// `now`'s year. Offset changes in between (daylight saving) do not count.
pub fn seconds_since_year_start<Tz: TimeZone>(now: &DateTime<Tz>) -> i64 {
    NaiveDate::from_ymd_opt(now.year(), 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|midnight| now.timezone().from_local_datetime(&midnight).earliest())
        .map(|start| now.clone().signed_duration_since(start).num_seconds().max(0))
        .unwrap_or(0)
}

/// Year-to-date estimate of trees lost. Re-seeded from the clock on every
/// start; only the ledgers are persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeLossState {
    pub trees_lost: f64,
    pub trees_per_second: f64,
}

impl TreeLossState {
    pub fn seeded_at<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let trees_per_second = trees_per_second();
        Self {
            trees_lost: (trees_per_second * seconds_since_year_start(now) as f64).floor(),
            trees_per_second,
        }
    }

    pub fn display(&self) -> String {
        format_thousands(self.trees_lost.floor() as u64)
    }
}

impl Tick for TreeLossState {
    fn tick(&mut self, interval: Duration) {
        self.trees_lost += self.trees_per_second * interval.as_secs_f64();
    }
}

pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Average price for one observed date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPrice {
    pub date: NaiveDate,
    pub avg_price: f64,
}

/// A per-(product, city) price series with exactly one entry per observed
/// date, sorted ascending.
///
/// Dates with no observations are absent — the series never fabricates an
/// interpolated day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySeries {
    entries: Vec<DailyPrice>,
}

impl DailySeries {
    /// Group raw (date, price) observations by date and average each day.
    pub fn from_observations(observations: impl IntoIterator<Item = (NaiveDate, f64)>) -> Self {
        let mut grouped: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
        for (date, price) in observations {
            let slot = grouped.entry(date).or_insert((0.0, 0));
            slot.0 += price;
            slot.1 += 1;
        }

        let entries = grouped
            .into_iter()
            .map(|(date, (sum, count))| DailyPrice {
                date,
                avg_price: sum / count as f64,
            })
            .collect();

        Self { entries }
    }

    /// Drop entries older than `lookback_days` days before the most recent
    /// observation.
    pub fn restrict_to_lookback(&mut self, lookback_days: i64) {
        if let Some(last) = self.entries.last() {
            let cutoff = last.date - chrono::Duration::days(lookback_days - 1);
            self.entries.retain(|e| e.date >= cutoff);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DailyPrice] {
        &self.entries
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.entries.last().map(|e| e.date)
    }

    /// The trailing `n` average prices, oldest first.
    pub fn tail_prices(&self, n: usize) -> Vec<f64> {
        let start = self.entries.len().saturating_sub(n);
        self.entries[start..].iter().map(|e| e.avg_price).collect()
    }
}

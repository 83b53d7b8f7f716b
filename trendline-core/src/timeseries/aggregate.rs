use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::InterestRecord;

/// Calendar period used to bucket records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Calendar month, labelled with its last day.
    #[default]
    Month,
    /// Calendar year, labelled with December 31.
    Year,
}

impl TimeUnit {
    /// Last day of the period containing `date`.
    #[must_use]
    pub fn period_end(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?
                .checked_add_months(Months::new(1))?
                .pred_opt(),
            Self::Year => NaiveDate::from_ymd_opt(date.year(), 12, 31),
        }
    }
}

/// Average search interest per keyword per calendar period.
///
/// Output is sorted by keyword, then period. Periods without samples are not
/// emitted.
#[must_use]
pub fn aggregate_interest(records: &[InterestRecord], unit: TimeUnit) -> Vec<InterestRecord> {
    let mut buckets: BTreeMap<(&str, NaiveDate), (f64, u32)> = BTreeMap::new();
    for r in records {
        let Some(end) = unit.period_end(r.date) else {
            continue;
        };
        let slot = buckets.entry((r.keyword.as_str(), end)).or_insert((0.0, 0));
        slot.0 += r.search_interest;
        slot.1 += 1;
    }

    buckets
        .into_iter()
        .map(|((keyword, date), (sum, n))| InterestRecord {
            date,
            keyword: keyword.to_string(),
            search_interest: sum / f64::from(n),
        })
        .collect()
}

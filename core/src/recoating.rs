//! Mirror segment recoating status.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{invalid, Result};

/// Number of segments in the primary mirror.
pub const SEGMENT_COUNT: u32 = 91;

/// Days after which a segment is due for recoating.
pub const RECOATING_PERIOD_DAYS: i64 = 365;

/// One segment replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoatingRecord {
    pub segment: u32,
    pub replacement_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentStatus {
    pub segment: u32,
    pub replacement_date: NaiveDate,
    pub days_since_replacement: i64,
    /// Replacements within one recoating period, counted down from the most
    /// recent row.
    pub recoatings_in_period: u32,
    /// Recoatings that should have happened by the replacement date to renew
    /// the whole mirror within one period; compare with
    /// `recoatings_in_period`.
    pub required_recoatings: f64,
    /// Fill colour, dark green when fresh, white when due.
    pub color: String,
}

fn never_recoated() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

/// Status of every segment as of `now`, most recently replaced first.
///
/// Only the latest replacement of each segment counts. Segments without any
/// record are listed as replaced on 1 January 1970.
pub fn segment_status(records: &[RecoatingRecord], now: NaiveDate) -> Result<Vec<SegmentStatus>> {
    let mut latest: BTreeMap<u32, NaiveDate> = BTreeMap::new();
    for r in records {
        if r.segment == 0 || r.segment > SEGMENT_COUNT {
            return Err(invalid(format!("no mirror segment {}", r.segment)));
        }
        let date = latest.entry(r.segment).or_insert(r.replacement_date);
        if r.replacement_date > *date {
            *date = r.replacement_date;
        }
    }
    for segment in 1..=SEGMENT_COUNT {
        latest.entry(segment).or_insert_with(never_recoated);
    }

    let mut rows: Vec<(u32, NaiveDate)> = latest.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let recent = rows
        .iter()
        .filter(|(_, d)| (now - *d).num_days() <= RECOATING_PERIOD_DAYS)
        .count() as u32;

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(i, (segment, replacement_date))| {
            let days = (now - replacement_date).num_days();
            SegmentStatus {
                segment,
                replacement_date,
                days_since_replacement: days,
                recoatings_in_period: recent.saturating_sub(i as u32),
                required_recoatings: required_recoatings(replacement_date, now),
                color: freshness_color(days),
            }
        })
        .collect())
}

/// Green (hue 99°) whose lightness rises from 33% to 100% over the
/// recoating period.
pub fn freshness_color(days_since_replacement: i64) -> String {
    let days = days_since_replacement.clamp(0, RECOATING_PERIOD_DAYS) as f64;
    let lightness = 0.33 + 0.67 * days / RECOATING_PERIOD_DAYS as f64;
    let (r, g, b) = hls_to_rgb(99.0 / 360.0, lightness, 1.0);
    let hex = |v: f64| (255.0 * v).round().clamp(0.0, 255.0) as u8;
    format!("#{:02x}{:02x}{:02x}", hex(r), hex(g), hex(b))
}

/// Segments that should have been recoated by `date` for the whole mirror to
/// be renewed over the period ending at `now`.
pub fn required_recoatings(date: NaiveDate, now: NaiveDate) -> f64 {
    let into_period = RECOATING_PERIOD_DAYS - (now - date).num_days();
    let days = into_period.clamp(0, RECOATING_PERIOD_DAYS) as f64;
    SEGMENT_COUNT as f64 * days / RECOATING_PERIOD_DAYS as f64
}

fn hls_to_rgb(h: f64, l: f64, s: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    (
        hue_channel(m1, m2, h + 1.0 / 3.0),
        hue_channel(m1, m2, h),
        hue_channel(m1, m2, h - 1.0 / 3.0),
    )
}

fn hue_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}

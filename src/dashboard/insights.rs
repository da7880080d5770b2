//! Derived series computed from the raw snapshot history.
//!
//! Nothing here is stored; it is recomputed from the history on every page.
//! Undefined ratios are `None` rather than NaN or infinity, so charts can
//! leave a gap and JSON consumers get `null`.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::db::models::StatSnapshot;

/// A snapshot plus its three derived values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightRow {
    pub timestamp: NaiveDateTime,
    pub view_count: Option<i64>,
    pub like_count: Option<i64>,
    pub comment_count: Option<i64>,
    /// Views gained since the previous sample (0 for the first row).
    ///
    /// Only an hourly rate when the collector runs hourly; nothing enforces that.
    pub views_per_hour: i64,
    /// likes / views * 100, from cumulative totals
    pub engagement_rate: Option<f64>,
    /// comments / likes, from cumulative totals
    pub discussion_ratio: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Insights {
    pub rows: Vec<InsightRow>,
}

/// `numerator / denominator * scale`, or `None` when undefined.
fn ratio(numerator: Option<i64>, denominator: Option<i64>, scale: f64) -> Option<f64> {
    let value = numerator? as f64 / denominator? as f64 * scale;
    value.is_finite().then_some(value)
}

/// Enriches `history` (in timestamp order) with the derived columns.
pub fn derive_insights(history: &[StatSnapshot]) -> Insights {
    let mut rows = Vec::with_capacity(history.len());
    let mut previous_views: Option<Option<i64>> = None;

    for snapshot in history {
        let views_per_hour = match (previous_views, snapshot.view_count) {
            (Some(Some(prev)), Some(current)) => current - prev,
            _ => 0,
        };
        previous_views = Some(snapshot.view_count);

        rows.push(InsightRow {
            timestamp: snapshot.timestamp,
            view_count: snapshot.view_count,
            like_count: snapshot.like_count,
            comment_count: snapshot.comment_count,
            views_per_hour,
            engagement_rate: ratio(snapshot.like_count, snapshot.view_count, 100.0),
            discussion_ratio: ratio(snapshot.comment_count, snapshot.like_count, 1.0),
        });
    }

    Insights { rows }
}

impl Insights {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Views gained per sample, without the first row (it has no predecessor).
    pub fn views_gained(&self) -> Vec<(NaiveDateTime, i64)> {
        self.rows
            .iter()
            .skip(1)
            .map(|r| (r.timestamp, r.views_per_hour))
            .collect()
    }

    /// Engagement rate per sample; missing values are kept as gaps.
    pub fn engagement(&self) -> Vec<(NaiveDateTime, Option<f64>)> {
        self.rows
            .iter()
            .map(|r| (r.timestamp, r.engagement_rate))
            .collect()
    }

    /// Discussion ratio per sample with missing values dropped.
    pub fn discussion(&self) -> Vec<(NaiveDateTime, f64)> {
        self.rows
            .iter()
            .filter_map(|r| r.discussion_ratio.map(|v| (r.timestamp, v)))
            .collect()
    }
}

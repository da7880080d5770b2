//! Server-side HTML for the dashboard page, charts drawn as inline SVG.

use std::fmt::Write;

use chrono::NaiveDateTime;

use super::history::{History, NoticeLevel};
use super::insights::Insights;

const CHART_WIDTH: f64 = 760.0;
const CHART_HEIGHT: f64 = 240.0;
const CHART_PAD: f64 = 48.0;

const LABEL_FORMAT: &str = "%Y-%m-%d %H:%M";

/// `1234567` -> `"1,234,567"`.
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn format_count(value: Option<i64>) -> String {
    value.map_or_else(|| "n/a".to_string(), format_thousands)
}

fn format_ratio(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.*}", decimals, v))
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================
// Charts
// ============================================

/// Linear mapping from data values to SVG y coordinates.
struct YScale {
    min: f64,
    max: f64,
}

impl YScale {
    fn new(values: impl Iterator<Item = f64>, include_zero: bool) -> Self {
        let (mut min, mut max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if include_zero {
            min = min.min(0.0);
            max = max.max(0.0);
        }
        if !min.is_finite() || !max.is_finite() {
            return Self { min: 0.0, max: 1.0 };
        }
        if (max - min).abs() < f64::EPSILON {
            // flat series, open the range so the line sits mid-chart
            return Self {
                min: min - 1.0,
                max: max + 1.0,
            };
        }
        Self { min, max }
    }

    fn y(&self, value: f64) -> f64 {
        let usable = CHART_HEIGHT - 2.0 * CHART_PAD;
        CHART_HEIGHT - CHART_PAD - (value - self.min) / (self.max - self.min) * usable
    }
}

fn x_at(index: usize, count: usize) -> f64 {
    let usable = CHART_WIDTH - 2.0 * CHART_PAD;
    if count <= 1 {
        return CHART_PAD + usable / 2.0;
    }
    CHART_PAD + index as f64 * usable / (count - 1) as f64
}

fn svg_open(out: &mut String, label: &str) {
    let _ = write!(
        out,
        r#"<svg class="chart" viewBox="0 0 {w} {h}" role="img" aria-label="{label}" xmlns="http://www.w3.org/2000/svg">"#,
        w = CHART_WIDTH,
        h = CHART_HEIGHT,
        label = escape(label),
    );
}

fn svg_axes(out: &mut String, scale: &YScale, first: NaiveDateTime, last: NaiveDateTime) {
    let bottom = CHART_HEIGHT - CHART_PAD;
    let _ = write!(
        out,
        r#"<line class="axis" x1="{p}" y1="{p}" x2="{p}" y2="{b}"/><line class="axis" x1="{p}" y1="{b}" x2="{r}" y2="{b}"/>"#,
        p = CHART_PAD,
        b = bottom,
        r = CHART_WIDTH - CHART_PAD,
    );
    let _ = write!(
        out,
        r#"<text class="tick" x="{x}" y="{ymax}" text-anchor="end">{max}</text><text class="tick" x="{x}" y="{ymin}" text-anchor="end">{min}</text>"#,
        x = CHART_PAD - 6.0,
        ymax = scale.y(scale.max) + 4.0,
        ymin = scale.y(scale.min) + 4.0,
        max = tick_label(scale.max),
        min = tick_label(scale.min),
    );
    let _ = write!(
        out,
        r#"<text class="tick" x="{l}" y="{y}">{first}</text><text class="tick" x="{r}" y="{y}" text-anchor="end">{last}</text>"#,
        l = CHART_PAD,
        r = CHART_WIDTH - CHART_PAD,
        y = CHART_HEIGHT - CHART_PAD / 2.0,
        first = first.format(LABEL_FORMAT),
        last = last.format(LABEL_FORMAT),
    );
}

fn tick_label(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format_thousands(value as i64)
    } else {
        format!("{:.2}", value)
    }
}

fn empty_chart() -> String {
    r#"<p class="empty">Not enough data to plot yet.</p>"#.to_string()
}

/// Bar chart, one bar per point.
pub fn bar_chart(label: &str, points: &[(NaiveDateTime, i64)]) -> String {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return empty_chart();
    };

    let scale = YScale::new(points.iter().map(|(_, v)| *v as f64), true);
    let slot = (CHART_WIDTH - 2.0 * CHART_PAD) / points.len() as f64;
    let bar_width = (slot * 0.7).max(1.0);
    let baseline = scale.y(0.0);

    let mut out = String::new();
    svg_open(&mut out, label);
    svg_axes(&mut out, &scale, first.0, last.0);

    for (i, (ts, value)) in points.iter().enumerate() {
        let top = scale.y(*value as f64);
        let x = CHART_PAD + i as f64 * slot + (slot - bar_width) / 2.0;
        let _ = write!(
            out,
            r#"<rect class="bar" x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}"><title>{ts}: {v}</title></rect>"#,
            y = top.min(baseline),
            w = bar_width,
            h = (baseline - top).abs(),
            ts = ts.format(LABEL_FORMAT),
            v = format_thousands(*value),
        );
    }

    out.push_str("</svg>");
    out
}

/// Line chart. `None` values break the line instead of being plotted.
pub fn line_chart(label: &str, points: &[(NaiveDateTime, Option<f64>)], decimals: usize) -> String {
    let (Some(&(first, _)), Some(&(last, _))) = (points.first(), points.last()) else {
        return empty_chart();
    };
    if points.iter().all(|(_, v)| v.is_none()) {
        return empty_chart();
    }

    let scale = YScale::new(points.iter().filter_map(|(_, v)| *v), false);

    let mut out = String::new();
    svg_open(&mut out, label);
    svg_axes(&mut out, &scale, first, last);

    let mut segment: Vec<(f64, f64)> = Vec::new();
    let mut markers = String::new();
    let flush = |segment: &mut Vec<(f64, f64)>, out: &mut String| {
        if segment.len() > 1 {
            let coords: Vec<String> = segment
                .iter()
                .map(|(x, y)| format!("{:.2},{:.2}", x, y))
                .collect();
            let _ = write!(
                out,
                r#"<polyline class="line" fill="none" points="{}"/>"#,
                coords.join(" ")
            );
        }
        segment.clear();
    };

    for (i, (ts, value)) in points.iter().enumerate() {
        match value {
            Some(v) => {
                let (x, y) = (x_at(i, points.len()), scale.y(*v));
                segment.push((x, y));
                let _ = write!(
                    markers,
                    r#"<circle class="point" cx="{x:.2}" cy="{y:.2}" r="3"><title>{ts}: {v}</title></circle>"#,
                    ts = ts.format(LABEL_FORMAT),
                    v = format_ratio(Some(*v), decimals),
                );
            },
            None => flush(&mut segment, &mut out),
        }
    }
    flush(&mut segment, &mut out);

    out.push_str(&markers);
    out.push_str("</svg>");
    out
}

// ============================================
// Page
// ============================================

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0 auto; max-width: 1100px; padding: 1.5rem; color: #262730; }
h1 { margin-bottom: 0.25rem; }
.notice { padding: 0.75rem 1rem; border-radius: 0.4rem; margin: 0.5rem 0; }
.notice.info { background: #e8f1fb; }
.notice.warning { background: #fdf6dd; }
.notice.error { background: #fdeaea; }
.metrics { display: flex; gap: 1rem; }
.metric { flex: 1; padding: 0.75rem 1rem; border: 1px solid #e6e6ea; border-radius: 0.4rem; }
.metric .label { font-size: 0.9rem; color: #6b6d7a; }
.metric .value { font-size: 2rem; font-weight: 600; }
.chart { width: 100%; height: auto; }
.chart .axis { stroke: #9a9ca8; stroke-width: 1; }
.chart .tick { font-size: 11px; fill: #6b6d7a; }
.chart .bar { fill: #4c78a8; }
.chart .line { stroke: #4c78a8; stroke-width: 2; }
.chart .point { fill: #4c78a8; }
table { border-collapse: collapse; width: 100%; }
th, td { padding: 0.3rem 0.6rem; border-bottom: 1px solid #e6e6ea; text-align: right; }
th:first-child, td:first-child { text-align: left; }
footer { margin-top: 2rem; font-size: 0.8rem; color: #6b6d7a; }
"#;

fn notice_class(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    }
}

fn push_notice(out: &mut String, level: NoticeLevel, message: &str) {
    let _ = write!(
        out,
        r#"<div class="notice {}">{}</div>"#,
        notice_class(level),
        escape(message)
    );
}

fn push_metric(out: &mut String, label: &str, value: Option<i64>) {
    let _ = write!(
        out,
        r#"<div class="metric"><div class="label">{}</div><div class="value">{}</div></div>"#,
        escape(label),
        format_count(value)
    );
}

fn push_raw_table(out: &mut String, history: &History) {
    out.push_str(r#"<details><summary>Show the full data table</summary><table><thead><tr><th>timestamp</th><th>id</th><th>view_count</th><th>like_count</th><th>comment_count</th></tr></thead><tbody>"#);
    for row in history.newest_first() {
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            row.timestamp.format("%Y-%m-%d %H:%M:%S"),
            row.id,
            format_count(row.view_count),
            format_count(row.like_count),
            format_count(row.comment_count),
        );
    }
    out.push_str("</tbody></table></details>");
}

/// Renders the whole dashboard page.
pub fn render_page(history: &History, insights: &Insights, store_label: &str) -> String {
    let mut out = String::with_capacity(16 * 1024);

    out.push_str(r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8">"#);
    out.push_str(r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#);
    out.push_str("<title>YouTube Video Analytics</title>");
    out.push_str(r#"<link rel="icon" href="data:image/svg+xml,%3Csvg xmlns=%22http://www.w3.org/2000/svg%22 viewBox=%220 0 100 100%22%3E%3Ctext y=%22.9em%22 font-size=%2290%22%3E📊%3C/text%3E%3C/svg%3E">"#);
    let _ = write!(out, "<style>{}</style></head><body>", STYLE);

    out.push_str("<h1>📊 YouTube Video Analytics Dashboard</h1>");
    let _ = write!(
        out,
        "<p>Analysing the data collected in <code>{}</code>.</p>",
        escape(store_label)
    );

    for notice in &history.notices {
        push_notice(&mut out, notice.level, &notice.message);
    }

    match history.latest() {
        None => push_notice(
            &mut out,
            NoticeLevel::Warning,
            "There is no data to show yet. The collector needs to run at least once.",
        ),
        Some(latest) => {
            out.push_str("<h2>📈 Current metrics (latest collection)</h2><div class=\"metrics\">");
            push_metric(&mut out, "Total views", latest.view_count);
            push_metric(&mut out, "Total likes", latest.like_count);
            push_metric(&mut out, "Total comments", latest.comment_count);
            out.push_str("</div><hr>");

            out.push_str("<h2>💡 Key insights</h2>");

            out.push_str("<h3>Viral velocity (new views per collection)</h3>");
            out.push_str("<p>How many <strong>new views</strong> the video gained since the previous collection. It shows exactly when growth peaked, which the running total hides.</p>");
            out.push_str(&bar_chart("New views per collection", &insights.views_gained()));

            out.push_str("<h3>Engagement rate (likes / views)</h3>");
            out.push_str("<p>The share of <strong>likes per view</strong>, in percent. A high rate (around 10%) suggests the audience loved it; a low one (around 1%) suggests the opposite. Watch whether it changes as the video gets more popular.</p>");
            out.push_str(&line_chart("Engagement rate (%)", &insights.engagement(), 2));

            out.push_str("<h3>Discussion power (comments / likes)</h3>");
            out.push_str("<p>The number of <strong>comments per like</strong>. It tells whether the video sparks <strong>discussion</strong> (high) or <strong>quiet approval</strong> (low).</p>");
            let discussion: Vec<(NaiveDateTime, Option<f64>)> = insights
                .discussion()
                .into_iter()
                .map(|(ts, v)| (ts, Some(v)))
                .collect();
            out.push_str(&line_chart("Comments per like", &discussion, 4));

            out.push_str("<hr><h2>🗃️ Raw collected data</h2>");
            push_raw_table(&mut out, history);
        },
    }

    let _ = write!(
        out,
        "<footer>Data loaded at {}.</footer></body></html>",
        history.loaded_at.format("%Y-%m-%d %H:%M:%S")
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::history::Notice;
    use crate::dashboard::insights::derive_insights;
    use crate::db::models::StatSnapshot;
    use chrono::{Local, NaiveDate};

    fn ts(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn history(rows: Vec<StatSnapshot>, notices: Vec<Notice>) -> History {
        History {
            rows,
            notices,
            loaded_at: Local::now(),
        }
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
        assert_eq!(format_thousands(-45_000), "-45,000");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_line_chart_breaks_on_missing_values() {
        let points = vec![
            (ts(1), Some(1.0)),
            (ts(2), Some(2.0)),
            (ts(3), None),
            (ts(4), Some(3.0)),
            (ts(5), Some(2.5)),
        ];
        let svg = line_chart("test", &points, 2);
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert_eq!(svg.matches("<circle").count(), 4);
        assert!(!svg.contains("inf"));
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_line_chart_without_points_is_placeholder() {
        assert!(line_chart("test", &[], 2).contains("Not enough data"));
    }

    #[test]
    fn test_line_chart_all_missing_is_placeholder() {
        let svg = line_chart("test", &[(ts(1), None), (ts(2), None)], 2);
        assert!(svg.contains("Not enough data"));
    }

    #[test]
    fn test_bar_chart_handles_negative_and_single_values() {
        let svg = bar_chart("test", &[(ts(2), 50), (ts(3), -20)]);
        assert_eq!(svg.matches("<rect").count(), 2);
        assert!(svg.contains("-20"));

        let svg = bar_chart("test", &[(ts(2), 7)]);
        assert_eq!(svg.matches("<rect").count(), 1);

        assert!(bar_chart("test", &[]).contains("Not enough data"));
    }

    #[test]
    fn test_empty_page_shows_warning_and_notices() {
        let h = history(vec![], vec![Notice::info("collector has not <run>")]);
        let page = render_page(&h, &derive_insights(&h.rows), "youtube_stats.db");

        assert!(page.contains("collector has not &lt;run&gt;"));
        assert!(page.contains("There is no data to show yet"));
        assert!(!page.contains("<svg"));
        assert!(!page.contains("<table>"));
    }

    #[test]
    fn test_page_with_data() {
        let rows = vec![
            StatSnapshot::new(1, ts(1), Some(1_000), Some(10), Some(2)),
            StatSnapshot::new(2, ts(2), Some(1_500), Some(0), Some(3)),
            StatSnapshot::new(3, ts(3), Some(1_234_567), Some(40), Some(4)),
        ];
        let h = history(rows, vec![]);
        let page = render_page(&h, &derive_insights(&h.rows), "youtube_stats.db");

        // headline metrics come from the last row
        assert!(page.contains("1,234,567"));
        assert_eq!(page.matches("<svg").count(), 3);
        assert!(page.contains("<details>"));

        // raw table is newest first
        let newest = page.find("2024-05-01 03:00:00").unwrap();
        let oldest = page.find("2024-05-01 01:00:00").unwrap();
        assert!(newest < oldest);
    }
}

use chrono::{DateTime, Local};
use log::debug;

use crate::report::aggregate::AggregateRow;
use crate::report::filter::MatchedLinesFromMessage;

pub const SUBJECT_MAX_LENGTH: usize = 50;
pub const LINE_MAX_LENGTH: usize = 80;
pub const ELLIPSIS: &str = "...";
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const RAW_HEADER: [&str; 5] = ["Date", "Subject", "Testcase", "Message ID", "Thread ID"];
pub const AGGREGATED_HEADER: [&str; 3] = ["Testcase", "Frequency of failures", "Latest failure"];

pub type Row = Vec<String>;

pub fn format_date(date: &DateTime<Local>) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Values longer than `max_chars` keep their first `max_chars` characters
/// followed by `...`; shorter values are returned unchanged.
pub fn truncate_str(value: &str, max_chars: usize, field_name: &str) -> String {
    let len = value.chars().count();
    if len <= max_chars {
        return value.to_string();
    }
    let mut truncated: String = value.chars().take(max_chars).collect();
    truncated.push_str(ELLIPSIS);
    debug!(
        "Truncated {field_name}: Original value: '{value}', Original length: {len}, New value (truncated): {truncated}, New length: {max_chars}"
    );
    truncated
}

/// One row per matched line.
pub fn to_rows(matched: &[MatchedLinesFromMessage], truncate: bool) -> Vec<Row> {
    let mut rows = Vec::new();
    for m in matched {
        let subject = m.subject.clone().unwrap_or_default();
        let subject = if truncate {
            truncate_str(&subject, SUBJECT_MAX_LENGTH, "subject")
        } else {
            subject
        };
        for line in &m.lines {
            let testcase = if truncate {
                truncate_str(line, LINE_MAX_LENGTH, "testcase")
            } else {
                line.clone()
            };
            rows.push(vec![
                format_date(&m.date),
                subject.clone(),
                testcase,
                m.message_id.clone(),
                m.thread_id.clone().unwrap_or_default(),
            ]);
        }
    }
    rows
}

pub fn to_aggregated_rows(aggregated: &[AggregateRow]) -> Vec<Row> {
    aggregated
        .iter()
        .map(|a| {
            vec![
                a.line.clone(),
                a.frequency.to_string(),
                format_date(&a.most_recent),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn truncation_keeps_prefix_and_ellipsis() {
        let value: String = ('a'..='z').cycle().take(90).collect();
        let truncated = truncate_str(&value, LINE_MAX_LENGTH, "testcase");
        assert_eq!(truncated, format!("{}...", &value[..80]));
        assert_eq!(truncated.chars().count(), 83);
    }

    #[test]
    fn short_values_are_untouched() {
        assert_eq!(truncate_str("short", 80, "testcase"), "short");
        let exact = "x".repeat(50);
        assert_eq!(truncate_str(&exact, 50, "subject"), exact);
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_str("ééé", 2, "subject"), "éé...");
    }

    #[test]
    fn rows_per_line() {
        let date = Local.with_ymd_and_hms(2023, 1, 5, 10, 30, 0).unwrap();
        let matched = vec![MatchedLinesFromMessage {
            message_id: "m1".into(),
            thread_id: Some("t1".into()),
            subject: Some("s".repeat(60)),
            date,
            lines: vec!["Foo".into(), "Bar".into()],
        }];

        let rows = to_rows(&matched, true);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "2023-01-05 10:30:00");
        assert_eq!(rows[0][1], format!("{}...", "s".repeat(50)));
        assert_eq!(rows[1][2], "Bar");
        assert_eq!(rows[1][3..], ["m1".to_string(), "t1".to_string()]);

        let untruncated = to_rows(&matched, false);
        assert_eq!(untruncated[0][1].len(), 60);
    }

    #[test]
    fn aggregated_rows() {
        let rows = to_aggregated_rows(&[AggregateRow {
            line: "Foo".into(),
            frequency: 2,
            most_recent: Local.with_ymd_and_hms(2023, 1, 5, 0, 0, 0).unwrap(),
        }]);
        assert_eq!(rows, vec![vec!["Foo", "2", "2023-01-05 00:00:00"]]);
    }
}

use chrono::{DateTime, Local};
use log::{debug, warn};
use regex::Regex;

use crate::domain::message::{Message, TEXT_PLAIN};

pub const DEFAULT_LINE_SEP: &str = "\r\n";

#[derive(Debug, Clone, PartialEq)]
pub struct MatchedLinesFromMessage {
    pub message_id: String,
    pub thread_id: Option<String>,
    pub subject: Option<String>,
    pub date: DateTime<Local>,
    pub lines: Vec<String>,
}

/// Keeps trimmed body lines that match `pattern` and do not start with
/// any of the skip prefixes.
#[derive(Debug, Clone)]
pub struct LineFilter {
    pub pattern: Regex,
    pub skip_prefixes: Vec<String>,
    pub line_sep: String,
    pub mime_type: String,
}

impl LineFilter {
    pub fn new(pattern: Regex, skip_prefixes: Vec<String>) -> Self {
        Self {
            pattern,
            skip_prefixes,
            line_sep: DEFAULT_LINE_SEP.to_string(),
            mime_type: TEXT_PLAIN.to_string(),
        }
    }

    pub fn with_line_sep(mut self, sep: impl Into<String>) -> Self {
        self.line_sep = sep.into();
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn is_skipped(&self, line: &str) -> bool {
        self.skip_prefixes.iter().any(|p| line.starts_with(p.as_str()))
    }

    pub fn filter_text(&self, text: &str) -> Vec<String> {
        let mut out = Vec::new();
        for line in text.split(self.line_sep.as_str()) {
            let line = line.trim();
            if self.is_skipped(line) {
                warn!("Skipping line: {line}");
                continue;
            }
            if self.pattern.is_match(line) {
                debug!("[PATTERN: {}] Matched line: {}", self.pattern, line);
                out.push(line.to_string());
            }
        }
        out
    }

    /// One entry per message, in message order, even when nothing matched.
    pub fn filter_messages<'a, I>(&self, messages: I) -> Vec<MatchedLinesFromMessage>
    where
        I: IntoIterator<Item = &'a Message>,
    {
        let matched: Vec<_> = messages
            .into_iter()
            .map(|m| self.filter_message(m))
            .collect();
        debug!("[RAW DATA] Matched lines: {matched:?}");
        matched
    }

    fn filter_message(&self, message: &Message) -> MatchedLinesFromMessage {
        let mut lines = Vec::new();
        for part in message.parts_with_type(&self.mime_type) {
            if part.body.encoding_error {
                warn!(
                    "Skipping undecodable {} part {:?} of message {}",
                    self.mime_type, part.id, message.id
                );
                continue;
            }
            lines.extend(self.filter_text(&part.body.data));
        }
        MatchedLinesFromMessage {
            message_id: message.id.clone(),
            thread_id: message.thread_id.clone(),
            subject: message.subject().map(str::to_string),
            date: message.date,
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::message::{Header, MessagePart, MessagePartBody};
    use chrono::TimeZone;

    fn hadoop_filter() -> LineFilter {
        LineFilter::new(
            Regex::new(r".*org\.apache\.hadoop.*").unwrap(),
            vec!["Failed testcases:".into(), "FILTER:".into()],
        )
    }

    fn text_part(data: &str) -> MessagePart {
        MessagePart {
            mime_type: Some("text/plain".into()),
            body: MessagePartBody {
                data: data.into(),
                size: data.len() as u64,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn keeps_trimmed_matching_lines_in_order() {
        let text = [
            "Failed testcases:",
            "  org.apache.hadoop.Foo ",
            "FILTER: bar",
            "org.apache.hadoop.Baz",
        ]
        .join("\r\n");
        assert_eq!(
            hadoop_filter().filter_text(&text),
            vec!["org.apache.hadoop.Foo", "org.apache.hadoop.Baz"]
        );
    }

    #[test]
    fn skip_prefix_wins_over_pattern() {
        let text = "FILTER: org.apache.hadoop.Skipped\r\norg.apache.hadoop.Kept";
        assert_eq!(hadoop_filter().filter_text(text), vec!["org.apache.hadoop.Kept"]);
    }

    #[test]
    fn custom_separator() {
        let filter = hadoop_filter().with_line_sep("\n");
        assert_eq!(
            filter.filter_text("org.apache.hadoop.A\norg.apache.hadoop.B\n"),
            vec!["org.apache.hadoop.A", "org.apache.hadoop.B"]
        );
    }

    #[test]
    fn one_entry_per_message_even_without_matches() {
        let mut root = MessagePart {
            mime_type: Some("multipart/alternative".into()),
            headers: vec![Header {
                name: "Subject".into(),
                value: "YARN Daily unit test report".into(),
            }],
            ..Default::default()
        };
        let mut broken = text_part("org.apache.hadoop.Broken");
        broken.body.encoding_error = true;
        root.parts = vec![
            text_part("org.apache.hadoop.A\r\nnoise"),
            broken,
            MessagePart {
                mime_type: Some("text/html".into()),
                ..text_part("org.apache.hadoop.Html")
            },
        ];
        let date = Local.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let with_match = Message {
            id: "m1".into(),
            thread_id: Some("t1".into()),
            date,
            snippet: None,
            payload: root,
        };
        let without_match = Message {
            id: "m2".into(),
            payload: text_part("nothing here"),
            ..with_match.clone()
        };

        let matched = hadoop_filter().filter_messages([&with_match, &without_match]);
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].lines, vec!["org.apache.hadoop.A"]);
        assert_eq!(matched[0].subject.as_deref(), Some("YARN Daily unit test report"));
        assert_eq!(matched[1].message_id, "m2");
        assert!(matched[1].lines.is_empty());
    }
}

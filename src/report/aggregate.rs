use std::collections::HashMap;

use chrono::{DateTime, Local};

use crate::report::filter::MatchedLinesFromMessage;

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub line: String,
    pub frequency: usize,
    pub most_recent: DateTime<Local>,
}

/// Groups matched lines by their text, in first-seen order. The most
/// recent date only moves on a strictly later date.
pub fn aggregate(matched: &[MatchedLinesFromMessage]) -> Vec<AggregateRow> {
    let mut rows: Vec<AggregateRow> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for m in matched {
        for line in &m.lines {
            match index.get(line.as_str()) {
                Some(&i) => {
                    let row = &mut rows[i];
                    row.frequency += 1;
                    if row.most_recent < m.date {
                        row.most_recent = m.date;
                    }
                }
                None => {
                    index.insert(line.as_str(), rows.len());
                    rows.push(AggregateRow {
                        line: line.clone(),
                        frequency: 1,
                        most_recent: m.date,
                    });
                }
            }
        }
    }
    rows
}

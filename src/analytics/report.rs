//! Owner-facing reporting over the persisted session history.
//!
//! Pure functions: both the summary and the CSV export read a history slice
//! and touch nothing else.

use serde::Serialize;

use crate::analytics::record::SessionRecord;

/// Number of entries in each top list.
const TOP_N: usize = 5;

/// CSV header row, fixed order.
const CSV_HEADERS: [&str; 7] = [
    "Session ID",
    "Start Time",
    "End Time",
    "Messages",
    "Rating",
    "Order Clicked",
    "Questions Asked",
];

/// A question and how often it was asked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuestionCount {
    /// Normalized (lowercased, trimmed) question text.
    pub question: String,
    /// Times asked across the history.
    pub count: u32,
}

/// A menu item and how often it was viewed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ItemCount {
    /// Menu item identifier.
    pub item: String,
    /// Sessions in which it was viewed.
    pub count: u32,
}

/// Aggregated view of the persisted history.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    /// Number of persisted sessions.
    pub total_sessions: usize,
    /// Mean user messages per session, rounded to one decimal.
    pub avg_messages_per_session: f64,
    /// Up to five most frequent normalized questions.
    pub top_questions: Vec<QuestionCount>,
    /// Up to five most viewed menu items.
    pub popular_menu_items: Vec<ItemCount>,
    /// Mean feedback rating over rated sessions, one decimal, 0 when none.
    pub avg_rating: f64,
    /// Share of sessions with an order click, as a whole percentage.
    pub order_click_rate: u32,
}

impl AnalyticsSummary {
    fn empty() -> Self {
        Self {
            total_sessions: 0,
            avg_messages_per_session: 0.0,
            top_questions: Vec::new(),
            popular_menu_items: Vec::new(),
            avg_rating: 0.0,
            order_click_rate: 0,
        }
    }
}

/// Summarize the persisted history.
///
/// An empty history yields all-zero defaults rather than a division error.
/// Ties in the top lists break toward the first-encountered entry: counting
/// preserves encounter order and the descending sort is stable.
#[must_use]
#[allow(clippy::cast_precision_loss)] // counts are far below 2^52
pub fn summarize(history: &[SessionRecord]) -> AnalyticsSummary {
    if history.is_empty() {
        return AnalyticsSummary::empty();
    }

    let total_sessions = history.len();
    let total_messages: u64 = history.iter().map(|s| u64::from(s.message_count)).sum();

    let mut question_counts = counted(
        history
            .iter()
            .flat_map(|s| s.questions_asked.iter())
            .map(|q| q.trim().to_lowercase()),
    );
    question_counts.sort_by(|a, b| b.1.cmp(&a.1));

    let mut item_counts = counted(
        history
            .iter()
            .flat_map(|s| s.menu_items_viewed.iter())
            .cloned(),
    );
    item_counts.sort_by(|a, b| b.1.cmp(&a.1));

    let ratings: Vec<u8> = history.iter().filter_map(|s| s.feedback_rating).collect();
    let avg_rating = if ratings.is_empty() {
        0.0
    } else {
        let sum: u32 = ratings.iter().map(|r| u32::from(*r)).sum();
        round1(f64::from(sum) / ratings.len() as f64)
    };

    let order_clicks = history.iter().filter(|s| s.order_link_clicked).count();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let order_click_rate = (order_clicks as f64 / total_sessions as f64 * 100.0).round() as u32;

    AnalyticsSummary {
        total_sessions,
        avg_messages_per_session: round1(total_messages as f64 / total_sessions as f64),
        top_questions: question_counts
            .into_iter()
            .take(TOP_N)
            .map(|(question, count)| QuestionCount { question, count })
            .collect(),
        popular_menu_items: item_counts
            .into_iter()
            .take(TOP_N)
            .map(|(item, count)| ItemCount { item, count })
            .collect(),
        avg_rating,
        order_click_rate,
    }
}

/// Export the full history as delimited text with a fixed header row.
///
/// Timestamps are ISO-8601 (blank end time while a record has none), the
/// order flag renders as `Yes`/`No`, and the question list is
/// semicolon-joined inside double quotes.
#[must_use]
pub fn export_csv(history: &[SessionRecord]) -> String {
    let mut lines = Vec::with_capacity(history.len() + 1);
    lines.push(CSV_HEADERS.join(","));

    for session in history {
        let row = [
            session.session_id.clone(),
            iso8601(&session.start_time),
            session.end_time.as_ref().map(iso8601).unwrap_or_default(),
            session.message_count.to_string(),
            session
                .feedback_rating
                .map(|r| r.to_string())
                .unwrap_or_default(),
            if session.order_link_clicked { "Yes" } else { "No" }.to_string(),
            format!("\"{}\"", session.questions_asked.join("; ")),
        ];
        lines.push(row.join(","));
    }

    lines.join("\n")
}

fn iso8601(timestamp: &chrono::DateTime<chrono::Utc>) -> String {
    timestamp.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Count occurrences while preserving first-encounter order.
fn counted(values: impl Iterator<Item = String>) -> Vec<(String, u32)> {
    let mut counts: Vec<(String, u32)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(questions: &[&str], items: &[&str]) -> SessionRecord {
        let mut record = SessionRecord::started_now();
        record.questions_asked = questions.iter().map(|q| (*q).to_string()).collect();
        record.menu_items_viewed = items.iter().map(|i| (*i).to_string()).collect();
        record.message_count = u32::try_from(questions.len()).unwrap_or(0);
        record
    }

    #[test]
    fn test_empty_history_yields_zero_defaults() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_sessions, 0);
        assert!(summary.avg_messages_per_session.abs() < f64::EPSILON);
        assert!(summary.avg_rating.abs() < f64::EPSILON);
        assert_eq!(summary.order_click_rate, 0);
        assert!(summary.top_questions.is_empty());
    }

    #[test]
    fn test_questions_normalize_and_count() {
        let history = vec![
            session(&["What are your HOURS? ", "do you deliver"], &[]),
            session(&["what are your hours?"], &[]),
        ];
        let summary = summarize(&history);
        assert_eq!(summary.top_questions[0].question, "what are your hours?");
        assert_eq!(summary.top_questions[0].count, 2);
        assert_eq!(summary.top_questions[1].count, 1);
    }

    #[test]
    fn test_ties_break_toward_first_encountered() {
        let history = vec![session(&[], &["onion-rings", "loaded-fries"])];
        let summary = summarize(&history);
        let items: Vec<&str> = summary
            .popular_menu_items
            .iter()
            .map(|c| c.item.as_str())
            .collect();
        assert_eq!(items, vec!["onion-rings", "loaded-fries"]);
    }

    #[test]
    fn test_averages_round_to_one_decimal() {
        let mut a = session(&["q1"], &[]);
        a.feedback_rating = Some(4);
        let mut b = session(&["q2", "q3"], &[]);
        b.feedback_rating = Some(5);
        let c = session(&[], &[]);

        let summary = summarize(&[a, b, c]);
        assert!((summary.avg_messages_per_session - 1.0).abs() < f64::EPSILON);
        assert!((summary.avg_rating - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_order_click_rate_is_a_whole_percentage() {
        let mut a = session(&[], &[]);
        a.order_link_clicked = true;
        let b = session(&[], &[]);
        let c = session(&[], &[]);

        let summary = summarize(&[a, b, c]);
        assert_eq!(summary.order_click_rate, 33);
    }

    #[test]
    fn test_csv_has_header_plus_one_row_per_session() {
        let mut first = session(&["hi there", "hours?"], &[]);
        first.feedback_rating = Some(5);
        first.end_time = Some(chrono::Utc::now());
        let second = session(&[], &[]);

        let csv = export_csv(&[first, second]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADERS.join(","));
        assert!(lines[1].contains("\"hi there; hours?\""));
        assert!(lines[1].contains(",Yes,") || lines[1].contains(",No,"));
        // Second session: no end time and no rating leave blank columns.
        assert!(lines[2].contains(",,"));
    }

    #[test]
    fn test_csv_header_has_seven_columns() {
        let csv = export_csv(&[]);
        assert_eq!(csv.split(',').count(), 7);
    }
}

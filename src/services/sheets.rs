use anyhow::Context;
use parfumbot::FeedbackStats;
use serde::Serialize;

// Two metric rows plus the header, always written to the same corner
// of the first sheet.
const METRICS_RANGE: &str = "A1:B3";

#[derive(Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    token: String,
    spreadsheet_id: String,
}

#[derive(Serialize)]
struct ValueRange<'a> {
    range: &'a str,
    #[serde(rename = "majorDimension")]
    major_dimension: &'a str,
    values: Vec<Vec<String>>,
}

pub fn build_metrics_rows(stats: &FeedbackStats) -> Vec<Vec<String>> {
    let average = stats
        .average_score
        .map(|avg| format!("{:.2}", avg))
        .unwrap_or_else(|| "-".to_string());

    vec![
        vec!["Метрика".to_string(), "Значение".to_string()],
        vec!["Средняя оценка".to_string(), average],
        vec!["Всего отзывов".to_string(), stats.total_feedback.to_string()],
    ]
}

impl SheetsClient {
    pub fn new(token: String, spreadsheet_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
            spreadsheet_id,
        }
    }

    /// Overwrites the fixed metrics range with the current feedback
    /// aggregates.
    pub async fn update_feedback_metrics(&self, stats: &FeedbackStats) -> anyhow::Result<()> {
        let url = format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{}/values/{}?valueInputOption=RAW",
            self.spreadsheet_id, METRICS_RANGE
        );

        let body = ValueRange {
            range: METRICS_RANGE,
            major_dimension: "ROWS",
            values: build_metrics_rows(stats),
        };

        self.http
            .put(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .context("sheets update request failed")?
            .error_for_status()
            .context("sheets update returned an error status")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_rows_carry_header_average_and_count() {
        let rows = build_metrics_rows(&FeedbackStats {
            average_score: Some(4.25),
            total_feedback: 8,
        });

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["Метрика", "Значение"]);
        assert_eq!(rows[1], vec!["Средняя оценка", "4.25"]);
        assert_eq!(rows[2], vec!["Всего отзывов", "8"]);
    }

    #[test]
    fn metrics_rows_handle_no_feedback_yet() {
        let rows = build_metrics_rows(&FeedbackStats {
            average_score: None,
            total_feedback: 0,
        });

        assert_eq!(rows[1], vec!["Средняя оценка", "-"]);
        assert_eq!(rows[2], vec!["Всего отзывов", "0"]);
    }
}

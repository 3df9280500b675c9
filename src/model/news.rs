use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct NewsItem {
    pub headline: String,
    pub summary: String,
    pub url: String,
    pub source: String,
    pub published_at: Option<DateTime<Utc>>,
}

impl NewsItem {
    pub fn summary_or_placeholder(&self) -> &str {
        if self.summary.trim().is_empty() {
            "No summary available."
        } else {
            &self.summary
        }
    }

    pub fn date_label(&self) -> String {
        self.published_at
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "---".to_string())
    }
}

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub finnhub: FinnhubConfig,
    pub poll: PollConfig,
    pub wallet: WalletConfig,
    pub ui: UiConfig,
    #[serde(default)]
    pub quiz: QuizConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FinnhubConfig {
    pub rest_base_url: String,
    #[serde(default = "default_indicator_period")]
    pub indicator_period: u32,
    #[serde(default = "default_indicator_resolution")]
    pub indicator_resolution: String,
    #[serde(default = "default_indicator_lookback_secs")]
    pub indicator_lookback_secs: i64,
    #[serde(default = "default_news_lookback_days")]
    pub news_lookback_days: i64,
    #[serde(default = "default_news_limit")]
    pub news_limit: usize,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(skip)]
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
    pub starting_balance: f64,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartStyle {
    #[default]
    Line,
    Bar,
    Area,
}

impl ChartStyle {
    pub fn next(self) -> Self {
        match self {
            Self::Line => Self::Bar,
            Self::Bar => Self::Area,
            Self::Area => Self::Line,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Line => "Line",
            Self::Bar => "Bar",
            Self::Area => "Area",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub refresh_rate_ms: u64,
    pub series_window: usize,
    #[serde(default = "default_true")]
    pub show_sma: bool,
    #[serde(default)]
    pub show_ema: bool,
    #[serde(default)]
    pub chart_style: ChartStyle,
    #[serde(default = "default_notice_ttl_ms")]
    pub notice_ttl_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizConfig {
    pub questions_per_round: usize,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            questions_per_round: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    pub reply_delay_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

fn default_indicator_period() -> u32 {
    5
}

fn default_indicator_resolution() -> String {
    "1".to_string()
}

fn default_indicator_lookback_secs() -> i64 {
    300
}

fn default_news_lookback_days() -> i64 {
    3
}

fn default_news_limit() -> usize {
    5
}

fn default_request_timeout_ms() -> u64 {
    8_000
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

fn default_true() -> bool {
    true
}

fn default_notice_ttl_ms() -> u64 {
    4_000
}

/// Parse a Finnhub candle resolution ("1", "5", "15", "30", "60", "D", "W", "M") into seconds.
pub fn parse_resolution_secs(s: &str) -> Result<u64> {
    let secs = match s.trim() {
        "1" => 60,
        "5" => 5 * 60,
        "15" => 15 * 60,
        "30" => 30 * 60,
        "60" => 3_600,
        "D" => 86_400,
        "W" => 7 * 86_400,
        "M" => 30 * 86_400,
        other => bail!(
            "invalid resolution '{}': expected one of 1/5/15/30/60/D/W/M",
            other
        ),
    };
    Ok(secs)
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl FinnhubConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = Path::new("config/default.toml");
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;

        let mut config =
            Self::from_toml_str(&config_str).context("failed to parse config/default.toml")?;

        config.finnhub.api_key = std::env::var("FINNHUB_API_KEY")
            .context("FINNHUB_API_KEY not set in .env or environment")?;
        if config.finnhub.api_key.trim().is_empty() {
            bail!("FINNHUB_API_KEY is empty");
        }

        Ok(config)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).context("invalid config TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.finnhub.rest_base_url).with_context(|| {
            format!(
                "finnhub.rest_base_url '{}' is not a valid URL",
                self.finnhub.rest_base_url
            )
        })?;
        parse_resolution_secs(&self.finnhub.indicator_resolution)
            .context("finnhub.indicator_resolution is invalid")?;
        if self.finnhub.indicator_period == 0 {
            bail!("finnhub.indicator_period must be > 0");
        }
        if self.finnhub.indicator_lookback_secs <= 0 {
            bail!("finnhub.indicator_lookback_secs must be > 0");
        }
        if self.finnhub.news_limit == 0 {
            bail!("finnhub.news_limit must be > 0");
        }
        if self.poll.interval_secs == 0 {
            bail!("poll.interval_secs must be > 0");
        }
        if !self.wallet.starting_balance.is_finite() || self.wallet.starting_balance < 0.0 {
            bail!(
                "wallet.starting_balance must be a non-negative number, got {}",
                self.wallet.starting_balance
            );
        }
        if self.ui.series_window == 0 {
            bail!("ui.series_window must be > 0");
        }
        if self.quiz.questions_per_round == 0 {
            bail!("quiz.questions_per_round must be > 0");
        }
        Ok(())
    }
}

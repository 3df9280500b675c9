/// One poll tick's worth of chart data. Missing indicator values stay `None`
/// and are drawn as gaps, never as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub label: String,
    pub price: f64,
    pub sma: Option<f64>,
    pub ema: Option<f64>,
}

impl Sample {
    pub fn new(label: impl Into<String>, price: f64, sma: Option<f64>, ema: Option<f64>) -> Self {
        Self {
            label: label.into(),
            price,
            sma,
            ema,
        }
    }
}

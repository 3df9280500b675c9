use std::collections::VecDeque;

use super::sample::Sample;

pub const DEFAULT_SERIES_WINDOW: usize = 20;

/// Rolling chart buffer: newest sample at the back, at most `capacity` entries.
///
/// Labels, prices, SMA and EMA are projected from the same deque, so the four
/// sequences handed to the chart always have equal length.
#[derive(Debug, Clone)]
pub struct SeriesWindow {
    capacity: usize,
    samples: VecDeque<Sample>,
}

impl SeriesWindow {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "series window must be > 0");
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Append one sample; evicts exactly one from the front once over capacity.
    pub fn append(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        if self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.samples.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.price).collect()
    }

    pub fn sma(&self) -> Vec<Option<f64>> {
        self.samples.iter().map(|s| s.sma).collect()
    }

    pub fn ema(&self) -> Vec<Option<f64>> {
        self.samples.iter().map(|s| s.ema).collect()
    }

    /// Min/max over prices and whichever indicator values are present.
    pub fn price_range(&self, include_sma: bool, include_ema: bool) -> Option<(f64, f64)> {
        let mut values = self.samples.iter().flat_map(|s| {
            let sma = if include_sma { s.sma } else { None };
            let ema = if include_ema { s.ema } else { None };
            std::iter::once(Some(s.price)).chain([sma, ema]).flatten()
        });
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Percentage change between the oldest and newest price in the window.
    pub fn change_pct(&self) -> Option<f64> {
        let first = self.samples.front()?.price;
        let last = self.samples.back()?.price;
        if first == 0.0 {
            return None;
        }
        Some((last - first) / first * 100.0)
    }
}

impl Default for SeriesWindow {
    fn default() -> Self {
        Self::new(DEFAULT_SERIES_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(i: usize) -> Sample {
        Sample::new(format!("t{}", i), 100.0 + i as f64, None, None)
    }

    #[test]
    fn append_below_capacity_keeps_everything() {
        let mut w = SeriesWindow::new(3);
        w.append(sample(0));
        w.append(sample(1));
        assert_eq!(w.len(), 2);
        assert_eq!(w.labels(), vec!["t0", "t1"]);
    }

    #[test]
    fn append_over_capacity_evicts_oldest_only() {
        let mut w = SeriesWindow::new(3);
        for i in 0..5 {
            w.append(sample(i));
        }
        assert_eq!(w.len(), 3);
        assert_eq!(w.labels(), vec!["t2", "t3", "t4"]);
        assert_eq!(w.latest().map(|s| s.price), Some(104.0));
    }

    #[test]
    fn price_range_skips_absent_indicators() {
        let mut w = SeriesWindow::new(5);
        w.append(Sample::new("a", 10.0, Some(8.0), None));
        w.append(Sample::new("b", 12.0, None, Some(15.0)));
        assert_eq!(w.price_range(false, false), Some((10.0, 12.0)));
        assert_eq!(w.price_range(true, true), Some((8.0, 15.0)));
        assert_eq!(SeriesWindow::new(2).price_range(true, true), None);
    }

    #[test]
    fn change_pct_uses_window_edges() {
        let mut w = SeriesWindow::new(5);
        assert_eq!(w.change_pct(), None);
        w.append(Sample::new("a", 100.0, None, None));
        w.append(Sample::new("b", 110.0, None, None));
        assert!((w.change_pct().unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    #[should_panic(expected = "series window must be > 0")]
    fn zero_capacity_panics() {
        SeriesWindow::new(0);
    }
}

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Widget},
};

use crate::config::ChartStyle;
use crate::model::series::SeriesWindow;

const PRICE_COLOR: Color = Color::Cyan;
const SMA_COLOR: Color = Color::Yellow;
const EMA_COLOR: Color = Color::Magenta;

pub struct PriceChart<'a> {
    series: &'a SeriesWindow,
    title: &'a str,
    show_sma: bool,
    show_ema: bool,
    style: ChartStyle,
    period: u32,
}

impl<'a> PriceChart<'a> {
    pub fn new(series: &'a SeriesWindow, title: &'a str) -> Self {
        Self {
            series,
            title,
            show_sma: true,
            show_ema: false,
            style: ChartStyle::Line,
            period: 5,
        }
    }

    pub fn show_sma(mut self, on: bool) -> Self {
        self.show_sma = on;
        self
    }

    pub fn show_ema(mut self, on: bool) -> Self {
        self.show_ema = on;
        self
    }

    pub fn style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }

    pub fn period(mut self, period: u32) -> Self {
        self.period = period;
        self
    }
}

/// Maps a price onto a row of a `height`-row plot whose top row is `top`.
struct Scale {
    min: f64,
    range: f64,
    top: u16,
    height: usize,
}

impl Scale {
    fn row(&self, value: f64) -> u16 {
        let normalized = ((value - self.min) / self.range).clamp(0.0, 1.0);
        let steps = (self.height - 1) as f64;
        let from_bottom = (normalized * steps).round() as usize;
        self.top + (self.height - 1 - from_bottom.min(self.height - 1)) as u16
    }

    fn bottom(&self) -> u16 {
        self.top + self.height as u16 - 1
    }
}

fn column_x(left: u16, width: usize, index: usize, count: usize) -> u16 {
    if count <= 1 {
        return left;
    }
    let span = (width - 1) as f64;
    left + ((index as f64) * span / (count - 1) as f64).round() as u16
}

/// Connect `points` column by column. `None` entries break the line.
fn plot_line(buf: &mut Buffer, scale: &Scale, points: &[(u16, Option<f64>)], glyph: &str, color: Color) {
    let style = Style::default().fg(color);
    for pair in points.windows(2) {
        let (x0, v0) = pair[0];
        let (x1, v1) = pair[1];
        if let (Some(a), Some(b)) = (v0, v1) {
            let gap = x1.saturating_sub(x0);
            for dx in 1..gap {
                let t = dx as f64 / gap as f64;
                let y = scale.row(a + (b - a) * t);
                buf.set_string(x0 + dx, y, "·", style);
            }
        }
    }
    for &(x, v) in points {
        if let Some(v) = v {
            buf.set_string(x, scale.row(v), glyph, style);
        }
    }
}

impl Widget for PriceChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 4 || inner.width < 12 {
            return;
        }
        let Some((min_price, max_price)) = self.series.price_range(self.show_sma, self.show_ema)
        else {
            buf.set_string(
                inner.x + 1,
                inner.y + inner.height / 2,
                "Waiting for data... enter a ticker and press Enter",
                Style::default().fg(Color::DarkGray),
            );
            return;
        };

        // Top row: max label. Bottom row: time labels and legend.
        let axis_width: u16 = 10;
        let plot_left = inner.x + axis_width;
        let plot_width = inner.width.saturating_sub(axis_width) as usize;
        if plot_width < 2 {
            return;
        }
        let range = max_price - min_price;
        let (min_price, range) = if range < 0.01 {
            (min_price - 0.5, 1.0)
        } else {
            (min_price, range)
        };
        let scale = Scale {
            min: min_price,
            range,
            top: inner.y,
            height: inner.height.saturating_sub(1) as usize,
        };

        let count = self.series.len().min(plot_width);
        let skip = self.series.len() - count;
        let samples: Vec<_> = self.series.samples().skip(skip).collect();
        let xs: Vec<u16> = (0..count)
            .map(|i| column_x(plot_left, plot_width, i, count))
            .collect();

        let price_style = Style::default().fg(PRICE_COLOR);
        match self.style {
            ChartStyle::Line => {
                let points: Vec<(u16, Option<f64>)> =
                    xs.iter().zip(&samples).map(|(&x, s)| (x, Some(s.price))).collect();
                plot_line(buf, &scale, &points, "●", PRICE_COLOR);
            }
            ChartStyle::Bar => {
                for (&x, s) in xs.iter().zip(&samples) {
                    let top = scale.row(s.price);
                    for y in top..=scale.bottom() {
                        buf.set_string(x, y, "█", price_style);
                    }
                }
            }
            ChartStyle::Area => {
                let mut prev: Option<(u16, f64)> = None;
                for (&x, s) in xs.iter().zip(&samples) {
                    // Fill the columns between samples at the interpolated height.
                    let start = prev.map(|(px, _)| px + 1).unwrap_or(x);
                    for cx in start..=x {
                        let value = match prev {
                            Some((px, pv)) if x > px => {
                                pv + (s.price - pv) * (cx - px) as f64 / (x - px) as f64
                            }
                            _ => s.price,
                        };
                        let top = scale.row(value);
                        buf.set_string(cx, top, "▀", price_style);
                        for y in top + 1..=scale.bottom() {
                            buf.set_string(cx, y, "░", price_style);
                        }
                    }
                    prev = Some((x, s.price));
                }
            }
        }

        if self.show_sma {
            let points: Vec<(u16, Option<f64>)> =
                xs.iter().zip(&samples).map(|(&x, s)| (x, s.sma)).collect();
            plot_line(buf, &scale, &points, "s", SMA_COLOR);
        }
        if self.show_ema {
            let points: Vec<(u16, Option<f64>)> =
                xs.iter().zip(&samples).map(|(&x, s)| (x, s.ema)).collect();
            plot_line(buf, &scale, &points, "e", EMA_COLOR);
        }

        let label_style = Style::default().fg(Color::DarkGray);
        buf.set_string(inner.x, inner.y, format!("{:.2}", min_price + range), label_style);
        buf.set_string(inner.x, scale.bottom(), format!("{:.2}", min_price), label_style);

        let label_y = inner.y + inner.height - 1;
        if let (Some(first), Some(last)) = (samples.first(), samples.last()) {
            buf.set_string(plot_left, label_y, &first.label, label_style);
            if samples.len() > 1 {
                let x = (plot_left + plot_width as u16).saturating_sub(last.label.len() as u16);
                buf.set_string(x, label_y, &last.label, label_style);
            }
        }

        let mut legend = vec![("● Price".to_string(), PRICE_COLOR)];
        if self.show_sma {
            legend.push((format!("s SMA({})", self.period), SMA_COLOR));
        }
        if self.show_ema {
            legend.push((format!("e EMA({})", self.period), EMA_COLOR));
        }
        let legend_width: usize = legend.iter().map(|(t, _)| t.chars().count() + 2).sum();
        let mut x = plot_left + (plot_width.saturating_sub(legend_width) / 2) as u16;
        for (text, color) in legend {
            buf.set_string(x, label_y, &text, Style::default().fg(color));
            x += text.chars().count() as u16 + 2;
        }
    }
}

use ticker_desk::model::sample::Sample;
use ticker_desk::model::series::{SeriesWindow, DEFAULT_SERIES_WINDOW};

fn sample(i: usize) -> Sample {
    Sample::new(format!("t{}", i), 100.0 + i as f64, Some(99.0 + i as f64), None)
}

#[test]
fn window_never_exceeds_capacity_and_keeps_latest_in_order() {
    let mut window = SeriesWindow::default();
    assert_eq!(window.capacity(), DEFAULT_SERIES_WINDOW);

    for i in 0..57 {
        window.append(sample(i));
        assert!(window.len() <= DEFAULT_SERIES_WINDOW);
    }

    assert_eq!(window.len(), 20);
    let labels = window.labels();
    assert_eq!(labels.first(), Some(&"t37"));
    assert_eq!(labels.last(), Some(&"t56"));
    let prices = window.prices();
    assert!(prices.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn parallel_sequences_stay_equal_length() {
    let mut window = SeriesWindow::new(3);
    for i in 0..5 {
        window.append(sample(i));
        assert_eq!(window.labels().len(), window.prices().len());
        assert_eq!(window.prices().len(), window.sma().len());
        assert_eq!(window.sma().len(), window.ema().len());
    }
}

#[test]
fn missing_indicators_are_kept_as_none() {
    let mut window = SeriesWindow::new(5);
    window.append(Sample::new("a", 10.0, None, None));
    window.append(Sample::new("b", 11.0, Some(10.5), None));
    assert_eq!(window.sma(), vec![None, Some(10.5)]);
    assert_eq!(window.ema(), vec![None, None]);
}

#[test]
fn reset_clears_everything() {
    let mut window = SeriesWindow::new(5);
    window.append(sample(1));
    window.append(sample(2));
    window.reset();
    assert!(window.is_empty());
    assert!(window.latest().is_none());
    assert!(window.price_range(true, true).is_none());
}

#[test]
fn price_range_only_includes_enabled_indicators() {
    let mut window = SeriesWindow::new(5);
    window.append(Sample::new("a", 10.0, Some(5.0), Some(20.0)));
    assert_eq!(window.price_range(false, false), Some((10.0, 10.0)));
    assert_eq!(window.price_range(true, false), Some((5.0, 10.0)));
    assert_eq!(window.price_range(true, true), Some((5.0, 20.0)));
}

#[test]
fn change_pct_spans_the_window() {
    let mut window = SeriesWindow::new(5);
    window.append(Sample::new("a", 100.0, None, None));
    window.append(Sample::new("b", 110.0, None, None));
    let pct = window.change_pct().unwrap();
    assert!((pct - 10.0).abs() < 1e-9);
}

#[test]
fn change_pct_is_undefined_for_zero_first_price() {
    let mut window = SeriesWindow::new(5);
    window.append(Sample::new("a", 0.0, None, None));
    window.append(Sample::new("b", 10.0, None, None));
    assert_eq!(window.change_pct(), None);
}

//! Integration tests for the signal engine and series building
//!
//! These tests exercise the public API end to end, from raw exchange
//! records to a classified signal.

use approx::assert_relative_eq;
use serde_json::{json, Value};

use indodax_signals::data;
use indodax_signals::signal::{
    SignalConfig, SignalEngine, SignalError, SignalMode, VolumeWindow,
    REASON_ABOVE_MEAN_RISING_VOLUME, REASON_BELOW_LOWER_BAND, REASON_UPPER_BAND_SPIKE,
};
use indodax_signals::{Config, Signal};

// =============================================================================
// Test Utilities
// =============================================================================

fn heuristic() -> SignalEngine {
    SignalEngine::new(SignalConfig::heuristic()).unwrap()
}

/// Newest-first trade records at a flat price, first one with a custom amount
fn trade_records(count: usize, price: f64, first_amount: f64) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let amount = if i == 0 { first_amount } else { 1.0 };
            json!({
                "date": (1_700_000_000 - i as i64).to_string(),
                "price": price.to_string(),
                "amount": amount.to_string(),
                "tid": (10_000 - i).to_string(),
                "type": "buy",
            })
        })
        .collect()
}

/// Gently oscillating price series around `base`
fn oscillating_prices(count: usize, base: f64, amplitude: f64) -> Vec<f64> {
    (0..count)
        .map(|i| base + if i % 2 == 0 { amplitude } else { -amplitude })
        .collect()
}

// =============================================================================
// Band Math
// =============================================================================

#[test]
fn test_flat_window_has_zero_width_bands() {
    let stats = heuristic().compute_band_stats(&[100.0; 20]).unwrap();
    assert_eq!(stats.stddev, 0.0);
    assert_eq!(stats.mean, 100.0);
    assert_eq!(stats.upper, 100.0);
    assert_eq!(stats.lower, 100.0);
}

#[test]
fn test_flat_window_equal_price_is_not_sell() {
    // Equal to the (collapsed) bands: no strict inequality holds
    let result = heuristic()
        .analyze(100.0, &[100.0; 20], &[500.0, 100.0, 100.0])
        .unwrap();
    assert_eq!(result.signal, Signal::Hold);
    assert!(result.reasons.is_empty());
}

#[test]
fn test_band_multiplier_is_configurable() {
    let mut config = SignalConfig::default();
    config.band_multiplier = 3.0;
    let engine = SignalEngine::new(config).unwrap();

    let prices = oscillating_prices(20, 100.0, 1.0);
    let stats = engine.compute_band_stats(&prices).unwrap();
    assert_relative_eq!(stats.upper - stats.mean, 3.0 * stats.stddev, epsilon = 1e-9);
}

// =============================================================================
// Insufficient Data
// =============================================================================

#[test]
fn test_short_series_is_rejected() {
    let engine = heuristic();
    for len in [0, 1, 10, 19] {
        let prices = vec![100.0; len];
        let result = engine.analyze(100.0, &prices, &[1.0; 30]);
        assert_eq!(
            result,
            Err(SignalError::InsufficientData {
                required: 20,
                available: len
            })
        );
    }
}

#[test]
fn test_custom_period() {
    let engine = SignalEngine::new(SignalConfig::default().with_period(5)).unwrap();
    assert!(engine.analyze(100.0, &[100.0; 5], &[]).is_ok());
    assert!(engine.analyze(100.0, &[100.0; 4], &[]).is_err());
}

// =============================================================================
// Decision Policy Scenarios
// =============================================================================

#[test]
fn test_breakout_with_volume_spike_is_buy() {
    let mut volumes = vec![300.0];
    volumes.extend(vec![100.0; 19]);
    let engine = heuristic();

    let stats = engine.compute_band_stats(&[100.0; 20]).unwrap();
    let (signal, reasons) = engine.classify(130.0, &stats, 100.0, 300.0);
    assert_eq!(signal, Signal::Buy);
    assert_eq!(reasons, vec![REASON_UPPER_BAND_SPIKE.to_string()]);

    // Same scenario through analyze: avg = 110, recent = 300 > 220
    let result = engine.analyze(130.0, &[100.0; 20], &volumes).unwrap();
    assert_eq!(result.signal, Signal::Buy);
    assert_eq!(result.reasons, vec![REASON_UPPER_BAND_SPIKE.to_string()]);
    assert_eq!(result.stats.mean, 100.0);
    assert_eq!(result.stats.upper, 100.0);
    assert_relative_eq!(result.avg_volume, 110.0, epsilon = 1e-9);
    assert_eq!(result.recent_volume, 300.0);
}

#[test]
fn test_breakdown_is_sell_regardless_of_volume() {
    let engine = heuristic();
    for volumes in [vec![], vec![0.0; 20], vec![1_000_000.0, 1.0]] {
        let result = engine.analyze(90.0, &[100.0; 20], &volumes).unwrap();
        assert_eq!(result.signal, Signal::Sell);
        assert_eq!(result.reasons, vec![REASON_BELOW_LOWER_BAND.to_string()]);
    }
}

#[test]
fn test_spike_rule_has_priority_over_rising_volume_rule() {
    // 130 > upper and > mean, recent volume beats both 2.0x and 1.2x
    let result = heuristic()
        .analyze(130.0, &[100.0; 20], &[1000.0, 100.0, 100.0, 100.0])
        .unwrap();
    assert_eq!(result.signal, Signal::Buy);
    assert_eq!(result.reasons, vec![REASON_UPPER_BAND_SPIKE.to_string()]);
    assert_ne!(result.reasons, vec![REASON_ABOVE_MEAN_RISING_VOLUME.to_string()]);
}

#[test]
fn test_empty_volume_series_defaults_to_zero() {
    let result = heuristic().analyze(100.5, &oscillating_prices(20, 100.0, 1.0), &[]).unwrap();
    assert_eq!(result.recent_volume, 0.0);
    assert_eq!(result.avg_volume, 0.0);
    assert_eq!(result.signal, Signal::Hold);
}

#[test]
fn test_volume_window_changes_average_only() {
    let prices = vec![100.0; 20];
    let mut volumes = vec![150.0];
    volumes.extend(vec![100.0; 19]);
    volumes.extend(vec![10.0; 80]);

    // Full series: avg = (150 + 1900 + 800) / 100 = 28.5, 150 > 34.2 is rising
    let full = heuristic().analyze(100.0, &prices, &volumes).unwrap();
    assert_relative_eq!(full.avg_volume, 28.5, epsilon = 1e-9);

    let windowed = SignalEngine::new(SignalConfig::default().with_volume_window(VolumeWindow::Period))
        .unwrap()
        .analyze(100.0, &prices, &volumes)
        .unwrap();
    assert_relative_eq!(windowed.avg_volume, 102.5, epsilon = 1e-9);

    assert_eq!(full.stats, windowed.stats);
    assert_eq!(full.recent_volume, windowed.recent_volume);
}

#[test]
fn test_non_finite_inputs_are_rejected_not_classified() {
    let engine = heuristic();

    let mut prices = vec![100.0; 20];
    prices[3] = f64::NAN;
    assert!(matches!(
        engine.analyze(130.0, &prices, &[300.0, 100.0]),
        Err(SignalError::InvalidInput(_))
    ));

    assert!(matches!(
        engine.analyze(90.0, &[100.0; 20], &[f64::NAN, 1.0]),
        Err(SignalError::InvalidInput(_))
    ));

    let mut closes = vec![100.0; 20];
    closes[10] = f64::INFINITY;
    let screener = SignalEngine::new(SignalConfig::screener()).unwrap();
    assert!(matches!(
        screener.analyze_closes(&closes, &[]),
        Err(SignalError::InvalidInput(_))
    ));
}

// =============================================================================
// Purity
// =============================================================================

#[test]
fn test_analyze_is_idempotent() {
    let engine = heuristic();
    let prices = oscillating_prices(40, 1_000.0, 7.5);
    let volumes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64 * 3.0).collect();

    let first = engine.analyze(1_012.0, &prices, &volumes).unwrap();
    let second = engine.analyze(1_012.0, &prices, &volumes).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_engine_is_shareable_across_threads() {
    let engine = std::sync::Arc::new(heuristic());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let engine = engine.clone();
            std::thread::spawn(move || {
                engine
                    .analyze(90.0 + i as f64, &[100.0; 20], &[1.0])
                    .unwrap()
                    .signal
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Signal::Sell);
    }
}

// =============================================================================
// Records to Signal
// =============================================================================

#[test]
fn test_trade_records_to_signal() {
    let mut records = trade_records(25, 100.0, 3.0);
    records.insert(3, json!({"price": "not-a-number", "amount": "1"}));
    records.insert(7, json!({"amount": "1"}));

    let filtered = data::trade_series(&records, 200).unwrap();
    assert_eq!(filtered.skipped, 2);
    assert_eq!(filtered.items.len(), 25);

    let series = filtered.items;
    let result = heuristic()
        .analyze(130.0, &series.prices(), &series.volumes())
        .unwrap();

    // avg = (300 + 24 * 100) / 25 = 108, recent 300 > 216
    assert_relative_eq!(result.avg_volume, 108.0, epsilon = 1e-9);
    assert_eq!(result.signal, Signal::Buy);
}

#[test]
fn test_skipped_records_can_leave_too_little_data() {
    let mut records = trade_records(15, 100.0, 1.0);
    records.extend((0..10).map(|_| json!({"price": "-", "amount": "1"})));

    let filtered = data::trade_series(&records, 200).unwrap();
    assert_eq!(filtered.skipped, 10);

    let result = heuristic().analyze(
        100.0,
        &filtered.items.prices(),
        &filtered.items.volumes(),
    );
    assert!(matches!(
        result,
        Err(SignalError::InsufficientData {
            required: 20,
            available: 15
        })
    ));
}

#[test]
fn test_chart_rows_to_screen_signal() {
    // Oldest first, newest close dips below the band
    let mut rows: Vec<Value> = (0..29)
        .map(|i| {
            let close = 100.0 + (i % 2) as f64;
            json!([1_700_000_000 + i * 900, close, close + 1.0, close - 1.0, close, 10.0])
        })
        .collect();
    rows.push(json!([1_700_026_100, 100.0, 100.0, 94.0, 95.0, 50.0]));

    let filtered = data::candles(&rows).unwrap();
    let (closes, volumes) = data::closes_newest_first(&filtered.items);
    assert_eq!(closes[0], 95.0);

    let config = Config::default();
    let engine = SignalEngine::new(config.screener_signal()).unwrap();
    assert_eq!(engine.mode(), SignalMode::Screener);

    let result = engine.analyze_closes(&closes, &volumes).unwrap();
    assert_eq!(result.signal, Signal::BuyArea);
    assert_eq!(engine.screen(result.last_price, result.stats.lower), Signal::BuyArea);
}

#[test]
fn test_screener_waits_at_the_mean() {
    let engine = SignalEngine::new(SignalConfig::screener()).unwrap();
    let closes = oscillating_prices(20, 100.0, 5.0);
    let result = engine.analyze(100.0, &closes, &[]).unwrap();
    assert_eq!(result.signal, Signal::Wait);
}

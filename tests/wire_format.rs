//! JSON wire contract checks.
//!
//! The chart renderer indexes gaps positionally into its own candle array, so field
//! names and the null slots of `gaps` must stay exactly as they are.

use serde_json::{json, Value};
use wrbscan::prelude::*;

const CANDLES: &str = r#"[
    {"timestamp": 0, "open": 100.0, "high": 100.5, "low": 99.5, "close": 100.2, "volume": 10.0},
    {"timestamp": 1, "open": 100.0, "high": 100.5, "low": 99.5, "close": 100.2, "volume": 10.0},
    {"timestamp": 2, "open": 100.0, "high": 100.5, "low": 99.5, "close": 100.2, "volume": 10.0},
    {"timestamp": 3, "open": 100.0, "high": 100.5, "low": 99.5, "close": 100.2, "volume": 10.0},
    {"timestamp": 4, "open": 100.0, "high": 101.0, "low": 99.0, "close": 100.0, "volume": 10.0},
    {"timestamp": 5, "open": 100.0, "high": 110.0, "low": 99.0, "close": 109.0, "volume": 10.0},
    {"timestamp": 6, "open": 105.0, "high": 106.0, "low": 104.0, "close": 105.0}
]"#;

fn candles() -> Vec<Candle> {
    serde_json::from_str(CANDLES).expect("candle fixture")
}

#[test]
fn test_candles_deserialize() {
    let bars = candles();
    assert_eq!(bars.len(), 7);
    assert_eq!(bars[6].volume, 0.0);
    assert_eq!(bars[5].timestamp, 5);
}

#[test]
fn test_analysis_wire_shape() {
    let config: WrbConfig = serde_json::from_value(json!({"gapExtension": "none"})).unwrap();
    let analysis = analyze(&candles(), &config);
    let value = serde_json::to_value(&analysis).unwrap();

    assert_eq!(value["flags"], json!([false, false, false, false, false, true, false]));

    let gaps = value["gaps"].as_array().unwrap();
    assert_eq!(gaps.len(), 7);
    assert!(gaps.iter().enumerate().all(|(i, g)| (i == 5) != g.is_null()));

    assert_eq!(
        gaps[5],
        json!({
            "type": "buy",
            "top": 104.0,
            "bottom": 101.0,
            "startIndex": 5,
            "endIndex": 6,
            "filled": false,
            "filledIndex": null,
            "pro": true,
            "diff": 3.0
        })
    );
    assert_eq!(value["active"], json!([gaps[5].clone()]));
    assert_eq!(value["filled"], json!([]));

    assert_eq!(
        value["summary"],
        json!({
            "totalWRB": 1,
            "totalGaps": 1,
            "activeCount": 1,
            "filledCount": 0,
            "proCount": 1,
            "lastSignal": {"index": 5, "type": "buy", "pro": true}
        })
    );
}

#[test]
fn test_empty_summary_has_null_last_signal() {
    let analysis = analyze::<Candle>(&[], &WrbConfig::default());
    let value = serde_json::to_value(&analysis).unwrap();
    assert_eq!(value["summary"]["lastSignal"], Value::Null);
    assert_eq!(value["gaps"], json!([]));
}

#[test]
fn test_analysis_round_trips() {
    let analysis = analyze(&candles(), &WrbConfig::default());
    let text = serde_json::to_string(&analysis).unwrap();
    let back: WrbAnalysis = serde_json::from_str(&text).unwrap();
    assert_eq!(back, analysis);
}

#[test]
fn test_config_wire_names() {
    let value = serde_json::to_value(WrbConfig::default()).unwrap();
    assert_eq!(
        value,
        json!({
            "lookbackPeriod": 5,
            "sensitivity": 1.5,
            "useBody": true,
            "gapExtension": "stopLoss",
            "maxScope": 999
        })
    );
}

pub mod email;
pub mod phone;
pub mod ip;
pub mod company;

use serde_json::Value;

use crate::models::{SignalResult, SignalType};

/// Score one raw provider document. Pure; all I/O happens in the fetcher.
pub fn score_signal(signal_type: SignalType, raw: &Value) -> SignalResult {
    match signal_type {
        SignalType::Email => email::score(raw),
        SignalType::Phone => phone::score(raw),
        SignalType::Ip => ip::score(raw),
        SignalType::Company => company::score(raw),
    }
}

/// Read a boolean field that providers report either as a plain bool or as
/// a `{"value": bool, "text": ...}` wrapper object.
pub(crate) fn bool_field(raw: &Value, key: &str) -> Option<bool> {
    match &raw[key] {
        Value::Bool(b) => Some(*b),
        Value::Object(obj) => obj.get("value").and_then(Value::as_bool),
        _ => None,
    }
}

pub(crate) fn clamp_score(score: i32) -> u8 {
    score.clamp(0, 100) as u8
}

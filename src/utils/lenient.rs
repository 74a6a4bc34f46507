//! Forgiving readers for loosely typed JSON coming back from the persistence API.
//!
//! Stored designs may carry numbers as strings, booleans as 0/1 or colors typed
//! by hand. Each reader returns `None` for anything it cannot interpret, and the
//! caller substitutes the field default.

use serde_json::Value;

use crate::models::style::{ExportQuality, HexColor};

pub fn read_u32(value: &Value, min: u32, max: u32) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    u32::try_from(n).ok().filter(|n| (min..=max).contains(n))
}

pub fn read_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_u64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn read_color(value: &Value) -> Option<HexColor> {
    value.as_str()?.parse().ok()
}

pub fn read_quality(value: &Value) -> Option<ExportQuality> {
    value.as_str()?.parse().ok()
}

pub fn read_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

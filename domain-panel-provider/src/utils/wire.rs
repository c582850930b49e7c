//! 宽松的字段反序列化工具
//!
//! 后端的 `BillingData` 是无模式的自由对象，字段可能是字符串、数字或缺失：
//! - 自由文本: 字符串 / 数字 / 布尔 -> `Option<String>`，`null` 与空串视为缺失
//! - 剩余天数: 整数 / 浮点 / 数字字符串 -> `Option<i64>`
//! - 账单对象: 非对象值一律视为缺失

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::types::{BillingInfo, DomainStatus};

/// 自由文本字段
pub fn free_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(value_to_text))
}

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// 剩余天数字段（浮点向下取整）
pub fn days<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(float_days))
            .map(Some)
            .ok_or_else(|| Error::custom(format!("expires_in_days out of range: {n}"))),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|e| Error::custom(format!("Invalid expires_in_days '{s}': {e}"))),
        Some(other) => Err(Error::custom(format!(
            "expires_in_days must be a number, got {other}"
        ))),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn float_days(f: f64) -> Option<i64> {
    let floored = f.floor();
    (floored.is_finite() && floored >= i64::MIN as f64 && floored <= i64::MAX as f64)
        .then_some(floored as i64)
}

/// 域名状态字段，未知取值与缺失均映射为 `Unknown`
pub fn status<'de, D>(deserializer: D) -> Result<DomainStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .and_then(value_to_text)
        .map_or(DomainStatus::Unknown, |s| DomainStatus::from_wire(&s)))
}

/// 账单对象字段
pub fn billing<'de, D>(deserializer: D) -> Result<Option<BillingInfo>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(object @ Value::Object(_)) => Ok(serde_json::from_value(object).ok()),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use crate::types::DomainStatus;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "super::free_text")]
        text: Option<String>,
        #[serde(default, deserialize_with = "super::days")]
        days: Option<i64>,
        #[serde(default, deserialize_with = "super::status")]
        status: DomainStatus,
    }

    fn probe(value: serde_json::Value) -> Probe {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn free_text_accepts_numbers_and_strings() {
        assert_eq!(probe(json!({"text": "¥ 69"})).text.as_deref(), Some("¥ 69"));
        assert_eq!(probe(json!({"text": 12.5})).text.as_deref(), Some("12.5"));
        assert_eq!(probe(json!({"text": true})).text.as_deref(), Some("true"));
    }

    #[test]
    fn free_text_blank_and_null_are_missing() {
        assert_eq!(probe(json!({"text": ""})).text, None);
        assert_eq!(probe(json!({"text": "   "})).text, None);
        assert_eq!(probe(json!({"text": null})).text, None);
        assert_eq!(probe(json!({})).text, None);
        assert_eq!(probe(json!({"text": ["a"]})).text, None);
    }

    #[test]
    fn days_accepts_integer_float_and_string() {
        assert_eq!(probe(json!({"days": -3})).days, Some(-3));
        assert_eq!(probe(json!({"days": 4.7})).days, Some(4));
        assert_eq!(probe(json!({"days": "12"})).days, Some(12));
        assert_eq!(probe(json!({"days": null})).days, None);
        assert_eq!(probe(json!({})).days, None);
    }

    #[test]
    fn days_rejects_non_numeric() {
        let result: Result<Probe, _> = serde_json::from_value(json!({"days": "soon"}));
        assert!(result.is_err());
        let result: Result<Probe, _> = serde_json::from_value(json!({"days": {}}));
        assert!(result.is_err());
    }

    #[test]
    fn status_unknown_values() {
        assert_eq!(probe(json!({"status": "verified"})).status, DomainStatus::Verified);
        assert_eq!(probe(json!({"status": "suspended"})).status, DomainStatus::Unknown);
        assert_eq!(probe(json!({"status": null})).status, DomainStatus::Unknown);
        assert_eq!(probe(json!({})).status, DomainStatus::Unknown);
    }
}

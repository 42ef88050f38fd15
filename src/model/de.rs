//! Lenient field decoders for ledger API payloads
//!
//! The ledger server is not consistent about scalar encodings: account
//! endpoints send timestamps as decimal strings while the chain snapshot sends
//! JSON integers, and system-issued records carry `""` where an address is
//! absent.

use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Unix seconds from an integer, float, or numeric string
pub fn timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Integer(secs) => Ok(secs),
        RawTimestamp::Float(secs) if secs.is_finite() => Ok(secs.trunc() as i64),
        RawTimestamp::Float(secs) => Err(de::Error::custom(format!("invalid timestamp: {}", secs))),
        RawTimestamp::Text(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| de::Error::custom(format!("invalid timestamp: {:?}", text))),
    }
}

/// Missing, `null` and empty-string addresses all decode to `None`
pub fn optional_address<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|address| !address.trim().is_empty()))
}

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

pub fn datetime_to_string(datetime: DateTime<FixedOffset>) -> String {
    datetime
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

pub fn datetime_to_string_opt(datetime: Option<DateTime<FixedOffset>>) -> String {
    match datetime {
        Some(val) => datetime_to_string(val),
        None => "N/A".to_string(),
    }
}

pub fn date_to_string(datetime: DateTime<FixedOffset>) -> String {
    datetime.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

pub fn date_to_string_opt(datetime: Option<DateTime<FixedOffset>>) -> String {
    match datetime {
        Some(val) => date_to_string(val),
        None => "N/A".to_string(),
    }
}

/// Accepts RFC 3339 and offset-less ISO timestamps, the latter read as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(val) = DateTime::parse_from_rfc3339(value) {
        return Some(val);
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc().fixed_offset())
}

pub fn now() -> DateTime<FixedOffset> {
    Utc::now().fixed_offset()
}

pub fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// serde adapter for `Option<DateTime<FixedOffset>>` fields on the wire
pub mod timestamp_opt {
    use chrono::{DateTime, FixedOffset};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<FixedOffset>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(val) => serializer.serialize_str(&val.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<FixedOffset>>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(val) if val.is_empty() => Ok(None),
            Some(val) => super::parse_timestamp(&val)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {val}"))),
        }
    }
}

//! Recommendation records as stored in, and submitted to, the log.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::errors::{SeenError, SeenResult};

/// On-disk date format. Fixed width and zero padded, so string order equals
/// date order.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One previously recommended tool.
///
/// Field order is the on-disk key order: `date`, `name`, `desc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_desc")]
    pub desc: String,
}

impl Record {
    /// Decodes one log line. `line_no` is only used for error reporting.
    pub fn from_line(line: &str, line_no: usize) -> SeenResult<Self> {
        let record: Record =
            serde_json::from_str(line).map_err(|err| SeenError::MalformedRecord {
                line: line_no,
                reason: err.to_string(),
            })?;
        if record.name.trim().is_empty() {
            return Err(SeenError::MalformedRecord {
                line: line_no,
                reason: "empty name".to_string(),
            });
        }
        Ok(record)
    }

    pub fn to_line(&self) -> SeenResult<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }

    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// Append input. Only `name` is required; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl NewRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Parses a `Name|Desc` token. Splits on the first `|`; without one the
    /// whole token is the name.
    pub fn from_token(token: &str) -> Self {
        match token.split_once('|') {
            Some((name, desc)) => Self::named(name.trim()).with_desc(desc.trim()),
            None => Self::named(token.trim()),
        }
    }

    /// Parses a JSON array of record objects.
    pub fn batch_from_json(input: &str) -> SeenResult<Vec<Self>> {
        let value: serde_json::Value = serde_json::from_str(input)
            .map_err(|err| SeenError::invalid_batch(format!("JSON parse error: {err}")))?;
        if !value.is_array() {
            return Err(SeenError::invalid_batch("expected a JSON array of objects"));
        }
        serde_json::from_value(value).map_err(|err| SeenError::invalid_batch(err.to_string()))
    }

    /// Resolves the stored form. `today` fills a missing date.
    pub fn resolve(&self, today: NaiveDate) -> SeenResult<Record> {
        let name = self
            .name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .ok_or(SeenError::MissingField { field: "name" })?;
        let date = match self.date.as_deref() {
            Some(raw) => parse_date(raw)?,
            None => today,
        };
        Ok(Record {
            date,
            name: name.to_string(),
            desc: self.desc.clone().unwrap_or_default(),
        })
    }
}

/// Strict `YYYY-MM-DD` parsing.
pub fn parse_date(raw: &str) -> SeenResult<NaiveDate> {
    let invalid = || SeenError::InvalidDate {
        value: raw.to_string(),
    };
    if raw.len() != 10 {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| invalid())
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}

/// `null` reads as an empty description. Any other non-string stays an error.
fn deserialize_desc<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Case-insensitive name lookup, for callers deduplicating before an append.
pub fn contains_name(records: &[Record], name: &str) -> bool {
    let needle = name.trim().to_lowercase();
    records
        .iter()
        .any(|record| record.name.trim().to_lowercase() == needle)
}

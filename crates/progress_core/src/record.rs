use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Opaque record identifier. The service sends either a string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => RecordId(text),
            RawId::Number(number) => RecordId(number.to_string()),
        })
    }
}

/// Composite key used by the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DetailKey {
    pub client_key: String,
    pub filename: String,
}

impl DetailKey {
    pub fn new(client_key: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            client_key: client_key.into(),
            filename: filename.into(),
        }
    }
}

impl fmt::Display for DetailKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.client_key, self.filename)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct Counts {
    #[serde(default, deserialize_with = "null_as_default")]
    pub done: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub warn: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub failed: u64,
}

/// One file-processing job as reported by the progress service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(alias = "_id")]
    pub id: RecordId,
    #[serde(alias = "clientKrn", default, deserialize_with = "null_as_default")]
    pub client_key: String,
    pub filename: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub counts: Counts,
    /// Expected item count; `None` or `Some(0)` means unknown.
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_completed: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<PatternGroup>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub warnings: Vec<PatternGroup>,
}

impl ProgressRecord {
    pub fn detail_key(&self) -> DetailKey {
        DetailKey::new(self.client_key.clone(), self.filename.clone())
    }
}

/// Line reference of an occurrence; the service sends numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LineRef {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for LineRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineRef::Number(number) => write!(f, "{number}"),
            LineRef::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LineOccurrence {
    #[serde(default)]
    pub line: Option<LineRef>,
    #[serde(default, deserialize_with = "lenient_values")]
    pub values: Vec<String>,
}

/// One distinct error or warning signature.
///
/// Both wire shapes (a `lines` array, or a legacy scalar `line`/`values`
/// pair) deserialize into the same `lines` representation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawPatternGroup")]
pub struct PatternGroup {
    pub message: Option<String>,
    pub pattern: Option<String>,
    pub lines: Vec<LineOccurrence>,
}

#[derive(Deserialize)]
struct RawPatternGroup {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    pattern: Option<String>,
    #[serde(default)]
    lines: Option<Vec<LineOccurrence>>,
    #[serde(default)]
    line: Option<LineRef>,
    #[serde(default, deserialize_with = "lenient_values")]
    values: Vec<String>,
}

impl From<RawPatternGroup> for PatternGroup {
    fn from(raw: RawPatternGroup) -> Self {
        let lines = match raw.lines {
            Some(lines) if !lines.is_empty() => lines,
            _ => match raw.line {
                Some(line) => vec![LineOccurrence {
                    line: Some(line),
                    values: raw.values,
                }],
                None => Vec::new(),
            },
        };
        Self {
            message: raw.message.filter(|m| !m.is_empty()),
            pattern: raw.pattern.filter(|p| !p.is_empty()),
            lines,
        }
    }
}

/// Result of collapsing repeated ids in a fetched collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deduped {
    pub records: Vec<ProgressRecord>,
    pub duplicates: usize,
}

/// Keeps one row per id: a repeated id overwrites the earlier entry in place.
pub fn dedupe_by_id(records: Vec<ProgressRecord>) -> Deduped {
    let mut positions: HashMap<RecordId, usize> = HashMap::with_capacity(records.len());
    let mut out: Vec<ProgressRecord> = Vec::with_capacity(records.len());
    let mut duplicates = 0;
    for record in records {
        match positions.get(&record.id) {
            Some(&pos) => {
                out[pos] = record;
                duplicates += 1;
            }
            None => {
                positions.insert(record.id.clone(), out.len());
                out.push(record);
            }
        }
    }
    Deduped {
        records: out,
        duplicates,
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_values<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    let items = match raw {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(single) => vec![single],
    };
    Ok(items.into_iter().filter_map(value_to_string).collect())
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_id_is_stringified() {
        let id: RecordId = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn values_accept_scalars_and_skip_nulls() {
        let occurrence: LineOccurrence =
            serde_json::from_value(json!({"line": 3, "values": ["a", 7, null, true]})).unwrap();
        assert_eq!(occurrence.values, vec!["a", "7", "true"]);
        assert_eq!(occurrence.line.unwrap().to_string(), "3");
    }
}

use crate::error::{Result, SatqaError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// A link found on a scraped page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageLink {
    pub url: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub title: String,
}

/// One scraped page or extracted document.
///
/// Only `url` and `text` feed the graph; the rest is carried for reporting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub links: Vec<PageLink>,
    /// Accepts RFC 3339 strings or Unix epoch seconds
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub scraped_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Epoch(f64),
    Text(String),
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawTimestamp> = Option::deserialize(deserializer)?;
    Ok(match raw {
        None => None,
        Some(RawTimestamp::Epoch(secs)) => {
            let whole = secs.trunc() as i64;
            let nanos = (secs.fract() * 1e9).round() as u32;
            DateTime::from_timestamp(whole, nanos.min(999_999_999))
        }
        Some(RawTimestamp::Text(text)) => DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
            .map(Some)?,
    })
}

/// Records parsed from one file, plus the entries that could not be read
#[derive(Debug, Clone, Default)]
pub struct RecordBatch {
    pub records: Vec<ContentRecord>,
    /// `path:line` (or `path[index]`) followed by the parse error
    pub failures: Vec<String>,
}

impl RecordBatch {
    fn push(&mut self, parsed: serde_json::Result<ContentRecord>, location: String) {
        match parsed {
            Ok(record) => self.records.push(record),
            Err(e) => {
                let failure = format!("{}: {}", location, e);
                log::warn!("Skipping unreadable record {}", failure);
                self.failures.push(failure);
            }
        }
    }
}

/// Parse a records file: `.json` holds one record or an array of records,
/// `.jsonl` holds one record per non-blank line.
///
/// A malformed entry is logged and reported in `failures`; the rest of the
/// file is still returned. Only an unreadable file or a `.json` file that is
/// not JSON at all fails the whole call.
pub fn load_records(path: &Path) -> Result<RecordBatch> {
    let content = std::fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut batch = RecordBatch::default();
    match extension.as_str() {
        "jsonl" => {
            for (idx, line) in content.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                batch.push(serde_json::from_str(line), format!("{}:{}", path.display(), idx + 1));
            }
        }
        "json" => match serde_json::from_str::<serde_json::Value>(&content)? {
            serde_json::Value::Array(items) => {
                for (idx, item) in items.into_iter().enumerate() {
                    batch.push(serde_json::from_value(item), format!("{}[{}]", path.display(), idx));
                }
            }
            value => batch.push(serde_json::from_value(value), path.display().to_string()),
        },
        other => {
            return Err(SatqaError::InvalidInput(format!(
                "Unsupported record file extension: {}",
                other
            )))
        }
    }
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scraper_output_shape() {
        let record: ContentRecord = serde_json::from_str(
            r#"{
                "url": "https://www.mosdac.gov.in/oceansat-3",
                "title": "OCEANSAT-3",
                "description": "",
                "keywords": "ocean colour",
                "text": "OCEANSAT measures Chlorophyll",
                "links": [{"url": "https://www.mosdac.gov.in/faq", "text": "FAQ"}],
                "scraped_at": 1700000000.5
            }"#,
        )
        .unwrap();

        assert_eq!(record.url.as_deref(), Some("https://www.mosdac.gov.in/oceansat-3"));
        assert_eq!(record.links.len(), 1);
        assert_eq!(record.links[0].title, "");
        let scraped = record.scraped_at.unwrap();
        assert_eq!(scraped.timestamp(), 1_700_000_000);
        assert_eq!(scraped.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn test_rfc3339_and_missing_fields() {
        let record: ContentRecord =
            serde_json::from_str(r#"{"text": "SST", "scraped_at": "2024-03-01T10:00:00Z"}"#).unwrap();
        assert_eq!(record.url, None);
        assert_eq!(record.scraped_at.unwrap().to_rfc3339(), "2024-03-01T10:00:00+00:00");

        let bad = serde_json::from_str::<ContentRecord>(r#"{"scraped_at": "yesterday"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_load_json_single_and_array() {
        let temp_dir = TempDir::new().unwrap();
        let single = temp_dir.path().join("page.json");
        let many = temp_dir.path().join("pages.json");
        fs::write(&single, r#"{"url": "u1", "text": "INSAT"}"#).unwrap();
        fs::write(&many, r#"[{"text": "a"}, {"text": "b"}]"#).unwrap();

        assert_eq!(load_records(&single).unwrap().records.len(), 1);
        assert_eq!(load_records(&many).unwrap().records.len(), 2);
    }

    #[test]
    fn test_jsonl_keeps_lines_around_a_broken_one() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("crawl.jsonl");
        fs::write(&path, "{\"text\": \"a\"}\n\n{broken\n{\"text\": \"b\"}\n").unwrap();

        let batch = load_records(&path).unwrap();
        let texts: Vec<_> = batch.records.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b"]);
        assert_eq!(batch.failures.len(), 1);
        assert!(batch.failures[0].contains("crawl.jsonl:3"));
    }

    #[test]
    fn test_json_array_keeps_valid_elements() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pages.json");
        fs::write(
            &path,
            r#"[{"text": "a"}, {"text": "b", "scraped_at": "yesterday"}, {"text": "c"}]"#,
        )
        .unwrap();

        let batch = load_records(&path).unwrap();
        let texts: Vec<_> = batch.records.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "c"]);
        assert_eq!(batch.failures.len(), 1);
        assert!(batch.failures[0].contains("pages.json[1]"));
    }

    #[test]
    fn test_json_that_is_not_json_fails_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();
        assert!(load_records(&path).is_err());
    }
}

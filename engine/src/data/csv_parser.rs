use csv::{ReaderBuilder, StringRecord};
use shared::models::Observation;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{EngineError, Result};
use crate::models::TimeSeries;

// Field parsing for market-data history exports (ISO dates, '.' decimals)
pub mod history_format {
    use anyhow::{anyhow, Result};
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use std::str::FromStr;

    pub fn parse_price(s: &str) -> Result<f64> {
        let value = f64::from_str(s.trim()).map_err(|e| anyhow!("Failed to parse price '{}': {}", s, e))?;
        if !value.is_finite() || value < 0.0 {
            return Err(anyhow!("Price '{}' must be finite and non-negative", s));
        }
        Ok(value)
    }

    // Accepts RFC 3339, "YYYY-MM-DD HH:MM:SS+hh:mm", naive "YYYY-MM-DD HH:MM:SS" (UTC)
    // and bare dates (midnight UTC).
    pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z") {
            return Ok(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return Ok(DateTime::from_naive_utc_and_offset(naive, Utc));
        }
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| anyhow!("Failed to parse timestamp '{}': {}", s, e))?;
        let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| anyhow!("Invalid date '{}'", s))?;
        Ok(DateTime::from_naive_utc_and_offset(midnight, Utc))
    }

}

const TIMESTAMP_HEADERS: [&str; 3] = ["datetime", "date", "timestamp"];
const PRICE_HEADERS: [&str; 2] = ["close", "price"];

pub struct PriceCsvParser;

impl PriceCsvParser {
    // Header: Date,Open,High,Low,Close,Volume,... (or Datetime for intraday exports)
    // Example Row: 2024-01-02 09:30:00-05:00,187.15,188.44,183.89,185.64,82488700
    pub fn load_series(file_path: impl AsRef<Path>) -> Result<TimeSeries> {
        let file = File::open(file_path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<TimeSeries> {
        let mut rdr = ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_reader(reader);

        let headers = rdr.headers()?.clone();
        let ts_col = Self::find_column(&headers, &TIMESTAMP_HEADERS)?;
        let price_col = Self::find_column(&headers, &PRICE_HEADERS)?;

        let mut observations = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let record = result?;
            let line = idx + 2;

            let price_str = record.get(price_col).unwrap_or("");
            if price_str.is_empty() {
                tracing::warn!(line, "Skipping CSV row without a price");
                continue;
            }
            let ts_str = record.get(ts_col).unwrap_or("");

            let timestamp = history_format::parse_timestamp(ts_str).map_err(|e| {
                EngineError::CsvDataFormatError(format!("Error parsing '{}' at line {}: {}", &headers[ts_col], line, e))
            })?;
            let price = history_format::parse_price(price_str).map_err(|e| {
                EngineError::CsvDataFormatError(format!("Error parsing '{}' at line {}: {}", &headers[price_col], line, e))
            })?;

            observations.push(Observation::new(timestamp, price));
        }

        tracing::debug!(rows = observations.len(), "Parsed price history CSV");
        TimeSeries::from_unordered(observations)
    }

    // Header names are matched case-insensitively, first candidate wins.
    fn find_column(headers: &StringRecord, candidates: &[&str]) -> Result<usize> {
        candidates
            .iter()
            .find_map(|name| headers.iter().position(|h| h.eq_ignore_ascii_case(name)))
            .ok_or_else(|| {
                EngineError::CsvDataFormatError(format!(
                    "Missing column: expected one of {:?} in header {:?}",
                    candidates,
                    headers.iter().collect::<Vec<_>>()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_series_valid_data() {
        let csv_content = "\
Date,Open,High,Low,Close,Volume
2024-01-03,184.22,185.88,183.43,184.25,58414500
2024-01-02,187.15,188.44,183.89,185.64,82488700
2024-01-04,182.15,183.09,180.88,181.91,71983600";
        let tmp_file = create_test_csv(csv_content);
        let series = PriceCsvParser::load_series(tmp_file.path()).unwrap();

        assert_eq!(series.len(), 3);
        // Sorted on load
        assert_eq!(series.prices(), vec![185.64, 184.25, 181.91]);
        assert_eq!(series.first().unwrap().timestamp, history_format::parse_timestamp("2024-01-02").unwrap());
    }

    #[test]
    fn test_load_series_intraday_header_and_case() {
        let csv_content = "\
datetime,close
2024-01-02 09:30:00-05:00,185.0
2024-01-02 10:30:00-05:00,186.5";
        let tmp_file = create_test_csv(csv_content);
        let series = PriceCsvParser::load_series(tmp_file.path()).unwrap();
        assert_eq!(series.len(), 2);
        let ts = series.timestamps();
        assert_eq!((ts[1] - ts[0]).num_minutes(), 60);
    }

    #[test]
    fn test_load_series_skips_rows_without_price() {
        let csv_content = "\
Date,Close
2024-01-02,10.0
2024-01-03,
2024-01-04,11.0";
        let tmp_file = create_test_csv(csv_content);
        let series = PriceCsvParser::load_series(tmp_file.path()).unwrap();
        assert_eq!(series.prices(), vec![10.0, 11.0]);
    }

    #[test]
    fn test_load_series_header_only() {
        let tmp_file = create_test_csv("Date,Close");
        let series = PriceCsvParser::load_series(tmp_file.path()).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_load_series_missing_column() {
        let tmp_file = create_test_csv("Date,Open\n2024-01-02,10.0");
        let err = PriceCsvParser::load_series(tmp_file.path()).unwrap_err();
        assert!(matches!(err, EngineError::CsvDataFormatError(_)));
        assert!(err.to_string().contains("Missing column"));
    }

    #[test]
    fn test_load_series_invalid_data_format() {
        let tmp_file = create_test_csv("Date,Close\n2024-01-02,10.0\n2024-01-03,invalid");
        let err = PriceCsvParser::load_series(tmp_file.path()).unwrap_err();
        assert!(matches!(err, EngineError::CsvDataFormatError(_)));
        let msg = err.to_string();
        assert!(msg.contains("Error parsing 'Close' at line 3"));
        assert!(msg.contains("Failed to parse price 'invalid'"));
    }

    #[test]
    fn test_load_series_bad_record_length() {
        let tmp_file = create_test_csv("Date,Close\n2024-01-02,10.0,extra");
        let err = PriceCsvParser::load_series(tmp_file.path()).unwrap_err();
        assert!(matches!(err, EngineError::CsvSystemError { .. }));
    }

    #[test]
    fn test_load_series_file_not_found() {
        let err = PriceCsvParser::load_series("non_existent_file.csv").unwrap_err();
        assert!(matches!(err, EngineError::IoError { .. }));
    }

    #[test]
    fn test_from_reader_keeps_last_duplicate() {
        let data = "Date,Close\n2024-01-02,10.0\n2024-01-02,10.5\n";
        let series = PriceCsvParser::from_reader(data.as_bytes()).unwrap();
        assert_eq!(series.prices(), vec![10.5]);
    }
}

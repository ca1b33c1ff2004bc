use std::path::{Path, PathBuf};

use async_trait::async_trait;
use csv::ReaderBuilder;
use indexmap::IndexMap;
use sm_core::{Record, RecordId, RecordStore, StoreSchema};
use tracing::{debug, info, warn};

use super::RecordSource;
use crate::cache::GeocodeCache;
use crate::config::{DashboardConfig, NullConfig};
use crate::status::StatusLevel;
use crate::{DataError, Result};

/// Columns the loader cannot work without
const REQUIRED_COLUMNS: [&str; 4] = ["Name", "Status", "Country", "City"];

/// Attributes exposed as filter dimensions
pub const FILTER_ATTRIBUTES: [&str; 4] = ["Status", "Category", "Country", "Affiliation"];

/// Attributes the free-text search looks into
pub const SEARCH_ATTRIBUTES: [&str; 6] = ["Name", "Affiliation", "Category", "Country", "City", "Position"];

/// How many unresolved locations to name in the load warning
const MISSING_LOCATIONS_LOGGED: usize = 10;

/// Stakeholder list stored as a Latin-1 CSV, located through a geocode cache
pub struct StakeholderCsvSource {
    path: PathBuf,
    cache_path: PathBuf,
    null_config: NullConfig,
}

/// Row counts from one load, for the startup log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub rows: usize,
    pub kept: usize,
    pub without_country: usize,
    pub without_coordinates: usize,
}

impl StakeholderCsvSource {
    pub fn new(path: impl Into<PathBuf>, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache_path: cache_path.into(),
            null_config: NullConfig::default(),
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(&config.data_path, &config.cache_path).with_null_config(config.null_values.clone())
    }

    pub fn with_null_config(mut self, null_config: NullConfig) -> Self {
        self.null_config = null_config;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_blocking(path: &Path, cache_path: &Path, nulls: &NullConfig) -> Result<RecordStore> {
        let bytes = std::fs::read(path)?;
        let text = decode_latin1(&bytes);
        let cache = GeocodeCache::load(cache_path)?;

        let (records, summary) = parse_records(&text, &cache, nulls)?;

        if summary.without_country > 0 {
            warn!(rows = summary.without_country, "dropped rows without a country");
        }
        if summary.without_coordinates > 0 {
            let missing = cache.missing_locations();
            let shown: Vec<&str> = missing.iter().take(MISSING_LOCATIONS_LOGGED).map(String::as_str).collect();
            warn!(
                rows = summary.without_coordinates,
                locations = missing.len(),
                sample = ?shown,
                "dropped rows whose location is not in the geocode cache"
            );
        }
        info!(
            path = %path.display(),
            rows = summary.rows,
            kept = summary.kept,
            "stakeholders loaded"
        );

        Ok(RecordStore::new(records, stakeholder_schema())?)
    }
}

#[async_trait]
impl RecordSource for StakeholderCsvSource {
    async fn load(&self) -> Result<RecordStore> {
        let path = self.path.clone();
        let cache_path = self.cache_path.clone();
        let nulls = self.null_config.clone();
        tokio::task::spawn_blocking(move || Self::load_blocking(&path, &cache_path, &nulls)).await?
    }

    fn source_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("stakeholders.csv")
    }
}

/// Filter and search attributes of a stakeholder store
pub fn stakeholder_schema() -> StoreSchema {
    StoreSchema {
        filterable: FILTER_ATTRIBUTES.iter().map(|s| s.to_string()).collect(),
        searchable: SEARCH_ATTRIBUTES.iter().map(|s| s.to_string()).collect(),
    }
}

/// Every byte is one code point in ISO-8859-1
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// `"{city}, {country}"`, or just the country when there is no city
pub fn location_key(city: Option<&str>, country: &str) -> String {
    match city {
        Some(city) => format!("{}, {}", city, country),
        None => country.to_string(),
    }
}

/// Turn decoded CSV text into records.
///
/// Rows without a country or whose location has no cached coordinate are
/// dropped. Record ids are the 1-based data row numbers, so they survive
/// dropped rows unchanged.
pub fn parse_records(text: &str, cache: &GeocodeCache, nulls: &NullConfig) -> Result<(Vec<Record>, LoadSummary)> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DataError::MissingColumn(column.to_string()));
        }
    }

    let mut summary = LoadSummary::default();
    let mut records = Vec::new();

    for (row, result) in reader.records().enumerate() {
        let row_data = result?;
        summary.rows += 1;

        let mut attributes: IndexMap<String, String> = IndexMap::with_capacity(headers.len() + 2);
        for (name, cell) in headers.iter().zip(row_data.iter()) {
            if let Some(value) = nulls.clean(cell) {
                attributes.insert(name.clone(), value.to_string());
            }
        }

        let raw_status = attributes.get("Status").cloned().unwrap_or_default();
        attributes.insert("Status".to_string(), StatusLevel::normalize(&raw_status).label().to_string());
        attributes.insert("RawStatus".to_string(), raw_status);

        let Some(country) = attributes.get("Country").cloned() else {
            debug!(row = row + 1, "row has no country");
            summary.without_country += 1;
            continue;
        };
        let location = location_key(attributes.get("City").map(String::as_str), &country);

        let Some(position) = cache.lookup(&location) else {
            debug!(row = row + 1, %location, "location not geocoded");
            summary.without_coordinates += 1;
            continue;
        };
        attributes.insert("Location".to_string(), location);

        records.push(Record::new(RecordId(row as u64 + 1), position, attributes));
        summary.kept += 1;
    }

    Ok((records, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sm_core::GeoPosition;

    fn cache() -> GeocodeCache {
        let mut cache = GeocodeCache::new();
        cache.insert("Lyon, France", GeoPosition::new(45.76, 4.84));
        cache.insert("Kenya", GeoPosition::new(0.02, 37.9));
        cache
    }

    const CSV: &str = "\
Name,Position,Affiliation,Category,Country,City,Status
Ana,Professor,Uni A,Academia,France,Lyon,Keynote
Ben,Engineer,Firm B,Industry,Kenya,,tbc
Cleo,Student,Uni A,Academia,,Lyon,Declined
Dev,Manager,Firm C,Industry,Peru,Lima,Sponsor
";

    #[test]
    fn test_rows_are_normalized_and_located() {
        let (records, summary) = parse_records(CSV, &cache(), &NullConfig::default()).unwrap();

        assert_eq!(
            summary,
            LoadSummary {
                rows: 4,
                kept: 2,
                without_country: 1,
                without_coordinates: 1,
            }
        );
        assert_eq!(records[0].id(), RecordId(1));
        assert_eq!(records[0].attribute("Status"), Some("Keynote speaker"));
        assert_eq!(records[0].attribute("RawStatus"), Some("Keynote"));
        assert_eq!(records[0].attribute("Location"), Some("Lyon, France"));

        assert_eq!(records[1].id(), RecordId(2));
        assert_eq!(records[1].attribute("City"), None);
        assert_eq!(records[1].attribute("Location"), Some("Kenya"));
        assert_eq!(records[1].attribute("Status"), Some("Invited to attend Symposium"));
        assert_eq!(records[1].position(), GeoPosition::new(0.02, 37.9));
    }

    #[test]
    fn test_missing_status_is_stakeholder() {
        let csv = "Name,Country,City,Status\nEve,Kenya,,\n";
        let (records, _) = parse_records(csv, &cache(), &NullConfig::default()).unwrap();
        assert_eq!(records[0].attribute("Status"), Some("Stakeholder"));
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "Name,Country,Status\nEve,Kenya,tbc\n";
        match parse_records(csv, &cache(), &NullConfig::default()) {
            Err(DataError::MissingColumn(column)) => assert_eq!(column, "City"),
            other => panic!("expected missing column, got {:?}", other.map(|(r, _)| r.len())),
        }
    }

    #[test]
    fn test_latin1_decoding() {
        let bytes = b"S\xe3o Paulo, Z\xfcrich";
        assert_eq!(decode_latin1(bytes), "São Paulo, Zürich");
    }

    #[test]
    fn test_location_key() {
        assert_eq!(location_key(Some("Lyon"), "France"), "Lyon, France");
        assert_eq!(location_key(None, "Kenya"), "Kenya");
    }
}

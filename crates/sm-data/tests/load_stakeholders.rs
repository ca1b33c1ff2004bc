use std::io::Write;

use sm_core::{select, FilterKey, FilterState, FilterValue, RecordId};
use sm_data::{DataError, FilterOptions, RecordSource, StakeholderCsvSource};
use tempfile::TempDir;

fn fixture(csv: &[u8], cache: &str) -> (TempDir, StakeholderCsvSource) {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("stakeholders.csv");
    let cache_path = dir.path().join("geocoded_cache.json");
    std::fs::File::create(&csv_path).unwrap().write_all(csv).unwrap();
    std::fs::write(&cache_path, cache).unwrap();
    let source = StakeholderCsvSource::new(csv_path, cache_path);
    (dir, source)
}

const CACHE: &str = r#"{
    "São Paulo, Brazil": [-23.55, -46.63],
    "Lyon, France": [45.76, 4.84],
    "Kenya": [0.02, 37.9],
    "Atlantis": [null, null]
}"#;

#[tokio::test]
async fn loads_latin1_file_through_the_cache() {
    let mut csv = b"Name,Position,Affiliation,Category,Country,City,Status\n".to_vec();
    csv.extend_from_slice(b"Jo\xe3o,Chef,Uni S,Academia,Brazil,S\xe3o Paulo,Oral presentation\n");
    csv.extend_from_slice(b"Ana,Professor,Uni A,Academia,France,Lyon,Keynote\n");
    csv.extend_from_slice(b"Ben,Engineer,Firm B,Industry,Kenya,,general participant\n");
    csv.extend_from_slice(b"Zed,Diver,Deep Co,Industry,Atlantis,,tbc\n");
    csv.extend_from_slice(b"Nia,Analyst,Firm B,Industry,,Paris,panel\n");

    let (_dir, source) = fixture(&csv, CACHE);
    assert_eq!(source.source_name(), "stakeholders.csv");
    let store = source.load().await.unwrap();

    assert_eq!(store.len(), 3);
    let names: Vec<&str> = store.iter().filter_map(|(_, r)| r.attribute("Name")).collect();
    assert_eq!(names, vec!["João", "Ana", "Ben"]);

    let options = FilterOptions::from_store(&store);
    assert_eq!(options.countries, vec!["Brazil", "France", "Kenya"]);

    let mut filters = FilterState::for_store(&store);
    filters.apply(FilterKey::attribute("Status"), FilterValue::any_of(["Session presentation"]));
    let selection = select(&store, &filters.current());
    let ids: Vec<RecordId> = selection
        .iter()
        .filter_map(|idx| store.get(idx))
        .map(|r| r.id())
        .collect();
    assert_eq!(ids, vec![RecordId(1)]);

    filters.reset();
    filters.apply(FilterKey::Search, FilterValue::Text("PROF".into()));
    assert_eq!(select(&store, &filters.current()).len(), 1);
}

#[tokio::test]
async fn everything_dropped_is_a_startup_error() {
    let csv = b"Name,Country,City,Status\nZed,Atlantis,,tbc\n";
    let (_dir, source) = fixture(csv, CACHE);
    match source.load().await {
        Err(DataError::Core(sm_core::CoreError::EmptyStore)) => {}
        other => panic!("expected empty store error, got {:?}", other.map(|s| s.len())),
    }
}

#[tokio::test]
async fn missing_csv_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = StakeholderCsvSource::new(dir.path().join("nope.csv"), dir.path().join("cache.json"));
    assert!(matches!(source.load().await, Err(DataError::Io(_))));
}

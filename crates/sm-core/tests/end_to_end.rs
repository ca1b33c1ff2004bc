use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use sm_core::events::events::{FiltersChanged, FiltersReset, StoreLoaded};
use sm_core::{
    EventBus, FilterKey, FilterValue, GeoBounds, GeoPosition, InteractionEvent, PaletteEntry,
    ProjectionStyle, Record, RecordId, RecordStore, Rgb, StoreSchema, SyncManager,
};

fn three_person_store() -> RecordStore {
    let rows = [
        (1, "Ada", "A", "Keynote speaker", 10.0, 10.0),
        (2, "Bo", "B", "Declined", -20.0, 40.0),
        (3, "Cy", "A", "Keynote speaker", 10.0, 10.0),
    ];
    let records = rows
        .into_iter()
        .map(|(id, name, city, status, lat, lon)| {
            let mut attributes = IndexMap::new();
            attributes.insert("Name".to_string(), name.to_string());
            attributes.insert("City".to_string(), city.to_string());
            attributes.insert("Status".to_string(), status.to_string());
            Record::new(RecordId(id), GeoPosition::new(lat, lon), attributes)
        })
        .collect();
    RecordStore::new(
        records,
        StoreSchema {
            filterable: vec!["City".into(), "Status".into()],
            searchable: vec!["Name".into(), "City".into()],
        },
    )
    .unwrap()
}

fn ids(ids: &[u64]) -> Vec<RecordId> {
    ids.iter().copied().map(RecordId).collect()
}

#[test]
fn filter_then_reset_keeps_both_views_in_step() {
    let manager = SyncManager::new(
        three_person_store(),
        ProjectionStyle::default(),
        Arc::new(EventBus::new()),
    )
    .unwrap();

    let frame = manager.current_frame();
    assert_eq!(frame.markers().ids(), ids(&[1, 2, 3]));
    assert_eq!(frame.rows().ids(), ids(&[1, 2, 3]));

    let frame = manager
        .handle(InteractionEvent::apply(FilterKey::attribute("City"), FilterValue::any_of(["A"])))
        .unwrap();
    assert_eq!(frame.markers().ids(), ids(&[1, 3]));
    assert_eq!(frame.rows().ids(), ids(&[1, 3]));

    // both remaining people share a coordinate
    let clusters = frame.markers().clusters();
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].len(), 2);
    assert_eq!(clusters[0].tooltip, "2 people");

    let frame = manager
        .handle(InteractionEvent::apply(FilterKey::attribute("City"), FilterValue::any_of(["Z"])))
        .unwrap();
    assert!(frame.markers().is_empty());
    assert!(frame.rows().is_empty());
    assert_eq!(frame.rows().page(3, 10).rows.len(), 0);

    let frame = manager.handle(InteractionEvent::Reset).unwrap();
    assert_eq!(frame.markers().ids(), ids(&[1, 2, 3]));
    assert_eq!(frame.rows().ids(), ids(&[1, 2, 3]));
    assert!(manager.snapshot().is_default());
}

#[test]
fn filters_combine_across_dimensions() {
    let manager = SyncManager::new(
        three_person_store(),
        ProjectionStyle::default(),
        Arc::new(EventBus::new()),
    )
    .unwrap();

    manager
        .handle(InteractionEvent::apply(
            FilterKey::attribute("Status"),
            FilterValue::any_of(["Keynote speaker", "Declined"]),
        ))
        .unwrap();
    let frame = manager
        .handle(InteractionEvent::apply(FilterKey::Search, FilterValue::Text("  CY ".into())))
        .unwrap();
    assert_eq!(frame.rows().ids(), ids(&[3]));

    let frame = manager
        .handle(InteractionEvent::apply(FilterKey::Search, FilterValue::All))
        .unwrap();
    assert_eq!(frame.rows().ids(), ids(&[1, 2, 3]));

    let southern = GeoBounds {
        south: -30.0,
        west: 0.0,
        north: 0.0,
        east: 40.0,
    };
    let frame = manager
        .handle(InteractionEvent::apply(FilterKey::Bounds, FilterValue::Within(southern)))
        .unwrap();
    assert_eq!(frame.markers().ids(), ids(&[2]));
    assert_eq!(frame.rows().ids(), ids(&[2]));
}

#[test]
fn legend_follows_status_selection() {
    let mut style = ProjectionStyle::default();
    style.palette = vec![
        PaletteEntry {
            value: "Keynote speaker".into(),
            colour: Rgb::new(0x2e, 0xcc, 0x71),
        },
        PaletteEntry {
            value: "Declined".into(),
            colour: Rgb::new(0xe7, 0x4c, 0x3c),
        },
    ];
    let manager =
        SyncManager::new(three_person_store(), style.clone(), Arc::new(EventBus::new())).unwrap();

    let everything = manager.current_frame().legend().entries().len();
    assert_eq!(everything, style.palette.len());

    let frame = manager
        .handle(InteractionEvent::apply(
            FilterKey::attribute("Status"),
            FilterValue::any_of(["Declined"]),
        ))
        .unwrap();
    let entries = frame.legend().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].label, "Declined");
    assert_eq!(entries[0].colour.to_hex(), "#e74c3c");
}

#[test]
fn bus_reports_load_changes_and_reset() {
    let bus = Arc::new(EventBus::new());
    let log = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&log);
    bus.subscribe_fn(move |e: &StoreLoaded| sink.lock().push(format!("loaded {}", e.records)));
    let sink = Arc::clone(&log);
    bus.subscribe_fn(move |e: &FiltersChanged| sink.lock().push(format!("changed {} {}", e.key, e.revision)));
    let sink = Arc::clone(&log);
    bus.subscribe_fn(move |e: &FiltersReset| sink.lock().push(format!("reset {}", e.revision)));

    let manager = SyncManager::new(three_person_store(), ProjectionStyle::default(), bus).unwrap();
    manager
        .handle(InteractionEvent::apply(FilterKey::attribute("City"), FilterValue::any_of(["B"])))
        .unwrap();
    // a reset on filters that are already clear changes nothing
    manager.handle(InteractionEvent::Reset).unwrap();
    manager.handle(InteractionEvent::Reset).unwrap();

    assert_eq!(
        *log.lock(),
        vec![
            "loaded 3".to_string(),
            "changed attribute:City 1".to_string(),
            "reset 2".to_string(),
        ]
    );
}

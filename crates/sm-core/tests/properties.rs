use indexmap::IndexMap;
use proptest::prelude::*;
use sm_core::{
    project, select, FilterKey, FilterSnapshot, FilterState, FilterValue, GeoBounds, GeoPosition,
    ProjectionStyle, Record, RecordId, RecordStore, StoreSchema,
};

const CITIES: [&str; 3] = ["A", "B", "C"];
const STATUSES: [&str; 2] = ["x", "y"];

#[derive(Debug, Clone)]
enum Op {
    City(Vec<&'static str>),
    Status(Vec<&'static str>),
    Search(String),
    Bounds(GeoBounds),
    Clear(FilterKey),
    Reset,
}

fn build_store(rows: Vec<(&'static str, &'static str, f64, f64)>) -> RecordStore {
    let records = rows
        .into_iter()
        .enumerate()
        .map(|(i, (city, status, lat, lon))| {
            let mut attributes = IndexMap::new();
            attributes.insert("Name".to_string(), format!("person {}{}", city, i));
            attributes.insert("City".to_string(), city.to_string());
            attributes.insert("Status".to_string(), status.to_string());
            Record::new(RecordId(i as u64 + 1), GeoPosition::new(lat, lon), attributes)
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

fn store_strategy() -> impl Strategy<Value = RecordStore> {
    let row = (
        prop::sample::select(CITIES.to_vec()),
        prop::sample::select(STATUSES.to_vec()),
        -80.0..80.0f64,
        -170.0..170.0f64,
    );
    prop::collection::vec(row, 1..40).prop_map(build_store)
}

fn bounds_strategy() -> impl Strategy<Value = GeoBounds> {
    (-90.0..90.0f64, -90.0..90.0f64, -180.0..180.0f64, -180.0..180.0f64).prop_map(|(a, b, c, d)| GeoBounds {
        south: a.min(b),
        north: a.max(b),
        west: c.min(d),
        east: c.max(d),
    })
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::sample::subsequence(CITIES.to_vec(), 0..=3).prop_map(Op::City),
        prop::sample::subsequence(STATUSES.to_vec(), 0..=2).prop_map(Op::Status),
        "[abcxy ]{0,3}".prop_map(Op::Search),
        bounds_strategy().prop_map(Op::Bounds),
        prop::sample::select(vec![
            FilterKey::attribute("City"),
            FilterKey::attribute("Status"),
            FilterKey::Search,
            FilterKey::Bounds,
        ])
        .prop_map(Op::Clear),
        Just(Op::Reset),
    ]
}

fn run(state: &mut FilterState, op: Op) {
    match op {
        Op::City(values) => state.apply(FilterKey::attribute("City"), FilterValue::any_of(values)),
        Op::Status(values) => state.apply(FilterKey::attribute("Status"), FilterValue::any_of(values)),
        Op::Search(text) => state.apply(FilterKey::Search, FilterValue::Text(text)),
        Op::Bounds(bounds) => state.apply(FilterKey::Bounds, FilterValue::Within(bounds)),
        Op::Clear(key) => state.apply(key, FilterValue::All),
        Op::Reset => state.reset(),
    };
}

/// Straightforward re-statement of the filter semantics
fn oracle(store: &RecordStore, snapshot: &FilterSnapshot) -> Vec<usize> {
    let criteria = snapshot.criteria();
    store
        .iter()
        .filter(|(_, record)| {
            criteria
                .attributes()
                .all(|(name, values)| record.attribute(name).is_some_and(|v| values.contains(v)))
        })
        .filter(|(_, record)| match criteria.search() {
            None => true,
            Some(needle) => ["Name", "City"].iter().any(|name| {
                record
                    .attribute(name)
                    .is_some_and(|v| v.to_lowercase().contains(&needle.to_lowercase()))
            }),
        })
        .filter(|(_, record)| criteria.bounds().map_or(true, |b| b.contains(record.position())))
        .map(|(idx, _)| idx.get())
        .collect()
}

proptest! {
    #[test]
    fn reset_restores_full_selection(store in store_strategy(), ops in prop::collection::vec(op_strategy(), 0..12)) {
        let mut state = FilterState::for_store(&store);
        for op in ops {
            run(&mut state, op);
        }
        state.reset();

        let after_reset = select(&store, &state.current());
        let fresh = select(&store, &FilterSnapshot::unfiltered());
        let all: Vec<usize> = (0..store.len()).collect();
        let got: Vec<usize> = after_reset.iter().map(|i| i.get()).collect();
        prop_assert_eq!(got, all);
        prop_assert_eq!(after_reset.indices(), fresh.indices());
    }

    #[test]
    fn selection_indices_are_valid_and_ordered(store in store_strategy(), ops in prop::collection::vec(op_strategy(), 0..12)) {
        let mut state = FilterState::for_store(&store);
        for op in ops {
            run(&mut state, op);
        }
        let selection = select(&store, &state.current());
        let positions: Vec<usize> = selection.iter().map(|i| i.get()).collect();

        prop_assert!(positions.iter().all(|&p| p < store.len()));
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(positions, oracle(&store, &state.current()));
    }

    #[test]
    fn markers_and_rows_stay_consistent(store in store_strategy(), ops in prop::collection::vec(op_strategy(), 0..12)) {
        let mut state = FilterState::for_store(&store);
        for op in ops {
            run(&mut state, op);
        }
        let selection = select(&store, &state.current());
        let frame = project(&store, &selection, &ProjectionStyle::default()).unwrap();

        prop_assert_eq!(frame.markers().len(), selection.len());
        prop_assert_eq!(frame.rows().len(), selection.len());
        prop_assert_eq!(frame.markers().ids(), frame.rows().ids());
        prop_assert!(frame.check_alignment().is_ok());

        let clustered: usize = frame.markers().clusters().iter().map(|c| c.len()).sum();
        prop_assert_eq!(clustered, selection.len());
    }

    #[test]
    fn selection_is_deterministic(store in store_strategy(), ops in prop::collection::vec(op_strategy(), 0..12)) {
        let mut state = FilterState::for_store(&store);
        for op in ops {
            run(&mut state, op);
        }
        let snapshot = state.current();
        prop_assert_eq!(select(&store, &snapshot), select(&store, &snapshot));
    }

    #[test]
    fn adding_a_filter_never_widens(
        store in store_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..8),
        extra in op_strategy(),
    ) {
        let mut state = FilterState::for_store(&store);
        for op in ops {
            run(&mut state, op);
        }
        let extra_key = match &extra {
            Op::City(v) if !v.is_empty() => FilterKey::attribute("City"),
            Op::Status(v) if !v.is_empty() => FilterKey::attribute("Status"),
            Op::Search(t) if !t.trim().is_empty() => FilterKey::Search,
            Op::Bounds(_) => FilterKey::Bounds,
            _ => return Ok(()),
        };
        prop_assume!(!state.current().criteria().active_keys().contains(&extra_key));

        let before = select(&store, &state.current()).len();
        run(&mut state, extra);
        let after = select(&store, &state.current()).len();
        prop_assert!(after <= before);
    }
}

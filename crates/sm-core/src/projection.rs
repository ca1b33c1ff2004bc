//! View projector: turns one selection into the map and table payloads
//!
//! Markers and rows are built from the same [`SelectionResult`] in the same
//! call, and both are addressed purely by position within that selection.
//! Nothing here ever looks at a previous frame.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::filter::FilterSnapshot;
use crate::selection::SelectionResult;
use crate::store::{GeoPosition, Record, RecordId, RecordIndex, RecordStore};

const CLUSTER_BASE_RADIUS: f32 = 8.0;
const CLUSTER_RADIUS_STEP: f32 = 2.0;
const CLUSTER_RADIUS_MAX_COUNT: usize = 10;

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Parse `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some(Self([channel(0)?, channel(2)?, channel(4)?]))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2])
    }
}

/// Colour assigned to one value of the colour attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub value: String,
    pub colour: Rgb,
}

/// Which attributes feed the marker labels, colours, popups and table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionStyle {
    /// Attribute used as marker tooltip and popup title
    pub label_attribute: String,
    /// Attribute whose value picks the marker colour
    pub colour_attribute: String,
    /// Ordered palette; its order is also the legend order
    pub palette: Vec<PaletteEntry>,
    /// Colour for values missing from the palette
    pub fallback_colour: Rgb,
    /// Table columns. Empty means every attribute of the first record.
    pub table_columns: Vec<String>,
    /// Popup lines shown under the title for a lone marker
    pub detail_attributes: Vec<String>,
    /// Attributes joined with ", " into the popup's place line
    pub place_attributes: Vec<String>,
}

impl Default for ProjectionStyle {
    fn default() -> Self {
        Self {
            label_attribute: "Name".to_string(),
            colour_attribute: "Status".to_string(),
            palette: Vec::new(),
            fallback_colour: Rgb::new(0x80, 0x80, 0x80),
            table_columns: Vec::new(),
            detail_attributes: Vec::new(),
            place_attributes: Vec::new(),
        }
    }
}

impl ProjectionStyle {
    pub fn colour_for(&self, value: Option<&str>) -> Rgb {
        value
            .and_then(|v| self.palette.iter().find(|entry| entry.value == v))
            .map(|entry| entry.colour)
            .unwrap_or(self.fallback_colour)
    }

    fn columns_for(&self, store: &RecordStore) -> Vec<String> {
        if !self.table_columns.is_empty() {
            return self.table_columns.clone();
        }
        store
            .iter()
            .next()
            .map(|(_, record)| record.attributes().keys().cloned().collect())
            .unwrap_or_default()
    }
}

/// One map marker, one per selected record
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: RecordId,
    pub index: RecordIndex,
    pub position: GeoPosition,
    pub label: String,
    pub category: Option<String>,
    pub colour: Rgb,
    /// Popup lines used when this marker is alone at its coordinate
    pub details: Vec<String>,
}

/// Popup content of a drawn cluster
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterPopup {
    Single { title: String, lines: Vec<String> },
    Group { heading: String, entries: Vec<String> },
}

/// Markers sharing one coordinate, drawn as a single circle
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerCluster {
    pub position: GeoPosition,
    /// Positions into the frame's marker list
    pub members: Vec<usize>,
    pub colour: Rgb,
    pub radius: f32,
    pub tooltip: String,
    pub popup: ClusterPopup,
}

impl MarkerCluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Radius of a cluster circle for the given member count
pub fn cluster_radius(count: usize) -> f32 {
    CLUSTER_BASE_RADIUS + CLUSTER_RADIUS_STEP * count.min(CLUSTER_RADIUS_MAX_COUNT) as f32
}

/// Map payload of one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerSet {
    markers: Vec<Marker>,
}

impl MarkerSet {
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Marker> {
        self.markers.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Marker> {
        self.markers.iter()
    }

    pub fn ids(&self) -> Vec<RecordId> {
        self.markers.iter().map(|m| m.id).collect()
    }

    /// Group markers by identical coordinate, ordered by latitude then longitude
    pub fn clusters(&self) -> Vec<MarkerCluster> {
        let mut groups: IndexMap<(u64, u64), Vec<usize>, ahash::RandomState> = IndexMap::default();
        for (pos, marker) in self.markers.iter().enumerate() {
            // +0.0 folds -0.0 into 0.0 so both land in one group
            let key = (
                (marker.position.lat + 0.0).to_bits(),
                (marker.position.lon + 0.0).to_bits(),
            );
            groups.entry(key).or_default().push(pos);
        }

        let mut clusters: Vec<MarkerCluster> = groups
            .into_values()
            .filter_map(|members| self.cluster_from(members))
            .collect();
        clusters.sort_by(|a, b| {
            a.position
                .lat
                .total_cmp(&b.position.lat)
                .then_with(|| a.position.lon.total_cmp(&b.position.lon))
        });
        clusters
    }

    fn cluster_from(&self, members: Vec<usize>) -> Option<MarkerCluster> {
        let first = self.markers.get(*members.first()?)?;
        let count = members.len();

        let (tooltip, popup) = if count == 1 {
            (
                first.label.clone(),
                ClusterPopup::Single {
                    title: first.label.clone(),
                    lines: first.details.clone(),
                },
            )
        } else {
            let entries = members
                .iter()
                .filter_map(|&pos| self.markers.get(pos))
                .map(|m| format!("{} ({})", m.label, m.category.as_deref().unwrap_or("")))
                .collect();
            (
                format!("{} people", count),
                ClusterPopup::Group {
                    heading: format!("{} people here", count),
                    entries,
                },
            )
        };

        Some(MarkerCluster {
            position: first.position,
            colour: first.colour,
            radius: cluster_radius(count),
            tooltip,
            popup,
            members,
        })
    }
}

/// One table row, one per selected record
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub id: RecordId,
    pub index: RecordIndex,
    pub cells: Vec<String>,
}

/// A page of rows, always within the current row count
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TablePage<'a> {
    /// Page actually shown, after clamping
    pub page: usize,
    pub page_count: usize,
    /// Position of the first row of this page within the frame
    pub offset: usize,
    pub rows: &'a [TableRow],
}

/// Table payload of one frame
#[derive(Debug, Clone, PartialEq)]
pub struct TableRows {
    columns: Arc<[String]>,
    rows: Vec<TableRow>,
}

impl Default for TableRows {
    fn default() -> Self {
        Self {
            columns: Arc::from(Vec::new()),
            rows: Vec::new(),
        }
    }
}

impl TableRows {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&TableRow> {
        self.rows.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TableRow> {
        self.rows.iter()
    }

    pub fn ids(&self) -> Vec<RecordId> {
        self.rows.iter().map(|r| r.id).collect()
    }

    /// Number of pages; an empty table still has one (empty) page
    pub fn page_count(&self, page_size: usize) -> usize {
        let page_size = page_size.max(1);
        self.rows.len().div_ceil(page_size).max(1)
    }

    /// Rows of one page. A page past the end clamps to the last page.
    pub fn page(&self, page: usize, page_size: usize) -> TablePage<'_> {
        let page_size = page_size.max(1);
        let page_count = self.page_count(page_size);
        let page = page.min(page_count - 1);
        let offset = (page * page_size).min(self.rows.len());
        let end = (offset + page_size).min(self.rows.len());
        TablePage {
            page,
            page_count,
            offset,
            rows: &self.rows[offset..end],
        }
    }
}

/// One legend swatch
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub colour: Rgb,
}

/// Colour key shown above the map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Legend {
    entries: Vec<LegendEntry>,
}

impl Legend {
    /// Selected colour-attribute values when that filter is active, otherwise the full palette
    pub fn for_snapshot(snapshot: &FilterSnapshot, style: &ProjectionStyle) -> Self {
        let selected = snapshot.criteria().selected(&style.colour_attribute);

        let mut entries: Vec<LegendEntry> = style
            .palette
            .iter()
            .filter(|entry| selected.map_or(true, |s| s.contains(&entry.value)))
            .map(|entry| LegendEntry {
                label: entry.value.clone(),
                colour: entry.colour,
            })
            .collect();

        if let Some(selected) = selected {
            entries.extend(
                selected
                    .iter()
                    .filter(|value| !style.palette.iter().any(|e| &e.value == *value))
                    .map(|value| LegendEntry {
                        label: value.clone(),
                        colour: style.fallback_colour,
                    }),
            );
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }
}

/// Everything one pass publishes: map, table and legend from one selection
#[derive(Debug, Clone, PartialEq)]
pub struct ViewFrame {
    revision: u64,
    selection: SelectionResult,
    markers: MarkerSet,
    rows: TableRows,
    legend: Legend,
}

impl ViewFrame {
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn selection(&self) -> &SelectionResult {
        &self.selection
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn rows(&self) -> &TableRows {
        &self.rows
    }

    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    /// Number of records shown by this frame
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn with_legend(mut self, legend: Legend) -> Self {
        self.legend = legend;
        self
    }

    /// Confirm markers and rows reference the same records in the same order
    pub fn check_alignment(&self) -> Result<()> {
        let markers = self.markers.len();
        let rows = self.rows.len();
        let expected = self.selection.indices();

        let mismatch = self
            .markers
            .iter()
            .zip(self.rows.iter())
            .enumerate()
            .find(|(pos, (marker, row))| {
                marker.index != row.index
                    || marker.id != row.id
                    || expected.get(*pos) != Some(&marker.index)
            })
            .map(|(pos, _)| pos);

        match mismatch {
            Some(position) => Err(CoreError::Misaligned {
                revision: self.revision,
                markers,
                rows,
                position,
            }),
            None if markers != rows || rows != expected.len() => Err(CoreError::Misaligned {
                revision: self.revision,
                markers,
                rows,
                position: markers.min(rows),
            }),
            None => Ok(()),
        }
    }
}

fn marker_for(index: RecordIndex, record: &Record, style: &ProjectionStyle) -> Marker {
    let category = record.attribute(&style.colour_attribute).map(str::to_string);

    let mut details: Vec<String> = style
        .detail_attributes
        .iter()
        .filter_map(|name| record.attribute(name))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    let place: Vec<&str> = style
        .place_attributes
        .iter()
        .filter_map(|name| record.attribute(name))
        .filter(|v| !v.is_empty())
        .collect();
    if !place.is_empty() {
        details.push(place.join(", "));
    }

    Marker {
        id: record.id(),
        index,
        position: record.position(),
        label: record.attribute(&style.label_attribute).unwrap_or_default().to_string(),
        colour: style.colour_for(category.as_deref()),
        category,
        details,
    }
}

fn row_for(index: RecordIndex, record: &Record, columns: &[String]) -> TableRow {
    TableRow {
        id: record.id(),
        index,
        cells: columns
            .iter()
            .map(|column| record.attribute(column).unwrap_or_default().to_string())
            .collect(),
    }
}

/// Build the marker set and table rows for one selection.
///
/// The selection must come from `store`; one computed against any other
/// store is refused instead of being indexed.
pub fn project(
    store: &RecordStore,
    selection: &SelectionResult,
    style: &ProjectionStyle,
) -> Result<ViewFrame> {
    if selection.store_id() != store.id() {
        return Err(CoreError::ForeignSelection {
            expected: store.id().to_string(),
            found: selection.store_id().to_string(),
        });
    }

    let columns: Arc<[String]> = style.columns_for(store).into();
    let mut markers = Vec::with_capacity(selection.len());
    let mut rows = Vec::with_capacity(selection.len());

    for (pos, index) in selection.iter().enumerate() {
        let record = store.get(index).ok_or_else(|| CoreError::Misaligned {
            revision: selection.revision(),
            markers: markers.len(),
            rows: rows.len(),
            position: pos,
        })?;
        markers.push(marker_for(index, record, style));
        rows.push(row_for(index, record, &columns));
    }

    let frame = ViewFrame {
        revision: selection.revision(),
        selection: selection.clone(),
        markers: MarkerSet { markers },
        rows: TableRows { columns, rows },
        legend: Legend::default(),
    };
    frame.check_alignment()?;
    Ok(frame)
}

//! In-memory record store backing the list/create/delete contract that an
//! API layer exposes over performances and selection entries.
//!
//! Record ids are auto-incremented integers, separate from the derived
//! string id every `Performance` carries.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::performance::{NewPerformance, Performance, ValidationError};

/// A performance with its record id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPerformance
{
    pub record_id: u64,
    #[serde(flatten)]
    pub performance: Performance,
}

/// Selection entry payload before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSelectionEntry
{
    pub artist_id: Option<u64>,
    pub selected: Option<bool>,
}

/// A stored selection entry keyed by the selected record id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionEntry
{
    pub id: u64,
    pub artist_id: u64,
    pub selected: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct RecordStore
{
    performances: IndexMap<u64, StoredPerformance>,
    selections: IndexMap<u64, SelectionEntry>,
    next_performance_id: u64,
    next_selection_id: u64,
}

impl RecordStore
{
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Store seeded with an already-parsed lineup, in lineup order.
    pub fn seeded(performances: impl IntoIterator<Item = Performance>) -> Self
    {
        let mut store = Self::new();
        for performance in performances
        {
            store.insert(performance);
        }
        store
    }

    fn insert(
        &mut self,
        performance: Performance,
    ) -> &StoredPerformance
    {
        self.next_performance_id += 1;
        let record_id = self.next_performance_id;
        self.performances
            .entry(record_id)
            .or_insert(StoredPerformance { record_id, performance })
    }

    pub fn list_performances(&self) -> Vec<&StoredPerformance>
    {
        self.performances
            .values()
            .collect()
    }

    pub fn get_performance(
        &self,
        record_id: u64,
    ) -> Option<&StoredPerformance>
    {
        self.performances
            .get(&record_id)
    }

    /// Validate and store a new performance. The derived id must be unused.
    pub fn create_performance(
        &mut self,
        input: NewPerformance,
    ) -> Result<&StoredPerformance, ValidationError>
    {
        let performance = Performance::try_from(input)?;

        if self
            .performances
            .values()
            .any(|p| p.performance.id == performance.id)
        {
            return Err(ValidationError::Duplicate(performance.id));
        }

        debug!(id = %performance.id, "performance record created");
        Ok(self.insert(performance))
    }

    pub fn list_selections(&self) -> Vec<&SelectionEntry>
    {
        self.selections
            .values()
            .collect()
    }

    /// Validate and store a selection entry. `selected` defaults to `true`.
    pub fn create_selection(
        &mut self,
        input: NewSelectionEntry,
    ) -> Result<&SelectionEntry, ValidationError>
    {
        let artist_id = input
            .artist_id
            .ok_or(ValidationError::MissingField("artistId"))?;

        if !self
            .performances
            .contains_key(&artist_id)
        {
            return Err(ValidationError::UnknownRecord(artist_id));
        }

        self.next_selection_id += 1;
        let id = self.next_selection_id;
        let entry = SelectionEntry {
            id,
            artist_id,
            selected: input
                .selected
                .unwrap_or(true),
            created_at: Utc::now(),
        };

        Ok(self
            .selections
            .entry(id)
            .or_insert(entry))
    }

    /// Remove every entry for `artist_id`; returns how many went.
    pub fn delete_selection(
        &mut self,
        artist_id: u64,
    ) -> usize
    {
        let before = self
            .selections
            .len();
        self.selections
            .retain(|_, entry| entry.artist_id != artist_id);
        before
            - self
                .selections
                .len()
    }
}

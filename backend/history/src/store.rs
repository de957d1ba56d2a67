use chrono::Utc;
use tracing::{debug, info, warn};

use redpen_core::{GradingPayload, GradingRecord, RedpenError};

use crate::persist::{HistoryPersistence, InMemoryStore};

/// Most records the history keeps; the oldest beyond this is discarded on
/// insert.
pub const HISTORY_CAP: usize = 40;

/// The grading history: newest first, capped, flushed to persistence after
/// every mutation. Single logical writer.
pub struct HistoryStore {
    records: Vec<GradingRecord>,
    last_id: i64,
    persistence: Box<dyn HistoryPersistence>,
}

impl HistoryStore {
    /// Load the history through the given persistence backend.
    ///
    /// Absent state starts empty. Unreadable or unparsable state also
    /// starts empty, with a warning in the log: a corrupt cache should not
    /// brick the tool.
    pub fn open(persistence: Box<dyn HistoryPersistence>) -> Self {
        let records = match persistence.load() {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<GradingRecord>>(&raw) {
                Ok(records) => records,
                Err(e) => {
                    warn!(error = %e, "Persisted history is unparsable, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Could not read persisted history, starting empty");
                Vec::new()
            }
        };

        let last_id = records.iter().map(|r| r.id).max().unwrap_or(0);
        info!(records = records.len(), "History loaded");

        Self {
            records,
            last_id,
            persistence,
        }
    }

    /// Volatile store for testing.
    pub fn in_memory() -> Self {
        Self::open(Box::new(InMemoryStore::new()))
    }

    /// Append a freshly graded essay; returns the assigned id.
    ///
    /// Ids are wall-clock milliseconds bumped to stay strictly monotonic,
    /// so two appends in the same millisecond cannot collide.
    pub fn append(
        &mut self,
        images: Vec<String>,
        payload: GradingPayload,
    ) -> Result<i64, RedpenError> {
        let now = Utc::now();
        let mut id = now.timestamp_millis();
        if id <= self.last_id {
            id = self.last_id + 1;
        }
        self.last_id = id;

        self.records.insert(
            0,
            GradingRecord {
                id,
                timestamp: now,
                images,
                payload,
            },
        );
        if self.records.len() > HISTORY_CAP {
            debug!(discarded = self.records.len() - HISTORY_CAP, "History cap reached");
            self.records.truncate(HISTORY_CAP);
        }

        self.flush()?;
        Ok(id)
    }

    /// Remove a record by id; `false` (and no flush) if it is absent.
    pub fn remove(&mut self, id: i64) -> Result<bool, RedpenError> {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        if self.records.len() == before {
            return Ok(false);
        }
        self.flush()?;
        Ok(true)
    }

    pub fn get(&self, id: i64) -> Option<&GradingRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// All records, newest first.
    pub fn records(&self) -> &[GradingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn flush(&self) -> Result<(), RedpenError> {
        let serialized = serde_json::to_string(&self.records)
            .map_err(|e| RedpenError::Storage(e.to_string()))?;
        self.persistence
            .save(&serialized)
            .map_err(|e| RedpenError::Storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redpen_core::{GradeTier, StructureReview};

    fn payload(text: &str) -> GradingPayload {
        GradingPayload {
            original_text: text.to_string(),
            total_score: 70,
            grade_level: GradeTier::Tier4,
            detailed_scores: vec![],
            errors: vec![],
            highlights: vec![],
            structure: StructureReview {
                opening: String::new(),
                development: String::new(),
                conclusion: String::new(),
            },
            overall_comment: "評語".to_string(),
        }
    }

    #[test]
    fn test_append_orders_newest_first() {
        let mut store = HistoryStore::in_memory();
        for i in 0..5 {
            store.append(vec![], payload(&format!("essay-{i}"))).unwrap();
        }
        assert_eq!(store.len(), 5);
        let texts: Vec<_> = store
            .records()
            .iter()
            .map(|r| r.payload.original_text.as_str())
            .collect();
        assert_eq!(texts, ["essay-4", "essay-3", "essay-2", "essay-1", "essay-0"]);
    }

    #[test]
    fn test_ids_are_strictly_monotonic_even_within_one_millisecond() {
        let mut store = HistoryStore::in_memory();
        let mut ids = Vec::new();
        for i in 0..50 {
            ids.push(store.append(vec![], payload(&i.to_string())).unwrap());
        }
        for pair in ids.windows(2) {
            assert!(pair[1] > pair[0], "{} !> {}", pair[1], pair[0]);
        }
    }

    #[test]
    fn test_41st_append_discards_the_oldest() {
        let mut store = HistoryStore::in_memory();
        let mut ids = Vec::new();
        for i in 0..41 {
            ids.push(store.append(vec![], payload(&i.to_string())).unwrap());
        }
        assert_eq!(store.len(), HISTORY_CAP);
        let oldest = ids[0];
        assert!(store.get(oldest).is_none());
        assert!(store.get(ids[1]).is_some());
        assert!(store.get(ids[40]).is_some());
    }

    #[test]
    fn test_remove_absent_id_is_a_noop() {
        let mut store = HistoryStore::in_memory();
        let id = store.append(vec![], payload("only")).unwrap();
        assert!(!store.remove(id + 999).unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_present_id_touches_nothing_else() {
        let mut store = HistoryStore::in_memory();
        let ids: Vec<_> = (0..4)
            .map(|i| store.append(vec![], payload(&i.to_string())).unwrap())
            .collect();
        assert!(store.remove(ids[2]).unwrap());
        assert_eq!(store.len(), 3);
        assert!(store.get(ids[2]).is_none());
        for &id in [ids[0], ids[1], ids[3]].iter() {
            assert!(store.get(id).is_some());
        }
    }

    #[test]
    fn test_persisted_log_reloads_field_for_field() {
        let backing = InMemoryStore::new();
        let mut store = HistoryStore::open(Box::new(backing.clone()));
        store
            .append(vec!["p1.jpg".to_string()], payload("第一篇"))
            .unwrap();
        store.append(vec![], payload("第二篇")).unwrap();
        let original: Vec<_> = store.records().to_vec();

        let reopened = HistoryStore::open(Box::new(backing));
        assert_eq!(reopened.records(), original.as_slice());
    }

    #[test]
    fn test_reopened_store_keeps_ids_monotonic() {
        let backing = InMemoryStore::new();
        let mut store = HistoryStore::open(Box::new(backing.clone()));
        let first = store.append(vec![], payload("a")).unwrap();

        let mut reopened = HistoryStore::open(Box::new(backing));
        let second = reopened.append(vec![], payload("b")).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_malformed_persisted_history_starts_empty() {
        let store = HistoryStore::open(Box::new(InMemoryStore::seeded("not json at all")));
        assert!(store.is_empty());
    }

    #[test]
    fn test_empty_array_persisted_history_starts_empty() {
        let store = HistoryStore::open(Box::new(InMemoryStore::seeded("[]")));
        assert!(store.is_empty());
    }
}

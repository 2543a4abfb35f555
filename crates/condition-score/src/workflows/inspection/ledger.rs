use super::domain::{MediaHandle, ObservationKey};
use serde::{Deserialize, Serialize};
use std::collections::{btree_map, BTreeMap};

/// Running tally for one defect at one scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub key: ObservationKey,
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<MediaHandle>,
}

impl Observation {
    fn empty(key: ObservationKey) -> Self {
        Self {
            key,
            count: 0,
            note: None,
            media: Vec::new(),
        }
    }

    fn is_vacant(&self) -> bool {
        self.count == 0 && self.note.is_none() && self.media.is_empty()
    }
}

/// Per-key defect counts with free-text annotations.
///
/// Entries whose count drops to zero stay in the ledger while they still carry a
/// note or media; they are never yielded by [`ObservationLedger::occurrences`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Observation>", into = "Vec<Observation>")]
pub struct ObservationLedger {
    entries: BTreeMap<ObservationKey, Observation>,
}

impl ObservationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `delta` to the count at `key`, clamping at zero, and return the new count.
    pub fn record_occurrence(&mut self, key: ObservationKey, delta: i64) -> u32 {
        let current = self.count(&key);
        let next = i64::from(current)
            .saturating_add(delta)
            .clamp(0, i64::from(u32::MAX)) as u32;
        if next == current {
            return current;
        }

        let entry = self
            .entries
            .entry(key)
            .or_insert_with(|| Observation::empty(key));
        entry.count = next;
        self.prune(&key);
        next
    }

    /// Attach or replace the note at `key`; blank text clears it.
    pub fn set_note(&mut self, key: ObservationKey, text: impl Into<String>) {
        let text = text.into();
        let note = if text.trim().is_empty() {
            None
        } else {
            Some(text)
        };

        match self.entries.entry(key) {
            btree_map::Entry::Occupied(mut occupied) => {
                occupied.get_mut().note = note;
            }
            btree_map::Entry::Vacant(vacant) => {
                if note.is_some() {
                    vacant.insert(Observation {
                        note,
                        ..Observation::empty(key)
                    });
                }
            }
        }
        self.prune(&key);
    }

    pub fn attach_media(&mut self, key: ObservationKey, handle: MediaHandle) {
        let entry = self
            .entries
            .entry(key)
            .or_insert_with(|| Observation::empty(key));
        if !entry.media.contains(&handle) {
            entry.media.push(handle);
        }
    }

    pub fn count(&self, key: &ObservationKey) -> u32 {
        self.entries.get(key).map_or(0, |entry| entry.count)
    }

    pub fn get(&self, key: &ObservationKey) -> Option<&Observation> {
        self.entries.get(key)
    }

    /// Every retained entry, including zero-count entries that only hold a note or media.
    pub fn entries(&self) -> impl Iterator<Item = &Observation> + '_ {
        self.entries.values()
    }

    /// Recorded defects with a positive count, in key order.
    pub fn occurrences(&self) -> Occurrences<'_> {
        Occurrences {
            inner: self.entries.values(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences().next().is_none()
    }

    fn prune(&mut self, key: &ObservationKey) {
        if self.entries.get(key).is_some_and(Observation::is_vacant) {
            self.entries.remove(key);
        }
    }
}

impl From<Vec<Observation>> for ObservationLedger {
    fn from(value: Vec<Observation>) -> Self {
        let mut entries = BTreeMap::new();
        for observation in value {
            if !observation.is_vacant() {
                entries.insert(observation.key, observation);
            }
        }
        Self { entries }
    }
}

impl From<ObservationLedger> for Vec<Observation> {
    fn from(value: ObservationLedger) -> Self {
        value.entries.into_values().collect()
    }
}

/// One recorded defect as seen by aggregation and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence<'a> {
    pub key: ObservationKey,
    pub count: u32,
    pub note: Option<&'a str>,
}

/// Lazy view over the ledger's positive-count entries. Clone it to restart.
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    inner: btree_map::Values<'a, ObservationKey, Observation>,
}

impl<'a> Iterator for Occurrences<'a> {
    type Item = Occurrence<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .find(|entry| entry.count > 0)
            .map(|entry| Occurrence {
                key: entry.key,
                count: entry.count,
                note: entry.note.as_deref(),
            })
    }
}

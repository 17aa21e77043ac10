//! In-memory store for staged datasets.

use std::collections::BTreeMap;

use crate::frame::TableFrame;

/// Named collection of staged datasets.
///
/// The workspace is an explicit value threaded through the pipeline; there
/// is no process-global registry. Keys are dataset names produced by
/// [`normalize_dataset_name`](crate::spec::normalize_dataset_name), so a
/// table imported as `patient-visits` is retrieved as `patient_visits`.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    frames: BTreeMap<String, TableFrame>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a dataset under its name, returning the dataset it displaced.
    ///
    /// Re-importing a table overwrites the previous copy: last write wins.
    pub fn insert(&mut self, frame: TableFrame) -> Option<TableFrame> {
        self.frames.insert(frame.name.clone(), frame)
    }

    pub fn get(&self, name: &str) -> Option<&TableFrame> {
        self.frames.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut TableFrame> {
        self.frames.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<TableFrame> {
        self.frames.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.frames.contains_key(name)
    }

    /// Dataset names in store order.
    pub fn names(&self) -> Vec<&str> {
        self.frames.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableFrame> {
        self.frames.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut TableFrame> {
        self.frames.values_mut()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

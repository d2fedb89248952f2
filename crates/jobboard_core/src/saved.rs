use std::collections::BTreeSet;

use crate::Id;

/// Job ids the signed-in candidate has bookmarked.
///
/// Backed by a set, so a job can never be bookmarked twice locally.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SavedSet {
    jobs: BTreeSet<Id>,
}

impl SavedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, job_id: &Id) -> bool {
        self.jobs.contains(job_id)
    }

    /// Returns false if the job was already saved.
    pub fn insert(&mut self, job_id: Id) -> bool {
        self.jobs.insert(job_id)
    }

    /// Returns false if the job was not saved.
    pub fn remove(&mut self, job_id: &Id) -> bool {
        self.jobs.remove(job_id)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Id> {
        self.jobs.iter()
    }
}

impl FromIterator<Id> for SavedSet {
    fn from_iter<I: IntoIterator<Item = Id>>(iter: I) -> Self {
        Self {
            jobs: iter.into_iter().collect(),
        }
    }
}

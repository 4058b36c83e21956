use crate::models::{MatchRecord, MenteeProfile, MentorProfile};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Errors that can occur with record store operations
#[derive(Debug, Error, PartialEq)]
pub enum RepositoryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate id: {0}")]
    Duplicate(String),

    #[error("Record store lock poisoned")]
    Poisoned,
}

/// A record with a string identifier and an id prefix for generated ids
pub trait Record: Clone + Send + Sync + 'static {
    /// Prefix for generated ids, e.g. `M` gives `M001`
    const ID_PREFIX: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

impl Record for MentorProfile {
    const ID_PREFIX: &'static str = "M";

    fn id(&self) -> &str {
        &self.mentor_id
    }

    fn set_id(&mut self, id: String) {
        self.mentor_id = id;
    }
}

impl Record for MenteeProfile {
    const ID_PREFIX: &'static str = "ME";

    fn id(&self) -> &str {
        &self.mentee_id
    }

    fn set_id(&mut self, id: String) {
        self.mentee_id = id;
    }
}

impl Record for MatchRecord {
    const ID_PREFIX: &'static str = "MA";

    fn id(&self) -> &str {
        &self.match_id
    }

    fn set_id(&mut self, id: String) {
        self.match_id = id;
    }
}

/// Record store interface injected into the HTTP layer
///
/// The ranking core never talks to a repository; it only receives
/// [`Repository::snapshot`] copies.
pub trait Repository<T: Record>: Send + Sync {
    /// Insert a record, assigning the next sequential id when the id is blank
    fn create(&self, record: T) -> Result<T, RepositoryError>;

    fn get(&self, id: &str) -> Result<T, RepositoryError>;

    /// All records in insertion order
    fn list(&self) -> Result<Vec<T>, RepositoryError>;

    /// Replace the record with the same id
    fn update(&self, record: T) -> Result<T, RepositoryError>;

    fn delete(&self, id: &str) -> Result<(), RepositoryError>;

    /// Id the next generated record would receive
    fn next_id(&self) -> Result<String, RepositoryError>;

    /// Immutable copy for a scoring run
    fn snapshot(&self) -> Result<Arc<[T]>, RepositoryError> {
        Ok(self.list()?.into())
    }

    /// Insert many records atomically: either all are stored or none
    fn create_many(&self, records: Vec<T>) -> Result<Vec<T>, RepositoryError>;
}

/// Sequential id such as `M001` or `MA012`
pub fn sequential_id(prefix: &str, n: usize) -> String {
    format!("{}{:03}", prefix, n)
}

/// In-memory record store backed by an insertion-ordered vector
#[derive(Debug)]
pub struct InMemoryRepository<T> {
    records: RwLock<Vec<T>>,
}

impl<T: Record> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// First sequential id past the record count that is not taken.
    /// Count-based ids can collide after deletes or explicit ids.
    fn free_id(records: &[T]) -> String {
        let mut n = records.len() + 1;
        let mut id = sequential_id(T::ID_PREFIX, n);
        while records.iter().any(|r| r.id() == id) {
            n += 1;
            id = sequential_id(T::ID_PREFIX, n);
        }
        id
    }

    /// Assign an id if needed and push, checking for duplicates
    fn insert(records: &mut Vec<T>, mut record: T) -> Result<T, RepositoryError> {
        if record.id().trim().is_empty() {
            record.set_id(Self::free_id(records));
        } else {
            let trimmed = record.id().trim().to_string();
            record.set_id(trimmed);
        }

        if records.iter().any(|r| r.id() == record.id()) {
            return Err(RepositoryError::Duplicate(record.id().to_string()));
        }

        records.push(record.clone());
        Ok(record)
    }
}

impl<T: Record> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Repository<T> for InMemoryRepository<T> {
    fn create(&self, record: T) -> Result<T, RepositoryError> {
        let mut records = self.records.write().map_err(|_| RepositoryError::Poisoned)?;
        let created = Self::insert(&mut records, record)?;
        tracing::debug!("Created record {}", created.id());
        Ok(created)
    }

    fn get(&self, id: &str) -> Result<T, RepositoryError> {
        let records = self.records.read().map_err(|_| RepositoryError::Poisoned)?;
        records
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    fn list(&self) -> Result<Vec<T>, RepositoryError> {
        let records = self.records.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(records.clone())
    }

    fn update(&self, record: T) -> Result<T, RepositoryError> {
        let mut records = self.records.write().map_err(|_| RepositoryError::Poisoned)?;
        let slot = records
            .iter_mut()
            .find(|r| r.id() == record.id())
            .ok_or_else(|| RepositoryError::NotFound(record.id().to_string()))?;
        *slot = record.clone();
        Ok(record)
    }

    fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let mut records = self.records.write().map_err(|_| RepositoryError::Poisoned)?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        tracing::debug!("Deleted record {}", id);
        Ok(())
    }

    fn next_id(&self) -> Result<String, RepositoryError> {
        let records = self.records.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(Self::free_id(&records))
    }

    fn create_many(&self, new_records: Vec<T>) -> Result<Vec<T>, RepositoryError> {
        let mut records = self.records.write().map_err(|_| RepositoryError::Poisoned)?;
        let mut staged = records.clone();
        let mut created = Vec::with_capacity(new_records.len());

        for record in new_records {
            created.push(Self::insert(&mut staged, record)?);
        }

        *records = staged;
        Ok(created)
    }
}

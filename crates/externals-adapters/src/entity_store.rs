//! In-memory entity store standing in for the ORM.
//!
//! On [`InMemoryEntityStore::persist`] the registered pre-persist listeners
//! run first, then the row is inserted. The `(entity, property, value)`
//! triple of a generated value is a unique index: a duplicate insert is
//! rejected with `UniqueConstraintViolation`, never retried here.

use std::{
    collections::HashSet,
    sync::{Arc, RwLock},
};

use serde::Serialize;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use externals_core::{
    application::{
        ApplicationError,
        ports::{PrePersistListener, UniqueValueRepository},
    },
    domain::Entity,
    error::ExternalsResult,
};

/// The unique value carried by a stored row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UniqueValue {
    pub property: String,
    pub value: String,
}

/// A persisted row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredRecord {
    pub id: Uuid,
    pub entity: String,
    pub unique: Option<UniqueValue>,
}

#[derive(Debug, Default)]
struct StoreInner {
    records: Vec<StoredRecord>,
    index: HashSet<(String, String, String)>,
}

impl StoreInner {
    fn insert(&mut self, record: StoredRecord) -> ExternalsResult<()> {
        if let Some(unique) = &record.unique {
            let key = (
                record.entity.clone(),
                unique.property.clone(),
                unique.value.clone(),
            );
            if !self.index.insert(key) {
                return Err(ApplicationError::UniqueConstraintViolation {
                    entity: record.entity,
                    property: unique.property.clone(),
                    value: unique.value.clone(),
                }
                .into());
            }
        }

        self.records.push(record);
        Ok(())
    }
}

/// Thread-safe in-memory store.
#[derive(Clone, Default)]
pub struct InMemoryEntityStore {
    inner: Arc<RwLock<StoreInner>>,
    listeners: Vec<Arc<dyn PrePersistListener>>,
}

impl InMemoryEntityStore {
    /// Create a new empty store without listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pre-persist listener; listeners run in registration order.
    pub fn with_listener(mut self, listener: impl PrePersistListener + 'static) -> Self {
        self.listeners.push(Arc::new(listener));
        self
    }

    /// Run listeners, then insert the entity.
    #[instrument(skip_all, fields(entity = %entity.entity_name()))]
    pub fn persist(&self, entity: &mut dyn Entity) -> ExternalsResult<StoredRecord> {
        for listener in &self.listeners {
            listener.pre_persist(entity, self)?;
        }

        let unique = entity.unique_value_target().and_then(|target| {
            target.generated_value().map(|value| UniqueValue {
                property: target.generated_property().to_string(),
                value: value.to_string(),
            })
        });

        let record = StoredRecord {
            id: Uuid::new_v4(),
            entity: entity.entity_name().to_string(),
            unique,
        };

        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if let Err(e) = inner.insert(record.clone()) {
            warn!(error = %e, "Insert rejected");
            return Err(e);
        }

        debug!(id = %record.id, "Entity persisted");
        Ok(record)
    }

    /// Preload an existing unique value without running listeners.
    pub fn seed(
        &self,
        entity: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> ExternalsResult<StoredRecord> {
        let record = StoredRecord {
            id: Uuid::new_v4(),
            entity: entity.into(),
            unique: Some(UniqueValue {
                property: property.into(),
                value: value.into(),
            }),
        };

        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.insert(record.clone())?;

        Ok(record)
    }

    /// All stored values of `entity.property`, in insertion order.
    pub fn values(&self, entity: &str, property: &str) -> ExternalsResult<Vec<String>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        Ok(inner
            .records
            .iter()
            .filter(|r| r.entity == entity)
            .filter_map(|r| r.unique.as_ref())
            .filter(|u| u.property == property)
            .map(|u| u.value.clone())
            .collect())
    }

    /// Get the number of stored rows.
    pub fn len(&self) -> usize {
        self.inner.read().map(|i| i.records.len()).unwrap_or(0)
    }

    /// Check if store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UniqueValueRepository for InMemoryEntityStore {
    fn count(&self, entity: &str, property: &str, value: &str) -> ExternalsResult<u64> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let key = (entity.to_string(), property.to_string(), value.to_string());
        Ok(u64::from(inner.index.contains(&key)))
    }
}

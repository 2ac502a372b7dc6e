use std::sync::RwLock;

use crate::data::models::{NewPostcode, Postcode};
use crate::data::repo::{PostcodeStore, StoreError};

/// Vector-backed store. Every query is a linear pass.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<Postcode>>
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PostcodeStore for MemoryStore {
    fn insert(&self, record: &NewPostcode<'_>) -> Result<i32, StoreError> {
        let mut rows = self.rows.write()?;
        // Ids are only ever handed out under the write lock
        let id = rows.last().map(|row| row.id + 1).unwrap_or(1);
        rows.push(Postcode {
            id,
            postcode: record.postcode.to_owned(),
            latitude: record.latitude,
            longitude: record.longitude
        });
        Ok(id)
    }

    fn find_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<Postcode>, StoreError> {
        let rows = self.rows.read()?;
        let mut matches: Vec<&Postcode> = rows
            .iter()
            .filter(|row| row.postcode.starts_with(prefix))
            .collect();
        matches.sort_by(|a, b| {
            a.postcode.as_bytes()
                .cmp(b.postcode.as_bytes())
                .then(a.id.cmp(&b.id))
        });

        Ok(matches.into_iter().take(limit).cloned().collect())
    }

    fn scan(&self, visit: &mut dyn FnMut(Postcode)) -> Result<(), StoreError> {
        let rows = self.rows.read()?;
        for row in rows.iter() {
            visit(row.clone());
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.rows.write()?.clear();
        Ok(())
    }
}

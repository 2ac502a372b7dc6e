use crate::data::models::{Coordinates, NewPostcode, Postcode};

pub mod error;
pub mod memory;
pub mod postgres;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgStore;

pub trait PostcodeStore: Send + Sync {
    /// Persist one record and return its surrogate id.
    ///
    /// Inserts are independent of each other; duplicate postcodes are
    /// stored as separate rows.
    fn insert(&self, record: &NewPostcode<'_>) -> Result<i32, StoreError>;

    /// Records whose postcode starts with `prefix` (exact, case-sensitive),
    /// ordered by postcode then id, at most `limit` of them.
    fn find_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<Postcode>, StoreError>;

    /// Visit every stored record once.
    fn scan(&self, visit: &mut dyn FnMut(Postcode)) -> Result<(), StoreError>;

    /// Visit every record that may lie within `radius_miles` of `origin`.
    ///
    /// Returning extra records is fine, the caller filters by exact distance.
    /// Without a spatial index this is the full scan.
    fn candidates_within(
        &self,
        _origin: Coordinates,
        _radius_miles: f64,
        visit: &mut dyn FnMut(Postcode)
    ) -> Result<(), StoreError> {
        self.scan(visit)
    }

    /// Remove every record, ahead of a wholesale reload.
    fn clear(&self) -> Result<(), StoreError>;
}

use diesel::pg::PgRowByRowLoadingMode;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};

use crate::data::models::{NewPostcode, Postcode};
use crate::data::repo::{PostcodeStore, StoreError};
use crate::db::Pool;

type Connection = PooledConnection<ConnectionManager<PgConnection>>;

#[derive(Clone)]
pub struct PgStore {
    pool: Pool
}

impl PgStore {
    pub fn new(pool: Pool) -> Self {
        PgStore { pool }
    }

    fn conn(&self) -> Result<Connection, StoreError> {
        Ok(self.pool.get()?)
    }
}

impl PostcodeStore for PgStore {
    fn insert(&self, record: &NewPostcode<'_>) -> Result<i32, StoreError> {
        use crate::data::schema::postcodes::dsl::*;

        let mut conn = self.conn()?;
        let new_id = diesel::insert_into(postcodes)
            .values(record)
            .returning(id)
            .get_result::<i32>(&mut conn)?;

        Ok(new_id)
    }

    fn find_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<Postcode>, StoreError> {
        use crate::data::schema::postcodes::dsl::*;

        let mut conn = self.conn()?;
        let pattern = format!("{}%", escape_like(prefix));
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        // The column uses the "C" collation, so this is byte order
        let rows = postcodes
            .filter(postcode.like(pattern).escape('\\'))
            .order((postcode.asc(), id.asc()))
            .limit(limit)
            .select(Postcode::as_select())
            .load(&mut conn)?;

        Ok(rows)
    }

    fn scan(&self, visit: &mut dyn FnMut(Postcode)) -> Result<(), StoreError> {
        use crate::data::schema::postcodes::dsl::*;

        let mut conn = self.conn()?;
        let rows = postcodes
            .select(Postcode::as_select())
            .load_iter::<Postcode, PgRowByRowLoadingMode>(&mut conn)?;

        for row in rows {
            visit(row?);
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        diesel::sql_query("TRUNCATE postcodes RESTART IDENTITY").execute(&mut conn)?;
        Ok(())
    }
}

/// Escape `LIKE` wildcards so that `prefix` is matched literally.
fn escape_like(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

use diesel::pg::PgConnection;
use diesel::r2d2::ConnectionManager;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::info;

pub type Pool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

pub fn init_connection_pool(database_url: &str, pool_size: u32) -> Result<Pool, r2d2::Error> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    r2d2::Pool::builder()
        .max_size(pool_size)
        .build(manager)
}

pub fn run_migrations(
    conn: &mut PgConnection
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    for migration in applied {
        info!("Applied migration {}", migration);
    }
    Ok(())
}

#[cfg(test)]
pub fn init_test_connection_pool() -> Pool {
    dotenv::dotenv().ok();

    let database_url = std::env::var("TEST_DATABASE_URL")
        .expect("TEST_DATABASE_URL must be set");

    init_connection_pool(&database_url, 2)
        .expect("Failed to create test db pool")
}

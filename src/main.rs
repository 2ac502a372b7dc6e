use std::io;
use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::{error, info};

use postcode_service::api;
use postcode_service::config::Settings;
use postcode_service::data::repo::PgStore;
use postcode_service::db::{init_connection_pool, run_migrations};
use postcode_service::init_logging;
use postcode_service::query::QueryEngine;

#[actix_rt::main]
async fn main() -> io::Result<()> {
    init_logging();

    let settings = Settings::from_env().map_err(|err| {
        error!("Invalid configuration: {}", err);
        io::Error::other(err.to_string())
    })?;

    let pool = init_connection_pool(&settings.database_url, settings.pool_size)
        .map_err(|err| {
            error!("Failed to create db pool: {}", err);
            io::Error::other(err.to_string())
        })?;

    let migration_pool = pool.clone();
    web::block(move || -> Result<(), String> {
        let mut conn = migration_pool.get().map_err(|err| err.to_string())?;
        run_migrations(&mut conn).map_err(|err| err.to_string())
    })
    .await
    .map_err(|err| io::Error::other(err.to_string()))?
    .map_err(|err| {
        error!("Error while running migrations: {}", err);
        io::Error::other(err)
    })?;

    let engine = web::Data::new(QueryEngine::new(Arc::new(PgStore::new(pool))));

    info!("Listening on {}", settings.bind_address);
    HttpServer::new(move || {
        App::new()
            .app_data(engine.clone())
            .wrap(Logger::default())
            .configure(api::configure)
    })
    .bind(&settings.bind_address)?
    .run()
    .await
}

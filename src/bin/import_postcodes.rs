use std::fmt::Formatter;
use std::path::PathBuf;

use actix_web::web;
use indicatif::{ProgressBar, ProgressStyle};
use tempfile::NamedTempFile;

use postcode_service::config::{ConfigError, Settings};
use postcode_service::data::import::source::{download, ImportSource};
use postcode_service::data::import::{ImportError, ImportInput, ImportSummary, Importer};
use postcode_service::data::repo::PgStore;
use postcode_service::db::{init_connection_pool, run_migrations};
use postcode_service::init_logging;

#[derive(Debug)]
enum Failure {
    Config(ConfigError),
    Database(String),
    Import(ImportError),
    /// The blocking worker went away
    Aborted(String)
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Failure::Config(inner) => write!(f, "Invalid configuration: {}", inner),
            Failure::Database(inner) => write!(f, "Database unavailable: {}", inner),
            Failure::Import(inner) => write!(f, "{}", inner),
            Failure::Aborted(inner) => write!(f, "Import aborted: {}", inner)
        }
    }
}

impl From<ConfigError> for Failure {
    fn from(error: ConfigError) -> Self {
        Failure::Config(error)
    }
}

impl From<ImportError> for Failure {
    fn from(error: ImportError) -> Self {
        Failure::Import(error)
    }
}

/// The CSV's container, held for the whole import.
enum Prepared {
    /// Removed from disk when dropped
    Archive(NamedTempFile),
    Local(PathBuf)
}

#[actix_rt::main]
async fn main() {
    init_logging();

    let code = match run().await {
        Ok(summary) => {
            println!("{}", summary);
            0
        },
        Err(err) => {
            eprintln!("Error: {}", err);
            1
        }
    };
    std::process::exit(code);
}

async fn run() -> Result<ImportSummary, Failure> {
    let settings = Settings::from_env()?;
    let pool = init_connection_pool(&settings.database_url, settings.pool_size)
        .map_err(|err| Failure::Database(err.to_string()))?;
    let import = settings.import;

    let prepared = match import.source.clone() {
        ImportSource::Url(url) => Prepared::Archive(download(&url, import.download_timeout).await?),
        ImportSource::File(path) => Prepared::Local(path)
    };

    web::block(move || -> Result<ImportSummary, Failure> {
        let mut conn = pool.get().map_err(|err| Failure::Database(err.to_string()))?;
        run_migrations(&mut conn).map_err(|err| Failure::Database(err.to_string()))?;
        drop(conn);

        let store = PgStore::new(pool);
        let input = match &prepared {
            Prepared::Archive(file) => ImportInput::Archive(file.path()),
            Prepared::Local(path) => ImportInput::File(path)
        };

        let summary = Importer::new(&store)
            .with_layout(import.layout)
            .with_progress(progress_bar())
            .replacing(import.truncate)
            .import_from(&input, &import.csv_entry)?;
        Ok(summary)
    })
    .await
    .map_err(|err| Failure::Aborted(err.to_string()))?
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {bytes}/{total_bytes} ({eta})") {
        bar.set_style(style);
    }
    bar
}

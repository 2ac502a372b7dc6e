use std::fmt::Formatter;
use std::fs::File;
use std::io::Read;

use csv::StringRecord;
use indicatif::ProgressBar;
use log::{error, info, warn};
use regex::Regex;

use crate::data::models::NewPostcode;
use crate::data::repo::{PostcodeStore, StoreError};

pub mod error;
pub mod record;
pub mod source;

pub use error::ImportError;
pub use record::{parse_row, ColumnLayout, ParsedRow, RawRow};
pub use source::ImportInput;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    /// Rows rejected by validation or by the CSV reader
    pub skipped: usize,
    /// Valid rows the store refused
    pub failed: usize
}

impl std::fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Imported {} postcodes", self.imported)?;
        if self.skipped > 0 || self.failed > 0 {
            write!(f, "\n{} rows skipped, {} inserts failed", self.skipped, self.failed)?;
        }
        Ok(())
    }
}

/// Receives per-row diagnostics. The defaults write them to the log.
pub trait ImportObserver {
    fn skipped(&mut self, row: &RawRow<'_>) {
        warn!(
            "Skipped postcode: {}, latitude: {}, longitude: {}",
            row.postcode, row.latitude, row.longitude
        );
    }

    fn malformed(&mut self, error: &csv::Error) {
        warn!("Skipped malformed row: {}", error);
    }

    fn failed(&mut self, record: &NewPostcode<'_>, error: &StoreError) {
        error!("Error saving postcode {}: {}", record.postcode, error);
    }
}

pub struct LogObserver;

impl ImportObserver for LogObserver {}

pub struct Importer<'s> {
    store: &'s dyn PostcodeStore,
    layout: ColumnLayout,
    progress: ProgressBar,
    replace: bool
}

impl<'s> Importer<'s> {
    pub fn new(store: &'s dyn PostcodeStore) -> Self {
        Importer {
            store,
            layout: ColumnLayout::default(),
            progress: ProgressBar::hidden(),
            replace: false
        }
    }

    pub fn with_layout(mut self, layout: ColumnLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Advance `progress` by the number of bytes read from the source.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Clear the store before the first row is read.
    pub fn replacing(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    /// Locate the CSV in `input` and import it.
    ///
    /// The store is only cleared once the CSV has been opened, so a missing
    /// file or a corrupt archive leaves existing rows in place.
    pub fn import_from(&self, input: &ImportInput<'_>, pattern: &Regex) -> Result<ImportSummary, ImportError> {
        let consume = |reader: &mut dyn Read, size: u64| {
            self.progress.set_length(size);
            self.import(reader)
        };

        match input {
            ImportInput::Archive(path) => {
                let archive = File::open(path).map_err(ImportError::Open)?;
                source::with_csv_entry(archive, pattern, consume)
            },
            ImportInput::File(path) => source::with_local_csv(path, pattern, consume)
        }
    }

    pub fn import<R: Read>(&self, reader: R) -> Result<ImportSummary, ImportError> {
        self.import_observed(reader, &mut LogObserver)
    }

    pub fn import_observed<R, O>(
        &self,
        reader: R,
        observer: &mut O
    ) -> Result<ImportSummary, ImportError>
    where
        R: Read,
        O: ImportObserver + ?Sized,
    {
        if self.replace {
            info!("Clearing existing postcodes");
            self.store.clear()?;
        }

        info!("Updating database records...");
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quote(b'"')
            .from_reader(self.progress.wrap_read(reader));

        let mut record = StringRecord::new();
        let mut summary = ImportSummary::default();
        loop {
            match reader.read_record(&mut record) {
                Ok(true) => {},
                Ok(false) => break,
                Err(err) if !err.is_io_error() => {
                    summary.skipped += 1;
                    observer.malformed(&err);
                    continue;
                },
                Err(err) => {
                    self.progress.abandon();
                    return Err(err.into());
                }
            }

            match parse_row(&record, self.layout) {
                ParsedRow::Valid(new_postcode) => {
                    match self.store.insert(&new_postcode) {
                        Ok(_) => summary.imported += 1,
                        Err(err) => {
                            summary.failed += 1;
                            observer.failed(&new_postcode, &err);
                        }
                    }
                },
                ParsedRow::Invalid(raw) => {
                    summary.skipped += 1;
                    observer.skipped(&raw);
                }
            }
        }
        self.progress.finish();

        info!(
            "Done: {} imported, {} skipped, {} failed",
            summary.imported, summary.skipped, summary.failed
        );
        Ok(summary)
    }
}

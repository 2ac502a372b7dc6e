use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use log::info;
use regex::Regex;
use tempfile::NamedTempFile;
use zip::ZipArchive;

use crate::data::import::ImportError;

pub const DEFAULT_POSTCODES_URL: &str = "https://parlvid.mysociety.org/os/ONSPD/2022-11.zip";
pub const DEFAULT_CSV_ENTRY: &str = r"^Data/ONSPD_.*_UK\.csv$";

const USER_AGENT: &str = concat!("postcode-service/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSource {
    Url(String),
    /// A local CSV, or a zip archive when the extension is `.zip`
    File(PathBuf)
}

/// A source that is ready to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportInput<'a> {
    /// A downloaded zip archive
    Archive(&'a Path),
    /// Read like [`ImportSource::File`]
    File(&'a Path)
}

pub async fn download(url: &str, timeout: Duration) -> Result<NamedTempFile, ImportError> {
    info!("Downloading postcodes from {}", url);
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?;

    let response = client
        .get(url)
        .send()
        .await?
        .error_for_status()?;

    let mut file = NamedTempFile::new()
        .map_err(|err| ImportError::Download(Box::new(err)))?;
    let mut stream = response.bytes_stream();
    let mut size = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)
            .map_err(|err| ImportError::Download(Box::new(err)))?;
        size += chunk.len();
    }
    file.flush()
        .map_err(|err| ImportError::Download(Box::new(err)))?;

    info!("Downloaded zip, size: {} MB", size / 1_000_000);
    Ok(file)
}

/// Hand the first archive entry whose name matches `pattern` to `consume`,
/// along with its uncompressed size.
pub fn with_csv_entry<R, T, F>(archive: R, pattern: &Regex, consume: F) -> Result<T, ImportError>
where
    R: Read + Seek,
    F: FnOnce(&mut dyn Read, u64) -> Result<T, ImportError>,
{
    let mut zip = ZipArchive::new(archive)?;
    info!("Searching for csv file");

    for i in 0..zip.len() {
        let mut file = zip.by_index(i)?;
        if pattern.is_match(file.name()) {
            info!("Found csv file {}", file.name());
            let size = file.size();
            return consume(&mut file, size);
        }
    }

    Err(ImportError::EntryNotFound(pattern.as_str().to_owned()))
}

/// Open a local source and hand the CSV stream to `consume`.
pub fn with_local_csv<T, F>(path: &Path, pattern: &Regex, consume: F) -> Result<T, ImportError>
where
    F: FnOnce(&mut dyn Read, u64) -> Result<T, ImportError>,
{
    let mut file = File::open(path).map_err(ImportError::Open)?;
    if is_zip(path) {
        return with_csv_entry(file, pattern, consume);
    }

    let size = file.metadata().map(|meta| meta.len()).unwrap_or(0);
    consume(&mut file, size)
}

fn is_zip(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("zip"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use zip::write::FileOptions;
    use zip::ZipWriter;

    use super::*;

    fn entry_pattern() -> Regex {
        Regex::new(DEFAULT_CSV_ENTRY).unwrap()
    }

    fn build_archive(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, contents) in entries {
            writer.start_file(*name, FileOptions::default()).unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn read_all(reader: &mut dyn Read, size: u64) -> Result<(String, u64), ImportError> {
        let mut contents = String::new();
        reader.read_to_string(&mut contents).unwrap();
        Ok((contents, size))
    }

    #[test]
    fn test_finds_matching_entry() {
        let archive = build_archive(&[
            ("Documents/readme.txt", "not this one"),
            ("Data/multi_csv/ONSPD_NOV_2022_UK_AB.csv", "nor this"),
            ("Data/ONSPD_NOV_2022_UK.csv", "AB1 2CD,51.5,-0.1\n"),
        ]);

        let (contents, size) = with_csv_entry(Cursor::new(archive), &entry_pattern(), read_all).unwrap();
        assert_eq!(contents, "AB1 2CD,51.5,-0.1\n");
        assert_eq!(size, contents.len() as u64);
    }

    #[test]
    fn test_missing_entry() {
        let archive = build_archive(&[("Documents/readme.txt", "nothing here")]);
        let result = with_csv_entry(Cursor::new(archive), &entry_pattern(), read_all);
        assert!(matches!(result, Err(ImportError::EntryNotFound(_))));
    }

    #[test]
    fn test_not_an_archive() {
        let result = with_csv_entry(Cursor::new(b"AB1 2CD,51.5,-0.1".to_vec()), &entry_pattern(), read_all);
        assert!(matches!(result, Err(ImportError::Archive(_))));
    }

    #[test]
    fn test_local_csv() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"AB1 2CD,51.5,-0.1\n").unwrap();

        let (contents, _) = with_local_csv(file.path(), &entry_pattern(), read_all).unwrap();
        assert_eq!(contents, "AB1 2CD,51.5,-0.1\n");
    }

    #[test]
    fn test_local_zip() {
        let mut file = tempfile::Builder::new().suffix(".zip").tempfile().unwrap();
        file.write_all(&build_archive(&[("Data/ONSPD_FEB_2024_UK.csv", "XY9 9ZZ,50,-1\n")])).unwrap();

        let (contents, _) = with_local_csv(file.path(), &entry_pattern(), read_all).unwrap();
        assert_eq!(contents, "XY9 9ZZ,50,-1\n");
    }

    #[test]
    fn test_missing_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = with_local_csv(&dir.path().join("missing.csv"), &entry_pattern(), read_all);
        assert!(matches!(result, Err(ImportError::Open(_))));
    }
}

use csv::StringRecord;
use lazy_static::lazy_static;
use regex::Regex;

use crate::data::models::NewPostcode;

lazy_static! {
    static ref NUMERIC: Regex =
        Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$")
            .expect("Could not create regex");
}

/// Where the fields of interest sit in a source row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub postcode: usize,
    pub latitude: usize,
    pub longitude: usize
}

impl ColumnLayout {
    /// ONS Postcode Directory: `pcd` first, `lat` and `long` at 42 and 43.
    pub const ONSPD: ColumnLayout = ColumnLayout { postcode: 0, latitude: 42, longitude: 43 };
}

impl Default for ColumnLayout {
    fn default() -> Self {
        ColumnLayout::ONSPD
    }
}

/// The raw fields of a rejected row, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRow<'r> {
    pub postcode: &'r str,
    pub latitude: &'r str,
    pub longitude: &'r str
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedRow<'r> {
    Valid(NewPostcode<'r>),
    Invalid(RawRow<'r>)
}

/// Validate one source row. Missing fields read as empty.
///
/// Coordinates only have to be numeric; out of range values pass through.
pub fn parse_row(record: &StringRecord, layout: ColumnLayout) -> ParsedRow<'_> {
    let raw = RawRow {
        postcode: field(record, layout.postcode),
        latitude: field(record, layout.latitude),
        longitude: field(record, layout.longitude)
    };

    match (parse_numeric(raw.latitude), parse_numeric(raw.longitude)) {
        (Some(latitude), Some(longitude)) => ParsedRow::Valid(NewPostcode {
            postcode: raw.postcode,
            latitude,
            longitude
        }),
        _ => ParsedRow::Invalid(raw)
    }
}

fn field(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or("")
}

/// Decimal or integer, optionally signed, optional exponent. Surrounding
/// whitespace is ignored; anything that overflows to infinity is rejected.
pub fn parse_numeric(value: &str) -> Option<f64> {
    let value = value.trim();
    if !NUMERIC.is_match(value) {
        return None;
    }
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

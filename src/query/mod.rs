use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

use crate::data::import::record::parse_numeric;
use crate::data::models::{Coordinates, Postcode};
use crate::data::repo::PostcodeStore;
use crate::geo::distance;

pub mod error;

pub use error::QueryError;

pub const DEFAULT_LIMIT: usize = 10;
pub const DEFAULT_DISTANCE_MILES: f64 = 1.0;
/// Larger requested limits are clamped to this.
pub const MAX_LIMIT: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixQuery {
    pub partial: String,
    pub limit: usize
}

impl PrefixQuery {
    pub fn new(partial: impl Into<String>) -> Self {
        PrefixQuery { partial: partial.into(), limit: DEFAULT_LIMIT }
    }

    pub fn parse(partial: &str, limit: Option<&str>) -> Result<Self, QueryError> {
        Ok(PrefixQuery {
            partial: partial.to_owned(),
            limit: parse_limit(limit)?
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub origin: Coordinates,
    /// Exclusive upper bound, in miles
    pub distance: f64,
    pub limit: usize
}

impl NearbyQuery {
    pub fn new(origin: Coordinates) -> Self {
        NearbyQuery { origin, distance: DEFAULT_DISTANCE_MILES, limit: DEFAULT_LIMIT }
    }

    pub fn parse(
        latitude: &str,
        longitude: &str,
        distance: Option<&str>,
        limit: Option<&str>
    ) -> Result<Self, QueryError> {
        let latitude = parse_number("latitude", latitude)?;
        let longitude = parse_number("longitude", longitude)?;
        let distance = match non_empty(distance) {
            Some(raw) => parse_number("distance", raw)?,
            None => DEFAULT_DISTANCE_MILES
        };

        Ok(NearbyQuery {
            origin: Coordinates::new(latitude, longitude),
            distance,
            limit: parse_limit(limit)?
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Nearby {
    pub postcode: Postcode,
    pub distance: f64
}

#[derive(Clone)]
pub struct QueryEngine {
    store: Arc<dyn PostcodeStore>
}

impl QueryEngine {
    pub fn new(store: Arc<dyn PostcodeStore>) -> Self {
        QueryEngine { store }
    }

    /// Postcodes starting with `query.partial`, in byte order.
    pub fn search(&self, query: &PrefixQuery) -> Result<Vec<Postcode>, QueryError> {
        let limit = query.limit.min(MAX_LIMIT);
        if limit == 0 {
            return Ok(Vec::new());
        }
        Ok(self.store.find_by_prefix(&query.partial, limit)?)
    }

    /// Postcodes strictly closer than `query.distance`, nearest first.
    pub fn nearby(&self, query: &NearbyQuery) -> Result<Vec<Nearby>, QueryError> {
        let limit = query.limit.min(MAX_LIMIT);
        if limit == 0 {
            return Ok(Vec::new());
        }

        // Max-heap holding the `limit` closest so far
        let mut closest: BinaryHeap<Ranked> = BinaryHeap::with_capacity(limit + 1);
        self.store.candidates_within(query.origin, query.distance, &mut |postcode| {
            let miles = distance(query.origin, postcode.coordinates());
            if !(miles < query.distance) {
                return;
            }
            if closest.len() == limit {
                match closest.peek() {
                    Some(worst) if miles > worst.0.distance => return,
                    _ => {}
                }
            }
            closest.push(Ranked(Nearby { postcode, distance: miles }));
            if closest.len() > limit {
                closest.pop();
            }
        })?;

        Ok(closest.into_sorted_vec().into_iter().map(|ranked| ranked.0).collect())
    }
}

/// Orders by distance, then postcode, then id.
struct Ranked(Nearby);

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.distance
            .total_cmp(&other.0.distance)
            .then_with(|| self.0.postcode.postcode.cmp(&other.0.postcode.postcode))
            .then_with(|| self.0.postcode.id.cmp(&other.0.postcode.id))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|raw| !raw.trim().is_empty())
}

fn invalid(name: &'static str, value: &str) -> QueryError {
    QueryError::InvalidArgument { name, value: value.to_owned() }
}

fn parse_number(name: &'static str, value: &str) -> Result<f64, QueryError> {
    parse_numeric(value).ok_or_else(|| invalid(name, value))
}

fn parse_limit(value: Option<&str>) -> Result<usize, QueryError> {
    let raw = match non_empty(value) {
        Some(raw) => raw,
        None => return Ok(DEFAULT_LIMIT)
    };

    let digits = raw.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("limit", raw));
    }
    // All digits, so a parse failure can only be overflow
    Ok(digits.parse::<usize>().map(|limit| limit.min(MAX_LIMIT)).unwrap_or(MAX_LIMIT))
}

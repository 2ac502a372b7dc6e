use diesel::prelude::*;

use crate::data::schema::postcodes;

#[derive(Queryable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = postcodes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Postcode {
    pub id: i32,
    pub postcode: String,
    pub latitude: f64,
    pub longitude: f64
}

impl Postcode {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

#[derive(Insertable, Debug, Clone, Copy, PartialEq)]
#[diesel(table_name = postcodes)]
pub struct NewPostcode<'a> {
    pub postcode: &'a str,
    pub latitude: f64,
    pub longitude: f64
}

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinates { latitude, longitude }
    }
}

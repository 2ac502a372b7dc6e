use serde::Serialize;

use crate::data::models::Postcode;
use crate::query::Nearby;

pub const POSTCODE_TYPE: &str = "postcode";

/// `{ "data": [...] }` envelope around a list of resources.
#[derive(Debug, Serialize)]
pub struct Document {
    pub data: Vec<PostcodeResource>
}

#[derive(Debug, Serialize, PartialEq)]
pub struct PostcodeResource {
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// The postcode itself, never the surrogate key
    pub id: String,
    pub attributes: PostcodeAttributes
}

#[derive(Debug, Serialize, PartialEq)]
pub struct PostcodeAttributes {
    pub latitude: f64,
    pub longitude: f64
}

impl From<Postcode> for PostcodeResource {
    fn from(postcode: Postcode) -> Self {
        PostcodeResource {
            kind: POSTCODE_TYPE,
            attributes: PostcodeAttributes {
                latitude: postcode.latitude,
                longitude: postcode.longitude
            },
            id: postcode.postcode
        }
    }
}

impl From<Nearby> for PostcodeResource {
    fn from(nearby: Nearby) -> Self {
        nearby.postcode.into()
    }
}

impl<T: Into<PostcodeResource>> FromIterator<T> for Document {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Document { data: iter.into_iter().map(Into::into).collect() }
    }
}

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::resource::Document;
use crate::query::{NearbyQuery, PrefixQuery, QueryEngine};

/// Raw strings, so that bad numbers surface as our own errors.
#[derive(Deserialize)]
pub struct SearchRequest {
    partial: Option<String>,
    limit: Option<String>
}

#[derive(Deserialize)]
pub struct NearbyRequest {
    distance: Option<String>,
    limit: Option<String>
}

/// `GET /postcodes/search/{query}?partial=&limit=`
///
/// `partial` takes precedence over the path segment.
pub async fn search(
    path: web::Path<String>,
    request: web::Query<SearchRequest>,
    engine: web::Data<QueryEngine>
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    let partial = request.partial.unwrap_or_else(|| path.into_inner());
    let query = PrefixQuery::parse(&partial, request.limit.as_deref())?;

    let postcodes = web::block(move || engine.search(&query)).await??;

    Ok(HttpResponse::Ok().json(postcodes.into_iter().collect::<Document>()))
}

/// `GET /postcode/nearby/{latitude}/{longitude}?distance=&limit=`
pub async fn nearby(
    path: web::Path<(String, String)>,
    request: web::Query<NearbyRequest>,
    engine: web::Data<QueryEngine>
) -> Result<HttpResponse, ApiError> {
    let (latitude, longitude) = path.into_inner();
    let query = NearbyQuery::parse(
        &latitude,
        &longitude,
        request.distance.as_deref(),
        request.limit.as_deref()
    )?;

    let postcodes = web::block(move || engine.nearby(&query)).await??;

    Ok(HttpResponse::Ok().json(postcodes.into_iter().collect::<Document>()))
}

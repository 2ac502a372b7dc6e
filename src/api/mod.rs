use actix_web::web;

pub mod error;
pub mod postcodes;
pub mod resource;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/postcodes/search/{query}", web::get().to(postcodes::search))
        .route("/postcode/nearby/{latitude}/{longitude}", web::get().to(postcodes::nearby));
}

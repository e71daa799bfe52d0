use actix_cors::Cors;
use actix_multipart::form::MultipartFormConfig;
use actix_web::error::InternalError;
use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::services::ServiceError;

pub mod main;
pub mod products;

/// JSON error body, `{"detail": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Register every catalog route on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(main::index)
        .service(products::create_product)
        .service(products::list_products)
        .service(products::get_product)
        .service(products::update_product)
        .service(products::delete_product)
        .service(web::resource("/products").to(products::redirect_to_collection));
}

/// CORS policy for browser clients: any origin, method and header, with
/// credentials.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
}

/// Multipart settings: bounded body size, and malformed or incomplete forms
/// answered with 422 and a JSON detail.
pub fn multipart_config(upload_limit: usize) -> MultipartFormConfig {
    MultipartFormConfig::default()
        .total_limit(upload_limit)
        .error_handler(|err, _req| {
            let response =
                HttpResponse::UnprocessableEntity().json(ErrorBody::new(err.to_string()));
            InternalError::from_response(err, response).into()
        })
}

/// Map a service failure onto its HTTP response.
pub fn error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::NotFound => {
            HttpResponse::NotFound().json(ErrorBody::new("Product not found"))
        }
        ServiceError::Validation(message) => {
            HttpResponse::UnprocessableEntity().json(ErrorBody::new(message))
        }
        ServiceError::Internal => HttpResponse::InternalServerError().finish(),
    }
}

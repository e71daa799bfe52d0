use actix_multipart::form::MultipartForm;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, put, web};

use crate::assets::LocalImageStore;
use crate::forms::products::{
    CreateProductForm, CreateProductPayload, UpdateProductForm, UpdateProductPayload,
};
use crate::models::config::CatalogConfig;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::products::{
    create_product as create_product_service, delete_product as delete_product_service,
    get_product as get_product_service, list_products as list_products_service,
    update_product as update_product_service,
};

#[post("/products/")]
pub async fn create_product(
    repo: web::Data<DieselRepository>,
    images: web::Data<LocalImageStore>,
    catalog: web::Data<CatalogConfig>,
    MultipartForm(form): MultipartForm<CreateProductForm>,
) -> impl Responder {
    let payload: CreateProductPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            log::warn!("Rejected product form: {e}");
            return error_response(ServiceError::from(e));
        }
    };

    match create_product_service(payload, repo.get_ref(), images.get_ref(), catalog.get_ref()) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(err),
    }
}

#[get("/products/")]
pub async fn list_products(
    repo: web::Data<DieselRepository>,
    catalog: web::Data<CatalogConfig>,
) -> impl Responder {
    match list_products_service(repo.get_ref(), catalog.get_ref()) {
        Ok(products) => HttpResponse::Ok().json(products),
        Err(err) => error_response(err),
    }
}

#[get("/products/{product_id}")]
pub async fn get_product(
    product_id: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match get_product_service(&product_id, repo.get_ref()) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(err),
    }
}

#[put("/products/{product_id}")]
pub async fn update_product(
    product_id: web::Path<String>,
    repo: web::Data<DieselRepository>,
    images: web::Data<LocalImageStore>,
    catalog: web::Data<CatalogConfig>,
    MultipartForm(form): MultipartForm<UpdateProductForm>,
) -> impl Responder {
    let payload: UpdateProductPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            log::warn!("Rejected product update form: {e}");
            return error_response(ServiceError::from(e));
        }
    };

    match update_product_service(
        &product_id,
        payload,
        repo.get_ref(),
        images.get_ref(),
        catalog.get_ref(),
    ) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(err),
    }
}

#[delete("/products/{product_id}")]
pub async fn delete_product(
    product_id: web::Path<String>,
    repo: web::Data<DieselRepository>,
    images: web::Data<LocalImageStore>,
    catalog: web::Data<CatalogConfig>,
) -> impl Responder {
    match delete_product_service(&product_id, repo.get_ref(), images.get_ref(), catalog.get_ref())
    {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}

/// Sends `/products` to `/products/`, keeping method and query string.
pub async fn redirect_to_collection(req: HttpRequest) -> HttpResponse {
    let location = match req.query_string() {
        "" => "/products/".to_string(),
        query => format!("/products/?{query}"),
    };
    HttpResponse::TemporaryRedirect()
        .insert_header((header::LOCATION, location))
        .finish()
}

use actix_web::{HttpResponse, Responder, get};

use crate::services::main::liveness;

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(liveness())
}

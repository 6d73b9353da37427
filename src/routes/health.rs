use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;

use crate::routes::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    storage: &'static str,
    version: &'static str,
}

pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok",
        storage: state.store.backend(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

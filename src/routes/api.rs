use actix_web::{HttpResponse, Responder, get, web};

use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::shop::{self, ProductsApiQuery};

/// Return a JSON list of available products, optionally limited to one category.
///
/// An unknown `category` slug yields `404 Not Found`.
#[get("/api/v1/products")]
pub async fn api_v1_products(
    params: web::Query<ProductsApiQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match shop::load_products_api(repo.get_ref(), params.into_inner()) {
        Ok(products) => HttpResponse::Ok().json(products),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to list products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

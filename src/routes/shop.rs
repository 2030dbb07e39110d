use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, render_not_found, render_template};
use crate::services::{ServiceError, shop};

#[get("/")]
pub async fn show_products(
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match shop::load_products_page(repo.get_ref()) {
        Ok(data) => {
            let mut context = base_context(repo.get_ref(), &flash_messages, "products");
            context.insert("products", &data.products);
            render_template(&tera, "shop/products.html", &context)
        }
        Err(err) => {
            log::error!("Failed to list products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/products/{slug}")]
pub async fn show_product(
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let slug = path.into_inner();
    let mut context = base_context(repo.get_ref(), &flash_messages, "product");

    match shop::load_product_detail(repo.get_ref(), &slug, server_config.slug_policy) {
        Ok(data) => {
            context.insert("product", &data.product);
            render_template(&tera, "shop/product_detail.html", &context)
        }
        Err(ServiceError::NotFound) => render_not_found(&tera, &context),
        Err(err) => {
            log::error!("Failed to load product `{slug}`: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/categories/{slug}")]
pub async fn show_category(
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let slug = path.into_inner();
    let mut context = base_context(repo.get_ref(), &flash_messages, "category");

    match shop::load_category_page(repo.get_ref(), &slug) {
        Ok(data) => {
            context.insert("category", &data.category);
            context.insert("category_path", &data.path);
            context.insert("products", &data.products);
            render_template(&tera, "shop/category_list.html", &context)
        }
        Err(ServiceError::NotFound) => render_not_found(&tera, &context),
        Err(err) => {
            log::error!("Failed to load category `{slug}`: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Fallback handler for unmatched routes.
pub async fn not_found(
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> HttpResponse {
    let context = base_context(repo.get_ref(), &flash_messages, "not_found");
    render_not_found(&tera, &context)
}

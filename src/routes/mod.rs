//! HTTP handlers and the helpers they share.

use actix_web::http::header;
use actix_web::{HttpResponse, web};
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use serde::Serialize;
use tera::{Context, Tera};

use crate::repository::CategoryReader;
use crate::services::shop::load_navigation;

pub mod api;
pub mod categories;
pub mod products;
pub mod shop;

/// Flash message prepared for the templates.
#[derive(Debug, Serialize)]
struct Alert<'a> {
    level: &'static str,
    message: &'a str,
}

fn alert_level(level: Level) -> &'static str {
    match level {
        Level::Debug => "secondary",
        Level::Info => "info",
        Level::Success => "success",
        Level::Warning => "warning",
        Level::Error => "danger",
    }
}

/// Context shared by every page: navigation categories and flash messages.
pub fn base_context<R>(
    repo: &R,
    flash_messages: &IncomingFlashMessages,
    current_page: &str,
) -> Context
where
    R: CategoryReader + ?Sized,
{
    let mut context = Context::new();

    let categories = load_navigation(repo).unwrap_or_else(|err| {
        log::error!("Failed to load navigation categories: {err}");
        Vec::new()
    });

    let alerts: Vec<Alert> = flash_messages
        .iter()
        .map(|message| Alert {
            level: alert_level(message.level()),
            message: message.content(),
        })
        .collect();

    context.insert("categories", &categories);
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context
}

/// Render `template` or answer with 500 when rendering fails.
pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Render the 404 page.
pub fn render_not_found(tera: &Tera, context: &Context) -> HttpResponse {
    let mut response = render_template(tera, "shop/not_found.html", context);
    if response.status().is_success() {
        *response.status_mut() = actix_web::http::StatusCode::NOT_FOUND;
    }
    response
}

/// `303 See Other` pointing at `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Register the administrative pages.
pub fn configure_admin(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(categories::show_categories)
            .service(categories::add_category)
            .service(categories::edit_category)
            .service(categories::delete_category)
            .service(products::show_products)
            .service(products::add_product)
            .service(products::edit_product)
            .service(products::delete_product),
    );
}

use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::products::{AddProductForm, EditProductForm};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::products::{create_product, load_products, modify_product, remove_product};

const PRODUCTS_PAGE: &str = "/admin/products";

#[get("/products")]
pub async fn show_products(
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_products(repo.get_ref()) {
        Ok(data) => {
            let mut context = base_context(repo.get_ref(), &flash_messages, "admin_products");
            context.insert("product_rows", &data.products);
            context.insert("category_rows", &data.categories);
            render_template(&tera, "admin/products.html", &context)
        }
        Err(err) => {
            log::error!("Failed to list products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/products/add")]
pub async fn add_product(
    repo: web::Data<DieselRepository>,
    form: web::Form<AddProductForm>,
) -> impl Responder {
    match create_product(repo.get_ref(), form.into_inner()) {
        Ok(product) => {
            FlashMessage::success(format!("Товар «{}» добавлен.", product.title)).send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Категория не найдена.").send();
        }
        Err(err) => {
            log::error!("Failed to create product: {err}");
            FlashMessage::error("Не удалось добавить товар.").send();
        }
    }
    redirect(PRODUCTS_PAGE)
}

#[post("/products/edit")]
pub async fn edit_product(
    repo: web::Data<DieselRepository>,
    form: web::Form<EditProductForm>,
) -> impl Responder {
    match modify_product(repo.get_ref(), form.into_inner()) {
        Ok(product) => {
            FlashMessage::success(format!("Товар «{}» изменён.", product.title)).send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Товар или категория не найдены.").send();
        }
        Err(err) => {
            log::error!("Failed to change product: {err}");
            FlashMessage::error("Не удалось изменить товар.").send();
        }
    }
    redirect(PRODUCTS_PAGE)
}

#[post("/products/{product_id}/delete")]
pub async fn delete_product(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let product_id = path.into_inner();

    match remove_product(repo.get_ref(), product_id) {
        Ok(()) => {
            FlashMessage::success("Товар удалён.").send();
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Товар не найден или уже удалён.").send();
        }
        Err(err) => {
            log::error!("Failed to delete product {product_id}: {err}");
            FlashMessage::error("Не удалось удалить товар.").send();
        }
    }
    redirect(PRODUCTS_PAGE)
}

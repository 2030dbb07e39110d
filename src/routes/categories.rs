use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::categories::{AddCategoryForm, EditCategoryForm};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::categories::{
    create_category, load_categories, modify_category, remove_category,
};

const CATEGORIES_PAGE: &str = "/admin/categories";

#[get("/categories")]
pub async fn show_categories(
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_categories(repo.get_ref()) {
        Ok(data) => {
            let mut context = base_context(repo.get_ref(), &flash_messages, "admin_categories");
            context.insert("category_rows", &data.categories);
            render_template(&tera, "admin/categories.html", &context)
        }
        Err(err) => {
            log::error!("Failed to list categories: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/categories/add")]
pub async fn add_category(
    repo: web::Data<DieselRepository>,
    form: web::Form<AddCategoryForm>,
) -> impl Responder {
    match create_category(repo.get_ref(), form.into_inner()) {
        Ok(category) => {
            FlashMessage::success(format!("Категория «{}» добавлена.", category.name)).send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Родительская категория не найдена.").send();
        }
        Err(ServiceError::Conflict(message)) => {
            log::info!("Rejected category: {message}");
            FlashMessage::error("Категория с таким названием или URL уже существует.").send();
        }
        Err(err) => {
            log::error!("Failed to create category: {err}");
            FlashMessage::error("Не удалось создать категорию.").send();
        }
    }
    redirect(CATEGORIES_PAGE)
}

#[post("/categories/edit")]
pub async fn edit_category(
    repo: web::Data<DieselRepository>,
    form: web::Form<EditCategoryForm>,
) -> impl Responder {
    match modify_category(repo.get_ref(), form.into_inner()) {
        Ok(category) => {
            FlashMessage::success(format!("Категория «{}» изменена.", category.name)).send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Категория не найдена.").send();
        }
        Err(ServiceError::Conflict(message)) => {
            log::info!("Rejected category change: {message}");
            FlashMessage::error(
                "Изменение нарушает уникальность названия, URL или создаёт цикл.",
            )
            .send();
        }
        Err(err) => {
            log::error!("Failed to change category: {err}");
            FlashMessage::error("Не удалось изменить категорию.").send();
        }
    }
    redirect(CATEGORIES_PAGE)
}

#[post("/categories/{category_id}/delete")]
pub async fn delete_category(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let category_id = path.into_inner();

    match remove_category(repo.get_ref(), category_id) {
        Ok(()) => {
            FlashMessage::success("Категория и все вложенные товары удалены.").send();
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Категория не найдена или уже удалена.").send();
        }
        Err(err) => {
            log::error!("Failed to delete category {category_id}: {err}");
            FlashMessage::error("Не удалось удалить категорию.").send();
        }
    }
    redirect(CATEGORIES_PAGE)
}

use actix_files::Files;
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use dotenvy::dotenv;
use tera::Tera;

use pushkind_shop::config::ServerConfig;
use pushkind_shop::db::establish_connection_pool;
use pushkind_shop::repository::DieselRepository;
use pushkind_shop::routes::api::api_v1_products;
use pushkind_shop::routes::configure_admin;
use pushkind_shop::routes::shop::{not_found, show_category, show_product, show_products};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let server_config = ServerConfig::from_env();

    let secret_key = match server_config.secret.as_deref().map(|key| Key::try_from(key.as_bytes())) {
        Some(Ok(key)) => key,
        Some(Err(e)) => {
            log::warn!("SECRET_KEY is unusable ({e}), falling back to a random key");
            Key::generate()
        }
        None => Key::generate(),
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let message_store = CookieMessageStore::builder(secret_key).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = match Tera::new("templates/**/*") {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    if server_config.admin_enabled {
        log::info!("Admin pages are mounted under /admin");
    }

    let address = server_config.address.clone();
    let port = server_config.port;

    HttpServer::new(move || {
        let admin_enabled = server_config.admin_enabled;

        App::new()
            .wrap(message_framework.clone())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(Files::new("/media", server_config.media_root.clone()))
            .service(api_v1_products)
            .service(show_products)
            .service(show_product)
            .service(show_category)
            .configure(|cfg| {
                if admin_enabled {
                    configure_admin(cfg);
                }
            })
            .default_service(web::to(not_found))
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind((address, port))?
    .run()
    .await
}

use std::io;

use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;
use env_logger::Env;

use store_catalog::assets::LocalImageStore;
use store_catalog::db::{establish_connection_pool, run_migrations};
use store_catalog::models::config::{STATIC_URL, ServerConfig};
use store_catalog::repository::DieselRepository;
use store_catalog::routes;
use store_catalog::services::products::sweep_orphaned_images;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
    let server_config = match ServerConfig::load(&app_env) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration for '{app_env}': {e}");
            return Err(io::Error::other(e));
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            return Err(io::Error::other(e));
        }
    };

    match run_migrations(&pool) {
        Ok(0) => {}
        Ok(applied) => log::info!("Applied {applied} database migrations"),
        Err(e) => {
            log::error!("Failed to run database migrations: {e}");
            return Err(io::Error::other(e));
        }
    }

    let repo = DieselRepository::new(pool);
    let images = LocalImageStore::new(&server_config.static_dir, STATIC_URL);
    if let Err(e) = images.ensure_directory() {
        log::error!(
            "Failed to create image directory {}: {e}",
            images.directory().display()
        );
        return Err(io::Error::other(e));
    }

    if server_config.sweep_orphaned_images {
        match sweep_orphaned_images(&repo, &images) {
            Ok(removed) => log::info!("Removed {removed} orphaned images"),
            Err(e) => log::warn!("Orphaned image sweep failed: {e}"),
        }
    }

    let catalog = server_config.catalog();
    let static_dir = server_config.static_dir.clone();
    let upload_limit = server_config.upload_limit;
    let bind_address = server_config.bind_address();

    log::info!("Starting server at {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .wrap(routes::cors())
            .app_data(routes::multipart_config(upload_limit))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(images.clone()))
            .app_data(web::Data::new(catalog.clone()))
            .service(Files::new(STATIC_URL, &static_dir))
            .configure(routes::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}

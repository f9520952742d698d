use std::path::Path;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpResponse, HttpServer, cookie::Key, middleware, web};

use formcraft::auth::rate_limit::RateLimiter;
use formcraft::config::AppConfig;
use formcraft::generator::GeminiClient;
use formcraft::{db, handlers};

/// Make sure the directory holding a file-backed SQLite database exists.
fn ensure_database_dir(database_url: &str) -> std::io::Result<()> {
    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.starts_with(":memory:") {
        return Ok(());
    }
    match Path::new(path).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir),
        _ => Ok(()),
    }
}

fn session_key(config: &AppConfig) -> Key {
    match config.session_key.as_deref() {
        Some(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Some(val) => {
            log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
            Key::generate()
        }
        None => {
            log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
            Key::generate()
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    let config = AppConfig::from_env();

    ensure_database_dir(&config.database_url)?;
    let pool = db::init_pool(&config.database_url)
        .await
        .map_err(std::io::Error::other)?;
    db::run_migrations(&pool).await.map_err(std::io::Error::other)?;

    if let Some((email, password)) = &config.seed_user {
        db::seed_default_user(&pool, email, password)
            .await
            .map_err(std::io::Error::other)?;
    }

    let text_generator = GeminiClient::from_config(&config).map_err(std::io::Error::other)?;
    if text_generator.is_none() {
        log::warn!("GEMINI_API_KEY not set, form generation is disabled");
    }

    let secret_key = session_key(&config);
    let bind_addr = config.bind_addr.clone();
    let static_dir = config.static_dir.clone();

    let pool = web::Data::new(pool);
    let config = web::Data::new(config);
    let limiter = web::Data::new(RateLimiter::default());
    let text_generator = web::Data::new(text_generator);

    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(false)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(pool.clone())
            .app_data(config.clone())
            .app_data(limiter.clone())
            .app_data(text_generator.clone())
            .configure(handlers::configure::<GeminiClient>)
            // Static frontend (must be registered last)
            .service(
                actix_files::Files::new("/", &static_dir)
                    .index_file("index.html")
                    .default_handler(web::to(|| async {
                        HttpResponse::NotFound().json(serde_json::json!({ "error": "Not found" }))
                    })),
            )
    })
    .bind(bind_addr.as_str())?
    .run()
    .await
}

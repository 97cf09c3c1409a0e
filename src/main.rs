use actix_web::{middleware, web, App, HttpServer};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::env;
use std::str::FromStr;

use salonflow::recommend::Recommender;
use salonflow::routes;
use salonflow::seed;
use salonflow::state::AppState;
use salonflow::store::{sqlite, Stores};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = run().await {
        eprintln!("Startup error: {err}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let stores = build_stores().await?;
    let state = AppState {
        stores,
        recommender: Recommender::from_env(),
    };

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(8080);

    let address = format!("0.0.0.0:{port}");
    log::info!("Starting SalonFlow on http://{address}");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(routes::json_config())
            .wrap(middleware::Logger::default())
            .configure(routes::public::configure)
            .configure(routes::owner::configure)
            .configure(routes::account::configure)
    })
    .bind(address)?
    .run()
    .await?;

    Ok(())
}

async fn build_stores() -> Result<Stores, Box<dyn std::error::Error>> {
    let backend = env::var("STORE_BACKEND").unwrap_or_else(|_| "sqlite".to_string());

    if backend == "memory" {
        log::info!("Using the in-memory store; data is lost on restart");
        let stores = Stores::memory();
        seed::seed_demo(&stores).await?;
        return Ok(stores);
    }

    let db_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://./data/salonflow.db".to_string());
    sqlite::ensure_sqlite_dir(&db_url)?;

    let connect_options = SqliteConnectOptions::from_str(&db_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await?;

    sqlite::run_migrations(&pool).await?;

    let stores = Stores::sqlite(pool);
    if env::var("SEED_DEMO").unwrap_or_default() == "true" {
        seed::seed_demo(&stores).await?;
    }
    Ok(stores)
}

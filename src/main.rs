//! Test case manager server - main entry point.
//!
//! Bootstraps the database, then starts the Actix-web server.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, web};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tcm_lib::api::{self, ApiDoc};
use tcm_lib::config::Config;
use tcm_lib::middleware::RequestLogger;
use tcm_lib::services::{self, MailSender, SmtpMailSender};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Development allows the local web client's origin; production is same-origin only.
fn cors(is_development: bool) -> Cors {
    let base = if is_development {
        Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://127.0.0.1:3000")
    } else {
        Cors::default()
    };

    base.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - DB_USER, DB_PASSWORD, DB_HOST, DB_NAME (or DATABASE_URL)");
            error!("  - MAIL_HOST, MAIL_PORT, MAIL_USERNAME, MAIL_PASSWORD");
            error!("  - INITIAL_USER_NAME, INITIAL_USER_EMAIL");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Test Case Manager Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }

    let mailer: Arc<dyn MailSender> = match SmtpMailSender::new(&config.mail) {
        Ok(sender) => Arc::new(sender),
        Err(e) => {
            error!("Failed to configure mail transport: {}", e);
            std::process::exit(1);
        }
    };

    let (pool, report) = match services::bootstrap(&config, mailer.as_ref()).await {
        Ok(result) => result,
        Err(e) => {
            error!("Startup failed: {}", e);
            if e.is_retryable() {
                error!("The database may come back; restarting later can succeed");
            }
            std::process::exit(e.exit_code());
        }
    };
    info!(
        initial_user = ?report.initial_user,
        statuses_seeded = report.statuses_seeded,
        "Bootstrap complete"
    );

    let bind_address = config.bind_address();
    let is_development = config.is_development();

    let worker_count = if is_development { 4 } else { num_cpus::get() };
    info!(
        "Starting server at http://{} ({} workers, API docs at /swagger-ui/)",
        bind_address, worker_count
    );

    let server = HttpServer::new(move || {
        App::new()
            .wrap(cors(is_development))
            .wrap(RequestLogger)
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::from(mailer.clone()))
            .app_data(api::json_config())
            .service(web::scope("/api/v1").configure(api::configure_routes))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    });

    server
        .workers(worker_count)
        .bind(&bind_address)?
        .run()
        .await
}

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use mentor_match::config::Settings;
use mentor_match::core::{Ranker, ScoringWeights};
use mentor_match::routes::{self, AppState};
use mentor_match::services::{NotificationDispatcher, RetryPolicy, WebhookClient};
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// `format` is `json`, `pretty`, or anything else for plain text
fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match format {
        "pretty" => subscriber.pretty().init(),
        "json" => subscriber.json().init(),
        _ => subscriber.init(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    // LOG_LEVEL / LOG_FORMAT win over the config file
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());
    init_logging(&log_level, &log_format);

    info!("Starting mentor matching service...");

    let weights = ScoringWeights::from(&settings.scoring.weights);
    if let Err(e) = weights.validate() {
        error!("Invalid scoring weights: {}", e);
        return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }

    let ranker = Ranker::new(weights, settings.scoring.timezone).with_parallel(settings.matching.parallel);

    info!(
        "Ranker initialized with weights: {:?}, timezone policy: {:?}",
        weights, settings.scoring.timezone
    );

    let notifier = match settings.notifier.webhook_url.clone() {
        Some(url) => {
            let policy = RetryPolicy {
                max_retries: settings.notifier.max_retries,
                initial_backoff: Duration::from_millis(settings.notifier.backoff_ms),
            };
            match WebhookClient::new(url.clone(), Duration::from_secs(settings.notifier.timeout_secs), policy) {
                Ok(client) => {
                    info!("Notification webhook enabled ({})", url);
                    NotificationDispatcher::spawn(client, settings.notifier.queue_capacity)
                }
                Err(e) => {
                    warn!("Failed to build webhook client ({}), notifications disabled", e);
                    NotificationDispatcher::disabled()
                }
            }
        }
        None => {
            info!("No webhook configured, notifications disabled");
            NotificationDispatcher::disabled()
        }
    };

    let app_state = AppState::in_memory(
        ranker,
        settings.matching.clone(),
        notifier,
        settings.notifier.from_address.clone(),
    );

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(routes::handle_query_payload_error))
            .app_data(web::PayloadConfig::default().limit(4 * 1024 * 1024))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

mod auth;
mod classifier;
mod config;
mod db;
mod error;
mod leaf;
mod routes;
#[cfg(test)]
mod test_support;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use auth::jwt::JwtService;
use auth::middleware::AuthMiddleware;
use classifier::{ClassLabels, Classifier, ClassifierService, InferenceError, Preprocessor};
use config::{AppConfig, ClassifierConfig};
use db::user_repository::UserRepository;
use leaf::LeafHeuristic;
use routes::{configure_routes, UploadLimits};
use std::env;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    }

    let config = AppConfig::from_env().map_err(startup_error)?;
    let classifier_config =
        ClassifierConfig::load(&config.classifier_config).map_err(startup_error)?;
    let labels = ClassLabels::new(classifier_config.class_labels.clone()).map_err(startup_error)?;
    log::info!(
        "Classifier config {}: {} classes, {}px input",
        config.classifier_config.display(),
        labels.len(),
        classifier_config.input_size
    );

    // Loaded once and shared by every worker; a missing model stops startup.
    let model = load_model(&classifier_config).map_err(startup_error)?;
    let classifier =
        ClassifierService::new(model, labels, Preprocessor::from_config(&classifier_config));
    let heuristic = LeafHeuristic::new(classifier_config.leaf.clone());

    let user_repo = UserRepository::connect(&config.database_url)
        .await
        .map_err(startup_error)?;
    let jwt_service = JwtService::with_expiration(&config.jwt_secret, config.jwt_expiration_hours);
    let auth_middleware = AuthMiddleware::new(jwt_service.clone());
    let upload_limits = UploadLimits {
        max_bytes: config.max_upload_bytes,
    };
    let frontend_dir = config.frontend_dir.clone();

    let bind_address = config.bind_address();
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::AUTHORIZATION,
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(web::Data::new(classifier.clone()))
            .app_data(web::Data::new(heuristic.clone()))
            .app_data(web::Data::new(user_repo.clone()))
            .app_data(web::Data::new(jwt_service.clone()))
            .app_data(web::Data::new(upload_limits))
            .configure(|cfg| configure_routes(cfg, frontend_dir.clone(), auth_middleware.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}

fn startup_error(err: impl std::fmt::Display) -> std::io::Error {
    log::error!("Startup failed: {}", err);
    std::io::Error::other(err.to_string())
}

#[cfg(feature = "torch")]
fn load_model(config: &ClassifierConfig) -> Result<Arc<dyn Classifier>, InferenceError> {
    let model = classifier::TorchClassifier::load(&config.model_path)?;
    Ok(Arc::new(model))
}

#[cfg(not(feature = "torch"))]
fn load_model(config: &ClassifierConfig) -> Result<Arc<dyn Classifier>, InferenceError> {
    Err(InferenceError::Model(format!(
        "cannot load {}: built without the `torch` feature",
        config.model_path.display()
    )))
}

use actix_files::Files;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures::TryStreamExt;
use log::{error, info};
use sha2::{Digest, Sha256};
use shared::{
    ClassesResponse, ImageSource, Notice, Page, PageInfo, Prediction, PredictionResponse,
};
use std::path::PathBuf;
use std::str::FromStr;

use crate::auth::middleware::{AuthMiddleware, SessionContext};
use crate::auth::routes as auth_routes;
use crate::classifier::{ClassifierService, InferenceError};
use crate::error::AppError;
use crate::leaf::LeafHeuristic;

#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_bytes: usize,
}

pub fn configure_routes(
    cfg: &mut web::ServiceConfig,
    frontend_dir: PathBuf,
    auth_middleware: AuthMiddleware,
) {
    configure_api(cfg, auth_middleware);
    cfg.service(Files::new("/", frontend_dir).index_file("index.html"));
}

pub fn configure_api(cfg: &mut web::ServiceConfig, auth_middleware: AuthMiddleware) {
    cfg.service(
        web::scope("/api")
            .route("/classes", web::get().to(list_classes))
            .route("/pages", web::get().to(list_pages))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth_routes::register))
                    .route("/login", web::post().to(auth_routes::login))
                    .service(
                        web::resource("/me")
                            .wrap(auth_middleware.clone())
                            .route(web::get().to(auth_routes::me)),
                    ),
            )
            .service(
                web::scope("/diagnosis")
                    .wrap(auth_middleware)
                    .route("/predict", web::post().to(predict)),
            ),
    );
}

async fn list_classes(classifier: web::Data<ClassifierService>) -> HttpResponse {
    HttpResponse::Ok().json(ClassesResponse {
        labels: classifier.labels().infos(),
    })
}

async fn list_pages() -> HttpResponse {
    let pages: Vec<PageInfo> = Page::ALL
        .iter()
        .map(|page| PageInfo {
            page: *page,
            title: page.title().to_string(),
            kind: page.kind(),
        })
        .collect();
    HttpResponse::Ok().json(pages)
}

struct Upload {
    image: Option<Vec<u8>>,
    source: ImageSource,
}

async fn read_upload(mut payload: Multipart, max_bytes: usize) -> Result<Upload, AppError> {
    let mut upload = Upload {
        image: None,
        source: ImageSource::default(),
    };

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AppError::Multipart(e.to_string()))?
    {
        let name = field.name().map(str::to_owned);
        let mut data = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::Multipart(e.to_string()))?
        {
            if data.len() + chunk.len() > max_bytes {
                return Err(AppError::PayloadTooLarge(max_bytes));
            }
            data.extend_from_slice(&chunk);
        }

        match name.as_deref() {
            Some("image") if !data.is_empty() => upload.image = Some(data),
            Some("source") => {
                let raw = String::from_utf8_lossy(&data);
                upload.source = ImageSource::from_str(raw.trim()).unwrap_or_default();
            }
            _ => {}
        }
    }

    Ok(upload)
}

fn image_digest(image: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(image);
    hex::encode(hasher.finalize())
}

const IMPLAUSIBLE_LEAF_WARNING: &str =
    "This image does not look like a maize leaf. The prediction may be unreliable.";

async fn predict(
    session: SessionContext,
    classifier: web::Data<ClassifierService>,
    heuristic: web::Data<LeafHeuristic>,
    limits: web::Data<UploadLimits>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let upload = read_upload(payload, limits.max_bytes).await?;

    let Some(image) = upload.image else {
        info!("Predict without an image from {}", session.username);
        return Ok(HttpResponse::Ok().json(PredictionResponse::missing_image(upload.source)));
    };

    let digest = image_digest(&image);
    let service = classifier.clone();
    let leaf_check = heuristic.clone();
    let (plausible_leaf, outcome) = web::block(move || {
        let decoded = image::load_from_memory(&image);
        let plausible = leaf_check.assess(&decoded);
        let outcome = decoded
            .map_err(InferenceError::from)
            .and_then(|decoded| service.predict(&decoded));
        (plausible, outcome)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?;

    let class_index = match outcome {
        Ok(index) => index,
        Err(InferenceError::Preprocessing(e)) => {
            info!("Rejected undecodable image {} from {}: {}", digest, session.username, e);
            return Ok(HttpResponse::UnprocessableEntity().json(PredictionResponse::failed(
                format!("Could not read the image: {}", e),
            )));
        }
        Err(e) => {
            error!("Inference failed for image {}: {}", digest, e);
            return Err(e.into());
        }
    };

    let class_label = classifier
        .labels()
        .get(class_index)
        .ok_or_else(|| AppError::Internal(format!("class index {} out of range", class_index)))?
        .to_string();
    let display_name = shared::display_name(&class_label);
    info!(
        "Prediction for {} ({}): {} [{}], plausible leaf: {}",
        session.username, digest, class_label, class_index, plausible_leaf
    );

    let mut notices = vec![Notice::success(format!(
        "Model is predicting it's a {}",
        display_name
    ))];
    if !plausible_leaf {
        notices.push(Notice::warning(IMPLAUSIBLE_LEAF_WARNING));
    }

    Ok(HttpResponse::Ok().json(PredictionResponse {
        notices,
        prediction: Some(Prediction {
            class_index,
            class_label,
            display_name,
            plausible_leaf,
        }),
    }))
}

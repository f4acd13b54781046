use gloo_file::File as GlooFile;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use shared::{
    AuthResponse, ErrorResponse, ImageSource, LoginRequest, PredictionResponse, RegisterRequest,
    UserInfo,
};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    Unauthorized(String),
    Server(u16, String),
    Network(String),
    Parse(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized(msg) => write!(f, "{}", msg),
            ApiError::Server(status, msg) if *status < 500 => write!(f, "{}", msg),
            ApiError::Server(status, msg) => write!(f, "Server error: {} - {}", status, msg),
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::Parse(msg) => write!(f, "Failed to parse response: {}", msg),
        }
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

async fn error_message(response: Response) -> String {
    let body = response.text().await.unwrap_or_default();
    serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.error)
        .unwrap_or(body)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if response.ok() {
        return response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()));
    }

    let status = response.status();
    let message = error_message(response).await;
    if status == 401 {
        Err(ApiError::Unauthorized(message))
    } else {
        Err(ApiError::Server(status, message))
    }
}

pub async fn login(request: &LoginRequest) -> Result<AuthResponse, ApiError> {
    let response = Request::post("/api/auth/login")
        .json(request)
        .map_err(|e| ApiError::Parse(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    read_json(response).await
}

pub async fn register(request: &RegisterRequest) -> Result<UserInfo, ApiError> {
    let response = Request::post("/api/auth/register")
        .json(request)
        .map_err(|e| ApiError::Parse(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    read_json(response).await
}

pub async fn fetch_me(token: &str) -> Result<UserInfo, ApiError> {
    let response = Request::get("/api/auth/me")
        .header("Authorization", &bearer(token))
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    read_json(response).await
}

/// Posts the image for diagnosis. A rejected image (422) still carries
/// notices, so it is returned as a normal response.
pub async fn predict(
    token: &str,
    file: &GlooFile,
    source: ImageSource,
) -> Result<PredictionResponse, ApiError> {
    let form_data = web_sys::FormData::new().map_err(|e| ApiError::Parse(format!("{:?}", e)))?;
    form_data
        .append_with_blob_and_filename("image", file.as_ref(), &file.name())
        .map_err(|e| ApiError::Parse(format!("{:?}", e)))?;
    form_data
        .append_with_str("source", source.as_ref())
        .map_err(|e| ApiError::Parse(format!("{:?}", e)))?;

    let response = Request::post("/api/diagnosis/predict")
        .header("Authorization", &bearer(token))
        .body(form_data)
        .map_err(|e| ApiError::Parse(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if response.status() == 422 {
        return response
            .json::<PredictionResponse>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()));
    }
    read_json(response).await
}

mod labels;
mod pages;

pub use labels::display_name;
pub use pages::{ImageSource, Page, PageKind, StaticPage};

use serde::{Deserialize, Serialize};
use strum_macros::Display;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Warning,
    Info,
    Error,
}

/// A text panel shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub class_index: usize,
    pub class_label: String,
    pub display_name: String,
    pub plausible_leaf: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub notices: Vec<Notice>,
    pub prediction: Option<Prediction>,
}

impl PredictionResponse {
    /// Response for a predict action fired without an image.
    pub fn missing_image(source: ImageSource) -> Self {
        Self {
            notices: vec![Notice::warning(source.missing_image_message())],
            prediction: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            notices: vec![Notice::error(message)],
            prediction: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassLabelInfo {
    pub index: usize,
    pub label: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassesResponse {
    pub labels: Vec<ClassLabelInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: Page,
    pub title: String,
    pub kind: PageKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_image_response_is_a_single_warning() {
        let response = PredictionResponse::missing_image(ImageSource::Camera);
        assert!(response.prediction.is_none());
        assert_eq!(response.notices.len(), 1);
        assert_eq!(response.notices[0].level, NoticeLevel::Warning);
        assert_eq!(response.notices[0].message, "Please capture an image first.");
    }

    #[test]
    fn notice_level_serializes_snake_case() {
        let json = serde_json::to_string(&Notice::success("ok")).unwrap();
        assert_eq!(json, r#"{"level":"success","message":"ok"}"#);
    }
}

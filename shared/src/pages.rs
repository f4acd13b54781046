use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Every page the sidebar selector offers, in display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    #[default]
    #[strum(serialize = "Home")]
    Home,
    #[strum(serialize = "About")]
    About,
    #[strum(serialize = "Disease Management")]
    Management,
    #[strum(serialize = "Disease Recognition")]
    DiseaseRecognition,
    #[strum(serialize = "Disease Recognition (Take a Photo)")]
    TakePhoto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaticPage {
    Home,
    About,
    Management,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "source", rename_all = "snake_case")]
pub enum PageKind {
    Static(StaticPage),
    Recognition(ImageSource),
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Home,
        Page::About,
        Page::Management,
        Page::DiseaseRecognition,
        Page::TakePhoto,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::About => "About",
            Page::Management => "Disease Management",
            Page::DiseaseRecognition => "Disease Recognition",
            Page::TakePhoto => "Disease Recognition (Take a Photo)",
        }
    }

    pub fn kind(&self) -> PageKind {
        match self {
            Page::Home => PageKind::Static(StaticPage::Home),
            Page::About => PageKind::Static(StaticPage::About),
            Page::Management => PageKind::Static(StaticPage::Management),
            Page::DiseaseRecognition => PageKind::Recognition(ImageSource::Upload),
            Page::TakePhoto => PageKind::Recognition(ImageSource::Camera),
        }
    }
}

/// Where a recognition page takes its image from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ImageSource {
    #[default]
    Upload,
    Camera,
}

impl ImageSource {
    pub fn missing_image_message(&self) -> &'static str {
        match self {
            ImageSource::Upload => "Please upload an image first.",
            ImageSource::Camera => "Please capture an image first.",
        }
    }

    pub fn preview_caption(&self) -> &'static str {
        match self {
            ImageSource::Upload => "Uploaded Image",
            ImageSource::Camera => "Captured Image",
        }
    }
}

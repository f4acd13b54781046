use super::super::{AuthField, AuthMode, Model, Msg, SelectedImage, TOKEN_KEY};
use crate::api::{self, ApiError};
use gloo_file::{File as GlooFile, ObjectUrl};
use gloo_storage::{LocalStorage, Storage};
use shared::{AuthResponse, LoginRequest, Notice, Page, RegisterRequest, UserInfo};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

pub fn stored_token() -> Option<String> {
    LocalStorage::get::<String>(TOKEN_KEY).ok()
}

pub fn restore_session(ctx: &Context<Model>, token: String) {
    let link = ctx.link().clone();
    spawn_local(async move {
        match api::fetch_me(&token).await {
            Ok(user) => link.send_message(Msg::SessionRestored(user)),
            Err(ApiError::Unauthorized(_)) => link.send_message(Msg::SessionExpired),
            Err(e) => {
                log::error!("Failed to restore session: {}", e);
                link.send_message(Msg::Logout);
            }
        }
    });
}

pub fn handle_set_auth_mode(model: &mut Model, mode: AuthMode) -> bool {
    if model.auth_mode == mode {
        return false;
    }
    model.auth_mode = mode;
    model.auth_form.password.clear();
    model.auth_form.confirm_password.clear();
    model.error = None;
    model.notices.clear();
    true
}

pub fn handle_auth_input(model: &mut Model, field: AuthField, value: String) -> bool {
    match field {
        AuthField::Username => model.auth_form.username = value,
        AuthField::Password => model.auth_form.password = value,
        AuthField::ConfirmPassword => model.auth_form.confirm_password = value,
    }
    false
}

pub fn handle_submit_login(model: &mut Model, ctx: &Context<Model>) -> bool {
    let request = LoginRequest {
        username: model.auth_form.username.clone(),
        password: model.auth_form.password.clone(),
    };
    model.loading = true;
    model.error = None;
    model.notices.clear();

    let link = ctx.link().clone();
    spawn_local(async move {
        match api::login(&request).await {
            Ok(response) => link.send_message(Msg::LoggedIn(response)),
            Err(e) => link.send_message(Msg::SetError(Some(e.to_string()))),
        }
    });
    true
}

pub fn handle_submit_register(model: &mut Model, ctx: &Context<Model>) -> bool {
    let form = &model.auth_form;
    if form.password != form.confirm_password {
        model.error = Some("Passwords do not match.".into());
        return true;
    }

    let request = RegisterRequest {
        username: form.username.clone(),
        password: form.password.clone(),
        confirm_password: form.confirm_password.clone(),
    };
    model.loading = true;
    model.error = None;
    model.notices.clear();

    let link = ctx.link().clone();
    spawn_local(async move {
        match api::register(&request).await {
            Ok(user) => link.send_message(Msg::Registered(user)),
            Err(e) => link.send_message(Msg::SetError(Some(e.to_string()))),
        }
    });
    true
}

pub fn handle_logged_in(model: &mut Model, response: AuthResponse) -> bool {
    if let Err(e) = LocalStorage::set(TOKEN_KEY, &response.token) {
        log::warn!("Could not persist the session token: {}", e);
    }
    log::info!("Logged in as {}", response.user.username);
    model.token = Some(response.token);
    model.user = Some(response.user);
    model.auth_form = Default::default();
    model.loading = false;
    model.error = None;
    model.notices = vec![Notice::success("Logged in successfully!")];
    true
}

pub fn handle_registered(model: &mut Model, user: UserInfo) -> bool {
    log::info!("Registered {}", user.username);
    model.loading = false;
    model.auth_mode = AuthMode::Login;
    model.auth_form.password.clear();
    model.auth_form.confirm_password.clear();
    model.notices = vec![Notice::success("Registration successful! Please log in.")];
    true
}

pub fn handle_logout(model: &mut Model) -> bool {
    LocalStorage::delete(TOKEN_KEY);
    model.token = None;
    model.user = None;
    model.image = None;
    model.show_preview = false;
    model.notices.clear();
    model.loading = false;
    true
}

pub fn handle_select_page(model: &mut Model, page: Page) -> bool {
    if model.page == page {
        return false;
    }
    model.page = page;
    model.image = None;
    model.show_preview = false;
    model.notices.clear();
    model.error = None;
    true
}

pub fn handle_image_selected(model: &mut Model, file: Option<GlooFile>) -> bool {
    model.image = file.map(|file| SelectedImage {
        preview_url: ObjectUrl::from(file.clone()),
        file,
    });
    model.show_preview = false;
    model.notices.clear();
    true
}

pub fn handle_show_image(model: &mut Model) -> bool {
    let Some(source) = model.recognition_source() else {
        return false;
    };
    if model.image.is_some() {
        model.show_preview = true;
    } else {
        model.notices = vec![Notice::warning(source.missing_image_message())];
    }
    true
}

pub fn handle_predict(model: &mut Model, ctx: &Context<Model>) -> bool {
    let Some(source) = model.recognition_source() else {
        return false;
    };
    let Some(image) = &model.image else {
        model.notices = vec![Notice::warning(source.missing_image_message())];
        return true;
    };
    let Some(token) = model.token.clone() else {
        ctx.link().send_message(Msg::SessionExpired);
        return false;
    };

    model.loading = true;
    model.error = None;
    model.notices.clear();

    let file = image.file.clone();
    let link = ctx.link().clone();
    spawn_local(async move {
        match api::predict(&token, &file, source).await {
            Ok(response) => link.send_message(Msg::PredictionReceived(response)),
            Err(ApiError::Unauthorized(_)) => link.send_message(Msg::SessionExpired),
            Err(e) => link.send_message(Msg::SetError(Some(e.to_string()))),
        }
    });
    true
}

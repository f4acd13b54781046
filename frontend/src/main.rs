mod api;
mod components;

use components::{auth_forms, handlers, notices, recognition, sidebar, static_pages};
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::{AuthResponse, Notice, Page, PageKind, PredictionResponse, UserInfo};
use yew::prelude::*;

const TOKEN_KEY: &str = "auth_token";

// Models
struct SelectedImage {
    file: GlooFile,
    preview_url: ObjectUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthMode {
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthField {
    Username,
    Password,
    ConfirmPassword,
}

#[derive(Default)]
struct AuthForm {
    username: String,
    password: String,
    confirm_password: String,
}

// Yew msg components
enum Msg {
    // Session
    SetAuthMode(AuthMode),
    AuthInput(AuthField, String),
    SubmitLogin,
    SubmitRegister,
    LoggedIn(AuthResponse),
    Registered(UserInfo),
    SessionRestored(UserInfo),
    SessionExpired,
    Logout,

    // Pages
    SelectPage(Page),

    // Recognition
    ImageSelected(Option<GlooFile>),
    ShowImage,
    Predict,
    PredictionReceived(PredictionResponse),

    // UI states
    SetError(Option<String>),
}

// Main component
struct Model {
    token: Option<String>,
    user: Option<UserInfo>,
    auth_mode: AuthMode,
    auth_form: AuthForm,
    page: Page,
    image: Option<SelectedImage>,
    show_preview: bool,
    notices: Vec<Notice>,
    loading: bool,
    error: Option<String>,
}

impl Model {
    fn recognition_source(&self) -> Option<shared::ImageSource> {
        match self.page.kind() {
            PageKind::Recognition(source) => Some(source),
            PageKind::Static(_) => None,
        }
    }
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let model = Self {
            token: handlers::stored_token(),
            user: None,
            auth_mode: AuthMode::Login,
            auth_form: AuthForm::default(),
            page: Page::default(),
            image: None,
            show_preview: false,
            notices: Vec::new(),
            loading: false,
            error: None,
        };

        if let Some(token) = model.token.clone() {
            handlers::restore_session(ctx, token);
        }

        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            // Session
            Msg::SetAuthMode(mode) => handlers::handle_set_auth_mode(self, mode),
            Msg::AuthInput(field, value) => handlers::handle_auth_input(self, field, value),
            Msg::SubmitLogin => handlers::handle_submit_login(self, ctx),
            Msg::SubmitRegister => handlers::handle_submit_register(self, ctx),
            Msg::LoggedIn(response) => handlers::handle_logged_in(self, response),
            Msg::Registered(user) => handlers::handle_registered(self, user),
            Msg::SessionRestored(user) => {
                log::info!("Session restored for {}", user.username);
                self.user = Some(user);
                true
            }
            Msg::SessionExpired => {
                handlers::handle_logout(self);
                self.error = Some("Your session has expired, please log in again.".into());
                true
            }
            Msg::Logout => {
                handlers::handle_logout(self);
                self.notices = vec![Notice::info("You have been logged out.")];
                true
            }

            // Pages
            Msg::SelectPage(page) => handlers::handle_select_page(self, page),

            // Recognition
            Msg::ImageSelected(file) => handlers::handle_image_selected(self, file),
            Msg::ShowImage => handlers::handle_show_image(self),
            Msg::Predict => handlers::handle_predict(self, ctx),
            Msg::PredictionReceived(response) => {
                self.loading = false;
                self.notices = response.notices;
                true
            }

            // UI states
            Msg::SetError(error) => {
                self.error = error;
                self.loading = false;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { sidebar::render_sidebar(self, ctx) }

                <main class="main-content">
                    { components::utils::render_error_message(self) }
                    { self.render_main(ctx) }
                </main>
            </div>
        }
    }
}

// Rendering methods
impl Model {
    fn render_main(&self, ctx: &Context<Self>) -> Html {
        if self.token.is_none() {
            return auth_forms::render_auth_form(self, ctx);
        }
        if self.user.is_none() {
            return html! {
                <div class="loading">
                    <i class="fa-solid fa-spinner fa-spin"></i>{" Restoring session..."}
                </div>
            };
        }

        let page = match self.page.kind() {
            PageKind::Static(page) => static_pages::render_static_page(page),
            PageKind::Recognition(source) => recognition::render_recognition(self, ctx, source),
        };
        html! {
            <>
                { page }
                { notices::render_notices(&self.notices) }
            </>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}

use super::super::{AuthField, AuthMode, Model, Msg};
use super::notices::render_notices;
use web_sys::HtmlInputElement;
use yew::prelude::*;

fn text_input(
    ctx: &Context<Model>,
    field: AuthField,
    label: &'static str,
    input_type: &'static str,
    value: &str,
) -> Html {
    let oninput = ctx.link().callback(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::AuthInput(field, input.value())
    });

    html! {
        <label class="auth-field">
            <span>{ label }</span>
            <input type={input_type} value={value.to_string()} {oninput} />
        </label>
    }
}

pub fn render_auth_form(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let form = &model.auth_form;

    let body = match model.auth_mode {
        AuthMode::Login => html! {
            <>
                <h1>{"Login"}</h1>
                { text_input(ctx, AuthField::Username, "Username", "text", &form.username) }
                { text_input(ctx, AuthField::Password, "Password", "password", &form.password) }
                <button
                    class="analyze-btn"
                    disabled={model.loading}
                    onclick={link.callback(|_| Msg::SubmitLogin)}
                >
                    {"Login"}
                </button>
            </>
        },
        AuthMode::Register => html! {
            <>
                <h1>{"Register"}</h1>
                { text_input(ctx, AuthField::Username, "New Username", "text", &form.username) }
                { text_input(ctx, AuthField::Password, "New Password", "password", &form.password) }
                { text_input(
                    ctx,
                    AuthField::ConfirmPassword,
                    "Confirm Password",
                    "password",
                    &form.confirm_password,
                ) }
                <button
                    class="analyze-btn"
                    disabled={model.loading}
                    onclick={link.callback(|_| Msg::SubmitRegister)}
                >
                    {"Register"}
                </button>
            </>
        },
    };

    html! {
        <div class="auth-form">
            { body }
            { render_notices(&model.notices) }
        </div>
    }
}

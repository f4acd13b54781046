use super::super::{AuthMode, Model, Msg};
use shared::Page;
use std::str::FromStr;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

pub fn render_sidebar(model: &Model, ctx: &Context<Model>) -> Html {
    html! {
        <aside class="sidebar">
            <div class="app-header" style="text-align: center; color: #ff6347;">
                <h1>{"GREEN GUARDIAN"}</h1>
            </div>
            {
                if model.token.is_some() {
                    render_dashboard(model, ctx)
                } else {
                    render_auth_mode(model, ctx)
                }
            }
        </aside>
    }
}

fn render_dashboard(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let on_select = link.batch_callback(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        Page::from_str(&select.value()).ok().map(Msg::SelectPage)
    });

    html! {
        <>
            <h2>{"Dashboard"}</h2>
            <label for="page-select">{"Select page"}</label>
            <select id="page-select" onchange={on_select}>
                { for Page::ALL.iter().map(|page| html! {
                    <option value={page.title()} selected={*page == model.page}>
                        { page.title() }
                    </option>
                })}
            </select>
            {
                match &model.user {
                    Some(user) => html! {
                        <div class="user-info">
                            <span class="user-name">{ &user.username }</span>
                            <button
                                class="logout-button"
                                onclick={link.callback(|_| Msg::Logout)}
                                title="Logout"
                            >
                                <i class="fa-solid fa-sign-out-alt"></i>{" Logout"}
                            </button>
                        </div>
                    },
                    None => html! {},
                }
            }
        </>
    }
}

fn render_auth_mode(model: &Model, ctx: &Context<Model>) -> Html {
    let radio = |mode: AuthMode, label: &'static str| {
        let onchange = ctx.link().batch_callback(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            input.checked().then_some(Msg::SetAuthMode(mode))
        });
        html! {
            <label class="auth-mode">
                <input
                    type="radio"
                    name="auth-mode"
                    checked={model.auth_mode == mode}
                    {onchange}
                />
                { label }
            </label>
        }
    };

    html! {
        <>
            <h2>{"Authentication"}</h2>
            <p>{"Choose Mode"}</p>
            { radio(AuthMode::Login, "Login") }
            { radio(AuthMode::Register, "Register") }
        </>
    }
}

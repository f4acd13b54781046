use super::super::{Model, Msg};
use super::utils::{debounce, first_image_file};
use shared::ImageSource;
use web_sys::HtmlInputElement;
use yew::prelude::*;

pub fn render_recognition(model: &Model, ctx: &Context<Model>, source: ImageSource) -> Html {
    let link = ctx.link().clone();

    html! {
        <div class="upload-section">
            <h2>{ model.page.title() }</h2>
            { render_image_input(model, ctx, source) }
            <div class="button-container">
                <button
                    class="analyze-btn"
                    onclick={link.callback(|_| Msg::ShowImage)}
                >
                    <i class="fa-solid fa-image"></i>{" Show Image"}
                </button>
                <button
                    class="analyze-btn"
                    disabled={model.loading}
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::Predict)
                    })}
                >
                    { render_predict_button_content(model) }
                </button>
            </div>
            { render_preview(model, source) }
        </div>
    }
}

fn render_image_input(model: &Model, ctx: &Context<Model>, source: ImageSource) -> Html {
    let handle_change = ctx.link().callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        match input.files() {
            Some(files) if files.length() > 0 => match first_image_file(&files) {
                Some(file) => Msg::ImageSelected(Some(file)),
                None => Msg::SetError(Some("No valid image file selected.".into())),
            },
            _ => Msg::ImageSelected(None),
        }
    });

    let selected = model
        .image
        .as_ref()
        .map(|image| image.file.name())
        .unwrap_or_else(|| "No file chosen".to_string());

    match source {
        ImageSource::Upload => html! {
            <label class="upload-area">
                <span>{"Choose an Image"}</span>
                <input
                    type="file"
                    accept="image/*"
                    onchange={handle_change}
                />
                <p class="file-types">{ selected }</p>
            </label>
        },
        ImageSource::Camera => html! {
            <label class="upload-area">
                <span>{"Take an Image"}</span>
                <input
                    type="file"
                    accept="image/*"
                    capture="environment"
                    onchange={handle_change}
                />
                <p class="file-types">{ selected }</p>
            </label>
        },
    }
}

fn render_predict_button_content(model: &Model) -> Html {
    if model.loading {
        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Please Wait....."}</> }
    } else {
        html! { <><i class="fa-solid fa-magnifying-glass"></i>{" Predict"}</> }
    }
}

fn render_preview(model: &Model, source: ImageSource) -> Html {
    match (&model.image, model.show_preview) {
        (Some(image), true) => html! {
            <figure id="preview-container">
                <img id="actual-image-preview"
                    src={image.preview_url.to_string()}
                    alt={image.file.name()}
                    style="max-width:100%; object-fit: contain;" />
                <figcaption>{ source.preview_caption() }</figcaption>
            </figure>
        },
        _ => html! {},
    }
}

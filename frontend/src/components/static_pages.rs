use shared::StaticPage;
use yew::prelude::*;

pub fn render_static_page(page: StaticPage) -> Html {
    match page {
        StaticPage::Home => render_home(),
        StaticPage::About => render_about(),
        StaticPage::Management => render_management(),
    }
}

fn render_home() -> Html {
    html! {
        <section class="static-page">
            <h2>{"Plant Disease Recognition System"}</h2>
            <h1>{"Your Smart Assistant for Plant Health"}</h1>
            <h3>{"Identify Maize Leaf Diseases with Ease"}</h3>
            <p>
                {"Diagnose problems on your maize crop from a single photo and keep your farm or garden thriving."}
            </p>
            <h2>{"How It Works:"}</h2>
            <ol>
                <li><strong>{"Capture a Clear Image: "}</strong>{"take a photo of one leaf showing the issue, held horizontally."}</li>
                <li><strong>{"Upload the Image: "}</strong>{"open Disease Recognition, or take the photo directly from your phone."}</li>
                <li><strong>{"Analysis: "}</strong>{"the model classifies the leaf as healthy or as one of the common maize diseases."}</li>
                <li><strong>{"Act on It: "}</strong>{"read Disease Management for what to do next."}</li>
            </ol>
            <p>{"Ready to get started? Pick a page from the sidebar."}</p>
        </section>
    }
}

fn render_about() -> Html {
    html! {
        <section class="static-page">
            <h2>{"About"}</h2>
            <h3>{"About Our Dataset"}</h3>
            <p>
                {"The recognition model is trained on a curated set of labelled maize leaf images \
                  covering healthy leaves and the most common foliar diseases. The images come from \
                  agricultural research institutions, universities and public repositories, so the \
                  model sees a diverse and representative sample of field conditions."}
            </p>
            <p>
                {"Predictions are an aid, not a replacement for an agronomist. Photos that do not \
                  look like a maize leaf are flagged so you can retake them."}
            </p>
        </section>
    }
}

fn render_management() -> Html {
    let diseases = [
        (
            "Common rust",
            "Plant resistant hybrids. Scout from tasselling; apply a foliar fungicide when \
             pustules appear on the upper leaves before silking.",
        ),
        (
            "Northern leaf blight",
            "Rotate away from maize for at least a year and bury residue. Use resistant \
             hybrids and treat with fungicide when lesions reach the ear leaf.",
        ),
        (
            "Gray leaf spot",
            "Reduce surface residue through tillage or rotation, avoid continuous maize and \
             spray a fungicide in humid weather when lesions spread above the ear.",
        ),
        (
            "Healthy",
            "Keep scouting weekly, maintain balanced fertilisation and good drainage.",
        ),
    ];

    html! {
        <section class="static-page">
            <h2>{"Disease Management"}</h2>
            { for diseases.iter().map(|(name, advice)| html! {
                <div class="management-item">
                    <h3>{ *name }</h3>
                    <p>{ *advice }</p>
                </div>
            })}
        </section>
    }
}

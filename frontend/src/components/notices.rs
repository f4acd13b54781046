use shared::{Notice, NoticeLevel};
use yew::prelude::*;

fn level_style(level: NoticeLevel) -> (&'static str, &'static str) {
    match level {
        NoticeLevel::Success => ("notice-success", "fa-solid fa-circle-check"),
        NoticeLevel::Warning => ("notice-warning", "fa-solid fa-triangle-exclamation"),
        NoticeLevel::Info => ("notice-info", "fa-solid fa-circle-info"),
        NoticeLevel::Error => ("notice-error", "fa-solid fa-circle-exclamation"),
    }
}

pub fn render_notices(notices: &[Notice]) -> Html {
    if notices.is_empty() {
        return html! {};
    }

    html! {
        <div class="notices">
            { for notices.iter().map(|notice| {
                let (class, icon) = level_style(notice.level);
                html! {
                    <div class={classes!("notice", class)}>
                        <i class={icon}></i>
                        <p>{ &notice.message }</p>
                    </div>
                }
            })}
        </div>
    }
}

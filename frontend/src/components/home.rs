use crate::context::use_api;
use crate::web::router::use_navigate;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn HomeView() -> impl IntoView {
    let api = use_api();
    let navigate = use_navigate();

    let (keyword, set_keyword) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let value = keyword.get().trim().to_string();
        if value.is_empty() {
            set_error_msg.set(Some("Please enter a keyword".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = api.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            match api.start_research(&value).await {
                Ok(result) => navigate(&format!("/{}", result.uuid)),
                Err(e) => {
                    log::error!("[Home] research request failed: {}", e);
                    set_error_msg.set(Some(e.to_string()));
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-xl">
                <h1 class="text-4xl font-bold">"Fairy"</h1>
                <form class="card-body w-full" on:submit=on_submit>
                    <Show when=move || error_msg.get().is_some()>
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <span>{move || error_msg.get().unwrap_or_default()}</span>
                        </div>
                    </Show>
                    <input
                        type="text"
                        placeholder="Keyword"
                        on:input=move |ev| set_keyword.set(event_target_value(&ev))
                        prop:value=keyword
                        class="input input-bordered"
                    />
                    <button class="btn btn-primary" disabled=move || is_submitting.get()>
                        {move || if is_submitting.get() { "Researching..." } else { "Research" }}
                    </button>
                </form>
            </div>
        </div>
    }
}

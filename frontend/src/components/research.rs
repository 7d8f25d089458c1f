use crate::context::use_api;
use crate::error::ApiError;
use fairy_shared::ResearchResult;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn ResearchView(uuid: String) -> impl IntoView {
    let api = use_api();

    let (result, set_result) = signal(Option::<ResearchResult>::None);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    spawn_local({
        let uuid = uuid.clone();
        async move {
            match api.get_research(&uuid).await {
                Ok(data) => set_result.set(Some(data)),
                Err(ApiError::NotFound) => {
                    set_error_msg.set(Some("Research not found".to_string()))
                }
                Err(e) => {
                    log::error!("[Research] failed to load {}: {}", uuid, e);
                    set_error_msg.set(Some(e.to_string()));
                }
            }
        }
    });

    view! {
        <div class="container mx-auto p-6">
            <Show when=move || error_msg.get().is_some()>
                <div role="alert" class="alert alert-error">
                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                </div>
            </Show>
            {move || {
                result
                    .get()
                    .map(|r| {
                        view! {
                            <article class="prose">
                                <h1>{r.smart_message}</h1>
                                <pre class="whitespace-pre-wrap">{r.full_message}</pre>
                                <p class="text-sm opacity-60">{uuid.clone()}</p>
                            </article>
                        }
                    })
            }}
        </div>
    }
}

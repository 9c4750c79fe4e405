//! Content Overlay Component
//!
//! Backdrop and slide-in panel for posts and case studies. Clicks are
//! handled by the document listener, so the markup only carries the
//! classes and data attributes the click router looks for.

use leptos::*;

use folio::content::{ContentKind, ContentRef, NeighborRef, Slug};
use folio::overlay::router::CLOSE_BUTTON_ID;
use folio::overlay::Displayed;

use super::loading::Loading;
use crate::state::dom::BACKDROP_ID;
use crate::state::SiteState;

#[component]
pub fn ContentOverlay() -> impl IntoView {
    let state = use_context::<SiteState>().expect("SiteState not found");
    let view_state = state.overlay.view;

    move || {
        let current = view_state.get();
        if !current.shell_mounted {
            return view! {}.into_view();
        }

        let backdrop_class = if current.closing {
            "fixed inset-0 z-[200] bg-black/50 overlay-fade-out"
        } else {
            "fixed inset-0 z-[200] bg-black/50 overlay-fade-in"
        };
        let panel_class = if current.closing {
            "absolute inset-y-0 right-0 w-full md:w-3/4 lg:w-2/3 bg-white dark:bg-[#111111] overflow-y-auto overlay-slide-out"
        } else {
            "absolute inset-y-0 right-0 w-full md:w-3/4 lg:w-2/3 bg-white dark:bg-[#111111] overflow-y-auto overlay-slide-in"
        };

        view! {
            <div id=BACKDROP_ID class=backdrop_class>
                <aside class=panel_class role="dialog" aria-modal="true">
                    <div class="sticky top-0 z-10 flex justify-end px-6 py-4 bg-white dark:bg-[#111111]">
                        <button
                            id=CLOSE_BUTTON_ID
                            class="text-gray-500 hover:text-gray-700 dark:text-gray-400 dark:hover:text-gray-200"
                            aria-label="Close"
                        >
                            "✕"
                        </button>
                    </div>

                    {current.loading.then(|| view! { <Loading /> })}

                    {current.shown.map(|shown| view! { <Article shown=shown /> })}
                </aside>
            </div>
        }
        .into_view()
    }
}

#[component]
fn Article(shown: Displayed) -> impl IntoView {
    let kind = shown.reference.kind;
    let payload = shown.payload;
    let published = payload.published_display();

    view! {
        <article class="px-6 pb-16 max-w-3xl mx-auto overlay-content-slide">
            <h1 class="text-4xl font-light mb-4">{payload.title.clone()}</h1>

            <div class="text-sm text-gray-500 dark:text-gray-400 mb-8">
                {published.map(|date| format!("{} • ", date))}
                {format!("{} min read", payload.reading_time)}
            </div>

            {payload.feature_image.clone().map(|src| view! {
                <img src=src alt=payload.title.clone() class="w-full rounded-lg mb-8" />
            })}

            <div class="prose dark:prose-invert max-w-none" inner_html=payload.html.clone() />

            <nav class="flex justify-between mt-16 pt-8 border-t border-gray-200 dark:border-gray-800">
                <div>{payload.prev_post.clone().map(|n| view! { <NeighborLink neighbor=n kind=kind next=false /> })}</div>
                <div>{payload.next_post.clone().map(|n| view! { <NeighborLink neighbor=n kind=kind next=true /> })}</div>
            </nav>
        </article>
    }
}

/// Prev/next link. The href is the canonical page so it still works
/// without the overlay.
#[component]
fn NeighborLink(neighbor: NeighborRef, kind: ContentKind, next: bool) -> impl IntoView {
    let href = Slug::parse(&neighbor.slug)
        .map(|slug| ContentRef::new(slug, kind).canonical_path())
        .unwrap_or_default();
    let label = neighbor.title.clone().unwrap_or_else(|| neighbor.slug.clone());
    let (class, text) = if next {
        ("next-post", format!("{} →", label))
    } else {
        ("prev-post", format!("← {}", label))
    };

    view! {
        <a
            href=href
            class=format!("{} text-gray-600 hover:text-gray-900 dark:text-gray-400 dark:hover:text-white", class)
            data-post-slug=neighbor.slug
        >
            {text}
        </a>
    }
}

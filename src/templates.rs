use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::models::MovieCard;

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";
const DATASTAR_CDN: &str =
    "https://cdn.jsdelivr.net/npm/@sudodevnull/datastar@0.19.9/dist/datastar.js";
const POSTER_BASE: &str = "https://image.tmdb.org/t/p/w342";

pub fn movies_page(search: &str) -> String {
    let url = format!("/movie-list?search={}", urlencoding::encode(search));

    page(
        "Movies",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-5xl mx-auto px-6 py-10" {
                    div class="flex items-end justify-between gap-6" {
                        h1 class="text-3xl font-bold text-gray-900" { "Movies" }
                        form class="flex gap-2" method="get" action="/movies" {
                            input class="w-64 rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500" type="search" name="search" placeholder="Search titles" value=(search);
                            button class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Search" }
                        }
                    }

                    div id="content" class="mt-10" data-init=(PreEscaped(format!("@get('{}')", url))) {
                        div class="mx-auto h-12 w-12 rounded-full border-4 border-blue-200 border-t-blue-600 animate-spin" {};
                    }
                }
            }
        },
    )
}

pub fn movie_list_fragment(cards: &[MovieCard]) -> String {
    content_div(html! {
        @if cards.is_empty() {
            div class="bg-white shadow rounded-lg p-8" {
                p class="text-gray-600" { "No movies found." }
            }
        } @else {
            div class="grid gap-6 md:grid-cols-2" {
                @for card in cards {
                    (movie_card(card))
                }
            }
        }
    })
}

pub fn apology_fragment() -> String {
    content_div(html! {
        div class="bg-white shadow rounded-lg p-8" {
            h2 class="text-xl font-semibold text-gray-900" { "Sorry!" }
            p class="mt-2 text-gray-600" { "Movies are unavailable right now. Please try again in a moment." }
        }
    })
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
                script type="module" src=(DATASTAR_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}

fn content_div(inner: Markup) -> String {
    html! { div id="content" class="mt-10" { (inner) } }.into_string()
}

fn movie_card(card: &MovieCard) -> Markup {
    html! {
        div class="bg-white shadow rounded-lg p-6 flex gap-4" {
            @if !card.poster_src.is_empty() {
                img class="w-24 rounded" src=(format!("{POSTER_BASE}{}", card.poster_src)) alt=(card.title_en) loading="lazy";
            }
            div {
                h2 class="text-xl font-semibold text-gray-900" {
                    (card.title_en)
                    span class="ml-2 font-normal text-gray-500" { "(" (card.release_year) ")" }
                }
                p class="mt-1 text-sm font-medium text-amber-600" { "★ " (format!("{:.1}", card.vote_average)) }
                @if !card.genres.is_empty() {
                    p class="mt-1 text-xs text-gray-500" { (card.genres.join(" · ")) }
                }
                p class="mt-2 text-sm text-gray-700" { (card.overview) }
            }
        }
    }
}

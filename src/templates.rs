use maud::{DOCTYPE, Markup, html};

use crate::{
    entities::{cast_member, cinema, movie},
    pagination::Page,
};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

pub fn index_page(cinemas: &Page<cinema::Model>) -> String {
    page(
        "Cinemas",
        html! {
            (nav())
            div class="max-w-4xl mx-auto px-6 py-10" {
                div class="flex items-baseline justify-between" {
                    h1 class="text-3xl font-bold text-gray-900" { "Cinemas" }
                    p class="text-sm text-gray-500" { (cinemas.total) " total" }
                }

                @if cinemas.items.is_empty() {
                    div class="mt-8 bg-white shadow rounded-lg p-8" {
                        p class="text-gray-600" { "No cinemas yet." }
                    }
                } @else {
                    div class="mt-8 grid gap-4 md:grid-cols-2" {
                        @for cinema in &cinemas.items {
                            (cinema_card(cinema))
                        }
                    }
                    @if cinemas.has_next() {
                        p class="mt-6 text-sm text-gray-500" {
                            "Showing the first " (cinemas.items.len()) ". The full list is available from "
                            code { "/api/cinemas" } "."
                        }
                    }
                }
            }
        },
    )
}

pub fn cast_members_page(members: &[cast_member::Model]) -> String {
    page(
        "Cast members",
        html! {
            (nav())
            div class="max-w-4xl mx-auto px-6 py-10" {
                h1 class="text-3xl font-bold text-gray-900" { "Cast members" }

                @if members.is_empty() {
                    div class="mt-8 bg-white shadow rounded-lg p-8" {
                        p class="text-gray-600" { "No cast members yet." }
                    }
                } @else {
                    ul class="mt-8 grid gap-4 md:grid-cols-3" {
                        @for member in members {
                            li class="bg-white shadow rounded-lg p-4 flex items-center gap-4" {
                                (avatar(member))
                                a class="font-medium text-blue-600 hover:text-blue-800" href=(format!("/cast-members/{}", member.id)) {
                                    (member.full_name)
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn cast_member_page(member: &cast_member::Model, movies: &[movie::Model]) -> String {
    page(
        &member.full_name,
        html! {
            (nav())
            div class="max-w-2xl mx-auto px-6 py-10" {
                div class="bg-white shadow rounded-lg p-8" {
                    div class="flex items-center gap-6" {
                        (avatar(member))
                        h1 class="text-3xl font-bold text-gray-900" { (member.full_name) }
                    }

                    h2 class="mt-8 text-sm font-semibold text-gray-700" { "Movies" }
                    @if movies.is_empty() {
                        p class="mt-2 text-sm text-gray-500" { "Not cast in any movie." }
                    } @else {
                        ul class="mt-2 space-y-1" {
                            @for movie in movies {
                                li class="text-sm text-gray-700" {
                                    span class="font-medium" { (movie.title) }
                                    @if let Some(year) = movie.release_year {
                                        span class="text-gray-500" { " · " (year) }
                                    }
                                }
                            }
                        }
                    }

                    a class="mt-8 inline-block text-blue-600 hover:text-blue-800" href="/cast-members" { "Back" }
                }
            }
        },
    )
}

pub fn error_page(message: String) -> String {
    page(
        "Error",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Error" }
                        p class="mt-4 text-gray-700" { (message) }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
                    }
                }
            }
        },
    )
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
            }
            body class="bg-gray-50" { (body) }
        }
    }
    .into_string()
}

fn nav() -> Markup {
    html! {
        nav class="bg-white shadow" {
            div class="max-w-4xl mx-auto px-6 py-4 flex gap-6 text-sm font-medium" {
                a class="text-gray-700 hover:text-gray-900" href="/" { "Cinemas" }
                a class="text-gray-700 hover:text-gray-900" href="/cast-members" { "Cast" }
            }
        }
    }
}

fn cinema_card(cinema: &cinema::Model) -> Markup {
    html! {
        div class="bg-white shadow rounded-lg p-6" {
            @if let Some(photo) = &cinema.photo_url {
                img class="mb-4 h-32 w-full rounded object-cover" src=(photo) alt=(cinema.name);
            }
            h2 class="text-xl font-semibold text-gray-900" { (cinema.name) }
            p class="mt-1 text-sm text-gray-500" { (cinema.address) }
        }
    }
}

fn avatar(member: &cast_member::Model) -> Markup {
    html! {
        @if let Some(url) = &member.photo_url {
            img class="h-12 w-12 rounded-full object-cover" src=(url) alt=(member.full_name);
        } @else {
            div class="h-12 w-12 rounded-full bg-gray-200" {}
        }
    }
}

//! Wire model for the recommendation backend.

use serde::Deserialize;

/// A single catalog record returned by the search backend.
///
/// The shape mirrors the backend's flat record one to one. The backend sends
/// several numeric-looking fields as strings (`recommendations_total`,
/// `discount_percent`, the screenshot/movie counts); those stay `String`
/// here rather than being coerced. `categories` and `genres` arrive as a
/// stringified list (e.g. `"['Action', 'Indie']"`) and are decoded with
/// [`parse_list`] at display time. `supported_languages` arrives as a proper
/// array and needs no decoding.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Game {
    pub rank: i64,
    pub score: f64,
    pub app_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub game_type: String,
    pub required_age: i64,
    pub is_free: bool,
    pub supported_languages: Vec<String>,
    pub developers: String,
    pub publishers: String,
    pub price_final: f64,
    pub platforms_windows: bool,
    pub platforms_mac: bool,
    pub platforms_linux: bool,
    pub categories: String,
    pub genres: String,
    pub recommendations_total: String,
    pub release_date: String,
    pub price_currency: String,
    pub metacritic_score: String,
    pub short_description: String,
    pub detailed_description: String,
    pub about_the_game: String,
    pub website: String,
    pub discount_percent: String,
    pub pc_min_os: String,
    pub pc_min_processor: String,
    pub pc_min_memory: String,
    pub pc_min_graphics: String,
    pub pc_min_directx: String,
    pub pc_min_network: String,
    pub pc_min_storage: String,
    pub header_image: String,
    pub background: String,
    pub screenshots_count: String,
    pub movies_count: String,
    pub pc_rec_os: String,
    pub pc_rec_processor: String,
    pub pc_rec_memory: String,
    pub pc_rec_graphics: String,
    pub support_email: String,
    pub pc_rec_directx: String,
    pub pc_rec_network: String,
    pub pc_rec_storage: String,
}

impl Game {
    /// Artwork source for the result card.
    ///
    /// `header_image` is only trusted when it carries an `https` address;
    /// anything else gets a generated placeholder labeled with the game's
    /// name.
    pub fn artwork_url(&self) -> String {
        if self.header_image.contains("https") {
            self.header_image.clone()
        } else {
            format!("https://placehold.co/400x188?text={}", self.name)
        }
    }
}

/// Envelope of a successful `/search` response.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub games: Vec<Game>,
}

/// Decodes the backend's bracketed-list string encoding into plain strings.
///
/// Only the first `[` and `]` are stripped, each comma-separated item is
/// trimmed, and its first and last character (the quotes) are dropped.
/// Boundary: `parse_list("[]")` yields `[""]` — the single empty item falls
/// out of the quote-stripping rule and callers are written against it.
pub fn parse_list(encoded: &str) -> Vec<String> {
    encoded
        .replacen('[', "", 1)
        .replacen(']', "", 1)
        .split(',')
        .map(|item| {
            let item = item.trim();
            let mut chars = item.chars();
            chars.next();
            chars.next_back();
            chars.as_str().to_string()
        })
        .collect()
}

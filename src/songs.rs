//! Song search collaborator: worship-song discovery over the YouTube Data
//! API.
//!
//! Search is an optional embellishment of the song-recommendation stage.
//! A missing API key, a transport failure, or an unreadable payload all
//! surface as `Unavailable`, which the workflow tolerates without aborting.

use serde::{Deserialize, Serialize};
use std::env;

/// Environment variable holding the YouTube Data API key.
pub const YOUTUBE_API_KEY_ENV: &str = "YOUTUBE_API_KEY";

const SEARCH_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/search";
/// YouTube category id for music videos.
const MUSIC_CATEGORY_ID: &str = "10";

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongHit {
    pub title: String,
    pub channel: String,
    pub video_id: String,
    pub url: String,
}

/// Search outcome: hits, or a structured unavailability.
#[derive(Debug, Clone)]
pub enum SongSearchOutcome {
    Hits(Vec<SongHit>),
    Unavailable { error: String },
}

/// A capability that finds songs for a query.
pub trait SongSearch {
    fn search(&self, query: &str, max_results: usize) -> SongSearchOutcome;
}

/// YouTube Data API v3 search client.
#[derive(Debug, Default)]
pub struct YouTubeSearch;

/// Search stand-in used when live search is turned off.
#[derive(Debug, Default)]
pub struct DisabledSearch;

impl SongSearch for DisabledSearch {
    fn search(&self, _query: &str, _max_results: usize) -> SongSearchOutcome {
        SongSearchOutcome::Unavailable {
            error: "song search disabled".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: SearchSnippet,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchSnippet {
    title: String,
    #[serde(rename = "channelTitle")]
    channel_title: String,
}

impl SongSearch for YouTubeSearch {
    fn search(&self, query: &str, max_results: usize) -> SongSearchOutcome {
        let key = match env::var(YOUTUBE_API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => key,
            _ => {
                tracing::warn!("{YOUTUBE_API_KEY_ENV} not configured; skipping song search");
                return SongSearchOutcome::Unavailable {
                    error: format!("{YOUTUBE_API_KEY_ENV} not configured"),
                };
            }
        };

        tracing::info!(query, max_results, "searching worship songs");
        let response = ureq::get(SEARCH_ENDPOINT)
            .query("part", "snippet")
            .query("type", "video")
            .query("order", "relevance")
            .query("videoCategoryId", MUSIC_CATEGORY_ID)
            .query("maxResults", &max_results.to_string())
            .query("q", query)
            .query("key", &key)
            .call();
        let mut response = match response {
            Ok(response) => response,
            Err(err) => {
                return SongSearchOutcome::Unavailable {
                    error: format!("song search failed: {err}"),
                }
            }
        };
        let payload: SearchResponse = match response.body_mut().read_json() {
            Ok(payload) => payload,
            Err(err) => {
                return SongSearchOutcome::Unavailable {
                    error: format!("song search payload unreadable: {err}"),
                }
            }
        };

        let hits = hits_from_response(payload);
        tracing::info!(hits = hits.len(), "song search complete");
        SongSearchOutcome::Hits(hits)
    }
}

/// Flatten the API payload, dropping non-video results (no `videoId`).
fn hits_from_response(payload: SearchResponse) -> Vec<SongHit> {
    payload
        .items
        .into_iter()
        .filter_map(|item| {
            let video_id = item.id.video_id?;
            Some(SongHit {
                url: format!("https://www.youtube.com/watch?v={video_id}"),
                title: item.snippet.title,
                channel: item.snippet.channel_title,
                video_id,
            })
        })
        .collect()
}

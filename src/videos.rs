//! Video suggestions with a curated fallback.
//!
//! Unlike the other flavors, a failed generation here is not an error for
//! the caller: the endpoint answers with a fixed curated list and says so in
//! `source` and `disclaimer`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::completion::CompletionClient;
use crate::pipeline;
use crate::prompt::PromptSpec;

pub const DISCLAIMER: &str =
    "Videos are provided as reference or inspiration, not as a replacement for teaching.";

pub const FALLBACK_DISCLAIMER: &str = "Live suggestions are unavailable, showing curated videos. \
Videos are provided as reference or inspiration, not as a replacement for teaching.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub channel: String,
    pub duration: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VideoSource {
    Generated,
    CuratedFallback,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoSuggestionResponse {
    pub videos: Vec<Video>,
    pub disclaimer: String,
    pub source: VideoSource,
}

fn video(id: &str, title: &str, channel: &str, duration: &str, url: &str) -> Video {
    Video {
        id: id.to_string(),
        title: title.to_string(),
        channel: channel.to_string(),
        duration: duration.to_string(),
        url: url.to_string(),
    }
}

pub fn curated_videos() -> Vec<Video> {
    vec![
        video(
            "curated-1",
            "Math Basics for Beginners",
            "Khan Academy",
            "5:42",
            "https://www.youtube.com/watch?v=GQ95z6ywcBY",
        ),
        video(
            "curated-2",
            "Introduction to Science",
            "SciShow Kids",
            "3:15",
            "https://www.youtube.com/watch?v=ua9Qf1hE6gU",
        ),
        video(
            "curated-3",
            "Basic English Grammar",
            "Learn English with Emma",
            "6:10",
            "https://www.youtube.com/watch?v=tIltvS8QfDI",
        ),
    ]
}

pub fn fallback_response() -> VideoSuggestionResponse {
    VideoSuggestionResponse {
        videos: curated_videos(),
        disclaimer: FALLBACK_DISCLAIMER.to_string(),
        source: VideoSource::CuratedFallback,
    }
}

/// Turn contract-checked `videos` records into [`Video`]s. Records without
/// an `id` get their 1-based position.
fn to_videos(map: &Map<String, Value>) -> Vec<Video> {
    let Some(items) = map.get("videos").and_then(Value::as_array) else {
        return Vec::new();
    };
    let text = |item: &Value, key: &str| {
        item.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| Video {
            id: item
                .get("id")
                .and_then(|id| match id {
                    Value::String(s) if !s.is_empty() => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .unwrap_or_else(|| (i + 1).to_string()),
            title: text(item, "title"),
            channel: text(item, "channel"),
            duration: text(item, "duration"),
            url: text(item, "url"),
        })
        .collect()
}

/// Ask the model for videos; on any failure answer with the curated list.
pub async fn suggest(client: &dyn CompletionClient, spec: &PromptSpec) -> VideoSuggestionResponse {
    match pipeline::run(client, spec).await {
        Ok(map) => VideoSuggestionResponse {
            videos: to_videos(&map),
            disclaimer: DISCLAIMER.to_string(),
            source: VideoSource::Generated,
        },
        Err(e) => {
            warn!(code = e.code(), error = %e, "video suggestions failed, serving curated fallback");
            fallback_response()
        }
    }
}

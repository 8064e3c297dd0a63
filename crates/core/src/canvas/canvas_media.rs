//! URL handling for media nodes.

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use super::canvas_model::NodePayload;
use crate::errors::{Error, Result, ValidationError};
use crate::utils::text_utils::normalize_optional;

lazy_static! {
    /// YouTube video ids are 11 characters of [A-Za-z0-9_-]
    static ref YOUTUBE_ID_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("Invalid regex pattern");

    /// Path form: /@user/video/<digits>
    static ref TIKTOK_VIDEO_PATH_REGEX: Regex =
        Regex::new(r"/video/(\d+)").expect("Invalid regex pattern");
}

fn parse_http_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ValidationError::InvalidUrl(raw.to_string()).into());
    }
    Ok(url)
}

fn host_matches(url: &Url, domain: &str) -> bool {
    url.host_str().is_some_and(|host| {
        let host = host.trim_start_matches("www.").trim_start_matches("m.");
        host == domain || host.ends_with(&format!(".{}", domain))
    })
}

/// Extracts the video id from watch, short, embed, shorts and live URLs.
pub fn parse_youtube_video_id(raw: &str) -> Option<String> {
    let url = parse_http_url(raw).ok()?;
    let candidate = if host_matches(&url, "youtu.be") {
        url.path_segments()?.next().map(str::to_string)
    } else if host_matches(&url, "youtube.com") || host_matches(&url, "youtube-nocookie.com") {
        let mut segments = url.path_segments()?;
        match segments.next() {
            Some("watch") => url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
            Some("embed") | Some("shorts") | Some("live") | Some("v") => {
                segments.next().map(str::to_string)
            }
            _ => None,
        }
    } else {
        None
    }?;
    YOUTUBE_ID_REGEX
        .is_match(&candidate)
        .then_some(candidate)
}

/// Extracts the numeric video id from a full TikTok URL. Short share links
/// carry no id and yield `None`.
pub fn parse_tiktok_video_id(raw: &str) -> Option<String> {
    let url = parse_http_url(raw).ok()?;
    if !host_matches(&url, "tiktok.com") {
        return None;
    }
    TIKTOK_VIDEO_PATH_REGEX
        .captures(url.path())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Validates and normalizes a payload before it is stored.
pub fn normalize_payload(payload: NodePayload) -> Result<NodePayload> {
    match payload {
        NodePayload::Youtube {
            url,
            title,
            thumbnail_url,
            transcript,
            ..
        } => {
            let video_id = parse_youtube_video_id(&url).ok_or_else(|| {
                Error::Validation(ValidationError::InvalidUrl(format!(
                    "not a YouTube video URL: {}",
                    url
                )))
            })?;
            Ok(NodePayload::Youtube {
                url: url.trim().to_string(),
                video_id,
                title: normalize_optional(title),
                thumbnail_url: normalize_optional(thumbnail_url),
                transcript,
            })
        }
        NodePayload::Tiktok {
            url,
            video_id,
            title,
            thumbnail_url,
            transcript,
        } => {
            let parsed = parse_http_url(&url)?;
            if !host_matches(&parsed, "tiktok.com") {
                return Err(ValidationError::InvalidUrl(format!(
                    "not a TikTok URL: {}",
                    url
                ))
                .into());
            }
            Ok(NodePayload::Tiktok {
                video_id: parse_tiktok_video_id(&url).or(normalize_optional(video_id)),
                url: url.trim().to_string(),
                title: normalize_optional(title),
                thumbnail_url: normalize_optional(thumbnail_url),
                transcript,
            })
        }
        NodePayload::Website {
            url,
            title,
            markdown,
            screenshot_url,
        } => {
            let parsed = parse_http_url(&url)?;
            Ok(NodePayload::Website {
                url: parsed.to_string(),
                title: normalize_optional(title),
                markdown,
                screenshot_url: normalize_optional(screenshot_url),
            })
        }
        NodePayload::Chat { title, messages } => Ok(NodePayload::Chat {
            title: normalize_optional(Some(title)).unwrap_or_else(|| "New chat".to_string()),
            messages,
        }),
        NodePayload::Group { label } => Ok(NodePayload::Group {
            label: label.trim().to_string(),
        }),
        other => Ok(other),
    }
}

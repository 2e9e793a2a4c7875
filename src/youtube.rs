/// YouTube Data API metadata client
///
/// Fetches per-video metadata (title, duration, publish date) used to
/// validate timestamps and order the report. Failures are recoverable per
/// video: the pipeline retries with exponential backoff, then drops the video
/// and records its id in the excluded list.
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::time::Duration;
use tracing::{info, warn};

use crate::config::YouTubeConfig;
use crate::timestamp::{self, TimestampToken};

/// Metadata for one video, fetched once per unique video id
#[derive(Debug, Clone)]
pub struct VideoMetadata {
    pub title: String,
    pub duration: TimestampToken,
    /// Unix timestamp of the publish date, used as the sort key
    pub upload_timestamp: i64,
    pub upload_date_display: String,
}

/// Errors from the metadata lookup
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("video {0} not found")]
    NotFound(String),

    #[error("api request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected api response: {0}")]
    Malformed(String),
}

/// YouTube Data API v3 client
pub struct YouTubeClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    max_retries: u32,
}

impl YouTubeClient {
    pub fn new(config: &YouTubeConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            endpoint: config.api_endpoint.clone(),
            api_key: config.api_key.clone(),
            max_retries: config.max_retries,
        }
    }

    /// Fetch metadata for a single video id
    pub async fn fetch_metadata(&self, video_id: &str) -> Result<VideoMetadata, MetadataError> {
        let url = url::Url::parse_with_params(
            &self.endpoint,
            &[
                ("part", "contentDetails,snippet"),
                ("id", video_id),
                ("key", self.api_key.as_str()),
            ],
        )
        .map_err(|e| MetadataError::Malformed(format!("bad endpoint: {}", e)))?;

        let response = self.client.get(url).send().await?;
        let response = response.error_for_status()?;
        let body: serde_json::Value = response.json().await?;

        parse_video_response(video_id, &body)
    }

    /// Fetch metadata with bounded exponential backoff.
    ///
    /// Retries transient failures (2^attempt seconds between attempts); a
    /// definitive not-found is returned immediately.
    pub async fn fetch_with_retry(&self, video_id: &str) -> Result<VideoMetadata, MetadataError> {
        let mut last_error = None;

        for attempt in 0..self.max_retries {
            match self.fetch_metadata(video_id).await {
                Ok(metadata) => {
                    info!("📹 Fetched metadata for {}: {}", video_id, metadata.title);
                    return Ok(metadata);
                }
                Err(MetadataError::NotFound(id)) => return Err(MetadataError::NotFound(id)),
                Err(e) => {
                    last_error = Some(e);
                    if attempt < self.max_retries - 1 {
                        let delay = Duration::from_secs(2_u64.pow(attempt));
                        warn!(
                            "Metadata fetch attempt {} for {} failed, retrying in {:?}",
                            attempt + 1,
                            video_id,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| MetadataError::Malformed("all fetch attempts failed".to_string())))
    }
}

/// Extract the fields the report needs from a `videos.list` response
fn parse_video_response(
    video_id: &str,
    body: &serde_json::Value,
) -> Result<VideoMetadata, MetadataError> {
    let item = body["items"]
        .as_array()
        .and_then(|items| items.first())
        .ok_or_else(|| MetadataError::NotFound(video_id.to_string()))?;

    let title = item["snippet"]["title"]
        .as_str()
        .ok_or_else(|| MetadataError::Malformed("missing snippet.title".to_string()))?
        .to_string();

    let duration_raw = item["contentDetails"]["duration"]
        .as_str()
        .ok_or_else(|| MetadataError::Malformed("missing contentDetails.duration".to_string()))?;
    let duration = parse_duration(duration_raw)
        .map_err(|_| MetadataError::Malformed(format!("bad duration: {}", duration_raw)))?;

    let published_at = item["snippet"]["publishedAt"]
        .as_str()
        .ok_or_else(|| MetadataError::Malformed("missing snippet.publishedAt".to_string()))?;
    let published = published_at
        .parse::<DateTime<Utc>>()
        .map_err(|_| MetadataError::Malformed(format!("bad publishedAt: {}", published_at)))?;

    Ok(VideoMetadata {
        title,
        duration,
        upload_timestamp: published.timestamp(),
        upload_date_display: published.format("%B %-d, %Y").to_string(),
    })
}

/// Parse a video duration, accepting both the API's ISO-8601 form
/// (`PT1H2M3S`) and an already canonical `HH:MM:SS` string
pub fn parse_duration(raw: &str) -> Result<TimestampToken, timestamp::NormalizeError> {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix("PT") {
        return parse_iso8601_body(rest)
            .ok_or_else(|| timestamp::NormalizeError::NotNumeric(raw.to_string()));
    }
    timestamp::normalize(trimmed)
}

fn parse_iso8601_body(body: &str) -> Option<TimestampToken> {
    let mut total: u64 = 0;
    let mut digits = String::new();

    for ch in body.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        let value: u64 = digits.parse().ok()?;
        digits.clear();
        match ch {
            'H' => total += value * 3600,
            'M' => total += value * 60,
            'S' => total += value,
            _ => return None,
        }
    }

    if !digits.is_empty() {
        return None;
    }
    Some(TimestampToken::from_seconds(total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_iso8601_duration() {
        assert_eq!(parse_duration("PT1H2M3S").unwrap().canonical(), "01:02:03");
        assert_eq!(parse_duration("PT45M").unwrap().canonical(), "00:45:00");
        assert_eq!(parse_duration("PT30S").unwrap().canonical(), "00:00:30");
        assert_eq!(parse_duration("PT2H").unwrap().canonical(), "02:00:00");
    }

    #[test]
    fn test_parse_canonical_duration() {
        assert_eq!(parse_duration("01:30:00").unwrap().canonical(), "01:30:00");
    }

    #[test]
    fn test_parse_rejects_garbage_duration() {
        assert!(parse_duration("PT1X").is_err());
        assert!(parse_duration("forever").is_err());
        assert!(parse_duration("PT1H30").is_err());
    }

    #[test]
    fn test_parse_video_response() {
        let body = json!({
            "items": [{
                "snippet": {
                    "title": "Final Table Highlights",
                    "publishedAt": "2025-03-01T12:00:00Z"
                },
                "contentDetails": { "duration": "PT1H15M" }
            }]
        });

        let metadata = parse_video_response("abc123", &body).unwrap();
        assert_eq!(metadata.title, "Final Table Highlights");
        assert_eq!(metadata.duration.canonical(), "01:15:00");
        assert_eq!(metadata.upload_timestamp, 1740830400);
        assert_eq!(metadata.upload_date_display, "March 1, 2025");
    }

    #[test]
    fn test_parse_empty_items_is_not_found() {
        let body = json!({ "items": [] });
        assert!(matches!(
            parse_video_response("abc123", &body),
            Err(MetadataError::NotFound(_))
        ));
    }

    #[test]
    fn test_parse_missing_duration_is_malformed() {
        let body = json!({
            "items": [{
                "snippet": { "title": "t", "publishedAt": "2025-03-01T12:00:00Z" },
                "contentDetails": {}
            }]
        });
        assert!(matches!(
            parse_video_response("abc123", &body),
            Err(MetadataError::Malformed(_))
        ));
    }
}

//! 频道视频列表
//!
//! 通过 rss2json 把频道的 RSS 转为 JSON，结果按频道缓存在查询缓存中。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::time::Duration;

use crate::cache::QueryKey;
use crate::config::AppConfig;
use crate::errors::{BecanizadoError, Result};
use crate::models::channel::entities::{ChannelVideo, ChannelVideosParams, ChannelVideosResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::get_query_cache;

const FEED_BASE_URL: &str = "https://www.youtube.com/feeds/videos.xml?channel_id=";

static CHANNEL_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("Invalid channel id regex"));

#[derive(Debug, Deserialize)]
struct FeedResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    items: Vec<FeedItem>,
}

#[derive(Debug, Deserialize)]
struct FeedItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    thumbnail: String,
    #[serde(default, rename = "pubDate")]
    pub_date: String,
}

/// 解析 rss2json 的响应体
fn parse_feed(body: &str) -> Result<Vec<ChannelVideo>> {
    let feed: FeedResponse = serde_json::from_str(body)?;
    if feed.status != "ok" {
        return Err(BecanizadoError::upstream(
            feed.message
                .unwrap_or_else(|| format!("Feed returned status {}", feed.status)),
        ));
    }

    Ok(feed
        .items
        .into_iter()
        .map(|item| ChannelVideo {
            title: item.title,
            link: item.link,
            thumbnail: item.thumbnail,
            pub_date: item.pub_date,
        })
        .collect())
}

pub struct ChannelService {
    client: reqwest::Client,
}

impl ChannelService {
    pub fn new_lazy() -> Self {
        let timeout = Duration::from_secs(AppConfig::get().channel.timeout);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                reqwest::Client::new()
            });
        Self { client }
    }

    async fn fetch_videos(&self, channel_id: &str) -> Result<Vec<ChannelVideo>> {
        let config = &AppConfig::get().channel;
        let rss_url = format!("{FEED_BASE_URL}{channel_id}");

        let response = self
            .client
            .get(&config.api_url)
            .query(&[("rss_url", rss_url.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(BecanizadoError::upstream(format!(
                "Feed service responded with {status}"
            )));
        }

        parse_feed(&body)
    }

    // 频道视频
    pub async fn list_videos(
        &self,
        request: &HttpRequest,
        query: ChannelVideosParams,
    ) -> ActixResult<HttpResponse> {
        let channel_id = query
            .channel_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| AppConfig::get().channel.channel_id.clone());

        if !CHANNEL_ID_RE.is_match(&channel_id) {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "Invalid channel id",
            )));
        }

        let cache = get_query_cache(request);
        let result = cache
            .fetch(&QueryKey::ChannelVideos(channel_id.clone()), || {
                self.fetch_videos(&channel_id)
            })
            .await;

        match result {
            Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                ChannelVideosResponse { channel_id, items },
                "Videos retrieved successfully",
            ))),
            Err(e) => {
                tracing::warn!("Channel feed for {} failed: {}", channel_id, e);
                Ok(HttpResponse::BadGateway().json(ApiResponse::error_empty(
                    ErrorCode::ChannelFeedFailed,
                    e.message(),
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feed_items() {
        let body = r#"{
            "status": "ok",
            "feed": {"title": "Canal"},
            "items": [
                {
                    "title": "Clase 1",
                    "pubDate": "2024-03-01 10:00:00",
                    "link": "https://www.youtube.com/watch?v=abc",
                    "thumbnail": "https://i.ytimg.com/vi/abc/hqdefault.jpg",
                    "description": "..."
                }
            ]
        }"#;
        let videos = parse_feed(body).unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].title, "Clase 1");
        assert_eq!(videos[0].pub_date, "2024-03-01 10:00:00");
        assert_eq!(videos[0].thumbnail, "https://i.ytimg.com/vi/abc/hqdefault.jpg");
    }

    #[test]
    fn test_parse_feed_error_status() {
        let body = r#"{"status": "error", "message": "Cannot download this RSS feed"}"#;
        let err = parse_feed(body).unwrap_err();
        assert!(matches!(err, BecanizadoError::Upstream(_)));
        assert_eq!(err.message(), "Cannot download this RSS feed");
    }

    #[test]
    fn test_parse_feed_rejects_garbage() {
        assert!(parse_feed("<html>").is_err());
    }

    #[test]
    fn test_channel_id_pattern() {
        assert!(CHANNEL_ID_RE.is_match("UCC845Rgvir2wWzJLKKy-c5g"));
        assert!(!CHANNEL_ID_RE.is_match("abc&rss_url=evil"));
    }
}

//! LinkedIn scraper API on RapidAPI.
//!
//! Endpoints used: `/profile/posts` (posts plus author info, which doubles as the
//! profile lookup) and `/post/comments`. Response shapes vary between API
//! versions, so everything goes through the lenient `normalize_*` helpers.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::linkedin::source::{Experience, Post, PostBatch, PostComment, Profile, ProfileSource};
use crate::linkedin::username::{extract_username, profile_url};

const REQUEST_TIMEOUT_SECS: u64 = 20;
/// Epoch values above this are milliseconds.
const MILLIS_THRESHOLD: i64 = 10_000_000_000;
const MAX_EXPERIENCE: usize = 5;

/// Recency windows tried in order, with the post count below which the next
/// (wider) window is tried.
const RECENCY_WINDOWS: [(i64, usize); 4] = [(3, 3), (7, 5), (21, 8), (30, 0)];

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Clone)]
pub struct RapidApiSource {
    client: Client,
    api_key: String,
    host: String,
    base_url: String,
}

impl RapidApiSource {
    pub fn new(api_key: String, host: String, base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            host,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.host)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }
        Ok(response.json().await?)
    }

    async fn fetch_raw_posts(&self, username: &str) -> Result<Vec<Value>, FetchError> {
        let data = self
            .get_json("/profile/posts", &[("username", username), ("page_number", "1")])
            .await?;
        Ok(extract_posts_array(&data))
    }

    async fn try_fetch_profile(&self, linkedin_url: &str) -> Result<Profile, FetchError> {
        let username = extract_username(linkedin_url);
        info!("Fetching profile: {username}");
        let posts = self.fetch_raw_posts(&username).await?;

        let author = posts
            .first()
            .map(|p| p.get("post").unwrap_or(p))
            .and_then(|p| p.get("author"));

        let mut profile = match author {
            Some(author) => normalize_profile(author),
            None => Profile::default(),
        };
        if profile.name.is_empty() {
            profile.name = username.clone();
        }
        if profile.profile_url.is_empty() {
            profile.profile_url = profile_url(&username);
        }
        Ok(profile)
    }
}

#[async_trait]
impl ProfileSource for RapidApiSource {
    fn name(&self) -> &'static str {
        "rapidapi"
    }

    async fn fetch_profile(&self, linkedin_url: &str) -> Profile {
        match self.try_fetch_profile(linkedin_url).await {
            Ok(profile) => {
                info!("Fetched profile: {}", profile.name);
                profile
            }
            Err(FetchError::RateLimited) => {
                error!("RapidAPI rate limit exceeded, wait before the next request");
                Profile::empty(linkedin_url)
            }
            Err(e) => {
                error!("Error fetching profile: {e}");
                Profile::empty(linkedin_url)
            }
        }
    }

    async fn fetch_posts(&self, linkedin_url: &str, max_posts: usize, max_days: i64) -> PostBatch {
        let username = extract_username(linkedin_url);
        info!("Fetching posts for {username} from the last {max_days} days");

        let raw = match self.fetch_raw_posts(&username).await {
            Ok(raw) => raw,
            Err(e) => {
                error!("Error fetching posts: {e}");
                return PostBatch::empty(max_days, Some(format!("Could not fetch posts: {e}")));
            }
        };

        let posts: Vec<Post> = raw.iter().map(normalize_post).collect();
        smart_recency_filter(posts, max_posts, max_days, Utc::now())
    }

    async fn fetch_post_comments(&self, post_id: &str, max_comments: usize) -> Vec<PostComment> {
        let data = match self
            .get_json("/post/comments", &[("post_id", post_id), ("page_number", "1")])
            .await
        {
            Ok(data) => data,
            Err(e) => {
                error!("Error fetching comments: {e}");
                return Vec::new();
            }
        };

        let comments = match &data {
            Value::Array(items) => items.clone(),
            Value::Object(obj) => obj
                .get("comments")
                .or_else(|| obj.get("data"))
                .and_then(|v| match v {
                    Value::Array(items) => Some(items.clone()),
                    Value::Object(inner) => inner.get("comments").and_then(Value::as_array).cloned(),
                    _ => None,
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        };

        comments.iter().take(max_comments).map(normalize_comment).collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Recency filtering
// ────────────────────────────────────────────────────────────────────────────

/// Picks the narrowest window (3, 7, 21, 30 days, capped at `max_days`) that has
/// enough posts, widening while the count stays under 3, 5 and 8 respectively.
/// Posts without a date count as recent.
pub fn smart_recency_filter(
    posts: Vec<Post>,
    max_posts: usize,
    max_days: i64,
    now: DateTime<Utc>,
) -> PostBatch {
    let mut windows: Vec<(i64, usize)> = RECENCY_WINDOWS
        .iter()
        .copied()
        .filter(|(days, _)| *days < max_days)
        .collect();
    windows.push((max_days, 0));

    let mut chosen: Vec<Post> = Vec::new();
    for (days, expand_below) in windows {
        let in_window: Vec<Post> = posts
            .iter()
            .filter(|p| within_days(p, days, now))
            .cloned()
            .collect();
        if in_window.is_empty() {
            debug!("No posts in the last {days} days, widening");
            continue;
        }
        let count = in_window.len();
        chosen = in_window;
        if count >= max_posts || count >= expand_below {
            debug!("{count} posts in the last {days} days is enough");
            break;
        }
        debug!("Only {count} posts in the last {days} days, widening");
    }

    if chosen.is_empty() {
        warn!("No posts found in the last {max_days} days");
        return PostBatch::empty(
            max_days,
            Some(format!(
                "No posts found in the last {max_days} days. User may be inactive."
            )),
        );
    }

    chosen.sort_by(|a, b| b.posted_date.unwrap_or(now).cmp(&a.posted_date.unwrap_or(now)));
    let total_found = chosen.len();
    chosen.truncate(max_posts);
    info!("Final: {total_found} recent posts");

    PostBatch {
        posts: chosen,
        has_recent_posts: true,
        total_found,
        date_range: format!("Last {max_days} days"),
        message: None,
    }
}

fn within_days(post: &Post, days: i64, now: DateTime<Utc>) -> bool {
    match post.posted_date {
        Some(date) => date >= now - chrono::Duration::days(days),
        None => true,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Normalization
// ────────────────────────────────────────────────────────────────────────────

/// Finds the posts array in the shapes the API has been seen to return:
/// `{"success":true,"data":{"posts":[..]}}`, `{"data":[..]}`, `{"posts":[..]}` or `[..]`.
pub fn extract_posts_array(data: &Value) -> Vec<Value> {
    let found = match data {
        Value::Array(items) => Some(items),
        Value::Object(obj) => match obj.get("data") {
            Some(Value::Object(inner)) => inner.get("posts").and_then(Value::as_array),
            Some(Value::Array(items)) => Some(items),
            _ => obj.get("posts").and_then(Value::as_array),
        },
        _ => None,
    };
    found
        .map(|items| items.iter().filter(|v| v.is_object()).cloned().collect())
        .unwrap_or_default()
}

/// Parses a post date from epoch seconds, epoch milliseconds or an ISO-8601 string.
pub fn parse_date_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let raw = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            if raw > MILLIS_THRESHOLD {
                Utc.timestamp_millis_opt(raw).single()
            } else {
                Utc.timestamp_opt(raw, 0).single()
            }
        }
        Value::String(s) => parse_date_str(s),
        Value::Object(obj) => obj
            .get("timestamp")
            .and_then(parse_date_value)
            .or_else(|| obj.get("date").and_then(parse_date_value)),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn post_date(post: &Value) -> Option<DateTime<Utc>> {
    ["posted_at", "publishedAt", "createdAt", "postedAt", "timestamp", "date"]
        .iter()
        .filter_map(|key| post.get(*key))
        .find_map(parse_date_value)
}

/// First non-empty string among `keys`.
fn str_field(value: &Value, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|k| value.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// First numeric value among `keys`.
fn u64_field(value: &Value, keys: &[&str]) -> u64 {
    keys.iter()
        .filter_map(|k| value.get(*k))
        .find_map(|v| v.as_u64().or_else(|| v.as_f64().map(|f| f.max(0.0) as u64)))
        .unwrap_or(0)
}

fn full_name(person: &Value) -> String {
    let first = str_field(person, &["first_name", "firstName"]);
    let last = str_field(person, &["last_name", "lastName"]);
    let joined = format!("{first} {last}").trim().to_string();
    if !joined.is_empty() {
        return joined;
    }
    str_field(person, &["name", "fullName", "username"])
}

pub fn normalize_profile(data: &Value) -> Profile {
    let p = data.get("profile").unwrap_or(data);

    let experience = p
        .get("experience")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter(|e| e.is_object())
                .take(MAX_EXPERIENCE)
                .map(|e| Experience {
                    title: str_field(e, &["title", "position"]),
                    company: str_field(e, &["companyName", "company"]),
                    duration: str_field(e, &["duration"]),
                    description: str_field(e, &["description"]),
                })
                .collect()
        })
        .unwrap_or_default();

    let skills = p
        .get("skills")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|s| match s {
                    Value::String(name) => Some(name.clone()),
                    Value::Object(_) => Some(str_field(s, &["name", "title"])),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Profile {
        name: full_name(p),
        headline: str_field(p, &["headline"]),
        about: str_field(p, &["about", "summary"]),
        experience,
        education: p
            .get("education")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        skills,
        location: str_field(p, &["location"]),
        connections: u64_field(p, &["connectionsCount", "connections"]),
        followers: u64_field(p, &["followersCount", "followers"]),
        profile_url: str_field(p, &["profile_url", "url"]),
        profile_picture: str_field(p, &["profile_picture", "photoUrl"]),
    }
}

pub fn normalize_post(raw: &Value) -> Post {
    let p = raw.get("post").unwrap_or(raw);
    let empty = Value::Null;
    let stats = p.get("stats").unwrap_or(&empty);
    let author = p.get("author").unwrap_or(&empty);

    let post_id = p
        .get("urn")
        .and_then(|u| u.get("activity_urn"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| str_field(p, &["full_urn", "id", "urn"]));

    Post {
        post_id,
        content: str_field(p, &["text", "commentary", "caption", "content"]),
        posted_date: post_date(p),
        likes_count: u64_field(stats, &["total_reactions", "like"]),
        comments_count: u64_field(stats, &["comments"]),
        shares_count: u64_field(stats, &["reposts", "shares"]),
        media_type: detect_media_type(p).to_string(),
        author: full_name(author),
        post_url: str_field(p, &["url", "postUrl", "post_url"]),
    }
}

pub fn normalize_comment(raw: &Value) -> PostComment {
    let c = raw.get("comment").unwrap_or(raw);
    let author = match c.get("author") {
        Some(a @ Value::Object(_)) => full_name(a),
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    };
    PostComment {
        comment_id: str_field(c, &["id", "urn"]),
        comment_text: str_field(c, &["text", "content", "comment_text"]),
        author,
        posted_date: str_field(c, &["publishedAt", "createdAt"]),
        likes_count: u64_field(c, &["likesCount", "likes"]),
    }
}

fn detect_media_type(post: &Value) -> &'static str {
    let present = |key: &str| post.get(key).is_some_and(|v| !v.is_null() && v != &Value::Bool(false));
    if present("images") || present("image") {
        "image"
    } else if present("video") {
        "video"
    } else if present("article") || present("articleUrl") {
        "article"
    } else if present("document") {
        "document"
    } else {
        "text"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post_days_ago(id: &str, days: i64, now: DateTime<Utc>) -> Post {
        Post {
            post_id: id.to_string(),
            posted_date: Some(now - chrono::Duration::days(days)),
            ..Post::default()
        }
    }

    #[test]
    fn test_extract_posts_array_shapes() {
        let nested = json!({"success": true, "data": {"posts": [{"text": "a"}]}});
        let flat = json!({"data": [{"text": "a"}, {"text": "b"}]});
        let list = json!([{"text": "a"}, "junk"]);
        assert_eq!(extract_posts_array(&nested).len(), 1);
        assert_eq!(extract_posts_array(&flat).len(), 2);
        assert_eq!(extract_posts_array(&list).len(), 1);
        assert!(extract_posts_array(&json!({"error": "x"})).is_empty());
    }

    #[test]
    fn test_parse_date_seconds_and_millis() {
        let secs = parse_date_value(&json!(1_700_000_000)).unwrap();
        let millis = parse_date_value(&json!(1_700_000_000_000i64)).unwrap();
        assert_eq!(secs, millis);
    }

    #[test]
    fn test_parse_date_strings() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_date_value(&json!("2024-05-01T12:30:00Z")), Some(expected));
        assert_eq!(parse_date_value(&json!("2024-05-01T12:30:00")), Some(expected));
        assert_eq!(parse_date_value(&json!("2024-05-01 12:30:00")), Some(expected));
        assert!(parse_date_value(&json!("yesterday")).is_none());
    }

    #[test]
    fn test_parse_posted_at_object() {
        let value = json!({"timestamp": 1_700_000_000_000i64, "date": "2023-11-14"});
        assert_eq!(parse_date_value(&value), Utc.timestamp_opt(1_700_000_000, 0).single());
    }

    #[test]
    fn test_normalize_post_nested_shape() {
        let raw = json!({
            "post": {
                "urn": {"activity_urn": "7100"},
                "text": "Shipped v2",
                "posted_at": {"timestamp": 1_700_000_000_000i64},
                "stats": {"total_reactions": 12, "comments": 3, "reposts": 1},
                "author": {"first_name": "Jane", "last_name": "Doe"},
                "images": [{"url": "x"}],
                "url": "https://linkedin.com/feed/update/7100"
            }
        });
        let post = normalize_post(&raw);
        assert_eq!(post.post_id, "7100");
        assert_eq!(post.content, "Shipped v2");
        assert_eq!(post.likes_count, 12);
        assert_eq!(post.comments_count, 3);
        assert_eq!(post.shares_count, 1);
        assert_eq!(post.media_type, "image");
        assert_eq!(post.author, "Jane Doe");
        assert!(post.posted_date.is_some());
    }

    #[test]
    fn test_normalize_profile_names_and_experience() {
        let raw = json!({
            "profile": {
                "first_name": "Ada",
                "last_name": "Lovelace",
                "headline": "Engineer",
                "summary": "Writes programs",
                "experience": [{"position": "Analyst", "companyName": "Engines Ltd"}],
                "skills": ["Math", {"name": "Poetry"}],
                "followersCount": 1200
            }
        });
        let profile = normalize_profile(&raw);
        assert_eq!(profile.name, "Ada Lovelace");
        assert_eq!(profile.about, "Writes programs");
        assert_eq!(profile.experience[0].title, "Analyst");
        assert_eq!(profile.experience[0].company, "Engines Ltd");
        assert_eq!(profile.skills, vec!["Math", "Poetry"]);
        assert_eq!(profile.followers, 1200);
    }

    #[test]
    fn test_normalize_comment() {
        let raw = json!({"id": "c1", "text": "Nice", "author": {"name": "Bob"}, "likesCount": 4});
        let comment = normalize_comment(&raw);
        assert_eq!(comment.comment_id, "c1");
        assert_eq!(comment.comment_text, "Nice");
        assert_eq!(comment.author, "Bob");
        assert_eq!(comment.likes_count, 4);
    }

    #[test]
    fn test_recency_stops_at_three_days_when_enough() {
        let now = Utc::now();
        let posts = (0..4).map(|i| post_days_ago(&i.to_string(), 1, now)).collect();
        let batch = smart_recency_filter(posts, 10, 30, now);
        assert_eq!(batch.total_found, 4);
        assert!(batch.has_recent_posts);
    }

    #[test]
    fn test_recency_widens_until_threshold() {
        let now = Utc::now();
        let posts = vec![
            post_days_ago("a", 1, now),
            post_days_ago("b", 5, now),
            post_days_ago("c", 15, now),
            post_days_ago("d", 25, now),
            post_days_ago("old", 60, now),
        ];
        // 3d: 1 (<3), 7d: 2 (<5), 21d: 3 (<8), 30d: 4
        let batch = smart_recency_filter(posts, 10, 30, now);
        assert_eq!(batch.total_found, 4);
        assert_eq!(batch.posts[0].post_id, "a");
        assert!(batch.posts.iter().all(|p| p.post_id != "old"));
    }

    #[test]
    fn test_recency_caps_at_max_days_and_max_posts() {
        let now = Utc::now();
        let posts = (0..10).map(|i| post_days_ago(&i.to_string(), i + 1, now)).collect();
        // 3d window already holds 3 posts, more than max_posts
        let batch = smart_recency_filter(posts, 2, 5, now);
        assert_eq!(batch.posts.len(), 2);
        assert_eq!(batch.total_found, 3);
        assert_eq!(batch.date_range, "Last 5 days");

        let sparse = vec![post_days_ago("a", 4, now), post_days_ago("b", 9, now)];
        let batch = smart_recency_filter(sparse, 10, 5, now);
        assert_eq!(batch.total_found, 1);
        assert_eq!(batch.posts[0].post_id, "a");
    }

    #[test]
    fn test_undated_posts_count_as_recent() {
        let now = Utc::now();
        let batch = smart_recency_filter(vec![Post::default()], 5, 30, now);
        assert_eq!(batch.total_found, 1);
    }

    #[test]
    fn test_no_recent_posts_message() {
        let now = Utc::now();
        let batch = smart_recency_filter(vec![post_days_ago("old", 90, now)], 5, 30, now);
        assert!(!batch.has_recent_posts);
        assert!(batch.message.unwrap_or_default().contains("30 days"));
    }
}

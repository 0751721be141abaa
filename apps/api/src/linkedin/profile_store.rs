//! JSON voice-profile files, one `<username>.json` per user.
//!
//! Profiles are free-form JSON (the analyzer reads many optional sections), so
//! they are kept as `serde_json::Value` and only the sections this module
//! touches are interpreted.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::linkedin::source::{Experience, Profile};
use crate::linkedin::username::profile_url;

const PROFILE_VERSION: &str = "1.0";

#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    /// Opens the profile directory, creating it if needed.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, AppError> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::Storage(format!("cannot create {}: {e}", dir.display())))?;
        info!("User profiles directory: {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, username: &str) -> PathBuf {
        let safe = username.replace(['/', '\\'], "_");
        self.dir.join(format!("{safe}.json"))
    }

    /// Writes the profile, stamping a `_metadata` block with username and time.
    pub async fn save(&self, username: &str, mut profile: Value) -> Result<(), AppError> {
        if let Value::Object(obj) = &mut profile {
            obj.insert(
                "_metadata".to_string(),
                json!({
                    "username": username,
                    "last_updated": Utc::now().to_rfc3339(),
                    "version": PROFILE_VERSION,
                }),
            );
        } else {
            return Err(AppError::Validation(
                "profile must be a JSON object".to_string(),
            ));
        }

        let body = serde_json::to_vec_pretty(&profile)
            .map_err(|e| AppError::Storage(format!("cannot serialize profile {username}: {e}")))?;
        tokio::fs::write(self.path_for(username), body)
            .await
            .map_err(|e| AppError::Storage(format!("cannot write profile {username}: {e}")))?;
        info!("Saved profile: {username}");
        Ok(())
    }

    /// Loads a profile. Missing files are `Ok(None)`; unreadable or invalid JSON is an error.
    pub async fn load(&self, username: &str) -> Result<Option<Value>, AppError> {
        let path = self.path_for(username);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Profile not found: {username}");
                return Ok(None);
            }
            Err(e) => {
                return Err(AppError::Storage(format!("cannot read profile {username}: {e}")))
            }
        };
        let profile = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::Storage(format!("profile {username} is not valid JSON: {e}")))?;
        Ok(Some(profile))
    }

    pub async fn exists(&self, username: &str) -> bool {
        tokio::fs::try_exists(self.path_for(username))
            .await
            .unwrap_or(false)
    }

    /// Returns true if a file was removed.
    pub async fn delete(&self, username: &str) -> Result<bool, AppError> {
        match tokio::fs::remove_file(self.path_for(username)).await {
            Ok(()) => {
                info!("Deleted profile: {username}");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::Storage(format!("cannot delete profile {username}: {e}"))),
        }
    }

    /// Usernames of all stored profiles, sorted.
    pub async fn list(&self) -> Result<Vec<String>, AppError> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| AppError::Storage(format!("cannot list profiles: {e}")))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AppError::Storage(format!("cannot list profiles: {e}")))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Appends a comment to `real_comments` unless it is already there.
    /// Returns false when the profile is missing or the comment is a duplicate.
    pub async fn add_comment_sample(&self, username: &str, comment: &str) -> Result<bool, AppError> {
        let Some(mut profile) = self.load(username).await? else {
            return Ok(false);
        };
        let Some(obj) = profile.as_object_mut() else {
            warn!("Profile {username} is not a JSON object");
            return Ok(false);
        };

        let comments = obj
            .entry("real_comments")
            .or_insert_with(|| Value::Array(Vec::new()));
        let Some(list) = comments.as_array_mut() else {
            return Ok(false);
        };
        if list.iter().any(|c| c.as_str() == Some(comment)) {
            return Ok(false);
        }
        list.push(Value::String(comment.to_string()));
        let total = list.len();

        let analysis = obj.entry("analysis").or_insert_with(|| json!({}));
        if let Some(analysis) = analysis.as_object_mut() {
            analysis.insert("total_comments_analyzed".to_string(), json!(total));
        }

        self.save(username, profile).await?;
        Ok(true)
    }

    /// Replaces the `writing_style` section and refreshes `analysis.analyzed_date`.
    pub async fn update_writing_style(&self, username: &str, style: Value) -> Result<bool, AppError> {
        let Some(mut profile) = self.load(username).await? else {
            return Ok(false);
        };
        let Some(obj) = profile.as_object_mut() else {
            return Ok(false);
        };
        obj.insert("writing_style".to_string(), style);
        let analysis = obj.entry("analysis").or_insert_with(|| json!({}));
        if let Some(analysis) = analysis.as_object_mut() {
            analysis.insert("analyzed_date".to_string(), json!(Utc::now().to_rfc3339()));
        }
        self.save(username, profile).await?;
        Ok(true)
    }
}

/// Converts a stored JSON profile into the standard profile shape.
pub fn to_basic_profile(stored: &Value, username: &str) -> Profile {
    let basic = &stored["basic_info"];
    let professional = &stored["professional"];
    let text = |v: &Value, key: &str| v[key].as_str().unwrap_or_default().to_string();

    let experience = professional["experience"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|e| Experience {
                    title: text(e, "title"),
                    company: text(e, "company"),
                    duration: text(e, "duration"),
                    description: text(e, "description"),
                })
                .collect()
        })
        .unwrap_or_default();

    let skills = professional["skills"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let name = text(basic, "name");
    let url = text(basic, "profile_url");
    Profile {
        name: if name.is_empty() { username.to_string() } else { name },
        headline: text(basic, "headline"),
        about: text(basic, "about"),
        location: text(basic, "location"),
        profile_url: if url.is_empty() { profile_url(username) } else { url },
        experience,
        skills,
        ..Profile::default()
    }
}

/// Comment samples stored in a profile, from `real_comment_examples` or
/// `real_comments`. Entries may be plain strings or `{"text": ..}` objects.
pub fn stored_comment_samples(stored: &Value) -> Vec<String> {
    let list = stored["real_comment_examples"]
        .as_array()
        .filter(|a| !a.is_empty())
        .or_else(|| stored["real_comments"].as_array());

    list.map(|items| {
        items
            .iter()
            .filter_map(|c| match c {
                Value::String(s) => Some(s.clone()),
                Value::Object(_) => c["text"].as_str().map(str::to_string),
                _ => None,
            })
            .filter(|s| !s.trim().is_empty())
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> (tempfile::TempDir, ProfileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::open(dir.path().join("profiles")).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_save_load_stamps_metadata() {
        let (_dir, store) = store().await;
        store
            .save("jane-doe", json!({"basic_info": {"name": "Jane"}}))
            .await
            .unwrap();

        let loaded = store.load("jane-doe").await.unwrap().unwrap();
        assert_eq!(loaded["basic_info"]["name"], "Jane");
        assert_eq!(loaded["_metadata"]["username"], "jane-doe");
        assert_eq!(loaded["_metadata"]["version"], "1.0");
        assert!(store.exists("jane-doe").await);
    }

    #[tokio::test]
    async fn test_missing_profile_is_none() {
        let (_dir, store) = store().await;
        assert!(store.load("nobody").await.unwrap().is_none());
        assert!(!store.exists("nobody").await);
        assert!(!store.delete("nobody").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_is_sorted_and_ignores_other_files() {
        let (_dir, store) = store().await;
        store.save("zed", json!({})).await.unwrap();
        store.save("amy", json!({})).await.unwrap();
        tokio::fs::write(store.dir().join("notes.txt"), "x").await.unwrap();
        assert_eq!(store.list().await.unwrap(), vec!["amy", "zed"]);
    }

    #[tokio::test]
    async fn test_username_is_sanitized() {
        let (_dir, store) = store().await;
        store.save("../evil", json!({})).await.unwrap();
        assert_eq!(store.list().await.unwrap(), vec![".._evil"]);
    }

    #[tokio::test]
    async fn test_add_comment_sample_dedups() {
        let (_dir, store) = store().await;
        store.save("jane", json!({"real_comments": ["first"]})).await.unwrap();

        assert!(store.add_comment_sample("jane", "second").await.unwrap());
        assert!(!store.add_comment_sample("jane", "second").await.unwrap());
        assert!(!store.add_comment_sample("ghost", "x").await.unwrap());

        let loaded = store.load("jane").await.unwrap().unwrap();
        assert_eq!(loaded["real_comments"], json!(["first", "second"]));
        assert_eq!(loaded["analysis"]["total_comments_analyzed"], 2);
    }

    #[tokio::test]
    async fn test_update_writing_style() {
        let (_dir, store) = store().await;
        store.save("jane", json!({"writing_style": {"tone": "formal"}})).await.unwrap();
        assert!(store
            .update_writing_style("jane", json!({"tone": "casual"}))
            .await
            .unwrap());
        let loaded = store.load("jane").await.unwrap().unwrap();
        assert_eq!(loaded["writing_style"]["tone"], "casual");
        assert!(loaded["analysis"]["analyzed_date"].is_string());
    }

    #[tokio::test]
    async fn test_delete_removes_file() {
        let (_dir, store) = store().await;
        store.save("jane", json!({})).await.unwrap();
        assert!(store.delete("jane").await.unwrap());
        assert!(!store.exists("jane").await);
    }

    #[test]
    fn test_to_basic_profile() {
        let stored = json!({
            "basic_info": {"name": "Jane Doe", "headline": "PM", "location": "Berlin"},
            "professional": {
                "skills": ["Roadmaps"],
                "experience": [{"title": "PM", "company": "Acme"}]
            }
        });
        let profile = to_basic_profile(&stored, "jane-doe");
        assert_eq!(profile.name, "Jane Doe");
        assert_eq!(profile.profile_url, "https://linkedin.com/in/jane-doe");
        assert_eq!(profile.skills, vec!["Roadmaps"]);
        assert_eq!(profile.experience[0].company, "Acme");
    }

    #[test]
    fn test_stored_comment_samples_accepts_both_shapes() {
        let stored = json!({"real_comment_examples": [{"text": "one"}, "two", {"other": 1}]});
        assert_eq!(stored_comment_samples(&stored), vec!["one", "two"]);

        let fallback = json!({"real_comment_examples": [], "real_comments": ["three"]});
        assert_eq!(stored_comment_samples(&fallback), vec!["three"]);
    }
}

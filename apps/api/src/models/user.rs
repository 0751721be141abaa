use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::voice::VoiceProfile;

/// A user whose voice we write in, loaded from a stored JSON profile.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub linkedin_url: String,
    pub username: String,
    pub name: String,
    pub headline: String,
    pub about: String,
    /// The stored JSON profile as loaded, plus the `voice_profile` snapshot.
    pub profile_data: Json<Value>,
    pub voice_profile: Json<VoiceProfile>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub linkedin_url: String,
    pub username: String,
    pub name: String,
    pub headline: String,
    pub about: String,
    pub profile_data: Value,
    pub voice_profile: VoiceProfile,
}

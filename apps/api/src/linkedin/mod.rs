//! LinkedIn data: profile sources (RapidAPI scraper, mock data), username
//! parsing, the JSON voice-profile store and the routing service.

pub mod mock;
pub mod profile_store;
pub mod rapidapi;
pub mod service;
pub mod source;
pub mod username;

pub use profile_store::ProfileStore;
pub use service::LinkedInService;
pub use source::{Post, PostBatch, PostComment, Profile, ProfileSource};
pub use username::extract_username;

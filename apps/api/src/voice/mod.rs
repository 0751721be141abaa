//! Voice analysis: who the user is as a writer, who the target is, and what
//! a post is about.

pub mod analyzer;
pub mod facts;
pub mod handlers;
pub mod models;
mod prompts;

pub use analyzer::{analyze_post_context, analyze_target_profile, analyze_user_writing_style};
pub use models::{PostContext, TargetInsights, VoiceProfile};

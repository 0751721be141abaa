// Comment generation: sentiment and angle selection, prompt assembly,
// the generate → paraphrase → humanize → validate pipeline and its handlers.
// All LLM calls go through llm_client.

pub mod angles;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod validation;

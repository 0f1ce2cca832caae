// Analysis engine: prompt building, score parsing, optimization policy and
// the per-action pipelines. All model calls go through llm_client::CompletionClient.

pub mod generators;
pub mod handlers;
pub mod optimization;
pub mod pipeline;
pub mod prompts;
pub mod score_parser;

#[cfg(test)]
pub mod testing;

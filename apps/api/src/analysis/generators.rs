//! Single-call operations: one prompt, one completion.

use tracing::{debug, warn};

use crate::analysis::prompts::{build_prompt, Task};
use crate::analysis::score_parser::{parse_score, ParsedScore};
use crate::llm_client::{CompletionClient, LlmError};

/// Builds the task prompt, calls the model at the task temperature and
/// returns the trimmed reply verbatim. No structure validation.
pub async fn generate(
    client: &dyn CompletionClient,
    task: Task,
    cv_text: &str,
    jd_text: &str,
) -> Result<String, LlmError> {
    let prompt = build_prompt(task, cv_text, jd_text);
    let reply = client.complete(&prompt, task.temperature()).await?;
    debug!("{task:?} reply: {} chars", reply.len());
    Ok(reply.trim().to_string())
}

/// Scores a CV against a JD. Transport errors propagate; parse failures do not.
pub async fn score(
    client: &dyn CompletionClient,
    cv_text: &str,
    jd_text: &str,
) -> Result<ParsedScore, LlmError> {
    let reply = generate(client, Task::Score, cv_text, jd_text).await?;
    let parsed = parse_score(&reply);

    debug!("ATS score {} via {:?}", parsed.value, parsed.source);
    if parsed.is_suspect() {
        warn!(
            "ATS score {} is outside 0-100; reply was {:?}",
            parsed.value,
            reply.chars().take(80).collect::<String>()
        );
    }

    Ok(parsed)
}

// Shared prompt fragments.
// Task templates live in analysis/prompts.rs; this file holds cross-cutting pieces.

/// Appended to prompts whose reply is machine-parsed.
pub const JSON_ONLY_INSTRUCTION: &str = "Respond ONLY in raw JSON. No explanations, no extra text, \
    no markdown code fences.";

/// Appended to prompts that rewrite or present the candidate's experience.
pub const HONESTY_INSTRUCTION: &str = "Never invent employers, titles, dates, degrees or metrics \
    that are not present in the CV. Rephrase and reorder; do not fabricate.";

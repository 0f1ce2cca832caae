// All prompt templates for the analysis module.
// Every template embeds the CV and JD verbatim under "CV:" / "JD:" labels.
// Placeholders: {cv_text}, {jd_text}, {json_only}, {honesty}.

use serde::Serialize;

use crate::llm_client::prompts::{HONESTY_INSTRUCTION, JSON_ONLY_INSTRUCTION};

/// The kinds of completion request the assistant issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    Score,
    Rewrite,
    Suggest,
    CoverLetter,
    Interview,
    KeywordReport,
}

impl Task {
    /// Sampling temperature per task. Scoring is pinned to 0 so identical
    /// inputs score identically for a fixed model version.
    pub fn temperature(self) -> f32 {
        match self {
            Task::Score => 0.0,
            Task::KeywordReport => 0.3,
            Task::Rewrite => 0.4,
            Task::Suggest | Task::CoverLetter => 0.5,
            Task::Interview => 0.6,
        }
    }

    fn template(self) -> &'static str {
        match self {
            Task::Score => SCORE_PROMPT_TEMPLATE,
            Task::Rewrite => REWRITE_PROMPT_TEMPLATE,
            Task::Suggest => SUGGEST_PROMPT_TEMPLATE,
            Task::CoverLetter => COVER_LETTER_PROMPT_TEMPLATE,
            Task::Interview => INTERVIEW_PROMPT_TEMPLATE,
            Task::KeywordReport => KEYWORD_REPORT_PROMPT_TEMPLATE,
        }
    }
}

/// Fills the task's template. No escaping or truncation: very long inputs
/// are passed through as-is.
pub fn build_prompt(task: Task, cv_text: &str, jd_text: &str) -> String {
    // Instruction fragments first, texts last, so user text that happens to
    // contain a placeholder is never substituted.
    task.template()
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{honesty}", HONESTY_INSTRUCTION)
        .replace("{jd_text}", jd_text)
        .replacen("{cv_text}", cv_text, 1)
}

pub const SCORE_PROMPT_TEMPLATE: &str = r#"You are an ATS (Applicant Tracking System). Compare the CV with the Job Description
and rate how well the CV matches it, based on keyword match, relevance and context.

CV:
{cv_text}

JD:
{jd_text}

{json_only}
Return exactly this structure:
{
    "ats_score": <number between 0 and 100>
}"#;

pub const REWRITE_PROMPT_TEMPLATE: &str = r#"You are a CV optimization expert.
Rewrite the CV to best match the job description (without lying).
Keep professional formatting.
{honesty}

CV:
{cv_text}

JD:
{jd_text}"#;

pub const SUGGEST_PROMPT_TEMPLATE: &str = r#"Provide actionable suggestions to improve this CV for the job description.
Focus on missing keywords, skills, structure, and formatting.

CV:
{cv_text}

JD:
{jd_text}"#;

pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Write a tailored professional cover letter based on the CV and job description.
{honesty}

CV:
{cv_text}

JD:
{jd_text}"#;

pub const INTERVIEW_PROMPT_TEMPLATE: &str = r#"You are an expert interviewer and career coach.

Task:
- Create 5 interview questions based on the CV and Job Description provided.
- Focus on the most relevant skills, experiences, and responsibilities.
- For each question, also provide a detailed step-by-step sample answer that a strong candidate would give.

Format your response as:
1. Question
- Why this question is important (tie it to CV or JD).
- Step-by-step sample answer (numbered list).
- Key points to highlight.

CV:
{cv_text}

JD:
{jd_text}"#;

pub const KEYWORD_REPORT_PROMPT_TEMPLATE: &str = r#"You are an ATS (Applicant Tracking System) and CV optimization expert.
Evaluate how well the candidate's CV matches the Job Description (JD)
and then provide a clear ATS-style report.

CV:
{cv_text}

JD:
{jd_text}

Your output must include:
1. **ATS Score (0-100%)** - based on keyword match, relevance, and context.
2. **Matched Keywords** - list keywords/phrases from JD found in the CV.
3. **Missing Keywords** - list important JD terms missing in the CV."#;

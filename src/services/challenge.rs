//! Code-challenge judging through the AI collaborator.
//!
//! The service builds the judge prompt and interprets the verdict; it
//! never executes or parses submitted code itself.

use color_eyre::Result;

use crate::ai::GeminiClient;
use crate::db::models::Challenge;

// ---------------------------------------------------------------------------
// AiClient trait (DIP: service defines the abstraction it needs)
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait AiClient: Send + Sync {
    /// Whether an API key is configured (false in dev mode).
    fn is_enabled(&self) -> bool;

    fn generate(&self, prompt: &str) -> impl std::future::Future<Output = Result<String>> + Send;
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

pub enum JudgeOutcome {
    /// Verdict was exactly "correct".
    Correct,
    /// Anything else the judge returned (usually an error message).
    Incorrect(String),
    /// No API key configured; judging is unavailable.
    Unavailable,
}

pub enum AssistOutcome {
    /// Extracted (or lightly formatted) solution text.
    Solution(String),
    Unavailable,
}

// ---------------------------------------------------------------------------
// ChallengeService
// ---------------------------------------------------------------------------

pub struct ChallengeService<A: AiClient = GeminiClient> {
    ai: A,
}

impl<A: AiClient + Clone> Clone for ChallengeService<A> {
    fn clone(&self) -> Self {
        Self {
            ai: self.ai.clone(),
        }
    }
}

impl<A: AiClient> ChallengeService<A> {
    pub fn new(ai: A) -> Self {
        Self { ai }
    }

    pub async fn judge(
        &self,
        challenge: &Challenge,
        code: &str,
        language: Option<&str>,
    ) -> Result<JudgeOutcome> {
        if !self.ai.is_enabled() {
            return Ok(JudgeOutcome::Unavailable);
        }

        let prompt = judge_prompt(challenge, code, language);
        let output = self.ai.generate(&prompt).await?;
        let verdict = output.trim();

        if verdict == "correct" {
            Ok(JudgeOutcome::Correct)
        } else {
            Ok(JudgeOutcome::Incorrect(verdict.to_string()))
        }
    }

    pub async fn assist(&self, query: &str) -> Result<AssistOutcome> {
        if !self.ai.is_enabled() {
            return Ok(AssistOutcome::Unavailable);
        }

        let text = self.ai.generate(query).await?;
        Ok(AssistOutcome::Solution(format_solution(text.trim())))
    }
}

fn judge_prompt(challenge: &Challenge, code: &str, language: Option<&str>) -> String {
    let language = language.unwrap_or("c");
    format!(
        "{title}\n\
         ```{language}\n\
         {code}\n\
         ```\n\n\
         Expected Output:\n\
         {expected}\n\n\
         If the code runs successfully and produces the expected output, return only correct.\n\
         If there is an error, return only the error message.",
        title = challenge.title,
        expected = challenge.expected_output.trim(),
    )
}

/// Keep the first fenced code block when the reply contains one, otherwise
/// break the text into lines at statement boundaries for readability.
fn format_solution(text: &str) -> String {
    if let Some((language, code)) = extract_code_block(text) {
        return format!("```{language}\n{code}\n```");
    }

    text.replace(';', ";\n")
        .replace('{', "{\n")
        .replace('}', "\n}")
}

fn extract_code_block(text: &str) -> Option<(String, String)> {
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];
    let end = after_fence.find("```")?;
    let block = &after_fence[..end];

    let (language, code) = match block.split_once('\n') {
        Some((first_line, rest)) => (first_line.trim().to_string(), rest),
        None => (String::new(), block),
    };

    Some((language, code.trim().to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

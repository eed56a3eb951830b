use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::models::question::{QuestionKind, QuestionRecord};
use crate::services::ai_service::TextGenerator;
use crate::utils::chunk::chunk_text;
use crate::utils::normalize::{choice_label_index, normalize_answer};

pub const DEFAULT_QUESTION_COUNT: usize = 5;
pub const DEFAULT_CHUNK_SIZE: usize = 3000;

const ANSWER_PREFIXES: [&str; 2] = ["correct answer:", "answer:"];
const EXPLANATION_PREFIX: &str = "explanation:";
const OPTION_HEADERS: [&str; 2] = ["options:", "choices:"];
const BULLETS: &[char] = &['-', '–', '•', '+'];

#[derive(Debug, Clone)]
pub struct QuizSettings {
    pub default_count: usize,
    pub max_count: usize,
    pub chunk_size: usize,
    pub generation_timeout: Option<Duration>,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            default_count: DEFAULT_QUESTION_COUNT,
            max_count: 20,
            chunk_size: DEFAULT_CHUNK_SIZE,
            generation_timeout: Some(Duration::from_secs(120)),
        }
    }
}

#[derive(Clone)]
pub struct QuizService {
    generator: Arc<dyn TextGenerator>,
    settings: QuizSettings,
}

impl QuizService {
    pub fn new(generator: Arc<dyn TextGenerator>, settings: QuizSettings) -> Self {
        Self {
            generator,
            settings,
        }
    }

    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    /// Resolves optional request parameters against the configured defaults,
    /// clamping the count to the configured maximum.
    pub fn resolve_params(&self, target_count: Option<usize>, chunk_size: Option<usize>) -> (usize, usize) {
        let count = target_count
            .unwrap_or(self.settings.default_count)
            .min(self.settings.max_count);
        (count, chunk_size.unwrap_or(self.settings.chunk_size))
    }

    /// Builds a quiz of at most `target_count` questions from `transcript`.
    ///
    /// Each word-bounded chunk is sent to the generator in its own task; replies
    /// are parsed in chunk order. Any failed or timed-out call fails the whole
    /// quiz with `GenerationFailed`. Successful calls that yield no usable
    /// question give `EmptyQuiz`.
    pub async fn generate_quiz(
        &self,
        transcript: &str,
        target_count: usize,
        chunk_size: usize,
    ) -> Result<Vec<QuestionRecord>> {
        if transcript.trim().is_empty() {
            return Err(Error::BadRequest("Transcript must not be empty".to_string()));
        }
        if target_count == 0 {
            return Err(Error::BadRequest("Question count must be positive".to_string()));
        }
        if chunk_size == 0 {
            return Err(Error::BadRequest("Chunk size must be positive".to_string()));
        }

        let chunks: Vec<&str> = chunk_text(transcript, chunk_size)
            .into_iter()
            .filter(|c| !c.trim().is_empty())
            .collect();
        tracing::info!(
            chars = transcript.chars().count(),
            chunks = chunks.len(),
            target_count,
            "Generating quiz"
        );

        let handles: Vec<_> = chunks
            .iter()
            .map(|chunk| {
                let generator = Arc::clone(&self.generator);
                let prompt = build_prompt(chunk, target_count);
                let timeout = self.settings.generation_timeout;
                tokio::spawn(async move { request_completion(generator.as_ref(), &prompt, timeout).await })
            })
            .collect();

        let mut replies = Vec::with_capacity(handles.len());
        let mut pending = handles.into_iter();
        while let Some(handle) = pending.next() {
            let outcome = handle
                .await
                .map_err(|e| Error::GenerationFailed(format!("generation task aborted: {}", e)))
                .and_then(|reply| reply);
            match outcome {
                Ok(reply) => replies.push(reply),
                Err(e) => {
                    for rest in pending.by_ref() {
                        rest.abort();
                    }
                    tracing::warn!(error = %e, "Quiz generation failed");
                    return Err(e);
                }
            }
        }

        let mut questions: Vec<QuestionRecord> = replies.iter().flat_map(|r| parse_reply(r)).collect();
        if questions.is_empty() {
            tracing::warn!("Generator replies contained no parseable question");
            return Err(Error::EmptyQuiz);
        }

        questions.truncate(target_count);
        for (idx, q) in questions.iter_mut().enumerate() {
            q.id = (idx as u32) + 1;
        }

        if questions.len() < target_count {
            tracing::warn!(
                produced = questions.len(),
                target_count,
                "Quiz is shorter than requested"
            );
        }
        Ok(questions)
    }
}

async fn request_completion(
    generator: &dyn TextGenerator,
    prompt: &str,
    timeout: Option<Duration>,
) -> Result<String> {
    let call = generator.complete(prompt);
    let reply = match timeout {
        Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
            Error::GenerationFailed(format!("timed out after {:?}", limit))
        })?,
        None => call.await,
    };
    reply.map_err(|e| Error::GenerationFailed(format!("{:#}", e)))
}

pub fn build_prompt(transcript: &str, count: usize) -> String {
    let true_false = count * 2 / 5;
    let multiple_choice = count - true_false;
    format!(
        r#"Based on the following transcript, create {multiple_choice} multiple-choice questions and {true_false} true/false questions.
Each correct answer must be accurate, logically consistent, and clearly derived from the transcript.
Every multiple-choice question must have exactly 4 options. Every true/false question must have exactly the two options True and False.

Write every question in exactly this format and separate questions with one blank line:
Question: <question text>
A) <option>
B) <option>
C) <option>
D) <option>
Answer: <letter>) <option text>
Explanation: <one sentence>

Example of a valid multiple-choice question:
Question: What is the capital of France?
A) Paris
B) London
C) Berlin
D) Madrid
Answer: A) Paris
Explanation: Paris is the capital of France.

Example of a valid true/false question:
Question: Paris is the capital of France.
A) True
B) False
Answer: A) True
Explanation: Paris is the capital of France.

Transcript:
{transcript}
"#
    )
}

/// Parses a model reply into question records.
///
/// Grammar, per blank-line separated block:
///   - first line: the prompt (`Question:`/`Question 2:`/`2.` labels removed)
///   - `Answer:` or `Correct Answer:` line: the correct option, by text or letter
///   - `Explanation:` line: optional explanation
///   - any other line: an option (bullets and asterisks removed)
///
/// Blocks with anything other than 2 or 4 options, or whose answer does not
/// resolve to one of their options, are dropped.
pub fn parse_reply(reply: &str) -> Vec<QuestionRecord> {
    split_blocks(reply)
        .iter()
        .filter_map(|block| {
            let parsed = parse_block(block);
            if parsed.is_none() {
                tracing::debug!(first_line = %block[0], "Dropping malformed question block");
            }
            parsed
        })
        .collect()
}

fn split_blocks(reply: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in reply.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

enum BlockLine {
    Answer(String),
    Explanation(String),
    Option(String),
    Skip,
}

fn classify(line: &str) -> BlockLine {
    let text = clean_line(line);
    let bare = text.trim_start_matches(&['_', '`'][..]);

    for prefix in ANSWER_PREFIXES {
        if let Some(value) = strip_prefix_ignore_case(bare, prefix) {
            return BlockLine::Answer(value.trim().to_string());
        }
    }
    if let Some(value) = strip_prefix_ignore_case(bare, EXPLANATION_PREFIX) {
        return BlockLine::Explanation(value.trim().to_string());
    }
    if text.is_empty() || OPTION_HEADERS.iter().any(|h| text.eq_ignore_ascii_case(h)) {
        return BlockLine::Skip;
    }
    BlockLine::Option(text)
}

fn parse_block(lines: &[&str]) -> Option<QuestionRecord> {
    let (first, rest) = lines.split_first()?;
    if !matches!(classify(first), BlockLine::Option(_)) {
        return None;
    }
    let prompt = clean_prompt(first);
    if prompt.is_empty() {
        return None;
    }

    let mut options = Vec::new();
    let mut answer = None;
    let mut explanation = None;
    for line in rest {
        match classify(line) {
            BlockLine::Answer(value) => answer = Some(value),
            BlockLine::Explanation(value) => explanation = Some(value),
            BlockLine::Option(value) => options.push(value),
            BlockLine::Skip => {}
        }
    }

    let kind = QuestionKind::from_option_count(options.len())?;
    let normalized: Vec<String> = options.iter().map(|o| normalize_answer(o)).collect();
    if normalized.iter().any(|o| o.is_empty())
        || normalized.iter().enumerate().any(|(i, o)| normalized[..i].contains(o))
    {
        return None;
    }

    let correct = resolve_answer(&answer?, &normalized)?;
    let explanation = explanation.filter(|e| !e.is_empty());

    match kind {
        QuestionKind::MultipleChoice => Some(QuestionRecord {
            id: 0,
            prompt,
            kind,
            correct_answer: options[correct].clone(),
            options,
            explanation,
        }),
        QuestionKind::TrueFalse => {
            let first = truth_value(&normalized[0])?;
            let second = truth_value(&normalized[1])?;
            if first == second {
                return None;
            }
            let value = if correct == 0 { first } else { second };
            Some(QuestionRecord::true_false(prompt, value, explanation))
        }
    }
}

fn resolve_answer(answer: &str, normalized_options: &[String]) -> Option<usize> {
    let wanted = normalize_answer(answer);
    let by_text = if wanted.is_empty() {
        None
    } else {
        normalized_options.iter().position(|o| *o == wanted)
    };
    by_text.or_else(|| choice_label_index(answer).filter(|&i| i < normalized_options.len()))
}

fn truth_value(normalized: &str) -> Option<bool> {
    match normalized {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn clean_line(line: &str) -> String {
    line.replace('*', "")
        .trim()
        .trim_start_matches(BULLETS)
        .trim()
        .to_string()
}

fn clean_prompt(line: &str) -> String {
    let text = clean_line(line);
    strip_list_number(strip_question_label(&text))
        .trim()
        .to_string()
}

fn strip_question_label(text: &str) -> &str {
    let Some(rest) = strip_prefix_ignore_case(text, "question") else {
        return text;
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_digit() || c == ' ' || c == '#');
    match rest.strip_prefix(&[':', '.', ')'][..]) {
        Some(body) => body.trim_start(),
        None => text,
    }
}

fn strip_list_number(text: &str) -> &str {
    let body = text.trim_start_matches(|c: char| c.is_ascii_digit());
    if body.len() == text.len() {
        return text;
    }
    match body.strip_prefix(&['.', ')'][..]) {
        Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
        _ => text,
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&text[prefix.len()..])
    } else {
        None
    }
}

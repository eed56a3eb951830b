use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::normalize::normalize_answer;

pub const TRUE_OPTION: &str = "True";
pub const FALSE_OPTION: &str = "False";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionRecord {
    #[serde(default)]
    pub id: u32,
    pub prompt: String,
    pub kind: QuestionKind,
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
}

impl QuestionKind {
    pub fn option_count(self) -> usize {
        match self {
            QuestionKind::MultipleChoice => 4,
            QuestionKind::TrueFalse => 2,
        }
    }

    pub fn from_option_count(count: usize) -> Option<Self> {
        match count {
            4 => Some(QuestionKind::MultipleChoice),
            2 => Some(QuestionKind::TrueFalse),
            _ => None,
        }
    }
}

impl QuestionRecord {
    pub fn true_false(prompt: String, answer: bool, explanation: Option<String>) -> Self {
        let correct = if answer { TRUE_OPTION } else { FALSE_OPTION };
        Self {
            id: 0,
            prompt,
            kind: QuestionKind::TrueFalse,
            options: vec![TRUE_OPTION.to_string(), FALSE_OPTION.to_string()],
            correct_answer: correct.to_string(),
            explanation,
        }
    }

    /// Checks the record invariants: non-empty prompt, option count matching
    /// the kind, and a correct answer that normalizes to one of the options.
    pub fn is_well_formed(&self) -> bool {
        if self.prompt.trim().is_empty() || self.options.len() != self.kind.option_count() {
            return false;
        }
        if self.kind == QuestionKind::TrueFalse
            && (self.options[0] != TRUE_OPTION || self.options[1] != FALSE_OPTION)
        {
            return false;
        }
        let answer = normalize_answer(&self.correct_answer);
        !answer.is_empty() && self.options.iter().any(|o| normalize_answer(o) == answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capital_question() -> QuestionRecord {
        QuestionRecord {
            id: 1,
            prompt: "What is the capital of France?".into(),
            kind: QuestionKind::MultipleChoice,
            options: vec![
                "A) Paris".into(),
                "B) London".into(),
                "C) Berlin".into(),
                "D) Madrid".into(),
            ],
            correct_answer: "A) Paris".into(),
            explanation: Some("Paris is the capital of France.".into()),
        }
    }

    #[test]
    fn kind_follows_option_count() {
        assert_eq!(QuestionKind::from_option_count(4), Some(QuestionKind::MultipleChoice));
        assert_eq!(QuestionKind::from_option_count(2), Some(QuestionKind::TrueFalse));
        assert_eq!(QuestionKind::from_option_count(3), None);
    }

    #[test]
    fn well_formed_requires_matching_answer() {
        let mut q = capital_question();
        assert!(q.is_well_formed());

        q.correct_answer = "Rome".into();
        assert!(!q.is_well_formed());

        q.correct_answer = String::new();
        assert!(!q.is_well_formed());
    }

    #[test]
    fn true_false_has_canonical_options() {
        let q = QuestionRecord::true_false("Paris is in France.".into(), true, None);
        assert_eq!(q.options, vec!["True", "False"]);
        assert_eq!(q.correct_answer, "True");
        assert!(q.is_well_formed());
    }

    #[test]
    fn serializes_kind_in_snake_case() {
        let value = serde_json::to_value(capital_question()).unwrap();
        assert_eq!(value["kind"], "multiple_choice");
        assert_eq!(value["options"].as_array().unwrap().len(), 4);
    }
}

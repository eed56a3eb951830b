use crate::error::{Error, Result};
use crate::models::answer::Verdict;
use crate::models::question::QuestionRecord;
use crate::utils::normalize::normalize_answer;

pub struct GradingService;

impl GradingService {
    /// Compares a submitted option against the stored correct answer after
    /// normalizing both. Exact match only, no partial credit.
    pub fn grade(submitted_answer: &str, question: &QuestionRecord) -> Result<Verdict> {
        let expected = normalize_answer(&question.correct_answer);
        if expected.is_empty() {
            return Err(Error::UngradableQuestion(question.id));
        }

        let correct = normalize_answer(submitted_answer) == expected;
        Ok(Verdict {
            correct,
            correct_answer: (!correct).then(|| question.correct_answer.clone()),
            explanation: question.explanation.clone(),
        })
    }

    /// Grades every question in order, skipping ungradable ones. Returns the
    /// number correct and the number actually graded.
    pub fn score(questions: &[QuestionRecord], answers: &[Option<String>]) -> (u32, u32) {
        let mut earned: u32 = 0;
        let mut graded: u32 = 0;

        for (q, ans) in questions.iter().zip(answers) {
            let Some(ans) = ans else { continue };
            match Self::grade(ans, q) {
                Ok(verdict) => {
                    graded += 1;
                    if verdict.correct {
                        earned += 1;
                    }
                }
                Err(e) => tracing::warn!(question_id = q.id, error = %e, "Skipping question while scoring"),
            }
        }

        (earned, graded)
    }
}

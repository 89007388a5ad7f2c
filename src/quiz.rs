use crate::models::Question;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Question index to the raw text of the chosen option.
pub type AnswerMap = BTreeMap<usize, String>;

/// Immutable view of the quiz being taken. Every event produces a new
/// snapshot instead of patching fields in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuizSnapshot {
    questions: Arc<[Question]>,
    answers: AnswerMap,
    score: Option<usize>,
}

/// Counts shown once the quiz has been submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSummary {
    pub total: usize,
    pub attempted: usize,
    pub not_attempted: usize,
    pub correct: usize,
    pub incorrect: usize,
}

impl QuizSummary {
    pub fn final_score(&self) -> String {
        format!("{} / {}", self.correct, self.total)
    }
}

impl QuizSnapshot {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions: questions.into(),
            answers: AnswerMap::new(),
            score: None,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_submitted(&self) -> bool {
        self.score.is_some()
    }

    pub fn score(&self) -> Option<usize> {
        self.score
    }

    /// Records `option` for question `index`, replacing any earlier choice.
    /// Ignored once submitted or when the index is out of range.
    pub fn with_answer(&self, index: usize, option: &str) -> Self {
        if self.is_submitted() || index >= self.questions.len() {
            return self.clone();
        }
        let mut answers = self.answers.clone();
        answers.insert(index, option.to_string());
        Self {
            questions: Arc::clone(&self.questions),
            answers,
            score: None,
        }
    }

    /// Freezes the answers and records the score. Submitting twice keeps the first score.
    pub fn submitted(&self) -> Self {
        if self.is_submitted() {
            return self.clone();
        }
        Self {
            questions: Arc::clone(&self.questions),
            answers: self.answers.clone(),
            score: Some(self.count_correct()),
        }
    }

    pub fn count_correct(&self) -> usize {
        self.questions
            .iter()
            .enumerate()
            .filter(|(i, q)| self.answer(*i) == Some(q.correct_answer.as_str()))
            .count()
    }

    pub fn summary(&self) -> Option<QuizSummary> {
        let correct = self.score?;
        let total = self.questions.len();
        let attempted = self.answers.len();
        Some(QuizSummary {
            total,
            attempted,
            not_attempted: total.saturating_sub(attempted),
            correct,
            incorrect: attempted.saturating_sub(correct),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, options: &[&str], answer: &str) -> Question {
        Question {
            text: text.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: answer.to_string(),
            explanation: None,
        }
    }

    fn sample() -> QuizSnapshot {
        QuizSnapshot::new(vec![
            question("2+2?", &["3", "4"], "4"),
            question("Capital of France?", &["Paris", "London"], "Paris"),
            question("Largest planet?", &["Mars", "Jupiter"], "Jupiter"),
        ])
    }

    #[test]
    fn test_single_question_scenario() {
        let quiz = QuizSnapshot::new(vec![question("2+2?", &["3", "4"], "4")]);
        let quiz = quiz.with_answer(0, "4").submitted();

        assert_eq!(quiz.score(), Some(1));
        let summary = quiz.summary().unwrap();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.correct, 1);
        assert_eq!(summary.incorrect, 0);
        assert_eq!(summary.not_attempted, 0);
        assert_eq!(summary.final_score(), "1 / 1");
    }

    #[test]
    fn test_selecting_same_option_twice_is_idempotent() {
        let once = sample().with_answer(1, "Paris");
        let twice = once.with_answer(1, "Paris");
        assert_eq!(once.answers(), twice.answers());
    }

    #[test]
    fn test_selection_overwrites_previous_choice() {
        let quiz = sample().with_answer(0, "3").with_answer(0, "4");
        assert_eq!(quiz.answer(0), Some("4"));
        assert_eq!(quiz.answers().len(), 1);
    }

    #[test]
    fn test_answers_frozen_after_submission() {
        let quiz = sample().with_answer(0, "3").submitted();
        let after = quiz.with_answer(0, "4").with_answer(1, "Paris");
        assert_eq!(after.answers(), quiz.answers());
        assert_eq!(after.score(), Some(0));
    }

    #[test]
    fn test_summary_identities() {
        let quiz = sample()
            .with_answer(0, "4")
            .with_answer(1, "London")
            .submitted();
        let summary = quiz.summary().unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.attempted + summary.not_attempted, summary.total);
        assert_eq!(summary.correct + summary.incorrect, summary.attempted);
        assert_eq!(summary.correct, 1);
        assert_eq!(quiz.score(), Some(1));
    }

    #[test]
    fn test_score_uses_exact_string_equality() {
        let quiz = sample().with_answer(1, "paris").with_answer(2, "Jupiter ").submitted();
        assert_eq!(quiz.score(), Some(0));
    }

    #[test]
    fn test_summary_hidden_before_submission() {
        assert!(sample().with_answer(0, "4").summary().is_none());
    }

    #[test]
    fn test_out_of_range_selection_ignored() {
        let quiz = sample().with_answer(10, "4");
        assert!(quiz.answers().is_empty());
    }

    #[test]
    fn test_resubmission_keeps_score() {
        let quiz = sample().with_answer(0, "4").submitted();
        assert_eq!(quiz.submitted(), quiz);
    }
}

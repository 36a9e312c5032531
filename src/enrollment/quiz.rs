//! Pure quiz grading: a submitted answer set against a lesson's quiz
//! definition. No persistence here; the engine stores the outcome.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::courses::types::QuizDefinition;
use crate::enrollment::error::EnrollmentError;

/// Answers keyed by question id, each a set of selected option indices.
pub type SubmittedAnswers = HashMap<String, Vec<usize>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradedQuestion {
    pub question_id: Uuid,
    pub is_correct: bool,
    pub submitted: Vec<usize>,
    pub correct_answers: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradedQuiz {
    pub score: i32,
    pub passed: bool,
    pub per_question: Vec<GradedQuestion>,
}

/// Score a submission. Score is `100 * correct / total`, integer division
/// (rounds down); pass at the definition's passing score (default 70).
/// Unanswered questions count as incorrect. A definition with zero
/// questions has no pass condition and is rejected outright.
pub fn grade(quiz: &QuizDefinition, answers: &SubmittedAnswers) -> Result<GradedQuiz, EnrollmentError> {
    if quiz.questions.is_empty() {
        return Err(EnrollmentError::Validation(
            "Quiz has no questions to grade".to_string(),
        ));
    }

    let mut correct_count = 0usize;
    let mut per_question = Vec::with_capacity(quiz.questions.len());

    for question in &quiz.questions {
        let submitted = answers
            .get(&question.id.to_string())
            .cloned()
            .unwrap_or_default();

        let mut expected = question.correct_answers.clone();
        expected.sort_unstable();
        expected.dedup();
        let mut given = submitted.clone();
        given.sort_unstable();
        given.dedup();

        let is_correct = !expected.is_empty() && given == expected;
        if is_correct {
            correct_count += 1;
        }

        per_question.push(GradedQuestion {
            question_id: question.id,
            is_correct,
            submitted,
            correct_answers: question.correct_answers.clone(),
        });
    }

    let score = (100 * correct_count / quiz.questions.len()) as i32;
    let passed = score >= quiz.passing_score();

    Ok(GradedQuiz {
        score,
        passed,
        per_question,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::courses::types::QuizQuestion;

    fn question(correct: Vec<usize>) -> QuizQuestion {
        QuizQuestion {
            id: Uuid::new_v4(),
            text: "Pick the right option".to_string(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answers: correct,
        }
    }

    fn quiz(passing_score: Option<i32>, questions: Vec<QuizQuestion>) -> QuizDefinition {
        QuizDefinition {
            passing_score,
            questions,
        }
    }

    fn answer(q: &QuizQuestion, picks: Vec<usize>) -> (String, Vec<usize>) {
        (q.id.to_string(), picks)
    }

    #[test]
    fn test_three_of_five_scores_sixty_and_fails() {
        let questions: Vec<_> = (0..5).map(|_| question(vec![0])).collect();
        let answers: SubmittedAnswers = questions
            .iter()
            .enumerate()
            .map(|(i, q)| answer(q, if i < 3 { vec![0] } else { vec![1] }))
            .collect();

        let result = grade(&quiz(Some(70), questions), &answers).unwrap();
        assert_eq!(result.score, 60);
        assert!(!result.passed);
    }

    #[test]
    fn test_score_rounds_down() {
        // 2 of 3 correct = 66.67 -> 66 by integer division.
        let questions: Vec<_> = (0..3).map(|_| question(vec![2])).collect();
        let answers: SubmittedAnswers = questions
            .iter()
            .enumerate()
            .map(|(i, q)| answer(q, if i < 2 { vec![2] } else { vec![0] }))
            .collect();

        let result = grade(&quiz(None, questions), &answers).unwrap();
        assert_eq!(result.score, 66);
    }

    #[test]
    fn test_unanswered_counts_as_incorrect() {
        let questions = vec![question(vec![0]), question(vec![1])];
        let answers: SubmittedAnswers = [answer(&questions[0], vec![0])].into_iter().collect();

        let result = grade(&quiz(None, questions), &answers).unwrap();
        assert_eq!(result.score, 50);
        assert!(!result.per_question[1].is_correct);
        assert!(result.per_question[1].submitted.is_empty());
    }

    #[test]
    fn test_multi_select_order_does_not_matter() {
        let q = question(vec![1, 3]);
        let answers: SubmittedAnswers = [answer(&q, vec![3, 1])].into_iter().collect();

        let result = grade(&quiz(None, vec![q]), &answers).unwrap();
        assert_eq!(result.score, 100);
        assert!(result.passed);
    }

    #[test]
    fn test_partial_multi_select_is_incorrect() {
        let q = question(vec![1, 3]);
        let answers: SubmittedAnswers = [answer(&q, vec![1])].into_iter().collect();

        let result = grade(&quiz(None, vec![q]), &answers).unwrap();
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_default_passing_score_is_seventy() {
        let questions: Vec<_> = (0..10).map(|_| question(vec![0])).collect();
        let answers: SubmittedAnswers = questions
            .iter()
            .enumerate()
            .map(|(i, q)| answer(q, if i < 7 { vec![0] } else { vec![1] }))
            .collect();

        let result = grade(&quiz(None, questions), &answers).unwrap();
        assert_eq!(result.score, 70);
        assert!(result.passed);
    }

    #[test]
    fn test_zero_questions_is_a_validation_error() {
        let result = grade(&quiz(None, vec![]), &SubmittedAnswers::new());
        assert!(matches!(result, Err(EnrollmentError::Validation(_))));
    }
}

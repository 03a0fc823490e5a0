use rand::seq::SliceRandom;

use crate::models::QuizQuestion;

use super::{normalize, Game};

/// How the quiz is presented: every question on one screen with an explicit
/// submit, or one question at a time with instant feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizMode {
    #[default]
    All,
    Interactive,
}

impl QuizMode {
    pub fn from_query(s: &str) -> QuizMode {
        match s {
            "interactive" => QuizMode::Interactive,
            _ => QuizMode::All,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuizGame {
    questions: Vec<QuizQuestion>,
    mode: QuizMode,
    answers: Vec<Option<String>>,
    /// Interactive mode cursor; equal to `questions.len()` when done.
    current: usize,
}

impl QuizGame {
    pub fn new(questions: &[QuizQuestion], mode: QuizMode, shuffle: bool) -> Self {
        let mut questions = questions.to_vec();
        if shuffle {
            questions.shuffle(&mut rand::thread_rng());
        }
        let answers = vec![None; questions.len()];
        QuizGame {
            questions,
            mode,
            answers,
            current: 0,
        }
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn answer_for(&self, index: usize) -> Option<&str> {
        self.answers.get(index)?.as_deref()
    }

    /// All-at-once mode: record (or change) the pick for one question.
    pub fn answer(&mut self, index: usize, option: &str) {
        if self.mode != QuizMode::All {
            return;
        }
        if let Some(slot) = self.answers.get_mut(index) {
            *slot = Some(option.to_string());
        }
    }

    /// Interactive mode: grade the current question and advance. Returns
    /// whether the pick was correct, or `None` when there is no question
    /// left to answer.
    pub fn choose(&mut self, option: &str) -> Option<bool> {
        if self.mode != QuizMode::Interactive {
            return None;
        }
        let question = self.questions.get(self.current)?;
        let correct = normalize(option) == normalize(&question.correct_answer);
        self.answers[self.current] = Some(option.to_string());
        self.current += 1;
        Some(correct)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current)
    }
}

impl Game for QuizGame {
    fn total(&self) -> usize {
        self.questions.len()
    }

    fn correct(&self) -> usize {
        self.questions
            .iter()
            .zip(&self.answers)
            .filter(|(question, answer)| {
                answer
                    .as_deref()
                    .is_some_and(|a| normalize(a) == normalize(&question.correct_answer))
            })
            .count()
    }

    fn finished(&self) -> bool {
        self.mode == QuizMode::Interactive
            && !self.questions.is_empty()
            && self.current >= self.questions.len()
    }

    fn reset(&mut self) {
        self.answers.iter_mut().for_each(|a| *a = None);
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> Vec<QuizQuestion> {
        vec![
            QuizQuestion {
                question: "Capital of Portugal?".into(),
                options: vec!["A".into(), "B".into()],
                correct_answer: "A".into(),
            },
            QuizQuestion {
                question: "2 + 2?".into(),
                options: vec!["A".into(), "B".into()],
                correct_answer: "A".into(),
            },
        ]
    }

    #[test]
    fn grading_uses_normalized_comparison() {
        let mut game = QuizGame::new(&questions(), QuizMode::All, false);
        game.answer(0, "  a ");
        game.answer(1, "B");
        assert_eq!(game.correct(), 1);
    }

    #[test]
    fn answering_all_correct_scores_full() {
        let mut game = QuizGame::new(&questions(), QuizMode::All, false);
        game.answer(0, "A");
        game.answer(1, "A");
        assert_eq!(game.correct(), 2);
        assert!(!game.finished()); // all mode waits for explicit submit
    }

    #[test]
    fn interactive_mode_advances_and_finishes() {
        let mut game = QuizGame::new(&questions(), QuizMode::Interactive, false);
        assert_eq!(game.choose("A"), Some(true));
        assert_eq!(game.choose("B"), Some(false));
        assert!(game.finished());
        assert_eq!(game.choose("A"), None);
        assert_eq!(game.correct(), 1);
    }

    #[test]
    fn answers_are_rejected_for_the_wrong_mode() {
        let mut game = QuizGame::new(&questions(), QuizMode::Interactive, false);
        game.answer(0, "A");
        assert_eq!(game.correct(), 0);
    }
}

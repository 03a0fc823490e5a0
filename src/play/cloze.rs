use crate::models::ClozeQuestion;

use super::{normalize, Game};

/// Fill-in-the-blank: every `_`-run in a sentence is a gap. A question is
/// credited only when all of its gaps match the answer key under the
/// normalized comparison.
#[derive(Debug, Clone)]
pub struct ClozeGame {
    questions: Vec<ClozeQuestion>,
    answers: Vec<Vec<String>>,
}

impl ClozeGame {
    pub fn new(questions: &[ClozeQuestion]) -> Self {
        let answers = questions
            .iter()
            .map(|q| vec![String::new(); q.correct_answers.len()])
            .collect();
        ClozeGame {
            questions: questions.to_vec(),
            answers,
        }
    }

    pub fn questions(&self) -> &[ClozeQuestion] {
        &self.questions
    }

    pub fn answer_for(&self, question: usize, gap: usize) -> &str {
        self.answers
            .get(question)
            .and_then(|gaps| gaps.get(gap))
            .map_or("", String::as_str)
    }

    pub fn fill(&mut self, question: usize, gap: usize, value: &str) {
        if let Some(slot) = self
            .answers
            .get_mut(question)
            .and_then(|gaps| gaps.get_mut(gap))
        {
            *slot = value.to_string();
        }
    }

    /// Whether one gap currently matches its expected answer.
    pub fn gap_correct(&self, question: usize, gap: usize) -> bool {
        let Some(expected) = self
            .questions
            .get(question)
            .and_then(|q| q.correct_answers.get(gap))
        else {
            return false;
        };
        normalize(self.answer_for(question, gap)) == normalize(expected)
    }

    fn question_correct(&self, index: usize) -> bool {
        let question = &self.questions[index];
        question
            .correct_answers
            .iter()
            .enumerate()
            .all(|(gap, _)| self.gap_correct(index, gap))
    }
}

/// Split a sentence on `_`-runs: the text fragments between gaps, in order.
/// A sentence with N gaps yields N+1 fragments (possibly empty at the ends).
pub fn sentence_fragments(sentence: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut rest = sentence;
    while let Some(start) = rest.find('_') {
        fragments.push(&rest[..start]);
        let after = rest[start..].trim_start_matches('_');
        rest = after;
    }
    fragments.push(rest);
    fragments
}

impl Game for ClozeGame {
    fn total(&self) -> usize {
        self.questions.len()
    }

    fn correct(&self) -> usize {
        (0..self.questions.len())
            .filter(|&i| self.question_correct(i))
            .count()
    }

    fn reset(&mut self) {
        for gaps in &mut self.answers {
            gaps.iter_mut().for_each(String::clear);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> Vec<ClozeQuestion> {
        vec![ClozeQuestion {
            sentence: "Ontem eu ___ e depois ___ a conta.".into(),
            correct_answers: vec!["Comi".into(), "Paguei".into()],
            options: None,
        }]
    }

    #[test]
    fn case_and_whitespace_do_not_matter() {
        let mut game = ClozeGame::new(&questions());
        game.fill(0, 0, " comi ");
        game.fill(0, 1, "paguei");
        assert_eq!(game.correct(), 1);
    }

    #[test]
    fn a_single_wrong_gap_fails_the_question() {
        let mut game = ClozeGame::new(&questions());
        game.fill(0, 0, "comi");
        game.fill(0, 1, "esqueci");
        assert_eq!(game.correct(), 0);
        assert!(game.gap_correct(0, 0));
        assert!(!game.gap_correct(0, 1));
    }

    #[test]
    fn fragments_split_on_underscore_runs() {
        assert_eq!(
            sentence_fragments("Ontem eu ___ e depois ___ a conta."),
            vec!["Ontem eu ", " e depois ", " a conta."]
        );
        assert_eq!(sentence_fragments("sem lacunas"), vec!["sem lacunas"]);
        assert_eq!(sentence_fragments("__ no início"), vec!["", " no início"]);
    }

    #[test]
    fn out_of_range_fill_is_ignored() {
        let mut game = ClozeGame::new(&questions());
        game.fill(5, 0, "x");
        game.fill(0, 9, "x");
        assert_eq!(game.correct(), 0);
    }
}

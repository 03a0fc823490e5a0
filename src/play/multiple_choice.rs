use std::collections::VecDeque;

use rand::seq::SliceRandom;

use crate::models::WordPair;

use super::{normalize, Game};

pub const STARTING_LIVES: u32 = 3;

/// One answered round.
#[derive(Debug, Clone)]
pub struct Choice {
    pub word: String,
    pub chosen: String,
    pub is_correct: bool,
}

/// One word at a time against the full set of translations. A wrong pick
/// costs a life and sends the word to the back of the queue; the game ends
/// when the queue empties or the lives run out.
#[derive(Debug, Clone)]
pub struct MultipleChoiceGame {
    pairs: Vec<WordPair>,
    queue: VecDeque<WordPair>,
    options: Vec<String>,
    choices: Vec<Choice>,
    lives: u32,
}

impl MultipleChoiceGame {
    pub fn new(pairs: &[WordPair], shuffle: bool) -> Self {
        let mut queue: Vec<WordPair> = pairs.to_vec();
        let mut options: Vec<String> = pairs.iter().map(|p| p.translation.clone()).collect();
        if shuffle {
            let mut rng = rand::thread_rng();
            queue.shuffle(&mut rng);
            options.shuffle(&mut rng);
        }
        MultipleChoiceGame {
            pairs: pairs.to_vec(),
            queue: queue.into(),
            options,
            choices: Vec::new(),
            lives: STARTING_LIVES,
        }
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn current_word(&self) -> Option<&str> {
        self.queue.front().map(|p| p.word.as_str())
    }

    pub fn remaining_words(&self) -> usize {
        self.queue.len()
    }

    /// Answer the current word. Returns the correctness of the pick, or
    /// `None` when the game is already over.
    pub fn choose(&mut self, translation: &str) -> Option<bool> {
        if self.finished() {
            return None;
        }
        let pair = self.queue.pop_front()?;
        let is_correct = normalize(translation) == normalize(&pair.translation);
        self.choices.push(Choice {
            word: pair.word.clone(),
            chosen: translation.to_string(),
            is_correct,
        });
        if !is_correct {
            self.lives = self.lives.saturating_sub(1);
            if self.lives > 0 {
                self.queue.push_back(pair);
            }
        }
        Some(is_correct)
    }
}

impl Game for MultipleChoiceGame {
    fn total(&self) -> usize {
        self.pairs.len()
    }

    fn correct(&self) -> usize {
        self.choices.iter().filter(|c| c.is_correct).count()
    }

    fn finished(&self) -> bool {
        !self.pairs.is_empty() && (self.queue.is_empty() || self.lives == 0)
    }

    fn reset(&mut self) {
        self.queue = self.pairs.clone().into();
        self.choices.clear();
        self.lives = STARTING_LIVES;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs() -> Vec<WordPair> {
        vec![
            WordPair { word: "cat".into(), translation: "gato".into() },
            WordPair { word: "sun".into(), translation: "sol".into() },
        ]
    }

    #[test]
    fn clearing_the_queue_finishes_with_full_score() {
        let mut game = MultipleChoiceGame::new(&pairs(), false);
        assert_eq!(game.choose("gato"), Some(true));
        assert_eq!(game.choose("sol"), Some(true));
        assert!(game.finished());
        assert_eq!(game.correct(), 2);
    }

    #[test]
    fn wrong_pick_requeues_and_costs_a_life() {
        let mut game = MultipleChoiceGame::new(&pairs(), false);
        assert_eq!(game.choose("sol"), Some(false));
        assert_eq!(game.lives(), 2);
        assert_eq!(game.current_word(), Some("sun"));
        // "cat" comes back at the end of the queue
        game.choose("sol");
        assert_eq!(game.current_word(), Some("cat"));
        assert_eq!(game.choose("gato"), Some(true));
        assert!(game.finished());
    }

    #[test]
    fn running_out_of_lives_ends_the_game() {
        let mut game = MultipleChoiceGame::new(&pairs(), false);
        game.choose("wrong");
        game.choose("wrong");
        game.choose("wrong");
        assert_eq!(game.lives(), 0);
        assert!(game.finished());
        assert_eq!(game.choose("gato"), None);
    }
}

use rand::seq::SliceRandom;

use crate::models::WordPair;

use super::{normalize, Game};

/// A word placed on a translation slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub word: String,
    pub is_correct: bool,
}

/// Match words to translation slots. A slot keeps its first drop; undo is a
/// plain append/pop stack of moves, not a general undo log.
#[derive(Debug, Clone)]
pub struct DragDropGame {
    pairs: Vec<WordPair>,
    /// Word bank order, shuffled once at construction.
    bank: Vec<String>,
    /// Placement per slot, indexed like `pairs`.
    placements: Vec<Option<Placement>>,
    moves: Vec<usize>,
}

impl DragDropGame {
    pub fn new(pairs: &[WordPair], shuffle_bank: bool) -> Self {
        let mut bank: Vec<String> = pairs.iter().map(|p| p.word.clone()).collect();
        if shuffle_bank {
            bank.shuffle(&mut rand::thread_rng());
        }
        DragDropGame {
            pairs: pairs.to_vec(),
            bank,
            placements: vec![None; pairs.len()],
            moves: Vec::new(),
        }
    }

    pub fn pairs(&self) -> &[WordPair] {
        &self.pairs
    }

    pub fn placement(&self, slot: usize) -> Option<&Placement> {
        self.placements.get(slot)?.as_ref()
    }

    /// Words not yet placed anywhere, in bank order.
    pub fn available_words(&self) -> Vec<&str> {
        self.bank
            .iter()
            .filter(|word| {
                !self
                    .placements
                    .iter()
                    .flatten()
                    .any(|p| p.word == **word)
            })
            .map(String::as_str)
            .collect()
    }

    /// Drop `word` onto the slot of `translation`. An occupied slot and an
    /// already-placed word both refuse the drop.
    pub fn drop(&mut self, word: &str, translation: &str) -> bool {
        let Some(slot) = self
            .pairs
            .iter()
            .position(|p| p.translation == translation)
        else {
            return false;
        };
        if self.placements[slot].is_some() {
            return false;
        }
        if self.placements.iter().flatten().any(|p| p.word == word) {
            return false;
        }

        let is_correct = normalize(word) == normalize(&self.pairs[slot].word);
        self.placements[slot] = Some(Placement {
            word: word.to_string(),
            is_correct,
        });
        self.moves.push(slot);
        true
    }

    /// Pop the latest move, freeing its slot and word.
    pub fn undo(&mut self) -> bool {
        match self.moves.pop() {
            Some(slot) => {
                self.placements[slot] = None;
                true
            }
            None => false,
        }
    }

    pub fn all_placed(&self) -> bool {
        self.placements.iter().all(Option::is_some)
    }
}

impl Game for DragDropGame {
    fn total(&self) -> usize {
        self.pairs.len()
    }

    fn correct(&self) -> usize {
        self.placements
            .iter()
            .flatten()
            .filter(|p| p.is_correct)
            .count()
    }

    fn reset(&mut self) {
        self.placements.iter_mut().for_each(|p| *p = None);
        self.moves.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs() -> Vec<WordPair> {
        vec![
            WordPair { word: "cat".into(), translation: "gato".into() },
            WordPair { word: "dog".into(), translation: "cachorro".into() },
        ]
    }

    #[test]
    fn correct_drop_marks_the_pair() {
        let mut game = DragDropGame::new(&pairs(), false);
        assert!(game.drop("cat", "gato"));
        assert!(game.placement(0).unwrap().is_correct);
        assert_eq!(game.correct(), 1);
    }

    #[test]
    fn occupied_slot_refuses_a_second_drop() {
        let mut game = DragDropGame::new(&pairs(), false);
        game.drop("dog", "gato");
        assert!(!game.drop("cat", "gato"));
        assert_eq!(game.correct(), 0);
        assert_eq!(game.available_words(), vec!["cat"]);
    }

    #[test]
    fn undo_pops_moves_in_order() {
        let mut game = DragDropGame::new(&pairs(), false);
        game.drop("cat", "gato");
        game.drop("dog", "cachorro");
        assert!(game.all_placed());
        assert!(game.undo());
        assert_eq!(game.placement(1), None);
        assert!(game.placement(0).is_some());
        assert!(game.undo());
        assert!(!game.undo());
    }

    #[test]
    fn single_pair_scores_full() {
        let single = vec![WordPair { word: "cat".into(), translation: "gato".into() }];
        let mut game = DragDropGame::new(&single, false);
        game.drop("cat", "gato");
        assert_eq!(game.correct(), 1);
        assert_eq!(game.total(), 1);
    }
}

use rand::seq::SliceRandom;

use super::Game;

pub const DEFAULT_FAST_FINISH_BONUS: i32 = 10;
pub const DEFAULT_LIMIT_SECONDS: u64 = 300;
pub const PERFECT_SENTENCE_BONUS: i32 = 5;

/// Feedback for one check of the current sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// +1/-1 per compared position, in display order.
    pub word_results: Vec<i8>,
    /// Points granted by this check (0 on any retry).
    pub earned: i32,
    pub perfect: bool,
    pub first_try: bool,
}

/// Reassemble shuffled sentences by moving words around.
///
/// Scoring follows the original player exactly: only the first check of a
/// sentence earns points — +1/−1 per position when the check is perfect,
/// plus a 5-point sentence bonus; just the count of correctly placed words
/// when it is not. Retries keep giving visual feedback but score zero. A
/// run that finishes under the time limit earns the fast-finish bonus.
#[derive(Debug, Clone)]
pub struct SentenceOrderGame {
    sentences: Vec<String>,
    current: usize,
    /// Original token order; a trailing `.`/`!`/`?` becomes its own final
    /// token that is excluded from the comparison.
    tokens: Vec<String>,
    comparison_len: usize,
    order: Vec<String>,
    answered_once: bool,
    perfects: Vec<bool>,
    points: i32,
    fast_finish_bonus: i32,
    limit_seconds: u64,
    done: bool,
    last_check: Option<CheckResult>,
}

impl SentenceOrderGame {
    pub fn new(sentences: &[String], fast_finish_bonus: Option<i32>, limit_seconds: Option<u64>) -> Self {
        let mut game = SentenceOrderGame {
            sentences: sentences.to_vec(),
            current: 0,
            tokens: Vec::new(),
            comparison_len: 0,
            order: Vec::new(),
            answered_once: false,
            perfects: Vec::new(),
            points: 0,
            fast_finish_bonus: fast_finish_bonus.unwrap_or(DEFAULT_FAST_FINISH_BONUS),
            limit_seconds: limit_seconds.unwrap_or(DEFAULT_LIMIT_SECONDS),
            done: sentences.is_empty(),
            last_check: None,
        };
        if !game.done {
            game.load_sentence(0);
        }
        game
    }

    fn load_sentence(&mut self, index: usize) {
        self.current = index;
        let sentence = self.sentences[index].trim();

        let (base, punctuation) = match sentence.chars().last() {
            Some(last @ ('.' | '!' | '?')) => {
                (&sentence[..sentence.len() - last.len_utf8()], Some(last))
            }
            _ => (sentence, None),
        };

        let words: Vec<String> = base.split_whitespace().map(str::to_string).collect();
        self.comparison_len = words.len();

        let mut shuffled = words.clone();
        shuffled.shuffle(&mut rand::thread_rng());

        self.tokens = words;
        self.order = shuffled;
        if let Some(p) = punctuation {
            self.tokens.push(p.to_string());
            self.order.push(p.to_string());
        }

        self.answered_once = false;
        self.last_check = None;
    }

    pub fn points(&self) -> i32 {
        self.points
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn last_check(&self) -> Option<&CheckResult> {
        self.last_check.as_ref()
    }

    /// Whether every sentence was assembled perfectly on its first check.
    pub fn all_perfect(&self) -> bool {
        !self.perfects.is_empty() && self.perfects.iter().all(|&p| p)
    }

    /// Drag a word from one position to another.
    pub fn move_word(&mut self, from: usize, to: usize) {
        if self.done || from >= self.order.len() || to >= self.order.len() {
            return;
        }
        let word = self.order.remove(from);
        self.order.insert(to, word);
    }

    /// Check the current arrangement. `elapsed` is total play time in
    /// seconds, used for the fast-finish bonus when this check ends the run.
    pub fn check(&mut self, elapsed: u64) -> Option<CheckResult> {
        if self.done {
            return None;
        }

        let word_results: Vec<i8> = self.order[..self.comparison_len]
            .iter()
            .zip(&self.tokens[..self.comparison_len])
            .map(|(placed, expected)| if placed == expected { 1 } else { -1 })
            .collect();

        let correct_count = word_results.iter().filter(|&&r| r == 1).count() as i32;
        let perfect = correct_count as usize == self.comparison_len;
        let first_try = !self.answered_once;
        self.answered_once = true;

        let earned = if first_try {
            if perfect {
                word_results.iter().map(|&r| i32::from(r)).sum::<i32>() + PERFECT_SENTENCE_BONUS
            } else {
                correct_count
            }
        } else {
            0
        };
        self.points += earned;

        if perfect {
            self.perfects.push(first_try);
            if self.current + 1 < self.sentences.len() {
                self.load_sentence(self.current + 1);
            } else {
                self.done = true;
                if elapsed < self.limit_seconds {
                    self.points += self.fast_finish_bonus;
                }
            }
        }

        let result = CheckResult {
            word_results,
            earned,
            perfect,
            first_try,
        };
        self.last_check = Some(result.clone());
        Some(result)
    }

    #[cfg(test)]
    fn force_order(&mut self, order: &[&str]) {
        self.order = order.iter().map(|s| s.to_string()).collect();
    }
}

impl Game for SentenceOrderGame {
    fn total(&self) -> usize {
        self.sentences.len()
    }

    fn correct(&self) -> usize {
        self.perfects.iter().filter(|&&p| p).count()
    }

    fn finished(&self) -> bool {
        self.done && !self.sentences.is_empty()
    }

    fn reset(&mut self) {
        self.points = 0;
        self.perfects.clear();
        self.done = self.sentences.is_empty();
        if !self.done {
            self.load_sentence(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(sentences: &[&str]) -> SentenceOrderGame {
        let sentences: Vec<String> = sentences.iter().map(|s| s.to_string()).collect();
        SentenceOrderGame::new(&sentences, None, None)
    }

    #[test]
    fn trailing_punctuation_becomes_an_uncompared_token() {
        let game = game(&["O sol nasce!"]);
        assert_eq!(game.comparison_len, 3);
        assert_eq!(game.tokens.last().unwrap(), "!");
    }

    #[test]
    fn perfect_first_check_earns_word_count_plus_bonus() {
        let mut g = game(&["O sol nasce no leste"]);
        g.force_order(&["O", "sol", "nasce", "no", "leste"]);
        let result = g.check(10).unwrap();
        assert!(result.perfect && result.first_try);
        assert_eq!(result.earned, 5 + PERFECT_SENTENCE_BONUS);
        // single sentence: the run ends under the limit, fast bonus applies
        assert_eq!(g.points(), 5 + PERFECT_SENTENCE_BONUS + DEFAULT_FAST_FINISH_BONUS);
        assert!(g.finished());
        assert!(g.all_perfect());
    }

    #[test]
    fn second_check_contributes_zero() {
        let mut g = game(&["um dois tres"]);
        g.force_order(&["dois", "um", "tres"]);
        let first = g.check(5).unwrap();
        assert!(!first.perfect);
        assert_eq!(first.earned, 1); // only "tres" in place
        assert_eq!(g.points(), 1);

        g.force_order(&["um", "dois", "tres"]);
        let second = g.check(8).unwrap();
        assert!(second.perfect && !second.first_try);
        assert_eq!(second.earned, 0);
        // only the fast-finish bonus moves the total
        assert_eq!(g.points(), 1 + DEFAULT_FAST_FINISH_BONUS);
        assert!(!g.all_perfect());
    }

    #[test]
    fn slow_finish_skips_the_bonus() {
        let mut g = game(&["um dois"]);
        g.force_order(&["um", "dois"]);
        g.check(DEFAULT_LIMIT_SECONDS).unwrap();
        assert_eq!(g.points(), 2 + PERFECT_SENTENCE_BONUS);
    }

    #[test]
    fn configured_bonus_and_limit_override_defaults() {
        let sentences = vec!["um dois".to_string()];
        let mut g = SentenceOrderGame::new(&sentences, Some(20), Some(60));
        g.force_order(&["um", "dois"]);
        g.check(59).unwrap();
        assert_eq!(g.points(), 2 + PERFECT_SENTENCE_BONUS + 20);
    }

    #[test]
    fn perfect_check_advances_to_the_next_sentence() {
        let mut g = game(&["um dois", "tres quatro"]);
        g.force_order(&["um", "dois"]);
        g.check(1).unwrap();
        assert_eq!(g.current_index(), 1);
        assert!(!g.finished());
        assert!(g.check(2).is_some());
    }

    #[test]
    fn move_word_reorders_the_working_sentence() {
        let mut g = game(&["um dois tres"]);
        g.force_order(&["tres", "um", "dois"]);
        g.move_word(0, 2);
        assert_eq!(g.order(), ["um", "dois", "tres"]);
    }
}

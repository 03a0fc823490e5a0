//! Player engines for the seven activity kinds.
//!
//! Every engine is pure state driven by handler calls and a one-second tick;
//! nothing in here touches the network or the database. Play state is held
//! by the in-memory [`store::PlayStore`] and is never persisted.

pub mod cloze;
pub mod crossword;
pub mod drag_drop;
pub mod multiple_choice;
pub mod quiz;
pub mod sentence_order;
mod store;
pub mod word_search;

pub use store::{AnyPlayer, PlayStore};

/// Comparison rule shared by the list games: trim then case-fold.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Play lifecycle. `Submitted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    NotStarted,
    InProgress,
    Submitted,
}

/// Recorded result of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub correct: usize,
    pub total: usize,
}

impl Outcome {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64 * 100.0
    }

    /// Two-decimal rendering, e.g. `"100.00%"`.
    pub fn formatted(&self) -> String {
        format!("{:.2}%", self.percentage())
    }

    /// A perfect score triggers the celebration effect.
    pub fn is_perfect(&self) -> bool {
        self.total > 0 && self.correct == self.total
    }
}

/// What a game variant contributes to the shared scaffold.
pub trait Game {
    /// Number of gradable items.
    fn total(&self) -> usize;
    /// Items currently answered correctly.
    fn correct(&self) -> usize;
    /// Whether the variant ended itself (all words found, lives gone, last
    /// sentence completed). The scaffold submits when this turns true.
    fn finished(&self) -> bool {
        false
    }
    /// Clear answer buffers for a fresh run.
    fn reset(&mut self) {}
}

/// Result of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Not in progress, nothing moved.
    Idle,
    /// Still running; remaining seconds if a limit is set.
    Running(Option<u64>),
    /// The countdown hit zero and the run was force-submitted.
    Expired,
}

/// Shared play scaffold: lifecycle, countdown and grading glue around one
/// game variant.
#[derive(Debug, Clone)]
pub struct Player<G> {
    pub game: G,
    phase: Phase,
    limit_seconds: Option<u64>,
    remaining: Option<u64>,
    elapsed: u64,
    outcome: Option<Outcome>,
}

impl<G: Game> Player<G> {
    /// A player waiting on its start screen.
    pub fn new(game: G, limit_seconds: Option<u64>) -> Self {
        Player {
            game,
            phase: Phase::NotStarted,
            limit_seconds,
            remaining: None,
            elapsed: 0,
            outcome: None,
        }
    }

    /// A player for the games without a start screen; it begins immediately.
    pub fn started(game: G, limit_seconds: Option<u64>) -> Self {
        let mut player = Self::new(game, limit_seconds);
        player.start();
        player
    }

    /// `NotStarted → InProgress`: reset buffers and arm the countdown.
    /// A no-op in any other phase.
    pub fn start(&mut self) {
        if self.phase != Phase::NotStarted {
            return;
        }
        self.game.reset();
        self.remaining = self.limit_seconds;
        self.elapsed = 0;
        self.phase = Phase::InProgress;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_submitted(&self) -> bool {
        self.phase == Phase::Submitted
    }

    pub fn remaining(&self) -> Option<u64> {
        self.remaining
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    /// One second of play time. Decrements the countdown and force-submits
    /// at zero.
    pub fn tick(&mut self) -> Tick {
        if self.phase != Phase::InProgress {
            return Tick::Idle;
        }
        self.elapsed += 1;
        if let Some(remaining) = self.remaining {
            let remaining = remaining.saturating_sub(1);
            self.remaining = Some(remaining);
            if remaining == 0 {
                self.submit();
                return Tick::Expired;
            }
        }
        Tick::Running(self.remaining)
    }

    /// Apply an interaction to the game. Ignored unless in progress; if the
    /// game ends itself the run is submitted.
    pub fn play<R>(&mut self, f: impl FnOnce(&mut G) -> R) -> Option<R> {
        if self.phase != Phase::InProgress {
            return None;
        }
        let result = f(&mut self.game);
        if self.game.finished() {
            self.submit();
        }
        Some(result)
    }

    /// `InProgress → Submitted`. Terminal and idempotent: once recorded the
    /// outcome never changes, no matter how often this is called.
    pub fn submit(&mut self) -> Outcome {
        if let Some(outcome) = self.outcome {
            return outcome;
        }
        let outcome = Outcome {
            correct: self.game.correct(),
            total: self.game.total(),
        };
        self.outcome = Some(outcome);
        self.phase = Phase::Submitted;
        outcome
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        hits: usize,
        total: usize,
        done: bool,
    }

    impl Game for Counter {
        fn total(&self) -> usize {
            self.total
        }
        fn correct(&self) -> usize {
            self.hits
        }
        fn finished(&self) -> bool {
            self.done
        }
        fn reset(&mut self) {
            self.hits = 0;
        }
    }

    #[test]
    fn submit_is_terminal_and_idempotent() {
        let mut player = Player::started(Counter { hits: 2, total: 4, done: false }, None);
        let first = player.submit();
        player.game.hits = 4;
        let second = player.submit();
        assert_eq!(first, second);
        assert_eq!(second.correct, 2);
        assert!(player.play(|g| g.hits += 1).is_none());
    }

    #[test]
    fn countdown_force_submits_at_zero() {
        let mut player = Player::new(Counter { hits: 1, total: 3, done: false }, Some(60));
        player.start();
        for second in 1..60 {
            assert_eq!(player.tick(), Tick::Running(Some(60 - second)));
        }
        assert_eq!(player.tick(), Tick::Expired);
        assert!(player.is_submitted());
        assert_eq!(player.outcome().unwrap().correct, 1);
        // a late tick cannot revive the run
        assert_eq!(player.tick(), Tick::Idle);
    }

    #[test]
    fn start_is_required_and_single_shot() {
        let mut player = Player::new(Counter { hits: 0, total: 1, done: false }, None);
        assert!(player.play(|g| g.hits += 1).is_none());
        player.start();
        player.play(|g| g.hits += 1);
        player.start(); // no-op, buffers keep their state
        assert_eq!(player.game.hits, 1);
    }

    #[test]
    fn self_finishing_game_submits_through_play() {
        let mut player = Player::started(Counter { hits: 0, total: 1, done: false }, None);
        player.play(|g| {
            g.hits = 1;
            g.done = true;
        });
        assert!(player.is_submitted());
        assert!(player.outcome().unwrap().is_perfect());
    }

    #[test]
    fn outcome_formats_two_decimals() {
        let outcome = Outcome { correct: 2, total: 3 };
        assert_eq!(outcome.formatted(), "66.67%");
        assert_eq!(Outcome { correct: 2, total: 2 }.formatted(), "100.00%");
        assert_eq!(Outcome { correct: 0, total: 0 }.formatted(), "0.00%");
    }
}

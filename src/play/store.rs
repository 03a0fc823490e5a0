use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::AbortHandle;
use ulid::Ulid;

use crate::models::{Activity, ActivityContent};

use super::cloze::ClozeGame;
use super::crossword::CrosswordGame;
use super::drag_drop::DragDropGame;
use super::multiple_choice::MultipleChoiceGame;
use super::quiz::{QuizGame, QuizMode};
use super::sentence_order::SentenceOrderGame;
use super::word_search::WordSearchGame;
use super::{Outcome, Phase, Player, Tick};

/// How long a submitted run lingers so its outcome screen can still be
/// rendered and refreshed.
const SUBMITTED_TTL: Duration = Duration::from_secs(10 * 60);

/// Cap for runs without a countdown; a tab left open cannot keep its
/// session alive past this.
const MAX_RUN_SECONDS: u64 = 2 * 60 * 60;

/// One live run, whatever its kind. Handlers match on the variant they
/// expect; shared lifecycle calls go through the dispatch methods below.
pub enum AnyPlayer {
    WordSearch(Player<WordSearchGame>),
    Crossword(Player<CrosswordGame>),
    Quiz(Player<QuizGame>),
    Cloze(Player<ClozeGame>),
    DragDrop(Player<DragDropGame>),
    MultipleChoice(Player<MultipleChoiceGame>),
    SentenceOrder(Player<SentenceOrderGame>),
}

macro_rules! each_player {
    ($any:expr, $p:ident => $body:expr) => {
        match $any {
            AnyPlayer::WordSearch($p) => $body,
            AnyPlayer::Crossword($p) => $body,
            AnyPlayer::Quiz($p) => $body,
            AnyPlayer::Cloze($p) => $body,
            AnyPlayer::DragDrop($p) => $body,
            AnyPlayer::MultipleChoice($p) => $body,
            AnyPlayer::SentenceOrder($p) => $body,
        }
    };
}

impl AnyPlayer {
    /// Build the right player for an activity. Word search, multiple choice
    /// and sentence order keep a start screen so their clocks only arm on an
    /// explicit start; the other kinds begin immediately.
    pub fn for_activity(activity: &Activity, quiz_mode: QuizMode) -> AnyPlayer {
        let limit = activity.config.limit_seconds();
        match &activity.content {
            ActivityContent::WordSearch(content) => {
                AnyPlayer::WordSearch(Player::new(WordSearchGame::new(content), limit))
            }
            ActivityContent::Crossword(content) => {
                AnyPlayer::Crossword(Player::started(CrosswordGame::new(content), limit))
            }
            ActivityContent::Quiz { questions } => AnyPlayer::Quiz(Player::started(
                QuizGame::new(questions, quiz_mode, activity.config.shuffle_questions),
                limit,
            )),
            ActivityContent::Cloze { questions } => {
                AnyPlayer::Cloze(Player::started(ClozeGame::new(questions), limit))
            }
            ActivityContent::DragDrop { pairs } => {
                AnyPlayer::DragDrop(Player::started(DragDropGame::new(pairs, true), limit))
            }
            ActivityContent::MultipleChoice { pairs } => {
                AnyPlayer::MultipleChoice(Player::new(MultipleChoiceGame::new(pairs, true), limit))
            }
            ActivityContent::SentenceOrder { sentences } => {
                // the limit only gates the fast-finish bonus here, it never
                // force-submits a run
                AnyPlayer::SentenceOrder(Player::new(
                    SentenceOrderGame::new(
                        sentences,
                        activity.config.bonus_fast_finish,
                        activity.config.limit_seconds(),
                    ),
                    None,
                ))
            }
        }
    }

    pub fn phase(&self) -> Phase {
        each_player!(self, p => p.phase())
    }

    pub fn is_submitted(&self) -> bool {
        each_player!(self, p => p.is_submitted())
    }

    pub fn start(&mut self) {
        each_player!(self, p => p.start())
    }

    pub fn tick(&mut self) -> Tick {
        each_player!(self, p => p.tick())
    }

    pub fn submit(&mut self) -> Outcome {
        each_player!(self, p => p.submit())
    }

    pub fn outcome(&self) -> Option<Outcome> {
        each_player!(self, p => p.outcome())
    }

    pub fn remaining(&self) -> Option<u64> {
        each_player!(self, p => p.remaining())
    }

    pub fn elapsed(&self) -> u64 {
        each_player!(self, p => p.elapsed())
    }
}

struct Session {
    player: AnyPlayer,
    activity_id: i64,
    clock: Option<AbortHandle>,
}

/// In-memory registry of live runs, keyed by an opaque session token.
/// Nothing in here is ever written to the database; dropping the store (or
/// restarting the process) forgets every run.
#[derive(Clone, Default)]
pub struct PlayStore {
    inner: Arc<Mutex<HashMap<String, Session>>>,
}

impl PlayStore {
    pub fn new() -> PlayStore {
        PlayStore::default()
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a fresh run and hand back its token. Players that begin
    /// immediately get their clock started here.
    pub fn create(&self, activity: &Activity, quiz_mode: QuizMode) -> String {
        let token = Ulid::new().to_string();
        let player = AnyPlayer::for_activity(activity, quiz_mode);
        let running = player.phase() == Phase::InProgress;
        self.sessions().insert(
            token.clone(),
            Session {
                player,
                activity_id: activity.id,
                clock: None,
            },
        );
        if running {
            self.spawn_clock(&token);
        }
        token
    }

    pub fn activity_id(&self, token: &str) -> Option<i64> {
        self.sessions().get(token).map(|s| s.activity_id)
    }

    /// Run `f` against the session's player. When the call leaves the run
    /// submitted the clock stops and the session is scheduled for eviction.
    pub fn with_player<R>(&self, token: &str, f: impl FnOnce(&mut AnyPlayer) -> R) -> Option<R> {
        let mut sessions = self.sessions();
        let session = sessions.get_mut(token)?;
        let was_submitted = session.player.is_submitted();
        let result = f(&mut session.player);
        if session.player.is_submitted() && !was_submitted {
            if let Some(clock) = session.clock.take() {
                clock.abort();
            }
            session.clock = Some(self.evict_later(token));
        }
        Some(result)
    }

    /// A submitted session stays around for [`SUBMITTED_TTL`], then
    /// disappears on its own.
    fn evict_later(&self, token: &str) -> AbortHandle {
        let store = self.clone();
        let key = token.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(SUBMITTED_TTL).await;
            store.remove(&key);
        })
        .abort_handle()
    }

    /// Leave the start screen and arm the countdown.
    pub fn start(&self, token: &str) -> bool {
        let started = self
            .with_player(token, |player| {
                player.start();
                player.phase() == Phase::InProgress
            })
            .unwrap_or(false);
        if started {
            self.spawn_clock(token);
        }
        started
    }

    pub fn submit(&self, token: &str) -> Option<Outcome> {
        self.with_player(token, AnyPlayer::submit)
    }

    /// Drop a run, aborting its clock. Used when the player walks away.
    pub fn remove(&self, token: &str) -> bool {
        match self.sessions().remove(token) {
            Some(session) => {
                if let Some(clock) = session.clock {
                    clock.abort();
                }
                true
            }
            None => false,
        }
    }

    /// One task per running session. It force-submits when the countdown
    /// hits zero, drops a limit-less run at the idle cap, and exits once
    /// the run is submitted or removed.
    fn spawn_clock(&self, token: &str) {
        let store = self.clone();
        let key = token.to_string();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.tick().await; // the first tick fires immediately
            loop {
                interval.tick().await;
                let done = {
                    let mut sessions = store.sessions();
                    match sessions.get_mut(&key) {
                        Some(session) => match session.player.tick() {
                            Tick::Expired => {
                                session.clock = Some(store.evict_later(&key));
                                true
                            }
                            Tick::Running(None)
                                if session.player.elapsed() >= MAX_RUN_SECONDS =>
                            {
                                sessions.remove(&key);
                                true
                            }
                            Tick::Running(_) => false,
                            Tick::Idle => true,
                        },
                        None => true,
                    }
                };
                if done {
                    break;
                }
            }
        });
        if let Some(session) = self.sessions().get_mut(token) {
            session.clock = Some(handle.abort_handle());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, ActivityConfig, ActivityType, QuizQuestion};

    fn quiz_activity() -> Activity {
        Activity {
            id: 7,
            title: "Capitals".into(),
            description: String::new(),
            category: "geography".into(),
            ty: ActivityType::Quiz,
            status: "active".into(),
            cover_image: None,
            config: ActivityConfig::default(),
            content: ActivityContent::Quiz {
                questions: vec![QuizQuestion {
                    question: "Capital of Portugal?".into(),
                    options: vec!["Lisboa".into(), "Porto".into()],
                    correct_answer: "Lisboa".into(),
                }],
            },
        }
    }

    #[tokio::test]
    async fn create_play_submit_round_trip() {
        let store = PlayStore::new();
        let token = store.create(&quiz_activity(), QuizMode::All);

        assert_eq!(store.activity_id(&token), Some(7));
        store.with_player(&token, |player| match player {
            AnyPlayer::Quiz(p) => {
                p.play(|g| g.answer(0, "Lisboa"));
            }
            _ => panic!("expected a quiz player"),
        });

        let outcome = store.submit(&token).unwrap();
        assert!(outcome.is_perfect());
        // terminal: a second submit returns the same outcome
        assert_eq!(store.submit(&token), Some(outcome));
    }

    #[tokio::test]
    async fn unknown_tokens_answer_with_none() {
        let store = PlayStore::new();
        assert_eq!(store.activity_id("nope"), None);
        assert_eq!(store.submit("nope"), None);
        assert!(!store.start("nope"));
        assert!(!store.remove("nope"));
    }

    #[tokio::test(start_paused = true)]
    async fn submitted_sessions_are_evicted_after_the_linger() {
        let store = PlayStore::new();
        let token = store.create(&quiz_activity(), QuizMode::All);
        store.submit(&token).unwrap();
        // the outcome screen can still be rendered right after submit
        assert_eq!(store.activity_id(&token), Some(7));

        tokio::time::sleep(SUBMITTED_TTL + Duration::from_secs(1)).await;
        assert_eq!(store.activity_id(&token), None);
    }

    #[tokio::test(start_paused = true)]
    async fn limitless_runs_are_dropped_at_the_idle_cap() {
        let store = PlayStore::new();
        let token = store.create(&quiz_activity(), QuizMode::All);

        tokio::time::sleep(Duration::from_secs(MAX_RUN_SECONDS + 2)).await;
        assert_eq!(store.activity_id(&token), None);
    }

    #[tokio::test]
    async fn removed_sessions_are_forgotten() {
        let store = PlayStore::new();
        let token = store.create(&quiz_activity(), QuizMode::Interactive);
        assert!(store.remove(&token));
        assert_eq!(store.activity_id(&token), None);
    }
}

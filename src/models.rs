use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The seven supported activity kinds. The database stores the snake_case
/// string; `content` and `config` JSON are interpreted according to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityType {
    WordSearch,
    Crossword,
    Quiz,
    Cloze,
    DragDrop,
    MultipleChoice,
    SentenceOrder,
}

impl ActivityType {
    pub const ALL: [ActivityType; 7] = [
        ActivityType::WordSearch,
        ActivityType::Crossword,
        ActivityType::Quiz,
        ActivityType::Cloze,
        ActivityType::DragDrop,
        ActivityType::MultipleChoice,
        ActivityType::SentenceOrder,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityType::WordSearch => "word_search",
            ActivityType::Crossword => "crossword",
            ActivityType::Quiz => "quiz",
            ActivityType::Cloze => "cloze",
            ActivityType::DragDrop => "drag_drop",
            ActivityType::MultipleChoice => "multiple_choice",
            ActivityType::SentenceOrder => "sentence_order",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActivityType::WordSearch => "Word search",
            ActivityType::Crossword => "Crossword",
            ActivityType::Quiz => "Quiz",
            ActivityType::Cloze => "Fill in the blanks",
            ActivityType::DragDrop => "Drag and drop",
            ActivityType::MultipleChoice => "Multiple choice",
            ActivityType::SentenceOrder => "Sentence order",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = UnknownActivityType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "word_search" => Ok(ActivityType::WordSearch),
            "crossword" => Ok(ActivityType::Crossword),
            "quiz" => Ok(ActivityType::Quiz),
            "cloze" => Ok(ActivityType::Cloze),
            // the original client used both spellings
            "drag_drop" | "dragdrop" => Ok(ActivityType::DragDrop),
            "multiple_choice" => Ok(ActivityType::MultipleChoice),
            "sentence_order" => Ok(ActivityType::SentenceOrder),
            _ => Err(UnknownActivityType(s.to_string())),
        }
    }
}

#[derive(Debug)]
pub struct UnknownActivityType(pub String);

impl fmt::Display for UnknownActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown activity type: {}", self.0)
    }
}

impl std::error::Error for UnknownActivityType {}

/// Type-dependent settings. Grid games use `time`/`rows`/`cols`; the list
/// games use `time_limit` in minutes. All fields are optional so any stored
/// config document parses regardless of type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityConfig {
    pub time: Option<u32>,
    pub time_limit: Option<u32>,
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    pub shuffle_questions: bool,
    pub bonus_fast_finish: Option<i32>,
}

impl ActivityConfig {
    /// Countdown length in seconds, from whichever minute field is set.
    pub fn limit_seconds(&self) -> Option<u64> {
        self.time
            .or(self.time_limit)
            .map(|minutes| u64::from(minutes) * 60)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClozeQuestion {
    pub sentence: String,
    pub correct_answers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// A word/translation pair, shared by drag-drop and multiple choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordPair {
    pub word: String,
    pub translation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordPosition {
    pub word: String,
    pub row: usize,
    pub col: usize,
    pub direction: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClueDirection {
    Across,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrosswordClue {
    pub word: String,
    pub clue: String,
    pub row: usize,
    pub col: usize,
    pub direction: ClueDirection,
    pub number: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordSearchContent {
    pub words: Vec<String>,
    pub grid: Vec<Vec<char>>,
    pub word_positions: Vec<WordPosition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrosswordContent {
    pub grid: Vec<Vec<char>>,
    pub clues: Vec<CrosswordClue>,
}

/// The type-indexed activity payload. One arm per activity kind instead of
/// a bag of optional fields probed at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityContent {
    WordSearch(WordSearchContent),
    Crossword(CrosswordContent),
    Quiz { questions: Vec<QuizQuestion> },
    Cloze { questions: Vec<ClozeQuestion> },
    DragDrop { pairs: Vec<WordPair> },
    MultipleChoice { pairs: Vec<WordPair> },
    SentenceOrder { sentences: Vec<String> },
}

#[derive(Deserialize)]
struct QuestionsDoc<T> {
    #[serde(default = "Vec::new")]
    questions: Vec<T>,
}

#[derive(Deserialize)]
struct PairsDoc {
    #[serde(default)]
    pairs: Vec<WordPair>,
}

impl ActivityContent {
    /// Parse a stored content document according to the activity type.
    /// A document that does not fit the type is an error the caller turns
    /// into an "unsupported activity" page, never a panic.
    pub fn parse(ty: ActivityType, json: &str) -> Result<Self, serde_json::Error> {
        Ok(match ty {
            ActivityType::WordSearch => ActivityContent::WordSearch(serde_json::from_str(json)?),
            ActivityType::Crossword => ActivityContent::Crossword(serde_json::from_str(json)?),
            ActivityType::Quiz => {
                let doc: QuestionsDoc<QuizQuestion> = serde_json::from_str(json)?;
                ActivityContent::Quiz {
                    questions: doc.questions,
                }
            }
            ActivityType::Cloze => {
                let doc: QuestionsDoc<ClozeQuestion> = serde_json::from_str(json)?;
                ActivityContent::Cloze {
                    questions: doc.questions,
                }
            }
            ActivityType::DragDrop => {
                let doc: PairsDoc = serde_json::from_str(json)?;
                ActivityContent::DragDrop { pairs: doc.pairs }
            }
            ActivityType::MultipleChoice => {
                let doc: PairsDoc = serde_json::from_str(json)?;
                ActivityContent::MultipleChoice { pairs: doc.pairs }
            }
            ActivityType::SentenceOrder => {
                let doc: QuestionsDoc<String> = serde_json::from_str(json)?;
                ActivityContent::SentenceOrder {
                    sentences: doc.questions,
                }
            }
        })
    }

    /// Number of gradable items in the payload.
    pub fn item_count(&self) -> usize {
        match self {
            ActivityContent::WordSearch(c) => c.words.len(),
            ActivityContent::Crossword(c) => c.clues.len(),
            ActivityContent::Quiz { questions } => questions.len(),
            ActivityContent::Cloze { questions } => questions.len(),
            ActivityContent::DragDrop { pairs } => pairs.len(),
            ActivityContent::MultipleChoice { pairs } => pairs.len(),
            ActivityContent::SentenceOrder { sentences } => sentences.len(),
        }
    }
}

/// A fully decoded activity, ready to hand to a player.
#[derive(Debug, Clone)]
pub struct Activity {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub ty: ActivityType,
    pub status: String,
    pub cover_image: Option<String>,
    pub config: ActivityConfig,
    pub content: ActivityContent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_type_round_trips_through_strings() {
        for ty in ActivityType::ALL {
            assert_eq!(ty.as_str().parse::<ActivityType>().unwrap(), ty);
        }
        assert_eq!(
            "dragdrop".parse::<ActivityType>().unwrap(),
            ActivityType::DragDrop
        );
        assert!("minesweeper".parse::<ActivityType>().is_err());
    }

    #[test]
    fn quiz_content_parses_camel_case_document() {
        let json = r#"{"questions":[{"question":"2+2?","options":["3","4"],"correctAnswer":"4"}]}"#;
        let content = ActivityContent::parse(ActivityType::Quiz, json).unwrap();
        match content {
            ActivityContent::Quiz { questions } => {
                assert_eq!(questions.len(), 1);
                assert_eq!(questions[0].correct_answer, "4");
            }
            other => panic!("wrong arm: {other:?}"),
        }
    }

    #[test]
    fn word_search_content_rejects_quiz_document() {
        let json = r#"{"questions":[{"question":"q","options":[],"correctAnswer":"a"}]}"#;
        assert!(ActivityContent::parse(ActivityType::WordSearch, json).is_err());
    }

    #[test]
    fn config_limit_prefers_grid_time_field() {
        let config = ActivityConfig {
            time: Some(2),
            time_limit: Some(5),
            ..Default::default()
        };
        assert_eq!(config.limit_seconds(), Some(120));
        assert_eq!(ActivityConfig::default().limit_seconds(), None);
    }
}

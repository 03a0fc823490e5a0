//! Validation and content building for the activity creation forms.
//!
//! Handlers collect the multipart fields into a flat string map; this module
//! turns that map into a typed draft or a set of field-keyed error messages
//! the form re-renders inline.

pub mod word_grid;

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use crate::models::{
    ActivityConfig, ActivityContent, ActivityType, ClozeQuestion, QuizQuestion, WordPair,
};
use crate::names;
use crate::play::cloze::sentence_fragments;

/// Validation messages keyed by form field name. Ordered so the form can
/// render them deterministically.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A validated creation/update payload, ready for storage.
#[derive(Debug, Clone)]
pub struct Draft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub config: ActivityConfig,
    pub content: ActivityContent,
}

/// Validate the form for one activity type and build its draft.
pub fn build_draft(
    ty: ActivityType,
    form: &HashMap<String, String>,
) -> Result<Draft, FieldErrors> {
    let mut errors = FieldErrors::default();

    let title = required_text(form, "title", "Title is required", &mut errors);
    let category = required_text(form, "category", "Category is required", &mut errors);
    let description = text(form, "description");

    let built = match ty {
        ActivityType::WordSearch => word_search(form, &mut errors),
        ActivityType::Crossword => crossword(form, &mut errors),
        ActivityType::Quiz => quiz(form, &mut errors),
        ActivityType::Cloze => cloze(form, &mut errors),
        ActivityType::DragDrop => pairs(form, &mut errors).map(|pairs| {
            (time_limit_config(form), ActivityContent::DragDrop { pairs })
        }),
        ActivityType::MultipleChoice => pairs(form, &mut errors).map(|pairs| {
            (time_limit_config(form), ActivityContent::MultipleChoice { pairs })
        }),
        ActivityType::SentenceOrder => sentence_order(form, &mut errors),
    };

    match (built, errors.is_empty()) {
        (Some((config, content)), true) => Ok(Draft {
            title,
            description,
            category,
            config,
            content,
        }),
        _ => Err(errors),
    }
}

fn text(form: &HashMap<String, String>, field: &str) -> String {
    form.get(field).map(|s| s.trim().to_string()).unwrap_or_default()
}

fn required_text(
    form: &HashMap<String, String>,
    field: &str,
    message: &str,
    errors: &mut FieldErrors,
) -> String {
    let value = text(form, field);
    if value.is_empty() {
        errors.push(field, message);
    }
    value
}

/// Parse a numeric field, recording `message` when it is missing, not a
/// number, or under `min`.
fn number<T: FromStr + PartialOrd>(
    form: &HashMap<String, String>,
    field: &str,
    min: T,
    message: &str,
    errors: &mut FieldErrors,
) -> Option<T> {
    match text(form, field).parse::<T>() {
        Ok(value) if value >= min => Some(value),
        _ => {
            errors.push(field, message);
            None
        }
    }
}

fn grid_size(
    form: &HashMap<String, String>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<usize> {
    let message = format!(
        "Must be between {} and {}",
        names::GRID_MIN_SIZE,
        names::GRID_MAX_SIZE
    );
    match text(form, field).parse::<usize>() {
        Ok(value) if (names::GRID_MIN_SIZE..=names::GRID_MAX_SIZE).contains(&value) => Some(value),
        _ => {
            errors.push(field, message);
            None
        }
    }
}

fn checkbox(form: &HashMap<String, String>, field: &str) -> bool {
    matches!(text(form, field).as_str(), "on" | "true" | "1")
}

fn comma_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn line_list(value: &str) -> Vec<String> {
    value
        .lines()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Minutes field shared by the list games.
fn time_limit_config(form: &HashMap<String, String>) -> ActivityConfig {
    ActivityConfig {
        time_limit: text(form, "time_limit").parse().ok(),
        ..Default::default()
    }
}

fn word_search(
    form: &HashMap<String, String>,
    errors: &mut FieldErrors,
) -> Option<(ActivityConfig, ActivityContent)> {
    let time = number::<u32>(form, "time", 1, "Time must be at least 1 minute", errors);
    let rows = grid_size(form, "rows", errors);
    let cols = grid_size(form, "cols", errors);

    let words = comma_list(&text(form, "words"));
    if words.len() < names::MIN_WORD_SEARCH_WORDS {
        errors.push(
            "words",
            format!("At least {} words are required", names::MIN_WORD_SEARCH_WORDS),
        );
        return None;
    }

    let (time, rows, cols) = (time?, rows?, cols?);
    let content = word_grid::generate_word_search(&words, rows, cols);
    let config = ActivityConfig {
        time: Some(time),
        rows: Some(rows),
        cols: Some(cols),
        ..Default::default()
    };
    Some((config, ActivityContent::WordSearch(content)))
}

fn crossword(
    form: &HashMap<String, String>,
    errors: &mut FieldErrors,
) -> Option<(ActivityConfig, ActivityContent)> {
    let rows = grid_size(form, "rows", errors);
    let cols = grid_size(form, "cols", errors);

    let words = line_list(&text(form, "words"));
    let clues = line_list(&text(form, "clues"));
    if words.len() < names::MIN_CROSSWORD_ITEMS {
        errors.push(
            "words",
            format!(
                "At least {} word and clue pairs are required",
                names::MIN_CROSSWORD_ITEMS
            ),
        );
        return None;
    }
    if clues.len() != words.len() {
        errors.push("clues", "Every word needs exactly one clue");
        return None;
    }

    let (rows, cols) = (rows?, cols?);
    let items: Vec<(String, String)> = words.into_iter().zip(clues).collect();
    let content = word_grid::generate_crossword(&items);
    let config = ActivityConfig {
        rows: Some(rows),
        cols: Some(cols),
        ..Default::default()
    };
    Some((config, ActivityContent::Crossword(content)))
}

/// Walk indexed fields (`question_0`, `question_1`, ...) until the first
/// missing index.
fn indexed<'a>(
    form: &'a HashMap<String, String>,
    prefix: &str,
) -> impl Iterator<Item = (usize, &'a str)> {
    let prefix = prefix.to_string();
    let mut index = 0;
    std::iter::from_fn(move || {
        let value = form.get(&format!("{prefix}_{index}"))?;
        let item = (index, value.as_str());
        index += 1;
        Some(item)
    })
}

fn quiz(
    form: &HashMap<String, String>,
    errors: &mut FieldErrors,
) -> Option<(ActivityConfig, ActivityContent)> {
    number::<u32>(form, "time_limit", 1, "Time limit must be at least 1 minute", errors);

    let mut questions = Vec::new();
    for (index, question) in indexed(form, "question") {
        let question = question.trim();
        let options = comma_list(&text(form, &format!("options_{index}")));
        let answer = text(form, &format!("answer_{index}"));
        // blank rows from the fixed-size form are fine
        if question.is_empty() && options.is_empty() && answer.is_empty() {
            continue;
        }
        if question.is_empty() {
            errors.push(format!("question_{index}"), "Question text is required");
        }
        if options.len() < names::MIN_QUIZ_OPTIONS {
            errors.push(
                format!("options_{index}"),
                format!("At least {} options are required", names::MIN_QUIZ_OPTIONS),
            );
        }
        if answer.is_empty() {
            errors.push(format!("answer_{index}"), "A correct answer is required");
        }
        questions.push(QuizQuestion {
            question: question.to_string(),
            options,
            correct_answer: answer,
        });
    }
    if questions.is_empty() {
        errors.push("questions", "At least one question is required");
        return None;
    }
    if !errors.is_empty() {
        return None;
    }

    let config = ActivityConfig {
        time_limit: text(form, "time_limit").parse().ok(),
        shuffle_questions: checkbox(form, "shuffle_questions"),
        ..Default::default()
    };
    Some((config, ActivityContent::Quiz { questions }))
}

fn cloze(
    form: &HashMap<String, String>,
    errors: &mut FieldErrors,
) -> Option<(ActivityConfig, ActivityContent)> {
    number::<u32>(form, "time_limit", 1, "Time limit must be at least 1 minute", errors);

    let mut questions = Vec::new();
    for (index, sentence) in indexed(form, "sentence") {
        let sentence = sentence.trim().to_string();
        let correct_answers = comma_list(&text(form, &format!("answers_{index}")));
        if sentence.is_empty() && correct_answers.is_empty() {
            continue;
        }
        let gaps = sentence_fragments(&sentence).len() - 1;
        if gaps == 0 {
            errors.push(
                format!("sentence_{index}"),
                "Mark at least one gap with underscores",
            );
        }
        if correct_answers.len() != gaps {
            errors.push(
                format!("answers_{index}"),
                format!("Expected {gaps} answers, one per gap"),
            );
        }
        questions.push(ClozeQuestion {
            sentence,
            correct_answers,
            options: None,
        });
    }
    if questions.is_empty() {
        errors.push("questions", "At least one sentence is required");
        return None;
    }
    if !errors.is_empty() {
        return None;
    }

    Some((time_limit_config(form), ActivityContent::Cloze { questions }))
}

fn pairs(form: &HashMap<String, String>, errors: &mut FieldErrors) -> Option<Vec<WordPair>> {
    number::<u32>(form, "time_limit", 1, "Time limit must be at least 1 minute", errors);

    let mut pairs = Vec::new();
    for (index, word) in indexed(form, "word") {
        let word = word.trim().to_string();
        let translation = text(form, &format!("translation_{index}"));
        if word.is_empty() && translation.is_empty() {
            continue;
        }
        if word.is_empty() || translation.is_empty() {
            errors.push(
                format!("word_{index}"),
                "Both the word and its translation are required",
            );
        }
        pairs.push(WordPair { word, translation });
    }
    if pairs.is_empty() {
        errors.push("pairs", "At least one word pair is required");
        return None;
    }
    if !errors.is_empty() {
        return None;
    }
    Some(pairs)
}

fn sentence_order(
    form: &HashMap<String, String>,
    errors: &mut FieldErrors,
) -> Option<(ActivityConfig, ActivityContent)> {
    number::<u32>(form, "time_limit", 1, "Time limit must be at least 1 minute", errors);

    let sentences = line_list(&text(form, "sentences"));
    if sentences.is_empty() {
        errors.push("sentences", "At least one sentence is required");
        return None;
    }

    let config = ActivityConfig {
        time_limit: text(form, "time_limit").parse().ok(),
        bonus_fast_finish: text(form, "bonus_fast_finish").parse().ok(),
        ..Default::default()
    };
    Some((config, ActivityContent::SentenceOrder { sentences }))
}

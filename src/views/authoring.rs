use std::collections::BTreeMap;

use maud::{html, Markup};

use crate::authoring::FieldErrors;
use crate::models::{Activity, ActivityContent, ActivityType};
use crate::names;

use super::components::{error_banner, field_error, nav_link};

/// Blank indexed rows rendered per list form; empty rows are skipped on
/// submission.
const ITEM_ROWS: usize = 8;

/// Prefilled form values keyed by field name. Empty on the create form;
/// flattened from the stored activity on the edit form.
#[derive(Debug, Default)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    fn set(&mut self, field: &str, value: impl Into<String>) {
        self.0.insert(field.to_string(), value.into());
    }

    pub fn get(&self, field: &str) -> &str {
        self.0.get(field).map_or("", String::as_str)
    }

    pub fn get_or<'a>(&'a self, field: &str, default: &'a str) -> &'a str {
        match self.get(field) {
            "" => default,
            value => value,
        }
    }

    pub fn is_checked(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }

    /// Number of consecutive `prefix_{i}` entries, used to size the row list.
    fn indexed_len(&self, prefix: &str) -> usize {
        (0..)
            .take_while(|i| self.0.contains_key(&format!("{prefix}_{i}")))
            .count()
    }
}

/// Flatten a stored activity back into its authoring form fields.
pub fn activity_values(activity: &Activity) -> FormValues {
    let mut values = FormValues::default();
    values.set("title", &activity.title);
    values.set("description", &activity.description);
    values.set("category", &activity.category);

    let config = &activity.config;
    if let Some(time) = config.time {
        values.set("time", time.to_string());
    }
    if let Some(limit) = config.time_limit {
        values.set("time_limit", limit.to_string());
    }
    if let Some(rows) = config.rows {
        values.set("rows", rows.to_string());
    }
    if let Some(cols) = config.cols {
        values.set("cols", cols.to_string());
    }
    if config.shuffle_questions {
        values.set("shuffle_questions", "on");
    }
    if let Some(bonus) = config.bonus_fast_finish {
        values.set("bonus_fast_finish", bonus.to_string());
    }

    match &activity.content {
        ActivityContent::WordSearch(content) => {
            values.set("words", content.words.join(", "));
        }
        ActivityContent::Crossword(content) => {
            let words: Vec<&str> = content.clues.iter().map(|c| c.word.as_str()).collect();
            let clues: Vec<&str> = content.clues.iter().map(|c| c.clue.as_str()).collect();
            values.set("words", words.join("\n"));
            values.set("clues", clues.join("\n"));
        }
        ActivityContent::Quiz { questions } => {
            for (i, q) in questions.iter().enumerate() {
                values.set(&format!("question_{i}"), &q.question);
                values.set(&format!("options_{i}"), q.options.join(", "));
                values.set(&format!("answer_{i}"), &q.correct_answer);
            }
        }
        ActivityContent::Cloze { questions } => {
            for (i, q) in questions.iter().enumerate() {
                values.set(&format!("sentence_{i}"), &q.sentence);
                values.set(&format!("answers_{i}"), q.correct_answers.join(", "));
            }
        }
        ActivityContent::DragDrop { pairs } | ActivityContent::MultipleChoice { pairs } => {
            for (i, pair) in pairs.iter().enumerate() {
                values.set(&format!("word_{i}"), &pair.word);
                values.set(&format!("translation_{i}"), &pair.translation);
            }
        }
        ActivityContent::SentenceOrder { sentences } => {
            values.set("sentences", sentences.join("\n"));
        }
    }
    values
}

pub fn create_page(
    ty: ActivityType,
    values: &FormValues,
    errors: &FieldErrors,
    banner: Option<&str>,
) -> Markup {
    html! {
        h1 { "New " (ty.label().to_lowercase()) }

        nav."type-tabs" {
            ul {
                @for other in ActivityType::ALL {
                    li {
                        @if other == ty {
                            strong { (other.label()) }
                        } @else {
                            (nav_link(&names::new_activity_url(other.as_str()), html! { (other.label()) }))
                        }
                    }
                }
            }
        }

        @if let Some(message) = banner {
            (error_banner(message))
        }

        (editor(ty, &names::create_activity_url(ty.as_str()), "Create activity", values, errors))
    }
}

pub fn edit_page(
    id: i64,
    ty: ActivityType,
    title: &str,
    values: &FormValues,
    errors: &FieldErrors,
    banner: Option<&str>,
) -> Markup {
    html! {
        h1 { "Edit " (title) }
        p { small { (ty.label()) } }

        @if let Some(message) = banner {
            (error_banner(message))
        }

        (editor(ty, &names::update_activity_url(id), "Save changes", values, errors))
    }
}

/// Echo submitted fields back into the form after a failed validation.
pub fn submitted_values(form: &std::collections::HashMap<String, String>) -> FormValues {
    let mut values = FormValues::default();
    for (field, value) in form {
        values.set(field, value.clone());
    }
    values
}

fn editor(
    ty: ActivityType,
    action: &str,
    submit_label: &str,
    values: &FormValues,
    errors: &FieldErrors,
) -> Markup {
    html! {
        form hx-post=(action)
             hx-encoding="multipart/form-data"
             hx-target="main"
             hx-swap="innerHTML" {
            (common_fields(values, errors))
            (type_fields(ty, values, errors))
            button type="submit" { (submit_label) }
        }
    }
}

fn common_fields(values: &FormValues, errors: &FieldErrors) -> Markup {
    html! {
        label {
            "Title"
            input name="title" type="text" value=(values.get("title"));
            (field_error(errors, "title"))
        }
        label {
            "Description"
            textarea name="description" rows="2" { (values.get("description")) }
        }
        label {
            "Category"
            input name="category" type="text" placeholder="e.g. portuguese" value=(values.get("category"));
            (field_error(errors, "category"))
        }
        label {
            "Cover image (optional)"
            input name="cover_image" type="file" accept="image/*";
        }
    }
}

fn type_fields(ty: ActivityType, values: &FormValues, errors: &FieldErrors) -> Markup {
    match ty {
        ActivityType::WordSearch => word_search_fields(values, errors),
        ActivityType::Crossword => crossword_fields(values, errors),
        ActivityType::Quiz => quiz_fields(values, errors),
        ActivityType::Cloze => cloze_fields(values, errors),
        ActivityType::DragDrop | ActivityType::MultipleChoice => pair_fields(values, errors),
        ActivityType::SentenceOrder => sentence_order_fields(values, errors),
    }
}

fn minutes_field(values: &FormValues, errors: &FieldErrors) -> Markup {
    html! {
        label {
            "Time limit (minutes)"
            input name="time_limit" type="number" min="1" value=(values.get_or("time_limit", "5"));
            (field_error(errors, "time_limit"))
        }
    }
}

fn grid_size_fields(values: &FormValues, errors: &FieldErrors) -> Markup {
    html! {
        div."grid" {
            label {
                "Rows"
                input name="rows" type="number" min=(names::GRID_MIN_SIZE) max=(names::GRID_MAX_SIZE)
                      value=(values.get_or("rows", "10"));
                (field_error(errors, "rows"))
            }
            label {
                "Columns"
                input name="cols" type="number" min=(names::GRID_MIN_SIZE) max=(names::GRID_MAX_SIZE)
                      value=(values.get_or("cols", "10"));
                (field_error(errors, "cols"))
            }
        }
    }
}

fn word_search_fields(values: &FormValues, errors: &FieldErrors) -> Markup {
    html! {
        label {
            "Time (minutes)"
            input name="time" type="number" min="1" value=(values.get_or("time", "2"));
            (field_error(errors, "time"))
        }
        (grid_size_fields(values, errors))
        label {
            "Words (comma separated, at least " (names::MIN_WORD_SEARCH_WORDS) ")"
            textarea name="words" rows="3" placeholder="gato, sol, lua" { (values.get("words")) }
            (field_error(errors, "words"))
        }
    }
}

fn crossword_fields(values: &FormValues, errors: &FieldErrors) -> Markup {
    html! {
        (grid_size_fields(values, errors))
        div."grid" {
            label {
                "Words (one per line)"
                textarea name="words" rows="6" { (values.get("words")) }
                (field_error(errors, "words"))
            }
            label {
                "Clues (one per line, same order)"
                textarea name="clues" rows="6" { (values.get("clues")) }
                (field_error(errors, "clues"))
            }
        }
    }
}

fn quiz_fields(values: &FormValues, errors: &FieldErrors) -> Markup {
    let rows = ITEM_ROWS.max(values.indexed_len("question"));
    html! {
        (minutes_field(values, errors))
        label {
            input name="shuffle_questions" type="checkbox" role="switch"
                  checked[values.is_checked("shuffle_questions")];
            "Shuffle question order"
        }
        (field_error(errors, "questions"))
        @for index in 0..rows {
            fieldset {
                label {
                    "Question " (index + 1)
                    input name=(format!("question_{index}")) type="text"
                          value=(values.get(&format!("question_{index}")));
                    (field_error(errors, &format!("question_{index}")))
                }
                label {
                    "Options (comma separated)"
                    input name=(format!("options_{index}")) type="text"
                          value=(values.get(&format!("options_{index}")));
                    (field_error(errors, &format!("options_{index}")))
                }
                label {
                    "Correct answer"
                    input name=(format!("answer_{index}")) type="text"
                          value=(values.get(&format!("answer_{index}")));
                    (field_error(errors, &format!("answer_{index}")))
                }
            }
        }
    }
}

fn cloze_fields(values: &FormValues, errors: &FieldErrors) -> Markup {
    let rows = ITEM_ROWS.max(values.indexed_len("sentence"));
    html! {
        (minutes_field(values, errors))
        p { small { "Mark each gap with underscores, e.g. \"Ontem eu ___ cedo.\"" } }
        (field_error(errors, "questions"))
        @for index in 0..rows {
            fieldset {
                label {
                    "Sentence " (index + 1)
                    input name=(format!("sentence_{index}")) type="text"
                          value=(values.get(&format!("sentence_{index}")));
                    (field_error(errors, &format!("sentence_{index}")))
                }
                label {
                    "Answers (comma separated, one per gap)"
                    input name=(format!("answers_{index}")) type="text"
                          value=(values.get(&format!("answers_{index}")));
                    (field_error(errors, &format!("answers_{index}")))
                }
            }
        }
    }
}

fn pair_fields(values: &FormValues, errors: &FieldErrors) -> Markup {
    let rows = ITEM_ROWS.max(values.indexed_len("word"));
    html! {
        (minutes_field(values, errors))
        (field_error(errors, "pairs"))
        @for index in 0..rows {
            div."grid" {
                label {
                    "Word"
                    input name=(format!("word_{index}")) type="text"
                          value=(values.get(&format!("word_{index}")));
                    (field_error(errors, &format!("word_{index}")))
                }
                label {
                    "Translation"
                    input name=(format!("translation_{index}")) type="text"
                          value=(values.get(&format!("translation_{index}")));
                }
            }
        }
    }
}

fn sentence_order_fields(values: &FormValues, errors: &FieldErrors) -> Markup {
    html! {
        (minutes_field(values, errors))
        label {
            "Fast finish bonus points"
            input name="bonus_fast_finish" type="number" min="0"
                  value=(values.get_or("bonus_fast_finish", "10"));
        }
        label {
            "Sentences (one per line)"
            textarea name="sentences" rows="6" { (values.get("sentences")) }
            (field_error(errors, "sentences"))
        }
    }
}

pub fn created_page(title: &str, id: i64) -> Markup {
    html! {
        article {
            h1 { "Activity created" }
            p { strong { (title) } " is ready to play." }
            (nav_link(&names::activity_url(id), html! { button { "Open it" } }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityConfig, QuizQuestion};

    #[test]
    fn quiz_activity_flattens_to_indexed_fields() {
        let activity = Activity {
            id: 1,
            title: "Capitals".into(),
            description: String::new(),
            category: "geography".into(),
            ty: ActivityType::Quiz,
            status: "active".into(),
            cover_image: None,
            config: ActivityConfig {
                time_limit: Some(5),
                shuffle_questions: true,
                ..Default::default()
            },
            content: ActivityContent::Quiz {
                questions: vec![QuizQuestion {
                    question: "Capital of Portugal?".into(),
                    options: vec!["Lisboa".into(), "Porto".into()],
                    correct_answer: "Lisboa".into(),
                }],
            },
        };
        let values = activity_values(&activity);
        assert_eq!(values.get("question_0"), "Capital of Portugal?");
        assert_eq!(values.get("options_0"), "Lisboa, Porto");
        assert_eq!(values.get("time_limit"), "5");
        assert!(values.is_checked("shuffle_questions"));
        assert_eq!(values.indexed_len("question"), 1);
    }

    #[test]
    fn missing_values_fall_back_to_defaults() {
        let values = FormValues::default();
        assert_eq!(values.get("title"), "");
        assert_eq!(values.get_or("rows", "10"), "10");
        assert!(!values.is_checked("shuffle_questions"));
    }
}

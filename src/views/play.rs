use maud::{html, Markup};
use serde_json::json;

use crate::names;
use crate::play::cloze::{sentence_fragments, ClozeGame};
use crate::play::crossword::CrosswordGame;
use crate::play::drag_drop::DragDropGame;
use crate::play::multiple_choice::MultipleChoiceGame;
use crate::play::quiz::{QuizGame, QuizMode};
use crate::play::sentence_order::SentenceOrderGame;
use crate::play::word_search::WordSearchGame;
use crate::play::{AnyPlayer, Game, Phase, Player};

use super::components::nav_link;

/// The whole play screen for one session, whatever its phase.
pub fn play_page(token: &str, title: &str, activity_id: i64, player: &AnyPlayer) -> Markup {
    match player.phase() {
        Phase::NotStarted => start_screen(token, title),
        Phase::InProgress => board(token, title, player),
        Phase::Submitted => outcome_page(title, activity_id, player),
    }
}

fn start_screen(token: &str, title: &str) -> Markup {
    html! {
        article {
            h1 { (title) }
            p { "The clock starts when you do." }
            form hx-post=(names::play_begin_url(token))
                 hx-target="main"
                 hx-swap="innerHTML" {
                button type="submit" { "Start" }
            }
        }
    }
}

/// The polled countdown fragment. Once the run is submitted (usually by the
/// server clock hitting zero) it swaps the whole screen for the outcome.
pub fn clock_fragment(token: &str, player: &AnyPlayer) -> Markup {
    if player.is_submitted() {
        return html! {
            div hx-get=(names::play_url(token))
                hx-trigger="load"
                hx-target="main"
                hx-swap="innerHTML" {}
        };
    }
    match player.remaining() {
        Some(seconds) => html! { strong { (mmss(seconds)) } },
        None => html! { strong { (mmss(player.elapsed())) } },
    }
}

fn mmss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

fn board(token: &str, title: &str, player: &AnyPlayer) -> Markup {
    let inner = match player {
        AnyPlayer::WordSearch(p) => word_search_board(token, p),
        AnyPlayer::Crossword(p) => crossword_board(token, p),
        AnyPlayer::Quiz(p) => quiz_board(token, p),
        AnyPlayer::Cloze(p) => cloze_board(token, p),
        AnyPlayer::DragDrop(p) => drag_drop_board(token, p),
        AnyPlayer::MultipleChoice(p) => multiple_choice_board(token, p),
        AnyPlayer::SentenceOrder(p) => sentence_order_board(token, p),
    };

    html! {
        nav {
            ul { li { h1 { (title) } } }
            ul {
                li {
                    div."play-clock"
                        hx-get=(names::play_clock_url(token))
                        hx-trigger="every 1s"
                        hx-swap="innerHTML" {
                        (clock_fragment(token, player))
                    }
                }
            }
        }

        (inner)

        footer."play-controls" {
            div."grid" {
                form hx-post=(names::play_submit_url(token))
                     hx-target="main"
                     hx-swap="innerHTML" {
                    button type="submit" { "Finish" }
                }
                form hx-post=(names::play_abandon_url(token))
                     hx-target="main"
                     hx-swap="innerHTML"
                     hx-confirm="Abandon this run? Your progress is lost." {
                    button type="submit" class="secondary" { "Abandon" }
                }
            }
        }
    }
}

/// All board interactions post here; the parameters ride in hx-vals or in
/// hidden/named inputs.
fn action_url(token: &str) -> String {
    names::play_action_url(token)
}

fn word_search_board(token: &str, player: &Player<WordSearchGame>) -> Markup {
    let game = &player.game;
    html! {
        p { small { "Tap the first and last letter of a word." } }
        table."word-search" {
            @for (row, letters) in game.grid().iter().enumerate() {
                tr {
                    @for (col, &letter) in letters.iter().enumerate() {
                        td {
                            button."cell"
                                ."found"[game.is_found_cell(row, col)]
                                ."anchor"[game.anchor() == Some((row, col))]
                                hx-post=(action_url(token))
                                hx-vals=(json!({"action": "tap", "row": row, "col": col}).to_string())
                                hx-target="main"
                                hx-swap="innerHTML" {
                                (letter)
                            }
                        }
                    }
                }
            }
        }
        ul."word-list" {
            @for word in game.words() {
                li {
                    @if game.is_found(word) { s { (word) } } @else { (word) }
                }
            }
        }
    }
}

fn crossword_board(token: &str, player: &Player<CrosswordGame>) -> Markup {
    let game = &player.game;
    html! {
        @if game.was_checked() && !game.is_solved() {
            p."check-feedback" { "Some letters are wrong, keep going." }
        }
        table."crossword" {
            @for row in 0..game.rows() {
                tr {
                    @for col in 0..game.cols() {
                        @if game.is_blank(row, col) {
                            td."blank" {}
                        } @else {
                            td {
                                @if let Some(number) = game.clues_at(row, col).map(|c| c.number).min() {
                                    sup { (number) }
                                }
                                @let entry = game.entry(row, col);
                                input name="value" type="text" maxlength="1"
                                      value=(if entry == ' ' { String::new() } else { entry.to_string() })
                                      hx-post=(action_url(token))
                                      hx-vals=(json!({"action": "cell", "row": row, "col": col}).to_string())
                                      hx-trigger="change"
                                      hx-target="main"
                                      hx-swap="innerHTML";
                            }
                        }
                    }
                }
            }
        }
        div."grid" {
            div {
                h4 { "Across" }
                ul {
                    @for clue in game.across_clues() {
                        li { strong { (clue.number) ". " } (clue.clue) }
                    }
                }
            }
            div {
                h4 { "Down" }
                ul {
                    @for clue in game.down_clues() {
                        li { strong { (clue.number) ". " } (clue.clue) }
                    }
                }
            }
        }
        form hx-post=(action_url(token))
             hx-vals=(json!({"action": "check"}).to_string())
             hx-target="main"
             hx-swap="innerHTML" {
            button type="submit" class="outline" { "Check" }
        }
    }
}

fn quiz_board(token: &str, player: &Player<QuizGame>) -> Markup {
    let game = &player.game;
    match game.mode() {
        QuizMode::All => html! {
            @for (index, question) in game.questions().iter().enumerate() {
                article {
                    p { strong { (index + 1) ". " (question.question) } }
                    div."options" {
                        @for option in &question.options {
                            button."outline"."selected"[game.answer_for(index) == Some(option.as_str())]
                                hx-post=(action_url(token))
                                hx-vals=(json!({"action": "answer", "index": index, "value": option}).to_string())
                                hx-target="main"
                                hx-swap="innerHTML" {
                                (option)
                            }
                        }
                    }
                }
            }
        },
        QuizMode::Interactive => html! {
            p { small { "Question " (game.current_index() + 1) " of " (game.questions().len()) } }
            @if let Some(question) = game.current_question() {
                article {
                    p { strong { (question.question) } }
                    div."options" {
                        @for option in &question.options {
                            button class="outline"
                                hx-post=(action_url(token))
                                hx-vals=(json!({"action": "choose", "value": option}).to_string())
                                hx-target="main"
                                hx-swap="innerHTML" {
                                (option)
                            }
                        }
                    }
                }
            }
        },
    }
}

fn cloze_board(token: &str, player: &Player<ClozeGame>) -> Markup {
    let game = &player.game;
    html! {
        @for (index, question) in game.questions().iter().enumerate() {
            @let fragments = sentence_fragments(&question.sentence);
            p."cloze-sentence" {
                @for (gap, fragment) in fragments.iter().enumerate() {
                    (fragment)
                    @if gap + 1 < fragments.len() {
                        input."gap" name="value" type="text"
                              value=(game.answer_for(index, gap))
                              hx-post=(action_url(token))
                              hx-vals=(json!({"action": "fill", "index": index, "gap": gap}).to_string())
                              hx-trigger="change"
                              hx-target="main"
                              hx-swap="innerHTML";
                    }
                }
            }
        }
    }
}

fn drag_drop_board(token: &str, player: &Player<DragDropGame>) -> Markup {
    let game = &player.game;
    let available = game.available_words();
    html! {
        div."grid" {
            div {
                h4 { "Words" }
                ul."word-bank" {
                    @for word in &available {
                        li { (word) }
                    }
                }
            }
            div {
                @for (slot, pair) in game.pairs().iter().enumerate() {
                    article."slot" {
                        strong { (pair.translation) }
                        @if let Some(placement) = game.placement(slot) {
                            span."placed" { (placement.word) }
                        } @else if !available.is_empty() {
                            form hx-post=(action_url(token))
                                 hx-target="main"
                                 hx-swap="innerHTML" {
                                input type="hidden" name="action" value="drop";
                                input type="hidden" name="index" value=(slot);
                                select name="value" {
                                    @for word in &available {
                                        option value=(word) { (word) }
                                    }
                                }
                                button type="submit" class="outline" { "Place" }
                            }
                        }
                    }
                }
            }
        }
        form hx-post=(action_url(token))
             hx-vals=(json!({"action": "undo"}).to_string())
             hx-target="main"
             hx-swap="innerHTML" {
            button type="submit" class="secondary outline" { "Undo last move" }
        }
    }
}

fn multiple_choice_board(token: &str, player: &Player<MultipleChoiceGame>) -> Markup {
    let game = &player.game;
    html! {
        nav {
            ul { li { (hearts(game.lives())) } }
            ul { li { small { (game.remaining_words()) " words left" } } }
        }
        @if let Some(choice) = game.choices().last() {
            @if choice.is_correct {
                p."check-feedback right" { "Correct!" }
            } @else {
                p."check-feedback wrong" { "Not quite, " (choice.word) " goes back in the queue." }
            }
        }
        @if let Some(word) = game.current_word() {
            article {
                h2 { (word) }
                div."options" {
                    @for option in game.options() {
                        button class="outline"
                            hx-post=(action_url(token))
                            hx-vals=(json!({"action": "choose", "value": option}).to_string())
                            hx-target="main"
                            hx-swap="innerHTML" {
                            (option)
                        }
                    }
                }
            }
        }
    }
}

fn hearts(lives: u32) -> Markup {
    html! {
        span."lives" aria-label=(format!("{lives} lives left")) {
            ("❤".repeat(lives as usize))
        }
    }
}

fn sentence_order_board(token: &str, player: &Player<SentenceOrderGame>) -> Markup {
    let game = &player.game;
    let order = game.order();
    html! {
        nav {
            ul { li { small { "Sentence " (game.current_index() + 1) " of " (game.total()) } } }
            ul { li { strong { (game.points()) " pts" } } }
        }
        div."sentence-strip" {
            @for (index, word) in order.iter().enumerate() {
                @let result = game.last_check().and_then(|c| c.word_results.get(index)).copied();
                span."word-chip"
                    ."right"[result == Some(1)]
                    ."wrong"[result == Some(-1)] {
                    @if index > 0 {
                        button."move"
                            hx-post=(action_url(token))
                            hx-vals=(json!({"action": "move", "from": index, "to": index - 1}).to_string())
                            hx-target="main"
                            hx-swap="innerHTML" {
                            "◀"
                        }
                    }
                    (word)
                    @if index + 1 < order.len() {
                        button."move"
                            hx-post=(action_url(token))
                            hx-vals=(json!({"action": "move", "from": index, "to": index + 1}).to_string())
                            hx-target="main"
                            hx-swap="innerHTML" {
                            "▶"
                        }
                    }
                }
            }
        }
        @if let Some(check) = game.last_check() {
            @if check.perfect {
                p."check-feedback right" { "Perfect! +" (check.earned) " points" }
            } @else if check.first_try {
                p."check-feedback" { "+" (check.earned) " for the words in place. Keep rearranging." }
            } @else {
                p."check-feedback" { "Keep rearranging, retries score nothing." }
            }
        }
        form hx-post=(action_url(token))
             hx-vals=(json!({"action": "check"}).to_string())
             hx-target="main"
             hx-swap="innerHTML" {
            button type="submit" { "Check order" }
        }
    }
}

fn outcome_page(title: &str, activity_id: i64, player: &AnyPlayer) -> Markup {
    let Some(outcome) = player.outcome() else {
        // a submitted player always has an outcome; guard anyway
        return html! { article { p { "This run is over." } } };
    };

    html! {
        article."outcome"."celebrate"[outcome.is_perfect()] {
            @if outcome.is_perfect() {
                h1 { "🎉 Perfect!" }
            } @else {
                h1 { "Results" }
            }
            p { (title) }
            p."score" { strong { (outcome.formatted()) } }
            p { small { (outcome.correct) " of " (outcome.total) " correct" } }

            @if let AnyPlayer::SentenceOrder(p) = player {
                p {
                    strong { (p.game.points()) " points" }
                    " in " (mmss(p.elapsed()))
                }
            }

            (nav_link(&names::activity_url(activity_id), html! { button { "Back to the activity" } }))
        }
    }
}

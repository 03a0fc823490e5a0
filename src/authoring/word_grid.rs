//! Server-side grid generation for word search and crossword activities.
//! Authors only submit word lists; the solved letter grids are built here.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{ClueDirection, CrosswordClue, CrosswordContent, WordPosition, WordSearchContent};

const PLACEMENT_ATTEMPTS: usize = 200;

/// Working canvas for the crossword layout before trimming.
const CANVAS: usize = 64;

/// Build a word-search grid of the requested size. Words are laid out on
/// random straight lines (left-to-right, top-to-bottom or diagonal); a word
/// that cannot be placed after a bounded number of attempts is left out of
/// `word_positions`, and players only have to find the placed ones.
pub fn generate_word_search(words: &[String], rows: usize, cols: usize) -> WordSearchContent {
    let mut rng = rand::thread_rng();
    let mut grid: Vec<Vec<Option<char>>> = vec![vec![None; cols]; rows];
    let mut word_positions = Vec::new();

    const DIRECTIONS: [(&str, usize, usize); 3] = [
        ("horizontal", 0, 1),
        ("vertical", 1, 0),
        ("diagonal", 1, 1),
    ];

    for word in words {
        let letters: Vec<char> = word
            .trim()
            .chars()
            .flat_map(char::to_uppercase)
            .collect();
        if letters.is_empty() {
            continue;
        }

        for _ in 0..PLACEMENT_ATTEMPTS {
            let &(direction, dr, dc) = DIRECTIONS
                .choose(&mut rng)
                .unwrap_or(&DIRECTIONS[0]);
            let span = letters.len() - 1;
            if dr * span >= rows || dc * span >= cols {
                continue;
            }
            let row = rng.gen_range(0..rows - dr * span);
            let col = rng.gen_range(0..cols - dc * span);

            let fits = letters.iter().enumerate().all(|(k, &letter)| {
                let cell = grid[row + dr * k][col + dc * k];
                cell.is_none() || cell == Some(letter)
            });
            if !fits {
                continue;
            }

            for (k, &letter) in letters.iter().enumerate() {
                grid[row + dr * k][col + dc * k] = Some(letter);
            }
            word_positions.push(WordPosition {
                word: word.trim().to_string(),
                row,
                col,
                direction: direction.to_string(),
            });
            break;
        }
    }

    let grid = grid
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| cell.unwrap_or_else(|| random_letter(&mut rng)))
                .collect()
        })
        .collect();

    WordSearchContent {
        words: words.iter().map(|w| w.trim().to_string()).collect(),
        grid,
        word_positions,
    }
}

fn random_letter(rng: &mut impl Rng) -> char {
    (b'A' + rng.gen_range(0..26)) as char
}

struct PlacedWord {
    word: String,
    clue: String,
    row: usize,
    col: usize,
    direction: ClueDirection,
}

/// Build a crossword layout from word/clue pairs. The first word anchors the
/// canvas; later words attach at a shared letter when possible and fall back
/// to a free row below the layout otherwise, so every item always appears.
pub fn generate_crossword(items: &[(String, String)]) -> CrosswordContent {
    let mut canvas: Vec<Vec<Option<char>>> = vec![vec![None; CANVAS]; CANVAS];
    let mut placed: Vec<PlacedWord> = Vec::new();

    for (word, clue) in items {
        let letters: Vec<char> = word
            .trim()
            .chars()
            .flat_map(char::to_uppercase)
            .collect();
        if letters.is_empty() || letters.len() > CANVAS {
            continue;
        }

        let spot = if placed.is_empty() {
            Some((CANVAS / 2, (CANVAS - letters.len()) / 2, ClueDirection::Across))
        } else {
            intersection_spot(&canvas, &letters).or_else(|| free_row_spot(&canvas, letters.len()))
        };

        let Some((row, col, direction)) = spot else {
            continue; // canvas exhausted, drop the word
        };

        let (dr, dc) = step(direction);
        for (k, &letter) in letters.iter().enumerate() {
            canvas[row + dr * k][col + dc * k] = Some(letter);
        }
        placed.push(PlacedWord {
            word: word.trim().to_string(),
            clue: clue.trim().to_string(),
            row,
            col,
            direction,
        });
    }

    trim_layout(canvas, placed)
}

fn step(direction: ClueDirection) -> (usize, usize) {
    match direction {
        ClueDirection::Across => (0, 1),
        ClueDirection::Down => (1, 0),
    }
}

/// First placement that crosses an existing word at a shared letter.
fn intersection_spot(
    canvas: &[Vec<Option<char>>],
    letters: &[char],
) -> Option<(usize, usize, ClueDirection)> {
    for (k, &letter) in letters.iter().enumerate() {
        for (row, cells) in canvas.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if *cell != Some(letter) {
                    continue;
                }
                // down word through (row, col), letter index k
                if row >= k {
                    let start = (row - k, col, ClueDirection::Down);
                    if placement_fits(canvas, letters, start) {
                        return Some(start);
                    }
                }
                // across word through (row, col)
                if col >= k {
                    let start = (row, col - k, ClueDirection::Across);
                    if placement_fits(canvas, letters, start) {
                        return Some(start);
                    }
                }
            }
        }
    }
    None
}

fn placement_fits(
    canvas: &[Vec<Option<char>>],
    letters: &[char],
    (row, col, direction): (usize, usize, ClueDirection),
) -> bool {
    let (dr, dc) = step(direction);
    let end_row = row + dr * (letters.len() - 1);
    let end_col = col + dc * (letters.len() - 1);
    if end_row >= CANVAS || end_col >= CANVAS {
        return false;
    }

    let occupied = |r: isize, c: isize| {
        r >= 0
            && c >= 0
            && (r as usize) < CANVAS
            && (c as usize) < CANVAS
            && canvas[r as usize][c as usize].is_some()
    };

    // the cells just before and after the word must be free
    if occupied(row as isize - dr as isize, col as isize - dc as isize)
        || occupied(end_row as isize + dr as isize, end_col as isize + dc as isize)
    {
        return false;
    }

    let mut crossings = 0;
    for (k, &letter) in letters.iter().enumerate() {
        let (r, c) = (row + dr * k, col + dc * k);
        match canvas[r][c] {
            Some(existing) if existing == letter => crossings += 1,
            Some(_) => return false,
            None => {
                // a fresh cell may not touch a parallel word
                let (pr, pc) = (dc as isize, dr as isize);
                if occupied(r as isize - pr, c as isize - pc)
                    || occupied(r as isize + pr, c as isize + pc)
                {
                    return false;
                }
            }
        }
    }
    crossings > 0
}

/// An empty row two below everything placed so far.
fn free_row_spot(
    canvas: &[Vec<Option<char>>],
    length: usize,
) -> Option<(usize, usize, ClueDirection)> {
    let last_used = canvas
        .iter()
        .rposition(|row| row.iter().any(Option::is_some))?;
    let row = last_used + 2;
    if row >= CANVAS || length > CANVAS {
        return None;
    }
    Some((row, 0, ClueDirection::Across))
}

/// Cut the canvas down to the bounding box of the layout, shift the clue
/// coordinates and assign scan-order clue numbers (shared when an across and
/// a down word start on the same cell).
fn trim_layout(canvas: Vec<Vec<Option<char>>>, placed: Vec<PlacedWord>) -> CrosswordContent {
    let mut min_row = CANVAS;
    let mut max_row = 0;
    let mut min_col = CANVAS;
    let mut max_col = 0;
    for (row, cells) in canvas.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if cell.is_some() {
                min_row = min_row.min(row);
                max_row = max_row.max(row);
                min_col = min_col.min(col);
                max_col = max_col.max(col);
            }
        }
    }
    if min_row > max_row {
        return CrosswordContent {
            grid: Vec::new(),
            clues: Vec::new(),
        };
    }

    let grid: Vec<Vec<char>> = canvas[min_row..=max_row]
        .iter()
        .map(|row| {
            row[min_col..=max_col]
                .iter()
                .map(|cell| cell.unwrap_or(' '))
                .collect()
        })
        .collect();

    let mut starts: Vec<(usize, usize)> = placed
        .iter()
        .map(|p| (p.row - min_row, p.col - min_col))
        .collect();
    starts.sort_unstable();
    starts.dedup();

    let clues = placed
        .into_iter()
        .map(|p| {
            let (row, col) = (p.row - min_row, p.col - min_col);
            let number = starts
                .iter()
                .position(|&start| start == (row, col))
                .map_or(0, |i| i + 1);
            CrosswordClue {
                word: p.word,
                clue: p.clue,
                row,
                col,
                direction: p.direction,
                number,
            }
        })
        .collect();

    CrosswordContent { grid, clues }
}

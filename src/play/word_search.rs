use crate::models::WordSearchContent;

use super::Game;

/// Outcome of resolving a two-tap selection against the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// First tap recorded, waiting for the end cell.
    Anchored,
    /// The traced line spells a listed word that was not yet found.
    Found(String),
    /// The traced line spells a word that was already crossed off.
    AlreadyFound(String),
    /// Straight line, but not a listed word.
    NotAWord,
    /// The two cells are not on a horizontal, vertical or diagonal line.
    NotALine,
}

/// Word search: trace straight lines over a letter grid. The word list is
/// filtered to words that actually have a placement, matching the original
/// player's behavior with inconsistent content.
#[derive(Debug, Clone)]
pub struct WordSearchGame {
    grid: Vec<Vec<char>>,
    words: Vec<String>,
    found: Vec<String>,
    found_cells: Vec<(usize, usize)>,
    anchor: Option<(usize, usize)>,
}

impl WordSearchGame {
    pub fn new(content: &WordSearchContent) -> Self {
        let words = content
            .words
            .iter()
            .filter(|word| {
                content
                    .word_positions
                    .iter()
                    .any(|pos| pos.word.eq_ignore_ascii_case(word))
            })
            .cloned()
            .collect();
        WordSearchGame {
            grid: content.grid.clone(),
            words,
            found: Vec::new(),
            found_cells: Vec::new(),
            anchor: None,
        }
    }

    pub fn grid(&self) -> &[Vec<char>] {
        &self.grid
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn is_found(&self, word: &str) -> bool {
        self.found.iter().any(|f| f.eq_ignore_ascii_case(word))
    }

    pub fn is_found_cell(&self, row: usize, col: usize) -> bool {
        self.found_cells.contains(&(row, col))
    }

    pub fn anchor(&self) -> Option<(usize, usize)> {
        self.anchor
    }

    /// Two-tap selection: the first tap anchors the line, the second
    /// resolves it. Tapping the anchor again clears it.
    pub fn tap(&mut self, row: usize, col: usize) -> Selection {
        match self.anchor.take() {
            None => {
                self.anchor = Some((row, col));
                Selection::Anchored
            }
            Some(start) if start == (row, col) => Selection::Anchored,
            Some(start) => self.select(start, (row, col)),
        }
    }

    /// Resolve a selection from `start` to `end`. Accepted iff the cells
    /// form a straight line whose letters case-insensitively equal a listed
    /// word; finding the same word twice is a no-op.
    pub fn select(&mut self, start: (usize, usize), end: (usize, usize)) -> Selection {
        let Some(cells) = line_cells(start, end, self.grid.len(), self.grid.first().map_or(0, Vec::len)) else {
            return Selection::NotALine;
        };

        let selected: String = cells
            .iter()
            .map(|&(r, c)| self.grid[r][c].to_ascii_lowercase())
            .collect();

        let Some(word) = self
            .words
            .iter()
            .find(|w| w.to_lowercase() == selected)
            .cloned()
        else {
            return Selection::NotAWord;
        };

        if self.is_found(&word) {
            return Selection::AlreadyFound(word);
        }

        self.found.push(word.clone());
        self.found_cells.extend(cells);
        Selection::Found(word)
    }
}

/// Cells on the straight line from `start` to `end`, or `None` when the
/// deltas are neither equal in magnitude nor zero.
fn line_cells(
    start: (usize, usize),
    end: (usize, usize),
    rows: usize,
    cols: usize,
) -> Option<Vec<(usize, usize)>> {
    let delta_row = end.0 as i64 - start.0 as i64;
    let delta_col = end.1 as i64 - start.1 as i64;

    if delta_row != 0 && delta_col != 0 && delta_row.abs() != delta_col.abs() {
        return None;
    }

    let step_row = delta_row.signum();
    let step_col = delta_col.signum();
    let length = delta_row.abs().max(delta_col.abs()) + 1;

    let mut cells = Vec::with_capacity(length as usize);
    for i in 0..length {
        let r = start.0 as i64 + step_row * i;
        let c = start.1 as i64 + step_col * i;
        if r < 0 || r >= rows as i64 || c < 0 || c >= cols as i64 {
            break;
        }
        cells.push((r as usize, c as usize));
    }
    Some(cells)
}

impl Game for WordSearchGame {
    fn total(&self) -> usize {
        self.words.len()
    }

    fn correct(&self) -> usize {
        self.found.len()
    }

    fn finished(&self) -> bool {
        !self.words.is_empty() && self.found.len() == self.words.len()
    }

    fn reset(&mut self) {
        self.found.clear();
        self.found_cells.clear();
        self.anchor = None;
    }
}

#[cfg(test)]
mod tests {
    use crate::models::WordPosition;

    use super::*;

    fn content() -> WordSearchContent {
        // SOL across the top row (from col 1), GATO down the first column.
        let grid = vec![
            vec!['G', 'S', 'O', 'L'],
            vec!['A', 'Q', 'W', 'E'],
            vec!['T', 'R', 'T', 'Y'],
            vec!['O', 'P', 'A', 'D'],
        ];
        WordSearchContent {
            words: vec!["sol".into(), "gato".into(), "fantasma".into()],
            grid,
            word_positions: vec![
                WordPosition { word: "sol".into(), row: 0, col: 1, direction: "horizontal".into() },
                WordPosition { word: "gato".into(), row: 0, col: 0, direction: "vertical".into() },
            ],
        }
    }

    fn game() -> WordSearchGame {
        // "fantasma" has no placement, so only two words are in play.
        let game = WordSearchGame::new(&content());
        assert_eq!(game.words().len(), 2);
        game
    }

    #[test]
    fn straight_line_matching_a_word_is_found() {
        let mut game = game();
        assert_eq!(game.select((0, 1), (0, 3)), Selection::Found("sol".into()));
        assert!(game.is_found("sol"));
        assert!(game.is_found_cell(0, 2));
    }

    #[test]
    fn diagonal_and_reverse_selections_resolve_letters() {
        let mut game = game();
        // diagonal G-Q-T spells "gqt"
        assert_eq!(game.select((0, 0), (2, 2)), Selection::NotAWord);
        // reverse reading: L-O-S
        assert_eq!(game.select((0, 3), (0, 1)), Selection::NotAWord);
    }

    #[test]
    fn crooked_selection_is_rejected() {
        let mut game = game();
        assert_eq!(game.select((0, 0), (1, 2)), Selection::NotALine);
    }

    #[test]
    fn duplicate_find_is_a_no_op() {
        let mut game = game();
        game.select((0, 1), (0, 3));
        assert_eq!(
            game.select((0, 1), (0, 3)),
            Selection::AlreadyFound("sol".into())
        );
        assert_eq!(game.correct(), 1);
    }

    #[test]
    fn finding_every_placed_word_finishes_the_game() {
        let mut game = game();
        assert_eq!(game.select((0, 0), (3, 0)), Selection::Found("gato".into()));
        assert!(!game.finished());
        game.select((0, 1), (0, 3));
        assert!(game.finished());
        assert_eq!(game.correct(), 2);
    }

    #[test]
    fn two_tap_selection_flow() {
        let mut game = game();
        assert_eq!(game.tap(0, 1), Selection::Anchored);
        assert_eq!(game.tap(0, 3), Selection::Found("sol".into()));
        assert_eq!(game.anchor(), None);
    }
}

use crate::models::{ClueDirection, CrosswordClue, CrosswordContent};

use super::Game;

/// Crossword over the stored solution grid, trimmed to the rectangle that
/// actually carries letters. Clue coordinates are shifted by the trim
/// offset; clues that fall outside the trimmed grid are dropped.
#[derive(Debug, Clone)]
pub struct CrosswordGame {
    solution: Vec<Vec<char>>,
    clues: Vec<CrosswordClue>,
    entries: Vec<Vec<char>>,
    checked: bool,
}

impl CrosswordGame {
    pub fn new(content: &CrosswordContent) -> Self {
        let (solution, offset) = trim_grid(&content.grid);
        let rows = solution.len();
        let cols = solution.first().map_or(0, Vec::len);

        let clues = content
            .clues
            .iter()
            .filter_map(|clue| {
                let row = clue.row.checked_sub(offset.0)?;
                let col = clue.col.checked_sub(offset.1)?;
                (row < rows && col < cols).then(|| CrosswordClue {
                    row,
                    col,
                    ..clue.clone()
                })
            })
            .collect();

        CrosswordGame {
            solution,
            clues,
            entries: vec![vec![' '; cols]; rows],
            checked: false,
        }
    }

    pub fn rows(&self) -> usize {
        self.solution.len()
    }

    pub fn cols(&self) -> usize {
        self.solution.first().map_or(0, Vec::len)
    }

    pub fn is_blank(&self, row: usize, col: usize) -> bool {
        self.solution[row][col] == ' '
    }

    pub fn entry(&self, row: usize, col: usize) -> char {
        self.entries[row][col]
    }

    pub fn clues_at(&self, row: usize, col: usize) -> impl Iterator<Item = &CrosswordClue> {
        self.clues
            .iter()
            .filter(move |clue| clue.row == row && clue.col == col)
    }

    pub fn across_clues(&self) -> impl Iterator<Item = &CrosswordClue> {
        self.clues
            .iter()
            .filter(|clue| clue.direction == ClueDirection::Across)
    }

    pub fn down_clues(&self) -> impl Iterator<Item = &CrosswordClue> {
        self.clues
            .iter()
            .filter(|clue| clue.direction == ClueDirection::Down)
    }

    /// Write one letter into a non-blank cell; only the first character of
    /// the input counts, uppercased as the original player did.
    pub fn set_cell(&mut self, row: usize, col: usize, value: &str) {
        if row >= self.rows() || col >= self.cols() || self.is_blank(row, col) {
            return;
        }
        self.entries[row][col] = value
            .chars()
            .next()
            .map_or(' ', |c| c.to_ascii_uppercase());
    }

    /// Solved iff every non-blank cell matches the entry case-insensitively.
    pub fn is_solved(&self) -> bool {
        self.solution.iter().enumerate().all(|(r, row)| {
            row.iter()
                .enumerate()
                .all(|(c, &cell)| cell == ' ' || self.entries[r][c].eq_ignore_ascii_case(&cell))
        })
    }

    /// Record that the user asked for a check; used by the view to decide
    /// whether to show the "some letters are wrong" message.
    pub fn check(&mut self) -> bool {
        self.checked = true;
        self.is_solved()
    }

    pub fn was_checked(&self) -> bool {
        self.checked
    }

    /// Whether every cell of one clue's word is filled in correctly.
    fn clue_solved(&self, clue: &CrosswordClue) -> bool {
        let len = clue.word.chars().count();
        (0..len).all(|i| {
            let (r, c) = match clue.direction {
                ClueDirection::Across => (clue.row, clue.col + i),
                ClueDirection::Down => (clue.row + i, clue.col),
            };
            r < self.rows()
                && c < self.cols()
                && !self.is_blank(r, c)
                && self.entries[r][c].eq_ignore_ascii_case(&self.solution[r][c])
        })
    }
}

/// Trim blank margins; returns the trimmed grid and the (row, col) offset.
/// A grid with no letters comes back unchanged.
fn trim_grid(grid: &[Vec<char>]) -> (Vec<Vec<char>>, (usize, usize)) {
    let mut min_row = grid.len();
    let mut max_row = 0usize;
    let mut min_col = grid.first().map_or(0, Vec::len);
    let mut max_col = 0usize;
    let mut any = false;

    for (r, row) in grid.iter().enumerate() {
        for (c, &cell) in row.iter().enumerate() {
            if cell != ' ' {
                any = true;
                min_row = min_row.min(r);
                max_row = max_row.max(r);
                min_col = min_col.min(c);
                max_col = max_col.max(c);
            }
        }
    }

    if !any {
        return (grid.to_vec(), (0, 0));
    }

    let trimmed = grid[min_row..=max_row]
        .iter()
        .map(|row| row[min_col..=max_col].to_vec())
        .collect();
    (trimmed, (min_row, min_col))
}

impl Game for CrosswordGame {
    fn total(&self) -> usize {
        self.clues.len()
    }

    fn correct(&self) -> usize {
        self.clues
            .iter()
            .filter(|clue| self.clue_solved(clue))
            .count()
    }

    fn finished(&self) -> bool {
        !self.clues.is_empty() && self.checked && self.is_solved()
    }

    fn reset(&mut self) {
        for row in &mut self.entries {
            row.fill(' ');
        }
        self.checked = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> CrosswordContent {
        // 5x5 outer grid with letters only in a 3x3 corner starting at (1,1):
        //   S O L
        //   O . .
        //   L . .
        let mut grid = vec![vec![' '; 5]; 5];
        for (i, ch) in "SOL".chars().enumerate() {
            grid[1][1 + i] = ch;
            grid[1 + i][1] = ch;
        }
        CrosswordContent {
            grid,
            clues: vec![
                CrosswordClue {
                    word: "sol".into(),
                    clue: "Star of our sky".into(),
                    row: 1,
                    col: 1,
                    direction: ClueDirection::Across,
                    number: 1,
                },
                CrosswordClue {
                    word: "sol".into(),
                    clue: "Same, but down".into(),
                    row: 1,
                    col: 1,
                    direction: ClueDirection::Down,
                    number: 1,
                },
            ],
        }
    }

    #[test]
    fn grid_is_trimmed_and_clues_shifted() {
        let game = CrosswordGame::new(&content());
        assert_eq!(game.rows(), 3);
        assert_eq!(game.cols(), 3);
        assert_eq!(game.clues_at(0, 0).count(), 2);
    }

    #[test]
    fn solution_check_is_case_insensitive_over_non_blank_cells() {
        let mut game = CrosswordGame::new(&content());
        game.set_cell(0, 0, "s");
        game.set_cell(0, 1, "o");
        game.set_cell(0, 2, "L");
        game.set_cell(1, 0, "o");
        game.set_cell(2, 0, "l");
        assert!(game.check());
        assert_eq!(game.correct(), 2);
        assert!(game.finished());
    }

    #[test]
    fn one_wrong_letter_fails_the_check() {
        let mut game = CrosswordGame::new(&content());
        game.set_cell(0, 0, "s");
        game.set_cell(0, 1, "o");
        game.set_cell(0, 2, "x");
        game.set_cell(1, 0, "o");
        game.set_cell(2, 0, "l");
        assert!(!game.check());
        // the down word is still complete
        assert_eq!(game.correct(), 1);
    }

    #[test]
    fn blank_cells_ignore_writes() {
        let mut game = CrosswordGame::new(&content());
        game.set_cell(2, 2, "z");
        assert_eq!(game.entry(2, 2), ' ');
    }
}

use crate::format::ZERO_TIME;

/// Number of light columns on the board
pub const COLUMNS: usize = 5;

/// Lamps stacked in each column; the bottom `LIT_LAMPS` follow the column state
pub const LAMPS_PER_COLUMN: usize = 4;
pub const LIT_LAMPS: usize = 2;

/// Rendering collaborator driven by the game controller.
///
/// Columns are 1-indexed. All operations are idempotent.
pub trait Renderer {
    fn set_column_lit(&mut self, column: usize, lit: bool);
    fn set_timer_text(&mut self, text: &str);
    fn set_message_text(&mut self, text: &str);
    fn set_best_time_text(&mut self, text: &str);
}

/// In-memory display model read by the terminal widget
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    columns: [bool; COLUMNS],
    pub timer_text: String,
    pub message_text: String,
    pub best_time_text: String,
}

impl Board {
    pub fn new() -> Self {
        Self {
            columns: [false; COLUMNS],
            timer_text: ZERO_TIME.to_string(),
            message_text: String::new(),
            best_time_text: ZERO_TIME.to_string(),
        }
    }

    pub fn is_column_lit(&self, column: usize) -> bool {
        column
            .checked_sub(1)
            .and_then(|idx| self.columns.get(idx))
            .copied()
            .unwrap_or(false)
    }

    pub fn lit_count(&self) -> usize {
        self.columns.iter().filter(|lit| **lit).count()
    }

    /// Whether lamp `row` (0 = top) of `column` is lit
    pub fn is_lamp_lit(&self, column: usize, row: usize) -> bool {
        row >= LAMPS_PER_COLUMN - LIT_LAMPS && row < LAMPS_PER_COLUMN && self.is_column_lit(column)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for Board {
    fn set_column_lit(&mut self, column: usize, lit: bool) {
        if let Some(slot) = column
            .checked_sub(1)
            .and_then(|idx| self.columns.get_mut(idx))
        {
            *slot = lit;
        }
    }

    fn set_timer_text(&mut self, text: &str) {
        self.timer_text = text.to_string();
    }

    fn set_message_text(&mut self, text: &str) {
        self.message_text = text.to_string();
    }

    fn set_best_time_text(&mut self, text: &str) {
        self.best_time_text = text.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_defaults() {
        let board = Board::default();
        assert_eq!(board.lit_count(), 0);
        assert_eq!(board.timer_text, "00.000");
        assert_eq!(board.best_time_text, "00.000");
        assert!(board.message_text.is_empty());
    }

    #[test]
    fn test_set_column_lit_is_idempotent() {
        let mut board = Board::new();
        board.set_column_lit(3, true);
        board.set_column_lit(3, true);
        assert!(board.is_column_lit(3));
        assert_eq!(board.lit_count(), 1);

        board.set_column_lit(3, false);
        board.set_column_lit(3, false);
        assert!(!board.is_column_lit(3));
        assert_eq!(board.lit_count(), 0);
    }

    #[test]
    fn test_out_of_range_columns_ignored() {
        let mut board = Board::new();
        board.set_column_lit(0, true);
        board.set_column_lit(COLUMNS + 1, true);
        assert_eq!(board.lit_count(), 0);
        assert!(!board.is_column_lit(0));
        assert!(!board.is_column_lit(COLUMNS + 1));
    }

    #[test]
    fn test_only_bottom_lamps_follow_column() {
        let mut board = Board::new();
        board.set_column_lit(1, true);

        assert!(!board.is_lamp_lit(1, 0));
        assert!(!board.is_lamp_lit(1, 1));
        assert!(board.is_lamp_lit(1, 2));
        assert!(board.is_lamp_lit(1, 3));
        assert!(!board.is_lamp_lit(1, 4));
        assert!(!board.is_lamp_lit(2, 3));
    }

    #[test]
    fn test_texts() {
        let mut board = Board::new();
        board.set_timer_text("JUMP START!");
        board.set_message_text("GO!");
        board.set_best_time_text("00.300");
        assert_eq!(board.timer_text, "JUMP START!");
        assert_eq!(board.message_text, "GO!");
        assert_eq!(board.best_time_text, "00.300");
    }
}

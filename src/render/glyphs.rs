// Box-drawing and bar glyph sets

use crate::config::OutputMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
    /// `┬`
    pub tee_down: char,
    /// `┴`
    pub tee_up: char,
    /// `├`
    pub tee_right: char,
    /// `┤`
    pub tee_left: char,
    pub cross: char,
    pub bar_filled: char,
    pub bar_empty: char,
    /// Last character of a truncated cell.
    pub ellipsis: char,
}

pub const UNICODE: Glyphs = Glyphs {
    top_left: '┌',
    top_right: '┐',
    bottom_left: '└',
    bottom_right: '┘',
    horizontal: '─',
    vertical: '│',
    tee_down: '┬',
    tee_up: '┴',
    tee_right: '├',
    tee_left: '┤',
    cross: '┼',
    bar_filled: '█',
    bar_empty: '░',
    ellipsis: '…',
};

pub const ASCII: Glyphs = Glyphs {
    top_left: '+',
    top_right: '+',
    bottom_left: '+',
    bottom_right: '+',
    horizontal: '-',
    vertical: '|',
    tee_down: '+',
    tee_up: '+',
    tee_right: '+',
    tee_left: '+',
    cross: '+',
    bar_filled: '#',
    bar_empty: '.',
    ellipsis: '~',
};

impl Glyphs {
    pub fn for_mode(mode: OutputMode) -> &'static Glyphs {
        match mode {
            OutputMode::Ascii => &ASCII,
            OutputMode::Table | OutputMode::Json => &UNICODE,
        }
    }
}

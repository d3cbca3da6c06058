// Proportional bar graphs

use crossterm::style::{Color, Stylize, style};

use super::glyphs::Glyphs;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarSpec {
    percent: f64,
    width: usize,
}

impl BarSpec {
    /// Percent is clamped to [0, 100]; NaN counts as 0.
    pub fn new(percent: f64, width: usize) -> Self {
        let percent = if percent.is_nan() {
            0.0
        } else {
            percent.clamp(0.0, 100.0)
        };
        Self { percent, width }
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// round_half_up(p / 100 * w), never more than `w`.
    pub fn filled(&self) -> usize {
        let exact = self.percent * self.width as f64 / 100.0;
        ((exact + 0.5).floor() as usize).min(self.width)
    }

    pub fn empty(&self) -> usize {
        self.width - self.filled()
    }

    pub fn render(&self, glyphs: &Glyphs) -> String {
        let mut out = String::with_capacity(self.width * 3);
        out.extend(std::iter::repeat_n(glyphs.bar_filled, self.filled()));
        out.extend(std::iter::repeat_n(glyphs.bar_empty, self.empty()));
        out
    }

    /// Same glyphs as `render`, with the filled run colored by severity.
    pub fn render_colored(&self, glyphs: &Glyphs) -> String {
        let filled: String = std::iter::repeat_n(glyphs.bar_filled, self.filled()).collect();
        let empty: String = std::iter::repeat_n(glyphs.bar_empty, self.empty()).collect();
        if filled.is_empty() {
            return empty;
        }
        format!("{}{}", style(filled).with(self.severity()), empty)
    }

    fn severity(&self) -> Color {
        if self.percent < 60.0 {
            Color::Green
        } else if self.percent < 85.0 {
            Color::Yellow
        } else {
            Color::Red
        }
    }
}

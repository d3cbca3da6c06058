// Fixed-geometry table primitives: borders, dividers, padded or truncated cells

use super::bar::BarSpec;
use super::glyphs::Glyphs;

pub const LABEL_WIDTH: usize = 12;
pub const DATA_WIDTH: usize = 32;
/// Label + data + borders and padding: `│ label │ data │`.
pub const ROW_WIDTH: usize = LABEL_WIDTH + DATA_WIDTH + 7;

/// Pads `text` to exactly `width` characters, or cuts it and ends with `ellipsis`.
/// Control characters become spaces so a value can never break a row.
pub fn fit_cell(text: &str, width: usize, ellipsis: char) -> String {
    let clean: Vec<char> = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    if clean.len() <= width {
        let mut out: String = clean.into_iter().collect();
        out.extend(std::iter::repeat_n(' ', width - out.chars().count()));
        return out;
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = clean.into_iter().take(width - 1).collect();
    out.push(ellipsis);
    out
}

#[derive(Debug, Clone)]
pub enum Row {
    Text { label: String, value: String },
    Bar { label: String, bar: BarSpec },
}

impl Row {
    pub fn text(label: impl Into<String>, value: impl Into<String>) -> Self {
        Row::Text {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn bar(label: impl Into<String>, percent: f64) -> Self {
        Row::Bar {
            label: label.into(),
            bar: BarSpec::new(percent, DATA_WIDTH),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Row::Text { label, .. } | Row::Bar { label, .. } => label,
        }
    }
}

pub struct TableRenderer<'a> {
    glyphs: &'a Glyphs,
    color: bool,
}

impl<'a> TableRenderer<'a> {
    pub fn new(glyphs: &'a Glyphs, color: bool) -> Self {
        Self { glyphs, color }
    }

    fn line(&self, left: char, fill: char, right: char) -> String {
        let mut out = String::with_capacity(ROW_WIDTH * 3 + 1);
        out.push(left);
        out.extend(std::iter::repeat_n(fill, ROW_WIDTH - 2));
        out.push(right);
        out.push('\n');
        out
    }

    fn split_line(&self, left: char, junction: char, right: char) -> String {
        let h = self.glyphs.horizontal;
        let mut out = String::with_capacity(ROW_WIDTH * 3 + 1);
        out.push(left);
        out.extend(std::iter::repeat_n(h, LABEL_WIDTH + 2));
        out.push(junction);
        out.extend(std::iter::repeat_n(h, DATA_WIDTH + 2));
        out.push(right);
        out.push('\n');
        out
    }

    /// `┌┬┬…┬┐`
    pub fn top_border(&self) -> String {
        let g = self.glyphs;
        self.line(g.top_left, g.tee_down, g.top_right)
    }

    /// `├┴┴…┴┤`
    pub fn header_base(&self) -> String {
        let g = self.glyphs;
        self.line(g.tee_right, g.tee_up, g.tee_left)
    }

    pub fn centered(&self, text: &str) -> String {
        let inner = ROW_WIDTH - 2;
        let fitted = fit_cell(text, inner, self.glyphs.ellipsis);
        let content = fitted.trim_end();
        let len = content.chars().count();
        let left = (inner - len) / 2;
        let right = inner - len - left;
        let v = self.glyphs.vertical;
        format!("{v}{}{content}{}{v}\n", " ".repeat(left), " ".repeat(right))
    }

    /// `├──…┬──…┤` below the header.
    pub fn top_divider(&self) -> String {
        let g = self.glyphs;
        self.split_line(g.tee_right, g.tee_down, g.tee_left)
    }

    /// `├──…┼──…┤` between sections.
    pub fn divider(&self) -> String {
        let g = self.glyphs;
        self.split_line(g.tee_right, g.cross, g.tee_left)
    }

    /// `└──…┴──…┘`
    pub fn footer(&self) -> String {
        let g = self.glyphs;
        self.split_line(g.bottom_left, g.tee_up, g.bottom_right)
    }

    pub fn row(&self, row: &Row) -> String {
        let g = self.glyphs;
        let label = fit_cell(row.label(), LABEL_WIDTH, g.ellipsis);
        let value = match row {
            Row::Text { value, .. } => fit_cell(value, DATA_WIDTH, g.ellipsis),
            Row::Bar { bar, .. } if self.color => bar.render_colored(g),
            Row::Bar { bar, .. } => bar.render(g),
        };
        let v = g.vertical;
        format!("{v} {label} {v} {value} {v}\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::glyphs::{ASCII, UNICODE};

    #[test]
    fn fit_cell_pads_short_text() {
        assert_eq!(fit_cell("abc", 6, '…'), "abc   ");
        assert_eq!(fit_cell("abcdef", 6, '…'), "abcdef");
    }

    #[test]
    fn fit_cell_truncates_with_marker() {
        let cell = fit_cell("Intel(R) Core(TM) i9-13900K CPU @ 3.00GHz", DATA_WIDTH, '…');
        assert_eq!(cell.chars().count(), DATA_WIDTH);
        assert!(cell.ends_with('…'));
    }

    #[test]
    fn fit_cell_replaces_control_characters() {
        assert_eq!(fit_cell("a\tb\nc", 5, '…'), "a b c");
    }

    #[test]
    fn every_line_has_row_width() {
        for glyphs in [&UNICODE, &ASCII] {
            let renderer = TableRenderer::new(glyphs, false);
            let lines = [
                renderer.top_border(),
                renderer.header_base(),
                renderer.centered("TITLE"),
                renderer.centered(&"X".repeat(80)),
                renderer.top_divider(),
                renderer.row(&Row::text("OS", "Linux")),
                renderer.row(&Row::bar("USAGE", 42.0)),
                renderer.divider(),
                renderer.footer(),
            ];
            for line in &lines {
                assert_eq!(line.trim_end_matches('\n').chars().count(), ROW_WIDTH, "{line:?}");
            }
        }
    }

    #[test]
    fn centered_title_is_balanced() {
        let renderer = TableRenderer::new(&ASCII, false);
        let line = renderer.centered("AB");
        let inner = line.trim_end_matches('\n').trim_matches('|');
        let left = inner.len() - inner.trim_start().len();
        let right = inner.len() - inner.trim_end().len();
        assert!(left.abs_diff(right) <= 1);
    }
}

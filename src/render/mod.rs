// Report rendering: fixed-width table (Unicode or ASCII) or JSON document

mod bar;
mod format;
mod glyphs;
mod json;
mod report;
mod table;

pub use bar::BarSpec;
pub use glyphs::{ASCII, Glyphs, UNICODE};
pub use json::render_json;
pub use report::{CLIENT_IP_PLACEHOLDER, LAST_LOGIN_PLACEHOLDER, gpu_rows, render_table};
pub use table::{DATA_WIDTH, LABEL_WIDTH, ROW_WIDTH, Row, TableRenderer, fit_cell};

use crate::config::{OutputMode, ReportConfig};
use crate::models::Snapshot;

pub fn render(snapshot: &Snapshot, config: &ReportConfig) -> String {
    match config.mode {
        OutputMode::Table | OutputMode::Ascii => render_table(snapshot, config),
        OutputMode::Json => render_json(snapshot),
    }
}

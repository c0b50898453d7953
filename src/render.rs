// Result rendering: decide what shape a response has and print it as a
// key/value panel, a table, or CSV.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crossterm::style::Stylize;
use crossterm::tty::IsTty;
use serde::Deserialize;
use serde_json::{Map, Value};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::endpoints::title_case;
use crate::error::Result;

/// Rows printed in a table; the rest is only reachable through CSV.
pub const MAX_ROWS: usize = 20;

const DEFAULT_WIDTH: usize = 120;
const MIN_COLUMN_WIDTH: usize = 4;

/// What a response looks like once the `data` envelope is unwrapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape<'a> {
    /// A single object, shown as `key: value` lines.
    Panel(&'a Map<String, Value>),
    /// A list whose first element is an object.
    Table(&'a [Value]),
    /// Everything else, stringified.
    Scalar(&'a Value),
}

impl<'a> Shape<'a> {
    pub fn of(value: &'a Value) -> Self {
        let body = match value {
            Value::Object(map) => map.get("data").unwrap_or(value),
            other => other,
        };
        match body {
            Value::Object(map) => Shape::Panel(map),
            Value::Array(items) if matches!(items.first(), Some(Value::Object(_))) => {
                Shape::Table(items)
            }
            other => Shape::Scalar(other),
        }
    }
}

/// Pagination block RobotEvents attaches next to `data` on list endpoints.
#[derive(Debug, Deserialize, PartialEq)]
pub struct PageMeta {
    pub current_page: u64,
    pub last_page: u64,
    pub total: u64,
}

impl PageMeta {
    pub fn of(value: &Value) -> Option<Self> {
        let meta = value.get("meta")?;
        serde_json::from_value(meta.clone()).ok()
    }
}

/// Stringify a JSON value for display: strings verbatim, everything else
/// as compact JSON, absent values as an empty cell.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Column keys of a table, taken from its first row.
pub fn columns(rows: &[Value]) -> Vec<String> {
    match rows.first() {
        Some(Value::Object(first)) => first.keys().cloned().collect(),
        _ => Vec::new(),
    }
}

pub struct Renderer {
    color: bool,
    width: usize,
}

impl Renderer {
    /// Renderer for stdout: colored when attached to a terminal and sized
    /// to its width.
    pub fn for_stdout() -> Self {
        let color = io::stdout().is_tty();
        let width = crossterm::terminal::size()
            .map(|(w, _)| w as usize)
            .unwrap_or(DEFAULT_WIDTH);
        Renderer { color, width }
    }

    /// Uncolored renderer with a fixed width.
    pub fn plain(width: usize) -> Self {
        Renderer { color: false, width }
    }

    /// Render `value` under `title` and report the shape that was drawn.
    pub fn render<'v, W: Write>(
        &self,
        out: &mut W,
        title: &str,
        value: &'v Value,
    ) -> io::Result<Shape<'v>> {
        let shape = Shape::of(value);
        match shape {
            Shape::Panel(map) => {
                let lines = map
                    .iter()
                    .map(|(key, v)| match v {
                        Value::Object(o) => format!("{}: {} items", key, o.len()),
                        Value::Array(a) => format!("{}: {} items", key, a.len()),
                        other => format!("{}: {}", key, cell_text(Some(other))),
                    })
                    .collect::<Vec<_>>();
                self.panel(out, title, &lines)?;
            }
            Shape::Table(rows) => {
                self.table(out, title, rows)?;
                if rows.len() > MAX_ROWS {
                    let notice = format!("(Showing {} of {} results)", MAX_ROWS, rows.len());
                    writeln!(out, "{}", self.italic(&notice))?;
                }
                if let Some(meta) = PageMeta::of(value) {
                    writeln!(
                        out,
                        "Page {} of {} ({} total)",
                        meta.current_page, meta.last_page, meta.total
                    )?;
                }
            }
            Shape::Scalar(v) => {
                self.panel(out, title, &[cell_text(Some(v))])?;
            }
        }
        Ok(shape)
    }

    fn panel<W: Write>(&self, out: &mut W, title: &str, lines: &[String]) -> io::Result<()> {
        let max_inner = self.width.saturating_sub(4).max(MIN_COLUMN_WIDTH);
        let content_width = lines.iter().map(|l| text_width(l)).max().unwrap_or(0);
        let inner = content_width.max(title.width() + 2).min(max_inner);

        let title = truncate_to_width(title, inner.saturating_sub(1));
        let rule = inner.saturating_sub(title.width() + 1);
        writeln!(out, "╭─ {} {}╮", self.title(&title), "─".repeat(rule))?;
        for line in lines {
            for piece in fold(line, inner) {
                writeln!(out, "│ {} │", pad(&piece, inner))?;
            }
        }
        writeln!(out, "╰{}╯", "─".repeat(inner + 2))
    }

    fn table<W: Write>(&self, out: &mut W, title: &str, rows: &[Value]) -> io::Result<()> {
        let keys = columns(rows);
        let headers: Vec<String> = keys.iter().map(|k| title_case(k)).collect();
        let body: Vec<Vec<String>> = rows
            .iter()
            .take(MAX_ROWS)
            .map(|row| keys.iter().map(|k| cell_text(row.get(k))).collect())
            .collect();

        let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
        for row in &body {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(text_width(cell));
            }
        }
        let available = self.width.saturating_sub(3 * widths.len() + 1);
        fit_widths(&mut widths, available);

        writeln!(out, "{}", self.title(title))?;
        writeln!(out, "{}", border('┌', '┬', '┐', &widths))?;
        self.table_row(out, &headers, &widths, true)?;
        writeln!(out, "{}", border('├', '┼', '┤', &widths))?;
        for row in &body {
            self.table_row(out, row, &widths, false)?;
        }
        writeln!(out, "{}", border('└', '┴', '┘', &widths))
    }

    fn table_row<W: Write>(
        &self,
        out: &mut W,
        cells: &[String],
        widths: &[usize],
        header: bool,
    ) -> io::Result<()> {
        let folded: Vec<Vec<String>> = cells
            .iter()
            .zip(widths)
            .map(|(cell, w)| fold(cell, *w))
            .collect();
        let height = folded.iter().map(Vec::len).max().unwrap_or(1);

        for line in 0..height {
            let mut text = String::from("│");
            for (pieces, w) in folded.iter().zip(widths) {
                let piece = pieces.get(line).map(String::as_str).unwrap_or("");
                let padded = pad(piece, *w);
                if header {
                    text.push_str(&format!(" {} │", self.bold(&padded)));
                } else {
                    text.push_str(&format!(" {} │", padded));
                }
            }
            writeln!(out, "{}", text)?;
        }
        Ok(())
    }

    fn title(&self, s: &str) -> String {
        if self.color {
            s.bold().blue().to_string()
        } else {
            s.to_string()
        }
    }

    fn bold(&self, s: &str) -> String {
        if self.color {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn italic(&self, s: &str) -> String {
        if self.color {
            s.italic().to_string()
        } else {
            s.to_string()
        }
    }
}

/// Write every row (no display cap) as CSV, header from the first row's
/// keys. Returns the number of data rows written.
pub fn write_csv<W: Write>(rows: &[Value], writer: W) -> Result<usize> {
    let keys = columns(rows);
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&keys)?;
    for row in rows {
        wtr.write_record(keys.iter().map(|k| cell_text(row.get(k))))?;
    }
    wtr.flush()?;
    Ok(rows.len())
}

pub fn export_csv(rows: &[Value], path: &Path) -> Result<usize> {
    let file = File::create(path)?;
    write_csv(rows, file)
}

/// Shrink the widest column one cell at a time until the row fits.
fn fit_widths(widths: &mut [usize], available: usize) {
    while widths.iter().sum::<usize>() > available {
        let widest = widths
            .iter_mut()
            .filter(|w| **w > MIN_COLUMN_WIDTH)
            .max_by_key(|w| **w);
        match widest {
            Some(w) => *w -= 1,
            None => break,
        }
    }
}

fn border(left: char, mid: char, right: char, widths: &[usize]) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{}{}{}", left, segments.join(&mid.to_string()), right)
}

fn text_width(s: &str) -> usize {
    s.split('\n').map(|l| l.width()).max().unwrap_or(0)
}

fn pad(s: &str, width: usize) -> String {
    format!("{}{}", s, " ".repeat(width.saturating_sub(s.width())))
}

/// Cut `s` to at most `max_width` display cells, marking the cut with `…`.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current = 0;
    for c in s.chars() {
        let cw = c.width().unwrap_or(0);
        if current + cw > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current += cw;
    }
    if max_width > 0 {
        result.push('…');
    }
    result
}

/// Break `text` into lines no wider than `width` display cells.
fn fold(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for raw in text.split('\n') {
        let mut line = String::new();
        let mut current = 0;
        for c in raw.chars() {
            let cw = c.width().unwrap_or(0);
            if current + cw > width && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                current = 0;
            }
            line.push(c);
            current += cw;
        }
        lines.push(line);
    }
    lines
}

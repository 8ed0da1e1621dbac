//! Fixed-column text tables for monospaced message blocks.
//!
//! Output mirrors the classic ASCII grid:
//!
//! ```text
//! +------+----+
//! | Host | Ok |
//! +------+----+
//! | web1 | 3  |
//! +------+----+
//! ```

use playgram_common::types::PlaybookStats;

/// Column headers of the end-of-run summary.
pub const STATS_HEADERS: [&str; 7] = [
    "Host",
    "Ok",
    "Changed",
    "Unreachable",
    "Failures",
    "Rescued",
    "Ignored",
];

/// A text table with a fixed set of columns and centred cells.
#[derive(Debug, Clone)]
pub struct TextTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Missing cells render empty; extra cells are dropped.
    pub fn add_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let mut row: Vec<String> = cells
            .into_iter()
            .take(self.headers.len())
            .map(|c| c.to_string())
            .collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Render the grid without a trailing newline.
    pub fn render(&self) -> String {
        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .map(|row| text_width(&row[i]))
                    .chain(std::iter::once(text_width(header)))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let rule = rule_line(&widths);
        let mut lines = vec![rule.clone(), row_line(&self.headers, &widths), rule.clone()];
        if !self.rows.is_empty() {
            lines.extend(self.rows.iter().map(|row| row_line(row, &widths)));
            lines.push(rule);
        }
        lines.join("\n")
    }
}

impl std::fmt::Display for TextTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// Build the per-host recap table, rows ordered by host name.
pub fn stats_table(stats: &PlaybookStats) -> TextTable {
    let mut table = TextTable::new(STATS_HEADERS);
    for (host, s) in &stats.processed {
        table.add_row([
            host.clone(),
            s.ok.to_string(),
            s.changed.to_string(),
            s.unreachable.to_string(),
            s.failures.to_string(),
            s.rescued.to_string(),
            s.ignored.to_string(),
        ]);
    }
    table
}

fn text_width(text: &str) -> usize {
    text.chars().count()
}

fn rule_line(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line
}

fn row_line(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        line.push(' ');
        line.push_str(&centre(cell, *width));
        line.push_str(" |");
    }
    line
}

/// Centre `text` in `width` columns. With odd padding the spare column goes
/// right of odd-length text and left of even-length text.
fn centre(text: &str, width: usize) -> String {
    let len = text_width(text);
    let excess = width.saturating_sub(len);
    let half = excess / 2;
    let (left, right) = if excess % 2 == 0 {
        (half, half)
    } else if len % 2 == 1 {
        (half, half + 1)
    } else {
        (half + 1, half)
    };
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

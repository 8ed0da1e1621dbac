//! HTML message bodies for each lifecycle event.
//!
//! Layout is fixed: a title line, a blank line, then right-aligned labels
//! with values in `<code>` spans. Caller-supplied text is escaped so the
//! Bot API's HTML parser accepts it.

use std::path::Path;

use playgram_common::types::{Outcome, Play, TaskResult};

use crate::table::TextTable;

const ENGINE_LABEL: &str = "<u><b>Ansible:</b></u>";

/// Shown in place of the playbook path before the playbook has started.
const UNKNOWN_PLAYBOOK: &str = "-";

/// Fields shared by every message of a run.
#[derive(Debug, Clone, Copy)]
pub struct Header<'a> {
    pub timestamp: &'a str,
    pub playbook: Option<&'a Path>,
}

impl Header<'_> {
    fn push_into(&self, items: &mut Vec<String>) {
        let playbook = self
            .playbook
            .map(|p| escape_html(&p.display().to_string()))
            .unwrap_or_else(|| UNKNOWN_PLAYBOOK.to_string());

        items.push(format!(
            "\n         time: <code>{}</code>",
            escape_html(self.timestamp)
        ));
        items.push(format!("playbook: <code>{playbook}</code>"));
    }
}

/// Play start: target hosts and tags, one per line.
pub fn play_started(header: Header<'_>, play: &Play) -> String {
    let mut items = vec![format!("{ENGINE_LABEL} <b>STARTED</b> ⚙️")];
    header.push_into(&mut items);

    items.push("       hosts:".to_string());
    items.extend(play.hosts.iter().map(|h| list_item(h)));
    items.push("       tags:".to_string());
    items.extend(play.only_tags.iter().map(|t| list_item(t)));

    items.join("\n")
}

/// Task failure: failing host and its captured stderr.
pub fn task_failed(header: Header<'_>, result: &TaskResult) -> String {
    let mut items = vec![format!("{ENGINE_LABEL} <b>FAILED ❌</b>")];
    header.push_into(&mut items);

    items.push(format!(
        "        host: <code>{}</code>",
        escape_html(&result.host)
    ));
    items.push(format!(
        "      stderr: <code>{}</code>",
        escape_html(&result.stderr)
    ));

    items.join("\n")
}

/// End of run: outcome glyph and the recap table as a monospaced block.
pub fn playbook_ended(header: Header<'_>, outcome: Outcome, table: &TextTable) -> String {
    let mut items = vec![format!("{ENGINE_LABEL} <b>ENDED</b> {}", outcome.glyph())];
    header.push_into(&mut items);

    items.push(format!("<code>\n{}\n</code>", escape_html(&table.render())));

    items.join("\n")
}

fn list_item(value: &str) -> String {
    format!("<code>     - {}</code>", escape_html(value))
}

/// Escape the three characters the Bot API's HTML mode treats as markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

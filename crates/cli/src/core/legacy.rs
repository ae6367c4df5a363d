//! Parser for the retired markdown log (`seen-tools.md`).
//!
//! ```text
//! ## 2026-03-02
//! - ToolName — one-line pitch
//! - Other - hyphen separated
//! - Bare
//! ```

use super::record::NewRecord;

const DATE_HEADER: &str = "## ";
const BULLET: &str = "- ";
const EM_DASH_SEPARATOR: &str = " — ";
const HYPHEN_SEPARATOR: &str = " - ";

/// Extracts every bullet that sits under a date header, in file order.
///
/// Dates are copied verbatim; validation happens when the entries are
/// resolved for append.
pub fn parse(text: &str) -> Vec<NewRecord> {
    let mut entries = Vec::new();
    let mut current_date: Option<String> = None;

    for line in text.lines() {
        let line = line.trim();
        if let Some(date) = line.strip_prefix(DATE_HEADER) {
            current_date = Some(date.trim().to_string()).filter(|date| !date.is_empty());
        } else if let Some(content) = line.strip_prefix(BULLET) {
            let Some(date) = current_date.as_deref() else {
                continue;
            };
            let content = content.trim();
            let (name, desc) = content
                .split_once(EM_DASH_SEPARATOR)
                .or_else(|| content.split_once(HYPHEN_SEPARATOR))
                .unwrap_or((content, ""));
            entries.push(
                NewRecord::named(name.trim())
                    .with_desc(desc.trim())
                    .with_date(date),
            );
        }
    }

    entries
}

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::pattern;
use chrono::{Datelike, Timelike};

/// Render `now` with a date pattern, e.g. to name a new daily note.
pub fn run<T: Datelike + Timelike>(template: &str, now: &T) -> Result<CmdResult> {
    let rendered = pattern::render(template, now)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(rendered));
    Ok(result)
}

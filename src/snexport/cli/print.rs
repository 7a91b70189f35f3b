use colored::Colorize;
use snexport::api::{CmdMessage, MessageLevel};
use snexport::commands::inspect::NoteInspection;
use snexport::config::ExportConfig;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_config(config: &ExportConfig) {
    for key in ExportConfig::keys() {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
    println!(
        "dictionary.entries = {} entr{}",
        config.dictionary.entries.len(),
        if config.dictionary.entries.len() == 1 {
            "y"
        } else {
            "ies"
        }
    );
}

pub(super) fn print_inspection(inspection: &NoteInspection) {
    println!(
        "{} {}",
        inspection.name.bold(),
        format!(
            "({} pages, {}x{})",
            inspection.pages.len(),
            inspection.page_width,
            inspection.page_height
        )
        .dimmed()
    );

    if !inspection.toc.is_empty() {
        println!();
        for entry in &inspection.toc {
            println!("  - {}", entry);
        }
    }

    for page in &inspection.pages {
        println!();
        println!("{}", format!("Page {}", page.number).yellow());
        println!("--------------------------------");
        if page.lines.is_empty() {
            println!("{}", "(no recognized text)".dimmed());
        }
        for line in &page.lines {
            println!("{}", line);
        }
        if page.hidden_lines > 0 {
            println!(
                "{}",
                format!("... {} more lines", page.hidden_lines).dimmed()
            );
        }
    }
}

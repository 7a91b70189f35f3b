//! # CLI Layer
//!
//! This module is **one possible UI client** for snexport. It is the only place
//! that knows about terminal I/O, parses arguments and formats output.
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Builds `AppContext` with the API over the vault
//! - `handle_*()`: Per-command handlers that call the API and print the result

use super::print::{print_config, print_inspection, print_messages};
use super::setup::{Cli, Commands, ModeArg};
use clap::Parser;
use snexport::api::{parse_pages, ConfigAction, ExportRequest, SnexportApi};
use snexport::config::{ExportConfig, CONFIG_DIRNAME};
use snexport::decode::JsonNoteDecoder;
use snexport::error::{Result, SnError};
use snexport::model::ExportMode;
use snexport::raster::PlaceholderRasterizer;
use snexport::store::fs::FsVault;
use std::path::{Component, Path, PathBuf};

struct AppContext {
    api: SnexportApi<FsVault>,
    root: PathBuf,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let ctx = init_context(&cli)?;

    match cli.command {
        Commands::Export { note, mode, pages } => handle_export(&ctx, &note, mode, pages),
        Commands::Image { note, page } => handle_image(&ctx, &note, page),
        Commands::Inspect { note } => handle_inspect(&ctx, &note),
        Commands::Classify { name } => handle_classify(&ctx, &name),
        Commands::Timestamp { pattern } => handle_timestamp(&ctx, pattern),
        Commands::Config { key, value } => handle_config(&ctx, key, value),
        Commands::Init => handle_init(&ctx),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let root = match &cli.vault {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let config_dir = root.join(CONFIG_DIRNAME);
    let config = ExportConfig::load(&config_dir)?;

    let vault = FsVault::new(&root).with_attachment_folder(&config.attachment_folder);
    let api = SnexportApi::new(
        vault,
        Box::new(JsonNoteDecoder),
        Box::new(PlaceholderRasterizer),
        config_dir,
    );
    Ok(AppContext { api, root })
}

fn handle_export(
    ctx: &AppContext,
    note: &str,
    mode: ModeArg,
    pages: Option<String>,
) -> Result<()> {
    let note = vault_relative(&ctx.root, note)?;
    let bytes = ctx.api.vault().read_binary(&note)?;

    let mode = ExportMode::from(mode);
    let mut request = ExportRequest::new(mode);
    if let Some(pages) = pages {
        if mode == ExportMode::Markdown {
            return Err(SnError::Api(
                "--pages only applies to the images and pdf modes".into(),
            ));
        }
        request = request.with_pages(parse_pages(&pages)?);
    }

    let result = ctx.api.export(&note, &bytes, &request)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_image(ctx: &AppContext, note: &str, page: usize) -> Result<()> {
    let note = vault_relative(&ctx.root, note)?;
    let bytes = ctx.api.vault().read_binary(&note)?;
    let result = ctx.api.save_page_image(&note, &bytes, page)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_inspect(ctx: &AppContext, note: &str) -> Result<()> {
    let note = vault_relative(&ctx.root, note)?;
    let bytes = ctx.api.vault().read_binary(&note)?;
    let result = ctx.api.inspect(&note, &bytes)?;
    if let Some(inspection) = &result.inspection {
        print_inspection(inspection);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_classify(ctx: &AppContext, name: &str) -> Result<()> {
    let result = ctx.api.classify(name)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_timestamp(ctx: &AppContext, pattern: Option<String>) -> Result<()> {
    let result = ctx.api.timestamp(pattern.as_deref())?;
    for message in &result.messages {
        println!("{}", message.content);
    }
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let show_all = matches!(action, ConfigAction::ShowAll);
    let result = ctx.api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_init(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.init()?;
    print_messages(&result.messages);
    Ok(())
}

/// Turn a note argument into a `/`-separated vault path. Absolute paths must
/// point inside the vault.
fn vault_relative(root: &Path, note: &str) -> Result<String> {
    let path = Path::new(note);
    let relative = if path.is_absolute() {
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        path.strip_prefix(&root)
            .map(Path::to_path_buf)
            .map_err(|_| SnError::Api(format!("{} is not inside the vault", note)))?
    } else {
        path.to_path_buf()
    };

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => return Err(SnError::Api(format!("{} is not inside the vault", note))),
        }
    }
    if parts.is_empty() {
        return Err(SnError::Api(format!("Not a note path: {}", note)));
    }
    Ok(parts.join("/"))
}

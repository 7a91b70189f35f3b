use crate::commands::{CmdMessage, CmdResult};
use crate::config::{ExportConfig, CONFIG_FILENAME};
use crate::error::Result;
use std::path::Path;

/// Write a default config unless one is already there.
pub fn run(config_dir: &Path) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if config_dir.join(CONFIG_FILENAME).exists() {
        result.add_message(CmdMessage::info(format!(
            "Already initialized at {}",
            config_dir.display()
        )));
        return Ok(result);
    }

    ExportConfig::default().save(config_dir)?;
    result.add_message(CmdMessage::success(format!(
        "Initialized snexport config at {}",
        config_dir.display()
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CONFIG_DIRNAME;

    #[test]
    fn test_init_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join(CONFIG_DIRNAME);

        let res = run(&config_dir).unwrap();
        assert!(res.messages[0].content.starts_with("Initialized"));
        assert!(config_dir.join(CONFIG_FILENAME).exists());

        let res = run(&config_dir).unwrap();
        assert!(res.messages[0].content.starts_with("Already"));
    }
}

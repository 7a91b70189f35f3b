use crate::config::ExportConfig;
use crate::model::FileHandle;

pub mod classify;
pub mod config;
pub mod export;
pub mod init;
pub mod inspect;
pub mod timestamp;

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub created: Vec<FileHandle>,
    pub config: Option<ExportConfig>,
    pub inspection: Option<inspect::NoteInspection>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_created(mut self, created: Vec<FileHandle>) -> Self {
        self.created = created;
        self
    }

    pub fn with_config(mut self, config: ExportConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_inspection(mut self, inspection: inspect::NoteInspection) -> Self {
        self.inspection = Some(inspection);
        self
    }
}

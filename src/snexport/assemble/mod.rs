//! # Document Assembly
//!
//! Turns a decoded note into artifact contents, strictly in page order:
//!
//! - [`markdown`]: the transcript, linking back to the source note, with a
//!   `## Page N` section per page holding its recognized text and image embed
//! - [`pdf`]: one PDF page per note page, the page image on top of an invisible
//!   text layer so the document stays searchable
//!
//! Assembly is pure: nothing here touches the vault.

pub mod markdown;
pub mod pdf;

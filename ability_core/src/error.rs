//! Recoverable errors raised while managing buffs

use crate::types::AttributeFlags;
use thiserror::Error;

/// Problems found while equipping or removing buffs.
///
/// None of these are fatal. The operation that produced one always leaves
/// the ability and its attributes in a consistent state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuffError {
    #[error("buff '{title}' ({flags:?}) is not compatible with ability '{ability}'")]
    Incompatible {
        title: String,
        flags: AttributeFlags,
        ability: String,
    },
    #[error("buff '{title}' could not be attached to any attribute of ability '{ability}'")]
    AttachmentFailed { title: String, ability: String },
    #[error("no active buff of type {flags:?} to remove")]
    UnmatchedRemoval { flags: AttributeFlags },
}

impl BuffError {
    /// Title of the buff this error refers to, if any
    pub fn title(&self) -> Option<&str> {
        match self {
            BuffError::Incompatible { title, .. } | BuffError::AttachmentFailed { title, .. } => {
                Some(title)
            }
            BuffError::UnmatchedRemoval { .. } => None,
        }
    }
}

//! Where a merged fragment goes in the host template.

use crate::error::FileError;
use std::fmt;
use std::str::FromStr;
use vue_common::Position;
use vue_template::InsertTarget;

/// A merge target: a node route such as `/0/2` or `/1/`, or a cursor
/// position written `line:character`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeTarget(InsertTarget);

impl MergeTarget {
    /// Appends to the root element.
    pub fn root() -> Self {
        Self::default()
    }

    /// Appends to the deepest element around a 1-based line and a
    /// character column.
    pub fn position(line: u32, character: u32) -> Self {
        Self(InsertTarget::Position(Position::new(line, character)))
    }

    /// The template insertion target.
    pub fn insert_target(&self) -> &InsertTarget {
        &self.0
    }
}

impl From<InsertTarget> for MergeTarget {
    fn from(target: InsertTarget) -> Self {
        Self(target)
    }
}

impl FromStr for MergeTarget {
    type Err = FileError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if let Some((line, character)) = text.split_once(':') {
            let line = line.trim().parse::<u32>();
            let character = character.trim().parse::<u32>();
            return match (line, character) {
                (Ok(line), Ok(character)) => Ok(Self::position(line, character)),
                _ => Err(FileError::InvalidTarget(text.to_string())),
            };
        }
        text.parse::<InsertTarget>()
            .map(Self)
            .map_err(|_| FileError::InvalidTarget(text.to_string()))
    }
}

impl fmt::Display for MergeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            InsertTarget::Path { parent, index } => {
                write!(f, "{parent}/")?;
                if let Some(index) = index {
                    write!(f, "{index}")?;
                }
                Ok(())
            }
            InsertTarget::Position(position) => {
                write!(f, "{}:{}", position.line, position.character)
            }
        }
    }
}

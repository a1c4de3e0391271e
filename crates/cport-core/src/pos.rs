use std::fmt;

use serde::{Deserialize, Serialize};

/// Location of a legacy construct.
///
/// The engine never produces positions itself. Callers attach them to
/// errors they surface (see `cport_lower::Error::at`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourcePos {
    pub file: String,
    /// 1-based line number. `0` means unknown.
    pub line: u32,
    /// 1-based column. `0` means unknown.
    pub col: u32,
}

impl SourcePos {
    pub fn new(file: impl Into<String>, line: u32, col: u32) -> Self {
        Self {
            file: file.into(),
            line,
            col,
        }
    }

    pub fn is_known(&self) -> bool {
        self.line != 0
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.col) {
            (0, _) => write!(f, "{}", self.file),
            (line, 0) => write!(f, "{}:{line}", self.file),
            (line, col) => write!(f, "{}:{line}:{col}", self.file),
        }
    }
}

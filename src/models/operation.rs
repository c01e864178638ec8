use serde::{Serialize, Serializer};
use std::fmt;

// io_log의 operation kind 값
pub const WRITE_KIND: i128 = 1;
pub const READ_KIND: i128 = 2;

/// I/O operation kind of a trace record.
///
/// Kinds other than Write/Read are kept as `Other` with their raw value so
/// that no record is dropped just because nothing downstream plots it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Write,
    Read,
    Other(i128),
}

impl Operation {
    pub fn from_kind(kind: i128) -> Self {
        match kind {
            WRITE_KIND => Operation::Write,
            READ_KIND => Operation::Read,
            other => Operation::Other(other),
        }
    }

    /// Raw kind value as written in the log
    pub fn kind(&self) -> i128 {
        match self {
            Operation::Write => WRITE_KIND,
            Operation::Read => READ_KIND,
            Operation::Other(kind) => *kind,
        }
    }

    // 표시 이름 반환
    pub fn display_name(&self) -> String {
        match self {
            Operation::Write => "Write".to_string(),
            Operation::Read => "Read".to_string(),
            Operation::Other(kind) => kind.to_string(),
        }
    }

    pub fn is_read(&self) -> bool {
        matches!(self, Operation::Read)
    }

    pub fn is_write(&self) -> bool {
        matches!(self, Operation::Write)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display_name())
    }
}

use cport_core::SourcePos;
use cport_types::DeclError;

/// Malformed or unrepresentable literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LiteralError {
    #[error("empty numeric literal")]
    Empty,
    #[error("invalid digits in base-{radix} literal `{text}`")]
    InvalidDigits { text: String, radix: u32 },
    #[error("literal `{0}` does not fit in 64 bits")]
    TooLarge(String),
    #[error("invalid floating literal `{0}`")]
    InvalidFloat(String),
    #[error("cannot negate {0}: magnitude exceeds the signed 64-bit range")]
    CannotNegate(u64),
}

/// Recoverable engine error, optionally located by the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("{}{source}", prefix(.pos))]
    Literal {
        #[source]
        source: LiteralError,
        pos: Option<SourcePos>,
    },
    #[error(transparent)]
    Decl(#[from] DeclError),
}

fn prefix(pos: &Option<SourcePos>) -> String {
    pos.as_ref().map(|p| format!("{p}: ")).unwrap_or_default()
}

impl From<LiteralError> for Error {
    fn from(source: LiteralError) -> Self {
        Error::Literal { source, pos: None }
    }
}

impl Error {
    /// Attaches a source position. Declaration errors carry their own.
    pub fn at(self, pos: SourcePos) -> Self {
        match self {
            Error::Literal { source, .. } => Error::Literal {
                source,
                pos: Some(pos),
            },
            other => other,
        }
    }

    pub fn pos(&self) -> Option<&SourcePos> {
        match self {
            Error::Literal { pos, .. } => pos.as_ref(),
            Error::Decl(DeclError::SliceOverride { pos, .. })
            | Error::Decl(DeclError::UnknownTypeName { pos, .. }) => Some(pos),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

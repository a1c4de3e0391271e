use cport_core::SourcePos;

/// Invalid platform configuration. Fatal at environment construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unsupported pointer size: {0} bytes (expected 4 or 8)")]
    PtrSize(u32),
    #[error("unsupported default int size: {0} bytes (expected 1, 2, 4 or 8)")]
    IntSize(u32),
    #[error("unsupported wchar_t size: {0} bytes (expected 1, 2 or 4)")]
    WCharSize(u32),
}

/// A declaration that cannot be converted as requested.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeclError {
    #[error("{pos}: `slice` override on `{name}`, which is neither a pointer nor an array")]
    SliceOverride { name: String, pos: SourcePos },
    #[error("{pos}: unknown type name `{name}`")]
    UnknownTypeName { name: String, pos: SourcePos },
}

//! Legacy identifiers that collide with target-language syntax.
//!
//! The legacy language allows names the target reserves (keywords,
//! predeclared functions and types) and characters it rejects (`$`).
//! Escaping is deterministic so every reference to the same legacy name
//! lands on the same target name.

/// Names that are legal legacy identifiers but reserved or predeclared
/// in the target language.
const RESERVED: &[&str] = &[
    // keywords
    "chan",
    "defer",
    "fallthrough",
    "func",
    "go",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "select",
    "type",
    "var",
    // predeclared
    "append",
    "byte",
    "cap",
    "close",
    "complex",
    "copy",
    "delete",
    "error",
    "imag",
    "len",
    "make",
    "new",
    "panic",
    "print",
    "println",
    "real",
    "recover",
    "rune",
    "string",
];

pub fn is_reserved(name: &str) -> bool {
    RESERVED.contains(&name)
}

/// Maps a legacy identifier to a valid target identifier.
///
/// Reserved names get a trailing `_`, `$` becomes `_`, and the blank
/// identifier `_` (which the target cannot read back) becomes `_1`.
pub fn escape_ident(name: &str) -> String {
    let mut out = name.replace('$', "_");
    if is_reserved(name) {
        out.push('_');
    }
    if out == "_" {
        out.push('1');
    }
    out
}

//! Language constants shared by the grammar and the syntax checks.

/// Reserved words. None of these can be an identifier.
pub const KEYWORDS: &[&str] = &[
    "abstract", "class", "interface", "enum", "static", "final", "volatile", "transient",
    "strictfp", "native", "boolean", "byte", "short", "char", "int", "long", "float", "double",
    "void", "null", "this", "super", "true", "false", "continue", "break", "goto", "case",
    "default", "instanceof", "if", "do", "while", "for", "else", "synchronized", "switch",
    "assert", "throw", "try", "catch", "finally", "new", "return", "throws", "extends",
    "implements", "import", "package", "const", "public", "private", "protected",
];

/// Primitive type names, `void` excluded.
pub const PRIMITIVE_TYPES: &[&str] = &[
    "boolean", "char", "byte", "short", "int", "long", "float", "double",
];

/// Keywords accepted in a modifier list.
pub const MODIFIER_KEYWORDS: &[&str] = &[
    "public", "protected", "private", "static", "abstract", "final", "native", "synchronized",
    "transient", "volatile", "strictfp",
];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Identifier start: letters, `$` and `_`.
pub fn is_identifier_start(c: char) -> bool {
    c == '$' || c == '_' || unicode_ident::is_xid_start(c)
}

/// Identifier continuation: start characters plus digits and combining marks.
pub fn is_identifier_part(c: char) -> bool {
    c == '$' || unicode_ident::is_xid_continue(c)
}

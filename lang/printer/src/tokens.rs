// Default indentation size
pub const INDENT: isize = 4;

// Symbols

pub const EQ: &str = "=";
pub const NEQ: &str = "≠";
pub const FAT_ARROW: &str = "=>";
pub const ARROW: &str = "->";
pub const COMMA: &str = ",";
pub const COLON: &str = ":";
pub const DOT: &str = ".";
pub const AT: &str = "@";
pub const QUESTION_MARK: &str = "?";
pub const UNDERSCORE: &str = "_";
pub const HASH: &str = "#";
pub const LAMBDA: &str = "λ";

// Keywords

pub const ALL: &str = "all";
pub const AND: &str = "and";
pub const ASSERT: &str = "assert";
pub const BOOL: &str = "bool";
pub const CASE: &str = "case";
pub const DEFINE: &str = "define";
pub const ELSE: &str = "else";
pub const FALSE: &str = "false";
pub const FUN: &str = "fun";
pub const GENERIC: &str = "generic";
pub const IF: &str = "if";
pub const IMPORT: &str = "import";
pub const IN: &str = "in";
pub const INT: &str = "int";
pub const OR: &str = "or";
pub const PRINT: &str = "print";
pub const RECURSIVE: &str = "recursive";
pub const SOME: &str = "some";
pub const SWITCH: &str = "switch";
pub const THEN: &str = "then";
pub const THEOREM: &str = "theorem";
pub const TRUE: &str = "true";
pub const TYPE: &str = "type";
pub const UNION: &str = "union";

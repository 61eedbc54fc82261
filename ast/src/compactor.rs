//! Whitespace compaction over printed Go text.
//!
//! The rules are purely textual, but string, rune and raw literals (and any
//! comment that survived) are cut out first and copied verbatim, so the
//! patterns only ever touch code.

use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::unwrap_used)]
static VERBATIM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)"(?:[^"\\\n]|\\.)*"|`[^`]*`|'(?:[^'\\\n]|\\.)*'|//[^\n]*\n?|/\*.*?\*/"#)
        .unwrap()
});

#[allow(clippy::unwrap_used)]
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

#[allow(clippy::unwrap_used)]
static AFTER_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\s+").unwrap());

#[allow(clippy::unwrap_used)]
static BEFORE_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\}").unwrap());

#[allow(clippy::unwrap_used)]
static AFTER_SEMICOLON: Lazy<Regex> = Lazy::new(|| Regex::new(r";\s*").unwrap());

/// Collapse whitespace in `text`, leaving literals and comments untouched
pub fn compact(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for found in VERBATIM.find_iter(text) {
        out.push_str(&compact_code(&text[last..found.start()]));
        out.push_str(found.as_str());
        last = found.end();
    }
    out.push_str(&compact_code(&text[last..]));
    out
}

/// The four rules, in order
fn compact_code(code: &str) -> String {
    let code = WHITESPACE.replace_all(code, " ");
    let code = AFTER_OPEN.replace_all(&code, "{");
    let code = BEFORE_CLOSE.replace_all(&code, "}");
    AFTER_SEMICOLON.replace_all(&code, ";").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rules_in_order() {
        assert_eq!(compact("a \t\n b"), "a b");
        assert_eq!(compact("f() {\n\tx\n}"), "f() {x}");
        assert_eq!(compact("x;\n\ty;  z"), "x;y;z");
    }

    #[test]
    fn test_printed_file() {
        let printed = "package main;\nimport \"fmt\";\nfunc main(){x:=1;\n\tfmt.Println(\"hi\", x);\n};\n";
        assert_eq!(
            compact(printed),
            "package main;import \"fmt\";func main(){x:=1;fmt.Println(\"hi\", x);};"
        );
    }

    #[test]
    fn test_literals_are_preserved() {
        let printed = "s:=\"a {  b ; }\";\nr:=`x\n\n  y`;\nc:='{';\n";
        assert_eq!(compact(printed), "s:=\"a {  b ; }\";r:=`x\n\n  y`;c:='{';");
    }

    #[test]
    fn test_escaped_quotes_stay_inside_literal() {
        let printed = "s:=\"say \\\"{ hi }\\\"\";\n";
        assert_eq!(compact(printed), "s:=\"say \\\"{ hi }\\\"\";");
    }

    #[test]
    fn test_line_comment_keeps_its_newline() {
        assert_eq!(compact("x;\n// note ; {\ny;"), "x;// note ; {\ny;");
    }
}

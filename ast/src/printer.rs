//! Canonical text output for a [`SyntaxTree`].
//!
//! Statement ends are always written as explicit `;` so the result does not
//! depend on line breaks; the whitespace the printer adds is cosmetic and
//! safe to collapse.

use crate::types::Node;
use crate::types::SyntaxTree;
use crate::types::is_keyword;
use crate::types::kind;

pub fn print(tree: &SyntaxTree) -> String {
    let mut printer = Printer::new();
    printer.node(tree.root());
    printer.out
}

#[derive(Debug)]
struct Printer {
    out: String,
    depth: usize,
    line_start: bool,
    prev: Option<Prev>,
}

#[derive(Debug, Clone)]
struct Prev {
    text: String,
    kind: &'static str,
}

impl Printer {
    const fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
            line_start: true,
            prev: None,
        }
    }

    fn node(&mut self, node: &Node) {
        match &node.token {
            Some(token) => self.token(node.kind, &token.text, token.terminated),
            None => {
                for child in &node.children {
                    self.node(child);
                }
            }
        }
    }

    fn token(&mut self, node_kind: &'static str, text: &str, terminated: bool) {
        if text == "}" {
            self.depth = self.depth.saturating_sub(1);
        }
        if self.line_start {
            for _ in 0..self.depth {
                self.out.push('\t');
            }
        } else if self
            .prev
            .as_ref()
            .is_some_and(|prev| needs_space(prev, node_kind, text))
        {
            self.out.push(' ');
        }
        self.out.push_str(text);
        self.line_start = false;
        if text == "{" {
            self.depth += 1;
        }
        self.prev = Some(Prev {
            text: text.to_string(),
            kind: node_kind,
        });

        if terminated {
            self.out.push(';');
            self.prev = Some(Prev {
                text: ";".to_string(),
                kind: ";",
            });
            self.newline();
        } else if node_kind == kind::COMMENT && text.starts_with("//") {
            self.newline();
        }
    }

    fn newline(&mut self) {
        self.out.push('\n');
        self.line_start = true;
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_operator_char(c: char) -> bool {
    "+-*/%&|^<>=!:.~".contains(c)
}

/// Whether two adjacent tokens need a separating space
fn needs_space(prev: &Prev, next_kind: &str, next: &str) -> bool {
    let (Some(last), Some(first)) = (prev.text.chars().last(), next.chars().next()) else {
        return false;
    };
    if last == ',' {
        return !matches!(first, ')' | ']' | '}');
    }
    if is_word_char(last) && is_word_char(first) {
        return true;
    }
    if is_operator_char(last) && is_operator_char(first) {
        return true;
    }
    // `1 .String()` must not lex as the float `1.`
    if kind::LITERALS.contains(&prev.kind) && first == '.' {
        return true;
    }
    if next_kind == kind::COMMENT {
        return true;
    }
    is_keyword(&prev.text)
        && !matches!(
            first,
            ';' | ')' | ']' | '}' | ',' | '(' | '.' | ':' | '[' | '{'
        )
}

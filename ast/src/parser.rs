//! Go parsing with tree-sitter and conversion into an owned [`SyntaxTree`].
//!
//! The tree-sitter CST is borrowed from the parser, so it is copied into
//! owned [`Node`]s that later stages can rebuild freely. Two things are
//! resolved while copying:
//!
//! - literals become single tokens, so their inner structure never reaches
//!   the printer;
//! - Go's automatic semicolon insertion is applied to the original token
//!   positions and stored as [`Token::terminated`]. After this point no
//!   stage depends on line breaks.
//!
//! [`Token::terminated`]: crate::types::Token::terminated

use crate::error::AstError;
use crate::error::AstResult;
use crate::types::Node;
use crate::types::SyntaxTree;
use crate::types::is_keyword;
use crate::types::kind;
use tracing::trace;
use tree_sitter::Parser;

/// The tree-sitter grammar used for every file
pub fn go_language() -> tree_sitter::Language {
    tree_sitter_go::LANGUAGE.into()
}

/// Parse Go source into an owned syntax tree. Comments are kept as
/// `comment` nodes.
pub fn parse(source: &str) -> AstResult<SyntaxTree> {
    let mut parser = Parser::new();
    parser
        .set_language(&go_language())
        .map_err(|e| AstError::Language(e.to_string()))?;

    let tree = parser.parse(source, None).ok_or_else(|| AstError::Parse {
        line: 1,
        column: 1,
        message: "Failed to parse source code".to_string(),
    })?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(first_error(root));
    }

    let mut spans = Vec::new();
    collect_token_spans(root, source, &mut spans);
    let terminated = resolve_terminators(source, &spans);
    trace!(tokens = spans.len(), "resolved statement terminators");

    let mut builder = TreeBuilder {
        source,
        terminated: &terminated,
        next: 0,
    };
    let root = builder
        .convert(root)?
        .unwrap_or_else(|| Node::branch(kind::SOURCE_FILE, Vec::new()));
    Ok(SyntaxTree::new(root))
}

/// How a tree-sitter node maps onto the owned tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// A real token
    Token,
    /// Comment trivia
    Comment,
    /// Newline or NUL terminator tokens, fully described by token gaps
    Skip,
    Branch,
}

fn shape(node: tree_sitter::Node<'_>, source: &str) -> Shape {
    let node_kind = node.kind();
    if node_kind == kind::COMMENT {
        return Shape::Comment;
    }
    if kind::LITERALS.contains(&node_kind) || node.child_count() == 0 {
        let text = source.get(node.byte_range()).unwrap_or("");
        if text.trim().is_empty() {
            return Shape::Skip;
        }
        return Shape::Token;
    }
    Shape::Branch
}

#[derive(Debug, Clone, Copy)]
struct TokenSpan {
    start: usize,
    end: usize,
    ends_statement: bool,
    is_semicolon: bool,
}

fn collect_token_spans(node: tree_sitter::Node<'_>, source: &str, spans: &mut Vec<TokenSpan>) {
    match shape(node, source) {
        Shape::Token => {
            let text = source.get(node.byte_range()).unwrap_or("");
            spans.push(TokenSpan {
                start: node.start_byte(),
                end: node.end_byte(),
                ends_statement: ends_statement(node.kind(), text),
                is_semicolon: text == ";",
            });
        }
        Shape::Comment | Shape::Skip => {}
        Shape::Branch => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                collect_token_spans(child, source, spans);
            }
        }
    }
}

/// Tokens after which the Go lexer inserts a semicolon at a line break
fn ends_statement(node_kind: &str, text: &str) -> bool {
    if matches!(
        text,
        ")" | "]" | "}" | "++" | "--" | "break" | "continue" | "fallthrough" | "return"
    ) {
        return true;
    }
    if kind::LITERALS.contains(&node_kind) {
        return true;
    }
    match text.chars().next() {
        Some(c) if c.is_alphabetic() || c == '_' => !is_keyword(text),
        Some(c) if c.is_ascii_digit() => true,
        _ => false,
    }
}

/// A token is terminated when it can end a statement and the gap up to the
/// next token holds a line break (comments included) or runs to end of
/// input, unless that next token is an explicit `;`.
fn resolve_terminators(source: &str, spans: &[TokenSpan]) -> Vec<bool> {
    spans
        .iter()
        .enumerate()
        .map(|(i, span)| {
            if !span.ends_statement {
                return false;
            }
            match spans.get(i + 1) {
                Some(next) if next.is_semicolon => false,
                Some(next) => source
                    .get(span.end..next.start)
                    .is_some_and(|gap| gap.contains('\n')),
                None => true,
            }
        })
        .collect()
}

struct TreeBuilder<'a> {
    source: &'a str,
    terminated: &'a [bool],
    next: usize,
}

impl TreeBuilder<'_> {
    fn convert(&mut self, node: tree_sitter::Node<'_>) -> AstResult<Option<Node>> {
        match shape(node, self.source) {
            Shape::Skip => Ok(None),
            Shape::Comment => Ok(Some(Node::token(kind::COMMENT, self.text(node)?))),
            Shape::Token => {
                let terminated = self.terminated.get(self.next).copied().unwrap_or(false);
                self.next += 1;
                Ok(Some(
                    Node::token(node.kind(), self.text(node)?).terminated(terminated),
                ))
            }
            Shape::Branch => {
                let mut children = Vec::with_capacity(node.child_count());
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    if let Some(converted) = self.convert(child)? {
                        children.push(converted);
                    }
                }
                Ok(Some(Node::branch(node.kind(), children)))
            }
        }
    }

    fn text(&self, node: tree_sitter::Node<'_>) -> AstResult<&str> {
        node.utf8_text(self.source.as_bytes())
            .map_err(|e| AstError::Parse {
                line: node.start_position().row + 1,
                column: node.start_position().column + 1,
                message: e.to_string(),
            })
    }
}

/// Locate the first ERROR or MISSING node for the error message
fn first_error(root: tree_sitter::Node<'_>) -> AstError {
    fn find(node: tree_sitter::Node<'_>) -> Option<tree_sitter::Node<'_>> {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        children
            .into_iter()
            .filter(|child| child.has_error())
            .find_map(find)
    }

    let node = find(root).unwrap_or(root);
    let message = if node.is_missing() {
        format!("missing {}", node.kind())
    } else {
        "unexpected syntax".to_string()
    };
    AstError::Parse {
        line: node.start_position().row + 1,
        column: node.start_position().column + 1,
        message,
    }
}

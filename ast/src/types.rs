//! Core types for Go syntax trees

use crate::error::AstError;
use serde::Deserialize;
use serde::Serialize;

/// Node kinds the transformer and printer care about. Anonymous tokens use
/// their own text as kind, the same way tree-sitter reports them.
pub mod kind {
    pub const SOURCE_FILE: &str = "source_file";
    pub const COMMENT: &str = "comment";
    pub const PACKAGE_CLAUSE: &str = "package_clause";
    pub const IMPORT_DECLARATION: &str = "import_declaration";
    pub const IMPORT_SPEC: &str = "import_spec";
    pub const IMPORT_SPEC_LIST: &str = "import_spec_list";
    pub const VAR_DECLARATION: &str = "var_declaration";
    pub const VAR_SPEC: &str = "var_spec";
    pub const VAR_SPEC_LIST: &str = "var_spec_list";

    /// Kinds tree-sitter-go uses for tokens that are identifiers in Go.
    pub const IDENTIFIERS: &[&str] = &[
        "identifier",
        "field_identifier",
        "type_identifier",
        "package_identifier",
        "label_name",
        // Predeclared names tree-sitter-go gives their own kinds
        "true",
        "false",
        "iota",
        "nil",
    ];

    /// Literal kinds whose whole text is one token.
    pub const LITERALS: &[&str] = &[
        "interpreted_string_literal",
        "raw_string_literal",
        "rune_literal",
        "int_literal",
        "float_literal",
        "imaginary_literal",
    ];
}

/// The 25 reserved words of Go.
pub const GO_KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

pub fn is_keyword(word: &str) -> bool {
    GO_KEYWORDS.contains(&word)
}

/// Token payload of a leaf node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// The source ended a statement right after this token, so the printer
    /// must emit a `;` here.
    pub terminated: bool,
}

/// Owned syntax tree node. Branches have children and no token; leaves have
/// a token and no children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: &'static str,
    pub token: Option<Token>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn token(kind: &'static str, text: impl Into<String>) -> Self {
        Self {
            kind,
            token: Some(Token {
                text: text.into(),
                terminated: false,
            }),
            children: Vec::new(),
        }
    }

    /// Anonymous token whose kind is its own text, e.g. `(` or `var`.
    pub fn punct(text: &'static str) -> Self {
        Self::token(text, text)
    }

    pub const fn branch(kind: &'static str, children: Vec<Node>) -> Self {
        Self {
            kind,
            token: None,
            children,
        }
    }

    pub fn terminated(mut self, terminated: bool) -> Self {
        if let Some(token) = self.token.as_mut() {
            token.terminated = terminated;
        }
        self
    }

    pub const fn is_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn text(&self) -> Option<&str> {
        self.token.as_ref().map(|t| t.text.as_str())
    }

    pub fn is_comment(&self) -> bool {
        self.kind == kind::COMMENT
    }

    pub fn is_identifier(&self) -> bool {
        self.is_token() && kind::IDENTIFIERS.contains(&self.kind)
    }

    pub fn is_semicolon(&self) -> bool {
        self.text() == Some(";")
    }

    /// Last token of this subtree
    pub fn last_token(&self) -> Option<&Token> {
        match &self.token {
            Some(token) => Some(token),
            None => self.children.iter().rev().find_map(Node::last_token),
        }
    }

    pub fn last_token_mut(&mut self) -> Option<&mut Token> {
        if self.token.is_some() {
            return self.token.as_mut();
        }
        self.children.iter_mut().rev().find_map(Node::last_token_mut)
    }

    /// Visit every leaf in document order
    pub fn for_each_token<'a>(&'a self, f: &mut impl FnMut(&'a Node)) {
        if self.is_token() {
            f(self);
            return;
        }
        for child in &self.children {
            child.for_each_token(f);
        }
    }

    /// Texts of all non-comment tokens in document order
    pub fn token_texts(&self) -> Vec<&str> {
        let mut texts = Vec::new();
        self.for_each_token(&mut |node| {
            if !node.is_comment()
                && let Some(text) = node.text()
            {
                texts.push(text);
            }
        });
        texts
    }

    /// All descendants (including self) of the given kind, outermost first
    pub fn find_all<'a>(&'a self, kind: &str, out: &mut Vec<&'a Node>) {
        if self.kind == kind {
            out.push(self);
        }
        for child in &self.children {
            child.find_all(kind, out);
        }
    }
}

/// A parsed Go file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    root: Node,
}

impl SyntaxTree {
    pub const fn new(root: Node) -> Self {
        Self { root }
    }

    pub const fn root(&self) -> &Node {
        &self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    pub fn find_all(&self, kind: &str) -> Vec<&Node> {
        let mut out = Vec::new();
        self.root.find_all(kind, &mut out);
        out
    }
}

/// Minification aggressiveness. Each level includes everything the previous
/// one does.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum MinifyLevel {
    /// Strip comments only
    #[default]
    Comments = 1,
    /// Also merge adjacent `var` groups and consolidate imports
    Declarations = 2,
    /// Also shorten identifiers to at most three characters
    Identifiers = 3,
}

impl MinifyLevel {
    pub const fn strips_comments(self) -> bool {
        true
    }

    pub const fn merges_declarations(self) -> bool {
        matches!(self, Self::Declarations | Self::Identifiers)
    }

    pub const fn shortens_identifiers(self) -> bool {
        matches!(self, Self::Identifiers)
    }

    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for MinifyLevel {
    type Error = AstError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Comments),
            2 => Ok(Self::Declarations),
            3 => Ok(Self::Identifiers),
            other => Err(AstError::InvalidLevel(other)),
        }
    }
}

impl From<MinifyLevel> for u8 {
    fn from(level: MinifyLevel) -> Self {
        level.as_u8()
    }
}

impl std::fmt::Display for MinifyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

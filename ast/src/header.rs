//! Package clause and import extraction from minified text.
//!
//! Only the file header is read: the package clause followed by any number of
//! import declarations. Scanning stops at the first other token, so the rest
//! of the file (which at level 3 need not compile) is never looked at.
//!
//! tree-sitter is not used here: a full parse of the minified file would
//! fail on level-3 output the grammar rejects, and would cost a second
//! parse per file for a handful of header tokens.

use serde::Serialize;
use std::iter::Peekable;
use std::str::CharIndices;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    #[error("missing package clause")]
    MissingPackage,

    #[error("expected {expected} at byte {offset}, found {found}")]
    Unexpected {
        expected: &'static str,
        found: String,
        offset: usize,
    },

    #[error("unterminated literal at byte {0}")]
    UnterminatedLiteral(usize),
}

/// Package name and imported paths of one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileHeader {
    pub package: String,
    /// Import paths without quotes, in source order, duplicates kept
    pub imports: Vec<String>,
}

pub fn extract_header(text: &str) -> Result<FileHeader, HeaderError> {
    let mut parser = HeaderParser {
        lexer: Lexer::new(text),
        peeked: None,
    };
    parser.file_header()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
    Ident(String),
    /// Literal with its delimiters removed
    Str(String),
    Punct(char),
    Eof,
}

impl Tok {
    fn describe(&self) -> String {
        match self {
            Tok::Ident(name) => format!("`{name}`"),
            Tok::Str(path) => format!("string {path:?}"),
            Tok::Punct(c) => format!("`{c}`"),
            Tok::Eof => "end of input".to_string(),
        }
    }

    fn ends_statement(&self) -> bool {
        matches!(self, Tok::Ident(_) | Tok::Str(_) | Tok::Punct(')'))
    }
}

/// Just enough of the Go lexer for headers, including semicolon insertion
struct Lexer<'a> {
    text: &'a str,
    chars: Peekable<CharIndices<'a>>,
    last_ends_statement: bool,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.char_indices().peekable(),
            last_ends_statement: false,
        }
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.text.len(), |(i, _)| *i)
    }

    fn next_token(&mut self) -> Result<(usize, Tok), HeaderError> {
        let newline = self.skip_trivia()?;
        if newline && self.last_ends_statement {
            self.last_ends_statement = false;
            return Ok((self.offset(), Tok::Punct(';')));
        }

        let Some((start, c)) = self.chars.next() else {
            return Ok((self.text.len(), Tok::Eof));
        };
        let tok = if c.is_alphabetic() || c == '_' {
            let mut end = start + c.len_utf8();
            while let Some(&(i, next)) = self.chars.peek() {
                if !(next.is_alphanumeric() || next == '_') {
                    break;
                }
                self.chars.next();
                end = i + next.len_utf8();
            }
            Tok::Ident(self.text[start..end].to_string())
        } else if c == '"' {
            Tok::Str(self.interpreted(start)?)
        } else if c == '`' {
            Tok::Str(self.raw(start)?)
        } else {
            Tok::Punct(c)
        };
        self.last_ends_statement = tok.ends_statement();
        Ok((start, tok))
    }

    /// Skip whitespace and comments, reporting whether a line break was seen
    fn skip_trivia(&mut self) -> Result<bool, HeaderError> {
        let text = self.text;
        let mut newline = false;
        while let Some(&(start, c)) = self.chars.peek() {
            if c.is_whitespace() {
                newline |= c == '\n';
                self.chars.next();
                continue;
            }
            let rest = &text[start..];
            if rest.starts_with("//") {
                match rest.find('\n') {
                    Some(end) => self.skip_to(start + end),
                    None => self.skip_to(text.len()),
                }
                continue;
            }
            if rest.starts_with("/*") {
                let end = rest[2..]
                    .find("*/")
                    .ok_or(HeaderError::UnterminatedLiteral(start))?;
                newline |= rest[..end + 2].contains('\n');
                self.skip_to(start + end + 4);
                continue;
            }
            break;
        }
        Ok(newline)
    }

    fn skip_to(&mut self, offset: usize) {
        while self.chars.peek().is_some_and(|(i, _)| *i < offset) {
            self.chars.next();
        }
    }

    fn interpreted(&mut self, start: usize) -> Result<String, HeaderError> {
        let mut escaped = false;
        for (i, c) in self.chars.by_ref() {
            match c {
                '\n' => break,
                '\\' if !escaped => escaped = true,
                '"' if !escaped => return Ok(self.text[start + 1..i].to_string()),
                _ => escaped = false,
            }
        }
        Err(HeaderError::UnterminatedLiteral(start))
    }

    fn raw(&mut self, start: usize) -> Result<String, HeaderError> {
        for (i, c) in self.chars.by_ref() {
            if c == '`' {
                return Ok(self.text[start + 1..i].to_string());
            }
        }
        Err(HeaderError::UnterminatedLiteral(start))
    }
}

struct HeaderParser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<(usize, Tok)>,
}

impl HeaderParser<'_> {
    fn peek(&mut self) -> Result<Tok, HeaderError> {
        if self.peeked.is_none() {
            self.peeked = Some(self.lexer.next_token()?);
        }
        Ok(self
            .peeked
            .as_ref()
            .map_or(Tok::Eof, |(_, tok)| tok.clone()))
    }

    fn bump(&mut self) -> Result<(usize, Tok), HeaderError> {
        match self.peeked.take() {
            Some(peeked) => Ok(peeked),
            None => self.lexer.next_token(),
        }
    }

    fn file_header(&mut self) -> Result<FileHeader, HeaderError> {
        if self.peek()? != Tok::Ident("package".to_string()) {
            return Err(HeaderError::MissingPackage);
        }
        self.bump()?;
        let package = match self.bump()? {
            (_, Tok::Ident(name)) => name,
            (offset, found) => return Err(unexpected("package name", offset, &found)),
        };
        self.end_of_declaration()?;

        let mut imports = Vec::new();
        loop {
            match self.peek()? {
                Tok::Punct(';') => {
                    self.bump()?;
                }
                Tok::Ident(word) if word == "import" => {
                    self.bump()?;
                    self.import_declaration(&mut imports)?;
                }
                _ => break,
            }
        }
        Ok(FileHeader { package, imports })
    }

    fn import_declaration(&mut self, imports: &mut Vec<String>) -> Result<(), HeaderError> {
        if self.peek()? != Tok::Punct('(') {
            imports.push(self.import_spec()?);
            return self.end_of_declaration();
        }
        self.bump()?;
        loop {
            match self.peek()? {
                Tok::Punct(')') => {
                    self.bump()?;
                    break;
                }
                Tok::Punct(';') => {
                    self.bump()?;
                }
                _ => imports.push(self.import_spec()?),
            }
        }
        self.end_of_declaration()
    }

    /// `[name | .] "path"`
    fn import_spec(&mut self) -> Result<String, HeaderError> {
        if matches!(self.peek()?, Tok::Ident(_) | Tok::Punct('.')) {
            self.bump()?;
        }
        match self.bump()? {
            (_, Tok::Str(path)) => Ok(path),
            (offset, found) => Err(unexpected("import path", offset, &found)),
        }
    }

    fn end_of_declaration(&mut self) -> Result<(), HeaderError> {
        match self.bump()? {
            (_, Tok::Punct(';') | Tok::Eof) => Ok(()),
            (offset, found) => Err(unexpected("`;`", offset, &found)),
        }
    }
}

fn unexpected(expected: &'static str, offset: usize, found: &Tok) -> HeaderError {
    HeaderError::Unexpected {
        expected,
        found: found.describe(),
        offset,
    }
}

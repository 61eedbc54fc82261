//! Identifier shortening for the most aggressive level.
//!
//! Names are mapped per file, not per binding: every occurrence of a long
//! name gets the same replacement, and two different long names never share
//! one. Names from other packages (`fmt.Println`) and predeclared names
//! (`true`, `append`, `make`) are shortened too, so the result is neither
//! guaranteed to compile nor to re-parse: `mak([]int, 0)` is no longer the
//! builtin call whose type argument the grammar accepts.

use crate::types::Node;
use crate::types::is_keyword;
use std::collections::HashMap;
use std::collections::HashSet;
use tracing::trace;

/// Longest identifier left after shortening, in characters
pub const MAX_IDENTIFIER_LEN: usize = 3;

const START_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_";
const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";

/// Replacement table for one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortNames {
    table: HashMap<String, String>,
}

impl ShortNames {
    /// Assign a short name to every long identifier under `root`, in
    /// first-seen order.
    pub fn build(root: &Node) -> Self {
        let mut long_names: Vec<&str> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut taken: HashSet<String> = HashSet::new();

        root.for_each_token(&mut |node| {
            if !node.is_identifier() {
                return;
            }
            let Some(name) = node.text() else { return };
            if name.chars().count() > MAX_IDENTIFIER_LEN {
                if seen.insert(name) {
                    long_names.push(name);
                }
            } else {
                taken.insert(name.to_string());
            }
        });

        let mut table = HashMap::with_capacity(long_names.len());
        for name in long_names {
            let short = pick_short_name(name, &taken);
            taken.insert(short.clone());
            table.insert(name.to_string(), short);
        }
        Self { table }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.table.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Rewrite every identifier token under `node`
    pub fn apply(&self, node: Node) -> Node {
        let Node {
            kind,
            mut token,
            children,
        } = node;
        if crate::types::kind::IDENTIFIERS.contains(&kind)
            && let Some(token) = token.as_mut()
            && let Some(short) = self.get(&token.text)
        {
            token.text = short.to_string();
        }
        let children = children.into_iter().map(|child| self.apply(child)).collect();
        Node {
            kind,
            token,
            children,
        }
    }
}

/// Shorten every identifier longer than [`MAX_IDENTIFIER_LEN`]
pub fn shorten_identifiers(root: Node) -> Node {
    let names = ShortNames::build(&root);
    trace!(renamed = names.len(), "shortening identifiers");
    names.apply(root)
}

fn is_free(candidate: &str, taken: &HashSet<String>) -> bool {
    !taken.contains(candidate) && !is_keyword(candidate)
}

/// The plain truncation when it is free, otherwise the first free name
/// keeping the longest possible prefix of `name`.
fn pick_short_name(name: &str, taken: &HashSet<String>) -> String {
    let chars: Vec<char> = name.chars().collect();
    let truncated: String = chars.iter().take(MAX_IDENTIFIER_LEN).collect();
    if is_free(&truncated, taken) {
        return truncated;
    }

    for keep in (1..MAX_IDENTIFIER_LEN).rev() {
        let prefix: String = chars.iter().take(keep).collect();
        let found = suffixes(MAX_IDENTIFIER_LEN - keep)
            .map(|suffix| format!("{prefix}{suffix}"))
            .find(|candidate| is_free(candidate, taken));
        if let Some(found) = found {
            return found;
        }
    }

    // Every name sharing a prefix is in use; fall back to any free name
    for len in 1..=MAX_IDENTIFIER_LEN {
        for first in START_ALPHABET.chars() {
            let found = suffixes(len - 1)
                .map(|suffix| format!("{first}{suffix}"))
                .find(|candidate| is_free(candidate, taken));
            if let Some(found) = found {
                return found;
            }
        }
    }
    truncated
}

/// All strings of exactly `len` characters over [`ALPHABET`], in order
fn suffixes(len: usize) -> impl Iterator<Item = String> {
    let alphabet: Vec<char> = ALPHABET.chars().collect();
    let base = alphabet.len();
    let count = base.pow(len as u32);
    (0..count).map(move |mut index| {
        let mut out = vec![alphabet[0]; len];
        for slot in out.iter_mut().rev() {
            *slot = alphabet[index % base];
            index /= base;
        }
        out.into_iter().collect()
    })
}

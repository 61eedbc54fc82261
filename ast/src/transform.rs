//! Level-gated tree rewrites.
//!
//! Every stage takes a tree by value and returns a rebuilt one, so the
//! stages compose as plain functions and can be tested one at a time.

use crate::shorten::shorten_identifiers;
use crate::types::MinifyLevel;
use crate::types::Node;
use crate::types::SyntaxTree;
use crate::types::kind;
use std::collections::HashSet;
use tracing::trace;

/// Apply every stage enabled by `level`, in order
pub fn transform(tree: SyntaxTree, level: MinifyLevel) -> SyntaxTree {
    let mut root = tree.into_root();
    if level.strips_comments() {
        root = strip_comments(root);
    }
    if level.merges_declarations() {
        root = merge_var_declarations(root);
        root = consolidate_imports(root);
    }
    if level.shortens_identifiers() {
        root = shorten_identifiers(root);
    }
    trace!(%level, "tree transformed");
    SyntaxTree::new(root)
}

/// Drop every comment node. Nothing else is removed.
pub fn strip_comments(node: Node) -> Node {
    let Node {
        kind,
        token,
        children,
    } = node;
    let children = children
        .into_iter()
        .filter(|child| !child.is_comment())
        .map(strip_comments)
        .collect();
    Node {
        kind,
        token,
        children,
    }
}

/// Coalesce each run of adjacent `var` declarations in any child list into
/// a single grouped declaration.
pub fn merge_var_declarations(node: Node) -> Node {
    let Node {
        kind,
        token,
        children,
    } = node;
    let children = children.into_iter().map(merge_var_declarations).collect();
    Node {
        kind,
        token,
        children: merge_runs(children),
    }
}

fn merge_runs(children: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::with_capacity(children.len());
    let mut run: Vec<Node> = Vec::new();
    // Explicit `;` seen after the latest declaration of the run
    let mut pending: Vec<Node> = Vec::new();

    for child in children {
        if child.kind == kind::VAR_DECLARATION {
            pending.clear();
            run.push(child);
        } else if !run.is_empty() && child.is_semicolon() {
            pending.push(child);
        } else {
            flush_run(&mut out, &mut run, &mut pending);
            out.push(child);
        }
    }
    flush_run(&mut out, &mut run, &mut pending);
    out
}

fn flush_run(out: &mut Vec<Node>, run: &mut Vec<Node>, pending: &mut Vec<Node>) {
    match run.len() {
        0 => {}
        1 => out.append(run),
        _ => out.push(group_var_declarations(std::mem::take(run))),
    }
    out.append(pending);
}

fn group_var_declarations(declarations: Vec<Node>) -> Node {
    let closing_terminated = declarations
        .last()
        .and_then(Node::last_token)
        .is_some_and(|token| token.terminated);

    let mut specs: Vec<Node> = declarations
        .into_iter()
        .flat_map(|decl| specs_of(decl, kind::VAR_SPEC, kind::VAR_SPEC_LIST))
        .collect();
    trace!(specs = specs.len(), "merging var declarations");
    for spec in &mut specs {
        if let Some(token) = spec.last_token_mut() {
            token.terminated = true;
        }
    }

    let mut list = Vec::with_capacity(specs.len() + 2);
    list.push(Node::punct("("));
    list.extend(specs);
    list.push(Node::punct(")").terminated(closing_terminated));

    Node::branch(
        kind::VAR_DECLARATION,
        vec![Node::punct("var"), Node::branch(kind::VAR_SPEC_LIST, list)],
    )
}

/// Specs of a declaration, whether written bare or as a parenthesized list
fn specs_of(declaration: Node, spec_kind: &str, list_kind: &str) -> Vec<Node> {
    let mut specs = Vec::new();
    for child in declaration.children {
        if child.kind == spec_kind {
            specs.push(child);
        } else if child.kind == list_kind {
            specs.extend(
                child
                    .children
                    .into_iter()
                    .filter(|grandchild| grandchild.kind == spec_kind),
            );
        }
    }
    specs
}

/// Replace all top-level import declarations with one declaration holding
/// every distinct spec in first-seen order, placed right after the package
/// clause.
pub fn consolidate_imports(root: Node) -> Node {
    if root.kind != kind::SOURCE_FILE {
        return root;
    }
    let Node {
        kind,
        token,
        children,
    } = root;

    let mut specs = Vec::new();
    let mut seen = HashSet::new();
    let mut rest = Vec::with_capacity(children.len());
    let mut after_import = false;

    for child in children {
        if child.kind == kind::IMPORT_DECLARATION {
            for spec in specs_of(child, kind::IMPORT_SPEC, kind::IMPORT_SPEC_LIST) {
                if seen.insert(spec.token_texts().join(" ")) {
                    specs.push(spec);
                }
            }
            after_import = true;
            continue;
        }
        // The separator of a removed declaration goes with it
        if after_import && child.is_semicolon() {
            continue;
        }
        after_import = false;
        rest.push(child);
    }

    if specs.is_empty() {
        return Node {
            kind,
            token,
            children: rest,
        };
    }
    trace!(specs = specs.len(), "consolidating imports");

    let mut position = rest
        .iter()
        .position(|child| child.kind == kind::PACKAGE_CLAUSE)
        .map_or(0, |index| index + 1);
    if rest.get(position).is_some_and(Node::is_semicolon) {
        position += 1;
    }
    rest.insert(position, import_declaration(specs));

    Node {
        kind,
        token,
        children: rest,
    }
}

fn import_declaration(mut specs: Vec<Node>) -> Node {
    for spec in &mut specs {
        if let Some(token) = spec.last_token_mut() {
            token.terminated = true;
        }
    }
    if specs.len() == 1 {
        let mut children = vec![Node::punct("import")];
        children.extend(specs);
        return Node::branch(kind::IMPORT_DECLARATION, children);
    }

    let mut list = Vec::with_capacity(specs.len() + 2);
    list.push(Node::punct("("));
    list.extend(specs);
    list.push(Node::punct(")").terminated(true));
    Node::branch(
        kind::IMPORT_DECLARATION,
        vec![
            Node::punct("import"),
            Node::branch(kind::IMPORT_SPEC_LIST, list),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    fn import_paths(tree: &SyntaxTree) -> Vec<String> {
        tree.find_all(kind::IMPORT_SPEC)
            .into_iter()
            .filter_map(|spec| spec.last_token().map(|t| t.text.trim_matches('"').to_string()))
            .collect()
    }

    /// (first name, last token) of every var spec, in order
    fn var_pairs(tree: &SyntaxTree) -> Vec<(String, String)> {
        tree.find_all(kind::VAR_SPEC)
            .into_iter()
            .map(|spec| {
                let texts = spec.token_texts();
                (texts[0].to_string(), texts[texts.len() - 1].to_string())
            })
            .collect()
    }

    #[test]
    fn test_strip_comments_keeps_other_tokens() {
        let code = "package main\n\n// Greeting\nfunc main() {\n\t/* inline */ x := 1 // one\n\t_ = x\n}\n";
        let tree = parse(code).unwrap();
        let before: Vec<String> = tree.root().token_texts().into_iter().map(String::from).collect();
        let tree = transform(tree, MinifyLevel::Comments);
        assert!(tree.find_all(kind::COMMENT).is_empty());
        assert_eq!(tree.root().token_texts(), before);
    }

    #[test]
    fn test_level_one_leaves_declarations_alone() {
        let code = "package main\n\nimport \"fmt\"\nimport \"os\"\n\nvar a = 1\nvar b = 2\n";
        let tree = transform(parse(code).unwrap(), MinifyLevel::Comments);
        assert_eq!(tree.find_all(kind::IMPORT_DECLARATION).len(), 2);
        assert_eq!(tree.find_all(kind::VAR_DECLARATION).len(), 2);
    }

    #[test]
    fn test_merge_three_var_groups() {
        let code = "package main\n\nvar x = 1\nvar y = 2\nvar z = 3\n";
        let tree = transform(parse(code).unwrap(), MinifyLevel::Declarations);
        assert_eq!(tree.find_all(kind::VAR_DECLARATION).len(), 1);
        assert_eq!(
            var_pairs(&tree),
            vec![
                ("x".to_string(), "1".to_string()),
                ("y".to_string(), "2".to_string()),
                ("z".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_merge_flattens_existing_groups_in_order() {
        let code = "package main\n\nvar (\n\ta = 1\n\tb = 2\n)\nvar c = 3; var d int\n";
        let tree = transform(parse(code).unwrap(), MinifyLevel::Declarations);
        assert_eq!(tree.find_all(kind::VAR_DECLARATION).len(), 1);
        let names: Vec<String> = var_pairs(&tree).into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_merge_only_adjacent_runs() {
        let code = "package main\n\nvar a = 1\nvar b = 2\n\nfunc f() {}\n\nvar c = 3\nconst k = 4\nconst j = 5\n";
        let tree = transform(parse(code).unwrap(), MinifyLevel::Declarations);
        assert_eq!(tree.find_all(kind::VAR_DECLARATION).len(), 2);
        assert_eq!(tree.find_all("const_declaration").len(), 2);
    }

    #[test]
    fn test_merge_inside_function_body() {
        let code = "package main\n\nfunc f() int {\n\tvar a = 1\n\tvar b = a + 1\n\treturn b\n}\n";
        let tree = transform(parse(code).unwrap(), MinifyLevel::Declarations);
        assert_eq!(tree.find_all(kind::VAR_DECLARATION).len(), 1);
        assert_eq!(var_pairs(&tree).len(), 2);
    }

    #[test]
    fn test_consolidate_imports_first_seen_order() {
        let code = "package main\n\nimport \"fmt\"\n\nimport (\n\t\"os\"\n\t\"fmt\"\n\tstr \"strings\"\n)\nimport \"io\"\n\nfunc main() {}\n";
        let tree = transform(parse(code).unwrap(), MinifyLevel::Declarations);
        assert_eq!(tree.find_all(kind::IMPORT_DECLARATION).len(), 1);
        assert_eq!(import_paths(&tree), vec!["fmt", "os", "strings", "io"]);
    }

    #[test]
    fn test_consolidated_import_follows_package_clause() {
        // Imports after other declarations are rejected by the Go compiler
        // but accepted by the grammar; they still move to the top.
        let code = "package main\n\nvar v = 1\n\nimport \"a\"\nimport \"b\"\n";
        let Ok(tree) = parse(code) else { return };
        let tree = transform(tree, MinifyLevel::Declarations);
        let kinds: Vec<&str> = tree.root().children.iter().map(|c| c.kind).collect();
        assert_eq!(kinds[0], kind::PACKAGE_CLAUSE);
        assert_eq!(kinds[1], kind::IMPORT_DECLARATION);
    }

    #[test]
    fn test_consolidate_keeps_distinct_aliases() {
        let code = "package main\n\nimport \"m1\"\nimport \"m1\"\nimport x \"m1\"\n";
        let tree = transform(parse(code).unwrap(), MinifyLevel::Declarations);
        assert_eq!(tree.find_all(kind::IMPORT_DECLARATION).len(), 1);
        assert_eq!(tree.find_all(kind::IMPORT_SPEC).len(), 2);
    }

    #[test]
    fn test_no_imports_is_noop() {
        let code = "package main\n\nfunc main() {}\n";
        let tree = parse(code).unwrap();
        let expected = tree.clone();
        let tree = transform(tree, MinifyLevel::Declarations);
        assert_eq!(tree, expected);
    }
}

//! Thin layer over tree-sitter-go.

use miette::SourceSpan;
use tree_sitter::{Node, Parser, Tree};

use crate::error::{Error, Result, SourceContext};

/// A tree-sitter parser configured for Go.
pub(crate) struct GoParser {
    parser: Parser,
}

impl GoParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language: tree_sitter::Language = tree_sitter_go::LANGUAGE.into();
        parser
            .set_language(&language)
            .map_err(|e| Box::new(Error::Language(e.to_string())))?;
        Ok(Self { parser })
    }

    /// Parse a file, failing on the first syntax error.
    pub fn parse(&mut self, ctx: &SourceContext) -> Result<Tree> {
        let tree = self.parse_lenient(ctx)?;
        check_syntax(ctx, tree.root_node())?;
        Ok(tree)
    }

    /// Parse a file, keeping whatever tree-sitter recovered from errors.
    pub fn parse_lenient(&mut self, ctx: &SourceContext) -> Result<Tree> {
        self.parser.parse(ctx.src(), None).ok_or_else(|| {
            Box::new(Error::NoTree {
                path: ctx.filename().into(),
            })
        })
    }
}

fn check_syntax(ctx: &SourceContext, root: Node<'_>) -> Result<()> {
    if !root.has_error() {
        return Ok(());
    }

    match first_error(root) {
        Some(node) if node.is_missing() => {
            Err(ctx.syntax_error_at(format!("missing `{}`", node.kind()), node.span()))
        }
        Some(node) => {
            let text = node.text(ctx.src()).lines().next().unwrap_or_default();
            Err(ctx.syntax_error_at(format!("unexpected `{text}`"), node.span()))
        }
        None => Err(ctx.syntax_error_at("syntax error", root.span())),
    }
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|c| c.has_error() || c.is_missing())
        .find_map(first_error)
}

/// Convenience accessors on syntax nodes.
pub(crate) trait NodeExt<'t> {
    /// The source text covered by this node.
    fn text<'s>(&self, src: &'s str) -> &'s str;

    fn span(&self) -> SourceSpan;

    fn field(&self, name: &str) -> Option<Node<'t>>;

    /// All nodes stored under a repeated field.
    fn fields(&self, name: &str) -> Vec<Node<'t>>;

    /// Named children, skipping comments.
    fn code_children(&self) -> Vec<Node<'t>>;

    /// Whether an anonymous token of this kind is a direct child.
    fn has_token(&self, kind: &str) -> bool;
}

impl<'t> NodeExt<'t> for Node<'t> {
    fn text<'s>(&self, src: &'s str) -> &'s str {
        src.get(self.byte_range()).unwrap_or_default()
    }

    fn span(&self) -> SourceSpan {
        SourceSpan::from(self.start_byte()..self.end_byte())
    }

    fn field(&self, name: &str) -> Option<Node<'t>> {
        self.child_by_field_name(name)
    }

    fn fields(&self, name: &str) -> Vec<Node<'t>> {
        let mut cursor = self.walk();
        self.children_by_field_name(name, &mut cursor).collect()
    }

    fn code_children(&self) -> Vec<Node<'t>> {
        let mut cursor = self.walk();
        self.named_children(&mut cursor)
            .filter(|c| c.kind() != "comment")
            .collect()
    }

    fn has_token(&self, kind: &str) -> bool {
        let mut cursor = self.walk();
        self.children(&mut cursor)
            .any(|c| !c.is_named() && c.kind() == kind)
    }
}

/// Strip the delimiters of a Go string literal without unescaping it.
pub(crate) fn unquote(literal: &str) -> &str {
    let trimmed = literal.trim();
    for delim in ['"', '`'] {
        if let Some(inner) = trimmed
            .strip_prefix(delim)
            .and_then(|s| s.strip_suffix(delim))
        {
            return inner;
        }
    }
    trimmed
}

//! Doc comment extraction.

use tree_sitter::Node;

/// The doc comment of a declaration.
///
/// A doc comment is the block of comments directly above `node` with no
/// blank line in between. The raw source text of the block is returned,
/// including any indentation between its lines. Comments trailing code on
/// the same line are never part of a doc block.
pub(crate) fn doc_comment(node: Node<'_>, src: &str) -> Option<String> {
    let mut first = None;
    let mut last = None;
    let mut next_row = node.start_position().row;
    let mut cursor = node.prev_named_sibling();

    while let Some(prev) = cursor {
        if prev.kind() != "comment"
            || prev.end_position().row + 1 != next_row
            || is_trailing(prev)
        {
            break;
        }
        last.get_or_insert(prev);
        first = Some(prev);
        next_row = prev.start_position().row;
        cursor = prev.prev_named_sibling();
    }

    let (first, last) = (first?, last?);
    src.get(first.start_byte()..last.end_byte())
        .map(str::to_string)
}

/// Whether a comment follows code on the same line.
fn is_trailing(comment: Node<'_>) -> bool {
    let row = comment.start_position().row;
    let mut cursor = comment.prev_sibling();

    while let Some(prev) = cursor {
        // Statement terminators end at the start of the next line.
        if matches!(prev.kind(), "\n" | "\0") {
            cursor = prev.prev_sibling();
            continue;
        }
        return prev.kind() != "comment" && prev.end_position().row == row;
    }

    false
}

//! Debug-dump formatting for the component AST, used only by the `cssfront`
//! binary. Not a stable format — there is no serializer/deserializer pair
//! here, just a human-readable tree walk.

use std::fmt::Write as _;

use crate::ast::{ComponentAst, Extra};

/// Renders the subtree rooted at `root` as one line per component,
/// indented by depth, each line carrying the tag name, source location,
/// next-sibling index, and a short summary of the component's extra
/// payload.
#[must_use]
pub fn dump(ast: &ComponentAst, root: u32) -> String {
    let mut out = String::new();
    write_component(&mut out, ast, root, 0);
    out
}

fn write_component(out: &mut String, ast: &ComponentAst, i: u32, depth: u32) {
    let tag = ast.tag(i);
    let next = ast.next_sibling(i);
    let _ = writeln!(out, "{}{:?} @{} -> {}{}", "  ".repeat(depth as usize), tag, ast.location(i), next, extra_summary(ast.extra(i)));

    if tag.is_structural() {
        let mut child = i + 1;
        while child < next {
            write_component(out, ast, child, depth + 1);
            child = ast.next_sibling(child);
        }
    }
}

fn extra_summary(extra: &Extra) -> String {
    match extra {
        Extra::None => String::new(),
        Extra::Delim(c) => format!(" {c:?}"),
        Extra::Text(s) => format!(" {s:?}"),
        Extra::Numeric(n) => format!(" {}", n.value),
        Extra::Dimension { numeric, unit, .. } => format!(" {}{unit}", numeric.value),
        Extra::Declaration { prev, important } => format!(" prev={prev:?} important={important}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ComponentTag;
    use crate::location::Location;

    #[test]
    fn dump_indents_children_under_their_parent() {
        let mut ast = ComponentAst::new();
        let open = ast.begin_complex(ComponentTag::ComponentList, Location::new(0));
        ast.add_basic(ComponentTag::Ident, Location::new(0), Extra::Text("a".into()));
        let root = ast.finish_complex(open);

        let text = dump(&ast, root);
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("ComponentList"));
        let child_line = lines.next().unwrap();
        assert!(child_line.starts_with("  Ident"));
        assert!(child_line.contains("\"a\""));
    }
}

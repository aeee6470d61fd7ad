//! Text dumps of trees, for `Display` impls and test failure messages.

use crate::arena::Arena;
use crate::types::Node;

/// Dumps a binary tree, one node per line, left child first.
///
/// A missing left child is shown as `∅` when the right child exists so the
/// two sides stay distinguishable. Walks with an explicit stack, so a
/// degenerate chain prints without deep recursion.
pub fn print_binary<N, F>(arena: &Arena<N>, root: Option<u32>, label: &F) -> String
where
    N: Node,
    F: Fn(&N) -> String,
{
    let Some(root) = root else {
        return "∅".to_string();
    };

    let mut out = String::new();
    // (node, text before its label, indentation of its children)
    let mut stack: Vec<(Option<u32>, String, String)> =
        vec![(Some(root), String::new(), String::new())];
    while let Some((child, head, tab)) = stack.pop() {
        out.push_str(&head);
        let Some(idx) = child else {
            out.push('∅');
            continue;
        };
        let node = &arena[idx];
        out.push_str(&label(node));

        let (l, r) = (node.l(), node.r());
        match (l, r) {
            (None, None) => {}
            (_, Some(_)) => {
                stack.push((r, format!("\n{tab}└─ R "), format!("{tab}   ")));
                stack.push((l, format!("\n{tab}├─ L "), format!("{tab}│  ")));
            }
            (Some(_), None) => {
                stack.push((l, format!("\n{tab}└─ L "), format!("{tab}   ")));
            }
        }
    }
    out
}

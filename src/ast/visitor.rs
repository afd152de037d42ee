//! Visitor over the AST.
//!
//! [`AstVisitor`] has one `visit_<kind>` method per node kind, generated from
//! the kind table. Each returns `true` when the visitor handled the node
//! completely, in which case its children are skipped and `end_visit` is not
//! called. Otherwise the walk descends into the children in slot order and
//! then calls `end_visit`.
//!
//! ```text
//! visit_if(n) ── false ──► children... ──► end_visit(n)
//!      │
//!      └──── true ──► (skip)
//! ```

use crate::base::NodeId;

use super::Ast;
use super::kinds::*;

macro_rules! define_visitor {
    (
        $(
            $kind:ident $visit:ident [$($cat:ident),*] {
                $( $slot:ident ($idx:literal) : $arity:ident $expect:ident $($mand:ident)? ),* $(,)?
            }
        )*
    ) => {
        /// Visitor with one method per node kind.
        ///
        /// Every `visit_<kind>` forwards to [`AstVisitor::visit_node`] by
        /// default, which returns `false` (descend).
        pub trait AstVisitor {
            /// Fallback for every kind-specific method.
            fn visit_node(&mut self, _ast: &Ast, _id: NodeId) -> bool {
                false
            }

            /// Called after the children of a node that was not fully handled.
            fn end_visit(&mut self, _ast: &Ast, _id: NodeId) {}

            $(
                fn $visit(&mut self, ast: &Ast, node: $kind) -> bool {
                    self.visit_node(ast, node.id())
                }
            )*
        }

        fn dispatch<V: AstVisitor + ?Sized>(ast: &Ast, id: NodeId, visitor: &mut V) -> bool {
            match ast.kind(id) {
                $(NodeKind::$kind => visitor.$visit(ast, $kind(id)),)*
            }
        }
    };
}

with_node_kinds!(define_visitor);

enum Step {
    Enter(NodeId),
    Leave(NodeId),
}

/// Walk the subtree at `root`. Iterative, so deeply nested expressions do
/// not exhaust the stack.
pub(crate) fn walk<V: AstVisitor + ?Sized>(ast: &Ast, root: NodeId, visitor: &mut V) {
    let mut stack = vec![Step::Enter(root)];
    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(id) => {
                if dispatch(ast, id, visitor) {
                    continue;
                }
                stack.push(Step::Leave(id));
                let mark = stack.len();
                stack.extend(ast.children(id).map(Step::Enter));
                stack[mark..].reverse();
            }
            Step::Leave(id) => visitor.end_visit(ast, id),
        }
    }
}

//! Mutable, position-preserving AST.
//!
//! Nodes live in an [`Ast`] arena and are addressed by [`NodeId`]. Each node
//! has a [`NodeKind`] from a closed set, a [`Position`], at most one parent,
//! and a fixed list of child slots described by [`NodeKind::slots`].
//!
//! ## Architecture
//!
//! ```text
//! kinds.rs    → the kind table, schema, typed wrappers (If, Block, ...)
//! slots.rs    → ChildSlot / ListSlot handles: raw + strict views, checked mutation
//! props.rs    → per-kind properties (identifier text, literal raw text, flags)
//! nodes.rs    → hand-written accessors on top of the typed wrappers
//! literals.rs → decoding literal values from raw text
//! operators.rs→ binary / unary operator tables
//! visitor.rs  → AstVisitor + exhaustive dispatch
//! checks/     → syntactic validity (check and assert modes)
//! ```
//!
//! Ownership is strict: adopting a node that already has a parent fails with
//! a [`UsageError`], and nothing is mutated in that case.

#[macro_use]
mod kinds;

pub mod checks;
mod literals;
mod nodes;
mod operators;
mod props;
mod slots;
pub mod visitor;

pub use kinds::*;
pub use literals::{FloatValue, IntegralValue};
pub use nodes::{ModifierFlags, TypeDeclaration, is_statement_expression};
pub use operators::{BinaryOperator, UnaryOperator};
pub use props::{Props, WildcardKind};
pub use slots::{ChildSlot, ListSlot, StrictIter};
pub use visitor::AstVisitor;

use rustc_hash::FxHashMap;

use crate::base::{NodeId, Position, UsageError};

// ============================================================================
// Storage
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Slot {
    One(Option<NodeId>),
    Many(Vec<NodeId>),
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) slots: Vec<Slot>,
    pub(crate) props: Props,
    pub(crate) position: Position,
    pub(crate) parent: Option<NodeId>,
    pub(crate) parens: Vec<Position>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        let slots = kind
            .slots()
            .iter()
            .map(|spec| {
                if spec.many {
                    Slot::Many(Vec::new())
                } else {
                    Slot::One(None)
                }
            })
            .collect();
        Self {
            kind,
            slots,
            props: Props::default_for(kind),
            position: Position::UNPLACED,
            parent: None,
            parens: Vec::new(),
        }
    }
}

/// Arena owning every node of one or more trees.
///
/// Detached nodes stay allocated until the arena is dropped; they are simply
/// unreachable from any root.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<NodeData>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of allocated nodes (reachable or not).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a parentless, unplaced node with empty slots.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(NodeData::new(kind));
        id
    }

    #[inline]
    pub(crate) fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    /// Drop every node allocated at or after `len`. Used by the parser to
    /// discard the work of a failed alternative.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    // ------------------------------------------------------------------ accessors

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.data(id).kind
    }

    pub fn is(&self, id: NodeId, category: Category) -> bool {
        self.kind(id).is(category)
    }

    /// Cast `id` to a typed wrapper.
    pub fn get<T: AstNode>(&self, id: NodeId) -> Option<T> {
        T::cast(self, id)
    }

    pub fn position(&self, id: NodeId) -> Position {
        self.data(id).position
    }

    pub fn set_position(&mut self, id: NodeId, position: Position) {
        self.data_mut(id).position = position;
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    pub fn props(&self, id: NodeId) -> &Props {
        &self.data(id).props
    }

    pub(crate) fn props_mut(&mut self, id: NodeId) -> &mut Props {
        &mut self.data_mut(id).props
    }

    /// Positions of the parentheses wrapped around an expression, innermost first.
    pub fn parens(&self, id: NodeId) -> &[Position] {
        &self.data(id).parens
    }

    pub fn paren_count(&self, id: NodeId) -> usize {
        self.data(id).parens.len()
    }

    /// Record one more (outer) pair of parentheses around `id`.
    pub fn add_paren(&mut self, id: NodeId, position: Position) {
        self.data_mut(id).parens.push(position);
    }

    pub fn clear_parens(&mut self, id: NodeId) {
        self.data_mut(id).parens.clear();
    }

    /// Raw content of single-child slot `index`.
    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        match self.data(id).slots.get(index) {
            Some(Slot::One(child)) => *child,
            _ => None,
        }
    }

    /// Raw content of list slot `index`.
    pub fn list(&self, id: NodeId, index: usize) -> &[NodeId] {
        match self.data(id).slots.get(index) {
            Some(Slot::Many(items)) => items,
            _ => &[],
        }
    }

    /// Direct children in slot order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.data(id).slots.iter().flat_map(|slot| {
            let (one, many) = match slot {
                Slot::One(child) => (*child, &[][..]),
                Slot::Many(items) => (None, items.as_slice()),
            };
            one.into_iter().chain(many.iter().copied())
        })
    }

    /// `id` and all of its descendants, pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            let mut kids: Vec<NodeId> = self.children(next).collect();
            kids.reverse();
            stack.extend(kids);
        }
        out
    }

    /// Whether `ancestor` is `id` or one of its parents.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// The slot (and list index, for list slots) holding `child` inside `owner`.
    pub fn slot_of(&self, owner: NodeId, child: NodeId) -> Option<(usize, Option<usize>)> {
        self.data(owner)
            .slots
            .iter()
            .enumerate()
            .find_map(|(index, slot)| match slot {
                Slot::One(Some(c)) if *c == child => Some((index, None)),
                Slot::Many(items) => items
                    .iter()
                    .position(|c| *c == child)
                    .map(|at| (index, Some(at))),
                _ => None,
            })
    }

    // ------------------------------------------------------------------ ownership

    /// Verify that `child` may be adopted by `owner`.
    pub(crate) fn check_adoptable(&self, owner: NodeId, child: NodeId) -> Result<(), UsageError> {
        if let Some(parent) = self.parent(child) {
            return Err(UsageError::AlreadyParented { child, parent });
        }
        if self.is_ancestor_or_self(child, owner) {
            return Err(UsageError::Cycle(child));
        }
        Ok(())
    }

    pub(crate) fn check_owned(&self, owner: NodeId, child: NodeId) -> Result<(), UsageError> {
        if self.parent(child) == Some(owner) {
            Ok(())
        } else {
            Err(UsageError::NotAChild { child, owner })
        }
    }

    /// Set `owner` as the parent of `child`.
    pub(crate) fn adopt(&mut self, owner: NodeId, child: NodeId) -> Result<(), UsageError> {
        self.check_adoptable(owner, child)?;
        self.data_mut(child).parent = Some(owner);
        Ok(())
    }

    /// Clear the parent of `child`, which must currently be `owner`.
    pub(crate) fn disown(&mut self, owner: NodeId, child: NodeId) -> Result<(), UsageError> {
        self.check_owned(owner, child)?;
        self.data_mut(child).parent = None;
        Ok(())
    }

    /// Remove `id` from whatever slot of its parent holds it.
    ///
    /// Returns the former parent, or `None` when `id` was already detached.
    pub fn detach(&mut self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        if let Some((index, at)) = self.slot_of(parent, id) {
            match (&mut self.data_mut(parent).slots[index], at) {
                (Slot::One(child), None) => *child = None,
                (Slot::Many(items), Some(at)) => {
                    items.remove(at);
                }
                _ => {}
            }
        }
        self.data_mut(id).parent = None;
        Some(parent)
    }

    /// Put `child` into a single slot without ownership checks.
    ///
    /// Only the parser's scratch arena uses this; parent links are rebuilt
    /// when the result is copied out.
    pub(crate) fn put(&mut self, owner: NodeId, index: usize, child: Option<NodeId>) {
        if let Some(Slot::One(slot)) = self.data_mut(owner).slots.get_mut(index) {
            *slot = child;
        }
    }

    /// Append to a list slot without ownership checks (scratch arena only).
    pub(crate) fn push(&mut self, owner: NodeId, index: usize, child: NodeId) {
        if let Some(Slot::Many(items)) = self.data_mut(owner).slots.get_mut(index) {
            items.push(child);
        }
    }

    // ------------------------------------------------------------------ copying

    /// Deep-copy the subtree at `id` within this arena. The copy is parentless.
    pub fn copy(&mut self, id: NodeId) -> NodeId {
        let snapshot = self.snapshot(id);
        self.graft(snapshot, true).0
    }

    /// Deep-copy the subtree rooted at `id` of `other` into this arena.
    ///
    /// Positions, parens and properties are carried over. `generated_by`
    /// references are remapped when they point inside the copied subtree and
    /// dropped otherwise, since they would name a node of `other`.
    pub fn import(&mut self, other: &Ast, id: NodeId) -> NodeId {
        self.import_with_map(other, id).0
    }

    /// Same as [`Ast::import`], also returning the old→new id mapping.
    pub(crate) fn import_with_map(
        &mut self,
        other: &Ast,
        id: NodeId,
    ) -> (NodeId, FxHashMap<NodeId, NodeId>) {
        let snapshot = other.snapshot(id);
        self.graft(snapshot, false)
    }

    fn snapshot(&self, id: NodeId) -> Vec<(NodeId, NodeData)> {
        self.descendants(id)
            .into_iter()
            .map(|node| (node, self.data(node).clone()))
            .collect()
    }

    /// Append a pre-order snapshot as a new subtree; the first entry is the root.
    fn graft(
        &mut self,
        snapshot: Vec<(NodeId, NodeData)>,
        keep_foreign: bool,
    ) -> (NodeId, FxHashMap<NodeId, NodeId>) {
        let base = self.nodes.len();
        let map: FxHashMap<NodeId, NodeId> = snapshot
            .iter()
            .enumerate()
            .map(|(offset, (old, _))| (*old, NodeId::new(base + offset)))
            .collect();
        let relink = |id: NodeId| map.get(&id).copied();
        let regen = |position: Position| match position.generated_by() {
            Some(by) => position.with_generated_by(
                relink(by).or(if keep_foreign { Some(by) } else { None }),
            ),
            None => position,
        };

        for (offset, (_, mut data)) in snapshot.into_iter().enumerate() {
            data.parent = if offset == 0 {
                None
            } else {
                data.parent.and_then(relink)
            };
            for slot in &mut data.slots {
                match slot {
                    Slot::One(child) => *child = child.and_then(relink),
                    Slot::Many(items) => {
                        *items = items.iter().filter_map(|c| relink(*c)).collect();
                    }
                }
            }
            data.position = regen(data.position);
            for paren in &mut data.parens {
                *paren = regen(*paren);
            }
            self.nodes.push(data);
        }
        (NodeId::new(base), map)
    }

    /// Point every child below `root` back at the node whose slot holds it.
    ///
    /// Trees assembled with [`Ast::put`] / [`Ast::push`] have no parent links
    /// until this runs.
    pub(crate) fn relink_parents(&mut self, root: NodeId) {
        for node in self.descendants(root) {
            let kids: Vec<NodeId> = self.children(node).collect();
            for kid in kids {
                self.data_mut(kid).parent = Some(node);
            }
        }
    }

    /// Rewrite every position in the arena, parens included.
    pub(crate) fn map_all_positions(&mut self, mut f: impl FnMut(Position) -> Position) {
        for data in &mut self.nodes {
            data.position = f(data.position);
            for paren in &mut data.parens {
                *paren = f(*paren);
            }
        }
    }

    /// Set the position of `id` and every descendant, including parens.
    pub fn set_all_positions(&mut self, id: NodeId, position: Position) {
        for node in self.descendants(id) {
            let data = self.data_mut(node);
            data.position = position;
            for paren in &mut data.parens {
                *paren = position;
            }
        }
    }

    /// Visit the subtree at `id` with `visitor`.
    pub fn accept<V: AstVisitor + ?Sized>(&self, id: NodeId, visitor: &mut V) {
        visitor::walk(self, id, visitor);
    }
}

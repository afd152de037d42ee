//! Child slot handles.
//!
//! A [`ChildSlot`] or [`ListSlot`] names one slot of one node. It holds no
//! borrow, so a handle can be obtained from a typed wrapper and then used with
//! either `&Ast` (reads) or `&mut Ast` (mutation).
//!
//! Every slot has two views:
//! - **raw**: whatever node is stored, malformed or not
//! - **strict**: each element is checked against the slot's `Expect` when it
//!   is read, and a mismatch is an [`AstException`]
//!
//! Mutation is checked before anything changes; a violated ownership rule
//! returns [`UsageError`] and leaves the tree as it was.

use crate::base::{AstException, NodeId, UsageError};

use super::kinds::SlotSpec;
use super::{Ast, Slot};

fn spec_of(ast: &Ast, owner: NodeId, index: usize) -> &'static SlotSpec {
    &ast.kind(owner).slots()[index]
}

fn wrong_type(ast: &Ast, spec: &SlotSpec, id: NodeId) -> AstException {
    AstException::on(
        id,
        format!(
            "{} isn't a(n) {} but a(n) {}",
            spec.name,
            spec.expect.name(),
            ast.kind(id).name()
        ),
    )
}

// ============================================================================
// Single child
// ============================================================================

/// Handle to a single-child slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildSlot {
    owner: NodeId,
    index: usize,
}

impl ChildSlot {
    pub(crate) fn new(owner: NodeId, index: usize) -> Self {
        Self { owner, index }
    }

    /// Store without ownership checks (parser scratch arena only).
    pub(crate) fn put(self, ast: &mut Ast, child: Option<NodeId>) {
        ast.put(self.owner, self.index, child);
    }

    pub fn owner(self) -> NodeId {
        self.owner
    }

    pub fn index(self) -> usize {
        self.index
    }

    pub fn spec(self, ast: &Ast) -> &'static SlotSpec {
        spec_of(ast, self.owner, self.index)
    }

    /// Raw view: whatever is stored, if anything.
    pub fn get(self, ast: &Ast) -> Option<NodeId> {
        ast.child(self.owner, self.index)
    }

    pub fn is_set(self, ast: &Ast) -> bool {
        self.get(ast).is_some()
    }

    /// Strict view: `Err` when the child has the wrong type, or is absent
    /// from a mandatory slot.
    pub fn strict(self, ast: &Ast) -> Result<Option<NodeId>, AstException> {
        let spec = self.spec(ast);
        match self.get(ast) {
            Some(id) if !spec.expect.accepts(ast.kind(id)) => Err(wrong_type(ast, spec, id)),
            Some(id) => Ok(Some(id)),
            None if spec.mandatory => Err(AstException::on(
                self.owner,
                format!("Missing {} {}", spec.name, spec.expect.name()),
            )),
            None => Ok(None),
        }
    }

    /// Strict view for callers that need a value: absence is always an error.
    pub fn require(self, ast: &Ast) -> Result<NodeId, AstException> {
        match self.strict(ast)? {
            Some(id) => Ok(id),
            None => {
                let spec = self.spec(ast);
                Err(AstException::on(
                    self.owner,
                    format!("Missing {} {}", spec.name, spec.expect.name()),
                ))
            }
        }
    }

    /// Replace the child. The old child (if any) is disowned and returned.
    ///
    /// Fails without changes when `child` already has a parent.
    pub fn set(self, ast: &mut Ast, child: Option<NodeId>) -> Result<Option<NodeId>, UsageError> {
        let old = self.get(ast);
        if old == child {
            return Ok(old);
        }
        if let Some(new) = child {
            ast.check_adoptable(self.owner, new)?;
        }
        if let Some(old) = old {
            ast.disown(self.owner, old)?;
        }
        if let Some(new) = child {
            ast.adopt(self.owner, new)?;
        }
        ast.put(self.owner, self.index, child);
        Ok(old)
    }

    /// Detach the current child, returning it.
    pub fn take(self, ast: &mut Ast) -> Result<Option<NodeId>, UsageError> {
        self.set(ast, None)
    }
}

// ============================================================================
// Child list
// ============================================================================

/// Handle to a child-list slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSlot {
    owner: NodeId,
    index: usize,
}

impl ListSlot {
    pub(crate) fn new(owner: NodeId, index: usize) -> Self {
        Self { owner, index }
    }

    /// Append without ownership checks (parser scratch arena only).
    pub(crate) fn push_all(self, ast: &mut Ast, children: impl IntoIterator<Item = NodeId>) {
        for child in children {
            ast.push(self.owner, self.index, child);
        }
    }

    pub fn owner(self) -> NodeId {
        self.owner
    }

    pub fn spec(self, ast: &Ast) -> &'static SlotSpec {
        spec_of(ast, self.owner, self.index)
    }

    /// Raw view of the list.
    pub fn raw(self, ast: &Ast) -> &[NodeId] {
        ast.list(self.owner, self.index)
    }

    pub fn len(self, ast: &Ast) -> usize {
        self.raw(ast).len()
    }

    pub fn is_empty(self, ast: &Ast) -> bool {
        self.raw(ast).is_empty()
    }

    pub fn first(self, ast: &Ast) -> Option<NodeId> {
        self.raw(ast).first().copied()
    }

    pub fn last(self, ast: &Ast) -> Option<NodeId> {
        self.raw(ast).last().copied()
    }

    pub fn contains(self, ast: &Ast, id: NodeId) -> bool {
        self.raw(ast).contains(&id)
    }

    /// Strict view: yields each element, or an error for an element of the
    /// wrong type. Checking happens as the iterator advances.
    pub fn strict(self, ast: &Ast) -> StrictIter<'_> {
        StrictIter {
            ast,
            spec: self.spec(ast),
            items: self.raw(ast).iter(),
        }
    }

    fn items_mut(self, ast: &mut Ast) -> &mut Vec<NodeId> {
        match &mut ast.data_mut(self.owner).slots[self.index] {
            Slot::Many(items) => items,
            Slot::One(_) => unreachable!("list handle on a single-child slot"),
        }
    }

    fn position_of(self, ast: &Ast, reference: NodeId) -> Result<usize, UsageError> {
        self.raw(ast)
            .iter()
            .position(|id| *id == reference)
            .ok_or(UsageError::NotInList {
                reference,
                owner: self.owner,
            })
    }

    fn insert_at(self, ast: &mut Ast, at: usize, node: NodeId) -> Result<(), UsageError> {
        ast.adopt(self.owner, node)?;
        self.items_mut(ast).insert(at, node);
        Ok(())
    }

    pub fn add_to_start(self, ast: &mut Ast, node: NodeId) -> Result<(), UsageError> {
        self.insert_at(ast, 0, node)
    }

    pub fn add_to_end(self, ast: &mut Ast, node: NodeId) -> Result<(), UsageError> {
        let at = self.len(ast);
        self.insert_at(ast, at, node)
    }

    /// Insert `node` directly before `reference`, which must be in this list.
    pub fn add_before(self, ast: &mut Ast, reference: NodeId, node: NodeId) -> Result<(), UsageError> {
        let at = self.position_of(ast, reference)?;
        self.insert_at(ast, at, node)
    }

    /// Insert `node` directly after `reference`, which must be in this list.
    pub fn add_after(self, ast: &mut Ast, reference: NodeId, node: NodeId) -> Result<(), UsageError> {
        let at = self.position_of(ast, reference)?;
        self.insert_at(ast, at + 1, node)
    }

    /// Replace `old` with `new` in place.
    ///
    /// `old` must be in this list and owned by the list's owner. If `new`
    /// cannot be adopted, `old` is restored and the error returned.
    pub fn replace(self, ast: &mut Ast, old: NodeId, new: NodeId) -> Result<(), UsageError> {
        let at = self.position_of(ast, old)?;
        ast.check_owned(self.owner, old)?;
        ast.disown(self.owner, old)?;
        if let Err(err) = ast.adopt(self.owner, new) {
            // Restore the original.
            ast.data_mut(old).parent = Some(self.owner);
            return Err(err);
        }
        self.items_mut(ast)[at] = new;
        Ok(())
    }

    /// Remove `node` from this list, leaving it parentless.
    pub fn remove(self, ast: &mut Ast, node: NodeId) -> Result<(), UsageError> {
        let at = self.position_of(ast, node)?;
        ast.disown(self.owner, node)?;
        self.items_mut(ast).remove(at);
        Ok(())
    }

    /// Remove every element, returning them (now parentless) in order.
    pub fn clear(self, ast: &mut Ast) -> Vec<NodeId> {
        let items = std::mem::take(self.items_mut(ast));
        for id in &items {
            ast.data_mut(*id).parent = None;
        }
        items
    }
}

/// Lazily type-checked iterator over a child list.
pub struct StrictIter<'a> {
    ast: &'a Ast,
    spec: &'static SlotSpec,
    items: std::slice::Iter<'a, NodeId>,
}

impl Iterator for StrictIter<'_> {
    type Item = Result<NodeId, AstException>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = *self.items.next()?;
        if self.spec.expect.accepts(self.ast.kind(id)) {
            Some(Ok(id))
        } else {
            Some(Err(wrong_type(self.ast, self.spec, id)))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

//! The open-dialog stack.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Unique identifier for a dialog instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DialogId(usize);

impl DialogId {
    pub fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for DialogId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DialogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__dialog_{}", self.0)
    }
}

/// Ordered list of open dialogs, last = topmost.
///
/// One stack is shared by every dialog of a render tree. Clones share the
/// same list; separate trees (or tests) use separate stacks.
#[derive(Debug, Clone, Default)]
pub struct DialogStack {
    entries: Arc<RwLock<Vec<DialogId>>>,
}

impl DialogStack {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<DialogId>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<DialogId>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Push `id` on top. Returns false if it was already present.
    pub fn push(&self, id: DialogId) -> bool {
        let mut entries = self.write();
        if entries.contains(&id) {
            return false;
        }
        entries.push(id);
        log::debug!("DialogStack push {} depth={}", id, entries.len());
        true
    }

    /// Remove `id` wherever it is. Returns false if it was not present.
    pub fn remove(&self, id: DialogId) -> bool {
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|e| *e != id);
        let removed = entries.len() != before;
        if removed {
            log::debug!("DialogStack remove {} depth={}", id, entries.len());
        }
        removed
    }

    pub fn topmost(&self) -> Option<DialogId> {
        self.read().last().copied()
    }

    pub fn is_topmost(&self, id: DialogId) -> bool {
        self.topmost() == Some(id)
    }

    pub fn contains(&self, id: DialogId) -> bool {
        self.read().contains(&id)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copy of the stack, bottom first.
    pub fn snapshot(&self) -> Vec<DialogId> {
        self.read().clone()
    }

    /// Push `id` for as long as the returned entry lives.
    pub fn enter(&self, id: DialogId) -> StackEntry {
        self.push(id);
        StackEntry {
            stack: self.clone(),
            id,
        }
    }
}

/// Membership in a [`DialogStack`], released on drop.
#[derive(Debug)]
pub struct StackEntry {
    stack: DialogStack,
    id: DialogId,
}

impl StackEntry {
    pub fn id(&self) -> DialogId {
        self.id
    }
}

impl Drop for StackEntry {
    fn drop(&mut self) {
        self.stack.remove(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_is_idempotent() {
        let stack = DialogStack::new();
        let id = DialogId::new();
        assert!(stack.push(id));
        assert!(!stack.push(id));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_remove_out_of_order() {
        let stack = DialogStack::new();
        let (a, b, c) = (DialogId::new(), DialogId::new(), DialogId::new());
        stack.push(a);
        stack.push(b);
        stack.push(c);
        assert!(stack.remove(b));
        assert_eq!(stack.snapshot(), vec![a, c]);
        assert!(stack.is_topmost(c));
        assert!(!stack.remove(b));
    }

    #[test]
    fn test_entry_releases_on_drop() {
        let stack = DialogStack::new();
        let id = DialogId::new();
        {
            let entry = stack.enter(id);
            assert_eq!(entry.id(), id);
            assert!(stack.is_topmost(id));
        }
        assert!(stack.is_empty());
    }

    #[test]
    fn test_separate_stacks_do_not_share() {
        let a = DialogStack::new();
        let b = DialogStack::new();
        a.push(DialogId::new());
        assert!(b.is_empty());
        assert_eq!(a.clone().len(), 1);
    }
}

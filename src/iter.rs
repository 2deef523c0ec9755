use core::marker::PhantomData;

use crate::{Mahogany, MahoganyNode, NodeIndex};

/// Borrowing in-order iterator over a [`Mahogany`] tree.
///
/// Both ends advance by following the node links (successor from the front,
/// predecessor from the back); a remaining-count makes the two cursors meet
/// cleanly in the middle.
pub struct MahoganySortedIterator<'a, K: Ord> {
    pub(crate) tree: &'a Mahogany<K>,
    pub(crate) front: NodeIndex,
    pub(crate) back: NodeIndex,
    pub(crate) remaining: usize,
}

impl<'a, K: Ord> Iterator for MahoganySortedIterator<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.front;
        self.front = self.tree.successor(node);
        self.remaining -= 1;

        Some(&self.tree.get_node_by_idx(node).key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Ord> DoubleEndedIterator for MahoganySortedIterator<'_, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.back;
        self.back = self.tree.predecessor(node);
        self.remaining -= 1;

        Some(&self.tree.get_node_by_idx(node).key)
    }
}

impl<K: Ord> ExactSizeIterator for MahoganySortedIterator<'_, K> {}

/// Mutable in-order iterator over a [`Mahogany`] tree.
///
/// Every link read and every yielded `&mut K` derives from one base pointer
/// into the node storage, so handing out a reference for one slot never
/// retags the slots of keys the caller still holds. Each key is yielded
/// exactly once; callers must keep the ordering of the keys intact.
pub struct MahoganySortedIteratorMut<'a, K: Ord> {
    pub(crate) storage: *mut MahoganyNode<K>,
    pub(crate) front: NodeIndex,
    pub(crate) back: NodeIndex,
    pub(crate) remaining: usize,
    pub(crate) phantom: PhantomData<&'a mut Mahogany<K>>,
}

impl<K: Ord> MahoganySortedIteratorMut<'_, K> {
    fn node(&self, node_idx: NodeIndex) -> *mut MahoganyNode<K> {
        // the link structure only ever holds indices of live slots, and the
        // storage cannot move while the tree is mutably borrowed
        unsafe { self.storage.add(node_idx.0) }
    }

    fn minimum(&self, node: NodeIndex) -> NodeIndex {
        let mut current_node = node;

        while current_node != NodeIndex::NIL {
            let left = unsafe { (*self.node(current_node)).left };
            if left == NodeIndex::NIL {
                break;
            }
            current_node = left;
        }

        current_node
    }

    fn maximum(&self, node: NodeIndex) -> NodeIndex {
        let mut current_node = node;

        while current_node != NodeIndex::NIL {
            let right = unsafe { (*self.node(current_node)).right };
            if right == NodeIndex::NIL {
                break;
            }
            current_node = right;
        }

        current_node
    }

    fn successor(&self, node: NodeIndex) -> NodeIndex {
        let right = unsafe { (*self.node(node)).right };

        if right != NodeIndex::NIL {
            return self.minimum(right);
        }

        let mut current_node = node;
        let mut parent_node = unsafe { (*self.node(node)).parent };

        while parent_node != NodeIndex::NIL
            && current_node == unsafe { (*self.node(parent_node)).right }
        {
            current_node = parent_node;
            parent_node = unsafe { (*self.node(parent_node)).parent };
        }

        parent_node
    }

    fn predecessor(&self, node: NodeIndex) -> NodeIndex {
        if node == NodeIndex::NIL {
            let root = unsafe { (*self.node(node)).parent };
            return self.maximum(root);
        }

        let left = unsafe { (*self.node(node)).left };

        if left != NodeIndex::NIL {
            return self.maximum(left);
        }

        let mut current_node = node;
        let mut parent_node = unsafe { (*self.node(node)).parent };

        while parent_node != NodeIndex::NIL
            && current_node == unsafe { (*self.node(parent_node)).left }
        {
            current_node = parent_node;
            parent_node = unsafe { (*self.node(parent_node)).parent };
        }

        parent_node
    }
}

impl<'a, K: Ord> Iterator for MahoganySortedIteratorMut<'a, K> {
    type Item = &'a mut K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.front;
        self.front = self.successor(node);
        self.remaining -= 1;

        Some(unsafe { &mut (*self.node(node)).key })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Ord> DoubleEndedIterator for MahoganySortedIteratorMut<'_, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.back;
        self.back = self.predecessor(node);
        self.remaining -= 1;

        Some(unsafe { &mut (*self.node(node)).key })
    }
}

impl<K: Ord> ExactSizeIterator for MahoganySortedIteratorMut<'_, K> {}

extern crate alloc;

use core::cmp::Ordering;

use alloc::vec::Vec;

pub mod iter;
pub mod map;

use iter::{MahoganySortedIterator, MahoganySortedIteratorMut};

/*
node storage is a flat vector; parent/left/right are indices into it, with
slot 0 reserved for the shared black sentinel. slot 0's parent doubles as a
back-pointer to the current root, which is how an end cursor can step back
to the maximum element.

deletion would punch holes in the vector, so a completed delete needs a free
list threaded through the vacant slots (head stored on the tree, next link
reusing the parent field). not implemented yet.
*/

#[derive(Debug, Default)]
#[repr(u8)]
enum NodeColor {
    #[default]
    Red,
    Black,
}

/// Index of a node inside the tree's storage vector. Index 0 is the
/// sentinel, standing in for every absent child and for the past-the-end
/// position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct NodeIndex(pub(crate) usize);

impl NodeIndex {
    const NIL: Self = Self(0);
}

#[derive(Debug)]
struct MahoganyNode<K> {
    key: K,
    color: NodeColor,
    parent: NodeIndex,
    left: NodeIndex,
    right: NodeIndex,
}

impl<K> MahoganyNode<K> {
    fn new_isolated(key: K) -> Self {
        Self {
            key,
            color: NodeColor::default(),
            parent: NodeIndex::NIL,
            left: NodeIndex::NIL,
            right: NodeIndex::NIL,
        }
    }

    fn is_red(&self) -> bool {
        matches!(self.color, NodeColor::Red)
    }
}

impl<K: Default> Default for MahoganyNode<K> {
    fn default() -> Self {
        Self {
            key: K::default(),
            color: NodeColor::Black,
            parent: NodeIndex::NIL,
            left: NodeIndex::NIL,
            right: NodeIndex::NIL,
        }
    }
}

/// An ordered set of keys, backed by a red-black tree whose nodes live in a
/// single storage vector.
///
/// Lookup and insertion are O(log n). Duplicate keys are rejected rather
/// than overwritten, so the tree never holds two keys comparing equal.
#[derive(Debug)]
pub struct Mahogany<K: Ord> {
    storage: Vec<MahoganyNode<K>>,
    root: NodeIndex,
    length: usize,
}

impl<K: Ord> Mahogany<K> {
    const BLACK_NIL: NodeIndex = NodeIndex::NIL;

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Drops every key and resets the tree to its freshly-constructed
    /// state. The storage allocation is kept.
    pub fn clear(&mut self) {
        self.storage.truncate(1);
        let nil = &mut self.storage[Self::BLACK_NIL.0];
        nil.parent = Self::BLACK_NIL;
        nil.left = Self::BLACK_NIL;
        nil.right = Self::BLACK_NIL;
        self.root = Self::BLACK_NIL;
        self.length = 0;
    }

    /// Pre-allocates storage for at least `additional` more insertions.
    pub fn reserve(&mut self, additional: usize) {
        self.storage.reserve(additional);
    }

    pub fn contains(&self, key: &K) -> bool {
        self.search(key) != Self::BLACK_NIL
    }

    /// Returns a reference to the stored key equal to `key`, if present.
    pub fn get(&self, key: &K) -> Option<&K> {
        let node = self.search(key);

        if node == Self::BLACK_NIL {
            return None;
        }

        Some(&self.storage[node.0].key)
    }

    /// Mutable counterpart of [`Self::get`]. The caller must not mutate the
    /// key in a way that changes its ordering relative to the other stored
    /// keys; the map adapter relies on this to update the value half of an
    /// entry in place.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut K> {
        let node = self.search(key);

        if node == Self::BLACK_NIL {
            return None;
        }

        Some(&mut self.storage[node.0].key)
    }

    /// Smallest stored key.
    pub fn first(&self) -> Option<&K> {
        let node = self.minimum(self.root);

        if node == Self::BLACK_NIL {
            return None;
        }

        Some(&self.storage[node.0].key)
    }

    /// Largest stored key.
    pub fn last(&self) -> Option<&K> {
        let node = self.maximum(self.root);

        if node == Self::BLACK_NIL {
            return None;
        }

        Some(&self.storage[node.0].key)
    }

    /// Longest root-to-sentinel edge count. Diagnostic only; a valid tree of
    /// `n` keys never exceeds `2 * log2(n + 1)`.
    pub fn height(&self) -> usize {
        self.subtree_height(self.root)
    }

    /// Inserts `key`, keeping the tree balanced. Returns `false` and leaves
    /// the tree untouched if an equal key is already present.
    pub fn insert(&mut self, key: K) -> bool {
        self.insert_full(key).1
    }

    /// Like [`Self::insert`], but also returns the position of the key: the
    /// newly stored key on success, or the already-present equal key when
    /// the duplicate was rejected.
    pub fn insert_full(&mut self, key: K) -> (&K, bool) {
        let mut current_node = self.root;
        let mut parent_node = Self::BLACK_NIL;
        let mut is_left_child = false;

        while current_node != Self::BLACK_NIL {
            parent_node = current_node;
            let curr_node_storage = &self.storage[current_node.0];

            match key.cmp(&curr_node_storage.key) {
                Ordering::Less => {
                    current_node = curr_node_storage.left;
                    is_left_child = true;
                }
                Ordering::Equal => {
                    return (&self.storage[current_node.0].key, false);
                }
                Ordering::Greater => {
                    current_node = curr_node_storage.right;
                    is_left_child = false;
                }
            }
        }

        let new_node_pos = NodeIndex(self.storage.len());
        self.storage.push(MahoganyNode::new_isolated(key));
        self.storage[new_node_pos.0].parent = parent_node;

        if parent_node == Self::BLACK_NIL {
            self.root = new_node_pos;
        } else if is_left_child {
            self.storage[parent_node.0].left = new_node_pos;
        } else {
            self.storage[parent_node.0].right = new_node_pos;
        }

        self.length += 1;
        self.fix_red_violation(new_node_pos);

        self.storage[self.root.0].color = NodeColor::Black;
        self.storage[Self::BLACK_NIL.0].parent = self.root;

        (&self.storage[new_node_pos.0].key, true)
    }

    /// In-order iterator over the stored keys, smallest first. Supports
    /// iteration from both ends.
    pub fn iter(&self) -> MahoganySortedIterator<'_, K> {
        MahoganySortedIterator {
            tree: self,
            front: self.minimum(self.root),
            back: self.maximum(self.root),
            remaining: self.length,
        }
    }

    /// In-order iterator yielding mutable references. The same ordering
    /// caveat as [`Self::get_mut`] applies.
    pub fn iter_mut(&mut self) -> MahoganySortedIteratorMut<'_, K> {
        let front = self.minimum(self.root);
        let back = self.maximum(self.root);
        let remaining = self.length;

        MahoganySortedIteratorMut {
            storage: self.storage.as_mut_ptr(),
            front,
            back,
            remaining,
            phantom: core::marker::PhantomData,
        }
    }

    pub(crate) fn get_node_by_idx(&self, node_idx: NodeIndex) -> &MahoganyNode<K> {
        &self.storage[node_idx.0]
    }

    fn search(&self, key: &K) -> NodeIndex {
        let mut current_node = self.root;

        while current_node != Self::BLACK_NIL {
            let curr_node_storage = &self.storage[current_node.0];

            match key.cmp(&curr_node_storage.key) {
                Ordering::Less => {
                    current_node = curr_node_storage.left;
                }
                Ordering::Equal => {
                    return current_node;
                }
                Ordering::Greater => {
                    current_node = curr_node_storage.right;
                }
            }
        }

        Self::BLACK_NIL
    }

    /// Leftmost node of the subtree rooted at `node`; the sentinel maps to
    /// itself.
    fn minimum(&self, node: NodeIndex) -> NodeIndex {
        let mut current_node = node;

        while current_node != Self::BLACK_NIL
            && self.storage[current_node.0].left != Self::BLACK_NIL
        {
            current_node = self.storage[current_node.0].left;
        }

        current_node
    }

    fn maximum(&self, node: NodeIndex) -> NodeIndex {
        let mut current_node = node;

        while current_node != Self::BLACK_NIL
            && self.storage[current_node.0].right != Self::BLACK_NIL
        {
            current_node = self.storage[current_node.0].right;
        }

        current_node
    }

    /// Next node in in-order sequence; the sentinel signals the end.
    pub(crate) fn successor(&self, node: NodeIndex) -> NodeIndex {
        let right = self.storage[node.0].right;

        if right != Self::BLACK_NIL {
            return self.minimum(right);
        }

        let mut current_node = node;
        let mut parent_node = self.storage[node.0].parent;

        while parent_node != Self::BLACK_NIL && current_node == self.storage[parent_node.0].right {
            current_node = parent_node;
            parent_node = self.storage[parent_node.0].parent;
        }

        parent_node
    }

    /// Previous node in in-order sequence. Stepping back from the sentinel
    /// (the past-the-end position) lands on the maximum, reached through the
    /// sentinel's parent link which always tracks the root.
    pub(crate) fn predecessor(&self, node: NodeIndex) -> NodeIndex {
        if node == Self::BLACK_NIL {
            return self.maximum(self.storage[node.0].parent);
        }

        let left = self.storage[node.0].left;

        if left != Self::BLACK_NIL {
            return self.maximum(left);
        }

        let mut current_node = node;
        let mut parent_node = self.storage[node.0].parent;

        while parent_node != Self::BLACK_NIL && current_node == self.storage[parent_node.0].left {
            current_node = parent_node;
            parent_node = self.storage[parent_node.0].parent;
        }

        parent_node
    }

    fn subtree_height(&self, node: NodeIndex) -> usize {
        if node == Self::BLACK_NIL {
            return 0;
        }

        let left = self.subtree_height(self.storage[node.0].left);
        let right = self.subtree_height(self.storage[node.0].right);
        1 + left.max(right)
    }

    /// Restores the red-black invariants after `start_node_idx` was linked
    /// in red. Walks toward the root, resolving a red parent by recoloring
    /// when the uncle is red, and by one or two rotations when it is black.
    fn fix_red_violation(&mut self, start_node_idx: NodeIndex) {
        let mut curr_node = start_node_idx;

        while self.storage[self.storage[curr_node.0].parent.0].is_red() {
            let parent_idx = self.storage[curr_node.0].parent;
            let grandparent_idx = self.storage[parent_idx.0].parent;

            if grandparent_idx == Self::BLACK_NIL {
                break;
            }

            let grandparent = &self.storage[grandparent_idx.0];
            let parent_is_right_child = grandparent.right == parent_idx;
            let uncle = if parent_is_right_child {
                grandparent.left
            } else {
                grandparent.right
            };

            if self.storage[uncle.0].is_red() {
                self.storage[parent_idx.0].color = NodeColor::Black;
                self.storage[uncle.0].color = NodeColor::Black;
                self.storage[grandparent_idx.0].color = NodeColor::Red;

                curr_node = grandparent_idx;
                continue;
            }

            let parent = &self.storage[parent_idx.0];
            if (parent_is_right_child && parent.left == curr_node)
                || (!parent_is_right_child && parent.right == curr_node)
            {
                if parent_is_right_child {
                    self.rotate_right(parent_idx);
                } else {
                    self.rotate_left(parent_idx);
                }

                curr_node = parent_idx;
                continue;
            }

            self.storage[parent_idx.0].color = NodeColor::Black;
            self.storage[grandparent_idx.0].color = NodeColor::Red;

            if parent_is_right_child {
                self.rotate_left(grandparent_idx);
            } else {
                self.rotate_right(grandparent_idx);
            }
        }
    }

    /// Hoists `center`'s right child into `center`'s position. Reparents at
    /// most three nodes, never allocates, and leaves the in-order sequence
    /// unchanged. `center.right` must be a real node.
    fn rotate_left(&mut self, center: NodeIndex) {
        let old_parent_idx = self.storage[center.0].parent;
        let pivot_idx = self.storage[center.0].right;

        let inner_idx = self.storage[pivot_idx.0].left;

        self.storage[center.0].right = inner_idx;
        self.storage[inner_idx.0].parent = center;

        self.storage[pivot_idx.0].left = center;
        self.storage[center.0].parent = pivot_idx;
        self.storage[pivot_idx.0].parent = old_parent_idx;

        if old_parent_idx != Self::BLACK_NIL {
            if self.storage[old_parent_idx.0].right == center {
                self.storage[old_parent_idx.0].right = pivot_idx;
            } else {
                self.storage[old_parent_idx.0].left = pivot_idx;
            }
        } else {
            self.root = pivot_idx;
        }
    }

    /// Mirror of [`Self::rotate_left`]. `center.left` must be a real node.
    fn rotate_right(&mut self, center: NodeIndex) {
        let old_parent_idx = self.storage[center.0].parent;
        let pivot_idx = self.storage[center.0].left;

        let inner_idx = self.storage[pivot_idx.0].right;

        self.storage[center.0].left = inner_idx;
        self.storage[inner_idx.0].parent = center;

        self.storage[pivot_idx.0].right = center;
        self.storage[center.0].parent = pivot_idx;
        self.storage[pivot_idx.0].parent = old_parent_idx;

        if old_parent_idx != Self::BLACK_NIL {
            if self.storage[old_parent_idx.0].right == center {
                self.storage[old_parent_idx.0].right = pivot_idx;
            } else {
                self.storage[old_parent_idx.0].left = pivot_idx;
            }
        } else {
            self.root = pivot_idx;
        }
    }
}

impl<K: Default + Ord> Mahogany<K> {
    pub fn new() -> Self {
        Self {
            storage: alloc::vec![MahoganyNode::default()],
            root: Self::BLACK_NIL,
            length: 0,
        }
    }
}

impl<K: Default + Ord> Default for Mahogany<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, K: Ord> IntoIterator for &'a Mahogany<K> {
    type Item = &'a K;
    type IntoIter = MahoganySortedIterator<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K: Ord> IntoIterator for &'a mut Mahogany<K> {
    type Item = &'a mut K;
    type IntoIter = MahoganySortedIteratorMut<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

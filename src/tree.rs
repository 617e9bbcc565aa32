//! The balanced index itself: an AVL tree of unique keys.
//!
//! Every node exclusively owns its two children and there are no parent pointers. Insertion
//! and deletion are recursive functions that take a subtree by value and hand back its new
//! root, so a rotation anywhere on the path is picked up by whoever owns the link above it.
//!
//! # Examples
//!
//! ```
//! use avl_index::{Order, Tree};
//!
//! let mut tree = Tree::new();
//! for key in [10, 20, 30, 40] {
//!     assert_eq!(tree.insert(key), Ok(true));
//! }
//!
//! // Inserting 30 rotated 20 up to the root.
//! let pre: Vec<_> = tree.iter(Order::PreOrder).copied().collect();
//! assert_eq!(pre, [20, 10, 30, 40]);
//!
//! assert_eq!(tree.delete(&30), Some(30));
//! let sorted: Vec<_> = tree.iter(Order::InOrder).copied().collect();
//! assert_eq!(sorted, [10, 20, 40]);
//! ```

use std::alloc::{self, Layout};
use std::cmp::Ordering;
use std::fmt;
use std::ptr::NonNull;

use log::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::traverse::{Iter, Order};

type Link<K> = Option<Box<Node<K>>>;

/// Height of a possibly absent subtree.
fn height<K>(link: &Link<K>) -> usize {
    link.as_ref().map_or(0, |n| n.height)
}

/// A self-balancing Binary Search Tree (specifically, an AVL tree) holding unique keys. It
/// supports inserting, deleting, and finding keys in `O(lg N)` as well as walking them in
/// order, pre-order or post-order.
pub struct Tree<K> {
    root: Link<K>,
}

impl<K> Default for Tree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Drop for Tree<K> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K> Clone for Tree<K>
where
    K: Clone,
{
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
        }
    }
}

impl<K> fmt::Debug for Tree<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree").field("root", &self.root).finish()
    }
}

impl<'a, K> IntoIterator for &'a Tree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    /// Iterates the keys in ascending order.
    fn into_iter(self) -> Self::IntoIter {
        self.iter(Order::InOrder)
    }
}

impl<K> Tree<K> {
    /// Generates a new, empty `Tree`.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Returns `true` if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The number of levels in the tree. An empty tree has a height of 0 and a single key has a
    /// height of 1.
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// Returns `true` if the tree contains `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_index::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1).unwrap();
    ///
    /// assert!(tree.contains(&1));
    /// assert!(!tree.contains(&42));
    /// ```
    pub fn contains(&self, key: &K) -> bool
    where
        K: Ord,
    {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Less => node.left(),
                Ordering::Equal => return true,
                Ordering::Greater => node.right(),
            };
        }
        false
    }

    /// The smallest key in the tree.
    pub fn min(&self) -> Option<&K> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left() {
            node = left;
        }
        Some(&node.key)
    }

    /// The largest key in the tree.
    pub fn max(&self) -> Option<&K> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right() {
            node = right;
        }
        Some(&node.key)
    }

    /// Inserts `key` into the tree. Returns `Ok(true)` if the key was added and `Ok(false)` if
    /// it was already present, in which case the tree is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if a node for the key can't be allocated. No link in the
    /// tree has been touched when that happens.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_index::Tree;
    ///
    /// let mut tree = Tree::new();
    ///
    /// assert_eq!(tree.insert(5), Ok(true));
    /// assert_eq!(tree.insert(5), Ok(false));
    /// assert!(tree.contains(&5));
    /// ```
    pub fn insert(&mut self, key: K) -> Result<bool>
    where
        K: Ord,
    {
        if self.contains(&key) {
            return Ok(false);
        }

        // Allocate before relinking anything so a failure can't leave a half-built path.
        let leaf = Node::try_new_boxed(key)?;
        self.root = Some(Node::insert(self.root.take(), leaf));
        Ok(true)
    }

    /// Deletes `key` from the tree and returns it. If the tree doesn't contain the key, nothing
    /// happens and `None` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_index::Tree;
    ///
    /// let mut tree = Tree::new();
    /// assert_eq!(tree.delete(&5), None);
    ///
    /// tree.insert(5).unwrap();
    /// assert_eq!(tree.delete(&5), Some(5));
    /// assert!(tree.is_empty());
    /// ```
    pub fn delete(&mut self, key: &K) -> Option<K>
    where
        K: Ord,
    {
        let (root, removed) = Node::delete(self.root.take(), key);
        self.root = root;
        removed
    }

    /// Lazily walks the keys in the given `order`. Each call starts a fresh traversal from the
    /// root.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_index::{Order, Tree};
    ///
    /// let mut tree = Tree::new();
    /// for key in [2, 1, 3] {
    ///     tree.insert(key).unwrap();
    /// }
    ///
    /// assert!(tree.iter(Order::InOrder).eq(&[1, 2, 3]));
    /// assert!(tree.iter(Order::PreOrder).eq(&[2, 1, 3]));
    /// assert!(tree.iter(Order::PostOrder).eq(&[1, 3, 2]));
    /// ```
    pub fn iter(&self, order: Order) -> Iter<'_, K> {
        Iter::new(self.root.as_deref(), order)
    }

    /// Hands every key to `visit` exactly once, in the given `order`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_index::{Order, Tree};
    ///
    /// let mut tree = Tree::new();
    /// for key in [10, 20, 30, 40] {
    ///     tree.insert(key).unwrap();
    /// }
    ///
    /// let mut seen = String::new();
    /// tree.traverse(Order::PostOrder, |key| seen.push_str(&format!("{key} ")));
    /// assert_eq!(seen, "10 40 30 20 ");
    /// ```
    pub fn traverse<F>(&self, order: Order, visit: F)
    where
        F: FnMut(&K),
    {
        self.iter(order).for_each(visit);
    }

    /// Releases every node, leaving an empty tree. Nodes are freed in post-order so a parent
    /// always outlives its children.
    pub fn clear(&mut self) {
        let Some(root) = self.root.take() else {
            return;
        };

        let mut released = 0usize;
        let mut stack = vec![root];
        while let Some(mut node) = stack.pop() {
            match node.left.take().or_else(|| node.right.take()) {
                Some(child) => {
                    stack.push(node);
                    stack.push(child);
                }
                None => {
                    drop(node);
                    released += 1;
                }
            }
        }
        debug!("released {released} nodes");
    }

    /// Walks the whole tree asserting the BST, balance, and height invariants.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self)
    where
        K: Ord + fmt::Debug,
    {
        fn check<K: Ord + fmt::Debug>(node: &Node<K>, lower: Option<&K>, upper: Option<&K>) {
            if let Some(lower) = lower {
                assert!(lower < &node.key, "{lower:?} is not less than {:?}", node.key);
            }
            if let Some(upper) = upper {
                assert!(&node.key < upper, "{:?} is not less than {upper:?}", node.key);
            }
            if let Some(left) = node.left() {
                check(left, lower, Some(&node.key));
            }
            if let Some(right) = node.right() {
                check(right, Some(&node.key), upper);
            }

            let (left, right) = (height(&node.left), height(&node.right));
            assert_eq!(node.height, left.max(right) + 1, "stale height at {:?}", node.key);
            assert!(left.abs_diff(right) <= 1, "unbalanced at {:?}", node.key);
        }

        if let Some(root) = self.root.as_deref() {
            check(root, None, None);
        }
    }
}

/// A single key and its two (possibly empty) subtrees.
#[derive(Clone)]
pub(crate) struct Node<K> {
    key: K,
    left: Link<K>,
    right: Link<K>,

    /// How many levels are in the subtree rooted at this node.
    /// A node with no children has a height of 1.
    height: usize,
}

impl<K> fmt::Debug for Node<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("height", &self.height)
            .field("left", &self.left)
            .field("right", &self.right)
            .finish()
    }
}

impl<K> Node<K> {
    /// Allocates a leaf for `key`, reporting allocator failure instead of aborting.
    fn try_new_boxed(key: K) -> Result<Box<Self>> {
        let layout = Layout::new::<Self>();
        // SAFETY: A `Node` always stores its height, so `layout` is never zero sized.
        let ptr = unsafe { alloc::alloc(layout) }.cast::<Self>();
        let Some(ptr) = NonNull::new(ptr) else {
            warn!("allocating a {} byte node failed", layout.size());
            return Err(Error::OutOfMemory {
                size: layout.size(),
            });
        };

        // SAFETY: `ptr` is non-null and was just handed out by the global allocator for exactly
        // `Layout::new::<Self>()`, which is the allocation `Box::from_raw` expects. Nothing else
        // references it, and `write` initializes it without reading the old contents.
        unsafe {
            ptr.as_ptr().write(Self {
                height: 1,
                key,
                left: None,
                right: None,
            });
            Ok(Box::from_raw(ptr.as_ptr()))
        }
    }

    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    pub(crate) fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    pub(crate) fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }

    fn fix_height(&mut self) {
        self.height = height(&self.left).max(height(&self.right)) + 1;
    }

    /// Positive when the left subtree is taller.
    fn balance_factor(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }

    /// Rotate self to the right. This moves the left child up vertically and self down
    /// vertically. Used to rebalance the tree when the left child is too tall.
    ///
    /// ## Panics
    ///
    /// When called on a node without a left child.
    ///
    /// # Diagram
    ///
    /// ```text
    ///      old_root               new_root
    ///      /     \                /     \
    ///  new_root   z   rotate ->  x    old_root
    ///   /   \                          /   \
    ///  x     y                        y     z
    /// ```
    fn rotate_right(mut self: Box<Self>) -> Box<Self> {
        let mut new_root = self.left.take().expect("Rotate right => left child");
        self.left = new_root.right.take();
        self.fix_height();

        new_root.right = Some(self);
        new_root.fix_height();
        new_root
    }

    /// Mirror image of [`Node::rotate_right`]: the right child moves up.
    ///
    /// ## Panics
    ///
    /// When called on a node without a right child.
    fn rotate_left(mut self: Box<Self>) -> Box<Self> {
        let mut new_root = self.right.take().expect("Rotate left => right child");
        self.right = new_root.left.take();
        self.fix_height();

        new_root.left = Some(self);
        new_root.fix_height();
        new_root
    }

    /// Restores the AVL invariant at this node, assuming both children satisfy it and this
    /// node's height is current. The rotation case is picked from the taller child's own
    /// balance factor, so inserts and deletes share this routine.
    ///
    /// See <https://en.wikipedia.org/wiki/AVL_tree#Rebalancing> for terminology.
    fn rebalance(mut self: Box<Self>) -> Box<Self> {
        let factor = self.balance_factor();
        let balanced = if factor > 1 {
            let left = self.left.take().expect("Left heavy => left child");
            self.left = Some(if left.balance_factor() < 0 {
                trace!("left-right rotation at height {}", self.height);
                left.rotate_left()
            } else {
                trace!("left-left rotation at height {}", self.height);
                left
            });
            self.rotate_right()
        } else if factor < -1 {
            let right = self.right.take().expect("Right heavy => right child");
            self.right = Some(if right.balance_factor() > 0 {
                trace!("right-left rotation at height {}", self.height);
                right.rotate_right()
            } else {
                trace!("right-right rotation at height {}", self.height);
                right
            });
            self.rotate_left()
        } else {
            self
        };

        if cfg!(debug_assertions) {
            let left_height = height(&balanced.left);
            let right_height = height(&balanced.right);
            assert_eq!(balanced.height, left_height.max(right_height) + 1);
            assert!(left_height.abs_diff(right_height) <= 1);
        }
        balanced
    }

    /// Links `leaf` into the subtree rooted at `link` and returns the subtree's new root. If the
    /// subtree already holds the leaf's key, the leaf is dropped and the subtree is returned
    /// untouched.
    fn insert(link: Link<K>, leaf: Box<Self>) -> Box<Self>
    where
        K: Ord,
    {
        let Some(mut node) = link else {
            return leaf;
        };

        match leaf.key.cmp(&node.key) {
            Ordering::Less => node.left = Some(Self::insert(node.left.take(), leaf)),
            Ordering::Equal => return node,
            Ordering::Greater => node.right = Some(Self::insert(node.right.take(), leaf)),
        }

        node.fix_height();
        node.rebalance()
    }

    /// Removes `key` from the subtree rooted at `link`. Returns the subtree's new root along with
    /// the removed key, if it was found.
    fn delete(link: Link<K>, key: &K) -> (Link<K>, Option<K>)
    where
        K: Ord,
    {
        let Some(mut node) = link else {
            return (None, None);
        };

        let removed = match key.cmp(&node.key) {
            Ordering::Less => {
                let (left, removed) = Self::delete(node.left.take(), key);
                node.left = left;
                removed
            }
            Ordering::Greater => {
                let (right, removed) = Self::delete(node.right.take(), key);
                node.right = right;
                removed
            }
            Ordering::Equal => match (node.left.take(), node.right.take()) {
                // With at most one child, that child takes this node's place.
                (None, right) => return (right, Some(node.key)),
                (left, None) => return (left, Some(node.key)),

                // Otherwise the in-order successor moves up into this node and its old
                // position, which never has a left child, is removed instead.
                (Some(left), Some(right)) => {
                    let (successor, right) = Self::take_min(right);
                    node.left = Some(left);
                    node.right = right;
                    Some(std::mem::replace(&mut node.key, successor))
                }
            },
        };

        if removed.is_none() {
            return (Some(node), None);
        }

        node.fix_height();
        (Some(node.rebalance()), removed)
    }

    /// Detaches the leftmost node of this subtree. Returns its key and the rebalanced remainder.
    fn take_min(mut self: Box<Self>) -> (K, Link<K>) {
        match self.left.take() {
            None => {
                let Self { key, right, .. } = *self;
                (key, right)
            }
            Some(left) => {
                let (min, left) = left.take_min();
                self.left = left;
                self.fix_height();
                (min, Some(self.rebalance()))
            }
        }
    }
}

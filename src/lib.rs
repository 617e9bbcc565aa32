//! This crate exposes a self-balancing ordered index of unique keys built on an AVL tree.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored keys. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores a key and
//! sometimes has child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching for a key takes `O(height)` (where `height` is defined as the longest
//! path from the root `Node` to a leaf `Node`). BSTs also naturally support sorted
//! iteration by visiting the left subtree, then the subtree root, then the right subtree.
//!
//! ## AVL Tree
//!
//! An AVL tree additionally keeps, for every `Node`, the heights of its two subtrees within
//! one of each other. Each `Node` caches its height and, after an insert or delete, every
//! `Node` on the path back to the root is rotated as needed to restore the invariant. This
//! bounds the height by `O(lg N)` where `N` is the number of keys, so [`Tree::insert`],
//! [`Tree::delete`] and [`Tree::contains`] are all `O(lg N)`.
//!
//! # Examples
//!
//! ```
//! use avl_index::{Order, Tree};
//!
//! let mut tree = Tree::new();
//! for key in [10, 20, 30, 40] {
//!     tree.insert(key)?;
//! }
//!
//! // Inserting a key twice changes nothing.
//! assert!(!tree.insert(20)?);
//!
//! let mut visited = Vec::new();
//! tree.traverse(Order::PreOrder, |key| visited.push(*key));
//! assert_eq!(visited, [20, 10, 30, 40]);
//! # Ok::<(), avl_index::Error>(())
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod error;
pub mod traverse;
mod tree;

pub use error::{Error, Result};
pub use traverse::{Iter, Order, ParseOrderError};
pub use tree::Tree;

#[cfg(test)]
mod test;

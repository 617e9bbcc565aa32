//! Depth-first traversals over a [`Tree`][crate::Tree].
//!
//! Every traversal is lazy: nothing is visited until the [`Iter`] is advanced. The iterator
//! keeps an explicit stack no deeper than the tree is tall, so it never recurses. Cloning an
//! [`Iter`] restarts nothing, it forks the traversal at its current position; call
//! [`Tree::iter`][crate::Tree::iter] again to start over.

use std::fmt;
use std::iter::FusedIterator;
use std::str::FromStr;

use thiserror::Error;

use crate::tree::Node;

/// The order in which a traversal delivers keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Order {
    /// Left subtree, then the node, then the right subtree. Keys come out in ascending order.
    InOrder,
    /// The node, then its left subtree, then its right subtree.
    PreOrder,
    /// Left subtree, then right subtree, then the node. A node is seen only after both of
    /// its children have been fully processed.
    PostOrder,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InOrder => "in",
            Self::PreOrder => "pre",
            Self::PostOrder => "post",
        };
        f.write_str(name)
    }
}

/// Returned when a string doesn't name a traversal [`Order`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown traversal order `{0}`, expected one of `in`, `pre` or `post`")]
pub struct ParseOrderError(String);

impl FromStr for Order {
    type Err = ParseOrderError;

    /// Parses `in`, `pre` and `post` (or `inorder`, `preorder` and `postorder`) ignoring case.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_index::Order;
    ///
    /// assert_eq!("pre".parse(), Ok(Order::PreOrder));
    /// assert_eq!("PostOrder".parse(), Ok(Order::PostOrder));
    /// assert!("sideways".parse::<Order>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "in" | "inorder" => Ok(Self::InOrder),
            "pre" | "preorder" => Ok(Self::PreOrder),
            "post" | "postorder" => Ok(Self::PostOrder),
            _ => Err(ParseOrderError(s.to_owned())),
        }
    }
}

/// A pending unit of work on the traversal stack.
enum Frame<'a, K> {
    /// The node's subtree hasn't been looked at yet.
    Expand(&'a Node<K>),
    /// The node's key is next in line.
    Visit(&'a Node<K>),
}

impl<K> Clone for Frame<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<K> Copy for Frame<'_, K> {}

/// Lazy iterator over the keys of a tree in a given [`Order`]. Created by
/// [`Tree::iter`][crate::Tree::iter].
pub struct Iter<'a, K> {
    order: Order,
    stack: Vec<Frame<'a, K>>,
}

/// Manual implementation of `Clone` so cloning the iterator doesn't require `K: Clone`.
impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Self {
            order: self.order,
            stack: self.stack.clone(),
        }
    }
}

impl<K> fmt::Debug for Iter<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("order", &self.order)
            .field("pending", &self.stack.len())
            .finish()
    }
}

impl<'a, K> Iter<'a, K> {
    pub(crate) fn new(root: Option<&'a Node<K>>, order: Order) -> Self {
        Self {
            order,
            stack: root.map(Frame::Expand).into_iter().collect(),
        }
    }

    /// The order this iterator delivers keys in.
    pub fn order(&self) -> Order {
        self.order
    }

    /// Pushes the work for `node`'s subtree. The stack is LIFO so frames go on in the reverse
    /// of the order they should come off.
    fn expand(&mut self, node: &'a Node<K>) {
        let left = node.left().map(Frame::Expand);
        let right = node.right().map(Frame::Expand);
        let frames = match self.order {
            Order::InOrder => [right, Some(Frame::Visit(node)), left],
            Order::PreOrder => [right, left, Some(Frame::Visit(node))],
            Order::PostOrder => [Some(Frame::Visit(node)), right, left],
        };
        self.stack.extend(frames.into_iter().flatten());
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Visit(node) => return Some(node.key()),
                Frame::Expand(node) => self.expand(node),
            }
        }
        None
    }
}

impl<K> FusedIterator for Iter<'_, K> {}

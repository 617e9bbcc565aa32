//! Property tests that need to look inside the tree.


use std::collections::BTreeSet;

use quickcheck_macros::quickcheck;

use crate::{Order, Tree};
use quick::Op;

/// Applies a set of operations to a tree and a `BTreeSet`, checking the AVL invariants after
/// every step and that each walk agrees with the model.
fn do_ops(ops: &[Op<i8>]) -> (Tree<i8>, BTreeSet<i8>) {
    let mut tree = Tree::new();
    let mut set = BTreeSet::new();

    for op in ops {
        match op {
            Op::Insert(k) => {
                assert_eq!(tree.insert(*k), Ok(set.insert(*k)));
            }
            Op::Delete(k) => {
                assert_eq!(tree.delete(k), set.take(k));
            }
            Op::Iter(order) => {
                let mut walked: Vec<_> = tree.iter(*order).copied().collect();
                if *order != Order::InOrder {
                    walked.sort_unstable();
                }
                assert!(walked.iter().eq(set.iter()));
            }
        }
        tree.check_invariants();
    }

    (tree, set)
}

#[quickcheck]
fn invariants_hold_after_any_operations(ops: Vec<Op<i8>>) -> bool {
    let (tree, set) = do_ops(&ops);
    tree.iter(Order::InOrder).eq(set.iter())
}

#[quickcheck]
fn duplicate_insert_keeps_every_walk(xs: Vec<i8>, dup: usize) -> bool {
    if xs.is_empty() {
        return true;
    }
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x).unwrap();
    }
    let walks = |tree: &Tree<i8>| {
        [Order::InOrder, Order::PreOrder, Order::PostOrder]
            .map(|order| tree.iter(order).copied().collect::<Vec<_>>())
    };
    let before = walks(&tree);
    let height = tree.height();

    let added = tree.insert(xs[dup % xs.len()]).unwrap();
    !added && walks(&tree) == before && tree.height() == height
}

#[quickcheck]
fn insert_then_delete_restores_keys(xs: Vec<i8>, k: i8) -> bool {
    let mut tree = Tree::new();
    for x in xs.iter().filter(|x| **x != k) {
        tree.insert(*x).unwrap();
    }
    let before: Vec<_> = tree.iter(Order::InOrder).copied().collect();

    tree.insert(k).unwrap();
    tree.check_invariants();
    let removed = tree.delete(&k);
    tree.check_invariants();

    removed == Some(k) && tree.iter(Order::InOrder).eq(before.iter())
}

#[quickcheck]
fn height_is_logarithmic(xs: Vec<u16>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x).unwrap();
    }
    let n = tree.iter(Order::PreOrder).count() as f64;

    // An AVL tree with n nodes is never taller than about 1.44 lg(n + 2).
    (tree.height() as f64) <= 1.45 * (n + 2.0).log2()
}

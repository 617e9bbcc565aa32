use avl_index::{Order, Tree};

use std::collections::HashSet;

use crate::Op;

/// Applies a set of operations to a tree and a hashset.
/// This way we can ensure that after a random smattering of inserts
/// and deletes we have the same set of keys in both.
fn do_ops<K>(ops: &[Op<K>], tree: &mut Tree<K>, set: &mut HashSet<K>)
where
    K: std::hash::Hash + Eq + Copy + Ord + std::fmt::Debug,
{
    for op in ops {
        match op {
            Op::Insert(k) => {
                assert_eq!(tree.insert(*k), Ok(set.insert(*k)));
            }
            Op::Remove(k) => {
                assert_eq!(tree.delete(k).is_some(), set.remove(k));
            }
        }
    }
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    let mut tree = Tree::new();
    let mut set = HashSet::new();

    do_ops(&ops, &mut tree, &mut set);
    (i8::MIN..=i8::MAX).all(|key| tree.contains(&key) == set.contains(&key))
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x).unwrap();
    }

    xs.iter().all(|x| tree.contains(x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x).unwrap();
    }
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| !tree.contains(x))
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x).unwrap();
    }
    for delete in &deletes {
        tree.delete(delete);
    }

    let mut still_present = xs;
    for delete in &deletes {
        // We may have inserted the same value multiple times - delete each one.
        while let Some(pos) = still_present.iter().position(|x| x == delete) {
            still_present.swap_remove(pos);
        }
    }

    deletes.iter().all(|x| !tree.contains(x)) && still_present.iter().all(|x| tree.contains(x))
}

#[quickcheck]
fn in_order_is_strictly_ascending(ops: Vec<Op<i16>>) -> bool {
    let mut tree = Tree::new();
    let mut set = HashSet::new();
    do_ops(&ops, &mut tree, &mut set);

    let keys: Vec<_> = tree.iter(Order::InOrder).collect();
    keys.windows(2).all(|pair| pair[0] < pair[1]) && keys.len() == set.len()
}

#[quickcheck]
fn every_order_visits_each_key_once(xs: Vec<i16>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x).unwrap();
    }
    let sorted: Vec<_> = tree.iter(Order::InOrder).copied().collect();

    [Order::PreOrder, Order::PostOrder].into_iter().all(|order| {
        let mut visited = Vec::new();
        tree.traverse(order, |key| visited.push(*key));
        visited.sort_unstable();
        visited == sorted
    })
}

#[quickcheck]
fn min_and_max_match_in_order_ends(xs: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x).unwrap();
    }

    tree.min() == tree.iter(Order::InOrder).next() && tree.max() == tree.iter(Order::InOrder).last()
}

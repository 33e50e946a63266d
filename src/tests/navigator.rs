use super::{
    find_first, find_last, find_leaf_descendant, find_next, nearest_ancestor, normalize,
    search_root, Direction, FindOptions, Traversal,
};
use crate::predicates;
use crate::role::Role;
use crate::tree::{Node, NodeData, NodeId, Tree};

/// doc > [heading "Intro" > text "Intro",
///        paragraph > [text "one", link "two"],
///        list > item > [text "three", button "Go"],
///        heading "End"]
fn document() -> (Tree, Vec<NodeId>) {
    let mut tree = Tree::new(NodeData::new(Role::RootWebArea).with_name("doc"));
    let doc = tree.root_id();
    let h1 = tree.append(doc, NodeData::new(Role::Heading).with_level(1).with_name("Intro"));
    let h1_text = tree.append(h1, NodeData::new(Role::StaticText).with_name("Intro"));
    let p = tree.append(doc, NodeData::new(Role::Paragraph));
    let one = tree.append(p, NodeData::new(Role::StaticText).with_name("one"));
    let two = tree.append(p, NodeData::new(Role::Link).with_name("two"));
    let list = tree.append(doc, NodeData::new(Role::List));
    let item = tree.append(list, NodeData::new(Role::ListItem));
    let three = tree.append(item, NodeData::new(Role::StaticText).with_name("three"));
    let go = tree.append(item, NodeData::new(Role::Button).with_name("Go"));
    let end = tree.append(doc, NodeData::new(Role::Heading).with_level(2).with_name("End"));
    (
        tree,
        vec![doc, h1, h1_text, p, one, two, list, item, three, go, end],
    )
}

fn ids<'t>(nodes: impl Iterator<Item = Node<'t>>) -> Vec<NodeId> {
    nodes.map(Node::id).collect()
}

#[test]
fn test_traversal_is_pre_order_forward() {
    let (tree, all) = document();
    let forward = ids(Traversal::new(tree.root(), Direction::Forward));
    assert_eq!(forward, all, "forward traversal should be pre-order");
}

#[test]
fn test_backward_traversal_mirrors_forward() {
    let (tree, _) = document();
    let forward = ids(Traversal::new(tree.root(), Direction::Forward));
    let mut backward = ids(Traversal::new(tree.root(), Direction::Backward));
    backward.reverse();
    assert_eq!(forward, backward, "backward must visit in exactly reversed order");
}

#[test]
fn test_find_first_leaf_symmetry() {
    let (tree, all) = document();
    let first = find_first(tree.root(), Direction::Forward, predicates::is_leaf).unwrap();
    let last = find_first(tree.root(), Direction::Backward, predicates::is_leaf).unwrap();
    assert_eq!(first.id(), all[2], "first leaf is the heading text");
    assert_eq!(last.id(), all[10], "last leaf is the final heading");
    assert_eq!(
        find_last(tree.root(), Direction::Forward, predicates::is_leaf).map(Node::id),
        Some(last.id())
    );
}

#[test]
fn test_find_first_includes_root() {
    let (tree, all) = document();
    let found = find_first(tree.root(), Direction::Forward, |n| n.role() == Role::RootWebArea);
    assert_eq!(found.map(Node::id), Some(all[0]));
    assert!(find_first(tree.root(), Direction::Forward, |n| n.role() == Role::Table).is_none());
}

#[test]
fn test_find_next_is_strictly_after_start() {
    let (tree, all) = document();
    let intro = tree.node(all[1]).unwrap();
    let next = find_next(intro, Direction::Forward, predicates::heading, FindOptions::default());
    assert_eq!(next.map(Node::id), Some(all[10]), "the start itself never matches");

    let end = tree.node(all[10]).unwrap();
    let prev = find_next(end, Direction::Backward, predicates::heading, FindOptions::default());
    assert_eq!(prev.map(Node::id), Some(all[1]));
}

#[test]
fn test_find_next_monotonic() {
    let (tree, all) = document();
    let start = tree.node(all[4]).unwrap();
    let found = find_next(start, Direction::Forward, predicates::button, FindOptions::default())
        .unwrap();
    assert_eq!(found.id(), all[9]);

    let between: Vec<_> = Traversal::new(tree.root(), Direction::Forward)
        .skip_while(|n| *n != start)
        .skip(1)
        .take_while(|n| *n != found)
        .collect();
    assert!(!between.is_empty());
    assert!(
        between.iter().all(|n| !predicates::button(*n)),
        "no match may lie between start and the result"
    );
}

#[test]
fn test_skip_ancestry_never_returns_enclosing_match() {
    let (tree, all) = document();
    let text = tree.node(all[2]).unwrap();
    let parent = tree.node(all[1]).unwrap();
    assert!(predicates::heading(parent));

    let plain = find_next(text, Direction::Backward, predicates::heading, FindOptions::default());
    assert_eq!(plain.map(Node::id), Some(all[1]), "without skipping, the parent is found");

    let skipping = find_next(
        text,
        Direction::Backward,
        predicates::heading,
        FindOptions::skipping_ancestry(),
    );
    assert_eq!(skipping, None, "the enclosing heading is not a match");

    let forward = find_next(
        text,
        Direction::Forward,
        predicates::heading,
        FindOptions::skipping_ancestry(),
    );
    assert_eq!(forward.map(Node::id), Some(all[10]));
}

#[test]
fn test_atomic_matches_are_not_entered() {
    let mut tree = Tree::new(NodeData::new(Role::RootWebArea));
    let doc = tree.root_id();
    let before = tree.append(doc, NodeData::new(Role::StaticText).with_name("before"));
    let ok = tree.append(doc, NodeData::new(Role::Button).with_name("OK"));
    let label = tree.append(ok, NodeData::new(Role::StaticText).with_name("OK"));
    let after = tree.append(doc, NodeData::new(Role::StaticText).with_name("after"));
    let leaves = FindOptions::skipping_ancestry().atomic();

    let node = |id| tree.node(id).unwrap();
    let forward = find_next(node(before), Direction::Forward, predicates::is_leaf, leaves);
    assert_eq!(forward.map(Node::id), Some(ok));
    let next = find_next(node(ok), Direction::Forward, predicates::is_leaf, leaves);
    assert_eq!(next.map(Node::id), Some(after), "the button label is part of the button");
    let back = find_next(node(after), Direction::Backward, predicates::is_leaf, leaves);
    assert_eq!(back.map(Node::id), Some(ok), "the outermost leaf wins backward too");

    let plain = FindOptions::skipping_ancestry();
    let inner = find_next(node(ok), Direction::Forward, predicates::is_leaf, plain);
    assert_eq!(inner.map(Node::id), Some(label));
    let back = find_next(node(after), Direction::Backward, predicates::is_leaf, plain);
    assert_eq!(back.map(Node::id), Some(label));
}

#[test]
fn test_nested_matches_are_visited_in_order() {
    // doc > [comboBox > textField "inner", textField "after"]
    let mut tree = Tree::new(NodeData::new(Role::RootWebArea));
    let doc = tree.root_id();
    let combo = tree.append(doc, NodeData::new(Role::ComboBox).with_name("combo"));
    let inner = tree.append(combo, NodeData::new(Role::TextField).with_name("inner"));
    let after = tree.append(doc, NodeData::new(Role::TextField).with_name("after"));
    let opts = FindOptions::skipping_ancestry();
    let node = |id| tree.node(id).unwrap();

    let next = find_next(node(combo), Direction::Forward, predicates::form_field, opts);
    assert_eq!(next.map(Node::id), Some(inner), "the nested field comes first in pre-order");
    let next = find_next(node(inner), Direction::Forward, predicates::form_field, opts);
    assert_eq!(next.map(Node::id), Some(after));

    let prev = find_next(node(after), Direction::Backward, predicates::form_field, opts);
    assert_eq!(prev.map(Node::id), Some(inner), "reverse pre-order reaches the nested field first");
    let prev = find_next(node(inner), Direction::Backward, predicates::form_field, opts);
    assert_eq!(prev, None, "the enclosing combo box is ancestry");
    let prev = find_next(
        node(inner),
        Direction::Backward,
        predicates::form_field,
        FindOptions::default(),
    );
    assert_eq!(prev.map(Node::id), Some(combo));
}

#[test]
fn test_root_predicate_bounds_search() {
    let (tree, all) = document();
    let three = tree.node(all[8]).unwrap();
    let in_item = FindOptions::skipping_ancestry().within(|n| n.role() == Role::ListItem);

    assert_eq!(search_root(three, in_item.root).id(), all[7]);
    let next = find_next(three, Direction::Forward, predicates::is_leaf, in_item);
    assert_eq!(next.map(Node::id), Some(all[9]));
    let after = find_next(
        tree.node(all[9]).unwrap(),
        Direction::Forward,
        predicates::is_leaf,
        in_item,
    );
    assert_eq!(after, None, "search may not leave the list item");
    let before = find_next(three, Direction::Backward, predicates::is_leaf, in_item);
    assert_eq!(before, None);
}

#[test]
fn test_search_root_falls_back_to_top() {
    let (tree, all) = document();
    let go = tree.node(all[9]).unwrap();
    let root = search_root(go, |n| n.role() == Role::Table);
    assert_eq!(root.id(), tree.root_id());
}

#[test]
fn test_nearest_ancestor_includes_self() {
    let (tree, all) = document();
    let go = tree.node(all[9]).unwrap();
    assert_eq!(nearest_ancestor(go, predicates::button).map(Node::id), Some(all[9]));
    assert_eq!(
        nearest_ancestor(go, |n| n.role() == Role::List).map(Node::id),
        Some(all[6])
    );
    assert_eq!(nearest_ancestor(go, predicates::table), None);
}

#[test]
fn test_leaf_descendant_and_normalize() {
    let (tree, all) = document();
    let list = tree.node(all[6]).unwrap();
    assert_eq!(find_leaf_descendant(list, Direction::Forward).id(), all[8]);
    assert_eq!(find_leaf_descendant(list, Direction::Backward).id(), all[9]);
    assert_eq!(normalize(list, Direction::Forward).id(), all[8]);

    let go = tree.node(all[9]).unwrap();
    assert_eq!(normalize(go, Direction::Backward).id(), all[9], "leaves stay put");
}

#[test]
fn test_deep_tree_does_not_overflow() {
    let mut tree = Tree::new(NodeData::new(Role::RootWebArea));
    let mut parent = tree.root_id();
    for _ in 0..100_000 {
        parent = tree.append(parent, NodeData::new(Role::Group));
    }
    let leaf = tree.append(parent, NodeData::new(Role::StaticText).with_name("deep"));

    let found = find_first(tree.root(), Direction::Forward, |n| n.name() == "deep");
    assert_eq!(found.map(Node::id), Some(leaf));
    let back = find_first(tree.root(), Direction::Backward, predicates::is_leaf);
    assert_eq!(back.map(Node::id), Some(leaf));
    let up = find_next(
        tree.node(leaf).unwrap(),
        Direction::Backward,
        |n| n.id() == tree.root_id(),
        FindOptions::default(),
    );
    assert_eq!(up.map(Node::id), Some(tree.root_id()));
    assert_eq!(tree.node(leaf).unwrap().path().len(), 100_001);
}

//! Property tests: group union, scope exclusion and canonical round-trips.

// quickcheck hands generated inputs over by value
#![allow(clippy::needless_pass_by_value)]

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use serde_json::{Value, json};
use thicket_dom::{DomTree, NodeId};
use thicket_select::{parse, select};

const COMPOUNDS: &[&str] = &[
    "div",
    "p",
    "span",
    "*",
    ".a",
    ".b",
    "p.a",
    "#n1",
    "[class]",
    "[class^=a]",
    "[class!=b]",
    "div:has(span)",
    "span:not(.a)",
    "p:lt(1)",
    "*:gt(0)",
    ":eq(1)",
    ":contains(x)",
    ":containsOwn(y)",
    ":matches(x|y)",
    ":first-child",
    ":empty",
    "div:has(p:contains(x's))",
    "p:not(:contains(\"y\"))",
    "span:has(:matches(x'|y))",
    ":not(:containsOwn(x[y))",
];

const COMBINATORS: &[&str] = &[" ", " > ", " + ", " ~ "];

/// A small random tree description.
#[derive(Debug, Clone)]
struct ArbTree(Value);

/// A random selector built from a fixed vocabulary.
#[derive(Debug, Clone)]
struct ArbSelector(String);

fn pick<T: Copy>(g: &mut Gen, items: &[T]) -> T {
    *g.choose(items).unwrap()
}

fn arbitrary_node(g: &mut Gen, depth: usize, counter: &mut usize) -> Value {
    if depth == 0 || usize::arbitrary(g) % 5 == 0 {
        return json!(pick(g, &["x", "y", " ", "x y"]));
    }
    *counter += 1;
    let children: Vec<Value> = (0..usize::arbitrary(g) % 4)
        .map(|_| arbitrary_node(g, depth - 1, counter))
        .collect();
    json!({
        "tag": pick(g, &["div", "p", "span"]),
        "attrs": {"class": pick(g, &["", "a", "b", "a b"]), "id": format!("n{counter}")},
        "children": children,
    })
}

impl Arbitrary for ArbTree {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut counter = 0;
        let top: Vec<Value> = (0..1 + usize::arbitrary(g) % 3)
            .map(|_| arbitrary_node(g, 4, &mut counter))
            .collect();
        Self(Value::Array(top))
    }
}

impl Arbitrary for ArbSelector {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut text = String::new();
        if bool::arbitrary(g) && bool::arbitrary(g) {
            text.push_str("> ");
        }
        text.push_str(pick(g, COMPOUNDS));
        for _ in 0..usize::arbitrary(g) % 3 {
            text.push_str(pick(g, COMBINATORS));
            text.push_str(pick(g, COMPOUNDS));
        }
        Self(text)
    }
}

fn build(tree: &ArbTree) -> DomTree {
    DomTree::from_json(&tree.0.to_string()).unwrap()
}

fn query(tree: &DomTree, scope: NodeId, text: &str) -> Vec<NodeId> {
    select(tree, scope, text).unwrap().into_vec()
}

#[quickcheck]
fn prop_group_is_ordered_union(tree: ArbTree, first: ArbSelector, second: ArbSelector) -> bool {
    let tree = build(&tree);
    let root = tree.root();
    let mut expected = query(&tree, root, &first.0);
    expected.extend(query(&tree, root, &second.0));
    // The builder allocates in document order
    expected.sort_unstable();
    expected.dedup();
    query(&tree, root, &format!("{}, {}", first.0, second.0)) == expected
}

#[quickcheck]
fn prop_results_are_strictly_below_scope(tree: ArbTree, selector: ArbSelector) -> bool {
    let tree = build(&tree);
    let Some(scope) = tree.document_element() else {
        return true;
    };
    let found = query(&tree, scope, &selector.0);
    found.windows(2).all(|pair| pair[0] < pair[1])
        && found
            .iter()
            .all(|&node| node != scope && tree.is_descendant_of(node, scope))
}

#[quickcheck]
fn prop_universal_selects_every_element(tree: ArbTree) -> bool {
    let tree = build(&tree);
    let elements = tree
        .descendants(tree.root())
        .filter(|&node| tree.as_element(node).is_some())
        .count();
    query(&tree, tree.root(), "*").len() == elements
}

#[quickcheck]
fn prop_canonical_form_round_trips(selector: ArbSelector) -> bool {
    let ast = parse(&selector.0).unwrap();
    let canonical = ast.to_string();
    let reparsed = parse(&canonical).unwrap();
    reparsed == ast && reparsed.to_string() == canonical
}

#[quickcheck]
fn prop_not_has_is_complement(tree: ArbTree) -> bool {
    let tree = build(&tree);
    let root = tree.root();
    let mut with = query(&tree, root, "div:has(span)");
    with.extend(query(&tree, root, "div:not(:has(span))"));
    with.sort_unstable();
    with == query(&tree, root, "div")
}

use super::{jaccard, select_boundaries, Similarity};
use std::collections::BTreeSet;

fn set(words: &[&str]) -> BTreeSet<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

#[test]
fn test_jaccard_edge_cases() {
    assert_eq!(jaccard(&set(&[]), &set(&[])), Similarity::IDENTICAL);
    assert_eq!(jaccard(&set(&["a"]), &set(&[])), Similarity::DISJOINT);
    assert_eq!(jaccard(&set(&[]), &set(&["a"])), Similarity::DISJOINT);
}

#[test]
fn test_jaccard_ratio() {
    let sim = jaccard(&set(&["a", "b", "c"]), &set(&["b", "c", "d"]));
    assert_eq!(sim, Similarity { shared: 2, total: 4 });
    assert_eq!(sim.to_string(), "2/4");
}

#[test]
fn test_similarity_orders_by_value() {
    let half = Similarity { shared: 1, total: 2 };
    let two_quarters = Similarity { shared: 2, total: 4 };
    let third = Similarity { shared: 1, total: 3 };
    assert_eq!(half.cmp(&two_quarters), std::cmp::Ordering::Equal);
    assert!(third < half);
    assert!(Similarity::DISJOINT < third);
    assert!(half < Similarity::IDENTICAL);
}

#[test]
fn test_select_boundaries_picks_lowest() {
    let sets = [
        set(&["rust", "ownership"]),
        set(&["rust", "ownership", "borrowing"]),
        set(&["garden"]),
        set(&["garden", "soil"]),
        set(&["cooking"]),
    ];
    assert_eq!(select_boundaries(&sets, 2), vec![1]);
    assert_eq!(select_boundaries(&sets, 3), vec![1, 3]);
}

#[test]
fn test_select_boundaries_ties_keep_document_order() {
    let sets = [set(&["a"]), set(&["b"]), set(&["c"]), set(&["d"])];
    assert_eq!(select_boundaries(&sets, 2), vec![0]);
    assert_eq!(select_boundaries(&sets, 3), vec![0, 1]);
}

#[test]
fn test_select_boundaries_limits() {
    let sets = [set(&["a"]), set(&["b"])];
    assert!(select_boundaries(&sets, 1).is_empty());
    assert_eq!(select_boundaries(&sets, 5), vec![0]);
    assert!(select_boundaries(&sets[..1], 3).is_empty());
}

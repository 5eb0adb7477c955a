//! Highlight cycle property tests
//!
//! Drive `PageSearch` through the public API over random documents and check that
//! highlighting never changes the visible text and that markers follow document order.

use page_search::{ContentTree, DocumentTree, PageSearch};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

fn paragraph_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[abAB .]{1,24}").unwrap()
}

fn query_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[abAB.]{1,3}").unwrap()
}

fn build(paragraphs: &[String]) -> DocumentTree {
    let mut tree = DocumentTree::new();
    let root = tree.root();
    for text in paragraphs {
        let p = tree.append_element(root, "p").unwrap();
        tree.append_text(p, text).unwrap();
    }
    tree
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn close_restores_original_document(
        paragraphs in proptest::collection::vec(paragraph_strategy(), 1..6),
        queries in proptest::collection::vec(query_strategy(), 1..4)
    ) {
        let mut tree = build(&paragraphs);
        let root = tree.root();
        let markup = tree.to_markup(root);
        let text = tree.text_content(root);

        let mut search = PageSearch::default();
        search.open();
        for query in &queries {
            search.search_now(&mut tree, root, query);
            prop_assert_eq!(tree.text_content(root), text.clone());
            search.next(&mut tree);
        }
        let report = search.close(&mut tree);

        prop_assert!(report.is_complete());
        prop_assert_eq!(tree.to_markup(root), markup);
    }

    #[test]
    fn markers_cover_every_occurrence_in_order(
        paragraphs in proptest::collection::vec(paragraph_strategy(), 1..6),
        query in query_strategy()
    ) {
        let mut tree = build(&paragraphs);
        let root = tree.root();
        let needle = query.to_lowercase();
        let expected: usize = paragraphs
            .iter()
            .map(|p| p.to_lowercase().matches(needle.as_str()).count())
            .sum();

        let mut search = PageSearch::default();
        search.open();
        search.search_now(&mut tree, root, &query);

        prop_assert_eq!(search.total_matches(), expected);
        for (position, handle) in search.matches().iter().enumerate() {
            prop_assert_eq!(handle.index, position);
            prop_assert_eq!(handle.text.to_lowercase(), needle.clone());
            prop_assert_eq!(tree.text_content(handle.marker), handle.text.clone());
        }
        let expected_current = if expected == 0 { 0 } else { 1 };
        prop_assert_eq!(search.current_index(), expected_current);
    }

    #[test]
    fn navigation_stays_in_range(
        paragraphs in proptest::collection::vec(paragraph_strategy(), 1..4),
        query in query_strategy(),
        steps in proptest::collection::vec(any::<bool>(), 0..32)
    ) {
        let mut tree = build(&paragraphs);
        let root = tree.root();
        let mut search = PageSearch::default();
        search.open();
        search.search_now(&mut tree, root, &query);

        let total = search.total_matches();
        for forward in steps {
            let before = search.current_index();
            if forward {
                search.next(&mut tree);
            } else {
                search.previous(&mut tree);
            }
            let after = search.current_index();
            if total == 0 {
                prop_assert_eq!(after, 0);
            } else {
                prop_assert!((1..=total).contains(&after));
                let expected = if forward { before % total + 1 } else { (before + total - 2) % total + 1 };
                prop_assert_eq!(after, expected);
            }
        }
    }
}

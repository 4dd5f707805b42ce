//! Property-based tests for the catalog matcher and prompt builder.

use proptest::prelude::*;

use shopchat_core::catalog::Catalog;
use shopchat_core::{Role, build_prompt};

fn row_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zA-Z0-9]{1,10}", 5)
}

fn catalog_strategy() -> impl Strategy<Value = Catalog> {
    prop::collection::vec(row_strategy(), 1..12).prop_map(|rows| {
        let mut csv = String::from("product_id,name,description,category,price\n");
        for row in rows {
            csv.push_str(&row.join(","));
            csv.push('\n');
        }
        Catalog::parse(&csv).unwrap()
    })
}

fn texts(rows: &[&shopchat_core::CatalogRow]) -> Vec<String> {
    rows.iter().map(|r| r.search_text()).collect()
}

proptest! {
    #[test]
    fn match_respects_limit_and_is_never_empty(
        catalog in catalog_strategy(),
        query in "[a-zA-Z0-9 ]{0,6}",
        limit in 1usize..8,
    ) {
        let rows = catalog.find_relevant_rows(&query, limit);
        prop_assert!(rows.len() <= limit);
        prop_assert!(!rows.is_empty());
    }

    #[test]
    fn empty_query_returns_head(catalog in catalog_strategy(), limit in 1usize..8) {
        let rows = catalog.find_relevant_rows("", limit);
        prop_assert_eq!(texts(&rows), texts(&catalog.head(limit)));
    }

    #[test]
    fn unmatched_query_returns_head(catalog in catalog_strategy(), limit in 1usize..8) {
        // Generated values are alphanumeric, so this never occurs in any row.
        let rows = catalog.find_relevant_rows("#nomatch#", limit);
        prop_assert_eq!(texts(&rows), texts(&catalog.head(limit)));
    }

    #[test]
    fn matched_rows_contain_query(
        catalog in catalog_strategy(),
        query in "[a-zA-Z0-9]{1,3}",
        limit in 1usize..8,
    ) {
        let normalized = query.to_lowercase();
        let any_match = catalog.rows().iter().any(|r| r.search_text().contains(&normalized));
        let rows = catalog.find_relevant_rows(&query, limit);
        if any_match {
            for row in rows {
                prop_assert!(row.search_text().contains(&normalized));
            }
        }
    }

    #[test]
    fn prompt_has_two_messages_ending_with_question(
        catalog in catalog_strategy(),
        question in "\\PC{0,40}",
    ) {
        let rows = catalog.head(4);
        let messages = build_prompt(&rows, &question);
        prop_assert_eq!(messages.len(), 2);
        prop_assert_eq!(messages[0].role, Role::System);
        prop_assert_eq!(messages[1].role, Role::User);
        prop_assert!(messages[1].content.ends_with(&question));
    }
}

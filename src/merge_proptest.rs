//! Property-based tests for the table merge.
//!
//! These pin the merge laws (row accounting, idempotence, determinism and
//! the per-partition guarantees) over randomly generated tables.

#[cfg(test)]
mod proptest_tests {
    use std::collections::BTreeMap;

    use crate::merge::merge_rows;
    use crate::table::{normalize_value, Row, RowCollection};
    use proptest::prelude::*;

    const HEADER: [&str; 3] = ["key", "first", "second"];

    /// Tables with unique, already-normalized keys, in key order
    fn keyed_table() -> impl Strategy<Value = RowCollection> {
        prop::collection::btree_map("[a-f]{1,2}", ("[aAbB ]{0,2}", "[xX ]{0,2}"), 0..12).prop_map(
            |entries: BTreeMap<String, (String, String)>| {
                let rows = entries
                    .into_iter()
                    .map(|(key, (first, second))| Row::new([key, first, second]))
                    .collect();
                RowCollection::new(HEADER, rows)
            },
        )
    }

    /// Tables with arbitrary keys: duplicates, case variants, blanks, short rows
    fn loose_table() -> impl Strategy<Value = RowCollection> {
        prop::collection::vec(prop::collection::vec("[aAbB ]{0,2}", 0..4), 0..12).prop_map(
            |rows: Vec<Vec<String>>| RowCollection::new(HEADER, rows.into_iter().map(Row::new).collect()),
        )
    }

    fn find<'a>(table: &'a RowCollection, key: &str) -> Option<&'a Row> {
        table.rows().iter().find(|r| r.field(0) == Some(key))
    }

    fn normalized_equal(a: &Row, b: &Row) -> bool {
        a.len() == b.len()
            && a.fields()
                .iter()
                .zip(b.fields())
                .skip(1)
                .all(|(x, y)| normalize_value(x) == normalize_value(y))
    }

    proptest! {
        /// Property: merged row count always equals the sum of the counters
        #[test]
        fn row_count_invariant(existing in loose_table(), desired in loose_table()) {
            let result = merge_rows(Some(&existing), &desired, 0);
            prop_assert_eq!(
                result.total_rows(),
                result.new_rows + result.updated_rows + result.preserved_rows + result.custom_rows
            );
            prop_assert_eq!(result.outcomes.len(), result.total_rows());
        }

        /// Property: every installed row is either carried into the merge or
        /// counted as dropped
        #[test]
        fn existing_rows_are_accounted_for(existing in loose_table(), desired in loose_table()) {
            let result = merge_rows(Some(&existing), &desired, 0);
            prop_assert_eq!(
                existing.len(),
                result.custom_rows + result.updated_rows + result.preserved_rows + result.dropped_rows
            );
        }

        /// Property: merging the same inputs twice gives identical output
        #[test]
        fn merge_is_deterministic(existing in loose_table(), desired in loose_table()) {
            let first = merge_rows(Some(&existing), &desired, 0);
            let second = merge_rows(Some(&existing), &desired, 0);
            prop_assert_eq!(first, second);
        }

        /// Property: a table merged with itself is unchanged and fully "updated"
        #[test]
        fn merge_with_self_is_identity(desired in keyed_table()) {
            let result = merge_rows(Some(&desired), &desired, 0);
            prop_assert_eq!(&result.merged, &desired);
            prop_assert_eq!(result.updated_rows, desired.len());
            prop_assert_eq!(result.new_rows + result.preserved_rows + result.custom_rows, 0);
        }

        /// Property: user-only rows survive verbatim and are counted as custom
        #[test]
        fn custom_rows_are_preserved(existing in keyed_table(), desired in keyed_table()) {
            let result = merge_rows(Some(&existing), &desired, 0);
            let mut custom = 0;
            for row in existing.rows() {
                let key = row.field(0).unwrap_or_default();
                if find(&desired, key).is_none() {
                    custom += 1;
                    prop_assert_eq!(find(&result.merged, key), Some(row));
                }
            }
            prop_assert_eq!(result.custom_rows, custom);
        }

        /// Property: template-only rows are added verbatim and counted as new
        #[test]
        fn fresh_rows_are_added(existing in keyed_table(), desired in keyed_table()) {
            let result = merge_rows(Some(&existing), &desired, 0);
            let mut fresh = 0;
            for row in desired.rows() {
                let key = row.field(0).unwrap_or_default();
                if find(&existing, key).is_none() {
                    fresh += 1;
                    prop_assert_eq!(find(&result.merged, key), Some(row));
                }
            }
            prop_assert_eq!(result.new_rows, fresh);
        }

        /// Property: common rows take the template version unless the user
        /// changed a non-key field, in which case the installed row wins
        #[test]
        fn common_rows_follow_preserve_on_conflict(existing in keyed_table(), desired in keyed_table()) {
            let result = merge_rows(Some(&existing), &desired, 0);
            let (mut updated, mut preserved) = (0, 0);
            for old in existing.rows() {
                let key = old.field(0).unwrap_or_default();
                if let Some(new) = find(&desired, key) {
                    let merged = find(&result.merged, key);
                    if normalized_equal(old, new) {
                        updated += 1;
                        prop_assert_eq!(merged, Some(new));
                    } else {
                        preserved += 1;
                        prop_assert_eq!(merged, Some(old));
                    }
                }
            }
            prop_assert_eq!(result.updated_rows, updated);
            prop_assert_eq!(result.preserved_rows, preserved);
        }

        /// Property: the merged table keys are unique
        #[test]
        fn merged_keys_are_unique(existing in loose_table(), desired in loose_table()) {
            let result = merge_rows(Some(&existing), &desired, 0);
            let mut keys: Vec<_> = result.outcomes.iter().map(|o| o.key.clone()).collect();
            keys.sort();
            keys.dedup();
            prop_assert_eq!(keys.len(), result.total_rows());
        }
    }
}

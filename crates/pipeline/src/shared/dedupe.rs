use std::collections::HashSet;
use std::hash::Hash;

/// Keep exactly one row per distinct key: the first one seen in source
/// order. Output order follows input order, so the tie-break is stable and
/// the operation is idempotent.
pub fn dedupe_by_key<T, K, F>(rows: Vec<T>, mut key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: FnMut(&T) -> K,
{
    let mut seen = HashSet::new();
    rows.into_iter().filter(|row| seen.insert(key(row))).collect()
}

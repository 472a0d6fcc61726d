// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::borrow::Cow;

use crate::Patient;

/// Keeps the patients whose name contains `query`, ignoring case and the
/// query's surrounding whitespace. A blank query borrows `records` as is.
pub fn filter_by_name<'a>(records: &'a [Patient], query: &str) -> Cow<'a, [Patient]> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Cow::Borrowed(records);
    }

    Cow::Owned(
        records
            .iter()
            .filter(|patient| name_matches_query(&patient.name, &needle))
            .cloned()
            .collect(),
    )
}

fn name_matches_query(name: &str, needle: &str) -> bool {
    name.to_lowercase().contains(needle)
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::{Patient, SortColumn, SortDirection, parse_date};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSort {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl ActiveSort {
    pub const fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }
}

/// Sort state after a header click.
///
/// Only an ascending sort on the clicked column flips to descending. Anything
/// else, including a descending sort on the same column, starts ascending.
pub fn toggle_sort(current: Option<ActiveSort>, clicked: SortColumn) -> ActiveSort {
    let direction = match current {
        Some(ActiveSort {
            column,
            direction: SortDirection::Asc,
        }) if column == clicked => SortDirection::Desc,
        _ => SortDirection::Asc,
    };
    ActiveSort::new(clicked, direction)
}

pub const fn column_has_comparator(column: SortColumn) -> bool {
    !matches!(column, SortColumn::Surgeon | SortColumn::Provider)
}

/// Returns `records` reordered by `column`. Ties keep their input order.
pub fn sort_by(
    records: &[Patient],
    column: Option<SortColumn>,
    direction: SortDirection,
) -> Vec<Patient> {
    let mut sorted = records.to_vec();
    let Some(column) = column.filter(|column| column_has_comparator(*column)) else {
        return sorted;
    };

    sorted.sort_by(|left, right| {
        let ordering = compare_by_column(left, right, column);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    sorted
}

pub fn compare_by_column(left: &Patient, right: &Patient, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Name => locale_compare(&left.name, &right.name),
        SortColumn::StartDate => compare_dates(left.start_date(), right.start_date()),
        SortColumn::EndDate => compare_dates(left.completion_date(), right.completion_date()),
        SortColumn::Procedure => {
            compare_optional_text(left.surgery_procedure(), right.surgery_procedure())
        }
        SortColumn::Adherence => left
            .adherence_value
            .sort_value()
            .cmp(&right.adherence_value.sort_value()),
        SortColumn::Rom => left.rom_value.sort_value().cmp(&right.rom_value.sort_value()),
        SortColumn::Surgeon | SortColumn::Provider => Ordering::Equal,
    }
}

/// Collation-style comparison: base letters first, ignoring accents and case,
/// then accents, then lowercase ahead of uppercase.
pub fn locale_compare(left: &str, right: &str) -> Ordering {
    base_letters(left)
        .cmp(base_letters(right))
        .then_with(|| {
            left.chars()
                .flat_map(char::to_lowercase)
                .cmp(right.chars().flat_map(char::to_lowercase))
        })
        .then_with(|| case_order(left, right))
        .then_with(|| left.cmp(right))
}

fn base_letters(value: &str) -> impl Iterator<Item = char> + '_ {
    value
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
}

fn case_order(left: &str, right: &str) -> Ordering {
    for (l, r) in left.chars().zip(right.chars()) {
        if l == r {
            continue;
        }
        match (l.is_lowercase(), r.is_lowercase()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
    }
    Ordering::Equal
}

// Missing or unparseable dates order after every valid one.
fn compare_dates(left: Option<&str>, right: Option<&str>) -> Ordering {
    match (left.and_then(parse_date), right.and_then(parse_date)) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_optional_text(left: Option<&str>, right: Option<&str>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => locale_compare(left, right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::{ActiveSort, locale_compare, sort_by, toggle_sort};
    use crate::{CurrentProtocol, MetricPair, Patient, SortColumn, SortDirection};
    use std::cmp::Ordering;

    fn patient(id: &str, name: &str) -> Patient {
        Patient::new(id, name)
    }

    fn with_protocol(mut patient: Patient, start: &str, end: &str, procedure: &str) -> Patient {
        patient.current_protocol = Some(CurrentProtocol {
            start_date: start.to_owned(),
            completion_date: end.to_owned(),
            surgery_part: "Knee".to_owned(),
            surgery_procedure: procedure.to_owned(),
            ..CurrentProtocol::default()
        });
        patient
    }

    fn ids(records: &[Patient]) -> Vec<&str> {
        records.iter().map(|patient| patient.id.as_str()).collect()
    }

    fn sample() -> Vec<Patient> {
        let mut ada = with_protocol(
            patient("a", "Ada Park"),
            "2024-02-01T00:00:00Z",
            "2024-05-01",
            "REPLACEMENT",
        );
        ada.adherence_value = MetricPair::new("green", "82");
        ada.rom_value = MetricPair::new("green", "110");

        let mut bo = with_protocol(
            patient("b", "bo Lindqvist"),
            "2024-01-15T00:00:00Z",
            "2024-06-01",
            "arthroscopy",
        );
        bo.adherence_value = MetricPair::new("red", "N/A");
        bo.rom_value = MetricPair::new("red", "45");

        let mut cy = with_protocol(
            patient("c", "Cy Adams"),
            "2024-03-10T00:00:00Z",
            "2024-04-20",
            "Meniscectomy",
        );
        cy.adherence_value = MetricPair::new("orange", "40");
        cy.rom_value = MetricPair::new("gray", "N/A");

        vec![ada, bo, cy]
    }

    #[test]
    fn toggle_follows_header_click_sequence() {
        let name_asc = toggle_sort(None, SortColumn::Name);
        assert_eq!(name_asc, ActiveSort::new(SortColumn::Name, SortDirection::Asc));

        let name_desc = toggle_sort(Some(name_asc), SortColumn::Name);
        assert_eq!(name_desc, ActiveSort::new(SortColumn::Name, SortDirection::Desc));

        let name_asc_again = toggle_sort(Some(name_desc), SortColumn::Name);
        assert_eq!(name_asc_again, ActiveSort::new(SortColumn::Name, SortDirection::Asc));

        let start = toggle_sort(Some(name_asc_again), SortColumn::StartDate);
        assert_eq!(start, ActiveSort::new(SortColumn::StartDate, SortDirection::Asc));
    }

    #[test]
    fn switching_column_from_descending_starts_ascending() {
        let current = ActiveSort::new(SortColumn::Rom, SortDirection::Desc);
        assert_eq!(
            toggle_sort(Some(current), SortColumn::Adherence),
            ActiveSort::new(SortColumn::Adherence, SortDirection::Asc)
        );
    }

    #[test]
    fn not_available_adherence_counts_as_zero() {
        let mut missing = patient("na", "Missing");
        missing.adherence_value = MetricPair::new("red", "N/A");
        let mut half = patient("half", "Half");
        half.adherence_value = MetricPair::new("green", "50");

        let sorted = sort_by(&[half, missing], Some(SortColumn::Adherence), SortDirection::Asc);
        assert_eq!(ids(&sorted), vec!["na", "half"]);
    }

    #[test]
    fn each_column_orders_by_its_key() {
        let records = sample();
        let cases = [
            (SortColumn::Name, vec!["a", "b", "c"]),
            (SortColumn::StartDate, vec!["b", "a", "c"]),
            (SortColumn::EndDate, vec!["c", "a", "b"]),
            (SortColumn::Procedure, vec!["b", "c", "a"]),
            (SortColumn::Adherence, vec!["b", "c", "a"]),
            (SortColumn::Rom, vec!["c", "b", "a"]),
        ];
        for (column, expected) in cases {
            let sorted = sort_by(&records, Some(column), SortDirection::Asc);
            assert_eq!(ids(&sorted), expected, "ascending by {}", column.as_str());

            let descending = sort_by(&records, Some(column), SortDirection::Desc);
            let mut reversed = expected.clone();
            reversed.reverse();
            assert_eq!(ids(&descending), reversed, "descending by {}", column.as_str());
        }
    }

    #[test]
    fn sorting_is_a_permutation() {
        let records = sample();
        for column in SortColumn::ALL {
            for direction in [SortDirection::Asc, SortDirection::Desc] {
                let mut sorted = ids(&sort_by(&records, Some(column), direction))
                    .into_iter()
                    .map(str::to_owned)
                    .collect::<Vec<_>>();
                sorted.sort();
                assert_eq!(sorted, vec!["a", "b", "c"]);
            }
        }
    }

    #[test]
    fn unused_columns_and_no_column_keep_order() {
        let records = sample();
        for column in [None, Some(SortColumn::Surgeon), Some(SortColumn::Provider)] {
            let sorted = sort_by(&records, column, SortDirection::Desc);
            assert_eq!(ids(&sorted), vec!["a", "b", "c"]);
        }
    }

    #[test]
    fn invalid_and_missing_dates_sort_after_valid_ones() {
        let valid = with_protocol(patient("valid", "V"), "2024-01-01", "", "x");
        let garbage = with_protocol(patient("garbage", "G"), "someday", "", "x");
        let absent = patient("absent", "A");

        let records = vec![garbage, absent, valid];
        let ascending = sort_by(&records, Some(SortColumn::StartDate), SortDirection::Asc);
        assert_eq!(ids(&ascending), vec!["valid", "garbage", "absent"]);

        let descending = sort_by(&records, Some(SortColumn::StartDate), SortDirection::Desc);
        assert_eq!(ids(&descending), vec!["garbage", "absent", "valid"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let records = vec![patient("1", "Same"), patient("2", "same"), patient("3", "Same")];
        let sorted = sort_by(&records, Some(SortColumn::Adherence), SortDirection::Asc);
        assert_eq!(ids(&sorted), vec!["1", "2", "3"]);
    }

    #[test]
    fn locale_compare_folds_case_before_breaking_ties() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("Zoe", "adam"), Ordering::Greater);
        assert_eq!(locale_compare("ada", "Ada"), Ordering::Less);
        assert_eq!(locale_compare("Ada", "Ada"), Ordering::Equal);
        assert_eq!(locale_compare("Émile", "émile"), Ordering::Greater);
    }

    #[test]
    fn accented_names_sort_with_their_base_letter() {
        let records = vec![
            patient("z", "Zoe Reed"),
            patient("e", "Élodie Martin"),
            patient("m", "Emma Hill"),
            patient("o", "Ólafur Diaz"),
        ];
        let sorted = sort_by(&records, Some(SortColumn::Name), SortDirection::Asc);
        assert_eq!(ids(&sorted), vec!["e", "m", "o", "z"]);

        assert_eq!(locale_compare("resume", "résumé"), Ordering::Less);
        assert_eq!(locale_compare("résumé", "resumes"), Ordering::Less);
    }
}

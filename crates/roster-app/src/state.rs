// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;
use time::UtcOffset;
use tracing::debug;

use crate::{
    ActiveSort, ColumnDef, DisplayRow, Patient, PatientId, SortColumn, column_definitions,
    derive_row_in, filter_by_name, sort_by, toggle_sort,
};

/// Search text, sort state, row selection and the working record list behind
/// the table.
///
/// Selection is keyed by patient id so it survives filtering and sorting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientTable {
    all: Vec<Patient>,
    records: Vec<Patient>,
    sort: Option<ActiveSort>,
    search: String,
    selected: BTreeSet<PatientId>,
    offset: UtcOffset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableCommand {
    SearchChanged(String),
    ColumnHeaderClicked(SortColumn),
    SelectionToggled(PatientId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    RecordsFiltered { matched: usize, total: usize },
    SortApplied(ActiveSort),
    SelectionChanged {
        id: PatientId,
        selected: bool,
        count: usize,
    },
}

impl PatientTable {
    pub fn new(records: Vec<Patient>) -> Self {
        Self {
            records: records.clone(),
            all: records,
            sort: None,
            search: String::new(),
            selected: BTreeSet::new(),
            offset: UtcOffset::UTC,
        }
    }

    pub fn with_display_offset(mut self, offset: UtcOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn dispatch(&mut self, command: TableCommand) -> Vec<TableEvent> {
        match command {
            TableCommand::SearchChanged(query) => vec![self.set_search(&query)],
            TableCommand::ColumnHeaderClicked(column) => {
                vec![self.on_column_header_click(column)]
            }
            TableCommand::SelectionToggled(id) => self.toggle_selection(&id).into_iter().collect(),
        }
    }

    pub fn transition(mut self, command: TableCommand) -> Self {
        self.dispatch(command);
        self
    }

    /// Re-filters the full record set. The previous ordering is not reapplied.
    pub fn set_search(&mut self, query: &str) -> TableEvent {
        self.search = query.to_owned();
        self.records = filter_by_name(&self.all, query).into_owned();
        debug!(
            query_len = query.len(),
            matched = self.records.len(),
            total = self.all.len(),
            "search applied"
        );
        TableEvent::RecordsFiltered {
            matched: self.records.len(),
            total: self.all.len(),
        }
    }

    /// Toggles the sort for `column` and reorders the current records.
    pub fn on_column_header_click(&mut self, column: SortColumn) -> TableEvent {
        let next = toggle_sort(self.sort, column);
        self.records = sort_by(&self.records, Some(next.column), next.direction);
        self.sort = Some(next);
        debug!(
            column = next.column.as_str(),
            direction = next.direction.as_str(),
            rows = self.records.len(),
            "sort applied"
        );
        TableEvent::SortApplied(next)
    }

    /// Flips the checkbox for `id`. Ids not among the loaded records are ignored.
    pub fn toggle_selection(&mut self, id: &PatientId) -> Option<TableEvent> {
        if !self.all.iter().any(|patient| &patient.id == id) {
            return None;
        }
        let selected = if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.clone());
            true
        };
        debug!(id = %id, selected, count = self.selected.len(), "selection toggled");
        Some(TableEvent::SelectionChanged {
            id: id.clone(),
            selected,
            count: self.selected.len(),
        })
    }

    pub fn display_rows(&self) -> Vec<DisplayRow> {
        self.records
            .iter()
            .map(|patient| {
                let mut row = derive_row_in(patient, self.offset);
                row.selected = self.selected.contains(&patient.id);
                row
            })
            .collect()
    }

    pub fn selected_ids(&self) -> &BTreeSet<PatientId> {
        &self.selected
    }

    pub fn columns(&self) -> Vec<ColumnDef> {
        column_definitions(self.sort)
    }

    pub fn records(&self) -> &[Patient] {
        &self.records
    }

    pub fn all_records(&self) -> &[Patient] {
        &self.all
    }

    pub fn sort(&self) -> Option<ActiveSort> {
        self.sort
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn display_offset(&self) -> UtcOffset {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::{PatientTable, TableCommand, TableEvent};
    use crate::{ActiveSort, MetricPair, Patient, SortColumn, SortDirection, SortIndicator};

    fn roster() -> Vec<Patient> {
        [("c", "Cy Adams", "40"), ("a", "Ada Park", "82"), ("b", "Bo Lindqvist", "N/A")]
            .iter()
            .map(|(id, name, adherence)| {
                let mut patient = Patient::new(*id, *name);
                patient.adherence_value = MetricPair::new("green", *adherence);
                patient
            })
            .collect()
    }

    fn ids(table: &PatientTable) -> Vec<&str> {
        table
            .records()
            .iter()
            .map(|patient| patient.id.as_str())
            .collect()
    }

    #[test]
    fn header_clicks_toggle_and_reorder() {
        let mut table = PatientTable::new(roster());
        assert_eq!(table.sort(), None);

        let events = table.dispatch(TableCommand::ColumnHeaderClicked(SortColumn::Name));
        let name_asc = ActiveSort::new(SortColumn::Name, SortDirection::Asc);
        assert_eq!(events, vec![TableEvent::SortApplied(name_asc)]);
        assert_eq!(ids(&table), vec!["a", "b", "c"]);

        table.dispatch(TableCommand::ColumnHeaderClicked(SortColumn::Name));
        assert_eq!(
            table.sort(),
            Some(ActiveSort::new(SortColumn::Name, SortDirection::Desc))
        );
        assert_eq!(ids(&table), vec!["c", "b", "a"]);

        table.dispatch(TableCommand::ColumnHeaderClicked(SortColumn::Name));
        assert_eq!(table.sort(), Some(name_asc));

        table.dispatch(TableCommand::ColumnHeaderClicked(SortColumn::StartDate));
        assert_eq!(
            table.sort(),
            Some(ActiveSort::new(SortColumn::StartDate, SortDirection::Asc))
        );
    }

    #[test]
    fn search_keeps_sort_state_but_restores_loaded_order() {
        let mut table = PatientTable::new(roster());
        table.dispatch(TableCommand::ColumnHeaderClicked(SortColumn::Name));

        let events = table.dispatch(TableCommand::SearchChanged("a".to_owned()));
        assert_eq!(
            events,
            vec![TableEvent::RecordsFiltered {
                matched: 2,
                total: 3
            }]
        );
        assert_eq!(ids(&table), vec!["c", "a"]);
        assert_eq!(
            table.sort(),
            Some(ActiveSort::new(SortColumn::Name, SortDirection::Asc))
        );
        assert_eq!(table.search(), "a");
    }

    #[test]
    fn header_click_sorts_the_filtered_records() {
        let table = PatientTable::new(roster())
            .transition(TableCommand::SearchChanged("a".to_owned()))
            .transition(TableCommand::ColumnHeaderClicked(SortColumn::Adherence));
        assert_eq!(ids(&table), vec!["c", "a"]);

        let table = table.transition(TableCommand::ColumnHeaderClicked(SortColumn::Adherence));
        assert_eq!(ids(&table), vec!["a", "c"]);
    }

    #[test]
    fn clearing_search_restores_everything() {
        let mut table = PatientTable::new(roster());
        table.set_search("zzz");
        assert!(table.records().is_empty());
        assert!(table.display_rows().is_empty());

        table.set_search("   ");
        assert_eq!(table.records(), table.all_records());
    }

    #[test]
    fn display_rows_follow_record_order() {
        let mut table = PatientTable::new(roster());
        table.on_column_header_click(SortColumn::Adherence);
        let names = table
            .display_rows()
            .into_iter()
            .map(|row| row.name.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Bo Lindqvist", "Cy Adams", "Ada Park"]);
    }

    #[test]
    fn columns_reflect_current_sort() {
        let mut table = PatientTable::new(roster());
        table.on_column_header_click(SortColumn::Rom);
        let rom = table
            .columns()
            .into_iter()
            .find(|column| column.sort_column == Some(SortColumn::Rom))
            .expect("rom column present");
        assert_eq!(rom.indicator, SortIndicator::Ascending);
    }

    #[test]
    fn selection_survives_search_and_sort() {
        let mut table = PatientTable::new(roster());
        let events = table.dispatch(TableCommand::SelectionToggled("a".into()));
        assert_eq!(
            events,
            vec![TableEvent::SelectionChanged {
                id: "a".into(),
                selected: true,
                count: 1
            }]
        );

        table.set_search("bo");
        assert!(table.display_rows().iter().all(|row| !row.selected));

        table.set_search("");
        table.on_column_header_click(SortColumn::Name);
        let selected = table
            .display_rows()
            .into_iter()
            .filter(|row| row.selected)
            .map(|row| row.id.as_str().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(selected, vec!["a"]);
    }

    #[test]
    fn toggling_twice_clears_and_unknown_ids_are_ignored() {
        let mut table = PatientTable::new(roster());
        table.toggle_selection(&"c".into());
        let cleared = table.toggle_selection(&"c".into());
        assert_eq!(
            cleared,
            Some(TableEvent::SelectionChanged {
                id: "c".into(),
                selected: false,
                count: 0
            })
        );
        assert!(table.selected_ids().is_empty());

        assert!(
            table
                .dispatch(TableCommand::SelectionToggled("ghost".into()))
                .is_empty()
        );
    }

    #[test]
    fn transition_matches_dispatch() {
        let mut dispatched = PatientTable::new(roster());
        dispatched.dispatch(TableCommand::ColumnHeaderClicked(SortColumn::Name));
        let transitioned =
            PatientTable::new(roster()).transition(TableCommand::ColumnHeaderClicked(SortColumn::Name));
        assert_eq!(dispatched, transitioned);
    }
}

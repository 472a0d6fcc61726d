// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::{ActiveSort, SortColumn, SortDirection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnId {
    Select,
    Name,
    StartDate,
    EndDate,
    Procedure,
    Adherence,
    Rom,
}

impl ColumnId {
    pub const ALL: [Self; 7] = [
        Self::Select,
        Self::Name,
        Self::StartDate,
        Self::EndDate,
        Self::Procedure,
        Self::Adherence,
        Self::Rom,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Select => "",
            Self::Name => "Name",
            Self::StartDate => "Start Date",
            Self::EndDate => "End Date",
            Self::Procedure => "Procedure",
            Self::Adherence => "Adherence",
            Self::Rom => "ROM",
        }
    }

    /// Column a header click sorts by. The selection column is not sortable.
    pub const fn sort_column(self) -> Option<SortColumn> {
        match self {
            Self::Select => None,
            Self::Name => Some(SortColumn::Name),
            Self::StartDate => Some(SortColumn::StartDate),
            Self::EndDate => Some(SortColumn::EndDate),
            Self::Procedure => Some(SortColumn::Procedure),
            Self::Adherence => Some(SortColumn::Adherence),
            Self::Rom => Some(SortColumn::Rom),
        }
    }

    // Terminal cells.
    const fn width_hint(self) -> (Option<u16>, Option<u16>) {
        match self {
            Self::Select => (Some(3), None),
            Self::Name => (None, Some(24)),
            Self::StartDate | Self::EndDate | Self::Procedure | Self::Adherence | Self::Rom => {
                (None, Some(12))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortIndicator {
    Inactive,
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    pub id: ColumnId,
    pub label: &'static str,
    pub width: Option<u16>,
    pub min_width: Option<u16>,
    pub sort_column: Option<SortColumn>,
    pub indicator: SortIndicator,
}

impl ColumnDef {
    pub const fn is_sortable(&self) -> bool {
        self.sort_column.is_some()
    }
}

pub fn column_definitions(sort: Option<ActiveSort>) -> Vec<ColumnDef> {
    ColumnId::ALL
        .iter()
        .map(|id| {
            let (width, min_width) = id.width_hint();
            let sort_column = id.sort_column();
            ColumnDef {
                id: *id,
                label: id.label(),
                width,
                min_width,
                sort_column,
                indicator: indicator_for(sort, sort_column),
            }
        })
        .collect()
}

fn indicator_for(sort: Option<ActiveSort>, column: Option<SortColumn>) -> SortIndicator {
    match (sort, column) {
        (Some(active), Some(column)) if active.column == column => match active.direction {
            SortDirection::Asc => SortIndicator::Ascending,
            SortDirection::Desc => SortIndicator::Descending,
        },
        _ => SortIndicator::Inactive,
    }
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::UtcOffset;

use crate::{MetricPair, NOT_AVAILABLE, Patient, PatientId, PatientState, format_date_in};

pub const NO_LOGIN: &str = "No login";
const LAST_LOGIN_PREFIX: &str = "Last login at: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BadgeColor {
    Green,
    Pink,
    Orange,
    Gray,
}

impl BadgeColor {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Pink => "pink",
            Self::Orange => "orange",
            Self::Gray => "gray",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub label: &'static str,
    pub color: BadgeColor,
}

pub const fn status_badge(state: PatientState) -> StatusBadge {
    match state {
        PatientState::Completed => StatusBadge {
            label: "Completed",
            color: BadgeColor::Green,
        },
        PatientState::Onboarded => StatusBadge {
            label: "Onboarded",
            color: BadgeColor::Pink,
        },
        PatientState::Created | PatientState::Registered => StatusBadge {
            label: "Invited",
            color: BadgeColor::Orange,
        },
        PatientState::Inactive => StatusBadge {
            label: "Inactive",
            color: BadgeColor::Gray,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameCell {
    pub name: String,
    pub badge: Option<StatusBadge>,
    pub last_login: String,
}

/// A metric rendered from a stored `(color, value)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCell {
    pub color: String,
    pub value: String,
    /// Bar fill in percent; `None` when the value is not numeric.
    pub percent: Option<u8>,
}

impl MetricCell {
    pub fn from_pair(pair: &MetricPair) -> Self {
        Self {
            color: pair.color.clone(),
            value: pair.value.clone(),
            percent: pair
                .numeric_value()
                .map(|value| u8::try_from(value.clamp(0, 100)).unwrap_or(100)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub id: PatientId,
    pub selected: bool,
    pub name: NameCell,
    pub start_date: String,
    pub end_date: String,
    pub procedure: String,
    pub adherence: MetricCell,
    pub rom: MetricCell,
}

pub fn derive_row(patient: &Patient) -> DisplayRow {
    derive_row_in(patient, UtcOffset::UTC)
}

pub fn derive_row_in(patient: &Patient, offset: UtcOffset) -> DisplayRow {
    DisplayRow {
        id: patient.id.clone(),
        selected: false,
        name: NameCell {
            name: patient.name.clone(),
            badge: patient.lifecycle().map(status_badge),
            last_login: last_login_line(patient.last_login.as_deref(), offset),
        },
        start_date: patient
            .start_date()
            .map(|raw| format_date_in(raw, false, offset))
            .unwrap_or_default(),
        end_date: patient
            .completion_date()
            .map(|raw| format_date_in(raw, false, offset))
            .unwrap_or_default(),
        procedure: procedure_label(patient),
        adherence: MetricCell::from_pair(&patient.adherence_value),
        // The ROM cell shows the adherence pair; rom_value only drives sorting.
        rom: MetricCell::from_pair(&patient.adherence_value),
    }
}

pub fn procedure_label(patient: &Patient) -> String {
    match (patient.surgery_part(), patient.surgery_procedure()) {
        (Some(part), Some(procedure)) => format!("{part}: {}", procedure.to_lowercase()),
        _ => NOT_AVAILABLE.to_owned(),
    }
}

fn last_login_line(last_login: Option<&str>, offset: UtcOffset) -> String {
    let formatted = last_login
        .map(|raw| format_date_in(raw, true, offset))
        .unwrap_or_default();
    if formatted.is_empty() {
        return NO_LOGIN.to_owned();
    }
    format!("{LAST_LOGIN_PREFIX}{formatted}")
}

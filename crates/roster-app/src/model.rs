// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::ids::*;

pub const NOT_AVAILABLE: &str = "N/A";
pub const DEFAULT_METRIC_COLOR: &str = "gray";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatientState {
    Created,
    Registered,
    Onboarded,
    Completed,
    Inactive,
}

impl PatientState {
    pub const ALL: [Self; 5] = [
        Self::Created,
        Self::Registered,
        Self::Onboarded,
        Self::Completed,
        Self::Inactive,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Registered => "REGISTERED",
            Self::Onboarded => "ONBOARDED",
            Self::Completed => "COMPLETED",
            Self::Inactive => "INACTIVE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "CREATED" => Some(Self::Created),
            "REGISTERED" => Some(Self::Registered),
            "ONBOARDED" => Some(Self::Onboarded),
            "COMPLETED" => Some(Self::Completed),
            "INACTIVE" => Some(Self::Inactive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortColumn {
    Name,
    StartDate,
    EndDate,
    Procedure,
    Surgeon,
    Provider,
    Adherence,
    Rom,
}

impl SortColumn {
    pub const ALL: [Self; 8] = [
        Self::Name,
        Self::StartDate,
        Self::EndDate,
        Self::Procedure,
        Self::Surgeon,
        Self::Provider,
        Self::Adherence,
        Self::Rom,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::StartDate => "start_date",
            Self::EndDate => "end_date",
            Self::Procedure => "procedure",
            Self::Surgeon => "surgeon",
            Self::Provider => "provider",
            Self::Adherence => "adherence",
            Self::Rom => "rom",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Some(Self::Name),
            "start_date" | "start-date" | "start" => Some(Self::StartDate),
            "end_date" | "end-date" | "end" => Some(Self::EndDate),
            "procedure" => Some(Self::Procedure),
            "surgeon" => Some(Self::Surgeon),
            "provider" => Some(Self::Provider),
            "adherence" => Some(Self::Adherence),
            "rom" => Some(Self::Rom),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "up" => Some(Self::Asc),
            "desc" | "down" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// A precomputed `(color token, value)` pair as stored on the patient document.
///
/// The value is either the literal `"N/A"` or a base-10 integer string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct MetricPair {
    pub color: String,
    pub value: String,
}

impl MetricPair {
    pub fn new(color: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            value: value.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.value != NOT_AVAILABLE
    }

    /// Leading integer of the value, or `None` for `"N/A"` and non-numeric text.
    pub fn numeric_value(&self) -> Option<i64> {
        if !self.is_available() {
            return None;
        }
        parse_leading_integer(&self.value)
    }

    pub fn sort_value(&self) -> i64 {
        self.numeric_value().unwrap_or(0)
    }
}

impl Default for MetricPair {
    fn default() -> Self {
        Self::new(DEFAULT_METRIC_COLOR, NOT_AVAILABLE)
    }
}

impl From<Vec<String>> for MetricPair {
    fn from(values: Vec<String>) -> Self {
        let mut values = values.into_iter();
        let color = values
            .next()
            .filter(|color| !color.is_empty())
            .unwrap_or_else(|| DEFAULT_METRIC_COLOR.to_owned());
        let value = values.next().unwrap_or_else(|| NOT_AVAILABLE.to_owned());
        Self { color, value }
    }
}

impl From<MetricPair> for Vec<String> {
    fn from(pair: MetricPair) -> Self {
        vec![pair.color, pair.value]
    }
}

fn parse_leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_digit())
        .map_or(digits.len(), |(index, _)| index);
    digits[..end].parse::<i64>().ok().map(|value| sign * value)
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    #[serde(rename = "_id", default)]
    pub id: ProviderId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RomGoal {
    pub week: i64,
    pub goal: i64,
    #[serde(rename = "_id", default)]
    pub id: GoalId,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdherenceGoals {
    pub warning_level: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrentProtocol {
    pub code: String,
    pub start_date: String,
    pub completion_date: String,
    pub surgery_part: String,
    pub surgery_procedure: String,
    pub surgery_side: String,
    pub surgery_type: String,
    #[serde(rename = "ROMGoals")]
    pub rom_goals: Vec<RomGoal>,
    pub adherence_goals: Option<AdherenceGoals>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(rename = "_id")]
    pub id: PatientId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub provider: Option<Provider>,
    #[serde(default)]
    pub date_of_surgery: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
    #[serde(default)]
    pub onboarded_at: Option<String>,
    #[serde(default)]
    pub duration_type: Option<String>,
    #[serde(default)]
    pub current_protocol: Option<CurrentProtocol>,
    #[serde(default)]
    pub adherence_value: MetricPair,
    #[serde(default)]
    pub rom_value: MetricPair,
}

impl Patient {
    pub fn new(id: impl Into<PatientId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: String::new(),
            state: String::new(),
            provider: None,
            date_of_surgery: None,
            created_at: None,
            updated_at: None,
            last_login: None,
            onboarded_at: None,
            duration_type: None,
            current_protocol: None,
            adherence_value: MetricPair::default(),
            rom_value: MetricPair::default(),
        }
    }

    pub fn lifecycle(&self) -> Option<PatientState> {
        PatientState::parse(&self.state)
    }

    pub fn start_date(&self) -> Option<&str> {
        self.current_protocol
            .as_ref()
            .map(|protocol| protocol.start_date.as_str())
            .filter(|value| !value.is_empty())
    }

    pub fn completion_date(&self) -> Option<&str> {
        self.current_protocol
            .as_ref()
            .map(|protocol| protocol.completion_date.as_str())
            .filter(|value| !value.is_empty())
    }

    pub fn surgery_part(&self) -> Option<&str> {
        self.current_protocol
            .as_ref()
            .map(|protocol| protocol.surgery_part.as_str())
            .filter(|value| !value.is_empty())
    }

    pub fn surgery_procedure(&self) -> Option<&str> {
        self.current_protocol
            .as_ref()
            .map(|protocol| protocol.surgery_procedure.as_str())
            .filter(|value| !value.is_empty())
    }
}

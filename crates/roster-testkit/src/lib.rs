// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use roster_app::{CurrentProtocol, MetricPair, NOT_AVAILABLE, Patient, PatientState, Provider, RomGoal};
use std::fs;
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use time::{Date, Duration, Month, OffsetDateTime};

const REFERENCE_YEAR: i32 = 2024;
pub const DEMO_PATIENT_COUNT: usize = 37;

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];

const SURGERIES: [(&str, &str, &str); 8] = [
    ("Knee", "TOTAL_KNEE_REPLACEMENT", "TKA"),
    ("Knee", "ACL_RECONSTRUCTION", "ACL"),
    ("Knee", "MENISCECTOMY", "MEN"),
    ("Hip", "TOTAL_HIP_REPLACEMENT", "THA"),
    ("Hip", "ARTHROSCOPY", "HAS"),
    ("Shoulder", "ROTATOR_CUFF_REPAIR", "RCR"),
    ("Shoulder", "LABRAL_REPAIR", "LAB"),
    ("Ankle", "ACHILLES_REPAIR", "ACH"),
];

const SIDES: [&str; 2] = ["LEFT", "RIGHT"];
const ORGANIZATIONS: [&str; 4] = [
    "Lakeside Orthopedics",
    "Summit Sports Medicine",
    "Riverside Health",
    "Heritage Clinic",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn chance(&mut self, percent: usize) -> bool {
        self.int_n(100) < percent
    }
}

/// Generates plausible patient documents from a seed.
#[derive(Debug, Clone)]
pub struct PatientFaker {
    rng: DeterministicRng,
    next_id: u64,
}

impl PatientFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_id: 1,
        }
    }

    pub fn patients(&mut self, count: usize) -> Vec<Patient> {
        (0..count).map(|_| self.patient()).collect()
    }

    pub fn patient(&mut self) -> Patient {
        let id = format!("patient-{:04}", self.next_id);
        self.next_id += 1;

        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        let state = self.pick(&PatientState::ALL);

        let mut patient = Patient::new(id, format!("{first} {last}"));
        patient.email = format!(
            "{}.{}@example-patient.com",
            first.to_ascii_lowercase(),
            last.to_ascii_lowercase()
        );
        patient.state = state.as_str().to_owned();
        patient.provider = Some(self.provider());

        let start = self.day_in_year(REFERENCE_YEAR);
        let weeks = 6 + self.rng.int_n(10);
        let completion = start + Duration::weeks(weeks as i64);
        patient.date_of_surgery = Some(rfc3339(start - Duration::days(2)));
        patient.created_at = Some(rfc3339(start - Duration::days(9)));
        patient.updated_at = Some(rfc3339(start + Duration::days(3)));

        if !matches!(state, PatientState::Created | PatientState::Registered) {
            let minutes = self.rng.int_n(24 * 60) as i64;
            let login = start + Duration::days(self.rng.int_n(40) as i64) + Duration::minutes(minutes);
            patient.last_login = Some(rfc3339(login));
            patient.onboarded_at = Some(rfc3339(start));
        }

        if self.rng.chance(92) {
            patient.current_protocol = Some(self.protocol(start, completion));
        }

        patient.adherence_value = self.metric(85);
        patient.rom_value = self.metric(75);
        patient
    }

    fn provider(&mut self) -> Provider {
        let last = self.pick(&LAST_NAMES);
        Provider {
            id: format!("provider-{}", last.to_ascii_lowercase()).into(),
            name: format!("Dr. {last}"),
            email: format!("{}@example-clinic.com", last.to_ascii_lowercase()),
            organization: self.pick(&ORGANIZATIONS).to_owned(),
            category: "SURGEON".to_owned(),
        }
    }

    fn protocol(&mut self, start: OffsetDateTime, completion: OffsetDateTime) -> CurrentProtocol {
        let (part, procedure, code) = self.pick(&SURGERIES);
        let rom_goals = (1..=3)
            .map(|index| RomGoal {
                week: index * 2,
                goal: 60 + index * 15,
                id: format!("{code}-goal-{index}").into(),
                code: Some(code.to_owned()),
            })
            .collect();

        CurrentProtocol {
            code: code.to_owned(),
            start_date: rfc3339(start),
            completion_date: rfc3339(completion),
            surgery_part: part.to_owned(),
            surgery_procedure: procedure.to_owned(),
            surgery_side: self.pick(&SIDES).to_owned(),
            surgery_type: "POST_OP".to_owned(),
            rom_goals,
            adherence_goals: None,
        }
    }

    fn metric(&mut self, available_percent: usize) -> MetricPair {
        if !self.rng.chance(available_percent) {
            return MetricPair::new("gray", NOT_AVAILABLE);
        }
        let value = self.rng.int_n(101);
        let color = match value {
            0..=39 => "red",
            40..=69 => "orange",
            _ => "green",
        };
        MetricPair::new(color, value.to_string())
    }

    fn day_in_year(&mut self, year: i32) -> OffsetDateTime {
        let day_offset = self.rng.int_n(330) as i64;
        midnight_utc(year, Month::January, 1) + Duration::days(day_offset)
    }

    fn pick<T: Copy>(&mut self, values: &[T]) -> T {
        values[self.rng.int_n(values.len())]
    }
}

/// The data set shown by `--demo`.
pub fn demo_patients() -> Vec<Patient> {
    PatientFaker::new(7).patients(DEMO_PATIENT_COUNT)
}

pub fn sample_patient(id: &str, name: &str) -> Patient {
    let mut patient = Patient::new(id, name);
    patient.state = PatientState::Onboarded.as_str().to_owned();
    patient.current_protocol = Some(CurrentProtocol {
        start_date: fixture_datetime().to_owned(),
        completion_date: "2024-05-01T00:00:00Z".to_owned(),
        surgery_part: "Knee".to_owned(),
        surgery_procedure: "REPLACEMENT".to_owned(),
        ..CurrentProtocol::default()
    });
    patient.adherence_value = MetricPair::new("green", "50");
    patient.rom_value = MetricPair::new("orange", "90");
    patient
}

pub fn fixture_datetime() -> &'static str {
    "2024-03-05T00:00:00Z"
}

pub fn temp_patients_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("patients.json");
    Ok((dir, path))
}

pub fn write_patients(path: &Path, patients: &[Patient]) -> Result<()> {
    let raw = serde_json::to_string_pretty(patients).context("encode patients")?;
    fs::write(path, raw).with_context(|| format!("write patients {}", path.display()))
}

fn rfc3339(value: OffsetDateTime) -> String {
    value.format(&Rfc3339).unwrap_or_default()
}

fn midnight_utc(year: i32, month: Month, day: u8) -> OffsetDateTime {
    let date = Date::from_calendar_date(year, month, day).expect("valid calendar date");
    date.midnight().assume_utc()
}

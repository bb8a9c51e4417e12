//! Flavor text keyed by elapsed hours: the overall metabolic mode and a
//! status line per organ. These lookups share the phase resolver's input but
//! nothing else.

use serde::Serialize;

use super::normalize_hours;

/// `(exclusive upper bound in hours, label, detail)`; the last row of every
/// table is unbounded.
type Band = (f64, &'static str, &'static str);

const OPEN: f64 = f64::INFINITY;

const MODES: &[Band] = &[
    (4.0, "Anabolic / Storage", "Body is digesting and storing energy."),
    (12.0, "Catabolic / Switching", "Switching from food to stored liver glycogen."),
    (18.0, "Fat Adaptation", "Burning visceral fat & triglycerides."),
    (30.0, "Deep Ketosis", "Brain running on ketones. Max fat oxidation."),
    (OPEN, "Deep Repair / Autophagy", "Cellular recycling and immune system reset."),
];

const LIVER: &[Band] = &[
    (3.0, "Insulin Peak", "Energy storage active."),
    (4.0, "Storage Mode", "Goal: Exit this state for Hepatomegaly."),
    (8.0, "Glycogen Tap", "Unpacking stored liver sugar."),
    (18.0, "Visceral Burn", "Mobilizing liver fat specifically (De-fatting)."),
    (30.0, "Max Oxidation", "Burning Triglycerides (180 mg/dL target)."),
    (OPEN, "Deep Detox", "Clearing excess lipids. Prep for low-fat refeed."),
];

const KIDNEYS: &[Band] = &[
    (5.0, "Prep", "Prepare to flush."),
    (8.0, "Uric Prep", "Hydrate before Ketones rise (7.29mg/dL risk)."),
    (13.0, "Sediment Flush", "300ml Water + Salt recommended."),
    (30.0, "Acid Watch", "Flushing acid. Watch for toe pain."),
    (OPEN, "Max Flush", "High water intake. Prevent Gout."),
];

const BRAIN: &[Band] = &[
    (11.0, "Transition", "Fed state to early fasting."),
    (12.0, "Low Battery", "Fatigue warning (Switching fuels)."),
    (19.0, "Adapting", "Ketones rising. Fog clearing."),
    (OPEN, "High Clarity", "Ketones active. No brain fog."),
];

const IMMUNE: &[Band] = &[
    (15.0, "Baseline", "Standard defense."),
    (17.0, "Anti-Inflam", "Helpful for Asthma (J45)."),
    (24.0, "Autophagy", "Recycling damaged proteins."),
    (OPEN, "Peak Repair", "Max cellular renewal."),
];

const MUSCLE: &[Band] = &[
    (9.0, "Fed", "Using stored glycogen."),
    (12.0, "HGH Rise", "Preserving mass."),
    (26.0, "Conserving", "HGH elevated."),
    (OPEN, "HGH Peak", "Max protection & repair."),
];

fn band(table: &'static [Band], hours: f64) -> &'static Band {
    let hours = normalize_hours(hours);
    table
        .iter()
        .find(|(upper, _, _)| hours < *upper)
        .unwrap_or(&table[table.len() - 1])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetabolicMode {
    pub mode: &'static str,
    pub description: &'static str,
}

pub fn metabolic_mode(elapsed_hours: f64) -> MetabolicMode {
    let (_, mode, description) = *band(MODES, elapsed_hours);
    MetabolicMode { mode, description }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Organ {
    Liver,
    Kidneys,
    Brain,
    Immune,
    Muscle,
}

impl Organ {
    pub const ALL: [Organ; 5] = [
        Organ::Liver,
        Organ::Kidneys,
        Organ::Brain,
        Organ::Immune,
        Organ::Muscle,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Organ::Liver => "Liver",
            Organ::Kidneys => "Kidneys",
            Organ::Brain => "Brain",
            Organ::Immune => "Immune",
            Organ::Muscle => "Muscle",
        }
    }

    fn bands(&self) -> &'static [Band] {
        match self {
            Organ::Liver => LIVER,
            Organ::Kidneys => KIDNEYS,
            Organ::Brain => BRAIN,
            Organ::Immune => IMMUNE,
            Organ::Muscle => MUSCLE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrganState {
    pub organ: Organ,
    pub status: &'static str,
    pub detail: &'static str,
}

pub fn organ_state(organ: Organ, elapsed_hours: f64) -> OrganState {
    let (_, status, detail) = *band(organ.bands(), elapsed_hours);
    OrganState {
        organ,
        status,
        detail,
    }
}

pub fn organ_states(elapsed_hours: f64) -> [OrganState; 5] {
    Organ::ALL.map(|organ| organ_state(organ, elapsed_hours))
}

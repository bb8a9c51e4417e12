//! Milestones: hour-stamped events along the fasting timeline.
//!
//! The table is sorted ascending by `hour`, so both lookups are a single
//! `partition_point` over it.

use serde::Serialize;

use super::normalize_hours;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub hour: f64,
    pub phase_id: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub benefit: &'static str,
}

pub static MILESTONES: &[Milestone] = &[
    Milestone {
        hour: 0.5,
        phase_id: 1,
        title: "Digestion Begins",
        description: "Body processes intake.",
        benefit: "Start of metabolic clock.",
    },
    Milestone {
        hour: 2.0,
        phase_id: 1,
        title: "Insulin Peak",
        description: "Blood sugar peaks. Energy storage active.",
        benefit: "Fuel for immediate needs.",
    },
    Milestone {
        hour: 3.0,
        phase_id: 1,
        title: "Liver Storage Mode",
        description: "Liver storing energy. Goal: Exit this state quickly.",
        benefit: "Identifying the enemy of Hepatomegaly.",
    },
    Milestone {
        hour: 4.0,
        phase_id: 1,
        title: "Insulin Drops",
        description: "Signal to store fat stops.",
        benefit: "First victory for Grade 2 Fatty Liver.",
    },
    Milestone {
        hour: 5.0,
        phase_id: 1,
        title: "Hydration Check 1 💧",
        description: "300ml Water. PREVENT STONE RISK.",
        benefit: "Flush renal pelvis sediment.",
    },
    Milestone {
        hour: 6.0,
        phase_id: 1,
        title: "Glycogen Access",
        description: "Unpacking stored liver sugar.",
        benefit: "Shift from food to stored energy.",
    },
    Milestone {
        hour: 7.0,
        phase_id: 1,
        title: "Uric Acid Prep",
        description: "Pre-emptive hydration.",
        benefit: "Filter Uric Acid (7.29mg/dL) before ketones rise.",
    },
    Milestone {
        hour: 8.0,
        phase_id: 1,
        title: "End Phase 1",
        description: "Insulin baseline reached.",
        benefit: "Ready for fat attack.",
    },
    Milestone {
        hour: 9.0,
        phase_id: 2,
        title: "HGH Rise",
        description: "Growth hormone increases.",
        benefit: "Muscle preservation begins.",
    },
    Milestone {
        hour: 10.0,
        phase_id: 2,
        title: "Triglyceride Attack",
        description: "Clearing excess lipids.",
        benefit: "Directly targets high Triglycerides (180 mg/dL).",
    },
    Milestone {
        hour: 11.0,
        phase_id: 2,
        title: "Fatigue Warning",
        description: "Possible 'low battery' feeling.",
        benefit: "Sign of switching to fat burning.",
    },
    Milestone {
        hour: 12.0,
        phase_id: 2,
        title: "Metabolic Switch",
        description: "Official shift to fat burning.",
        benefit: "Using stored energy.",
    },
    Milestone {
        hour: 13.0,
        phase_id: 2,
        title: "Hydration Check 2 💧",
        description: "300ml Water + PINCH OF SALT.",
        benefit: "Electrolytes crucial to assist kidneys.",
    },
    Milestone {
        hour: 14.0,
        phase_id: 2,
        title: "Ketone Production",
        description: "Liver converts fatty acids to ketones.",
        benefit: "Alternative brain fuel source.",
    },
    Milestone {
        hour: 15.0,
        phase_id: 2,
        title: "Early Autophagy",
        description: "Cellular cleaning begins.",
        benefit: "Removal of cellular debris.",
    },
    Milestone {
        hour: 16.0,
        phase_id: 2,
        title: "Liver De-Fatting",
        description: "Burning visceral fat.",
        benefit: "Reversing Medium Fatty Liver.",
    },
    Milestone {
        hour: 17.0,
        phase_id: 2,
        title: "Anti-Inflammatory",
        description: "Reduced systemic inflammation.",
        benefit: "Beneficial for asthma (J45) history.",
    },
    Milestone {
        hour: 18.5,
        phase_id: 3,
        title: "Max Fat Oxidation",
        description: "Burning elevated triglycerides.",
        benefit: "High rate lipid reduction.",
    },
    Milestone {
        hour: 19.0,
        phase_id: 3,
        title: "Mental Clarity",
        description: "Ketones reach the brain.",
        benefit: "Alleviates 'sleepiness' symptoms.",
    },
    Milestone {
        hour: 20.0,
        phase_id: 3,
        title: "Hydration Check 4 💧",
        description: "500ml Water. CRITICAL FLUSH.",
        benefit: "Prevent Uric Acid buildup & Gout.",
    },
    Milestone {
        hour: 21.0,
        phase_id: 3,
        title: "Gallbladder Rest",
        description: "Gallbladder inactive.",
        benefit: "Reduces irritation around multiple polyps.",
    },
    Milestone {
        hour: 22.0,
        phase_id: 3,
        title: "Autophagy Ramp Up",
        description: "Recycling damaged cells.",
        benefit: "Deep cellular maintenance.",
    },
    Milestone {
        hour: 23.0,
        phase_id: 3,
        title: "Uric Acid Watch",
        description: "Check toes for tingling/pain.",
        benefit: "STOP if pain occurs.",
    },
    Milestone {
        hour: 24.0,
        phase_id: 3,
        title: "Peak BDNF",
        description: "Brain fertilizer high.",
        benefit: "Neural regeneration.",
    },
    Milestone {
        hour: 25.0,
        phase_id: 3,
        title: "Liver De-fatting",
        description: "Converting stored liver fat.",
        benefit: "Direct treatment for Grade 2 Fatty Liver.",
    },
    Milestone {
        hour: 26.0,
        phase_id: 3,
        title: "HGH Peak",
        description: "Max muscle protection.",
        benefit: "Preserving lean mass.",
    },
    Milestone {
        hour: 27.0,
        phase_id: 3,
        title: "Hydration Check 5 💧",
        description: "300ml Water + Electrolytes.",
        benefit: "Continuing sediment flush.",
    },
    Milestone {
        hour: 28.0,
        phase_id: 3,
        title: "Immune Reset",
        description: "WBC recycling.",
        benefit: "Helps allergies and urticaria history.",
    },
    Milestone {
        hour: 29.0,
        phase_id: 3,
        title: "Insulin Low",
        description: "Minimal insulin levels.",
        benefit: "Maximized insulin sensitivity.",
    },
    Milestone {
        hour: 31.0,
        phase_id: 4,
        title: "Gut Repair",
        description: "Lining regeneration.",
        benefit: "Digestive system restoration.",
    },
    Milestone {
        hour: 32.0,
        phase_id: 4,
        title: "Deep Anti-Inflam",
        description: "Systemic marker reduction.",
        benefit: "Global reduction in inflammation.",
    },
    Milestone {
        hour: 33.0,
        phase_id: 4,
        title: "Hydration Check 6 💧",
        description: "300ml Water.",
        benefit: "Kidney maintenance.",
    },
    Milestone {
        hour: 34.0,
        phase_id: 4,
        title: "Gallbladder Safety",
        description: "Bile concentrated. CAUTION.",
        benefit: "Prep for low-fat refeed to avoid polyp irritation.",
    },
    Milestone {
        hour: 35.0,
        phase_id: 4,
        title: "Triglyceride Burn",
        description: "Targeting 'High' levels.",
        benefit: "Sustained lipid control.",
    },
    Milestone {
        hour: 37.0,
        phase_id: 4,
        title: "Mental Focus",
        description: "High energy state.",
        benefit: "Contrast to usual tiredness.",
    },
    Milestone {
        hour: 38.0,
        phase_id: 4,
        title: "Hydration Check 7 💧",
        description: "300ml Water.",
        benefit: "Steady filtration.",
    },
    Milestone {
        hour: 40.0,
        phase_id: 4,
        title: "Peak Autophagy",
        description: "Max cellular recycling.",
        benefit: "Potential anti-aging/anti-cancer.",
    },
    Milestone {
        hour: 41.0,
        phase_id: 4,
        title: "Liver Size Min",
        description: "Glycogen/water loss peak.",
        benefit: "Reduced hepatomegaly pressure.",
    },
    Milestone {
        hour: 43.0,
        phase_id: 4,
        title: "Cortisol Rise",
        description: "Adrenaline boost.",
        benefit: "Energy for food seeking.",
    },
    Milestone {
        hour: 44.0,
        phase_id: 4,
        title: "Hydration Check 8 💧",
        description: "Final heavy intake.",
        benefit: "Pre-refeed flush.",
    },
    Milestone {
        hour: 46.0,
        phase_id: 4,
        title: "Refeeding Plan",
        description: "NO Seafood/Red Meat. NO Fried.",
        benefit: "Broth, Chicken, Tofu, Veggies ONLY.",
    },
    Milestone {
        hour: 48.0,
        phase_id: 4,
        title: "Completion",
        description: "Max cellular recycling achieved.",
        benefit: "Metabolic reset complete.",
    },
];

/// Index of the first milestone strictly after `hours`.
fn split_index(milestones: &[Milestone], hours: f64) -> usize {
    let hours = normalize_hours(hours);
    milestones.partition_point(|m| m.hour <= hours)
}

/// Milestone with the greatest `hour <= elapsed_hours`.
pub fn last_milestone(elapsed_hours: f64) -> Option<&'static Milestone> {
    last_milestone_in(MILESTONES, elapsed_hours)
}

/// Milestone with the smallest `hour > elapsed_hours`.
pub fn next_milestone(elapsed_hours: f64) -> Option<&'static Milestone> {
    next_milestone_in(MILESTONES, elapsed_hours)
}

pub fn last_milestone_in(milestones: &[Milestone], elapsed_hours: f64) -> Option<&Milestone> {
    let idx = split_index(milestones, elapsed_hours);
    idx.checked_sub(1).and_then(|i| milestones.get(i))
}

pub fn next_milestone_in(milestones: &[Milestone], elapsed_hours: f64) -> Option<&Milestone> {
    milestones.get(split_index(milestones, elapsed_hours))
}

/// Milestones with `from < hour <= to`, in table order. Empty when `to <= from`.
pub fn milestones_between(from: f64, to: f64) -> &'static [Milestone] {
    let start = split_index(MILESTONES, from);
    let end = split_index(MILESTONES, to).max(start);
    &MILESTONES[start..end]
}

/// Hours left until `milestone`, never negative.
pub fn hours_until(milestone: &Milestone, elapsed_hours: f64) -> f64 {
    (milestone.hour - normalize_hours(elapsed_hours)).max(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneStatus {
    Passed,
    /// The most recently reached milestone.
    Current,
    Upcoming,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub index: usize,
    pub status: MilestoneStatus,
    #[serde(flatten)]
    pub milestone: &'static Milestone,
}

/// Every milestone tagged with its status at `elapsed_hours`.
pub fn timeline(elapsed_hours: f64) -> Vec<TimelineEntry> {
    let split = split_index(MILESTONES, elapsed_hours);
    let current = split.checked_sub(1);

    MILESTONES
        .iter()
        .enumerate()
        .map(|(index, milestone)| {
            let status = if Some(index) == current {
                MilestoneStatus::Current
            } else if index < split {
                MilestoneStatus::Passed
            } else {
                MilestoneStatus::Upcoming
            };
            TimelineEntry {
                index,
                status,
                milestone,
            }
        })
        .collect()
}

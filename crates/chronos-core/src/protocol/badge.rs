//! Streak badges.
//!
//! A badge is unlocked when the best streak across all phases reaches its
//! threshold. Unlock state is never stored; it is recomputed from streaks on
//! every read so that changing a threshold reclassifies history.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Streak count required to unlock.
    pub threshold: u32,
    pub icon: &'static str,
    pub color: &'static str,
}

impl Badge {
    pub fn is_unlocked(&self, max_streak: u32) -> bool {
        max_streak >= self.threshold
    }
}

pub static BADGES: &[Badge] = &[
    Badge {
        id: "bronze_7",
        name: "Bronze Warrior",
        description: "7 Streaks achieved",
        threshold: 7,
        icon: "Award",
        color: "text-amber-600",
    },
    Badge {
        id: "silver_14",
        name: "Silver Guardian",
        description: "14 Streaks achieved",
        threshold: 14,
        icon: "Shield",
        color: "text-slate-300",
    },
    Badge {
        id: "gold_21",
        name: "Gold Master",
        description: "21 Streaks achieved",
        threshold: 21,
        icon: "Crown",
        color: "text-yellow-400",
    },
    Badge {
        id: "plat_30",
        name: "Platinum Legend",
        description: "30 Streaks achieved",
        threshold: 30,
        icon: "Star",
        color: "text-cyan-400",
    },
    Badge {
        id: "diamond_60",
        name: "Diamond Soul",
        description: "60 Streaks achieved",
        threshold: 60,
        icon: "Gem",
        color: "text-blue-400",
    },
    Badge {
        id: "master_90",
        name: "Grandmaster",
        description: "90 Streaks achieved",
        threshold: 90,
        icon: "Trophy",
        color: "text-purple-400",
    },
    Badge {
        id: "elite_180",
        name: "Elite Sage",
        description: "180 Streaks achieved",
        threshold: 180,
        icon: "Sun",
        color: "text-orange-400",
    },
    Badge {
        id: "immortal_365",
        name: "Chronos Immortal",
        description: "365 Streaks achieved",
        threshold: 365,
        icon: "Zap",
        color: "text-emerald-400",
    },
];

/// Badges in `badges` unlocked by a best streak of `max_streak`.
pub fn unlocked_badges_in(badges: &[Badge], max_streak: u32) -> Vec<&Badge> {
    badges.iter().filter(|b| b.is_unlocked(max_streak)).collect()
}

//! Simulation report generation.

use serde::Serialize;
use std::collections::BTreeMap;

/// Totals for one simulated run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub battles: u32,
    pub victories: u32,
    pub defeats: u32,
    pub timeouts: u32,
    pub total_turns: u64,
    pub final_level: u32,
    pub gold: u64,
    pub materials: BTreeMap<String, u64>,
    pub equipment_drops: u32,
    pub potions_used: u32,
}

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub total_battles: u64,
    pub total_victories: u64,
    pub total_defeats: u64,
    pub total_timeouts: u64,

    pub win_rate: f64,
    pub avg_turns_per_battle: f64,
    pub avg_final_level: f64,
    pub avg_gold_per_battle: f64,
    /// material id -> average quantity per battle
    pub materials_per_battle: BTreeMap<String, f64>,
    pub equipment_drop_rate: f64,
    pub avg_potions_per_run: f64,

    // Individual run stats for detailed analysis
    #[serde(skip)]
    pub run_stats: Vec<RunStats>,
}

impl SimReport {
    /// Create a new report from completed run stats.
    pub fn from_runs(runs: Vec<RunStats>) -> Self {
        let num_runs = runs.len() as u32;
        let total_battles: u64 = runs.iter().map(|r| r.battles as u64).sum();
        let total_victories: u64 = runs.iter().map(|r| r.victories as u64).sum();
        let total_defeats: u64 = runs.iter().map(|r| r.defeats as u64).sum();
        let total_timeouts: u64 = runs.iter().map(|r| r.timeouts as u64).sum();

        let battles = total_battles.max(1) as f64;
        let per_run = num_runs.max(1) as f64;

        let mut materials_per_battle = BTreeMap::new();
        for run in &runs {
            for (id, qty) in &run.materials {
                *materials_per_battle.entry(id.clone()).or_insert(0.0) += *qty as f64;
            }
        }
        for total in materials_per_battle.values_mut() {
            *total /= battles;
        }

        Self {
            num_runs,
            total_battles,
            total_victories,
            total_defeats,
            total_timeouts,
            win_rate: total_victories as f64 / battles,
            avg_turns_per_battle: runs.iter().map(|r| r.total_turns as f64).sum::<f64>() / battles,
            avg_final_level: runs.iter().map(|r| r.final_level as f64).sum::<f64>() / per_run,
            avg_gold_per_battle: runs.iter().map(|r| r.gold as f64).sum::<f64>() / battles,
            materials_per_battle,
            equipment_drop_rate: runs.iter().map(|r| r.equipment_drops as f64).sum::<f64>() / battles,
            avg_potions_per_run: runs.iter().map(|r| r.potions_used as f64).sum::<f64>() / per_run,
            run_stats: runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {}, Battles: {} ({} won, {} lost, {} timed out)\n\n",
            self.num_runs, self.total_battles, self.total_victories, self.total_defeats, self.total_timeouts
        ));

        report.push_str("── COMBAT ───────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Win Rate:            {:.1}%\n", self.win_rate * 100.0));
        report.push_str(&format!("  Avg Turns/Battle:    {:.1}\n", self.avg_turns_per_battle));
        report.push_str(&format!("  Avg Potions/Run:     {:.1}\n\n", self.avg_potions_per_run));

        report.push_str("── PROGRESSION ──────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Final Level:     {:.1}\n\n", self.avg_final_level));

        report.push_str("── LOOT (per battle) ────────────────────────────────────────────\n");
        report.push_str(&format!("  Gold:                {:.2}\n", self.avg_gold_per_battle));
        for (id, qty) in &self.materials_per_battle {
            report.push_str(&format!("  {:<20} {:.2}\n", id, qty));
        }
        report.push_str(&format!(
            "  Equipment:           {:.2}%\n\n",
            self.equipment_drop_rate * 100.0
        ));

        report.push_str("── BALANCE ASSESSMENT ───────────────────────────────────────────\n");
        let rating = if self.win_rate > 0.95 {
            "TOO EASY - Monster never loses"
        } else if self.win_rate > 0.6 {
            "GOOD - Challenging but fair"
        } else if self.win_rate > 0.3 {
            "HARD - Frequent defeats"
        } else {
            "TOO HARD - Monster rarely wins"
        };
        report.push_str(&format!("  Difficulty:      {}\n", rating));
        if self.total_timeouts > 0 {
            report.push_str("  ⚠️  Some battles hit the turn limit - stalemate matchups?\n");
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

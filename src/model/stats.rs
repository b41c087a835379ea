//! Stat components and their aggregation rules.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{StatType, UnitType};
use crate::model::UnitJob;

/// Highest reachable dupe value.
pub const DV_CAP: i32 = 99;

/// Dupe-value bonus series for a single stat.
///
/// Built from a multiset of milestone thresholds; each occurrence of a
/// milestone adds one point once the dupe value reaches it. The result is a
/// non-decreasing step function over dupe value 0..=99.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Ud {
    increments: BTreeMap<i32, i32>,
}

impl Ud {
    /// Milestones at or below zero grant nothing and are dropped, so the
    /// bonus at dupe value 0 is always 0.
    pub fn new(milestones: impl IntoIterator<Item = i32>) -> Ud {
        let mut increments = BTreeMap::new();
        for m in milestones {
            if m > 0 {
                *increments.entry(m).or_insert(0) += 1;
            }
        }
        Ud { increments }
    }

    /// Parse a comma-separated milestone list; empty input means no bonus.
    pub fn parse(raw: &str) -> Option<Ud> {
        if raw.is_empty() {
            return Some(Ud::default());
        }
        let mut milestones = Vec::new();
        for part in raw.split(',') {
            milestones.push(part.trim().parse::<i32>().ok()?);
        }
        Some(Ud::new(milestones))
    }

    /// Cumulative bonus at the given dupe value.
    pub fn bonus(&self, dv: i32) -> i32 {
        self.increments.range(..=dv).map(|(_, inc)| inc).sum()
    }

    /// Bonus at the dupe-value cap.
    pub fn max(&self) -> i32 {
        self.bonus(DV_CAP)
    }

    /// Lowest dupe value that already yields the capped bonus.
    pub fn dv_for_cap(&self) -> i32 {
        self.increments
            .range(..=DV_CAP)
            .next_back()
            .map(|(m, _)| *m)
            .unwrap_or(0)
    }

    /// Distinct milestones, ascending.
    pub fn milestones(&self) -> impl Iterator<Item = i32> + '_ {
        self.increments.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.increments.is_empty()
    }
}

/// One stat of one unit, broken into its additive components.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Stat {
    /// Base value from the unit itself.
    pub base: i32,
    /// Contribution of the current job.
    pub job_initial: i32,
    /// Maximum obtainable bonus carried over from the previous evolution.
    pub evo_bonus: i32,
    /// Maximum growth from leveling. May be unreachable in practice.
    pub growth: i32,
    /// Maximum fusion value without dupe-value bonuses.
    pub compose: i32,
    /// Dupe-value bonus series.
    pub ud: Ud,
    /// Flat bonus from job skill mastery.
    pub skill_master: i32,
}

impl Stat {
    pub fn initial(&self) -> i32 {
        self.base + self.job_initial
    }

    pub fn max(&self) -> i32 {
        self.initial() + self.evo_bonus + self.growth + self.compose + self.ud.max()
            + self.skill_master
    }

    /// Evo bonus this stat grants to a normal evolution target: a tenth of
    /// the maximum, rounded up.
    pub fn provided_evo_bonus(&self) -> i32 {
        (self.max() + 9).div_euclid(10)
    }
}

/// All eight stats of one unit type variant.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Stats([Stat; 8]);

impl Stats {
    pub fn from_fn(mut f: impl FnMut(StatType) -> Stat) -> Stats {
        Stats(StatType::ALL.map(&mut f))
    }

    pub fn of(&self, stat: StatType) -> &Stat {
        &self.0[stat.index()]
    }

    /// Distinct dupe-value milestones across all stats, ascending.
    pub fn ud_milestones(&self) -> Vec<i32> {
        let mut all: Vec<i32> = self.0.iter().flat_map(|s| s.ud.milestones()).collect();
        all.sort_unstable();
        all.dedup();
        all
    }

    pub fn has_ud(&self) -> bool {
        self.0.iter().any(|s| s.ud.max() != 0)
    }

    /// Recompute these stats for a different job. `extra_mastery` jobs add
    /// their skill-mastery bonuses on top of the base job's.
    pub fn with_job(&self, job: &UnitJob, extra_mastery: &[&UnitJob]) -> Stats {
        Stats::from_fn(|stat| {
            let src = self.of(stat);
            let mastery = job.skill_master_bonus(stat)
                + extra_mastery
                    .iter()
                    .map(|j| j.skill_master_bonus(stat))
                    .sum::<i32>();
            Stat {
                base: src.base,
                job_initial: job.initial_of(stat),
                evo_bonus: src.evo_bonus,
                growth: src.growth,
                compose: src.compose,
                ud: src.ud.clone(),
                skill_master: mastery,
            }
        })
    }
}

/// Stats for all six unit types.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UnitStats([Stats; 6]);

impl UnitStats {
    pub fn from_fn(mut f: impl FnMut(UnitType) -> Stats) -> UnitStats {
        UnitStats(UnitType::ALL.map(&mut f))
    }

    pub fn of(&self, unit_type: UnitType) -> &Stats {
        &self.0[unit_type.index()]
    }

    pub fn with_job(&self, job: &UnitJob, extra_mastery: &[&UnitJob]) -> UnitStats {
        UnitStats::from_fn(|t| self.of(t).with_job(job, extra_mastery))
    }
}

/// Level cap progression: initial cap plus a fixed increment per limit break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Level {
    pub ini: i32,
    pub inc: i32,
    pub mlb_count: i32,
}

impl Level {
    pub fn max(&self) -> i32 {
        self.ini + self.inc * self.mlb_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ud_step_function() {
        let ud = Ud::new([10, 20, 20, 55]);
        assert_eq!(ud.bonus(0), 0);
        assert_eq!(ud.bonus(9), 0);
        assert_eq!(ud.bonus(10), 1);
        assert_eq!(ud.bonus(19), 1);
        assert_eq!(ud.bonus(20), 3);
        assert_eq!(ud.bonus(54), 3);
        assert_eq!(ud.bonus(55), 4);
        assert_eq!(ud.bonus(DV_CAP), 4);
        assert_eq!(ud.max(), 4);
        assert_eq!(ud.dv_for_cap(), 55);
    }

    #[test]
    fn test_ud_monotonic_over_full_domain() {
        let ud = Ud::new([5, 5, 30, 42, 42, 42, 99]);
        let mut prev = ud.bonus(0);
        assert_eq!(prev, 0);
        for dv in 1..=DV_CAP {
            let b = ud.bonus(dv);
            assert!(b >= prev);
            prev = b;
        }
        assert_eq!(ud.bonus(DV_CAP), 7);
    }

    #[test]
    fn test_ud_nonpositive_milestones_grant_nothing() {
        let ud = Ud::new([0, 10]);
        assert_eq!(ud.bonus(0), 0);
        assert_eq!(ud.bonus(10), 1);
        assert_eq!(ud.max(), 1);

        let zero_only = Ud::parse("0").unwrap();
        assert!(zero_only.is_empty());
        assert_eq!(zero_only.bonus(0), 0);

        let negative = Ud::new([-5, 20]);
        assert_eq!(negative.bonus(0), 0);
        assert_eq!(negative.max(), 1);
    }

    #[test]
    fn test_ud_empty_and_parse() {
        let empty = Ud::parse("").unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.max(), 0);
        assert_eq!(empty.dv_for_cap(), 0);

        let parsed = Ud::parse("10,20,30").unwrap();
        assert_eq!(parsed.max(), 3);
        assert_eq!(parsed.dv_for_cap(), 30);

        assert_eq!(Ud::parse("10,x"), None);
    }

    #[test]
    fn test_stat_totals() {
        let stat = Stat {
            base: 40,
            job_initial: 15,
            evo_bonus: 12,
            growth: 68,
            compose: 99,
            ud: Ud::new([10, 20]),
            skill_master: 10,
        };
        assert_eq!(stat.initial(), 55);
        assert_eq!(stat.max(), 55 + 12 + 68 + 99 + 2 + 10);
        // 246 / 10 rounded up.
        assert_eq!(stat.provided_evo_bonus(), 25);
    }

    #[test]
    fn test_provided_evo_bonus_exact_tenth() {
        let stat = Stat {
            base: 100,
            ..Default::default()
        };
        assert_eq!(stat.max(), 100);
        assert_eq!(stat.provided_evo_bonus(), 10);
    }

    #[test]
    fn test_level_max() {
        let level = Level {
            ini: 60,
            inc: 5,
            mlb_count: 4,
        };
        assert_eq!(level.max(), 80);
    }
}

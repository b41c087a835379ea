//! Stat derivation: growth, compose caps, dupe-value bonuses and the
//! recursive evolution bonus.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{MasterDataError, Result};
use crate::model::{Level, Stat, StatType, Stats, Ud, UnitStats, UnitType};
use crate::repository::MasterDataRepo;
use crate::repos::JobsRepo;
use crate::schema::records::{
    ComposeSettingRow, UnitEvolutionPatternRow, UnitInitialParamRow, UnitParameterRow, UnitRow,
    UnitTypeParameterRow,
};
use crate::schema::Table;

enum MemoEntry {
    InProgress,
    Done(Stat),
}

pub struct StatsRepo {
    jobs: Rc<JobsRepo>,
    units: HashMap<i32, UnitRow>,
    parameters: HashMap<i32, UnitParameterRow>,
    initials: HashMap<i32, UnitInitialParamRow>,
    types_data: HashMap<i32, HashMap<i32, UnitTypeParameterRow>>,
    /// Evolution edges reversed: target unit to its source.
    evo_source: HashMap<i32, i32>,
    ud: HashMap<i32, ComposeSettingRow>,
    memo: RefCell<HashMap<(i32, StatType, UnitType), MemoEntry>>,
}

impl StatsRepo {
    pub fn new(repo: &MasterDataRepo, jobs: Rc<JobsRepo>) -> Result<StatsRepo> {
        let evo_source = repo
            .read::<UnitEvolutionPatternRow>()?
            .iter()
            .map(|p| (p.target_unit_id, p.unit_id))
            .collect();
        Ok(StatsRepo {
            jobs,
            units: repo.index(|r: &UnitRow| r.id)?,
            parameters: repo.index(|r: &UnitParameterRow| r.id)?,
            initials: repo.index(|r: &UnitInitialParamRow| r.id)?,
            types_data: repo.nested_index(|r: &UnitTypeParameterRow| (r.rarity_id, r.unit_type))?,
            evo_source,
            ud: repo.index(|r: &ComposeSettingRow| r.id)?,
            memo: RefCell::new(HashMap::new()),
        })
    }

    pub fn level_of(&self, unit: &UnitRow) -> Result<Level> {
        let params = self.parameters(unit)?;
        Ok(Level {
            ini: params.initial_max_level,
            inc: params.level_per_breakthrough,
            mlb_count: params.breakthrough_limit,
        })
    }

    pub fn stats_of(&self, unit: &UnitRow) -> Result<UnitStats> {
        let mut per_type = Vec::with_capacity(UnitType::ALL.len());
        for ut in UnitType::ALL {
            let mut per_stat = Vec::with_capacity(StatType::ALL.len());
            for stat in StatType::ALL {
                per_stat.push(self.stat_of(unit.id, stat, ut)?);
            }
            per_type.push(Stats::from_fn(|s| per_stat[s.index()].clone()));
        }
        Ok(UnitStats::from_fn(|t| per_type[t.index()].clone()))
    }

    /// One stat of one unit under one type, memoized.
    ///
    /// The memo doubles as the recursion guard for the evolution chain: a
    /// lookup that lands on an in-progress entry means the chain loops.
    pub fn stat_of(&self, unit_id: i32, stat: StatType, ut: UnitType) -> Result<Stat> {
        let key = (unit_id, stat, ut);
        match self.memo.borrow().get(&key) {
            Some(MemoEntry::Done(s)) => return Ok(s.clone()),
            Some(MemoEntry::InProgress) => {
                return Err(MasterDataError::EvolutionCycle { unit_id })
            }
            None => {}
        }
        self.memo.borrow_mut().insert(key, MemoEntry::InProgress);
        let result = self.compute_stat(unit_id, stat, ut);
        let mut memo = self.memo.borrow_mut();
        match &result {
            Ok(s) => {
                memo.insert(key, MemoEntry::Done(s.clone()));
            }
            Err(_) => {
                memo.remove(&key);
            }
        }
        result
    }

    fn compute_stat(&self, unit_id: i32, stat: StatType, ut: UnitType) -> Result<Stat> {
        let unit = self
            .units
            .get(&unit_id)
            .ok_or_else(|| MasterDataError::missing_row(Table::UnitUnit, unit_id))?;
        let initial = self
            .initials
            .get(&unit_id)
            .ok_or_else(|| MasterDataError::missing_row(Table::UnitInitialParam, unit_id))?;
        let params = self.parameters(unit)?;
        let type_data = self
            .types_data
            .get(&unit.rarity_id)
            .and_then(|leaf| leaf.get(&ut.code()))
            .ok_or_else(|| {
                MasterDataError::missing_row(
                    Table::UnitTypeParameter,
                    format!("rarity {} type {}", unit.rarity_id, ut.code()),
                )
            })?;
        let job = self.jobs.job(unit.job_id)?;

        Ok(Stat {
            base: initial.initial_of(stat),
            job_initial: job.initial_of(stat),
            evo_bonus: self.evo_bonus(unit, stat, ut)?,
            growth: growth(params.max_of(stat), type_data.correction_of(stat)),
            compose: type_data.compose_max_of(stat),
            ud: self.ud_of(unit, stat)?,
            skill_master: job.skill_master_bonus(stat),
        })
    }

    /// Awakened units inherit the raw bonus their source already had; normal
    /// evolutions get a fresh rounded-up tenth of the source's maximum.
    fn evo_bonus(&self, unit: &UnitRow, stat: StatType, ut: UnitType) -> Result<i32> {
        let Some(&source_id) = self.evo_source.get(&unit.id) else {
            return Ok(0);
        };
        let source = self.stat_of(source_id, stat, ut)?;
        Ok(if unit.awake_unit_flag {
            source.evo_bonus
        } else {
            source.provided_evo_bonus()
        })
    }

    fn ud_of(&self, unit: &UnitRow, stat: StatType) -> Result<Ud> {
        if unit.compose_max_unity_value_setting_id == 0 {
            return Ok(Ud::default());
        }
        let row = self
            .ud
            .get(&unit.compose_max_unity_value_setting_id)
            .ok_or_else(|| {
                MasterDataError::missing_row(
                    Table::ComposeMaxUnityValueSetting,
                    unit.compose_max_unity_value_setting_id,
                )
            })?;
        let Some(raw) = row.milestones_of(stat) else {
            return Ok(Ud::default());
        };
        Ud::parse(raw).ok_or_else(|| MasterDataError::InvalidField {
            table: Table::ComposeMaxUnityValueSetting,
            key: row.id,
            field: "compose_add_max",
            value: raw.to_owned(),
        })
    }

    fn parameters(&self, unit: &UnitRow) -> Result<&UnitParameterRow> {
        self.parameters.get(&unit.parameter_data_id).ok_or_else(|| {
            MasterDataError::missing_row(Table::UnitUnitParameter, unit.parameter_data_id)
        })
    }
}

/// Maximum level-up growth for one stat.
///
/// The wire adjust is a float32; rounding it to four decimals first keeps
/// values like 0.15 from flooring one point short of the in-game result.
fn growth(base: i32, adjust: f32) -> i32 {
    let adjust = (f64::from(adjust) * 10_000.0).round() / 10_000.0;
    (f64::from(base) * (1.0 + adjust)).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_plain() {
        assert_eq!(growth(100, 0.0), 100);
        assert_eq!(growth(46, 0.5), 69);
        assert_eq!(growth(64, 0.1407), 73);
    }

    #[test]
    fn test_growth_rounding_truncates_sub_decimal_adjusts() {
        // 0.140625 rounds to 1406/10000, so the raw floor of 73 is out of
        // reach: 64 * 1.1406 = 72.9984.
        assert_eq!(growth(64, 0.140625), 72);
    }

    #[test]
    fn test_growth_four_decimal_rounding_is_load_bearing() {
        // Largest float32 below 0.25; without the rounding step the floor
        // would land on 99.
        let adjust = f32::from_bits(0x3E7F_FFFF);
        assert!(adjust < 0.25);
        assert_eq!(growth(80, adjust), 100);
    }

    #[test]
    fn test_growth_negative_adjust() {
        assert_eq!(growth(40, -0.125), 35);
    }
}

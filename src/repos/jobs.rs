//! Job resolution, including characteristic skills and mastery bonuses.

use std::collections::HashMap;
use std::rc::Rc;

use tracing::warn;

use crate::error::{MasterDataError, Result};
use crate::model::{JobCharacteristic, JobCharacteristicBonus, StatType, UnitJob};
use crate::repository::MasterDataRepo;
use crate::repos::SkillsRepo;
use crate::schema::records::{JobCharacteristicsRow, UnitJobRow};
use crate::schema::Table;

pub struct JobsRepo {
    jobs: HashMap<i32, Rc<UnitJob>>,
}

impl JobsRepo {
    pub fn new(repo: &MasterDataRepo, skills: &SkillsRepo) -> Result<JobsRepo> {
        let mut characteristics = HashMap::new();
        for row in repo.read::<JobCharacteristicsRow>()?.iter() {
            // skill2, when present, is a hidden stat buff passive already
            // mentioned in the first skill's description.
            characteristics.insert(
                row.id,
                JobCharacteristic {
                    id: row.id,
                    skill: skills.skill(row.skill_id)?,
                    bonuses: row
                        .bonus_slots()
                        .into_iter()
                        .map(|(code, value)| JobCharacteristicBonus {
                            stat: bonus_stat(row.id, code),
                            plus_value: value,
                        })
                        .collect(),
                },
            );
        }

        let mut jobs = HashMap::new();
        for row in repo.read::<UnitJobRow>()?.iter() {
            jobs.insert(row.id, Rc::new(build_job(row, &characteristics)));
        }
        Ok(JobsRepo { jobs })
    }

    pub fn job(&self, job_id: i32) -> Result<Rc<UnitJob>> {
        self.jobs
            .get(&job_id)
            .cloned()
            .ok_or_else(|| MasterDataError::missing_row(Table::UnitJob, job_id))
    }
}

fn build_job(row: &UnitJobRow, characteristics: &HashMap<i32, JobCharacteristic>) -> UnitJob {
    UnitJob {
        id: row.id,
        name: row.name.clone(),
        movement: row.movement,
        new_cost: row.new_cost,
        initial: StatType::ALL.map(|s| row.initial_of(s)),
        characteristics: parse_characteristic_ids(row)
            .filter_map(|id| {
                // Not every characteristic has a mastery entry (terrain
                // passives for example); those are skipped.
                characteristics.get(&id).cloned()
            })
            .collect(),
    }
}

fn parse_characteristic_ids(row: &UnitJobRow) -> impl Iterator<Item = i32> + '_ {
    row.characteristics_ids
        .as_deref()
        .unwrap_or("")
        .split(',')
        .filter_map(move |part| {
            let part = part.trim();
            if part.is_empty() {
                return None;
            }
            match part.parse::<i32>() {
                Ok(id) => Some(id),
                Err(_) => {
                    warn!(job_id = row.id, part, "ignored malformed characteristic id");
                    None
                }
            }
        })
}

/// Map a max-level bonus code onto a stat. Codes 0 (none) and 9 (movement)
/// grant no stat; anything else unmapped is logged and dropped.
fn bonus_stat(characteristic_id: i32, code: i32) -> Option<StatType> {
    match code {
        0 | 9 => None,
        1 => Some(StatType::Hp),
        2 => Some(StatType::Str),
        3 => Some(StatType::Mgc),
        4 => Some(StatType::Grd),
        5 => Some(StatType::Spr),
        6 => Some(StatType::Spd),
        7 => Some(StatType::Tec),
        8 => Some(StatType::Lck),
        _ => {
            warn!(characteristic_id, code, "unmapped characteristic bonus");
            None
        }
    }
}

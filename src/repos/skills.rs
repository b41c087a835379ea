//! Skill resolution: battle skills, per-unit skill links and upgrades.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::warn;

use crate::error::{MasterDataError, Result};
use crate::model::{
    Element, OvkSkill, Skill, SkillAwakeCategory, SkillDesc, SkillEvo, SkillGenre, SkillTarget,
    SkillType, UnitSkills, UnitType,
};
use crate::repository::MasterDataRepo;
use crate::schema::records::{
    BattleSkillRow, OvkSkillReleaseRow, UnitCqSkillRow, UnitHqSkillRow, UnitIntimateSkillRow,
    UnitLeaderSkillRow, UnitRow, UnitRsSkillRow, UnitSkillEvolutionRow, UnitSkillRow,
};
use crate::schema::Table;

pub struct SkillsRepo {
    skills: HashMap<i32, Rc<Skill>>,
    evolutions: HashMap<i32, Vec<SkillEvo>>,
    ovk: HashMap<i32, OvkSkill>,
    unit_skill: HashMap<i32, Vec<UnitSkillRow>>,
    unit_rs: HashMap<i32, UnitRsSkillRow>,
    unit_ls: HashMap<i32, UnitLeaderSkillRow>,
    unit_cq: HashMap<i32, Vec<UnitCqSkillRow>>,
    unit_hq: HashMap<i32, UnitHqSkillRow>,
    unit_is: HashMap<i32, UnitIntimateSkillRow>,
    cache: RefCell<HashMap<i32, Rc<UnitSkills>>>,
}

impl SkillsRepo {
    pub fn new(repo: &MasterDataRepo) -> Result<SkillsRepo> {
        let mut skills = HashMap::new();
        for row in repo.read::<BattleSkillRow>()?.iter() {
            skills.insert(row.id, Rc::new(build_skill(row)));
        }

        let mut evolutions: HashMap<i32, Vec<SkillEvo>> = HashMap::new();
        for row in repo.read::<UnitSkillEvolutionRow>()?.iter() {
            let evo = SkillEvo {
                unit_id: row.unit_id,
                from_skill: lookup(&skills, row.before_skill_id)?,
                to_skill: lookup(&skills, row.after_skill_id)?,
                req_level: row.level,
            };
            evolutions.entry(row.unit_id).or_default().push(evo);
        }

        // The release table's row id doubles as the character key.
        let mut ovk = HashMap::new();
        for row in repo.read::<OvkSkillReleaseRow>()?.iter() {
            ovk.insert(
                row.id,
                OvkSkill {
                    same_character_id: row.id,
                    skill: lookup(&skills, row.skill_id)?,
                    req_dv: row.unity_value,
                },
            );
        }

        Ok(SkillsRepo {
            skills,
            evolutions,
            ovk,
            unit_skill: repo.group_by(|r: &UnitSkillRow| r.unit_id)?,
            unit_rs: repo.index(|r: &UnitRsSkillRow| r.character_id)?,
            unit_ls: repo.index(|r: &UnitLeaderSkillRow| r.unit_id)?,
            unit_cq: repo.group_by(|r: &UnitCqSkillRow| r.unit_id)?,
            unit_hq: repo.index(|r: &UnitHqSkillRow| r.character_id)?,
            unit_is: repo.index(|r: &UnitIntimateSkillRow| r.unit_id)?,
            cache: RefCell::new(HashMap::new()),
        })
    }

    pub fn skill(&self, skill_id: i32) -> Result<Rc<Skill>> {
        lookup(&self.skills, skill_id)
    }

    /// All skills of one unit, composed once and shared.
    pub fn skills_of(&self, unit: &UnitRow) -> Result<Rc<UnitSkills>> {
        if let Some(hit) = self.cache.borrow().get(&unit.id) {
            return Ok(hit.clone());
        }

        let mut native = Vec::new();
        let mut types = HashMap::new();
        for link in self.unit_skill.get(&unit.id).into_iter().flatten() {
            let skill = self.skill(link.skill_id)?;
            if link.unit_type == 0 {
                native.push(skill);
            } else if let Some(t) = UnitType::from_code(link.unit_type) {
                types.insert(t, skill);
            } else {
                warn!(
                    unit_id = unit.id,
                    skill_id = link.skill_id,
                    unit_type = link.unit_type,
                    "ignored skill link with unmapped unit type"
                );
            }
        }
        native.sort_by_key(|s| s.id);

        let mut cq = Vec::new();
        for link in self.unit_cq.get(&unit.id).into_iter().flatten() {
            cq.push(self.skill(link.skill_id)?);
        }
        cq.sort_by_key(|s| s.id);

        let evolutions = self
            .evolutions
            .get(&unit.id)
            .into_iter()
            .flatten()
            .map(|evo| (evo.from_skill.id, evo.clone()))
            .collect();

        let ovk = if unit.exist_overkillers_skill {
            self.ovk.get(&unit.same_character_id).cloned()
        } else {
            None
        };

        let skills = Rc::new(UnitSkills {
            relationship: self.linked_skill(self.unit_rs.get(&unit.same_character_id), |r| {
                r.skill_id
            })?,
            leader: self.linked_skill(self.unit_ls.get(&unit.id), |r| r.skill_id)?,
            intimate: self.linked_skill(self.unit_is.get(&unit.id), |r| r.skill_id)?,
            harmony: self.linked_skill(self.unit_hq.get(&unit.character_id), |r| r.skill_id)?,
            types,
            evolutions,
            cq,
            native,
            ovk,
        });
        self.cache.borrow_mut().insert(unit.id, skills.clone());
        Ok(skills)
    }

    fn linked_skill<R>(
        &self,
        row: Option<&R>,
        skill_id: impl Fn(&R) -> i32,
    ) -> Result<Option<Rc<Skill>>> {
        row.map(|r| self.skill(skill_id(r))).transpose()
    }
}

fn lookup(skills: &HashMap<i32, Rc<Skill>>, skill_id: i32) -> Result<Rc<Skill>> {
    skills
        .get(&skill_id)
        .cloned()
        .ok_or_else(|| MasterDataError::missing_row(Table::BattleskillSkill, skill_id))
}

fn build_skill(row: &BattleSkillRow) -> Skill {
    let skill_type = SkillType::from_code(row.skill_type).unwrap_or_else(|| {
        warn!(skill_id = row.id, code = row.skill_type, "unmapped skill type");
        SkillType::Unknown
    });
    let element = Element::from_code(row.element).unwrap_or_else(|| {
        warn!(skill_id = row.id, code = row.element, "unmapped skill element");
        Element::None
    });
    let target = SkillTarget::from_code(row.target_type);
    if target.is_none() && row.target_type != 0 {
        warn!(
            skill_id = row.id,
            code = row.target_type,
            "unmapped skill target type"
        );
    }

    let mut genres = Vec::new();
    for code in [row.genre1, row.genre2].into_iter().flatten() {
        match SkillGenre::from_code(code) {
            Some(genre) => genres.push(genre),
            None => warn!(skill_id = row.id, code, "unmapped skill genre"),
        }
    }
    genres.sort_unstable();

    // Codes 0 and 1 mean no category; 2 is a dormant game-side value that
    // no unit carries, tolerated like any other unmapped code.
    let category = if row.awake_skill_category > 1 {
        let category = SkillAwakeCategory::from_code(row.awake_skill_category);
        if category.is_none() {
            warn!(
                skill_id = row.id,
                code = row.awake_skill_category,
                "unmapped awake skill category"
            );
        }
        category
    } else {
        None
    };

    Skill {
        id: row.id,
        skill_type,
        desc: SkillDesc {
            name: row.name.clone(),
            full: row.description.clone(),
            short: row.short_description.clone(),
        },
        max_lv: row.upper_level,
        genres,
        target,
        element,
        category,
        use_count: row.use_count,
        cooldown_turns: row.charge_turn,
        max_use_per_quest: row.max_use_count,
        min_range: row.min_range,
        max_range: row.max_range,
        weight: row.weight,
        power: row.power,
        hp_cost: row.consume_hp,
        resource_id: row.resource_reference_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_skill_maps_codes() {
        let row = BattleSkillRow {
            id: 1,
            name: "テスト".to_owned(),
            skill_type: 2,
            element: 5,
            genre1: Some(3),
            genre2: Some(1),
            target_type: 4,
            charge_turn: 2,
            max_use_count: 5,
            awake_skill_category: 11,
            ..Default::default()
        };
        let skill = build_skill(&row);
        assert_eq!(skill.skill_type, SkillType::Release);
        assert_eq!(skill.element, Element::Ice);
        assert_eq!(skill.genres, vec![SkillGenre::Attack, SkillGenre::Buff]);
        assert_eq!(skill.target, Some(SkillTarget::EnemySingle));
        assert_eq!(skill.category, Some(SkillAwakeCategory::SchoolGear));
        assert_eq!(skill.cooldown_turns, 2);
        assert_eq!(skill.max_use_per_quest, 5);
    }

    #[test]
    fn test_build_skill_tolerates_unmapped_codes() {
        let row = BattleSkillRow {
            id: 2,
            skill_type: 99,
            element: 99,
            genre1: Some(99),
            target_type: 99,
            awake_skill_category: 2,
            ..Default::default()
        };
        let skill = build_skill(&row);
        assert_eq!(skill.skill_type, SkillType::Unknown);
        assert_eq!(skill.element, Element::None);
        assert!(skill.genres.is_empty());
        assert_eq!(skill.target, None);
        assert_eq!(skill.category, None);
    }
}

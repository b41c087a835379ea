//! Job aggregates and the fully composed unit.

use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use chrono::NaiveDate;
use serde::Serialize;

use super::{
    ClassChangeType, Element, GearKind, Level, Skill, SkillAwakeCategory, StatType, UnitSkills,
    UnitStats, UnitTag, UnitTagKind,
};

/// Flat stat bonus granted by a job characteristic at max level. `stat` is
/// `None` for slots that grant nothing (including movement bonuses, which
/// are outside the stat model).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JobCharacteristicBonus {
    pub stat: Option<StatType>,
    pub plus_value: i32,
}

/// Job passive skill with its mastery bonuses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobCharacteristic {
    pub id: i32,
    pub skill: Rc<Skill>,
    pub bonuses: Vec<JobCharacteristicBonus>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UnitJob {
    pub id: i32,
    pub name: String,
    pub movement: i32,
    pub new_cost: i32,
    /// Per-stat initial values, indexed by [`StatType::index`].
    pub initial: [i32; 8],
    pub characteristics: Vec<JobCharacteristic>,
}

impl UnitJob {
    pub fn initial_of(&self, stat: StatType) -> i32 {
        self.initial[stat.index()]
    }

    /// Total mastery bonus for one stat across all characteristics.
    pub fn skill_master_bonus(&self, stat: StatType) -> i32 {
        self.characteristics
            .iter()
            .flat_map(|ch| ch.bonuses.iter())
            .filter(|b| b.stat == Some(stat))
            .map(|b| b.plus_value)
            .sum()
    }

    pub fn skills(&self) -> impl Iterator<Item = &Rc<Skill>> {
        self.characteristics.iter().map(|ch| &ch.skill)
    }
}

/// Tag memberships that grant relationship-gear categories.
const TAG_CATEGORY_GRANTS: &[(UnitTagKind, i32, SkillAwakeCategory)] = &[
    (UnitTagKind::Large, 2, SkillAwakeCategory::SchoolGear),
    (UnitTagKind::Large, 4, SkillAwakeCategory::Trust),
    (UnitTagKind::Large, 5, SkillAwakeCategory::GenericRs),
    (UnitTagKind::Large, 7, SkillAwakeCategory::GenericRs),
    (UnitTagKind::Small, 10, SkillAwakeCategory::HarmoniaRs),
    (UnitTagKind::Small, 11, SkillAwakeCategory::ChaosRs),
    (UnitTagKind::Small, 12, SkillAwakeCategory::TreisemaRs),
    (UnitTagKind::Small, 13, SkillAwakeCategory::TyrhelmRs),
    (UnitTagKind::Small, 16, SkillAwakeCategory::CommandRs),
    (UnitTagKind::Small, 17, SkillAwakeCategory::IntegralGear),
    (UnitTagKind::Small, 18, SkillAwakeCategory::ImitateGear),
];

/// One unit form with everything resolved: stats for every type, jobs for
/// every class-change slot, tags, skills and the evolution predecessor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitData {
    pub id: i32,
    /// Shared by rarity and artwork variants of the same unit.
    pub same_character_id: i32,
    /// Shared by all versions of the same character.
    pub character_id: i32,
    pub resource_id: i32,
    pub jp_name: String,
    pub eng_name: String,
    pub element: Element,
    pub gear_kind: GearKind,
    pub level: Level,
    /// Rarity star count.
    pub stars: i32,
    pub job: Rc<UnitJob>,
    pub cost: i32,
    pub is_awakened: bool,
    pub can_equip_all_rs: bool,
    pub stats: UnitStats,
    pub cc: BTreeMap<ClassChangeType, Rc<UnitJob>>,
    /// Sorted by (kind, id).
    pub tags: Vec<UnitTag>,
    pub skills: UnitSkills,
    pub published_at: Option<NaiveDate>,
    pub evolved_from: Option<Rc<UnitData>>,
    pub can_evolve: bool,
}

impl UnitData {
    /// English name when present, JP otherwise.
    pub fn any_name(&self) -> &str {
        if self.eng_name.is_empty() {
            &self.jp_name
        } else {
            &self.eng_name
        }
    }

    pub fn stars_label(&self) -> String {
        format!("{}★", self.stars)
    }

    /// Star label qualified by the unit's place in its evolution chain.
    pub fn qualifier(&self) -> String {
        if self.is_awakened {
            format!("{} Awakened", self.stars_label())
        } else if self
            .evolved_from
            .as_ref()
            .is_some_and(|prev| prev.stars == self.stars)
        {
            format!("{}+", self.stars_label())
        } else {
            self.stars_label()
        }
    }

    /// Dupe-value bonuses are type-independent, so any variant answers.
    pub fn has_ud(&self) -> bool {
        self.stats.of(super::UnitType::Bal).has_ud()
    }

    /// Stats under the given class-change slot, or `None` when the unit has
    /// no such slot. Vertex 3 requires mastering both vertex 1 and 2, so its
    /// stats include their mastery bonuses as well.
    pub fn cc_stats(&self, cc: ClassChangeType) -> Option<UnitStats> {
        if cc == ClassChangeType::Normal {
            return Some(self.stats.clone());
        }
        let job = self.cc.get(&cc)?;
        let extras: Vec<&UnitJob> = if cc == ClassChangeType::Vertex3 {
            [ClassChangeType::Vertex1, ClassChangeType::Vertex2]
                .iter()
                .filter_map(|slot| self.cc.get(slot).map(Rc::as_ref))
                .collect()
        } else {
            Vec::new()
        };
        Some(self.stats.with_job(job, &extras))
    }

    /// Relationship-gear categories this unit can equip.
    ///
    /// Units without a relationship skill can equip none. Otherwise the
    /// categories follow from tag memberships, with two closing rules: the
    /// all-gear flag grants every non-exclusive category, and owning any
    /// non-exclusive category implies the generic one.
    pub fn equipable_categories(&self) -> BTreeSet<SkillAwakeCategory> {
        if self.skills.relationship.is_none() {
            return BTreeSet::new();
        }

        let mut cats = if self.can_equip_all_rs {
            SkillAwakeCategory::all_gear_hack()
        } else {
            BTreeSet::new()
        };

        let tags: BTreeSet<(UnitTagKind, i32)> = self.tags.iter().map(UnitTag::iid).collect();
        for (kind, id, category) in TAG_CATEGORY_GRANTS {
            if tags.contains(&(*kind, *id)) {
                cats.insert(*category);
            }
        }

        if !cats.is_disjoint(&SkillAwakeCategory::all_gear_hack()) {
            cats.insert(SkillAwakeCategory::GenericRs);
        }

        cats
    }
}

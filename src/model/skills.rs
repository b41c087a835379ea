//! Skill model and the relationship-gear category system.

use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use serde::Serialize;

use super::{Element, UnitType};

/// From the game-side skill type enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SkillType {
    Unknown = -1,
    Command = 1,
    Release = 2,
    Passive = 3,
    Duel = 4,
    Magic = 5,
    Leader = 6,
    Item = 7,
    Enemy = 8,
    Ailment = 9,
    Growth = 10,
    AttackClass = 11,
    AttackElement = 12,
    AttackMethod = 13,
    Call = 14,
    Sea = 15,
}

impl SkillType {
    pub fn from_code(code: i32) -> Option<SkillType> {
        match code {
            1 => Some(SkillType::Command),
            2 => Some(SkillType::Release),
            3 => Some(SkillType::Passive),
            4 => Some(SkillType::Duel),
            5 => Some(SkillType::Magic),
            6 => Some(SkillType::Leader),
            7 => Some(SkillType::Item),
            8 => Some(SkillType::Enemy),
            9 => Some(SkillType::Ailment),
            10 => Some(SkillType::Growth),
            11 => Some(SkillType::AttackClass),
            12 => Some(SkillType::AttackElement),
            13 => Some(SkillType::AttackMethod),
            14 => Some(SkillType::Call),
            15 => Some(SkillType::Sea),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SkillGenre {
    Attack = 1,
    Heal = 2,
    Buff = 3,
    Debuff = 4,
    Ailment = 5,
    Defense = 6,
    Growth = 7,
    Move = 8,
}

impl SkillGenre {
    pub fn from_code(code: i32) -> Option<SkillGenre> {
        match code {
            1 => Some(SkillGenre::Attack),
            2 => Some(SkillGenre::Heal),
            3 => Some(SkillGenre::Buff),
            4 => Some(SkillGenre::Debuff),
            5 => Some(SkillGenre::Ailment),
            6 => Some(SkillGenre::Defense),
            7 => Some(SkillGenre::Growth),
            8 => Some(SkillGenre::Move),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SkillTarget {
    Myself = 1,
    PlayerRange = 2,
    PlayerSingle = 3,
    EnemySingle = 4,
    EnemyRange = 5,
    DeadPlayerSingle = 6,
    ComplexSingle = 7,
    ComplexRange = 8,
    PanelSingle = 9,
}

impl SkillTarget {
    pub fn from_code(code: i32) -> Option<SkillTarget> {
        match code {
            1 => Some(SkillTarget::Myself),
            2 => Some(SkillTarget::PlayerRange),
            3 => Some(SkillTarget::PlayerSingle),
            4 => Some(SkillTarget::EnemySingle),
            5 => Some(SkillTarget::EnemyRange),
            6 => Some(SkillTarget::DeadPlayerSingle),
            7 => Some(SkillTarget::ComplexSingle),
            8 => Some(SkillTarget::ComplexRange),
            9 => Some(SkillTarget::PanelSingle),
            _ => None,
        }
    }
}

/// Relationship-gear category of an awake skill.
///
/// Codes 1 (none) and 2 (dress, unused by any unit) carry no category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SkillAwakeCategory {
    Trust = 3,
    GenericRs = 4,
    ChaosRs = 5,
    HarmoniaRs = 6,
    TreisemaRs = 7,
    TyrhelmRs = 8,
    CommandRs = 9,
    IntegralGear = 10,
    SchoolGear = 11,
    ImitateGear = 12,
    FourthRagnarok = 13,
}

impl SkillAwakeCategory {
    pub const ALL: [SkillAwakeCategory; 11] = [
        SkillAwakeCategory::Trust,
        SkillAwakeCategory::GenericRs,
        SkillAwakeCategory::ChaosRs,
        SkillAwakeCategory::HarmoniaRs,
        SkillAwakeCategory::TreisemaRs,
        SkillAwakeCategory::TyrhelmRs,
        SkillAwakeCategory::CommandRs,
        SkillAwakeCategory::IntegralGear,
        SkillAwakeCategory::SchoolGear,
        SkillAwakeCategory::ImitateGear,
        SkillAwakeCategory::FourthRagnarok,
    ];

    pub fn from_code(code: i32) -> Option<SkillAwakeCategory> {
        match code {
            3 => Some(SkillAwakeCategory::Trust),
            4 => Some(SkillAwakeCategory::GenericRs),
            5 => Some(SkillAwakeCategory::ChaosRs),
            6 => Some(SkillAwakeCategory::HarmoniaRs),
            7 => Some(SkillAwakeCategory::TreisemaRs),
            8 => Some(SkillAwakeCategory::TyrhelmRs),
            9 => Some(SkillAwakeCategory::CommandRs),
            10 => Some(SkillAwakeCategory::IntegralGear),
            11 => Some(SkillAwakeCategory::SchoolGear),
            12 => Some(SkillAwakeCategory::ImitateGear),
            13 => Some(SkillAwakeCategory::FourthRagnarok),
            _ => None,
        }
    }

    /// Categories granted wholesale to units that can equip any
    /// relationship gear: everything except the two exclusive ones.
    pub fn all_gear_hack() -> BTreeSet<SkillAwakeCategory> {
        Self::ALL
            .into_iter()
            .filter(|c| {
                !matches!(
                    c,
                    SkillAwakeCategory::Trust | SkillAwakeCategory::SchoolGear
                )
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub struct SkillDesc {
    pub name: String,
    pub full: String,
    pub short: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skill {
    pub id: i32,
    pub skill_type: SkillType,
    pub desc: SkillDesc,
    pub max_lv: i32,
    pub genres: Vec<SkillGenre>,
    pub target: Option<SkillTarget>,
    pub element: Element,
    pub category: Option<SkillAwakeCategory>,
    pub use_count: i32,
    pub cooldown_turns: i32,
    pub max_use_per_quest: i32,
    pub min_range: i32,
    pub max_range: i32,
    pub weight: i32,
    pub power: i32,
    pub hp_cost: i32,
    pub resource_id: i32,
}

impl Skill {
    /// Display range, or `None` for rangeless skills.
    pub fn range(&self) -> Option<String> {
        if self.min_range == 0 || self.max_range == 0 {
            return None;
        }
        if self.min_range == self.max_range {
            Some(self.min_range.to_string())
        } else {
            Some(format!("{}-{}", self.min_range, self.max_range))
        }
    }
}

/// Upgrade of one skill into another at a level threshold, per unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillEvo {
    pub unit_id: i32,
    pub from_skill: Rc<Skill>,
    pub to_skill: Rc<Skill>,
    pub req_level: i32,
}

/// Overkiller skill, unlocked at a dupe-value threshold per character.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OvkSkill {
    pub same_character_id: i32,
    pub skill: Rc<Skill>,
    pub req_dv: i32,
}

/// Every skill attached to one unit.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UnitSkills {
    pub relationship: Option<Rc<Skill>>,
    pub leader: Option<Rc<Skill>>,
    /// Multi duel skill.
    pub intimate: Option<Rc<Skill>>,
    /// Multi duel skill gated behind a character quest.
    pub harmony: Option<Rc<Skill>>,
    /// Skills granted only to one type variant.
    pub types: HashMap<UnitType, Rc<Skill>>,
    /// Per-unit skill upgrades, keyed by the source skill id.
    pub evolutions: HashMap<i32, SkillEvo>,
    pub cq: Vec<Rc<Skill>>,
    pub native: Vec<Rc<Skill>>,
    pub ovk: Option<OvkSkill>,
}

impl UnitSkills {
    /// Character-quest skills followed by native skills.
    pub fn basic(&self) -> impl Iterator<Item = &Rc<Skill>> {
        self.cq.iter().chain(self.native.iter())
    }

    pub fn multi_skill(&self) -> Option<&Rc<Skill>> {
        self.intimate.as_ref().or(self.harmony.as_ref())
    }
}

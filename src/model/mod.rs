//! Composed domain model: what the game data means, independent of the wire
//! format it arrives in.
//!
//! Numeric codes from the binary tables become closed enums here. Codes that
//! fall outside an enum decode to `None` at the seam (logged by the repos);
//! the model never carries raw unmapped numbers.

mod skills;
mod stats;
mod tags;
mod unit;

pub use skills::*;
pub use stats::*;
pub use tags::*;
pub use unit::*;

use serde::Serialize;

/// The eight unit stats.
///
/// The display names are the game-facing abbreviations; the wire tables use
/// different internal names (MGC is stored as "intelligence", GRD as
/// "vitality" and so on), which the row accessors translate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum StatType {
    Hp,
    Str,
    Mgc,
    Grd,
    Spr,
    Spd,
    Tec,
    Lck,
}

impl StatType {
    pub const ALL: [StatType; 8] = [
        StatType::Hp,
        StatType::Str,
        StatType::Mgc,
        StatType::Grd,
        StatType::Spr,
        StatType::Spd,
        StatType::Tec,
        StatType::Lck,
    ];

    /// Position in [`StatType::ALL`], used to index per-stat arrays.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Stat-distribution variant of a unit. Every unit exists in all six types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum UnitType {
    Bal = 1,
    Vit = 2,
    Str = 3,
    Mgc = 4,
    Grd = 5,
    Dex = 6,
}

impl UnitType {
    pub const ALL: [UnitType; 6] = [
        UnitType::Bal,
        UnitType::Vit,
        UnitType::Str,
        UnitType::Mgc,
        UnitType::Grd,
        UnitType::Dex,
    ];

    pub fn index(self) -> usize {
        self as usize - 1
    }

    pub fn from_code(code: i32) -> Option<UnitType> {
        match code {
            1 => Some(UnitType::Bal),
            2 => Some(UnitType::Vit),
            3 => Some(UnitType::Str),
            4 => Some(UnitType::Mgc),
            5 => Some(UnitType::Grd),
            6 => Some(UnitType::Dex),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Element of a unit or skill. `None` marks non-combat or placeholder data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Element {
    None = 1,
    Fire = 2,
    Wind = 3,
    Thunder = 4,
    Ice = 5,
    Earth = 6,
    Light = 7,
    Dark = 8,
    Saint = 9,
    Demon = 10,
    Dragon = 11,
    Angel = 12,
    Devil = 13,
    Beast = 14,
    Fairy = 15,
    Princess = 16,
}

impl Element {
    pub fn from_code(code: i32) -> Option<Element> {
        match code {
            1 => Some(Element::None),
            2 => Some(Element::Fire),
            3 => Some(Element::Wind),
            4 => Some(Element::Thunder),
            5 => Some(Element::Ice),
            6 => Some(Element::Earth),
            7 => Some(Element::Light),
            8 => Some(Element::Dark),
            9 => Some(Element::Saint),
            10 => Some(Element::Demon),
            11 => Some(Element::Dragon),
            12 => Some(Element::Angel),
            13 => Some(Element::Devil),
            14 => Some(Element::Beast),
            15 => Some(Element::Fairy),
            16 => Some(Element::Princess),
            _ => None,
        }
    }
}

/// Weapon kind wielded by a unit. Mirrors the game-side enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum GearKind {
    Sword = 1,
    Axe = 2,
    Spear = 3,
    Bow = 4,
    Gun = 5,
    Staff = 6,
    Shield = 7,
    Unique = 8,
    Smith = 9,
    Accessories = 10,
    Drilling = 11,
    SpecialDrilling = 12,
    SeaPresent = 13,
    Magic = 14,
    Dummy = 1001,
    None = 9999,
}

impl GearKind {
    pub fn from_code(code: i32) -> Option<GearKind> {
        match code {
            1 => Some(GearKind::Sword),
            2 => Some(GearKind::Axe),
            3 => Some(GearKind::Spear),
            4 => Some(GearKind::Bow),
            5 => Some(GearKind::Gun),
            6 => Some(GearKind::Staff),
            7 => Some(GearKind::Shield),
            8 => Some(GearKind::Unique),
            9 => Some(GearKind::Smith),
            10 => Some(GearKind::Accessories),
            11 => Some(GearKind::Drilling),
            12 => Some(GearKind::SpecialDrilling),
            13 => Some(GearKind::SeaPresent),
            14 => Some(GearKind::Magic),
            1001 => Some(GearKind::Dummy),
            9999 => Some(GearKind::None),
            _ => None,
        }
    }
}

/// Class-change slot. Only the slots the pattern table actually carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ClassChangeType {
    Normal = 1,
    Vertex1 = 2,
    Vertex2 = 3,
    Vertex3 = 4,
}

impl ClassChangeType {
    pub const ALL: [ClassChangeType; 4] = [
        ClassChangeType::Normal,
        ClassChangeType::Vertex1,
        ClassChangeType::Vertex2,
        ClassChangeType::Vertex3,
    ];
}

//! Static registry of master data tables and their typed records.
//!
//! Each table has a fixed binary schema; the per-table record structs in
//! [`records`] list the fields in exact wire order. The registry is closed:
//! the decoder never discovers tables at runtime.

pub mod records;

use std::fmt;

use crate::binary::{MasterDataReader, MasterDataWriter};
use crate::error::DecodeError;

/// Identifier for every master data table this crate decodes.
///
/// The variant name matches the payload name in the data snapshot, so
/// [`Table::name`] doubles as the file stem for directory-backed sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    UnitUnit,
    UnitUnitParameter,
    UnitInitialParam,
    UnitJob,
    UnitTypeParameter,
    UnitEvolutionPattern,
    ComposeMaxUnityValueSetting,
    UnitRarity,
    GearKind,
    UnitSkill,
    UnitLeaderSkill,
    UnitSkillCharacterQuest,
    UnitSkillAwake,
    UnitSkillIntimate,
    UnitSkillHarmonyQuest,
    UnitSkillEvolution,
    BattleskillSkill,
    JobChangePatterns,
    JobCharacteristics,
    UnitGroup,
    UnitGroupLargeCategory,
    UnitGroupSmallCategory,
    UnitGroupClothingCategory,
    UnitGroupGenerationCategory,
    OverkillersSkillRelease,
}

/// Every table in the registry, in snapshot order.
pub const ALL_TABLES: &[Table] = &[
    Table::UnitUnit,
    Table::UnitUnitParameter,
    Table::UnitInitialParam,
    Table::UnitJob,
    Table::UnitTypeParameter,
    Table::UnitEvolutionPattern,
    Table::ComposeMaxUnityValueSetting,
    Table::UnitRarity,
    Table::GearKind,
    Table::UnitSkill,
    Table::UnitLeaderSkill,
    Table::UnitSkillCharacterQuest,
    Table::UnitSkillAwake,
    Table::UnitSkillIntimate,
    Table::UnitSkillHarmonyQuest,
    Table::UnitSkillEvolution,
    Table::BattleskillSkill,
    Table::JobChangePatterns,
    Table::JobCharacteristics,
    Table::UnitGroup,
    Table::UnitGroupLargeCategory,
    Table::UnitGroupSmallCategory,
    Table::UnitGroupClothingCategory,
    Table::UnitGroupGenerationCategory,
    Table::OverkillersSkillRelease,
];

impl Table {
    /// Snapshot name of the table, also used as the payload file stem.
    pub fn name(self) -> &'static str {
        match self {
            Table::UnitUnit => "UnitUnit",
            Table::UnitUnitParameter => "UnitUnitParameter",
            Table::UnitInitialParam => "UnitInitialParam",
            Table::UnitJob => "UnitJob",
            Table::UnitTypeParameter => "UnitTypeParameter",
            Table::UnitEvolutionPattern => "UnitEvolutionPattern",
            Table::ComposeMaxUnityValueSetting => "ComposeMaxUnityValueSetting",
            Table::UnitRarity => "UnitRarity",
            Table::GearKind => "GearKind",
            Table::UnitSkill => "UnitSkill",
            Table::UnitLeaderSkill => "UnitLeaderSkill",
            Table::UnitSkillCharacterQuest => "UnitSkillCharacterQuest",
            Table::UnitSkillAwake => "UnitSkillAwake",
            Table::UnitSkillIntimate => "UnitSkillIntimate",
            Table::UnitSkillHarmonyQuest => "UnitSkillHarmonyQuest",
            Table::UnitSkillEvolution => "UnitSkillEvolution",
            Table::BattleskillSkill => "BattleskillSkill",
            Table::JobChangePatterns => "JobChangePatterns",
            Table::JobCharacteristics => "JobCharacteristics",
            Table::UnitGroup => "UnitGroup",
            Table::UnitGroupLargeCategory => "UnitGroupLargeCategory",
            Table::UnitGroupSmallCategory => "UnitGroupSmallCategory",
            Table::UnitGroupClothingCategory => "UnitGroupClothingCategory",
            Table::UnitGroupGenerationCategory => "UnitGroupGenerationCategory",
            Table::OverkillersSkillRelease => "OverkillersSkillRelease",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed row of one master data table.
///
/// `decode` reads exactly the fields the table declares, in wire order;
/// `encode` writes them back so that re-encoding a decoded payload is
/// byte-identical.
pub trait Record: Sized {
    const TABLE: Table;

    fn decode(reader: &mut MasterDataReader<'_>) -> Result<Self, DecodeError>;

    fn encode(&self, writer: &mut MasterDataWriter);
}

/// Decode every row of a payload.
///
/// Rows are read back to back until the cursor reaches the declared end; a
/// row straddling the declared end is a schema mismatch and fatal.
pub fn decode_all<T: Record>(bytes: &[u8]) -> Result<Vec<T>, DecodeError> {
    let mut reader = MasterDataReader::new(bytes)?;
    let mut rows = Vec::new();
    while reader.offset() < reader.declared_end() {
        rows.push(T::decode(&mut reader)?);
        if reader.offset() > reader.declared_end() {
            return Err(DecodeError::Overrun {
                offset: reader.offset(),
                declared: reader.declared_end(),
            });
        }
    }
    Ok(rows)
}

/// Encode rows into a complete payload, header included.
pub fn encode_all<T: Record>(rows: &[T]) -> Vec<u8> {
    let mut writer = MasterDataWriter::new();
    for row in rows {
        row.encode(&mut writer);
    }
    writer.finish()
}

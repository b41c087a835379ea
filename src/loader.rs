//! Top-level loader: one call per unit, everything resolved.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::rc::Rc;

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use crate::error::{MasterDataError, Result};
use crate::model::{Element, GearKind, Skill, TagConfig, UnitData, UnitTagKind};
use crate::repository::{MasterDataRepo, MasterDataSource};
use crate::repos::{CcRepo, JobsRepo, SkillsRepo, StatsRepo, TagRepo};
use crate::schema::records::{UnitEvolutionPatternRow, UnitRarityRow, UnitRow};
use crate::schema::Table;

/// Skills whose presence pins down a unit's element. Fixed list, straight
/// from the game client.
const ELEMENTAL_SKILLS_IDS: [i32; 7] = [
    490000010, 490000013, 490000015, 490000017, 490000019, 490000021, 490000173,
];

/// Unit id blocks that never contain playable units: enemies, structures,
/// consumables and other filler sharing the unit table.
const NON_PLAYABLE_ID_RANGES: &[Range<i32>] = &[
    700_000..999_999,         // OG misc
    1_000_000..1_999_999,     // Earth males
    2_700_000..2_999_999,     // PoL misc
    3_700_000..3_999_999,     // LR misc
    4_700_000..4_999_999,     // extra art misc
    5_700_000..5_999_999,     // IN misc
    7_000_000..7_999_999,     // Taga enemies
    10_000_000..19_999_999,   // Laev enemies
    30_000_000..39_999_999,   // guild structures
    70_000_000..79_999_999,   // memories, cards
    80_000_000..89_999_999,   // innocents
    700_000_000..799_999_999, // male memories
    800_000_000..899_999_999, // male innocents
];

/// Publish dates from this year on are placeholders for unreleased data.
const PLACEHOLDER_YEAR: i32 = 2999;

/// Loads fully composed units from a master data snapshot.
///
/// All tables are decoded lazily (once each) during construction of the
/// internal repos; loaded units are cached, so repeated lookups and the
/// evolution recursion hit already-built aggregates.
pub struct Loader {
    units: HashMap<i32, UnitRow>,
    rarities: HashMap<i32, UnitRarityRow>,
    evo_source: HashMap<i32, i32>,
    evo_sources: HashSet<i32>,
    skills: SkillsRepo,
    jobs: Rc<JobsRepo>,
    stats: StatsRepo,
    tags: TagRepo,
    cc: CcRepo,
    cache: RefCell<HashMap<i32, Rc<UnitData>>>,
    loading: RefCell<HashSet<i32>>,
}

impl Loader {
    pub fn new(source: Box<dyn MasterDataSource>) -> Result<Loader> {
        Loader::with_config(source, TagConfig::builtin())
    }

    pub fn with_config(source: Box<dyn MasterDataSource>, config: TagConfig) -> Result<Loader> {
        let repo = MasterDataRepo::new(source);
        let skills = SkillsRepo::new(&repo)?;
        let jobs = Rc::new(JobsRepo::new(&repo, &skills)?);
        let stats = StatsRepo::new(&repo, jobs.clone())?;
        let tags = TagRepo::new(&repo, config)?;
        let cc = CcRepo::new(&repo, jobs.clone())?;

        let evo_rows = repo.read::<UnitEvolutionPatternRow>()?;
        let evo_source = evo_rows
            .iter()
            .map(|p| (p.target_unit_id, p.unit_id))
            .collect();
        let evo_sources = evo_rows.iter().map(|p| p.unit_id).collect();

        Ok(Loader {
            units: repo.index(|r: &UnitRow| r.id)?,
            rarities: repo.index(|r: &UnitRarityRow| r.id)?,
            evo_source,
            evo_sources,
            skills,
            jobs,
            stats,
            tags,
            cc,
            cache: RefCell::new(HashMap::new()),
            loading: RefCell::new(HashSet::new()),
        })
    }

    /// Load one unit. Evolution sources are loaded (and cached) along the
    /// way for the evo bonus chain.
    pub fn unit(&self, unit_id: i32) -> Result<Rc<UnitData>> {
        if let Some(hit) = self.cache.borrow().get(&unit_id) {
            return Ok(hit.clone());
        }
        if !self.loading.borrow_mut().insert(unit_id) {
            return Err(MasterDataError::EvolutionCycle { unit_id });
        }
        let result = self.build_unit(unit_id);
        self.loading.borrow_mut().remove(&unit_id);
        let unit = Rc::new(result?);
        self.cache.borrow_mut().insert(unit_id, unit.clone());
        Ok(unit)
    }

    /// All playable units, in ascending id order.
    ///
    /// Skips the known non-playable id blocks, element-less oddities mixed
    /// into the playable ranges, and units with placeholder publish dates.
    pub fn playable_units(&self) -> impl Iterator<Item = Result<Rc<UnitData>>> + '_ {
        let mut ids: Vec<i32> = self
            .units
            .keys()
            .copied()
            .filter(|id| is_playable_id(*id))
            .collect();
        ids.sort_unstable();
        ids.into_iter().filter_map(move |id| match self.unit(id) {
            Ok(unit) => {
                if unit.element == Element::None {
                    return None;
                }
                if unit
                    .published_at
                    .is_some_and(|d| d.year() >= PLACEHOLDER_YEAR)
                {
                    return None;
                }
                Some(Ok(unit))
            }
            Err(e) => Some(Err(e)),
        })
    }

    fn build_unit(&self, unit_id: i32) -> Result<UnitData> {
        let row = self
            .units
            .get(&unit_id)
            .ok_or_else(|| MasterDataError::missing_row(Table::UnitUnit, unit_id))?;

        let evolved_from = match self.evo_source.get(&unit_id) {
            Some(&source_id) => Some(self.unit(source_id)?),
            None => None,
        };

        let skills = self.skills.skills_of(row)?;
        let tags = self.tags.tags_of(row)?;
        let can_equip_all_rs = tags
            .iter()
            .any(|t| t.iid() == (UnitTagKind::Small, 2));

        let gear_kind = GearKind::from_code(row.kind_id).unwrap_or_else(|| {
            warn!(unit_id, code = row.kind_id, "unmapped gear kind");
            GearKind::None
        });
        let stars = self
            .rarities
            .get(&row.rarity_id)
            .ok_or_else(|| MasterDataError::missing_row(Table::UnitRarity, row.rarity_id))?
            .index;

        Ok(UnitData {
            id: unit_id,
            same_character_id: row.same_character_id,
            character_id: row.character_id,
            resource_id: row.resource_reference_unit_id,
            jp_name: row.name.clone(),
            eng_name: row.english_name.clone(),
            element: infer_element(skills.basic()),
            gear_kind,
            level: self.stats.level_of(row)?,
            stars,
            job: self.jobs.job(row.job_id)?,
            cost: row.cost,
            is_awakened: row.awake_unit_flag,
            can_equip_all_rs,
            stats: self.stats.stats_of(row)?,
            cc: self.cc.unit_cc(unit_id)?,
            tags,
            skills: (*skills).clone(),
            published_at: parse_publish_date(unit_id, row.published_at.as_deref()),
            evolved_from,
            can_evolve: self.evo_sources.contains(&unit_id),
        })
    }
}

fn is_playable_id(unit_id: i32) -> bool {
    !NON_PLAYABLE_ID_RANGES
        .iter()
        .any(|r| r.contains(&unit_id))
}

fn infer_element<'a>(basic: impl Iterator<Item = &'a Rc<Skill>>) -> Element {
    for skill in basic {
        if ELEMENTAL_SKILLS_IDS.contains(&skill.id) {
            return skill.element;
        }
    }
    Element::None
}

/// Publish timestamps arrive as "YYYY-MM-DD HH:MM:SS"; only the date part
/// matters. Unparseable values are logged and dropped rather than failing
/// the unit.
fn parse_publish_date(unit_id: i32, raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    let date_part = raw.get(..10).unwrap_or(raw);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            warn!(unit_id, raw, "unparseable publish date");
            None
        }
    }
}

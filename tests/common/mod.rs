//! Shared synthetic snapshot for integration tests.
//!
//! The payloads are encoded with the crate's own writer and cover a small
//! but internally consistent world:
//!
//! - 100114: growth reference unit (distinct level-up corrections per stat)
//! - 300433 -> 300434 -> 300435: evolution chain ending in an awakened form
//! - 603013: class-change unit with mastery bonuses and dupe-value bonuses
//! - 100653 / 2602513: tag-driven equip eligibility
//! - 100200 / 100300 / 1500000: non-playable for three different reasons
//! - 900433 <-> 900434: defective cyclic evolution pair (non-playable ids)

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use once_cell::sync::Lazy;

use potk_masterdata::repository::MasterDataSource;
use potk_masterdata::schema::records::*;
use potk_masterdata::schema::{encode_all, Table};

pub static FIXTURE: Lazy<HashMap<Table, Vec<u8>>> = Lazy::new(build_fixture);

/// Source serving the shared fixture and counting fetches.
pub struct MemorySource {
    tables: HashMap<Table, Vec<u8>>,
    reads: Rc<Cell<usize>>,
}

impl MemorySource {
    pub fn new() -> (MemorySource, Rc<Cell<usize>>) {
        let reads = Rc::new(Cell::new(0));
        let source = MemorySource {
            tables: FIXTURE.clone(),
            reads: reads.clone(),
        };
        (source, reads)
    }
}

impl MasterDataSource for MemorySource {
    fn bytes_for(&self, table: Table) -> anyhow::Result<Vec<u8>> {
        self.reads.set(self.reads.get() + 1);
        self.tables
            .get(&table)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no payload for {table}"))
    }
}

// =============================================================================
// Units
// =============================================================================

fn unit(id: i32, rarity_id: i32) -> UnitRow {
    UnitRow {
        id,
        name: format!("ユニット{id}"),
        english_name: format!("Unit {id}"),
        parameter_data_id: id,
        published_at: Some("2019-04-23 15:00:00".to_owned()),
        same_character_id: id,
        character_id: id,
        resource_reference_unit_id: id,
        rarity_id,
        cost: 20,
        job_id: 603,
        kind_id: 1,
        ..Default::default()
    }
}

fn unit_rows() -> Vec<UnitRow> {
    let mut growth_ref = unit(100114, 990);
    growth_ref.kind_id = 2;

    let elementless = unit(100200, 990);

    let mut placeholder = unit(100300, 990);
    placeholder.published_at = Some("2999-12-31 00:00:00".to_owned());

    // Distinct character keys: the relationship skill joins on the
    // same-character id, the harmony skill on the character id.
    let mut school = unit(100653, 990);
    school.same_character_id = 100650;

    let base = unit(300433, 803);
    let evolved = unit(300434, 991);
    let mut awakened = unit(300435, 991);
    awakened.awake_unit_flag = true;

    let mut cc_unit = unit(603013, 990);
    cc_unit.compose_max_unity_value_setting_id = 6001;

    let mut collabless = unit(2602513, 990);
    collabless.exist_overkillers_skill = true;

    let range_excluded = unit(1_500_000, 990);

    vec![
        growth_ref,
        elementless,
        placeholder,
        school,
        base,
        evolved,
        awakened,
        cc_unit,
        collabless,
        range_excluded,
        unit(900433, 990),
        unit(900434, 990),
    ]
}

fn initial(id: i32, base: i32) -> UnitInitialParamRow {
    UnitInitialParamRow {
        id,
        hp_initial: base,
        strength_initial: base,
        vitality_initial: base,
        intelligence_initial: base,
        mind_initial: base,
        agility_initial: base,
        dexterity_initial: base,
        lucky_initial: base,
        level_max: 99,
    }
}

fn initial_rows() -> Vec<UnitInitialParamRow> {
    let mut cc_unit = initial(603013, 10);
    cc_unit.hp_initial = 100;
    cc_unit.intelligence_initial = 15;
    vec![
        initial(100114, 50),
        initial(100200, 50),
        initial(100300, 50),
        initial(100653, 50),
        initial(300433, 40),
        initial(300434, 45),
        initial(300435, 45),
        cc_unit,
        initial(2602513, 50),
        initial(900433, 40),
        initial(900434, 40),
    ]
}

fn params(id: i32, max: i32) -> UnitParameterRow {
    UnitParameterRow {
        id,
        initial_max_level: 60,
        breakthrough_limit: 4,
        level_per_breakthrough: 5,
        hp_max: max,
        strength_max: max,
        vitality_max: max,
        intelligence_max: max,
        mind_max: max,
        agility_max: max,
        dexterity_max: max,
        lucky_max: max,
        ..Default::default()
    }
}

fn param_rows() -> Vec<UnitParameterRow> {
    // The growth reference carries distinct per-stat maxima matching the
    // expected values under the DEX-type corrections.
    let mut growth_ref = params(100114, 0);
    growth_ref.hp_max = 80;
    growth_ref.strength_max = 60;
    growth_ref.intelligence_max = 64;
    growth_ref.vitality_max = 32;
    growth_ref.mind_max = 24;
    growth_ref.agility_max = 46;
    growth_ref.dexterity_max = 64;
    growth_ref.lucky_max = 40;

    let mut cc_unit = params(603013, 50);
    cc_unit.initial_max_level = 70;

    vec![
        growth_ref,
        params(100200, 50),
        params(100300, 50),
        params(100653, 50),
        params(300433, 50),
        params(300434, 55),
        params(300435, 55),
        cc_unit,
        params(2602513, 50),
        params(900433, 50),
        params(900434, 50),
    ]
}

// =============================================================================
// Types, rarities, evolution, dupe value
// =============================================================================

fn type_param(id: i32, rarity_id: i32, unit_type: i32) -> UnitTypeParameterRow {
    UnitTypeParameterRow {
        id,
        unit_type,
        rarity_id,
        ..Default::default()
    }
}

fn type_param_rows() -> Vec<UnitTypeParameterRow> {
    let mut rows = Vec::new();
    let mut next_id = 1;
    for rarity_id in [803, 990, 991] {
        for unit_type in 1..=6 {
            let mut row = type_param(next_id, rarity_id, unit_type);
            if rarity_id == 990 && unit_type == 6 {
                // DEX-type corrections. The dexterity adjust has four
                // decimals, so it survives the growth rounding intact.
                row.vitality_levelup_max_correction = 0.5;
                row.mind_levelup_max_correction = 0.125;
                row.agility_levelup_max_correction = 0.5;
                row.dexterity_levelup_max_correction = 0.1407;
            }
            rows.push(row);
            next_id += 1;
        }
    }
    rows
}

fn rarity_rows() -> Vec<UnitRarityRow> {
    let rarity = |id, index| UnitRarityRow {
        id,
        name: format!("星{index}"),
        index,
        ..Default::default()
    };
    vec![rarity(803, 5), rarity(990, 6), rarity(991, 6)]
}

fn evolution_rows() -> Vec<UnitEvolutionPatternRow> {
    vec![
        UnitEvolutionPatternRow {
            id: 1,
            unit_id: 300433,
            target_unit_id: 300434,
            threshold_level: 30,
            money: 50000,
        },
        UnitEvolutionPatternRow {
            id: 2,
            unit_id: 300434,
            target_unit_id: 300435,
            threshold_level: 99,
            money: 0,
        },
        // Deliberately cyclic pair for the cycle-guard tests.
        UnitEvolutionPatternRow {
            id: 3,
            unit_id: 900433,
            target_unit_id: 900434,
            threshold_level: 30,
            money: 0,
        },
        UnitEvolutionPatternRow {
            id: 4,
            unit_id: 900434,
            target_unit_id: 900433,
            threshold_level: 30,
            money: 0,
        },
    ]
}

fn compose_setting_rows() -> Vec<ComposeSettingRow> {
    vec![ComposeSettingRow {
        id: 6001,
        hp_compose_add_max: Some("10,20,30".to_owned()),
        strength_compose_add_max: Some(String::new()),
        name: "結晶".to_owned(),
        ..Default::default()
    }]
}

// =============================================================================
// Jobs
// =============================================================================

fn job_rows() -> Vec<UnitJobRow> {
    let plain = UnitJobRow {
        id: 603,
        name: "ナイト".to_owned(),
        movement: 3,
        new_cost: 10,
        ..Default::default()
    };
    let vertex = UnitJobRow {
        id: 613,
        name: "ロイヤルナイト".to_owned(),
        movement: 3,
        new_cost: 12,
        hp_initial: 30,
        intelligence_initial: 8,
        characteristics_ids: Some("7001".to_owned()),
        ..Default::default()
    };
    vec![plain, vertex]
}

fn characteristic_rows() -> Vec<JobCharacteristicsRow> {
    vec![JobCharacteristicsRow {
        id: 7001,
        skill_id: 500001,
        levelmax_bonus: 1,
        levelmax_bonus_value: 100,
        levelmax_bonus2: 7,
        levelmax_bonus_value2: 10,
        ..Default::default()
    }]
}

fn cc_pattern_rows() -> Vec<JobChangePatternRow> {
    vec![JobChangePatternRow {
        id: 1,
        unit_id: 603013,
        job_id: 603,
        job2_id: 613,
        ..Default::default()
    }]
}

// =============================================================================
// Skills
// =============================================================================

fn skill(id: i32, skill_type: i32, element: i32) -> BattleSkillRow {
    BattleSkillRow {
        id,
        name: format!("スキル{id}"),
        skill_type,
        element,
        target_type: 1,
        upper_level: 1,
        ..Default::default()
    }
}

fn skill_rows() -> Vec<BattleSkillRow> {
    let mut relationship = skill(500002, 2, 1);
    relationship.awake_skill_category = 4;
    vec![
        skill(490000010, 5, 2), // fire elemental marker
        skill(490000013, 5, 3), // wind elemental marker
        skill(500001, 3, 1),    // characteristic passive
        relationship,
        skill(500003, 1, 1), // type-locked skill
        skill(500004, 6, 1), // leader skill
        skill(500005, 1, 1), // character quest skill
        skill(500006, 4, 1), // intimate multi skill
        skill(500007, 4, 1), // harmony multi skill
        skill(500008, 1, 1), // upgrade target / overkiller skill
    ]
}

fn unit_skill_rows() -> Vec<UnitSkillRow> {
    let link = |id, unit_id, skill_id, unit_type| UnitSkillRow {
        id,
        unit_id,
        level: 1,
        skill_id,
        unit_type,
    };
    vec![
        link(1, 100114, 490000010, 0),
        link(2, 100114, 500003, 3),
        link(3, 100300, 490000010, 0),
        link(4, 100653, 490000010, 0),
        link(5, 300433, 490000013, 0),
        link(6, 300434, 490000013, 0),
        link(7, 300435, 490000013, 0),
        link(8, 603013, 490000010, 0),
        link(9, 2602513, 490000010, 0),
    ]
}

fn build_fixture() -> HashMap<Table, Vec<u8>> {
    let mut tables = HashMap::new();
    tables.insert(Table::UnitUnit, encode_all(&unit_rows()));
    tables.insert(Table::UnitUnitParameter, encode_all(&param_rows()));
    tables.insert(Table::UnitInitialParam, encode_all(&initial_rows()));
    tables.insert(Table::UnitJob, encode_all(&job_rows()));
    tables.insert(Table::UnitTypeParameter, encode_all(&type_param_rows()));
    tables.insert(Table::UnitEvolutionPattern, encode_all(&evolution_rows()));
    tables.insert(
        Table::ComposeMaxUnityValueSetting,
        encode_all(&compose_setting_rows()),
    );
    tables.insert(Table::UnitRarity, encode_all(&rarity_rows()));
    tables.insert(
        Table::GearKind,
        encode_all(&[
            GearKindRow {
                id: 1,
                name: "剣".to_owned(),
                is_attack: true,
                ..Default::default()
            },
            GearKindRow {
                id: 2,
                name: "斧".to_owned(),
                is_attack: true,
                ..Default::default()
            },
        ]),
    );
    tables.insert(Table::UnitSkill, encode_all(&unit_skill_rows()));
    tables.insert(
        Table::UnitLeaderSkill,
        encode_all(&[UnitLeaderSkillRow {
            id: 1,
            unit_id: 100114,
            skill_id: 500004,
        }]),
    );
    tables.insert(
        Table::UnitSkillCharacterQuest,
        encode_all(&[UnitCqSkillRow {
            id: 1,
            unit_id: 603013,
            character_quest_id: 9001,
            skill_id: 500005,
            ..Default::default()
        }]),
    );
    tables.insert(
        Table::UnitSkillAwake,
        encode_all(&[
            UnitRsSkillRow {
                id: 1,
                character_id: 100650,
                need_affection: 100.0,
                skill_id: 500002,
            },
            UnitRsSkillRow {
                id: 2,
                character_id: 2602513,
                need_affection: 100.0,
                skill_id: 500002,
            },
        ]),
    );
    tables.insert(
        Table::UnitSkillIntimate,
        encode_all(&[UnitIntimateSkillRow {
            id: 1,
            unit_id: 2602513,
            skill_id: 500006,
        }]),
    );
    tables.insert(
        Table::UnitSkillHarmonyQuest,
        encode_all(&[UnitHqSkillRow {
            id: 1,
            character_id: 100653,
            character_quest_id: 9002,
            skill_id: 500007,
        }]),
    );
    tables.insert(
        Table::UnitSkillEvolution,
        encode_all(&[UnitSkillEvolutionRow {
            id: 1,
            unit_id: 100114,
            before_skill_id: 490000010,
            level: 40,
            after_skill_id: 500008,
        }]),
    );
    tables.insert(Table::BattleskillSkill, encode_all(&skill_rows()));
    tables.insert(Table::JobChangePatterns, encode_all(&cc_pattern_rows()));
    tables.insert(Table::JobCharacteristics, encode_all(&characteristic_rows()));
    tables.insert(
        Table::UnitGroup,
        encode_all(&[
            UnitGroupRow {
                id: 1,
                unit_id: 100653,
                large_category_id: 2,
                ..Default::default()
            },
            UnitGroupRow {
                id: 2,
                unit_id: 2602513,
                large_category_id: 4,
                small_category_id: 10,
                clothing_category_id: 16,
                ..Default::default()
            },
        ]),
    );
    tables.insert(
        Table::UnitGroupLargeCategory,
        encode_all(&[
            LargeCategoryRow {
                id: 2,
                name: "学園".to_owned(),
                short_label_name: "学".to_owned(),
                ..Default::default()
            },
            LargeCategoryRow {
                id: 4,
                name: "ラブ".to_owned(),
                short_label_name: "ラ".to_owned(),
                ..Default::default()
            },
        ]),
    );
    tables.insert(
        Table::UnitGroupSmallCategory,
        encode_all(&[SmallCategoryRow {
            id: 10,
            name: "ハルモニア".to_owned(),
            short_label_name: "ハ".to_owned(),
            ..Default::default()
        }]),
    );
    tables.insert(
        Table::UnitGroupClothingCategory,
        encode_all(&[ClothingCategoryRow {
            id: 16,
            name: "聖".to_owned(),
            short_label_name: "聖".to_owned(),
            ..Default::default()
        }]),
    );
    tables.insert(
        Table::UnitGroupGenerationCategory,
        encode_all::<GenerationCategoryRow>(&[]),
    );
    tables.insert(
        Table::OverkillersSkillRelease,
        encode_all(&[OvkSkillReleaseRow {
            id: 2602513,
            unity_value: 5,
            skill_id: 500008,
        }]),
    );
    tables
}

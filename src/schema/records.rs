//! Typed rows for every registered table, in exact wire field order.
//!
//! The `record!` macro pairs each struct with its [`Record`] impl so that the
//! declared field list is the single source of truth for both decode and
//! encode. Field kinds map one-to-one onto the reader primitives: `int`,
//! `int_opt`, `float`, `bool`, `string` (intern), `string_opt` (intern,
//! nullable) and `date_opt` (nullable raw date string).
//!
//! Foreign keys keep an `_id` suffix; a value of 0 means "no reference" and
//! is interpreted at the join sites, never here.

use serde::Serialize;

use crate::binary::{MasterDataReader, MasterDataWriter};
use crate::error::DecodeError;
use crate::model::StatType;
use crate::schema::{Record, Table};

macro_rules! field_ty {
    (int) => { i32 };
    (int_opt) => { Option<i32> };
    (float) => { f32 };
    (bool) => { bool };
    (string) => { String };
    (string_opt) => { Option<String> };
    (date_opt) => { Option<String> };
}

macro_rules! read_field {
    ($r:expr, int) => { $r.read_i32()? };
    ($r:expr, int_opt) => { $r.read_i32_opt()? };
    ($r:expr, float) => { $r.read_f32()? };
    ($r:expr, bool) => { $r.read_bool()? };
    ($r:expr, string) => { $r.read_string(true)? };
    ($r:expr, string_opt) => { $r.read_string_opt(true)? };
    ($r:expr, date_opt) => { $r.read_date_opt()? };
}

macro_rules! write_field {
    ($w:expr, $v:expr, int) => { $w.write_i32(*$v) };
    ($w:expr, $v:expr, int_opt) => { $w.write_i32_opt(*$v) };
    ($w:expr, $v:expr, float) => { $w.write_f32(*$v) };
    ($w:expr, $v:expr, bool) => { $w.write_bool(*$v) };
    ($w:expr, $v:expr, string) => { $w.write_string($v) };
    ($w:expr, $v:expr, string_opt) => { $w.write_string_opt($v.as_deref()) };
    ($w:expr, $v:expr, date_opt) => { $w.write_string_opt($v.as_deref()) };
}

macro_rules! record {
    (
        $(#[$meta:meta])*
        $name:ident => $table:ident {
            $( $field:ident : $kind:ident ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Default, Serialize)]
        pub struct $name {
            $( pub $field: field_ty!($kind), )*
        }

        impl Record for $name {
            const TABLE: Table = Table::$table;

            fn decode(reader: &mut MasterDataReader<'_>) -> Result<Self, DecodeError> {
                Ok(Self {
                    $( $field: read_field!(reader, $kind), )*
                })
            }

            fn encode(&self, writer: &mut MasterDataWriter) {
                $( write_field!(writer, &self.$field, $kind); )*
            }
        }
    };
}

record! {
    /// One unit form. Evolutions, awakenings and rarity variants of the same
    /// character are separate rows sharing `same_character_id`.
    UnitRow => UnitUnit {
        id: int,
        name: string,
        english_name: string,
        parameter_data_id: int,
        etc_data_id: int,
        published_at: date_opt,
        same_character_id: int,
        character_id: int,
        resource_reference_unit_id: int,
        model_reference_id: int,
        rarity_id: int,
        cost: int,
        job_id: int,
        is_consume_only: int,
        is_evolution_only: int,
        skillup_type: int,
        is_breakthrough_only: int,
        is_buildup_only: int,
        kind_id: int,
        history_group_number: int,
        base_sell_price: int,
        initial_gear_id: int,
        vehicle_model_name: string_opt,
        equip_model_name: string_opt,
        equip_model_b_name: string_opt,
        field_normal_face_material_name: string,
        field_gray_body_material_name: string,
        field_gray_face_material_name: string,
        field_gray_vehicle_material_name: string,
        field_gray_equip_material_name: string,
        field_gray_equip_b_material_name: string,
        duel_model_scale: float,
        field_model_scale: float,
        duel_shadow_scale_x: float,
        duel_shadow_scale_z: float,
        footstep_type_id: int,
        camera_pattern_id: int,
        illust_pattern_id: int,
        cutin_pattern_id: int_opt,
        unit_voice_pattern_id: int,
        non_disp_weapon: int,
        buildup_limit_release_id: int,
        rainbow_on: bool,
        trust_target_flag: bool,
        awake_unit_flag: bool,
        can_awake_unit_flag: bool,
        formal_name: string_opt,
        country_attribute: int_opt,
        inclusion_ip: int_opt,
        magic_warrior_flag: bool,
        awake_special_skill_category_id: int_opt,
        compose_max_unity_value_setting_id: int,
        is_unity_value_up: bool,
        job_characteristics_levelup_pattern: bool,
        exist_overkillers_slot: bool,
        exist_overkillers_skill: bool,
        overkillers_parameter: int,
        expire_date_id: int_opt,
    }
}

record! {
    /// Growth parameters shared by units referencing the same parameter row.
    UnitParameterRow => UnitUnitParameter {
        id: int,
        level_pattern_id: int,
        initial_max_level: int,
        breakthrough_limit: int,
        level_per_breakthrough: int,
        hp_max: int,
        strength_max: int,
        vitality_max: int,
        intelligence_max: int,
        mind_max: int,
        agility_max: int,
        dexterity_max: int,
        lucky_max: int,
        hp_initial: int,
        strength_initial: int,
        vitality_initial: int,
        intelligence_initial: int,
        mind_initial: int,
        agility_initial: int,
        dexterity_initial: int,
        lucky_initial: int,
        hp_compose: int,
        strength_compose: int,
        vitality_compose: int,
        intelligence_compose: int,
        mind_compose: int,
        agility_compose: int,
        dexterity_compose: int,
        lucky_compose: int,
        hp_buildup: int,
        strength_buildup: int,
        vitality_buildup: int,
        intelligence_buildup: int,
        mind_buildup: int,
        agility_buildup: int,
        dexterity_buildup: int,
        lucky_buildup: int,
        buildup_limit: int,
        default_weapon_proficiency: int,
        default_shield_proficiency: int,
    }
}

record! {
    /// Per-unit base stats, keyed by unit id.
    UnitInitialParamRow => UnitInitialParam {
        id: int,
        hp_initial: int,
        strength_initial: int,
        vitality_initial: int,
        intelligence_initial: int,
        mind_initial: int,
        agility_initial: int,
        dexterity_initial: int,
        lucky_initial: int,
        level_max: int,
    }
}

record! {
    UnitJobRow => UnitJob {
        id: int,
        name: string,
        flavor: string,
        move_type_id: int,
        movement: int,
        hp_initial: int,
        strength_initial: int,
        vitality_initial: int,
        intelligence_initial: int,
        mind_initial: int,
        agility_initial: int,
        dexterity_initial: int,
        lucky_initial: int,
        job_rank_id: int,
        characteristics_ids: string_opt,
        sp_weapon_name1: string,
        sp_weapon_name2: string,
        classification_id: int_opt,
        new_cost: int,
        variable_magic_bullet_name: string,
        rendering_pattern_id: int_opt,
    }
}

record! {
    /// Growth adjust and compose caps per (rarity, unit type) pair.
    UnitTypeParameterRow => UnitTypeParameter {
        id: int,
        unit_type: int,
        rarity_id: int,
        hp_levelup_max_correction: float,
        strength_levelup_max_correction: float,
        vitality_levelup_max_correction: float,
        intelligence_levelup_max_correction: float,
        mind_levelup_max_correction: float,
        agility_levelup_max_correction: float,
        dexterity_levelup_max_correction: float,
        lucky_levelup_max_correction: float,
        hp_compose_max: int,
        strength_compose_max: int,
        vitality_compose_max: int,
        intelligence_compose_max: int,
        mind_compose_max: int,
        agility_compose_max: int,
        dexterity_compose_max: int,
        lucky_compose_max: int,
    }
}

record! {
    /// Directed evolution edge from `unit_id` to `target_unit_id`.
    UnitEvolutionPatternRow => UnitEvolutionPattern {
        id: int,
        unit_id: int,
        target_unit_id: int,
        threshold_level: int,
        money: int,
    }
}

record! {
    /// Dupe-value milestone lists, one comma-separated multiset per stat.
    ComposeSettingRow => ComposeMaxUnityValueSetting {
        id: int,
        hp_compose_add_max: string_opt,
        strength_compose_add_max: string_opt,
        vitality_compose_add_max: string_opt,
        intelligence_compose_add_max: string_opt,
        mind_compose_add_max: string_opt,
        agility_compose_add_max: string_opt,
        dexterity_compose_add_max: string_opt,
        lucky_compose_add_max: string_opt,
        name: string,
        description: string,
    }
}

record! {
    /// Rarity tier; `index` is the star count.
    UnitRarityRow => UnitRarity {
        id: int,
        name: string,
        index: int,
        sell_rarity_medal: int,
        skill_levelup_rate: int,
        indicator_level_rate: float,
        reincarnation_level: int,
        trust_rate: float,
    }
}

record! {
    GearKindRow => GearKind {
        id: int,
        name: string,
        can_equip: int,
        same_element: int,
        is_attack: bool,
        is_composite: bool,
        colosseum_preempt_coefficient: int,
    }
}

record! {
    /// Per-type skill unlock; `unit_type` selects which type variant gets it.
    UnitSkillRow => UnitSkill {
        id: int,
        unit_id: int,
        level: int,
        skill_id: int,
        unit_type: int,
    }
}

record! {
    UnitLeaderSkillRow => UnitLeaderSkill {
        id: int,
        unit_id: int,
        skill_id: int,
    }
}

record! {
    /// Character-quest skill with its post-evolution replacement.
    UnitCqSkillRow => UnitSkillCharacterQuest {
        id: int,
        unit_id: int,
        character_quest_id: int,
        skill_id: int,
        quest_id_for_evolution: int,
        skill_after_evolution_id: int,
    }
}

record! {
    /// Relationship skill, keyed by character rather than unit.
    UnitRsSkillRow => UnitSkillAwake {
        id: int,
        character_id: int,
        need_affection: float,
        skill_id: int,
    }
}

record! {
    UnitIntimateSkillRow => UnitSkillIntimate {
        id: int,
        unit_id: int,
        skill_id: int,
    }
}

record! {
    /// Harmony-quest skill, keyed by character like the relationship skill.
    UnitHqSkillRow => UnitSkillHarmonyQuest {
        id: int,
        character_id: int,
        character_quest_id: int,
        skill_id: int,
    }
}

record! {
    /// Skill upgrade unlocked at a level threshold.
    UnitSkillEvolutionRow => UnitSkillEvolution {
        id: int,
        unit_id: int,
        before_skill_id: int,
        level: int,
        after_skill_id: int,
    }
}

record! {
    BattleSkillRow => BattleskillSkill {
        id: int,
        name: string,
        description: string,
        short_description: string,
        short_description_enemy: string,
        skill_type: int,
        element: int,
        genre1: int_opt,
        genre2: int_opt,
        target_type: int,
        min_range: int,
        max_range: int,
        consume_hp: int,
        weight: int,
        power: int,
        use_count: int,
        charge_turn: int,
        duel_magic_bullet_name: string,
        variable_magic_bullet_flag: bool,
        field_effect_name: string,
        field_target_effect_name: string,
        upper_level: int,
        field_effect_id: int_opt,
        duel_effect_id: int_opt,
        passive_effect_id: int_opt,
        time_of_death_skill_disable: bool,
        ailment_effect_id: int_opt,
        range_effect_passive_skill: bool,
        max_use_count: int,
        awake_skill_category: int,
        resource_reference_id: int,
    }
}

record! {
    /// Class-change slots for one unit. `job_id` is the default job; the
    /// numbered slots are the alternate patterns, 0 or null meaning absent.
    JobChangePatternRow => JobChangePatterns {
        id: int,
        unit_id: int,
        job_id: int,
        job1_id: int,
        materials1_id: int_opt,
        job2_id: int,
        materials2_id: int,
        job3_id: int_opt,
        materials3_id: int_opt,
        job4_id: int_opt,
        materials4_id: int_opt,
    }
}

record! {
    /// Job passive with up to three flat max-level stat bonuses.
    JobCharacteristicsRow => JobCharacteristics {
        id: int,
        skill_id: int,
        skill2_id: int_opt,
        level_pattern_id: string_opt,
        levelmax_bonus: int,
        levelmax_bonus_value: int,
        levelmax_bonus2: int,
        levelmax_bonus_value2: int,
        levelmax_bonus3: int,
        levelmax_bonus_value3: int,
    }
}

record! {
    /// Category foreign keys for one unit; clothing has two slots.
    UnitGroupRow => UnitGroup {
        id: int,
        unit_id: int,
        large_category_id: int,
        small_category_id: int,
        clothing_category_id: int,
        clothing_category_id2: int,
        generation_category_id: int,
    }
}

record! {
    LargeCategoryRow => UnitGroupLargeCategory {
        id: int,
        name: string,
        short_label_name: string,
        description: string,
        start_at: date_opt,
    }
}

record! {
    SmallCategoryRow => UnitGroupSmallCategory {
        id: int,
        name: string,
        short_label_name: string,
        description: string,
        start_at: date_opt,
    }
}

record! {
    ClothingCategoryRow => UnitGroupClothingCategory {
        id: int,
        name: string,
        short_label_name: string,
        description: string,
        start_at: date_opt,
    }
}

record! {
    GenerationCategoryRow => UnitGroupGenerationCategory {
        id: int,
        name: string,
        short_label_name: string,
        description: string,
        start_at: date_opt,
    }
}

record! {
    /// Overkiller skill unlocked when the character's dupe value reaches
    /// `unity_value`.
    OvkSkillReleaseRow => OverkillersSkillRelease {
        id: int,
        unity_value: int,
        skill_id: int,
    }
}

impl UnitParameterRow {
    pub fn max_of(&self, stat: StatType) -> i32 {
        match stat {
            StatType::Hp => self.hp_max,
            StatType::Str => self.strength_max,
            StatType::Mgc => self.intelligence_max,
            StatType::Grd => self.vitality_max,
            StatType::Spr => self.mind_max,
            StatType::Spd => self.agility_max,
            StatType::Tec => self.dexterity_max,
            StatType::Lck => self.lucky_max,
        }
    }

    pub fn initial_of(&self, stat: StatType) -> i32 {
        match stat {
            StatType::Hp => self.hp_initial,
            StatType::Str => self.strength_initial,
            StatType::Mgc => self.intelligence_initial,
            StatType::Grd => self.vitality_initial,
            StatType::Spr => self.mind_initial,
            StatType::Spd => self.agility_initial,
            StatType::Tec => self.dexterity_initial,
            StatType::Lck => self.lucky_initial,
        }
    }

    pub fn compose_of(&self, stat: StatType) -> i32 {
        match stat {
            StatType::Hp => self.hp_compose,
            StatType::Str => self.strength_compose,
            StatType::Mgc => self.intelligence_compose,
            StatType::Grd => self.vitality_compose,
            StatType::Spr => self.mind_compose,
            StatType::Spd => self.agility_compose,
            StatType::Tec => self.dexterity_compose,
            StatType::Lck => self.lucky_compose,
        }
    }
}

impl UnitInitialParamRow {
    pub fn initial_of(&self, stat: StatType) -> i32 {
        match stat {
            StatType::Hp => self.hp_initial,
            StatType::Str => self.strength_initial,
            StatType::Mgc => self.intelligence_initial,
            StatType::Grd => self.vitality_initial,
            StatType::Spr => self.mind_initial,
            StatType::Spd => self.agility_initial,
            StatType::Tec => self.dexterity_initial,
            StatType::Lck => self.lucky_initial,
        }
    }
}

impl UnitJobRow {
    pub fn initial_of(&self, stat: StatType) -> i32 {
        match stat {
            StatType::Hp => self.hp_initial,
            StatType::Str => self.strength_initial,
            StatType::Mgc => self.intelligence_initial,
            StatType::Grd => self.vitality_initial,
            StatType::Spr => self.mind_initial,
            StatType::Spd => self.agility_initial,
            StatType::Tec => self.dexterity_initial,
            StatType::Lck => self.lucky_initial,
        }
    }
}

impl UnitTypeParameterRow {
    /// Fractional level-up growth adjust for one stat.
    pub fn correction_of(&self, stat: StatType) -> f32 {
        match stat {
            StatType::Hp => self.hp_levelup_max_correction,
            StatType::Str => self.strength_levelup_max_correction,
            StatType::Mgc => self.intelligence_levelup_max_correction,
            StatType::Grd => self.vitality_levelup_max_correction,
            StatType::Spr => self.mind_levelup_max_correction,
            StatType::Spd => self.agility_levelup_max_correction,
            StatType::Tec => self.dexterity_levelup_max_correction,
            StatType::Lck => self.lucky_levelup_max_correction,
        }
    }

    /// Compose (fusion) cap for one stat under this rarity and type.
    pub fn compose_max_of(&self, stat: StatType) -> i32 {
        match stat {
            StatType::Hp => self.hp_compose_max,
            StatType::Str => self.strength_compose_max,
            StatType::Mgc => self.intelligence_compose_max,
            StatType::Grd => self.vitality_compose_max,
            StatType::Spr => self.mind_compose_max,
            StatType::Spd => self.agility_compose_max,
            StatType::Tec => self.dexterity_compose_max,
            StatType::Lck => self.lucky_compose_max,
        }
    }
}

impl ComposeSettingRow {
    /// Raw milestone list for one stat; `None` and `""` both mean no bonus.
    pub fn milestones_of(&self, stat: StatType) -> Option<&str> {
        let raw = match stat {
            StatType::Hp => &self.hp_compose_add_max,
            StatType::Str => &self.strength_compose_add_max,
            StatType::Mgc => &self.intelligence_compose_add_max,
            StatType::Grd => &self.vitality_compose_add_max,
            StatType::Spr => &self.mind_compose_add_max,
            StatType::Spd => &self.agility_compose_add_max,
            StatType::Tec => &self.dexterity_compose_add_max,
            StatType::Lck => &self.lucky_compose_add_max,
        };
        raw.as_deref().filter(|s| !s.is_empty())
    }
}

impl JobChangePatternRow {
    /// Job for one class-change slot; 0 and null both mean the slot is empty.
    pub fn job_for(&self, cc: crate::model::ClassChangeType) -> Option<i32> {
        use crate::model::ClassChangeType;
        let raw = match cc {
            ClassChangeType::Normal => Some(self.job1_id),
            ClassChangeType::Vertex1 => Some(self.job2_id),
            ClassChangeType::Vertex2 => self.job3_id,
            ClassChangeType::Vertex3 => self.job4_id,
        };
        raw.filter(|id| *id != 0)
    }
}

impl JobCharacteristicsRow {
    /// The three (bonus code, value) slots in declaration order.
    pub fn bonus_slots(&self) -> [(i32, i32); 3] {
        [
            (self.levelmax_bonus, self.levelmax_bonus_value),
            (self.levelmax_bonus2, self.levelmax_bonus_value2),
            (self.levelmax_bonus3, self.levelmax_bonus_value3),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{decode_all, encode_all};

    #[test]
    fn test_evolution_pattern_field_order() {
        let mut w = MasterDataWriter::new();
        for v in [1, 300433, 300434, 30, 50000] {
            w.write_i32(v);
        }
        let bytes = w.finish();
        let rows: Vec<UnitEvolutionPatternRow> = decode_all(&bytes).unwrap();
        assert_eq!(
            rows,
            vec![UnitEvolutionPatternRow {
                id: 1,
                unit_id: 300433,
                target_unit_id: 300434,
                threshold_level: 30,
                money: 50000,
            }]
        );
    }

    #[test]
    fn test_unit_row_roundtrip_with_nullables() {
        let row = UnitRow {
            id: 100114,
            name: "リィン".to_owned(),
            english_name: "Rean".to_owned(),
            published_at: Some("2019-04-23 15:00:00".to_owned()),
            same_character_id: 1001,
            rarity_id: 990,
            job_id: 603,
            kind_id: 1,
            cutin_pattern_id: None,
            formal_name: None,
            country_attribute: Some(3),
            inclusion_ip: None,
            awake_special_skill_category_id: Some(4),
            exist_overkillers_skill: true,
            expire_date_id: None,
            ..Default::default()
        };
        let bytes = encode_all(std::slice::from_ref(&row));
        let back: Vec<UnitRow> = decode_all(&bytes).unwrap();
        assert_eq!(back, vec![row]);
        assert_eq!(encode_all(&back), bytes);
    }

    #[test]
    fn test_battle_skill_roundtrip() {
        let row = BattleSkillRow {
            id: 490000010,
            name: "ファイアⅠ".to_owned(),
            skill_type: 2,
            element: 2,
            genre1: Some(1),
            genre2: None,
            target_type: 2,
            min_range: 1,
            max_range: 2,
            power: 120,
            use_count: 3,
            awake_skill_category: 0,
            ..Default::default()
        };
        let bytes = encode_all(std::slice::from_ref(&row));
        let back: Vec<BattleSkillRow> = decode_all(&bytes).unwrap();
        assert_eq!(back, vec![row]);
    }

    #[test]
    fn test_parameter_row_stat_accessors() {
        let row = UnitParameterRow {
            hp_max: 80,
            intelligence_max: 64,
            vitality_max: 32,
            mind_max: 24,
            agility_max: 46,
            dexterity_max: 64,
            ..Default::default()
        };
        assert_eq!(row.max_of(StatType::Hp), 80);
        assert_eq!(row.max_of(StatType::Mgc), 64);
        assert_eq!(row.max_of(StatType::Grd), 32);
        assert_eq!(row.max_of(StatType::Spr), 24);
        assert_eq!(row.max_of(StatType::Spd), 46);
        assert_eq!(row.max_of(StatType::Tec), 64);
    }

    #[test]
    fn test_compose_setting_empty_milestones() {
        let row = ComposeSettingRow {
            hp_compose_add_max: Some("10,20,30".to_owned()),
            strength_compose_add_max: Some(String::new()),
            vitality_compose_add_max: None,
            ..Default::default()
        };
        assert_eq!(row.milestones_of(StatType::Hp), Some("10,20,30"));
        assert_eq!(row.milestones_of(StatType::Str), None);
        assert_eq!(row.milestones_of(StatType::Grd), None);
    }
}

//! Tag resolution from group-category tables plus derived custom tags.

use std::collections::{BTreeMap, HashMap};

use crate::error::{MasterDataError, Result};
use crate::model::{TagConfig, TagDesc, UnitTag, UnitTagKind};
use crate::repository::MasterDataRepo;
use crate::schema::records::{
    ClothingCategoryRow, GenerationCategoryRow, LargeCategoryRow, SmallCategoryRow, UnitGroupRow,
    UnitRow,
};
use crate::schema::Table;

pub struct TagRepo {
    config: TagConfig,
    unit_groups: HashMap<i32, UnitGroupRow>,
    tags: HashMap<UnitTagKind, HashMap<i32, UnitTag>>,
}

impl TagRepo {
    pub fn new(repo: &MasterDataRepo, config: TagConfig) -> Result<TagRepo> {
        let mut tags = HashMap::new();
        tags.insert(
            UnitTagKind::Large,
            repo.read::<LargeCategoryRow>()?
                .iter()
                .map(|r| {
                    build_tag(&config, UnitTagKind::Large, r.id, &r.name, &r.short_label_name, &r.description)
                })
                .map(|t| (t.id, t))
                .collect(),
        );
        tags.insert(
            UnitTagKind::Small,
            repo.read::<SmallCategoryRow>()?
                .iter()
                .map(|r| {
                    build_tag(&config, UnitTagKind::Small, r.id, &r.name, &r.short_label_name, &r.description)
                })
                .map(|t| (t.id, t))
                .collect(),
        );
        tags.insert(
            UnitTagKind::Clothing,
            repo.read::<ClothingCategoryRow>()?
                .iter()
                .map(|r| {
                    build_tag(&config, UnitTagKind::Clothing, r.id, &r.name, &r.short_label_name, &r.description)
                })
                .map(|t| (t.id, t))
                .collect(),
        );
        tags.insert(
            UnitTagKind::Generation,
            repo.read::<GenerationCategoryRow>()?
                .iter()
                .map(|r| {
                    build_tag(&config, UnitTagKind::Generation, r.id, &r.name, &r.short_label_name, &r.description)
                })
                .map(|t| (t.id, t))
                .collect(),
        );

        Ok(TagRepo {
            config,
            unit_groups: repo.index(|r: &UnitGroupRow| r.unit_id)?,
            tags,
        })
    }

    /// All tags of one unit, sorted by (kind, id).
    ///
    /// The two clothing slots may repeat a tag; nameless placeholder
    /// categories are dropped. The derived custom tags apply even to units
    /// without a group row.
    pub fn tags_of(&self, unit: &UnitRow) -> Result<Vec<UnitTag>> {
        // Keyed by identity so duplicate clothing slots collapse.
        let mut tags: BTreeMap<(UnitTagKind, i32), UnitTag> = BTreeMap::new();

        if let Some(group) = self.unit_groups.get(&unit.id) {
            let refs = [
                (UnitTagKind::Large, group.large_category_id),
                (UnitTagKind::Small, group.small_category_id),
                (UnitTagKind::Clothing, group.clothing_category_id),
                (UnitTagKind::Clothing, group.clothing_category_id2),
                (UnitTagKind::Generation, group.generation_category_id),
            ];
            for (kind, tag_id) in refs {
                if tag_id == 0 {
                    continue;
                }
                let tag = self.tag(kind, tag_id)?;
                if tag.desc_jp.name.is_empty() && tag.desc_en.is_none() {
                    continue;
                }
                tags.insert(tag.iid(), tag.clone());
            }
        }

        if unit.awake_unit_flag {
            let tag = &self.config.awakened;
            tags.insert(tag.iid(), tag.clone());
        }
        let (implying_ids, implied) = &self.config.clothing_implied;
        if implying_ids
            .iter()
            .any(|id| tags.contains_key(&(UnitTagKind::Clothing, *id)))
        {
            tags.insert(implied.iid(), implied.clone());
        }
        let (range, range_tag) = &self.config.id_range;
        if range.contains(&unit.id) {
            tags.insert(range_tag.iid(), range_tag.clone());
        }

        Ok(tags.into_values().collect())
    }

    fn tag(&self, kind: UnitTagKind, tag_id: i32) -> Result<&UnitTag> {
        self.tags
            .get(&kind)
            .and_then(|by_id| by_id.get(&tag_id))
            .ok_or_else(|| MasterDataError::missing_row(category_table(kind), tag_id))
    }
}

fn category_table(kind: UnitTagKind) -> Table {
    match kind {
        UnitTagKind::Large => Table::UnitGroupLargeCategory,
        UnitTagKind::Small => Table::UnitGroupSmallCategory,
        UnitTagKind::Clothing => Table::UnitGroupClothingCategory,
        UnitTagKind::Generation | UnitTagKind::Custom => Table::UnitGroupGenerationCategory,
    }
}

fn build_tag(
    config: &TagConfig,
    kind: UnitTagKind,
    id: i32,
    name: &str,
    short: &str,
    description: &str,
) -> UnitTag {
    UnitTag {
        kind,
        id,
        desc_jp: TagDesc {
            name: name.to_owned(),
            short_label_name: short.to_owned(),
            description: description.to_owned(),
        },
        desc_en: config.translations.get(&(kind, id)).cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_tag_attaches_translation() {
        let config = TagConfig::builtin();
        let tag = build_tag(&config, UnitTagKind::Small, 2, "コラボ", "コラボ", "");
        assert_eq!(tag.desc().short_label_name, "Collab");

        let unknown = build_tag(&config, UnitTagKind::Small, 999, "新規", "新規", "");
        assert_eq!(unknown.desc().short_label_name, "新規");
    }
}

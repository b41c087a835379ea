//! Unit tags: group-category memberships plus derived custom tags.

use std::collections::HashMap;
use std::ops::Range;

use serde::Serialize;

/// Which category table a tag came from. `Custom` tags exist only in this
/// model, never in the game data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum UnitTagKind {
    Large = 1,
    Small = 2,
    Clothing = 3,
    Generation = 4,
    Custom = 23999,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub struct TagDesc {
    pub name: String,
    pub short_label_name: String,
    pub description: String,
}

impl TagDesc {
    fn new(name: &str, short: &str, description: &str) -> TagDesc {
        TagDesc {
            name: name.to_owned(),
            short_label_name: short.to_owned(),
            description: description.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct UnitTag {
    pub kind: UnitTagKind,
    pub id: i32,
    pub desc_jp: TagDesc,
    pub desc_en: Option<TagDesc>,
}

impl UnitTag {
    /// Preferred description: English translation when known.
    pub fn desc(&self) -> &TagDesc {
        self.desc_en.as_ref().unwrap_or(&self.desc_jp)
    }

    /// Identity of the tag across kinds.
    pub fn iid(&self) -> (UnitTagKind, i32) {
        (self.kind, self.id)
    }
}

/// Injected tag configuration: translations plus the rules for the derived
/// custom tags. [`TagConfig::builtin`] carries the known data; callers may
/// substitute their own.
#[derive(Debug, Clone)]
pub struct TagConfig {
    /// English descriptions for known (kind, id) tags.
    pub translations: HashMap<(UnitTagKind, i32), TagDesc>,
    /// Custom tag applied to awakened units.
    pub awakened: UnitTag,
    /// Custom tag implied by any of the listed clothing tag ids.
    pub clothing_implied: (Vec<i32>, UnitTag),
    /// Custom tag applied to units whose id falls in the range.
    pub id_range: (Range<i32>, UnitTag),
}

impl TagConfig {
    pub fn builtin() -> TagConfig {
        TagConfig {
            translations: builtin_translations(),
            awakened: custom_tag(1, "Awakened", "Awakened", "Awakened Units"),
            // The named killer groups are all revolutionary factions.
            clothing_implied: (
                vec![15, 16, 17],
                custom_tag(
                    2,
                    "Revolutionary Killers",
                    "Revo",
                    "Any Saint / Karma / Order Killers",
                ),
            ),
            id_range: (
                1_000_000..2_000_000,
                custom_tag(
                    3,
                    "Male Killers",
                    "Male",
                    "Also known as Killer Princes.",
                ),
            ),
        }
    }
}

fn custom_tag(id: i32, name: &str, short: &str, description: &str) -> UnitTag {
    UnitTag {
        kind: UnitTagKind::Custom,
        id,
        // English-only tags lean on the JP slot being the fallback.
        desc_jp: TagDesc::new(name, short, description),
        desc_en: None,
    }
}

fn builtin_translations() -> HashMap<(UnitTagKind, i32), TagDesc> {
    use UnitTagKind::{Clothing, Generation, Large, Small};
    let entries = [
        (Large, 2, TagDesc::new("Phantom of the School", "School", "Also known as Gaku Units")),
        (Large, 3, TagDesc::new("Earth", "Earth", "Earth mode Units")),
        (Large, 4, TagDesc::new("Phantom of Love", "PoL", "Also know as SS/Swimsuit Units")),
        (Large, 5, TagDesc::new("Lost Ragnarok", "LR", "Units from the Lost Ragnarok Chapter")),
        (Large, 6, TagDesc::new("Elysium", "OG", "Units from the Heaven Chapter, Also known as Elysium")),
        (Large, 7, TagDesc::new("Integral Noah", "IN", "Units from the Integral Noah Chapter")),
        (Small, 2, TagDesc::new("Collaboration", "Collab", "Units from Collaboration Events")),
        (Small, 7, TagDesc::new("Holy Pool Kingdom", "Pool", "Units from the Holy Pool Kingdom Faction in the PoL story")),
        (Small, 8, TagDesc::new("Beach Empire", "Beach", "Units from the Beach Empire Faction in the PoL story")),
        (Small, 9, TagDesc::new("Jungle Union", "Jungle", "Units from the Jungle Union Faction in the PoL story")),
        (Small, 10, TagDesc::new("Harmonia Pontificate", "Harmonia", "Units from the Harmonia Pontificate Faction in the Lost Ragnarok story")),
        (Small, 11, TagDesc::new("Chaos Lion Empire", "Chaos", "Units from the Chaos Lion Empire Faction in the Lost Ragnarok story")),
        (Small, 12, TagDesc::new("Treisema Republic", "Treisema", "Units from the Treisema Republic Faction in the Lost Ragnarok story")),
        (Small, 13, TagDesc::new("Tyrhelm", "Tyrhelm", "Units from the Tyrhelm Faction in the Lost Ragnarok story")),
        (Small, 14, TagDesc::new("Tagatame Collaboration", "Taga", "Units from Tagatame game, also developed by Gumi. The game is also known as The Alchemist Code in English.")),
        (Small, 15, TagDesc::new("Shinobi Nightmare Collaboration", "Shinobina", "Units from (former) Shinobi Nightmare game, also developed by Gumi. As of 2020, they game is closed, but units may still be used in PotK")),
        (Small, 16, TagDesc::new("Command Killers", "CK", "Units from the Command Killers Faction, featured in both Lost Ragnarok and Integral Noah Chapters")),
        (Small, 17, TagDesc::new("Integral Killers", "IK", "One of the factions featured in the Integral Noah Chapter")),
        (Small, 18, TagDesc::new("Imitate Killers", "ImK", "One of the factions featured in the Integral Noah Chapter")),
        (Clothing, 2, TagDesc::new("New Year", "NY", "Units released on New Year's Events")),
        (Clothing, 3, TagDesc::new("Valentines", "Val", "Units released on Valentine's Day Events")),
        (Clothing, 4, TagDesc::new("Wedding", "Wed", "Units released on Wedding Events")),
        (Clothing, 5, TagDesc::new("Swimsuit", "SS", "Units wearing Swimsuits")),
        (Clothing, 6, TagDesc::new("Halloween", "Hallo", "Units released on Halloween Events")),
        (Clothing, 7, TagDesc::new("Christmas", "Xmas", "Units released on Christmas Events")),
        (Clothing, 8, TagDesc::new("Black Killers", "BK", "Black Killers variants of the 1st Killers")),
        (Clothing, 9, TagDesc::new("Gym Suit", "Gym", "Units wearing Gym Suits")),
        (Clothing, 10, TagDesc::new("School Uniform", "JK", "Units wearing School Uniforms")),
        (Clothing, 11, TagDesc::new("Maid Uniform", "Maid", "Units wearing Maid Uniforms")),
        (Clothing, 12, TagDesc::new("Collaboration Cosplay", "Cosplay", "Units in Cosplay from a Collaboration Event")),
        (Clothing, 13, TagDesc::new("Yukata", "Yukata", "Units wearing an Yukata")),
        (Clothing, 14, TagDesc::new("Easter", "Easter", "Units released on Easter Events")),
        (Clothing, 15, TagDesc::new("Karma Killers", "Karma", "Units from the Karma Killers group from the Chaos Lion Empire in the Lost Ragnarok story")),
        (Clothing, 16, TagDesc::new("Saint Killers", "Saint", "Units from the Saint Killers group from the Harmonia Pontificate in the Lost Ragnarok story")),
        (Clothing, 17, TagDesc::new("Order Killers", "Order", "Units from the Order Killers group from the Treisema Republic in the Lost Ragnarok story")),
        (Clothing, 18, TagDesc::new("Fatom Killers", "Fatom", "\"Excessive\" version of the units, launched/updated as an recurring April 1st joke")),
        (Clothing, 19, TagDesc::new("Disruptors", "DP", "Units from the Disruptors Faction in the Lost Ragnarok story")),
        (Clothing, 20, TagDesc::new("God Killers", "GK", "The leaders of each major faction in the Lost Ragnarok story")),
        (Generation, 2, TagDesc::new("First Killers", "1st", "Units from the First Generation")),
        (Generation, 3, TagDesc::new("Sevenths Killers", "7th", "Units from the Seventh Generation")),
        (Generation, 4, TagDesc::new("Ancient Killers", "Ancient", "Units from Ancient Killers Generation")),
    ];
    entries
        .into_iter()
        .map(|(kind, id, desc)| ((kind, id), desc))
        .collect()
}

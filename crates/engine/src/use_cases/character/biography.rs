//! Short flavor biographies for generated characters.
//!
//! Every random pick goes through the caller's RNG so a seeded randomizer
//! produces the same text every time.

use rand::seq::SliceRandom;
use rand::Rng;

use charsmith_domain::generation::race_lookup_keys;
use charsmith_domain::{CharacterDraft, Gender, RulesDataset};

const NOVICE: &[&str] = &["fresh-faced", "aspiring", "green", "wide-eyed"];
const JOURNEYMAN: &[&str] = &["seasoned", "battle-tested", "resourceful", "hardened"];
const VETERAN: &[&str] = &["renowned", "wily", "veteran", "blooded"];
const LEGEND: &[&str] = &["legendary", "mythic", "formidable", "famed"];

const ORIGINS: &[&str] = &[
    "the frontier village of Briar Glen",
    "the river ports of Highfall",
    "the storm-battered cliffs of Seafarer's Rest",
    "the bustling markets of Hightower",
    "the lantern-lit alleys of Duskwall",
    "a nomadic caravan crossing the Ember Expanse",
    "the mist-veiled forests of Greyfen",
    "the labyrinthine library-city of Callios",
    "the war-torn borderlands of Redridge",
    "the sun-baked dunes of Sahri Oasis",
];

/// Placeholders: `{subject}`, `{Subject}`, `{object}`, `{possessive}`,
/// `{reflexive}` and `{background}`.
fn background_template(background: &str) -> Option<&'static str> {
    let template = match background {
        "acolyte" => "{Subject} once tended the quiet halls of a remote sanctuary, offering solace to weary pilgrims.",
        "charlatan" => "No stranger to masks and aliases, {subject} slipped coins from noble purses with disarming charm.",
        "criminal" => "Years spent among thieves taught {object} the value of secrets and quick getaways.",
        "entertainer" => "Crowded stages and raucous taverns still echo in {possessive} step; applause was {possessive} first addiction.",
        "folk-hero" => "Neighbors still whisper of the day {subject} stood alone against danger to shield humble folk.",
        "guild-artisan" => "Guild workshops honed {possessive} craft, and contracts still bear {possessive} meticulous seal.",
        "hermit" => "Seasons of solitude in the wilds left {object} thoughtful, listening to the wind for forgotten truths.",
        "noble" => "Born to titles and responsibilities, {subject} learned courtly poise alongside sharp political instincts.",
        "outlander" => "Endless trails under open skies taught {object} to read the land and trust {possessive} instincts.",
        "sage" => "Libraries became second homes, and {subject} still quotes obscure tomes from memory.",
        "sailor" => "Rolling decks and salt-stung winds seasoned {object} into a sailor who still sways with phantom tides.",
        "soldier" => "Drills and the thunder of war drums hardened {object} into a stalwart fighter.",
        "urchin" => "Streets and rooftops were classrooms, and survival the only test that mattered to {object}.",
        _ => return None,
    };
    Some(template)
}

const GENERIC_BACKGROUNDS: &[&str] = &[
    "Old habits from {possessive} days as a {background} still color every decision.",
    "Experiences far from home tempered {object}, leaving scars and stories in equal measure.",
    "Few guess how {subject} earned {possessive} lessons, but the past shadows every choice.",
];

const GOALS: &[&str] = &[
    "seeks to redeem {reflexive} for a costly mistake",
    "hunts for lore that could change the realms",
    "works to unite rivals before darker threats prevail",
    "aims to carve {possessive} name into the ballads of tomorrow",
    "plans to repay a life debt that still weighs on {object}",
    "strives to safeguard innocents caught between clashing powers",
];

const QUIRKS: &[&str] = &[
    "keeping {possessive} weathered journal close at hand",
    "whittling charms whenever nerves begin to fray",
    "reciting half-remembered proverbs for confidence",
    "collecting small tokens from every new ally",
    "touching a hidden talisman before every bold move",
    "tracing protective sigils on nearby surfaces",
];

// =============================================================================
// Physical profiles
// =============================================================================

/// `count` dice with `sides` faces.
#[derive(Debug, Clone, Copy)]
struct Dice {
    count: u32,
    sides: u32,
}

impl Dice {
    const fn new(count: u32, sides: u32) -> Self {
        Self { count, sides }
    }

    fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        (0..self.count).map(|_| rng.gen_range(1..=self.sides.max(1))).sum()
    }
}

#[derive(Debug, Clone, Copy)]
struct PhysicalProfile {
    base_height: u32,
    height_dice: Dice,
    base_weight: u32,
    weight_dice: Dice,
    weight_multiplier: u32,
    min_age: u32,
    max_age: u32,
}

const fn profile(
    height: (u32, Dice),
    weight: (u32, Dice, u32),
    age: (u32, u32),
) -> PhysicalProfile {
    PhysicalProfile {
        base_height: height.0,
        height_dice: height.1,
        base_weight: weight.0,
        weight_dice: weight.1,
        weight_multiplier: weight.2,
        min_age: age.0,
        max_age: age.1,
    }
}

const HUMAN_PROFILE: PhysicalProfile =
    profile((58, Dice::new(2, 10)), (120, Dice::new(2, 4), 4), (18, 70));

fn physical_profile(key: &str) -> Option<PhysicalProfile> {
    let profile = match key {
        "human" => HUMAN_PROFILE,
        "elf" => profile((54, Dice::new(2, 10)), (90, Dice::new(2, 4), 3), (100, 750)),
        "dwarf" => profile((48, Dice::new(2, 8)), (130, Dice::new(2, 6), 4), (50, 350)),
        "halfling" => profile((31, Dice::new(2, 4)), (35, Dice::new(1, 1), 1), (20, 150)),
        "gnome" => profile((35, Dice::new(2, 4)), (40, Dice::new(1, 1), 1), (40, 400)),
        "half-elf" => profile((57, Dice::new(2, 8)), (110, Dice::new(2, 4), 3), (20, 180)),
        "half-orc" => profile((58, Dice::new(2, 10)), (150, Dice::new(2, 6), 4), (14, 75)),
        "tiefling" => profile((57, Dice::new(2, 8)), (110, Dice::new(2, 4), 3), (18, 110)),
        "dragonborn" => profile((66, Dice::new(2, 8)), (175, Dice::new(2, 6), 6), (15, 80)),
        _ => return None,
    };
    Some(profile)
}

// =============================================================================
// Pronouns
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pronouns {
    subject: &'static str,
    object: &'static str,
    possessive: &'static str,
    reflexive: &'static str,
}

impl Pronouns {
    fn for_gender(gender: Option<Gender>) -> Self {
        match gender {
            Some(Gender::Male) => Self {
                subject: "he",
                object: "him",
                possessive: "his",
                reflexive: "himself",
            },
            Some(Gender::Female) => Self {
                subject: "she",
                object: "her",
                possessive: "her",
                reflexive: "herself",
            },
            None => Self {
                subject: "they",
                object: "them",
                possessive: "their",
                reflexive: "themselves",
            },
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn fill(template: &str, pronouns: &Pronouns, background: &str) -> String {
    template
        .replace("{Subject}", &capitalize(pronouns.subject))
        .replace("{subject}", pronouns.subject)
        .replace("{object}", pronouns.object)
        .replace("{possessive}", pronouns.possessive)
        .replace("{reflexive}", pronouns.reflexive)
        .replace("{background}", background)
}

fn indefinite_article(word: &str) -> &'static str {
    match word.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

fn level_descriptors(level: u8) -> &'static [&'static str] {
    if level >= 15 {
        LEGEND
    } else if level >= 9 {
        VETERAN
    } else if level >= 5 {
        JOURNEYMAN
    } else {
        NOVICE
    }
}

fn format_height(inches: u32) -> String {
    format!("{}'{}\"", inches / 12, inches % 12)
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, options: &[&'a str]) -> &'a str {
    options.choose(rng).copied().unwrap_or_default()
}

/// Builds a biography from the draft's current identity.
///
/// Unresolved race, class or background fall back to generic wording.
pub fn generate_biography<R: Rng + ?Sized>(
    draft: &CharacterDraft,
    dataset: &dyn RulesDataset,
    rng: &mut R,
) -> String {
    let race = draft.race().and_then(|id| dataset.race(id));
    let class = draft.class().and_then(|id| dataset.class(id));
    let subclass = class
        .zip(draft.subclass())
        .and_then(|(class, id)| class.subclass(id));
    let background = draft.background().and_then(|id| dataset.background(id));
    let pronouns = Pronouns::for_gender(draft.gender());

    let descriptor = pick(rng, level_descriptors(draft.level()));
    let origin = pick(rng, ORIGINS);
    let race_name = race
        .map(|r| r.name.to_lowercase())
        .unwrap_or_else(|| "humanoid".to_string());
    let class_label = match (class, subclass) {
        (Some(class), Some(subclass)) => format!("{} {}", subclass.name, class.name),
        (Some(class), None) => class.name.clone(),
        _ => "adventurer".to_string(),
    };

    let mut sentences = vec![format!(
        "{} is {} {} {} {} from {}.",
        draft.name(),
        indefinite_article(descriptor),
        descriptor,
        race_name,
        class_label,
        origin
    )];

    let background_name = background
        .map(|b| b.name.to_lowercase())
        .unwrap_or_else(|| "wanderer".to_string());
    let template = background
        .and_then(|b| background_template(&b.index))
        .unwrap_or_else(|| pick(rng, GENERIC_BACKGROUNDS));
    sentences.push(fill(template, &pronouns, &background_name));

    let goal = fill(pick(rng, GOALS), &pronouns, &background_name);
    let quirk = fill(pick(rng, QUIRKS), &pronouns, &background_name);
    sentences.push(format!("{} {} while {}.", capitalize(pronouns.subject), goal, quirk));

    if let Some(race) = race {
        let profile = race_lookup_keys(&race.index)
            .iter()
            .find_map(|key| physical_profile(key))
            .unwrap_or(HUMAN_PROFILE);
        let height = profile.base_height + profile.height_dice.roll(rng);
        let weight = profile.base_weight + profile.weight_dice.roll(rng) * profile.weight_multiplier;
        let age = rng.gen_range(profile.min_age..=profile.max_age);
        sentences.push(format!(
            "Standing {} and weighing about {} pounds, {} appears to be roughly {} years old.",
            format_height(height),
            weight,
            pronouns.subject,
            age
        ));
    }

    sentences.join(" ")
}

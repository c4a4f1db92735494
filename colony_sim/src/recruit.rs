// Turning external pawn profiles into pawns.
//
// New colonists come from an outside generator (a text service that
// invents a name, backstory and skill spread). The simulation never talks
// to that service; the host passes its result in through
// `SimAction::RecruitPawn`. This module is the boundary: it accepts an
// optional `PawnProfile`, clamps every skill into [0, 20], fills in missing
// skills with 0, and falls back to a stock name, colour and zeroed skills
// when the generator produced nothing usable.

use crate::pawn::{Pawn, Skills};
use crate::prng::GameRng;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Names used when the generator fails or returns a blank name.
pub const FALLBACK_NAMES: [&str; 5] = ["Val", "Jeb", "Bill", "Bob", "Alice"];

pub const DEFAULT_COLOR: &str = "#a3a3a3";

const FALLBACK_BACKSTORY: &str = "Wandered in from the wilds with no story to tell.";

/// Profile as produced by the pawn generator. Skill values are taken as
/// given and clamped on conversion, since the generator is not trusted to
/// stay within range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PawnProfile {
    pub name: String,
    #[serde(default)]
    pub backstory: String,
    #[serde(default)]
    pub skills: BTreeMap<SkillKind, i64>,
    #[serde(default)]
    pub color: Option<String>,
}

impl PawnProfile {
    /// Parse a generator response.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Skill levels clamped to the valid range, missing skills at 0.
    pub fn clamped_levels(&self) -> [u8; SKILL_COUNT] {
        SkillKind::ALL.map(|skill| {
            let raw = self.skills.get(&skill).copied().unwrap_or(0);
            raw.clamp(0, i64::from(MAX_SKILL_LEVEL)) as u8
        })
    }
}

/// Build a pawn from an optional profile. `None` (generator failure) yields
/// a fallback colonist with zeroed skills.
pub fn pawn_from_profile(
    rng: &mut GameRng,
    profile: Option<&PawnProfile>,
    position: GridCoord,
) -> Pawn {
    let id = PawnId::new(rng);
    let fallback_name = |rng: &mut GameRng| {
        rng.choose(&FALLBACK_NAMES)
            .copied()
            .unwrap_or("Val")
            .to_string()
    };

    let Some(profile) = profile else {
        let mut pawn = Pawn::new(id, fallback_name(rng), position, Skills::default());
        pawn.backstory = FALLBACK_BACKSTORY.to_string();
        pawn.color = DEFAULT_COLOR.to_string();
        return pawn;
    };

    let name = match profile.name.trim() {
        "" => fallback_name(rng),
        trimmed => trimmed.to_string(),
    };
    let mut pawn = Pawn::new(
        id,
        name,
        position,
        Skills::from_levels(profile.clamped_levels()),
    );
    pawn.backstory = if profile.backstory.trim().is_empty() {
        FALLBACK_BACKSTORY.to_string()
    } else {
        profile.backstory.clone()
    };
    pawn.color = profile
        .color
        .clone()
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_COLOR.to_string());
    pawn
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnergyPair {
    pub current: u16,
    pub max: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeroSummary {
    pub index: usize,
    pub name: String,
    pub name2: String,
    pub typus: u8,
    pub gender: u8,
    pub level: u8,
    pub exp: i32,
    pub money: i32,
    pub vital_energy: EnergyPair,
    pub astral_energy: EnergyPair,
    pub group: u8,
    pub group_position: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartySnapshot {
    pub active_group: Option<u8>,
    pub hero_count: usize,
    pub active_heroes: Vec<HeroSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TraitEntry {
    pub index: usize,
    pub name: String,
    pub normal: u8,
    pub current: u8,
    pub modifier: u8,
}

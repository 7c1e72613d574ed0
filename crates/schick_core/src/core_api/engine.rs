use crate::blade::hero::Hero;
use crate::blade::types::TRAIT_NAMES;
use crate::blade::{Inconsistency, SaveGame};

use super::error::{CoreError, CoreErrorCode};
use super::types::{EnergyPair, HeroSummary, PartySnapshot, TraitEntry};

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

/// An edit session over one decoded save file. Setters change the
/// in-memory model only; nothing touches disk until the caller writes
/// the bytes from [`Session::to_bytes`] somewhere.
#[derive(Debug)]
pub struct Session {
    save: SaveGame,
}

impl Engine {
    pub fn new() -> Self {
        Self
    }

    pub fn open_bytes<B: AsRef<[u8]>>(&self, bytes: B) -> Result<Session, CoreError> {
        let save = SaveGame::from_bytes(bytes.as_ref()).map_err(|e| {
            CoreError::new(CoreErrorCode::Parse, format!("failed to parse save file: {e}"))
        })?;
        Ok(Session { save })
    }
}

impl Session {
    pub fn save(&self) -> &SaveGame {
        &self.save
    }

    pub fn hero_count(&self) -> usize {
        self.save.heroes.len()
    }

    pub fn active_group(&self) -> Option<u8> {
        self.save.active_group()
    }

    pub fn party(&self) -> PartySnapshot {
        PartySnapshot {
            active_group: self.save.active_group(),
            hero_count: self.save.heroes.len(),
            active_heroes: self.active_heroes(),
        }
    }

    pub fn active_heroes(&self) -> Vec<HeroSummary> {
        self.save
            .active_hero_indices()
            .into_iter()
            .map(|i| summarize(i, &self.save.heroes[i]))
            .collect()
    }

    pub fn all_heroes(&self) -> Vec<HeroSummary> {
        self.save
            .heroes
            .iter()
            .enumerate()
            .map(|(i, h)| summarize(i, h))
            .collect()
    }

    pub fn hero(&self, index: usize) -> Result<HeroSummary, CoreError> {
        Ok(summarize(index, self.hero_ref(index)?))
    }

    pub fn hero_traits(&self, index: usize) -> Result<Vec<TraitEntry>, CoreError> {
        let hero = self.hero_ref(index)?;
        Ok(hero
            .traits()
            .iter()
            .enumerate()
            .map(|(i, t)| TraitEntry {
                index: i,
                name: TRAIT_NAMES[i].to_string(),
                normal: t.normal,
                current: t.current,
                modifier: t.modifier,
            })
            .collect())
    }

    pub fn set_exp(&mut self, index: usize, exp: i32) -> Result<(), CoreError> {
        self.hero_mut(index)?.exp = exp;
        Ok(())
    }

    pub fn set_money(&mut self, index: usize, money: i32) -> Result<(), CoreError> {
        self.hero_mut(index)?.money = money;
        Ok(())
    }

    pub fn set_level(&mut self, index: usize, level: u8) -> Result<(), CoreError> {
        self.hero_mut(index)?.level = level;
        Ok(())
    }

    pub fn set_vital_energy_current(&mut self, index: usize, value: u16) -> Result<(), CoreError> {
        self.hero_mut(index)?.vital_energy_current = value;
        Ok(())
    }

    pub fn set_vital_energy_max(&mut self, index: usize, value: u16) -> Result<(), CoreError> {
        self.hero_mut(index)?.vital_energy_max = value;
        Ok(())
    }

    pub fn set_astral_energy_current(&mut self, index: usize, value: u16) -> Result<(), CoreError> {
        self.hero_mut(index)?.astral_energy_current = value;
        Ok(())
    }

    pub fn set_astral_energy_max(&mut self, index: usize, value: u16) -> Result<(), CoreError> {
        self.hero_mut(index)?.astral_energy_max = value;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        self.save.to_bytes().map_err(|e| {
            CoreError::new(CoreErrorCode::Encode, format!("failed to encode save file: {e}"))
        })
    }

    pub fn validate(&self) -> Vec<Inconsistency> {
        self.save.validate()
    }

    fn hero_ref(&self, index: usize) -> Result<&Hero, CoreError> {
        self.save
            .heroes
            .get(index)
            .ok_or_else(|| invalid_index(index, self.save.heroes.len()))
    }

    fn hero_mut(&mut self, index: usize) -> Result<&mut Hero, CoreError> {
        let len = self.save.heroes.len();
        self.save
            .heroes
            .get_mut(index)
            .ok_or_else(|| invalid_index(index, len))
    }
}

fn invalid_index(index: usize, len: usize) -> CoreError {
    CoreError::new(
        CoreErrorCode::InvalidInput,
        format!("invalid hero index {index}, save file has {len} hero(es)"),
    )
}

fn summarize(index: usize, hero: &Hero) -> HeroSummary {
    HeroSummary {
        index,
        name: hero.name.as_str().to_string(),
        name2: hero.name2.as_str().to_string(),
        typus: hero.typus,
        gender: hero.gender,
        level: hero.level,
        exp: hero.exp,
        money: hero.money,
        vital_energy: EnergyPair {
            current: hero.vital_energy_current,
            max: hero.vital_energy_max,
        },
        astral_energy: EnergyPair {
            current: hero.astral_energy_current,
            max: hero.astral_energy_max,
        },
        group: hero.idx_heroes_group,
        group_position: hero.pos_in_heroes_group,
    }
}

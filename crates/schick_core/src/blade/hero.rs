use std::io::{self, Cursor, Read};

use crate::error::{SaveError, SaveErrorCode};
use crate::fixed::{FixedBytes, FixedString};
use crate::reader::LittleEndianReader;

use super::types::{CHR_SIZE, NAME_SIZE, PORTRAIT_SIZE, TAIL_SIZE, TRAIT_COUNT, WEAPON_SKILL_COUNT};

/// One character trait block: base value, current effective value and
/// temporary modifier, three consecutive bytes on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterTrait {
    pub normal: u8,
    pub current: u8,
    pub modifier: u8,
}

/// One hero record, exactly [`CHR_SIZE`] bytes on disk.
///
/// Every field sits at a fixed offset from the record start. Fields whose
/// game meaning is unknown (`unknown1..unknown9`, the portrait pixels and
/// the tail after the portrait) are carried opaquely so a decode→encode
/// round trip is byte exact.
#[derive(Debug, Clone, PartialEq)]
pub struct Hero {
    pub name: FixedString<NAME_SIZE>,
    pub name2: FixedString<NAME_SIZE>,
    pub slots_used: u8,
    pub typus: u8,
    pub gender: u8,
    pub size: i16,
    pub weight: u8,
    pub god: u8,
    pub level: u8,
    pub exp: i32,
    pub money: i32,
    pub rs_bonus1: u8,
    pub rs_bonus2: u8,
    pub rs_handycap: u8,
    pub remaining_bp: u8,
    pub courage: CharacterTrait,
    pub intelligence: CharacterTrait,
    pub charisma: CharacterTrait,
    pub dexterity: CharacterTrait,
    pub agility: CharacterTrait,
    pub intuition: CharacterTrait,
    pub strength: CharacterTrait,
    pub superstition: CharacterTrait,
    pub vertigo: CharacterTrait,
    pub claustrophobia: CharacterTrait,
    pub greed: CharacterTrait,
    pub necrophobia: CharacterTrait,
    pub curiosity: CharacterTrait,
    pub temper: CharacterTrait,
    pub vital_energy_current: u16,
    pub vital_energy_max: u16,
    pub astral_energy_current: u16,
    pub astral_energy_max: u16,
    pub magic_resistance: u8,
    pub basis_attack_parade: u8,
    pub att_vals: [u8; WEAPON_SKILL_COUNT],
    pub par_vals: [u8; WEAPON_SKILL_COUNT],
    pub att_bon_weapon: u8,
    pub par_bon_weapon: u8,
    pub weapon_type: u8,
    pub curr_attack_modifier: u8,
    pub perm_vit_energ_loss: u8,
    pub unknown1: u8,
    pub unknown2: u8,
    pub unknown3: u8,
    pub unknown4: u8,
    pub hunger: u8,
    pub thirst: u8,
    pub unknown5: u8,
    pub view_direction: u8,
    pub num_left_actions_per_fight_round: u8,
    pub unknown6: u8,
    pub unknown7: u8,
    pub fight_id_last_enemy: u8,
    pub idx_heroes_group: u8,
    pub unknown8: u8,
    pub unknown9: u8,
    pub pos_in_heroes_group: u8,
    pub portrait: FixedBytes<PORTRAIT_SIZE>,
    pub unknown_tail: FixedBytes<TAIL_SIZE>,
}

impl Hero {
    /// Decode one hero record from a window of at least [`CHR_SIZE`] bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, SaveError> {
        if data.len() < CHR_SIZE {
            return Err(SaveError::new(
                SaveErrorCode::TruncatedRecord,
                format!(
                    "hero record too small ({} bytes), expected {}",
                    data.len(),
                    CHR_SIZE
                ),
            ));
        }

        let mut r = LittleEndianReader::new(Cursor::new(data));
        parse_record(&mut r).map_err(|e| {
            SaveError::new(
                SaveErrorCode::TruncatedRecord,
                format!("hero record parse failed: {e}"),
            )
        })
    }

    /// Encode into a fresh [`CHR_SIZE`]-byte record. A name that does not
    /// fit its 16-byte field aborts with `FieldOverflow` and no partial
    /// output.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SaveError> {
        let mut out = Vec::with_capacity(CHR_SIZE);

        out.extend_from_slice(&self.name.to_raw()?);
        out.extend_from_slice(&self.name2.to_raw()?);

        out.push(self.slots_used);
        out.push(self.typus);
        out.push(self.gender);
        out.extend_from_slice(&self.size.to_le_bytes());
        out.push(self.weight);
        out.push(self.god);
        out.push(self.level);
        out.extend_from_slice(&self.exp.to_le_bytes());
        out.extend_from_slice(&self.money.to_le_bytes());
        out.push(self.rs_bonus1);
        out.push(self.rs_bonus2);
        out.push(self.rs_handycap);
        out.push(self.remaining_bp);

        for t in self.traits() {
            out.push(t.normal);
            out.push(t.current);
            out.push(t.modifier);
        }

        out.extend_from_slice(&self.vital_energy_current.to_le_bytes());
        out.extend_from_slice(&self.vital_energy_max.to_le_bytes());
        out.extend_from_slice(&self.astral_energy_current.to_le_bytes());
        out.extend_from_slice(&self.astral_energy_max.to_le_bytes());

        out.push(self.magic_resistance);
        out.push(self.basis_attack_parade);
        out.extend_from_slice(&self.att_vals);
        out.extend_from_slice(&self.par_vals);

        out.push(self.att_bon_weapon);
        out.push(self.par_bon_weapon);
        out.push(self.weapon_type);
        out.push(self.curr_attack_modifier);
        out.push(self.perm_vit_energ_loss);
        out.push(self.unknown1);
        out.push(self.unknown2);
        out.push(self.unknown3);
        out.push(self.unknown4);
        out.push(self.hunger);
        out.push(self.thirst);
        out.push(self.unknown5);
        out.push(self.view_direction);
        out.push(self.num_left_actions_per_fight_round);
        out.push(self.unknown6);
        out.push(self.unknown7);
        out.push(self.fight_id_last_enemy);
        out.push(self.idx_heroes_group);
        out.push(self.unknown8);
        out.push(self.unknown9);
        out.push(self.pos_in_heroes_group);

        out.extend_from_slice(self.portrait.as_slice());
        out.extend_from_slice(self.unknown_tail.as_slice());

        debug_assert_eq!(out.len(), CHR_SIZE);
        Ok(out)
    }

    /// Replace the portrait blob; the replacement must be exactly
    /// [`PORTRAIT_SIZE`] bytes.
    pub fn set_portrait(&mut self, bytes: &[u8]) -> Result<(), SaveError> {
        self.portrait = FixedBytes::from_slice(bytes).ok_or_else(|| {
            SaveError::new(
                SaveErrorCode::InvalidPortraitSize,
                format!(
                    "portrait must be exactly {PORTRAIT_SIZE} bytes, got {}",
                    bytes.len()
                ),
            )
        })?;
        Ok(())
    }

    /// Replace the opaque tail; the replacement must be exactly
    /// [`TAIL_SIZE`] bytes.
    pub fn set_unknown_tail(&mut self, bytes: &[u8]) -> Result<(), SaveError> {
        self.unknown_tail = FixedBytes::from_slice(bytes).ok_or_else(|| {
            SaveError::new(
                SaveErrorCode::FieldOverflow,
                format!(
                    "hero record tail must be exactly {TAIL_SIZE} bytes, got {}",
                    bytes.len()
                ),
            )
        })?;
        Ok(())
    }

    /// The fourteen trait blocks in on-disk order.
    pub fn traits(&self) -> [CharacterTrait; TRAIT_COUNT] {
        [
            self.courage,
            self.intelligence,
            self.charisma,
            self.dexterity,
            self.agility,
            self.intuition,
            self.strength,
            self.superstition,
            self.vertigo,
            self.claustrophobia,
            self.greed,
            self.necrophobia,
            self.curiosity,
            self.temper,
        ]
    }
}

fn parse_record<R: Read>(r: &mut LittleEndianReader<R>) -> io::Result<Hero> {
    let name = FixedString::from_raw(r.read_fixed_bytes::<NAME_SIZE>()?);
    let name2 = FixedString::from_raw(r.read_fixed_bytes::<NAME_SIZE>()?);

    let slots_used = r.read_u8()?;
    let typus = r.read_u8()?;
    let gender = r.read_u8()?;
    let size = r.read_i16()?;
    let weight = r.read_u8()?;
    let god = r.read_u8()?;
    let level = r.read_u8()?;
    let exp = r.read_i32()?;
    let money = r.read_i32()?;
    let rs_bonus1 = r.read_u8()?;
    let rs_bonus2 = r.read_u8()?;
    let rs_handycap = r.read_u8()?;
    let remaining_bp = r.read_u8()?;

    let courage = read_trait(r)?;
    let intelligence = read_trait(r)?;
    let charisma = read_trait(r)?;
    let dexterity = read_trait(r)?;
    let agility = read_trait(r)?;
    let intuition = read_trait(r)?;
    let strength = read_trait(r)?;
    let superstition = read_trait(r)?;
    let vertigo = read_trait(r)?;
    let claustrophobia = read_trait(r)?;
    let greed = read_trait(r)?;
    let necrophobia = read_trait(r)?;
    let curiosity = read_trait(r)?;
    let temper = read_trait(r)?;

    let vital_energy_current = r.read_u16()?;
    let vital_energy_max = r.read_u16()?;
    let astral_energy_current = r.read_u16()?;
    let astral_energy_max = r.read_u16()?;

    let magic_resistance = r.read_u8()?;
    let basis_attack_parade = r.read_u8()?;
    let att_vals = r.read_fixed_bytes::<WEAPON_SKILL_COUNT>()?;
    let par_vals = r.read_fixed_bytes::<WEAPON_SKILL_COUNT>()?;

    let att_bon_weapon = r.read_u8()?;
    let par_bon_weapon = r.read_u8()?;
    let weapon_type = r.read_u8()?;
    let curr_attack_modifier = r.read_u8()?;
    let perm_vit_energ_loss = r.read_u8()?;
    let unknown1 = r.read_u8()?;
    let unknown2 = r.read_u8()?;
    let unknown3 = r.read_u8()?;
    let unknown4 = r.read_u8()?;
    let hunger = r.read_u8()?;
    let thirst = r.read_u8()?;
    let unknown5 = r.read_u8()?;
    let view_direction = r.read_u8()?;
    let num_left_actions_per_fight_round = r.read_u8()?;
    let unknown6 = r.read_u8()?;
    let unknown7 = r.read_u8()?;
    let fight_id_last_enemy = r.read_u8()?;
    let idx_heroes_group = r.read_u8()?;
    let unknown8 = r.read_u8()?;
    let unknown9 = r.read_u8()?;
    let pos_in_heroes_group = r.read_u8()?;

    let portrait = FixedBytes::new(r.read_fixed_bytes::<PORTRAIT_SIZE>()?);
    let unknown_tail = FixedBytes::new(r.read_fixed_bytes::<TAIL_SIZE>()?);

    Ok(Hero {
        name,
        name2,
        slots_used,
        typus,
        gender,
        size,
        weight,
        god,
        level,
        exp,
        money,
        rs_bonus1,
        rs_bonus2,
        rs_handycap,
        remaining_bp,
        courage,
        intelligence,
        charisma,
        dexterity,
        agility,
        intuition,
        strength,
        superstition,
        vertigo,
        claustrophobia,
        greed,
        necrophobia,
        curiosity,
        temper,
        vital_energy_current,
        vital_energy_max,
        astral_energy_current,
        astral_energy_max,
        magic_resistance,
        basis_attack_parade,
        att_vals,
        par_vals,
        att_bon_weapon,
        par_bon_weapon,
        weapon_type,
        curr_attack_modifier,
        perm_vit_energ_loss,
        unknown1,
        unknown2,
        unknown3,
        unknown4,
        hunger,
        thirst,
        unknown5,
        view_direction,
        num_left_actions_per_fight_round,
        unknown6,
        unknown7,
        fight_id_last_enemy,
        idx_heroes_group,
        unknown8,
        unknown9,
        pos_in_heroes_group,
        portrait,
        unknown_tail,
    })
}

fn read_trait<R: Read>(r: &mut LittleEndianReader<R>) -> io::Result<CharacterTrait> {
    Ok(CharacterTrait {
        normal: r.read_u8()?,
        current: r.read_u8()?,
        modifier: r.read_u8()?,
    })
}

use schick_core::blade::types::{CHR_SIZE, META_SIZE, PRE_HERO_START};
use schick_core::blade::{Inconsistency, SaveGame};
use schick_core::error::SaveErrorCode;

fn hero_record(name: &[u8], group: u8, exp: i32) -> Vec<u8> {
    let mut data: Vec<u8> = (0..CHR_SIZE).map(|i| (i * 17 + 3) as u8).collect();
    data[..32].fill(0);
    data[..name.len()].copy_from_slice(name);
    data[40..44].copy_from_slice(&exp.to_le_bytes());
    data[135] = group;
    data
}

/// Assemble a file: 16-byte header, chr_offset, metadata plus
/// `pre_extra` additional unmodeled pre-hero bytes, then the records.
fn build_save(active_group: u8, pre_extra: usize, heroes: &[Vec<u8>]) -> Vec<u8> {
    let chr_offset = (PRE_HERO_START + META_SIZE + pre_extra) as i32;

    let mut file = Vec::new();
    file.extend_from_slice(b"SCHICKM.GAM\0");
    file.extend_from_slice(&[0, 1, 0, 0]);
    file.extend_from_slice(&chr_offset.to_le_bytes());
    file.extend_from_slice(&[9, active_group, 7, 6, 5, 4, 3, 2, 1, 0]);
    file.extend((0..pre_extra).map(|i| (i * 13 + 1) as u8));
    for hero in heroes {
        file.extend_from_slice(hero);
    }
    file
}

#[test]
fn container_roundtrip_is_byte_exact() {
    let file = build_save(
        1,
        5714,
        &[
            hero_record(b"Alrik", 1, 1000),
            hero_record(b"Layariel", 1, 2000),
            hero_record(b"Gorbas", 2, 3000),
        ],
    );
    let save = SaveGame::from_bytes(&file).expect("fixture should decode");
    assert_eq!(save.heroes.len(), 3);
    assert_eq!(save.trailing_bytes, 0);
    assert_eq!(save.to_bytes().expect("save should encode"), file);
}

#[test]
fn zero_hero_file_roundtrips() {
    let file = build_save(0, 0, &[]);
    let save = SaveGame::from_bytes(&file).expect("fixture should decode");
    assert!(save.heroes.is_empty());
    assert_eq!(save.to_bytes().expect("save should encode"), file);
}

#[test]
fn decode_splits_header_offset_and_pre_hero_data() {
    let file = build_save(3, 40, &[hero_record(b"Alrik", 3, 0)]);
    let save = SaveGame::from_bytes(&file).expect("fixture should decode");

    assert_eq!(save.version_header.as_slice(), &file[..16]);
    assert_eq!(save.chr_offset, (PRE_HERO_START + META_SIZE + 40) as i32);
    assert_eq!(save.metadata, &file[20..30]);
    assert_eq!(save.pre_hero_data, &file[20..save.chr_offset as usize]);
    assert!(save.pre_hero_data.starts_with(&save.metadata));
    assert_eq!(save.active_group(), Some(3));
}

#[test]
fn truncated_header_is_rejected() {
    let err = SaveGame::from_bytes(&[0u8; 10]).expect_err("10 bytes is not a save file");
    assert_eq!(err.code, SaveErrorCode::TruncatedHeader);
}

#[test]
fn chr_offset_before_pre_hero_start_is_rejected() {
    let mut file = build_save(0, 0, &[hero_record(b"Alrik", 0, 0)]);
    file[16..20].copy_from_slice(&10i32.to_le_bytes());
    let err = SaveGame::from_bytes(&file).expect_err("offset 10 points into the header");
    assert_eq!(err.code, SaveErrorCode::InvalidOffset);
}

#[test]
fn chr_offset_past_end_of_file_is_rejected() {
    let mut file = build_save(0, 0, &[hero_record(b"Alrik", 0, 0)]);
    let bad = file.len() as i32 + 1;
    file[16..20].copy_from_slice(&bad.to_le_bytes());
    let err = SaveGame::from_bytes(&file).expect_err("offset past EOF");
    assert_eq!(err.code, SaveErrorCode::InvalidOffset);
}

#[test]
fn negative_chr_offset_is_rejected() {
    let mut file = build_save(0, 0, &[hero_record(b"Alrik", 0, 0)]);
    file[16..20].copy_from_slice(&(-1i32).to_le_bytes());
    let err = SaveGame::from_bytes(&file).expect_err("negative offset");
    assert_eq!(err.code, SaveErrorCode::InvalidOffset);
}

#[test]
fn trailing_remainder_is_dropped_but_reported() {
    let complete = build_save(1, 0, &[hero_record(b"Alrik", 1, 500)]);
    let mut file = complete.clone();
    file.extend_from_slice(&[0xEE; 100]);

    let save = SaveGame::from_bytes(&file).expect("trailing bytes do not fail decode");
    assert_eq!(save.heroes.len(), 1);
    assert_eq!(save.trailing_bytes, 100);
    // The remainder is absent from re-encoded output.
    assert_eq!(save.to_bytes().expect("save should encode"), complete);
    assert!(
        save.validate()
            .contains(&Inconsistency::TrailingBytes { count: 100 })
    );
}

#[test]
fn active_group_filter_keeps_file_order() {
    let file = build_save(
        2,
        0,
        &[
            hero_record(b"Alrik", 2, 0),
            hero_record(b"Layariel", 1, 0),
            hero_record(b"Gorbas", 2, 0),
            hero_record(b"Jurge", 3, 0),
        ],
    );
    let save = SaveGame::from_bytes(&file).expect("fixture should decode");
    assert_eq!(save.active_group(), Some(2));
    assert_eq!(save.active_hero_indices(), vec![0, 2]);
}

#[test]
fn validate_is_empty_for_a_coherent_file() {
    let file = build_save(1, 12, &[hero_record(b"Alrik", 1, 0)]);
    let save = SaveGame::from_bytes(&file).expect("fixture should decode");
    assert!(save.validate().is_empty());
}

#[test]
fn validate_flags_a_drifted_offset() {
    let file = build_save(1, 0, &[hero_record(b"Alrik", 1, 0)]);
    let mut save = SaveGame::from_bytes(&file).expect("fixture should decode");
    save.chr_offset += 4;
    let issues = save.validate();
    assert_eq!(
        issues,
        vec![Inconsistency::OffsetMismatch {
            chr_offset: save.chr_offset,
            expected: PRE_HERO_START + META_SIZE,
        }]
    );
}

#[test]
fn validate_flags_metadata_drift() {
    let file = build_save(1, 0, &[hero_record(b"Alrik", 1, 0)]);
    let mut save = SaveGame::from_bytes(&file).expect("fixture should decode");
    save.metadata[0] ^= 0xFF;
    assert!(save.validate().contains(&Inconsistency::MetadataDrift));
}

#[test]
fn record_errors_propagate_through_container_encode() {
    let file = build_save(1, 0, &[hero_record(b"Alrik", 1, 0)]);
    let mut save = SaveGame::from_bytes(&file).expect("fixture should decode");
    save.heroes[0].name.set("A name far too long for the field");
    let err = save.to_bytes().expect_err("oversized name must fail the file encode");
    assert_eq!(err.code, SaveErrorCode::FieldOverflow);
}

use std::collections::HashSet;

use super::*;
use crate::analyzer::CharFrequency;
use crate::config::BuildConfig;
use crate::table::{build_mapping, MappingRecord, Strategy};

fn table_of(entries: &[(char, &str)]) -> MappingTable {
    let records = entries
        .iter()
        .enumerate()
        .map(|(rank, &(character, code))| MappingRecord {
            character,
            code: code.to_string(),
            frequency_rank: rank as u32,
        })
        .collect();
    MappingTable::from_records(records).unwrap()
}

/// Three glyphs, one single-letter code each.
fn three_glyph_engine() -> Transliterator {
    Transliterator::new(table_of(&[('ཀ', "A"), ('ཁ', "B"), ('ག', "C")]))
}

/// Mixed code lengths sharing initials, to exercise longest-match-first.
fn layered_engine() -> Transliterator {
    Transliterator::new(table_of(&[
        ('་', "A"),
        ('ཀ', "B"),
        ('ཁ', "Ab"),
        ('ག', "Ac"),
        ('ང', "Bad"),
    ]))
}

#[test]
fn encodes_mapped_chars_and_passthrough_space() {
    let engine = three_glyph_engine();
    assert_eq!(engine.to_latin("ཀ ཁ").unwrap(), "A B");
}

#[test]
fn decodes_codes_and_passthrough_space() {
    let engine = three_glyph_engine();
    assert_eq!(engine.from_latin("A B").unwrap(), "ཀ ཁ");
}

#[test]
fn longest_declared_match_wins() {
    let engine = layered_engine();
    // "Ab" must decode as one two-letter code, not "A" + stray "b".
    assert_eq!(engine.to_latin("ཁ").unwrap(), "Ab");
    assert_eq!(engine.from_latin("Ab").unwrap(), "ཁ");
    assert_eq!(engine.from_latin("Bad").unwrap(), "ང");
}

#[test]
fn undeclared_longer_run_falls_back_to_shorter_code() {
    let engine = three_glyph_engine();
    // Only "A" is declared: "Az" is the code "A" followed by passthrough "z".
    assert_eq!(engine.from_latin("Az").unwrap(), "ཀz");
}

#[test]
fn declared_lengths_only_no_implicit_prefix() {
    // Initial "A" declares only length 2; a bare "Ab" that is not in the
    // table has no valid segmentation.
    let engine = Transliterator::new(table_of(&[('ཀ', "Ac")]));
    assert_eq!(
        engine.from_latin("Ab"),
        Err(DecodeError::UnknownCode { initial: 'A', pos: 0 })
    );
}

#[test]
fn unknown_initial_is_malformed() {
    let engine = three_glyph_engine();
    assert_eq!(
        engine.from_latin("A Q"),
        Err(DecodeError::UnknownCode { initial: 'Q', pos: 2 })
    );
}

#[test]
fn ascii_letters_are_escaped_not_confusable() {
    let engine = three_glyph_engine();
    let latin = engine.to_latin("abcXYZ").unwrap();
    // No bare letter may appear: each one is marker + literal.
    assert_eq!(latin.chars().filter(|&c| c == ESCAPE_MARKER).count(), 6);
    assert_eq!(engine.from_latin(&latin).unwrap(), "abcXYZ");
}

#[test]
fn digits_and_punctuation_pass_bare() {
    let engine = three_glyph_engine();
    assert_eq!(engine.to_latin("12, 3!").unwrap(), "12, 3!");
    assert_eq!(engine.from_latin("12, 3!").unwrap(), "12, 3!");
}

#[test]
fn unmapped_code_point_takes_hex_escape() {
    let engine = three_glyph_engine();
    assert_eq!(
        engine.to_latin("😀").unwrap(),
        format!("{ESCAPE_MARKER}#01f600")
    );
    assert!(engine.is_lossless("😀"));
}

#[test]
fn escape_marker_in_input_round_trips() {
    let engine = three_glyph_engine();
    let text = format!("ཀ{ESCAPE_MARKER}ཁ");
    assert!(engine.is_lossless(&text));
}

#[test]
fn mixed_script_round_trip() {
    let engine = layered_engine();
    let text = "ཀཁ་ག། The price is 42.50€ — ok?\nང་\t😀";
    let latin = engine.to_latin(text).unwrap();
    assert_eq!(engine.from_latin(&latin).unwrap(), text);
}

#[test]
fn self_delimiting_over_all_code_pairs() {
    let engine = layered_engine();
    let records = engine.table().records().to_vec();
    for a in &records {
        for b in &records {
            let latin = format!("{}{}", a.code, b.code);
            let expected: String = [a.character, b.character].iter().collect();
            assert_eq!(
                engine.from_latin(&latin).unwrap(),
                expected,
                "pair {}+{} did not re-segment",
                a.code,
                b.code
            );
        }
    }
}

#[test]
fn round_trip_holds_for_every_strategy() {
    let ranking: Vec<CharFrequency> = "་ཀཁགངཅཆཇ"
        .chars()
        .enumerate()
        .map(|(i, character)| CharFrequency {
            character,
            count: 100 - i as u64,
        })
        .collect();
    let vocab: HashSet<String> = ["Ab", "Cd", "Hello"].iter().map(|s| s.to_string()).collect();
    let config = BuildConfig {
        max_code_length: 2,
        ..BuildConfig::default()
    };
    let text = "ཀཁ་གང་ཅཆཇ། mixed ASCII 123";

    for strategy in [
        Strategy::Basic,
        Strategy::TokenizerOptimized,
        Strategy::Hybrid,
    ] {
        let table = build_mapping(&ranking, strategy, &config, Some(&vocab)).unwrap();
        let engine = Transliterator::new(table);
        assert!(engine.is_lossless(text), "round trip failed for {strategy}");
    }
}

#[test]
fn empty_table_still_round_trips() {
    let engine = Transliterator::new(MappingTable::from_records(Vec::new()).unwrap());
    assert!(engine.is_lossless("ཀཁག abc 123"));
}

#[test]
fn disabled_hex_fallback_reports_unmappable() {
    let engine = Transliterator::with_options(
        table_of(&[('ཀ', "A")]),
        EngineOptions { hex_fallback: false },
    );
    assert_eq!(
        engine.to_latin("ཀ😀"),
        Err(EncodeError::UnmappableCharacter {
            character: '😀',
            pos: 1
        })
    );
    // Mapped, escaped and bare-passthrough input still encodes.
    assert_eq!(engine.to_latin("ཀ x1").unwrap(), format!("A {ESCAPE_MARKER}x1"));
}

#[test]
fn failed_decode_leaves_engine_usable() {
    let engine = three_glyph_engine();
    assert!(engine.from_latin("Qq").is_err());
    assert_eq!(engine.from_latin("AB").unwrap(), "ཀཁ");
}

#[test]
fn truncated_and_malformed_escapes_are_errors() {
    let engine = three_glyph_engine();
    assert_eq!(
        engine.from_latin(&ESCAPE_MARKER.to_string()),
        Err(DecodeError::TruncatedEscape { pos: 0 })
    );
    assert_eq!(
        engine.from_latin(&format!("A{ESCAPE_MARKER}#01f6")),
        Err(DecodeError::TruncatedEscape { pos: 1 })
    );
    assert!(matches!(
        engine.from_latin(&format!("{ESCAPE_MARKER}#zzzzzz")),
        Err(DecodeError::InvalidHexPayload { .. })
    ));
}

#[test]
fn coverage_counts_mapped_share() {
    let engine = three_glyph_engine();
    let stats = engine.coverage("ཀཁ??");
    assert_eq!(stats.mapped, 2);
    assert_eq!(stats.unmapped, 2);
    assert_eq!(stats.total, 4);
    assert!((stats.ratio() - 0.5).abs() < f64::EPSILON);
}

#[test]
fn open_strategy_resolves_conventional_name() {
    let dir = tempfile::tempdir().unwrap();
    let table = table_of(&[('ཀ', "A")]);
    table.save(&dir.path().join("basic.tlm")).unwrap();

    let engine = Transliterator::open_strategy(dir.path(), Strategy::Basic).unwrap();
    assert_eq!(engine.to_latin("ཀ").unwrap(), "A");
    assert!(Transliterator::open_strategy(dir.path(), Strategy::Hybrid).is_err());
}

#[test]
fn shared_engine_across_threads() {
    let engine = layered_engine();
    let text = "ཀཁ་གང། abc";
    let latin = engine.to_latin(text).unwrap();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..100 {
                    assert_eq!(engine.to_latin(text).unwrap(), latin);
                    assert_eq!(engine.from_latin(&latin).unwrap(), text);
                }
            });
        }
    });
}

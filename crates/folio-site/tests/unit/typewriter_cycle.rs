//! Typewriter cycle over the default hero phrases.

use std::time::Duration;

use proptest::prelude::*;

use folio_core::FolioConfig;
use folio_site::typewriter::{DELETING_DELAY, PAUSE_DELAY, TYPING_DELAY};
use folio_site::{Phase, Typewriter};

fn hero() -> Typewriter {
    Typewriter::new(FolioConfig::default().site.typewriter_words).unwrap()
}

#[test]
fn test_react_developer_cycle() {
    let mut tw = hero();
    assert_eq!(tw.words()[0], "React Developer");

    for _ in 0..15 {
        tw.tick();
    }
    assert_eq!(tw.text(), "React Developer");
    assert_eq!(tw.phase(), Phase::Typing { word: 0, pos: 15 });

    tw.tick();
    assert_eq!(tw.phase(), Phase::Pausing { word: 0 });
    tw.tick();
    assert_eq!(tw.phase(), Phase::Deleting { word: 0, pos: 15 });

    for _ in 0..15 {
        tw.tick();
    }
    assert_eq!(tw.phase(), Phase::Deleting { word: 0, pos: 0 });
    tw.tick();
    assert_eq!(tw.phase(), Phase::Typing { word: 1, pos: 0 });
}

#[test]
fn test_virtual_clock_matches_tick_schedule() {
    let mut tw = hero();
    // 16 typing ticks (15 characters plus the switch to the pause).
    assert_eq!(tw.advance(TYPING_DELAY * 16), 16);
    assert_eq!(tw.phase(), Phase::Pausing { word: 0 });

    assert_eq!(tw.advance(PAUSE_DELAY - Duration::from_millis(1)), 0);
    assert_eq!(tw.advance(Duration::from_millis(1)), 1);
    assert_eq!(tw.phase(), Phase::Deleting { word: 0, pos: 15 });

    assert_eq!(tw.advance(DELETING_DELAY * 16), 16);
    assert_eq!(tw.phase(), Phase::Typing { word: 1, pos: 0 });
}

#[test]
fn test_three_phrases_wrap_around() {
    let mut tw = hero();
    let mut words_seen = Vec::new();
    let mut last = None;
    for _ in 0..400 {
        tw.tick();
        if let Phase::Typing { word, pos: 0 } = tw.phase()
            && last != Some(word)
        {
            words_seen.push(word);
            last = Some(word);
        }
    }
    assert!(words_seen.starts_with(&[1, 2, 0]));
}

proptest! {
    #[test]
    fn test_visible_text_is_always_a_prefix(ticks in 0usize..200) {
        let mut tw = hero();
        for _ in 0..ticks {
            tw.tick();
        }
        let word = match tw.phase() {
            Phase::Typing { word, .. } | Phase::Pausing { word } | Phase::Deleting { word, .. } => word,
        };
        prop_assert!(tw.words()[word].starts_with(&tw.text()));
    }
}

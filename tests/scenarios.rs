use arcade::cabinet::Cabinet;
use arcade::config::{Difficulty, SessionSettings};
use arcade::games::{Action, ModeKind, RoundState};
use arcade::ledger::{Direction, Ledger, ScoreEntry};
use arcade::session::{Phase, SessionEvent};
use arcade::storage::{FileStore, KeyValueStore};
use tempfile::TempDir;

fn settings() -> SessionSettings
{
    SessionSettings {
        countdown_secs: 0,
        difficulty: Difficulty::Medium,
    }
}

fn mount(dir: &TempDir, kind: ModeKind) -> Cabinet
{
    let store = FileStore::open(dir.path()).unwrap();
    Cabinet::mount(kind, settings(), Box::new(store), Some(42))
}

fn round(cabinet: &Cabinet) -> RoundState
{
    cabinet.session().unwrap().round_state().clone()
}

fn values(cabinet: &Cabinet) -> Vec<i64>
{
    cabinet.ranking().iter().map(|entry| entry.value).collect()
}

#[test]
fn reaction_time_lands_between_existing_scores()
{
    let dir = TempDir::new().unwrap();
    {
        let store = FileStore::open(dir.path()).unwrap();
        let mut ledger = Ledger::load("reaction", Direction::Ascending, Some(10), Box::new(store));
        ledger.record(ScoreEntry::new(1, 900));
        ledger.record(ScoreEntry::new(2, 700));
    }

    let mut cabinet = mount(&dir, ModeKind::Reaction { rounds: 1 });
    cabinet.start(0);
    let cue_at = cabinet.next_timer_due().unwrap();
    assert_eq!(cabinet.advance(cue_at), vec![SessionEvent::Cue]);
    cabinet.input(cue_at + 812, Action::Tap);

    assert_eq!(values(&cabinet), vec![700, 812, 900]);
    assert_eq!(cabinet.last_position(), Some(2));
    assert_eq!(values(&mount(&dir, ModeKind::Reaction { rounds: 1 })), vec![700, 812, 900]);
}

#[test]
fn legacy_bare_numbers_are_read_and_kept_ranked()
{
    let dir = TempDir::new().unwrap();
    let mut store = FileStore::open(dir.path()).unwrap();
    store.set("leaderboard.tapper", "[5, 12, 8]").unwrap();

    let mut cabinet = mount(&dir, ModeKind::Tapper { secs: 1 });
    assert_eq!(values(&cabinet), vec![12, 8, 5]);

    cabinet.start(0);
    for tap in 0..10 {
        cabinet.input(tap * 10, Action::Tap);
    }
    cabinet.advance(1000);
    assert_eq!(values(&cabinet), vec![12, 10, 8, 5]);
}

#[test]
fn tapper_board_keeps_only_the_top_five()
{
    let dir = TempDir::new().unwrap();
    let mut cabinet = mount(&dir, ModeKind::Tapper { secs: 1 });
    for taps in 1..=7u64 {
        cabinet.start(0);
        for tap in 0..taps {
            cabinet.input(tap * 10, Action::Tap);
        }
        cabinet.advance(1000);
    }
    assert_eq!(values(&cabinet), vec![7, 6, 5, 4, 3]);
}

#[test]
fn word_builder_keeps_the_words_with_the_score()
{
    let dir = TempDir::new().unwrap();
    let mut cabinet = mount(&dir, ModeKind::WordBuilder { secs: 5 });
    cabinet.start(0);
    for word in ["star", "dog", "alert", "star"] {
        cabinet.input(100, Action::Submit(word.to_string()));
    }
    cabinet.advance(5000);

    let reloaded = mount(&dir, ModeKind::WordBuilder { secs: 5 });
    let entry = &reloaded.ranking()[0];
    assert_eq!(entry.value, 9);
    let detail = entry.detail.as_ref().unwrap();
    assert_eq!(detail.label.as_deref(), Some("2 words"));
    assert_eq!(detail.words, vec!["star".to_string(), "alert".to_string()]);
}

#[test]
fn hitting_the_bomb_records_zero()
{
    let dir = TempDir::new().unwrap();
    let mut cabinet = mount(&dir, ModeKind::Bomb);
    cabinet.start(0);
    let RoundState::Bomb { bomb, .. } = round(&cabinet) else {
        panic!("not a bomb board");
    };
    let safe = (0..24).filter(|cell| *cell != bomb).take(3);
    for cell in safe {
        cabinet.input(10, Action::Select(cell));
    }
    assert_eq!(cabinet.session().unwrap().score(), 3);

    cabinet.input(20, Action::Select(bomb));
    assert_eq!(values(&cabinet), vec![0]);
}

#[test]
fn cashing_out_keeps_the_revealed_count()
{
    let dir = TempDir::new().unwrap();
    let mut cabinet = mount(&dir, ModeKind::Bomb);
    cabinet.start(0);
    let RoundState::Bomb { bomb, .. } = round(&cabinet) else {
        panic!("not a bomb board");
    };
    for cell in (0..24).filter(|cell| *cell != bomb).take(5) {
        cabinet.input(10, Action::Select(cell));
    }
    cabinet.input(20, Action::Stop);
    assert_eq!(values(&cabinet), vec![5]);
}

#[test]
fn simon_session_ends_on_the_first_wrong_pad()
{
    let dir = TempDir::new().unwrap();
    let mut cabinet = mount(&dir, ModeKind::Simon);
    cabinet.start(0);
    let mut now = 0;

    for level in 1..=3u32 {
        now += 10_000;
        cabinet.advance(now);
        let RoundState::Simon { sequence, playing: false, .. } = round(&cabinet) else {
            panic!("playback did not finish");
        };
        assert_eq!(sequence.len(), level as usize);

        if level < 3 {
            for pad in sequence {
                cabinet.input(now, Action::Select(pad));
            }
            assert_eq!(cabinet.view().unwrap().phase, Phase::Resolving);
        } else {
            let wrong = (sequence[0] + 1) % 4;
            cabinet.input(now, Action::Select(wrong));
        }
        now += 1000;
        cabinet.advance(now);
    }
    assert_eq!(cabinet.view().unwrap().phase, Phase::Complete);
    assert_eq!(values(&cabinet), vec![3]);
}

#[test]
fn wordle_ranks_fewer_attempts_first()
{
    let dir = TempDir::new().unwrap();
    let mut cabinet = mount(&dir, ModeKind::Wordle);
    for misses in [2usize, 0] {
        cabinet.start(0);
        let RoundState::Wordle { secret, .. } = round(&cabinet) else {
            panic!("not a wordle round");
        };
        let wrong = if secret == "ghost" { "brick" } else { "ghost" };
        for _ in 0..misses {
            cabinet.input(10, Action::Submit(wrong.to_string()));
        }
        cabinet.input(20, Action::Submit(secret.to_uppercase()));
    }
    assert_eq!(values(&cabinet), vec![1, 3]);
}

#[test]
fn estimate_scores_closeness_to_the_target()
{
    let dir = TempDir::new().unwrap();
    let mut cabinet = mount(&dir, ModeKind::Estimate);
    cabinet.start(0);
    let RoundState::Estimate { target_ms } = round(&cabinet) else {
        panic!("not an estimate round");
    };
    cabinet.input(target_ms + 120, Action::Tap);
    assert_eq!(values(&cabinet), vec![9_880]);
}

#[test]
fn quitting_mid_game_records_nothing()
{
    let dir = TempDir::new().unwrap();
    let mut cabinet = mount(&dir, ModeKind::Arithmetic);
    cabinet.start(0);
    cabinet.input(10, Action::Submit("nope".to_string()));
    cabinet.leave();
    drop(cabinet);
    assert!(mount(&dir, ModeKind::Arithmetic).ranking().is_empty());
}

#[test]
fn face_finder_ranks_the_total_search_time()
{
    let dir = TempDir::new().unwrap();
    let mut cabinet = mount(&dir, ModeKind::FaceFinder);
    cabinet.start(0);
    let mut now = 0;
    for took in [800, 600, 400] {
        let RoundState::Faces { at, cells, .. } = round(&cabinet) else {
            panic!("not a face round");
        };
        let miss = cabinet.input(now + took - 100, Action::Select((at + 1) % cells));
        assert_eq!(miss, vec![SessionEvent::Rejected { hint: None }]);
        cabinet.input(now + took, Action::Select(at));
        assert_eq!(cabinet.view().unwrap().phase, Phase::Resolving);
        now += took + 500;
        cabinet.advance(now);
    }
    assert_eq!(cabinet.view().unwrap().phase, Phase::Complete);
    assert_eq!(values(&cabinet), vec![1_800]);
}

#[test]
fn pairs_turns_a_mismatch_back_after_a_second()
{
    let dir = TempDir::new().unwrap();
    let mut cabinet = mount(&dir, ModeKind::Pairs);
    cabinet.start(0);
    let RoundState::Pairs { faces, .. } = round(&cabinet) else {
        panic!("not a pairs board");
    };
    let partner = |card: usize| {
        (0..faces.len())
            .find(|other| *other != card && faces[*other] == faces[card])
            .unwrap()
    };
    let stranger = (1..faces.len()).find(|card| faces[*card] != faces[0]).unwrap();

    cabinet.input(100, Action::Select(0));
    cabinet.input(200, Action::Select(stranger));
    assert_eq!(cabinet.next_timer_due(), Some(1_200));
    let early = cabinet.input(700, Action::Select(partner(0)));
    assert!(matches!(early.as_slice(), [SessionEvent::Rejected { hint: Some(_) }]));
    assert_eq!(cabinet.advance(1_200), vec![SessionEvent::Cue]);
    let RoundState::Pairs { open, .. } = round(&cabinet) else {
        panic!("not a pairs board");
    };
    assert!(open.is_empty());

    for card in 0..faces.len() {
        let other = partner(card);
        if other > card {
            cabinet.input(20_000, Action::Select(card));
            cabinet.input(20_000, Action::Select(other));
        }
    }
    assert_eq!(values(&cabinet), vec![20_000]);
}

#[test]
fn rhythm_scores_only_the_unguided_stretch()
{
    let dir = TempDir::new().unwrap();
    let mut cabinet = mount(&dir, ModeKind::Rhythm);
    cabinet.start(0);
    cabinet.input(3_000, Action::Tap);
    for beat in 0..20 {
        cabinet.input(5_000 + beat * 500, Action::Tap);
    }
    assert_eq!(cabinet.session().unwrap().score(), 1_000);
    cabinet.advance(15_000);
    assert_eq!(cabinet.view().unwrap().phase, Phase::Complete);
    assert_eq!(values(&cabinet), vec![1_000]);
    let detail = cabinet.ranking()[0].detail.as_ref().unwrap();
    assert_eq!(detail.label.as_deref(), Some("20 taps"));
}

#[test]
fn random_words_keeps_one_letter_and_the_word_list()
{
    let dir = TempDir::new().unwrap();
    let mut cabinet = mount(&dir, ModeKind::RandomWords { secs: 5 });
    cabinet.start(0);
    let RoundState::Initial { letter } = round(&cabinet) else {
        panic!("not a letter round");
    };
    let long = format!("{letter}zzzz");
    let short = format!("{letter}q");
    for word in [&long, &short, &long] {
        cabinet.input(100, Action::Submit(word.clone()));
    }
    assert_eq!(round(&cabinet), RoundState::Initial { letter });
    cabinet.advance(5_000);

    let board = mount(&dir, ModeKind::RandomWords { secs: 5 });
    let ranking = board.ranking();
    let entry = &ranking[0];
    assert_eq!(entry.value, 7);
    assert_eq!(entry.detail.as_ref().unwrap().words, vec![long, short]);
}

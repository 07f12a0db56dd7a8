use balloon_pop::grid::Grid;
use balloon_pop::protocol::{parse_command, ClientCommand};
use balloon_pop::types::IgnoredReason;
use balloon_pop::{ClickOutcome, EngineError, GameConfig, GameEngine, SessionStatus};

fn engine_with(art: &str, probability: i64) -> GameEngine {
    let grid = Grid::parse(art).expect("test grid should parse");
    let config = GameConfig::new(grid.rows() as i64, grid.columns() as i64, probability)
        .expect("valid config");
    GameEngine::from_grid(config, grid, 1).expect("grid matches config")
}

fn send(engine: &mut GameEngine, line: &str) -> Result<ClickOutcome, EngineError> {
    match parse_command(line) {
        Some(ClientCommand::Click { row, col }) => engine.click(row, col),
        other => panic!("expected a click command, got {other:?}"),
    }
}

#[test]
fn json_commands_play_a_board_to_the_end() {
    let mut engine = engine_with("ooo.. ....o oo..o", 40);
    assert_eq!(engine.catalog().sizes(), &[2, 2, 3]);

    assert!(matches!(
        send(&mut engine, r#"{"type":"click","row":0,"col":2}"#),
        Ok(ClickOutcome::Popped { size: 3, remaining: 4 })
    ));
    assert!(matches!(
        send(&mut engine, "2 4"),
        Ok(ClickOutcome::Popped { size: 2, remaining: 2 })
    ));
    assert_eq!(
        send(&mut engine, "2,1"),
        Ok(ClickOutcome::Cleared { size: 2 })
    );
    assert_eq!(engine.status(), SessionStatus::Cleared);
    assert!(engine.grid().is_cleared());

    let summary = engine.build_summary();
    assert_eq!(summary.pops, 3);
    assert_eq!(summary.popped, 7);
    assert_eq!(summary.initial_groups, 3);
}

#[test]
fn wrong_group_fails_and_reset_recovers() {
    let mut engine = engine_with("ooo.. ..... o...o", 40);
    let before = engine.grid().clone();
    assert_eq!(
        send(&mut engine, "2 0"),
        Ok(ClickOutcome::Failed {
            size: 1,
            max_group_size: 3
        })
    );
    assert_eq!(engine.grid(), &before);
    assert_eq!(
        send(&mut engine, "0 0"),
        Ok(ClickOutcome::Ignored {
            reason: IgnoredReason::NotPlaying
        })
    );

    assert_eq!(parse_command(r#"{"type":"reset"}"#), Some(ClientCommand::Reset));
    engine.reset();
    assert_eq!(engine.status(), SessionStatus::Playing);
    assert!(!engine.grid().is_cleared());
}

#[test]
fn out_of_bounds_clicks_never_fail_the_session() {
    let mut engine = engine_with("o.o", 40);
    for line in ["-1 0", "0 3", r#"{"type":"click","row":5,"col":5}"#] {
        assert!(matches!(
            send(&mut engine, line),
            Err(EngineError::OutOfBounds { .. })
        ));
    }
    assert_eq!(engine.status(), SessionStatus::Playing);
}

#[test]
fn invalid_configuration_never_builds_an_engine() {
    assert!(GameConfig::new(6, 6, 150).is_err());
    assert!(GameConfig::new(0, 6, 30).is_err());
}

#[test]
fn generic_rule_matches_full_board_shortcut() {
    let config = GameConfig::new(3, 3, 100).expect("valid config");
    for seed in 0..20u32 {
        let mut engine = GameEngine::with_seed(config, seed);
        let row = (seed % 3) as i64;
        let col = (seed / 3 % 3) as i64;
        assert_eq!(engine.click(row, col), Ok(ClickOutcome::Cleared { size: 9 }));
        assert_eq!(engine.status(), SessionStatus::Cleared);
    }
}

#[test]
fn fresh_sessions_are_never_pre_cleared() {
    for probability in [0, 1, 10, 50, 99] {
        let config = GameConfig::new(4, 4, probability).expect("valid config");
        for seed in 0..200u32 {
            let engine = GameEngine::with_seed(config, seed);
            assert_eq!(engine.status(), SessionStatus::Playing);
            assert!(engine.grid().balloon_count() >= 1);
        }
    }
}

use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use numdrill::app::{App, Flow, Screen};
use numdrill::catalog::GameKind;
use numdrill::config::{save_config, MemoryConfigStore};
use numdrill::position::{PositionConfig, PositionPhase};
use numdrill::results_log::ResultsLog;
use numdrill::runtime::{FixedTicker, GameEvent, Runner, TestEventSource};
use numdrill::sum::{SumConfig, SumPhase};
use numdrill::timer::Moment;

// Headless integration using the runtime + App without a TTY.
// Every Tick advances a simulated clock so the countdown and display
// timers run instantly.
const SIMULATED_TICK: Duration = Duration::from_millis(100);

fn key(code: KeyCode) -> GameEvent {
    GameEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

/// Drives `app` until `done` holds or the step budget runs out.
fn drive(
    app: &mut App,
    runner: &Runner<TestEventSource, FixedTicker>,
    clock: &mut Moment,
    mut done: impl FnMut(&App) -> bool,
) -> bool {
    for _ in 0..1000u32 {
        let flow = match runner.step() {
            GameEvent::Tick => {
                *clock = clock.after(SIMULATED_TICK);
                app.on_tick(*clock);
                Flow::Continue
            }
            GameEvent::Key(k) => app.handle_key(k, *clock),
            GameEvent::Mouse(m) => {
                app.handle_mouse(m, *clock);
                Flow::Continue
            }
            GameEvent::Resize => Flow::Continue,
        };
        if flow == Flow::Quit || done(app) {
            return true;
        }
    }
    false
}

fn runner() -> (mpsc::Sender<GameEvent>, Runner<TestEventSource, FixedTicker>) {
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );
    (tx, runner)
}

#[test]
fn headless_sum_round_is_logged() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("results.csv");
    let store = MemoryConfigStore::new();
    save_config(
        &store,
        &SumConfig {
            number_count: 3,
            min_number: 2,
            max_number: 2,
            display_duration_ms: 300,
            pause_duration_ms: 100,
        },
    )
    .unwrap();
    let mut app = App::new(store, Some(ResultsLog::with_path(&log_path)), Some(7));
    let mut clock = Moment::now();
    let (tx, runner) = runner();

    // menu -> Sum Memory -> start
    tx.send(key(KeyCode::Enter)).unwrap();
    tx.send(key(KeyCode::Enter)).unwrap();
    assert!(drive(&mut app, &runner, &mut clock, |a| {
        matches!(a.sum.phase(), SumPhase::Input { .. })
    }));
    assert_eq!(app.screen, Screen::Game(GameKind::SumMemory));

    tx.send(key(KeyCode::Char('6'))).unwrap();
    tx.send(key(KeyCode::Enter)).unwrap();
    assert!(drive(&mut app, &runner, &mut clock, |a| {
        matches!(a.sum.phase(), SumPhase::Result { .. })
    }));

    match app.sum.phase() {
        SumPhase::Result { result, .. } => {
            assert!(result.is_correct);
            assert_eq!(result.correct_answer, 6);
        }
        other => panic!("expected result, got {}", other.name()),
    }

    let mut reader = csv::Reader::from_path(&log_path).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][1], "sum-memory");
}

#[test]
fn headless_position_session_runs_to_results() {
    let store = MemoryConfigStore::new();
    save_config(
        &store,
        &PositionConfig {
            round_count: 3,
            feedback_duration_ms: 200,
            ..PositionConfig::default()
        },
    )
    .unwrap();
    let mut app = App::new(store, None, Some(7));
    let mut clock = Moment::now();
    let (tx, runner) = runner();

    tx.send(key(KeyCode::Down)).unwrap();
    tx.send(key(KeyCode::Enter)).unwrap();
    tx.send(key(KeyCode::Enter)).unwrap();
    assert!(drive(&mut app, &runner, &mut clock, |a| {
        matches!(a.position.phase(), PositionPhase::Playing { .. })
    }));

    for round in 1..=3u32 {
        assert!(drive(&mut app, &runner, &mut clock, |a| {
            matches!(
                a.position.phase(),
                PositionPhase::Playing { round: r, .. } if r.round.number == round && r.feedback.is_none()
            )
        }));
        tx.send(key(KeyCode::Right)).unwrap();
        tx.send(key(KeyCode::Enter)).unwrap();
        assert!(drive(&mut app, &runner, &mut clock, |a| {
            a.position.session().map(|s| s.rounds().len()) == Some(round as usize)
        }));
    }

    // the last feedback window closes into the result screen
    assert!(drive(&mut app, &runner, &mut clock, |a| {
        matches!(a.position.phase(), PositionPhase::Result { .. })
    }));
    let session = app.position.session().unwrap();
    assert!(session.is_game_over());
    assert_eq!(session.rounds().len(), 3);
    assert!(session.total_score() <= session.max_score());
}

#[test]
fn headless_quit_from_menu() {
    let mut app = App::new(MemoryConfigStore::new(), None, None);
    let mut clock = Moment::now();
    let (tx, runner) = runner();
    tx.send(key(KeyCode::Char('q'))).unwrap();

    let mut quit_seen = false;
    for _ in 0..10 {
        if let GameEvent::Key(k) = runner.step() {
            quit_seen = app.handle_key(k, clock) == Flow::Quit;
            break;
        }
        clock = clock.after(SIMULATED_TICK);
    }
    assert!(quit_seen);
}

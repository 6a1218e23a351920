use std::time::Duration;

use canvas_snake_core::{
    Color, Event, GameConfig, Layer, ScoreStore, ScoreStoreError, TextAlign, TextBaseline,
};
use canvas_snake_rendering::{LayeredCanvas, Shape};
use canvas_snake_system_hud::{Hud, MemoryScoreStore, Screen};

/// Store whose backing storage is permanently unavailable.
#[derive(Default)]
struct BrokenStore {
    writes: u32,
}

impl ScoreStore for BrokenStore {
    fn load_high_score(&self) -> Result<Option<u32>, ScoreStoreError> {
        Err(ScoreStoreError::Unavailable {
            reason: "disk on fire".to_owned(),
        })
    }

    fn store_high_score(&mut self, _high_score: u32) -> Result<(), ScoreStoreError> {
        self.writes += 1;
        Err(ScoreStoreError::Unavailable {
            reason: "disk on fire".to_owned(),
        })
    }
}

fn texts(canvas: &LayeredCanvas) -> Vec<String> {
    canvas
        .shapes_on(Layer::Hud)
        .into_iter()
        .filter_map(|shape| match shape {
            Shape::Text(run) => Some(run.text),
            Shape::Rect(_) => None,
        })
        .collect()
}

#[test]
fn high_score_is_read_from_the_store() {
    let config = GameConfig::default();
    let mut canvas = LayeredCanvas::new();
    let store = MemoryScoreStore::with_high_score(17);

    let hud = Hud::new(&config, &mut canvas, &store, 1);

    assert_eq!(hud.high_score(), 17);
    assert_eq!(hud.score(), 0);
}

#[test]
fn unreadable_store_starts_from_zero() {
    let config = GameConfig::default();
    let mut canvas = LayeredCanvas::new();
    let store = BrokenStore::default();

    let hud = Hud::new(&config, &mut canvas, &store, 1);

    assert_eq!(hud.high_score(), 0);
}

#[test]
fn beating_the_high_score_persists_it() {
    let config = GameConfig::default();
    let mut canvas = LayeredCanvas::new();
    let mut store = MemoryScoreStore::with_high_score(2);
    let mut hud = Hud::new(&config, &mut canvas, &store, 1);

    assert_eq!(hud.set_score(1, &mut store), None);
    assert_eq!(hud.set_score(2, &mut store), None);
    assert_eq!(store.high_score(), Some(2));

    assert_eq!(
        hud.set_score(3, &mut store),
        Some(Event::HighScoreChanged { high_score: 3 })
    );
    assert_eq!(store.high_score(), Some(3));
    assert_eq!(hud.high_score(), 3);
    assert_eq!(hud.score(), 3);
}

#[test]
fn failed_writes_still_raise_the_displayed_high_score() {
    let config = GameConfig::default();
    let mut canvas = LayeredCanvas::new();
    let mut store = BrokenStore::default();
    let mut hud = Hud::new(&config, &mut canvas, &store, 1);

    let event = hud.set_score(4, &mut store);

    assert_eq!(event, Some(Event::HighScoreChanged { high_score: 4 }));
    assert_eq!(hud.high_score(), 4);
    assert_eq!(store.writes, 1);
}

#[test]
fn running_game_shows_the_score_top_right() {
    let config = GameConfig::default();
    let mut canvas = LayeredCanvas::new();
    let mut store = MemoryScoreStore::new();
    let mut hud = Hud::new(&config, &mut canvas, &store, 1);
    let _ = hud.set_score(5, &mut store);

    hud.draw(None, false);

    assert_eq!(hud.screen(), Screen::Score);
    let shapes = canvas.shapes_on(Layer::Hud);
    assert_eq!(shapes.len(), 1);
    match &shapes[0] {
        Shape::Text(run) => {
            assert_eq!(run.text, "5");
            assert_eq!((run.x, run.y), (1160, 40));
            assert_eq!(run.style.color, Color::TEXT);
            assert_eq!(run.style.align, TextAlign::Right);
            assert_eq!(run.style.baseline, TextBaseline::Top);
        }
        other => panic!("expected score text, found {other:?}"),
    }
}

#[test]
fn pause_screen_shows_overlay_and_options() {
    let config = GameConfig::default();
    let mut canvas = LayeredCanvas::new();
    let store = MemoryScoreStore::new();
    let mut hud = Hud::new(&config, &mut canvas, &store, 1);

    hud.draw(None, true);

    assert_eq!(hud.screen(), Screen::Paused);
    assert_eq!(texts(&canvas), vec!["Paused", "Show Debug Info"]);
    let overlay = canvas.shapes_on(Layer::Hud).into_iter().any(|shape| {
        matches!(shape, Shape::Rect(rect)
            if rect.color == Color::OVERLAY && rect.width == 1200 && rect.height == 600)
    });
    assert!(overlay, "pause screen dims the playfield");
}

#[test]
fn game_over_screen_lists_scores_and_game_number() {
    let config = GameConfig::default();
    let mut canvas = LayeredCanvas::new();
    let mut store = MemoryScoreStore::with_high_score(9);
    let mut hud = Hud::new(&config, &mut canvas, &store, 4);
    let _ = hud.set_score(6, &mut store);
    hud.set_game_over(true);

    hud.draw(Some(Duration::from_millis(500)), true);

    assert_eq!(hud.screen(), Screen::GameOver);
    assert_eq!(
        texts(&canvas),
        vec![
            "Game Over",
            "Score 6",
            "High score 9",
            "Press Enter to",
            "Start a New Game",
            "Game no. 4",
        ]
    );
}

#[test]
fn redrawing_replaces_the_previous_frame() {
    let config = GameConfig::default();
    let mut canvas = LayeredCanvas::new();
    let mut store = MemoryScoreStore::new();
    let mut hud = Hud::new(&config, &mut canvas, &store, 1);

    hud.draw(None, true);
    let _ = hud.set_score(1, &mut store);
    hud.draw(None, false);

    assert_eq!(texts(&canvas), vec!["1"]);
}

#[test]
fn debug_overlay_reports_pointer_fps_and_game_count() {
    let config = GameConfig {
        show_debug: true,
        ..GameConfig::default()
    };
    let mut canvas = LayeredCanvas::new();
    let store = MemoryScoreStore::new();
    let mut hud = Hud::new(&config, &mut canvas, &store, 2);

    hud.pointer_moved(120, 80);
    hud.draw(Some(Duration::from_millis(1_000)), false);
    assert_eq!(texts(&canvas), vec!["Mouse: 120, 80", "Game count: 2", "0"]);

    hud.draw(Some(Duration::from_millis(1_020)), false);
    assert_eq!(
        texts(&canvas),
        vec!["Mouse: 120, 80", "FPS: 50", "Game count: 2", "0"]
    );
}

#[test]
fn clicking_the_debug_option_toggles_it_only_while_paused() {
    let config = GameConfig::default();
    let mut canvas = LayeredCanvas::new();
    let store = MemoryScoreStore::new();
    let mut hud = Hud::new(&config, &mut canvas, &store, 1);
    let (x, y) = (config.width() / 2, config.height() / 2 - config.grid_size / 2);

    hud.draw(None, false);
    hud.pointer_pressed(x, y);
    assert!(!hud.is_debug_enabled());

    hud.draw(None, true);
    hud.pointer_pressed(x, y);
    assert!(hud.is_debug_enabled());

    hud.pointer_pressed(10, 10);
    assert!(hud.is_debug_enabled());

    hud.pointer_pressed(x, y);
    assert!(!hud.is_debug_enabled());
}

#[test]
fn teardown_detaches_the_surface() {
    let config = GameConfig::default();
    let mut canvas = LayeredCanvas::new();
    let store = MemoryScoreStore::new();
    let mut hud = Hud::new(&config, &mut canvas, &store, 1);
    assert_eq!(canvas.surface_count(), 1);

    hud.tear_down();
    hud.draw(None, false);

    assert!(hud.is_torn_down());
    assert_eq!(canvas.surface_count(), 0);
}

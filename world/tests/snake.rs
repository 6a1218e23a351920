use std::time::Duration;

use canvas_snake_core::{
    ColliderTag, CollisionEvent, Color, Direction, Event, GameConfig, GridCell, Key, Layer,
    PauseState, StepVector,
};
use canvas_snake_rendering::{LayeredCanvas, Shape};
use canvas_snake_world::{GridEntity, Snake};

fn cells(coords: &[(i32, i32)]) -> Vec<GridCell> {
    coords.iter().map(|&(x, y)| GridCell::new(x, y)).collect()
}

fn body(snake: &Snake) -> Vec<GridCell> {
    snake.body().iter().copied().collect()
}

fn snake_rects(canvas: &LayeredCanvas) -> Vec<GridCell> {
    canvas
        .shapes_on(Layer::Playfield)
        .into_iter()
        .filter_map(|shape| match shape {
            Shape::Rect(rect) if rect.color == Color::SNAKE => Some(GridCell::new(rect.x, rect.y)),
            _ => None,
        })
        .collect()
}

#[test]
fn fresh_snake_grows_to_target_length_then_slides() {
    let config = GameConfig::default();
    let mut canvas = LayeredCanvas::new();
    let mut snake = Snake::new(&config, &mut canvas);
    let mut events = Vec::new();

    assert_eq!(body(&snake), cells(&[(0, 0)]));
    assert_eq!(snake.move_step(&mut events), None);
    assert_eq!(snake.move_step(&mut events), None);
    assert_eq!(snake.move_step(&mut events), Some(GridCell::new(0, 0)));

    assert_eq!(body(&snake), cells(&[(120, 0), (80, 0), (40, 0)]));
    assert_eq!(snake.body().len(), snake.target_length());
    assert_eq!(
        events.last(),
        Some(&Event::SnakeAdvanced {
            head: GridCell::new(120, 0),
            removed: Some(GridCell::new(0, 0)),
        })
    );
}

#[test]
fn move_step_shifts_head_by_vector_and_drops_tail() {
    let config = GameConfig::default();
    let mut canvas = LayeredCanvas::new();
    let mut snake =
        Snake::new(&config, &mut canvas).with_body(cells(&[(200, 120), (160, 120), (120, 120)]));
    let mut events = Vec::new();

    let removed = snake.move_step(&mut events);

    assert_eq!(snake.head(), GridCell::new(240, 120));
    assert_eq!(removed, Some(GridCell::new(120, 120)));
    assert_eq!(snake.body().len(), 3);
}

#[test]
fn eating_skips_the_next_pop_and_speeds_up() {
    let config = GameConfig::default();
    let mut canvas = LayeredCanvas::new();
    let mut snake =
        Snake::new(&config, &mut canvas).with_body(cells(&[(80, 0), (40, 0), (0, 0)]));
    let mut events = Vec::new();

    let grew = snake.collide(CollisionEvent::new(ColliderTag::Snake, ColliderTag::Food));
    assert_eq!(grew, Some(Event::SnakeGrew { target_length: 4 }));
    assert_eq!(snake.time_factor(), 5.5 - 0.125);

    assert_eq!(snake.move_step(&mut events), None);
    assert_eq!(snake.body().len(), 4);
    assert_eq!(snake.move_step(&mut events), Some(GridCell::new(0, 0)));
    assert_eq!(snake.body().len(), 4);
}

#[test]
fn speed_up_has_no_floor() {
    let config = GameConfig::default();
    let mut canvas = LayeredCanvas::new();
    let mut snake = Snake::new(&config, &mut canvas);

    for _ in 0..100 {
        let _ = snake.eat();
    }

    assert_eq!(snake.time_factor(), 5.5 - 12.5);
    assert!(snake.step_interval() < Duration::from_millis(1));
    assert_eq!(snake.target_length(), 103);
}

#[test]
fn reversing_into_the_body_kills_before_rendering() {
    let config = GameConfig::default();
    let mut canvas = LayeredCanvas::new();
    let mut snake =
        Snake::new(&config, &mut canvas).with_body(cells(&[(80, 0), (40, 0), (0, 0)]));
    let mut events = Vec::new();

    snake.handle_key(Key::ArrowLeft, PauseState::Running);
    assert_eq!(
        snake.vector(),
        StepVector::toward(Direction::West, config.grid_size)
    );

    let _ = snake.move_step(&mut events);

    assert!(snake.is_dead());
    assert_eq!(
        events,
        vec![
            Event::SnakeAdvanced {
                head: GridCell::new(40, 0),
                removed: Some(GridCell::new(0, 0)),
            },
            Event::SnakeDied {
                cause: ColliderTag::SnakeHead,
            },
        ]
    );
}

#[test]
fn dead_snake_ignores_movement_and_drawing() {
    let config = GameConfig::default();
    let mut canvas = LayeredCanvas::new();
    let mut snake =
        Snake::new(&config, &mut canvas).with_body(cells(&[(80, 0), (40, 0), (0, 0)]));
    let mut events = Vec::new();

    let died = snake.collide(CollisionEvent::new(ColliderTag::Snake, ColliderTag::Wall));
    assert_eq!(
        died,
        Some(Event::SnakeDied {
            cause: ColliderTag::Wall
        })
    );
    let again = snake.collide(CollisionEvent::new(ColliderTag::Snake, ColliderTag::Wall));
    assert_eq!(again, None);

    let before = body(&snake);
    assert_eq!(snake.move_step(&mut events), None);
    snake.draw(None, PauseState::Running, &mut events);

    assert_eq!(body(&snake), before);
    assert!(events.is_empty());
}

#[test]
fn unrelated_tags_are_ignored() {
    let config = GameConfig::default();
    let mut canvas = LayeredCanvas::new();
    let mut snake = Snake::new(&config, &mut canvas);

    assert_eq!(
        snake.collide(CollisionEvent::new(ColliderTag::Snake, ColliderTag::Snake)),
        None
    );
    assert_eq!(
        snake.collide(CollisionEvent::new(ColliderTag::Food, ColliderTag::Wall)),
        None
    );
    assert!(!snake.is_dead());
}

#[test]
fn timing_gate_waits_for_the_step_interval() {
    let config = GameConfig::default();
    let mut canvas = LayeredCanvas::new();
    let mut snake = Snake::new(&config, &mut canvas);
    let mut events = Vec::new();

    // exp(5.5) ms is just under 245 ms.
    snake.draw(Some(Duration::from_millis(1_000)), PauseState::Running, &mut events);
    assert_eq!(snake.head(), GridCell::new(40, 0));

    snake.draw(Some(Duration::from_millis(1_100)), PauseState::Running, &mut events);
    assert_eq!(snake.head(), GridCell::new(40, 0));

    snake.draw(Some(Duration::from_millis(1_245)), PauseState::Running, &mut events);
    assert_eq!(snake.head(), GridCell::new(80, 0));

    snake.draw(None, PauseState::Running, &mut events);
    assert_eq!(snake.head(), GridCell::new(120, 0));
    assert_eq!(snake.last_step(), None);
}

#[test]
fn pause_freezes_movement_and_steering() {
    let config = GameConfig::default();
    let mut canvas = LayeredCanvas::new();
    let mut snake = Snake::new(&config, &mut canvas);
    let mut events = Vec::new();

    snake.handle_key(Key::ArrowDown, PauseState::Paused);
    snake.draw(None, PauseState::Paused, &mut events);

    assert_eq!(snake.head(), GridCell::new(0, 0));
    assert_eq!(
        snake.vector(),
        StepVector::toward(Direction::East, config.grid_size)
    );
    assert!(events.is_empty());

    snake.handle_key(Key::ArrowDown, PauseState::Running);
    snake.draw(None, PauseState::Running, &mut events);
    assert_eq!(snake.head(), GridCell::new(0, 40));
}

#[test]
fn drawing_paints_body_and_clears_removed_segment() {
    let config = GameConfig::default();
    let mut canvas = LayeredCanvas::new();
    let mut snake =
        Snake::new(&config, &mut canvas).with_body(cells(&[(80, 0), (40, 0), (0, 0)]));
    let mut events = Vec::new();

    snake.draw(None, PauseState::Running, &mut events);

    let mut painted = snake_rects(&canvas);
    painted.sort();
    assert_eq!(painted, cells(&[(40, 0), (80, 0), (120, 0)]));
}

#[test]
fn colliders_follow_the_body() {
    let config = GameConfig::default();
    let mut canvas = LayeredCanvas::new();
    let mut snake =
        Snake::new(&config, &mut canvas).with_body(cells(&[(80, 0), (40, 0), (0, 0)]));
    let mut events = Vec::new();

    let _ = snake.move_step(&mut events);

    let body_collider = snake.collider().expect("live snake has a collider");
    assert_eq!(body_collider.len(), 3);
    assert!(!body_collider.contains(GridCell::new(0, 0)));
    let head = snake.head_collider().expect("head collider");
    assert_eq!(head.cells().collect::<Vec<_>>(), cells(&[(120, 0)]));
    let tail = snake.tail_collider().expect("tail collider");
    assert!(!tail.contains(GridCell::new(120, 0)));
    assert_eq!(tail.len(), 2);
}

#[test]
fn teardown_detaches_surface_and_colliders() {
    let config = GameConfig::default();
    let mut canvas = LayeredCanvas::new();
    let mut snake = Snake::new(&config, &mut canvas);
    let mut events = Vec::new();
    assert_eq!(canvas.surface_count(), 1);

    snake.tear_down();

    assert!(snake.is_torn_down());
    assert_eq!(canvas.surface_count(), 0);
    assert!(snake.collider().is_none());
    assert_eq!(snake.move_step(&mut events), None);
    assert_eq!(
        snake.collide(CollisionEvent::new(ColliderTag::Snake, ColliderTag::Wall)),
        None
    );
    assert!(!snake.is_dead());
}

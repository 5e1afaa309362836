//! Integration tests for the TUI app.
//!
//! These drive the app through key presses and ticks the way the binary
//! does, without a terminal.

use super::app::{App, SequenceFocus, Tab};
use crate::config::VizConfig;
use crate::engine::Highlight;
use crate::replay::PlaybackState;
use crate::structures::graph::GraphAlgorithm;
use crate::structures::hash_table::CollisionStrategy;
use crate::structures::sorting::SortAlgorithm;
use crate::structures::tree::TraversalOrder;
use crossterm::event::KeyCode;

fn app() -> App {
    App::new(VizConfig::default()).unwrap()
}

fn press(app: &mut App, keys: &str) {
    for c in keys.chars() {
        app.handle_key(KeyCode::Char(c));
    }
}

fn type_line(app: &mut App, text: &str) {
    app.handle_key(KeyCode::Char('e'));
    press(app, text);
    app.handle_key(KeyCode::Enter);
}

/// Tick once per second until nothing on screen is playing.
fn play_out(app: &mut App, mut now: u64) -> u64 {
    for _ in 0..200 {
        app.tick(now);
        now += 1000;
    }
    now
}

#[test]
fn test_app_lifecycle() {
    let mut app = app();

    // Initial state
    assert_eq!(app.tab, Tab::Arrays);
    assert!(!app.should_quit());
    assert!(!app.arrays.replay().is_playing());
    assert_eq!(app.array_view().values, vec![64, 34, 25, 12, 22, 11, 90]);

    // Start sorting
    press(&mut app, "s");
    assert!(app.arrays.replay().is_playing());

    // Pause
    press(&mut app, " ");
    assert_eq!(app.arrays.replay().state(), PlaybackState::Paused);

    // Single step
    let before = app.arrays.replay().cursor();
    app.handle_key(KeyCode::Right);
    assert_eq!(app.arrays.replay().cursor(), before + 1);

    // Reset
    press(&mut app, "r");
    assert_eq!(app.arrays.replay().cursor(), 0);
    assert!(!app.arrays.replay().is_playing());

    // Quit
    press(&mut app, "q");
    assert!(app.should_quit());
}

#[test]
fn test_digit_keys_switch_tabs() {
    let mut app = app();
    for (digit, tab) in ('1'..='7').zip(Tab::ALL) {
        app.handle_key(KeyCode::Char(digit));
        assert_eq!(app.tab, tab);
    }
    press(&mut app, "8");
    assert_eq!(app.tab, Tab::HashTable);
}

#[test]
fn test_step_while_playing_shows_error() {
    let mut app = app();
    press(&mut app, "sn");
    let message = app.message.clone().unwrap();
    assert!(message.is_error);
    assert_eq!(message.text, "Pause playback before stepping");
}

#[test]
fn test_sorting_plays_to_sorted_array() {
    let mut app = app();
    type_line(&mut app, "5,3,8,1");
    press(&mut app, "as");
    assert_eq!(app.arrays.algorithm(), SortAlgorithm::Quick);

    play_out(&mut app, 0);
    assert!(!app.arrays.replay().is_playing());
    assert!(app.arrays.replay().is_at_end());
    assert_eq!(app.array_view().values, vec![1, 3, 5, 8]);
}

#[test]
fn test_typed_array_replaces_shown_values() {
    let mut app = app();
    type_line(&mut app, "9, 4, 7");
    assert_eq!(app.arrays.values(), &[9, 4, 7]);
    assert_eq!(app.array_view().values, vec![9, 4, 7]);
    assert_eq!(app.message.as_ref().unwrap().text, "Array: [9, 4, 7]");

    press(&mut app, "s");
    assert_eq!(app.arrays.replay().log().first().values, vec![9, 4, 7]);
}

#[test]
fn test_speed_reaches_every_replay() {
    let mut app = app();
    press(&mut app, "+");
    assert!((app.speed() - 60.0).abs() < f64::EPSILON);
    assert_eq!(app.arrays.replay().step_duration_ms(), 460);
    assert_eq!(app.heap.replay.step_duration_ms(), 460);
    assert_eq!(app.queue.replay.step_duration_ms(), 460);
}

#[test]
fn test_speed_keys_clamp() {
    let mut app = app();
    assert!((app.speed() - 50.0).abs() < f64::EPSILON);
    press(&mut app, "++++++++");
    assert!((app.speed() - 100.0).abs() < f64::EPSILON);
    assert_eq!(app.arrays.replay().step_duration_ms(), 100);
    press(&mut app, "------------");
    assert!(app.speed().abs() < f64::EPSILON);
    assert_eq!(app.tree.replay.step_duration_ms(), 1000);
    // Graph replay runs at a fixed interval.
    assert_eq!(app.graph.replay().step_duration_ms(), 1000);
}

#[test]
fn test_tree_insert_then_highlights_clear() {
    let mut app = app();
    press(&mut app, "4");
    app.input = "45".to_string();
    press(&mut app, "i");
    assert_eq!(app.message.as_ref().unwrap().text, "Inserted 45");
    assert!(app.input.is_empty());
    assert!(app.tree.state.contains(45));
    assert!(app.tree.replay.is_playing());

    let now = play_out(&mut app, 0);
    assert!(!app.tree.replay.is_playing());
    // The clear fired 2 s after the animation ended.
    assert_eq!(app.pending_ticks(), 0);
    assert!(app.tree.replay.current().values_with(Highlight::New).is_empty());
    assert!(now > 2000);
}

#[test]
fn test_clear_waits_for_delay() {
    let mut app = app();
    press(&mut app, "6");
    app.input = "90".to_string();
    press(&mut app, "i");

    let mut now = 0;
    while app.heap.replay.is_playing() {
        app.tick(now);
        now += 1000;
    }
    assert_eq!(app.pending_ticks(), 1);
    app.tick(now);
    assert_eq!(app.pending_ticks(), 1);
    app.tick(now + 3000);
    assert_eq!(app.pending_ticks(), 0);
}

#[test]
fn test_new_operation_cancels_pending_clear() {
    let mut app = app();
    press(&mut app, "6");
    app.input = "90".to_string();
    press(&mut app, "i");
    let mut now = 0;
    while app.heap.replay.is_playing() {
        app.tick(now);
        now += 1000;
    }
    assert_eq!(app.pending_ticks(), 1);

    press(&mut app, "d");
    assert_eq!(app.pending_ticks(), 0);
    assert_eq!(app.message.as_ref().unwrap().text, "Extracted 100");
}

#[test]
fn test_reset_cancels_timers() {
    let mut app = app();
    press(&mut app, "4");
    app.input = "45".to_string();
    press(&mut app, "i");
    let mut now = 0;
    while app.tree.replay.is_playing() {
        app.tick(now);
        now += 1000;
    }
    assert_eq!(app.pending_ticks(), 1);

    press(&mut app, "r");
    assert_eq!(app.pending_ticks(), 0);
    assert!(!app.tree.state.contains(45));
}

#[test]
fn test_rejection_keeps_state() {
    let mut app = app();
    press(&mut app, "4");
    app.input = "50".to_string();
    press(&mut app, "i");
    let message = app.message.clone().unwrap();
    assert!(message.is_error);
    assert_eq!(message.text, "Value 50 already exists");
    assert_eq!(app.tree.state.len(), 7);
    // Input survives so the user can fix it.
    assert_eq!(app.input, "50");
}

#[test]
fn test_tree_search_and_traversal() {
    let mut app = app();
    press(&mut app, "4");
    app.input = "60".to_string();
    press(&mut app, "/");
    assert_eq!(app.message.as_ref().unwrap().text, "Found 60");

    press(&mut app, "a");
    assert_eq!(app.traversal, TraversalOrder::Preorder);
    press(&mut app, "s");
    assert!(app
        .message
        .as_ref()
        .unwrap()
        .text
        .ends_with("50, 30, 20, 40, 70, 60, 80"));
}

#[test]
fn test_graph_requires_start_node() {
    let mut app = app();
    press(&mut app, "5s");
    let message = app.message.clone().unwrap();
    assert!(message.is_error);
    assert_eq!(message.text, "Please select a start node");

    type_line(&mut app, "A");
    assert_eq!(app.graph.start_node(), Some("A"));
    press(&mut app, "s");
    assert!(app.graph.replay().is_playing());
    play_out(&mut app, 0);
    assert_eq!(app.graph_view().nodes_with(Highlight::Visited).len(), 5);
    assert_eq!(app.graph_view().nodes_with(Highlight::Active), vec!["F"]);
}

#[test]
fn test_graph_unknown_start_rejected() {
    let mut app = app();
    press(&mut app, "5");
    type_line(&mut app, "Q");
    assert!(app.message.as_ref().unwrap().is_error);
    assert_eq!(app.graph.start_node(), None);
}

#[test]
fn test_graph_edge_input() {
    let mut app = app();
    press(&mut app, "5");
    let edges = app.graph.graph().edges().len();
    type_line(&mut app, "A-F");
    assert_eq!(app.graph.graph().edges().len(), edges + 1);
    type_line(&mut app, "A-F");
    assert!(app.message.as_ref().unwrap().is_error);
    press(&mut app, "a");
    assert_eq!(app.graph.algorithm(), GraphAlgorithm::Dfs);
}

#[test]
fn test_stack_queue_focus() {
    let mut app = app();
    press(&mut app, "3");
    app.input = "5".to_string();
    press(&mut app, "i");
    assert_eq!(app.stack.state.peek(), Some(5));

    press(&mut app, "a");
    assert_eq!(app.focus, SequenceFocus::Queue);
    press(&mut app, "d");
    assert_eq!(app.message.as_ref().unwrap().text, "Dequeued 10");
    assert_eq!(app.stack.state.len(), 5);
}

#[test]
fn test_linked_list_input_forms() {
    let mut app = app();
    press(&mut app, "2");
    app.input = "25@2".to_string();
    press(&mut app, "i");
    assert_eq!(app.list.state.values(), vec![10, 20, 25, 30, 40]);

    app.input = "^5".to_string();
    press(&mut app, "i");
    app.input = "99".to_string();
    press(&mut app, "i");
    assert_eq!(app.list.state.values(), vec![5, 10, 20, 25, 30, 40, 99]);

    app.input = "end".to_string();
    press(&mut app, "d");
    assert_eq!(app.list.state.values(), vec![5, 10, 20, 25, 30, 40]);
}

#[test]
fn test_hash_table_keys() {
    let mut app = app();
    press(&mut app, "7");
    app.input = "apple=1".to_string();
    press(&mut app, "i");
    assert_eq!(app.hash.state.get("apple"), Some("1"));

    app.input = "apple".to_string();
    press(&mut app, "/");
    assert_eq!(app.message.as_ref().unwrap().text, "Found key apple with value 1 at index 0");

    // Changing the strategy clears the table.
    press(&mut app, "a");
    assert_eq!(app.hash.state.strategy(), CollisionStrategy::Quadratic);
    assert!(app.hash.state.is_empty());
}

#[test]
fn test_editing_mode_consumes_keys() {
    let mut app = app();
    app.handle_key(KeyCode::Char('e'));
    assert!(app.editing);
    press(&mut app, "q7");
    assert!(!app.should_quit());
    assert_eq!(app.tab, Tab::Arrays);
    app.handle_key(KeyCode::Backspace);
    assert_eq!(app.input, "q");
    app.handle_key(KeyCode::Esc);
    assert!(!app.editing);
    assert!(!app.should_quit());
}

#[test]
fn test_shutdown_cancels_everything() {
    let mut app = app();
    press(&mut app, "6");
    app.input = "90".to_string();
    press(&mut app, "i");
    let mut now = 0;
    while app.heap.replay.is_playing() {
        app.tick(now);
        now += 1000;
    }
    app.shutdown();
    assert!(app.should_quit());
    assert_eq!(app.pending_ticks(), 0);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn key() -> impl Strategy<Value = KeyCode> {
        prop_oneof![
            prop::sample::select(vec!['1', '2', '3', '4', '5', '6', '7', 's', ' ', 'n', 'r', '+', '-', 'a', 'h', 'm', 'i', '/', 'd'])
                .prop_map(KeyCode::Char),
            Just(KeyCode::Right),
        ]
    }

    proptest! {
        /// Random key presses and ticks never panic and keep every
        /// structure consistent.
        #[test]
        fn prop_random_keys_keep_state_valid(
            keys in prop::collection::vec(key(), 0..60),
            input in "[0-9]{1,3}",
        ) {
            let mut app = app();
            let mut now = 0;
            for key in keys {
                app.input.clone_from(&input);
                app.handle_key(key);
                app.tick(now);
                now += 700;
            }
            prop_assert!(app.tree.state.validate().is_ok());
            prop_assert!(app.heap.state.is_valid());
            prop_assert!((0.0..=100.0).contains(&app.speed()));
            prop_assert!(!app.should_quit());
        }
    }
}

//! Visualizer application state and key handling.
//!
//! One pane per tab. Each pane holds its structure plus the replay of its
//! last operation. Key handling, ticking and highlight expiry live here;
//! the binary only draws and forwards events.

use std::collections::HashMap;

use crossterm::event::KeyCode;
use tracing::{debug, info, warn};

use crate::config::VizConfig;
use crate::engine::{StepLog, TickHandle, TickScheduler};
use crate::error::{VizError, VizResult};
use crate::replay::{PlaybackState, ReplayController};
use crate::structures::graph::{GraphSnapshot, GraphVisualizer};
use crate::structures::hash_table::{HashSnapshot, HashTable};
use crate::structures::heap::{Heap, HeapSnapshot};
use crate::structures::linked_list::{self, LinkedList, ListSnapshot};
use crate::structures::sorting::{parse_number, ArraySnapshot, ArrayVisualizer};
use crate::structures::stack_queue::{Queue, SequenceSnapshot, Stack};
use crate::structures::tree::{Bst, TraversalOrder, TreeSnapshot};
use crate::structures::Change;

/// Speed change per `+`/`-` press.
pub const SPEED_STEP: f64 = 10.0;

/// Visualizer tabs, in key order (`1` to `7`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    /// Sorting algorithms.
    Arrays,
    /// Singly linked list.
    LinkedList,
    /// Stack and queue.
    StackQueue,
    /// Binary search tree.
    Tree,
    /// Graph traversal.
    Graph,
    /// Binary heap.
    Heap,
    /// Hash table.
    HashTable,
}

impl Tab {
    /// All tabs in display order.
    pub const ALL: [Self; 7] = [
        Self::Arrays,
        Self::LinkedList,
        Self::StackQueue,
        Self::Tree,
        Self::Graph,
        Self::Heap,
        Self::HashTable,
    ];

    /// Tab heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Arrays => "Arrays",
            Self::LinkedList => "Linked List",
            Self::StackQueue => "Stack & Queue",
            Self::Tree => "Tree",
            Self::Graph => "Graph",
            Self::Heap => "Heap",
            Self::HashTable => "Hash Table",
        }
    }

    /// Tab for a digit key.
    #[must_use]
    pub fn from_digit(c: char) -> Option<Self> {
        let index = c.to_digit(10)?.checked_sub(1)?;
        Self::ALL.get(index as usize).copied()
    }
}

/// Which side of the stack/queue tab receives operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequenceFocus {
    /// Push and pop.
    #[default]
    Stack,
    /// Enqueue and dequeue.
    Queue,
}

/// Status line content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Text shown to the user.
    pub text: String,
    /// Rendered as an error.
    pub is_error: bool,
}

/// A structure together with the replay of its last operation.
#[derive(Debug, Clone)]
pub struct Pane<T, S> {
    /// Current structure.
    pub state: T,
    /// Replay of the last operation.
    pub replay: ReplayController<S>,
}

impl<T, S: Clone> Pane<T, S> {
    fn new(state: T, snapshot: S, speed: f64) -> Self {
        Self {
            state,
            replay: ReplayController::new(StepLog::single(snapshot), speed),
        }
    }

    /// Adopt a change and play its animation.
    fn apply(&mut self, change: Change<T, S>) -> String {
        self.state = change.next;
        self.replay.start(change.log);
        change.message
    }

    /// Play an animation that leaves the structure untouched.
    fn show(&mut self, log: StepLog<S>) {
        self.replay.start(log);
    }

    /// Show a single settled snapshot.
    fn settle(&mut self, snapshot: S) {
        self.replay.load(StepLog::single(snapshot));
    }
}

/// Cursor position shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStatus {
    /// Play/pause state.
    pub state: PlaybackState,
    /// Zero-based step under the cursor.
    pub cursor: usize,
    /// Steps in the log.
    pub len: usize,
}

impl<S> From<&ReplayController<S>> for ReplayStatus {
    fn from(replay: &ReplayController<S>) -> Self {
        Self {
            state: replay.state(),
            cursor: replay.cursor(),
            len: replay.log().len(),
        }
    }
}

/// Playback controls shared by every pane.
trait Transport {
    fn toggle_play(&mut self);
    fn step_forward(&mut self) -> VizResult<bool>;
    fn set_speed(&mut self, speed: f64);
    fn tick(&mut self, now_ms: u64) -> bool;
    fn is_playing(&self) -> bool;
}

impl<S> Transport for ReplayController<S> {
    fn toggle_play(&mut self) {
        Self::toggle_play(self);
    }
    fn step_forward(&mut self) -> VizResult<bool> {
        Self::step_forward(self)
    }
    fn set_speed(&mut self, speed: f64) {
        Self::set_speed(self, speed);
    }
    fn tick(&mut self, now_ms: u64) -> bool {
        Self::tick(self, now_ms)
    }
    fn is_playing(&self) -> bool {
        Self::is_playing(self)
    }
}

/// Terminal visualizer state.
#[derive(Debug)]
pub struct App {
    /// Selected tab.
    pub tab: Tab,
    /// Text typed into the input line.
    pub input: String,
    /// True while keys go to the input line.
    pub editing: bool,
    /// Status line.
    pub message: Option<StatusMessage>,
    /// Set once the user asked to leave.
    pub should_quit: bool,
    /// Sorting tab.
    pub arrays: ArrayVisualizer,
    /// Linked list tab.
    pub list: Pane<LinkedList, ListSnapshot>,
    /// Stack side of the stack/queue tab.
    pub stack: Pane<Stack, SequenceSnapshot>,
    /// Queue side of the stack/queue tab.
    pub queue: Pane<Queue, SequenceSnapshot>,
    /// Side of the stack/queue tab receiving operations.
    pub focus: SequenceFocus,
    /// Tree tab.
    pub tree: Pane<Bst, TreeSnapshot>,
    /// Traversal run by `s` on the tree tab.
    pub traversal: TraversalOrder,
    /// Graph tab.
    pub graph: GraphVisualizer,
    /// Heap tab.
    pub heap: Pane<Heap, HeapSnapshot>,
    /// Hash table tab.
    pub hash: Pane<HashTable, HashSnapshot>,
    speed: f64,
    clear_after_ms: u64,
    now_ms: u64,
    scheduler: TickScheduler<Tab>,
    pending_clear: HashMap<Tab, TickHandle>,
    config: VizConfig,
}

impl App {
    /// Build every tab from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed data is invalid (duplicate tree seeds,
    /// zero-sized hash table).
    pub fn new(config: VizConfig) -> VizResult<Self> {
        let speed = config.replay.speed;
        let tree = config.build_tree()?;
        let hash = config.build_hash_table()?;
        let list = config.build_linked_list();
        let stack = config.build_stack();
        let queue = config.build_queue();
        let heap = config.build_heap();

        info!(speed, "visualizer started");
        Ok(Self {
            tab: Tab::Arrays,
            input: String::new(),
            editing: false,
            message: None,
            should_quit: false,
            arrays: ArrayVisualizer::new(&config.sorting.input, config.sorting.algorithm, speed),
            list: Pane::new(list.clone(), list.plain_snapshot(), speed),
            stack: Pane::new(stack.clone(), stack.plain_snapshot(), speed),
            queue: Pane::new(queue.clone(), queue.plain_snapshot(), speed),
            focus: SequenceFocus::default(),
            tree: Pane::new(tree.clone(), tree.plain_snapshot(), speed),
            traversal: TraversalOrder::default(),
            graph: GraphVisualizer::new(
                config.build_graph(),
                config.graph.algorithm,
                config.graph.start.clone(),
                config.graph.step_ms,
            ),
            heap: Pane::new(heap.clone(), heap.settled_snapshot(), speed),
            hash: Pane::new(hash.clone(), hash.plain_snapshot(), speed),
            speed,
            clear_after_ms: config.highlight.clear_after_ms,
            now_ms: 0,
            scheduler: TickScheduler::new(),
            pending_clear: HashMap::new(),
            config,
        })
    }

    /// Current speed slider value.
    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Number of highlight clears waiting to fire.
    #[must_use]
    pub fn pending_ticks(&self) -> usize {
        self.scheduler.len()
    }

    /// True if the app should exit.
    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Replay position of the selected tab.
    #[must_use]
    pub fn status(&self) -> ReplayStatus {
        match self.tab {
            Tab::Arrays => self.arrays.replay().into(),
            Tab::LinkedList => (&self.list.replay).into(),
            Tab::StackQueue => match self.focus {
                SequenceFocus::Stack => (&self.stack.replay).into(),
                SequenceFocus::Queue => (&self.queue.replay).into(),
            },
            Tab::Tree => (&self.tree.replay).into(),
            Tab::Graph => self.graph.replay().into(),
            Tab::Heap => (&self.heap.replay).into(),
            Tab::HashTable => (&self.hash.replay).into(),
        }
    }

    fn transport(&mut self, tab: Tab) -> &mut dyn Transport {
        match tab {
            Tab::Arrays => self.arrays.replay_mut(),
            Tab::LinkedList => &mut self.list.replay,
            Tab::StackQueue => match self.focus {
                SequenceFocus::Stack => &mut self.stack.replay,
                SequenceFocus::Queue => &mut self.queue.replay,
            },
            Tab::Tree => &mut self.tree.replay,
            Tab::Graph => self.graph.replay_mut(),
            Tab::Heap => &mut self.heap.replay,
            Tab::HashTable => &mut self.hash.replay,
        }
    }

    fn info(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    fn reject(&mut self, error: &VizError) {
        warn!(tab = self.tab.title(), %error, "operation rejected");
        self.message = Some(StatusMessage {
            text: error.to_string(),
            is_error: true,
        });
    }

    /// Report the outcome of an operation on the current tab.
    fn report(&mut self, result: VizResult<String>) {
        match result {
            Ok(text) => {
                self.cancel_clear(self.tab);
                self.input.clear();
                self.info(text);
            }
            Err(e) => self.reject(&e),
        }
    }

    fn cancel_clear(&mut self, tab: Tab) {
        if let Some(handle) = self.pending_clear.remove(&tab) {
            self.scheduler.cancel(handle);
        }
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyCode) {
        if self.editing {
            self.handle_input_key(key);
            return;
        }
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.shutdown(),
            KeyCode::Char(c @ '1'..='7') => {
                if let Some(tab) = Tab::from_digit(c) {
                    self.tab = tab;
                    self.message = None;
                }
            }
            KeyCode::Char('e') => self.editing = true,
            KeyCode::Char('s') => self.start(),
            KeyCode::Char(' ') => self.transport(self.tab).toggle_play(),
            KeyCode::Char('n') | KeyCode::Right => {
                let tab = self.tab;
                if let Err(e) = self.transport(tab).step_forward() {
                    self.reject(&e);
                }
            }
            KeyCode::Char('r') => self.reset(),
            KeyCode::Char('+' | '=') => self.set_speed(self.speed + SPEED_STEP),
            KeyCode::Char('-') => self.set_speed(self.speed - SPEED_STEP),
            KeyCode::Char('a') => self.cycle_mode(),
            KeyCode::Char('h') if self.tab == Tab::HashTable => {
                let next = self.hash.state.function().next();
                self.hash.state.set_hash_function(next);
                self.hash.settle(self.hash.state.plain_snapshot());
                self.info(format!("Hash function: {}", next.name()));
            }
            KeyCode::Char('m') if self.tab == Tab::Heap => {
                let change = self.heap.state.toggle_kind();
                let text = self.heap.apply(change);
                self.report(Ok(text));
            }
            KeyCode::Char('i') => self.insert(),
            KeyCode::Char('/') => self.search(),
            KeyCode::Char('d') => self.delete(),
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                self.editing = false;
                self.commit_input();
            }
            KeyCode::Esc => self.editing = false,
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    /// Input typed on the arrays and graph tabs configures the next run.
    fn commit_input(&mut self) {
        match self.tab {
            Tab::Arrays => {
                let input = std::mem::take(&mut self.input);
                self.arrays.set_input(&input);
                self.arrays.reset();
                self.info(format!("Array: {:?}", self.arrays.values()));
            }
            Tab::Graph => {
                let id = self.input.trim().to_string();
                if let Some((source, target)) = id.split_once('-') {
                    let result = self
                        .graph
                        .add_edge(Some(source.trim()), Some(target.trim()))
                        .map(|()| format!("Added edge from {} to {}", source.trim(), target.trim()));
                    self.report(result);
                } else if self.graph.graph().contains(&id) {
                    self.graph.set_start(Some(id.clone()));
                    self.input.clear();
                    self.info(format!("Start node: {id}"));
                } else {
                    self.reject(&VizError::UnknownNode(id));
                }
            }
            _ => {}
        }
    }

    fn set_speed(&mut self, speed: f64) {
        let speed = speed.clamp(0.0, 100.0);
        self.speed = speed;
        for tab in Tab::ALL {
            self.transport(tab).set_speed(speed);
        }
        // Both sides of the stack/queue tab follow the slider.
        self.stack.replay.set_speed(speed);
        self.queue.replay.set_speed(speed);
        debug!(speed, "speed changed");
    }

    fn start(&mut self) {
        match self.tab {
            Tab::Arrays => {
                self.arrays.start();
                self.info(format!("Running {}", self.arrays.algorithm().name()));
            }
            Tab::Graph => {
                if self.graph.start().is_ok() {
                    let text = self.graph.message().unwrap_or_default().to_string();
                    self.info(text);
                } else if let Some(text) = self.graph.message().map(str::to_string) {
                    self.message = Some(StatusMessage {
                        text,
                        is_error: true,
                    });
                }
            }
            Tab::Tree => {
                let result = self.tree.state.traverse(self.traversal).map(|t| {
                    let values: Vec<String> = t.values.iter().map(i64::to_string).collect();
                    let text = format!("{}: {}", t.message, values.join(", "));
                    self.tree.show(t.log);
                    text
                });
                self.report(result);
            }
            _ => {}
        }
    }

    fn cycle_mode(&mut self) {
        match self.tab {
            Tab::Arrays => {
                let next = self.arrays.algorithm().next();
                self.arrays.set_algorithm(next);
                self.info(format!("Algorithm: {}", next.name()));
            }
            Tab::Graph => {
                let next = self.graph.algorithm().next();
                self.graph.set_algorithm(next);
                self.info(format!("Algorithm: {}", next.name()));
            }
            Tab::Tree => {
                self.traversal = self.traversal.next();
                self.info(self.traversal.title());
            }
            Tab::StackQueue => {
                self.focus = match self.focus {
                    SequenceFocus::Stack => SequenceFocus::Queue,
                    SequenceFocus::Queue => SequenceFocus::Stack,
                };
                self.info(format!("Focus: {:?}", self.focus));
            }
            Tab::HashTable => {
                let next = self.hash.state.strategy().next();
                self.hash.state.set_strategy(next);
                self.hash.settle(self.hash.state.plain_snapshot());
                self.info(format!("Collision strategy: {}", next.name()));
            }
            Tab::LinkedList | Tab::Heap => {}
        }
    }

    fn insert(&mut self) {
        let input = self.input.trim().to_string();
        let result = match self.tab {
            Tab::LinkedList => insert_into_list(&mut self.list, &input),
            Tab::StackQueue => parse_number(&input).map(|v| match self.focus {
                SequenceFocus::Stack => {
                    let change = self.stack.state.push(v);
                    self.stack.apply(change)
                }
                SequenceFocus::Queue => {
                    let change = self.queue.state.enqueue(v);
                    self.queue.apply(change)
                }
            }),
            Tab::Tree => parse_number(&input)
                .and_then(|v| self.tree.state.insert(v))
                .map(|change| self.tree.apply(change)),
            Tab::Heap => parse_number(&input).map(|v| {
                let change = self.heap.state.insert(v);
                self.heap.apply(change)
            }),
            Tab::HashTable => {
                let (key, value) = input
                    .split_once(['=', ' ', ':'])
                    .map_or((input.as_str(), ""), |(k, v)| (k.trim(), v.trim()));
                self.hash
                    .state
                    .insert(key, value)
                    .map(|change| self.hash.apply(change))
            }
            Tab::Arrays | Tab::Graph => return,
        };
        self.report(result);
    }

    fn search(&mut self) {
        let input = self.input.trim().to_string();
        let result = match self.tab {
            Tab::LinkedList => parse_number(&input)
                .and_then(|v| self.list.state.search(v))
                .map(|found| {
                    self.list.show(found.log);
                    found.message
                }),
            Tab::Tree => parse_number(&input)
                .and_then(|v| self.tree.state.search(v))
                .map(|found| {
                    self.tree.show(found.log);
                    found.message
                }),
            Tab::HashTable => self.hash.state.search(&input).map(|found| {
                self.hash.show(found.log);
                found.message
            }),
            _ => return,
        };
        self.report(result);
    }

    fn delete(&mut self) {
        let input = self.input.trim().to_string();
        let result = match self.tab {
            Tab::LinkedList => {
                let change = if input == "end" {
                    self.list.state.pop_back()
                } else {
                    self.list.state.pop_front()
                };
                change.map(|c| self.list.apply(c))
            }
            Tab::StackQueue => match self.focus {
                SequenceFocus::Stack => self.stack.state.pop().map(|c| self.stack.apply(c)),
                SequenceFocus::Queue => self.queue.state.dequeue().map(|c| self.queue.apply(c)),
            },
            Tab::Tree => parse_number(&input)
                .and_then(|v| self.tree.state.remove(v))
                .map(|c| self.tree.apply(c)),
            Tab::Heap => self.heap.state.extract().map(|c| self.heap.apply(c)),
            Tab::HashTable => self.hash.state.remove(&input).map(|c| self.hash.apply(c)),
            Tab::Arrays | Tab::Graph => return,
        };
        self.report(result);
    }

    /// Restore the current tab to its seeded state.
    pub fn reset(&mut self) {
        self.scheduler.cancel_all();
        self.pending_clear.clear();
        let speed = self.speed;
        match self.tab {
            Tab::Arrays => self.arrays.reset(),
            Tab::Graph => self.graph.reset(),
            Tab::LinkedList => {
                let list = self.config.build_linked_list();
                self.list = Pane::new(list.clone(), list.plain_snapshot(), speed);
            }
            Tab::StackQueue => {
                let stack = self.config.build_stack();
                let queue = self.config.build_queue();
                self.stack = Pane::new(stack.clone(), stack.plain_snapshot(), speed);
                self.queue = Pane::new(queue.clone(), queue.plain_snapshot(), speed);
            }
            Tab::Tree => match self.config.build_tree() {
                Ok(tree) => self.tree = Pane::new(tree.clone(), tree.plain_snapshot(), speed),
                Err(e) => self.reject(&e),
            },
            Tab::Heap => {
                let heap = self.config.build_heap();
                self.heap = Pane::new(heap.clone(), heap.settled_snapshot(), speed);
            }
            Tab::HashTable => match self.config.build_hash_table() {
                Ok(table) => self.hash = Pane::new(table.clone(), table.plain_snapshot(), speed),
                Err(e) => self.reject(&e),
            },
        }
        self.input.clear();
        self.info(format!("{} reset", self.tab.title()));
    }

    /// Advance every pane and fire due highlight clears.
    pub fn tick(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
        let mut finished = Vec::new();
        for tab in Tab::ALL {
            if self.tick_tab(tab, now_ms) {
                finished.push(tab);
            }
        }
        for tab in finished {
            self.schedule_clear(tab);
        }
        for tab in self.scheduler.drain_due(now_ms) {
            self.pending_clear.remove(&tab);
            self.clear_highlights(tab);
        }
    }

    /// Tick the replays of `tab`; true if one just finished playing.
    fn tick_tab(&mut self, tab: Tab, now_ms: u64) -> bool {
        if tab == Tab::StackQueue {
            let stack = tick_finished(&mut self.stack.replay, now_ms);
            let queue = tick_finished(&mut self.queue.replay, now_ms);
            return stack || queue;
        }
        tick_finished(self.transport(tab), now_ms)
    }

    fn schedule_clear(&mut self, tab: Tab) {
        // Sorting and traversal results stay on screen.
        if matches!(tab, Tab::Arrays | Tab::Graph) {
            return;
        }
        self.cancel_clear(tab);
        let handle = self.scheduler.schedule(self.now_ms + self.clear_after_ms, tab);
        self.pending_clear.insert(tab, handle);
    }

    fn clear_highlights(&mut self, tab: Tab) {
        debug!(tab = tab.title(), "clearing highlights");
        match tab {
            Tab::LinkedList => self.list.settle(self.list.state.plain_snapshot()),
            Tab::StackQueue => {
                self.stack.settle(self.stack.state.plain_snapshot());
                self.queue.settle(self.queue.state.plain_snapshot());
            }
            Tab::Tree => self.tree.settle(self.tree.state.plain_snapshot()),
            Tab::Heap => self.heap.settle(self.heap.state.settled_snapshot()),
            Tab::HashTable => self.hash.settle(self.hash.state.plain_snapshot()),
            Tab::Arrays | Tab::Graph => {}
        }
    }

    /// Cancel pending timers and request exit.
    pub fn shutdown(&mut self) {
        self.scheduler.cancel_all();
        self.pending_clear.clear();
        self.should_quit = true;
        info!("visualizer stopped");
    }

    /// Snapshot currently shown on the arrays tab.
    #[must_use]
    pub fn array_view(&self) -> &ArraySnapshot {
        self.arrays.replay().current()
    }

    /// Snapshot currently shown on the graph tab.
    #[must_use]
    pub fn graph_view(&self) -> &GraphSnapshot {
        self.graph.replay().current()
    }
}

fn tick_finished(replay: &mut dyn Transport, now_ms: u64) -> bool {
    let was_playing = replay.is_playing();
    replay.tick(now_ms);
    was_playing && !replay.is_playing()
}

/// `v` appends, `v@p` inserts at position `p`, `^v` prepends.
fn insert_into_list(pane: &mut Pane<LinkedList, ListSnapshot>, input: &str) -> VizResult<String> {
    let change = if let Some(rest) = input.strip_prefix('^') {
        pane.state.push_front(parse_number(rest)?)
    } else if let Some((value, position)) = input.split_once('@') {
        pane.state
            .insert_at(parse_number(value)?, linked_list::parse_position(position)?)
    } else {
        pane.state.push_back(parse_number(input)?)
    };
    Ok(pane.apply(change))
}

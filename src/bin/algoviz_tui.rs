//! algoviz terminal visualizer.
//!
//! Usage: `algoviz-tui [config.yaml]`. App logic lives in
//! `algoviz::tui::app`; this binary owns the terminal and draws.

#![forbid(unsafe_code)]

#[cfg(feature = "tui")]
fn main() -> std::io::Result<()> {
    use algoviz::config::VizConfig;
    use algoviz::tui::app::App;

    let config = match std::env::args().nth(1) {
        Some(path) => match VizConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading '{path}': {e}");
                eprintln!("Usage: algoviz-tui [config.yaml]");
                std::process::exit(1);
            }
        },
        None => VizConfig::default(),
    };

    // Logging to stderr would tear the alternate screen.
    if config.logging.file.is_some() {
        if let Err(e) = algoviz::logging::init(&config.logging) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    let tick_ms = config.tui.tick_ms;
    let app = match App::new(config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    tui::run(app, tick_ms)
}

#[cfg(not(feature = "tui"))]
fn main() {
    eprintln!("TUI feature not enabled. Run with: cargo run --bin algoviz-tui --features tui");
    std::process::exit(1);
}

#[cfg(feature = "tui")]
mod tui {
    use algoviz::engine::Highlight;
    use algoviz::render::{Renderer, TextRenderer};
    use algoviz::replay::PlaybackState;
    use algoviz::structures::sorting::ArraySnapshot;
    use algoviz::tui::app::{App, SequenceFocus, Tab};
    use crossterm::{
        event::{self, Event, KeyEventKind},
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    };
    use ratatui::{
        backend::CrosstermBackend,
        layout::{Constraint, Direction, Layout, Rect},
        style::{Color, Modifier, Style},
        text::{Line, Span},
        widgets::{
            canvas::{Canvas, Line as CanvasLine},
            Bar, BarChart, BarGroup, Block, Borders, Paragraph, Tabs, Wrap,
        },
        Frame, Terminal,
    };
    use std::io;
    use std::time::{Duration, Instant};

    pub fn run(mut app: App, tick_ms: u64) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, crossterm::cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = run_main_loop(&mut terminal, &mut app, Duration::from_millis(tick_ms));
        app.shutdown();

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        result
    }

    fn run_main_loop(
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        app: &mut App,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let started = Instant::now();
        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|f| ui(f, app))?;

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if crossterm::event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        app.handle_key(key.code);
                    }
                }
            }

            if last_tick.elapsed() >= tick_rate {
                let now_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                app.tick(now_ms);
                last_tick = Instant::now();
            }

            if app.should_quit() {
                break;
            }
        }

        Ok(())
    }

    fn ui(f: &mut Frame, app: &App) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(f.area());

        render_tabs(f, chunks[0], app);
        match app.tab {
            Tab::Arrays => render_array(f, chunks[1], app.array_view()),
            Tab::Graph => render_graph(f, chunks[1], app),
            _ => render_text(f, chunks[1], app),
        }
        render_status(f, chunks[2], app);
        render_input(f, chunks[3], app);
    }

    fn render_tabs(f: &mut Frame, area: Rect, app: &App) {
        let titles: Vec<Line> = Tab::ALL
            .iter()
            .enumerate()
            .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.title())))
            .collect();
        let selected = Tab::ALL.iter().position(|t| *t == app.tab).unwrap_or(0);
        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title(" algoviz "))
            .select(selected)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        f.render_widget(tabs, area);
    }

    fn bar_color(snapshot: &ArraySnapshot, index: usize) -> Color {
        if snapshot.swapping.contains(&index) {
            Color::Red
        } else if snapshot.comparing.contains(&index) {
            Color::Yellow
        } else {
            Color::Cyan
        }
    }

    fn render_array(f: &mut Frame, area: Rect, snapshot: &ArraySnapshot) {
        let bars: Vec<Bar> = snapshot
            .values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                Bar::default()
                    .value(u64::try_from(v).unwrap_or(0))
                    .text_value(v.to_string())
                    .style(Style::default().fg(bar_color(snapshot, i)))
            })
            .collect();
        let chart = BarChart::default()
            .block(Block::default().borders(Borders::ALL).title(" Array "))
            .data(BarGroup::default().bars(&bars))
            .bar_width(5)
            .bar_gap(1);
        f.render_widget(chart, area);
    }

    fn node_color(highlight: Option<Highlight>) -> Color {
        match highlight {
            Some(Highlight::Current) => Color::Yellow,
            Some(Highlight::Active) => Color::Red,
            Some(Highlight::Visited) => Color::Green,
            _ => Color::White,
        }
    }

    fn render_graph(f: &mut Frame, area: Rect, app: &App) {
        let snapshot = app.graph_view();
        let (width, height) = (500.0, 350.0);
        let canvas = Canvas::default()
            .block(Block::default().borders(Borders::ALL).title(" Graph "))
            .x_bounds([0.0, width])
            .y_bounds([0.0, height])
            .paint(|ctx| {
                for edge in &snapshot.edges {
                    let ends = snapshot
                        .nodes
                        .iter()
                        .find(|n| n.id == edge.source)
                        .zip(snapshot.nodes.iter().find(|n| n.id == edge.target));
                    if let Some((a, b)) = ends {
                        let color = if edge.highlighted {
                            Color::Yellow
                        } else {
                            Color::DarkGray
                        };
                        ctx.draw(&CanvasLine {
                            x1: a.x,
                            y1: height - a.y,
                            x2: b.x,
                            y2: height - b.y,
                            color,
                        });
                    }
                }
                ctx.layer();
                for node in &snapshot.nodes {
                    ctx.print(
                        node.x,
                        height - node.y,
                        Span::styled(
                            node.id.clone(),
                            Style::default()
                                .fg(node_color(node.highlight))
                                .add_modifier(Modifier::BOLD),
                        ),
                    );
                }
            });
        f.render_widget(canvas, area);
    }

    fn render_text(f: &mut Frame, area: Rect, app: &App) {
        let renderer = TextRenderer::default();
        let text = match app.tab {
            Tab::LinkedList => renderer.render(app.list.replay.current()),
            Tab::StackQueue => {
                let marker = |focus: SequenceFocus| if app.focus == focus { "▶" } else { " " };
                format!(
                    "{} stack: {}\n{} queue: {}",
                    marker(SequenceFocus::Stack),
                    renderer.render(app.stack.replay.current()),
                    marker(SequenceFocus::Queue),
                    renderer.render(app.queue.replay.current()),
                )
            }
            Tab::Tree => {
                format!(
                    "{}\n\ntraversal: {}",
                    renderer.render(app.tree.replay.current()),
                    app.traversal.title()
                )
            }
            Tab::Heap => renderer.render(app.heap.replay.current()),
            Tab::HashTable => format!(
                "{} slots, {} probing, {} hash\n\n{}",
                app.hash.state.size(),
                app.hash.state.strategy().name(),
                app.hash.state.function().name(),
                renderer.render(app.hash.replay.current())
            ),
            Tab::Arrays | Tab::Graph => String::new(),
        };
        let paragraph = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", app.tab.title())),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    fn render_status(f: &mut Frame, area: Rect, app: &App) {
        let status = app.status();
        let state_style = match status.state {
            PlaybackState::Playing => Style::default().fg(Color::Green),
            PlaybackState::Paused => Style::default().fg(Color::Yellow),
        };
        let mut spans = vec![
            Span::styled(format!(" [{}] ", status.state.label()), state_style),
            Span::raw(format!("speed {:.0} ", app.speed())),
            Span::raw(format!("step {}/{} ", status.cursor + 1, status.len)),
        ];
        if let Some(message) = &app.message {
            let style = if message.is_error {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::White)
            };
            spans.push(Span::styled(format!("│ {}", message.text), style));
        }
        let status_bar = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        f.render_widget(status_bar, area);
    }

    fn render_input(f: &mut Frame, area: Rect, app: &App) {
        let title = if app.editing {
            " input (Enter to apply, Esc to leave) "
        } else {
            " [e]dit [s]tart [space] play [n]ext [r]eset [+/-] speed [a]lt [i]nsert [/] search [d]elete [q]uit "
        };
        let style = if app.editing {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let input = Paragraph::new(app.input.as_str())
            .style(style)
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(input, area);
    }
}

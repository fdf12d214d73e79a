mod app;

use anyhow::Result;
use app::App;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use std::{env, fs::File, io::stdout, path::PathBuf, process};
use webanchor_config::Config;

fn init_logging() -> Result<PathBuf> {
    // The terminal belongs to the UI, so log records go to a file
    let log_path = env::temp_dir().join("webanchor-cli.log");
    let file = File::create(&log_path)?;
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(log_path)
}

fn main() -> Result<()> {
    let log_path = init_logging()?;
    log::info!("webanchor-cli starting up, logging to {}", log_path.display());

    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();
    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Fix or remove {}", config_path.display());
            process::exit(1);
        }
    };

    let (page_path, highlights_path) = match args.as_slice() {
        [_, page] => {
            let page = PathBuf::from(page);
            let highlights = config.highlights_path_for(&page);
            (page, highlights)
        }
        [_, page, highlights] => (PathBuf::from(page), PathBuf::from(highlights)),
        _ => {
            eprintln!("Usage: {} <html-file> [highlights.json]", args[0]);
            process::exit(1);
        }
    };

    // Load before touching the terminal so errors print normally
    let mut app = match App::new(page_path, highlights_path, config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }
    if app.dirty {
        println!(
            "Unsaved highlights were discarded ({})",
            app.highlights_path.display()
        );
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_block(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_block(),
                KeyCode::Left => app.move_left(),
                KeyCode::Right => app.move_right(),
                KeyCode::Char(' ') => app.toggle_mark(),
                KeyCode::Enter => app.create_highlight()?,
                KeyCode::Char('d') => app.delete_highlight(),
                KeyCode::Char('w') => {
                    if let Err(e) = app.save() {
                        app.status = format!("Save failed: {e}");
                    }
                }
                KeyCode::Char('e') => {
                    if let Err(e) = app.export() {
                        app.status = format!("Export failed: {e}");
                    }
                }
                _ => {}
            }
        }
    }
}

fn highlight_color(app: &App) -> Color {
    app.config
        .border_color
        .parse::<Color>()
        .unwrap_or(Color::Green)
}

/// Spans for the block under the cursor: selection reversed, caret underlined.
fn current_block_line(app: &App, highlighted: &[bool], color: Color) -> Line<'static> {
    let text = app.current_text();
    let selection = app.selection();
    let mut spans = Vec::new();
    for (i, ch) in text.chars().enumerate() {
        let mut style = Style::default();
        if highlighted.get(i).copied().unwrap_or(false) {
            style = style.fg(color).add_modifier(Modifier::UNDERLINED);
        }
        if selection.is_some_and(|(start, end)| start <= i && i < end) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        if i == app.cursor {
            style = style.add_modifier(Modifier::BOLD).bg(Color::DarkGray);
        }
        spans.push(Span::styled(ch.to_string(), style));
    }
    if app.cursor >= text.chars().count() {
        spans.push(Span::styled(" ", Style::default().bg(Color::DarkGray)));
    }
    Line::from(spans)
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());

    let color = highlight_color(app);
    let selected = app.block_state.selected();
    let items: Vec<ListItem> = app
        .block_segments()
        .into_iter()
        .enumerate()
        .map(|(index, segments)| {
            if Some(index) == selected {
                let highlighted: Vec<bool> = segments
                    .iter()
                    .flat_map(|s| std::iter::repeat_n(s.highlighted, s.text.chars().count()))
                    .collect();
                return ListItem::new(current_block_line(app, &highlighted, color));
            }
            let spans: Vec<Span> = segments
                .into_iter()
                .map(|segment| {
                    if segment.highlighted {
                        Span::styled(
                            segment.text,
                            Style::default().fg(color).add_modifier(Modifier::UNDERLINED),
                        )
                    } else {
                        Span::raw(segment.text)
                    }
                })
                .collect();
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = format!(
        "{}{} ({} highlights)",
        app.page_path.display(),
        if app.dirty { " [modified]" } else { "" },
        app.highlights.len()
    );
    let blocks = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::Black));

    f.render_stateful_widget(blocks, chunks[0], &mut app.block_state);

    // Status and key help
    let footer = vec![
        Line::from(app.status.clone()),
        Line::from(vec![
            Span::raw("q: Quit | "),
            Span::raw("↑/k ↓/j: Block | "),
            Span::raw("←/→: Cursor | "),
            Span::raw("Space: Mark | Enter: Highlight | d: Delete | w: Save | e: Export"),
        ]),
    ];
    let help = Paragraph::new(footer)
        .block(Block::default())
        .wrap(Wrap { trim: true });

    f.render_widget(help, chunks[1]);
}

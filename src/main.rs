//! docnav: screen-reader style navigation over document trees.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use docnav::{app_state, command::Command, config, input, messages::Messages, transcript, ui};
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "docnav")]
#[command(about = "Directional navigation and predicate search over document trees", long_about = None)]
struct Args {
    /// Files or directories to load
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// File extensions to match
    #[arg(long, short = 'e', value_name = "EXT")]
    ext: Vec<String>,

    /// Run comma-separated commands and print a JSON transcript instead of opening the UI
    #[arg(long, value_name = "CMDS", value_delimiter = ',')]
    commands: Option<Vec<String>>,

    /// Language for announcements
    #[arg(long)]
    locale: Option<String>,

    /// Print every command name accepted by --commands and exit
    #[arg(long)]
    list_commands: bool,
}

fn init_logging(cfg: &config::Config) -> io::Result<()> {
    let Some(path) = &cfg.log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "docnav=info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    if args.list_commands {
        for (name, _) in Command::all() {
            println!("{name}");
        }
        return Ok(());
    }
    let mut cfg = config::Config::load();

    // Override config with command line args
    if !args.ext.is_empty() {
        cfg.file_extensions = args.ext;
    }
    if let Some(locale) = args.locale {
        cfg.locale = locale;
    }
    init_logging(&cfg)?;

    let documents = input::find_documents(args.paths, &cfg.file_extensions)?;
    if documents.is_empty() {
        eprintln!("No matching files found");
        return Ok(());
    }

    let (tree, errors) = input::load_desktop(&documents);
    for err in &errors {
        eprintln!("Skipped: {err}");
    }
    if errors.len() == documents.len() {
        eprintln!("No documents could be loaded");
        return Ok(());
    }

    if let Some(commands) = args.commands {
        let messages = Messages::new(&cfg.locale);
        let record = transcript::run(&tree, &commands, &messages);
        let json = serde_json::to_string_pretty(&record).map_err(io::Error::other)?;
        println!("{json}");
        return Ok(());
    }

    run_tui(app_state::AppState::new(tree, documents, cfg))
}

fn run_tui(mut app: app_state::AppState) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut app_state::AppState,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(app.poll_timeout(Instant::now()))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.code == KeyCode::Char('q') {
                    return Ok(());
                }
                if let Some(command) = app_state::command_for_key(key) {
                    app.dispatch(command);
                }
            }
        }
        app.tick(Instant::now());
    }
}

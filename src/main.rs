use anyhow::Result;
use bountyscout::app::{background, input, App, GENERIC_FAILURE};
use bountyscout::config::{self, FileStore, Settings, SettingsStore};
use bountyscout::github;
use bountyscout::llm::{self, AnalysisRequest};
use bountyscout::render::report;
use bountyscout::ui;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "bountyscout",
    about = "Turn any public GitHub repository into actionable issue bounties with AI",
    version
)]
struct Args {
    /// Repository URL to analyze (prefills the form)
    repo_url: Option<String>,

    /// Free-text goal to bias suggestions toward
    #[arg(short, long)]
    goal: Option<String>,

    /// Force TODO/FIXME scanning on for this run
    #[arg(long, conflicts_with = "no_todos")]
    todos: bool,

    /// Force TODO/FIXME scanning off for this run
    #[arg(long)]
    no_todos: bool,

    /// Analyze once, write the HTML card report to PATH, and exit (no TUI)
    #[arg(long, value_name = "PATH", requires = "repo_url")]
    report: Option<PathBuf>,

    /// Store the Gemini API key in the system keychain and exit
    #[arg(long)]
    setup: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.setup {
        config::setup_api_key_interactive().map_err(|e| anyhow::anyhow!(e))?;
        return Ok(());
    }

    let store: Box<dyn SettingsStore> = match FileStore::default_location() {
        Some(store) => Box::new(store),
        None => {
            eprintln!("  Warning: No config directory found; settings won't persist across runs.");
            Box::new(FileStore::new(PathBuf::from(".bountyscout.json")))
        }
    };

    let mut settings = Settings::load(store.as_ref());
    if args.todos {
        settings.scan_todos = true;
    } else if args.no_todos {
        settings.scan_todos = false;
    }

    let runtime = tokio::runtime::Runtime::new()?;

    if let Some(report_path) = args.report {
        let repo_url = args
            .repo_url
            .ok_or_else(|| anyhow::anyhow!("--report requires a repository URL"))?;
        return run_once(
            &runtime,
            &report_path,
            AnalysisRequest {
                repo_url,
                user_goal: args.goal.unwrap_or_default(),
                scan_todos: settings.scan_todos,
            },
        );
    }

    let mut app = App::new(settings, store, !config::has_api_key());
    if let Some(url) = args.repo_url {
        app.repo_input = url;
    }
    if let Some(goal) = args.goal {
        app.goal_input = goal;
        app.show_settings = true;
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &runtime);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

/// One-shot mode: analyze, write the card report, exit. A failed analysis
/// prints the generic message plus the diagnostic detail and exits nonzero
/// without writing anything.
fn run_once(
    runtime: &tokio::runtime::Runtime,
    report_path: &std::path::Path,
    request: AnalysisRequest,
) -> Result<()> {
    if !config::has_api_key() {
        anyhow::bail!(
            "API key not found. Set GEMINI_API_KEY or run 'bountyscout --setup' first."
        );
    }

    eprintln!("🔍 Analyzing {}...", request.repo_url);

    let suggestions = match runtime.block_on(llm::fetch_suggestions(&request)) {
        Ok(suggestions) => suggestions,
        Err(err) => {
            eprintln!("Error: {}", GENERIC_FAILURE);
            eprintln!("  Detail: {:#}", err);
            std::process::exit(1);
        }
    };

    let slug = github::repo_slug(&request.repo_url)?;
    report::write_report(report_path, &slug, &suggestions)?;

    if suggestions.is_empty() {
        eprintln!("  No suggestions were returned for this repository.");
    } else {
        eprintln!("  {} suggestions ready.", suggestions.len());
    }
    println!("{}", report_path.display());
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runtime: &tokio::runtime::Runtime,
) -> Result<()> {
    let _guard = runtime.enter();
    let (tx, rx) = mpsc::channel();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(request) = input::handle_key(app, key) {
                        background::spawn_analysis(tx.clone(), request, app.generation);
                    }
                }
            }
        }

        background::drain_messages(app, &rx);

        if app.should_quit {
            return Ok(());
        }
    }
}

use arcade::cabinet::Cabinet;
use arcade::config::ArcadeConfig;
use arcade::error::{ArcadeError, Result};
use arcade::games::{self, ModeKind};
use arcade::shell;
use arcade::storage::FileStore;
use std::env;
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn main()
{
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()>
{
    let args: Vec<String> = env::args().skip(1).collect();
    let (config, rest) = ArcadeConfig::from_args(&args)?;
    init_logging(&config);

    let mut rest = rest.into_iter();
    let command = rest.next();
    let rest: Vec<String> = rest.collect();
    match command.as_deref() {
        None => interactive_menu(&config),
        Some("list") => {
            list_games();
            Ok(())
        }
        Some("play") => match rest.first() {
            Some(name) => run_game(&config, name),
            None => Err(ArcadeError::Config("Usage: minigame-arcade play <game>".to_string())),
        },
        Some("scores") => match rest.first() {
            Some(name) => show_scores(&config, name, rest.iter().any(|arg| arg == "--reset")),
            None => Err(ArcadeError::Config(
                "Usage: minigame-arcade scores <game> [--reset]".to_string(),
            )),
        },
        Some("-h") | Some("--help") => {
            print_help();
            Ok(())
        }
        Some(name) if ModeKind::from_id(name).is_some() => run_game(&config, name),
        Some(other) => Err(ArcadeError::Config(format!(
            "Unknown command '{other}'. Run with --help."
        ))),
    }
}

/// Logs go to a file; the game owns the terminal.
fn init_logging(config: &ArcadeConfig)
{
    let path = config.log_file();
    let file = fs::create_dir_all(&config.data_dir)
        .and_then(|_| OpenOptions::new().create(true).append(true).open(&path));
    match file {
        Ok(file) => {
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init();
        }
        Err(err) => {
            eprintln!("Warning: couldn't open log file {} ({err}). Logging disabled.", path.display());
        }
    }
}

fn mount(config: &ArcadeConfig, name: &str) -> Result<Cabinet>
{
    let kind = ModeKind::from_id(name).ok_or_else(|| ArcadeError::UnknownGame(name.to_string()))?;
    let store = FileStore::open(&config.data_dir)?;
    Ok(Cabinet::mount(kind, config.session, Box::new(store), config.seed))
}

fn run_game(config: &ArcadeConfig, name: &str) -> Result<()>
{
    let mut cabinet = mount(config, name)?;
    shell::play(&mut cabinet)?;
    for line in shell::ranking_lines(&cabinet) {
        println!("{line}");
    }
    Ok(())
}

fn show_scores(config: &ArcadeConfig, name: &str, reset: bool) -> Result<()>
{
    let mut cabinet = mount(config, name)?;
    if reset {
        cabinet.reset_scores();
        println!("Cleared the {name} leaderboard.");
        return Ok(());
    }
    println!("{name}");
    for line in shell::ranking_lines(&cabinet) {
        println!("{line}");
    }
    Ok(())
}

fn interactive_menu(config: &ArcadeConfig) -> Result<()>
{
    let registry = games::registry();
    println!("Minigame Arcade");
    println!();
    println!("Select a game:");
    for (idx, game) in registry.iter().enumerate() {
        println!("  {:>2}. {} - {}", idx + 1, game.name, game.description);
    }
    println!();
    print!("Enter number or name (default 1, q to quit): ");
    std::io::Write::flush(&mut std::io::stdout())
        .map_err(|err| ArcadeError::Terminal(format!("Failed to flush stdout: {err}")))?;

    let mut input = String::new();
    std::io::stdin()
        .read_line(&mut input)
        .map_err(|err| ArcadeError::Terminal(format!("Failed to read input: {err}")))?;
    let choice = input.trim();

    if choice.is_empty() {
        return run_game(config, registry[0].name);
    }
    if choice.eq_ignore_ascii_case("q") {
        return Ok(());
    }
    if let Ok(index) = choice.parse::<usize>() {
        if index >= 1 && index <= registry.len() {
            return run_game(config, registry[index - 1].name);
        }
    }

    for game in registry {
        if game.name.eq_ignore_ascii_case(choice) {
            return run_game(config, game.name);
        }
    }

    Err(ArcadeError::Config("Invalid selection.".to_string()))
}

fn list_games()
{
    println!("Available games:");
    for game in games::registry() {
        println!("  {:<12} - {}", game.name, game.description);
    }
}

fn print_help()
{
    println!("minigame-arcade");
    println!("\nUsage:");
    println!("  minigame-arcade list");
    println!("  minigame-arcade play <game>");
    println!("  minigame-arcade <game>");
    println!("  minigame-arcade scores <game> [--reset]");
    println!("\nOptions:");
    println!("  --countdown=N        Seconds before play starts (default 3, max 10)");
    println!("  --difficulty=LEVEL   easy, medium or hard (default medium)");
    println!("  --seed=N             Reproducible rounds");
    println!("  --data-dir=PATH      Where scores and arcade.log are kept");
    println!("\nNotes:");
    println!("  ARCADE_DATA_DIR overrides the default data directory.");
    println!("  RUST_LOG controls what goes to arcade.log (default info).");
}

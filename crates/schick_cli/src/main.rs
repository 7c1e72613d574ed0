mod editor;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use schick_core::core_api::{Engine, HeroSummary, Session};
use serde_json::{Map as JsonMap, Value as JsonValue};

use editor::SessionOutcome;

#[derive(Debug, Parser)]
#[command(version, about = "Party editor for Blade of Destiny save games")]
struct Cli {
    #[arg(value_name = "SAVE.GAM")]
    path: PathBuf,
    /// List the party instead of opening the interactive editor
    #[arg(long)]
    list: bool,
    /// With --list/--json: include heroes outside the active group
    #[arg(long)]
    all: bool,
    /// Print the party as JSON instead of opening the interactive editor
    #[arg(long)]
    json: bool,
    /// Report container inconsistencies and exit
    #[arg(long)]
    validate: bool,
    /// Hero index for --set-* edits
    #[arg(long)]
    hero: Option<usize>,
    #[arg(long = "set-exp", allow_hyphen_values = true)]
    set_exp: Option<i32>,
    #[arg(long = "set-money", allow_hyphen_values = true)]
    set_money: Option<i32>,
    #[arg(long = "set-level")]
    set_level: Option<u8>,
    #[arg(long = "set-vital-current")]
    set_vital_current: Option<u16>,
    #[arg(long = "set-vital-max")]
    set_vital_max: Option<u16>,
    #[arg(long = "set-astral-current")]
    set_astral_current: Option<u16>,
    #[arg(long = "set-astral-max")]
    set_astral_max: Option<u16>,
    /// Output path for --set-* edits (the input file is never rewritten)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let has_edits = cli.set_exp.is_some()
        || cli.set_money.is_some()
        || cli.set_level.is_some()
        || cli.set_vital_current.is_some()
        || cli.set_vital_max.is_some()
        || cli.set_astral_current.is_some()
        || cli.set_astral_max.is_some();

    if has_edits && (cli.hero.is_none() || cli.output.is_none()) {
        eprintln!("--set-* flags require --hero <INDEX> and --output <PATH>");
        process::exit(1);
    }
    if !has_edits && cli.output.is_some() {
        eprintln!("--output requires at least one --set-* flag");
        process::exit(1);
    }

    let bytes = fs::read(&cli.path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", cli.path.display());
        process::exit(1);
    });

    let engine = Engine::new();
    let mut session = engine.open_bytes(bytes).unwrap_or_else(|e| {
        eprintln!("Error parsing save file {}: {e}", cli.path.display());
        process::exit(1);
    });

    if cli.validate {
        let issues = session.validate();
        if issues.is_empty() {
            println!("{}: consistent", cli.path.display());
            return;
        }
        for issue in &issues {
            println!("{issue}");
        }
        process::exit(1);
    }

    if has_edits {
        let index = cli.hero.expect("checked above");
        apply_edits(&mut session, index, &cli);

        let out_path = cli.output.as_ref().expect("checked above");
        let edited = session.to_bytes().unwrap_or_else(|e| {
            eprintln!("Error encoding save file: {e}");
            process::exit(1);
        });
        fs::write(out_path, edited).unwrap_or_else(|e| {
            eprintln!("Error writing {}: {e}", out_path.display());
            process::exit(1);
        });
        println!("Wrote edited save to {}", out_path.display());
        return;
    }

    let heroes = if cli.all {
        session.all_heroes()
    } else {
        session.active_heroes()
    };

    if cli.json {
        let rendered = serde_json::to_string_pretty(&party_json(&session, &heroes))
            .unwrap_or_else(|e| {
                eprintln!("Error rendering JSON output: {e}");
                process::exit(1);
            });
        println!("{rendered}");
        return;
    }

    if cli.list {
        for hero in &heroes {
            println!(
                "{}. {} (Lvl {}, Exp: {}, Money: {})",
                hero.index, hero.name, hero.level, hero.exp, hero.money
            );
        }
        return;
    }

    run_interactive(&cli.path, &mut session);
}

fn apply_edits(session: &mut Session, index: usize, cli: &Cli) {
    if let Some(exp) = cli.set_exp {
        exit_on_edit_error("exp", session.set_exp(index, exp));
    }
    if let Some(money) = cli.set_money {
        exit_on_edit_error("money", session.set_money(index, money));
    }
    if let Some(level) = cli.set_level {
        exit_on_edit_error("level", session.set_level(index, level));
    }
    if let Some(v) = cli.set_vital_current {
        exit_on_edit_error("vital energy", session.set_vital_energy_current(index, v));
    }
    if let Some(v) = cli.set_vital_max {
        exit_on_edit_error("vital energy", session.set_vital_energy_max(index, v));
    }
    if let Some(v) = cli.set_astral_current {
        exit_on_edit_error("astral energy", session.set_astral_energy_current(index, v));
    }
    if let Some(v) = cli.set_astral_max {
        exit_on_edit_error("astral energy", session.set_astral_energy_max(index, v));
    }
}

fn exit_on_edit_error(field: &str, result: Result<(), schick_core::core_api::CoreError>) {
    if let Err(e) = result {
        eprintln!("Error applying {field} edit: {e}");
        process::exit(1);
    }
}

fn run_interactive(input_path: &Path, session: &mut Session) {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let outcome = editor::run_session(session, &mut input, &mut out).unwrap_or_else(|e| {
        eprintln!("Error during edit session: {e}");
        process::exit(1);
    });

    match outcome {
        SessionOutcome::Abort => {}
        SessionOutcome::Save => {
            let out_path = edited_path(input_path);
            let bytes = session.to_bytes().unwrap_or_else(|e| {
                eprintln!("Error encoding save file: {e}");
                process::exit(1);
            });
            fs::write(&out_path, bytes).unwrap_or_else(|e| {
                eprintln!("Error writing {}: {e}", out_path.display());
                process::exit(1);
            });
            println!("\nSaved changes to {}", out_path.display());
            println!("Original file {} remains unchanged.", input_path.display());
        }
    }
}

/// `<stem>_edited.<ext>` next to the input; the input itself is never
/// rewritten.
fn edited_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "save".to_string());
    let name = match input.extension() {
        Some(ext) => format!("{stem}_edited.{}", ext.to_string_lossy()),
        None => format!("{stem}_edited"),
    };
    input.with_file_name(name)
}

fn party_json(session: &Session, heroes: &[HeroSummary]) -> JsonValue {
    let mut root = JsonMap::new();
    root.insert(
        "active_group".to_string(),
        match session.active_group() {
            Some(group) => JsonValue::from(group),
            None => JsonValue::Null,
        },
    );
    root.insert(
        "hero_count".to_string(),
        JsonValue::from(session.hero_count()),
    );
    root.insert(
        "heroes".to_string(),
        serde_json::to_value(heroes).unwrap_or_else(|e| {
            eprintln!("Error rendering JSON output: {e}");
            process::exit(1);
        }),
    );
    JsonValue::Object(root)
}

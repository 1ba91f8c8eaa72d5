use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use chrono::{Local, NaiveDate};

use daybook::{
    app::AppState,
    input::command_mode::{execute, parse_command, Outcome},
    ui::agenda::render_screen,
};

pub const USAGE: &str = "Usage: daybook [--agenda [YYYY/MM/DD]] [--config <path>] [--ephemeral]";

#[derive(Debug, Clone, PartialEq)]
pub enum CliMode {
    Interactive,
    AgendaDate(NaiveDate),
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub mode: CliMode,
    pub config_path: Option<PathBuf>,
    pub ephemeral: bool,
}

pub fn parse_cli_args(args: impl IntoIterator<Item = String>) -> Result<CliOptions, String> {
    let mut options = CliOptions {
        mode: CliMode::Interactive,
        config_path: None,
        ephemeral: false,
    };
    let mut args = args.into_iter().peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--agenda" => {
                let target_date = match args.next_if(|next| !next.starts_with("--")) {
                    Some(date_str) => NaiveDate::parse_from_str(&date_str, "%Y/%m/%d")
                        .map_err(|_| format!("Invalid date '{}'. Use YYYY/MM/DD.", date_str))?,
                    None => Local::now().date_naive(),
                };
                options.mode = CliMode::AgendaDate(target_date);
            }
            "--config" => {
                let path = args.next().ok_or("--config requires a path")?;
                options.config_path = Some(PathBuf::from(path));
            }
            "--ephemeral" => options.ephemeral = true,
            "--help" | "-h" => options.mode = CliMode::Help,
            _ => return Err(format!("Unknown argument: {}", arg)),
        }
    }

    Ok(options)
}

pub fn run_agenda_mode(app: &mut AppState, date: NaiveDate) {
    app.goto(date);
    println!("{}", render_screen(app));
}

pub fn run_interactive(app: &mut AppState) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut message: Option<String> = None;

    loop {
        writeln!(stdout, "{}", render_screen(app))?;
        if let Some(text) = message.take() {
            writeln!(stdout, "\n{}", text)?;
        }
        write!(stdout, "\n> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        if line.trim().is_empty() {
            continue;
        }

        tracing::debug!("Command: {}", line.trim());
        match execute(parse_command(&line), app) {
            Outcome::Quit => return Ok(()),
            Outcome::Continue(text) => message = text,
        }
    }
}

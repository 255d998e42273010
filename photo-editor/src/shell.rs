use anyhow::{Context, Result};
use clap::Parser;
use photo_editor::{Command, EditorSession, Outcome, config};
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
};

/// Open an image, preview filters on it, keep what you like and save it.
#[derive(Parser, Debug)]
#[command(name = "photo-editor", version, about)]
struct Args {
    /// Image path or http(s) URL to open at start
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    /// Apply this filter (label or tag) and save to --output, then exit
    #[arg(short, long, requires_all = ["input", "output"])]
    filter: Option<String>,

    /// Where to save in one-shot mode
    #[arg(short, long, value_name = "PATH", requires = "filter")]
    output: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    photo_editor::init_logger(if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    });

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    config::init().context("init config failed")?;
    let conf = config::all();
    log::debug!("downloads go to {}", conf.cache_dir.display());

    let mut session = EditorSession::from_config(&conf);

    if let (Some(input), Some(filter), Some(output)) = (&args.input, &args.filter, &args.output) {
        return one_shot(&mut session, input, filter, output);
    }

    let mut stdout = io::stdout().lock();
    if let Some(input) = args.input {
        execute(&mut session, Command::Open(input), &mut stdout)?;
    }

    writeln!(stdout, "type `help` for commands")?;
    repl(&mut session, io::stdin().lock(), &mut stdout)
}

fn one_shot(
    session: &mut EditorSession,
    input: &str,
    filter: &str,
    output: &std::path::Path,
) -> Result<()> {
    session.load(input)?;
    session.preview(filter)?;
    session.confirm()?;

    let saved = session.save(output)?;
    println!("{}", saved.display());

    Ok(())
}

fn repl(session: &mut EditorSession, input: impl BufRead, out: &mut impl Write) -> Result<()> {
    write!(out, "> ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            write!(out, "> ")?;
            out.flush()?;
            continue;
        }

        match line.parse::<Command>() {
            Ok(command) => {
                if execute(session, command, out)? {
                    return Ok(());
                }
            }
            Err(e) => writeln!(out, "error: {e}")?,
        }

        write!(out, "> ")?;
        out.flush()?;
    }

    writeln!(out)?;
    Ok(())
}

/// Returns true once the user asked to quit. Editor errors are reported
/// and the loop goes on; only terminal IO errors end it.
fn execute(session: &mut EditorSession, command: Command, out: &mut impl Write) -> Result<bool> {
    if command.is_slow() {
        writeln!(out, "working...")?;
        out.flush()?;
    }

    match session.dispatch(command) {
        Ok(Outcome::Quit) => {
            writeln!(out, "{}", Outcome::Quit)?;
            Ok(true)
        }
        Ok(outcome) => {
            writeln!(out, "{outcome}")?;
            Ok(false)
        }
        Err(e) => {
            log::warn!("{e}");
            writeln!(out, "error: {e}")?;
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photo_editor::ImageSource;

    #[test]
    fn test_repl_reports_errors_and_quits() {
        let mut session = EditorSession::new(ImageSource::new("."));
        let input = io::Cursor::new("confirm\nbogus\n\nstatus\nquit\nstatus\n");
        let mut out = Vec::new();

        repl(&mut session, input, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("error: No filter preview to confirm"));
        assert!(text.contains("error: Invalid command: unknown command `bogus`"));
        assert!(text.contains("state: empty"));
        assert_eq!(text.matches("state:").count(), 1);
        assert!(text.trim_end().ends_with("bye"));
    }
}

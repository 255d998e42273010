use crate::{EditorError, EditorResult, EditorSession, SessionState};
use image_filter::{Filter, FilterKind};
use std::{fmt, path::PathBuf, str::FromStr};

pub const HELP: &str = "\
commands:
  open <path|url>     load an image, replacing the current one
  preview <filter>    run a filter on the current image without keeping it
  confirm             keep the previewed result
  discard             drop the previewed result
  save <path>         write the current image (default extension: jpg)
  export <filter>     write <stem>_<tag>.<ext> next to the opened file
  filters             list the available filters
  status              show what is loaded
  help                show this text
  quit                leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(String),
    Preview(String),
    Confirm,
    Discard,
    Save(PathBuf),
    Export(String),
    Filters,
    Status,
    Help,
    Quit,
}

impl Command {
    /// Whether the command may run long enough to deserve a busy notice.
    pub fn is_slow(&self) -> bool {
        matches!(
            self,
            Command::Open(_) | Command::Preview(_) | Command::Export(_)
        )
    }
}

impl FromStr for Command {
    type Err = EditorError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, arg) = match line.split_once(char::is_whitespace) {
            Some((verb, arg)) => (verb, arg.trim()),
            None => (line, ""),
        };

        let required = |what: &str| -> EditorResult<String> {
            if arg.is_empty() {
                Err(EditorError::Command(format!("`{verb}` needs {what}")))
            } else {
                Ok(arg.to_string())
            }
        };
        let bare = |command: Command| -> EditorResult<Command> {
            if arg.is_empty() {
                Ok(command)
            } else {
                Err(EditorError::Command(format!("`{verb}` takes no argument")))
            }
        };

        match verb.to_ascii_lowercase().as_str() {
            "" => Err(EditorError::Command("empty command".to_string())),
            "open" | "load" | "download" => Ok(Command::Open(required("a path or url")?)),
            "preview" | "filter" => Ok(Command::Preview(required("a filter name")?)),
            "save" => Ok(Command::Save(PathBuf::from(required("a path")?))),
            "export" => Ok(Command::Export(required("a filter name")?)),
            "confirm" | "apply" => bare(Command::Confirm),
            "discard" | "cancel" => bare(Command::Discard),
            "filters" | "list" => bare(Command::Filters),
            "status" => bare(Command::Status),
            "help" | "?" => bare(Command::Help),
            "quit" | "exit" | "q" => bare(Command::Quit),
            _ => Err(EditorError::Command(format!("unknown command `{verb}`"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Loaded {
        path: PathBuf,
        width: u32,
        height: u32,
    },
    Previewing {
        kind: FilterKind,
        width: u32,
        height: u32,
    },
    Confirmed(FilterKind),
    Discarded(bool),
    Saved(PathBuf),
    Exported(PathBuf),
    Filters(Vec<(&'static str, FilterKind)>),
    Status {
        state: SessionState,
        source_path: Option<PathBuf>,
        pending: Option<FilterKind>,
    },
    Help,
    Quit,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Loaded {
                path,
                width,
                height,
            } => write!(f, "loaded {} ({width}x{height})", path.display()),
            Outcome::Previewing {
                kind,
                width,
                height,
            } => write!(
                f,
                "previewing {} ({width}x{height}), `confirm` to keep or `discard`",
                kind.label()
            ),
            Outcome::Confirmed(kind) => write!(f, "{} applied", kind.label()),
            Outcome::Discarded(true) => write!(f, "preview discarded"),
            Outcome::Discarded(false) => write!(f, "nothing to discard"),
            Outcome::Saved(path) => write!(f, "saved {}", path.display()),
            Outcome::Exported(path) => write!(f, "exported {}", path.display()),
            Outcome::Filters(filters) => {
                for (i, (label, kind)) in filters.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "  {label:<16} {}", kind.tag())?;
                }
                Ok(())
            }
            Outcome::Status {
                state,
                source_path,
                pending,
            } => {
                write!(f, "state: {state}")?;
                if let Some(path) = source_path {
                    write!(f, ", file: {}", path.display())?;
                }
                if let Some(kind) = pending {
                    write!(f, ", pending: {}", kind.label())?;
                }
                Ok(())
            }
            Outcome::Help => write!(f, "{HELP}"),
            Outcome::Quit => write!(f, "bye"),
        }
    }
}

impl EditorSession {
    pub fn dispatch(&mut self, command: Command) -> EditorResult<Outcome> {
        log::debug!("dispatch {command:?} in state {}", self.state());

        let outcome = match command {
            Command::Open(input) => {
                let image = self.load(&input)?;
                let (width, height) = (image.width(), image.height());

                Outcome::Loaded {
                    path: self.source_path().map(PathBuf::from).unwrap_or_default(),
                    width,
                    height,
                }
            }
            Command::Preview(name) => {
                let image = self.preview(&name)?;
                let (width, height) = (image.width(), image.height());

                Outcome::Previewing {
                    kind: self
                        .pending_preview()
                        .map(|p| p.kind)
                        .ok_or(EditorError::NoPendingPreview)?,
                    width,
                    height,
                }
            }
            Command::Confirm => Outcome::Confirmed(self.confirm()?),
            Command::Discard => Outcome::Discarded(self.discard()),
            Command::Save(path) => Outcome::Saved(self.save(path)?),
            Command::Export(name) => Outcome::Exported(self.export(&name)?),
            Command::Filters => Outcome::Filters(
                self.registry()
                    .list()
                    .iter()
                    .map(|(label, filter)| (*label, filter.kind()))
                    .collect(),
            ),
            Command::Status => Outcome::Status {
                state: self.state(),
                source_path: self.source_path().map(PathBuf::from),
                pending: self.pending_preview().map(|p| p.kind),
            },
            Command::Help => Outcome::Help,
            Command::Quit => Outcome::Quit,
        };

        Ok(outcome)
    }
}

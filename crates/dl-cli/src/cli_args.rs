use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "dl-cli")]
#[command(about = "Branching dialogue player")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    /// Validate and parse a script, reporting skipped rows and dangling jumps.
    Check(CheckArgs),
    /// Play non-interactively up to the next choice or the end.
    Run(RunArgs),
    /// Line-by-line player on stdin/stdout.
    Play(PlayArgs),
    /// Full-screen player with text reveal, history and auto-play.
    Tui(TuiArgs),
}

#[derive(Debug, Clone, Args)]
pub(crate) struct ScriptArgs {
    #[arg(long = "script")]
    pub(crate) script: String,
    /// JSON file with DialogueConfig overrides.
    #[arg(long = "config")]
    pub(crate) config: Option<String>,
    /// Directory laid out as <Speaker>/<variant>.<ext>.
    #[arg(long = "cast-dir", conflicts_with = "cast_file")]
    pub(crate) cast_dir: Option<String>,
    /// JSON array of speakers.
    #[arg(long = "cast-file")]
    pub(crate) cast_file: Option<String>,
    #[arg(long = "entry")]
    pub(crate) entry: Option<i32>,
}

#[derive(Debug, Args)]
pub(crate) struct CheckArgs {
    #[arg(long = "script")]
    pub(crate) script: String,
    #[arg(long = "config")]
    pub(crate) config: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct RunArgs {
    #[command(flatten)]
    pub(crate) source: ScriptArgs,
    /// Choice indices applied in order at each branch point.
    #[arg(long = "choice")]
    pub(crate) choices: Vec<usize>,
}

#[derive(Debug, Args)]
pub(crate) struct PlayArgs {
    #[command(flatten)]
    pub(crate) source: ScriptArgs,
}

#[derive(Debug, Args)]
pub(crate) struct TuiArgs {
    #[command(flatten)]
    pub(crate) source: ScriptArgs,
    /// Start with auto-play enabled.
    #[arg(long = "auto")]
    pub(crate) auto: bool,
}

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "ci-actions", version, about = "Release and packaging actions for CI pipelines")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        value_enum,
        env = "CI_ACTIONS_LOG_FORMAT",
        default_value_t = LogFormat::Pretty,
        help = "Log output format"
    )]
    pub log_format: LogFormat,
    #[command(subcommand)]
    pub command: Command,
}

/// Every action reads its settings from `INPUT_*` variables, so the
/// subcommands take no arguments of their own.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Tag the release, transition its Jira issues, and set their fix version
    Release,
    /// Transition the issues listed in an issues file and set their fix version
    JiraRelease,
    /// Write version information into Windows binaries with rcedit
    Rcedit,
    /// Extract every .zip archive below a directory in place
    Unzip,
}

impl Command {
    pub fn name(self) -> &'static str {
        match self {
            Command::Release => "release",
            Command::JiraRelease => "jira-release",
            Command::Rcedit => "rcedit",
            Command::Unzip => "unzip",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

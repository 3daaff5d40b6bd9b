use std::process::ExitCode;

pub mod check;
pub mod statistics;
pub mod update_movies;

/// How a command finished when it did not fail outright
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    /// The command ran but found problems the user must fix (non-zero exit)
    IssuesFound,
}

impl From<CommandStatus> for ExitCode {
    fn from(status: CommandStatus) -> Self {
        match status {
            CommandStatus::Success => ExitCode::SUCCESS,
            CommandStatus::IssuesFound => ExitCode::FAILURE,
        }
    }
}

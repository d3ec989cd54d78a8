pub mod chunker;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod hooks;
pub mod logging;
pub mod notify;
pub mod template;
pub mod terminal;
pub mod transcript;
pub mod variables;

pub use chunker::{add_part_number, split_message};
pub use cli::Cli;
pub use config::Config;
pub use error::{NotifyError, Result};
pub use git::{git_info, GitInfo};
pub use hooks::{HookInput, HookOutcome};
pub use notify::{Dispatcher, Notifier, SplitSettings, Transport};
pub use template::{format_template, render};
pub use terminal::{FixedTerminal, ProcessTreeTerminal, TerminalResolver};
pub use variables::{TimeVariables, VariableMapping, VariableResolver};

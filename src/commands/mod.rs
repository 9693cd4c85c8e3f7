//! @acp:module "Commands"
//! @acp:summary "CLI command implementations"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Provides implementations for all CLI commands.
//! Each command is in its own submodule for maintainability.

pub mod clean;
pub mod generate;
pub mod init;
pub mod inspect;

pub use clean::{clean_workspaces, execute_clean, list_workspaces, CleanOptions, CleanSummary};
pub use generate::{build_map, execute_generate, parse_assignment, GenerateOptions};
pub use init::{execute_init, InitOptions};
pub use inspect::{data_skeleton, execute_inspect, template_fields, InspectOptions};

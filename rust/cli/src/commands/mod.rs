//! Command handlers.
//!
//! Each command lives in its own module and follows the same shape: a
//! public `handle_*_command` taking its arguments plus the output streams
//! (`&mut dyn Write`), returning `Result<_, CliError>`. Commands that read
//! configuration also take the environment lookup so tests can inject one.

pub mod cfg;
pub mod eval;
pub mod play;
pub mod sim;

pub use cfg::handle_cfg_command;
pub use eval::handle_eval_command;
pub use play::handle_play_command;
pub use sim::handle_sim_command;

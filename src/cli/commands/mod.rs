mod compile;
mod config;
mod run;
mod specs;

pub use compile::CompileArgs;
pub use config::ConfigCommand;
pub use run::{INTERRUPTED_EXIT_CODE, RunArgs, SpecSource};
pub use specs::SpecsCommand;

pub use compile::handle_compile;
pub use config::handle_config;
pub use run::handle_run;
pub use specs::handle_specs;

pub mod compiler;
pub mod content_filter;
pub mod executor;
pub mod search;
pub mod store;

pub use compiler::{compile, compile_with_program, parse_start_locations, render_command};
pub use content_filter::{ContentMatcher, filter_matches};
pub use executor::{INFRASTRUCTURE_FAILURE, OutputSink, execute};
pub use search::execute_specification;
pub use store::{
    FsStorage, MemoryStorage, SpecStorage, SpecStore, export_json, normalize_spec_name,
};

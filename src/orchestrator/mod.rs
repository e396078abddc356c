pub mod orchestrator;

pub use orchestrator::{Shell, format_euro, render_summary, run};

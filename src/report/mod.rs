pub mod render;
pub mod runner;

pub use render::render_report;
pub use runner::run_report;

//! SeaORM entity definitions (PostgreSQL or SQLite).

pub mod event;
pub mod partner;
pub mod project;
pub mod report;
pub mod report_template;

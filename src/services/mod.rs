pub mod control;
pub mod health;
pub mod import;
pub mod pending;
pub mod report;
pub mod scheduler;

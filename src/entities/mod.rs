pub mod prelude;

pub mod audit_log;
pub mod drawer_history;
pub mod drawers;
pub mod users;

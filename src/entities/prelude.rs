pub use super::audit_log::Entity as AuditLog;
pub use super::drawer_history::Entity as DrawerHistory;
pub use super::drawers::Entity as Drawers;
pub use super::users::Entity as Users;

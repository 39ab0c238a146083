pub mod lockout;
pub use lockout::LockoutTracker;

pub mod block_timer;
pub use block_timer::{BlockTimer, TimerStatus};

pub mod session;
pub use session::SessionSlot;

pub mod audit;
pub use audit::{AuditService, ORIGIN_SYSTEM, ORIGIN_TERMINAL};

pub mod access_service;
pub mod access_service_impl;
pub use access_service::{AccessError, AccessService, SessionUser};
pub use access_service_impl::SeaOrmAccessService;

pub mod drawer_service;
pub mod drawer_service_impl;
pub use drawer_service::{DrawerError, DrawerHistoryPage, DrawerService, SetDrawerOutcome};
pub use drawer_service_impl::SeaOrmDrawerService;

pub mod user_admin_service;
pub mod user_admin_service_impl;
pub use user_admin_service::{UserAdminError, UserAdminService, UserInfo};
pub use user_admin_service_impl::SeaOrmUserAdminService;

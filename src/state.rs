use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AccessService, AuditService, BlockTimer, DrawerService, LockoutTracker, SeaOrmAccessService,
    SeaOrmDrawerService, SeaOrmUserAdminService, SessionSlot, UserAdminService,
};

/// Composition root for the engine. Built once at startup and handed
/// by reference to every call site; there is no ambient global state.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub lockout: Arc<LockoutTracker>,

    pub block_timer: Arc<BlockTimer>,

    pub session: Arc<SessionSlot>,

    pub audit: Arc<AuditService>,

    pub access_service: Arc<dyn AccessService>,

    pub drawer_service: Arc<dyn DrawerService>,

    pub user_admin_service: Arc<dyn UserAdminService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let lockout = Arc::new(LockoutTracker::new(
            config.security.lockout.max_attempts,
            config.security.lockout.lockout_duration(),
        ));

        let block_timer = Arc::new(BlockTimer::new(config.timer.enabled));

        let session = Arc::new(SessionSlot::new(config.session.inactivity_timeout()));

        let audit = Arc::new(AuditService::new(store.clone()));

        let access_service = Arc::new(SeaOrmAccessService::new(
            store.clone(),
            config.security.clone(),
            lockout.clone(),
            session.clone(),
            block_timer.clone(),
            audit.clone(),
        )) as Arc<dyn AccessService + Send + Sync + 'static>;

        let drawer_service = Arc::new(SeaOrmDrawerService::new(
            store.clone(),
            block_timer.clone(),
            audit.clone(),
            Duration::from_secs(config.timer.default_block_minutes.saturating_mul(60)),
        )) as Arc<dyn DrawerService + Send + Sync + 'static>;

        let user_admin_service = Arc::new(SeaOrmUserAdminService::new(
            store.clone(),
            config.security.clone(),
            audit.clone(),
        )) as Arc<dyn UserAdminService + Send + Sync + 'static>;

        let config_arc = Arc::new(RwLock::new(config));

        Ok(Self {
            config: config_arc,
            store,
            lockout,
            block_timer,
            session,
            audit,
            access_service,
            drawer_service,
            user_admin_service,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}

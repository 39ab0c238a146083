use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use crate::entities::audit_log::Model as AuditRow;
pub use crate::entities::drawer_history::Model as DrawerHistoryRow;
pub use crate::entities::drawers::Model as DrawerRow;
pub use repositories::audit::AuditRecord;
pub use repositories::user::User;

use crate::config::SecurityConfig;
use crate::domain::Role;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn drawer_repo(&self) -> repositories::drawer::DrawerRepository {
        repositories::drawer::DrawerRepository::new(self.conn.clone())
    }

    fn audit_repo(&self) -> repositories::audit::AuditRepository {
        repositories::audit::AuditRepository::new(self.conn.clone())
    }

    // ---- users ----

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
        security: Option<&SecurityConfig>,
    ) -> Result<User> {
        self.user_repo()
            .create(username, password, role, security)
            .await
    }

    pub async fn update_user_password(
        &self,
        id: i32,
        new_password: &str,
        security: Option<&SecurityConfig>,
    ) -> Result<()> {
        self.user_repo()
            .update_password(id, new_password, security)
            .await
    }

    pub async fn set_user_active(&self, id: i32, is_active: bool) -> Result<User> {
        self.user_repo().set_active(id, is_active).await
    }

    pub async fn delete_user(&self, id: i32) -> Result<bool> {
        self.user_repo().delete(id).await
    }

    pub async fn count_active_admins(&self) -> Result<u64> {
        self.user_repo().count_active_admins().await
    }

    // ---- drawers ----

    pub async fn get_drawer(&self, drawer_id: &str) -> Result<Option<DrawerRow>> {
        self.drawer_repo().get(drawer_id).await
    }

    pub async fn list_drawers(&self) -> Result<Vec<DrawerRow>> {
        self.drawer_repo().list().await
    }

    pub async fn set_drawer_state(&self, drawer_id: &str, is_open: bool) -> Result<DrawerRow> {
        self.drawer_repo().set_state(drawer_id, is_open).await
    }

    pub async fn upsert_drawer(&self, drawer_id: &str, is_open: bool) -> Result<()> {
        self.drawer_repo().upsert(drawer_id, is_open).await
    }

    pub async fn add_drawer_history(
        &self,
        drawer_id: &str,
        action: &str,
        user_id: Option<i32>,
    ) -> Result<()> {
        self.drawer_repo()
            .add_history(drawer_id, action, user_id)
            .await
    }

    pub async fn drawer_history(
        &self,
        drawer_id: &str,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<DrawerHistoryRow>, u64)> {
        self.drawer_repo().history(drawer_id, page, page_size).await
    }

    pub async fn drawer_history_count(&self, drawer_id: &str) -> Result<u64> {
        self.drawer_repo().history_count(drawer_id).await
    }

    // ---- audit ----

    pub async fn append_audit(&self, record: AuditRecord) -> Result<i64> {
        self.audit_repo().append(record).await
    }

    pub async fn recent_audit(
        &self,
        page: u64,
        page_size: u64,
        action_filter: Option<String>,
    ) -> Result<(Vec<AuditRow>, u64)> {
        self.audit_repo()
            .recent(page, page_size, action_filter)
            .await
    }
}

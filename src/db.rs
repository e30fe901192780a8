use crate::config::AppConfig;
use crate::errors::ServiceError;
use metrics::{counter, gauge, histogram};
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, DatabaseTransaction, TransactionTrait,
};
use sea_orm_migration::MigratorTrait;
use std::time::{Duration, Instant};
use tracing::{error, info};

pub type DbPool = DatabaseConnection;

/// Pool tuning, usually taken from [`AppConfig`]
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub acquire_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            acquire_timeout: Duration::from_secs(8),
        }
    }
}

impl From<&AppConfig> for DbConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            url: cfg.database_url.clone(),
            max_connections: cfg.db_max_connections,
            min_connections: cfg.db_min_connections,
            connect_timeout: Duration::from_secs(cfg.db_connect_timeout_secs),
            idle_timeout: Duration::from_secs(cfg.db_idle_timeout_secs),
            acquire_timeout: Duration::from_secs(cfg.db_acquire_timeout_secs),
        }
    }
}

/// Opens the pool described by `config`.
pub async fn connect(config: &DbConfig) -> Result<DbPool, ServiceError> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .sqlx_logging(false);
    gauge!("hotel_pos_db.max_connections", config.max_connections as f64);

    match Database::connect(options).await {
        Ok(pool) => {
            info!(max = config.max_connections, "database pool ready");
            Ok(pool)
        }
        Err(err) => {
            error!(error = %err, "could not open database pool");
            Err(ServiceError::db_error(err))
        }
    }
}

pub async fn connect_with(cfg: &AppConfig) -> Result<DbPool, ServiceError> {
    connect(&DbConfig::from(cfg)).await
}

/// Opens a transaction and records it in the transaction counters.
pub async fn begin(db: &DbPool) -> Result<DatabaseTransaction, ServiceError> {
    counter!("hotel_pos_db.transaction.started", 1);
    db.begin().await.map_err(ServiceError::db_error)
}

/// Commits `txn`, recording how long the unit of work took.
pub async fn commit(txn: DatabaseTransaction, started: Instant) -> Result<(), ServiceError> {
    let result = txn.commit().await.map_err(ServiceError::db_error);
    histogram!("hotel_pos_db.transaction.duration", started.elapsed());
    match &result {
        Ok(_) => counter!("hotel_pos_db.transaction.committed", 1),
        Err(_) => counter!("hotel_pos_db.transaction.failed", 1),
    }
    result
}

/// Applies pending embedded migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), ServiceError> {
    let started = Instant::now();
    crate::migrator::Migrator::up(pool, None).await.map_err(|err| {
        error!(error = %err, "migrations failed");
        ServiceError::db_error(err)
    })?;
    info!(elapsed_ms = started.elapsed().as_millis() as u64, "migrations applied");
    Ok(())
}

/// Round-trips the pool, used by the health endpoint.
pub async fn check_connection(pool: &DbPool) -> Result<(), ServiceError> {
    let started = Instant::now();
    if let Err(err) = pool.ping().await {
        counter!("hotel_pos_db.connection_failures", 1);
        return Err(ServiceError::db_error(err));
    }
    gauge!(
        "hotel_pos_db.ping_ms",
        started.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> DbConfig {
        DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn connects_and_migrates_sqlite() {
        let pool = connect(&memory_config())
            .await
            .expect("connect");
        check_connection(&pool).await.expect("ping");
        run_migrations(&pool).await.expect("migrate");
        // a second run is a no-op
        run_migrations(&pool).await.expect("migrate again");
    }

    #[tokio::test]
    async fn dropped_transaction_rolls_back() {
        use crate::entities::notification;
        use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

        let pool = connect(&memory_config())
            .await
            .expect("connect");
        run_migrations(&pool).await.expect("migrate");

        {
            let txn = begin(&pool).await.expect("begin");
            notification::ActiveModel {
                notification_type: Set(notification::NotificationType::Info),
                message: Set("never committed".into()),
                created_at: Set(chrono::Utc::now()),
                read: Set(false),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .expect("insert");
        }

        let count = notification::Entity::find().count(&pool).await.unwrap();
        assert_eq!(count, 0);
    }
}

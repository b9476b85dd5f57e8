//! Embedded single-file store
//!
//! Owns one SQLite database file through SeaORM, bootstraps the schema on
//! open, and exposes row operations that are generic over SeaORM entities.
//! It knows nothing about the logical cluster model or the config codec.

use std::path::{Path, PathBuf};

use sea_orm::sqlx::ConnectOptions as _;
use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sea_orm::{
    ActiveModelTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    Iterable, PrimaryKeyToColumn, PrimaryKeyTrait, QueryFilter, QueryOrder, QuerySelect, Schema,
    SqlxSqliteConnector, Statement, Value,
};
use tracing::{debug, error, info};

use kubedeck_common::{CLUSTER_DB_FILE, KubedeckError, cluster_db_dir, home_dir};

use crate::entity::cluster;

/// Primary key value type of the entity behind an active model
pub type PrimaryKeyValue<A> =
    <<<A as ActiveModelTrait>::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// Connection pool options for the embedded store
#[derive(Clone, Copy, Debug)]
pub struct StoreOptions {
    pub max_connections: u32,
    pub sqlx_logging: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            max_connections: 4,
            sqlx_logging: false,
        }
    }
}

/// Handle to the local cluster database
///
/// Cloning is cheap and shares the underlying connection pool. SQLite
/// serializes concurrent writers itself.
#[derive(Clone, Debug)]
pub struct EmbeddedStore {
    db: DatabaseConnection,
    path: PathBuf,
}

impl EmbeddedStore {
    /// Open the store at `~/.kube/.kubedeck/cluster.db`
    pub async fn open_default(options: StoreOptions) -> Result<Self, KubedeckError> {
        let home = home_dir().ok_or_else(|| {
            error!("Cannot resolve home directory for the cluster store");
            KubedeckError::initialization("home directory not found")
        })?;
        Self::open(cluster_db_dir(&home).join(CLUSTER_DB_FILE), options).await
    }

    /// Open (creating if needed) the store file at `path`
    ///
    /// The parent directory is created when missing and the cluster table is
    /// created when absent. Opening an already initialized file is a no-op
    /// beyond connecting. The path is handed to SQLite as a file name, never
    /// through a connection URL, so `%`, `?` and `#` in it are literal.
    pub async fn open(
        path: impl AsRef<Path>,
        options: StoreOptions,
    ) -> Result<Self, KubedeckError> {
        let path = path.as_ref().to_path_buf();

        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir).map_err(|e| {
                error!(
                    path = %dir.display(),
                    error = %e,
                    "Failed to create cluster store directory"
                );
                KubedeckError::initialization(format!("cannot create {}", dir.display()))
            })?;
        }

        let mut connect_options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        if !options.sqlx_logging {
            connect_options = connect_options.disable_statement_logging();
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(options.max_connections.max(1))
            .min_connections(1)
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                error!(path = %path.display(), error = %e, "Failed to open cluster store");
                KubedeckError::initialization(format!("cannot open {}", path.display()))
            })?;
        let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);

        let store = Self { db, path };
        store.ensure_table(cluster::Entity).await?;

        info!(path = %store.path.display(), "Cluster store initialized");
        Ok(store)
    }

    /// Get a reference to the underlying database connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether a table exists in the database file
    pub async fn has_table(&self, table: &str) -> Result<bool, DbErr> {
        let backend = self.db.get_database_backend();
        let row = self
            .db
            .query_one(Statement::from_sql_and_values(
                backend,
                "SELECT COUNT(*) AS table_count FROM sqlite_master \
                 WHERE type = 'table' AND name = ?",
                [Value::from(table)],
            ))
            .await?;

        let count = match row {
            Some(row) => row.try_get::<i64>("", "table_count")?,
            None => 0,
        };
        Ok(count > 0)
    }

    /// Create the table for `entity` unless it already exists
    async fn ensure_table<E: EntityTrait>(&self, entity: E) -> Result<(), KubedeckError> {
        let table = entity.table_name().to_owned();

        let exists = self.has_table(&table).await.map_err(|e| {
            error!(table = %table, error = %e, "Failed to inspect cluster store schema");
            KubedeckError::initialization(format!("cannot inspect table {table}"))
        })?;
        if exists {
            debug!(table = %table, "Table already exists");
            return Ok(());
        }

        let backend = self.db.get_database_backend();
        let mut statement = Schema::new(backend).create_table_from_entity(entity);
        statement.if_not_exists();

        self.db
            .execute(backend.build(&statement))
            .await
            .map_err(|e| {
                error!(table = %table, error = %e, "Failed to create table");
                KubedeckError::initialization(format!("cannot create table {table}"))
            })?;

        info!(table = %table, "Created table");
        Ok(())
    }

    /// Insert a row and return its generated primary key
    pub async fn insert<A>(&self, row: A) -> Result<PrimaryKeyValue<A>, DbErr>
    where
        A: ActiveModelTrait + Send,
    {
        let result = <A::Entity as EntityTrait>::insert(row)
            .exec(&self.db)
            .await?;
        Ok(result.last_insert_id)
    }

    /// Apply the `Set` columns of `values` to every row matching `filter`
    ///
    /// Columns left `NotSet` are untouched. Returns the number of rows
    /// affected.
    pub async fn update_where<A>(&self, values: A, filter: Condition) -> Result<u64, DbErr>
    where
        A: ActiveModelTrait + Send,
    {
        let result = <A::Entity as EntityTrait>::update_many()
            .set(values)
            .filter(filter)
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// Find rows matching `filter`, ordered by primary key
    pub async fn find_where<E>(
        &self,
        filter: Condition,
        limit: Option<u64>,
    ) -> Result<Vec<E::Model>, DbErr>
    where
        E: EntityTrait,
    {
        let mut query = E::find().filter(filter);
        for key in E::PrimaryKey::iter() {
            query = query.order_by_asc(key.into_column());
        }
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        query.all(&self.db).await
    }

    /// Delete rows matching `filter`, returning how many were removed
    pub async fn delete_where<E>(&self, filter: Condition) -> Result<u64, DbErr>
    where
        E: EntityTrait,
    {
        let result = E::delete_many().filter(filter).exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}

use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr, Statement,
};

const SQLITE_PRAGMAS: [&str; 4] = [
    "PRAGMA journal_mode=WAL",
    "PRAGMA synchronous=NORMAL",
    "PRAGMA cache_size=-64000",
    "PRAGMA foreign_keys=ON",
];

pub async fn connect_and_migrate(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opts = ConnectOptions::new(database_url.to_string());
    opts.sqlx_logging(false);
    // Every pooled connection to `:memory:` would open its own empty database.
    if database_url.contains(":memory:") {
        opts.max_connections(1).min_connections(1);
    }

    let db = Database::connect(opts).await?;

    if db.get_database_backend() == DbBackend::Sqlite {
        for pragma in SQLITE_PRAGMAS {
            db.execute(Statement::from_string(DbBackend::Sqlite, pragma.to_string())).await?;
        }
    }

    Migrator::up(&db, None).await?;
    Ok(db)
}

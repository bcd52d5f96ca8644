use std::fmt;

use anyhow::Context;
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection};
use tracing::info;

#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub database: String,
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("database", &self.database)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl ConnectionSettings {
    pub fn connect_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database);
        if let Some(user) = &self.user {
            options = options.username(user);
        }
        if let Some(password) = &self.password {
            options = options.password(password);
        }
        options
    }
}

/// Runs all `statements` in a single transaction.
pub fn execute(settings: &ConnectionSettings, statements: &[String]) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;
    runtime.block_on(execute_async(settings, statements))
}

async fn execute_async(settings: &ConnectionSettings, statements: &[String]) -> anyhow::Result<()> {
    let mut connection = PgConnection::connect_with(&settings.connect_options())
        .await
        .with_context(|| {
            format!(
                "failed to connect to database {:?} on {}:{}",
                settings.database, settings.host, settings.port
            )
        })?;

    let mut transaction = connection.begin().await?;
    for ddl in statements {
        sqlx::raw_sql(ddl)
            .execute(&mut *transaction)
            .await
            .with_context(|| format!("failed to execute:\n{ddl}"))?;
    }
    transaction.commit().await?;
    info!(
        database = settings.database.as_str(),
        batches = statements.len(),
        "committed"
    );

    connection.close().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ConnectionSettings {
        ConnectionSettings {
            database: "orders".into(),
            host: "db.local".into(),
            port: 6543,
            user: Some("app".into()),
            password: Some("secret".into()),
        }
    }

    #[test]
    fn user_and_password_are_set_separately() {
        let options = settings().connect_options();
        assert_eq!(options.get_host(), "db.local");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_database(), Some("orders"));
        assert_eq!(options.get_username(), "app");
    }

    #[test]
    fn debug_hides_password() {
        let debug = format!("{:?}", settings());
        assert!(!debug.contains("secret"));
        assert!(debug.contains("***"));
    }
}

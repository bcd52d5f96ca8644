use clap::Parser;
use xsd2sql::{WalkOptions, DEFAULT_SCHEMA_PREFIX, MAX_DEPTH_LIMIT, MAX_RECURSE_LEVEL};

use crate::db::ConnectionSettings;

/// Create a PostgreSQL schema based on XSD schemas. If no database name is given, the SQL is
/// written to stdout.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// XSD files (or URLs) to base the schema on
    #[arg(value_name = "FILE", required = true)]
    pub inputs: Vec<String>,

    /// Fail on finding an unsupported or unresolvable XS type
    #[arg(short = 'f', long = "fail")]
    pub fail_on_bad_type: bool,

    /// Don't normalize element names
    #[arg(short = 'a', long)]
    pub as_is: bool,

    /// Allow a XML Document Type Definition (DTD) to occur
    #[arg(long)]
    pub allow_dtd: bool,

    /// Give up when the schema nests deeper than this (at most 500)
    #[arg(long, default_value_t = MAX_RECURSE_LEVEL, value_parser = parse_max_depth)]
    pub max_depth: usize,

    /// Fail as soon as a named complex type contains itself
    #[arg(long)]
    pub detect_cycles: bool,

    /// Forget the named types of one file before converting the next
    #[arg(long)]
    pub isolate_types: bool,

    /// Prefix of XSD built-in type names in `type` and `ref` attributes
    #[arg(long, default_value = DEFAULT_SCHEMA_PREFIX)]
    pub schema_prefix: String,

    /// Execute the DDL against this database instead of printing it
    #[arg(short = 'd', long = "database", value_name = "NAME", env = "XSD2SQL_DB_NAME")]
    pub db_name: Option<String>,

    /// Database user
    #[arg(short = 'u', long = "user", value_name = "USERNAME", env = "XSD2SQL_DB_USER")]
    pub db_user: Option<String>,

    /// Database password
    #[arg(
        short = 'p',
        long = "password",
        value_name = "PASSWORD",
        env = "XSD2SQL_DB_PASSWORD",
        hide_env_values = true
    )]
    pub db_password: Option<String>,

    /// Database host
    #[arg(
        short = 'n',
        long = "host",
        value_name = "HOSTNAME",
        env = "XSD2SQL_DB_HOST",
        default_value = "localhost"
    )]
    pub db_host: String,

    /// Database port
    #[arg(
        short = 'P',
        long = "port",
        value_name = "PORT",
        env = "XSD2SQL_DB_PORT",
        default_value_t = 5432
    )]
    pub db_port: u16,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_max_depth(value: &str) -> Result<usize, String> {
    let depth: usize = value.parse().map_err(|e| format!("{e}"))?;
    if (1..=MAX_DEPTH_LIMIT).contains(&depth) {
        Ok(depth)
    } else {
        Err(format!("must be between 1 and {MAX_DEPTH_LIMIT}"))
    }
}

impl Cli {
    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            normalize: !self.as_is,
            fail_on_bad_type: self.fail_on_bad_type,
            max_depth: self.max_depth,
            detect_cycles: self.detect_cycles,
        }
    }

    /// Where to execute the DDL, if a database was given
    pub fn connection_settings(&self) -> Option<ConnectionSettings> {
        let database = self.db_name.clone()?;
        Some(ConnectionSettings {
            database,
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
        })
    }
}

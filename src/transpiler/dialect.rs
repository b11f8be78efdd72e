use serde::{Deserialize, Serialize};

use crate::error::{DynaError, DynaResult};
use crate::transpiler::sql::mysql::MysqlGenerator;
use crate::transpiler::sql::oracle::OracleGenerator;
use crate::transpiler::sql::postgres::PostgresGenerator;
use crate::transpiler::sql::sqlite::SqliteGenerator;
use crate::transpiler::sql::sqlserver::SqlServerGenerator;
use crate::transpiler::traits::SqlGenerator;

/// Supported SQL Dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Postgres,
    MySQL,
    SQLite,
    SqlServer,
    Oracle,
}

impl Dialect {
    pub const ALL: &'static [Dialect] = &[
        Dialect::Postgres,
        Dialect::MySQL,
        Dialect::SQLite,
        Dialect::SqlServer,
        Dialect::Oracle,
    ];

    pub fn generator(&self) -> Box<dyn SqlGenerator> {
        match self {
            Dialect::Postgres => Box::new(PostgresGenerator),
            Dialect::MySQL => Box::new(MysqlGenerator),
            Dialect::SQLite => Box::new(SqliteGenerator),
            Dialect::SqlServer => Box::new(SqlServerGenerator),
            Dialect::Oracle => Box::new(OracleGenerator),
        }
    }

    /// Lowercase key used in configuration files and on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::MySQL => "mysql",
            Dialect::SQLite => "sqlite",
            Dialect::SqlServer => "sqlserver",
            Dialect::Oracle => "oracle",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.generator().name())
    }
}

impl std::str::FromStr for Dialect {
    type Err = DynaError;

    fn from_str(s: &str) -> DynaResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "mysql" => Ok(Dialect::MySQL),
            "sqlite" => Ok(Dialect::SQLite),
            "sqlserver" | "mssql" | "tsql" => Ok(Dialect::SqlServer),
            "oracle" => Ok(Dialect::Oracle),
            other => Err(DynaError::Config(format!("unknown dialect '{}'", other))),
        }
    }
}

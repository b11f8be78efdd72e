//! DDL, stored procedures and scripts across dialects.

use crate::ast::builders::*;
use crate::ast::{
    ClauseExt, Column, CreateIndex, CreateProcedure, CreateSequence, CreateTable, Delete,
    DropStatement, DbType, FkAction, ForeignKey, Order, PrimaryKey, Script, Select,
};
use crate::error::DynaError;
use crate::transpiler::{Dialect, ToSql};
use pretty_assertions::assert_eq;

fn accounts() -> CreateTable {
    CreateTable::new("accounts")
        .column(Column::new("id", DbType::Int32).primary_key().auto_assign())
        .unwrap()
        .column(Column::new("owner", DbType::AnsiString).length(60).nullable())
        .unwrap()
        .column(Column::new("balance", DbType::Decimal).precision(12, 2))
        .unwrap()
        .default_value(value(0))
        .unwrap()
}

#[test]
fn test_identity_columns_per_dialect() {
    assert_eq!(
        accounts().to_sql_with_dialect(Dialect::Postgres).unwrap(),
        "CREATE TABLE \"accounts\" (\"id\" INTEGER NOT NULL GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY, \
         \"owner\" VARCHAR(60), \"balance\" NUMERIC(12, 2) NOT NULL DEFAULT 0)"
    );
    assert_eq!(
        accounts().to_sql_with_dialect(Dialect::SqlServer).unwrap(),
        "CREATE TABLE [accounts] ([id] INT NOT NULL IDENTITY(1, 1) PRIMARY KEY, \
         [owner] VARCHAR(60), [balance] DECIMAL(12, 2) NOT NULL DEFAULT 0)"
    );
    assert_eq!(
        accounts().to_sql_with_dialect(Dialect::MySQL).unwrap(),
        "CREATE TABLE `accounts` (`id` INT NOT NULL AUTO_INCREMENT PRIMARY KEY, \
         `owner` VARCHAR(60), `balance` DECIMAL(12, 2) NOT NULL DEFAULT 0)"
    );
    assert_eq!(
        accounts().to_sql_with_dialect(Dialect::SQLite).unwrap(),
        "CREATE TABLE \"accounts\" (\"id\" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT, \
         \"owner\" TEXT, \"balance\" NUMERIC NOT NULL DEFAULT 0)"
    );
}

#[test]
fn test_sqlite_identity_needs_primary_key() {
    let table = CreateTable::new("t")
        .column(Column::new("n", DbType::Int64).auto_assign())
        .unwrap();
    assert!(matches!(
        table.to_sql_with_dialect(Dialect::SQLite),
        Err(DynaError::Unsupported { .. })
    ));
    assert!(table.to_sql_with_dialect(Dialect::Postgres).is_ok());
}

#[test]
fn test_table_constraints() {
    let table = CreateTable::new("transfers")
        .column(Column::new("id", DbType::Int64))
        .unwrap()
        .column(Column::new("account_id", DbType::Int32))
        .unwrap()
        .primary_key(PrimaryKey::named("pk_transfers").column("id").unwrap())
        .foreign_key(
            ForeignKey::named("fk_account")
                .column("account_id")
                .unwrap()
                .references("accounts")
                .column("id")
                .unwrap()
                .on_delete(FkAction::Cascade),
        );
    assert_eq!(
        table.to_sql().unwrap(),
        "CREATE TABLE \"transfers\" (\"id\" BIGINT NOT NULL, \"account_id\" INTEGER NOT NULL, \
         CONSTRAINT \"pk_transfers\" PRIMARY KEY (\"id\"), \
         CONSTRAINT \"fk_account\" FOREIGN KEY (\"account_id\") REFERENCES \"accounts\" (\"id\") ON DELETE CASCADE)"
    );
}

#[test]
fn test_index_and_drop_index() {
    let index = CreateIndex::new("ix_owner", "accounts")
        .column_ordered("owner", Order::Ascending)
        .unwrap();
    assert_eq!(
        index.to_sql_with_dialect(Dialect::SqlServer).unwrap(),
        "CREATE INDEX [ix_owner] ON [accounts] ([owner] ASC)"
    );

    let drop = DropStatement::index("ix_owner", "accounts");
    assert_eq!(drop.to_sql().unwrap(), "DROP INDEX \"ix_owner\"");
    assert_eq!(
        drop.to_sql_with_dialect(Dialect::SqlServer).unwrap(),
        "DROP INDEX [ix_owner] ON [accounts]"
    );
    assert_eq!(
        drop.to_sql_with_dialect(Dialect::MySQL).unwrap(),
        "DROP INDEX `ix_owner` ON `accounts`"
    );
}

#[test]
fn test_sequences() {
    let sequence = CreateSequence::new("invoice_no").start(1).increment(1);
    assert_eq!(
        sequence.to_sql_with_dialect(Dialect::Oracle).unwrap(),
        "CREATE SEQUENCE \"invoice_no\" START WITH 1 INCREMENT BY 1"
    );
    for dialect in [Dialect::MySQL, Dialect::SQLite] {
        assert!(matches!(
            sequence.to_sql_with_dialect(dialect),
            Err(DynaError::Unsupported { .. })
        ));
    }
    assert_eq!(
        DropStatement::sequence("invoice_no").if_exists().to_sql().unwrap(),
        "DROP SEQUENCE IF EXISTS \"invoice_no\""
    );
}

#[test]
fn test_drop_guard_on_oracle() {
    let drop = DropStatement::table("accounts").if_exists();
    assert_eq!(drop.to_sql().unwrap(), "DROP TABLE IF EXISTS \"accounts\"");
    assert!(matches!(
        drop.to_sql_with_dialect(Dialect::Oracle),
        Err(DynaError::Unsupported { .. })
    ));
    assert_eq!(
        DropStatement::table("accounts").to_sql_with_dialect(Dialect::Oracle).unwrap(),
        "DROP TABLE \"accounts\""
    );
}

fn close_account() -> CreateProcedure {
    let id = param("id", DbType::Int32);
    CreateProcedure::new("close_account")
        .parameter(id.clone())
        .body(Script::new().then(Delete::table("accounts").and_where(field("id").equals(id))))
}

#[test]
fn test_procedure_postgres() {
    assert_eq!(
        close_account().to_sql().unwrap(),
        "CREATE PROCEDURE \"close_account\" (id INTEGER) LANGUAGE plpgsql AS $$ BEGIN \
         DELETE FROM \"accounts\" WHERE (\"id\" = $1); END $$"
    );
}

#[test]
fn test_procedure_oracle() {
    assert_eq!(
        close_account().to_sql_with_dialect(Dialect::Oracle).unwrap(),
        "CREATE PROCEDURE \"close_account\" (id IN NUMBER(10)) AS BEGIN \
         DELETE FROM \"accounts\" WHERE (\"id\" = :id); END"
    );
}

#[test]
fn test_migration_script() {
    let script = Script::new()
        .then(DropStatement::table("accounts").if_exists())
        .then(accounts())
        .then(CreateIndex::new("ix_owner", "accounts").column("owner").unwrap());
    assert_eq!(
        script.to_sql().unwrap(),
        "DROP TABLE IF EXISTS \"accounts\"; \
         CREATE TABLE \"accounts\" (\"id\" INTEGER NOT NULL GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY, \
         \"owner\" VARCHAR(60), \"balance\" NUMERIC(12, 2) NOT NULL DEFAULT 0); \
         CREATE INDEX \"ix_owner\" ON \"accounts\" (\"owner\");"
    );
    assert!(matches!(
        script.to_sql_with_dialect(Dialect::MySQL),
        Err(DynaError::Unsupported { .. })
    ));
}

#[test]
fn test_single_statement_script_on_mysql() {
    let script = Script::new().then(Select::new().select(count_all()).from("accounts"));
    assert_eq!(
        script.to_sql_with_dialect(Dialect::MySQL).unwrap(),
        "SELECT COUNT(*) FROM `accounts`;"
    );
}

#[test]
fn test_empty_script_renders_nothing() {
    assert_eq!(Script::new().to_sql().unwrap(), "");
}

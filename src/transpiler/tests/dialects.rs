//! SQL dialect tests (MySQL, SQLite, Oracle, SQL Server).

use crate::ast::builders::*;
use crate::ast::{
    ClauseExt, Compare, Comparison, DbType, Field, Function, FunctionKind, Order, Select, Table,
    TableHint, Top,
};
use crate::error::DynaError;
use crate::transpiler::{Dialect, ToSql};
use pretty_assertions::assert_eq;

fn lookup() -> Select {
    Select::new()
        .field("id")
        .from("users")
        .and_where(Comparison::new(Field::new("id"), Compare::Equals, param("id", DbType::Int32)))
        .top(Top::first(5))
}

#[test]
fn test_postgres_dialect() {
    assert_eq!(
        lookup().to_sql_with_dialect(Dialect::Postgres).unwrap(),
        "SELECT \"id\" FROM \"users\" WHERE (\"id\" = $1) LIMIT 5"
    );
}

#[test]
fn test_mysql_dialect() {
    assert_eq!(
        lookup().to_sql_with_dialect(Dialect::MySQL).unwrap(),
        "SELECT `id` FROM `users` WHERE (`id` = ?) LIMIT 5"
    );
}

#[test]
fn test_sqlite_dialect() {
    assert_eq!(
        lookup().to_sql_with_dialect(Dialect::SQLite).unwrap(),
        "SELECT \"id\" FROM \"users\" WHERE (\"id\" = @id) LIMIT 5"
    );
}

#[test]
fn test_sqlserver_dialect() {
    assert_eq!(
        lookup().to_sql_with_dialect(Dialect::SqlServer).unwrap(),
        "SELECT TOP 5 [id] FROM [users] WHERE ([id] = @id)"
    );

    let page = Select::new().from("users").order_by(field("id"), Order::Default).top_range(5, 10);
    assert_eq!(
        page.to_sql_with_dialect(Dialect::SqlServer).unwrap(),
        "SELECT * FROM [users] ORDER BY [id] OFFSET 5 ROWS FETCH NEXT 10 ROWS ONLY"
    );
}

#[test]
fn test_oracle_dialect() {
    assert_eq!(
        lookup().to_sql_with_dialect(Dialect::Oracle).unwrap(),
        "SELECT \"id\" FROM \"users\" WHERE (\"id\" = :id) FETCH FIRST 5 ROWS ONLY"
    );

    // Oracle tables take their alias without AS.
    let aliased = Select::new().from(Table::new("users").alias("u"));
    assert_eq!(
        aliased.to_sql_with_dialect(Dialect::Oracle).unwrap(),
        "SELECT * FROM \"users\" \"u\""
    );
}

#[test]
fn test_boolean_literals() {
    let cases = [
        (Dialect::Postgres, "TRUE"),
        (Dialect::MySQL, "1"),
        (Dialect::SQLite, "1"),
        (Dialect::SqlServer, "1"),
        (Dialect::Oracle, "1"),
    ];
    for (dialect, expected) in cases {
        assert_eq!(value(true).to_sql_with_dialect(dialect).unwrap(), expected, "{:?}", dialect);
    }
}

#[test]
fn test_concatenation() {
    let full_name = field("first").concat(field("last"));
    assert_eq!(
        full_name.to_sql_with_dialect(Dialect::Postgres).unwrap(),
        "(\"first\" || \"last\")"
    );
    assert_eq!(
        full_name.to_sql_with_dialect(Dialect::SqlServer).unwrap(),
        "([first] + [last])"
    );
    assert!(matches!(
        full_name.to_sql_with_dialect(Dialect::MySQL),
        Err(DynaError::Unsupported { .. })
    ));
}

#[test]
fn test_oracle_has_no_modulo_operator() {
    let expr = field("n").modulo(value(2));
    assert_eq!(expr.to_sql_with_dialect(Dialect::SQLite).unwrap(), "(\"n\" % 2)");
    assert!(expr.to_sql_with_dialect(Dialect::Oracle).is_err());
}

#[test]
fn test_last_identity_function() {
    let last = Function::new(FunctionKind::LastId);
    let cases = [
        (Dialect::Postgres, "LASTVAL()"),
        (Dialect::MySQL, "LAST_INSERT_ID()"),
        (Dialect::SQLite, "last_insert_rowid()"),
        (Dialect::SqlServer, "SCOPE_IDENTITY()"),
    ];
    for (dialect, expected) in cases {
        assert_eq!(last.to_sql_with_dialect(dialect).unwrap(), expected);
    }
}

#[test]
fn test_full_outer_join_on_mysql() {
    let query = Select::new()
        .from("a")
        .full_join("b", qualified("a", "id").equals(qualified("b", "id")));
    assert!(query.to_sql_with_dialect(Dialect::Postgres).is_ok());
    assert!(matches!(
        query.to_sql_with_dialect(Dialect::MySQL),
        Err(DynaError::Unsupported { .. })
    ));
}

#[test]
fn test_table_hints_only_on_sqlserver() {
    let query = Select::new().from(Table::new("orders").hint(TableHint::NoLock).unwrap());
    assert_eq!(
        query.to_sql_with_dialect(Dialect::SqlServer).unwrap(),
        "SELECT * FROM [orders] WITH (NOLOCK)"
    );
    for dialect in [Dialect::Postgres, Dialect::MySQL, Dialect::SQLite, Dialect::Oracle] {
        assert!(query.to_sql_with_dialect(dialect).is_err());
    }
}

#[test]
fn test_unicode_strings_on_sqlserver() {
    let name = typed(DbType::String, "Zoë");
    assert_eq!(name.to_sql_with_dialect(Dialect::SqlServer).unwrap(), "N'Zoë'");
    let code = typed(DbType::AnsiString, "A1");
    assert_eq!(code.to_sql_with_dialect(Dialect::SqlServer).unwrap(), "'A1'");
}

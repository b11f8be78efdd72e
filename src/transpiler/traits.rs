//! Per-dialect text hooks used by [`SqlBuilder`](super::SqlBuilder).

use chrono::NaiveDateTime;

use crate::ast::{
    DbType, FkAction, FunctionKind, Operator, ParameterDirection, QueryOption, SchemaObjectType,
    TableHint, Top,
};

/// Escape a string literal body by doubling single quotes.
pub fn escape_string(text: &str) -> String {
    text.replace('\'', "''")
}

/// Where a row limit is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopClause {
    /// Right after SELECT / DISTINCT.
    Prefix(String),
    /// At the end of the statement.
    Suffix(String),
}

/// How a stored procedure header and body are framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcedureStyle {
    /// Procedures cannot be created.
    Unsupported,
    /// `name @a INT AS BEGIN ... END`
    TSql,
    /// `name (IN a INT) BEGIN ... END`
    MySql,
    /// `name (a INTEGER) LANGUAGE plpgsql AS $$ BEGIN ... END $$`
    PlPgSql,
    /// `name (a IN NUMBER) AS BEGIN ... END`
    PlSql,
}

/// Trait for dialect-specific SQL generation.
///
/// Hooks returning `Option` use `None` for "this dialect cannot express it";
/// the builder turns that into [`DynaError::Unsupported`](crate::DynaError).
pub trait SqlGenerator {
    /// Human readable dialect name.
    fn name(&self) -> &'static str;

    /// Quote an identifier (table or column name).
    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// Placeholder for a parameter. `index` is 1-based in first-use order.
    fn placeholder(&self, index: usize, name: &str) -> String;

    fn bool_literal(&self, val: bool) -> String {
        if val { "TRUE".to_string() } else { "FALSE".to_string() }
    }

    fn string_literal(&self, text: &str, _db_type: DbType) -> String {
        format!("'{}'", escape_string(text))
    }

    fn binary_literal(&self, bytes: &[u8]) -> String {
        format!("X'{}'", crate::ast::values::to_hex(bytes))
    }

    fn datetime_literal(&self, dt: &NaiveDateTime) -> String {
        format!("'{}'", dt.format("%Y-%m-%d %H:%M:%S"))
    }

    /// Keyword between a table and its alias.
    fn table_alias_keyword(&self) -> &'static str {
        " AS "
    }

    /// Token for an operator.
    fn operator_symbol(&self, op: Operator) -> Option<&'static str> {
        match op {
            Operator::XOr => None,
            other => Some(other.sql_symbol()),
        }
    }

    /// Column type name. `length` is the size of strings and binaries and
    /// the total digits of exact numerics; `precision` is their scale.
    fn data_type(&self, db_type: DbType, length: Option<u32>, precision: Option<u32>)
    -> Option<String>;

    /// Identity / auto-increment keyword.
    fn identity_clause(&self) -> &'static str;

    /// Whether the identity keyword follows PRIMARY KEY instead of the type.
    fn identity_after_primary_key(&self) -> bool {
        false
    }

    fn top_clause(&self, top: &Top) -> Option<TopClause>;

    /// Guard written after `CREATE <object>` for [`ExistState::NotExists`](crate::ast::ExistState).
    fn create_guard(&self, _object: SchemaObjectType) -> Option<&'static str> {
        None
    }

    /// Guard written after `DROP <object>` for [`ExistState::Exists`](crate::ast::ExistState).
    fn drop_guard(&self, _object: SchemaObjectType) -> Option<&'static str> {
        Some("IF EXISTS")
    }

    /// Whether `DROP INDEX` names the table it belongs to.
    fn drop_index_needs_table(&self) -> bool {
        false
    }

    fn supports_sequences(&self) -> bool {
        true
    }

    fn procedure_style(&self) -> ProcedureStyle;

    fn fk_action(&self, action: FkAction, _on_update: bool) -> Option<&'static str> {
        match action {
            FkAction::Undefined => Some(""),
            FkAction::NoAction => Some("NO ACTION"),
            FkAction::Cascade => Some("CASCADE"),
            FkAction::SetNull => Some("SET NULL"),
            FkAction::SetDefault => Some("SET DEFAULT"),
        }
    }

    /// Name of a function, or the complete expression for functions that
    /// take no arguments.
    fn function_name(&self, func: &FunctionKind) -> Option<String>;

    fn supports_table_hints(&self) -> bool {
        false
    }

    fn table_hint(&self, _hint: TableHint, _options: &[String]) -> Option<String> {
        None
    }

    fn query_option(&self, _option: QueryOption, _value: Option<i64>) -> Option<String> {
        None
    }

    fn supports_multiple_statements(&self) -> bool {
        true
    }

    /// Reference to a script variable.
    fn variable(&self, name: &str) -> String {
        name.to_string()
    }

    /// Parameter in a procedure signature.
    fn parameter_declaration(&self, name: &str, data_type: &str, direction: ParameterDirection) -> String {
        match direction {
            ParameterDirection::Input => format!("{} {}", name, data_type),
            ParameterDirection::Output => format!("OUT {} {}", name, data_type),
            ParameterDirection::InputOutput => format!("INOUT {} {}", name, data_type),
            ParameterDirection::ReturnValue => format!("{} {}", name, data_type),
        }
    }

    fn use_database(&self, _database: &str) -> Option<String> {
        None
    }
}

/// Standard LIMIT / OFFSET placement shared by several dialects.
pub(crate) fn limit_offset(top: &Top) -> Option<TopClause> {
    use crate::ast::TopType;
    match top.top_type() {
        TopType::Count => Some(TopClause::Suffix(format!(" LIMIT {}", top.count()))),
        TopType::Range => Some(TopClause::Suffix(format!(
            " LIMIT {} OFFSET {}",
            top.count(),
            top.offset()
        ))),
        TopType::Percent => None,
    }
}

/// ANSI OFFSET / FETCH placement.
pub(crate) fn offset_fetch(top: &Top) -> String {
    format!(
        " OFFSET {} ROWS FETCH NEXT {} ROWS ONLY",
        top.offset(),
        top.count()
    )
}

/// String type with an optional size, falling back to an unbounded type.
pub(crate) fn sized(name: &str, length: Option<u32>, unbounded: &str) -> String {
    match length {
        Some(n) if n > 0 => format!("{}({})", name, n),
        _ => unbounded.to_string(),
    }
}

/// Exact numeric type with optional precision and scale.
pub(crate) fn numeric(name: &str, length: Option<u32>, precision: Option<u32>) -> String {
    match (length, precision) {
        (Some(p), Some(s)) => format!("{}({}, {})", name, p, s),
        (Some(p), None) => format!("{}({})", name, p),
        _ => name.to_string(),
    }
}

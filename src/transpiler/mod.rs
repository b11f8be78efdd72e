//! SQL rendering for DynaSQL statement trees.
//!
//! Clauses never produce SQL text themselves. They walk their children and
//! emit structural events (`begin_*` / `end_*` pairs and leaf writes) to a
//! [`StatementBuilder`]. [`SqlBuilder`] turns those events into dialect
//! specific text using a [`SqlGenerator`].

pub mod builder;
pub mod dialect;
pub mod sql;
pub mod traits;

#[cfg(test)]
mod tests;

use crate::ast::{
    AggregateFunction, Clause, ColumnFlags, ConstraintType, CreateOptions, DbType, ExistState,
    FkAction, FunctionKind, JoinType, Operator, Order, Param, QueryOption, SchemaObjectType,
    SequenceOptions, TableHint, Top, Value,
};
use crate::error::DynaResult;

pub use builder::SqlBuilder;
pub use dialect::Dialect;
pub use traits::{SqlGenerator, escape_string};

/// The event sink that clauses render into.
///
/// `write_raw`, `mark` and `reset_to` are required. Every structural event
/// has a no-op default so a builder only needs to handle what it cares
/// about; [`SqlBuilder`] handles all of them.
pub trait StatementBuilder {
    /// Append raw text.
    fn write_raw(&mut self, text: &str) -> DynaResult<()>;

    /// Position that [`reset_to`](Self::reset_to) can roll back to.
    fn mark(&self) -> usize;

    /// Discard everything written since `mark`.
    fn reset_to(&mut self, mark: usize);

    /// Name of the target, used in error messages.
    fn dialect_name(&self) -> &str {
        "statement builder"
    }

    /// Whether a script with more than one statement can be rendered.
    fn supports_multiple_statements(&self) -> bool {
        true
    }

    /// Start a new line (or a clause break in compact output).
    fn begin_new_line(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn indent(&mut self) {}

    fn outdent(&mut self) {}

    // Punctuation and leaves

    fn begin_block(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn end_block(&mut self) -> DynaResult<()> {
        Ok(())
    }

    /// Separator between list items; `new_line` asks for one item per line.
    fn write_list_separator(&mut self, _new_line: bool) -> DynaResult<()> {
        Ok(())
    }

    /// Separator between the parts of a qualified name.
    fn append_reference_separator(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn write_operator(&mut self, _op: Operator) -> DynaResult<()> {
        Ok(())
    }

    fn write_alias(&mut self, _alias: &str) -> DynaResult<()> {
        Ok(())
    }

    /// Alias of a derived table.
    fn write_table_alias(&mut self, _alias: &str) -> DynaResult<()> {
        Ok(())
    }

    /// A single (quoted) identifier.
    fn write_identifier(&mut self, _name: &str) -> DynaResult<()> {
        Ok(())
    }

    fn write_source_table(
        &mut self,
        _owner: Option<&str>,
        _name: &str,
        _alias: Option<&str>,
    ) -> DynaResult<()> {
        Ok(())
    }

    fn write_source_field(
        &mut self,
        _owner: Option<&str>,
        _table: Option<&str>,
        _name: &str,
        _alias: Option<&str>,
    ) -> DynaResult<()> {
        Ok(())
    }

    fn write_all_fields(&mut self, _owner: Option<&str>, _table: Option<&str>) -> DynaResult<()> {
        Ok(())
    }

    fn write_literal(&mut self, _db_type: DbType, _value: &Value) -> DynaResult<()> {
        Ok(())
    }

    fn write_null(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn write_parameter(&mut self, _param: &Param) -> DynaResult<()> {
        Ok(())
    }

    /// A script variable reference (SET target, DECLARE name).
    fn write_variable(&mut self, _name: &str) -> DynaResult<()> {
        Ok(())
    }

    // Functions

    fn begin_aggregate_function(&mut self, _func: AggregateFunction) -> DynaResult<()> {
        Ok(())
    }

    fn end_aggregate_function(&mut self, _func: AggregateFunction) -> DynaResult<()> {
        Ok(())
    }

    fn begin_function(&mut self, _func: &FunctionKind) -> DynaResult<()> {
        Ok(())
    }

    fn end_function(&mut self, _func: &FunctionKind) -> DynaResult<()> {
        Ok(())
    }

    fn begin_function_parameter_list(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn end_function_parameter_list(&mut self) -> DynaResult<()> {
        Ok(())
    }

    // SELECT

    fn begin_select_statement(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn end_select_statement(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn write_distinct(&mut self) -> DynaResult<()> {
        Ok(())
    }

    /// Row limit written right after SELECT (TOP n).
    fn write_top_prefix(&mut self, _top: &Top) -> DynaResult<()> {
        Ok(())
    }

    /// Row limit written at the end of the statement (LIMIT / FETCH).
    fn write_top_suffix(&mut self, _top: &Top) -> DynaResult<()> {
        Ok(())
    }

    fn begin_select_list(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn end_select_list(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn begin_from_list(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn end_from_list(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn begin_join(&mut self, _join_type: JoinType) -> DynaResult<()> {
        Ok(())
    }

    fn end_join(&mut self, _join_type: JoinType) -> DynaResult<()> {
        Ok(())
    }

    fn begin_join_on_list(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn end_join_on_list(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn begin_where(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn end_where(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn begin_group_by(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn end_group_by(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn begin_having(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn end_having(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn begin_order_statement(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn end_order_statement(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn begin_order_clause(&mut self, _order: Order) -> DynaResult<()> {
        Ok(())
    }

    fn end_order_clause(&mut self, _order: Order) -> DynaResult<()> {
        Ok(())
    }

    fn begin_sub_statement(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn end_sub_statement(&mut self) -> DynaResult<()> {
        Ok(())
    }

    // Hints

    fn begin_table_hints(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn write_table_hint(&mut self, _hint: TableHint, _options: &[String]) -> DynaResult<()> {
        Ok(())
    }

    fn end_table_hints(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn begin_query_options(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn write_query_option(&mut self, _option: QueryOption, _value: Option<i64>) -> DynaResult<()> {
        Ok(())
    }

    fn end_query_options(&mut self) -> DynaResult<()> {
        Ok(())
    }

    // INSERT / UPDATE / DELETE

    fn begin_insert_statement(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn end_insert_statement(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn begin_insert_value_list(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn end_insert_value_list(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn begin_update_statement(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn end_update_statement(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn begin_set_value_list(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn end_set_value_list(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn begin_delete_statement(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn end_delete_statement(&mut self) -> DynaResult<()> {
        Ok(())
    }

    /// Parenthesised list of column names (insert fields, key columns).
    fn begin_column_list(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn end_column_list(&mut self) -> DynaResult<()> {
        Ok(())
    }

    // DDL

    fn begin_create(
        &mut self,
        _object: SchemaObjectType,
        _owner: Option<&str>,
        _name: &str,
        _options: CreateOptions,
        _exist: ExistState,
    ) -> DynaResult<()> {
        Ok(())
    }

    fn end_create(&mut self, _object: SchemaObjectType) -> DynaResult<()> {
        Ok(())
    }

    /// Column and constraint definitions of a table.
    fn begin_definition_list(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn end_definition_list(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn write_column_data_type(
        &mut self,
        _db_type: DbType,
        _other_type: Option<&str>,
        _length: Option<u32>,
        _precision: Option<u32>,
        _flags: ColumnFlags,
    ) -> DynaResult<()> {
        Ok(())
    }

    fn write_column_flags(&mut self, _flags: ColumnFlags) -> DynaResult<()> {
        Ok(())
    }

    fn begin_column_default(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn end_column_default(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn begin_constraint(&mut self, _kind: ConstraintType, _name: Option<&str>) -> DynaResult<()> {
        Ok(())
    }

    fn end_constraint(&mut self, _kind: ConstraintType) -> DynaResult<()> {
        Ok(())
    }

    fn begin_references(&mut self, _owner: Option<&str>, _table: &str) -> DynaResult<()> {
        Ok(())
    }

    fn end_references(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn write_foreign_key_actions(
        &mut self,
        _on_delete: FkAction,
        _on_update: FkAction,
    ) -> DynaResult<()> {
        Ok(())
    }

    /// The table an index is created on.
    fn write_index_table(&mut self, _owner: Option<&str>, _table: &str) -> DynaResult<()> {
        Ok(())
    }

    /// The table of an index being dropped; dialects that do not need it
    /// write nothing.
    fn write_drop_index_table(&mut self, _owner: Option<&str>, _table: &str) -> DynaResult<()> {
        Ok(())
    }

    fn begin_view_definition(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn write_sequence_options(&mut self, _options: &SequenceOptions) -> DynaResult<()> {
        Ok(())
    }

    fn begin_procedure_parameters(&mut self, _count: usize) -> DynaResult<()> {
        Ok(())
    }

    fn write_parameter_declaration(&mut self, _param: &Param) -> DynaResult<()> {
        Ok(())
    }

    fn end_procedure_parameters(&mut self, _count: usize) -> DynaResult<()> {
        Ok(())
    }

    fn begin_procedure_body(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn end_procedure_body(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn begin_drop(
        &mut self,
        _object: SchemaObjectType,
        _owner: Option<&str>,
        _name: &str,
        _exist: ExistState,
    ) -> DynaResult<()> {
        Ok(())
    }

    fn end_drop(&mut self, _object: SchemaObjectType) -> DynaResult<()> {
        Ok(())
    }

    // Scripts

    fn begin_script(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn end_script(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn begin_script_block(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn end_script_block(&mut self) -> DynaResult<()> {
        Ok(())
    }

    /// Statement terminator.
    fn end_statement(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn write_declaration(&mut self, _param: &Param) -> DynaResult<()> {
        Ok(())
    }

    fn begin_set_statement(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn end_set_statement(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn begin_return_statement(&mut self, _has_value: bool) -> DynaResult<()> {
        Ok(())
    }

    fn end_return_statement(&mut self) -> DynaResult<()> {
        Ok(())
    }

    fn write_use(&mut self, _database: &str) -> DynaResult<()> {
        Ok(())
    }
}

/// Trait for rendering clauses to SQL text.
pub trait ToSql {
    /// Render with the default dialect.
    fn to_sql(&self) -> DynaResult<String> {
        self.to_sql_with_dialect(Dialect::default())
    }

    /// Render with a specific dialect.
    fn to_sql_with_dialect(&self, dialect: Dialect) -> DynaResult<String>;
}

impl<T: Clause + ?Sized> ToSql for T {
    fn to_sql_with_dialect(&self, dialect: Dialect) -> DynaResult<String> {
        let mut builder = SqlBuilder::new(dialect);
        self.build_statement(&mut builder)?;
        Ok(builder.finish())
    }
}

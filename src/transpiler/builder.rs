//! Text-producing statement builder.

use crate::ast::{
    AggregateFunction, ColumnFlags, ConstraintType, CreateOptions, DbType, ExistState, FkAction,
    FunctionKind, JoinType, Operator, Order, Param, QueryOption, SchemaObjectType, SequenceOptions,
    TableHint, Top, Value,
};
use crate::error::{DynaError, DynaResult};
use crate::transpiler::StatementBuilder;
use crate::transpiler::dialect::Dialect;
use crate::transpiler::traits::{ProcedureStyle, SqlGenerator, TopClause};

const INDENT: &str = "    ";

/// Renders statement events as SQL text for one [`Dialect`].
///
/// Compact output (the default) puts everything on one line; pretty output
/// starts each clause and each definition on its own indented line.
pub struct SqlBuilder {
    dialect: Dialect,
    generator: Box<dyn SqlGenerator>,
    sql: String,
    pretty: bool,
    depth: usize,
    parameters: Vec<Param>,
    procedure: ProcedureStyle,
}

impl SqlBuilder {
    pub fn new(dialect: Dialect) -> Self {
        let generator = dialect.generator();
        Self {
            dialect,
            procedure: generator.procedure_style(),
            generator,
            sql: String::new(),
            pretty: false,
            depth: 0,
            parameters: Vec::new(),
        }
    }

    /// Switch to multi-line output.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// SQL written so far.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Distinct parameters in first-use order.
    pub fn parameters(&self) -> &[Param] {
        &self.parameters
    }

    pub fn finish(self) -> String {
        self.sql
    }

    fn push(&mut self, text: &str) {
        self.sql.push_str(text);
    }

    fn unsupported(&self, feature: impl Into<String>) -> DynaError {
        DynaError::unsupported(feature, self.generator.name())
    }

    fn quote(&self, name: &str) -> String {
        if name == "*" {
            name.to_string()
        } else {
            self.generator.quote_identifier(name)
        }
    }

    fn qualified(&self, parts: &[Option<&str>]) -> String {
        parts
            .iter()
            .flatten()
            .filter(|p| !p.is_empty())
            .map(|p| self.quote(p))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn data_type(&self, db_type: DbType, length: Option<u32>, precision: Option<u32>) -> DynaResult<String> {
        self.generator
            .data_type(db_type, length, precision)
            .ok_or_else(|| self.unsupported(format!("data type {}", db_type)))
    }

    fn clause_break(&mut self, keyword: &str) -> DynaResult<()> {
        self.begin_new_line()?;
        self.push(keyword);
        Ok(())
    }

    fn object_keyword(object: SchemaObjectType) -> &'static str {
        match object {
            SchemaObjectType::Table => "TABLE",
            SchemaObjectType::View => "VIEW",
            SchemaObjectType::Index => "INDEX",
            SchemaObjectType::Sequence => "SEQUENCE",
            SchemaObjectType::StoredProcedure => "PROCEDURE",
        }
    }

    fn check_object(&self, object: SchemaObjectType) -> DynaResult<()> {
        match object {
            SchemaObjectType::Sequence if !self.generator.supports_sequences() => {
                Err(self.unsupported("sequences"))
            }
            SchemaObjectType::StoredProcedure if self.procedure == ProcedureStyle::Unsupported => {
                Err(self.unsupported("stored procedures"))
            }
            _ => Ok(()),
        }
    }

    fn fk_action(&mut self, keyword: &str, action: FkAction, on_update: bool) -> DynaResult<()> {
        if action == FkAction::Undefined {
            return Ok(());
        }
        let text = self
            .generator
            .fk_action(action, on_update)
            .ok_or_else(|| self.unsupported(format!("{} {}", keyword, action)))?;
        self.push(&format!(" {} {}", keyword, text));
        Ok(())
    }
}

impl StatementBuilder for SqlBuilder {
    fn write_raw(&mut self, text: &str) -> DynaResult<()> {
        self.push(text);
        Ok(())
    }

    fn mark(&self) -> usize {
        self.sql.len()
    }

    fn reset_to(&mut self, mark: usize) {
        self.sql.truncate(mark);
    }

    fn dialect_name(&self) -> &str {
        self.generator.name()
    }

    fn supports_multiple_statements(&self) -> bool {
        self.generator.supports_multiple_statements()
    }

    fn begin_new_line(&mut self) -> DynaResult<()> {
        if self.pretty {
            self.push("\n");
            for _ in 0..self.depth {
                self.push(INDENT);
            }
        } else {
            self.push(" ");
        }
        Ok(())
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn outdent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn begin_block(&mut self) -> DynaResult<()> {
        self.push("(");
        Ok(())
    }

    fn end_block(&mut self) -> DynaResult<()> {
        self.push(")");
        Ok(())
    }

    fn write_list_separator(&mut self, new_line: bool) -> DynaResult<()> {
        self.push(",");
        if new_line {
            self.begin_new_line()
        } else {
            self.push(" ");
            Ok(())
        }
    }

    fn append_reference_separator(&mut self) -> DynaResult<()> {
        self.push(".");
        Ok(())
    }

    fn write_operator(&mut self, op: Operator) -> DynaResult<()> {
        let symbol = self
            .generator
            .operator_symbol(op)
            .ok_or_else(|| self.unsupported(format!("operator {}", op)))?;
        if op.is_prefix() {
            self.push(&format!("{} ", symbol));
        } else {
            self.push(&format!(" {} ", symbol));
        }
        Ok(())
    }

    fn write_alias(&mut self, alias: &str) -> DynaResult<()> {
        if !alias.is_empty() {
            let quoted = self.quote(alias);
            self.push(&format!(" AS {}", quoted));
        }
        Ok(())
    }

    fn write_table_alias(&mut self, alias: &str) -> DynaResult<()> {
        if !alias.is_empty() {
            let text = format!("{}{}", self.generator.table_alias_keyword(), self.quote(alias));
            self.push(&text);
        }
        Ok(())
    }

    fn write_identifier(&mut self, name: &str) -> DynaResult<()> {
        let quoted = self.quote(name);
        self.push(&quoted);
        Ok(())
    }

    fn write_source_table(&mut self, owner: Option<&str>, name: &str, alias: Option<&str>) -> DynaResult<()> {
        let text = self.qualified(&[owner, Some(name)]);
        self.push(&text);
        if let Some(alias) = alias {
            self.write_table_alias(alias)?;
        }
        Ok(())
    }

    fn write_source_field(
        &mut self,
        owner: Option<&str>,
        table: Option<&str>,
        name: &str,
        alias: Option<&str>,
    ) -> DynaResult<()> {
        let text = self.qualified(&[owner, table, Some(name)]);
        self.push(&text);
        if let Some(alias) = alias {
            self.write_alias(alias)?;
        }
        Ok(())
    }

    fn write_all_fields(&mut self, owner: Option<&str>, table: Option<&str>) -> DynaResult<()> {
        let text = self.qualified(&[owner, table, Some("*")]);
        self.push(&text);
        Ok(())
    }

    fn write_literal(&mut self, db_type: DbType, value: &Value) -> DynaResult<()> {
        let text = match value {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => self.generator.bool_literal(*b),
            Value::Int(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::Decimal(d) => d.clone(),
            Value::String(s) => self.generator.string_literal(s, db_type),
            Value::DateTime(dt) => self.generator.datetime_literal(dt),
            Value::Guid(u) => self.generator.string_literal(&u.to_string(), DbType::AnsiString),
            Value::Binary(bytes) => self.generator.binary_literal(bytes),
        };
        self.push(&text);
        Ok(())
    }

    fn write_null(&mut self) -> DynaResult<()> {
        self.push("NULL");
        Ok(())
    }

    fn write_parameter(&mut self, param: &Param) -> DynaResult<()> {
        let index = match self.parameters.iter().position(|p| p.name() == param.name()) {
            Some(i) => i + 1,
            None => {
                self.parameters.push(param.clone());
                self.parameters.len()
            }
        };
        let text = self.generator.placeholder(index, param.name());
        self.push(&text);
        Ok(())
    }

    fn write_variable(&mut self, name: &str) -> DynaResult<()> {
        let text = self.generator.variable(name);
        self.push(&text);
        Ok(())
    }

    fn begin_aggregate_function(&mut self, func: AggregateFunction) -> DynaResult<()> {
        let name = match func {
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
        };
        self.push(name);
        Ok(())
    }

    fn begin_function(&mut self, func: &FunctionKind) -> DynaResult<()> {
        let name = self
            .generator
            .function_name(func)
            .ok_or_else(|| self.unsupported(format!("function {}", func)))?;
        self.push(&name);
        Ok(())
    }

    fn begin_function_parameter_list(&mut self) -> DynaResult<()> {
        self.push("(");
        Ok(())
    }

    fn end_function_parameter_list(&mut self) -> DynaResult<()> {
        self.push(")");
        Ok(())
    }

    fn begin_select_statement(&mut self) -> DynaResult<()> {
        self.push("SELECT");
        Ok(())
    }

    fn write_distinct(&mut self) -> DynaResult<()> {
        self.push(" DISTINCT");
        Ok(())
    }

    fn write_top_prefix(&mut self, top: &Top) -> DynaResult<()> {
        match self.generator.top_clause(top) {
            Some(TopClause::Prefix(text)) => {
                self.push(" ");
                self.push(&text);
                Ok(())
            }
            Some(TopClause::Suffix(_)) => Ok(()),
            None => Err(self.unsupported(format!("TOP {}", top.top_type()))),
        }
    }

    fn write_top_suffix(&mut self, top: &Top) -> DynaResult<()> {
        match self.generator.top_clause(top) {
            Some(TopClause::Suffix(text)) => {
                self.push(&text);
                Ok(())
            }
            Some(TopClause::Prefix(_)) => Ok(()),
            None => Err(self.unsupported(format!("TOP {}", top.top_type()))),
        }
    }

    fn begin_select_list(&mut self) -> DynaResult<()> {
        self.push(" ");
        Ok(())
    }

    fn begin_from_list(&mut self) -> DynaResult<()> {
        self.clause_break("FROM ")
    }

    fn begin_join(&mut self, join_type: JoinType) -> DynaResult<()> {
        let keyword = match join_type {
            JoinType::Join => "JOIN ",
            JoinType::InnerJoin => "INNER JOIN ",
            JoinType::LeftOuter => "LEFT OUTER JOIN ",
            JoinType::RightOuter => "RIGHT OUTER JOIN ",
            JoinType::FullOuter => "FULL OUTER JOIN ",
        };
        if join_type == JoinType::FullOuter && self.dialect == Dialect::MySQL {
            return Err(self.unsupported("FULL OUTER JOIN"));
        }
        self.clause_break(keyword)
    }

    fn begin_join_on_list(&mut self) -> DynaResult<()> {
        self.push(" ON ");
        Ok(())
    }

    fn begin_where(&mut self) -> DynaResult<()> {
        self.clause_break("WHERE ")
    }

    fn begin_group_by(&mut self) -> DynaResult<()> {
        self.clause_break("GROUP BY ")
    }

    fn begin_having(&mut self) -> DynaResult<()> {
        self.clause_break("HAVING ")
    }

    fn begin_order_statement(&mut self) -> DynaResult<()> {
        self.clause_break("ORDER BY ")
    }

    fn end_order_clause(&mut self, order: Order) -> DynaResult<()> {
        match order {
            Order::Ascending => self.push(" ASC"),
            Order::Descending => self.push(" DESC"),
            Order::Default => {}
        }
        Ok(())
    }

    fn begin_sub_statement(&mut self) -> DynaResult<()> {
        self.push("(");
        Ok(())
    }

    fn end_sub_statement(&mut self) -> DynaResult<()> {
        self.push(")");
        Ok(())
    }

    fn begin_table_hints(&mut self) -> DynaResult<()> {
        if !self.generator.supports_table_hints() {
            return Err(self.unsupported("table hints"));
        }
        self.push(" WITH (");
        Ok(())
    }

    fn write_table_hint(&mut self, hint: TableHint, options: &[String]) -> DynaResult<()> {
        let text = self
            .generator
            .table_hint(hint, options)
            .ok_or_else(|| self.unsupported(format!("table hint {}", hint)))?;
        self.push(&text);
        Ok(())
    }

    fn end_table_hints(&mut self) -> DynaResult<()> {
        self.push(")");
        Ok(())
    }

    fn begin_query_options(&mut self) -> DynaResult<()> {
        if !self.generator.supports_table_hints() {
            return Err(self.unsupported("query options"));
        }
        self.clause_break("OPTION (")
    }

    fn write_query_option(&mut self, option: QueryOption, value: Option<i64>) -> DynaResult<()> {
        let text = self
            .generator
            .query_option(option, value)
            .ok_or_else(|| self.unsupported(format!("query option {}", option)))?;
        self.push(&text);
        Ok(())
    }

    fn end_query_options(&mut self) -> DynaResult<()> {
        self.push(")");
        Ok(())
    }

    fn begin_insert_statement(&mut self) -> DynaResult<()> {
        self.push("INSERT INTO ");
        Ok(())
    }

    fn begin_insert_value_list(&mut self) -> DynaResult<()> {
        self.clause_break("VALUES (")
    }

    fn end_insert_value_list(&mut self) -> DynaResult<()> {
        self.push(")");
        Ok(())
    }

    fn begin_update_statement(&mut self) -> DynaResult<()> {
        self.push("UPDATE ");
        Ok(())
    }

    fn begin_set_value_list(&mut self) -> DynaResult<()> {
        self.clause_break("SET ")
    }

    fn begin_delete_statement(&mut self) -> DynaResult<()> {
        self.push("DELETE FROM ");
        Ok(())
    }

    fn begin_column_list(&mut self) -> DynaResult<()> {
        self.push(" (");
        Ok(())
    }

    fn end_column_list(&mut self) -> DynaResult<()> {
        self.push(")");
        Ok(())
    }

    fn begin_create(
        &mut self,
        object: SchemaObjectType,
        owner: Option<&str>,
        name: &str,
        options: CreateOptions,
        exist: ExistState,
    ) -> DynaResult<()> {
        self.check_object(object)?;
        self.push("CREATE ");
        if options.unique && object == SchemaObjectType::Index {
            self.push("UNIQUE ");
        }
        self.push(Self::object_keyword(object));
        self.push(" ");
        if exist == ExistState::NotExists {
            let guard = self.generator.create_guard(object).ok_or_else(|| {
                self.unsupported(format!("CREATE {} IF NOT EXISTS", Self::object_keyword(object)))
            })?;
            self.push(guard);
            self.push(" ");
        }
        let text = self.qualified(&[owner, Some(name)]);
        self.push(&text);
        Ok(())
    }

    fn begin_definition_list(&mut self) -> DynaResult<()> {
        self.push(" (");
        self.indent();
        if self.pretty {
            self.begin_new_line()?;
        }
        Ok(())
    }

    fn end_definition_list(&mut self) -> DynaResult<()> {
        self.outdent();
        if self.pretty {
            self.begin_new_line()?;
        }
        self.push(")");
        Ok(())
    }

    fn write_column_data_type(
        &mut self,
        db_type: DbType,
        other_type: Option<&str>,
        length: Option<u32>,
        precision: Option<u32>,
        _flags: ColumnFlags,
    ) -> DynaResult<()> {
        let text = match other_type {
            Some(other) if !other.is_empty() => other.to_string(),
            _ => self.data_type(db_type, length, precision)?,
        };
        self.push(" ");
        self.push(&text);
        Ok(())
    }

    fn write_column_flags(&mut self, flags: ColumnFlags) -> DynaResult<()> {
        if !flags.contains(ColumnFlags::NULLABLE) {
            self.push(" NOT NULL");
        }
        let identity = flags.contains(ColumnFlags::AUTO_ASSIGN);
        let primary_key = flags.contains(ColumnFlags::PRIMARY_KEY);
        let after_key = self.generator.identity_after_primary_key();
        if identity && after_key && !primary_key {
            return Err(self.unsupported(format!(
                "{} without PRIMARY KEY",
                self.generator.identity_clause()
            )));
        }
        if identity && !after_key {
            self.push(" ");
            self.push(self.generator.identity_clause());
        }
        if primary_key {
            self.push(" PRIMARY KEY");
        }
        if identity && after_key {
            self.push(" ");
            self.push(self.generator.identity_clause());
        }
        if flags.contains(ColumnFlags::UNIQUE) {
            self.push(" UNIQUE");
        }
        Ok(())
    }

    fn begin_column_default(&mut self) -> DynaResult<()> {
        self.push(" DEFAULT ");
        Ok(())
    }

    fn begin_constraint(&mut self, kind: ConstraintType, name: Option<&str>) -> DynaResult<()> {
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            let quoted = self.quote(name);
            self.push(&format!("CONSTRAINT {} ", quoted));
        }
        match kind {
            ConstraintType::PrimaryKey => self.push("PRIMARY KEY"),
            ConstraintType::ForeignKey => self.push("FOREIGN KEY"),
        }
        Ok(())
    }

    fn begin_references(&mut self, owner: Option<&str>, table: &str) -> DynaResult<()> {
        let text = self.qualified(&[owner, Some(table)]);
        self.push(&format!(" REFERENCES {}", text));
        Ok(())
    }

    fn write_foreign_key_actions(&mut self, on_delete: FkAction, on_update: FkAction) -> DynaResult<()> {
        self.fk_action("ON DELETE", on_delete, false)?;
        self.fk_action("ON UPDATE", on_update, true)
    }

    fn write_index_table(&mut self, owner: Option<&str>, table: &str) -> DynaResult<()> {
        let text = self.qualified(&[owner, Some(table)]);
        self.push(&format!(" ON {}", text));
        Ok(())
    }

    fn write_drop_index_table(&mut self, owner: Option<&str>, table: &str) -> DynaResult<()> {
        if self.generator.drop_index_needs_table() {
            self.write_index_table(owner, table)?;
        }
        Ok(())
    }

    fn begin_view_definition(&mut self) -> DynaResult<()> {
        self.push(" AS");
        self.begin_new_line()
    }

    fn write_sequence_options(&mut self, options: &SequenceOptions) -> DynaResult<()> {
        if let Some(start) = options.start {
            self.push(&format!(" START WITH {}", start));
        }
        if let Some(increment) = options.increment {
            self.push(&format!(" INCREMENT BY {}", increment));
        }
        if let Some(min) = options.min_value {
            self.push(&format!(" MINVALUE {}", min));
        }
        if let Some(max) = options.max_value {
            self.push(&format!(" MAXVALUE {}", max));
        }
        if options.cycle {
            self.push(" CYCLE");
        }
        if let Some(cache) = options.cache {
            self.push(&format!(" CACHE {}", cache));
        }
        Ok(())
    }

    fn begin_procedure_parameters(&mut self, count: usize) -> DynaResult<()> {
        match self.procedure {
            ProcedureStyle::TSql if count > 0 => self.push(" "),
            ProcedureStyle::PlSql if count > 0 => self.push(" ("),
            ProcedureStyle::MySql | ProcedureStyle::PlPgSql => self.push(" ("),
            _ => {}
        }
        Ok(())
    }

    fn write_parameter_declaration(&mut self, param: &Param) -> DynaResult<()> {
        let data_type = self.data_type(param.db_type(), param.size(), None)?;
        let text = self
            .generator
            .parameter_declaration(param.name(), &data_type, param.direction());
        self.push(&text);
        Ok(())
    }

    fn end_procedure_parameters(&mut self, count: usize) -> DynaResult<()> {
        match self.procedure {
            ProcedureStyle::PlSql if count > 0 => self.push(")"),
            ProcedureStyle::MySql | ProcedureStyle::PlPgSql => self.push(")"),
            _ => {}
        }
        Ok(())
    }

    fn begin_procedure_body(&mut self) -> DynaResult<()> {
        match self.procedure {
            ProcedureStyle::TSql | ProcedureStyle::PlSql => self.push(" AS BEGIN"),
            ProcedureStyle::MySql => self.push(" BEGIN"),
            ProcedureStyle::PlPgSql => self.push(" LANGUAGE plpgsql AS $$ BEGIN"),
            ProcedureStyle::Unsupported => return Err(self.unsupported("stored procedures")),
        }
        self.indent();
        self.begin_new_line()
    }

    fn end_procedure_body(&mut self) -> DynaResult<()> {
        self.outdent();
        self.begin_new_line()?;
        self.push("END");
        if self.procedure == ProcedureStyle::PlPgSql {
            self.push(" $$");
        }
        Ok(())
    }

    fn begin_drop(
        &mut self,
        object: SchemaObjectType,
        owner: Option<&str>,
        name: &str,
        exist: ExistState,
    ) -> DynaResult<()> {
        self.check_object(object)?;
        self.push("DROP ");
        self.push(Self::object_keyword(object));
        self.push(" ");
        if exist == ExistState::Exists {
            let guard = self.generator.drop_guard(object).ok_or_else(|| {
                self.unsupported(format!("DROP {} IF EXISTS", Self::object_keyword(object)))
            })?;
            self.push(guard);
            self.push(" ");
        }
        let text = self.qualified(&[owner, Some(name)]);
        self.push(&text);
        Ok(())
    }

    fn begin_script_block(&mut self) -> DynaResult<()> {
        self.push("BEGIN");
        self.indent();
        self.begin_new_line()
    }

    fn end_script_block(&mut self) -> DynaResult<()> {
        self.outdent();
        self.begin_new_line()?;
        self.push("END");
        Ok(())
    }

    fn end_statement(&mut self) -> DynaResult<()> {
        self.push(";");
        Ok(())
    }

    fn write_declaration(&mut self, param: &Param) -> DynaResult<()> {
        let data_type = self.data_type(param.db_type(), param.size(), None)?;
        let variable = self.generator.variable(param.name());
        self.push(&format!("DECLARE {} {}", variable, data_type));
        Ok(())
    }

    fn begin_set_statement(&mut self) -> DynaResult<()> {
        self.push("SET ");
        Ok(())
    }

    fn begin_return_statement(&mut self, has_value: bool) -> DynaResult<()> {
        self.push(if has_value { "RETURN " } else { "RETURN" });
        Ok(())
    }

    fn write_use(&mut self, database: &str) -> DynaResult<()> {
        let text = self
            .generator
            .use_database(database)
            .ok_or_else(|| self.unsupported("USE"))?;
        self.push(&text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_and_reset() {
        let mut builder = SqlBuilder::new(Dialect::Postgres);
        builder.write_raw("SELECT 1").unwrap();
        let mark = builder.mark();
        builder.write_list_separator(false).unwrap();
        builder.reset_to(mark);
        assert_eq!(builder.finish(), "SELECT 1");
    }

    #[test]
    fn test_parameters_are_distinct() {
        let mut builder = SqlBuilder::new(Dialect::Postgres);
        let id = Param::new("id", DbType::Int32);
        let name = Param::new("name", DbType::String);
        builder.write_parameter(&id).unwrap();
        builder.write_parameter(&name).unwrap();
        builder.write_parameter(&id).unwrap();
        assert_eq!(builder.sql(), "$1$2$1");
        assert_eq!(builder.parameters().len(), 2);
    }

    #[test]
    fn test_pretty_new_line() {
        let mut builder = SqlBuilder::new(Dialect::Postgres).pretty(true);
        builder.write_raw("SELECT *").unwrap();
        builder.begin_from_list().unwrap();
        builder.write_raw("t").unwrap();
        assert_eq!(builder.finish(), "SELECT *\nFROM t");
    }
}

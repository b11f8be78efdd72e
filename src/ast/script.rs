//! Statement sequences and the script-only statements.

use super::clause::{BoxedClause, Clause, read_slot, read_typed, read_typed_slot, write_slot};
use super::operators::Operator;
use super::params::Param;
use crate::error::{DynaError, DynaResult};
use crate::transpiler::StatementBuilder;
use crate::xml::{XmlContext, XmlElement, XmlFactory, XmlReader, XmlWriter, read_child_elements};

const BLOCK_ELEMENT: &str = "Block";

#[derive(Debug)]
enum ScriptItem {
    Statement(BoxedClause),
    /// Index into `Script::blocks`.
    Block(usize),
}

/// An ordered sequence of statements with nested BEGIN ... END blocks.
///
/// Nested blocks are opened and closed in LIFO order. [`then`](Script::then)
/// appends to the innermost open block, or to the top level when no block is
/// open:
///
/// ```
/// use dynasql::ast::{Script, Select};
///
/// let script = Script::new()
///     .then(Select::new().field("a").from("t"))
///     .begin()
///     .then(Select::new().field("b").from("t"))
///     .end()
///     .unwrap();
/// assert_eq!(script.len(), 2);
/// assert_eq!(script.open_depth(), 0);
/// ```
#[derive(Debug, Default)]
pub struct Script {
    root: Vec<ScriptItem>,
    blocks: Vec<Vec<ScriptItem>>,
    open: Vec<usize>,
}

impl Script {
    pub const ELEMENT: &'static str = "Script";

    pub fn new() -> Self {
        Self::default()
    }

    /// Append a statement to the innermost open block.
    pub fn then(mut self, statement: impl Clause + 'static) -> Self {
        self.push(Box::new(statement));
        self
    }

    pub fn push(&mut self, statement: BoxedClause) {
        self.current().push(ScriptItem::Statement(statement));
    }

    /// Open a nested block inside the innermost open block.
    pub fn begin(mut self) -> Self {
        let id = self.blocks.len();
        self.blocks.push(Vec::new());
        self.current().push(ScriptItem::Block(id));
        self.open.push(id);
        self
    }

    /// Close the innermost open block.
    pub fn end(mut self) -> DynaResult<Self> {
        self.open.pop().ok_or(DynaError::NoOpenBlock)?;
        Ok(self)
    }

    pub fn declare(self, variable: Param) -> Self {
        self.then(Declare::new(variable))
    }

    pub fn set(self, variable: Param, value: impl Clause + 'static) -> Self {
        self.then(Set::new(variable, value))
    }

    pub fn return_value(self, value: impl Clause + 'static) -> Self {
        self.then(Return::value(value))
    }

    pub fn return_nothing(self) -> Self {
        self.then(Return::nothing())
    }

    pub fn use_database(self, database: impl Into<String>) -> Self {
        self.then(Use::new(database))
    }

    /// Number of top-level items; a nested block counts as one.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Number of blocks still open.
    pub fn open_depth(&self) -> usize {
        self.open.len()
    }

    fn current(&mut self) -> &mut Vec<ScriptItem> {
        match self.open.last() {
            Some(&id) => &mut self.blocks[id],
            None => &mut self.root,
        }
    }

    /// Render the statements without the script markers, as the body of a
    /// procedure.
    pub(crate) fn build_body(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        self.build_items(&self.root, builder)
    }

    fn build_items(&self, items: &[ScriptItem], builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        let mut rendered_any = false;
        for item in items {
            let mark = builder.mark();
            if rendered_any {
                builder.begin_new_line()?;
            }
            let rendered = match item {
                ScriptItem::Statement(statement) => statement.build_statement(builder)?,
                ScriptItem::Block(id) => {
                    builder.begin_script_block()?;
                    self.build_items(&self.blocks[*id], builder)?;
                    builder.end_script_block()?;
                    true
                }
            };
            if rendered {
                builder.end_statement()?;
                rendered_any = true;
            } else {
                builder.reset_to(mark);
            }
        }
        Ok(rendered_any)
    }

    fn write_items(&self, items: &[ScriptItem], writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        for item in items {
            match item {
                ScriptItem::Statement(statement) => statement.write_xml(writer, ctx)?,
                ScriptItem::Block(id) => {
                    writer.begin_element(ctx, BLOCK_ELEMENT)?;
                    self.write_items(&self.blocks[*id], writer, ctx)?;
                    writer.end_element()?;
                }
            }
        }
        Ok(())
    }

    fn read_block(
        &mut self,
        element: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<ScriptItem> {
        let id = self.blocks.len();
        self.blocks.push(Vec::new());
        read_child_elements(element, reader, ctx, |child, reader, ctx| {
            let item = self.read_item(child, reader, ctx)?;
            if let Some(item) = item {
                self.blocks[id].push(item);
            }
            Ok(true)
        })?;
        Ok(ScriptItem::Block(id))
    }

    fn read_item(
        &mut self,
        element: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<Option<ScriptItem>> {
        if element.name == BLOCK_ELEMENT {
            return self.read_block(element, reader, ctx).map(Some);
        }
        Ok(XmlFactory::read(element, reader, ctx)?.map(ScriptItem::Statement))
    }
}

impl Clause for Script {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn is_statement(&self) -> bool {
        true
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        if self.root.is_empty() {
            return Ok(false);
        }
        if self.root.len() > 1 && !builder.supports_multiple_statements() {
            return Err(DynaError::unsupported(
                "scripts with more than one statement",
                builder.dialect_name(),
            ));
        }
        builder.begin_script()?;
        self.build_items(&self.root, builder)?;
        builder.end_script()?;
        Ok(true)
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        self.write_items(&self.root, writer, ctx)
    }

    fn read_an_inner_element(
        &mut self,
        element: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<bool> {
        if let Some(item) = self.read_item(element, reader, ctx)? {
            self.root.push(item);
        }
        Ok(true)
    }
}

/// `DECLARE variable type`
#[derive(Debug, Default)]
pub struct Declare {
    variable: Option<Param>,
}

impl Declare {
    pub const ELEMENT: &'static str = "Declare";

    pub fn new(variable: Param) -> Self {
        Self {
            variable: Some(variable),
        }
    }
}

impl Clause for Declare {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn is_statement(&self) -> bool {
        true
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        let variable = self
            .variable
            .as_ref()
            .ok_or_else(|| DynaError::missing("Declare", "variable"))?;
        builder.write_declaration(variable)?;
        Ok(true)
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        match &self.variable {
            Some(variable) => variable.write_xml(writer, ctx),
            None => Ok(()),
        }
    }

    fn read_an_inner_element(
        &mut self,
        element: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<bool> {
        if let Some(variable) = read_typed::<Param>(element, reader, ctx)? {
            self.variable = Some(variable);
        }
        Ok(true)
    }
}

/// `SET variable = value`
#[derive(Debug, Default)]
pub struct Set {
    variable: Option<Param>,
    value: Option<BoxedClause>,
}

impl Set {
    pub const ELEMENT: &'static str = "Set";

    pub fn new(variable: Param, value: impl Clause + 'static) -> Self {
        Self {
            variable: Some(variable),
            value: Some(Box::new(value)),
        }
    }
}

impl Clause for Set {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn is_statement(&self) -> bool {
        true
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        let variable = self.variable.as_ref().ok_or_else(|| DynaError::missing("Set", "variable"))?;
        let value = self.value.as_ref().ok_or_else(|| DynaError::missing("Set", "value"))?;
        builder.begin_set_statement()?;
        builder.write_variable(variable.name())?;
        builder.write_operator(Operator::Assign)?;
        value.build_statement(builder)?;
        builder.end_set_statement()?;
        Ok(true)
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        write_slot(writer, ctx, "Variable", self.variable.as_ref().map(|v| v as &dyn Clause))?;
        write_slot(writer, ctx, "Value", self.value.as_deref())
    }

    fn read_an_inner_element(
        &mut self,
        element: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<bool> {
        match element.name.as_str() {
            "Variable" => self.variable = read_typed_slot::<Param>(element, reader, ctx)?,
            "Value" => self.value = read_slot(element, reader, ctx)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// `RETURN [value]`
#[derive(Debug, Default)]
pub struct Return {
    value: Option<BoxedClause>,
}

impl Return {
    pub const ELEMENT: &'static str = "Return";

    pub fn value(value: impl Clause + 'static) -> Self {
        Self {
            value: Some(Box::new(value)),
        }
    }

    pub fn nothing() -> Self {
        Self::default()
    }
}

impl Clause for Return {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn is_statement(&self) -> bool {
        true
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        builder.begin_return_statement(self.value.is_some())?;
        if let Some(value) = &self.value {
            value.build_statement(builder)?;
        }
        builder.end_return_statement()?;
        Ok(true)
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        write_slot(writer, ctx, "Value", self.value.as_deref())
    }

    fn read_an_inner_element(
        &mut self,
        element: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<bool> {
        if element.name == "Value" {
            self.value = read_slot(element, reader, ctx)?;
            return Ok(true);
        }
        Ok(false)
    }
}

/// `USE database`
#[derive(Debug, Default)]
pub struct Use {
    database: String,
}

impl Use {
    pub const ELEMENT: &'static str = "Use";

    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
        }
    }

    pub fn database(&self) -> &str {
        &self.database
    }
}

impl Clause for Use {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn is_statement(&self) -> bool {
        true
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        if self.database.is_empty() {
            return Err(DynaError::missing("Use", "database"));
        }
        builder.write_use(&self.database)?;
        Ok(true)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        writer.write_attribute(ctx, "Database", &self.database)
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        if name == "Database" {
            self.database = value.to_string();
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Const, DbType, Select};
    use crate::transpiler::{Dialect, SqlBuilder, ToSql};
    use crate::xml::{from_xml, to_xml};
    use pretty_assertions::assert_eq;

    fn select(column: &str) -> Select {
        Select::new().field(column).from("t")
    }

    #[test]
    fn test_then_appends_to_innermost_block() {
        let script = Script::new()
            .then(select("a"))
            .begin()
            .then(select("b"))
            .begin()
            .then(select("c"))
            .end()
            .unwrap()
            .then(select("d"))
            .end()
            .unwrap()
            .then(select("e"));
        assert_eq!(script.len(), 3);
        assert_eq!(
            script.to_sql_with_dialect(Dialect::SqlServer).unwrap(),
            "SELECT [a] FROM [t]; BEGIN SELECT [b] FROM [t]; BEGIN SELECT [c] FROM [t]; END; \
             SELECT [d] FROM [t]; END; SELECT [e] FROM [t];"
        );
    }

    #[test]
    fn test_three_levels_close_in_reverse_order() {
        let script = Script::new()
            .begin()
            .then(select("a"))
            .begin()
            .begin()
            .then(select("b"))
            .end()
            .unwrap()
            .then(select("c"))
            .end()
            .unwrap()
            .then(select("d"));
        assert_eq!(script.open_depth(), 1);
        let script = script.end().unwrap();
        assert_eq!(script.open_depth(), 0);
        assert_eq!(
            script.to_sql_with_dialect(Dialect::SqlServer).unwrap(),
            "BEGIN SELECT [a] FROM [t]; BEGIN BEGIN SELECT [b] FROM [t]; END; \
             SELECT [c] FROM [t]; END; SELECT [d] FROM [t]; END;"
        );
    }

    #[test]
    fn test_end_without_open_block() {
        assert!(matches!(Script::new().end(), Err(DynaError::NoOpenBlock)));
        let script = Script::new().begin();
        assert_eq!(script.open_depth(), 1);
        let script = script.end().unwrap();
        assert!(matches!(script.end(), Err(DynaError::NoOpenBlock)));
    }

    #[test]
    fn test_empty_script_renders_nothing() {
        let mut builder = SqlBuilder::new(Dialect::Postgres);
        assert!(!Script::new().build_statement(&mut builder).unwrap());
        assert_eq!(builder.finish(), "");
    }

    #[test]
    fn test_multiple_statements_need_support() {
        let script = Script::new().then(select("a")).then(select("b"));
        assert!(matches!(
            script.to_sql_with_dialect(Dialect::MySQL),
            Err(DynaError::Unsupported { .. })
        ));
        let single = Script::new().then(select("a"));
        assert_eq!(single.to_sql_with_dialect(Dialect::MySQL).unwrap(), "SELECT `a` FROM `t`;");
    }

    #[test]
    fn test_script_statements() {
        let count = Param::new("count", DbType::Int32);
        let script = Script::new()
            .use_database("shop")
            .declare(count.clone())
            .set(count.clone(), Const::from(0))
            .return_value(count);
        assert_eq!(
            script.to_sql_with_dialect(Dialect::SqlServer).unwrap(),
            "USE [shop]; DECLARE @count INT; SET @count = 0; RETURN @count;"
        );
        assert_eq!(Script::new().return_nothing().to_sql().unwrap(), "RETURN;");
    }

    #[test]
    fn test_nested_blocks_xml_round_trip() {
        let script = Script::new()
            .then(select("a"))
            .begin()
            .then(select("b"))
            .end()
            .unwrap();
        let mut ctx = XmlContext::default();
        let xml = to_xml(&script, &mut ctx).unwrap();
        assert!(xml.contains("<Block>"));
        let read = from_xml(&xml, &mut XmlContext::default()).unwrap().unwrap();
        assert_eq!(read.to_sql().unwrap(), script.to_sql().unwrap());
    }
}

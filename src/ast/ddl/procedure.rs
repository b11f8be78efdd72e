use super::super::clause::{Clause, non_empty, read_typed};
use super::super::operators::{ExistState, SchemaObjectType};
use super::super::params::Param;
use super::super::script::Script;
use super::{CreateOptions, ObjectName};
use crate::error::{DynaError, DynaResult};
use crate::transpiler::StatementBuilder;
use crate::xml::{XmlContext, XmlElement, XmlReader, XmlWriter, read_child_elements};

/// `CREATE PROCEDURE name (parameters) AS BEGIN body END`
///
/// The parameter and body syntax is the dialect's: T-SQL, PL/SQL, MySQL
/// and PL/pgSQL procedures are supported, SQLite has none.
#[derive(Debug, Default)]
pub struct CreateProcedure {
    object: ObjectName,
    parameters: Vec<Param>,
    body: Script,
}

impl CreateProcedure {
    pub const ELEMENT: &'static str = "CreateProcedure";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            object: ObjectName::new(name),
            ..Self::default()
        }
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.object.owner = non_empty(&owner.into());
        self
    }

    pub fn parameter(mut self, param: Param) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn body(mut self, body: Script) -> Self {
        self.body = body;
        self
    }

    pub fn name(&self) -> &str {
        &self.object.name
    }

    pub fn parameters(&self) -> &[Param] {
        &self.parameters
    }
}

impl Clause for CreateProcedure {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn is_statement(&self) -> bool {
        true
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        let name = self.object.require("CreateProcedure")?;
        if self.body.is_empty() {
            return Err(DynaError::missing("CreateProcedure", "body"));
        }
        builder.begin_create(
            SchemaObjectType::StoredProcedure,
            self.object.owner(),
            name,
            CreateOptions::default(),
            ExistState::Unknown,
        )?;
        builder.begin_procedure_parameters(self.parameters.len())?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                builder.write_list_separator(false)?;
            }
            builder.write_parameter_declaration(param)?;
        }
        builder.end_procedure_parameters(self.parameters.len())?;
        builder.begin_procedure_body()?;
        self.body.build_body(builder)?;
        builder.end_procedure_body()?;
        builder.end_create(SchemaObjectType::StoredProcedure)?;
        Ok(true)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        self.object.write_attributes(writer, ctx)
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        if !self.parameters.is_empty() {
            writer.begin_element(ctx, "Parameters")?;
            for param in &self.parameters {
                param.write_xml(writer, ctx)?;
            }
            writer.end_element()?;
        }
        if !self.body.is_empty() {
            writer.begin_element(ctx, "Body")?;
            self.body.write_xml(writer, ctx)?;
            writer.end_element()?;
        }
        Ok(())
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        self.object.read_attribute(name, value)
    }

    fn read_an_inner_element(
        &mut self,
        element: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<bool> {
        match element.name.as_str() {
            "Parameters" => read_child_elements(element, reader, ctx, |child, reader, ctx| {
                if let Some(param) = read_typed::<Param>(child, reader, ctx)? {
                    self.parameters.push(param);
                }
                Ok(true)
            })?,
            "Body" => read_child_elements(element, reader, ctx, |child, reader, ctx| {
                if let Some(body) = read_typed::<Script>(child, reader, ctx)? {
                    self.body = body;
                }
                Ok(true)
            })?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Compare, Comparison, DbType, Delete, Field, ParameterDirection};
    use crate::transpiler::{Dialect, ToSql};

    fn purge() -> CreateProcedure {
        let id = Param::new("id", DbType::Int32);
        CreateProcedure::new("purge_user")
            .parameter(id.clone())
            .body(Script::new().then(
                Delete::table("users").and_where(Comparison::new(Field::new("id"), Compare::Equals, id)),
            ))
    }

    #[test]
    fn test_procedure_per_dialect() {
        assert_eq!(
            purge().to_sql_with_dialect(Dialect::SqlServer).unwrap(),
            "CREATE PROCEDURE [purge_user] @id INT AS BEGIN DELETE FROM [users] WHERE ([id] = @id); END"
        );
        assert!(
            purge()
                .to_sql_with_dialect(Dialect::MySQL)
                .unwrap()
                .starts_with("CREATE PROCEDURE `purge_user` (IN id INT) BEGIN DELETE FROM `users`")
        );
        assert!(matches!(
            purge().to_sql_with_dialect(Dialect::SQLite),
            Err(DynaError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_output_parameter() {
        let total = Param::new("total", DbType::Int64).with_direction(ParameterDirection::Output);
        let procedure = CreateProcedure::new("count_users")
            .parameter(total.clone())
            .body(Script::new().set(total, crate::ast::Aggregate::count_all()));
        let sql = procedure.to_sql_with_dialect(Dialect::SqlServer).unwrap();
        assert!(sql.starts_with("CREATE PROCEDURE [count_users] @total BIGINT OUTPUT AS BEGIN"));
    }

    #[test]
    fn test_procedure_needs_body() {
        assert!(matches!(
            CreateProcedure::new("p").to_sql_with_dialect(Dialect::SqlServer),
            Err(DynaError::MissingClause { part: "body", .. })
        ));
    }
}

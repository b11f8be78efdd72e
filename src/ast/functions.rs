//! Aggregate and scalar function calls.

use std::fmt;

use super::clause::{BoxedClause, Clause, build_optional, non_empty, read_value};
use super::fields::AllFields;
use super::list::ClauseList;
use super::operators::AggregateFunction;
use crate::error::{DynaError, DynaResult};
use crate::transpiler::StatementBuilder;
use crate::xml::{XmlContext, XmlElement, XmlReader, XmlWriter};

/// `COUNT(x)`, `SUM(x)`, ...
#[derive(Debug)]
pub struct Aggregate {
    function: AggregateFunction,
    inner: Option<BoxedClause>,
    alias: Option<String>,
}

impl Default for Aggregate {
    fn default() -> Self {
        Self {
            function: AggregateFunction::Count,
            inner: None,
            alias: None,
        }
    }
}

impl Aggregate {
    pub const ELEMENT: &'static str = "Aggregate";

    pub fn new(function: AggregateFunction, inner: impl Clause + 'static) -> Self {
        Self {
            function,
            inner: Some(Box::new(inner)),
            alias: None,
        }
    }

    /// `COUNT(*)`
    pub fn count_all() -> Self {
        Self::new(AggregateFunction::Count, AllFields::new())
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = non_empty(&alias.into());
        self
    }

    pub fn function(&self) -> AggregateFunction {
        self.function
    }
}

impl Clause for Aggregate {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        builder.begin_aggregate_function(self.function)?;
        builder.begin_function_parameter_list()?;
        build_optional(self.inner.as_deref(), builder)?;
        builder.end_function_parameter_list()?;
        builder.end_aggregate_function(self.function)?;
        if let Some(alias) = &self.alias {
            builder.write_alias(alias)?;
        }
        Ok(true)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        writer.write_attribute(ctx, "Function", self.function.as_str())?;
        writer.write_optional_attribute(ctx, "Alias", self.alias.as_deref())
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        match &self.inner {
            Some(inner) => inner.write_xml(writer, ctx),
            None => Ok(()),
        }
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        match name {
            "Function" => self.function = value.parse()?,
            "Alias" => self.alias = non_empty(value),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn read_an_inner_element(
        &mut self,
        element: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<bool> {
        if let Some(inner) = read_value(element, reader, ctx)? {
            self.inner = Some(inner);
        }
        Ok(true)
    }
}

/// Provider-independent scalar functions. Dialects map each one to their
/// own spelling; [`FunctionKind::Custom`] is written as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    /// Current local date and time.
    GetDate,
    /// Current UTC date and time.
    GetUtcDate,
    /// Identity generated by the last insert.
    LastId,
    /// First argument, or the second when the first is NULL.
    IsNull,
    Upper,
    Lower,
    Length,
    Round,
    Custom(String),
}

impl FunctionKind {
    const NAMED: [(FunctionKind, &'static str); 8] = [
        (FunctionKind::GetDate, "GetDate"),
        (FunctionKind::GetUtcDate, "GetUtcDate"),
        (FunctionKind::LastId, "LastId"),
        (FunctionKind::IsNull, "IsNull"),
        (FunctionKind::Upper, "Upper"),
        (FunctionKind::Lower, "Lower"),
        (FunctionKind::Length, "Length"),
        (FunctionKind::Round, "Round"),
    ];

    /// Functions written without an argument list.
    pub fn is_niladic(&self) -> bool {
        matches!(self, FunctionKind::GetDate | FunctionKind::GetUtcDate | FunctionKind::LastId)
    }

    pub fn as_str(&self) -> &str {
        match self {
            FunctionKind::Custom(name) => name,
            known => Self::NAMED
                .iter()
                .find(|(kind, _)| kind == known)
                .map(|(_, name)| *name)
                .unwrap_or_default(),
        }
    }

    /// The kind for an XML name; unknown names are custom functions.
    pub fn from_name(name: &str) -> Self {
        Self::NAMED
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(kind, _)| kind.clone())
            .unwrap_or_else(|| FunctionKind::Custom(name.to_string()))
    }
}

impl Default for FunctionKind {
    fn default() -> Self {
        FunctionKind::Custom(String::new())
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scalar function call.
#[derive(Debug, Default)]
pub struct Function {
    kind: FunctionKind,
    parameters: ClauseList,
    alias: Option<String>,
}

impl Function {
    pub const ELEMENT: &'static str = "Function";

    pub fn new(kind: FunctionKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// A function the dialects do not know, written verbatim.
    pub fn custom(name: impl Into<String>) -> Self {
        Self::new(FunctionKind::Custom(name.into()))
    }

    pub fn arg(mut self, argument: impl Clause + 'static) -> Self {
        self.parameters.push(Box::new(argument));
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = non_empty(&alias.into());
        self
    }

    pub fn kind(&self) -> &FunctionKind {
        &self.kind
    }
}

impl Clause for Function {
    fn xml_element_name(&self) -> &'static str {
        Self::ELEMENT
    }

    fn build_statement(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        if self.kind.as_str().is_empty() {
            return Err(DynaError::missing("Function", "name"));
        }
        builder.begin_function(&self.kind)?;
        if !self.kind.is_niladic() {
            builder.begin_function_parameter_list()?;
            self.parameters.build_list(builder, false, false)?;
            builder.end_function_parameter_list()?;
        }
        builder.end_function(&self.kind)?;
        if let Some(alias) = &self.alias {
            builder.write_alias(alias)?;
        }
        Ok(true)
    }

    fn write_all_attributes(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        writer.write_attribute(ctx, "Name", self.kind.as_str())?;
        writer.write_optional_attribute(ctx, "Alias", self.alias.as_deref())
    }

    fn write_inner_elements(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        self.parameters.write_xml_list(writer, ctx, "Parameters")
    }

    fn read_an_attribute(&mut self, name: &str, value: &str, _ctx: &mut XmlContext) -> DynaResult<bool> {
        match name {
            "Name" => self.kind = FunctionKind::from_name(value),
            "Alias" => self.alias = non_empty(value),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn read_an_inner_element(
        &mut self,
        element: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<bool> {
        if element.name == "Parameters" {
            self.parameters.read_list_items(element, reader, ctx)?;
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Const, Field};
    use crate::transpiler::{Dialect, ToSql};
    use crate::xml::from_xml;

    #[test]
    fn test_count_all() {
        assert_eq!(Aggregate::count_all().alias("n").to_sql().unwrap(), "COUNT(*) AS \"n\"");
        assert_eq!(
            Aggregate::new(AggregateFunction::Max, Field::new("age")).to_sql().unwrap(),
            "MAX(\"age\")"
        );
    }

    #[test]
    fn test_aggregate_without_argument() {
        assert_eq!(Aggregate::default().to_sql().unwrap(), "COUNT()");

        let mut ctx = XmlContext::default();
        let read = from_xml(r#"<Aggregate Function="Sum"/>"#, &mut ctx).unwrap().unwrap();
        assert_eq!(read.to_sql().unwrap(), "SUM()");
    }

    #[test]
    fn test_function_names_per_dialect() {
        let now = Function::new(FunctionKind::GetDate);
        assert_eq!(now.to_sql().unwrap(), "NOW()");
        assert_eq!(now.to_sql_with_dialect(Dialect::SqlServer).unwrap(), "GETDATE()");

        let fallback = Function::new(FunctionKind::IsNull)
            .arg(Field::new("nick"))
            .arg(Const::from("anon"));
        assert_eq!(fallback.to_sql().unwrap(), "COALESCE(\"nick\", 'anon')");
        assert_eq!(
            fallback.to_sql_with_dialect(Dialect::MySQL).unwrap(),
            "IFNULL(`nick`, 'anon')"
        );
    }

    #[test]
    fn test_custom_function() {
        let f = Function::custom("md5").arg(Field::new("x"));
        assert_eq!(f.to_sql().unwrap(), "md5(\"x\")");
        assert!(Function::default().to_sql().is_err());
        assert_eq!(FunctionKind::from_name("Upper"), FunctionKind::Upper);
        assert_eq!(FunctionKind::from_name("md5"), FunctionKind::Custom("md5".into()));
    }

    #[test]
    fn test_oracle_has_no_last_id() {
        assert!(Function::new(FunctionKind::LastId).to_sql_with_dialect(Dialect::Oracle).is_err());
    }
}

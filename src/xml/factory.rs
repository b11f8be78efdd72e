use std::collections::HashMap;

use tracing::{debug, trace};

use super::{XmlContext, XmlElement, XmlReader, read_clause};
use crate::ast::*;
use crate::error::DynaResult;

/// Creates an empty clause ready to read its XML form.
pub type ClauseConstructor = fn() -> Box<dyn Clause>;

/// Registry from element name to clause constructor.
#[derive(Debug, Clone, Default)]
pub struct XmlFactory {
    constructors: HashMap<String, ClauseConstructor>,
}

impl XmlFactory {
    /// A factory with no registrations.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A factory that knows every built-in clause.
    pub fn with_defaults() -> Self {
        let mut factory = Self::empty();
        let defaults: &[(&str, ClauseConstructor)] = &[
            (Field::ELEMENT, || Box::new(Field::default())),
            (AllFields::ELEMENT, || Box::new(AllFields::default())),
            (Table::ELEMENT, || Box::new(Table::default())),
            (Const::ELEMENT, || Box::new(Const::default())),
            (Param::ELEMENT, || Box::new(Param::default())),
            (Calc::ELEMENT, || Box::new(Calc::default())),
            (BooleanExpr::ELEMENT, || Box::new(BooleanExpr::default())),
            (Comparison::ELEMENT, || Box::new(Comparison::default())),
            (Not::ELEMENT, || Box::new(Not::default())),
            (Between::ELEMENT, || Box::new(Between::default())),
            (In::ELEMENT, || Box::new(In::default())),
            (Exists::ELEMENT, || Box::new(Exists::default())),
            (Aggregate::ELEMENT, || Box::new(Aggregate::default())),
            (Function::ELEMENT, || Box::new(Function::default())),
            (Assign::ELEMENT, || Box::new(Assign::default())),
            (OrderBy::ELEMENT, || Box::new(OrderBy::default())),
            (Join::ELEMENT, || Box::new(Join::default())),
            (SubQuery::ELEMENT, || Box::new(SubQuery::default())),
            (Select::ELEMENT, || Box::new(Select::default())),
            (Insert::ELEMENT, || Box::new(Insert::default())),
            (Update::ELEMENT, || Box::new(Update::default())),
            (Delete::ELEMENT, || Box::new(Delete::default())),
            (Column::ELEMENT, || Box::new(Column::default())),
            (IndexColumn::ELEMENT, || Box::new(IndexColumn::default())),
            (PrimaryKey::ELEMENT, || Box::new(PrimaryKey::default())),
            (ForeignKey::ELEMENT, || Box::new(ForeignKey::default())),
            (CreateTable::ELEMENT, || Box::new(CreateTable::default())),
            (CreateView::ELEMENT, || Box::new(CreateView::default())),
            (CreateIndex::ELEMENT, || Box::new(CreateIndex::default())),
            (CreateSequence::ELEMENT, || Box::new(CreateSequence::default())),
            (CreateProcedure::ELEMENT, || Box::new(CreateProcedure::default())),
            ("DropTable", || Box::new(DropStatement::empty(SchemaObjectType::Table))),
            ("DropView", || Box::new(DropStatement::empty(SchemaObjectType::View))),
            ("DropIndex", || Box::new(DropStatement::empty(SchemaObjectType::Index))),
            ("DropSequence", || Box::new(DropStatement::empty(SchemaObjectType::Sequence))),
            ("DropProcedure", || Box::new(DropStatement::empty(SchemaObjectType::StoredProcedure))),
            (Script::ELEMENT, || Box::new(Script::default())),
            (Declare::ELEMENT, || Box::new(Declare::default())),
            (Set::ELEMENT, || Box::new(Set::default())),
            (Return::ELEMENT, || Box::new(Return::default())),
            (Use::ELEMENT, || Box::new(Use::default())),
        ];
        for (name, constructor) in defaults {
            factory.register(*name, *constructor);
        }
        factory
    }

    /// Register a constructor for an element name, returning the one it
    /// replaces.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        constructor: ClauseConstructor,
    ) -> Option<ClauseConstructor> {
        self.constructors.insert(name.into(), constructor)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// An empty clause for the element name, if registered.
    pub fn create(&self, name: &str) -> Option<Box<dyn Clause>> {
        self.constructors.get(name).map(|constructor| constructor())
    }

    /// Element names known to this factory, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve `element` through the context's factory and read it. Unknown
    /// elements are skipped and yield `None`.
    pub fn read(
        element: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<Option<Box<dyn Clause>>> {
        match ctx.factory().create(&element.name) {
            Some(mut clause) => {
                trace!(element = %element.name, "resolved XML element");
                read_clause(clause.as_mut(), element, reader, ctx)?;
                Ok(Some(clause))
            }
            None => {
                debug!(element = %element.name, "no clause registered for XML element");
                reader.skip_element(element)?;
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_drop_kinds() {
        let factory = XmlFactory::with_defaults();
        for name in ["DropTable", "DropView", "DropIndex", "DropSequence", "DropProcedure"] {
            let clause = factory.create(name).unwrap();
            assert_eq!(clause.xml_element_name(), name);
        }
    }

    #[test]
    fn test_every_default_names_itself() {
        let factory = XmlFactory::with_defaults();
        for name in factory.names() {
            assert_eq!(factory.create(name).unwrap().xml_element_name(), name);
        }
    }

    #[test]
    fn test_register_replaces() {
        let mut factory = XmlFactory::empty();
        assert!(factory.register("Field", || Box::new(Field::default())).is_none());
        assert!(factory.register("Field", || Box::new(AllFields::default())).is_some());
        assert_eq!(factory.create("Field").unwrap().xml_element_name(), "AllFields");
        assert!(factory.create("Select").is_none());
    }
}

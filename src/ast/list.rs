//! Ordered clause containers with a fixed rendering style.

use std::fmt;
use std::marker::PhantomData;

use tracing::debug;

use super::clause::{BoxedClause, Clause, read_typed};
use crate::error::DynaResult;
use crate::transpiler::StatementBuilder;
use crate::xml::{XmlContext, XmlElement, XmlFactory, XmlReader, XmlWriter, read_child_elements};

/// Punctuation around and between the items of a list.
pub trait ListStyle {
    /// Returns whether a start marker was written.
    fn write_start(_builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        Ok(false)
    }

    fn write_separator(builder: &mut dyn StatementBuilder, each_on_new_line: bool) -> DynaResult<()>;

    /// Returns whether an end marker was written.
    fn write_end(_builder: &mut dyn StatementBuilder, _rendered_any: bool) -> DynaResult<bool> {
        Ok(false)
    }
}

/// `a, b, c`
#[derive(Debug, Clone, Copy, Default)]
pub struct CommaList;

impl ListStyle for CommaList {
    fn write_separator(builder: &mut dyn StatementBuilder, each_on_new_line: bool) -> DynaResult<()> {
        builder.write_list_separator(each_on_new_line)
    }
}

/// `(a, b, c)`
#[derive(Debug, Clone, Copy, Default)]
pub struct WrappedList;

impl ListStyle for WrappedList {
    fn write_start(builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        builder.begin_block()?;
        Ok(true)
    }

    fn write_separator(builder: &mut dyn StatementBuilder, each_on_new_line: bool) -> DynaResult<()> {
        builder.write_list_separator(each_on_new_line)
    }

    fn write_end(builder: &mut dyn StatementBuilder, _rendered_any: bool) -> DynaResult<bool> {
        builder.end_block()?;
        Ok(true)
    }
}

/// Column names of an insert, key or index: ` (a, b)`
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnList;

impl ListStyle for ColumnList {
    fn write_start(builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        builder.begin_column_list()?;
        Ok(true)
    }

    fn write_separator(builder: &mut dyn StatementBuilder, each_on_new_line: bool) -> DynaResult<()> {
        builder.write_list_separator(each_on_new_line)
    }

    fn write_end(builder: &mut dyn StatementBuilder, _rendered_any: bool) -> DynaResult<bool> {
        builder.end_column_list()?;
        Ok(true)
    }
}

/// Statements of a script, each terminated.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementList;

impl ListStyle for StatementList {
    fn write_separator(builder: &mut dyn StatementBuilder, _each_on_new_line: bool) -> DynaResult<()> {
        builder.end_statement()?;
        builder.begin_new_line()
    }

    fn write_end(builder: &mut dyn StatementBuilder, rendered_any: bool) -> DynaResult<bool> {
        if rendered_any {
            builder.end_statement()?;
        }
        Ok(false)
    }
}

/// Items that start themselves (joins).
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaceList;

impl ListStyle for SpaceList {
    fn write_separator(_builder: &mut dyn StatementBuilder, _each_on_new_line: bool) -> DynaResult<()> {
        Ok(())
    }
}

/// An ordered list of clauses. Duplicates are allowed and insertion order is
/// emission order.
pub struct TokenList<T, S = CommaList> {
    items: Vec<T>,
    _style: PhantomData<S>,
}

/// A list of any clauses.
pub type ClauseList<S = CommaList> = TokenList<BoxedClause, S>;

impl<T, S> Default for TokenList<T, S> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            _style: PhantomData,
        }
    }
}

impl<T: fmt::Debug, S> fmt::Debug for TokenList<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}

impl<T: Clone, S> Clone for TokenList<T, S> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            _style: PhantomData,
        }
    }
}

impl<T, S> TokenList<T, S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn last_mut(&mut self) -> Option<&mut T> {
        self.items.last_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T, S> FromIterator<T> for TokenList<T, S> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
            _style: PhantomData,
        }
    }
}

impl<'a, T, S> IntoIterator for &'a TokenList<T, S> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Clause, S: ListStyle> TokenList<T, S> {
    /// Render the items with this list's punctuation.
    ///
    /// A separator is only written between items that both render; an item
    /// that renders nothing is rolled back together with the separator in
    /// front of it. Returns true if any item rendered or a start or end
    /// marker was written.
    pub fn build_list(
        &self,
        builder: &mut dyn StatementBuilder,
        each_on_new_line: bool,
        indent: bool,
    ) -> DynaResult<bool> {
        if indent {
            builder.indent();
        }
        let started = S::write_start(builder)?;
        let mut rendered_any = false;
        for item in &self.items {
            let mark = builder.mark();
            if rendered_any {
                S::write_separator(builder, each_on_new_line)?;
            }
            if item.build_statement(builder)? {
                rendered_any = true;
            } else {
                if rendered_any {
                    debug!(item = item.xml_element_name(), "list item rendered nothing, dropping separator");
                }
                builder.reset_to(mark);
            }
        }
        let ended = S::write_end(builder, rendered_any)?;
        if indent {
            builder.outdent();
        }
        Ok(rendered_any || started || ended)
    }

    /// Write each item as a child element.
    pub fn write_xml_items(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        for item in &self.items {
            item.write_xml(writer, ctx)?;
        }
        Ok(())
    }

    /// Write the items inside a wrapper element; nothing when empty.
    pub fn write_xml_list(&self, writer: &mut XmlWriter, ctx: &mut XmlContext, wrapper: &str) -> DynaResult<()> {
        if self.is_empty() {
            return Ok(());
        }
        writer.begin_element(ctx, wrapper)?;
        self.write_xml_items(writer, ctx)?;
        writer.end_element()
    }
}

impl<S> TokenList<BoxedClause, S> {
    /// Read every resolvable child of `wrapper` up to its end tag.
    pub fn read_list_items(
        &mut self,
        wrapper: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<()> {
        read_child_elements(wrapper, reader, ctx, |child, reader, ctx| {
            if let Some(clause) = XmlFactory::read(child, reader, ctx)? {
                self.items.push(clause);
            }
            Ok(true)
        })
    }
}

impl<T: Clause + Default, S> TokenList<T, S> {
    /// Read every child of `wrapper` as a `T`.
    pub fn read_typed_items(
        &mut self,
        wrapper: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<()> {
        read_child_elements(wrapper, reader, ctx, |child, reader, ctx| {
            if let Some(item) = read_typed::<T>(child, reader, ctx)? {
                self.items.push(item);
            }
            Ok(true)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Const, DbType, Field, Value};
    use crate::transpiler::{Dialect, SqlBuilder};

    /// Renders nothing at all.
    #[derive(Debug, Default)]
    struct Nothing;

    impl Clause for Nothing {
        fn xml_element_name(&self) -> &'static str {
            "Nothing"
        }

        fn build_statement(&self, _builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
            Ok(false)
        }
    }

    #[test]
    fn test_empty_items_render_nothing() {
        let list: ClauseList = [Box::new(Nothing) as BoxedClause, Box::new(Nothing)]
            .into_iter()
            .collect();
        let mut builder = SqlBuilder::new(Dialect::Postgres);
        assert!(!list.build_list(&mut builder, false, false).unwrap());
        assert_eq!(builder.finish(), "");
    }

    #[test]
    fn test_separators_skip_empty_items() {
        let list: ClauseList = [
            Box::new(Nothing) as BoxedClause,
            Box::new(Field::new("a")),
            Box::new(Nothing),
            Box::new(Const::new(DbType::Int32, Value::Int(1))),
            Box::new(Nothing),
        ]
        .into_iter()
        .collect();
        let mut builder = SqlBuilder::new(Dialect::Postgres);
        assert!(list.build_list(&mut builder, false, false).unwrap());
        assert_eq!(builder.finish(), "\"a\", 1");
    }

    #[test]
    fn test_wrapped_list_reports_markers() {
        let list: ClauseList<WrappedList> = [Box::new(Nothing) as BoxedClause].into_iter().collect();
        let mut builder = SqlBuilder::new(Dialect::Postgres);
        assert!(list.build_list(&mut builder, false, false).unwrap());
        assert_eq!(builder.finish(), "()");
    }

    #[test]
    fn test_statement_list_terminates() {
        let list: ClauseList<StatementList> = [
            Box::new(Field::new("a")) as BoxedClause,
            Box::new(Nothing),
            Box::new(Field::new("b")),
        ]
        .into_iter()
        .collect();
        let mut builder = SqlBuilder::new(Dialect::Postgres);
        list.build_list(&mut builder, false, false).unwrap();
        assert_eq!(builder.finish(), "\"a\"; \"b\";");
    }
}

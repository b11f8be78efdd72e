//! Table hints and query options.
//!
//! Both are sets: adding the same hint or option twice is an error rather
//! than a silent duplicate.

use super::clause::parse_number;
use super::operators::{QueryOption, TableHint};
use crate::error::{DynaError, DynaResult};
use crate::transpiler::StatementBuilder;
use crate::xml::{XmlContext, XmlElement, XmlReader, XmlWriter, read_child_elements, read_element_text};

/// Hints attached to one table reference, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableHintSet {
    entries: Vec<(TableHint, Vec<String>)>,
}

impl TableHintSet {
    pub const ELEMENT: &'static str = "Hints";

    pub fn insert(&mut self, hint: TableHint, options: Vec<String>) -> DynaResult<()> {
        if self.contains(hint) {
            return Err(DynaError::DuplicateHint(hint.to_string()));
        }
        self.entries.push((hint, options));
        Ok(())
    }

    pub fn contains(&self, hint: TableHint) -> bool {
        self.entries.iter().any(|(h, _)| *h == hint)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TableHint, &[String])> {
        self.entries.iter().map(|(h, o)| (*h, o.as_slice()))
    }

    pub(crate) fn build(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        if self.entries.is_empty() {
            return Ok(false);
        }
        builder.begin_table_hints()?;
        for (i, (hint, options)) in self.entries.iter().enumerate() {
            if i > 0 {
                builder.write_list_separator(false)?;
            }
            builder.write_table_hint(*hint, options)?;
        }
        builder.end_table_hints()?;
        Ok(true)
    }

    /// `<Hints><Hint Name="Index"><Value>ix</Value></Hint></Hints>`
    pub(crate) fn write_xml(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        if self.entries.is_empty() {
            return Ok(());
        }
        writer.begin_element(ctx, Self::ELEMENT)?;
        for (hint, options) in &self.entries {
            writer.begin_element(ctx, "Hint")?;
            writer.write_attribute(ctx, "Name", hint.as_str())?;
            for option in options {
                writer.begin_element(ctx, "Value")?;
                writer.write_text(option)?;
                writer.end_element()?;
            }
            writer.end_element()?;
        }
        writer.end_element()
    }

    pub(crate) fn read_xml(
        &mut self,
        element: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<()> {
        read_child_elements(element, reader, ctx, |child, reader, ctx| {
            if child.name != "Hint" {
                return Ok(false);
            }
            let hint: TableHint = child
                .attribute("Name")
                .ok_or_else(|| DynaError::format("<Hint> needs a Name attribute"))?
                .parse()?;
            let mut options = Vec::new();
            read_child_elements(child, reader, ctx, |value, reader, _ctx| {
                if value.name != "Value" {
                    return Ok(false);
                }
                options.push(read_element_text(value, reader)?);
                Ok(true)
            })?;
            self.insert(hint, options)?;
            Ok(true)
        })
    }
}

/// Options written in an `OPTION (...)` suffix of a select.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptionSet {
    entries: Vec<(QueryOption, Option<i64>)>,
}

impl QueryOptionSet {
    pub const ELEMENT: &'static str = "Options";

    /// Add an option. Options such as `MaxDop` need a value; others take none.
    pub fn insert(&mut self, option: QueryOption, value: Option<i64>) -> DynaResult<()> {
        if option.takes_value() && value.is_none() {
            return Err(DynaError::invalid(format!("query option {} needs a value", option)));
        }
        if self.contains(option) {
            return Err(DynaError::DuplicateHint(option.to_string()));
        }
        let value = if option.takes_value() { value } else { None };
        self.entries.push((option, value));
        Ok(())
    }

    pub fn contains(&self, option: QueryOption) -> bool {
        self.entries.iter().any(|(o, _)| *o == option)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QueryOption, Option<i64>)> + '_ {
        self.entries.iter().copied()
    }

    pub(crate) fn build(&self, builder: &mut dyn StatementBuilder) -> DynaResult<bool> {
        if self.entries.is_empty() {
            return Ok(false);
        }
        builder.begin_query_options()?;
        for (i, (option, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                builder.write_list_separator(false)?;
            }
            builder.write_query_option(*option, *value)?;
        }
        builder.end_query_options()?;
        Ok(true)
    }

    /// `<Options><Option Name="MaxDop" Value="4"/></Options>`
    pub(crate) fn write_xml(&self, writer: &mut XmlWriter, ctx: &mut XmlContext) -> DynaResult<()> {
        if self.entries.is_empty() {
            return Ok(());
        }
        writer.begin_element(ctx, Self::ELEMENT)?;
        for (option, value) in &self.entries {
            writer.begin_element(ctx, "Option")?;
            writer.write_attribute(ctx, "Name", option.as_str())?;
            if let Some(value) = value {
                writer.write_attribute(ctx, "Value", &value.to_string())?;
            }
            writer.end_element()?;
        }
        writer.end_element()
    }

    pub(crate) fn read_xml(
        &mut self,
        element: &XmlElement,
        reader: &mut XmlReader<'_>,
        ctx: &mut XmlContext,
    ) -> DynaResult<()> {
        read_child_elements(element, reader, ctx, |child, reader, _ctx| {
            if child.name != "Option" {
                return Ok(false);
            }
            let option: QueryOption = child
                .attribute("Name")
                .ok_or_else(|| DynaError::format("<Option> needs a Name attribute"))?
                .parse()?;
            let value = child
                .attribute("Value")
                .map(|v| parse_number::<i64>("Value", v))
                .transpose()?;
            reader.skip_element(child)?;
            self.insert(option, value)?;
            Ok(true)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_hint_rejected() {
        let mut hints = TableHintSet::default();
        hints.insert(TableHint::NoLock, Vec::new()).unwrap();
        let err = hints.insert(TableHint::NoLock, Vec::new()).unwrap_err();
        assert!(matches!(err, DynaError::DuplicateHint(ref h) if h == "NoLock"));
        assert_eq!(hints.len(), 1);
    }

    #[test]
    fn test_valued_option_requires_value() {
        let mut options = QueryOptionSet::default();
        assert!(options.insert(QueryOption::MaxDop, None).is_err());
        options.insert(QueryOption::MaxDop, Some(2)).unwrap();
        options.insert(QueryOption::Recompile, Some(9)).unwrap();
        let collected: Vec<_> = options.iter().collect();
        assert_eq!(
            collected,
            vec![(QueryOption::MaxDop, Some(2)), (QueryOption::Recompile, None)]
        );
        assert!(matches!(
            options.insert(QueryOption::Recompile, None),
            Err(DynaError::DuplicateHint(_))
        ));
    }
}

//! Clauses talk to a builder only through events, so any sink can consume them.

use dynasql::prelude::*;
use pretty_assertions::assert_eq;

/// Records the events it sees instead of producing SQL.
#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl Recorder {
    fn push(&mut self, event: impl Into<String>) -> DynaResult<()> {
        self.events.push(event.into());
        Ok(())
    }
}

impl StatementBuilder for Recorder {
    fn write_raw(&mut self, text: &str) -> DynaResult<()> {
        self.push(format!("raw {}", text))
    }

    fn mark(&self) -> usize {
        self.events.len()
    }

    fn reset_to(&mut self, mark: usize) {
        self.events.truncate(mark);
    }

    fn write_source_table(&mut self, _owner: Option<&str>, name: &str, _alias: Option<&str>) -> DynaResult<()> {
        self.push(format!("table {}", name))
    }

    fn write_source_field(
        &mut self,
        _owner: Option<&str>,
        _table: Option<&str>,
        name: &str,
        _alias: Option<&str>,
    ) -> DynaResult<()> {
        self.push(format!("field {}", name))
    }

    fn write_all_fields(&mut self, _owner: Option<&str>, _table: Option<&str>) -> DynaResult<()> {
        self.push("*")
    }

    fn write_alias(&mut self, alias: &str) -> DynaResult<()> {
        self.push(format!("alias {}", alias))
    }

    fn begin_aggregate_function(&mut self, func: AggregateFunction) -> DynaResult<()> {
        self.push(format!("begin {}", func.as_str()))
    }

    fn end_aggregate_function(&mut self, func: AggregateFunction) -> DynaResult<()> {
        self.push(format!("end {}", func.as_str()))
    }

    fn begin_function_parameter_list(&mut self) -> DynaResult<()> {
        self.push("(")
    }

    fn end_function_parameter_list(&mut self) -> DynaResult<()> {
        self.push(")")
    }

    fn begin_select_statement(&mut self) -> DynaResult<()> {
        self.push("select")
    }

    fn end_select_statement(&mut self) -> DynaResult<()> {
        self.push("end select")
    }

    fn begin_select_list(&mut self) -> DynaResult<()> {
        self.push("fields")
    }

    fn end_select_list(&mut self) -> DynaResult<()> {
        self.push("end fields")
    }

    fn begin_from_list(&mut self) -> DynaResult<()> {
        self.push("from")
    }

    fn end_from_list(&mut self) -> DynaResult<()> {
        self.push("end from")
    }

    fn begin_where(&mut self) -> DynaResult<()> {
        self.push("where")
    }

    fn end_where(&mut self) -> DynaResult<()> {
        self.push("end where")
    }
}

#[test]
fn test_count_aggregate_events() {
    let mut recorder = Recorder::default();
    assert!(count_all().alias("n").build_statement(&mut recorder).unwrap());
    assert_eq!(
        recorder.events,
        vec!["begin Count", "(", "*", ")", "end Count", "alias n"]
    );
}

#[test]
fn test_select_events_skip_empty_sections() {
    let query = Select::new().select(count_all()).from("users");
    let mut recorder = Recorder::default();
    query.build_statement(&mut recorder).unwrap();
    assert_eq!(
        recorder.events,
        vec![
            "select",
            "fields",
            "begin Count",
            "(",
            "*",
            ")",
            "end Count",
            "end fields",
            "from",
            "table users",
            "end from",
            "end select",
        ]
    );
}

#[test]
fn test_select_events_with_filter() {
    let query = Select::new().field("id").from("users").and_where(eq("id", 1));
    let mut recorder = Recorder::default();
    query.build_statement(&mut recorder).unwrap();
    let where_at = recorder.events.iter().position(|e| e == "where").unwrap();
    let end_at = recorder.events.iter().position(|e| e == "end where").unwrap();
    assert!(where_at < end_at);
    assert_eq!(recorder.events[where_at - 1], "end from");
    assert!(recorder.events[where_at..end_at].contains(&"field id".to_string()));
}

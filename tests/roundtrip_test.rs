use std::collections::BTreeSet;

use dynasql::prelude::*;
use pretty_assertions::assert_eq;

fn roundtrip(clause: &dyn Clause, ctx: &mut XmlContext) -> Box<dyn Clause> {
    let xml = to_xml(clause, ctx).expect("write XML");
    from_xml(&xml, ctx).expect("read XML").expect("known root element")
}

fn assert_same_sql(original: &dyn Clause, read: &dyn Clause) {
    for dialect in [Dialect::Postgres, Dialect::SqlServer, Dialect::Oracle] {
        assert_eq!(
            read.to_sql_with_dialect(dialect).unwrap(),
            original.to_sql_with_dialect(dialect).unwrap(),
            "{:?}",
            dialect
        );
    }
}

/// Same SQL, or the same error, on every dialect.
fn assert_same_rendering(original: &dyn Clause, read: &dyn Clause) {
    for dialect in Dialect::ALL {
        assert_eq!(
            format!("{:?}", read.to_sql_with_dialect(*dialect)),
            format!("{:?}", original.to_sql_with_dialect(*dialect)),
            "<{}> on {:?}",
            original.xml_element_name(),
            dialect
        );
    }
}

#[test]
fn test_read_handwritten_document() {
    let xml = r#"<?xml version="1.0" encoding="utf-8"?>
        <Select Distinct="true">
            <Fields>
                <Field Name="id"/>
                <Field Name="email" Alias="mail"/>
            </Fields>
            <From>
                <Table Name="users" Alias="u"/>
            </From>
            <Where>
                <Compare Operator="Equals">
                    <Left><Field Name="active"/></Left>
                    <Right><Const Type="Boolean">true</Const></Right>
                </Compare>
            </Where>
        </Select>"#;
    let mut ctx = XmlContext::default();
    let clause = from_xml(xml, &mut ctx).unwrap().unwrap();
    assert_eq!(clause.xml_element_name(), "Select");
    assert_eq!(
        clause.to_sql().unwrap(),
        "SELECT DISTINCT \"id\", \"email\" AS \"mail\" FROM \"users\" AS \"u\" WHERE (\"active\" = TRUE)"
    );
}

#[test]
fn test_query_roundtrip() {
    let query = Select::new()
        .select(qualified("u", "name"))
        .select(count_all().alias("orders"))
        .from(Table::new("users").alias("u"))
        .left_join(
            Table::new("orders").alias("o"),
            qualified("o", "user_id").equals(qualified("u", "id")),
        )
        .and_where(field("active").equals(value(true)))
        .and_where(between("age", 18, 65))
        .group_by(qualified("u", "name"))
        .having(count_all().greater_than(value(3)))
        .order_by(field("orders"), Order::Descending)
        .top(Top::first(20));

    let mut ctx = XmlContext::default();
    let read = roundtrip(&query, &mut ctx);
    assert_same_sql(&query, read.as_ref());
}

#[test]
fn test_dml_roundtrip() {
    let id = param("id", DbType::Int32);
    let statements: Vec<Box<dyn Clause>> = vec![
        Box::new(
            Insert::into_table("users")
                .set("name", typed(DbType::String, "Ann & Bob <team>"))
                .set("created", now()),
        ),
        Box::new(
            Update::table("users")
                .set("visits", field("visits").plus(value(1)))
                .and_where(field("id").equals(id.clone())),
        ),
        Box::new(Delete::table("users").and_where(not_in("id", [1, 2, 3]))),
    ];

    let mut ctx = XmlContext::default();
    for statement in &statements {
        let read = roundtrip(statement.as_ref(), &mut ctx);
        assert_same_sql(statement.as_ref(), read.as_ref());
    }
}

#[test]
fn test_schema_roundtrip() {
    let table = CreateTable::new("orders")
        .owner("sales")
        .if_not_exists()
        .column(Column::new("id", DbType::Int64).primary_key().auto_assign())
        .unwrap()
        .column(Column::new("total", DbType::Decimal).precision(10, 2))
        .unwrap()
        .default_value(value(0))
        .unwrap()
        .column(Column::new("user_id", DbType::Int32))
        .unwrap()
        .foreign_key(
            ForeignKey::named("fk_user")
                .column("user_id")
                .unwrap()
                .references("users")
                .column("id")
                .unwrap()
                .on_delete(FkAction::Cascade),
        );

    let mut ctx = XmlContext::default();
    let read = roundtrip(&table, &mut ctx);
    assert_eq!(read.to_sql().unwrap(), table.to_sql().unwrap());
    assert_eq!(
        read.to_sql_with_dialect(Dialect::MySQL).unwrap(),
        table.to_sql_with_dialect(Dialect::MySQL).unwrap()
    );

    let index = CreateIndex::new("ix_user", "orders").unique().column("user_id").unwrap();
    let read = roundtrip(&index, &mut ctx);
    assert_eq!(read.to_sql().unwrap(), index.to_sql().unwrap());

    let drop = DropStatement::view("recent").if_exists();
    let read = roundtrip(&drop, &mut ctx);
    assert_eq!(read.xml_element_name(), "DropView");
    assert_eq!(read.to_sql().unwrap(), "DROP VIEW IF EXISTS \"recent\"");
}

#[test]
fn test_script_roundtrip_keeps_blocks_and_parameters() {
    let count = Param::new("count", DbType::Int32);
    let script = Script::new()
        .declare(count.clone())
        .set(count.clone(), value(0))
        .begin()
        .set(count.clone(), count.clone().plus(value(1)))
        .end()
        .unwrap()
        .return_value(count);

    let mut ctx = XmlContext::default();
    let xml = to_xml(&script, &mut ctx).unwrap();
    assert_eq!(xml.matches("<Param Name=\"count\" Type=").count(), 1);
    assert!(xml.contains("<Block>"));

    let read = from_xml(&xml, &mut ctx).unwrap().unwrap();
    assert_eq!(
        read.to_sql_with_dialect(Dialect::SqlServer).unwrap(),
        script.to_sql_with_dialect(Dialect::SqlServer).unwrap()
    );
}

#[test]
fn test_namespaced_documents() {
    let config = DynaConfig::builder()
        .namespace("http://schemas.dynasql.dev/statement", Some("dsql"))
        .qualify_elements(true)
        .build();
    let query = Select::new().field("id").from("users");

    let mut ctx = config.xml_context();
    let xml = to_xml(&query, &mut ctx).unwrap();
    assert!(xml.contains("<dsql:Select"));
    assert!(xml.contains("xmlns:dsql=\"http://schemas.dynasql.dev/statement\""));

    let read = from_xml(&xml, &mut ctx).unwrap().unwrap();
    assert_eq!(read.to_sql().unwrap(), query.to_sql().unwrap());
}

#[test]
fn test_unknown_root_and_unknown_children() {
    let mut ctx = XmlContext::default();
    assert!(from_xml("<Report/>", &mut ctx).unwrap().is_none());

    let xml = r#"<Select><Comment>ignored</Comment><From><Table Name="t"/></From></Select>"#;
    let read = from_xml(xml, &mut ctx).unwrap().unwrap();
    assert_eq!(read.to_sql().unwrap(), "SELECT * FROM \"t\"");
}

#[test]
fn test_statement_in_value_slot_is_rejected() {
    let xml = r#"<Compare Operator="Equals">
        <Left><Field Name="a"/></Left>
        <Right><Delete><Table Name="t"/></Delete></Right>
    </Compare>"#;
    let mut ctx = XmlContext::default();
    assert!(matches!(
        from_xml(xml, &mut ctx),
        Err(DynaError::XmlTypeMismatch { .. })
    ));
}

/// One fully populated instance of every built-in element.
fn fixtures() -> Vec<Box<dyn Clause>> {
    let id = param("id", DbType::Int32);
    let recent = || {
        Select::new()
            .field("id")
            .from("orders")
            .and_where(field("placed").greater_than(value(20)))
    };
    vec![
        Box::new(field("name").alias("n")),
        Box::new(AllFields::new()),
        Box::new(Table::new("users").alias("u")),
        Box::new(typed(DbType::Decimal, "12.50")),
        Box::new(Param::new("limit", DbType::Int64).with_value(10)),
        Box::new(field("a").times(value(2))),
        Box::new(BooleanExpr::or(eq("a", 1), Not::new(eq("b", 2)))),
        Box::new(field("a").equals(value("x"))),
        Box::new(Not::new(is_null("deleted"))),
        Box::new(between("age", 18, 65)),
        Box::new(In::query(field("id"), recent())),
        Box::new(Exists::new(recent()).negated()),
        Box::new(Aggregate::new(AggregateFunction::Sum, field("total")).alias("sum")),
        Box::new(Function::new(FunctionKind::Upper).arg(field("name")).alias("up")),
        Box::new(Assign::new(field("a"), value(1))),
        Box::new(OrderBy::new(field("created"), Order::Descending)),
        Box::new(
            Join::new(JoinType::LeftOuter, SubQuery::new(recent()).alias("r"))
                .on(qualified("r", "id").equals(qualified("u", "id"))),
        ),
        Box::new(SubQuery::new(recent()).alias("r")),
        Box::new(
            Select::new()
                .from(Table::new("orders").hint(TableHint::NoLock).unwrap())
                .inner_join(
                    SubQuery::new(recent()).alias("r"),
                    qualified("r", "id").equals(field("id")),
                )
                .top(Top::percent(10))
                .option(QueryOption::MaxDop, Some(2))
                .unwrap(),
        ),
        Box::new(Select::new().from(SubQuery::new(recent()).alias("r")).top(Top::range(10, 5))),
        Box::new(Insert::into_table("users").select(recent())),
        Box::new(Update::table("users").set("name", upper(field("name")))),
        Box::new(Delete::table("users").and_where(field("id").equals(id.clone()))),
        Box::new(Column::new("email", DbType::String).length(200).nullable()),
        Box::new(IndexColumn::new("email", Order::Descending).unwrap()),
        Box::new(PrimaryKey::named("pk_users").column("id").unwrap()),
        Box::new(
            ForeignKey::named("fk_owner")
                .column("owner_id")
                .unwrap()
                .references("users")
                .column("id")
                .unwrap()
                .on_update(FkAction::Cascade),
        ),
        Box::new(
            CreateTable::new("users")
                .column(Column::new("id", DbType::Int32).primary_key())
                .unwrap(),
        ),
        Box::new(CreateView::new("recent_orders", recent()).owner("sales")),
        Box::new(CreateIndex::new("ix_email", "users").unique().column("email").unwrap()),
        Box::new(
            CreateSequence::new("order_no")
                .start(100)
                .increment(5)
                .min_value(1)
                .max_value(9999)
                .cycle()
                .cache(20),
        ),
        Box::new(
            CreateProcedure::new("purge_user")
                .parameter(id.clone())
                .body(Script::new().then(Delete::table("users").and_where(field("id").equals(id.clone())))),
        ),
        Box::new(DropStatement::table("users").if_exists()),
        Box::new(DropStatement::view("recent_orders")),
        Box::new(DropStatement::index("ix_email", "users")),
        Box::new(DropStatement::sequence("order_no")),
        Box::new(DropStatement::procedure("purge_user")),
        Box::new(Script::new().use_database("shop").then(recent())),
        Box::new(Declare::new(Param::new("total", DbType::Decimal))),
        Box::new(Set::new(Param::new("total", DbType::Int32), value(0))),
        Box::new(Return::value(value(1))),
        Box::new(Use::new("shop")),
    ]
}

#[test]
fn test_every_registered_element_round_trips() {
    let fixtures = fixtures();
    let covered: BTreeSet<&str> = fixtures.iter().map(|c| c.xml_element_name()).collect();
    let ctx = XmlContext::default();
    for name in ctx.factory().names() {
        assert!(covered.contains(name), "no fixture for <{}>", name);
    }

    let mut ctx = XmlContext::default();
    for clause in &fixtures {
        let read = roundtrip(clause.as_ref(), &mut ctx);
        assert_eq!(read.xml_element_name(), clause.xml_element_name());
        assert_same_rendering(clause.as_ref(), read.as_ref());
    }
}

#[test]
fn test_constants_keep_their_value_kind() {
    let constants = [
        typed(DbType::String, 42),
        typed(DbType::Date, "2024-01-01"),
        typed(DbType::Int32, "5"),
        typed(DbType::Boolean, 1.5),
    ];
    let mut ctx = XmlContext::default();
    for constant in &constants {
        let read = roundtrip(constant, &mut ctx);
        assert_same_rendering(constant, read.as_ref());
    }
    assert_eq!(
        roundtrip(&constants[0], &mut ctx).to_sql().unwrap(),
        "42"
    );
}

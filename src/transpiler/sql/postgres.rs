use super::super::traits::{limit_offset, numeric, sized, ProcedureStyle, SqlGenerator, TopClause};
use crate::ast::{DbType, FunctionKind, SchemaObjectType, Top};

pub struct PostgresGenerator;

impl SqlGenerator for PostgresGenerator {
    fn name(&self) -> &'static str {
        "PostgreSQL"
    }

    fn placeholder(&self, index: usize, _name: &str) -> String {
        format!("${}", index)
    }

    fn binary_literal(&self, bytes: &[u8]) -> String {
        format!("'\\x{}'", crate::ast::values::to_hex(bytes))
    }

    fn data_type(&self, db_type: DbType, length: Option<u32>, precision: Option<u32>) -> Option<String> {
        let name = match db_type {
            DbType::AnsiString | DbType::String => sized("VARCHAR", length, "TEXT"),
            DbType::AnsiStringFixedLength | DbType::StringFixedLength => sized("CHAR", length, "CHAR"),
            DbType::Binary => "BYTEA".to_string(),
            DbType::Boolean => "BOOLEAN".to_string(),
            DbType::Byte | DbType::SByte | DbType::Int16 => "SMALLINT".to_string(),
            DbType::Int32 | DbType::UInt16 => "INTEGER".to_string(),
            DbType::Int64 | DbType::UInt32 | DbType::UInt64 => "BIGINT".to_string(),
            DbType::Single => "REAL".to_string(),
            DbType::Double => "DOUBLE PRECISION".to_string(),
            DbType::Decimal | DbType::VarNumeric => numeric("NUMERIC", length, precision),
            DbType::Currency => "MONEY".to_string(),
            DbType::Date => "DATE".to_string(),
            DbType::Time => "TIME".to_string(),
            DbType::DateTime | DbType::DateTime2 => "TIMESTAMP".to_string(),
            DbType::DateTimeOffset => "TIMESTAMPTZ".to_string(),
            DbType::Guid => "UUID".to_string(),
            DbType::Xml => "XML".to_string(),
            DbType::Object => return None,
        };
        Some(name)
    }

    fn identity_clause(&self) -> &'static str {
        "GENERATED BY DEFAULT AS IDENTITY"
    }

    fn top_clause(&self, top: &Top) -> Option<TopClause> {
        limit_offset(top)
    }

    fn create_guard(&self, object: SchemaObjectType) -> Option<&'static str> {
        match object {
            SchemaObjectType::StoredProcedure => None,
            _ => Some("IF NOT EXISTS"),
        }
    }

    fn procedure_style(&self) -> ProcedureStyle {
        ProcedureStyle::PlPgSql
    }

    fn function_name(&self, func: &FunctionKind) -> Option<String> {
        let name = match func {
            FunctionKind::GetDate => "NOW()",
            FunctionKind::GetUtcDate => "(NOW() AT TIME ZONE 'UTC')",
            FunctionKind::LastId => "LASTVAL()",
            FunctionKind::IsNull => "COALESCE",
            FunctionKind::Upper => "UPPER",
            FunctionKind::Lower => "LOWER",
            FunctionKind::Length => "LENGTH",
            FunctionKind::Round => "ROUND",
            FunctionKind::Custom(name) => return Some(name.clone()),
        };
        Some(name.to_string())
    }
}

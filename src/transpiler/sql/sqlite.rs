use super::super::traits::{limit_offset, ProcedureStyle, SqlGenerator, TopClause};
use crate::ast::{DbType, FunctionKind, SchemaObjectType, Top};

pub struct SqliteGenerator;

impl SqlGenerator for SqliteGenerator {
    fn name(&self) -> &'static str {
        "SQLite"
    }

    fn placeholder(&self, _index: usize, name: &str) -> String {
        format!("@{}", name)
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "1".to_string() } else { "0".to_string() }
    }

    // SQLite uses type affinity; sizes are accepted but ignored.
    fn data_type(&self, db_type: DbType, _length: Option<u32>, _precision: Option<u32>) -> Option<String> {
        let name = match db_type {
            DbType::Boolean
            | DbType::Byte
            | DbType::SByte
            | DbType::Int16
            | DbType::Int32
            | DbType::Int64
            | DbType::UInt16
            | DbType::UInt32
            | DbType::UInt64 => "INTEGER",
            DbType::Single | DbType::Double => "REAL",
            DbType::Decimal | DbType::Currency | DbType::VarNumeric => "NUMERIC",
            DbType::Binary => "BLOB",
            DbType::Object => return None,
            _ => "TEXT",
        };
        Some(name.to_string())
    }

    fn identity_clause(&self) -> &'static str {
        "AUTOINCREMENT"
    }

    fn identity_after_primary_key(&self) -> bool {
        true
    }

    fn top_clause(&self, top: &Top) -> Option<TopClause> {
        limit_offset(top)
    }

    fn create_guard(&self, object: SchemaObjectType) -> Option<&'static str> {
        match object {
            SchemaObjectType::Table | SchemaObjectType::View | SchemaObjectType::Index => {
                Some("IF NOT EXISTS")
            }
            _ => None,
        }
    }

    fn supports_sequences(&self) -> bool {
        false
    }

    fn procedure_style(&self) -> ProcedureStyle {
        ProcedureStyle::Unsupported
    }

    fn function_name(&self, func: &FunctionKind) -> Option<String> {
        let name = match func {
            FunctionKind::GetDate => "CURRENT_TIMESTAMP",
            FunctionKind::GetUtcDate => "CURRENT_TIMESTAMP",
            FunctionKind::LastId => "last_insert_rowid()",
            FunctionKind::IsNull => "IFNULL",
            FunctionKind::Upper => "UPPER",
            FunctionKind::Lower => "LOWER",
            FunctionKind::Length => "LENGTH",
            FunctionKind::Round => "ROUND",
            FunctionKind::Custom(name) => return Some(name.clone()),
        };
        Some(name.to_string())
    }
}

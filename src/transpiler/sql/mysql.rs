use super::super::traits::{
    escape_string, limit_offset, numeric, sized, ProcedureStyle, SqlGenerator, TopClause,
};
use crate::ast::{DbType, FunctionKind, Operator, ParameterDirection, SchemaObjectType, Top};

pub struct MysqlGenerator;

impl SqlGenerator for MysqlGenerator {
    fn name(&self) -> &'static str {
        "MySQL"
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("`{}`", name.replace('`', "``"))
    }

    fn placeholder(&self, _index: usize, _name: &str) -> String {
        "?".to_string()
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "1".to_string() } else { "0".to_string() }
    }

    fn string_literal(&self, text: &str, _db_type: DbType) -> String {
        format!("'{}'", escape_string(&text.replace('\\', "\\\\")))
    }

    fn operator_symbol(&self, op: Operator) -> Option<&'static str> {
        match op {
            // || is logical OR unless PIPES_AS_CONCAT is set
            Operator::Concat => None,
            other => Some(other.sql_symbol()),
        }
    }

    fn data_type(&self, db_type: DbType, length: Option<u32>, precision: Option<u32>) -> Option<String> {
        let name = match db_type {
            DbType::AnsiString | DbType::String => sized("VARCHAR", length, "TEXT"),
            DbType::AnsiStringFixedLength | DbType::StringFixedLength => sized("CHAR", length, "CHAR"),
            DbType::Binary => sized("VARBINARY", length, "BLOB"),
            DbType::Boolean => "TINYINT(1)".to_string(),
            DbType::Byte => "TINYINT UNSIGNED".to_string(),
            DbType::SByte => "TINYINT".to_string(),
            DbType::Int16 => "SMALLINT".to_string(),
            DbType::UInt16 => "SMALLINT UNSIGNED".to_string(),
            DbType::Int32 => "INT".to_string(),
            DbType::UInt32 => "INT UNSIGNED".to_string(),
            DbType::Int64 => "BIGINT".to_string(),
            DbType::UInt64 => "BIGINT UNSIGNED".to_string(),
            DbType::Single => "FLOAT".to_string(),
            DbType::Double => "DOUBLE".to_string(),
            DbType::Decimal | DbType::VarNumeric => numeric("DECIMAL", length, precision),
            DbType::Currency => "DECIMAL(19, 4)".to_string(),
            DbType::Date => "DATE".to_string(),
            DbType::Time => "TIME".to_string(),
            DbType::DateTime | DbType::DateTime2 | DbType::DateTimeOffset => "DATETIME".to_string(),
            DbType::Guid => "CHAR(36)".to_string(),
            DbType::Xml => "LONGTEXT".to_string(),
            DbType::Object => return None,
        };
        Some(name)
    }

    fn identity_clause(&self) -> &'static str {
        "AUTO_INCREMENT"
    }

    fn top_clause(&self, top: &Top) -> Option<TopClause> {
        limit_offset(top)
    }

    fn create_guard(&self, object: SchemaObjectType) -> Option<&'static str> {
        match object {
            SchemaObjectType::Table => Some("IF NOT EXISTS"),
            _ => None,
        }
    }

    fn drop_guard(&self, object: SchemaObjectType) -> Option<&'static str> {
        match object {
            SchemaObjectType::Index | SchemaObjectType::Sequence => None,
            _ => Some("IF EXISTS"),
        }
    }

    fn drop_index_needs_table(&self) -> bool {
        true
    }

    fn supports_sequences(&self) -> bool {
        false
    }

    fn procedure_style(&self) -> ProcedureStyle {
        ProcedureStyle::MySql
    }

    fn function_name(&self, func: &FunctionKind) -> Option<String> {
        let name = match func {
            FunctionKind::GetDate => "NOW()",
            FunctionKind::GetUtcDate => "UTC_TIMESTAMP()",
            FunctionKind::LastId => "LAST_INSERT_ID()",
            FunctionKind::IsNull => "IFNULL",
            FunctionKind::Upper => "UPPER",
            FunctionKind::Lower => "LOWER",
            FunctionKind::Length => "CHAR_LENGTH",
            FunctionKind::Round => "ROUND",
            FunctionKind::Custom(name) => return Some(name.clone()),
        };
        Some(name.to_string())
    }

    fn supports_multiple_statements(&self) -> bool {
        false
    }

    fn variable(&self, name: &str) -> String {
        format!("@{}", name)
    }

    fn parameter_declaration(&self, name: &str, data_type: &str, direction: ParameterDirection) -> String {
        match direction {
            ParameterDirection::Output | ParameterDirection::ReturnValue => {
                format!("OUT {} {}", name, data_type)
            }
            ParameterDirection::InputOutput => format!("INOUT {} {}", name, data_type),
            ParameterDirection::Input => format!("IN {} {}", name, data_type),
        }
    }

    fn use_database(&self, database: &str) -> Option<String> {
        Some(format!("USE {}", self.quote_identifier(database)))
    }
}

use super::super::traits::{offset_fetch, numeric, sized, ProcedureStyle, SqlGenerator, TopClause};
use crate::ast::{DbType, FkAction, FunctionKind, Operator, ParameterDirection, Top, TopType};

pub struct OracleGenerator;

impl SqlGenerator for OracleGenerator {
    fn name(&self) -> &'static str {
        "Oracle"
    }

    fn placeholder(&self, _index: usize, name: &str) -> String {
        format!(":{}", name)
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "1".to_string() } else { "0".to_string() }
    }

    fn binary_literal(&self, bytes: &[u8]) -> String {
        format!("HEXTORAW('{}')", crate::ast::values::to_hex(bytes))
    }

    fn datetime_literal(&self, dt: &chrono::NaiveDateTime) -> String {
        format!("TIMESTAMP '{}'", dt.format("%Y-%m-%d %H:%M:%S"))
    }

    fn table_alias_keyword(&self) -> &'static str {
        " "
    }

    fn operator_symbol(&self, op: Operator) -> Option<&'static str> {
        match op {
            // Oracle only has MOD(a, b)
            Operator::Modulo | Operator::XOr | Operator::BitwiseAnd | Operator::BitwiseOr => None,
            other => Some(other.sql_symbol()),
        }
    }

    fn data_type(&self, db_type: DbType, length: Option<u32>, precision: Option<u32>) -> Option<String> {
        let name = match db_type {
            DbType::AnsiString => sized("VARCHAR2", length, "CLOB"),
            DbType::String => sized("NVARCHAR2", length, "NCLOB"),
            DbType::AnsiStringFixedLength => sized("CHAR", length, "CHAR"),
            DbType::StringFixedLength => sized("NCHAR", length, "NCHAR"),
            DbType::Binary => sized("RAW", length, "BLOB"),
            DbType::Boolean => "NUMBER(1)".to_string(),
            DbType::Byte | DbType::SByte => "NUMBER(3)".to_string(),
            DbType::Int16 | DbType::UInt16 => "NUMBER(5)".to_string(),
            DbType::Int32 | DbType::UInt32 => "NUMBER(10)".to_string(),
            DbType::Int64 | DbType::UInt64 => "NUMBER(19)".to_string(),
            DbType::Single => "BINARY_FLOAT".to_string(),
            DbType::Double => "BINARY_DOUBLE".to_string(),
            DbType::Decimal | DbType::VarNumeric => numeric("NUMBER", length, precision),
            DbType::Currency => "NUMBER(19, 4)".to_string(),
            DbType::Date => "DATE".to_string(),
            DbType::Time | DbType::DateTime | DbType::DateTime2 => "TIMESTAMP".to_string(),
            DbType::DateTimeOffset => "TIMESTAMP WITH TIME ZONE".to_string(),
            DbType::Guid => "RAW(16)".to_string(),
            DbType::Xml => "XMLTYPE".to_string(),
            DbType::Object => return None,
        };
        Some(name)
    }

    fn identity_clause(&self) -> &'static str {
        "GENERATED BY DEFAULT AS IDENTITY"
    }

    fn top_clause(&self, top: &Top) -> Option<TopClause> {
        let clause = match top.top_type() {
            TopType::Count => format!(" FETCH FIRST {} ROWS ONLY", top.count()),
            TopType::Percent => format!(" FETCH FIRST {} PERCENT ROWS ONLY", top.count()),
            TopType::Range => offset_fetch(top),
        };
        Some(TopClause::Suffix(clause))
    }

    fn drop_guard(&self, _object: crate::ast::SchemaObjectType) -> Option<&'static str> {
        None
    }

    fn procedure_style(&self) -> ProcedureStyle {
        ProcedureStyle::PlSql
    }

    fn fk_action(&self, action: FkAction, on_update: bool) -> Option<&'static str> {
        match (action, on_update) {
            (FkAction::Undefined, _) => Some(""),
            (FkAction::Cascade, false) => Some("CASCADE"),
            (FkAction::SetNull, false) => Some("SET NULL"),
            _ => None,
        }
    }

    fn function_name(&self, func: &FunctionKind) -> Option<String> {
        let name = match func {
            FunctionKind::GetDate => "SYSDATE",
            FunctionKind::GetUtcDate => "SYS_EXTRACT_UTC(SYSTIMESTAMP)",
            FunctionKind::LastId => return None,
            FunctionKind::IsNull => "NVL",
            FunctionKind::Upper => "UPPER",
            FunctionKind::Lower => "LOWER",
            FunctionKind::Length => "LENGTH",
            FunctionKind::Round => "ROUND",
            FunctionKind::Custom(name) => return Some(name.clone()),
        };
        Some(name.to_string())
    }

    fn parameter_declaration(&self, name: &str, data_type: &str, direction: ParameterDirection) -> String {
        let mode = match direction {
            ParameterDirection::Input => "IN",
            ParameterDirection::InputOutput => "IN OUT",
            ParameterDirection::Output | ParameterDirection::ReturnValue => "OUT",
        };
        format!("{} {} {}", name, mode, data_type)
    }
}

use super::super::traits::{offset_fetch, numeric, sized, ProcedureStyle, SqlGenerator, TopClause};
use crate::ast::{
    DbType, FunctionKind, Operator, ParameterDirection, QueryOption, TableHint, Top, TopType,
};

pub struct SqlServerGenerator;

impl SqlGenerator for SqlServerGenerator {
    fn name(&self) -> &'static str {
        "SQL Server"
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("[{}]", name.replace(']', "]]"))
    }

    fn placeholder(&self, _index: usize, name: &str) -> String {
        format!("@{}", name)
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "1".to_string() } else { "0".to_string() }
    }

    fn string_literal(&self, text: &str, db_type: DbType) -> String {
        let body = super::super::traits::escape_string(text);
        if db_type.is_unicode() {
            format!("N'{}'", body)
        } else {
            format!("'{}'", body)
        }
    }

    fn binary_literal(&self, bytes: &[u8]) -> String {
        format!("0x{}", crate::ast::values::to_hex(bytes))
    }

    fn operator_symbol(&self, op: Operator) -> Option<&'static str> {
        match op {
            Operator::Concat => Some("+"),
            Operator::XOr => None,
            other => Some(other.sql_symbol()),
        }
    }

    fn data_type(&self, db_type: DbType, length: Option<u32>, precision: Option<u32>) -> Option<String> {
        let name = match db_type {
            DbType::AnsiString => sized("VARCHAR", length, "VARCHAR(MAX)"),
            DbType::String => sized("NVARCHAR", length, "NVARCHAR(MAX)"),
            DbType::AnsiStringFixedLength => sized("CHAR", length, "CHAR"),
            DbType::StringFixedLength => sized("NCHAR", length, "NCHAR"),
            DbType::Binary => sized("VARBINARY", length, "VARBINARY(MAX)"),
            DbType::Boolean => "BIT".to_string(),
            DbType::Byte => "TINYINT".to_string(),
            DbType::SByte | DbType::Int16 => "SMALLINT".to_string(),
            DbType::Int32 | DbType::UInt16 => "INT".to_string(),
            DbType::Int64 | DbType::UInt32 => "BIGINT".to_string(),
            DbType::UInt64 => "DECIMAL(20)".to_string(),
            DbType::Single => "REAL".to_string(),
            DbType::Double => "FLOAT".to_string(),
            DbType::Decimal | DbType::VarNumeric => numeric("DECIMAL", length, precision),
            DbType::Currency => "MONEY".to_string(),
            DbType::Date => "DATE".to_string(),
            DbType::Time => "TIME".to_string(),
            DbType::DateTime => "DATETIME".to_string(),
            DbType::DateTime2 => "DATETIME2".to_string(),
            DbType::DateTimeOffset => "DATETIMEOFFSET".to_string(),
            DbType::Guid => "UNIQUEIDENTIFIER".to_string(),
            DbType::Xml => "XML".to_string(),
            DbType::Object => "SQL_VARIANT".to_string(),
        };
        Some(name)
    }

    fn identity_clause(&self) -> &'static str {
        "IDENTITY(1, 1)"
    }

    fn top_clause(&self, top: &Top) -> Option<TopClause> {
        let clause = match top.top_type() {
            TopType::Count => TopClause::Prefix(format!("TOP {}", top.count())),
            TopType::Percent => TopClause::Prefix(format!("TOP {} PERCENT", top.count())),
            // OFFSET / FETCH requires an ORDER BY
            TopType::Range => TopClause::Suffix(offset_fetch(top)),
        };
        Some(clause)
    }

    fn drop_index_needs_table(&self) -> bool {
        true
    }

    fn procedure_style(&self) -> ProcedureStyle {
        ProcedureStyle::TSql
    }

    fn function_name(&self, func: &FunctionKind) -> Option<String> {
        let name = match func {
            FunctionKind::GetDate => "GETDATE()",
            FunctionKind::GetUtcDate => "GETUTCDATE()",
            FunctionKind::LastId => "SCOPE_IDENTITY()",
            FunctionKind::IsNull => "ISNULL",
            FunctionKind::Upper => "UPPER",
            FunctionKind::Lower => "LOWER",
            FunctionKind::Length => "LEN",
            FunctionKind::Round => "ROUND",
            FunctionKind::Custom(name) => return Some(name.clone()),
        };
        Some(name.to_string())
    }

    fn supports_table_hints(&self) -> bool {
        true
    }

    fn table_hint(&self, hint: TableHint, options: &[String]) -> Option<String> {
        let text = match hint {
            TableHint::NoLock => "NOLOCK",
            TableHint::ReadCommitted => "READCOMMITTED",
            TableHint::ReadUncommitted => "READUNCOMMITTED",
            TableHint::RepeatableRead => "REPEATABLEREAD",
            TableHint::Serializable => "SERIALIZABLE",
            TableHint::HoldLock => "HOLDLOCK",
            TableHint::UpdLock => "UPDLOCK",
            TableHint::RowLock => "ROWLOCK",
            TableHint::PagLock => "PAGLOCK",
            TableHint::TabLock => "TABLOCK",
            TableHint::TabLockX => "TABLOCKX",
            TableHint::XLock => "XLOCK",
            TableHint::NoWait => "NOWAIT",
            TableHint::ReadPast => "READPAST",
            TableHint::Index => {
                let names: Vec<String> = options.iter().map(|o| self.quote_identifier(o)).collect();
                return Some(format!("INDEX({})", names.join(", ")));
            }
            TableHint::ForceSeek => "FORCESEEK",
            TableHint::ForceScan => "FORCESCAN",
            TableHint::NoExpand => "NOEXPAND",
        };
        Some(text.to_string())
    }

    fn query_option(&self, option: QueryOption, value: Option<i64>) -> Option<String> {
        let text = match option {
            QueryOption::HashGroup => "HASH GROUP",
            QueryOption::OrderGroup => "ORDER GROUP",
            QueryOption::ConcatUnion => "CONCAT UNION",
            QueryOption::HashUnion => "HASH UNION",
            QueryOption::MergeUnion => "MERGE UNION",
            QueryOption::LoopJoin => "LOOP JOIN",
            QueryOption::MergeJoin => "MERGE JOIN",
            QueryOption::HashJoin => "HASH JOIN",
            QueryOption::ExpandViews => "EXPAND VIEWS",
            QueryOption::Fast => "FAST",
            QueryOption::ForceOrder => "FORCE ORDER",
            QueryOption::KeepPlan => "KEEP PLAN",
            QueryOption::KeepFixedPlan => "KEEPFIXED PLAN",
            QueryOption::MaxDop => "MAXDOP",
            QueryOption::MaxRecursion => "MAXRECURSION",
            QueryOption::OptimizeForUnknown => "OPTIMIZE FOR UNKNOWN",
            QueryOption::Recompile => "RECOMPILE",
            QueryOption::RobustPlan => "ROBUST PLAN",
        };
        match (option.takes_value(), value) {
            (true, Some(v)) => Some(format!("{} {}", text, v)),
            (true, None) => None,
            (false, _) => Some(text.to_string()),
        }
    }

    fn variable(&self, name: &str) -> String {
        format!("@{}", name)
    }

    fn parameter_declaration(&self, name: &str, data_type: &str, direction: ParameterDirection) -> String {
        match direction {
            ParameterDirection::Input => format!("@{} {}", name, data_type),
            _ => format!("@{} {} OUTPUT", name, data_type),
        }
    }

    fn use_database(&self, database: &str) -> Option<String> {
        Some(format!("USE {}", self.quote_identifier(database)))
    }
}

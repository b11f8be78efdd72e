use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DynaError, DynaResult};

named_enum! {
    /// Provider-independent data types of constants, parameters and columns.
    pub enum DbType {
        AnsiString => "AnsiString",
        AnsiStringFixedLength => "AnsiStringFixedLength",
        String => "String",
        StringFixedLength => "StringFixedLength",
        Binary => "Binary",
        Boolean => "Boolean",
        Byte => "Byte",
        SByte => "SByte",
        Int16 => "Int16",
        Int32 => "Int32",
        Int64 => "Int64",
        UInt16 => "UInt16",
        UInt32 => "UInt32",
        UInt64 => "UInt64",
        Single => "Single",
        Double => "Double",
        Decimal => "Decimal",
        Currency => "Currency",
        VarNumeric => "VarNumeric",
        Date => "Date",
        Time => "Time",
        DateTime => "DateTime",
        DateTime2 => "DateTime2",
        DateTimeOffset => "DateTimeOffset",
        Guid => "Guid",
        Xml => "Xml",
        /// Untyped; the value decides.
        Object => "Object",
    }
}

impl Default for DbType {
    fn default() -> Self {
        DbType::Object
    }
}

impl DbType {
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DbType::Byte
                | DbType::SByte
                | DbType::Int16
                | DbType::Int32
                | DbType::Int64
                | DbType::UInt16
                | DbType::UInt32
                | DbType::UInt64
        )
    }

    pub fn is_string(&self) -> bool {
        matches!(
            self,
            DbType::AnsiString
                | DbType::AnsiStringFixedLength
                | DbType::String
                | DbType::StringFixedLength
                | DbType::Xml
        )
    }

    /// Unicode string types (N'...' literals on SQL Server).
    pub fn is_unicode(&self) -> bool {
        matches!(self, DbType::String | DbType::StringFixedLength)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            DbType::Date
                | DbType::Time
                | DbType::DateTime
                | DbType::DateTime2
                | DbType::DateTimeOffset
        )
    }
}

impl DbType {
    /// The kind of [`Value`] that [`Value::from_xml_text`] produces for this
    /// type, named by that value's natural type.
    pub fn text_value_kind(&self) -> DbType {
        match self {
            DbType::Boolean => DbType::Boolean,
            t if t.is_integer() => DbType::Int64,
            DbType::Single | DbType::Double => DbType::Double,
            DbType::Decimal | DbType::Currency | DbType::VarNumeric => DbType::Decimal,
            t if t.is_temporal() => DbType::DateTime,
            DbType::Guid => DbType::Guid,
            DbType::Binary => DbType::Binary,
            _ => DbType::String,
        }
    }
}

const DATETIME_XML_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A typed value carried by a constant or parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Explicit SQL NULL.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Exact numeric kept as its decimal text.
    Decimal(String),
    String(String),
    DateTime(NaiveDateTime),
    Guid(Uuid),
    Binary(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The type a value of this kind carries when no type was given.
    pub fn natural_db_type(&self) -> DbType {
        match self {
            Value::Null => DbType::Object,
            Value::Bool(_) => DbType::Boolean,
            Value::Int(_) => DbType::Int64,
            Value::Float(_) => DbType::Double,
            Value::Decimal(_) => DbType::Decimal,
            Value::String(_) => DbType::String,
            Value::DateTime(_) => DbType::DateTime,
            Value::Guid(_) => DbType::Guid,
            Value::Binary(_) => DbType::Binary,
        }
    }

    /// Text form written as element content in XML documents.
    pub fn to_xml_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::Decimal(d) => d.clone(),
            Value::String(s) => s.clone(),
            Value::DateTime(dt) => dt.format(DATETIME_XML_FORMAT).to_string(),
            Value::Guid(u) => u.to_string(),
            Value::Binary(bytes) => to_hex(bytes),
        }
    }

    /// Parse the XML text form of a value of the given type.
    pub fn from_xml_text(db_type: DbType, text: &str) -> DynaResult<Value> {
        let bad = |e: &dyn std::fmt::Display| {
            DynaError::format(format!("invalid {} value '{}': {}", db_type, text, e))
        };
        let value = match db_type {
            DbType::Boolean => Value::Bool(parse_bool(text).ok_or_else(|| bad(&"expected true or false"))?),
            t if t.is_integer() => Value::Int(text.trim().parse().map_err(|e| bad(&e))?),
            DbType::Single | DbType::Double => Value::Float(text.trim().parse().map_err(|e| bad(&e))?),
            DbType::Decimal | DbType::Currency | DbType::VarNumeric => {
                let trimmed = text.trim();
                trimmed.parse::<f64>().map_err(|e| bad(&e))?;
                Value::Decimal(trimmed.to_string())
            }
            t if t.is_temporal() => Value::DateTime(
                NaiveDateTime::parse_from_str(text.trim(), DATETIME_XML_FORMAT).map_err(|e| bad(&e))?,
            ),
            DbType::Guid => Value::Guid(Uuid::parse_str(text.trim()).map_err(|e| bad(&e))?),
            DbType::Binary => Value::Binary(from_hex(text.trim()).ok_or_else(|| bad(&"expected hex digits"))?),
            _ => Value::String(text.to_string()),
        };
        Ok(value)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::String(s) => write!(f, "'{}'", s),
            other => write!(f, "{}", other.to_xml_text()),
        }
    }
}

pub(crate) fn parse_bool(text: &str) -> Option<bool> {
    match text.trim() {
        t if t.eq_ignore_ascii_case("true") || t == "1" => Some(true),
        t if t.eq_ignore_ascii_case("false") || t == "0" => Some(false),
        _ => None,
    }
}

pub(crate) fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn from_hex(text: &str) -> Option<Vec<u8>> {
    if text.len() % 2 != 0 {
        return None;
    }
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(text.get(i..i + 2)?, 16).ok())
        .collect()
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Uuid> for Value {
    fn from(u: Uuid) -> Self {
        Value::Guid(u)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Binary(bytes)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// Column flag bitset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ColumnFlags(u8);

impl ColumnFlags {
    pub const NONE: ColumnFlags = ColumnFlags(0);
    pub const PRIMARY_KEY: ColumnFlags = ColumnFlags(1);
    /// Identity / auto-increment.
    pub const AUTO_ASSIGN: ColumnFlags = ColumnFlags(2);
    pub const NULLABLE: ColumnFlags = ColumnFlags(4);
    pub const HAS_DEFAULT: ColumnFlags = ColumnFlags(8);
    pub const UNIQUE: ColumnFlags = ColumnFlags(16);

    const NAMES: [(ColumnFlags, &'static str); 5] = [
        (ColumnFlags::PRIMARY_KEY, "PrimaryKey"),
        (ColumnFlags::AUTO_ASSIGN, "AutoAssign"),
        (ColumnFlags::NULLABLE, "Nullable"),
        (ColumnFlags::HAS_DEFAULT, "HasDefault"),
        (ColumnFlags::UNIQUE, "Unique"),
    ];

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, other: ColumnFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: ColumnFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: ColumnFlags) {
        self.0 &= !other.0;
    }
}

impl std::ops::BitOr for ColumnFlags {
    type Output = ColumnFlags;

    fn bitor(self, rhs: ColumnFlags) -> ColumnFlags {
        ColumnFlags(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for ColumnFlags {
    fn bitor_assign(&mut self, rhs: ColumnFlags) {
        self.0 |= rhs.0;
    }
}

impl std::fmt::Display for ColumnFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "None");
        }
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "{}", names.join(", "))
    }
}

impl std::str::FromStr for ColumnFlags {
    type Err = DynaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = ColumnFlags::NONE;
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty() && *p != "None") {
            let (flag, _) = Self::NAMES
                .iter()
                .find(|(_, name)| *name == part)
                .ok_or_else(|| DynaError::format(format!("unknown column flag '{}'", part)))?;
            flags.insert(*flag);
        }
        Ok(flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_xml_text() {
        let dt = NaiveDateTime::parse_from_str("2024-03-01T10:30:00", DATETIME_XML_FORMAT).unwrap();
        let value = Value::DateTime(dt);
        assert_eq!(value.to_xml_text(), "2024-03-01T10:30:00");
        assert_eq!(
            Value::from_xml_text(DbType::DateTime, &value.to_xml_text()).unwrap(),
            value
        );
        assert_eq!(
            Value::from_xml_text(DbType::Binary, "00ff10").unwrap(),
            Value::Binary(vec![0x00, 0xff, 0x10])
        );
    }

    #[test]
    fn test_value_bad_text() {
        assert!(Value::from_xml_text(DbType::Int32, "forty").is_err());
        assert!(Value::from_xml_text(DbType::Binary, "abc").is_err());
    }

    #[test]
    fn test_column_flags() {
        let mut flags = ColumnFlags::PRIMARY_KEY | ColumnFlags::AUTO_ASSIGN;
        assert_eq!(flags.to_string(), "PrimaryKey, AutoAssign");
        assert_eq!("PrimaryKey, AutoAssign".parse::<ColumnFlags>().unwrap(), flags);
        flags.remove(ColumnFlags::PRIMARY_KEY);
        assert!(!flags.contains(ColumnFlags::PRIMARY_KEY));
        assert_eq!("None".parse::<ColumnFlags>().unwrap(), ColumnFlags::NONE);
    }
}

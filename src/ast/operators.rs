//! Operator and option vocabularies.
//!
//! These are provider independent. The statement builder maps each value to
//! dialect text and fails the render when a value has no mapping.

named_enum! {
    /// Arithmetic, bitwise and string operators for [`Calc`](crate::ast::Calc).
    pub enum BinaryOp {
        /// Addition (+)
        Add => "Add",
        /// Subtraction (-)
        Subtract => "Subtract",
        /// Multiplication (*)
        Multiply => "Multiply",
        /// Division (/)
        Divide => "Divide",
        /// Modulo (%)
        Modulo => "Modulo",
        /// Bitwise and (&)
        BitwiseAnd => "BitwiseAnd",
        /// Bitwise or (|)
        BitwiseOr => "BitwiseOr",
        /// String concatenation (|| or +)
        Concat => "Concat",
    }
}

impl Default for BinaryOp {
    fn default() -> Self {
        BinaryOp::Add
    }
}

named_enum! {
    /// Logical operators joining two predicates.
    pub enum BooleanOp {
        And => "And",
        Or => "Or",
        /// Exclusive or. Only some dialects can express it.
        XOr => "XOr",
    }
}

named_enum! {
    /// Comparison operators.
    pub enum Compare {
        /// Equal (=)
        Equals => "Equals",
        /// Not equal (<>)
        NotEqual => "NotEqual",
        /// Less than (<)
        LessThan => "LessThan",
        /// Less than or equal (<=)
        LessThanEqual => "LessThanEqual",
        /// Greater than (>)
        GreaterThan => "GreaterThan",
        /// Greater than or equal (>=)
        GreaterThanEqual => "GreaterThanEqual",
        /// LIKE pattern match
        Like => "Like",
        /// NOT LIKE pattern match
        NotLike => "NotLike",
        /// IS (used with NULL)
        Is => "Is",
        /// IS NOT (used with NULL)
        IsNot => "IsNot",
    }
}

named_enum! {
    /// Every operator token a clause can ask the builder to write.
    pub enum Operator {
        Equals => "Equals",
        NotEqual => "NotEqual",
        LessThan => "LessThan",
        LessThanEqual => "LessThanEqual",
        GreaterThan => "GreaterThan",
        GreaterThanEqual => "GreaterThanEqual",
        Like => "Like",
        NotLike => "NotLike",
        Is => "Is",
        IsNot => "IsNot",
        In => "In",
        NotIn => "NotIn",
        Between => "Between",
        /// The AND between the bounds of a BETWEEN.
        BetweenAnd => "BetweenAnd",
        Exists => "Exists",
        NotExists => "NotExists",
        Add => "Add",
        Subtract => "Subtract",
        Multiply => "Multiply",
        Divide => "Divide",
        Modulo => "Modulo",
        BitwiseAnd => "BitwiseAnd",
        BitwiseOr => "BitwiseOr",
        Concat => "Concat",
        And => "And",
        Or => "Or",
        XOr => "XOr",
        Not => "Not",
        /// Assignment in UPDATE SET and script SET.
        Assign => "Assign",
    }
}

impl Operator {
    /// Returns the ANSI SQL token for this operator.
    /// Dialects override the handful that differ (concatenation, XOR, ...).
    pub fn sql_symbol(&self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::NotEqual => "<>",
            Operator::LessThan => "<",
            Operator::LessThanEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanEqual => ">=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::Is => "IS",
            Operator::IsNot => "IS NOT",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Between => "BETWEEN",
            Operator::BetweenAnd => "AND",
            Operator::Exists => "EXISTS",
            Operator::NotExists => "NOT EXISTS",
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulo => "%",
            Operator::BitwiseAnd => "&",
            Operator::BitwiseOr => "|",
            Operator::Concat => "||",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::XOr => "XOR",
            Operator::Not => "NOT",
            Operator::Assign => "=",
        }
    }

    /// Prefix operators are written before their operand, without a leading space.
    pub fn is_prefix(&self) -> bool {
        matches!(self, Operator::Not | Operator::Exists | Operator::NotExists)
    }
}

impl From<BinaryOp> for Operator {
    fn from(op: BinaryOp) -> Self {
        match op {
            BinaryOp::Add => Operator::Add,
            BinaryOp::Subtract => Operator::Subtract,
            BinaryOp::Multiply => Operator::Multiply,
            BinaryOp::Divide => Operator::Divide,
            BinaryOp::Modulo => Operator::Modulo,
            BinaryOp::BitwiseAnd => Operator::BitwiseAnd,
            BinaryOp::BitwiseOr => Operator::BitwiseOr,
            BinaryOp::Concat => Operator::Concat,
        }
    }
}

impl From<BooleanOp> for Operator {
    fn from(op: BooleanOp) -> Self {
        match op {
            BooleanOp::And => Operator::And,
            BooleanOp::Or => Operator::Or,
            BooleanOp::XOr => Operator::XOr,
        }
    }
}

impl From<Compare> for Operator {
    fn from(op: Compare) -> Self {
        match op {
            Compare::Equals => Operator::Equals,
            Compare::NotEqual => Operator::NotEqual,
            Compare::LessThan => Operator::LessThan,
            Compare::LessThanEqual => Operator::LessThanEqual,
            Compare::GreaterThan => Operator::GreaterThan,
            Compare::GreaterThanEqual => Operator::GreaterThanEqual,
            Compare::Like => Operator::Like,
            Compare::NotLike => Operator::NotLike,
            Compare::Is => Operator::Is,
            Compare::IsNot => Operator::IsNot,
        }
    }
}

named_enum! {
    /// Join type.
    pub enum JoinType {
        /// Plain JOIN
        Join => "Join",
        InnerJoin => "InnerJoin",
        LeftOuter => "LeftOuter",
        RightOuter => "RightOuter",
        FullOuter => "FullOuter",
    }
}

named_enum! {
    /// Sort order of an ORDER BY item or index column.
    pub enum Order {
        /// No explicit direction.
        Default => "Default",
        Ascending => "Ascending",
        Descending => "Descending",
    }
}

impl Default for Order {
    fn default() -> Self {
        Order::Default
    }
}

named_enum! {
    /// Aggregate functions.
    pub enum AggregateFunction {
        Count => "Count",
        Sum => "Sum",
        Avg => "Avg",
        Min => "Min",
        Max => "Max",
    }
}

named_enum! {
    /// How the value of a [`Top`](crate::ast::Top) restricts the result set.
    pub enum TopType {
        /// First n rows.
        Count => "Count",
        /// First n percent of rows.
        Percent => "Percent",
        /// n rows after skipping an offset.
        Range => "Range",
    }
}

named_enum! {
    /// Existence guard for create and drop statements.
    pub enum ExistState {
        /// No guard.
        Unknown => "Unknown",
        /// Only act if the object exists (DROP ... IF EXISTS).
        Exists => "Exists",
        /// Only act if the object does not exist (CREATE ... IF NOT EXISTS).
        NotExists => "NotExists",
    }
}

impl Default for ExistState {
    fn default() -> Self {
        ExistState::Unknown
    }
}

named_enum! {
    /// Referential action of a foreign key.
    pub enum FkAction {
        /// Not specified; nothing is rendered.
        Undefined => "Undefined",
        NoAction => "NoAction",
        Cascade => "Cascade",
        SetNull => "SetNull",
        SetDefault => "SetDefault",
    }
}

impl Default for FkAction {
    fn default() -> Self {
        FkAction::Undefined
    }
}

named_enum! {
    /// Direction of a parameter.
    pub enum ParameterDirection {
        Input => "Input",
        Output => "Output",
        InputOutput => "InputOutput",
        ReturnValue => "ReturnValue",
    }
}

impl Default for ParameterDirection {
    fn default() -> Self {
        ParameterDirection::Input
    }
}

named_enum! {
    /// Schema object kinds that can be created and dropped.
    pub enum SchemaObjectType {
        Table => "Table",
        View => "View",
        Index => "Index",
        Sequence => "Sequence",
        StoredProcedure => "StoredProcedure",
    }
}

named_enum! {
    /// Table-level constraint kinds.
    pub enum ConstraintType {
        PrimaryKey => "PrimaryKey",
        ForeignKey => "ForeignKey",
    }
}

named_enum! {
    /// Table hints (WITH (...) after a table reference).
    pub enum TableHint {
        NoLock => "NoLock",
        ReadCommitted => "ReadCommitted",
        ReadUncommitted => "ReadUncommitted",
        RepeatableRead => "RepeatableRead",
        Serializable => "Serializable",
        HoldLock => "HoldLock",
        UpdLock => "UpdLock",
        RowLock => "RowLock",
        PagLock => "PagLock",
        TabLock => "TabLock",
        TabLockX => "TabLockX",
        XLock => "XLock",
        NoWait => "NoWait",
        ReadPast => "ReadPast",
        /// INDEX(name, ...); the index names are its options.
        Index => "Index",
        ForceSeek => "ForceSeek",
        ForceScan => "ForceScan",
        NoExpand => "NoExpand",
    }
}

named_enum! {
    /// Query options (OPTION (...) at the end of a statement).
    pub enum QueryOption {
        HashGroup => "HashGroup",
        OrderGroup => "OrderGroup",
        ConcatUnion => "ConcatUnion",
        HashUnion => "HashUnion",
        MergeUnion => "MergeUnion",
        LoopJoin => "LoopJoin",
        MergeJoin => "MergeJoin",
        HashJoin => "HashJoin",
        ExpandViews => "ExpandViews",
        /// FAST n
        Fast => "Fast",
        ForceOrder => "ForceOrder",
        KeepPlan => "KeepPlan",
        KeepFixedPlan => "KeepFixedPlan",
        /// MAXDOP n
        MaxDop => "MaxDop",
        /// MAXRECURSION n
        MaxRecursion => "MaxRecursion",
        OptimizeForUnknown => "OptimizeForUnknown",
        Recompile => "Recompile",
        RobustPlan => "RobustPlan",
    }
}

impl QueryOption {
    /// Options that carry a numeric argument.
    pub fn takes_value(&self) -> bool {
        matches!(
            self,
            QueryOption::Fast | QueryOption::MaxDop | QueryOption::MaxRecursion
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for op in Operator::ALL {
            assert_eq!(op.as_str().parse::<Operator>().unwrap(), *op);
        }
        for hint in TableHint::ALL {
            assert_eq!(hint.to_string().parse::<TableHint>().unwrap(), *hint);
        }
    }

    #[test]
    fn test_unknown_name() {
        assert!("Sideways".parse::<JoinType>().is_err());
    }

    #[test]
    fn test_operator_conversions() {
        assert_eq!(Operator::from(BinaryOp::Modulo).sql_symbol(), "%");
        assert_eq!(Operator::from(Compare::NotEqual).sql_symbol(), "<>");
        assert_eq!(Operator::from(BooleanOp::Or).sql_symbol(), "OR");
    }
}

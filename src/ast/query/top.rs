use crate::ast::operators::TopType;

/// Row limit of a select: the first n rows, the first n percent, or n rows
/// after an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Top {
    top_type: TopType,
    count: i64,
    offset: i64,
}

impl Top {
    pub fn first(count: i64) -> Self {
        Self {
            top_type: TopType::Count,
            count,
            offset: 0,
        }
    }

    pub fn percent(percent: i64) -> Self {
        Self {
            top_type: TopType::Percent,
            count: percent,
            offset: 0,
        }
    }

    pub fn range(offset: i64, count: i64) -> Self {
        Self {
            top_type: TopType::Range,
            count,
            offset,
        }
    }

    pub(crate) fn from_parts(top_type: TopType, count: i64, offset: i64) -> Self {
        Self {
            top_type,
            count,
            offset,
        }
    }

    pub fn top_type(&self) -> TopType {
        self.top_type
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

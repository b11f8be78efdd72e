//! Queries and data modification statements.

mod delete;
mod insert;
mod select;
mod subquery;
mod top;
mod update;

pub use delete::Delete;
pub use insert::Insert;
pub use select::Select;
pub use subquery::SubQuery;
pub use top::Top;
pub use update::Update;

/// Database Module
///
/// The database layer is split into focused submodules:
/// - **Connection** (`connection.rs`): opens one connection per call
/// - **Query** (`query.rs`): renders parameterized statements from table/column/condition input
/// - **Executor** (`executor.rs`): binds, executes and wraps mutations in a transaction
/// - **Row** (`row.rs`): maps fetched rows into column/text pairs
/// - **Raw** (`raw.rs`): helpers that run caller-written SQL text
///
/// ## Error Handling
///
/// All operations return the crate-wide `CrudError`; `CrudError::kind()`
/// tells connection, statement and zero-effect failures apart.
pub mod connection;
pub mod executor;
pub mod query;
pub mod raw;
pub mod row;

pub use connection::*;
pub use executor::*;
pub use query::*;
pub use raw::QueryResult;
pub use row::*;

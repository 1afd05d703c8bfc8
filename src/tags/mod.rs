/// Tag search domain layer: validation, query building, pagination.
pub mod errors;
pub mod paginate;
pub mod query;
pub mod request;

pub use errors::{SearchError, USAGE_EXAMPLES};
pub use paginate::{BatchProgress, Pager};
pub use query::build_query;
pub use request::{SearchInput, SearchRequest};

/// The tag search command.
pub mod search;

pub use search::run;

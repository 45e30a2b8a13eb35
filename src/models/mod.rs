pub mod connection;
pub mod criteria;
pub mod saved_query;
pub mod settings;

pub use connection::*;
pub use criteria::*;
pub use saved_query::*;
pub use settings::*;

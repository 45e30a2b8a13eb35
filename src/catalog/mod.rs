pub mod facets;
pub mod filter;
pub mod selection;
pub mod session;

pub use facets::Facets;
pub use selection::{Selection, SelectionEvent};
pub use session::{CatalogSession, DeleteIntent, DeleteOutcome, Notification};

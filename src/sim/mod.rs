pub mod document;
pub mod driver;
pub mod report;

pub use document::{DocumentInstance, Outcome, documents_from_columns};
pub use driver::{Sim, simulate};
pub use report::{Report, top_k};

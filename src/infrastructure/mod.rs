pub mod document;

pub use document::{Node, SheetDocument, PART_SEPARATOR};

pub mod sheet_client;

pub use sheet_client::{DirectRoute, ProxyRoute, SheetClient, SheetSource};

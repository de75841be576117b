pub mod connection;

pub use connection::{fetch_page_html, BrowserRoute, BrowserSession};

// Analysis history: append-only store plus the dashboard read endpoints.

pub mod handlers;
pub mod store;

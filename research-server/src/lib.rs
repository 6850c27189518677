pub mod http;
pub mod router;
pub mod server;

pub use router::AppContext;

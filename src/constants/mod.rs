mod network;
pub use network::*;

mod stellar_transaction;
pub use stellar_transaction::*;

mod exchange;
pub use exchange::*;

mod http_client;
pub use http_client::*;

mod logging;
pub use logging::*;

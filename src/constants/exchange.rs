//! Constants for the exchange-facing API: streaming, aggregation and reserves.

/// Reconnect delay when the stream never sent a `retry:` hint, in milliseconds.
pub const DEFAULT_STREAM_RETRY_MS: u64 = 1_000;

/// Cursor value that starts a stream at the current ledger.
pub const STREAM_CURSOR_NOW: &str = "now";

/// Keep-alive payloads Horizon emits on open and close of an event stream.
pub const STREAM_HELLO_PAYLOAD: &str = "\"hello\"";
pub const STREAM_BYEBYE_PAYLOAD: &str = "\"byebye\"";

/// Longest unterminated line an event stream may buffer, in bytes.
pub const STREAM_MAX_LINE_BYTES: usize = 1024 * 1024;

/// Trade aggregation resolutions, in milliseconds.
pub const INTERVAL_ONE_MINUTE_MS: i64 = 60_000;
pub const INTERVAL_FIVE_MINUTES_MS: i64 = 300_000;
pub const INTERVAL_FIFTEEN_MINUTES_MS: i64 = 900_000;

/// Upper bound on records requested per page.
pub const HORIZON_MAX_PAGE_LIMIT: u32 = 100;
/// Default order book depth.
pub const DEFAULT_ORDER_BOOK_LIMIT: u32 = 20;

/// Base reserve per ledger entry, in stroops (0.5 units).
pub const DEFAULT_BASE_RESERVE_STROOPS: i64 = 5_000_000;
/// Reserve units every account carries: the account, its native balance
/// line and its master signer.
pub const DEFAULT_RESERVE_BASE_ENTRIES: u32 = 3;
/// Entries held back for offers not yet reflected in account state.
pub const DEFAULT_OFFER_HEADROOM: u32 = 1;
/// Extra stroops on top of the reserve so the balance stays strictly above it.
pub const DEFAULT_RESERVE_FEE_BUFFER_STROOPS: i64 = 1;

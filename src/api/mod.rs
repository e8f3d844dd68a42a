//! Transaction lookup API subsystem.
//!
//! # Data Flow
//! ```text
//! transaction id
//!     → client.rs (rate limit slot, HTTP GET, envelope decode, retries)
//!     → types.rs (envelope / payload / error types)
//!     → normalize.rs (token transfer vs. native value, decimal scaling)
//!     → QueryResult { transaction_id, normalized_amount, status }
//! ```
//!
//! # Design Decisions
//! - One client instance owns the transport and the limiter
//! - Amounts are `Decimal` end to end; no binary floating point
//! - The API key travels only in the query string and is never logged

pub mod client;
pub mod normalize;
pub mod types;

pub use client::QueryClient;
pub use normalize::{normalize, normalize_token, parse_decimal};
pub use types::{
    AmountParseError, ClientConfigError, QueryError, QueryResult, QueryStatus, RawTransferRecord,
    TokenTransfer,
};

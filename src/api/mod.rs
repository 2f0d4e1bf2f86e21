// ============================================================================
// Module : api
// ============================================================================
// Client API pour récupérer la cotation du Bitcoin (CoinGecko)
// ============================================================================

pub mod coingecko; // Client API CoinGecko
pub mod error;     // FetchFailed

// Re-export des éléments principaux
pub use coingecko::{parse_simple_price, CoinGeckoClient, PriceSource};
pub use error::FetchFailed;

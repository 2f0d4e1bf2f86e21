// ============================================================================
// Configuration : constantes de l'application
// ============================================================================
// Pas de fichier de config, pas de flags CLI : tout est fixé à la compilation.
// Seul RUST_LOG (voir main.rs) permet d'ajuster le niveau de log.
//
// CONCEPT RUST : const
// - Valeur évaluée à la compilation, inlinée à chaque usage
// - Duration::from_secs est une const fn, utilisable ici
// ============================================================================

use std::time::Duration;

/// Endpoint CoinGecko "simple/price"
pub const PRICE_ENDPOINT: &str = "https://api.coingecko.com/api/v3/simple/price";

/// Identifiant de l'actif suivi (clé attendue dans la réponse JSON)
pub const ASSET_ID: &str = "bitcoin";

/// Devise de cotation
pub const VS_CURRENCY: &str = "usd";

/// Période du timer de rafraîchissement (60 000 ms)
pub const REFRESH_PERIOD: Duration = Duration::from_secs(60);

/// Nombre maximum de points conservés dans la série
pub const SERIES_CAPACITY: usize = 24;

/// Message affiché à l'utilisateur quand un cycle échoue
pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch Bitcoin data";

/// User-Agent envoyé à l'API
pub const USER_AGENT: &str = concat!("btcdash/", env!("CARGO_PKG_VERSION"));

/// Paramètres du sampling controller
///
/// CONCEPT : Regrouper les constantes dans une struct
/// - En production on utilise toujours SamplerConfig::default()
/// - Les tests construisent une config avec une période plus courte
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Intervalle entre deux cycles
    pub refresh_period: Duration,

    /// Taille de la fenêtre glissante
    pub series_capacity: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            refresh_period: REFRESH_PERIOD,
            series_capacity: SERIES_CAPACITY,
        }
    }
}

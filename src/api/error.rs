// ============================================================================
// Erreur du Price Fetcher
// ============================================================================
// Une seule sorte d'erreur traverse la frontière du fetcher : FetchFailed.
// Réseau, statut HTTP, JSON invalide, clé manquante : tout finit ici.
// La raison n'est gardée que pour les logs.
//
// CONCEPT RUST : thiserror
// - #[derive(Error)] implémente std::error::Error
// - #[error("...")] génère Display
// ============================================================================

use thiserror::Error;

/// Échec d'une récupération de cotation
#[derive(Debug, Error)]
#[error("fetch failed: {reason}")]
pub struct FetchFailed {
    /// Détail pour les logs (jamais montré à l'utilisateur)
    pub reason: String,
}

impl FetchFailed {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

// CONCEPT RUST : From
// - Permet d'utiliser ? directement sur les erreurs reqwest et serde_json
impl From<reqwest::Error> for FetchFailed {
    fn from(err: reqwest::Error) -> Self {
        Self::new(format!("transport: {}", err))
    }
}

impl From<serde_json::Error> for FetchFailed {
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("invalid body: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_reason() {
        let err = FetchFailed::new("HTTP 503");
        assert_eq!(err.to_string(), "fetch failed: HTTP 503");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: FetchFailed = json_err.into();
        assert!(err.reason.starts_with("invalid body"));
    }
}

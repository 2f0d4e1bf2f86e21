// ============================================================================
// API Client : CoinGecko
// ============================================================================
// Récupère le prix du Bitcoin en USD et sa variation sur 24h
//
// CONCEPTS RUST AVANCÉS :
// 1. async/await : programmation asynchrone (non-bloquante)
// 2. Trait async (async-trait) : le controller dépend de PriceSource,
//    pas du client HTTP concret (les tests injectent une fausse source)
// 3. Serde : désérialisation JSON
// ============================================================================

use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

use crate::api::FetchFailed;
use crate::config::{ASSET_ID, PRICE_ENDPOINT, USER_AGENT, VS_CURRENCY};
use crate::models::Quote;

// ============================================================================
// Trait PriceSource
// ============================================================================
// CONCEPT RUST : Send + Sync
// - La source est partagée (Arc) entre la tâche timer et les tâches de fetch
// - Une seule tentative par appel, pas de retry, pas de cache
// ============================================================================

/// Source de cotations
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Récupère la cotation courante
    async fn fetch_quote(&self) -> Result<Quote, FetchFailed>;
}

// ============================================================================
// Structures pour parser la réponse JSON de CoinGecko
// ============================================================================
// Forme attendue :
// { "bitcoin": { "usd": 50000, "usd_24h_change": 2.5 } }
// ============================================================================

/// Entrée d'un actif dans la réponse "simple/price"
#[derive(Debug, Deserialize)]
struct AssetPrice {
    usd: f64,
    usd_24h_change: f64,
}

/// Client HTTP CoinGecko
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: reqwest::Client,
    url: String,
}

impl CoinGeckoClient {
    /// Crée le client
    ///
    /// Aucun timeout explicite : on garde celui par défaut du transport.
    pub fn new() -> anyhow::Result<Self> {
        Self::with_url(build_price_url())
    }

    /// Crée un client qui interroge une URL complète donnée
    ///
    /// Utilisé par new() avec l'URL CoinGecko, et par les tests avec un
    /// serveur local.
    pub fn with_url(url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Effectue la requête et parse la réponse, sans logger l'erreur
    async fn request_quote(&self) -> Result<Quote, FetchFailed> {
        debug!(url = %self.url, "Sending HTTP request to CoinGecko");
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        // Vérifie que la réponse est un succès HTTP (200-299)
        if !status.is_success() {
            return Err(FetchFailed::new(format!("HTTP {}", status)));
        }

        let body = response.text().await?;
        parse_simple_price(&body, ASSET_ID)
    }
}

#[async_trait]
impl PriceSource for CoinGeckoClient {
    /// CONCEPT RUST : #[instrument]
    /// - Ouvre un span, tous les logs internes portent l'asset
    #[instrument(skip(self), fields(asset = ASSET_ID))]
    async fn fetch_quote(&self) -> Result<Quote, FetchFailed> {
        match self.request_quote().await {
            Ok(quote) => {
                info!(price = quote.price, change = quote.change_percent, "Fetched Bitcoin quote");
                Ok(quote)
            }
            Err(e) => {
                // Diagnostic avant de remonter l'erreur à l'appelant
                error!(error = %e, "Error fetching bitcoin data");
                Err(e)
            }
        }
    }
}

/// Construit l'URL "simple/price" pour l'actif et la devise configurés
fn build_price_url() -> String {
    format!(
        "{}?ids={}&vs_currencies={}&include_24hr_change=true",
        PRICE_ENDPOINT, ASSET_ID, VS_CURRENCY
    )
}

/// Extrait la cotation d'un corps de réponse "simple/price"
///
/// CONCEPT : Parse en deux temps
/// - D'abord un objet générique (HashMap<String, Value>)
/// - Puis seulement l'entrée de l'actif demandé, typée
/// - Une clé absente ou une entrée mal formée donne FetchFailed
pub fn parse_simple_price(body: &str, asset_id: &str) -> Result<Quote, FetchFailed> {
    let mut assets: HashMap<String, serde_json::Value> = serde_json::from_str(body)?;

    let entry = assets
        .remove(asset_id)
        .ok_or_else(|| FetchFailed::new(format!("Invalid API response: missing '{}'", asset_id)))?;

    let price: AssetPrice = serde_json::from_value(entry)?;
    Ok(Quote::new(price.usd, price.usd_24h_change))
}

// ============================================================================
// Tests unitaires
// ============================================================================

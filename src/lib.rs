// ============================================================================
// btcdash - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;        // Client CoinGecko (Price Fetcher)
pub mod app;        // État de l'application
pub mod config;     // Constantes (endpoint, période, capacité)
pub mod controller; // Sampling controller (timer + état)
pub mod models;     // Structures de données
pub mod ui;         // Interface utilisateur

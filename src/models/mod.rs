// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod quote;       // Cotation (prix + variation 24h)
pub mod price_point; // Un échantillon horodaté
pub mod series;      // Fenêtre glissante bornée

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use btcdash::models::quote::Quote;
// On peut faire : use btcdash::models::Quote;
pub use quote::{format_usd, Quote};
pub use price_point::PricePoint;
pub use series::PriceSeries;

// ============================================================================
// Structure : PricePoint
// ============================================================================
// Une observation : heure locale de l'échantillon + prix USD
//
// CONCEPT RUST : DateTime<Local>
// - Type chrono avec le fuseau horaire de la machine
// - L'affichage se fait à la demande (label), la donnée reste typée
// ============================================================================

use chrono::{DateTime, Local};

/// Point de la série de prix, immuable une fois créé
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    /// Moment où le prix a été reçu
    pub recorded_at: DateTime<Local>,

    /// Prix en USD
    pub price: f64,
}

impl PricePoint {
    pub fn new(recorded_at: DateTime<Local>, price: f64) -> Self {
        Self { recorded_at, price }
    }

    /// Heure formatée pour l'axe X (ex: "14:03:27")
    pub fn time_label(&self) -> String {
        self.recorded_at.format("%H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_time_label() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 3, 27).unwrap();
        let point = PricePoint::new(at, 50_000.0);
        assert_eq!(point.time_label(), "14:03:27");
        assert_eq!(point.price, 50_000.0);
    }
}

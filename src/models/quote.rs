// ============================================================================
// Structure : Quote
// ============================================================================
// Dernier instantané connu : prix USD + variation sur 24h en pourcentage
//
// CONCEPTS RUST :
// 1. #[derive(...)] : Copy car la structure ne contient que deux f64
// 2. Remplacée en bloc à chaque succès, jamais modifiée champ par champ
// ============================================================================

/// Cotation du Bitcoin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    /// Prix en USD
    pub price: f64,

    /// Variation sur 24h en pourcentage (signée)
    pub change_percent: f64,
}

impl Quote {
    /// Crée une nouvelle cotation
    pub fn new(price: f64, change_percent: f64) -> Self {
        Self {
            price,
            change_percent,
        }
    }

    /// Retourne true si la variation est positive ou nulle
    pub fn is_positive(&self) -> bool {
        self.change_percent >= 0.0
    }

    /// Flèche directionnelle selon le signe de la variation
    pub fn arrow(&self) -> &'static str {
        if self.is_positive() {
            "↑"
        } else {
            "↓"
        }
    }

    /// Prix formaté avec séparateurs de milliers (ex: "50,123.45")
    pub fn display_price(&self) -> String {
        format_usd(self.price)
    }

    /// Variation en valeur absolue avec flèche (ex: "↓ 1.23%", "↑ 2.5%")
    ///
    /// Arrondie à 2 décimales, zéros de fin retirés.
    pub fn display_change(&self) -> String {
        let rounded = format!("{:.2}", self.change_percent.abs());
        let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
        format!("{} {}%", self.arrow(), trimmed)
    }
}

/// Formate un montant avec séparateurs de milliers et au plus 2 décimales
///
/// CONCEPT : Arithmétique entière sur les centimes
/// - On arrondit une seule fois en centimes, puis tout est exact
/// - Les décimales nulles sont omises ("50,000" plutôt que "50,000.00")
pub fn format_usd(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let units = cents / 100;
    let fraction = cents % 100;

    // Groupe les chiffres par trois en partant de la droite
    let digits = units.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };

    match fraction {
        0 => format!("{}{}", sign, grouped),
        f if f % 10 == 0 => format!("{}{}.{}", sign, grouped, f / 10),
        f => format!("{}{}.{:02}", sign, grouped, f),
    }
}

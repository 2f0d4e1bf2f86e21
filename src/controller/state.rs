// ============================================================================
// ControllerState : l'état observable du dashboard
// ============================================================================
// Un seul écrivain : le propriétaire de l'état (la boucle UI), qui applique
// les ControllerEvent reçus de la tâche de sampling.
//
// États implicites (dans les flags) :
// - Idle-with-data : loading=false, error=None
// - Refreshing     : loading=true, les anciennes données restent visibles
// - Failed         : loading=false, error=Some(..), quote/série inchangées
//
// CONCEPT : Identifiants de cycle monotones
// - Chaque cycle reçoit un id strictement croissant
// - Un résultat dont l'id n'est pas plus récent que le dernier cycle réglé
//   est ignoré : une réponse tardive n'écrase jamais une donnée plus récente
// ============================================================================

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use crate::config::FETCH_ERROR_MESSAGE;
use crate::models::{PricePoint, PriceSeries, Quote};

/// Messages envoyés par la tâche de sampling au propriétaire de l'état
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// Un cycle de rafraîchissement démarre
    Started { cycle: u64 },

    /// Le fetch du cycle a réussi
    Succeeded {
        cycle: u64,
        quote: Quote,
        at: DateTime<Local>,
    },

    /// Le fetch du cycle a échoué
    Failed { cycle: u64 },
}

impl ControllerEvent {
    pub fn cycle(&self) -> u64 {
        match self {
            ControllerEvent::Started { cycle }
            | ControllerEvent::Succeeded { cycle, .. }
            | ControllerEvent::Failed { cycle } => *cycle,
        }
    }
}

/// État du sampling controller
#[derive(Debug, Clone)]
pub struct ControllerState {
    /// Fenêtre glissante des derniers prix
    pub series: PriceSeries,

    /// Dernière cotation reçue
    pub quote: Option<Quote>,

    /// Un fetch est en cours
    pub loading: bool,

    /// Message d'erreur pour l'utilisateur
    pub error: Option<String>,

    /// Heure du dernier succès
    pub last_updated: Option<DateTime<Local>>,

    latest_started: u64,
    latest_settled: u64,
}

impl ControllerState {
    /// État initial : loading=true, série vide, pas de cotation, pas d'erreur
    pub fn new(series_capacity: usize) -> Self {
        Self {
            series: PriceSeries::with_capacity(series_capacity),
            quote: None,
            loading: true,
            error: None,
            last_updated: None,
            latest_started: 0,
            latest_settled: 0,
        }
    }

    /// Premier chargement : rien à afficher encore
    pub fn is_first_load(&self) -> bool {
        self.loading && self.series.is_empty()
    }

    /// Applique un événement, retourne false s'il a été ignoré
    ///
    /// CONCEPT RUST : match exhaustif
    /// - Chaque transition de la machine à états est un bras du match
    pub fn apply(&mut self, event: ControllerEvent) -> bool {
        match event {
            ControllerEvent::Started { cycle } => {
                self.latest_started = self.latest_started.max(cycle);
                self.loading = true;
                self.error = None;
                debug!(cycle, "Refresh cycle started");
                true
            }
            ControllerEvent::Succeeded { cycle, quote, at } => {
                if !self.settle(cycle) {
                    return false;
                }
                self.quote = Some(quote);
                if let Some(evicted) = self.series.push(PricePoint::new(at, quote.price)) {
                    debug!(evicted_price = evicted.price, "Evicted oldest point");
                }
                self.error = None;
                self.last_updated = Some(at);
                debug!(cycle, price = quote.price, points = self.series.len(), "Quote applied");
                true
            }
            ControllerEvent::Failed { cycle } => {
                if !self.settle(cycle) {
                    return false;
                }
                self.error = Some(FETCH_ERROR_MESSAGE.to_string());
                debug!(cycle, "Refresh cycle failed");
                true
            }
        }
    }

    /// Marque un cycle comme réglé, false si un cycle plus récent l'a déjà été
    fn settle(&mut self, cycle: u64) -> bool {
        if cycle <= self.latest_settled {
            warn!(cycle, latest_settled = self.latest_settled, "Discarding stale cycle result");
            return false;
        }
        self.latest_settled = cycle;
        self.latest_started = self.latest_started.max(cycle);
        // Reste en chargement tant qu'un cycle plus récent est en vol
        self.loading = self.latest_started > self.latest_settled;
        true
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SERIES_CAPACITY;

    fn succeeded(cycle: u64, price: f64, change: f64) -> ControllerEvent {
        ControllerEvent::Succeeded {
            cycle,
            quote: Quote::new(price, change),
            at: Local::now(),
        }
    }

    /// Un cycle complet : Started puis le résultat
    fn run_cycle(state: &mut ControllerState, cycle: u64, outcome: Option<(f64, f64)>) {
        state.apply(ControllerEvent::Started { cycle });
        match outcome {
            Some((price, change)) => state.apply(succeeded(cycle, price, change)),
            None => state.apply(ControllerEvent::Failed { cycle }),
        };
    }

    #[test]
    fn test_initial_state() {
        let state = ControllerState::new(SERIES_CAPACITY);
        assert!(state.loading);
        assert!(state.series.is_empty());
        assert!(state.quote.is_none());
        assert!(state.error.is_none());
        assert!(state.is_first_load());
    }

    #[test]
    fn test_single_success() {
        let mut state = ControllerState::new(SERIES_CAPACITY);
        run_cycle(&mut state, 1, Some((50_000.0, 2.5)));

        assert_eq!(state.quote, Some(Quote::new(50_000.0, 2.5)));
        assert_eq!(state.series.len(), 1);
        assert_eq!(state.series.last().unwrap().price, 50_000.0);
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(state.last_updated.is_some());
    }

    #[test]
    fn test_failure_keeps_data() {
        let mut state = ControllerState::new(SERIES_CAPACITY);
        run_cycle(&mut state, 1, Some((50_000.0, 2.5)));
        run_cycle(&mut state, 2, None);

        assert_eq!(state.error.as_deref(), Some("Failed to fetch Bitcoin data"));
        assert_eq!(state.quote, Some(Quote::new(50_000.0, 2.5)));
        assert_eq!(state.series.len(), 1);
        assert!(!state.loading);
    }

    #[test]
    fn test_failure_on_first_load() {
        let mut state = ControllerState::new(SERIES_CAPACITY);
        run_cycle(&mut state, 1, None);

        assert!(state.error.is_some());
        assert!(state.quote.is_none());
        assert!(state.series.is_empty());
        assert!(!state.is_first_load());
    }

    #[test]
    fn test_error_is_not_sticky() {
        let mut state = ControllerState::new(SERIES_CAPACITY);
        run_cycle(&mut state, 1, None);

        // Le démarrage du cycle suivant efface déjà l'erreur
        state.apply(ControllerEvent::Started { cycle: 2 });
        assert!(state.error.is_none());
        assert!(state.loading);

        state.apply(succeeded(2, 51_000.0, -0.4));
        assert!(state.error.is_none());
        assert_eq!(state.series.len(), 1);
        assert_eq!(state.quote.unwrap().change_percent, -0.4);
    }

    #[test]
    fn test_refreshing_keeps_previous_data_visible() {
        let mut state = ControllerState::new(SERIES_CAPACITY);
        run_cycle(&mut state, 1, Some((50_000.0, 2.5)));

        state.apply(ControllerEvent::Started { cycle: 2 });
        assert!(state.loading);
        assert!(!state.is_first_load());
        assert_eq!(state.series.len(), 1);
        assert!(state.quote.is_some());
    }

    #[test]
    fn test_same_quote_plateaus_at_capacity() {
        let mut state = ControllerState::new(SERIES_CAPACITY);

        for cycle in 1..=30u64 {
            run_cycle(&mut state, cycle, Some((42_000.0, 1.0)));
            assert_eq!(state.series.len(), (cycle as usize).min(24));
        }

        assert_eq!(state.series.len(), 24);
        assert!(state.series.iter().all(|p| p.price == 42_000.0));

        // La fenêtre avance toujours : le premier point est le plus ancien restant
        let first_before = state.series.first().unwrap().recorded_at;
        run_cycle(&mut state, 31, Some((42_000.0, 1.0)));
        assert_eq!(state.series.len(), 24);
        assert!(state.series.first().unwrap().recorded_at >= first_before);
    }

    #[test]
    fn test_late_result_from_superseded_cycle_is_discarded() {
        let mut state = ControllerState::new(SERIES_CAPACITY);

        // Le cycle 1 traîne, le cycle 2 démarre et se termine avant lui
        state.apply(ControllerEvent::Started { cycle: 1 });
        state.apply(ControllerEvent::Started { cycle: 2 });
        assert!(state.apply(succeeded(2, 60_000.0, 3.0)));
        assert!(!state.loading);

        assert!(!state.apply(succeeded(1, 10_000.0, -50.0)));
        assert_eq!(state.quote, Some(Quote::new(60_000.0, 3.0)));
        assert_eq!(state.series.len(), 1);

        // Un échec tardif n'affiche pas d'erreur non plus
        assert!(!state.apply(ControllerEvent::Failed { cycle: 1 }));
        assert!(state.error.is_none());
    }

    #[test]
    fn test_loading_stays_while_newer_cycle_in_flight() {
        let mut state = ControllerState::new(SERIES_CAPACITY);
        state.apply(ControllerEvent::Started { cycle: 1 });
        state.apply(ControllerEvent::Started { cycle: 2 });

        // Le cycle 1 se règle mais le 2 est encore en vol
        assert!(state.apply(succeeded(1, 50_000.0, 1.0)));
        assert!(state.loading);

        assert!(state.apply(succeeded(2, 50_100.0, 1.1)));
        assert!(!state.loading);
        assert_eq!(state.series.len(), 2);
    }

    #[test]
    fn test_event_cycle_accessor() {
        assert_eq!(ControllerEvent::Started { cycle: 7 }.cycle(), 7);
        assert_eq!(ControllerEvent::Failed { cycle: 3 }.cycle(), 3);
        assert_eq!(succeeded(5, 1.0, 0.0).cycle(), 5);
    }
}

// ============================================================================
// Sampler : tâche de rafraîchissement périodique
// ============================================================================
// CONCEPT RUST : Tâches tokio + channel
// - Une tâche "timer" tick toutes les 60s (premier tick immédiat)
// - À chaque tick : nouvel id de cycle, envoi de Started, puis une tâche de
//   fetch est lancée sans attendre la précédente (les cycles peuvent se
//   chevaucher, l'état tranche grâce aux ids)
// - Les résultats remontent par un mpsc vers le propriétaire de l'état
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::api::PriceSource;
use crate::controller::ControllerEvent;

/// Handle de la tâche timer
///
/// CONCEPT : Teardown
/// - shutdown() annule le timer, aucun nouveau cycle ne démarre
/// - Les fetchs déjà partis se terminent, leur résultat est perdu si le
///   récepteur n'existe plus
#[derive(Debug)]
pub struct SamplerHandle {
    timer: JoinHandle<()>,
}

impl SamplerHandle {
    /// Annule le timer
    pub fn shutdown(&self) {
        info!("Stopping sampler timer");
        self.timer.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.timer.is_finished()
    }
}

/// Période minimale du timer (tokio::time::interval panique sur zéro)
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Lance la tâche de sampling sur le runtime courant
///
/// Doit être appelé depuis un contexte tokio (tokio::spawn).
/// Une période inférieure à MIN_PERIOD est ramenée à MIN_PERIOD.
pub fn spawn_sampler(
    source: Arc<dyn PriceSource>,
    period: Duration,
    events: UnboundedSender<ControllerEvent>,
) -> SamplerHandle {
    if period < MIN_PERIOD {
        warn!(?period, "Refresh period too short, clamping");
    }
    let period = period.max(MIN_PERIOD);
    info!(period_ms = period.as_millis() as u64, "Starting sampler");
    let timer = tokio::spawn(run_timer(source, period, events));
    SamplerHandle { timer }
}

/// Boucle du timer : période fixe, pas de rattrapage de dérive
async fn run_timer(
    source: Arc<dyn PriceSource>,
    period: Duration,
    events: UnboundedSender<ControllerEvent>,
) {
    let mut ticker = interval(period);
    // Si un tick est manqué, on repart sur la période sans rafale
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut cycle: u64 = 0;
    loop {
        // Le premier tick se termine immédiatement
        ticker.tick().await;
        cycle += 1;

        if events.send(ControllerEvent::Started { cycle }).is_err() {
            debug!("Event receiver dropped, stopping timer");
            break;
        }

        tokio::spawn(settle_cycle(source.clone(), cycle, events.clone()));
    }
}

/// Exécute le fetch d'un cycle et publie son résultat
pub async fn settle_cycle(
    source: Arc<dyn PriceSource>,
    cycle: u64,
    events: UnboundedSender<ControllerEvent>,
) {
    let event = match source.fetch_quote().await {
        Ok(quote) => ControllerEvent::Succeeded {
            cycle,
            quote,
            at: Local::now(),
        },
        Err(_) => ControllerEvent::Failed { cycle },
    };

    // Après teardown, le récepteur n'existe plus : le résultat est ignoré
    if events.send(event).is_err() {
        debug!(cycle, "Controller gone, discarding cycle result");
    }
}

// ============================================================================
// Tests
// ============================================================================
// CONCEPT : start_paused
// - L'horloge tokio est figée, elle avance seule quand tout est en attente
// - On teste 60s de timer sans attendre réellement
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::sync::mpsc;
    use tokio::time::Instant;

    use crate::api::FetchFailed;
    use crate::config::SERIES_CAPACITY;
    use crate::controller::ControllerState;
    use crate::models::Quote;

    /// Fausse source : réponses scriptées (délai, résultat), puis la dernière
    /// cotation répétée
    struct ScriptedSource {
        script: Mutex<VecDeque<(Duration, Option<Quote>)>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(script: Vec<(Duration, Option<Quote>)>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PriceSource for ScriptedSource {
        async fn fetch_quote(&self) -> Result<Quote, FetchFailed> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.script.lock().unwrap().pop_front();
            let (delay, outcome) = next.unwrap_or((Duration::ZERO, Some(Quote::new(1.0, 0.0))));
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            outcome.ok_or_else(|| FetchFailed::new("scripted failure"))
        }
    }

    const PERIOD: Duration = Duration::from_secs(60);

    #[tokio::test(start_paused = true)]
    async fn test_first_cycle_runs_immediately_then_every_period() {
        let source = Arc::new(ScriptedSource::new(vec![
            (Duration::ZERO, Some(Quote::new(50_000.0, 2.5))),
            (Duration::ZERO, Some(Quote::new(50_500.0, 3.0))),
        ]));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let start = Instant::now();
        let handle = spawn_sampler(source.clone(), PERIOD, tx);

        assert_eq!(rx.recv().await, Some(ControllerEvent::Started { cycle: 1 }));
        let settled = rx.recv().await.unwrap();
        assert!(matches!(settled, ControllerEvent::Succeeded { cycle: 1, .. }));
        assert!(start.elapsed() < PERIOD);

        assert_eq!(rx.recv().await, Some(ControllerEvent::Started { cycle: 2 }));
        assert!(start.elapsed() >= PERIOD);

        let settled = rx.recv().await.unwrap();
        match settled {
            ControllerEvent::Succeeded { cycle, quote, .. } => {
                assert_eq!(cycle, 2);
                assert_eq!(quote, Quote::new(50_500.0, 3.0));
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(source.calls(), 2);

        handle.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_published() {
        let source = Arc::new(ScriptedSource::new(vec![(Duration::ZERO, None)]));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_sampler(source, PERIOD, tx);

        assert_eq!(rx.recv().await, Some(ControllerEvent::Started { cycle: 1 }));
        assert_eq!(rx.recv().await, Some(ControllerEvent::Failed { cycle: 1 }));

        handle.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_new_cycles() {
        let source = Arc::new(ScriptedSource::new(vec![]));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_sampler(source.clone(), PERIOD, tx);

        assert_eq!(rx.recv().await, Some(ControllerEvent::Started { cycle: 1 }));
        assert!(rx.recv().await.is_some());

        handle.shutdown();

        // Plus aucun émetteur vivant : le channel se ferme sans nouveau cycle
        assert_eq!(rx.recv().await, None);
        assert_eq!(source.calls(), 1);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fetch_does_not_overwrite_newer_cycle() {
        // Le cycle 1 met 90s, le cycle 2 (à t=60s) répond tout de suite
        let source = Arc::new(ScriptedSource::new(vec![
            (Duration::from_secs(90), Some(Quote::new(10_000.0, -9.0))),
            (Duration::ZERO, Some(Quote::new(60_000.0, 4.0))),
        ]));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_sampler(source, PERIOD, tx);

        let mut state = ControllerState::new(SERIES_CAPACITY);
        let mut settled_cycles = Vec::new();
        while settled_cycles.len() < 2 {
            let event = rx.recv().await.unwrap();
            if !matches!(event, ControllerEvent::Started { .. }) {
                settled_cycles.push(event.cycle());
            }
            state.apply(event);
        }
        handle.shutdown();

        // Ordre d'arrivée : 2 puis 1 (tardif, ignoré)
        assert_eq!(settled_cycles, vec![2, 1]);
        assert_eq!(state.quote, Some(Quote::new(60_000.0, 4.0)));
        assert_eq!(state.series.len(), 1);
        assert!(!state.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_period_is_clamped() {
        let source = Arc::new(ScriptedSource::new(vec![]));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let start = Instant::now();
        let handle = spawn_sampler(source, Duration::ZERO, tx);

        // Le timer tourne au lieu de paniquer, au rythme de MIN_PERIOD
        assert_eq!(rx.recv().await, Some(ControllerEvent::Started { cycle: 1 }));
        assert!(rx.recv().await.is_some());
        assert_eq!(rx.recv().await, Some(ControllerEvent::Started { cycle: 2 }));
        assert!(start.elapsed() >= MIN_PERIOD);
        assert!(!handle.is_finished());

        handle.shutdown();
    }

    #[tokio::test]
    async fn test_result_after_teardown_is_dropped() {
        let source: Arc<dyn PriceSource> = Arc::new(ScriptedSource::new(vec![]));
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        // Ne panique pas, l'événement est simplement perdu
        settle_cycle(source, 1, tx).await;
    }
}

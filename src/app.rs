// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Un seul propriétaire : la boucle UI possède App, pas de Mutex
// 3. Les mises à jour de prix arrivent par messages (ControllerEvent)
//
// PATTERN : "Application State"
// - Le rendu lit App
// - Les modifications passent par les méthodes de App
// ============================================================================

use std::time::Duration;

use crate::config::SamplerConfig;
use crate::controller::{ControllerEvent, ControllerState};

// ============================================================================
// Enum : Screen
// ============================================================================
// CONCEPT RUST : Enums pour state machines
// - L'écran n'est pas stocké : il est dérivé de l'état du controller
// - Le compilateur force à gérer tous les cas dans le rendu
// ============================================================================

/// Écran à afficher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Premier chargement, aucune donnée encore
    Loading,

    /// Le dernier cycle a échoué (prioritaire sur les données périmées)
    Error(String),

    /// Cartes + graphique
    Dashboard,
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// État du sampling controller (série, cotation, loading, erreur)
    pub state: ControllerState,

    /// Période de rafraîchissement (affichée dans le footer)
    pub refresh_period: Duration,
}

impl App {
    /// Crée une App avec la configuration par défaut
    pub fn new() -> Self {
        Self::with_config(&SamplerConfig::default())
    }

    /// Crée une App pour une configuration donnée
    pub fn with_config(config: &SamplerConfig) -> Self {
        Self {
            running: true,
            state: ControllerState::new(config.series_capacity),
            refresh_period: config.refresh_period,
        }
    }

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Applique un événement du sampler
    ///
    /// Une fois l'application arrêtée, plus aucune mise à jour n'est acceptée.
    pub fn handle_controller_event(&mut self, event: ControllerEvent) -> bool {
        if !self.running {
            return false;
        }
        self.state.apply(event)
    }

    /// Détermine l'écran à afficher
    ///
    /// CONCEPT : Ordre de priorité
    /// 1. Premier chargement → Loading
    /// 2. Erreur → Error (même si des données existent)
    /// 3. Sinon → Dashboard
    pub fn screen(&self) -> Screen {
        if self.state.is_first_load() {
            Screen::Loading
        } else if let Some(message) = &self.state.error {
            Screen::Error(message.clone())
        } else {
            Screen::Dashboard
        }
    }

    /// Un rafraîchissement tourne alors que des données sont déjà affichées
    pub fn is_refreshing(&self) -> bool {
        self.state.loading && !self.state.series.is_empty()
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

// ============================================================================
// btcdash - Dashboard Bitcoin dans le terminal
// ============================================================================
// Récupère le prix du Bitcoin toutes les 60s depuis CoinGecko et affiche
// le prix, la variation 24h et un graphique des derniers points.
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle qui gère événements et rendering
// 3. Runtime tokio à côté d'une boucle UI synchrone
// 4. Message passing : le sampler envoie des événements, l'UI les applique
// ============================================================================

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{error::TryRecvError, UnboundedReceiver};
use tracing::{debug, error, info};

use btcdash::api::{CoinGeckoClient, PriceSource};
use btcdash::app::App;
use btcdash::config::SamplerConfig;
use btcdash::controller::{spawn_sampler, ControllerEvent};
use btcdash::ui::{events::is_quit_event, render, EventHandler};

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place, avec rotation quotidienne
// ============================================================================

/// Répertoire des logs
///
/// - Linux : ~/.local/share/btcdash/logs
/// - macOS : ~/Library/Application Support/btcdash/logs
/// - Windows : C:\Users\<user>\AppData\Local\btcdash\logs
/// - Sinon : ./logs
fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("btcdash").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Initialise le système de logging vers fichier
///
/// # Utilisation
/// ```bash
/// tail -f ~/.local/share/btcdash/logs/btcdash.log.*
/// RUST_LOG=btcdash=trace cargo run
/// ```
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "btcdash.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true)
                .with_thread_ids(true) // Utile : timer et fetchs tournent sur le runtime
                .with_line_number(true),
        )
        .with(
            // RUST_LOG prioritaire, sinon debug pour btcdash et info pour le reste
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "btcdash=debug,info".into()),
        )
        .try_init()
        .context("Échec de l'installation du subscriber tracing")?;

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================
// CONCEPT RUST : Async à côté du sync
// - main() est synchrone (boucle TUI)
// - Le runtime tokio exécute le timer et les requêtes HTTP en arrière-plan
// - Les deux côtés ne partagent qu'un channel
// ============================================================================

fn main() -> Result<()> {
    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!("btcdash starting up");

    let config = SamplerConfig::default();
    let runtime = tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;

    let source: Arc<dyn PriceSource> = Arc::new(CoinGeckoClient::new()?);

    // CONCEPT RUST : mpsc unbounded
    // - Le sampler (et ses tâches de fetch) détiennent les Sender
    // - La boucle UI détient le Receiver et vide le channel à chaque itération
    let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel::<ControllerEvent>();

    // spawn_sampler utilise tokio::spawn : il faut être dans le contexte du runtime
    let sampler = {
        let _guard = runtime.enter();
        spawn_sampler(source, config.refresh_period, event_tx)
    };

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let mut app = App::with_config(&config);
    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, event_rx);

    // Teardown : on arrête le timer, les fetchs en vol sont abandonnés
    sampler.shutdown();

    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    runtime.shutdown_background();

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   0. Appliquer les événements du sampler (update)
//   1. Dessiner l'interface (render)
//   2. Traiter le clavier (input), au plus 250ms d'attente
//
// Le receiver est consommé par run() : quand la boucle se termine, il est
// dropé et les résultats tardifs sont ignorés.
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    mut event_rx: UnboundedReceiver<ControllerEvent>,
) -> Result<()> {
    let mut sampler_alive = true;

    while app.is_running() {
        // 0. Résultats du sampler
        // CONCEPT : try_recv non bloquant, on vide tout ce qui est arrivé
        while sampler_alive {
            match event_rx.try_recv() {
                Ok(event) => {
                    app.handle_controller_event(event);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // Le dashboard reste affiché avec les dernières données
                    error!("Sampler disconnected!");
                    sampler_alive = false;
                }
            }
        }

        // 1. Rendu
        terminal.draw(|frame| render(frame, app))?;

        // 2. Clavier
        let event = events.next()?;
        if is_quit_event(&event) {
            info!("User requested quit");
            app.quit();
        }
    }

    Ok(())
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Échec de l'activation du raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

//! Système de logging pour dogme
//!
//! Les évaluations de dégénérescence sont tracées dans un span portant la
//! taille du design; les erreurs de construction remontent en `warn` avec
//! leur classe (validation ou non).

use tracing_subscriber::{fmt, EnvFilter};

/// Variable d'environnement lue par [`init_logging`]
pub const LOG_ENV: &str = "DOGME_LOG";

/// Niveau appliqué quand `DOGME_LOG` est absent ou illisible
pub const DEFAULT_DIRECTIVE: &str = "warn";

/// Initialise le système de logging
///
/// Le filtre est lu depuis `DOGME_LOG` (syntaxe `EnvFilter`, par exemple
/// `dogme_core=debug`). Un second appel est sans effet.
pub fn init_logging() {
    init_logging_with(DEFAULT_DIRECTIVE);
}

/// Comme [`init_logging`], avec un autre niveau par défaut
pub fn init_logging_with(default_directive: &str) {
    let _ = fmt()
        .with_env_filter(env_filter(default_directive))
        .with_target(false)
        .compact()
        .try_init();
}

fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Exécute un bloc dans un span nommé et journalise sa durée
///
/// Des champs peuvent être attachés au span avant le bloc:
/// `log_operation!("assess", codons = 20; { ... })`.
#[macro_export]
macro_rules! log_operation {
    ($name:literal, $($field:ident = $value:expr),+ ; $block:block) => {{
        let span = tracing::info_span!($name, $($field = $value),+);
        let _enter = span.enter();
        let started = std::time::Instant::now();
        let result = $block;
        tracing::debug!(elapsed_us = started.elapsed().as_micros() as u64, "{} terminé", $name);
        result
    }};
    ($name:literal, $block:block) => {{
        let span = tracing::info_span!($name);
        let _enter = span.enter();
        let started = std::time::Instant::now();
        let result = $block;
        tracing::debug!(elapsed_us = started.elapsed().as_micros() as u64, "{} terminé", $name);
        result
    }};
}

/// Journalise une [`DogmeError`](crate::error::DogmeError) et la retourne
#[macro_export]
macro_rules! log_error {
    ($error:expr) => {{
        let error: $crate::error::DogmeError = $error;
        tracing::warn!(
            error = %error,
            validation = error.is_validation(),
            "construction refusée"
        );
        error
    }};
}

use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

use crate::config::ResetConfig;
use crate::db::{connector, recreator, terminator, AdminSession, DatabaseName, ResetError};
use crate::phase::ResetPhase;

/// Outcome of a successful reset
#[derive(Debug, Clone)]
pub struct ResetReport {
    pub database: DatabaseName,
    /// Whether the database was present before the drop
    pub existed: bool,
    pub terminated_sessions: u64,
    pub elapsed: Duration,
}

/// Drops and recreates one database
///
/// A service instance performs a single run. The phase it ended in stays
/// readable afterwards, so a caller can tell how far a failed run got.
pub struct ResetService {
    config: ResetConfig,
    phase: ResetPhase,
    failed_phase: Option<ResetPhase>,
}

impl ResetService {
    pub fn new(config: ResetConfig) -> Self {
        Self {
            config,
            phase: ResetPhase::Idle,
            failed_phase: None,
        }
    }

    pub fn phase(&self) -> ResetPhase {
        self.phase
    }

    /// The phase that was in progress when the run failed
    pub fn failed_phase(&self) -> Option<ResetPhase> {
        self.failed_phase
    }

    /// Run the reset to completion or to the first error
    ///
    /// 1. Connect to the maintenance database
    /// 2. Terminate every other session on the target
    /// 3. Drop the target if it exists
    /// 4. Create it again, empty
    ///
    /// Nothing is retried. On error the service moves to
    /// [`ResetPhase::Failed`] and the session is dropped without a graceful
    /// close.
    #[instrument(skip(self), fields(database = %self.config.target_database))]
    pub async fn reset(&mut self) -> Result<ResetReport, ResetError> {
        if self.phase != ResetPhase::Idle {
            return Err(ResetError::Config(format!(
                "reset already ran (phase: {})",
                self.phase
            )));
        }

        let start_time = Instant::now();

        match self.run_phases().await {
            Ok((existed, terminated_sessions)) => {
                let elapsed = start_time.elapsed();
                info!(
                    "Finished reset of {} in {:.2}s",
                    self.config.target_database,
                    elapsed.as_secs_f64()
                );
                Ok(ResetReport {
                    database: self.config.target_database.clone(),
                    existed,
                    terminated_sessions,
                    elapsed,
                })
            }
            Err(e) => {
                error!(
                    failed_phase = %self.phase,
                    error = %e,
                    "Reset of {} failed",
                    self.config.target_database
                );
                self.failed_phase = Some(self.phase);
                self.advance(ResetPhase::Failed);
                Err(e)
            }
        }
    }

    async fn run_phases(&mut self) -> Result<(bool, u64), ResetError> {
        let target = self.config.target_database.clone();

        info!("Connecting to PostgreSQL server...");
        let mut session: AdminSession = connector::connect(&self.config).await?;
        self.advance(ResetPhase::Connected);

        self.advance(ResetPhase::Terminating);
        info!("Terminating existing connections to {}...", target);
        let terminated = terminator::terminate_sessions(session.connection(), &target).await?;

        self.advance(ResetPhase::Dropping);
        let existed = recreator::database_exists(session.connection(), &target).await?;
        if existed {
            info!("Dropping existing database {}...", target);
        } else {
            info!("Database {} does not exist, nothing to drop", target);
        }
        recreator::drop_database(session.connection(), &target).await?;

        self.advance(ResetPhase::Creating);
        info!("Creating new database {}...", target);
        recreator::create_database(session.connection(), &target).await?;

        self.advance(ResetPhase::Done);
        if let Err(e) = session.close().await {
            warn!("Administrative session did not close cleanly: {}", e);
        }

        Ok((existed, terminated))
    }

    fn advance(&mut self, to: ResetPhase) {
        debug_assert!(
            self.phase.can_transition_to(to),
            "illegal phase transition {} -> {}",
            self.phase,
            to
        );
        debug!("Phase {} -> {}", self.phase, to);
        self.phase = to;
    }
}

use std::time::Duration;

use sqlx::{Pool, Postgres};
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info};

use crate::db::JobRepository;

/// Background worker that closes approved jobs past their expiry
pub struct ExpirationSweeper {
    pool: Pool<Postgres>,
    period: Duration,
}

impl ExpirationSweeper {
    /// Create a new ExpirationSweeper instance
    pub fn new(pool: Pool<Postgres>, period: Duration) -> Self {
        Self { pool, period }
    }

    /// Close every expired approved job once.
    /// Returns how many jobs were closed.
    pub async fn sweep_once(&self) -> Result<u64, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        let closed = JobRepository::close_expired(&mut conn).await?;

        if closed > 0 {
            info!("Closed {} expired jobs", closed);
        } else {
            info!("No expired jobs found to close");
        }
        Ok(closed)
    }

    /// Sweep on a fixed period until shutdown is signalled
    ///
    /// The first sweep runs immediately. A failed sweep is logged and retried
    /// on the next tick; an in-flight sweep always completes before the loop
    /// observes shutdown.
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) {
        info!("Expiration sweeper started (period={:?})", self.period);

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.sweep_once().await {
                        error!("Expiration sweep failed: {:?}", e);
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Expiration sweeper stopped");
    }
}

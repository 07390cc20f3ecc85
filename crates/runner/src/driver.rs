//! Driver - paced trade loop and metrics sampler on one task
//!
//! The task owns the `Simulation` outright and multiplexes three sources:
//!
//! ```text
//!   control (mpsc) ──┐
//!   sampler tick ────┼──► select! ──► step() / snapshot()
//!   trade deadline ──┘                      │
//!                                           └──► watch<Option<MetricsSnapshot>>
//! ```
//!
//! Control is polled first, so a pause lands before the next trade.

use crate::error::{Result, RunnerError};
use crate::pacing::PacingConfig;
use crate::simulation::Simulation;
use flowsim_engine::MetricsSnapshot;
use flowsim_ports::{LiquidityPool, SimulationResult, TickOracle};
use log::{error, info};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

const COMMAND_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Pause,
    Resume,
    SetSpeed(u32),
    Stop,
}

/// Returned by the driver task once it stops cleanly
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub trades: u64,
    pub days_completed: u32,
    pub final_snapshot: MetricsSnapshot,
}

/// Cloneable control surface for a running simulation
///
/// Dropping every handle stops the driver, same as `stop`.
#[derive(Clone)]
pub struct SimulationHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Option<MetricsSnapshot>>,
}

impl SimulationHandle {
    async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| RunnerError::Stopped)
    }

    pub async fn pause(&self) -> Result<()> {
        self.send(Command::Pause).await
    }

    pub async fn resume(&self) -> Result<()> {
        self.send(Command::Resume).await
    }

    pub async fn set_speed(&self, speed: u32) -> Result<()> {
        self.send(Command::SetSpeed(speed)).await
    }

    pub async fn stop(&self) -> Result<()> {
        self.send(Command::Stop).await
    }

    /// Latest snapshot; `None` until the sampler first fires
    pub fn subscribe(&self) -> watch::Receiver<Option<MetricsSnapshot>> {
        self.snapshots.clone()
    }

    pub fn latest(&self) -> Option<MetricsSnapshot> {
        self.snapshots.borrow().clone()
    }
}

pub struct SimulationRunner;

impl SimulationRunner {
    /// Move `sim` onto its own task
    pub fn spawn<P, O>(
        sim: Simulation<P, O>,
        pacing: PacingConfig,
    ) -> (SimulationHandle, JoinHandle<SimulationResult<RunSummary>>)
    where
        P: LiquidityPool + 'static,
        O: TickOracle + 'static,
    {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (snapshot_tx, snapshot_rx) = watch::channel(None);

        let task = tokio::spawn(drive(sim, pacing, command_rx, snapshot_tx));

        (
            SimulationHandle {
                commands: command_tx,
                snapshots: snapshot_rx,
            },
            task,
        )
    }
}

/// Resolves when the next trade is due; yields once in continuous mode
async fn trade_due(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => tokio::task::yield_now().await,
    }
}

fn deadline(last_trade: Instant, interval: Option<Duration>) -> Option<Instant> {
    interval.map(|interval| last_trade + interval)
}

async fn drive<P, O>(
    mut sim: Simulation<P, O>,
    pacing: PacingConfig,
    mut commands: mpsc::Receiver<Command>,
    snapshots: watch::Sender<Option<MetricsSnapshot>>,
) -> SimulationResult<RunSummary>
where
    P: LiquidityPool,
    O: TickOracle,
{
    let mut running = !pacing.start_paused;
    let mut speed = pacing.clamp_speed(pacing.initial_speed);
    let mut last_trade = Instant::now();

    let mut sampler = tokio::time::interval(pacing.sampler_interval());
    sampler.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        "Simulation started (speed {}/{}, {})",
        speed,
        pacing.max_speed,
        if running { "running" } else { "paused" }
    );

    loop {
        let next_trade = deadline(last_trade, pacing.interval_for(speed));

        tokio::select! {
            biased;

            command = commands.recv() => match command {
                Some(Command::Pause) => {
                    if running {
                        running = false;
                        info!("Paused after {} trades", sim.trades());
                    }
                }
                Some(Command::Resume) => {
                    if !running {
                        running = true;
                        last_trade = Instant::now();
                        info!("Resumed at speed {}", speed);
                    }
                }
                Some(Command::SetSpeed(requested)) => {
                    speed = pacing.clamp_speed(requested);
                    last_trade = Instant::now();
                    info!("Speed set to {}", speed);
                }
                Some(Command::Stop) | None => break,
            },

            _ = sampler.tick() => {
                snapshots.send_replace(Some(sim.snapshot()));
            }

            _ = trade_due(next_trade), if running => {
                if let Err(e) = sim.step() {
                    error!("Simulation aborted after {} trades: {}", sim.trades(), e);
                    return Err(e);
                }
                last_trade = Instant::now();
            }
        }
    }

    let final_snapshot = sim.snapshot();
    snapshots.send_replace(Some(final_snapshot.clone()));
    info!(
        "Simulation stopped: {} trades over {} completed days",
        sim.trades(),
        sim.day() - 1
    );

    Ok(RunSummary {
        trades: sim.trades(),
        days_completed: sim.day() - 1,
        final_snapshot,
    })
}

//! Telemetry simulator
//!
//! [`Simulator`] is the synchronous core. It owns its config, its random
//! source and the latest [`Reading`], and produces the next reading on
//! [`Simulator::tick`].
//!
//! [`start`] wraps a core in a single tokio task that ticks it once per
//! configured interval and hands every new reading to the callbacks
//! registered on the returned [`SimulatorHandle`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::{Bounds, ConnectivityModel, SimulatorConfig};
use crate::error::Result;
use crate::random::RandomSource;
use crate::reading::Reading;

/// Callback invoked with every new reading
pub type ReadingCallback = Arc<dyn Fn(&Reading) + Send + Sync>;

/// Synchronous telemetry generator
pub struct Simulator {
    config: SimulatorConfig,
    rng: Box<dyn RandomSource>,
    clock: Arc<dyn Clock>,
    current: Reading,
    ticks: u64,
}

impl Simulator {
    /// Validate `config` and seed the initial reading from it
    pub fn new(
        config: SimulatorConfig,
        rng: Box<dyn RandomSource>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;

        let current = Reading {
            temperature_c: config.initial_temperature_c,
            humidity_percent: config.initial_humidity_percent,
            power_watts: config.initial_power_watts,
            connected: config.initial_connected,
            captured_at: clock.now(),
        };

        Ok(Self {
            config,
            rng,
            clock,
            current,
            ticks: 0,
        })
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Most recent reading, or the seeded one before the first tick
    pub fn current(&self) -> &Reading {
        &self.current
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Produce the next reading and make it current
    ///
    /// Random draws happen in a fixed order: temperature, humidity, power,
    /// then connectivity (flaky model only).
    pub fn tick(&mut self) -> Reading {
        let previous = &self.current;
        let rng = self.rng.as_mut();

        let temperature_c = self.config.temperature.clamp(perturb(
            previous.temperature_c,
            self.config.temperature_step,
            rng,
        ));
        let humidity_percent = clamp_rounded(
            &self.config.humidity,
            perturb(
                f64::from(previous.humidity_percent),
                self.config.humidity_step,
                rng,
            ),
        );
        let power_watts = clamp_rounded(
            &self.config.power,
            perturb(
                f64::from(previous.power_watts),
                self.config.power_step,
                rng,
            ),
        );
        let connected = match self.config.connectivity {
            ConnectivityModel::Flaky => rng.next_bool(),
            ConnectivityModel::Alternating => !previous.connected,
        };

        self.current = Reading {
            temperature_c,
            humidity_percent,
            power_watts,
            connected,
            captured_at: self.clock.now(),
        };
        self.ticks += 1;

        self.current.clone()
    }
}

impl std::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("config", &self.config)
            .field("current", &self.current)
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

/// `value + uniform(-delta/2, +delta/2)`
fn perturb(value: f64, delta: f64, rng: &mut dyn RandomSource) -> f64 {
    value + (unit_draw(rng) - 0.5) * delta
}

/// Next draw, forced into `[0, 1)`. A non-finite draw counts as the midpoint.
fn unit_draw(rng: &mut dyn RandomSource) -> f64 {
    let u = rng.next_unit();
    if u.is_finite() {
        u.clamp(0.0, 1.0 - f64::EPSILON)
    } else {
        0.5
    }
}

fn clamp_rounded(bounds: &Bounds<i32>, value: f64) -> i32 {
    // Clamp in f64 first so the cast can never saturate past the bounds.
    value
        .round()
        .clamp(f64::from(bounds.min), f64::from(bounds.max)) as i32
}

/// Validate the config and start ticking on the current tokio runtime
///
/// The first reading is produced one full interval after this returns.
pub fn start(
    config: SimulatorConfig,
    rng: Box<dyn RandomSource>,
    clock: Arc<dyn Clock>,
) -> Result<SimulatorHandle> {
    let simulator = Simulator::new(config, rng, clock).inspect_err(|e| {
        warn!("Refusing to start simulator: {}", e);
    })?;
    Ok(SimulatorHandle::spawn(simulator))
}

/// State shared between the handle and the tick task
struct Shared {
    core: Mutex<Simulator>,
    callbacks: Mutex<Vec<ReadingCallback>>,
    stopped: AtomicBool,
    /// Held for the whole of a tick, including callback dispatch
    dispatch: Mutex<()>,
    /// Thread currently running callbacks, if any
    dispatch_thread: Mutex<Option<ThreadId>>,
    cancel: CancellationToken,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Shared {
    /// Run one tick. Returns false once the simulator has been stopped.
    fn run_tick(&self) -> bool {
        let _dispatch = lock(&self.dispatch);
        if self.stopped.load(Ordering::SeqCst) {
            return false;
        }

        let reading = lock(&self.core).tick();
        debug!(
            "Tick: {:.2} C, {} %, {} W, connected={}",
            reading.temperature_c, reading.humidity_percent, reading.power_watts, reading.connected
        );

        let callbacks = lock(&self.callbacks).clone();
        *lock(&self.dispatch_thread) = Some(thread::current().id());
        for callback in callbacks {
            if self.stopped.load(Ordering::SeqCst) {
                break;
            }
            callback(&reading);
        }
        *lock(&self.dispatch_thread) = None;

        !self.stopped.load(Ordering::SeqCst)
    }

    fn halt(&self) -> bool {
        let first = !self.stopped.swap(true, Ordering::SeqCst);
        self.cancel.cancel();
        first
    }
}

async fn tick_loop(shared: Arc<Shared>, first_tick: Instant, period: Duration) {
    let mut ticker = interval_at(first_tick, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = shared.cancel.cancelled() => {
                debug!("Tick loop cancelled");
                break;
            }
            _ = ticker.tick() => {}
        }

        if !shared.run_tick() {
            debug!("Tick loop stopped");
            break;
        }
    }
}

struct HandleInner {
    shared: Arc<Shared>,
    task: JoinHandle<()>,
}

impl Drop for HandleInner {
    fn drop(&mut self) {
        if self.shared.halt() {
            debug!("Last simulator handle dropped, cancelling tick loop");
        }
    }
}

/// Handle to a running simulator
///
/// Clones share the same simulator. Dropping the last clone stops it.
#[derive(Clone)]
pub struct SimulatorHandle {
    inner: Arc<HandleInner>,
}

impl SimulatorHandle {
    fn spawn(simulator: Simulator) -> Self {
        let period = Duration::from_millis(simulator.config().tick_interval_ms);
        info!(
            "Starting simulator: interval {:?}, temperature {:?}, humidity {:?}, power {:?}",
            period,
            simulator.config().temperature,
            simulator.config().humidity,
            simulator.config().power
        );

        let shared = Arc::new(Shared {
            core: Mutex::new(simulator),
            callbacks: Mutex::new(Vec::new()),
            stopped: AtomicBool::new(false),
            dispatch: Mutex::new(()),
            dispatch_thread: Mutex::new(None),
            cancel: CancellationToken::new(),
        });
        // First deadline is fixed at spawn, not at the task's first poll.
        let first_tick = Instant::now() + period;
        let task = tokio::spawn(tick_loop(Arc::clone(&shared), first_tick, period));

        Self {
            inner: Arc::new(HandleInner { shared, task }),
        }
    }

    /// Register a callback for every future reading
    ///
    /// Callbacks run on the tick task in registration order, but callers
    /// should not rely on any ordering between them.
    pub fn on_reading<F>(&self, callback: F)
    where
        F: Fn(&Reading) + Send + Sync + 'static,
    {
        lock(&self.inner.shared.callbacks).push(Arc::new(callback));
    }

    /// Halt production. Idempotent.
    ///
    /// Once this returns no callback will be invoked again. Calling it from
    /// inside a callback stops the remaining callbacks of that tick.
    pub fn stop(&self) {
        let shared = &self.inner.shared;
        let first = shared.halt();

        let reentrant = *lock(&shared.dispatch_thread) == Some(thread::current().id());
        if !reentrant {
            // Wait out a tick that is dispatching on another thread.
            drop(lock(&shared.dispatch));
        }

        if first {
            info!("Simulator stopped after {} ticks", self.tick_count());
        }
    }

    pub fn is_running(&self) -> bool {
        !self.inner.shared.stopped.load(Ordering::SeqCst)
    }

    /// Most recent reading, or the seeded one before the first tick
    pub fn current_reading(&self) -> Reading {
        lock(&self.inner.shared.core).current().clone()
    }

    pub fn tick_count(&self) -> u64 {
        lock(&self.inner.shared.core).tick_count()
    }

    pub fn config(&self) -> SimulatorConfig {
        lock(&self.inner.shared.core).config().clone()
    }

    /// True once the tick task has exited
    pub fn is_finished(&self) -> bool {
        self.inner.task.is_finished()
    }
}

impl std::fmt::Debug for SimulatorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatorHandle")
            .field("running", &self.is_running())
            .field("tick_count", &self.tick_count())
            .finish_non_exhaustive()
    }
}

//! Continuous sampling on a background thread
//!
//! [`Continuous`] wraps any [`SenseEnvironment`] and samples it on a fixed
//! interval. Samples go through a queue of one: when the consumer falls
//! behind, new samples are dropped instead of blocking the sampler.
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use device_drivers::sensor::continuous::Continuous;
//! # use device_drivers::sensor::{Environment, SenseEnvironment};
//! # struct Fixed;
//! # impl SenseEnvironment for Fixed {
//! #     type Error = ();
//! #     fn sense(&mut self) -> Result<Environment, ()> { Ok(Environment::default()) }
//! #     fn precision(&self) -> Environment { Environment::default() }
//! #     fn halt(&mut self) -> Result<(), ()> { Ok(()) }
//! # }
//! # let sensor = Fixed;
//! let mut sampler = Continuous::new(sensor);
//! if let Ok(samples) = sampler.sense_continuous(Duration::from_secs(2)) {
//!     for reading in samples.iter().take(10) {
//!         let _ = reading.temperature;
//!     }
//! }
//! let _ = sampler.halt();
//! ```

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, SyncSender, TrySendError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::{Environment, SenseEnvironment};

/// Errors from the continuous sampler
#[derive(Debug, PartialEq, Eq)]
pub enum ContinuousError<E> {
    /// Continuous sensing is already running
    AlreadyRunning,
    /// The sensor failed
    Sensor(E),
    /// The background thread could not be started
    Spawn,
    /// The background thread panicked
    WorkerPanicked,
}

impl<E: core::fmt::Debug> core::fmt::Display for ContinuousError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AlreadyRunning => write!(f, "Continuous sensing already running"),
            Self::Sensor(e) => write!(f, "Sensor error: {e:?}"),
            Self::Spawn => write!(f, "Failed to start sampling thread"),
            Self::WorkerPanicked => write!(f, "Sampling thread panicked"),
        }
    }
}

impl<E: core::fmt::Debug> core::error::Error for ContinuousError<E> {}

struct Worker {
    shutdown: Sender<()>,
    handle: JoinHandle<()>,
}

/// Background sampler around a sensor
pub struct Continuous<S> {
    sensor: Arc<Mutex<S>>,
    worker: Option<Worker>,
}

impl<S> Continuous<S>
where
    S: SenseEnvironment + Send + 'static,
    S::Error: core::fmt::Debug,
{
    /// Wrap `sensor`; nothing runs until [`sense_continuous`](Self::sense_continuous)
    pub fn new(sensor: S) -> Self {
        Self {
            sensor: Arc::new(Mutex::new(sensor)),
            worker: None,
        }
    }

    /// True while the background thread runs
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Start sampling every `interval`
    ///
    /// The returned channel closes once [`halt`](SenseEnvironment::halt) stops
    /// the sampler. Failed readings are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ContinuousError::AlreadyRunning`] if sampling was started
    /// and not halted.
    pub fn sense_continuous(
        &mut self,
        interval: Duration,
    ) -> Result<Receiver<Environment>, ContinuousError<S::Error>> {
        if self.worker.is_some() {
            return Err(ContinuousError::AlreadyRunning);
        }

        let (samples, receiver) = mpsc::sync_channel(1);
        let (shutdown, stop) = mpsc::channel();
        let sensor = Arc::clone(&self.sensor);
        let handle = thread::Builder::new()
            .name("sense-continuous".into())
            .spawn(move || sample(&sensor, interval, &samples, &stop))
            .map_err(|_| ContinuousError::Spawn)?;

        log::debug!("continuous sensing started, interval {:?}", interval);
        self.worker = Some(Worker { shutdown, handle });
        Ok(receiver)
    }

    /// Signal the worker and wait for it to exit
    fn stop(&mut self) -> Result<(), ContinuousError<S::Error>> {
        if let Some(Worker { shutdown, handle }) = self.worker.take() {
            drop(shutdown);
            handle.join().map_err(|_| ContinuousError::WorkerPanicked)?;
            log::debug!("continuous sensing stopped");
        }
        Ok(())
    }
}

impl<S> SenseEnvironment for Continuous<S>
where
    S: SenseEnvironment + Send + 'static,
    S::Error: core::fmt::Debug,
{
    type Error = ContinuousError<S::Error>;

    /// One reading, only while the sampler is stopped
    fn sense(&mut self) -> Result<Environment, Self::Error> {
        if self.worker.is_some() {
            return Err(ContinuousError::AlreadyRunning);
        }
        let mut sensor = self.sensor.lock().map_err(|_| ContinuousError::WorkerPanicked)?;
        sensor.sense().map_err(ContinuousError::Sensor)
    }

    fn precision(&self) -> Environment {
        self.sensor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .precision()
    }

    /// Stop sampling, then halt the sensor; calling it again is harmless
    fn halt(&mut self) -> Result<(), Self::Error> {
        self.stop()?;
        let mut sensor = self.sensor.lock().map_err(|_| ContinuousError::WorkerPanicked)?;
        sensor.halt().map_err(ContinuousError::Sensor)
    }
}

impl<S> Drop for Continuous<S> {
    fn drop(&mut self) {
        if let Some(Worker { shutdown, handle }) = self.worker.take() {
            drop(shutdown);
            let _ = handle.join();
        }
    }
}

fn sample<S>(
    sensor: &Mutex<S>,
    interval: Duration,
    samples: &SyncSender<Environment>,
    stop: &Receiver<()>,
) where
    S: SenseEnvironment,
    S::Error: core::fmt::Debug,
{
    loop {
        let reading = match sensor.lock() {
            Ok(mut sensor) => sensor.sense(),
            Err(_) => {
                log::warn!("sensor lock poisoned, sampling stopped");
                return;
            }
        };

        match reading {
            Ok(environment) => match samples.try_send(environment) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => log::warn!("sample dropped, consumer is behind"),
                Err(TrySendError::Disconnected(_)) => {
                    log::debug!("sample receiver dropped, sampling stopped");
                    return;
                }
            },
            Err(e) => log::warn!("sense failed: {:?}", e),
        }

        match stop.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
        }
    }
}

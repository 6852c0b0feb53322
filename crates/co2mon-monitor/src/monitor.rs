use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use co2mon_frame::{decode, FrameSource, Reading};
use tracing::{debug, info, trace, warn};

use crate::error::{MonitorError, Result};
use crate::signal::StopSignal;
use crate::sink::ReadingSink;

const THREAD_NAME: &str = "co2mon-acquire";

/// The reader loop over one initialized frame source.
///
/// Frames are consumed strictly in order. Any read or decode error ends the
/// loop; there is no resynchronization inside a session.
pub struct Monitor<S> {
    source: S,
    frames: u64,
}

impl<S: FrameSource> Monitor<S> {
    /// Wrap a source whose `initialize` has already succeeded.
    pub fn new(source: S) -> Self {
        Self { source, frames: 0 }
    }

    /// Read, decode and convert one frame.
    pub fn step(&mut self) -> Result<Reading> {
        let frame = self.source.read_frame()?;
        let record = decode(&frame)?;
        self.frames = self.frames.saturating_add(1);

        let reading = Reading::from_record(&record);
        match reading.quantity() {
            Some(quantity) => {
                trace!(%quantity, value = reading.value(), "reading");
            }
            None => {
                debug!(
                    operation = record.operation,
                    value = record.value,
                    "unrecognized operation"
                );
            }
        }
        Ok(reading)
    }

    /// Publish readings until `stop` fires or an error occurs.
    ///
    /// `stop` is checked before every read. Returns the number of frames
    /// processed by this call.
    pub fn run<K, C>(&mut self, sink: &K, stop: &C) -> Result<u64>
    where
        K: ReadingSink + ?Sized,
        C: StopSignal + ?Sized,
    {
        let start = self.frames;
        info!("acquisition loop started");

        while !stop.should_stop() {
            match self.step() {
                Ok(reading) => sink.publish(&reading),
                Err(err) => {
                    warn!(error = %err, frames = self.frames - start, "acquisition loop failed");
                    return Err(err);
                }
            }
        }

        let processed = self.frames - start;
        info!(frames = processed, "acquisition loop stopped");
        Ok(processed)
    }

    /// Total frames decoded by this monitor.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Borrow the underlying source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Consume the monitor and return the source.
    pub fn into_inner(self) -> S {
        self.source
    }
}

/// Handle to a reader loop running on its own thread.
pub struct MonitorHandle {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<Result<u64>>,
}

impl MonitorHandle {
    /// Ask the loop to stop before its next read.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// True once the loop has returned.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the loop to return.
    pub fn join(self) -> Result<u64> {
        self.thread.join().map_err(|_| MonitorError::Panicked)?
    }
}

/// Run the reader loop on a dedicated thread.
pub fn spawn<S, K>(source: S, sink: K) -> Result<MonitorHandle>
where
    S: FrameSource + Send + 'static,
    K: ReadingSink + Send + 'static,
{
    let stop = Arc::new(AtomicBool::new(false));
    let signal = Arc::clone(&stop);

    let thread = std::thread::Builder::new()
        .name(THREAD_NAME.to_string())
        .spawn(move || Monitor::new(source).run(&sink, &signal))
        .map_err(MonitorError::Spawn)?;

    Ok(MonitorHandle { stop, thread })
}

/// Run the reader loop on tokio's blocking pool until `token` is cancelled.
#[cfg(feature = "async")]
pub fn spawn_blocking<S, K>(
    source: S,
    sink: K,
    token: tokio_util::sync::CancellationToken,
) -> tokio::task::JoinHandle<Result<u64>>
where
    S: FrameSource + Send + 'static,
    K: ReadingSink + Send + 'static,
{
    tokio::task::spawn_blocking(move || Monitor::new(source).run(&sink, &token))
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use co2mon_frame::{obfuscate, FrameError, Quantity, RawFrame, Record};

    use super::*;
    use crate::readings::Readings;
    use crate::signal::Never;

    fn wire(operation: u8, value: u16) -> RawFrame {
        obfuscate(&Record { operation, value }.to_plaintext())
    }

    struct ScriptedSource {
        frames: VecDeque<RawFrame>,
        reads: usize,
    }

    impl ScriptedSource {
        fn new(frames: impl IntoIterator<Item = RawFrame>) -> Self {
            Self {
                frames: frames.into_iter().collect(),
                reads: 0,
            }
        }
    }

    impl FrameSource for ScriptedSource {
        fn initialize(&mut self) -> co2mon_frame::Result<()> {
            Ok(())
        }

        fn read_frame(&mut self) -> co2mon_frame::Result<RawFrame> {
            self.reads += 1;
            self.frames
                .pop_front()
                .ok_or(FrameError::ConnectionClosed { received: 0 })
        }
    }

    /// Emits CO2 frames forever, a little slower than a busy loop.
    struct EndlessSource {
        next: u16,
    }

    impl FrameSource for EndlessSource {
        fn initialize(&mut self) -> co2mon_frame::Result<()> {
            Ok(())
        }

        fn read_frame(&mut self) -> co2mon_frame::Result<RawFrame> {
            std::thread::sleep(Duration::from_millis(1));
            self.next = self.next.wrapping_add(1);
            Ok(wire(b'P', self.next))
        }
    }

    #[derive(Default)]
    struct Collect(Mutex<Vec<Reading>>);

    impl ReadingSink for Collect {
        fn publish(&self, reading: &Reading) {
            self.0.lock().unwrap().push(*reading);
        }
    }

    #[test]
    fn step_converts_each_quantity() {
        let mut monitor = Monitor::new(ScriptedSource::new([
            wire(b'P', 404),
            wire(b'B', 4392),
            wire(b'A', 4530),
        ]));

        assert_eq!(monitor.step().unwrap(), Reading::Co2 { ppm: 404 });
        assert!(matches!(monitor.step().unwrap(), Reading::Temperature { celsius } if (celsius - 1.35).abs() < 1e-9));
        assert!(matches!(monitor.step().unwrap(), Reading::Humidity { rh } if (rh - 45.3).abs() < 1e-9));
        assert_eq!(monitor.frames(), 3);
    }

    #[test]
    fn run_publishes_in_order_then_propagates_end_of_stream() {
        let mut monitor = Monitor::new(ScriptedSource::new([
            wire(b'P', 500),
            wire(b'm', 0x1234),
            [0x50, 0x01, 0x94, 0xe5, 0x0d, 0x00, 0x00, 0x00],
        ]));
        let sink = Collect::default();

        let err = monitor.run(&sink, &Never).unwrap_err();
        assert!(err.is_end_of_stream());

        let seen = sink.0.into_inner().unwrap();
        assert_eq!(
            seen,
            vec![
                Reading::Co2 { ppm: 500 },
                Reading::Unknown {
                    operation: b'm',
                    value: 0x1234
                },
                Reading::Co2 { ppm: 404 },
            ]
        );
    }

    #[test]
    fn checksum_error_is_fatal() {
        let mut monitor = Monitor::new(ScriptedSource::new([
            wire(b'P', 450),
            [0xff; 8],
            wire(b'P', 460),
        ]));
        let readings = Readings::new();

        let err = monitor.run(&readings, &Never).unwrap_err();
        assert!(matches!(err, MonitorError::Frame(FrameError::Checksum { .. })));
        assert!(!err.is_end_of_stream());

        assert_eq!(readings.latest(Quantity::Co2), Some(450.0));
        assert_eq!(monitor.get_ref().reads, 2);
    }

    #[test]
    fn stop_is_checked_before_reading() {
        let mut monitor = Monitor::new(ScriptedSource::new([wire(b'P', 404)]));
        let stop = AtomicBool::new(true);

        assert_eq!(monitor.run(&Readings::new(), &stop).unwrap(), 0);
        assert_eq!(monitor.into_inner().reads, 0);
    }

    #[test]
    fn stop_between_frames() {
        struct StopAfter {
            limit: usize,
            seen: Mutex<usize>,
            stop: Arc<AtomicBool>,
        }

        impl ReadingSink for StopAfter {
            fn publish(&self, _reading: &Reading) {
                let mut seen = self.seen.lock().unwrap();
                *seen += 1;
                if *seen >= self.limit {
                    self.stop.store(true, Ordering::SeqCst);
                }
            }
        }

        let stop = Arc::new(AtomicBool::new(false));
        let sink = StopAfter {
            limit: 2,
            seen: Mutex::new(0),
            stop: Arc::clone(&stop),
        };
        let mut monitor = Monitor::new(EndlessSource { next: 400 });

        assert_eq!(monitor.run(&sink, &stop).unwrap(), 2);
    }

    #[test]
    fn spawned_loop_publishes_until_stream_ends() {
        let readings = Arc::new(Readings::new());
        let source = ScriptedSource::new([wire(b'B', 4711), wire(b'A', 3876), wire(b'P', 733)]);

        let handle = spawn(source, Arc::clone(&readings)).unwrap();
        let err = handle.join().unwrap_err();
        assert!(err.is_end_of_stream());

        let snapshot = readings.snapshot();
        assert_eq!(snapshot.co2_ppm, Some(733.0));
        assert_eq!(snapshot.humidity_rh, Some(38.76));
        assert_eq!(snapshot.frames, 3);
    }

    #[test]
    fn spawned_loop_stops_on_request() {
        let readings = Arc::new(Readings::new());
        let handle = spawn(EndlessSource { next: 0 }, Arc::clone(&readings)).unwrap();

        while readings.frames() < 5 {
            std::thread::sleep(Duration::from_millis(1));
        }
        handle.stop();

        let processed = handle.join().unwrap();
        assert!(processed >= 5);
        assert!(readings.latest(Quantity::Co2).is_some());
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn blocking_task_stops_on_cancel() {
        let readings = Arc::new(Readings::new());
        let token = tokio_util::sync::CancellationToken::new();

        let task = spawn_blocking(EndlessSource { next: 0 }, Arc::clone(&readings), token.clone());
        while readings.frames() < 3 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        token.cancel();

        let processed = task.await.unwrap().unwrap();
        assert!(processed >= 3);
    }
}

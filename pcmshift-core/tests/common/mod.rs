// pcmshift-core/tests/common/mod.rs

// --- Mocking Infrastructure (for integration tests) ---
//
// Every test binary that pulls this module in uses a different subset of it.
#![allow(dead_code)]

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, FfmpegProgress};
use pcmshift_core::error::{CoreError, CoreResult};
use pcmshift_core::external::{FfmpegProcess, FfmpegSpawner, FfprobeExecutor, StreamInfo};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::os::unix::process::ExitStatusExt; // For ExitStatus::from_raw
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Helper to create a dummy file with some content.
pub fn create_dummy_file(dir: &Path, filename: &str) -> PathBuf {
    let file_path = dir.join(filename);
    let mut file = File::create(&file_path).expect("Failed to create dummy file");
    file.write_all(b"dummy content").expect("Failed to write dummy content");
    file_path
}

/// Sorted file names in a directory.
pub fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read dir")
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn progress_event() -> FfmpegEvent {
    FfmpegEvent::Progress(FfmpegProgress {
        frame: 50,
        fps: 30.0,
        q: 0.0,
        size_kb: 512,
        time: "00:00:01.66".to_string(),
        bitrate_kbps: 2457.6,
        speed: 1.0,
        raw_log_message: String::new(),
    })
}

/// What a mocked ffmpeg run does.
#[derive(Debug, Clone)]
pub enum MockBehaviour {
    /// Exit 0 and write the output file
    Succeed,
    /// Exit 0 without writing anything
    SucceedWithoutOutput,
    /// Exit with the given code after emitting an error line
    ExitWith(i32),
    /// Fail to start at all
    SpawnError,
}

#[derive(Default)]
struct SpawnerState {
    behaviours: Mutex<Vec<(String, MockBehaviour)>>,
    received_calls: Mutex<Vec<Vec<String>>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    run_time: Mutex<Duration>,
}

/// Mock implementation of FfmpegProcess.
pub struct MockFfmpegProcess {
    state: Arc<SpawnerState>,
    events: Vec<FfmpegEvent>,
    exit_code: i32,
    output_to_create: Option<PathBuf>,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        for event in self.events.drain(..) {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        let run_time = *self.state.run_time.lock().unwrap();
        std::thread::sleep(run_time);
        if let Some(output) = &self.output_to_create {
            std::fs::write(output, b"converted content").expect("mock failed to write output");
        }
        self.state.in_flight.fetch_sub(1, Ordering::SeqCst);
        // Raw wait status: exit code lives in the high byte.
        Ok(ExitStatus::from_raw(self.exit_code << 8))
    }
}

/// Mock implementation of FfmpegSpawner.
///
/// Behaviours are matched against any argument containing the pattern; the
/// first match wins. Unmatched commands succeed and write their output.
#[derive(Clone, Default)]
pub struct MockFfmpegSpawner {
    state: Arc<SpawnerState>,
}

impl MockFfmpegSpawner {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn on(&self, arg_pattern: &str, behaviour: MockBehaviour) {
        self.state
            .behaviours
            .lock()
            .unwrap()
            .push((arg_pattern.to_string(), behaviour));
    }

    /// How long each mocked encode takes between spawn and exit.
    pub fn set_run_time(&self, run_time: Duration) {
        *self.state.run_time.lock().unwrap() = run_time;
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.state.received_calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.state.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.state.in_flight.load(Ordering::SeqCst)
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let args: Vec<String> = cmd
            .get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        self.state.received_calls.lock().unwrap().push(args.clone());

        let behaviour = self
            .state
            .behaviours
            .lock()
            .unwrap()
            .iter()
            .find(|(pattern, _)| args.iter().any(|arg| arg.contains(pattern.as_str())))
            .map(|(_, behaviour)| behaviour.clone())
            .unwrap_or(MockBehaviour::Succeed);

        if let MockBehaviour::SpawnError = behaviour {
            return Err(CoreError::CommandStart(
                "ffmpeg".to_string(),
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "mock spawn failure"),
            ));
        }

        let now = self.state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let output = args.last().map(PathBuf::from);
        let process = match behaviour {
            MockBehaviour::Succeed => MockFfmpegProcess {
                state: Arc::clone(&self.state),
                events: vec![progress_event()],
                exit_code: 0,
                output_to_create: output,
            },
            MockBehaviour::SucceedWithoutOutput => MockFfmpegProcess {
                state: Arc::clone(&self.state),
                events: vec![progress_event()],
                exit_code: 0,
                output_to_create: None,
            },
            MockBehaviour::ExitWith(code) => MockFfmpegProcess {
                state: Arc::clone(&self.state),
                events: vec![
                    progress_event(),
                    FfmpegEvent::Error("Simulated ffmpeg error line".to_string()),
                ],
                exit_code: code,
                output_to_create: None,
            },
            MockBehaviour::SpawnError => unreachable!(),
        };
        Ok(process)
    }
}

/// Mock implementation of FfprobeExecutor keyed by file name.
#[derive(Clone, Default)]
pub struct MockFfprobeExecutor {
    results: Arc<Mutex<HashMap<String, Result<StreamInfo, String>>>>,
    probed: Arc<Mutex<Vec<String>>>,
}

impl MockFfprobeExecutor {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn expect_audio(&self, file_name: &str, codec: &str, tracks: u32) {
        self.results.lock().unwrap().insert(
            file_name.to_string(),
            Ok(StreamInfo::new(Some(codec.to_string()), tracks)),
        );
    }

    pub fn expect_no_audio(&self, file_name: &str) {
        self.results
            .lock()
            .unwrap()
            .insert(file_name.to_string(), Ok(StreamInfo::none()));
    }

    pub fn expect_failure(&self, file_name: &str, message: &str) {
        self.results
            .lock()
            .unwrap()
            .insert(file_name.to_string(), Err(message.to_string()));
    }

    pub fn probed(&self) -> Vec<String> {
        self.probed.lock().unwrap().clone()
    }
}

impl FfprobeExecutor for MockFfprobeExecutor {
    fn inspect_audio(&self, input_path: &Path) -> CoreResult<StreamInfo> {
        let name = input_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.probed.lock().unwrap().push(name.clone());
        match self.results.lock().unwrap().get(&name) {
            Some(Ok(info)) => Ok(info.clone()),
            Some(Err(message)) => Err(CoreError::Probe(message.clone())),
            None => Err(CoreError::Probe(format!(
                "MockFfprobeExecutor: no expectation set for {name}"
            ))),
        }
    }
}

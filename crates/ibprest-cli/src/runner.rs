use crate::error::{CliError, Result};
use ibprest::core::io::dcd::Trajectory;
use ibprest::core::io::runscript::IbpInvocation;
use std::fs::File;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Result of one iBP-ng run. A run that fails, times out or leaves no
/// trajectory frames is a `NoSolution`, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Solved { elapsed: Duration },
    NoSolution { elapsed: Duration },
}

impl RunOutcome {
    pub fn solved(&self) -> bool {
        matches!(self, RunOutcome::Solved { .. })
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            RunOutcome::Solved { elapsed } | RunOutcome::NoSolution { elapsed } => *elapsed,
        }
    }
}

/// Runs iBP-ng inside `working_dir` and waits for it, at most `timeout`.
///
/// Paths of the invocation are resolved against `working_dir`. With
/// `log_stem`, stdout and stderr go to `{log_stem}.out` and `{log_stem}.err`
/// there; otherwise they are discarded.
pub async fn run_ibp(
    invocation: &IbpInvocation,
    working_dir: &Path,
    timeout: Option<Duration>,
    log_stem: Option<&str>,
) -> Result<RunOutcome> {
    let (stdout, stderr) = match log_stem {
        Some(stem) => (
            Stdio::from(File::create(working_dir.join(format!("{stem}.out")))?),
            Stdio::from(File::create(working_dir.join(format!("{stem}.err")))?),
        ),
        None => (Stdio::null(), Stdio::null()),
    };

    let args = invocation.args();
    debug!(executable = ?invocation.executable, ?args, "Spawning iBP-ng.");

    let started = Instant::now();
    let mut child = Command::new(&invocation.executable)
        .args(&args)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(stdout)
        .stderr(stderr)
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| CliError::Process {
            program: invocation.executable.clone(),
            source,
        })?;

    let status = match timeout {
        Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
            Ok(status) => Some(status?),
            Err(_) => {
                warn!(?limit, "iBP-ng did not finish within the time budget.");
                if let Err(e) = child.kill().await {
                    warn!("Failed to stop iBP-ng: {}", e);
                }
                None
            }
        },
        None => Some(child.wait().await?),
    };
    let elapsed = started.elapsed();

    let Some(status) = status else {
        return Ok(RunOutcome::NoSolution { elapsed });
    };
    if !status.success() {
        info!(%status, "iBP-ng exited without success.");
        return Ok(RunOutcome::NoSolution { elapsed });
    }

    let output = working_dir.join(&invocation.output);
    match Trajectory::read_from_path(&output) {
        Ok(trajectory) if trajectory.frame_count() > 0 => {
            info!(
                frames = trajectory.frame_count(),
                elapsed = elapsed.as_secs_f64(),
                "iBP-ng found solutions."
            );
            Ok(RunOutcome::Solved { elapsed })
        }
        Ok(_) => {
            info!("iBP-ng wrote an empty trajectory.");
            Ok(RunOutcome::NoSolution { elapsed })
        }
        Err(e) => {
            info!("No readable trajectory at {:?}: {}", output, e);
            Ok(RunOutcome::NoSolution { elapsed })
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn one_frame_dcd() -> Vec<u8> {
        let mut out = Vec::new();
        let push = |out: &mut Vec<u8>, v: i32| out.extend_from_slice(&v.to_le_bytes());
        push(&mut out, 84);
        out.extend_from_slice(b"CORD");
        for v in [1, 0, 1, 0, 0, 0, 0, 0, 0] {
            push(&mut out, v);
        }
        out.extend_from_slice(&1.0f64.to_le_bytes());
        for _ in 0..10 {
            push(&mut out, 0);
        }
        push(&mut out, 164);
        push(&mut out, 2);
        out.extend_from_slice(&[b' '; 160]);
        push(&mut out, 164);
        push(&mut out, 4);
        push(&mut out, 2);
        push(&mut out, 4);
        for axis in [[0.0f32, 1.5], [0.0, 0.0], [0.0, 0.0]] {
            push(&mut out, 8);
            for v in axis {
                out.extend_from_slice(&v.to_le_bytes());
            }
            push(&mut out, 8);
        }
        out
    }

    /// An executable standing in for iBP-ng. The output path is the 8th
    /// argument when no `-v` flags are passed.
    fn fake_ibp(dir: &Path, body: &str) -> IbpInvocation {
        let path = dir.join("fake-ibp");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        IbpInvocation {
            executable: path,
            verbosity: 0,
            ..IbpInvocation::default()
        }
    }

    #[tokio::test]
    async fn run_with_trajectory_output_is_solved() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("solution.dcd"), one_frame_dcd()).unwrap();
        let invocation = fake_ibp(dir.path(), "echo solving; cp solution.dcd \"$8\"");

        let outcome = run_ibp(&invocation, dir.path(), None, Some("loops-1.0-6.0"))
            .await
            .unwrap();
        assert!(outcome.solved());
        let log = fs::read_to_string(dir.path().join("loops-1.0-6.0.out")).unwrap();
        assert_eq!(log.trim(), "solving");
    }

    #[tokio::test]
    async fn failing_exit_status_is_no_solution() {
        let dir = tempdir().unwrap();
        let invocation = fake_ibp(dir.path(), "exit 3");
        let outcome = run_ibp(&invocation, dir.path(), None, None).await.unwrap();
        assert!(matches!(outcome, RunOutcome::NoSolution { .. }));
    }

    #[tokio::test]
    async fn success_without_output_is_no_solution() {
        let dir = tempdir().unwrap();
        let invocation = fake_ibp(dir.path(), "exit 0");
        let outcome = run_ibp(&invocation, dir.path(), None, None).await.unwrap();
        assert!(!outcome.solved());
    }

    #[tokio::test]
    async fn timeout_stops_the_run() {
        let dir = tempdir().unwrap();
        let invocation = fake_ibp(dir.path(), "sleep 10");
        let outcome = run_ibp(
            &invocation,
            dir.path(),
            Some(Duration::from_millis(200)),
            None,
        )
        .await
        .unwrap();
        assert!(!outcome.solved());
        assert!(outcome.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn missing_executable_is_an_error() {
        let dir = tempdir().unwrap();
        let invocation = IbpInvocation {
            executable: PathBuf::from("/nonexistent/ibp-ng"),
            ..IbpInvocation::default()
        };
        assert!(matches!(
            run_ibp(&invocation, dir.path(), None, None).await,
            Err(CliError::Process { .. })
        ));
    }
}

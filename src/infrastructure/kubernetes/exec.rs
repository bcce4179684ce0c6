// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! Interactive exec into a pod with the local terminal attached.

use crate::shared::error::{KubeError, Result};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use k8s_openapi::api::core::v1::Pod;
use kube::api::AttachParams;
use kube::Api;
use std::io::{IsTerminal, Read};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::debug;

const STDIN_CHUNK_SIZE: usize = 4096;

/// Puts the terminal into raw mode and restores it when dropped.
struct RawModeGuard {
    enabled: bool,
}

impl RawModeGuard {
    fn enable() -> Result<Self> {
        if !std::io::stdin().is_terminal() {
            return Ok(Self { enabled: false });
        }
        enable_raw_mode()?;
        Ok(Self { enabled: true })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.enabled {
            let _ = disable_raw_mode();
        }
    }
}

/// Reads local stdin on a detached thread. The thread is not owned by the
/// runtime, so a read that is still blocked never delays process exit.
/// The channel closes on local EOF.
fn spawn_stdin_reader() -> Result<mpsc::Receiver<Vec<u8>>> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::Builder::new()
        .name("exec-stdin".to_string())
        .spawn(move || {
            let mut stdin = std::io::stdin();
            let mut buf = [0u8; STDIN_CHUNK_SIZE];
            loop {
                match stdin.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        if tx.blocking_send(buf[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        debug!("local stdin closed: {}", e);
                        break;
                    }
                }
            }
        })?;
    Ok(rx)
}

/// Moves bytes between the local side and an attached remote process.
///
/// Local input is written to `remote_stdin` until the channel closes, then
/// `remote_stdin` is shut down so the remote process sees EOF. Returns once
/// `remote_stdout` ends, whether or not local input is still open.
async fn pump_session<W, R, O>(
    mut input: mpsc::Receiver<Vec<u8>>,
    mut remote_stdin: W,
    mut remote_stdout: R,
    mut local_stdout: O,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
    R: AsyncRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let forward_input = async {
        while let Some(chunk) = input.recv().await {
            remote_stdin.write_all(&chunk).await?;
            remote_stdin.flush().await?;
        }
        remote_stdin.shutdown().await
    };
    let copy_output = tokio::io::copy(&mut remote_stdout, &mut local_stdout);
    tokio::pin!(forward_input, copy_output);

    tokio::select! {
        copied = &mut copy_output => {
            copied?;
        }
        forwarded = &mut forward_input => {
            if let Err(e) = forwarded {
                debug!("remote stdin closed: {}", e);
            }
            copy_output.await?;
        }
    }
    Ok(())
}

/// Runs `command` in `container` with stdin, stdout and a TTY forwarded,
/// returning when the remote process exits.
pub async fn attach_interactive(
    pods: &Api<Pod>,
    pod: &str,
    container: &str,
    command: Vec<String>,
) -> Result<()> {
    debug!("exec in pod {} container {}: {:?}", pod, container, command);
    let params = AttachParams::interactive_tty().container(container);
    let mut attached = pods.exec(pod, command, &params).await?;

    let remote_stdin = attached
        .stdin()
        .ok_or_else(|| KubeError::KubeError(format!("no stdin stream for pod {}", pod)))?;
    let remote_stdout = attached
        .stdout()
        .ok_or_else(|| KubeError::KubeError(format!("no stdout stream for pod {}", pod)))?;

    let _guard = RawModeGuard::enable()?;
    let input = spawn_stdin_reader()?;
    pump_session(input, remote_stdin, remote_stdout, tokio::io::stdout()).await?;

    attached
        .join()
        .await
        .map_err(|e| KubeError::KubeError(format!("exec in pod {} failed: {}", pod, e)))
}

//! Flash upload orchestration
//!
//! Validates a flash request, builds the esptool `write_flash` invocation and
//! runs it as a child process exactly once. Nothing is retried: an aborted
//! write can leave the storage partition half-programmed, so a second attempt
//! is left to the operator.

use crate::errors::{Result, UploadError};
use crate::models::{FlashRequest, FlashResult, OutputMode};
use crate::utils::esptool_utils;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

/// Options controlling how the flashing tool is run
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// Capture tool output or forward it to the terminal live
    pub mode: OutputMode,
    /// Run the tool from its install directory instead of the current one
    pub run_in_tool_dir: bool,
    /// Kill the tool if it runs longer than this many seconds
    pub timeout_secs: Option<u64>,
}

/// Executes an assembled command line.
///
/// The upload service validates everything before calling into this seam, so
/// tests can substitute a recording implementation and assert that failed
/// validation never launches a process.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn run(
        &self,
        argv: &[String],
        cwd: Option<&Path>,
        mode: OutputMode,
        timeout_secs: Option<u64>,
    ) -> Result<FlashResult>;
}

/// Executor backed by a real child process
pub struct ProcessExecutor;

#[async_trait]
impl CommandExecutor for ProcessExecutor {
    async fn run(
        &self,
        argv: &[String],
        cwd: Option<&Path>,
        mode: OutputMode,
        timeout_secs: Option<u64>,
    ) -> Result<FlashResult> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| UploadError::Config("Empty command line".to_string()))?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(UploadError::Launch)?;
        let stdout = child.stdout.take().unwrap();
        let stderr = child.stderr.take().unwrap();

        let stdout_task = tokio::spawn(drain_stream(stdout, mode, false));
        let stderr_task = tokio::spawn(drain_stream(stderr, mode, true));

        let status = match timeout_secs {
            Some(secs) => {
                match tokio::time::timeout(Duration::from_secs(secs), child.wait()).await {
                    Ok(status) => status.map_err(UploadError::Io)?,
                    Err(_) => {
                        let _ = child.kill().await;
                        return Err(UploadError::Timeout(secs));
                    }
                }
            }
            None => child.wait().await.map_err(UploadError::Io)?,
        };

        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();

        Ok(FlashResult {
            exit_code: status.code().unwrap_or(1),
            stdout,
            stderr,
        })
    }
}

/// Read one of the child's streams to the end, either collecting it or
/// forwarding it to the terminal line by line
async fn drain_stream<R>(stream: R, mode: OutputMode, is_stderr: bool) -> String
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut buffer = String::new();
    let mut collected = String::new();

    while reader.read_line(&mut buffer).await.unwrap_or(0) > 0 {
        match mode {
            OutputMode::Stream => {
                if is_stderr {
                    eprint!("{}", buffer);
                } else {
                    print!("{}", buffer);
                }
            }
            OutputMode::Capture => collected.push_str(&buffer),
        }
        buffer.clear();
    }

    collected
}

/// Upload service performing one flash operation per request
pub struct UploadService {
    options: UploadOptions,
}

impl UploadService {
    pub fn new(options: UploadOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &UploadOptions {
        &self.options
    }

    /// Assemble the argument vector for the tool.
    ///
    /// The token order is the one esptool expects:
    /// `[python] esptool.py [--chip CHIP] --port PORT [--baud BAUD]
    /// write_flash 0xOFFSET IMAGE`, with the offset rendered in hexadecimal.
    /// When running from the tool's install directory the image path is made
    /// absolute first, so it still resolves from the changed working
    /// directory.
    pub fn build_command(&self, request: &FlashRequest) -> Result<Vec<String>> {
        let image = if self.options.run_in_tool_dir {
            std::path::absolute(&request.image).map_err(UploadError::Io)?
        } else {
            request.image.clone()
        };

        let mut argv = Vec::new();
        if let Some(python) = &request.interpreter {
            argv.push(python.display().to_string());
        }
        argv.push(request.tool.display().to_string());
        if let Some(chip) = &request.chip {
            argv.push("--chip".to_string());
            argv.push(chip.clone());
        }
        argv.push("--port".to_string());
        argv.push(request.port.clone());
        if let Some(baud) = request.baud {
            argv.push("--baud".to_string());
            argv.push(baud.to_string());
        }
        argv.push("write_flash".to_string());
        argv.push(format!("0x{:x}", request.offset));
        argv.push(image.display().to_string());

        Ok(argv)
    }

    /// Run the upload with the default process executor
    pub async fn upload(&self, request: &FlashRequest) -> Result<FlashResult> {
        self.upload_with(&ProcessExecutor, request).await
    }

    /// Run the upload through a specific executor.
    ///
    /// Tool and image existence are checked before the executor is invoked,
    /// so a missing installation never launches a process.
    pub async fn upload_with(
        &self,
        executor: &dyn CommandExecutor,
        request: &FlashRequest,
    ) -> Result<FlashResult> {
        if !request.tool.exists() {
            return Err(UploadError::ToolNotFound(request.tool.clone()));
        }
        if !request.image.exists() {
            return Err(UploadError::ImageNotFound(request.image.clone()));
        }

        let argv = self.build_command(request)?;
        let cwd = self
            .options
            .run_in_tool_dir
            .then(|| esptool_utils::tool_install_dir(&request.tool));

        log::debug!("Flash command: {}", format_command(&argv));

        executor
            .run(
                &argv,
                cwd.as_deref(),
                self.options.mode,
                self.options.timeout_secs,
            )
            .await
    }
}

/// Render an argument vector as a single printable command line, quoting
/// tokens that contain whitespace
pub fn format_command(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| {
            if arg.contains(' ') {
                format!("\"{}\"", arg)
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

//! End-to-end execution tests driving fake flashing tools
//!
//! Shell scripts stand in for esptool so the full spawn / wait / capture
//! path runs for real, including exit code propagation and timeouts.

#![cfg(unix)]


use espupload::errors::UploadError;
use espupload::models::{FlashRequest, OutputMode};
use espupload::services::{CommandExecutor, ProcessExecutor, UploadOptions, UploadService};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use test_fixtures::{create_fake_tool, create_image};

fn request_for(tool: PathBuf, image: PathBuf) -> FlashRequest {
    FlashRequest {
        interpreter: None,
        tool,
        chip: None,
        port: "/dev/null".to_string(),
        baud: None,
        offset: 0x580000,
        image,
    }
}

#[tokio::test]
async fn test_child_exit_code_and_stdout_captured() {
    let dir = TempDir::new().unwrap();
    let tool = create_fake_tool(
        dir.path(),
        "esptool",
        "#!/bin/sh\necho \"Wrote 1024 bytes at 0x00580000\"\nexit 0\n",
    )
    .unwrap();
    let image = create_image(dir.path(), "littlefs_image.bin").unwrap();

    let service = UploadService::new(UploadOptions::default());
    let result = service.upload(&request_for(tool, image)).await.unwrap();

    assert!(result.success());
    assert!(result.stdout.contains("Wrote 1024 bytes"));
    assert!(result.stderr.is_empty());
}

#[tokio::test]
async fn test_child_failure_propagates_code_and_stderr() {
    let dir = TempDir::new().unwrap();
    let tool = create_fake_tool(
        dir.path(),
        "esptool",
        "#!/bin/sh\necho \"could not connect\" >&2\nexit 2\n",
    )
    .unwrap();
    let image = create_image(dir.path(), "littlefs_image.bin").unwrap();

    let service = UploadService::new(UploadOptions::default());
    let result = service.upload(&request_for(tool, image)).await.unwrap();

    assert_eq!(result.exit_code, 2);
    assert!(result.stderr.contains("could not connect"));
}

#[tokio::test]
async fn test_fake_tool_sees_expected_arguments() {
    let dir = TempDir::new().unwrap();
    let args_file = dir.path().join("args.txt");
    let tool = create_fake_tool(
        dir.path(),
        "esptool",
        &format!("#!/bin/sh\necho \"$@\" > \"{}\"\n", args_file.display()),
    )
    .unwrap();
    let image = create_image(dir.path(), "littlefs_image.bin").unwrap();

    let service = UploadService::new(UploadOptions::default());
    let result = service
        .upload(&request_for(tool, image.clone()))
        .await
        .unwrap();
    assert!(result.success());

    let recorded = fs::read_to_string(&args_file).unwrap();
    assert_eq!(
        recorded.trim(),
        format!("--port /dev/null write_flash 0x580000 {}", image.display())
    );
}

#[tokio::test]
async fn test_launch_error_for_missing_program() {
    let executor = ProcessExecutor;
    let argv = vec![
        "/nonexistent/esptool".to_string(),
        "--port".to_string(),
        "/dev/null".to_string(),
    ];

    let err = executor
        .run(&argv, None, OutputMode::Capture, None)
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::Launch(_)));
}

#[tokio::test]
async fn test_timeout_kills_hanging_tool() {
    let dir = TempDir::new().unwrap();
    let tool = create_fake_tool(dir.path(), "esptool", "#!/bin/sh\nsleep 30\n").unwrap();
    let image = create_image(dir.path(), "littlefs_image.bin").unwrap();

    let service = UploadService::new(UploadOptions {
        timeout_secs: Some(1),
        ..UploadOptions::default()
    });

    let err = service
        .upload(&request_for(tool, image))
        .await
        .unwrap_err();
    match err {
        UploadError::Timeout(secs) => assert_eq!(secs, 1),
        other => panic!("Expected Timeout, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_stream_mode_leaves_captured_output_empty() {
    let dir = TempDir::new().unwrap();
    let tool = create_fake_tool(
        dir.path(),
        "esptool",
        "#!/bin/sh\necho \"Connecting...\"\nexit 0\n",
    )
    .unwrap();
    let image = create_image(dir.path(), "littlefs_image.bin").unwrap();

    let service = UploadService::new(UploadOptions {
        mode: OutputMode::Stream,
        ..UploadOptions::default()
    });
    let result = service.upload(&request_for(tool, image)).await.unwrap();

    // Output went to the terminal live, nothing is retained
    assert!(result.success());
    assert!(result.stdout.is_empty());
    assert!(result.stderr.is_empty());
}

#[tokio::test]
async fn test_tool_runs_from_its_install_dir_when_asked() {
    let dir = TempDir::new().unwrap();
    let cwd_file = dir.path().join("cwd.txt");
    let tool = create_fake_tool(
        dir.path(),
        "esptool",
        &format!("#!/bin/sh\npwd > \"{}\"\n", cwd_file.display()),
    )
    .unwrap();
    let image = create_image(dir.path(), "littlefs_image.bin").unwrap();

    let service = UploadService::new(UploadOptions {
        run_in_tool_dir: true,
        ..UploadOptions::default()
    });
    let result = service.upload(&request_for(tool, image)).await.unwrap();
    assert!(result.success());

    let child_cwd = fs::read_to_string(&cwd_file).unwrap();
    let expected = dir.path().canonicalize().unwrap();
    assert_eq!(
        PathBuf::from(child_cwd.trim()).canonicalize().unwrap(),
        expected
    );
}

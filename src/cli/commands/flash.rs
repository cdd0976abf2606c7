use crate::cli::args::{Cli, FlashArgs};
use crate::config::UploadConfig;
use crate::errors::UploadError;
use crate::models::{FlashRequest, OutputMode};
use crate::services::{UploadOptions, UploadService, format_command};
use crate::utils::esptool_utils;
use anyhow::Result;

pub async fn execute_flash_command(cli: &Cli, args: &FlashArgs) -> Result<()> {
    let mut config = UploadConfig::load(cli.config.as_deref())?;
    config.apply_env();
    args.apply(&mut config);

    println!("⚡ espupload - LittleFS image upload");
    println!("📁 Image: {}", config.image.display());
    println!("🔌 Port: {} @ offset 0x{:x}", config.port, config.offset);

    let packages_dir = config
        .packages_dir
        .clone()
        .unwrap_or_else(esptool_utils::platformio_packages_dir);
    let tool = esptool_utils::resolve_esptool(config.esptool.as_deref(), &packages_dir)?;

    // esptool.py needs an interpreter; a pip-installed esptool binary does not
    let interpreter = if esptool_utils::needs_interpreter(&tool) {
        Some(esptool_utils::resolve_interpreter(config.python.as_deref())?)
    } else {
        None
    };

    let request = FlashRequest {
        interpreter,
        tool,
        chip: config.chip.clone(),
        port: config.port.clone(),
        baud: config.baud,
        offset: config.offset,
        image: config.image.clone(),
    };

    let mode = if config.stream {
        OutputMode::Stream
    } else {
        OutputMode::Capture
    };
    let service = UploadService::new(UploadOptions {
        mode,
        run_in_tool_dir: config.run_in_tool_dir,
        timeout_secs: config.timeout_secs,
    });

    let command = service.build_command(&request)?;
    println!("🔨 Executing: {}", format_command(&command));

    let result = service.upload(&request).await?;

    if mode == OutputMode::Capture {
        println!("STDOUT:");
        println!("{}", result.stdout);
        if !result.stderr.is_empty() {
            println!("STDERR:");
            println!("{}", result.stderr);
        }
    }

    if result.success() {
        println!("✅ Flash completed successfully");
        Ok(())
    } else {
        println!("❌ Flash failed with exit code {}", result.exit_code);
        Err(UploadError::Execution(result.exit_code).into())
    }
}

use anyhow::{Context, Result};
use serialport::SerialPortType;

/// List serial ports so the operator can pick the right `--port` value
pub fn execute_ports_command() -> Result<()> {
    let ports = serialport::available_ports().context("Failed to enumerate serial ports")?;

    if ports.is_empty() {
        println!("No serial ports found");
        return Ok(());
    }

    println!("🔍 Available serial ports:");
    for port in ports {
        match &port.port_type {
            SerialPortType::UsbPort(info) => {
                let product = info.product.as_deref().unwrap_or("unknown device");
                println!(
                    "  {} - USB {:04x}:{:04x} ({})",
                    port.port_name, info.vid, info.pid, product
                );
            }
            _ => println!("  {}", port.port_name),
        }
    }

    Ok(())
}

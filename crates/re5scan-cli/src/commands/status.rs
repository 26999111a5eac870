//! Status command implementation.

use anyhow::Result;
use re5scan_core::{Error, MemoryScanner, MonitorConfig, ProcessHandle, identify};

/// Attach once, resolve every chain and print what was found
pub fn run(config: &MonitorConfig) -> Result<()> {
    let process = ProcessHandle::find(&config.process_name)?
        .ok_or_else(|| Error::ProcessNotFound(config.process_name.clone()))?;

    println!(
        "Found process (PID: {}, Base: 0x{:X})",
        process.pid, process.base_address
    );

    let version = identify(&process.image_path)?;
    println!("Version: {}", version);

    let mut scanner = MemoryScanner::builtin();
    scanner.initialize(process, version)?;
    scanner.update_pointers()?;

    if let Some(resolved) = scanner.resolved() {
        println!();
        println!("Resolved addresses:");
        for (field, address) in resolved.fields() {
            println!("  {:<20} 0x{:08X}", field.to_string(), address);
        }
        println!("  enemy slots in use:  {}", resolved.enemies().len());
    }

    let snapshot = scanner.refresh(version)?;
    println!();
    println!(
        "Chris: {}/{}  Sheva: {}/{}",
        snapshot.chris.current_hp,
        snapshot.chris.max_hp,
        snapshot.sheva.current_hp,
        snapshot.sheva.max_hp
    );
    if let Some(money) = snapshot.money {
        println!("Money: {}", money);
    }
    println!("Living enemies: {}", snapshot.living_enemies().count());

    scanner.dispose();
    Ok(())
}

//! Text rendering for command results

use hedgehog_native::{format_hex_dump, Address, MemoryRegion, RegisterSnapshot, ThreadEntry};
use std::fmt::Write;

pub fn regions(regions: &[MemoryRegion]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<18} {:<18} {:<8} {:<7} {}",
        "start", "end", "prot", "type", "size"
    );
    for region in regions {
        let _ = writeln!(
            out,
            "{:<18} {:<18} {:<8} {:<7} {}",
            region.base_address.to_string(),
            region.end_address().to_string(),
            region.protection.to_string(),
            region.region_type.to_string(),
            region.size
        );
    }
    let total = regions
        .iter()
        .fold(0u64, |total, region| total.saturating_add(region.size));
    let _ = write!(out, "{} regions, {} bytes", regions.len(), total);
    out
}

pub fn memory(address: Address, bytes: &[u8], bytes_per_row: usize) -> String {
    format!(
        "{} ({} bytes)\n{}",
        address,
        bytes.len(),
        format_hex_dump(bytes, bytes_per_row)
    )
}

pub fn threads(entries: &[ThreadEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>10} {:>10}", "tid", "pid");
    for entry in entries {
        let _ = writeln!(out, "{:>10} {:>10}", entry.thread_id, entry.owner_process_id);
    }
    let _ = write!(out, "{} threads", entries.len());
    out
}

pub fn registers(snapshot: &RegisterSnapshot) -> String {
    let mut out = String::new();

    for (name, value) in snapshot.general_purpose.entries() {
        let _ = writeln!(out, "{:<6} 0x{:016x}", name, value);
    }

    let flags = snapshot.flags.set_flags();
    let _ = writeln!(out, "{:<6} 0x{:08x} [{}]", "eflags", snapshot.flags.value, flags.join(" "));

    let segments = &snapshot.segments;
    let _ = writeln!(
        out,
        "cs={:04x} ds={:04x} es={:04x} fs={:04x} gs={:04x} ss={:04x}",
        segments.cs, segments.ds, segments.es, segments.fs, segments.gs, segments.ss
    );

    let debug = &snapshot.debug;
    let _ = writeln!(out, "{:<6} 0x{:016x}", "dr6", debug.dr6);
    let _ = writeln!(out, "{:<6} 0x{:016x}", "dr7", debug.dr7);
    for slot in &debug.breakpoints {
        let address = debug.address(slot.index as usize).unwrap_or_default();
        let state = match (slot.enabled, slot.global) {
            (true, true) => "local+global",
            (true, false) => "local",
            (false, true) => "global",
            (false, false) => "off",
        };
        let _ = writeln!(
            out,
            "dr{}    0x{:016x} {:<12} {:<10} {} byte(s)",
            slot.index, address, state, slot.condition, slot.size
        );
    }

    out.trim_end().to_string()
}

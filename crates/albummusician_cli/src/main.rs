//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `albummusician_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("albummusician_core ping={}", albummusician_core::ping());
    println!(
        "albummusician_core version={}",
        albummusician_core::core_version()
    );
}

//! Opt-in session trace log.
//!
//! Writes to `debug_sculpt.log` in the working directory; the file is
//! recreated on each `init_debug_log()` call. Until a host opts in,
//! every call is a no-op, so library users pay nothing for the
//! instrumentation sprinkled through the session commands.

use std::fs::File;
use std::io::Write;
use std::sync::Mutex;

lazy_static::lazy_static! {
    static ref DEBUG_LOG: Mutex<Option<File>> = Mutex::new(None);
}

/// Log one line to the session trace file, if enabled.
pub fn debug_log(msg: &str) {
    if let Ok(mut guard) = DEBUG_LOG.lock() {
        if let Some(ref mut file) = *guard {
            let _ = writeln!(file, "{}", msg);
            let _ = file.flush();
        }
    }
}

/// Start a fresh trace file (overwrites any existing log).
pub fn init_debug_log() {
    if let Ok(mut guard) = DEBUG_LOG.lock() {
        *guard = File::create("debug_sculpt.log").ok();
        if let Some(ref mut file) = *guard {
            let _ = writeln!(file, "=== SYLVA TERRAIN DEBUG LOG ===");
            let _ = writeln!(file, "Timestamp: {:?}", std::time::SystemTime::now());
            let _ = writeln!(file, "");
        }
    }
}

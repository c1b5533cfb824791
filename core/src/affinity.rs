//! CPU affinity control
//! Single-threaded sweeps pin to one core; workers release to every core

use tracing::{debug, warn};

/// Pin the calling thread to logical core `core`. Returns false when the core
/// does not exist or the platform refuses.
pub fn pin_current(core: usize) -> bool {
    let core_ids = core_affinity::get_core_ids().unwrap_or_default();

    match core_ids.into_iter().find(|id| id.id == core) {
        Some(core_id) => {
            let pinned = core_affinity::set_for_current(core_id);
            if pinned {
                debug!("Pinned thread to CPU core {}", core);
            } else {
                warn!("Failed to pin thread to CPU core {}", core);
            }
            pinned
        }
        None => {
            warn!("CPU core {} not available, running unpinned", core);
            false
        }
    }
}

/// Allow the calling thread to run on any core. New threads inherit their
/// creator's mask on Linux, so workers spawned from a pinned thread must call
/// this themselves.
#[cfg(target_os = "linux")]
pub fn release_current() -> bool {
    // SAFETY: cpu_set_t is plain data; zeroed is the empty set
    unsafe {
        let mut set: libc::cpu_set_t = std::mem::zeroed();
        for cpu in 0..libc::CPU_SETSIZE as usize {
            libc::CPU_SET(cpu, &mut set);
        }
        let rc = libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set);
        if rc != 0 {
            warn!("sched_setaffinity failed: {}", std::io::Error::last_os_error());
        }
        rc == 0
    }
}

#[cfg(not(target_os = "linux"))]
pub fn release_current() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_missing_core_is_reported() {
        assert!(!pin_current(usize::MAX));
    }

    #[test]
    fn test_pin_then_release() {
        std::thread::spawn(|| {
            let first = core_affinity::get_core_ids()
                .unwrap_or_default()
                .first()
                .map(|id| id.id);
            if let Some(core) = first {
                // containers may refuse pinning; only check it doesn't panic
                let _ = pin_current(core);
            }
            #[cfg(target_os = "linux")]
            assert!(release_current());
        })
        .join()
        .unwrap();
    }
}

/*!
 * CPU Affinity
 *
 * Best-effort round-robin pinning of workers to cores. Pinning stabilizes
 * timing and reduces migration noise; refusal is logged and ignored, and
 * platforms without an affinity syscall simply run unpinned.
 */

/// Number of schedulable CPUs, 1 if it cannot be determined.
pub fn online_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Pin the calling worker to `worker_id % online_cpus`.
#[cfg(target_os = "linux")]
pub fn pin_worker(worker_id: usize) {
    use log::warn;
    use nix::sched::{sched_setaffinity, CpuSet};
    use nix::unistd::Pid;

    let target = worker_id % online_cpus();
    let mut set = CpuSet::new();
    if let Err(err) = set.set(target) {
        warn!("worker {worker_id}: cpu {target} outside CpuSet range: {err}");
        return;
    }
    // Pid 0 = the calling thread.
    if let Err(err) = sched_setaffinity(Pid::from_raw(0), &set) {
        warn!("worker {worker_id}: failed to pin to cpu {target}: {err}");
    }
}

#[cfg(not(target_os = "linux"))]
pub fn pin_worker(_worker_id: usize) {}

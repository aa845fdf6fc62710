/// Performance measurement utilities
/// Each rendering stage is timed and logged for optimization analysis
pub mod profiling;

pub use profiling::{CounterSnapshot, FunctionCounters, FUNCTION_COUNTERS};

use std::time::{Duration, Instant};

pub struct PerfTimer {
    name: &'static str,
    start: Instant,
}

impl PerfTimer {
    #[inline]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for PerfTimer {
    fn drop(&mut self) {
        let elapsed = self.elapsed();
        println!("[PERF] {}: {:.2}μs", self.name, elapsed.as_micros());
    }
}

/// Frame time accumulator for the demo shell. Stage times are summed over
/// the run and reported as a percentage split at exit.
pub struct PerfStats {
    pub update_us: f64,
    pub render_us: f64,
    pub present_us: f64,
    pub total_us: f64,
    pub frames: u64,
}

impl PerfStats {
    pub fn new() -> Self {
        Self {
            update_us: 0.0,
            render_us: 0.0,
            present_us: 0.0,
            total_us: 0.0,
            frames: 0,
        }
    }

    pub fn print_summary(&self) {
        println!("\n========== PERFORMANCE SUMMARY ==========");
        println!(
            "Update:          {:8.2}μs ({:5.1}%)",
            self.update_us,
            (self.update_us / self.total_us) * 100.0
        );
        println!(
            "Render:          {:8.2}μs ({:5.1}%)",
            self.render_us,
            (self.render_us / self.total_us) * 100.0
        );
        println!(
            "Present:         {:8.2}μs ({:5.1}%)",
            self.present_us,
            (self.present_us / self.total_us) * 100.0
        );
        println!("─────────────────────────────────────────");
        println!("Total:           {:8.2}μs", self.total_us);
        if self.frames > 0 {
            println!(
                "Frames:          {:8} (avg {:.2}ms/frame)",
                self.frames,
                self.total_us / self.frames as f64 / 1000.0
            );
        }
        println!("=========================================\n");
    }
}

impl Default for PerfStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Macro for easy performance measurement
#[macro_export]
macro_rules! perf_scope {
    ($name:expr) => {
        let _timer = $crate::perf::PerfTimer::new($name);
    };
}

/// Instrumentation and profiling infrastructure for microoptimization
/// Provides function call counting and hardware performance counter integration
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe performance counters for function call tracking
pub struct FunctionCounters {
    // Geometry counters
    pub render_triangle_calls: AtomicU64,
    pub triangles_culled_backface: AtomicU64,
    pub triangles_clipped_away: AtomicU64,
    pub clip_output_triangles: AtomicU64,
    pub triangles_degenerate: AtomicU64,

    // Pixel counters
    pub pixels_covered: AtomicU64,
    pub depth_test_passed: AtomicU64,
    pub depth_test_failed: AtomicU64,

    // Buffer counters
    pub framebuffer_clear_calls: AtomicU64,
    pub depth_clear_calls: AtomicU64,

    // Aggregate metrics
    pub total_pixels_tested: AtomicU64,
    pub total_triangles_processed: AtomicU64,
}

impl FunctionCounters {
    pub const fn new() -> Self {
        Self {
            render_triangle_calls: AtomicU64::new(0),
            triangles_culled_backface: AtomicU64::new(0),
            triangles_clipped_away: AtomicU64::new(0),
            clip_output_triangles: AtomicU64::new(0),
            triangles_degenerate: AtomicU64::new(0),
            pixels_covered: AtomicU64::new(0),
            depth_test_passed: AtomicU64::new(0),
            depth_test_failed: AtomicU64::new(0),
            framebuffer_clear_calls: AtomicU64::new(0),
            depth_clear_calls: AtomicU64::new(0),
            total_pixels_tested: AtomicU64::new(0),
            total_triangles_processed: AtomicU64::new(0),
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.render_triangle_calls.store(0, Ordering::Relaxed);
        self.triangles_culled_backface.store(0, Ordering::Relaxed);
        self.triangles_clipped_away.store(0, Ordering::Relaxed);
        self.clip_output_triangles.store(0, Ordering::Relaxed);
        self.triangles_degenerate.store(0, Ordering::Relaxed);
        self.pixels_covered.store(0, Ordering::Relaxed);
        self.depth_test_passed.store(0, Ordering::Relaxed);
        self.depth_test_failed.store(0, Ordering::Relaxed);
        self.framebuffer_clear_calls.store(0, Ordering::Relaxed);
        self.depth_clear_calls.store(0, Ordering::Relaxed);
        self.total_pixels_tested.store(0, Ordering::Relaxed);
        self.total_triangles_processed.store(0, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            render_triangle_calls: self.render_triangle_calls.load(Ordering::Relaxed),
            triangles_culled_backface: self.triangles_culled_backface.load(Ordering::Relaxed),
            triangles_clipped_away: self.triangles_clipped_away.load(Ordering::Relaxed),
            clip_output_triangles: self.clip_output_triangles.load(Ordering::Relaxed),
            triangles_degenerate: self.triangles_degenerate.load(Ordering::Relaxed),
            pixels_covered: self.pixels_covered.load(Ordering::Relaxed),
            depth_test_passed: self.depth_test_passed.load(Ordering::Relaxed),
            depth_test_failed: self.depth_test_failed.load(Ordering::Relaxed),
            framebuffer_clear_calls: self.framebuffer_clear_calls.load(Ordering::Relaxed),
            depth_clear_calls: self.depth_clear_calls.load(Ordering::Relaxed),
            total_pixels_tested: self.total_pixels_tested.load(Ordering::Relaxed),
            total_triangles_processed: self.total_triangles_processed.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of counter values at a point in time
#[derive(Debug, Clone, Copy)]
pub struct CounterSnapshot {
    pub render_triangle_calls: u64,
    pub triangles_culled_backface: u64,
    pub triangles_clipped_away: u64,
    pub clip_output_triangles: u64,
    pub triangles_degenerate: u64,
    pub pixels_covered: u64,
    pub depth_test_passed: u64,
    pub depth_test_failed: u64,
    pub framebuffer_clear_calls: u64,
    pub depth_clear_calls: u64,
    pub total_pixels_tested: u64,
    pub total_triangles_processed: u64,
}

impl CounterSnapshot {
    /// Print formatted report
    pub fn print_report(&self) {
        println!("\n=== Performance Counters Report ===");
        println!("\nGeometry Operations:");
        println!("  render_triangle calls:      {:12}", self.render_triangle_calls);
        println!("  backface culled:            {:12}", self.triangles_culled_backface);
        println!("  clipped away:               {:12}", self.triangles_clipped_away);
        println!("  clipper output triangles:   {:12}", self.clip_output_triangles);
        println!("  degenerate rejected:        {:12}", self.triangles_degenerate);
        println!("  total triangles processed:  {:12}", self.total_triangles_processed);

        println!("\nPixel Operations:");
        println!("  pixels covered:             {:12}", self.pixels_covered);
        println!("  depth test passed:          {:12}", self.depth_test_passed);
        println!("  depth test failed:          {:12}", self.depth_test_failed);
        if self.pixels_covered > 0 {
            let pass_rate = (self.depth_test_passed as f64 / self.pixels_covered as f64) * 100.0;
            println!("  depth test pass rate:       {:11.2}%", pass_rate);
        }
        println!("  total pixels tested:        {:12}", self.total_pixels_tested);

        println!("\nBuffer Operations:");
        println!("  framebuffer clear calls:    {:12}", self.framebuffer_clear_calls);
        println!("  depth clear calls:          {:12}", self.depth_clear_calls);

        println!();
    }
}

/// Global function counters instance
pub static FUNCTION_COUNTERS: FunctionCounters = FunctionCounters::new();

/// Macro for incrementing a counter (only when profiling feature is enabled)
#[macro_export]
macro_rules! count_call {
    ($counter:expr) => {
        #[cfg(feature = "profiling")]
        {
            $counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        }
        #[cfg(not(feature = "profiling"))]
        {
            let _ = &$counter;
        }
    };
}

/// Macro for adding to a counter (only when profiling feature is enabled)
#[macro_export]
macro_rules! count_add {
    ($counter:expr, $value:expr) => {
        #[cfg(feature = "profiling")]
        {
            $counter.fetch_add($value, std::sync::atomic::Ordering::Relaxed);
        }
        #[cfg(not(feature = "profiling"))]
        {
            let _ = &$counter;
            let _ = $value;
        }
    };
}

/// Hardware performance counter wrapper for benchmarking
#[cfg(feature = "profiling")]
pub mod hardware {
    use perf_event::{Builder, Counter};

    pub struct PerfCounters {
        pub cpu_cycles: Option<Counter>,
        pub instructions: Option<Counter>,
        pub cache_references: Option<Counter>,
        pub cache_misses: Option<Counter>,
        pub branch_instructions: Option<Counter>,
        pub branch_misses: Option<Counter>,
    }

    impl PerfCounters {
        pub fn new() -> Self {
            Self {
                cpu_cycles: Builder::new().kind(perf_event::events::Hardware::CPU_CYCLES).build().ok(),
                instructions: Builder::new().kind(perf_event::events::Hardware::INSTRUCTIONS).build().ok(),
                cache_references: Builder::new().kind(perf_event::events::Hardware::CACHE_REFERENCES).build().ok(),
                cache_misses: Builder::new().kind(perf_event::events::Hardware::CACHE_MISSES).build().ok(),
                branch_instructions: Builder::new().kind(perf_event::events::Hardware::BRANCH_INSTRUCTIONS).build().ok(),
                branch_misses: Builder::new().kind(perf_event::events::Hardware::BRANCH_MISSES).build().ok(),
            }
        }

        pub fn enable_all(&mut self) {
            if let Some(ref mut c) = self.cpu_cycles { let _ = c.enable(); }
            if let Some(ref mut c) = self.instructions { let _ = c.enable(); }
            if let Some(ref mut c) = self.cache_references { let _ = c.enable(); }
            if let Some(ref mut c) = self.cache_misses { let _ = c.enable(); }
            if let Some(ref mut c) = self.branch_instructions { let _ = c.enable(); }
            if let Some(ref mut c) = self.branch_misses { let _ = c.enable(); }
        }

        pub fn disable_all(&mut self) {
            if let Some(ref mut c) = self.cpu_cycles { let _ = c.disable(); }
            if let Some(ref mut c) = self.instructions { let _ = c.disable(); }
            if let Some(ref mut c) = self.cache_references { let _ = c.disable(); }
            if let Some(ref mut c) = self.cache_misses { let _ = c.disable(); }
            if let Some(ref mut c) = self.branch_instructions { let _ = c.disable(); }
            if let Some(ref mut c) = self.branch_misses { let _ = c.disable(); }
        }

        pub fn reset_all(&mut self) {
            if let Some(ref mut c) = self.cpu_cycles { let _ = c.reset(); }
            if let Some(ref mut c) = self.instructions { let _ = c.reset(); }
            if let Some(ref mut c) = self.cache_references { let _ = c.reset(); }
            if let Some(ref mut c) = self.cache_misses { let _ = c.reset(); }
            if let Some(ref mut c) = self.branch_instructions { let _ = c.reset(); }
            if let Some(ref mut c) = self.branch_misses { let _ = c.reset(); }
        }

        pub fn read_all(&mut self) -> PerfSnapshot {
            PerfSnapshot {
                cpu_cycles: self.cpu_cycles.as_mut().and_then(|c| c.read().ok()).unwrap_or(0),
                instructions: self.instructions.as_mut().and_then(|c| c.read().ok()).unwrap_or(0),
                cache_references: self.cache_references.as_mut().and_then(|c| c.read().ok()).unwrap_or(0),
                cache_misses: self.cache_misses.as_mut().and_then(|c| c.read().ok()).unwrap_or(0),
                branch_instructions: self.branch_instructions.as_mut().and_then(|c| c.read().ok()).unwrap_or(0),
                branch_misses: self.branch_misses.as_mut().and_then(|c| c.read().ok()).unwrap_or(0),
            }
        }
    }

    #[derive(Debug, Clone, Copy)]
    pub struct PerfSnapshot {
        pub cpu_cycles: u64,
        pub instructions: u64,
        pub cache_references: u64,
        pub cache_misses: u64,
        pub branch_instructions: u64,
        pub branch_misses: u64,
    }

    impl PerfSnapshot {
        pub fn print_report(&self) {
            println!("\n=== Hardware Performance Counters ===");
            println!("CPU Cycles:            {:16}", self.cpu_cycles);
            println!("Instructions:          {:16}", self.instructions);

            if self.cpu_cycles > 0 {
                let ipc = self.instructions as f64 / self.cpu_cycles as f64;
                println!("IPC (Instructions/Cycle): {:13.3}", ipc);
            }

            println!("\nCache Performance:");
            println!("Cache References:      {:16}", self.cache_references);
            println!("Cache Misses:          {:16}", self.cache_misses);

            if self.cache_references > 0 {
                let hit_rate = ((self.cache_references - self.cache_misses) as f64
                               / self.cache_references as f64) * 100.0;
                let miss_rate = (self.cache_misses as f64 / self.cache_references as f64) * 100.0;
                println!("Cache Hit Rate:        {:13.2}%", hit_rate);
                println!("Cache Miss Rate:       {:13.2}%", miss_rate);
            }

            println!("\nBranch Performance:");
            println!("Branch Instructions:   {:16}", self.branch_instructions);
            println!("Branch Misses:         {:16}", self.branch_misses);

            if self.branch_instructions > 0 {
                let prediction_rate = ((self.branch_instructions - self.branch_misses) as f64
                                      / self.branch_instructions as f64) * 100.0;
                println!("Branch Prediction:     {:13.2}%", prediction_rate);
            }

            println!();
        }
    }
}

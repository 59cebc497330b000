use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

#[derive(Debug, Clone)]
pub struct SystemStats {
    pub cpu_usage: f32,
    pub memory_usage_mb: u64,
    pub peak_memory_mb: u64,
    pub elapsed_time: Duration,
}

/// 記錄批次執行時各階段耗時，啟用時附帶行程記憶體與 CPU 資訊
pub struct RunMonitor {
    #[cfg(feature = "cli")]
    system: Option<(System, Pid)>,
    start_time: Instant,
    peak_memory_mb: u64,
    stage_timings: Vec<(String, Duration)>,
    enabled: bool,
}

impl RunMonitor {
    pub fn new(enabled: bool) -> Self {
        #[cfg(feature = "cli")]
        let system = if enabled {
            sysinfo::get_current_pid().ok().map(|pid| {
                let mut system = System::new_with_specifics(RefreshKind::everything());
                system.refresh_all();
                (system, pid)
            })
        } else {
            None
        };

        Self {
            #[cfg(feature = "cli")]
            system,
            start_time: Instant::now(),
            peak_memory_mb: 0,
            stage_timings: Vec::new(),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn record_stage(&mut self, stage: &str, duration: Duration) {
        tracing::debug!("⏱️ {} took {:?}", stage, duration);
        self.stage_timings.push((stage.to_string(), duration));
    }

    pub fn stage_timings(&self) -> &[(String, Duration)] {
        &self.stage_timings
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    #[cfg(feature = "cli")]
    pub fn get_stats(&mut self) -> Option<SystemStats> {
        if !self.enabled {
            return None;
        }

        let (system, pid) = self.system.as_mut()?;
        system.refresh_all();

        let process = system.process(*pid)?;
        let memory_mb = process.memory() / 1024 / 1024;
        let cpu_usage = process.cpu_usage();

        if memory_mb > self.peak_memory_mb {
            self.peak_memory_mb = memory_mb;
        }

        Some(SystemStats {
            cpu_usage,
            memory_usage_mb: memory_mb,
            peak_memory_mb: self.peak_memory_mb,
            elapsed_time: self.start_time.elapsed(),
        })
    }

    #[cfg(not(feature = "cli"))]
    pub fn get_stats(&mut self) -> Option<SystemStats> {
        None
    }

    pub fn log_stats(&mut self, phase: &str) {
        if let Some(stats) = self.get_stats() {
            tracing::info!(
                "📊 {} - CPU: {:.1}%, Memory: {}MB, Peak: {}MB, Time: {:?}",
                phase,
                stats.cpu_usage,
                stats.memory_usage_mb,
                stats.peak_memory_mb,
                stats.elapsed_time
            );
        }
    }

    pub fn log_final_stats(&mut self) {
        let total: Duration = self.stage_timings.iter().map(|(_, d)| *d).sum();
        tracing::info!(
            "📊 Final Stats - Stages: {}, Stage Time: {:?}, Total Time: {:?}",
            self.stage_timings.len(),
            total,
            self.start_time.elapsed()
        );
        if let Some(stats) = self.get_stats() {
            tracing::info!("📊 Peak Memory: {}MB", stats.peak_memory_mb);
        }
    }
}

impl Default for RunMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

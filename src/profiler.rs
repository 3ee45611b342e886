//! Profiling hooks around the compute phase
//!
//! A run initializes one profiler, brackets every compute phase with a named
//! region and closes the profiler after the last batch.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::span::EnteredSpan;
use tracing::{info, info_span, warn};

use crate::config::ProfilerKind;

/// Receiver of named profiling regions
pub trait Profiler {
    fn init(&mut self) {}

    fn start(&mut self, region: &'static str);

    fn stop(&mut self, region: &'static str);

    fn close(&mut self) {}
}

/// Build the profiler selected on the command line
pub fn create_profiler(kind: ProfilerKind) -> Box<dyn Profiler> {
    match kind {
        ProfilerKind::None => Box::new(NoopProfiler),
        ProfilerKind::Tracing => Box::new(TracingProfiler::default()),
    }
}

/// Ignores every region
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProfiler;

impl Profiler for NoopProfiler {
    fn start(&mut self, _region: &'static str) {}

    fn stop(&mut self, _region: &'static str) {}
}

/// Per-region totals kept by [`TracingProfiler`]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RegionStats {
    pub calls: u64,
    pub total: Duration,
}

/// Opens a `tracing` span per region and accumulates wall time
#[derive(Debug, Default)]
pub struct TracingProfiler {
    active: Vec<(&'static str, EnteredSpan, Instant)>,
    totals: BTreeMap<&'static str, RegionStats>,
}

impl TracingProfiler {
    pub fn stats(&self, region: &str) -> Option<RegionStats> {
        self.totals.get(region).copied()
    }
}

impl Profiler for TracingProfiler {
    fn init(&mut self) {
        self.active.clear();
        self.totals.clear();
    }

    fn start(&mut self, region: &'static str) {
        let span = info_span!("region", name = region).entered();
        self.active.push((region, span, Instant::now()));
    }

    fn stop(&mut self, region: &'static str) {
        let Some(pos) = self.active.iter().rposition(|(name, _, _)| *name == region) else {
            warn!(region, "profiler stop without matching start");
            return;
        };
        let (_, span, started) = self.active.remove(pos);
        drop(span);

        let stats = self.totals.entry(region).or_default();
        stats.calls += 1;
        stats.total += started.elapsed();
    }

    fn close(&mut self) {
        while let Some((region, _, _)) = self.active.last() {
            let region = *region;
            warn!(region, "closing profiler with region still open");
            self.stop(region);
        }
        for (region, stats) in &self.totals {
            info!(
                region,
                calls = stats.calls,
                total_s = stats.total.as_secs_f64(),
                "profiler region summary"
            );
        }
    }
}

/// Keeps a region open until dropped
pub struct ProfileRegion<'a> {
    profiler: &'a mut dyn Profiler,
    region: &'static str,
}

impl<'a> ProfileRegion<'a> {
    pub fn new(profiler: &'a mut dyn Profiler, region: &'static str) -> Self {
        profiler.start(region);
        Self { profiler, region }
    }
}

impl Drop for ProfileRegion<'_> {
    fn drop(&mut self) {
        self.profiler.stop(self.region);
    }
}

use std::io::Write;
use std::sync::Mutex;

use crate::metrics::snapshot::LruMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for cache metrics snapshots.
///
/// Writes the Prometheus text exposition format so the output can be scraped
/// directly or forwarded to an OpenTelemetry collector.
///
/// # Example
///
/// ```
/// use heapcache::metrics::exporter::PrometheusTextExporter;
/// use heapcache::metrics::traits::{MetricsExporter, MetricsSnapshotProvider};
/// use heapcache::policy::lru::LruCache;
/// use heapcache::traits::CoreCache;
///
/// let mut cache = LruCache::new(2);
/// cache.insert(1, "one");
/// cache.get(&1);
///
/// let exporter = PrometheusTextExporter::new("pages", Vec::new());
/// exporter.export(&cache.snapshot());
///
/// let text = String::from_utf8(exporter.into_inner()).unwrap();
/// assert!(text.contains("pages_get_hits_total 1"));
/// ```
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_metric(&self, kind: &str, name: &str, value: u64) {
        let mut writer = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_counter(&self, suffix: &str, value: u64) {
        self.write_metric("counter", &self.metric_name(suffix), value);
    }

    fn write_gauge(&self, suffix: &str, value: u64) {
        self.write_metric("gauge", &self.metric_name(suffix), value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send> MetricsExporter<LruMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &LruMetricsSnapshot) {
        let counters = [
            ("get_calls_total", snapshot.get_calls),
            ("get_hits_total", snapshot.get_hits),
            ("get_misses_total", snapshot.get_misses),
            ("insert_calls_total", snapshot.insert_calls),
            ("insert_updates_total", snapshot.insert_updates),
            ("insert_new_total", snapshot.insert_new),
            ("evict_calls_total", snapshot.evict_calls),
            ("evicted_entries_total", snapshot.evicted_entries),
            ("pop_lru_calls_total", snapshot.pop_lru_calls),
            ("pop_lru_found_total", snapshot.pop_lru_found),
            ("peek_lru_calls_total", snapshot.peek_lru_calls),
            ("peek_lru_found_total", snapshot.peek_lru_found),
            ("touch_calls_total", snapshot.touch_calls),
            ("touch_found_total", snapshot.touch_found),
            ("remove_calls_total", snapshot.remove_calls),
            ("remove_found_total", snapshot.remove_found),
            ("recency_rank_calls_total", snapshot.recency_rank_calls),
            ("recency_rank_found_total", snapshot.recency_rank_found),
            (
                "recency_rank_scan_steps_total",
                snapshot.recency_rank_scan_steps,
            ),
            ("heap_fixes_total", snapshot.heap_fixes),
        ];
        for (suffix, value) in counters {
            self.write_counter(suffix, value);
        }

        self.write_gauge("cache_len", snapshot.cache_len as u64);
        self.write_gauge("capacity", snapshot.capacity as u64);
        self.write_gauge("epoch", snapshot.epoch);
    }
}

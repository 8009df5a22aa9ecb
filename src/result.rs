use std::{fmt, time::Duration};

/// One derived value reported by a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Count(usize),
    Duration(Duration),
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Count(n) => write!(f, "{n}"),
            Metric::Duration(d) => write!(f, "{d:?}"),
        }
    }
}

/// Immutable record produced once per benchmark stage.
///
/// Renders as a header line followed by one `<label>: <value>` line per metric,
/// the elapsed time first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    label: String,
    elapsed: Duration,
    metrics: Vec<(&'static str, Metric)>,
}

impl RunResult {
    pub fn new(label: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            label: label.into(),
            elapsed,
            metrics: Vec::new(),
        }
    }

    pub fn with(mut self, name: &'static str, metric: Metric) -> Self {
        self.metrics.push((name, metric));
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn metrics(&self) -> &[(&'static str, Metric)] {
        &self.metrics
    }

    /// Looks up a metric by name.
    pub fn metric(&self, name: &str) -> Option<Metric> {
        self.metrics
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, m)| *m)
    }

    pub fn count(&self, name: &str) -> Option<usize> {
        match self.metric(name)? {
            Metric::Count(n) => Some(n),
            Metric::Duration(_) => None,
        }
    }

    pub fn duration(&self, name: &str) -> Option<Duration> {
        match self.metric(name)? {
            Metric::Duration(d) => Some(d),
            Metric::Count(_) => None,
        }
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", self.label)?;
        write!(f, "elapsed: {:?}", self.elapsed)?;
        for (name, metric) in &self.metrics {
            write!(f, "\n{name}: {metric}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod result_test {
    use super::*;

    #[test]
    fn test_render_lines() {
        let result = RunResult::new("map", Duration::from_millis(3))
            .with("len", Metric::Count(6))
            .with("avg", Metric::Duration(Duration::from_nanos(250)));
        let rendered = result.to_string();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines, ["[map]", "elapsed: 3ms", "len: 6", "avg: 250ns"]);
    }

    #[test]
    fn test_typed_lookup() {
        let result = RunResult::new("x", Duration::ZERO).with("ops", Metric::Count(9));
        assert_eq!(result.count("ops"), Some(9));
        assert_eq!(result.duration("ops"), None);
        assert_eq!(result.metric("missing"), None);
    }
}

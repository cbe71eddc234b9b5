//! Structured data points pulled out of a collector.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single label on a sample.
///
/// Either field may be missing, in which case no filter entry can match it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Label {
    pub name: Option<String>,
    pub value: Option<String>,
}

impl Label {
    /// Create a label with both name and value present.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
        }
    }

    /// True if both fields are present and equal the given pair.
    pub fn is(&self, name: &str, value: &str) -> bool {
        matches!(
            (self.name.as_deref(), self.value.as_deref()),
            (Some(n), Some(v)) if n == name && v == value
        )
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={:?}",
            self.name.as_deref().unwrap_or("<none>"),
            self.value.as_deref().unwrap_or("<none>")
        )
    }
}

/// The payload carried by a sample.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Value {
    Counter {
        value: f64,
    },
    Gauge {
        value: f64,
    },
    Summary {
        sample_count: u64,
        sample_sum: f64,
    },
    Histogram {
        sample_count: u64,
        sample_sum: f64,
    },
    Untyped {
        value: f64,
    },
    /// No payload was populated.
    Empty,
}

impl Value {
    /// Short name of the payload kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Counter { .. } => "counter",
            Value::Gauge { .. } => "gauge",
            Value::Summary { .. } => "summary",
            Value::Histogram { .. } => "histogram",
            Value::Untyped { .. } => "untyped",
            Value::Empty => "empty",
        }
    }
}

/// One observed data point: a label set plus a single payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sample {
    /// Metric name, when the collector knows it.
    pub name: String,
    pub labels: Vec<Label>,
    pub value: Value,
}

impl Sample {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            labels: Vec::new(),
            value,
        }
    }

    /// Builder-style label attachment. Replaces an existing label of the same name.
    pub fn label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let label = Label::new(name, value);
        match self
            .labels
            .iter_mut()
            .find(|l| l.name.is_some() && l.name == label.name)
        {
            Some(existing) => *existing = label,
            None => self.labels.push(label),
        }
        self
    }

    /// Look up a label value by name.
    pub fn label_value(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|l| l.name.as_deref() == Some(name))
            .and_then(|l| l.value.as_deref())
    }

    pub fn counter(&self) -> Option<f64> {
        match self.value {
            Value::Counter { value } => Some(value),
            _ => None,
        }
    }

    pub fn gauge(&self) -> Option<f64> {
        match self.value {
            Value::Gauge { value } => Some(value),
            _ => None,
        }
    }

    /// Sample count of a summary payload.
    pub fn summary_sample_count(&self) -> Option<u64> {
        match self.value {
            Value::Summary { sample_count, .. } => Some(sample_count),
            _ => None,
        }
    }

    /// Render the label set as `{a="1", b="2"}`.
    pub fn label_set(&self) -> String {
        let inner: Vec<String> = self.labels.iter().map(ToString::to_string).collect();
        format!("{{{}}}", inner.join(", "))
    }
}

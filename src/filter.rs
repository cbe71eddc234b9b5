//! Label filters and the sample matcher.
//!
//! A filter is a list of `name=value` strings. Each entry splits on the first
//! `=`, so values may themselves contain `=`. A sample matches when every
//! entry is present among its labels; extra labels are ignored.

use std::fmt;

use crate::reporter::Reporter;
use crate::sample::Sample;
use crate::{PromtestError, Result};

/// One required (name, value) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelFilter {
    pub name: String,
    pub value: String,
}

impl LabelFilter {
    /// Parse a `name=value` entry.
    pub fn parse(entry: &str) -> Result<Self> {
        let (name, value) = entry
            .split_once('=')
            .ok_or_else(|| PromtestError::MalformedFilter(entry.to_string()))?;
        Ok(Self {
            name: name.to_string(),
            value: value.to_string(),
        })
    }

    /// Whether some label on `sample` carries exactly this pair.
    pub fn matches(&self, sample: &Sample) -> bool {
        sample.labels.iter().any(|l| l.is(&self.name, &self.value))
    }
}

impl fmt::Display for LabelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Decide whether `sample` satisfies every entry of `filter`.
///
/// A malformed entry is reported as an error and fails the match. The first
/// missing pair is logged together with the sample's label set.
pub fn matches<R, S>(t: &R, sample: &Sample, filter: &[S]) -> bool
where
    R: Reporter + ?Sized,
    S: AsRef<str>,
{
    t.helper();
    for entry in filter {
        let entry = entry.as_ref();
        let wanted = match LabelFilter::parse(entry) {
            Ok(wanted) => wanted,
            Err(_) => {
                t.error(format_args!(
                    "metrics labels should have two parts, e.g. key=value"
                ));
                return false;
            }
        };

        if !wanted.matches(sample) {
            t.log(format_args!(
                "label {entry:?} not found in {}",
                sample.label_set()
            ));
            return false;
        }
    }
    true
}

/// Render a filter for diagnostics, e.g. `["method=GET" "code=200"]`.
pub(crate) fn describe<S: AsRef<str>>(filter: &[S]) -> String {
    let quoted: Vec<String> = filter.iter().map(|e| format!("{:?}", e.as_ref())).collect();
    format!("[{}]", quoted.join(" "))
}

use std::fmt::{self, Write as _};

use itoa::Buffer;

/// The four StatsD metric kinds understood by the collector.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Signed delta added to a counter.
    Count,
    /// Point-in-time value.
    Gauge,
    /// Duration in milliseconds.
    Timing,
    /// Value counted once per distinct occurrence.
    Set,
}

impl MetricKind {
    /// One-character tag written after the value on the wire.
    #[must_use]
    pub const fn wire_tag(self) -> &'static str {
        match self {
            Self::Count => "c",
            Self::Gauge => "g",
            Self::Timing => "t",
            Self::Set => "s",
        }
    }
}

/// Probability that a sampled metric update is emitted.
///
/// Anything at or above 1, and NaN, is treated as 1 ("always send").
/// Rates at or below 0 never emit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SampleRate(f32);

impl SampleRate {
    /// Always send, never append a rate suffix.
    pub const ALWAYS: Self = Self(1.0);

    /// Normalizes `rate` into an effective sample rate.
    #[must_use]
    pub fn new(rate: f32) -> Self {
        // NaN fails this comparison too
        if rate < 1.0 {
            Self(rate)
        } else {
            Self::ALWAYS
        }
    }

    /// The effective rate.
    #[must_use]
    pub const fn value(self) -> f32 {
        self.0
    }

    /// Whether every update passes without sampling.
    #[must_use]
    pub fn is_always(self) -> bool {
        self.0 >= 1.0
    }

    /// Whether no update can ever pass.
    #[must_use]
    pub fn is_never(self) -> bool {
        self.0 <= 0.0
    }
}

impl Default for SampleRate {
    fn default() -> Self {
        Self::ALWAYS
    }
}

impl From<f32> for SampleRate {
    fn from(rate: f32) -> Self {
        Self::new(rate)
    }
}

/// One encoded metric update: `"<value>|<tag>[|@<rate>]"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedMetric(Box<str>);

impl EncodedMetric {
    /// Appends `"|@<rate>"` when the rate is below 1, otherwise returns `self` unchanged.
    #[must_use]
    pub fn with_sample_rate(self, rate: SampleRate) -> Self {
        if rate.is_always() {
            return self;
        }
        let mut line = String::from(self.0);
        // writing into a String cannot fail
        let _ = write!(line, "|@{:.6}", rate.value());
        Self(line.into_boxed_str())
    }

    /// The fragment as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// An encoded metric always holds at least `"<digit>|<tag>"`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for EncodedMetric {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EncodedMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encodes a single update as `"<value>|<tag>"`.
#[must_use]
pub fn encode(kind: MetricKind, value: i64) -> EncodedMetric {
    let mut buffer = Buffer::new();
    let value = buffer.format(value);
    let tag = kind.wire_tag();

    let mut line = String::with_capacity(value.len() + 1 + tag.len());
    line.push_str(value);
    line.push('|');
    line.push_str(tag);
    EncodedMetric(line.into_boxed_str())
}

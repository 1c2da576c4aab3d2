//! Timer configurations and the duration calculator.
//!
//! A [`TimerConfig`] carries exactly one duration-bearing shape per timer
//! type. Durations are whole seconds and computed with saturating
//! arithmetic, so no configuration can panic or go negative.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TimerConfig {
    Stopwatch {
        #[serde(default, deserialize_with = "lenient_u64")]
        minutes: u64,
        #[serde(default, deserialize_with = "lenient_u64")]
        seconds: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    Countdown {
        #[serde(default, deserialize_with = "lenient_u64")]
        minutes: u64,
        #[serde(default, deserialize_with = "lenient_u64")]
        seconds: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    XY {
        #[serde(default, deserialize_with = "lenient_u64")]
        minutes: u64,
        #[serde(default, deserialize_with = "lenient_u64")]
        seconds: u64,
        #[serde(default, deserialize_with = "lenient_u64")]
        rounds: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    Tabata {
        #[serde(rename = "workMinutes", default, deserialize_with = "lenient_u64")]
        work_minutes: u64,
        #[serde(rename = "workSeconds", default, deserialize_with = "lenient_u64")]
        work_seconds: u64,
        #[serde(rename = "restMinutes", default, deserialize_with = "lenient_u64")]
        rest_minutes: u64,
        #[serde(rename = "restSeconds", default, deserialize_with = "lenient_u64")]
        rest_seconds: u64,
        #[serde(default, deserialize_with = "lenient_u64")]
        rounds: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    /// A payload whose `type` tag is not recognised. Always zero duration.
    #[serde(other)]
    Unknown,
}

impl TimerConfig {
    pub fn countdown(minutes: u64, seconds: u64) -> Self {
        Self::Countdown {
            minutes,
            seconds,
            description: None,
        }
    }

    pub fn stopwatch(minutes: u64, seconds: u64) -> Self {
        Self::Stopwatch {
            minutes,
            seconds,
            description: None,
        }
    }

    pub fn xy(minutes: u64, seconds: u64, rounds: u64) -> Self {
        Self::XY {
            minutes,
            seconds,
            rounds,
            description: None,
        }
    }

    pub fn tabata(
        work_minutes: u64,
        work_seconds: u64,
        rest_minutes: u64,
        rest_seconds: u64,
        rounds: u64,
    ) -> Self {
        Self::Tabata {
            work_minutes,
            work_seconds,
            rest_minutes,
            rest_seconds,
            rounds,
            description: None,
        }
    }

    /// Attach a free-text description. No-op for [`TimerConfig::Unknown`].
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        let text = Some(text.into());
        match &mut self {
            Self::Stopwatch { description, .. }
            | Self::Countdown { description, .. }
            | Self::XY { description, .. }
            | Self::Tabata { description, .. } => *description = text,
            Self::Unknown => {}
        }
        self
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Stopwatch { description, .. }
            | Self::Countdown { description, .. }
            | Self::XY { description, .. }
            | Self::Tabata { description, .. } => description.as_deref(),
            Self::Unknown => None,
        }
    }

    /// The serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Stopwatch { .. } => "Stopwatch",
            Self::Countdown { .. } => "Countdown",
            Self::XY { .. } => "XY",
            Self::Tabata { .. } => "Tabata",
            Self::Unknown => "Unknown",
        }
    }

    /// Configured round count; single-shot timers count as one round.
    pub fn rounds(&self) -> u64 {
        match self {
            Self::XY { rounds, .. } | Self::Tabata { rounds, .. } => *rounds,
            Self::Stopwatch { .. } | Self::Countdown { .. } => 1,
            Self::Unknown => 0,
        }
    }

    /// Total duration of this timer in seconds.
    pub fn duration_secs(&self) -> u64 {
        match self {
            Self::Stopwatch {
                minutes, seconds, ..
            }
            | Self::Countdown {
                minutes, seconds, ..
            } => clock_secs(*minutes, *seconds),
            Self::XY {
                minutes,
                seconds,
                rounds,
                ..
            } => clock_secs(*minutes, *seconds).saturating_mul(*rounds),
            Self::Tabata {
                work_minutes,
                work_seconds,
                rest_minutes,
                rest_seconds,
                rounds,
                ..
            } => clock_secs(*work_minutes, *work_seconds)
                .saturating_add(clock_secs(*rest_minutes, *rest_seconds))
                .saturating_mul(*rounds),
            Self::Unknown => 0,
        }
    }
}

/// Duration calculator: total seconds a timer runs for.
pub fn duration(config: &TimerConfig) -> u64 {
    config.duration_secs()
}

/// Sum of [`duration`] over a sequence of configs.
pub fn total_duration<'a, I>(configs: I) -> u64
where
    I: IntoIterator<Item = &'a TimerConfig>,
{
    configs
        .into_iter()
        .fold(0u64, |acc, c| acc.saturating_add(duration(c)))
}

/// Format seconds as `M:SS`.
pub fn format_time(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

pub(crate) fn clock_secs(minutes: u64, seconds: u64) -> u64 {
    minutes.saturating_mul(60).saturating_add(seconds)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
}

/// Accepts JSON numbers and numeric text (`"01"`). Anything negative or
/// non-numeric reads as zero.
fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Unsigned(n) => n,
        NumberOrText::Signed(_) => 0,
        NumberOrText::Float(f) if f.is_finite() && f > 0.0 => f as u64,
        NumberOrText::Float(_) => 0,
        NumberOrText::Text(text) => leading_digits(&text),
    })
}

fn leading_digits(text: &str) -> u64 {
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}

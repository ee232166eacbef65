//! Compact human-readable durations: `1h0m0s`, `2m40s`, `1.5s`, `250ms`.

use std::fmt;
use std::time::Duration;

/// [`Display`](fmt::Display) adapter that renders a [`Duration`] as hours,
/// minutes and seconds.
///
/// Durations of a second or more are written as `[<h>h][<m>m]<s>[.<frac>]s`,
/// where minutes appear whenever hours do. Shorter durations use the largest
/// fitting unit among `ms`, `µs` and `ns`. Fractions never carry trailing
/// zeros.
///
/// ```rust
/// use std::time::Duration;
/// use backoff_table::HumanDuration;
///
/// assert_eq!(HumanDuration(Duration::from_secs(3600)).to_string(), "1h0m0s");
/// assert_eq!(HumanDuration(Duration::from_millis(250)).to_string(), "250ms");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanDuration(pub Duration);

impl fmt::Display for HumanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0.as_secs();
        let nanos = self.0.subsec_nanos();

        if secs == 0 {
            return match nanos {
                0 => f.write_str("0s"),
                1..1_000 => write!(f, "{nanos}ns"),
                1_000..1_000_000 => write_fraction(f, nanos / 1_000, nanos % 1_000, 3, "µs"),
                _ => write_fraction(f, nanos / 1_000_000, nanos % 1_000_000, 6, "ms"),
            };
        }

        if secs >= 3600 {
            write!(f, "{}h", secs / 3600)?;
        }
        if secs >= 60 {
            write!(f, "{}m", secs % 3600 / 60)?;
        }
        write_fraction(f, secs % 60, nanos, 9, "s")
    }
}

fn write_fraction(
    f: &mut fmt::Formatter<'_>,
    whole: impl fmt::Display,
    fraction: u32,
    digits: usize,
    unit: &str,
) -> fmt::Result {
    if fraction == 0 {
        return write!(f, "{whole}{unit}");
    }

    let fraction = format!("{fraction:0digits$}");
    write!(f, "{whole}.{}{unit}", fraction.trim_end_matches('0'))
}

/// Format a duration with [`HumanDuration`].
pub fn format_duration(duration: Duration) -> String {
    HumanDuration(duration).to_string()
}

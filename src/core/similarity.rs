use crate::models::TagSet;
use serde::Deserialize;

/// Wildcard meeting format, compatible with any preference
pub const WILDCARD_FORMAT: &str = "either";

/// How two timezone labels are compared
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TimezonePolicy {
    /// Trimmed, case-insensitive label equality
    ExactLabel,
    /// Parsed UTC offsets within `tolerance_hours` of each other.
    /// Labels that do not parse fall back to label equality.
    UtcOffset { tolerance_hours: f64 },
}

impl Default for TimezonePolicy {
    fn default() -> Self {
        TimezonePolicy::ExactLabel
    }
}

/// Returns the trimmed value, or `None` when absent or blank
#[inline]
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Jaccard index of two tag sets, scaled to 0-100
///
/// Returns 0.0 when either side is empty.
#[inline]
pub fn tag_overlap(a: &TagSet, b: &TagSet) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let union = a.union_len(b);
    if union == 0 {
        return 0.0;
    }

    100.0 * a.intersection_len(b) as f64 / union as f64
}

/// True if the two language sets have at least one language in common
#[inline]
pub fn languages_share_one(a: &TagSet, b: &TagSet) -> bool {
    a.intersection_len(b) > 0
}

/// Meeting formats are compatible when either side is unspecified or
/// contains the wildcard, otherwise only when they are equal.
pub fn formats_compatible(a: Option<&str>, b: Option<&str>) -> bool {
    let (Some(a), Some(b)) = (present(a), present(b)) else {
        return true;
    };

    let a = a.to_lowercase();
    let b = b.to_lowercase();

    if a.contains(WILDCARD_FORMAT) || b.contains(WILDCARD_FORMAT) {
        return true;
    }

    a == b
}

/// Timezone compatibility under the default exact-label policy
pub fn timezones_compatible(a: Option<&str>, b: Option<&str>) -> bool {
    timezones_compatible_with(a, b, TimezonePolicy::ExactLabel)
}

/// Timezone compatibility under an explicit policy. Absent labels are
/// always compatible.
pub fn timezones_compatible_with(a: Option<&str>, b: Option<&str>, policy: TimezonePolicy) -> bool {
    let (Some(a), Some(b)) = (present(a), present(b)) else {
        return true;
    };

    let labels_equal = a.to_lowercase() == b.to_lowercase();

    match policy {
        TimezonePolicy::ExactLabel => labels_equal,
        TimezonePolicy::UtcOffset { tolerance_hours } => {
            match (parse_utc_offset_minutes(a), parse_utc_offset_minutes(b)) {
                (Some(a_min), Some(b_min)) => {
                    let diff_hours = (a_min - b_min).abs() as f64 / 60.0;
                    diff_hours <= tolerance_hours
                }
                _ => labels_equal,
            }
        }
    }
}

/// Parse labels such as `UTC+1`, `UTC+01:00`, `GMT-5`, `+0530`, `UTC` or `Z`
/// into an offset in minutes.
pub fn parse_utc_offset_minutes(label: &str) -> Option<i32> {
    let upper = label.trim().to_uppercase();
    let rest = upper
        .strip_prefix("UTC")
        .or_else(|| upper.strip_prefix("GMT"))
        .unwrap_or(&upper)
        .trim();

    if rest.is_empty() || rest == "Z" {
        return if upper.is_empty() { None } else { Some(0) };
    }

    let (sign, digits) = match rest.as_bytes()[0] {
        b'+' => (1, &rest[1..]),
        b'-' => (-1, &rest[1..]),
        _ => return None,
    };

    // Only ASCII digits and at most one colon may follow the sign
    if !digits.bytes().all(|b| b.is_ascii_digit() || b == b':') {
        return None;
    }

    let (hours, minutes) = match digits.split_once(':') {
        Some((h, m)) => (h.parse::<i32>().ok()?, m.parse::<i32>().ok()?),
        None if digits.len() == 4 => (digits[..2].parse().ok()?, digits[2..].parse().ok()?),
        None => (digits.parse::<i32>().ok()?, 0),
    };

    if hours > 14 || !(0..60).contains(&minutes) {
        return None;
    }

    Some(sign * (hours * 60 + minutes))
}

// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

/// Formats a duration in seconds into a human-readable `MM:SS` string.
///
/// This is used primarily for displaying track positions and total durations
/// in the player interface.
///
/// # Arguments
///
/// * `total_seconds` - The duration to format, represented as a 64-bit integer.
///
/// # Examples
///
/// ```
/// use musicbox::util::format::format_time;
///
/// assert_eq!(format_time(65), "01:05");
/// assert_eq!(format_time(3600), "60:00");
/// ```
pub fn format_time(total_seconds: u64) -> String {
    let mins = total_seconds / 60;
    let secs = total_seconds % 60;
    format!("{:02}:{:02}", mins, secs)
}

/// Formats a song length as `minutes:seconds`, seconds padded to two digits.
///
/// Negative lengths are shown as zero.
///
/// ```
/// use musicbox::util::format::format_duration;
///
/// assert_eq!(format_duration(200), "3:20");
/// assert_eq!(format_duration(5), "0:05");
/// ```
pub fn format_duration(length: i64) -> String {
    let length = length.max(0);
    format!("{}:{:02}", length / 60, length % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_pad_seconds_only() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(59), "0:59");
        assert_eq!(format_duration(60), "1:00");
        assert_eq!(format_duration(754), "12:34");
    }

    #[test]
    fn negative_duration_is_zero() {
        assert_eq!(format_duration(-3), "0:00");
    }

    #[test]
    fn player_time_pads_minutes() {
        assert_eq!(format_time(5), "00:05");
        assert_eq!(format_time(125), "02:05");
    }
}

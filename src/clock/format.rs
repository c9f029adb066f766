//! Time and date formatting with cached, pre-parsed formatters
//!
//! Patterns are Unicode date-pattern strings (`h:mm a`, `EEEE, MMMM d`). They
//! are translated once into chrono format items and reused until the
//! effective pattern changes.

use chrono::NaiveDateTime;
use chrono::format::{Item, StrftimeItems};
use tracing::{debug, warn};

use crate::config::Settings;

/// Date patterns offered in the settings form
pub const DATE_PRESETS: &[&str] = &[
    "EEEE, MMMM d",
    "MMM d, yyyy",
    "MM/dd/yyyy",
    "dd/MM/yyyy",
    "yyyy-MM-dd",
    "EEEE",
    "MMMM d",
];

/// Everything that determines the time pattern. Flags that cannot affect the
/// output (AM/PM in 24-hour mode, AM/PM case when hidden) are normalized away
/// so they don't cause needless rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeFormatKey {
    pub use_24_hour: bool,
    pub show_seconds: bool,
    pub show_am_pm: bool,
    pub uppercase_am_pm: bool,
}

impl TimeFormatKey {
    pub fn new(use_24_hour: bool, show_seconds: bool, show_am_pm: bool, uppercase_am_pm: bool) -> Self {
        let show_am_pm = show_am_pm && !use_24_hour;
        Self {
            use_24_hour,
            show_seconds,
            show_am_pm,
            uppercase_am_pm: uppercase_am_pm && show_am_pm,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.use_24_hour,
            settings.show_seconds,
            settings.show_am_pm,
            settings.uppercase_am_pm,
        )
    }

    /// Unicode pattern for this key
    pub fn pattern(&self) -> String {
        let mut pattern = match (self.use_24_hour, self.show_seconds) {
            (true, true) => "HH:mm:ss",
            (true, false) => "HH:mm",
            (false, true) => "h:mm:ss",
            (false, false) => "h:mm",
        }
        .to_string();
        if self.show_am_pm {
            pattern.push_str(" a");
        }
        pattern
    }
}

/// A parsed pattern ready to format instants
#[derive(Debug, Clone)]
pub struct Formatter {
    items: Vec<Item<'static>>,
}

impl Formatter {
    pub fn new(pattern: &str, lowercase_am_pm: bool) -> Self {
        let strftime = translate_pattern(pattern, lowercase_am_pm);
        let items = StrftimeItems::new(&strftime)
            .parse_to_owned()
            .unwrap_or_else(|e| {
                warn!(pattern = %pattern, error = %e, "Unusable date pattern, showing it literally");
                vec![Item::OwnedLiteral(pattern.into())]
            });
        Self { items }
    }

    pub fn format(&self, at: &NaiveDateTime) -> String {
        at.format_with_items(self.items.iter()).to_string()
    }
}

/// Single-slot caches for the current time and date formatters
#[derive(Debug, Default)]
pub struct FormatterCache {
    time: Option<(TimeFormatKey, Formatter)>,
    date: Option<(String, Formatter)>,
    builds: usize,
}

impl FormatterCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time_formatter(&mut self, key: TimeFormatKey) -> &Formatter {
        if self.time.as_ref().is_some_and(|(cached, _)| *cached != key) {
            self.time = None;
        }
        let builds = &mut self.builds;
        let (_, formatter) = self.time.get_or_insert_with(|| {
            let pattern = key.pattern();
            debug!(pattern = %pattern, "Building time formatter");
            *builds += 1;
            (key, Formatter::new(&pattern, !key.uppercase_am_pm))
        });
        formatter
    }

    pub fn date_formatter(&mut self, pattern: &str) -> &Formatter {
        if self.date.as_ref().is_some_and(|(cached, _)| cached != pattern) {
            self.date = None;
        }
        let builds = &mut self.builds;
        let (_, formatter) = self.date.get_or_insert_with(|| {
            debug!(pattern = %pattern, "Building date formatter");
            *builds += 1;
            (pattern.to_string(), Formatter::new(pattern, false))
        });
        formatter
    }

    /// Number of formatters constructed so far
    #[cfg(test)]
    pub fn builds(&self) -> usize {
        self.builds
    }
}

/// Translate a Unicode date pattern into a chrono strftime string.
///
/// Supported fields: E (weekday), M/L (month), d (day), y (year), H/h (hour),
/// m (minute), s (second), a (AM/PM). Text in single quotes is literal and
/// `''` is a quote. Other characters, including unknown letters, are copied.
pub fn translate_pattern(pattern: &str, lowercase_am_pm: bool) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            // Quoted literal runs to the next unpaired quote (or the end)
            i += 1;
            while i < chars.len() {
                if chars[i] == '\'' {
                    if chars.get(i + 1) == Some(&'\'') {
                        out.push('\'');
                        i += 2;
                        continue;
                    }
                    i += 1;
                    break;
                }
                push_literal(&mut out, chars[i]);
                i += 1;
            }
            continue;
        }

        let run = chars[i..].iter().take_while(|&&next| next == c).count();
        let field = match (c, run) {
            ('E', 4..) => Some("%A"),
            ('E', _) => Some("%a"),
            ('M' | 'L', 4..) => Some("%B"),
            ('M' | 'L', 3) => Some("%b"),
            ('M' | 'L', 2) => Some("%m"),
            ('M' | 'L', _) => Some("%-m"),
            ('d', 2..) => Some("%d"),
            ('d', _) => Some("%-d"),
            ('y', 2) => Some("%y"),
            ('y', _) => Some("%Y"),
            ('H', 2..) => Some("%H"),
            ('H', _) => Some("%-H"),
            ('h', 2..) => Some("%I"),
            ('h', _) => Some("%-I"),
            ('m', 2..) => Some("%M"),
            ('m', _) => Some("%-M"),
            ('s', 2..) => Some("%S"),
            ('s', _) => Some("%-S"),
            ('a', _) if lowercase_am_pm => Some("%P"),
            ('a', _) => Some("%p"),
            _ => None,
        };

        match field {
            Some(directive) => out.push_str(directive),
            None => (0..run).for_each(|_| push_literal(&mut out, c)),
        }
        i += run;
    }

    out
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn format_time(key: TimeFormatKey, instant: NaiveDateTime) -> String {
        FormatterCache::new().time_formatter(key).format(&instant)
    }

    #[test]
    fn test_24_hour_with_seconds() {
        let key = TimeFormatKey::new(true, true, true, true);
        assert_eq!(key.pattern(), "HH:mm:ss");
        assert_eq!(format_time(key, at(13, 5, 9)), "13:05:09");
        assert_eq!(format_time(key, at(0, 0, 0)), "00:00:00");
    }

    #[test]
    fn test_12_hour_lowercase_am_pm_without_seconds() {
        let key = TimeFormatKey::new(false, false, true, false);
        assert_eq!(key.pattern(), "h:mm a");
        assert_eq!(format_time(key, at(13, 5, 0)), "1:05 pm");
        assert_eq!(format_time(key, at(9, 30, 0)), "9:30 am");
    }

    #[test]
    fn test_12_hour_uppercase_am_pm_with_seconds() {
        let key = TimeFormatKey::new(false, true, true, true);
        assert_eq!(format_time(key, at(0, 7, 3)), "12:07:03 AM");
        assert_eq!(format_time(key, at(23, 59, 59)), "11:59:59 PM");
    }

    #[test]
    fn test_12_hour_without_am_pm() {
        let key = TimeFormatKey::new(false, false, false, true);
        assert_eq!(format_time(key, at(13, 5, 0)), "1:05");
    }

    #[test]
    fn test_key_normalizes_irrelevant_flags() {
        assert_eq!(
            TimeFormatKey::new(true, false, true, true),
            TimeFormatKey::new(true, false, false, false)
        );
        assert_eq!(
            TimeFormatKey::new(false, true, false, true),
            TimeFormatKey::new(false, true, false, false)
        );
        assert_ne!(
            TimeFormatKey::new(false, true, true, true),
            TimeFormatKey::new(false, true, true, false)
        );
    }

    #[test]
    fn test_cache_reuses_formatter_for_same_key() {
        let mut cache = FormatterCache::new();
        let key = TimeFormatKey::new(false, true, true, true);
        cache.time_formatter(key);
        cache.time_formatter(key);
        cache.date_formatter("yyyy-MM-dd");
        cache.date_formatter("yyyy-MM-dd");
        assert_eq!(cache.builds(), 2);

        cache.time_formatter(TimeFormatKey::new(true, true, false, false));
        cache.date_formatter("EEEE");
        assert_eq!(cache.builds(), 4);
    }

    #[test]
    fn test_date_presets_render() {
        let monday = at(8, 0, 0);
        let rendered: Vec<String> = DATE_PRESETS
            .iter()
            .map(|pattern| Formatter::new(pattern, false).format(&monday))
            .collect();
        assert_eq!(
            rendered,
            vec![
                "Monday, January 1",
                "Jan 1, 2024",
                "01/01/2024",
                "01/01/2024",
                "2024-01-01",
                "Monday",
                "January 1",
            ]
        );
    }

    #[test]
    fn test_translate_quotes_and_percent() {
        assert_eq!(translate_pattern("'Week' d", false), "Week %-d");
        assert_eq!(translate_pattern("h 'o''clock'", false), "%-I o'clock");
        assert_eq!(translate_pattern("d''M", false), "%-d'%-m");
        assert_eq!(translate_pattern("100% d", false), "100%% %-d");
    }

    #[test]
    fn test_unknown_letters_are_literal() {
        assert_eq!(translate_pattern("QQ d", false), "QQ %-d");
        let formatted = Formatter::new("QQ yyyy", false).format(&at(1, 0, 0));
        assert_eq!(formatted, "QQ 2024");
    }

    #[test]
    fn test_short_weekday_and_month() {
        let formatted = Formatter::new("EEE, MMM d yy", false).format(&at(1, 0, 0));
        assert_eq!(formatted, "Mon, Jan 1 24");
    }
}

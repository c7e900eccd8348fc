//! Log line layout: `<timestamp> - <LEVEL> - <message>`

use std::io::{self, Write};

use chrono::{DateTime, Local};
use log::Record;

/// Timestamp layout, millisecond precision with a comma separator
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Write one record as a single line.
pub fn write_record<W: Write + ?Sized>(out: &mut W, now: &DateTime<Local>, record: &Record<'_>) -> io::Result<()> {
    writeln!(out, "{} - {} - {}", now.format(TIMESTAMP_FORMAT), record.level(), record.args())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use log::Level;

    fn render(level: Level, args: std::fmt::Arguments<'_>) -> String {
        let now = Local.with_ymd_and_hms(2026, 10, 18, 12, 0, 5).unwrap();
        let mut out = Vec::new();
        write_record(&mut out, &now, &Record::builder().level(level).args(args).build()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_line_layout() {
        assert_eq!(
            render(Level::Info, format_args!("Auto-scaler terminated.")),
            "2026-10-18 12:00:05,000 - INFO - Auto-scaler terminated.\n"
        );
    }

    #[test]
    fn test_level_names() {
        let line = render(Level::Error, format_args!("Error fetching current status: {}", "503"));
        assert_eq!(line, "2026-10-18 12:00:05,000 - ERROR - Error fetching current status: 503\n");

        let line = render(Level::Warn, format_args!("x"));
        assert!(line.contains(" - WARN - "));
    }

    #[test]
    fn test_milliseconds() {
        let now = Local.with_ymd_and_hms(2026, 10, 18, 12, 0, 5).unwrap() + chrono::Duration::milliseconds(42);
        let mut out = Vec::new();
        write_record(&mut out, &now, &Record::builder().level(Level::Debug).args(format_args!("tick")).build())
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "2026-10-18 12:00:05,042 - DEBUG - tick\n");
    }
}

use chrono::Local;
use chrono::NaiveDateTime;
use std::fmt::Display;
use std::ops::Deref;
use std::str::FromStr;

/// Wall-clock timestamp of a log record, second precision plus milliseconds.
///
/// Naive local time: the line format carries no zone offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogTimestamp {
    inner: NaiveDateTime,
}
impl Display for LogTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner.format(LOG_TIMESTAMP_FMT))
    }
}
const LOG_TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S,%3f"; // e.g. 2017-10-05 01:42:14,078

impl FromStr for LogTimestamp {
    type Err = eyre::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let naive = NaiveDateTime::parse_from_str(s.trim(), LOG_TIMESTAMP_FMT)?;
        Ok(Self { inner: naive })
    }
}

impl LogTimestamp {
    /// Current local wall-clock time.
    #[must_use]
    pub fn now() -> Self {
        Self {
            inner: Local::now().naive_local(),
        }
    }

    #[must_use]
    pub fn as_datetime(&self) -> &NaiveDateTime {
        &self.inner
    }
}
impl From<NaiveDateTime> for LogTimestamp {
    fn from(dt: NaiveDateTime) -> Self {
        Self { inner: dt }
    }
}
impl Deref for LogTimestamp {
    type Target = NaiveDateTime;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[cfg(test)]
mod test {
    use super::LogTimestamp;
    use chrono::NaiveDate;

    #[test]
    fn parse_timestamp() -> eyre::Result<()> {
        let s = "2017-10-05 01:42:14,078";
        let parsed: LogTimestamp = s.parse()?;
        let expected = NaiveDate::from_ymd_opt(2017, 10, 5)
            .unwrap()
            .and_hms_milli_opt(1, 42, 14, 78)
            .unwrap();
        assert_eq!(*parsed.as_datetime(), expected);
        assert_eq!(parsed.to_string(), s);
        Ok(())
    }

    #[test]
    fn milliseconds_are_zero_padded() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_milli_opt(3, 4, 5, 6)
            .unwrap();
        assert_eq!(
            LogTimestamp::from(dt).to_string(),
            "2024-01-02 03:04:05,006"
        );
    }

    #[test]
    fn rejects_missing_millis() {
        assert!("2017-10-05 01:42:14".parse::<LogTimestamp>().is_err());
    }
}

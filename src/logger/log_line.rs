use super::log_timestamp::LogTimestamp;
use super::severity::Severity;
use eyre::OptionExt;
use std::fmt::Display;
use std::str::FromStr;

/// One log record in the fleet's tab-separated line format.
///
/// ```text
/// time:2017-10-05 01:42:14,078\tname:app\tseverity:INFO\tmessage:hello
/// ```
///
/// Field order is fixed (time, name, severity, message) with any extra fields
/// appended afterwards in the order they were supplied. Downstream processors
/// split on tabs and on the first colon of each field; messages and values may
/// therefore contain colons but not tabs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub time: LogTimestamp,
    pub name: String,
    pub severity: Severity,
    pub message: String,
    pub extra: Vec<(String, String)>,
}

/// Tags of the four fixed fields, in line order.
const FIXED_TAGS: [&str; 4] = ["time", "name", "severity", "message"];

impl Display for LogLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "time:{time}\tname:{name}\tseverity:{severity}\tmessage:{message}",
            time = self.time,
            name = self.name,
            severity = self.severity,
            message = self.message
        )?;
        for (field, value) in &self.extra {
            write!(f, "\t{field}:{value}")?;
        }
        Ok(())
    }
}

impl FromStr for LogLine {
    type Err = eyre::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split('\t');
        let mut values = [""; FIXED_TAGS.len()];
        for (position, tag) in FIXED_TAGS.iter().enumerate() {
            let field = fields
                .next()
                .ok_or_eyre(format!("Missing {tag} field at position {position}"))?;
            let (found, value) = field
                .split_once(':')
                .ok_or_eyre(format!("Field at position {position} has no tag"))?;
            if found != *tag {
                eyre::bail!("Expected {tag} field at position {position}, found {found}");
            }
            values[position] = value;
        }
        let mut extra = Vec::new();
        for field in fields {
            let (key, value) = field
                .split_once(':')
                .ok_or_eyre(format!("Extra field {field:?} has no tag"))?;
            extra.push((key.to_owned(), value.to_owned()));
        }
        Ok(LogLine {
            time: values[0].parse()?,
            name: values[1].to_owned(),
            severity: values[2].parse()?,
            message: values[3].to_owned(),
            extra,
        })
    }
}

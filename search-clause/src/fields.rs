use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Field used for terms without a field prefix in the alarm log view.
pub const DEFAULT_FIELD: &str = "pv";

/// Default field when parsing without any field context.
pub const GENERIC_DEFAULT_FIELD: &str = "defaultField";

/// Fields of an alarm log entry as stored in the search index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum AlarmLogField {
    Config,
    Pv,
    Severity,
    Message,
    CurrentSeverity,
    CurrentMessage,
    User,
    Host,
    Command,
    MessageTime,
    Time,
}

impl AlarmLogField {
    pub fn is_time(&self) -> bool {
        matches!(self, AlarmLogField::MessageTime | AlarmLogField::Time)
    }

    pub fn names() -> Vec<String> {
        Self::iter().map(|f| f.to_string()).collect()
    }
}

//! Date values, enabled by the `time` feature.
use ::time::{Date, OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc2822};

use crate::Value;

fn iso_date(date: Date) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day())
}

/// Rendered as `YYYY-MM-DD`.
impl From<Date> for Value {
    fn from(value: Date) -> Self {
        iso_date(value).into()
    }
}

/// Rendered as `YYYY-MM-DDTHH:MM:SS`.
impl From<PrimitiveDateTime> for Value {
    fn from(value: PrimitiveDateTime) -> Self {
        format!(
            "{}T{:02}:{:02}:{:02}",
            iso_date(value.date()),
            value.hour(),
            value.minute(),
            value.second(),
        )
        .into()
    }
}

/// Rendered as RFC 2822, nil if the date cannot be represented.
impl From<OffsetDateTime> for Value {
    fn from(value: OffsetDateTime) -> Self {
        value.format(&Rfc2822).map(Value::from).unwrap_or_default()
    }
}

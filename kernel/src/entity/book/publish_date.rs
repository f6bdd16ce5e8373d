use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};
use vodca::{AsRefln, Fromln};

/// Wire format of a publish date, minute precision without offset.
const PUBLISH_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Fromln, AsRefln)]
pub struct PublishDate(PrimitiveDateTime);

impl PublishDate {
    pub fn new(date: impl Into<PrimitiveDateTime>) -> Self {
        Self(date.into())
    }
}

impl Serialize for PublishDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let formatted = self
            .0
            .format(PUBLISH_DATE_FORMAT)
            .map_err(ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }
}

/// Accepted input: the wire format, or milliseconds since the Unix epoch taken as UTC.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPublishDate {
    Formatted(String),
    EpochMillis(i64),
}

impl<'de> Deserialize<'de> for PublishDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawPublishDate::deserialize(deserializer)? {
            RawPublishDate::Formatted(raw) => PrimitiveDateTime::parse(&raw, PUBLISH_DATE_FORMAT)
                .map(Self)
                .map_err(de::Error::custom),
            RawPublishDate::EpochMillis(millis) => {
                OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
                    .map(|utc| Self(PrimitiveDateTime::new(utc.date(), utc.time())))
                    .map_err(de::Error::custom)
            }
        }
    }
}

pub mod datetime_utc {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Serialize, Serializer};

    pub fn serialize<S>(datetime: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        datetime
            .to_rfc3339_opts(SecondsFormat::AutoSi, false)
            .serialize(serializer)
    }
}

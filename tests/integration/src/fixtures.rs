//! Shared fixtures: canned logs and an in-memory asset resolver.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};

use scribe_core::Snowflake;
use scribe_render::{AssetKind, AssetResolver};

/// A snowflake whose embedded creation time is `at`.
pub fn snowflake_at(at: DateTime<Utc>) -> Snowflake {
    Snowflake::new((at.timestamp_millis() - Snowflake::EPOCH) << 22)
}

pub fn instant(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

/// Asset resolver backed by a map from asset key to stored path.
pub struct MapAssets(pub HashMap<String, PathBuf>);

impl MapAssets {
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    pub fn with(entries: &[(&str, &str)]) -> Self {
        Self(
            entries
                .iter()
                .map(|(k, v)| ((*k).to_string(), PathBuf::from(v)))
                .collect(),
        )
    }
}

impl AssetResolver for MapAssets {
    fn resolve(&self, _kind: AssetKind, _owner: Snowflake, asset: &str) -> Option<PathBuf> {
        self.0.get(asset).cloned()
    }
}

/// Guild log: one colored admin role, alice (nicknamed, renamed in June),
/// and bob with only the mandatory columns.
pub const GUILD_LOG: &str = "\
2019-12-01T00:00:00+00:00\t-\tadd\tguild\t1\tTest Guild
2019-12-01T00:00:00+00:00\t-\tadd\tchannel\t5\tgeneral
2019-12-01T00:00:00+00:00\t-\tadd\trole\t30\tAdmins\t16711680\t5\t256\thoist
2019-12-01T00:00:00+00:00\t-\tadd\tmember\t10\talice\t1234\t\tAli\t30
2020-06-01T00:00:00+00:00\t-\tadd\tmember\t10\talice\t1234\t\tAlison\t30
2019-12-01T00:00:00+00:00\t-\tadd\tmember\t11\tbob\t7
";

/// Channel log for channel 5, exercising mentions, markup, an attachment
/// arriving before its message, an edit, and a deletion.
pub fn channel_log() -> String {
    let m1 = snowflake_at(instant(2020, 1, 10, 0, 0, 0));
    let m2 = snowflake_at(instant(2020, 1, 10, 0, 1, 0));
    let m3 = snowflake_at(instant(2020, 1, 10, 0, 2, 0));
    let m4 = snowflake_at(instant(2020, 7, 1, 0, 0, 0));
    let m5 = snowflake_at(instant(2020, 7, 1, 0, 1, 0));

    format!(
        "2020-01-10T00:00:00+00:00\t-\tadd\tmessage\t{m1}\t10\t\tfalse\thello **world** <@11>\n\
         2020-01-10T00:01:00+00:00\t-\tadd\tmessage\t{m2}\t10\t\tfalse\tcheck <#77> out\n\
         2020-01-10T00:01:30+00:00\t-\tadd\tattachment\t200\t{m3}\n\
         2020-01-10T00:02:00+00:00\t-\tadd\tmessage\t{m3}\t11\n\
         2020-07-01T00:00:00+00:00\t-\tadd\tmessage\t{m4}\t10\t\tfalse\tback\n\
         2020-07-01T00:01:00+00:00\t-\tadd\tmessage\t{m5}\t11\t\tfalse\tnever mind\n\
         2020-07-01T00:02:00+00:00\t-\tdel\tmessage\t{m5}\t11\n"
    )
}

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, TimeZone};

pub const ENTRIES_KEY_PREFIX: &str = "entries_";

/// Storage key of the day log for the local calendar date of `now`.
pub fn today_key<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    day_key(now.date_naive())
}

pub fn day_key(date: NaiveDate) -> String {
    format!(
        "{ENTRIES_KEY_PREFIX}{}-{}-{}",
        date.year(),
        date.month(),
        date.day()
    )
}

/// First instant of the local calendar day after `now`.
///
/// When a zone skips midnight (DST starting at 00:00) the first existing
/// instant of that day is used instead.
pub fn next_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    let tz = now.timezone();
    let tomorrow = now
        .date_naive()
        .succ_opt()
        .unwrap_or_else(|| now.date_naive());
    let midnight = tomorrow.and_time(chrono::NaiveTime::MIN);

    let mut candidate = midnight;
    for _ in 0..4 {
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(instant) => return instant,
            LocalResult::Ambiguous(earliest, _) => return earliest,
            LocalResult::None => candidate += Duration::minutes(30),
        }
    }

    now.clone() + Duration::days(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDateTime};

    /// UTC until 2026-03-29 00:00 local, then UTC+1: local 00:00-01:00 on
    /// that day does not exist.
    #[derive(Debug, Clone, Copy)]
    struct MidnightGap;

    impl MidnightGap {
        fn switch() -> NaiveDateTime {
            NaiveDate::from_ymd_opt(2026, 3, 29)
                .unwrap()
                .and_time(chrono::NaiveTime::MIN)
        }

        fn before() -> FixedOffset {
            FixedOffset::east_opt(0).unwrap()
        }

        fn after() -> FixedOffset {
            FixedOffset::east_opt(3600).unwrap()
        }
    }

    impl TimeZone for MidnightGap {
        type Offset = FixedOffset;

        fn from_offset(_offset: &FixedOffset) -> Self {
            MidnightGap
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_time(chrono::NaiveTime::MIN))
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            if *local < Self::switch() {
                LocalResult::Single(Self::before())
            } else if *local < Self::switch() + Duration::hours(1) {
                LocalResult::None
            } else {
                LocalResult::Single(Self::after())
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_time(chrono::NaiveTime::MIN))
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            if *utc < Self::switch() {
                Self::before()
            } else {
                Self::after()
            }
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, min, s)
            .unwrap()
    }

    #[test]
    fn key_uses_unpadded_one_based_components() {
        assert_eq!(today_key(&at(2026, 3, 4, 9, 0, 0)), "entries_2026-3-4");
        assert_eq!(today_key(&at(2026, 12, 31, 9, 0, 0)), "entries_2026-12-31");
    }

    #[test]
    fn same_day_gives_same_key() {
        let morning = at(2026, 7, 1, 0, 0, 0);
        let night = at(2026, 7, 1, 23, 59, 59);
        assert_eq!(today_key(&morning), today_key(&night));
    }

    #[test]
    fn different_days_give_different_keys() {
        let before = at(2026, 7, 1, 23, 59, 59);
        let after = at(2026, 7, 2, 0, 0, 0);
        assert_ne!(today_key(&before), today_key(&after));
        // 1 Nov vs 11 Jan must not collide without padding
        assert_ne!(
            today_key(&at(2026, 1, 11, 12, 0, 0)),
            today_key(&at(2026, 11, 1, 12, 0, 0))
        );
    }

    #[test]
    fn key_follows_local_date_not_utc() {
        // 01:30 at UTC+2 is still the previous day in UTC
        let local = at(2026, 5, 10, 1, 30, 0);
        assert_eq!(today_key(&local), "entries_2026-5-10");
    }

    #[test]
    fn next_midnight_is_start_of_following_day() {
        let now = at(2026, 2, 28, 18, 45, 12);
        assert_eq!(next_midnight(&now), at(2026, 3, 1, 0, 0, 0));

        let exactly_midnight = at(2026, 3, 1, 0, 0, 0);
        assert_eq!(next_midnight(&exactly_midnight), at(2026, 3, 2, 0, 0, 0));
    }

    #[test]
    fn next_midnight_skips_to_first_instant_when_midnight_is_missing() {
        let evening = NaiveDate::from_ymd_opt(2026, 3, 28)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap();
        let now = MidnightGap.from_utc_datetime(&evening);

        let next = next_midnight(&now);
        assert_eq!(
            next.naive_local(),
            NaiveDate::from_ymd_opt(2026, 3, 29)
                .unwrap()
                .and_hms_opt(1, 0, 0)
                .unwrap()
        );
        assert_eq!(today_key(&next), "entries_2026-3-29");
    }
}

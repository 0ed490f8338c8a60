// Small value generators shared by every record family.
//
// Purpose
// - Keep id and clock access in one place so records never invent their own scheme.
//
// Notes
// - Ids are UUID v7 strings: unique, opaque, never reused.
// - Timestamps are epoch milliseconds, the unit used by every i64 time value in the document.

use chrono::Utc;
use uuid::Uuid;

pub fn new_record_id() -> String {
    Uuid::now_v7().to_string()
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod shared_primitives_tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[rstest]
    fn it_should_generate_unique_parseable_ids() {
        let ids: HashSet<String> = (0..64).map(|_| new_record_id()).collect();
        assert_eq!(ids.len(), 64);
        for id in &ids {
            assert!(Uuid::parse_str(id).is_ok());
        }
    }

    #[rstest]
    fn it_should_return_a_millisecond_timestamp() {
        let before = Utc::now().timestamp_millis();
        let now = now_millis();
        assert!(now >= before);
        assert!(now < before + 60_000);
    }
}

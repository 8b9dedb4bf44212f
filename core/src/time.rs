// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Time related utils.
//!
//! Signing never reads the clock by itself: every timestamp used in a
//! signature is supplied by the caller.

use crate::Error;
use crate::Result;
use chrono::NaiveDateTime;
use chrono::TimeZone;
use chrono::Utc;

/// DateTime is the alias of `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// Date format: "20220313"
const DATE: &str = "%Y%m%d";
/// Time format for ISO 8601 without separators: "20220313T072004Z"
const ISO8601: &str = "%Y%m%dT%H%M%SZ";

/// Format time into date: `20220301`
pub fn format_date(t: DateTime) -> String {
    t.format(DATE).to_string()
}

/// Format time into ISO8601: `20220313T072004Z`
pub fn format_iso8601(t: DateTime) -> String {
    t.format(ISO8601).to_string()
}

/// Treat a naive date time as if its fields were already in UTC.
///
/// The fields are kept as-is, no offset conversion happens.
pub fn from_naive(t: NaiveDateTime) -> DateTime {
    Utc.from_utc_datetime(&t)
}

/// Parse time from RFC3339 like `2022-03-13T07:20:04Z`.
///
/// Values carrying an offset are converted into UTC.
pub fn parse_rfc3339(s: &str) -> Result<DateTime> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|v| v.with_timezone(&Utc))
        .map_err(|e| {
            Error::request_invalid(format!("failed to parse rfc3339 time: {s}")).with_source(e)
        })
}

/// Parse time from the compact ISO8601 form like `20220313T072004Z`.
pub fn parse_iso8601(s: &str) -> Result<DateTime> {
    NaiveDateTime::parse_from_str(s, ISO8601)
        .map(from_naive)
        .map_err(|e| {
            Error::request_invalid(format!("failed to parse iso8601 time: {s}")).with_source(e)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn test_time() -> DateTime {
        let naive = NaiveDate::from_ymd_opt(2023, 1, 15)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .expect("must be valid");
        from_naive(naive)
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(test_time()), "20230115");
    }

    #[test]
    fn test_format_iso8601() {
        assert_eq!(format_iso8601(test_time()), "20230115T100000Z");
    }

    #[test]
    fn test_parse_rfc3339() {
        assert_eq!(
            parse_rfc3339("2023-01-15T10:00:00Z").expect("must be valid"),
            test_time()
        );
        assert_eq!(
            parse_rfc3339("2023-01-15T12:00:00+02:00").expect("must be valid"),
            test_time()
        );
    }

    #[test]
    fn test_parse_iso8601() {
        let t = parse_iso8601("20230115T100000Z").expect("must be valid");
        assert_eq!(t, test_time());
        assert_eq!(format_iso8601(t), "20230115T100000Z");
    }

    #[test]
    fn test_parse_invalid_time() {
        let err = parse_rfc3339("15/01/2023").expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);

        let err = parse_iso8601("2023-01-15").expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    }
}

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

use std::sync::Mutex;

use ktsign_core::time::parse_rfc3339;
use ktsign_v1::{Credential, RequestSigner, SigningRequest};
use log::{Level, LevelFilter, Log, Metadata, Record};

/// Keeps every record so the test can inspect what was logged.
struct CaptureLogger {
    records: Mutex<Vec<String>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.records
                .lock()
                .expect("lock poisoned")
                .push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};

#[test]
fn test_debug_logs_never_contain_secret() {
    log::set_logger(&LOGGER).expect("logger must be set once");
    log::set_max_level(LevelFilter::Debug);

    let secret = "very-private-shared-secret";
    let authorization = RequestSigner::new("widgets")
        .signed_header(
            &Credential::new("AKID", secret),
            &SigningRequest::new("GET", "/orders/42/").with_header("Host", "api.example.com"),
            b"",
            parse_rfc3339("2023-01-15T10:00:00Z").expect("must be valid"),
        )
        .expect("must succeed");

    let records = LOGGER.records.lock().expect("lock poisoned");
    assert!(records
        .iter()
        .any(|v| v.starts_with("calculated canonical request: GET\n")));
    assert!(records
        .iter()
        .any(|v| v.starts_with("calculated string to sign: KT1-HMAC-SHA256\n")));
    assert!(records
        .iter()
        .any(|v| *v == format!("calculated authorization: {authorization}")));
    assert!(records.iter().all(|v| !v.contains(secret)));
}

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

//! KT1-HMAC-SHA256 request signer.
//!
//! A request is reduced to a canonical form, hashed, and signed with a key
//! derived from the shared secret for one date, region, service and auth
//! type. The server holding the same secret recomputes the same value.
//!
//! # Example
//!
//! ```
//! use ktsign_core::time::parse_rfc3339;
//! use ktsign_v1::Credential;
//! use ktsign_v1::RequestSigner;
//! use ktsign_v1::SigningRequest;
//!
//! # fn main() -> ktsign_core::Result<()> {
//! let signer = RequestSigner::new("widgets");
//! let cred = Credential::new("AKID", "s3cr3t");
//! let req = SigningRequest::new("GET", "/orders/42/").with_header("Host", "api.example.com");
//!
//! let authorization =
//!     signer.signed_header(&cred, &req, b"", parse_rfc3339("2023-01-15T10:00:00Z")?)?;
//! assert!(authorization.starts_with("KT1-HMAC-SHA256 Credential=AKID/20230115/us/widgets/"));
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod canonical;
pub use canonical::canonical_headers;
pub use canonical::canonical_query;
pub use canonical::canonical_uri;
pub use canonical::header_value_normalize;
pub use canonical::signed_headers;
pub use canonical::CanonicalRequest;
pub use canonical::SigningRequest;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod sign_request;
pub use sign_request::signature;
pub use sign_request::signed_header;
pub use sign_request::RequestSigner;

mod constants;
pub use constants::ALGORITHM;
pub use constants::ALGORITHM_PREFIX;
pub use constants::AUTH_TYPE;
pub use constants::KT_CLIENT_KEY;
pub use constants::KT_CLIENT_SECRET;
pub use constants::KT_SERVICE;
pub use constants::REGION;

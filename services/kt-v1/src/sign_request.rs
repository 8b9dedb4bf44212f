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

use std::fmt::Write;

use http::header;
use http::request::Parts;
use http::HeaderValue;
use ktsign_core::hash::hex_hmac_sha256;
use ktsign_core::hash::hex_sha256;
use ktsign_core::hash::hmac_sha256;
use ktsign_core::time::format_date;
use ktsign_core::time::format_iso8601;
use ktsign_core::time::DateTime;
use ktsign_core::Result;
use log::debug;

use crate::canonical::CanonicalRequest;
use crate::canonical::SigningRequest;
use crate::constants::ALGORITHM;
use crate::constants::ALGORITHM_PREFIX;
use crate::constants::AUTH_TYPE;
use crate::constants::REGION;
use crate::Credential;

/// RequestSigner that implement KT1-HMAC-SHA256.
///
/// The signer holds no state besides the service it signs for, the same
/// inputs always produce the same signature.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    service: String,
}

/// Values produced by one signing pass.
struct Signed {
    scope: String,
    signed_headers: String,
    signature: String,
}

impl RequestSigner {
    /// Create a new signer for given service.
    pub fn new(service: &str) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// The service this signer signs for.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Scope: "20220313/us/<service>/kt1_request"
    pub fn credential_scope(&self, time: DateTime) -> String {
        format!(
            "{}/{}/{}/{}",
            format_date(time),
            REGION,
            self.service,
            AUTH_TYPE
        )
    }

    /// Calculate the hex signature of a request.
    pub fn signature(
        &self,
        cred: &Credential,
        req: &SigningRequest,
        body: &[u8],
        time: DateTime,
    ) -> Result<String> {
        Ok(self.calculate(cred, req, body, time)?.signature)
    }

    /// Calculate the full `Authorization` header value of a request.
    ///
    /// ```text
    /// KT1-HMAC-SHA256 Credential=<key_id>/<scope>, SignedHeaders=<headers>, Signature=<signature>
    /// ```
    pub fn signed_header(
        &self,
        cred: &Credential,
        req: &SigningRequest,
        body: &[u8],
        time: DateTime,
    ) -> Result<String> {
        let signed = self.calculate(cred, req, body, time)?;

        let authorization = format!(
            "{ALGORITHM} Credential={}/{}, SignedHeaders={}, Signature={}",
            cred.key_id, signed.scope, signed.signed_headers, signed.signature
        );
        debug!("calculated authorization: {authorization}");

        Ok(authorization)
    }

    /// Sign `http::request::Parts` in place by inserting the `Authorization`
    /// header.
    ///
    /// All other headers already present are signed. An existing
    /// `Authorization` header is replaced and never signed itself.
    pub fn sign(
        &self,
        parts: &mut Parts,
        body: &[u8],
        cred: &Credential,
        time: DateTime,
    ) -> Result<()> {
        let mut req = SigningRequest::from_parts(parts)?;
        req.headers
            .retain(|(k, _)| k.as_str() != header::AUTHORIZATION.as_str());

        let authorization = self.signed_header(cred, &req, body, time)?;
        let mut authorization = HeaderValue::from_str(&authorization)?;
        authorization.set_sensitive(true);

        parts.headers.insert(header::AUTHORIZATION, authorization);
        Ok(())
    }

    fn calculate(
        &self,
        cred: &Credential,
        req: &SigningRequest,
        body: &[u8],
        time: DateTime,
    ) -> Result<Signed> {
        // build canonical request and string to sign.
        let creq = CanonicalRequest::build(req, body)?;
        let creq_string = creq.to_string();
        debug!("calculated canonical request: {creq_string}");
        let encoded_req = hex_sha256(creq_string.as_bytes());
        debug!("calculated canonical request hash: {encoded_req}");

        let scope = self.credential_scope(time);
        debug!("calculated scope: {scope}");

        let string_to_sign = string_to_sign(time, &scope, &encoded_req)?;
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = generate_signing_key(&cred.secret, time, &self.service);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());
        debug!("calculated signature: {signature}");

        Ok(Signed {
            scope,
            signed_headers: creq.signed_headers,
            signature,
        })
    }
}

/// StringToSign:
///
/// ```text
/// KT1-HMAC-SHA256
/// 20220313T072004Z
/// 20220313/us/<service>/kt1_request
/// <hashed_canonical_request>
/// ```
fn string_to_sign(time: DateTime, scope: &str, encoded_req: &str) -> Result<String> {
    let mut f = String::new();
    writeln!(f, "{ALGORITHM}")?;
    writeln!(f, "{}", format_iso8601(time))?;
    writeln!(f, "{scope}")?;
    write!(f, "{encoded_req}")?;
    Ok(f)
}

fn generate_signing_key(secret: &str, time: DateTime, service: &str) -> Vec<u8> {
    let [_, _, _, sign_request] = signing_key_chain(secret, time, service);
    sign_request
}

/// Every intermediate key, the last one is the signing key.
fn signing_key_chain(secret: &str, time: DateTime, service: &str) -> [Vec<u8>; 4] {
    // Sign secret
    let secret = format!("{ALGORITHM_PREFIX}{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    // Sign region
    let sign_region = hmac_sha256(&sign_date, REGION.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(&sign_region, service.as_bytes());
    // Sign request
    let sign_request = hmac_sha256(&sign_service, AUTH_TYPE.as_bytes());

    [sign_date, sign_region, sign_service, sign_request]
}

/// Calculate the hex signature of a request in one call.
///
/// Headers are `(name, value)` pairs with names unique ignoring case, query
/// pairs have unique names.
#[allow(clippy::too_many_arguments)]
pub fn signature(
    service: &str,
    secret: &str,
    method: &str,
    uri: &str,
    time: DateTime,
    headers: &[(&str, &str)],
    body: impl AsRef<[u8]>,
    query: &[(&str, &str)],
) -> Result<String> {
    let req = build_request(method, uri, headers, query);
    let cred = Credential::new("", secret);

    RequestSigner::new(service).signature(&cred, &req, body.as_ref(), time)
}

/// Calculate the full `Authorization` header value of a request in one call.
///
/// See [`signature`] for the accepted inputs.
#[allow(clippy::too_many_arguments)]
pub fn signed_header(
    service: &str,
    key_id: &str,
    secret: &str,
    method: &str,
    uri: &str,
    time: DateTime,
    headers: &[(&str, &str)],
    body: impl AsRef<[u8]>,
    query: &[(&str, &str)],
) -> Result<String> {
    let req = build_request(method, uri, headers, query);
    let cred = Credential::new(key_id, secret);

    RequestSigner::new(service).signed_header(&cred, &req, body.as_ref(), time)
}

fn build_request(
    method: &str,
    uri: &str,
    headers: &[(&str, &str)],
    query: &[(&str, &str)],
) -> SigningRequest {
    let mut req = SigningRequest::new(method, uri);
    for (k, v) in headers {
        req.header_insert(*k, *v);
    }
    for (k, v) in query {
        req.query_insert(*k, *v);
    }
    req
}

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

//! Canonical form of a request.
//!
//! Both sides of a signed call build this form independently, so every rule
//! here must stay byte-exact.

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

use http::request::Parts;
use ktsign_core::hash::hex_sha256;
use ktsign_core::Error;
use ktsign_core::Result;
use percent_encoding::percent_decode_str;
use percent_encoding::utf8_percent_encode;

use crate::constants::KT_ENCODE_SET;
use crate::constants::KT_SEGMENT_ENCODE_SET;

/// The parts of a request that are covered by a signature.
///
/// Headers and query keep their insertion order. Canonicalization sorts
/// them by their first character only, so entries sharing a first character
/// stay in the order they were inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SigningRequest {
    /// HTTP method, any case.
    pub method: String,
    /// Request path without query, not percent encoded.
    pub path: String,
    /// Query parameters, names are unique.
    pub query: Vec<(String, String)>,
    /// Headers, names are unique ignoring case.
    pub headers: Vec<(String, String)>,
}

impl SigningRequest {
    /// Create a new request with no headers and no query.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    /// Insert a header and return self.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.header_insert(name, value);
        self
    }

    /// Insert a query parameter and return self.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_insert(name, value);
        self
    }

    /// Insert a header.
    ///
    /// A header with the same lowercased name is replaced in place.
    pub fn header_insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let (name, value) = (name.into(), value.into());
        let lower = name.to_lowercase();

        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.to_lowercase() == lower)
        {
            Some(entry) => *entry = (name, value),
            None => self.headers.push((name, value)),
        }
    }

    /// Insert a query parameter.
    ///
    /// A parameter with the same name is replaced in place.
    pub fn query_insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let (name, value) = (name.into(), value.into());

        match self.query.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.query.push((name, value)),
        }
    }

    /// Build a signing request from `http::request::Parts`.
    ///
    /// The path is percent decoded since canonicalization encodes it again.
    /// A header that carries more than one value, or a query parameter that
    /// appears more than once, is rejected.
    pub fn from_parts(parts: &Parts) -> Result<Self> {
        let path = percent_decode_str(parts.uri.path()).decode_utf8()?;

        let mut req = SigningRequest::new(parts.method.as_str(), path);

        if let Some(query) = parts.uri.query() {
            for (k, v) in form_urlencoded::parse(query.as_bytes()) {
                if req.query.iter().any(|(name, _)| *name == k) {
                    return Err(Error::request_invalid(format!(
                        "query parameter {k} appears more than once"
                    )));
                }
                req.query_insert(k, v);
            }
        }

        for name in parts.headers.keys() {
            let mut values = parts.headers.get_all(name).iter();
            let value = match (values.next(), values.next()) {
                (Some(v), None) => v.to_str()?,
                (Some(_), Some(_)) => {
                    return Err(Error::request_invalid(format!(
                        "header {name} has multiple values"
                    )))
                }
                (None, _) => "",
            };
            req.header_insert(name.as_str(), value);
        }

        Ok(req)
    }
}

/// The six fields of a canonical request.
///
/// `Display` joins them with a newline in their fixed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    /// Uppercased method.
    pub method: String,
    /// See [`canonical_uri`].
    pub uri: String,
    /// See [`canonical_query`].
    pub query: String,
    /// See [`canonical_headers`].
    pub headers: String,
    /// See [`signed_headers`].
    pub signed_headers: String,
    /// Hex encoded SHA256 of the body.
    pub payload_hash: String,
}

impl CanonicalRequest {
    /// Canonicalize a request together with its body.
    pub fn build(req: &SigningRequest, body: &[u8]) -> Result<Self> {
        Ok(CanonicalRequest {
            method: req.method.to_uppercase(),
            uri: canonical_uri(&req.path),
            query: canonical_query(&req.query)?,
            headers: canonical_headers(&req.headers)?,
            signed_headers: signed_headers(&req.headers)?,
            payload_hash: hex_sha256(body),
        })
    }
}

impl Display for CanonicalRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.uri)?;
        writeln!(f, "{}", self.query)?;
        writeln!(f, "{}", self.headers)?;
        writeln!(f, "{}", self.signed_headers)?;
        write!(f, "{}", self.payload_hash)
    }
}

/// Build the canonical headers block.
///
/// ```shell
/// [("Host", "a"), ("Content-Type", "  b   c ")] => "content-type:b c\nhost:a\n"
/// ```
pub fn canonical_headers(headers: &[(String, String)]) -> Result<String> {
    let headers = lowercase_sorted(headers)?;

    let mut s = headers
        .iter()
        .map(|(k, v)| format!("{k}:{}", header_value_normalize(v)))
        .collect::<Vec<_>>()
        .join("\n");
    s.push('\n');

    Ok(s)
}

/// Build the `;` joined list of lowercased header names.
pub fn signed_headers(headers: &[(String, String)]) -> Result<String> {
    Ok(lowercase_sorted(headers)?
        .into_iter()
        .map(|(k, _)| k)
        .collect::<Vec<_>>()
        .join(";"))
}

/// Build the canonical query string.
///
/// Literal `=` inside a value is replaced with `%3D` before encoding, so it
/// ends up as `%253D`.
pub fn canonical_query(query: &[(String, String)]) -> Result<String> {
    for (k, _) in query {
        check_name(k, "query")?;
    }
    let mut query = query.iter().collect::<Vec<_>>();
    query.sort_by_key(|(k, _)| k.chars().next());

    Ok(query
        .into_iter()
        .map(|(k, v)| {
            let v = v.replace('=', "%3D");
            format!(
                "{}={}",
                utf8_percent_encode(k, &KT_ENCODE_SET),
                utf8_percent_encode(&v, &KT_ENCODE_SET)
            )
        })
        .collect::<Vec<_>>()
        .join("&"))
}

/// Build the canonical uri.
///
/// Empty segments are dropped, each remaining segment is percent encoded
/// twice and the result is wrapped in `/`.
pub fn canonical_uri(path: &str) -> String {
    let segments = path
        .split('/')
        .filter(|v| !v.is_empty())
        .map(|v| {
            let once = utf8_percent_encode(v, &KT_SEGMENT_ENCODE_SET).to_string();
            utf8_percent_encode(&once, &KT_ENCODE_SET).to_string()
        })
        .collect::<Vec<_>>();

    if segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}/", segments.join("/"))
}

/// Normalize header value: trim it and collapse runs of spaces into one.
///
/// Trimming also drops the information separators `U+001C..=U+001F`, which
/// verifiers count as whitespace.
pub fn header_value_normalize(v: &str) -> String {
    let mut s = String::with_capacity(v.len());
    for c in v.trim_matches(is_trimmed_whitespace).chars() {
        if c == ' ' && s.ends_with(' ') {
            continue;
        }
        s.push(c);
    }
    s
}

fn is_trimmed_whitespace(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Lowercase header names and sort them by their first character.
fn lowercase_sorted(headers: &[(String, String)]) -> Result<Vec<(String, &str)>> {
    let mut headers = headers
        .iter()
        .map(|(k, v)| (k.to_lowercase(), v.as_str()))
        .collect::<Vec<_>>();
    for (k, _) in &headers {
        check_name(k, "header")?;
    }
    // `sort_by_key` is stable, ties keep their input order.
    headers.sort_by_key(|(k, _)| k.chars().next());

    Ok(headers)
}

/// Names are ordered by their first character, so they can't be empty.
fn check_name(name: &str, kind: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::request_invalid(format!(
            "{kind} name must not be empty"
        )));
    }
    Ok(())
}

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

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

/// Prefix of the algorithm, also mixed into the signing key seed.
pub const ALGORITHM_PREFIX: &str = "KT1";
/// Algorithm identifier, the first line of the string to sign.
pub const ALGORITHM: &str = "KT1-HMAC-SHA256";
/// Last component of the credential scope.
pub const AUTH_TYPE: &str = "kt1_request";
/// The only region requests are scoped to.
pub const REGION: &str = "us";

// Env values used while loading config.
/// Env holding the service requests are signed for.
pub const KT_SERVICE: &str = "KT_SERVICE";
/// Env holding the client key id.
pub const KT_CLIENT_KEY: &str = "KT_CLIENT_KEY";
/// Env holding the client shared secret.
pub const KT_CLIENT_SECRET: &str = "KT_CLIENT_SECRET";

/// AsciiSet for query names, query values and the second pass over uri
/// segments.
///
/// - URI encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', '~' and '/'.
pub static KT_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// AsciiSet for the first pass over a single uri segment.
///
/// Same as [`KT_ENCODE_SET`] but '/' is encoded too.
pub static KT_SEGMENT_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

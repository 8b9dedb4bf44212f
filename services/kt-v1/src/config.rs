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

use std::fmt::{Debug, Formatter};

use ktsign_core::utils::Redact;
use ktsign_core::Env;
use ktsign_core::Error;
use ktsign_core::Result;

use crate::constants::*;
use crate::Credential;
use crate::RequestSigner;

/// Config for KT1 signing.
#[derive(Clone, Default)]
pub struct Config {
    /// `service` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`KT_SERVICE`]
    pub service: Option<String>,
    /// `key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`KT_CLIENT_KEY`]
    pub key_id: Option<String>,
    /// `secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`KT_CLIENT_SECRET`]
    pub secret: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("service", &self.service)
            .field("key_id", &self.key_id.as_ref().map(Redact::from))
            .field("secret", &self.secret.as_ref().map(Redact::from))
            .finish()
    }
}

impl Config {
    /// Load config from env.
    ///
    /// Values found in env replace the ones already set.
    pub fn from_env(mut self, env: &impl Env) -> Self {
        if let Some(v) = env.var(KT_SERVICE) {
            self.service = Some(v);
        }
        if let Some(v) = env.var(KT_CLIENT_KEY) {
            self.key_id = Some(v);
        }
        if let Some(v) = env.var(KT_CLIENT_SECRET) {
            self.secret = Some(v);
        }

        self
    }

    /// Build the credential described by this config.
    ///
    /// Fails when either the client key or the client secret is missing.
    pub fn credential(&self) -> Result<Credential> {
        let cred = Credential::new(
            self.key_id.clone().unwrap_or_default(),
            self.secret.clone().unwrap_or_default(),
        );
        if !cred.is_valid() {
            return Err(Error::credential_invalid(
                "both client key and client secret must be set",
            ));
        }

        Ok(cred)
    }

    /// Build a signer for the configured service.
    pub fn signer(&self) -> Result<RequestSigner> {
        let service = self
            .service
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config_invalid("service is missing"))?;

        Ok(RequestSigner::new(service))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ktsign_core::ErrorKind;
    use ktsign_core::OsEnv;
    use ktsign_core::StaticEnv;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_from_env() {
        let env = StaticEnv::from_iter([
            (KT_SERVICE, "widgets"),
            (KT_CLIENT_KEY, "client-key-0001"),
            (KT_CLIENT_SECRET, "s3cr3t"),
        ]);

        let cfg = Config::default().from_env(&env);
        let cred = cfg.credential().expect("must succeed");
        let signer = cfg.signer().expect("must succeed");

        assert_eq!(cred.key_id, "client-key-0001");
        assert_eq!(cred.secret, "s3cr3t");
        assert_eq!(signer.service(), "widgets");
    }

    #[test]
    fn test_config_from_os_env() {
        temp_env::with_vars(
            [
                (KT_SERVICE, Some("widgets")),
                (KT_CLIENT_KEY, Some("AKID")),
                (KT_CLIENT_SECRET, Some("s3cr3t")),
            ],
            || {
                let cfg = Config::default().from_env(&OsEnv);

                assert_eq!(cfg.service.as_deref(), Some("widgets"));
                assert_eq!(cfg.credential().expect("must succeed").key_id, "AKID");
            },
        );
    }

    #[test]
    fn test_config_from_os_env_unset() {
        temp_env::with_vars_unset([KT_SERVICE, KT_CLIENT_KEY, KT_CLIENT_SECRET], || {
            let cfg = Config::default().from_env(&OsEnv);

            assert_eq!(cfg.service, None);
            assert_eq!(
                cfg.credential().expect_err("must fail").kind(),
                ErrorKind::CredentialInvalid
            );
        });
    }

    #[test]
    fn test_config_env_overrides_fields() {
        let env = StaticEnv::from_iter([(KT_SERVICE, "orders")]);
        let cfg = Config {
            service: Some("widgets".to_string()),
            key_id: Some("AKID".to_string()),
            ..Default::default()
        }
        .from_env(&env);

        assert_eq!(cfg.service.as_deref(), Some("orders"));
        assert_eq!(cfg.key_id.as_deref(), Some("AKID"));
        assert_eq!(cfg.secret, None);
    }

    #[test]
    fn test_config_missing_values() {
        let cfg = Config {
            key_id: Some("AKID".to_string()),
            secret: Some(String::new()),
            ..Default::default()
        };

        let err = cfg.credential().expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
        assert!(!err.to_string().contains("AKID"));
        let err = cfg.signer().expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_config_debug_hides_secret() {
        let cfg = Config {
            service: Some("widgets".to_string()),
            key_id: Some("AKID".to_string()),
            secret: Some("s3cr3t".to_string()),
        };

        assert_eq!(
            format!("{cfg:?}"),
            r#"Config { service: Some("widgets"), key_id: Some(***), secret: Some(***) }"#
        );
    }
}

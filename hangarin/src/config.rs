// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use serde::Deserialize;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://database/hangarin.db";

/// Environment variables are read with this prefix, e.g. `HANGARIN_DATABASE_URL`.
const ENV_PREFIX: &str = "HANGARIN_";

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed(ENV_PREFIX).from_env::<Config>()
    }

    /// Same as [`Config::from_env`] but over explicit key/value pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX).from_iter::<_, Config>(vars)
    }
}

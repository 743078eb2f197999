//! Command Module
//!
//! Parses the text commands accepted by the RPC endpoint and applies them to a `Store`.
//!
//! # Grammar
//! - `SET key value [EX seconds] [NX|XX]`
//! - `GET key`
//! - `QPUSH key value [value ...]`
//! - `QPOP key`
//! - `BQPOP key timeout_seconds`

use std::time::Duration;

use tracing::debug;

use crate::error::{Result, StoreError};
use crate::store::{SetCondition, Store};

// == Command ==
/// A parsed, arity-checked command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set {
        key: String,
        value: String,
        ttl: Option<Duration>,
        condition: SetCondition,
    },
    Get {
        key: String,
    },
    QPush {
        key: String,
        values: Vec<String>,
    },
    QPop {
        key: String,
    },
    BQPop {
        key: String,
        timeout: Duration,
    },
}

fn invalid(msg: &str) -> StoreError {
    StoreError::InvalidCommand(msg.to_string())
}

impl Command {
    // == Parse ==
    /// Parses a whitespace-separated command line. The verb is case-insensitive.
    pub fn parse(text: &str) -> Result<Self> {
        let mut words = text.split_whitespace();
        let verb = words
            .next()
            .ok_or_else(|| invalid("empty command"))?
            .to_ascii_uppercase();
        let args: Vec<String> = words.map(str::to_string).collect();

        match verb.as_str() {
            "SET" => Self::parse_set(args),
            "GET" => Ok(Command::Get {
                key: single_key(args, "invalid GET command")?,
            }),
            "QPOP" => Ok(Command::QPop {
                key: single_key(args, "invalid QPOP command")?,
            }),
            "QPUSH" => {
                if args.len() < 2 {
                    return Err(invalid("invalid QPUSH command"));
                }
                let mut args = args.into_iter();
                let key = args.next().unwrap_or_default();
                Ok(Command::QPush {
                    key,
                    values: args.collect(),
                })
            }
            "BQPOP" => {
                let [key, timeout]: [String; 2] = args
                    .try_into()
                    .map_err(|_| invalid("invalid BQPOP command"))?;
                let seconds: u64 = timeout.parse().map_err(|_| invalid("invalid timeout"))?;
                Ok(Command::BQPop {
                    key,
                    timeout: Duration::from_secs(seconds),
                })
            }
            _ => Err(invalid("invalid command")),
        }
    }

    fn parse_set(args: Vec<String>) -> Result<Self> {
        if args.len() < 2 {
            return Err(invalid("invalid SET command"));
        }

        let mut args = args.into_iter();
        let key = args.next().unwrap_or_default();
        let value = args.next().unwrap_or_default();
        let mut ttl = None;
        let mut condition = SetCondition::Always;

        while let Some(option) = args.next() {
            match option.to_ascii_uppercase().as_str() {
                "EX" => {
                    let seconds: u64 = args
                        .next()
                        .and_then(|s| s.parse().ok())
                        .ok_or_else(|| invalid("invalid expiry time"))?;
                    ttl = Some(Duration::from_secs(seconds));
                }
                "NX" => condition = SetCondition::IfAbsent,
                "XX" => condition = SetCondition::IfPresent,
                _ => return Err(invalid("invalid SET command")),
            }
        }

        Ok(Command::Set {
            key,
            value,
            ttl,
            condition,
        })
    }

    // == Execute ==
    /// Applies the command to `store`.
    ///
    /// Returns `Some(value)` for commands that produce one, `None` for SET, QPUSH
    /// and a BQPOP that timed out. BQPOP timeouts are capped at `max_block`.
    pub async fn execute(self, store: &Store, max_block: Duration) -> Result<Option<String>> {
        debug!(command = ?self, "executing");
        match self {
            Command::Set {
                key,
                value,
                ttl,
                condition,
            } => store.set(key, value, ttl, condition).await.map(|_| None),
            Command::Get { key } => store.get(&key).await.map(Some),
            Command::QPush { key, values } => store.push(&key, values).await.map(|_| None),
            Command::QPop { key } => store.pop(&key).await.map(Some),
            Command::BQPop { key, timeout } => {
                store.blocking_pop(&key, timeout.min(max_block)).await
            }
        }
    }
}

fn single_key(args: Vec<String>, msg: &str) -> Result<String> {
    let [key]: [String; 1] = args.try_into().map_err(|_| invalid(msg))?;
    Ok(key)
}

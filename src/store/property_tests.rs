//! Property-Based Tests for the Store Module
//!
//! Uses proptest to check queue ordering, conditional writes and error responses.

use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::StoreError;
use crate::store::{SetCondition, Store};

// == Strategies ==
/// Generates keys drawn from a small alphabet so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-d]{1,2}".prop_map(|s| s)
}

/// Generates whitespace-free tokens, as the command parser would produce
fn token_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,16}".prop_map(|s| s)
}

fn condition_strategy() -> impl Strategy<Value = SetCondition> {
    prop_oneof![
        Just(SetCondition::Always),
        Just(SetCondition::IfAbsent),
        Just(SetCondition::IfPresent),
    ]
}

/// A single scalar operation against the store
#[derive(Debug, Clone)]
enum ScalarOp {
    Set {
        key: String,
        value: String,
        condition: SetCondition,
    },
    Get {
        key: String,
    },
}

fn scalar_op_strategy() -> impl Strategy<Value = ScalarOp> {
    prop_oneof![
        (key_strategy(), token_strategy(), condition_strategy())
            .prop_map(|(key, value, condition)| ScalarOp::Set { key, value, condition }),
        key_strategy().prop_map(|key| ScalarOp::Get { key }),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("test runtime")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Pushing any token sequence and popping until empty yields it reversed,
    // followed by a queue-empty error.
    #[test]
    fn prop_lifo_order(key in key_strategy(), tokens in prop::collection::vec(token_strategy(), 1..40)) {
        let rt = runtime();
        rt.block_on(async {
            let store = Store::new();
            store.push(&key, tokens.clone()).await.unwrap();

            let mut popped = Vec::new();
            for _ in 0..tokens.len() {
                popped.push(store.pop(&key).await.unwrap());
            }

            let mut expected = tokens.clone();
            expected.reverse();
            prop_assert_eq!(popped, expected);
            prop_assert_eq!(store.pop(&key).await, Err(StoreError::QueueEmpty));
            Ok(())
        })?;
    }

    // Split pushes keep their order: the later batch is drained first.
    #[test]
    fn prop_batches_stack(
        first in prop::collection::vec(token_strategy(), 1..10),
        second in prop::collection::vec(token_strategy(), 1..10)
    ) {
        let rt = runtime();
        rt.block_on(async {
            let store = Store::new();
            store.push("k", first.clone()).await.unwrap();
            let len = store.push("k", second.clone()).await.unwrap();
            prop_assert_eq!(len, first.len() + second.len());

            for expected in second.iter().rev().chain(first.iter().rev()) {
                prop_assert_eq!(&store.pop("k").await.unwrap(), expected);
            }
            Ok(())
        })?;
    }

    // Conditional SET/GET agrees with a plain HashMap model.
    #[test]
    fn prop_conditional_set_matches_model(ops in prop::collection::vec(scalar_op_strategy(), 1..60)) {
        let rt = runtime();
        rt.block_on(async {
            let store = Store::new();
            let mut model: HashMap<String, String> = HashMap::new();

            for op in ops {
                match op {
                    ScalarOp::Set { key, value, condition } => {
                        let present = model.contains_key(&key);
                        let expected = match (condition, present) {
                            (SetCondition::IfAbsent, true) => Err(StoreError::AlreadyExists),
                            (SetCondition::IfPresent, false) => Err(StoreError::NotFound),
                            _ => {
                                model.insert(key.clone(), value.clone());
                                Ok(())
                            }
                        };
                        prop_assert_eq!(store.set(key, value, None, condition).await, expected);
                    }
                    ScalarOp::Get { key } => {
                        let expected = model.get(&key).cloned().ok_or(StoreError::NotFound);
                        prop_assert_eq!(store.get(&key).await, expected);
                    }
                }
            }

            prop_assert_eq!(store.len().await, model.len());
            Ok(())
        })?;
    }
}

// Concurrent pushes and pops never duplicate or drop a token.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn prop_concurrent_push_pop_conserves_tokens(
        batches in prop::collection::vec(prop::collection::vec(token_strategy(), 1..8), 2..8),
        pops in 0usize..20
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();

        rt.block_on(async {
            let store = Store::new();
            let total: usize = batches.iter().map(Vec::len).sum();

            let mut pushers = Vec::new();
            for (i, batch) in batches.into_iter().enumerate() {
                let store = store.clone();
                let tagged: Vec<String> = batch
                    .into_iter()
                    .enumerate()
                    .map(|(j, t)| format!("{}.{}.{}", i, j, t))
                    .collect();
                pushers.push(tokio::spawn(async move { store.push("q", tagged).await }));
            }

            let mut poppers = Vec::new();
            for _ in 0..pops {
                let store = store.clone();
                poppers.push(tokio::spawn(async move {
                    store.blocking_pop("q", Duration::from_millis(50)).await
                }));
            }

            for handle in pushers {
                handle.await.expect("push task should not panic").unwrap();
            }

            let mut seen = Vec::new();
            for handle in poppers {
                if let Some(token) = handle.await.expect("pop task should not panic").unwrap() {
                    seen.push(token);
                }
            }
            while let Ok(token) = store.pop("q").await {
                seen.push(token);
            }

            let unique: std::collections::HashSet<_> = seen.iter().cloned().collect();
            prop_assert_eq!(seen.len(), total, "every pushed token is popped exactly once");
            prop_assert_eq!(unique.len(), total, "no token is delivered twice");
            Ok(())
        })?;
    }
}

// == Property Test for Error Response Format ==
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Every error becomes a JSON body with a string "error" field.
    #[test]
    fn prop_error_response_format(message in "[a-zA-Z0-9 _-]{1,100}") {
        use axum::body::to_bytes;
        use axum::response::IntoResponse;

        let error_variants = vec![
            StoreError::AlreadyExists,
            StoreError::NotFound,
            StoreError::QueueEmpty,
            StoreError::TypeMismatch { expected: "queue" },
            StoreError::InvalidCommand(message.clone()),
        ];

        let rt = runtime();
        for error in error_variants {
            let expected_msg = error.to_string();
            let response = error.into_response();

            let content_type = response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok());
            prop_assert!(
                content_type.map(|ct| ct.contains("application/json")).unwrap_or(false),
                "Response should have JSON content-type"
            );

            let bytes = rt.block_on(async { to_bytes(response.into_body(), usize::MAX).await.unwrap() });
            let json: serde_json::Value =
                serde_json::from_slice(&bytes).expect("Response body should be valid JSON");

            prop_assert_eq!(json["error"].as_str(), Some(expected_msg.as_str()));
        }
    }
}

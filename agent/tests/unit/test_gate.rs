//! Admission gate tests

use std::sync::Arc;
use std::time::Duration;

use autodeployd::server::gate::AdmissionGate;

#[tokio::test]
async fn admits_up_to_the_active_limit_without_waiting() {
    let gate = AdmissionGate::new(4);
    assert_eq!(gate.active_limit(), 6);

    let mut permits = Vec::new();
    for _ in 0..6 {
        permits.push(gate.admit().await.unwrap());
    }
}

#[tokio::test]
async fn excess_requests_are_delayed_not_rejected() {
    // Zero definitions floor the limit at one active request
    let gate = Arc::new(AdmissionGate::new(0));
    let first = gate.admit().await.unwrap();

    let waiter = tokio::spawn({
        let gate = gate.clone();
        async move { gate.admit().await.unwrap() }
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!waiter.is_finished());

    drop(first);
    let _second = waiter.await.unwrap();
}

#[tokio::test]
async fn waiters_are_admitted_one_for_one_as_permits_free() {
    let gate = Arc::new(AdmissionGate::new(1));
    assert_eq!(gate.active_limit(), 2);

    let first = gate.admit().await.unwrap();
    let second = gate.admit().await.unwrap();

    let waiters: Vec<_> = (0..2)
        .map(|_| {
            tokio::spawn({
                let gate = gate.clone();
                async move {
                    let _permit = gate.admit().await.unwrap();
                }
            })
        })
        .collect();

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(waiters.iter().all(|w| !w.is_finished()));

    drop(first);
    drop(second);
    for waiter in waiters {
        waiter.await.unwrap();
    }
}

//! Log output of a reconciliation pass through the global subscriber.
//!
//! Installs a process-wide subscriber, so this file holds a single test.

use std::io;
use std::sync::{Arc, Mutex};

use csprop::logging::{self, LoggingConfig};
use csprop::{InMemoryCib, PropertyDescriptor, PropertyReconciler, ReconcileMode};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_worker_thread_logs_stay_inside_pass_span() {
    let captured = Captured::default();
    let writer = captured.clone();
    logging::init_with_writer(
        &LoggingConfig {
            default_filter: "info".to_string(),
            json: true,
        },
        move || writer.clone(),
    )
    .unwrap();

    let cib = InMemoryCib::new();
    cib.create_shadow("staging");
    let descriptors = vec![
        PropertyDescriptor::present("stonith-enabled", false).unwrap(),
        PropertyDescriptor::builder("batch-limit")
            .value(30)
            .cib("staging")
            .build()
            .unwrap(),
    ];

    // Two scopes, so each group runs on its own worker thread.
    let report = PropertyReconciler::new(&cib, &cib).run(&descriptors, ReconcileMode::Plan);
    assert!(report.is_success());

    let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    let records: Vec<serde_json::Value> = output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    let planned: Vec<&serde_json::Value> = records
        .iter()
        .filter(|r| {
            r["fields"]["message"]
                .as_str()
                .is_some_and(|m| m.contains("would set"))
        })
        .collect();
    assert_eq!(planned.len(), 2, "records: {}", output);
    for record in planned {
        assert_eq!(record["span"]["name"], "reconcile.pass", "record: {}", record);
    }
}

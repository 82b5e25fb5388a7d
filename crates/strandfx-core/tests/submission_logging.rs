//! Simulated submissions log their field map and never block.
//!
//! Run:
//!   cargo test -p strandfx-core --test submission_logging

use std::sync::{Arc, Mutex};

use strandfx_core::{FieldError, FormFields, FormKind, Phase, SubmissionDesk};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{Layer, Registry};

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    fields: Vec<(String, String)>,
}

impl CapturedEvent {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

struct EventCapture(Arc<Mutex<Vec<CapturedEvent>>>);

impl<S: tracing::Subscriber> Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.0.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            fields: visitor.0,
        });
    }
}

fn capture<T>(f: impl FnOnce() -> T) -> (T, Vec<CapturedEvent>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = Registry::default().with(EventCapture(events.clone()));
    let out = tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    (out, captured)
}

fn contact_fields() -> FormFields {
    FormFields::from([
        ("name".to_owned(), "Grace".to_owned()),
        ("email".to_owned(), "grace@example.com".to_owned()),
        ("message".to_owned(), "Course dates?".to_owned()),
    ])
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn submit_logs_kind_and_fields_at_info() {
    let (result, events) = capture(|| {
        let mut desk = SubmissionDesk::new();
        desk.submit(FormKind::Contact, &contact_fields(), 0.0)
    });
    assert!(matches!(result, Ok(Phase::Submitting { .. })));

    let info: Vec<_> = events
        .iter()
        .filter(|e| e.level == tracing::Level::INFO)
        .collect();
    assert_eq!(info.len(), 1);
    assert_eq!(info[0].field("kind"), Some("contact"));
    let fields = info[0].field("fields").unwrap();
    assert!(fields.contains("grace@example.com"));
    assert!(fields.contains("Course dates?"));
}

#[test]
fn rejected_submit_is_not_logged_as_submitted() {
    let (result, events) = capture(|| {
        let mut desk = SubmissionDesk::new();
        desk.submit(FormKind::Brochure, &contact_fields(), 0.0)
            .unwrap();
        desk.submit(FormKind::Brochure, &contact_fields(), 500.0)
    });
    assert!(matches!(result, Err(FieldError::SubmissionInFlight { .. })));
    let submitted = events
        .iter()
        .filter(|e| e.field("message") == Some("form submitted"))
        .count();
    assert_eq!(submitted, 1);
}

#[test]
fn confirming_kinds_confirm_after_their_delay() {
    for kind in FormKind::ALL.into_iter().filter(|kind| kind.confirms()) {
        let mut desk = SubmissionDesk::new();
        desk.submit(kind, &contact_fields(), 0.0).unwrap();
        let phase = desk.poll(kind.send_delay_ms());
        assert!(
            matches!(phase, Phase::Confirmed { kind: k, .. } if k == kind),
            "{kind} ended in {phase:?}"
        );
    }
}

#[test]
fn enquiry_is_logged_without_leaving_idle() {
    let (phase, events) = capture(|| {
        let mut desk = SubmissionDesk::new();
        desk.submit(FormKind::Enquiry, &contact_fields(), 0.0)
            .unwrap()
    });
    assert_eq!(phase, Phase::Idle);
    let info: Vec<_> = events
        .iter()
        .filter(|e| e.level == tracing::Level::INFO)
        .collect();
    assert_eq!(info.len(), 1);
    assert_eq!(info[0].field("kind"), Some("enquiry"));
}

#[test]
fn blank_newsletter_is_not_logged() {
    let (phase, events) = capture(|| {
        let mut desk = SubmissionDesk::new();
        desk.submit(FormKind::Newsletter, &FormFields::new(), 0.0)
            .unwrap()
    });
    assert_eq!(phase, Phase::Idle);
    assert!(events.iter().all(|e| e.level != tracing::Level::INFO));
}

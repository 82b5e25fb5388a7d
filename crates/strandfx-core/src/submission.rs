//! Simulated form submission.
//!
//! Forms hand over a flat field map; nothing leaves the page. Contact and
//! brochure forms show a "sending" state for a moment, then a confirmation
//! that clears itself. Newsletter sign-ups confirm at once and keep the
//! confirmation until the next submit, but only with an email. Enquiries are
//! logged and never leave `Idle`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, Result};

/// Flat field name → value map supplied by a form.
pub type FormFields = BTreeMap<String, String>;

/// Simulated round-trip for forms that show a sending state.
pub const SEND_DELAY_MS: f64 = 1500.0;
/// How long the contact confirmation stays up.
pub const CONFIRMATION_MS: f64 = 3000.0;
/// How long the brochure download notice stays up.
pub const BROCHURE_CONFIRMATION_MS: f64 = 2000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Contact,
    Brochure,
    Enquiry,
    Newsletter,
}

impl FormKind {
    pub const ALL: [Self; 4] = [Self::Contact, Self::Brochure, Self::Enquiry, Self::Newsletter];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Brochure => "brochure",
            Self::Enquiry => "enquiry",
            Self::Newsletter => "newsletter",
        }
    }

    #[must_use]
    pub const fn send_delay_ms(self) -> f64 {
        match self {
            Self::Contact | Self::Brochure => SEND_DELAY_MS,
            Self::Enquiry | Self::Newsletter => 0.0,
        }
    }

    /// `None` means the confirmation stays until the next submit.
    #[must_use]
    pub const fn confirmation_ms(self) -> Option<f64> {
        match self {
            Self::Contact => Some(CONFIRMATION_MS),
            Self::Brochure => Some(BROCHURE_CONFIRMATION_MS),
            Self::Enquiry | Self::Newsletter => None,
        }
    }

    /// Whether an accepted submission moves the desk out of `Idle`.
    #[must_use]
    pub const fn confirms(self) -> bool {
        !matches!(self, Self::Enquiry)
    }

    /// Field that must be present and non-blank, or the submit is ignored.
    #[must_use]
    pub const fn required_field(self) -> Option<&'static str> {
        match self {
            Self::Newsletter => Some("email"),
            Self::Contact | Self::Brochure | Self::Enquiry => None,
        }
    }

    /// Parse a lowercase kind name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting { kind: FormKind, since_ms: f64 },
    Confirmed { kind: FormKind, since_ms: f64 },
}

impl Phase {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting { .. } => "submitting",
            Self::Confirmed { .. } => "confirmed",
        }
    }
}

/// Time-driven submission state machine. The caller supplies `now_ms` on
/// every call; the desk never reads a clock itself.
#[derive(Debug, Clone, Default)]
pub struct SubmissionDesk {
    phase: Phase,
    accepted: u64,
}

impl SubmissionDesk {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a submission and log its fields.
    ///
    /// A newsletter sign-up without an email is ignored: nothing is logged
    /// and the phase does not change. Enquiries are logged but leave the
    /// phase as it was.
    ///
    /// # Errors
    ///
    /// [`FieldError::SubmissionInFlight`] while a previous submission is
    /// still sending.
    pub fn submit(&mut self, kind: FormKind, fields: &FormFields, now_ms: f64) -> Result<Phase> {
        if let Phase::Submitting { kind: current, .. } = self.phase {
            tracing::debug!(kind = %kind, in_flight = %current, "submission rejected");
            return Err(FieldError::SubmissionInFlight { kind: current });
        }
        if let Some(name) = kind.required_field() {
            if fields.get(name).is_none_or(|value| value.trim().is_empty()) {
                tracing::debug!(kind = %kind, field = name, "submission ignored; field blank");
                return Ok(self.poll(now_ms));
            }
        }
        tracing::info!(kind = %kind, fields = ?fields, "form submitted");
        self.accepted += 1;
        if !kind.confirms() {
            return Ok(self.poll(now_ms));
        }
        self.phase = Phase::Submitting {
            kind,
            since_ms: now_ms,
        };
        Ok(self.poll(now_ms))
    }

    /// Advance timers to `now_ms` and return the resulting phase.
    pub fn poll(&mut self, now_ms: f64) -> Phase {
        if let Phase::Submitting { kind, since_ms } = self.phase {
            let due = since_ms + kind.send_delay_ms();
            if now_ms >= due {
                self.phase = Phase::Confirmed {
                    kind,
                    since_ms: due,
                };
            }
        }
        if let Phase::Confirmed { kind, since_ms } = self.phase {
            if let Some(hold) = kind.confirmation_ms() {
                if now_ms >= since_ms + hold {
                    self.phase = Phase::Idle;
                }
            }
        }
        self.phase
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Submissions accepted so far.
    #[must_use]
    pub const fn accepted(&self) -> u64 {
        self.accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> FormFields {
        FormFields::from([
            ("name".to_owned(), "Ada".to_owned()),
            ("email".to_owned(), "ada@example.com".to_owned()),
        ])
    }

    #[test]
    fn contact_sends_then_confirms_then_clears() {
        let mut desk = SubmissionDesk::new();
        let phase = desk.submit(FormKind::Contact, &fields(), 100.0).unwrap();
        assert_eq!(phase.as_str(), "submitting");
        assert_eq!(desk.poll(1599.0).as_str(), "submitting");
        assert_eq!(
            desk.poll(1600.0),
            Phase::Confirmed {
                kind: FormKind::Contact,
                since_ms: 1600.0
            }
        );
        assert_eq!(desk.poll(4599.0).as_str(), "confirmed");
        assert_eq!(desk.poll(4600.0), Phase::Idle);
    }

    #[test]
    fn newsletter_confirms_immediately_and_stays() {
        let mut desk = SubmissionDesk::new();
        let phase = desk.submit(FormKind::Newsletter, &fields(), 0.0).unwrap();
        assert!(matches!(phase, Phase::Confirmed { .. }));
        assert!(matches!(desk.poll(1e9), Phase::Confirmed { .. }));
    }

    #[test]
    fn late_poll_skips_straight_to_idle() {
        let mut desk = SubmissionDesk::new();
        desk.submit(FormKind::Brochure, &fields(), 0.0).unwrap();
        assert_eq!(desk.poll(10_000.0), Phase::Idle);
    }

    #[test]
    fn brochure_notice_clears_after_two_seconds() {
        let mut desk = SubmissionDesk::new();
        desk.submit(FormKind::Brochure, &FormFields::new(), 0.0)
            .unwrap();
        assert_eq!(
            desk.poll(1500.0),
            Phase::Confirmed {
                kind: FormKind::Brochure,
                since_ms: 1500.0
            }
        );
        assert_eq!(desk.poll(3499.0).as_str(), "confirmed");
        assert_eq!(desk.poll(3500.0), Phase::Idle);
        assert_eq!(desk.poll(3600.0), Phase::Idle);
    }

    #[test]
    fn newsletter_without_email_is_ignored() {
        let mut desk = SubmissionDesk::new();
        assert_eq!(
            desk.submit(FormKind::Newsletter, &FormFields::new(), 0.0)
                .unwrap(),
            Phase::Idle
        );
        let blank = FormFields::from([("email".to_owned(), "  ".to_owned())]);
        assert_eq!(
            desk.submit(FormKind::Newsletter, &blank, 5.0).unwrap(),
            Phase::Idle
        );
        assert_eq!(desk.accepted(), 0);
    }

    #[test]
    fn enquiry_is_counted_but_stays_idle() {
        let mut desk = SubmissionDesk::new();
        assert_eq!(
            desk.submit(FormKind::Enquiry, &fields(), 0.0).unwrap(),
            Phase::Idle
        );
        assert_eq!(desk.poll(1e9), Phase::Idle);
        assert_eq!(desk.accepted(), 1);
    }

    #[test]
    fn second_submit_while_sending_is_rejected() {
        let mut desk = SubmissionDesk::new();
        desk.submit(FormKind::Brochure, &fields(), 0.0).unwrap();
        let err = desk.submit(FormKind::Contact, &fields(), 10.0).unwrap_err();
        assert!(matches!(
            err,
            FieldError::SubmissionInFlight {
                kind: FormKind::Brochure
            }
        ));
        assert_eq!(desk.accepted(), 1);
    }

    #[test]
    fn resubmit_after_confirmation_is_allowed() {
        let mut desk = SubmissionDesk::new();
        desk.submit(FormKind::Newsletter, &fields(), 0.0).unwrap();
        desk.submit(FormKind::Contact, &fields(), 5.0).unwrap();
        assert_eq!(desk.accepted(), 2);
        assert_eq!(desk.phase().as_str(), "submitting");
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in FormKind::ALL {
            assert_eq!(FormKind::parse(kind.as_str()), Some(kind));
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
        assert_eq!(FormKind::parse("Contact"), None);
    }
}

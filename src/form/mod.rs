//! Client-side link form.
//!
//! Holds the entered values, validates them on submit and hands a
//! [`LinkRequest`] to a [`SubmitHandler`]. The form moves through
//! `Idle -> Editing -> Submitting -> (Succeeded | Failed)` and back to
//! `Idle` on [`LinkForm::reset`]. Only one submission is in flight at a time;
//! entered values survive every failure.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::errors::LinkError;
use crate::models::{CreatedLink, LinkRequest};
use crate::validation::{Field, ValidationError, normalize_slug, validate_long_url, validate_slug};

mod handler;

pub use handler::SubmitHandler;

/// Raw field values as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub long_url: String,
    pub slug: String,
    pub expires_on: Option<DateTime<Utc>>,
}

impl FormFields {
    /// Validates the fields and builds the request to submit.
    pub fn to_request(&self, now: DateTime<Utc>) -> Result<LinkRequest, ValidationError> {
        validate_long_url(&self.long_url)?;

        let slug = normalize_slug(Some(&self.slug));
        if let Some(slug) = &slug {
            validate_slug(slug)?;
        }

        if self.expires_on.is_some_and(|at| at <= now) {
            return Err(ValidationError::ExpiryInPast);
        }

        Ok(LinkRequest {
            long_url: self.long_url.trim().to_owned(),
            slug,
            expires_on: self.expires_on,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Idle,
    Editing,
    Submitting,
    Succeeded(CreatedLink),
    Failed(LinkError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A submission was already in flight; nothing happened.
    Ignored,
    /// Rejected locally; the handler was not called.
    Invalid(ValidationError),
    Created(CreatedLink),
    Failed(LinkError),
}

#[derive(Default)]
struct Inner {
    fields: FormFields,
    state: FormState,
}

pub struct LinkForm<H> {
    handler: H,
    timeout: Option<Duration>,
    inner: Mutex<Inner>,
}

impl<H> LinkForm<H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            timeout: None,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Fails a submission with a retryable network error once `limit` passes.
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn edit(&self, apply: impl FnOnce(&mut FormFields)) {
        let mut inner = self.lock();
        apply(&mut inner.fields);
        // An in-flight request keeps its own snapshot of the values.
        if inner.state != FormState::Submitting {
            inner.state = FormState::Editing;
        }
    }

    pub fn set_long_url(&self, value: impl Into<String>) {
        let value = value.into();
        self.edit(|fields| fields.long_url = value);
    }

    pub fn set_slug(&self, value: impl Into<String>) {
        let value = value.into();
        self.edit(|fields| fields.slug = value);
    }

    pub fn set_expires_on(&self, value: Option<DateTime<Utc>>) {
        self.edit(|fields| fields.expires_on = value);
    }

    pub fn fields(&self) -> FormFields {
        self.lock().fields.clone()
    }

    pub fn state(&self) -> FormState {
        self.lock().state.clone()
    }

    /// False while a submission is in flight.
    pub fn can_submit(&self) -> bool {
        self.lock().state != FormState::Submitting
    }

    /// The inline message for `field`, if the last attempt failed on it.
    pub fn field_error(&self, field: Field) -> Option<String> {
        match &self.lock().state {
            FormState::Failed(LinkError::Validation(err)) if err.field() == field => {
                Some(err.to_string())
            }
            FormState::Failed(LinkError::Conflict { field: f, reason }) if *f == field => {
                Some(reason.clone())
            }
            _ => None,
        }
    }

    /// A failure that does not belong to a single field.
    pub fn form_error(&self) -> Option<LinkError> {
        match &self.lock().state {
            FormState::Failed(err) if err.field().is_none() => Some(err.clone()),
            _ => None,
        }
    }

    /// Clears the fields and returns to `Idle`. Ignored while submitting.
    pub fn reset(&self) {
        let mut inner = self.lock();
        if inner.state != FormState::Submitting {
            *inner = Inner::default();
        }
    }
}

impl<H: SubmitHandler> LinkForm<H> {
    pub async fn submit(&self) -> SubmitOutcome {
        let request = {
            let mut inner = self.lock();
            if inner.state == FormState::Submitting {
                tracing::debug!("submission already in flight, ignoring");
                return SubmitOutcome::Ignored;
            }
            match inner.fields.to_request(Utc::now()) {
                Ok(request) => {
                    inner.state = FormState::Submitting;
                    request
                }
                Err(err) => {
                    inner.state = FormState::Failed(LinkError::Validation(err.clone()));
                    return SubmitOutcome::Invalid(err);
                }
            }
        };

        let mut in_flight = InFlight { form: self, settled: false };
        let result = self.dispatch(&request).await;
        in_flight.settled = true;

        let mut inner = self.lock();
        match result {
            Ok(created) => {
                tracing::info!(slug = %created.slug, "short link created");
                inner.state = FormState::Succeeded(created.clone());
                SubmitOutcome::Created(created)
            }
            Err(err) => {
                tracing::warn!(error = %err, "link submission failed");
                inner.state = FormState::Failed(err.clone());
                SubmitOutcome::Failed(err)
            }
        }
    }

    async fn dispatch(&self, request: &LinkRequest) -> Result<CreatedLink, LinkError> {
        let Some(limit) = self.timeout else {
            return self.handler.create_link(request).await;
        };
        match tokio::time::timeout(limit, self.handler.create_link(request)).await {
            Ok(result) => result,
            Err(_) => Err(LinkError::Network(format!(
                "request timed out after {}ms",
                limit.as_millis()
            ))),
        }
    }
}

/// Leaves the form submittable again if a submit future is dropped mid-flight.
struct InFlight<'a, H> {
    form: &'a LinkForm<H>,
    settled: bool,
}

impl<H> Drop for InFlight<'_, H> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut inner = self.form.lock();
        if inner.state == FormState::Submitting {
            inner.state = FormState::Failed(LinkError::Network("submission cancelled".into()));
        }
    }
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use url_shortener::{
    LinkError,
    form::{FormFields, FormState, LinkForm, SubmitHandler, SubmitOutcome},
    models::{CreatedLink, LinkRequest},
    validation::{Field, ValidationError},
};

fn created(slug: &str) -> CreatedLink {
    CreatedLink {
        slug: slug.to_owned(),
        short_url: format!("http://sho.rt/{slug}"),
    }
}

/// Replies with a canned result and records every request it sees.
struct Canned {
    reply: Result<CreatedLink, LinkError>,
    seen: Mutex<Vec<LinkRequest>>,
}

impl Canned {
    fn new(reply: Result<CreatedLink, LinkError>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn seen(&self) -> Vec<LinkRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmitHandler for Canned {
    async fn create_link(&self, request: &LinkRequest) -> Result<CreatedLink, LinkError> {
        self.seen.lock().unwrap().push(request.clone());
        self.reply.clone()
    }
}

/// Blocks inside the handler until released.
#[derive(Default)]
struct Gated {
    entered: Notify,
    release: Notify,
    calls: AtomicUsize,
}

#[async_trait]
impl SubmitHandler for Gated {
    async fn create_link(&self, _request: &LinkRequest) -> Result<CreatedLink, LinkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(created("ex1"))
    }
}

struct Slow;

#[async_trait]
impl SubmitHandler for Slow {
    async fn create_link(&self, _request: &LinkRequest) -> Result<CreatedLink, LinkError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(created("late"))
    }
}

#[tokio::test]
async fn empty_long_url_is_rejected_before_the_handler() {
    let handler = Canned::new(Ok(created("ex1")));
    let form = LinkForm::new(handler.clone());
    form.set_slug("ex1");

    let outcome = form.submit().await;

    assert_eq!(outcome, SubmitOutcome::Invalid(ValidationError::EmptyLongUrl));
    assert!(handler.seen().is_empty());
    assert!(form.field_error(Field::LongUrl).is_some());
    assert_eq!(form.field_error(Field::Slug), None);
}

#[tokio::test]
async fn malformed_url_is_rejected_locally() {
    let handler = Canned::new(Ok(created("ex1")));
    let form = LinkForm::new(handler.clone());
    form.set_long_url("not a url");

    let outcome = form.submit().await;

    assert_eq!(outcome, SubmitOutcome::Invalid(ValidationError::MalformedLongUrl));
    assert!(handler.seen().is_empty());
    assert_eq!(
        form.state(),
        FormState::Failed(LinkError::Validation(ValidationError::MalformedLongUrl))
    );
}

#[tokio::test]
async fn slug_with_path_separator_is_rejected_locally() {
    let handler = Canned::new(Ok(created("ex1")));
    let form = LinkForm::new(handler.clone());
    form.set_long_url("https://example.com");
    form.set_slug("a/b");

    assert_eq!(
        form.submit().await,
        SubmitOutcome::Invalid(ValidationError::InvalidSlug)
    );
    assert!(handler.seen().is_empty());
    assert!(form.field_error(Field::Slug).is_some());
}

#[tokio::test]
async fn valid_submission_calls_handler_once_with_the_values() {
    let handler = Canned::new(Ok(created("ex1")));
    let form = LinkForm::new(handler.clone());
    form.set_long_url("https://example.com");
    form.set_slug("ex1");

    let outcome = form.submit().await;

    assert_eq!(outcome, SubmitOutcome::Created(created("ex1")));
    assert_eq!(
        handler.seen(),
        vec![LinkRequest::new("https://example.com", Some("ex1".to_owned()))]
    );
    assert_eq!(form.state(), FormState::Succeeded(created("ex1")));
}

#[tokio::test]
async fn second_submit_while_in_flight_is_ignored() {
    let handler = Arc::new(Gated::default());
    let form = Arc::new(LinkForm::new(handler.clone()));
    form.set_long_url("https://example.com");
    form.set_slug("ex1");

    let first = tokio::spawn({
        let form = form.clone();
        async move { form.submit().await }
    });
    handler.entered.notified().await;

    assert!(!form.can_submit());
    assert_eq!(form.state(), FormState::Submitting);
    assert_eq!(form.submit().await, SubmitOutcome::Ignored);

    handler.release.notify_one();
    assert_eq!(first.await.unwrap(), SubmitOutcome::Created(created("ex1")));
    assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
    assert!(form.can_submit());
}

#[tokio::test]
async fn conflict_keeps_values_and_marks_the_slug() {
    let handler = Canned::new(Err(LinkError::Conflict {
        field: Field::Slug,
        reason: "must be unique".to_owned(),
    }));
    let form = LinkForm::new(handler.clone());
    form.set_long_url("https://example.com");
    form.set_slug("ex1");

    let outcome = form.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Failed(LinkError::Conflict { .. })));
    assert_eq!(
        form.fields(),
        FormFields {
            long_url: "https://example.com".to_owned(),
            slug: "ex1".to_owned(),
            expires_on: None,
        }
    );
    assert_eq!(form.field_error(Field::Slug).as_deref(), Some("must be unique"));
    assert_eq!(form.form_error(), None);
    assert!(form.can_submit());
}

#[tokio::test]
async fn editing_after_failure_clears_the_error() {
    let handler = Canned::new(Err(LinkError::Conflict {
        field: Field::Slug,
        reason: "must be unique".to_owned(),
    }));
    let form = LinkForm::new(handler);
    form.set_long_url("https://example.com");
    form.set_slug("ex1");
    form.submit().await;

    form.set_slug("ex2");

    assert_eq!(form.state(), FormState::Editing);
    assert_eq!(form.field_error(Field::Slug), None);
}

#[tokio::test]
async fn timeout_is_a_retryable_form_error() {
    let form = LinkForm::new(Slow).with_timeout(Duration::from_millis(50));
    form.set_long_url("https://example.com");

    let SubmitOutcome::Failed(err) = form.submit().await else {
        panic!("expected the submission to time out");
    };

    assert!(err.is_retryable());
    assert_eq!(form.form_error(), Some(err));
    assert_eq!(form.fields().long_url, "https://example.com");
    assert!(form.can_submit());
}

#[tokio::test]
async fn server_error_is_shown_at_form_level() {
    let handler = Canned::new(Err(LinkError::Server {
        status: 500,
        message: "internal error".to_owned(),
    }));
    let form = LinkForm::new(handler);
    form.set_long_url("https://example.com");

    form.submit().await;

    assert!(matches!(form.form_error(), Some(LinkError::Server { status: 500, .. })));
    assert_eq!(form.field_error(Field::LongUrl), None);
}

#[tokio::test]
async fn reset_returns_to_idle() {
    let form = LinkForm::new(Canned::new(Ok(created("ex1"))));
    assert_eq!(form.state(), FormState::Idle);
    form.set_long_url("https://example.com");
    assert_eq!(form.state(), FormState::Editing);
    form.submit().await;

    form.reset();

    assert_eq!(form.state(), FormState::Idle);
    assert_eq!(form.fields(), FormFields::default());
}

#[tokio::test]
async fn dropped_submission_releases_the_form() {
    let handler = Arc::new(Gated::default());
    let form = Arc::new(LinkForm::new(handler.clone()));
    form.set_long_url("https://example.com");

    let task = tokio::spawn({
        let form = form.clone();
        async move { form.submit().await }
    });
    handler.entered.notified().await;
    task.abort();
    assert!(task.await.unwrap_err().is_cancelled());

    assert!(form.can_submit());
    assert!(matches!(form.state(), FormState::Failed(LinkError::Network(_))));
}

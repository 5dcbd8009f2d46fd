use crate::e2e::helpers;

use helpers::fake_vendor::{VendorReply, FAKE_AUDIO};
use helpers::TestContext;
use std::sync::Arc;
use std::time::Duration;
use test_context::test_context;
use tts_maker::client::{ClientStrategy, SynthesisClient};
use tts_maker::domain::form::{FormStatus, SpeechForm, SubmitOutcome};
use tts_maker::domain::playback::{ObjectUrlStore, PlaybackState};

fn form(ctx: &TestContext, store: &ObjectUrlStore) -> SpeechForm {
    let client = SynthesisClient::new(ClientStrategy::proxy(&ctx.base_url).unwrap());
    SpeechForm::new(Arc::new(client), store.clone())
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_load_synthesized_audio_into_player(ctx: &TestContext) {
    let store = ObjectUrlStore::new();
    let form = form(ctx, &store);
    form.set_text("Hello world");

    let outcome = form.submit().await;

    assert_eq!(outcome, SubmitOutcome::Completed);
    assert_eq!(form.status(), FormStatus::Success);
    assert!(form.notification_visible());
    assert!(!form.is_input_disabled());

    form.with_player(|player| {
        assert_eq!(player.state(), PlaybackState::Loading);
        assert_eq!(player.bytes(), Some(FAKE_AUDIO));
        assert_eq!(player.mime_type(), Some("audio/mpeg"));
        assert!(player.url().unwrap().starts_with("blob:"));
    });
    assert_eq!(store.len(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_ignore_submit_while_request_in_flight(ctx: &TestContext) {
    ctx.vendor.delay_by(Duration::from_millis(300));
    let form = Arc::new(form(ctx, &ObjectUrlStore::new()));
    form.set_text("Hello world");

    let (first, second) = tokio::join!(form.submit(), form.submit());

    let mut outcomes = vec![first, second];
    outcomes.sort_by_key(|o| matches!(o, SubmitOutcome::Ignored));
    assert_eq!(outcomes, vec![SubmitOutcome::Completed, SubmitOutcome::Ignored]);
    assert_eq!(ctx.vendor.request_count(), 1);
    assert!(!form.is_input_disabled());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_release_previous_audio_on_resubmit(ctx: &TestContext) {
    let store = ObjectUrlStore::new();
    let form = form(ctx, &store);
    form.set_text("First");
    form.submit().await;
    let first_url = form.with_player(|p| p.url().map(str::to_string)).unwrap();

    form.set_text("Second");
    form.submit().await;

    assert!(store.resolve(&first_url).is_none());
    assert_eq!(store.len(), 1);
    assert_eq!(ctx.vendor.request_count(), 2);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_keep_previous_audio_when_synthesis_fails(ctx: &TestContext) {
    let store = ObjectUrlStore::new();
    let form = form(ctx, &store);
    form.set_text("Hello");
    form.submit().await;
    form.with_player(|p| p.metadata_loaded(1.5));

    ctx.vendor.reply_with(VendorReply::Error {
        status: 429,
        body: r#"{"error":"Rate limit exceeded"}"#.to_string(),
    });
    let outcome = form.submit().await;

    assert_eq!(outcome, SubmitOutcome::Failed("Rate limit exceeded".to_string()));
    assert_eq!(form.status(), FormStatus::Error("Rate limit exceeded".to_string()));
    form.with_player(|player| {
        assert_eq!(player.state(), PlaybackState::Ready);
        assert_eq!(player.bytes(), Some(FAKE_AUDIO));
    });
    assert_eq!(store.len(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_send_blank_text(ctx: &TestContext) {
    let form = form(ctx, &ObjectUrlStore::new());
    form.set_text("   ");

    let outcome = form.submit().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Failed("Please enter text to convert".to_string())
    );
    assert_eq!(ctx.vendor.request_count(), 0);
}

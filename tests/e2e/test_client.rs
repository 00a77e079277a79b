use crate::e2e::helpers;

use arabic_tts_relay::client::{
    AssumeOnline, AudioClip, AudioPlayer, ClientError, Collaborators, DocumentExtractor,
    ImportedFile, InputAssembler, RelayClient, SynthesisRelay,
};
use arabic_tts_relay::domain::tts::{SynthesisRequest, VoiceSelection};
use async_trait::async_trait;
use helpers::{TestContext, UPSTREAM_PATH};
use mockito::Matcher;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use test_context::test_context;
use tokio_test::{assert_err, assert_ok};
use tokio_util::sync::CancellationToken;

const FAKE_MP3: &[u8] = &[0xFF, 0xFB, 0x10, 0x20];

#[derive(Default)]
struct CountingPlayer {
    plays: AtomicUsize,
}

#[async_trait]
impl AudioPlayer for CountingPlayer {
    async fn play(&self, _clip: &AudioClip) -> Result<(), ClientError> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Treats the document as paragraphs separated by blank lines
struct BlankLineExtractor;

#[async_trait]
impl DocumentExtractor for BlankLineExtractor {
    async fn paragraphs(&self, bytes: &[u8]) -> Result<Vec<String>, ClientError> {
        let text = String::from_utf8(bytes.to_vec())
            .map_err(|e| ClientError::FileRead(e.to_string()))?;
        Ok(text.split("\n\n").map(str::to_string).collect())
    }
}

fn assembler_for(base_url: &str, player: Arc<CountingPlayer>) -> InputAssembler {
    InputAssembler::new(Collaborators {
        microphone: None,
        extractor: Arc::new(BlankLineExtractor),
        relay: Arc::new(RelayClient::new(base_url)),
        player,
        connectivity: Arc::new(AssumeOnline),
    })
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_generate_play_and_download_through_the_relay(ctx: &mut TestContext) {
    let upstream = ctx
        .upstream
        .mock("POST", UPSTREAM_PATH)
        .match_body(Matcher::PartialJson(json!({
            "text": "مرحبا بكم",
            "voice": { "gender": "male", "language": "ar-SA" }
        })))
        .with_status(200)
        .with_body(FAKE_MP3)
        .create_async()
        .await;

    let player = Arc::new(CountingPlayer::default());
    let mut assembler = assembler_for(&ctx.base_url, player.clone());
    assembler.set_text("مرحبا بكم");

    assert_ok!(assembler.generate_audio(&CancellationToken::new()).await);
    assert_eq!(player.plays.load(Ordering::SeqCst), 1);
    assert!(assembler.can_download());

    let dir = tempfile::tempdir().unwrap();
    let path = assembler
        .download_audio(dir.path())
        .await
        .unwrap()
        .expect("audio should be saved");
    assert_eq!(std::fs::read(path).unwrap(), FAKE_MP3);
    upstream.assert_async().await;
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_surface_relay_errors_as_alerts(ctx: &mut TestContext) {
    ctx.upstream
        .mock("POST", UPSTREAM_PATH)
        .with_status(429)
        .with_body(r#"{"message":"rate limited"}"#)
        .create_async()
        .await;

    let player = Arc::new(CountingPlayer::default());
    let mut assembler = assembler_for(&ctx.base_url, player.clone());
    assembler.set_text("مرحبا بكم");

    let err = assert_err!(assembler.read_aloud(&CancellationToken::new()).await);
    assert!(matches!(err, ClientError::Relay { status: 429, .. }));
    assert_eq!(err.alert_text(), "خطأ في توليد الصوت: خطأ من الخادم: rate limited");
    assert_eq!(player.plays.load(Ordering::SeqCst), 0);
    assert!(!assembler.can_download());
    assert!(!assembler.is_busy());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_surface_relay_validation_message(ctx: &mut TestContext) {
    let client = RelayClient::new(&ctx.base_url);

    let err = assert_err!(
        client
            .synthesize(
                &SynthesisRequest::new("English only", VoiceSelection::Female),
                &CancellationToken::new(),
            )
            .await
    );

    match err {
        ClientError::Relay { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "يجب أن يكون النص بين 3 و1000 حرف");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_import_a_document_then_synthesize_it(ctx: &mut TestContext) {
    let upstream = ctx
        .upstream
        .mock("POST", UPSTREAM_PATH)
        .match_body(Matcher::PartialJson(json!({ "text": "السطر الأول السطر الثاني" })))
        .with_status(200)
        .with_body(FAKE_MP3)
        .create_async()
        .await;

    let mut assembler = assembler_for(&ctx.base_url, Arc::new(CountingPlayer::default()));
    assert_ok!(
        assembler
            .import_file(&ImportedFile {
                name: "نص.docx".to_string(),
                mime: "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                    .to_string(),
                bytes: "السطر الأول\n\nالسطر الثاني".as_bytes().to_vec(),
            })
            .await
    );
    assert_eq!(assembler.text(), "السطر الأول\nالسطر الثاني");

    // The relay folds the paragraph break into a single space
    assert_ok!(assembler.generate_audio(&CancellationToken::new()).await);
    upstream.assert_async().await;
}

use std::sync::Arc;

use bytes::Bytes;
use futures::{StreamExt, stream};
use tokio::net::TcpListener;

use hindemit_core::models::api::{ChatStreamEvent, ConversationRequest};
use hindemit_core::models::message::Message;
use hindemit_openrouter::error::ProviderError;
use hindemit_openrouter::provider::{BoxFuture, ChatProvider, DeltaStream};
use hindemit_server::state::AppState;
use hindemit_widget::backend::ChatBackend;
use hindemit_widget::error::WidgetError;
use hindemit_widget::http::{HttpBackend, event_stream};
use hindemit_widget::ChatController;

async fn decode(chunks: &[&str]) -> Vec<Result<ChatStreamEvent, WidgetError>> {
    let chunks: Vec<Result<Bytes, WidgetError>> = chunks
        .iter()
        .map(|c| Ok(Bytes::copy_from_slice(c.as_bytes())))
        .collect();
    event_stream(stream::iter(chunks)).collect().await
}

fn delta(text: &str) -> ChatStreamEvent {
    ChatStreamEvent::Delta { text: text.into() }
}

#[tokio::test]
async fn decodes_a_full_reply() {
    let events = decode(&[
        "event: start\ndata: {\"messageId\":\"m1\"}\n\n",
        "event: delta\ndata: {\"text\":\"Hal\"}\n\nevent: delta\ndata: {\"text\":\"lo\"}\n\n",
        "event: finish\ndata: {}\n\n",
    ])
    .await;

    let events: Vec<ChatStreamEvent> = events.into_iter().map(Result::unwrap).collect();
    assert_eq!(
        events,
        vec![
            ChatStreamEvent::Start {
                message_id: "m1".into()
            },
            delta("Hal"),
            delta("lo"),
            ChatStreamEvent::Finish,
        ]
    );
}

#[tokio::test]
async fn frames_split_across_chunks_are_joined() {
    let events = decode(&["event: del", "ta\ndata: {\"te", "xt\":\"ab\"}\n", "\n"]).await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].as_ref().unwrap(), &delta("ab"));
}

#[tokio::test]
async fn unknown_events_and_keepalives_are_skipped() {
    let events = decode(&[
        ": keep-alive\n\n",
        "event: usage\ndata: {\"tokens\":3}\n\n",
        "event: delta\ndata: {\"text\":\"x\"}\n\n",
    ])
    .await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].as_ref().unwrap(), &delta("x"));
}

#[tokio::test]
async fn nothing_is_read_after_finish_or_error() {
    let events = decode(&[
        "event: error\ndata: {\"message\":\"boom\"}\n\n",
        "event: delta\ndata: {\"text\":\"late\"}\n\n",
    ])
    .await;
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].as_ref().unwrap(),
        &ChatStreamEvent::Error {
            message: "boom".into()
        }
    );
}

#[tokio::test]
async fn malformed_payload_ends_the_stream_with_an_error() {
    let events = decode(&[
        "event: delta\ndata: not json\n\n",
        "event: delta\ndata: {\"text\":\"x\"}\n\n",
    ])
    .await;
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], Err(WidgetError::Core(_))));
}

#[tokio::test]
async fn trailing_frame_without_blank_line_is_kept() {
    let events = decode(&["event: delta\ndata: {\"text\":\"end\"}"]).await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].as_ref().unwrap(), &delta("end"));
}

/// Provider behind the test server.
struct Echo;

impl ChatProvider for Echo {
    fn stream_chat<'a>(
        &'a self,
        _model: &'a str,
        _system: &'a str,
        messages: &'a [Message],
    ) -> BoxFuture<'a, Result<DeltaStream, ProviderError>> {
        let last = messages.last().map(Message::text).unwrap_or_default();
        let deltas = vec![Ok("Du sagtest: ".to_string()), Ok(last)];
        Box::pin(async move { Ok(Box::pin(stream::iter(deltas)) as DeltaStream) })
    }

    fn generate_text<'a>(
        &'a self,
        _model: &'a str,
        _system: &'a str,
        _messages: &'a [Message],
    ) -> BoxFuture<'a, Result<String, ProviderError>> {
        Box::pin(async { Ok(r#"["Und dann?", "Warum?"]"#.to_string()) })
    }
}

async fn serve(provider: Option<Arc<dyn ChatProvider>>) -> String {
    let app = hindemit_server::app(AppState {
        provider,
        chat_system_prompt: Arc::from("Test"),
        suggestions_file: None,
    });
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

#[tokio::test]
async fn talks_to_a_live_server() {
    let base = serve(Some(Arc::new(Echo) as Arc<dyn ChatProvider>)).await;
    let controller = ChatController::new(HttpBackend::new(base).unwrap());

    controller.load_initial_suggestions().await.unwrap();
    controller.set_input("Hallo Server").await;
    assert!(controller.send().await);
    controller.wait_for_reply().await;

    let session = controller.snapshot().await;
    assert_eq!(session.initial_suggestions().len(), 4);
    assert_eq!(
        session.messages().last().unwrap().text(),
        "Du sagtest: Hallo Server"
    );
}

#[tokio::test]
async fn fetches_suggestions_over_http() {
    let base = serve(Some(Arc::new(Echo) as Arc<dyn ChatProvider>)).await;
    let backend = HttpBackend::new(base).unwrap();

    let request = ConversationRequest {
        messages: vec![Message::user("Hi"), Message::assistant("Hallo!")],
        model: None,
    };
    let suggestions = backend.fetch_suggestions(request).await.unwrap();
    assert_eq!(suggestions, vec!["Und dann?", "Warum?"]);
}

#[tokio::test]
async fn missing_key_yields_no_suggestions_and_a_chat_error() {
    let base = serve(None).await;
    let backend = HttpBackend::new(base).unwrap();

    let request = ConversationRequest {
        messages: vec![Message::user("Hi"), Message::assistant("Hallo!")],
        model: None,
    };
    assert!(backend.fetch_suggestions(request.clone()).await.unwrap().is_empty());

    let err = match backend.stream_chat(request).await {
        Err(e) => e,
        Ok(_) => panic!("chat should be refused without a key"),
    };
    match err {
        WidgetError::Server { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "OPENROUTER_API_KEY is not set");
        }
        other => panic!("unexpected error: {other}"),
    }
}

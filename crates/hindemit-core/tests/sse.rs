use hindemit_core::models::api::ChatStreamEvent;
use hindemit_core::error::CoreError;
use hindemit_core::sse::{MAX_FRAME_BYTES, SseDecoder, SseFrame};

#[test]
fn decodes_event_and_data() {
    let mut decoder = SseDecoder::new();
    decoder.push(b"event: delta\ndata: {\"text\":\"hi\"}\n\n");
    let frame = decoder.next_frame().unwrap().unwrap();
    assert_eq!(frame.event.as_deref(), Some("delta"));
    assert_eq!(frame.data, "{\"text\":\"hi\"}");
    assert!(decoder.next_frame().unwrap().is_none());
}

#[test]
fn data_only_frames_and_comments() {
    let mut decoder = SseDecoder::new();
    decoder.push(b": OPENROUTER PROCESSING\n\ndata: one\n\ndata: [DONE]\n\n");
    assert_eq!(
        decoder.next_frame().unwrap(),
        Some(SseFrame {
            event: None,
            data: "one".into()
        })
    );
    assert_eq!(decoder.next_frame().unwrap().unwrap().data, "[DONE]");
}

#[test]
fn frames_split_across_chunks() {
    let mut decoder = SseDecoder::new();
    decoder.push(b"event: de");
    assert!(decoder.next_frame().unwrap().is_none());
    decoder.push(b"lta\ndata: a");
    assert!(decoder.next_frame().unwrap().is_none());
    decoder.push(b"b\n");
    assert!(decoder.next_frame().unwrap().is_none());
    decoder.push(b"\n");
    let frame = decoder.next_frame().unwrap().unwrap();
    assert_eq!(frame.event.as_deref(), Some("delta"));
    assert_eq!(frame.data, "ab");
}

#[test]
fn multibyte_character_split_across_chunks() {
    let bytes = "data: Grüße\n\n".as_bytes();
    let split = bytes.iter().position(|&b| b == 0xc3).unwrap() + 1;
    let mut decoder = SseDecoder::new();
    decoder.push(&bytes[..split]);
    assert!(decoder.next_frame().unwrap().is_none());
    decoder.push(&bytes[split..]);
    assert_eq!(decoder.next_frame().unwrap().unwrap().data, "Grüße");
}

#[test]
fn crlf_line_endings() {
    let mut decoder = SseDecoder::new();
    decoder.push(b"event: finish\r\ndata: {}\r\n\r\n");
    let frame = decoder.next_frame().unwrap().unwrap();
    assert_eq!(frame.event.as_deref(), Some("finish"));
    assert_eq!(frame.data, "{}");
}

#[test]
fn multiple_data_lines_are_joined() {
    let mut decoder = SseDecoder::new();
    decoder.push(b"data: a\ndata: b\n\n");
    assert_eq!(decoder.next_frame().unwrap().unwrap().data, "a\nb");
}

#[test]
fn finish_flushes_unterminated_frame() {
    let mut decoder = SseDecoder::new();
    decoder.push(b"data: tail");
    assert!(decoder.next_frame().unwrap().is_none());
    assert_eq!(decoder.finish().unwrap().unwrap().data, "tail");
    assert!(decoder.finish().unwrap().is_none());
}

#[test]
fn invalid_utf8_is_an_error() {
    let mut decoder = SseDecoder::new();
    decoder.push(b"data: \xff\n\n");
    assert!(decoder.next_frame().is_err());
}

#[test]
fn chat_stream_events_from_frames() {
    let mut decoder = SseDecoder::new();
    decoder.push(
        b"event: start\ndata: {\"messageId\":\"m1\"}\n\n\
          event: delta\ndata: {\"text\":\"Hallo\"}\n\n\
          event: error\ndata: {\"message\":\"boom\"}\n\n\
          event: finish\ndata: {}\n\n\
          event: mystery\ndata: {}\n\n",
    );

    let mut events = Vec::new();
    while let Some(frame) = decoder.next_frame().unwrap() {
        events.push(ChatStreamEvent::from_frame(&frame).unwrap());
    }

    assert_eq!(
        events,
        vec![
            Some(ChatStreamEvent::Start {
                message_id: "m1".into()
            }),
            Some(ChatStreamEvent::Delta {
                text: "Hallo".into()
            }),
            Some(ChatStreamEvent::Error {
                message: "boom".into()
            }),
            Some(ChatStreamEvent::Finish),
            None,
        ]
    );
}

#[test]
fn chat_stream_event_data_round_trips_through_frame() {
    let event = ChatStreamEvent::Delta {
        text: "zeile\nzwei".into(),
    };
    let frame = SseFrame {
        event: Some(event.event_name().to_string()),
        data: event.data().to_string(),
    };
    assert_eq!(ChatStreamEvent::from_frame(&frame).unwrap(), Some(event));
}

#[test]
fn terminator_split_between_pushes() {
    let mut decoder = SseDecoder::new();
    decoder.push(b"data: a\n");
    assert!(decoder.next_frame().unwrap().is_none());
    decoder.push(b"\n");
    assert_eq!(decoder.next_frame().unwrap().unwrap().data, "a");

    decoder.push(b"data: b");
    assert!(decoder.next_frame().unwrap().is_none());
    decoder.push(b"\n");
    assert!(decoder.next_frame().unwrap().is_none());
    decoder.push(b"\ndata: c\n\n");
    assert_eq!(decoder.next_frame().unwrap().unwrap().data, "b");
    assert_eq!(decoder.next_frame().unwrap().unwrap().data, "c");
}

#[test]
fn oversized_frame_is_an_error_and_is_discarded() {
    let mut decoder = SseDecoder::new();
    let chunk = vec![b'x'; 64 * 1024];
    decoder.push(b"data: ");
    let mut result = Ok(None);
    for _ in 0..=(MAX_FRAME_BYTES / chunk.len()) {
        decoder.push(&chunk);
        result = decoder.next_frame();
        if result.is_err() {
            break;
        }
    }
    assert!(matches!(result, Err(CoreError::FrameTooLarge(MAX_FRAME_BYTES))));

    decoder.push(b"data: next\n\n");
    assert_eq!(decoder.next_frame().unwrap().unwrap().data, "next");
}

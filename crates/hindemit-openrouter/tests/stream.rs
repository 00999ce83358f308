use bytes::Bytes;
use futures::StreamExt;
use futures::stream;

use hindemit_openrouter::error::ProviderError;
use hindemit_openrouter::stream::delta_stream;

fn chunks(parts: &[&str]) -> impl futures::Stream<Item = Result<Bytes, reqwest::Error>> {
    let owned: Vec<Result<Bytes, reqwest::Error>> = parts
        .iter()
        .map(|p| Ok(Bytes::from(p.to_string())))
        .collect();
    stream::iter(owned)
}

async fn collect(parts: &[&str]) -> Vec<Result<String, ProviderError>> {
    delta_stream(chunks(parts)).collect().await
}

#[tokio::test]
async fn yields_content_deltas_until_done() {
    let results = collect(&[
        ": OPENROUTER PROCESSING\n\n",
        "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\",\"content\":\"Hal\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n",
        "data: [DONE]\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"ignored\"}}]}\n\n",
    ])
    .await;

    let texts: Vec<String> = results.into_iter().map(Result::unwrap).collect();
    assert_eq!(texts, vec!["Hal", "lo"]);
}

#[tokio::test]
async fn frames_split_across_network_chunks() {
    let results = collect(&[
        "data: {\"choices\":[{\"del",
        "ta\":{\"content\":\"Grü",
        "ße\"}}]}\n",
        "\ndata: [DONE]\n\n",
    ])
    .await;
    let texts: Vec<String> = results.into_iter().map(Result::unwrap).collect();
    assert_eq!(texts, vec!["Grüße"]);
}

#[tokio::test]
async fn body_ending_without_done_still_flushes() {
    let results = collect(&["data: {\"choices\":[{\"delta\":{\"content\":\"Ende\"}}]}"]).await;
    let texts: Vec<String> = results.into_iter().map(Result::unwrap).collect();
    assert_eq!(texts, vec!["Ende"]);
}

#[tokio::test]
async fn error_object_ends_stream_with_error() {
    let results = collect(&[
        "data: {\"choices\":[{\"delta\":{\"content\":\"A\"}}]}\n\n",
        "data: {\"error\":{\"message\":\"Rate limit exceeded\",\"code\":429}}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"B\"}}]}\n\n",
    ])
    .await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].as_ref().unwrap(), "A");
    match &results[1] {
        Err(ProviderError::Stream(message)) => assert_eq!(message, "Rate limit exceeded"),
        other => panic!("expected stream error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_chunk_is_a_parse_error() {
    let results = collect(&["data: {not json\n\n"]).await;
    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Err(ProviderError::ResponseParse(_))));
}

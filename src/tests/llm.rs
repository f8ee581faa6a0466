use super::{build_provider, LlmConfig, LlmError, LlmProvider, ProviderKind, DEFAULT_REGION};
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn test_provider_kind_parse() {
    assert_eq!("openai".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
    assert_eq!(
        " Anthropic ".parse::<ProviderKind>().unwrap(),
        ProviderKind::Anthropic
    );
    assert_eq!("BEDROCK".parse::<ProviderKind>().unwrap(), ProviderKind::Bedrock);
    assert_eq!(ProviderKind::default(), ProviderKind::Bedrock);
    assert!(matches!(
        "vertex".parse::<ProviderKind>(),
        Err(LlmError::UnknownProvider(name)) if name == "vertex"
    ));
}

#[test]
fn test_openai_from_lookup_defaults() {
    let config =
        LlmConfig::from_lookup(ProviderKind::OpenAi, None, None, env(&[("OPENAI_API_KEY", "sk-1")]))
            .unwrap();
    assert_eq!(config.model, "gpt-4o-mini");
    assert_eq!(config.api_key.as_deref(), Some("sk-1"));
    assert_eq!(config.max_tokens, 800);
}

#[test]
fn test_openai_model_precedence() {
    let lookup = env(&[
        ("OPENAI_API_KEY", "sk-1"),
        ("OPENAI_MODEL", "from-openai-var"),
        ("MD2MAP_AI_MODEL", "from-md2map-var"),
    ]);
    let config = LlmConfig::from_lookup(ProviderKind::OpenAi, None, None, &lookup).unwrap();
    assert_eq!(config.model, "from-md2map-var");

    let config = LlmConfig::from_lookup(ProviderKind::OpenAi, Some("explicit"), None, &lookup).unwrap();
    assert_eq!(config.model, "explicit");

    let lookup = env(&[("OPENAI_API_KEY", "sk-1"), ("OPENAI_MODEL", "from-openai-var")]);
    let config = LlmConfig::from_lookup(ProviderKind::OpenAi, None, None, lookup).unwrap();
    assert_eq!(config.model, "from-openai-var");
}

#[test]
fn test_anthropic_ignores_openai_model_var() {
    let lookup = env(&[("ANTHROPIC_API_KEY", "key"), ("OPENAI_MODEL", "gpt")]);
    let config = LlmConfig::from_lookup(ProviderKind::Anthropic, None, None, lookup).unwrap();
    assert_eq!(config.model, "claude-haiku-4-5-20251001");
}

#[test]
fn test_missing_key_is_an_error() {
    let result = LlmConfig::from_lookup(ProviderKind::Anthropic, None, None, env(&[]));
    match result {
        Err(LlmError::MissingCredential { provider, variable }) => {
            assert_eq!(provider, ProviderKind::Anthropic);
            assert_eq!(variable, "ANTHROPIC_API_KEY");
        }
        other => panic!("expected missing credential, got {other:?}"),
    }

    let blank = LlmConfig::from_lookup(ProviderKind::OpenAi, None, None, env(&[("OPENAI_API_KEY", " ")]));
    assert!(blank.is_err());
}

#[test]
fn test_unreachable_endpoint_is_http_error() {
    let mut config = LlmConfig::new(ProviderKind::OpenAi);
    config.endpoint = Some("http://127.0.0.1:9/v1/chat/completions".to_string());
    config.timeout = Duration::from_secs(2);
    let provider = build_provider(&config).unwrap();

    let result = provider.send_message("system", "user");
    assert!(matches!(result, Err(LlmError::Http(_))), "{result:?}");
}

#[test]
fn test_bedrock_region_and_model_resolution() {
    let config = LlmConfig::from_lookup(ProviderKind::Bedrock, None, None, env(&[])).unwrap();
    assert_eq!(config.region.as_deref(), Some(DEFAULT_REGION));
    assert_eq!(config.model, "global.anthropic.claude-haiku-4-5-20251001-v1:0");
    assert_eq!(config.api_key, None);

    let lookup = env(&[("AWS_REGION", "eu-west-1"), ("MD2MAP_AI_MODEL", "custom")]);
    let config = LlmConfig::from_lookup(ProviderKind::Bedrock, None, None, &lookup).unwrap();
    assert_eq!(config.region.as_deref(), Some("eu-west-1"));
    assert_eq!(config.model, "custom");

    let config =
        LlmConfig::from_lookup(ProviderKind::Bedrock, None, Some("us-east-1"), &lookup).unwrap();
    assert_eq!(config.region.as_deref(), Some("us-east-1"));

    let config = LlmConfig::from_lookup(
        ProviderKind::Anthropic,
        None,
        Some("us-east-1"),
        env(&[("ANTHROPIC_API_KEY", "key")]),
    )
    .unwrap();
    assert_eq!(config.region, None);
}

#[test]
fn test_bedrock_provider_builds_offline() {
    let mut config = LlmConfig::new(ProviderKind::Bedrock);
    config.region = Some("us-east-1".to_string());
    config.endpoint = Some("http://127.0.0.1:9".to_string());
    assert!(build_provider(&config).is_ok());
}

#[test]
fn test_invalid_api_key_is_rejected_up_front() {
    let mut config = LlmConfig::new(ProviderKind::Anthropic);
    config.api_key = Some("bad\nkey".to_string());
    assert!(matches!(
        build_provider(&config),
        Err(LlmError::InvalidCredential {
            provider: ProviderKind::Anthropic,
            variable: "ANTHROPIC_API_KEY",
        })
    ));

    config.provider = ProviderKind::OpenAi;
    assert!(matches!(
        build_provider(&config),
        Err(LlmError::InvalidCredential {
            provider: ProviderKind::OpenAi,
            ..
        })
    ));
}

/// Answers one request with `status` and `body`; the handle yields the
/// request as received.
fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}/v1/endpoint", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);
        let mut request = String::new();
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
            request.push_str(&line);
            if line == "\r\n" || line.is_empty() {
                break;
            }
        }
        let mut payload = vec![0; content_length];
        reader.read_exact(&mut payload).unwrap();
        request.push_str(&String::from_utf8_lossy(&payload));

        let mut stream = reader.into_inner();
        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .unwrap();
        request
    });
    (endpoint, handle)
}

fn provider_at(provider: ProviderKind, endpoint: String) -> Box<dyn LlmProvider> {
    let mut config = LlmConfig::new(provider);
    config.api_key = Some("key-1".to_string());
    config.endpoint = Some(endpoint);
    config.timeout = Duration::from_secs(10);
    build_provider(&config).unwrap()
}

#[test]
fn test_openai_reads_first_choice() {
    let (endpoint, server) = serve_once(
        "200 OK",
        r#"{"choices":[{"message":{"role":"assistant","content":"[1]"}}]}"#,
    );
    let reply = provider_at(ProviderKind::OpenAi, endpoint).send_message("sys", "numbered");
    assert_eq!(reply.unwrap(), "[1]");

    let request = server.join().unwrap();
    assert!(request.starts_with("POST /v1/endpoint "));
    assert!(request.to_ascii_lowercase().contains("authorization: bearer key-1"));
    assert!(request.contains(r#""model":"gpt-4o-mini""#));
    assert!(request.contains(r#"{"role":"system","content":"sys"}"#));
    assert!(request.contains(r#"{"role":"user","content":"numbered"}"#));
}

#[test]
fn test_openai_empty_completion() {
    let (endpoint, server) = serve_once("200 OK", r#"{"choices":[{"message":{"content":""}}]}"#);
    let reply = provider_at(ProviderKind::OpenAi, endpoint).send_message("sys", "user");
    assert!(
        matches!(reply, Err(LlmError::EmptyResponse(ProviderKind::OpenAi))),
        "{reply:?}"
    );
    server.join().unwrap();
}

#[test]
fn test_error_status_keeps_body() {
    let (endpoint, server) = serve_once("500 Internal Server Error", "boom");
    let reply = provider_at(ProviderKind::OpenAi, endpoint).send_message("sys", "user");
    match reply {
        Err(LlmError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected a status error, got {other:?}"),
    }
    server.join().unwrap();
}

#[test]
fn test_anthropic_reads_first_text_block() {
    let (endpoint, server) = serve_once(
        "200 OK",
        r#"{"content":[{"type":"text","text":"[1]"}],"stop_reason":"end_turn"}"#,
    );
    let reply = provider_at(ProviderKind::Anthropic, endpoint).send_message("sys", "numbered");
    assert_eq!(reply.unwrap(), "[1]");

    let request = server.join().unwrap().to_ascii_lowercase();
    assert!(request.contains("x-api-key: key-1"));
    assert!(request.contains("anthropic-version: 2023-06-01"));
    assert!(request.contains(r#""system":"sys""#));
    assert!(request.contains(r#""max_tokens":800"#));
}

#[test]
fn test_anthropic_without_content_is_empty() {
    let (endpoint, server) = serve_once("200 OK", r#"{"content":[]}"#);
    let reply = provider_at(ProviderKind::Anthropic, endpoint).send_message("sys", "user");
    assert!(
        matches!(reply, Err(LlmError::EmptyResponse(ProviderKind::Anthropic))),
        "{reply:?}"
    );
    server.join().unwrap();
}

//! Streaming completion client over `fetch`.

use divot_core::gemini::{self, GenerateRequest, API_KEY_HEADER};
use divot_core::sse::SseDecoder;
use divot_core::{CompletionConfig, CompletionError, CompletionService, FragmentStream};
use futures_util::future;
use futures_util::stream::{self, StreamExt};
use js_sys::{Reflect, Uint8Array};
use std::collections::VecDeque;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

pub struct GeminiClient {
    config: CompletionConfig,
}

impl GeminiClient {
    pub fn new(config: CompletionConfig) -> Self {
        if config.api_key.is_none() {
            log::warn!("[gemini] no API key configured; chat replies will fail");
        }
        Self { config }
    }
}

impl CompletionService for GeminiClient {
    fn open_stream(&self, context: &str, message: &str) -> FragmentStream {
        let Some(api_key) = self.config.api_key.clone() else {
            return stream::once(future::ready(Err(CompletionError::MissingApiKey))).boxed_local();
        };
        let url = gemini::stream_url(&self.config.endpoint, &self.config.model);
        let body = GenerateRequest::single_turn(context, message).to_json();
        stream::unfold(State::Start { url, body, api_key }, step).boxed_local()
    }
}

enum State {
    Start {
        url: String,
        body: String,
        api_key: String,
    },
    Reading {
        reader: web::ReadableStreamDefaultReader,
        decoder: SseDecoder,
        // complete SSE `data` payloads not yet parsed
        queue: VecDeque<String>,
        done: bool,
    },
    Finished,
}

async fn step(mut state: State) -> Option<(Result<String, CompletionError>, State)> {
    loop {
        state = match state {
            State::Finished => return None,
            State::Start { url, body, api_key } => match open(&url, &body, &api_key).await {
                Ok(reader) => State::Reading {
                    reader,
                    decoder: SseDecoder::new(),
                    queue: VecDeque::new(),
                    done: false,
                },
                Err(e) => return Some((Err(e), State::Finished)),
            },
            State::Reading {
                reader,
                mut decoder,
                mut queue,
                done,
            } => {
                if let Some(data) = queue.pop_front() {
                    match gemini::parse_chunk(&data) {
                        Ok(Some(text)) => {
                            let next = State::Reading {
                                reader,
                                decoder,
                                queue,
                                done,
                            };
                            return Some((Ok(text), next));
                        }
                        Ok(None) => State::Reading {
                            reader,
                            decoder,
                            queue,
                            done,
                        },
                        Err(e) => {
                            _ = reader.cancel();
                            return Some((Err(e), State::Finished));
                        }
                    }
                } else if done {
                    State::Finished
                } else {
                    match read_chunk(&reader).await {
                        Ok(Some(bytes)) => {
                            queue.extend(decoder.push(&bytes));
                            State::Reading {
                                reader,
                                decoder,
                                queue,
                                done: false,
                            }
                        }
                        Ok(None) => {
                            queue.extend(decoder.finish());
                            State::Reading {
                                reader,
                                decoder,
                                queue,
                                done: true,
                            }
                        }
                        Err(e) => return Some((Err(e), State::Finished)),
                    }
                }
            }
        }
    }
}

fn js_error(e: JsValue) -> CompletionError {
    CompletionError::Network(format!("{:?}", e))
}

async fn open(
    url: &str,
    body: &str,
    api_key: &str,
) -> Result<web::ReadableStreamDefaultReader, CompletionError> {
    let window = web::window().ok_or_else(|| CompletionError::Network("no window".into()))?;
    let headers = web::Headers::new().map_err(js_error)?;
    headers
        .set("Content-Type", "application/json")
        .map_err(js_error)?;
    headers.set(API_KEY_HEADER, api_key).map_err(js_error)?;

    let init = web::RequestInit::new();
    init.set_method("POST");
    init.set_mode(web::RequestMode::Cors);
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(body));
    let request = web::Request::new_with_str_and_init(url, &init).map_err(js_error)?;

    let response: web::Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;
    if !response.ok() {
        let text = match response.text() {
            Ok(p) => JsFuture::from(p)
                .await
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_default(),
            Err(_) => String::new(),
        };
        return Err(gemini::error_message(response.status(), &text));
    }
    log::debug!("[gemini] stream open ({})", response.status());
    let stream = response
        .body()
        .ok_or_else(|| CompletionError::Network("response has no body".into()))?;
    Ok(stream.get_reader().unchecked_into())
}

/// Next byte chunk, or `None` once the body is exhausted.
async fn read_chunk(
    reader: &web::ReadableStreamDefaultReader,
) -> Result<Option<Vec<u8>>, CompletionError> {
    let result = JsFuture::from(reader.read()).await.map_err(js_error)?;
    let done = Reflect::get(&result, &JsValue::from_str("done"))
        .map_err(js_error)?
        .as_bool()
        .unwrap_or(true);
    if done {
        return Ok(None);
    }
    let value = Reflect::get(&result, &JsValue::from_str("value")).map_err(js_error)?;
    Ok(Some(Uint8Array::new(&value).to_vec()))
}

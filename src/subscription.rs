/// Account change subscriptions over the JSON-RPC websocket
///
/// `AccountSubscription` is a cancellable stream of account updates: a reader
/// task forwards every `accountNotification` through a channel, and
/// `unsubscribe()` sends `accountUnsubscribe` before closing the socket.
use crate::errors::{PrimerError, PrimerResult};
use crate::logger::{self, LogTag};
use base64::{engine::general_purpose, Engine as _};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

const SUBSCRIBE_REQUEST_ID: u64 = 1;
const UNSUBSCRIBE_REQUEST_ID: u64 = 2;

/// JSON-RPC request sent over the socket
#[derive(Serialize, Debug)]
struct WsRequest {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: Vec<serde_json::Value>,
}

#[derive(Deserialize, Debug)]
struct WsMessage {
    id: Option<u64>,
    method: Option<String>,
    result: Option<serde_json::Value>,
    error: Option<WsError>,
    params: Option<serde_json::Value>,
}

#[derive(Deserialize, Debug)]
struct WsError {
    code: i64,
    message: String,
}

#[derive(Deserialize, Debug)]
struct NotificationParams {
    result: NotificationResult,
    subscription: u64,
}

#[derive(Deserialize, Debug)]
struct NotificationResult {
    context: NotificationContext,
    value: Option<NotificationAccount>,
}

#[derive(Deserialize, Debug)]
struct NotificationContext {
    slot: u64,
}

#[derive(Deserialize, Debug)]
struct NotificationAccount {
    /// `[payload, encoding]`
    data: (String, String),
}

/// New account state pushed by the node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountUpdate {
    pub slot: u64,
    pub data: Vec<u8>,
}

/// A decoded websocket frame
#[derive(Debug, Clone, PartialEq)]
pub enum WsEvent {
    /// Reply to a request: subscription id for subscribe, bool for unsubscribe
    Response { id: u64, result: serde_json::Value },
    /// Error reply to a request
    Error { id: Option<u64>, message: String },
    Update { subscription: u64, update: AccountUpdate },
    /// Frames this client does not act on
    Ignored,
}

pub fn build_subscribe_request(id: u64, account: &Pubkey, commitment: &str) -> String {
    let request = WsRequest {
        jsonrpc: "2.0",
        id,
        method: "accountSubscribe",
        params: vec![
            serde_json::json!(account.to_string()),
            serde_json::json!({
                "encoding": "base64",
                "commitment": commitment,
            }),
        ],
    };
    serde_json::json!(request).to_string()
}

pub fn build_unsubscribe_request(id: u64, subscription: u64) -> String {
    let request = WsRequest {
        jsonrpc: "2.0",
        id,
        method: "accountUnsubscribe",
        params: vec![serde_json::json!(subscription)],
    };
    serde_json::json!(request).to_string()
}

/// Decode one text frame
pub fn parse_message(text: &str) -> PrimerResult<WsEvent> {
    let message: WsMessage = serde_json::from_str(text)?;

    if let Some(error) = message.error {
        return Ok(WsEvent::Error {
            id: message.id,
            message: format!("{} (code {})", error.message, error.code),
        });
    }

    if message.method.as_deref() == Some("accountNotification") {
        let params: NotificationParams = message
            .params
            .ok_or_else(|| PrimerError::Subscription("Notification without params".to_string()))
            .and_then(|value| serde_json::from_value(value).map_err(PrimerError::from))?;
        let account = params
            .result
            .value
            .ok_or_else(|| PrimerError::Subscription("Notification without account value".to_string()))?;

        let (payload, encoding) = account.data;
        if encoding != "base64" {
            return Err(PrimerError::Subscription(format!(
                "Unexpected account encoding '{}'",
                encoding
            )));
        }
        let data = general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| PrimerError::Subscription(format!("Invalid base64 account data: {}", e)))?;

        return Ok(WsEvent::Update {
            subscription: params.subscription,
            update: AccountUpdate {
                slot: params.result.context.slot,
                data,
            },
        });
    }

    match (message.id, message.result) {
        (Some(id), Some(result)) => Ok(WsEvent::Response { id, result }),
        _ => Ok(WsEvent::Ignored),
    }
}

/// Parse a websocket endpoint, accepting only `ws` and `wss`
pub fn parse_ws_url(ws_url: &str) -> PrimerResult<Url> {
    let url = Url::parse(ws_url)
        .map_err(|e| PrimerError::Subscription(format!("Invalid websocket URL '{}': {}", ws_url, e)))?;

    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(PrimerError::Subscription(format!(
            "Unsupported websocket scheme '{}' in '{}'",
            other, ws_url
        ))),
    }
}

pub struct AccountSubscription {
    account: Pubkey,
    subscription_id: u64,
    updates: mpsc::UnboundedReceiver<PrimerResult<AccountUpdate>>,
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl AccountSubscription {
    /// Connect, subscribe to `account` and wait for the node's confirmation
    pub async fn subscribe(ws_url: &str, account: &Pubkey, commitment: &str) -> PrimerResult<Self> {
        let url = parse_ws_url(ws_url)?;
        logger::debug(LogTag::Subscription, &format!("Connecting to {}", url));

        let (ws_stream, _) = connect_async(url.as_str())
            .await
            .map_err(|e| PrimerError::Subscription(format!("Failed to connect to {}: {}", ws_url, e)))?;
        let (mut ws_sender, mut ws_receiver) = ws_stream.split();

        ws_sender
            .send(Message::Text(build_subscribe_request(SUBSCRIBE_REQUEST_ID, account, commitment)))
            .await
            .map_err(|e| PrimerError::Subscription(format!("Failed to send subscription: {}", e)))?;

        let subscription_id = loop {
            let frame = ws_receiver
                .next()
                .await
                .ok_or_else(|| PrimerError::Subscription("Socket closed before confirmation".to_string()))?
                .map_err(|e| PrimerError::Subscription(format!("Websocket error: {}", e)))?;

            let Message::Text(text) = frame else { continue };
            match parse_message(&text)? {
                WsEvent::Response { id, result } if id == SUBSCRIBE_REQUEST_ID => {
                    break result.as_u64().ok_or_else(|| {
                        PrimerError::Subscription(format!("Unexpected subscription id {}", result))
                    })?;
                }
                WsEvent::Error { message, .. } => {
                    return Err(PrimerError::Subscription(format!("Subscription rejected: {}", message)));
                }
                _ => continue,
            }
        };

        logger::info(
            LogTag::Subscription,
            &format!("Subscribed to {} (subscription {})", account, subscription_id),
        );

        let (update_tx, updates) = mpsc::unbounded_channel();
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut stop_rx => {
                        let request = build_unsubscribe_request(UNSUBSCRIBE_REQUEST_ID, subscription_id);
                        if let Err(e) = ws_sender.send(Message::Text(request)).await {
                            logger::warning(LogTag::Subscription, &format!("Failed to send unsubscribe: {}", e));
                        }
                        let _ = ws_sender.close().await;
                        logger::debug(LogTag::Subscription, &format!("Subscription {} closed", subscription_id));
                        break;
                    }
                    frame = ws_receiver.next() => {
                        let text = match frame {
                            Some(Ok(Message::Text(text))) => text,
                            Some(Ok(Message::Close(_))) | None => {
                                let _ = update_tx.send(Err(PrimerError::Subscription(
                                    "Connection closed by server".to_string(),
                                )));
                                break;
                            }
                            Some(Ok(_)) => continue,
                            Some(Err(e)) => {
                                let _ = update_tx.send(Err(PrimerError::Subscription(format!(
                                    "Websocket error: {}",
                                    e
                                ))));
                                break;
                            }
                        };

                        match parse_message(&text) {
                            Ok(WsEvent::Update { subscription, update }) if subscription == subscription_id => {
                                if update_tx.send(Ok(update)).is_err() {
                                    break;
                                }
                            }
                            Ok(WsEvent::Error { message, .. }) => {
                                logger::warning(LogTag::Subscription, &format!("Node error: {}", message));
                            }
                            Ok(_) => {
                                logger::verbose(LogTag::Subscription, &format!("Ignored frame: {}", text));
                            }
                            Err(e) => {
                                if update_tx.send(Err(e)).is_err() {
                                    break;
                                }
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            account: *account,
            subscription_id,
            updates,
            stop: Some(stop_tx),
            task: Some(task),
        })
    }

    pub fn account(&self) -> &Pubkey {
        &self.account
    }

    pub fn subscription_id(&self) -> u64 {
        self.subscription_id
    }

    /// Next update; `None` once the stream has ended
    pub async fn next(&mut self) -> Option<PrimerResult<AccountUpdate>> {
        self.updates.recv().await
    }

    /// Send `accountUnsubscribe` and close the socket
    pub async fn unsubscribe(mut self) -> PrimerResult<()> {
        if let Some(stop) = self.stop.take() {
            // The reader may already be gone after a server close.
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            task.await
                .map_err(|e| PrimerError::Subscription(format!("Reader task failed: {}", e)))?;
        }
        logger::info(LogTag::Subscription, &format!("Unsubscribed from {}", self.account));
        Ok(())
    }
}

impl Drop for AccountSubscription {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_request_shape() {
        let account = Pubkey::new_unique();
        let request: serde_json::Value =
            serde_json::from_str(&build_subscribe_request(7, &account, "confirmed")).unwrap();

        assert_eq!(request["jsonrpc"], "2.0");
        assert_eq!(request["id"], 7);
        assert_eq!(request["method"], "accountSubscribe");
        assert_eq!(request["params"][0], account.to_string());
        assert_eq!(request["params"][1]["encoding"], "base64");
        assert_eq!(request["params"][1]["commitment"], "confirmed");
    }

    #[test]
    fn test_unsubscribe_request_shape() {
        let request: serde_json::Value =
            serde_json::from_str(&build_unsubscribe_request(2, 4242)).unwrap();
        assert_eq!(request["method"], "accountUnsubscribe");
        assert_eq!(request["params"][0], 4242);
    }

    #[test]
    fn test_parse_subscription_confirmation() {
        let event = parse_message(r#"{"jsonrpc":"2.0","result":23784,"id":1}"#).unwrap();
        assert_eq!(
            event,
            WsEvent::Response {
                id: 1,
                result: serde_json::json!(23784)
            }
        );
    }

    #[test]
    fn test_parse_account_notification() {
        let payload = general_purpose::STANDARD.encode([1u8, 2, 3, 4]);
        let text = format!(
            r#"{{"jsonrpc":"2.0","method":"accountNotification","params":{{"result":{{"context":{{"slot":5199307}},"value":{{"data":["{}","base64"],"executable":false,"lamports":33594,"owner":"11111111111111111111111111111111","rentEpoch":635,"space":4}}}},"subscription":23784}}}}"#,
            payload
        );

        match parse_message(&text).unwrap() {
            WsEvent::Update { subscription, update } => {
                assert_eq!(subscription, 23784);
                assert_eq!(update.slot, 5199307);
                assert_eq!(update.data, vec![1, 2, 3, 4]);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_reply() {
        let event = parse_message(
            r#"{"jsonrpc":"2.0","error":{"code":-32602,"message":"Invalid param"},"id":1}"#,
        )
        .unwrap();
        assert!(matches!(event, WsEvent::Error { id: Some(1), .. }));
    }

    #[test]
    fn test_parse_rejects_bad_base64() {
        let text = r#"{"jsonrpc":"2.0","method":"accountNotification","params":{"result":{"context":{"slot":1},"value":{"data":["***","base64"]}},"subscription":1}}"#;
        assert!(matches!(parse_message(text), Err(PrimerError::Subscription(_))));
    }

    #[test]
    fn test_parse_ignores_unknown_frames() {
        let event = parse_message(r#"{"jsonrpc":"2.0","method":"slotNotification","params":{"result":{"context":{"slot":1},"value":null},"subscription":1}}"#).unwrap();
        assert_eq!(event, WsEvent::Ignored);
    }

    #[test]
    fn test_ws_url_schemes() {
        assert!(parse_ws_url("wss://api.mainnet-beta.solana.com").is_ok());
        assert!(parse_ws_url("ws://127.0.0.1:8900").is_ok());
        assert!(parse_ws_url("https://api.mainnet-beta.solana.com").is_err());
        assert!(parse_ws_url("not a url").is_err());
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(parse_message("not json").is_err());
    }

    #[tokio::test]
    async fn test_subscribe_rejects_http_endpoint() {
        let result = AccountSubscription::subscribe("https://api.mainnet-beta.solana.com", &Pubkey::new_unique(), "confirmed").await;
        assert!(matches!(result, Err(PrimerError::Subscription(_))));
    }

    #[tokio::test]
    async fn test_stream_and_unsubscribe_against_local_node() {
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let payload = general_purpose::STANDARD.encode([7u8; 4]);

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

            let request = ws.next().await.unwrap().unwrap();
            let request: serde_json::Value = serde_json::from_str(request.to_text().unwrap()).unwrap();
            assert_eq!(request["method"], "accountSubscribe");

            ws.send(Message::Text(r#"{"jsonrpc":"2.0","result":77,"id":1}"#.to_string()))
                .await
                .unwrap();
            let notification = format!(
                r#"{{"jsonrpc":"2.0","method":"accountNotification","params":{{"result":{{"context":{{"slot":9}},"value":{{"data":["{}","base64"]}}}},"subscription":77}}}}"#,
                payload
            );
            ws.send(Message::Text(notification)).await.unwrap();

            loop {
                match ws.next().await {
                    Some(Ok(Message::Text(text))) => {
                        return serde_json::from_str::<serde_json::Value>(&text).unwrap();
                    }
                    Some(Ok(_)) => continue,
                    _ => panic!("connection ended before unsubscribe"),
                }
            }
        });

        let account = Pubkey::new_unique();
        let mut subscription = AccountSubscription::subscribe(&format!("ws://{}", addr), &account, "confirmed")
            .await
            .unwrap();
        assert_eq!(subscription.subscription_id(), 77);
        assert_eq!(subscription.account(), &account);

        let update = subscription.next().await.unwrap().unwrap();
        assert_eq!(update, AccountUpdate { slot: 9, data: vec![7u8; 4] });

        subscription.unsubscribe().await.unwrap();

        let unsubscribe = server.await.unwrap();
        assert_eq!(unsubscribe["method"], "accountUnsubscribe");
        assert_eq!(unsubscribe["params"][0], 77);
    }
}

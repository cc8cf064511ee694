//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use alloy::primitives::{keccak256, U256};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// Anvil's first account.
pub const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_SENDER: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
/// Anvil's second account.
pub const TEST_RECEIVER: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

/// One JSON-RPC request seen by the mock node.
#[derive(Debug, Clone)]
pub struct RpcCall {
    pub method: String,
    pub params: Value,
}

/// How the mock node answers.
#[derive(Debug, Clone)]
pub struct NodeBehavior {
    pub chain_id: u64,
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_estimate: u64,
    pub estimate_error: Option<String>,
    pub send_error: Option<String>,
    /// Raw `eth_call` return data.
    pub call_output: Vec<u8>,
    /// Answer to `eth_getTransactionReceipt`; `None` means still pending.
    pub receipt: Option<Value>,
}

impl Default for NodeBehavior {
    fn default() -> Self {
        Self {
            chain_id: 42,
            nonce: 5,
            gas_price: 1_000_000_000,
            gas_estimate: 200_000,
            estimate_error: None,
            send_error: None,
            call_output: Vec::new(),
            receipt: None,
        }
    }
}

/// Handle to a running mock node.
pub struct MockNode {
    pub addr: SocketAddr,
    calls: Arc<Mutex<Vec<RpcCall>>>,
}

impl MockNode {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Calls of one method, in arrival order.
    pub fn calls(&self, method: &str) -> Vec<RpcCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.method == method)
            .cloned()
            .collect()
    }
}

/// Start a JSON-RPC node on an ephemeral port.
pub async fn start_mock_node(behavior: NodeBehavior) -> MockNode {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let behavior = Arc::new(behavior);

    let recorded = calls.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let calls = recorded.clone();
                    let behavior = behavior.clone();
                    tokio::spawn(async move {
                        let _ = serve_connection(socket, calls, behavior).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockNode { addr, calls }
}

/// Serve keep-alive HTTP/1.1 requests until the client hangs up.
async fn serve_connection(
    socket: TcpStream,
    calls: Arc<Mutex<Vec<RpcCall>>>,
    behavior: Arc<NodeBehavior>,
) -> std::io::Result<()> {
    let (read_half, mut write_half) = socket.into_split();
    let mut reader = BufReader::new(read_half);

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(());
        }

        let mut content_length = 0usize;
        loop {
            line.clear();
            if reader.read_line(&mut line).await? == 0 {
                return Ok(());
            }
            let header = line.trim_end();
            if header.is_empty() {
                break;
            }
            if let Some((name, value)) = header.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
        }

        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).await?;

        let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        let response = match request {
            Value::Array(batch) => Value::Array(
                batch.iter().map(|r| respond(r, &calls, &behavior)).collect(),
            ),
            single => respond(&single, &calls, &behavior),
        };

        let payload = response.to_string();
        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n",
            payload.len()
        );
        write_half.write_all(head.as_bytes()).await?;
        write_half.write_all(payload.as_bytes()).await?;
        write_half.flush().await?;
    }
}

fn respond(request: &Value, calls: &Mutex<Vec<RpcCall>>, behavior: &NodeBehavior) -> Value {
    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let method = request["method"].as_str().unwrap_or_default().to_string();
    let params = request.get("params").cloned().unwrap_or(Value::Null);

    calls.lock().unwrap().push(RpcCall {
        method: method.clone(),
        params: params.clone(),
    });

    let outcome: Result<Value, String> = match method.as_str() {
        "eth_chainId" => Ok(json!(format!("{:#x}", behavior.chain_id))),
        "eth_getTransactionCount" => Ok(json!(format!("{:#x}", behavior.nonce))),
        "eth_gasPrice" => Ok(json!(format!("{:#x}", behavior.gas_price))),
        "eth_blockNumber" => Ok(json!("0x10")),
        "eth_estimateGas" => match &behavior.estimate_error {
            Some(message) => Err(message.clone()),
            None => Ok(json!(format!("{:#x}", behavior.gas_estimate))),
        },
        "eth_call" => Ok(json!(alloy::hex::encode_prefixed(&behavior.call_output))),
        "eth_sendRawTransaction" => match &behavior.send_error {
            Some(message) => Err(message.clone()),
            None => {
                let raw = params[0].as_str().unwrap_or_default();
                let bytes = alloy::hex::decode(raw).unwrap_or_default();
                Ok(json!(alloy::hex::encode_prefixed(keccak256(&bytes))))
            }
        },
        "eth_getTransactionReceipt" => Ok(behavior.receipt.clone().unwrap_or(Value::Null)),
        _ => Ok(Value::Null),
    };

    match outcome {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err(message) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": -32000, "message": message }
        }),
    }
}

/// ABI-encode `getFlow` return values (all non-negative).
pub fn encode_flow(timestamp: u64, flow_rate: u128, deposit: u128, owed_deposit: u128) -> Vec<u8> {
    let mut out = Vec::with_capacity(128);
    for word in [
        U256::from(timestamp),
        U256::from(flow_rate),
        U256::from(deposit),
        U256::from(owed_deposit),
    ] {
        out.extend_from_slice(&word.to_be_bytes::<32>());
    }
    out
}

/// Legacy receipt mined in `block_number` from the test sender.
pub fn mined_receipt(succeeded: bool, block_number: u64) -> Value {
    json!({
        "type": "0x0",
        "status": if succeeded { "0x1" } else { "0x0" },
        "cumulativeGasUsed": "0x30d40",
        "logs": [],
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "transactionHash": format!("0x{}", "ab".repeat(32)),
        "transactionIndex": "0x0",
        "blockHash": format!("0x{}", "cd".repeat(32)),
        "blockNumber": format!("{:#x}", block_number),
        "gasUsed": "0x30d40",
        "effectiveGasPrice": "0x3b9aca00",
        "from": TEST_SENDER,
        "to": "0xf0d7d1d47109ba426b9d8a3cde1941327af1eea3",
        "contractAddress": null
    })
}

//! JavaScript bindings for documents, clients and the server
//!
//! Operation sequences cross the boundary as JSON arrays in the wire format
//! of [`OperationSequence`]: `[3, -2, "text"]`.

use crate::document::Document;
use crate::error::OtError;
use crate::ops::OperationSequence;
use crate::sync::{Client, ClientState, Server};
use crate::Revision;
use wasm_bindgen::prelude::*;

fn parse_ops(json: &str) -> Result<OperationSequence, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid operations: {}", e)))
}

fn ops_to_json(ops: &OperationSequence) -> Result<String, JsValue> {
    serde_json::to_string(ops)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization failed: {}", e)))
}

fn to_js_error(err: OtError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// JavaScript-friendly wrapper for Document
#[wasm_bindgen]
pub struct WasmDocument {
    inner: Document,
}

#[wasm_bindgen]
impl WasmDocument {
    /// Create a document holding `text`
    #[wasm_bindgen(constructor)]
    pub fn new(text: &str) -> Self {
        Self {
            inner: Document::from(text),
        }
    }

    /// Apply operations given as a JSON array
    #[wasm_bindgen(js_name = apply)]
    pub fn apply(&mut self, ops_json: &str) -> Result<(), JsValue> {
        let ops = parse_ops(ops_json)?;
        self.inner.apply(&ops).map_err(to_js_error)
    }

    /// Number of units, counting newlines
    #[wasm_bindgen(js_name = size)]
    pub fn size(&self) -> usize {
        self.inner.size()
    }

    /// Number of lines
    #[wasm_bindgen(js_name = lineCount)]
    pub fn line_count(&self) -> usize {
        self.inner.line_count()
    }

    /// Text between two indices
    #[wasm_bindgen(js_name = extract)]
    pub fn extract(&self, from: usize, to: usize) -> Result<String, JsValue> {
        self.inner
            .extract(from, to)
            .map(|doc| doc.to_string())
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = toString)]
    pub fn to_js_string(&self) -> String {
        self.inner.to_string()
    }
}

type SendFn = Box<dyn FnMut(Revision, &OperationSequence)>;

/// JavaScript-friendly wrapper for Client
///
/// `send` is called as `send(revision, opsJson)` whenever a revision is
/// ready for the server.
#[wasm_bindgen]
pub struct WasmClient {
    inner: Client<SendFn>,
}

#[wasm_bindgen]
impl WasmClient {
    #[wasm_bindgen(constructor)]
    pub fn new(text: &str, revision: usize, send: js_sys::Function) -> Self {
        let send: SendFn = Box::new(move |rev: Revision, ops: &OperationSequence| {
            let result = ops_to_json(ops).and_then(|json| {
                send.call2(&JsValue::NULL, &JsValue::from(rev as f64), &JsValue::from_str(&json))
            });
            if let Err(e) = result {
                log::warn!("Send callback failed for revision {}: {:?}", rev, e);
            }
        });

        Self {
            inner: Client::with_revision(Document::from(text), revision, send),
        }
    }

    /// Apply a local edit
    #[wasm_bindgen(js_name = apply)]
    pub fn apply(&mut self, ops_json: &str) -> Result<(), JsValue> {
        let ops = parse_ops(ops_json)?;
        self.inner.apply(ops).map_err(to_js_error)
    }

    /// Acknowledge the outstanding revision
    #[wasm_bindgen(js_name = ack)]
    pub fn ack(&mut self) -> Result<(), JsValue> {
        self.inner.ack().map_err(to_js_error)
    }

    /// Integrate a remote revision, returning the applied operations as JSON
    #[wasm_bindgen(js_name = recv)]
    pub fn recv(&mut self, ops_json: &str) -> Result<String, JsValue> {
        let ops = parse_ops(ops_json)?;
        let applied = self.inner.recv(ops).map_err(to_js_error)?;
        ops_to_json(&applied)
    }

    #[wasm_bindgen(js_name = revision)]
    pub fn revision(&self) -> usize {
        self.inner.revision()
    }

    /// "synced", "awaiting" or "buffering"
    #[wasm_bindgen(js_name = state)]
    pub fn state(&self) -> String {
        match self.inner.state() {
            ClientState::Synced => "synced",
            ClientState::Awaiting => "awaiting",
            ClientState::Buffering => "buffering",
        }
        .to_string()
    }

    #[wasm_bindgen(js_name = toString)]
    pub fn to_js_string(&self) -> String {
        self.inner.document().to_string()
    }
}

/// JavaScript-friendly wrapper for Server
#[wasm_bindgen]
pub struct WasmServer {
    inner: Server,
}

#[wasm_bindgen]
impl WasmServer {
    #[wasm_bindgen(constructor)]
    pub fn new(text: &str) -> Self {
        Self {
            inner: Server::new(Document::from(text)),
        }
    }

    /// Accept operations based on `revision`
    ///
    /// Returns `{"ops": [...], "revision": n}` as a JSON string.
    #[wasm_bindgen(js_name = receive)]
    pub fn receive(&mut self, revision: usize, ops_json: &str) -> Result<String, JsValue> {
        let ops = parse_ops(ops_json)?;
        let (ops, revision) = self.inner.receive(revision, ops).map_err(to_js_error)?;
        serde_json::to_string(&serde_json::json!({ "ops": ops, "revision": revision }))
            .map_err(|e| JsValue::from_str(&format!("JSON serialization failed: {}", e)))
    }

    #[wasm_bindgen(js_name = revision)]
    pub fn revision(&self) -> usize {
        self.inner.revision()
    }

    /// Revisions accepted after `base` as a JSON array of operation arrays
    #[wasm_bindgen(js_name = historySince)]
    pub fn history_since(&self, base: usize) -> Result<String, JsValue> {
        let history = self.inner.history_since(base).map_err(to_js_error)?;
        serde_json::to_string(history)
            .map_err(|e| JsValue::from_str(&format!("JSON serialization failed: {}", e)))
    }

    #[wasm_bindgen(js_name = toString)]
    pub fn to_js_string(&self) -> String {
        self.inner.document().to_string()
    }
}

use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// What a listener does when its dispatch queue is full.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum OverflowPolicy {
    /// Log and drop the event. The SDK thread never waits.
    DropNewest,
    /// Make the SDK thread wait for room in the queue.
    /// A task must not dispatch to its own listener under this policy: with the queue full it
    /// would wait on itself.
    Block,
}

/// How long a dispatch worker stays attached to the managed runtime.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AttachPolicy {
    /// Attach before each drained batch of events and detach right after it.
    PerBatch,
    /// Attach once when the worker starts and detach when it exits.
    PerWorker,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DispatchConfig {
    pub queue_capacity: usize,
    pub overflow: OverflowPolicy,
    pub attach: AttachPolicy,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            overflow: OverflowPolicy::DropNewest,
            attach: AttachPolicy::PerBatch,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPolicy {
    #[serde(rename = "ENABLE")]
    Enable,
    #[serde(rename = "DISABLE")]
    Disable,
    #[serde(rename = "TURN_ONLY")]
    TurnOnly,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ApiEndpoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct IceParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RtcConfig {
    /// milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<TurnPolicy>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SfuOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// Options the managed side passes when setting up the SDK context.
/// Absent fields leave the SDK defaults in place.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextOptions {
    pub rtc_api: ApiEndpoint,
    pub ice_params: IceParams,
    pub signaling: ApiEndpoint,
    pub rtc_config: RtcConfig,
    pub sfu: SfuOptions,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeConfig {
    pub dispatch: DispatchConfig,
    /// Context options sit at the top level of the JSON, next to `dispatch`.
    #[serde(flatten)]
    pub options: ContextOptions,
}

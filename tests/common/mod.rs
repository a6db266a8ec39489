#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use skyway_event_bridge::error;
use skyway_event_bridge::prelude::managed::{CallKind, ManagedObject, ManagedValue};
use skyway_event_bridge::prelude::native::*;

// timing assertions get flaky when many worker-heavy tests share the machine
pub static SERIAL: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub kind: CallKind,
    pub method: String,
    pub args: Vec<ManagedValue>,
}

/// Managed object stand-in that records calls, optionally taking its time over each one.
#[derive(Default)]
pub struct ManagedPeer {
    pub calls: Mutex<Vec<Call>>,
    pub delay: Option<Duration>,
    pub invalid: bool,
}

impl ManagedPeer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(ManagedPeer {
            delay: Some(delay),
            ..Self::default()
        })
    }

    pub fn null() -> Arc<Self> {
        Arc::new(ManagedPeer {
            invalid: true,
            ..Self::default()
        })
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.method.clone()).collect()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }
}

impl ManagedObject for ManagedPeer {
    fn is_valid(&self) -> bool {
        !self.invalid
    }

    fn call_method(
        &self,
        kind: CallKind,
        method: &str,
        _signature: &str,
        args: &[ManagedValue],
    ) -> Result<(), error::Error> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.calls.lock().push(Call {
            kind,
            method: method.to_string(),
            args: args.to_vec(),
        });
        Ok(())
    }
}

pub struct FakeMember {
    pub id: String,
    pub name: Option<String>,
}

impl FakeMember {
    pub fn new(id: &str, name: Option<&str>) -> Arc<dyn Member> {
        Arc::new(FakeMember {
            id: id.to_string(),
            name: name.map(str::to_string),
        })
    }
}

impl Member for FakeMember {
    fn id(&self) -> String {
        self.id.clone()
    }
    fn name(&self) -> Option<String> {
        self.name.clone()
    }
    fn subtype(&self) -> String {
        "person".into()
    }
    fn member_type(&self) -> MemberType {
        MemberType::Person
    }
    fn side(&self) -> MemberSide {
        MemberSide::Remote
    }
}

pub struct FakePublication(pub String);

impl Publication for FakePublication {
    fn id(&self) -> String {
        self.0.clone()
    }
    fn publisher_id(&self) -> Option<String> {
        Some("m1".into())
    }
    fn content_type(&self) -> ContentType {
        ContentType::Video
    }
    fn origin_id(&self) -> Option<String> {
        None
    }
    fn codec_capabilities(&self) -> Vec<Codec> {
        vec![Codec {
            mime_type: "video/h264".into(),
            parameters: None,
        }]
    }
    fn encodings(&self) -> Vec<Encoding> {
        vec![]
    }
}

pub struct FakeChannel;

impl Channel for FakeChannel {
    fn id(&self) -> String {
        "c1".into()
    }
    fn name(&self) -> Option<String> {
        Some("room".into())
    }
}

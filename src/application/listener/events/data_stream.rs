use crate::application::listener::dispatching::{DispatchingListener, ListenerKind, ManagedEvent};
use crate::domain::managed::value_object::{CallKind, ManagedCall};
use crate::domain::native::listener::RemoteDataStreamListener;
use crate::error;

#[derive(Debug, Clone, PartialEq)]
pub enum DataStreamEvent {
    Data(String),
    DataBuffer(Vec<u8>),
}

impl ManagedEvent for DataStreamEvent {
    const KIND: ListenerKind = ListenerKind::DataStream;

    fn into_call(self) -> Result<ManagedCall, error::Error> {
        let call = match self {
            DataStreamEvent::Data(data) => {
                ManagedCall::new("onData", CallKind::Instance, vec![data.into()])
            }
            // the managed method really is capitalized
            DataStreamEvent::DataBuffer(data) => {
                ManagedCall::new("OnDataBuffer", CallKind::Instance, vec![data.into()])
            }
        };
        Ok(call)
    }
}

pub type DataStreamListener = DispatchingListener<DataStreamEvent>;

impl RemoteDataStreamListener for DataStreamListener {
    fn on_data(&self, data: &str) {
        self.notify(DataStreamEvent::Data(data.to_string()));
    }

    fn on_data_buffer(&self, data: &[u8]) {
        self.notify(DataStreamEvent::DataBuffer(data.to_vec()));
    }
}

use std::fmt;

/// Argument marshaled into the managed runtime's representation.
#[derive(Debug, Clone, PartialEq)]
pub enum ManagedValue {
    String(String),
    Bytes(Vec<u8>),
    Int(i32),
    Long(i64),
}

impl ManagedValue {
    /// JVM type descriptor of this argument.
    pub fn descriptor(&self) -> &'static str {
        match self {
            ManagedValue::String(_) => "Ljava/lang/String;",
            ManagedValue::Bytes(_) => "[B",
            ManagedValue::Int(_) => "I",
            ManagedValue::Long(_) => "J",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ManagedValue::String(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl From<String> for ManagedValue {
    fn from(value: String) -> Self {
        ManagedValue::String(value)
    }
}

impl From<&str> for ManagedValue {
    fn from(value: &str) -> Self {
        ManagedValue::String(value.to_string())
    }
}

impl From<Vec<u8>> for ManagedValue {
    fn from(value: Vec<u8>) -> Self {
        ManagedValue::Bytes(value)
    }
}

impl From<i32> for ManagedValue {
    fn from(value: i32) -> Self {
        ManagedValue::Int(value)
    }
}

impl From<i64> for ManagedValue {
    fn from(value: i64) -> Self {
        ManagedValue::Long(value)
    }
}

/// Whether the managed method is called on the held object or on its class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    Instance,
    Static,
}

/// Return type of a managed method. The value itself is discarded by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnType {
    Void,
    Boolean,
}

impl ReturnType {
    pub fn descriptor(&self) -> &'static str {
        match self {
            ReturnType::Void => "V",
            ReturnType::Boolean => "Z",
        }
    }
}

/// Method type descriptor such as `(Ljava/lang/String;)V`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature(String);

impl MethodSignature {
    pub fn new(args: &[ManagedValue], returns: ReturnType) -> Self {
        let params: String = args.iter().map(ManagedValue::descriptor).collect();
        MethodSignature(format!("({}){}", params, returns.descriptor()))
    }

    /// Descriptor of a void method taking `args`.
    pub fn void_method(args: &[ManagedValue]) -> Self {
        Self::new(args, ReturnType::Void)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One named-method invocation on a managed counterpart.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagedCall {
    pub method: &'static str,
    pub kind: CallKind,
    pub args: Vec<ManagedValue>,
    pub returns: ReturnType,
}

impl ManagedCall {
    pub fn new(method: &'static str, kind: CallKind, args: Vec<ManagedValue>) -> Self {
        ManagedCall {
            method,
            kind,
            args,
            returns: ReturnType::Void,
        }
    }

    pub fn returning(mut self, returns: ReturnType) -> Self {
        self.returns = returns;
        self
    }

    pub fn signature(&self) -> MethodSignature {
        MethodSignature::new(&self.args, self.returns)
    }
}

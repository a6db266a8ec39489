// Implementations of the managed runtime defined in the domain layer.
// `runtime` needs nothing from the host; `jni` talks to a JVM and is only built with the `jni` feature.

#[cfg(feature = "jni")]
pub(crate) mod jni;
pub(crate) mod runtime;

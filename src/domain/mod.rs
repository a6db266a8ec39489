// Domain layer
// The bridge talks to two external parties, both modelled here as traits.
// - native: objects and callback interfaces owned by the native SDK
// - managed: durable references into the managed runtime and thread attachment
// plus the handle scheme that replaces raw native addresses on the managed side.

/// Generational handles exposed to the managed side as `nativePointer`
pub(crate) mod handle;
/// Durable managed references and the managed runtime
pub(crate) mod managed;
/// Objects and callback interfaces of the native SDK
pub(crate) mod native;

pub(crate) mod service;
pub(crate) mod value_object;

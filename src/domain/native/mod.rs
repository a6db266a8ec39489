pub(crate) mod entity;
pub(crate) mod listener;
pub(crate) mod value_object;

pub(crate) mod builder;
pub(crate) mod request;
pub(crate) mod style;

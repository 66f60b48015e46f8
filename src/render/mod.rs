pub(crate) mod backend;
pub(crate) mod color;
pub(crate) mod cpu;
pub(crate) mod engine;
pub(crate) mod layout;
pub(crate) mod output;
pub(crate) mod plan;
pub(crate) mod simplify;
pub(crate) mod text;
pub(crate) mod wave;

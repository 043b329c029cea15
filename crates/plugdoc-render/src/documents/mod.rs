//! One module per generated document

pub(crate) mod agents;
pub(crate) mod plugins;
pub(crate) mod skills;
pub(crate) mod usage;

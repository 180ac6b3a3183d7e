mod knowledge_base;

pub use knowledge_base::*;

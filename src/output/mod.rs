// Output module - Report formatting (JSON, Terminal)

pub mod json;
pub mod terminal;

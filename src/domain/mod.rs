// Domain layer: settlement records, documents, the verification report and ports.

pub mod document;
pub mod model;
pub mod ports;
pub mod report;

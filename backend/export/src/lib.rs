pub mod report;

pub use report::export_to_pdf;
